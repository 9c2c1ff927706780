//! Session module - the controller that owns one play-through
//!
//! A [`Session`] ties together the grid, the resolution cycle, and the move
//! budget of a [`DifficultyConfig`]. All mutation goes through it:
//!
//! - [`Session::select`] is the tap handler (select, then tap a neighbour)
//! - [`Session::begin_swap`] commits a matching swap and arms the cycle
//! - [`Session::step`] advances the cycle one iteration
//! - [`Session::settle`] runs the cycle to a stable grid
//! - [`Session::request_swap`] is `begin_swap` followed by `settle`
//!
//! While a cycle is pending (`is_processing()`), swaps and taps are dropped.
//! The end of the session is evaluated only once the grid has settled: with no
//! moves left the session is won when the score reached the target.
//!
//! # Example
//!
//! ```
//! use shape_match_core::{Session, SimpleRng};
//! use shape_match_core::types::{default_tier_table, geometric_shapes};
//!
//! let mut session =
//!     Session::for_level(default_tier_table(), geometric_shapes(), 1, SimpleRng::new(7)).unwrap();
//! session.settle(); // a fresh grid may hold runs
//!
//! if let Some((a, b)) = session.hint() {
//!     let outcome = session.request_swap(a, b).unwrap();
//!     assert!(outcome.matched());
//!     assert_eq!(session.moves_remaining(), 24);
//! }
//! ```

use tracing::{debug, info, instrument};

use crate::cascade::{resolve_step, CascadeStep, Resolution};
use crate::difficulty::{resolve_level, validate_config};
use crate::error::EngineError;
use crate::grid::Grid;
use crate::matcher::{find_matches, MatchSet};
use crate::rng::{ShapeSource, SimpleRng};
use crate::snapshot::SessionSnapshot;
use crate::swap::{check_swap, find_valid_swap, SwapCheck};
use crate::types::{
    Coord, DifficultyConfig, GameEvent, SelectOutcome, SessionStatus, ShapeKind, SwapOutcome,
    TierTable,
};

/// Tier table and catalog kept so the session can move to the next level.
#[derive(Debug, Clone)]
struct LevelPlan {
    table: TierTable,
    catalog: Vec<ShapeKind>,
}

/// One play-through of the match-three puzzle.
#[derive(Debug, Clone)]
pub struct Session<R = SimpleRng> {
    config: DifficultyConfig,
    plan: Option<LevelPlan>,
    level: u32,
    grid: Grid,
    score: u32,
    moves_remaining: u32,
    selected: Option<Coord>,
    /// A resolution cycle is pending or in flight.
    processing: bool,
    status: SessionStatus,
    /// Last iteration of the running cycle (drives the falling flags).
    last_step: Option<CascadeStep>,
    events: Vec<GameEvent>,
    /// Monotonic episode id (increments on retry and advance).
    episode_id: u32,
    rng: R,
}

impl<R: ShapeSource> Session<R> {
    /// Start a session for a concrete configuration.
    ///
    /// The grid is filled by [`Grid::initialize`]. If that fill kept a run,
    /// the session starts with a cycle pending; call [`Session::settle`] (or
    /// [`Session::step`]) before playing.
    pub fn start(config: DifficultyConfig, rng: R) -> Result<Self, EngineError> {
        Self::start_with_plan(config, None, 1, rng)
    }

    /// Start a session at `level`, resolving its tier from `table`.
    ///
    /// Unlike [`Session::start`], the session can later [`advance`](Session::advance).
    pub fn for_level(
        table: TierTable,
        catalog: Vec<ShapeKind>,
        level: u32,
        rng: R,
    ) -> Result<Self, EngineError> {
        let config = resolve_level(&table, &catalog, level)?;
        Self::start_with_plan(config, Some(LevelPlan { table, catalog }), level, rng)
    }

    fn start_with_plan(
        config: DifficultyConfig,
        plan: Option<LevelPlan>,
        level: u32,
        mut rng: R,
    ) -> Result<Self, EngineError> {
        validate_config(&config)?;
        let grid = Grid::initialize(config.pool.len(), config.grid_size, &mut rng);
        let mut session = Self::assemble(config, plan, level, grid, rng);
        session.arm();
        Ok(session)
    }

    /// Start a session on a prepared grid.
    ///
    /// The grid must match the configured size and only hold kinds from the pool.
    pub fn with_grid(config: DifficultyConfig, grid: Grid, rng: R) -> Result<Self, EngineError> {
        validate_config(&config)?;
        if grid.size() != config.grid_size {
            return Err(EngineError::MalformedGrid(format!(
                "grid is {}x{}, configuration expects {}x{}",
                grid.size(),
                grid.size(),
                config.grid_size,
                config.grid_size
            )));
        }
        let pool = config.pool.len();
        if let Some((at, cell)) = grid
            .coords()
            .zip(grid.cells())
            .find(|(_, cell)| cell.kind.index() >= pool)
        {
            return Err(EngineError::KindOutOfPool {
                row: at.row,
                col: at.col,
                kind: cell.kind.0,
                pool,
            });
        }

        let mut session = Self::assemble(config, None, 1, grid, rng);
        session.arm();
        Ok(session)
    }

    fn assemble(
        config: DifficultyConfig,
        plan: Option<LevelPlan>,
        level: u32,
        grid: Grid,
        rng: R,
    ) -> Self {
        Self {
            moves_remaining: config.moves_allowed,
            config,
            plan,
            level,
            grid,
            score: 0,
            selected: None,
            processing: false,
            status: SessionStatus::Active,
            last_step: None,
            events: Vec::new(),
            episode_id: 0,
            rng,
        }
    }

    /// Fresh-grid bookkeeping: a kept run means a cycle is pending.
    fn arm(&mut self) {
        self.processing = !find_matches(&self.grid).is_empty();
        info!(
            level = self.level,
            episode = self.episode_id,
            moves = self.config.moves_allowed,
            target = self.config.target_score,
            pool = self.config.pool.len(),
            pending_cycle = self.processing,
            "session started"
        );
        self.evaluate_end();
    }

    pub fn config(&self) -> &DifficultyConfig {
        &self.config
    }

    /// Kinds allowed in this session; [`KindId`](crate::types::KindId) values index into it.
    pub fn pool(&self) -> &[ShapeKind] {
        &self.config.pool
    }

    /// Catalog entry shown at `at`, if `at` is on the grid.
    pub fn shape_at(&self, at: Coord) -> Option<&ShapeKind> {
        let cell = self.grid.try_get(at)?;
        self.config.pool.get(cell.kind.index())
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn target_score(&self) -> u32 {
        self.config.target_score
    }

    pub fn moves_remaining(&self) -> u32 {
        self.moves_remaining
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn game_over(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn selected(&self) -> Option<Coord> {
        self.selected
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn last_step(&self) -> Option<&CascadeStep> {
        self.last_step.as_ref()
    }

    /// Can the session take a swap right now?
    pub fn accepts_input(&self) -> bool {
        !self.processing && !self.status.is_terminal()
    }

    /// Events not yet drained.
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take every event emitted since the last drain, oldest first.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Tap on a cell.
    ///
    /// The first tap selects. A second tap always clears the selection; when
    /// it lands on an orthogonal neighbour the pair is swapped and settled.
    pub fn select(&mut self, at: Coord) -> Result<SelectOutcome, EngineError> {
        self.grid.check(at)?;
        if !self.accepts_input() {
            return Ok(SelectOutcome::Ignored);
        }

        match self.selected.take() {
            None => {
                self.selected = Some(at);
                Ok(SelectOutcome::Selected(at))
            }
            Some(first) if first.is_adjacent(at) => {
                Ok(SelectOutcome::Swapped(self.request_swap(first, at)?))
            }
            Some(_) => Ok(SelectOutcome::Deselected),
        }
    }

    /// Validate and commit a swap without running the cycle.
    ///
    /// On [`SwapOutcome::Matched`] the swapped grid is live, one move is
    /// spent, and the session is processing until [`Session::step`] reports
    /// the grid settled.
    #[instrument(level = "debug", skip(self), fields(session_level = self.level, moves = self.moves_remaining))]
    pub fn begin_swap(&mut self, a: Coord, b: Coord) -> Result<SwapOutcome, EngineError> {
        self.grid.check(a)?;
        self.grid.check(b)?;
        if !self.accepts_input() {
            debug!("swap dropped");
            return Ok(SwapOutcome::Ignored);
        }
        self.selected = None;

        match check_swap(&self.grid, a, b) {
            SwapCheck::NotAdjacent => Ok(SwapOutcome::NotAdjacent),
            SwapCheck::NoMatch => {
                debug!("swap produces no run");
                self.events.push(GameEvent::InvalidMove { a, b });
                Ok(SwapOutcome::Invalid)
            }
            SwapCheck::Match(swapped) => {
                self.grid = swapped;
                self.moves_remaining = self.moves_remaining.saturating_sub(1);
                self.events.push(GameEvent::MovesChanged {
                    remaining: self.moves_remaining,
                });
                self.processing = true;
                self.last_step = None;
                Ok(SwapOutcome::Matched)
            }
        }
    }

    /// Advance a pending cycle by one iteration.
    ///
    /// Returns the iteration, or `None` once the grid is settled; that call
    /// also clears the processing flag and evaluates the end of the session.
    pub fn step(&mut self) -> Option<CascadeStep> {
        if !self.processing {
            return None;
        }

        match resolve_step(&mut self.grid, self.config.pool.len(), &mut self.rng) {
            Some(step) => {
                self.score += step.points;
                self.events.push(GameEvent::ScoreChanged {
                    score: self.score,
                    delta: step.points,
                });
                if step.is_big_match() {
                    self.events.push(GameEvent::BigMatch {
                        cells: step.matched.len() as u32,
                        points: step.points,
                    });
                }
                self.last_step = Some(step);
                Some(step)
            }
            None => {
                self.processing = false;
                self.last_step = None;
                self.evaluate_end();
                None
            }
        }
    }

    /// Run a pending cycle to completion.
    pub fn settle(&mut self) -> Resolution {
        let mut total = Resolution::default();
        while let Some(step) = self.step() {
            total.absorb(&step);
        }
        if total.steps > 1 {
            debug!(steps = total.steps, points = total.points, "cascade settled");
        }
        total
    }

    /// Swap, and settle when the swap matched.
    pub fn request_swap(&mut self, a: Coord, b: Coord) -> Result<SwapOutcome, EngineError> {
        let outcome = self.begin_swap(a, b)?;
        if outcome.matched() {
            self.settle();
        }
        Ok(outcome)
    }

    /// A swap that would match on the current grid. `None` while processing,
    /// after the session ended, or when the board is deadlocked.
    pub fn hint(&self) -> Option<(Coord, Coord)> {
        if !self.accepts_input() {
            return None;
        }
        find_valid_swap(&self.grid)
    }

    /// Start over with the same configuration and a new grid.
    pub fn retry(&mut self) {
        let grid = Grid::initialize(self.config.pool.len(), self.config.grid_size, &mut self.rng);
        self.reset(grid);
    }

    /// Move to the next level, re-resolving its tier.
    pub fn advance(&mut self) -> Result<(), EngineError> {
        let plan = self.plan.as_ref().ok_or(EngineError::NoTierTable)?;
        let level = self.level.saturating_add(1);
        self.config = resolve_level(&plan.table, &plan.catalog, level)?;
        self.level = level;
        let grid = Grid::initialize(self.config.pool.len(), self.config.grid_size, &mut self.rng);
        self.reset(grid);
        Ok(())
    }

    fn reset(&mut self, grid: Grid) {
        self.grid = grid;
        self.score = 0;
        self.moves_remaining = self.config.moves_allowed;
        self.selected = None;
        self.processing = false;
        self.status = SessionStatus::Active;
        self.last_step = None;
        self.events.clear();
        self.episode_id = self.episode_id.wrapping_add(1);
        self.arm();
    }

    fn evaluate_end(&mut self) {
        if self.status.is_terminal() || self.processing || self.moves_remaining > 0 {
            return;
        }

        let won = self.score >= self.config.target_score;
        self.status = if won {
            SessionStatus::Won
        } else {
            SessionStatus::Lost
        };
        self.selected = None;
        self.events.push(GameEvent::SessionEnded {
            won,
            final_score: self.score,
        });
        info!(
            level = self.level,
            score = self.score,
            target = self.config.target_score,
            status = self.status.as_str(),
            "session ended"
        );
    }

    /// Read-only copy of the observable state.
    ///
    /// `matched` flags the cells the next [`Session::step`] will remove;
    /// `falling` flags the cells the last step filled.
    pub fn snapshot(&self) -> SessionSnapshot {
        let n = self.grid.size();
        let matched = if self.processing {
            find_matches(&self.grid)
        } else {
            MatchSet::new(n)
        };
        let falling = self.last_step.map_or_else(|| MatchSet::new(n), |s| s.fallen);

        SessionSnapshot {
            size: n,
            cells: SessionSnapshot::cells_from(&self.grid, &matched, &falling),
            episode_id: self.episode_id,
            level: self.level,
            score: self.score,
            target_score: self.config.target_score,
            moves_allowed: self.config.moves_allowed,
            moves_remaining: self.moves_remaining,
            status: self.status,
            processing: self.processing,
            selected: self.selected,
        }
    }
}
