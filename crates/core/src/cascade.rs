//! Resolution cycle - remove, score, collapse, refill, repeat
//!
//! One iteration ([`resolve_step`]):
//!
//! 1. Detect runs; none means the grid is settled.
//! 2. Score `POINTS_PER_CELL` per matched cell.
//! 3. Per column, compact surviving cells downward in their original order,
//!    then draw fresh kinds into the vacated top cells.
//!
//! Refill draws are deliberately unfiltered: a refill that lines up a new run
//! is caught by the next iteration (a cascade) and scored again.

use arrayvec::ArrayVec;
use tracing::debug;

use crate::grid::Grid;
use crate::matcher::{find_matches, MatchSet};
use crate::rng::ShapeSource;
use crate::types::{Coord, KindId, BIG_MATCH_POINTS, MAX_GRID_SIZE, POINTS_PER_CELL};

/// What one iteration of the cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CascadeStep {
    /// Cells removed this iteration (positions before gravity).
    pub matched: MatchSet,
    /// `POINTS_PER_CELL * matched.len()`.
    pub points: u32,
    /// Positions whose content arrived this iteration, by falling or refill.
    pub fallen: MatchSet,
    /// Number of freshly drawn cells.
    pub refilled: u32,
}

impl CascadeStep {
    /// More than three cells in one removal.
    pub fn is_big_match(&self) -> bool {
        self.points > BIG_MATCH_POINTS
    }
}

/// Totals for a full cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Resolution {
    /// Iterations that removed cells (1 = no cascade).
    pub steps: u32,
    pub cleared: u32,
    pub points: u32,
    pub big_matches: u32,
}

impl Resolution {
    pub fn absorb(&mut self, step: &CascadeStep) {
        self.steps += 1;
        self.cleared += step.matched.len() as u32;
        self.points += step.points;
        if step.is_big_match() {
            self.big_matches += 1;
        }
    }
}

/// Points for a removal of `cells` cells.
pub fn points_for(cells: usize) -> u32 {
    POINTS_PER_CELL * cells as u32
}

/// Run one iteration. Returns `None` (grid untouched) when nothing matches.
pub fn resolve_step<R: ShapeSource + ?Sized>(
    grid: &mut Grid,
    pool_len: usize,
    rng: &mut R,
) -> Option<CascadeStep> {
    let matched = find_matches(grid);
    if matched.is_empty() {
        return None;
    }

    let (fallen, refilled) = collapse_and_refill(grid, &matched, pool_len, rng);
    let step = CascadeStep {
        matched,
        points: points_for(matched.len()),
        fallen,
        refilled,
    };
    debug!(
        cleared = step.matched.len(),
        points = step.points,
        refilled = step.refilled,
        "cascade step"
    );
    Some(step)
}

/// Iterate until the grid is settled.
pub fn resolve<R: ShapeSource + ?Sized>(grid: &mut Grid, pool_len: usize, rng: &mut R) -> Resolution {
    let mut total = Resolution::default();
    while let Some(step) = resolve_step(grid, pool_len, rng) {
        total.absorb(&step);
    }
    total
}

/// Column-local gravity followed by top refill.
///
/// Two-pointer per column: `read` walks up from the bottom, `write` marks the
/// lowest slot not yet filled by a survivor. `write >= read` always holds, so
/// moving in place never clobbers an unread cell.
fn collapse_and_refill<R: ShapeSource + ?Sized>(
    grid: &mut Grid,
    matched: &MatchSet,
    pool_len: usize,
    rng: &mut R,
) -> (MatchSet, u32) {
    let n = grid.size();
    let mut fallen = MatchSet::new(n);
    let mut refilled = 0u32;

    for col in 0..n {
        let mut write = n;
        for read in (0..n).rev() {
            let from = Coord::new(read, col);
            if matched.contains(from) {
                continue;
            }
            write -= 1;
            if write != read {
                let to = Coord::new(write, col);
                grid.set(to, grid.get(from));
                fallen.insert(to);
            }
        }

        // Draw in bottom-up order so the column fills like a queue from above.
        let mut fresh: ArrayVec<KindId, { MAX_GRID_SIZE as usize }> = ArrayVec::new();
        for _ in 0..write {
            fresh.push(KindId(rng.pick(pool_len) as u8));
        }
        for (row, kind) in (0..write).rev().zip(fresh) {
            let at = Coord::new(row, col);
            grid.put_new(at, kind);
            fallen.insert(at);
            refilled += 1;
        }
    }

    (fallen, refilled)
}
