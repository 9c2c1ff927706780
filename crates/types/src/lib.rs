//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the engine.
//! All types are plain data (serde-enabled so tier tables and catalogs can be
//! loaded from JSON), usable in any context: engine logic, the adapter
//! protocol, or a presentation layer.
//!
//! # Grid
//!
//! The playfield is a square matrix addressed by `(row, col)`:
//!
//! - **Default size**: 8x8 ([`DEFAULT_GRID_SIZE`])
//! - **Row 0** is the top; gravity pulls towards the highest row index
//! - Every cell always holds a kind from the session's allowed pool
//!
//! # Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MIN_RUN` | 3 | Shortest run that counts as a match |
//! | `POINTS_PER_CELL` | 10 | Points for each removed cell |
//! | `BIG_MATCH_POINTS` | 30 | A single removal worth more than this is a "big match" |
//! | `INIT_MAX_ATTEMPTS` | 10 | Resampling budget per cell when filling a new grid |
//!
//! # Examples
//!
//! ```
//! use shape_match_types::{Coord, SwapOutcome, DEFAULT_GRID_SIZE};
//!
//! let a = Coord::new(0, 1);
//! assert!(a.is_adjacent(Coord::new(1, 1)));
//! assert!(!a.is_adjacent(Coord::new(1, 2)));
//!
//! assert!(SwapOutcome::Matched.matched());
//! assert_eq!(DEFAULT_GRID_SIZE, 8);
//! ```

pub mod catalog;

use serde::{Deserialize, Serialize};

pub use catalog::{default_tier_table, geometric_shapes};

/// Grid side length used when a configuration does not specify one.
pub const DEFAULT_GRID_SIZE: u8 = 8;

/// Smallest grid on which a run of three fits.
pub const MIN_GRID_SIZE: u8 = 3;

/// Largest supported grid side (match sets are fixed-size bitmaps).
pub const MAX_GRID_SIZE: u8 = 16;

/// Number of cells in the largest supported grid.
pub const MAX_CELLS: usize = MAX_GRID_SIZE as usize * MAX_GRID_SIZE as usize;

/// Shortest run of identical kinds that forms a match.
pub const MIN_RUN: usize = 3;

/// Points awarded per removed cell.
pub const POINTS_PER_CELL: u32 = 10;

/// Removals worth strictly more than this emit [`GameEvent::BigMatch`].
pub const BIG_MATCH_POINTS: u32 = 30;

/// Draw attempts per cell before `Grid::initialize` accepts a matching draw.
pub const INIT_MAX_ATTEMPTS: u32 = 10;

/// Smallest allowed pool. With fewer kinds the cascade may never settle.
pub const MIN_POOL_SIZE: usize = 3;

/// A grid position. Row 0 is the top row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: u8,
    pub col: u8,
}

impl Coord {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// True when `other` is exactly one step away along a single axis.
    ///
    /// ```
    /// use shape_match_types::Coord;
    ///
    /// let c = Coord::new(3, 3);
    /// assert!(c.is_adjacent(Coord::new(3, 4)));
    /// assert!(c.is_adjacent(Coord::new(2, 3)));
    /// assert!(!c.is_adjacent(Coord::new(4, 4))); // diagonal
    /// assert!(!c.is_adjacent(Coord::new(3, 5)));
    /// assert!(!c.is_adjacent(c));
    /// ```
    pub fn is_adjacent(self, other: Coord) -> bool {
        let dr = self.row.abs_diff(other.row);
        let dc = self.col.abs_diff(other.col);
        (dr == 1 && dc == 0) || (dr == 0 && dc == 1)
    }
}

impl From<(u8, u8)> for Coord {
    fn from((row, col): (u8, u8)) -> Self {
        Self { row, col }
    }
}

/// Index of a kind within the session's allowed pool.
///
/// The grid stores these instead of full [`ShapeKind`] values; matching only
/// ever compares ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KindId(pub u8);

impl KindId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A catalog entry describing one geometric shape.
///
/// Supplied by the surrounding application and read-only to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeKind {
    /// Unique key, e.g. `"triangle"`.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Number of sides (0 for curved shapes).
    pub sides: u8,
    /// Color tag used by a presentation layer.
    pub color: String,
    #[serde(default)]
    pub emoji: String,
}

/// Per-session difficulty: move budget, goal, and the kinds that may appear.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    pub moves_allowed: u32,
    pub target_score: u32,
    /// Ordered subset of the catalog. [`KindId`] values index into this.
    pub pool: Vec<ShapeKind>,
    #[serde(default = "default_grid_size")]
    pub grid_size: u8,
}

fn default_grid_size() -> u8 {
    DEFAULT_GRID_SIZE
}

/// One row of the level-tier lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    /// Highest level (inclusive) this tier covers. `None` covers every level
    /// above the previous tier and must only appear last.
    #[serde(default)]
    pub up_to_level: Option<u32>,
    pub moves_allowed: u32,
    pub target_score: u32,
    /// Number of leading catalog entries in the pool. `None` uses the whole catalog.
    #[serde(default)]
    pub pool_size: Option<usize>,
}

/// Ordered difficulty brackets mapping a level number to a [`DifficultyConfig`].
///
/// Any number of tiers is accepted; lookup walks them in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierTable {
    pub tiers: Vec<Tier>,
    #[serde(default = "default_grid_size")]
    pub grid_size: u8,
}

impl TierTable {
    /// Tier covering `level`. Levels past every bound fall into the last tier.
    pub fn tier_for(&self, level: u32) -> Option<&Tier> {
        self.tiers
            .iter()
            .find(|t| t.up_to_level.map_or(true, |max| level <= max))
            .or_else(|| self.tiers.last())
    }

    /// Build the session configuration for `level` from `catalog`.
    pub fn config_for(&self, level: u32, catalog: &[ShapeKind]) -> Option<DifficultyConfig> {
        let tier = self.tier_for(level)?;
        let take = tier.pool_size.unwrap_or(catalog.len()).min(catalog.len());
        Some(DifficultyConfig {
            moves_allowed: tier.moves_allowed,
            target_score: tier.target_score,
            pool: catalog[..take].to_vec(),
            grid_size: self.grid_size,
        })
    }
}

/// Session lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Won,
    Lost,
}

impl SessionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionStatus::Active)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Won => "won",
            SessionStatus::Lost => "lost",
        }
    }
}

/// Result of a swap request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapOutcome {
    /// Dropped: a cycle was in flight or the session already ended.
    Ignored,
    /// Cells were not orthogonal neighbours; nothing was attempted.
    NotAdjacent,
    /// Swap attempted but produced no run; grid restored.
    Invalid,
    /// Swap committed and a move consumed.
    Matched,
}

impl SwapOutcome {
    /// The swap produced a run and was committed.
    pub fn accepted(&self) -> bool {
        self.matched()
    }

    pub fn matched(&self) -> bool {
        matches!(self, SwapOutcome::Matched)
    }
}

/// Result of a tap on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectOutcome {
    /// Tap dropped (processing or session over).
    Ignored,
    /// First tap: the cell is now selected.
    Selected(Coord),
    /// Second tap on a non-adjacent cell: selection cleared.
    Deselected,
    /// Second tap on an adjacent cell: swap was attempted.
    Swapped(SwapOutcome),
}

/// Outbound signal for the surrounding application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEvent {
    ScoreChanged { score: u32, delta: u32 },
    MovesChanged { remaining: u32 },
    BigMatch { cells: u32, points: u32 },
    InvalidMove { a: Coord, b: Coord },
    SessionEnded { won: bool, final_score: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> TierTable {
        TierTable {
            tiers: vec![
                Tier {
                    up_to_level: Some(2),
                    moves_allowed: 10,
                    target_score: 50,
                    pool_size: Some(3),
                },
                Tier {
                    up_to_level: None,
                    moves_allowed: 5,
                    target_score: 500,
                    pool_size: None,
                },
            ],
            grid_size: 6,
        }
    }

    #[test]
    fn test_tier_lookup_walks_in_order() {
        let t = table();
        assert_eq!(t.tier_for(1).unwrap().moves_allowed, 10);
        assert_eq!(t.tier_for(2).unwrap().moves_allowed, 10);
        assert_eq!(t.tier_for(3).unwrap().moves_allowed, 5);
        assert_eq!(t.tier_for(99).unwrap().moves_allowed, 5);
    }

    #[test]
    fn test_tier_lookup_past_last_bound_uses_last_tier() {
        let t = TierTable {
            tiers: vec![Tier {
                up_to_level: Some(1),
                moves_allowed: 7,
                target_score: 70,
                pool_size: None,
            }],
            grid_size: DEFAULT_GRID_SIZE,
        };
        assert_eq!(t.tier_for(40).unwrap().moves_allowed, 7);
    }

    #[test]
    fn test_config_for_slices_catalog() {
        let catalog = geometric_shapes();
        let cfg = table().config_for(1, &catalog).unwrap();
        assert_eq!(cfg.pool.len(), 3);
        assert_eq!(cfg.pool[0], catalog[0]);
        assert_eq!(cfg.grid_size, 6);

        let cfg = table().config_for(5, &catalog).unwrap();
        assert_eq!(cfg.pool.len(), catalog.len());
    }

    #[test]
    fn test_empty_table_has_no_config() {
        let t = TierTable {
            tiers: Vec::new(),
            grid_size: DEFAULT_GRID_SIZE,
        };
        assert!(t.config_for(1, &geometric_shapes()).is_none());
    }

    #[test]
    fn test_swap_outcome_flags() {
        assert!(!SwapOutcome::Ignored.accepted());
        assert!(!SwapOutcome::NotAdjacent.accepted());
        assert!(!SwapOutcome::Invalid.accepted());
        assert!(!SwapOutcome::Invalid.matched());
        assert!(SwapOutcome::Matched.accepted());
        assert!(SwapOutcome::Matched.matched());
    }

    #[test]
    fn test_event_json_shape() {
        let ev = GameEvent::SessionEnded {
            won: true,
            final_score: 120,
        };
        let v = serde_json::to_value(ev).unwrap();
        assert_eq!(v["kind"], "session_ended");
        assert_eq!(v["won"], true);
        assert_eq!(v["final_score"], 120);
    }

    #[test]
    fn test_tier_table_from_json_defaults() {
        let json = r#"{"tiers":[{"moves_allowed":3,"target_score":30}]}"#;
        let t: TierTable = serde_json::from_str(json).unwrap();
        assert_eq!(t.grid_size, DEFAULT_GRID_SIZE);
        assert_eq!(t.tiers[0].up_to_level, None);
        assert_eq!(t.tiers[0].pool_size, None);
    }
}
