//! Core match engine - pure, deterministic (given a seeded source), and testable
//!
//! This crate contains the puzzle rules, session state, and the resolution
//! cycle. It has **no dependencies** on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical boards and cascades
//! - **Testable**: Scripted random sources pin every refill in tests
//! - **Portable**: Can run headless, behind the TCP adapter, or under a GUI
//!
//! # Module Structure
//!
//! - [`grid`]: NxN cell matrix and the run-avoiding initializer
//! - [`matcher`]: run detection over rows and columns
//! - [`cascade`]: remove, score, collapse, refill, repeat
//! - [`swap`]: adjacency and speculative-swap validation, hint search
//! - [`session`]: move budget, score, win/lose, tap handling
//! - [`difficulty`]: tier table and config validation
//! - [`rng`]: injectable shape sources
//! - [`snapshot`]: read-only session views for observers
//!
//! # Game Rules
//!
//! - A swap is only legal between orthogonal neighbours and only when it
//!   produces a run of three or more; an illegal swap costs nothing
//! - Every removed cell scores 10 points; removing more than three cells in
//!   one pass is a "big match"
//! - Columns collapse downward and refill from the top; refills are not
//!   filtered, so chains (cascades) happen and score again
//! - With no moves left and the board settled, the session is won when the
//!   score reached the target, lost otherwise
//!
//! # Example
//!
//! ```
//! use shape_match_core::{Grid, Session, ScriptedSource};
//! use shape_match_core::types::{geometric_shapes, Coord, DifficultyConfig, SwapOutcome};
//!
//! let config = DifficultyConfig {
//!     moves_allowed: 1,
//!     target_score: 30,
//!     pool: geometric_shapes()[..3].to_vec(),
//!     grid_size: 3,
//! };
//! let grid = Grid::from_rows(&[
//!     [0, 1, 0],
//!     [2, 0, 2],
//!     [1, 2, 1],
//! ]).unwrap();
//! // Refill for the cleared top row.
//! let rng = ScriptedSource::new(vec![2, 1, 2], 1);
//!
//! let mut session = Session::with_grid(config, grid, rng).unwrap();
//! let outcome = session.request_swap(Coord::new(0, 1), Coord::new(1, 1)).unwrap();
//!
//! assert_eq!(outcome, SwapOutcome::Matched);
//! assert_eq!(session.score(), 30);
//! assert!(session.game_over());
//! ```

pub mod cascade;
pub mod difficulty;
pub mod error;
pub mod grid;
pub mod matcher;
pub mod rng;
pub mod session;
pub mod snapshot;
pub mod swap;

pub use shape_match_types as types;

// Re-export commonly used types for convenience
pub use cascade::{resolve, resolve_step, CascadeStep, Resolution};
pub use difficulty::{resolve_level, validate_config, validate_tiers};
pub use error::{ConfigError, EngineError};
pub use grid::{Cell, Grid};
pub use matcher::{find_matches, would_create_match, MatchSet};
pub use rng::{RandSource, ScriptedSource, ShapeSource, SimpleRng};
pub use session::Session;
pub use snapshot::{CellView, SessionSnapshot};
pub use swap::{check_swap, find_valid_swap, SwapCheck};
