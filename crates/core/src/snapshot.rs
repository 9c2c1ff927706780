//! Snapshot module - read-only session views for observers
//!
//! Cells carry derived `matched`/`falling` flags so a presentation layer can
//! animate a cycle without reaching into the grid.

use crate::grid::Grid;
use crate::matcher::MatchSet;
use crate::types::{Coord, KindId, SessionStatus};

/// One cell as seen by an observer, with the derived animation flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellView {
    pub row: u8,
    pub col: u8,
    pub kind: KindId,
    pub serial: u32,
    /// Part of a run the next cycle step will remove.
    pub matched: bool,
    /// Content arrived here during the last cycle step.
    pub falling: bool,
}

/// Read-only copy of a session's observable state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionSnapshot {
    pub size: u8,
    /// Row-major.
    pub cells: Vec<CellView>,
    pub episode_id: u32,
    pub level: u32,
    pub score: u32,
    pub target_score: u32,
    pub moves_allowed: u32,
    pub moves_remaining: u32,
    pub status: SessionStatus,
    pub processing: bool,
    pub selected: Option<Coord>,
}

impl SessionSnapshot {
    pub(crate) fn cells_from(grid: &Grid, matched: &MatchSet, falling: &MatchSet) -> Vec<CellView> {
        grid.coords()
            .zip(grid.cells())
            .map(|(at, cell)| CellView {
                row: at.row,
                col: at.col,
                kind: cell.kind,
                serial: cell.serial,
                matched: matched.contains(at),
                falling: falling.contains(at),
            })
            .collect()
    }

    pub fn cell(&self, at: Coord) -> Option<&CellView> {
        if at.row >= self.size || at.col >= self.size {
            return None;
        }
        self.cells
            .get(at.row as usize * self.size as usize + at.col as usize)
    }

    pub fn game_over(&self) -> bool {
        self.status.is_terminal()
    }

    /// Accepting taps and swaps right now.
    pub fn playable(&self) -> bool {
        !self.game_over() && !self.processing
    }
}
