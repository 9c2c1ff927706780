//! Match detector - finds runs of three or more identical kinds
//!
//! Rows are scanned left to right comparing triples at `(c, c+1, c+2)`; a
//! matching triple is marked and then extended while the kind repeats. Columns
//! are scanned the same way top to bottom. The result is the deduplicated
//! union, so a cell shared by a horizontal and a vertical run (an L, T or plus
//! shape) is counted once.

use crate::grid::Grid;
use crate::types::{Coord, KindId, MAX_CELLS, MIN_RUN};

const WORDS: usize = MAX_CELLS / 64;

/// Deduplicated set of grid coordinates, stored as a bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MatchSet {
    size: u8,
    bits: [u64; WORDS],
    len: u32,
}

impl MatchSet {
    /// Empty set for a grid of side `size`.
    pub fn new(size: u8) -> Self {
        Self {
            size,
            bits: [0; WORDS],
            len: 0,
        }
    }

    #[inline(always)]
    fn slot(&self, at: Coord) -> (usize, u64) {
        debug_assert!(at.row < self.size && at.col < self.size);
        let idx = at.row as usize * self.size as usize + at.col as usize;
        (idx / 64, 1u64 << (idx % 64))
    }

    /// Add `at`; returns false if it was already present.
    pub fn insert(&mut self, at: Coord) -> bool {
        let (word, mask) = self.slot(at);
        if self.bits[word] & mask != 0 {
            return false;
        }
        self.bits[word] |= mask;
        self.len += 1;
        true
    }

    pub fn contains(&self, at: Coord) -> bool {
        if at.row >= self.size || at.col >= self.size {
            return false;
        }
        let (word, mask) = self.slot(at);
        self.bits[word] & mask != 0
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Members in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Coord> + '_ {
        let size = self.size;
        (0..size)
            .flat_map(move |row| (0..size).map(move |col| Coord::new(row, col)))
            .filter(move |&c| self.contains(c))
    }

    /// Members in row-major order, collected.
    pub fn to_vec(&self) -> Vec<Coord> {
        self.iter().collect()
    }
}

/// Every coordinate that belongs to a horizontal or vertical run of at least
/// [`MIN_RUN`] identical kinds. Empty when the grid is settled.
pub fn find_matches(grid: &Grid) -> MatchSet {
    let n = grid.size();
    let mut matches = MatchSet::new(n);
    let kinds = grid.cells();
    let at = |row: u8, col: u8| kinds[row as usize * n as usize + col as usize].kind;

    // Horizontal runs
    for row in 0..n {
        for col in 0..n - 2 {
            let kind = at(row, col);
            if at(row, col + 1) == kind && at(row, col + 2) == kind {
                matches.insert(Coord::new(row, col));
                matches.insert(Coord::new(row, col + 1));
                matches.insert(Coord::new(row, col + 2));

                let mut extra = col + 3;
                while extra < n && at(row, extra) == kind {
                    matches.insert(Coord::new(row, extra));
                    extra += 1;
                }
            }
        }
    }

    // Vertical runs
    for col in 0..n {
        for row in 0..n - 2 {
            let kind = at(row, col);
            if at(row + 1, col) == kind && at(row + 2, col) == kind {
                matches.insert(Coord::new(row, col));
                matches.insert(Coord::new(row + 1, col));
                matches.insert(Coord::new(row + 2, col));

                let mut extra = row + 3;
                while extra < n && at(extra, col) == kind {
                    matches.insert(Coord::new(extra, col));
                    extra += 1;
                }
            }
        }
    }

    matches
}

/// Would placing `kind` at `at` complete a run with the two cells to its left
/// or the two cells above it?
///
/// Only those directions are inspected, which is all a row-major fill has
/// placed so far.
pub fn would_create_match(grid: &Grid, at: Coord, kind: KindId) -> bool {
    let kinds = grid.kinds();
    completes_run_up_left(&kinds, grid.size(), at, kind)
}

/// Same probe over a partially filled row-major buffer.
pub(crate) fn completes_run_up_left(kinds: &[KindId], size: u8, at: Coord, kind: KindId) -> bool {
    let n = size as usize;
    let idx = at.row as usize * n + at.col as usize;
    let same = |i: usize| kinds.get(i) == Some(&kind);

    let horizontal = at.col as usize >= MIN_RUN - 1 && same(idx - 1) && same(idx - 2);
    let vertical = at.row as usize >= MIN_RUN - 1 && same(idx - n) && same(idx - 2 * n);
    horizontal || vertical
}
