//! Grid module - the canonical NxN cell matrix
//!
//! Cells are stored in a flat row-major vector (`row * size + col`).
//! Row 0 is the top; gravity moves content towards higher rows.
//!
//! Coordinates are trusted: [`Grid::get`] and [`Grid::set`] panic on
//! out-of-range input because that can only be a caller bug. Code handling
//! untrusted coordinates checks [`Grid::contains`] or uses [`Grid::try_get`].

use tracing::trace;

use crate::error::EngineError;
use crate::matcher::completes_run_up_left;
use crate::rng::ShapeSource;
use crate::types::{Coord, KindId, INIT_MAX_ATTEMPTS, MAX_GRID_SIZE, MIN_GRID_SIZE};

/// One grid cell.
///
/// `serial` is a logical identity for presentation layers: every time content
/// is drawn into a cell it gets a fresh serial. Game logic never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub kind: KindId,
    pub serial: u32,
}

/// Square playfield.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: u8,
    /// Flat array of cells, row-major order (row * size + col)
    cells: Vec<Cell>,
    next_serial: u32,
}

impl Grid {
    /// Fill a `size`x`size` grid with uniform draws from a pool of `pool_len` kinds.
    ///
    /// Fill runs row-major. Each draw that would complete a run of three with
    /// the two cells to its left or the two above is resampled, at most
    /// [`INIT_MAX_ATTEMPTS`] draws in total; after that the last draw is kept
    /// even if it matches, so the result may contain runs.
    ///
    /// # Panics
    ///
    /// If `pool_len` is zero or above 256, or `size` is outside the supported range.
    /// Sessions validate both before calling.
    pub fn initialize<R: ShapeSource + ?Sized>(pool_len: usize, size: u8, rng: &mut R) -> Self {
        assert!(
            (1..=256).contains(&pool_len),
            "pool must hold 1..=256 kinds, got {}",
            pool_len
        );
        assert!(
            (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size),
            "grid size {} out of range",
            size
        );

        let n = size as usize;
        let mut kinds: Vec<KindId> = Vec::with_capacity(n * n);
        for row in 0..size {
            for col in 0..size {
                let mut kind = KindId(rng.pick(pool_len) as u8);
                let mut attempts = 1;
                while completes_run_up_left(&kinds, size, Coord::new(row, col), kind) {
                    if attempts >= INIT_MAX_ATTEMPTS {
                        trace!(row, col, kind = kind.0, "resampling budget exhausted, keeping draw");
                        break;
                    }
                    kind = KindId(rng.pick(pool_len) as u8);
                    attempts += 1;
                }
                kinds.push(kind);
            }
        }

        Self::with_kinds(size, kinds)
    }

    /// Build a grid from row-major kinds.
    pub fn from_kinds(size: u8, kinds: Vec<KindId>) -> Result<Self, EngineError> {
        if !(MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) {
            return Err(EngineError::MalformedGrid(format!(
                "size {} outside {}..={}",
                size, MIN_GRID_SIZE, MAX_GRID_SIZE
            )));
        }
        let expected = size as usize * size as usize;
        if kinds.len() != expected {
            return Err(EngineError::MalformedGrid(format!(
                "expected {} cells, got {}",
                expected,
                kinds.len()
            )));
        }
        Ok(Self::with_kinds(size, kinds))
    }

    /// Build a grid from rows of raw kind ids. Every row must be as long as
    /// there are rows.
    ///
    /// ```
    /// use shape_match_core::Grid;
    /// use shape_match_core::types::{Coord, KindId};
    ///
    /// let grid = Grid::from_rows(&[
    ///     [0, 1, 2],
    ///     [1, 2, 0],
    ///     [2, 0, 1],
    /// ]).unwrap();
    /// assert_eq!(grid.kind(Coord::new(1, 2)), KindId(0));
    /// ```
    pub fn from_rows<Row: AsRef<[u8]>>(rows: &[Row]) -> Result<Self, EngineError> {
        let size = rows.len();
        let mut kinds = Vec::with_capacity(size * size);
        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != size {
                return Err(EngineError::MalformedGrid(format!(
                    "row {} has {} cells, expected {}",
                    r,
                    row.len(),
                    size
                )));
            }
            kinds.extend(row.iter().map(|&k| KindId(k)));
        }
        let size = u8::try_from(size)
            .map_err(|_| EngineError::MalformedGrid(format!("{} rows is too many", size)))?;
        Self::from_kinds(size, kinds)
    }

    fn with_kinds(size: u8, kinds: Vec<KindId>) -> Self {
        let cells = kinds
            .into_iter()
            .enumerate()
            .map(|(i, kind)| Cell {
                kind,
                serial: i as u32,
            })
            .collect::<Vec<_>>();
        let next_serial = cells.len() as u32;
        Self {
            size,
            cells,
            next_serial,
        }
    }

    /// Side length.
    pub fn size(&self) -> u8 {
        self.size
    }

    /// Check if the coordinate lies on the grid
    pub fn contains(&self, at: Coord) -> bool {
        at.row < self.size && at.col < self.size
    }

    /// Calculate flat index from a coordinate
    #[inline(always)]
    fn index(&self, at: Coord) -> Option<usize> {
        if !self.contains(at) {
            return None;
        }
        Some(at.row as usize * self.size as usize + at.col as usize)
    }

    #[inline(always)]
    #[track_caller]
    fn index_or_panic(&self, at: Coord) -> usize {
        match self.index(at) {
            Some(idx) => idx,
            None => panic!(
                "coordinate ({}, {}) is outside the {}x{} grid",
                at.row, at.col, self.size, self.size
            ),
        }
    }

    /// Checked coordinate validation for untrusted input.
    pub fn check(&self, at: Coord) -> Result<(), EngineError> {
        if self.contains(at) {
            Ok(())
        } else {
            Err(EngineError::InvalidCoordinate {
                row: at.row,
                col: at.col,
                size: self.size,
            })
        }
    }

    /// Cell at `at`.
    ///
    /// # Panics
    ///
    /// If `at` is outside the grid.
    #[track_caller]
    pub fn get(&self, at: Coord) -> Cell {
        self.cells[self.index_or_panic(at)]
    }

    pub fn try_get(&self, at: Coord) -> Option<Cell> {
        self.index(at).map(|idx| self.cells[idx])
    }

    /// Kind at `at`. Panics like [`Grid::get`].
    #[track_caller]
    pub fn kind(&self, at: Coord) -> KindId {
        self.get(at).kind
    }

    /// Overwrite the cell at `at`.
    ///
    /// # Panics
    ///
    /// If `at` is outside the grid.
    #[track_caller]
    pub fn set(&mut self, at: Coord, cell: Cell) {
        let idx = self.index_or_panic(at);
        self.cells[idx] = cell;
    }

    /// Place freshly drawn content at `at` under a new serial.
    #[track_caller]
    pub fn put_new(&mut self, at: Coord, kind: KindId) {
        let idx = self.index_or_panic(at);
        let serial = self.next_serial;
        self.next_serial = self.next_serial.wrapping_add(1);
        self.cells[idx] = Cell { kind, serial };
    }

    /// Exchange the contents of two cells. Serials travel with their content.
    #[track_caller]
    pub fn swap(&mut self, a: Coord, b: Coord) {
        let ia = self.index_or_panic(a);
        let ib = self.index_or_panic(b);
        self.cells.swap(ia, ib);
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// One row of cells.
    #[track_caller]
    pub fn row(&self, row: u8) -> &[Cell] {
        let start = self.index_or_panic(Coord::new(row, 0));
        &self.cells[start..start + self.size as usize]
    }

    /// Kinds only, row-major. Handy for comparing boards while ignoring serials.
    pub fn kinds(&self) -> Vec<KindId> {
        self.cells.iter().map(|c| c.kind).collect()
    }

    /// Largest kind id present.
    pub fn max_kind(&self) -> Option<KindId> {
        self.cells.iter().map(|c| c.kind).max()
    }

    /// Iterate every coordinate row-major.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let size = self.size;
        (0..size).flat_map(move |row| (0..size).map(move |col| Coord::new(row, col)))
    }
}
