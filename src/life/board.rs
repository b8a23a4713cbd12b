//! Cells and boards.
//!
//! A board is an ordered set of live cells on the unbounded plane. The
//! `(x, y)` lexicographic order only exists to make partitioning
//! deterministic; it says nothing about adjacency.

use std::collections::BTreeSet;
use std::collections::btree_set;

/// A grid position on the unbounded plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cell {
    pub x: i64,
    pub y: i64,
}

impl Cell {
    #[inline(always)]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// The cell at `(x + dx, y + dy)`, or `None` if that leaves the `i64` plane.
    #[inline(always)]
    pub fn offset(self, dx: i64, dy: i64) -> Option<Self> {
        Some(Self {
            x: self.x.checked_add(dx)?,
            y: self.y.checked_add(dy)?,
        })
    }
}

impl From<(i64, i64)> for Cell {
    #[inline]
    fn from((x, y): (i64, i64)) -> Self {
        Self { x, y }
    }
}

impl From<Cell> for (i64, i64) {
    #[inline]
    fn from(cell: Cell) -> Self {
        (cell.x, cell.y)
    }
}

/// The set of currently-live cells. Absence means dead.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Board {
    cells: BTreeSet<Cell>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_cell(&mut self, x: i64, y: i64, alive: bool) {
        let cell = Cell::new(x, y);
        if alive {
            self.cells.insert(cell);
        } else {
            self.cells.remove(&cell);
        }
    }

    pub fn set_cells_alive<I, C>(&mut self, cells: I)
    where
        I: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        self.cells.extend(cells.into_iter().map(Into::into));
    }

    #[inline]
    pub fn get_cell(&self, x: i64, y: i64) -> bool {
        self.cells.contains(&Cell::new(x, y))
    }

    /// Returns `true` if the cell was not already alive.
    #[inline]
    pub fn insert(&mut self, cell: Cell) -> bool {
        self.cells.insert(cell)
    }

    /// Returns `true` if the cell was alive.
    #[inline]
    pub fn remove(&mut self, cell: &Cell) -> bool {
        self.cells.remove(cell)
    }

    #[inline]
    pub fn contains(&self, cell: &Cell) -> bool {
        self.cells.contains(cell)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn population(&self) -> u64 {
        self.cells.len() as u64
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Live cells in board order.
    pub fn iter(&self) -> btree_set::Iter<'_, Cell> {
        self.cells.iter()
    }

    /// The ordered live-cell sequence that partitions index into.
    pub fn live_cells(&self) -> Vec<Cell> {
        self.cells.iter().copied().collect()
    }

    /// Inclusive `(min_x, min_y, max_x, max_y)`, or `None` for an empty board.
    pub fn bounds(&self) -> Option<(i64, i64, i64, i64)> {
        let mut min_x = i64::MAX;
        let mut min_y = i64::MAX;
        let mut max_x = i64::MIN;
        let mut max_y = i64::MIN;
        let mut seen = false;

        self.for_each_live(|x, y| {
            seen = true;
            min_x = min_x.min(x);
            min_y = min_y.min(y);
            max_x = max_x.max(x);
            max_y = max_y.max(y);
        });

        seen.then_some((min_x, min_y, max_x, max_y))
    }

    pub fn for_each_live<F: FnMut(i64, i64)>(&self, mut f: F) {
        for cell in &self.cells {
            f(cell.x, cell.y);
        }
    }
}

impl FromIterator<Cell> for Board {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<(i64, i64)> for Board {
    fn from_iter<I: IntoIterator<Item = (i64, i64)>>(iter: I) -> Self {
        iter.into_iter().map(Cell::from).collect()
    }
}

impl Extend<Cell> for Board {
    fn extend<I: IntoIterator<Item = Cell>>(&mut self, iter: I) {
        self.cells.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Board {
    type Item = &'a Cell;
    type IntoIter = btree_set::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

impl IntoIterator for Board {
    type Item = Cell;
    type IntoIter = btree_set::IntoIter<Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.into_iter()
    }
}
