//! A few well-known patterns that can be stamped onto a board.

use super::rle::PatternError;
use crate::life::Board;

pub struct Pattern {
    pub name: &'static str,
    pub width: i64,
    pub height: i64,
    pub cells: &'static [(i64, i64)],
}

pub const BLOCK: Pattern = Pattern {
    name: "block",
    width: 2,
    height: 2,
    cells: &[(0, 0), (1, 0), (0, 1), (1, 1)],
};

/// Vertical phase.
pub const BLINKER: Pattern = Pattern {
    name: "blinker",
    width: 1,
    height: 3,
    cells: &[(0, 0), (0, 1), (0, 2)],
};

pub const GLIDER: Pattern = Pattern {
    name: "glider",
    width: 3,
    height: 3,
    cells: &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
};

pub const LIGHTWEIGHT_SPACESHIP: Pattern = Pattern {
    name: "lwss",
    width: 5,
    height: 4,
    cells: &[
        (1, 0),
        (4, 0),
        (0, 1),
        (0, 2),
        (4, 2),
        (0, 3),
        (1, 3),
        (2, 3),
        (3, 3),
    ],
};

pub const R_PENTOMINO: Pattern = Pattern {
    name: "r-pentomino",
    width: 3,
    height: 3,
    cells: &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)],
};

pub const ALL: [&Pattern; 5] = [&BLOCK, &BLINKER, &GLIDER, &LIGHTWEIGHT_SPACESHIP, &R_PENTOMINO];

impl Pattern {
    pub fn by_name(name: &str) -> Option<&'static Pattern> {
        ALL.into_iter()
            .find(|pattern| pattern.name.eq_ignore_ascii_case(name))
    }

    /// Clear the pattern's bounding box at `(x, y)`, then write its cells there.
    ///
    /// A box that would leave the `i64` plane is rejected and `board` is left
    /// untouched.
    pub fn stamp(&self, board: &mut Board, x: i64, y: i64) -> Result<(), PatternError> {
        let fits = x.checked_add(self.width - 1).is_some()
            && y.checked_add(self.height - 1).is_some();
        if !fits {
            return Err(PatternError::PlacementOverflow {
                name: self.name,
                x,
                y,
            });
        }
        for dy in 0..self.height {
            for dx in 0..self.width {
                board.set_cell(x + dx, y + dy, false);
            }
        }
        board.set_cells_alive(self.cells.iter().map(|&(dx, dy)| (x + dx, y + dy)));
        Ok(())
    }

    pub fn to_board(&self, x: i64, y: i64) -> Result<Board, PatternError> {
        let mut board = Board::new();
        self.stamp(&mut board, x, y)?;
        Ok(board)
    }
}
