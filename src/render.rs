//! Text snapshots of a board.

use std::fmt::Write;

use crate::life::Board;

const LIVE: char = '█';
const DEAD: char = ' ';

/// A rectangular window onto the plane; `(x, y)` is the top-left cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub x: i64,
    pub y: i64,
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(x: i64, y: i64, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The smallest viewport containing every live cell.
    pub fn fit(board: &Board) -> Option<Self> {
        let (min_x, min_y, max_x, max_y) = board.bounds()?;
        let width = usize::try_from(max_x.abs_diff(min_x)).ok()?.checked_add(1)?;
        let height = usize::try_from(max_y.abs_diff(min_y)).ok()?.checked_add(1)?;
        Some(Self::new(min_x, min_y, width, height))
    }

    /// `(column, row)` of `(x, y)` inside the viewport, if visible.
    fn locate(&self, x: i64, y: i64) -> Option<(usize, usize)> {
        let col = usize::try_from(x.checked_sub(self.x)?).ok()?;
        let row = usize::try_from(y.checked_sub(self.y)?).ok()?;
        (col < self.width && row < self.height).then_some((col, row))
    }
}

/// Rows of `█` and spaces, one line per row, no trailing newline.
pub fn render(board: &Board, viewport: Viewport) -> String {
    let mut grid = vec![vec![DEAD; viewport.width]; viewport.height];
    board.for_each_live(|x, y| {
        if let Some((col, row)) = viewport.locate(x, y) {
            grid[row][col] = LIVE;
        }
    });
    grid.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Clear the terminal, then place a `█` at each visible live cell using
/// cursor-positioning escapes.
pub fn render_ansi(board: &Board, viewport: Viewport) -> String {
    let mut out = String::from("\x1b[2J\x1b[H");
    board.for_each_live(|x, y| {
        if let Some((col, row)) = viewport.locate(x, y) {
            let _ = write!(out, "\x1b[{};{}H{LIVE}", row + 1, col + 1);
        }
    });
    out.push_str(&format!("\x1b[{};1H", viewport.height + 1));
    out
}
