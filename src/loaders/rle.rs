//! Run-length encoded pattern decoding.
//!
//! Tokens are an optional decimal repeat count followed by a tag: `o` is a
//! live run, `b` or `.` a dead run, `$` ends the row (a count skips rows) and
//! `!` ends the pattern. `#` comment lines and the `x = …` header line are
//! skipped. Other letters are extra cell states from multi-state rules; they
//! are consumed without moving the cursor.

use thiserror::Error;

use crate::life::{Board, Cell};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// A repeat count does not fit in 64 bits.
    #[error("repeat count overflows at line {line}, column {column}")]
    CountOverflow { line: usize, column: usize },

    /// A run would move the cursor off the `i64` plane.
    #[error("pattern runs off the coordinate range at line {line}, column {column}")]
    CoordinateOverflow { line: usize, column: usize },

    #[error("unexpected character {ch:?} at line {line}, column {column}")]
    UnexpectedChar {
        ch: char,
        line: usize,
        column: usize,
    },

    /// The input ended after a count with no tag to apply it to.
    #[error("repeat count {count} has no tag")]
    DanglingCount { count: u64 },

    /// A named pattern placed at `(x, y)` would not fit on the `i64` plane.
    #[error("pattern {name} does not fit at ({x}, {y})")]
    PlacementOverflow { name: &'static str, x: i64, y: i64 },
}

fn is_header(line: &str) -> bool {
    line.strip_prefix('x')
        .map(|rest| rest.trim_start().starts_with('='))
        .unwrap_or(false)
}

struct Cursor {
    origin_x: i64,
    x: i64,
    y: i64,
}

impl Cursor {
    fn advance_x(&mut self, count: u64) -> Option<()> {
        let step = i64::try_from(count).ok()?;
        self.x = self.x.checked_add(step)?;
        Some(())
    }

    fn next_rows(&mut self, count: u64) -> Option<()> {
        let step = i64::try_from(count).ok()?;
        self.y = self.y.checked_add(step)?;
        self.x = self.origin_x;
        Some(())
    }
}

/// Decode `text` into a board whose first row's first column sits at
/// `(origin_x, origin_y)`. Rows grow towards increasing `y`.
pub fn decode(text: &str, origin_x: i64, origin_y: i64) -> Result<Board, PatternError> {
    let mut board = Board::new();
    let mut cursor = Cursor {
        origin_x,
        x: origin_x,
        y: origin_y,
    };
    let mut pending: Option<u64> = None;

    'lines: for (line_idx, line) in text.lines().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('#') || is_header(trimmed) {
            continue;
        }
        let line_no = line_idx + 1;

        for (col_idx, ch) in line.chars().enumerate() {
            let column = col_idx + 1;
            if ch.is_whitespace() {
                continue;
            }
            if let Some(digit) = ch.to_digit(10) {
                let count = pending
                    .unwrap_or(0)
                    .checked_mul(10)
                    .and_then(|c| c.checked_add(u64::from(digit)))
                    .ok_or(PatternError::CountOverflow {
                        line: line_no,
                        column,
                    })?;
                pending = Some(count);
                continue;
            }

            let count = pending.take().unwrap_or(1);
            let overflow = PatternError::CoordinateOverflow {
                line: line_no,
                column,
            };
            match ch {
                'o' => {
                    for _ in 0..count {
                        board.insert(Cell::new(cursor.x, cursor.y));
                        cursor.advance_x(1).ok_or(overflow.clone())?;
                    }
                }
                'b' | '.' => cursor.advance_x(count).ok_or(overflow)?,
                '$' => cursor.next_rows(count).ok_or(overflow)?,
                '!' => break 'lines,
                c if c.is_ascii_alphabetic() => {}
                other => {
                    return Err(PatternError::UnexpectedChar {
                        ch: other,
                        line: line_no,
                        column,
                    });
                }
            }
        }
    }

    if let Some(count) = pending {
        return Err(PatternError::DanglingCount { count });
    }
    Ok(board)
}
