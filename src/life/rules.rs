//! Moore neighborhood and the B3/S23 transition rule.

use super::board::{Board, Cell};

/// Offsets of the 8 cells at Chebyshev distance 1.
pub const NEIGHBOR_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Indexed by `[alive as usize][live_neighbors]`.
const RULE_TABLE: [[bool; 9]; 2] = build_rule_table();

const fn build_rule_table() -> [[bool; 9]; 2] {
    let mut table = [[false; 9]; 2];
    // Birth on 3.
    table[0][3] = true;
    // Survival on 2 or 3.
    table[1][2] = true;
    table[1][3] = true;
    table
}

/// The Moore neighborhood of `cell`.
///
/// Yields 8 cells everywhere except on the outermost rows and columns of the
/// `i64` plane, where neighbors that would wrap are omitted. Callers
/// deduplicate; nothing here consults a board.
#[inline]
pub fn neighbors(cell: Cell) -> impl Iterator<Item = Cell> {
    NEIGHBOR_OFFSETS
        .into_iter()
        .filter_map(move |(dx, dy)| cell.offset(dx, dy))
}

/// Number of live neighbors of `cell` in `board`.
#[inline]
pub fn live_neighbors(board: &Board, cell: Cell) -> u8 {
    neighbors(cell).filter(|n| board.contains(n)).count() as u8
}

/// B3/S23: survive on 2 or 3, be born on 3, die otherwise.
#[inline(always)]
pub fn next_state(is_alive: bool, live_neighbors: u8) -> bool {
    RULE_TABLE[is_alive as usize]
        .get(live_neighbors as usize)
        .copied()
        .unwrap_or(false)
}

/// Whether `cell` is alive in the generation after `board`.
#[inline]
pub fn evaluate(board: &Board, cell: Cell) -> bool {
    next_state(board.contains(&cell), live_neighbors(board, cell))
}
