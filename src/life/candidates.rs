//! Candidate sets: the cells that may change state in the next generation.
//!
//! The backing store is an open-addressed linear-probing hash set of cells.
//! Slots are lazily cleared with an epoch stamp, so a worker can start a
//! fresh set each step without touching the full backing array.

use super::board::{Board, Cell};
use super::rules::neighbors;

const LOAD_NUM: usize = 3;
const LOAD_DEN: usize = 4;

#[derive(Clone, Copy)]
struct Slot {
    cell: Cell,
    stamp: u32,
}

impl Slot {
    const EMPTY: Self = Self {
        cell: Cell::new(0, 0),
        stamp: 0,
    };
}

#[inline(always)]
fn cell_hash(cell: Cell) -> u64 {
    const MX: u64 = 0x517c_c1b7_2722_0a95;
    const MY: u64 = 0x6c62_272e_07bb_0142;
    let hx = (cell.x as u64).wrapping_mul(MX);
    let hy = (cell.y as u64).wrapping_mul(MY);
    hx ^ hy.rotate_right(32)
}

#[inline]
fn slots_for(keys: usize) -> usize {
    keys.saturating_mul(LOAD_DEN)
        .div_ceil(LOAD_NUM)
        .next_power_of_two()
        .max(16)
}

pub struct CandidateSet {
    slots: Vec<Slot>,
    mask: usize,
    stamp: u32,
    len: usize,
}

impl Default for CandidateSet {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(cap: usize) -> Self {
        let slots = slots_for(cap);
        Self {
            slots: vec![Slot::EMPTY; slots],
            mask: slots - 1,
            stamp: 1,
            len: 0,
        }
    }

    /// Forget every member in O(1).
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
        self.stamp = self.stamp.wrapping_add(1);
        if self.stamp == 0 {
            self.stamp = 1;
            for slot in &mut self.slots {
                slot.stamp = 0;
            }
        }
    }

    #[inline]
    pub fn reserve_for(&mut self, keys: usize) {
        if keys == 0 {
            return;
        }
        let needed = slots_for(keys);
        if needed > self.slots.len() {
            self.resize(needed);
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    fn needs_grow(&self) -> bool {
        (self.len + 1) * LOAD_DEN >= self.slots.len() * LOAD_NUM
    }

    fn resize(&mut self, new_slots: usize) {
        debug_assert!(new_slots.is_power_of_two());
        let old_slots = std::mem::replace(&mut self.slots, vec![Slot::EMPTY; new_slots]);
        self.mask = new_slots - 1;
        self.len = 0;

        for slot in old_slots {
            if slot.stamp == self.stamp {
                self.insert_rehash(slot.cell);
            }
        }
    }

    #[inline(always)]
    fn insert_rehash(&mut self, cell: Cell) {
        let mask = self.mask;
        let mut pos = cell_hash(cell) as usize & mask;
        loop {
            let slot = &mut self.slots[pos];
            if slot.stamp != self.stamp {
                *slot = Slot {
                    cell,
                    stamp: self.stamp,
                };
                self.len += 1;
                return;
            }
            pos = (pos + 1) & mask;
        }
    }

    /// Insert a cell.
    /// Returns `true` if newly inserted, `false` if it already existed.
    #[inline]
    pub fn insert(&mut self, cell: Cell) -> bool {
        if self.needs_grow() {
            self.resize((self.slots.len() * 2).max(16));
        }

        let mask = self.mask;
        let mut pos = cell_hash(cell) as usize & mask;
        loop {
            let slot = &mut self.slots[pos];
            if slot.stamp != self.stamp {
                *slot = Slot {
                    cell,
                    stamp: self.stamp,
                };
                self.len += 1;
                return true;
            }
            if slot.cell == cell {
                return false;
            }
            pos = (pos + 1) & mask;
        }
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        let mask = self.mask;
        let mut pos = cell_hash(*cell) as usize & mask;
        loop {
            let slot = &self.slots[pos];
            if slot.stamp != self.stamp {
                return false;
            }
            if slot.cell == *cell {
                return true;
            }
            pos = (pos + 1) & mask;
        }
    }

    /// Members in slot order, which is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        let stamp = self.stamp;
        self.slots
            .iter()
            .filter(move |slot| slot.stamp == stamp)
            .map(|slot| slot.cell)
    }

    /// Add every cell of `live` together with its Moore neighborhood.
    pub fn extend_with_neighborhoods<I>(&mut self, live: I)
    where
        I: IntoIterator<Item = Cell>,
    {
        for cell in live {
            self.insert(cell);
            for n in neighbors(cell) {
                self.insert(n);
            }
        }
    }
}

/// `board ∪ neighbors(board)`: every cell that can be alive next generation.
pub fn candidates(board: &Board) -> CandidateSet {
    let mut set = CandidateSet::with_capacity(board.len().saturating_mul(9));
    set.extend_with_neighborhoods(board.iter().copied());
    set
}

/// Local candidate set for one partition's slice of live cells.
pub fn candidates_of(slice: &[Cell]) -> CandidateSet {
    let mut set = CandidateSet::with_capacity(slice.len().saturating_mul(9));
    set.extend_with_neighborhoods(slice.iter().copied());
    set
}
