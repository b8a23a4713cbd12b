//! Sparse Game of Life engines: the sequential reference, the partitioned
//! parallel stepper, and the stateful [`Life`] driver.

mod board;
mod candidates;
mod engine;
mod partition;
mod rules;

pub use board::{Board, Cell};
pub use candidates::{CandidateSet, candidates, candidates_of};
pub use engine::{
    Life, LifeConfig, advance, advance_parallel, advance_parallel_with, advance_partitions,
};
pub use partition::{Scheduler, partition_ranges};
pub use rules::{NEIGHBOR_OFFSETS, evaluate, live_neighbors, neighbors, next_state};
