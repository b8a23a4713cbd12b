//! Sparse, unbounded Conway's Game of Life (B3/S23) with a partitioned
//! parallel stepper.

pub mod error;
pub mod life;
pub mod loaders;
pub mod render;

pub use error::LifeError;
pub use life::{
    Board, Cell, Life, LifeConfig, Scheduler, advance, advance_parallel, advance_parallel_with,
};
