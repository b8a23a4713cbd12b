//! Error types for the advance engines.

use thiserror::Error;

/// Errors raised by the partitioned engine and engine construction.
///
/// Pattern decoding has its own error type in [`crate::loaders::rle`] and is
/// never folded into this one.
#[derive(Debug, Error)]
pub enum LifeError {
    /// A partitioned advance was asked to use zero workers.
    #[error("worker count must be at least 1")]
    ZeroWorkers,

    /// A caller-supplied partition range does not fit the live-cell sequence.
    #[error("partition {start}..{end} is out of bounds for {len} live cells")]
    PartitionOutOfBounds {
        /// Range start.
        start: usize,
        /// Range end (exclusive).
        end: usize,
        /// Number of live cells.
        len: usize,
    },

    /// The compute thread pool could not be started.
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
