//! Index-range partitioning, per-worker evaluation and the merge step.
//!
//! Workers read the shared board and write only to their own
//! [`WorkerScratch`]. The merge runs after every worker has joined, so no
//! lock is taken per output cell.

use std::num::NonZeroUsize;
use std::ops::Range;
use std::sync::OnceLock;

use rayon::prelude::*;

use super::board::{Board, Cell};
use super::candidates::CandidateSet;
use super::rules::evaluate;
use crate::error::LifeError;

static LOGICAL_CORES: OnceLock<usize> = OnceLock::new();

/// How the workers of one step are run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Scheduler {
    /// Rayon work-stealing pool (the ambient pool, or the engine's own).
    #[default]
    Pool,
    /// Fresh OS threads each step, at most one per logical core, each
    /// owning a contiguous run of partitions. Joined before the merge.
    Scoped,
}

/// Split `[0, len)` into `parts` contiguous ranges of `len / parts` cells.
///
/// The final range always ends at `len` and absorbs the remainder. When
/// `parts > len` the leading ranges are empty.
pub fn partition_ranges(len: usize, parts: usize) -> Result<Vec<Range<usize>>, LifeError> {
    let parts = NonZeroUsize::new(parts).ok_or(LifeError::ZeroWorkers)?;
    Ok(split_ranges(len, parts))
}

pub(crate) fn split_ranges(len: usize, parts: NonZeroUsize) -> Vec<Range<usize>> {
    let parts = parts.get();
    let base = len / parts;
    let mut ranges = Vec::with_capacity(parts);
    for i in 0..parts {
        let start = i * base;
        let end = if i + 1 == parts { len } else { start + base };
        ranges.push(start..end);
    }
    ranges
}

/// The non-empty ranges of [`split_ranges`].
///
/// With more parts than cells every range but the last is empty, so this is
/// never longer than `len`.
pub(crate) fn active_ranges(len: usize, parts: NonZeroUsize) -> Vec<Range<usize>> {
    if len == 0 {
        Vec::new()
    } else if parts.get() > len {
        vec![0..len]
    } else {
        split_ranges(len, parts)
    }
}

/// Private state owned by one worker for the duration of a step.
#[repr(align(64))]
pub struct WorkerScratch {
    candidates: CandidateSet,
    output: Vec<Cell>,
}

impl Default for WorkerScratch {
    fn default() -> Self {
        Self {
            candidates: CandidateSet::with_capacity(0),
            output: Vec::new(),
        }
    }
}

impl WorkerScratch {
    #[inline]
    fn clear(&mut self) {
        self.candidates.clear();
        self.output.clear();
    }

    /// Cells this worker found alive in the next generation.
    pub fn output(&self) -> &[Cell] {
        &self.output
    }
}

/// Evaluate one partition: build the slice's local candidate set, then apply
/// the rule to each candidate against the full, unmodified `board`.
pub fn evaluate_partition(board: &Board, slice: &[Cell], scratch: &mut WorkerScratch) {
    scratch.clear();
    scratch.candidates.reserve_for(slice.len().saturating_mul(9));
    scratch
        .candidates
        .extend_with_neighborhoods(slice.iter().copied());

    let WorkerScratch { candidates, output } = scratch;
    output.extend(candidates.iter().filter(|&cell| evaluate(board, cell)));
    tracing::trace!(
        live = slice.len(),
        candidates = candidates.len(),
        output = output.len(),
        "partition evaluated"
    );
}

/// Union every worker's output into a fresh board.
///
/// Overlapping partitions compute identical outcomes for shared cells, so
/// set insertion deduplicates them.
pub fn merge_outputs<'a, I>(outputs: I) -> Board
where
    I: IntoIterator<Item = &'a WorkerScratch>,
{
    outputs
        .into_iter()
        .flat_map(|scratch| scratch.output().iter().copied())
        .collect()
}

/// Check that every range indexes into a sequence of `len` cells.
pub fn validate_ranges(ranges: &[Range<usize>], len: usize) -> Result<(), LifeError> {
    for range in ranges {
        if range.start > range.end || range.end > len {
            return Err(LifeError::PartitionOutOfBounds {
                start: range.start,
                end: range.end,
                len,
            });
        }
    }
    Ok(())
}

/// Run every partition on `scheduler` and block until all have finished.
///
/// `scratch` must hold at least `ranges.len()` entries; entry `i` is owned by
/// the worker for `ranges[i]`.
pub fn run_partitions(
    board: &Board,
    live: &[Cell],
    ranges: &[Range<usize>],
    scratch: &mut [WorkerScratch],
    scheduler: Scheduler,
) {
    debug_assert!(scratch.len() >= ranges.len());
    let scratch = &mut scratch[..ranges.len()];

    match scheduler {
        Scheduler::Pool => {
            scratch
                .par_iter_mut()
                .zip(ranges.par_iter())
                .for_each(|(worker, range)| {
                    evaluate_partition(board, &live[range.clone()], worker);
                });
        }
        Scheduler::Scoped => {
            let cores = *LOGICAL_CORES.get_or_init(|| num_cpus::get().max(1));
            let per_thread = ranges.len().div_ceil(cores).max(1);
            std::thread::scope(|s| {
                let handles: Vec<_> = scratch
                    .chunks_mut(per_thread)
                    .zip(ranges.chunks(per_thread))
                    .map(|(workers, ranges)| {
                        s.spawn(move || {
                            for (worker, range) in workers.iter_mut().zip(ranges) {
                                evaluate_partition(board, &live[range.clone()], worker);
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    if let Err(panic) = handle.join() {
                        std::panic::resume_unwind(panic);
                    }
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroUsize;

    use super::{
        Scheduler, WorkerScratch, active_ranges, evaluate_partition, merge_outputs,
        partition_ranges, run_partitions, split_ranges, validate_ranges,
    };
    use crate::error::LifeError;
    use crate::life::board::{Board, Cell};

    fn covered_once(ranges: &[std::ops::Range<usize>], len: usize) -> bool {
        let mut hits = vec![0u32; len];
        for range in ranges {
            for i in range.clone() {
                hits[i] += 1;
            }
        }
        hits.iter().all(|&h| h == 1)
    }

    #[test]
    fn ranges_cover_every_index_exactly_once() {
        for len in [0usize, 1, 2, 7, 10, 64, 101] {
            for parts in 1..=13 {
                let ranges = partition_ranges(len, parts).unwrap();
                assert_eq!(ranges.len(), parts);
                assert!(covered_once(&ranges, len), "len={len} parts={parts}");
                assert_eq!(ranges.last().unwrap().end, len);
            }
        }
    }

    #[test]
    fn last_range_absorbs_remainder() {
        let ranges = partition_ranges(10, 4).unwrap();
        assert_eq!(ranges, vec![0..2, 2..4, 4..6, 6..10]);
    }

    #[test]
    fn more_parts_than_cells_leaves_leading_ranges_empty() {
        let ranges = partition_ranges(3, 5).unwrap();
        assert_eq!(ranges, vec![0..0, 0..0, 0..0, 0..0, 0..3]);
    }

    #[test]
    fn active_ranges_are_the_non_empty_split() {
        for len in [0usize, 1, 3, 10, 64] {
            for parts in [1usize, 2, 3, 9, 10, 11, 100_003] {
                let parts = NonZeroUsize::new(parts).unwrap();
                let expected: Vec<_> = split_ranges(len, parts)
                    .into_iter()
                    .filter(|r| !r.is_empty())
                    .collect();
                let active = active_ranges(len, parts);
                assert_eq!(active, expected, "len={len} parts={parts}");
                assert!(active.len() <= len);
            }
        }
    }

    #[test]
    fn zero_parts_is_rejected() {
        assert!(matches!(partition_ranges(5, 0), Err(LifeError::ZeroWorkers)));
    }

    #[test]
    fn validate_rejects_ranges_past_the_end() {
        assert!(validate_ranges(&[0..2, 2..3], 3).is_ok());
        assert!(matches!(
            validate_ranges(&[0..4], 3),
            Err(LifeError::PartitionOutOfBounds { start: 0, end: 4, len: 3 })
        ));
    }

    #[test]
    fn worker_scratch_is_cacheline_aligned() {
        assert_eq!(std::mem::align_of::<WorkerScratch>(), 64);
    }

    #[test]
    fn scratch_is_reset_between_evaluations() {
        let board: Board = [(0, 0), (1, 0), (2, 0)].into_iter().collect();
        let live = board.live_cells();
        let mut scratch = WorkerScratch::default();
        evaluate_partition(&board, &live, &mut scratch);
        let first: Board = scratch.output().iter().copied().collect();
        evaluate_partition(&board, &live, &mut scratch);
        let second: Board = scratch.output().iter().copied().collect();
        assert_eq!(first, second);
        assert_eq!(first.population(), 3);
    }

    #[test]
    fn empty_slice_contributes_nothing() {
        let board: Board = [(0, 0), (1, 0), (2, 0)].into_iter().collect();
        let mut scratch = WorkerScratch::default();
        evaluate_partition(&board, &[], &mut scratch);
        assert!(scratch.output().is_empty());
    }

    #[test]
    fn schedulers_produce_identical_merges() {
        let board: Board = [(0, 0), (1, 0), (2, 0), (10, 10), (10, 11), (11, 10), (11, 11)]
            .into_iter()
            .collect();
        let live = board.live_cells();
        let ranges = partition_ranges(live.len(), 3).unwrap();

        let mut pool_scratch: Vec<WorkerScratch> =
            (0..3).map(|_| WorkerScratch::default()).collect();
        run_partitions(&board, &live, &ranges, &mut pool_scratch, Scheduler::Pool);

        let mut scoped_scratch: Vec<WorkerScratch> =
            (0..3).map(|_| WorkerScratch::default()).collect();
        run_partitions(&board, &live, &ranges, &mut scoped_scratch, Scheduler::Scoped);

        let pooled = merge_outputs(&pool_scratch);
        let scoped = merge_outputs(&scoped_scratch);
        assert_eq!(pooled, scoped);
        assert!(pooled.contains(&Cell::new(1, -1)));
        assert!(pooled.contains(&Cell::new(10, 10)));
    }

    #[test]
    fn scoped_runs_more_partitions_than_threads() {
        let board: Board = [(0, 0), (1, 0), (2, 0)].into_iter().collect();
        let live = board.live_cells();
        // Every range covers the whole board; thousands of them must share a
        // handful of threads.
        let ranges = vec![0..live.len(); 4_096];
        let mut scratch: Vec<WorkerScratch> =
            (0..ranges.len()).map(|_| WorkerScratch::default()).collect();
        run_partitions(&board, &live, &ranges, &mut scratch, Scheduler::Scoped);

        let expected: Board = [(1, -1), (1, 0), (1, 1)].into_iter().collect();
        assert_eq!(merge_outputs(&scratch), expected);
        assert!(scratch.iter().all(|w| w.output().len() == 3));
    }

    #[test]
    fn empty_range_clears_stale_output() {
        let board: Board = [(0, 0), (1, 0), (2, 0)].into_iter().collect();
        let live = board.live_cells();
        let mut scratch = vec![WorkerScratch::default()];
        run_partitions(&board, &live, &[0..3], &mut scratch, Scheduler::Pool);
        assert_eq!(scratch[0].output().len(), 3);
        run_partitions(&board, &live, &[0..0], &mut scratch, Scheduler::Scoped);
        assert!(scratch[0].output().is_empty());
    }
}
