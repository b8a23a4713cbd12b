use std::num::NonZeroUsize;
use std::ops::Range;
use std::sync::OnceLock;

use super::board::{Board, Cell};
use super::candidates::candidates;
use super::partition::{
    Scheduler, WorkerScratch, active_ranges, merge_outputs, run_partitions, validate_ranges,
};
use super::rules::evaluate;
use crate::error::LifeError;

/// Boards with fewer live cells than this advance on the calling thread.
const PARALLEL_MIN_LIVE: usize = 256;
const THREADS_ENV: &str = "SPARSE_LIFE_THREADS";

static PHYSICAL_CORES: OnceLock<usize> = OnceLock::new();

/// Advance `board` by one generation on the calling thread.
///
/// This is the reference the partitioned engine is checked against.
pub fn advance(board: &Board) -> Board {
    candidates(board)
        .iter()
        .filter(|&cell| evaluate(board, cell))
        .collect()
}

/// Advance `board` by one generation, split into `worker_count` partitions
/// evaluated on the current rayon pool.
///
/// Partitions left empty because `worker_count` exceeds the population get
/// no worker and no scratch.
pub fn advance_parallel(board: &Board, worker_count: usize) -> Result<Board, LifeError> {
    advance_parallel_with(board, worker_count, Scheduler::Pool)
}

/// [`advance_parallel`] with an explicit scheduler.
pub fn advance_parallel_with(
    board: &Board,
    worker_count: usize,
    scheduler: Scheduler,
) -> Result<Board, LifeError> {
    let parts = NonZeroUsize::new(worker_count).ok_or(LifeError::ZeroWorkers)?;
    let live = board.live_cells();
    let ranges = active_ranges(live.len(), parts);
    let mut scratch = new_scratch(ranges.len());
    run_partitions(board, &live, &ranges, &mut scratch, scheduler);
    Ok(merge_outputs(&scratch))
}

fn new_scratch(workers: usize) -> Vec<WorkerScratch> {
    (0..workers).map(|_| WorkerScratch::default()).collect()
}

/// Advance `board` using caller-chosen ranges over its ordered live cells.
///
/// Ranges may overlap; the merge deduplicates. Ranges must jointly cover
/// every live cell for the result to equal [`advance`].
pub fn advance_partitions(board: &Board, ranges: &[Range<usize>]) -> Result<Board, LifeError> {
    if ranges.is_empty() {
        return Err(LifeError::ZeroWorkers);
    }
    let live = board.live_cells();
    validate_ranges(ranges, live.len())?;
    let ranges: Vec<Range<usize>> = ranges.iter().filter(|r| !r.is_empty()).cloned().collect();
    let mut scratch = new_scratch(ranges.len());
    run_partitions(board, &live, &ranges, &mut scratch, Scheduler::Pool);
    Ok(merge_outputs(&scratch))
}

#[inline]
fn physical_core_count() -> usize {
    *PHYSICAL_CORES.get_or_init(|| num_cpus::get_physical().max(1))
}

fn env_thread_count() -> Option<usize> {
    let raw = std::env::var(THREADS_ENV).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(n) if n > 0 => Some(n),
        _ => {
            tracing::warn!(value = %raw, "ignoring invalid {THREADS_ENV}");
            None
        }
    }
}

/// Resolve the thread count from a config, falling back to the environment,
/// then to the physical core count.
fn resolve_thread_count(config: &LifeConfig) -> usize {
    let mut threads = config
        .thread_count
        .or_else(env_thread_count)
        .unwrap_or_else(physical_core_count);
    if let Some(cap) = config.max_threads {
        threads = threads.min(cap);
    }
    threads.max(1)
}

/// Configuration for a [`Life`] engine instance.
///
/// Use `LifeConfig::default()` for auto-detected defaults, or customise
/// individual knobs via the builder methods.
#[derive(Clone, Debug)]
pub struct LifeConfig {
    /// Threads in the compute pool.
    /// `None` reads `SPARSE_LIFE_THREADS`, then uses the physical core count.
    pub thread_count: Option<usize>,
    /// Hard upper bound on threads regardless of detection.
    pub max_threads: Option<usize>,
    /// Partitions per step. `None` means one per pool thread.
    pub partitions: Option<usize>,
    pub scheduler: Scheduler,
    /// Boards below this population advance sequentially.
    pub parallel_min_live: usize,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            thread_count: None,
            max_threads: None,
            partitions: None,
            scheduler: Scheduler::Pool,
            parallel_min_live: PARALLEL_MIN_LIVE,
        }
    }
}

impl LifeConfig {
    /// Set an explicit thread count for the compute pool.
    pub fn thread_count(mut self, n: usize) -> Self {
        self.thread_count = Some(n.max(1));
        self
    }

    /// Set a hard upper bound on threads.
    pub fn max_threads(mut self, n: usize) -> Self {
        self.max_threads = Some(n.max(1));
        self
    }

    /// Set the number of partitions per step. Zero is rejected by
    /// [`Life::with_config`].
    pub fn partitions(mut self, n: usize) -> Self {
        self.partitions = Some(n);
        self
    }

    pub fn scheduler(mut self, scheduler: Scheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Population below which steps skip partitioning. `0` always partitions.
    pub fn parallel_min_live(mut self, n: usize) -> Self {
        self.parallel_min_live = n;
        self
    }
}

/// A board plus the machinery to keep advancing it.
pub struct Life {
    board: Board,
    generation: u64,
    pool: rayon::ThreadPool,
    partitions: NonZeroUsize,
    scheduler: Scheduler,
    parallel_min_live: usize,
    /// Per-partition scratch reused across steps, grown to the number of
    /// non-empty partitions.
    worker_scratch: Vec<WorkerScratch>,
    /// Reusable ordered live-cell buffer.
    live_scratch: Vec<Cell>,
}

impl Life {
    pub fn new() -> Result<Self, LifeError> {
        Self::with_config(LifeConfig::default())
    }

    /// Create an engine with explicit configuration.
    pub fn with_config(config: LifeConfig) -> Result<Self, LifeError> {
        let threads = resolve_thread_count(&config);
        let partitions = NonZeroUsize::new(config.partitions.unwrap_or(threads))
            .ok_or(LifeError::ZeroWorkers)?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("sparse-life-{i}"))
            .build()?;
        tracing::debug!(
            threads,
            partitions = partitions.get(),
            scheduler = ?config.scheduler,
            "life engine configured"
        );

        Ok(Self {
            board: Board::new(),
            generation: 0,
            pool,
            partitions,
            scheduler: config.scheduler,
            parallel_min_live: config.parallel_min_live,
            worker_scratch: Vec::new(),
            live_scratch: Vec::new(),
        })
    }

    pub fn from_board(board: Board, config: LifeConfig) -> Result<Self, LifeError> {
        let mut engine = Self::with_config(config)?;
        engine.board = board;
        Ok(engine)
    }

    /// Replace the current board; the generation counter is kept.
    pub fn set_board(&mut self, board: Board) {
        self.board = board;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn into_board(self) -> Board {
        self.board
    }

    pub fn set_cell(&mut self, x: i64, y: i64, alive: bool) {
        self.board.set_cell(x, y, alive);
    }

    pub fn set_cells_alive<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = (i64, i64)>,
    {
        self.board.set_cells_alive(cells);
    }

    pub fn get_cell(&self, x: i64, y: i64) -> bool {
        self.board.get_cell(x, y)
    }

    fn step_impl(&mut self) {
        let live_len = self.board.len();
        let next = if self.partitions.get() == 1 || live_len < self.parallel_min_live {
            advance(&self.board)
        } else {
            let board = &self.board;
            let live = &mut self.live_scratch;
            let scratch = &mut self.worker_scratch;
            let scheduler = self.scheduler;

            live.clear();
            live.extend(board.iter().copied());
            let ranges = active_ranges(live.len(), self.partitions);
            if scratch.len() < ranges.len() {
                scratch.resize_with(ranges.len(), WorkerScratch::default);
            }
            let scratch = &mut scratch[..ranges.len()];
            let live = live.as_slice();
            let run = |scratch: &mut [WorkerScratch]| {
                run_partitions(board, live, &ranges, scratch, scheduler)
            };
            match scheduler {
                Scheduler::Pool => self.pool.install(|| run(&mut *scratch)),
                Scheduler::Scoped => run(&mut *scratch),
            }
            merge_outputs(scratch.iter())
        };

        self.board = next;
        self.generation += 1;
        tracing::debug!(
            generation = self.generation,
            population = self.board.population(),
            previous = live_len,
            "advanced"
        );
    }

    pub fn step(&mut self) {
        self.step_impl();
    }

    pub fn step_n(&mut self, n: u64) {
        for _ in 0..n {
            self.step_impl();
        }
    }

    pub fn population(&self) -> u64 {
        self.board.population()
    }

    pub fn is_empty(&self) -> bool {
        self.board.is_empty()
    }

    pub fn bounds(&self) -> Option<(i64, i64, i64, i64)> {
        self.board.bounds()
    }

    pub fn for_each_live<F: FnMut(i64, i64)>(&self, f: F) {
        self.board.for_each_live(f);
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn partitions(&self) -> usize {
        self.partitions.get()
    }

    pub fn thread_count(&self) -> usize {
        self.pool.current_num_threads()
    }
}
