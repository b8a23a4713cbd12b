use sparse_life::LifeError;
use sparse_life::life::{
    Board, Scheduler, advance, advance_parallel, advance_parallel_with, advance_partitions,
    candidates, partition_ranges,
};
use sparse_life::loaders::random_board_seeded;

fn random_case(side: i64, density: f64, seed: u64) -> Board {
    // Center the soup on the origin so growth crosses into negative space.
    random_board_seeded(side, side, density, seed)
        .into_iter()
        .map(|c| (c.x - side / 2, c.y - side / 2))
        .collect()
}

fn run_parity_case(side: i64, density: f64, steps: u64, seed: u64) {
    let mut board = random_case(side, density, seed);
    for step in 0..steps {
        let expected = advance(&board);
        let live = board.len();
        for workers in [1, 2, 3, live.max(1), next_prime_above(live)] {
            let got = advance_parallel(&board, workers).expect("workers >= 1");
            assert_eq!(
                got, expected,
                "mismatch for density {density} seed {seed} step {step} workers {workers}"
            );
        }
        board = expected;
    }
}

fn next_prime_above(n: usize) -> usize {
    let is_prime = |k: usize| k >= 2 && (2..).take_while(|d| d * d <= k).all(|d| k % d != 0);
    (n + 1..).find(|&k| is_prime(k)).unwrap_or(2)
}

#[test]
fn parity_sparse_mid_dense() {
    run_parity_case(48, 0.10, 4, 0xA1);
    run_parity_case(48, 0.42, 4, 0xB2);
    run_parity_case(48, 0.83, 3, 0xC3);
}

#[test]
fn parity_multiple_seeds() {
    for seed in [11u64, 22, 33, 44] {
        run_parity_case(32, 0.35, 5, seed);
    }
}

#[test]
fn empty_board_is_a_fixed_point() {
    let empty = Board::new();
    assert_eq!(advance(&empty), empty);
    for workers in [1, 2, 7] {
        assert_eq!(advance_parallel(&empty, workers).unwrap(), empty);
    }
}

#[test]
fn isolated_cell_dies() {
    let board: Board = [(5, 5)].into_iter().collect();
    assert!(advance(&board).is_empty());
    assert!(advance_parallel(&board, 3).unwrap().is_empty());
}

#[test]
fn block_is_a_still_life() {
    let block: Board = [(0, 0), (0, 1), (1, 0), (1, 1)].into_iter().collect();
    assert_eq!(advance(&block), block);
    assert_eq!(advance_parallel(&block, 4).unwrap(), block);
}

#[test]
fn blinker_has_period_two() {
    let vertical: Board = [(1, 0), (1, 1), (1, 2)].into_iter().collect();
    let horizontal: Board = [(0, 1), (1, 1), (2, 1)].into_iter().collect();
    assert_eq!(advance(&vertical), horizontal);
    assert_eq!(advance(&horizontal), vertical);
    assert_eq!(advance_parallel(&vertical, 2).unwrap(), horizontal);
    assert_eq!(advance_parallel(&horizontal, 3).unwrap(), vertical);
}

#[test]
fn next_generation_lies_inside_candidates() {
    for seed in [1u64, 2, 3] {
        let board = random_case(24, 0.4, seed);
        let set = candidates(&board);
        for cell in &advance(&board) {
            assert!(set.contains(cell), "{cell:?} escaped the candidate set");
        }
    }
}

#[test]
fn overlapping_partitions_merge_to_the_same_board() {
    let board = random_case(32, 0.4, 0x0E1A);
    let expected = advance(&board);
    let len = board.len();
    assert!(len > 8);

    let disjoint = partition_ranges(len, 4).unwrap();
    assert_eq!(advance_partitions(&board, &disjoint).unwrap(), expected);

    // Each range also claims the first index of its successor.
    let overlapping: Vec<_> = disjoint
        .iter()
        .map(|r| r.start..(r.end + 1).min(len))
        .collect();
    assert_eq!(advance_partitions(&board, &overlapping).unwrap(), expected);

    // Every range covers everything.
    let full = vec![0..len; 3];
    assert_eq!(advance_partitions(&board, &full).unwrap(), expected);
}

#[test]
fn final_partition_reaches_the_last_live_cell() {
    let board = random_case(20, 0.5, 0xF1AA);
    let expected = advance(&board);
    let len = board.len();
    for workers in [2, 3, 7, len - 1, len + 5] {
        let ranges = partition_ranges(len, workers).unwrap();
        assert_eq!(ranges.last().map(|r| r.end), Some(len), "workers={workers}");
        let assigned: usize = ranges.iter().map(|r| r.len()).sum();
        assert_eq!(assigned, len, "workers={workers}");
        assert_eq!(advance_partitions(&board, &ranges).unwrap(), expected);
    }
}

#[test]
fn schedulers_agree() {
    let board = random_case(40, 0.3, 0x5C0E);
    let expected = advance(&board);
    for workers in [1, 4, 13] {
        for scheduler in [Scheduler::Pool, Scheduler::Scoped] {
            assert_eq!(
                advance_parallel_with(&board, workers, scheduler).unwrap(),
                expected,
                "workers={workers} scheduler={scheduler:?}"
            );
        }
    }
}

#[test]
fn worker_counts_far_above_population_on_both_schedulers() {
    let blinker: Board = [(1, 0), (1, 1), (1, 2)].into_iter().collect();
    let soup = random_case(16, 0.4, 0xFA12);
    for board in [&blinker, &soup] {
        let expected = advance(board);
        for workers in [100_003, 1_000_003] {
            for scheduler in [Scheduler::Pool, Scheduler::Scoped] {
                assert_eq!(
                    advance_parallel_with(board, workers, scheduler).unwrap(),
                    expected,
                    "workers={workers} scheduler={scheduler:?}"
                );
            }
        }
    }
}

#[test]
fn zero_workers_is_rejected() {
    let board: Board = [(0, 0), (1, 0), (2, 0)].into_iter().collect();
    assert!(matches!(
        advance_parallel(&board, 0),
        Err(LifeError::ZeroWorkers)
    ));
}

#[test]
fn deterministic_across_ambient_pools() {
    let board = random_case(40, 0.3, 0xD37E_A515);
    let run = |threads: usize| {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .expect("build thread pool");
        pool.install(|| {
            let mut board = board.clone();
            for _ in 0..6 {
                board = advance_parallel(&board, 8).expect("workers >= 1");
            }
            board
        })
    };

    assert_eq!(run(1), run(4));
}
