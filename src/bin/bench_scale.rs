use std::time::Instant;

use sparse_life::life::{Board, Life, LifeConfig, advance};
use sparse_life::loaders::random_board_seeded;

const SEED: u64 = 0x5EED_1234_ABCD_EF01;
const DENSITY: f64 = 0.42;

fn bench_sequential(size: i64, iterations: u64) -> (f64, Board) {
    let mut board = random_board_seeded(size, size, DENSITY, SEED);

    let start = Instant::now();
    for _ in 0..iterations {
        board = advance(&board);
    }
    let duration = start.elapsed();

    (duration.as_secs_f64() * 1000.0, board)
}

fn bench_partitioned(size: i64, iterations: u64, partitions: usize) -> (f64, Board) {
    let board = random_board_seeded(size, size, DENSITY, SEED);
    let config = LifeConfig::default()
        .partitions(partitions)
        .parallel_min_live(0);
    let mut engine = match Life::from_board(board, config) {
        Ok(engine) => engine,
        Err(err) => {
            eprintln!("failed to start engine: {err}");
            std::process::exit(1);
        }
    };

    let start = Instant::now();
    engine.step_n(iterations);
    let duration = start.elapsed();

    (duration.as_secs_f64() * 1000.0, engine.into_board())
}

fn main() {
    let threads = num_cpus::get_physical().max(1);
    let scales: &[(i64, u64)] = &[
        (64, 200),
        (256, 100), // ~27k live cells at seed time
        (512, 50),
        (1024, 20), // ~440k
    ];

    println!(
        "{:<10} {:>8} {:>12} {:>14} {:>14} {:>8}",
        "Grid", "Iters", "Partitions", "Seq(ms/gen)", "Par(ms/gen)", "Pop"
    );
    println!("{}", "-".repeat(72));

    for &(size, iters) in scales {
        let (seq_ms, seq_board) = bench_sequential(size, iters);
        let (par_ms, par_board) = bench_partitioned(size, iters, threads);
        let status = if seq_board == par_board { "" } else { " MISMATCH" };
        println!(
            "{:<10} {:>8} {:>12} {:>14.4} {:>14.4} {:>8}{status}",
            format!("{}x{}", size, size),
            iters,
            threads,
            seq_ms / iters as f64,
            par_ms / iters as f64,
            par_board.population()
        );
    }
}
