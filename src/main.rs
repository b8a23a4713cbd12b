#[cfg(feature = "mimalloc-global")]
#[global_allocator]
static GLOBAL_ALLOCATOR: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use sparse_life::life::{Board, Life, LifeConfig, Scheduler, advance};
use sparse_life::loaders::{Pattern, decode, random_board_seeded};
use sparse_life::render::{Viewport, render_ansi};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_SOUP_SIDE: i64 = 256;
const DEFAULT_DENSITY: f64 = 0.5;
const DEFAULT_SEED: u64 = 0x5EED_1234_ABCD_EF01;
const DEFAULT_GENERATIONS: u64 = 100;
const USAGE: &str = "usage: sparse-life [--threads N] [--partitions N] [--scheduler pool|scoped] \
[--generations N] [--rle FILE | --pattern NAME | --soup SIDE] [--density F] [--seed N] \
[--render] [--delay-ms N] [--check]";

enum Source {
    Rle(PathBuf),
    Pattern(String),
    Soup(i64),
}

struct MainArgs {
    config: LifeConfig,
    source: Source,
    density: f64,
    seed: u64,
    generations: u64,
    render: bool,
    delay: Duration,
    check: bool,
}

fn parse_value<T>(args: &[String], i: usize, flag: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = args
        .get(i)
        .with_context(|| format!("{flag} requires a value"))?;
    raw.parse::<T>()
        .with_context(|| format!("invalid value for {flag}: {raw}"))
}

fn parse_args() -> anyhow::Result<MainArgs> {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = MainArgs {
        config: LifeConfig::default(),
        source: Source::Soup(DEFAULT_SOUP_SIDE),
        density: DEFAULT_DENSITY,
        seed: DEFAULT_SEED,
        generations: DEFAULT_GENERATIONS,
        render: false,
        delay: Duration::ZERO,
        check: false,
    };
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--threads" => {
                i += 1;
                parsed.config = parsed.config.thread_count(parse_value(&args, i, "--threads")?);
            }
            "--partitions" => {
                i += 1;
                parsed.config = parsed
                    .config
                    .partitions(parse_value(&args, i, "--partitions")?);
            }
            "--scheduler" => {
                i += 1;
                let raw: String = parse_value(&args, i, "--scheduler")?;
                let scheduler = match raw.to_ascii_lowercase().as_str() {
                    "pool" => Scheduler::Pool,
                    "scoped" => Scheduler::Scoped,
                    other => bail!("unknown scheduler: {other} (expected pool or scoped)"),
                };
                parsed.config = parsed.config.scheduler(scheduler);
            }
            "--generations" => {
                i += 1;
                parsed.generations = parse_value(&args, i, "--generations")?;
            }
            "--rle" => {
                i += 1;
                parsed.source = Source::Rle(parse_value(&args, i, "--rle")?);
            }
            "--pattern" => {
                i += 1;
                parsed.source = Source::Pattern(parse_value(&args, i, "--pattern")?);
            }
            "--soup" => {
                i += 1;
                parsed.source = Source::Soup(parse_value(&args, i, "--soup")?);
            }
            "--density" => {
                i += 1;
                parsed.density = parse_value(&args, i, "--density")?;
            }
            "--seed" => {
                i += 1;
                parsed.seed = parse_value(&args, i, "--seed")?;
            }
            "--render" => parsed.render = true,
            "--delay-ms" => {
                i += 1;
                parsed.delay = Duration::from_millis(parse_value(&args, i, "--delay-ms")?);
            }
            "--check" => parsed.check = true,
            "--help" | "-h" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            other => bail!("unknown argument: {other}\n{USAGE}"),
        }
        i += 1;
    }
    Ok(parsed)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn load_board(args: &MainArgs) -> anyhow::Result<Board> {
    match &args.source {
        Source::Rle(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            decode(&text, 0, 0).with_context(|| format!("failed to decode {}", path.display()))
        }
        Source::Pattern(name) => {
            let pattern =
                Pattern::by_name(name).with_context(|| format!("unknown pattern: {name}"))?;
            pattern
                .to_board(0, 0)
                .with_context(|| format!("failed to place pattern {name}"))
        }
        Source::Soup(side) => Ok(random_board_seeded(*side, *side, args.density, args.seed)),
    }
}

fn run(args: MainArgs) -> anyhow::Result<()> {
    let board = load_board(&args)?;
    let viewport = Viewport::fit(&board).unwrap_or(Viewport::new(0, 0, 80, 24));
    tracing::info!(population = board.population(), "initial board loaded");

    let mut reference = args.check.then(|| board.clone());
    let mut engine = Life::from_board(board, args.config)?;
    tracing::info!(
        threads = engine.thread_count(),
        partitions = engine.partitions(),
        "engine ready"
    );

    let mut engine_total = Duration::ZERO;
    let mut reference_total = Duration::ZERO;
    let mut mismatches = 0u64;

    for _ in 0..args.generations {
        let start = Instant::now();
        engine.step();
        engine_total += start.elapsed();

        if let Some(reference) = reference.as_mut() {
            let start = Instant::now();
            *reference = advance(reference);
            reference_total += start.elapsed();
            if *reference != *engine.board() {
                mismatches += 1;
                tracing::error!(generation = engine.generation(), "partitioned result diverged");
            }
        }

        if args.render {
            print!("{}", render_ansi(engine.board(), viewport));
            println!(
                "generation {} population {}",
                engine.generation(),
                engine.population()
            );
        }
        if !args.delay.is_zero() {
            std::thread::sleep(args.delay);
        }
    }

    let generations = args.generations.max(1) as f64;
    let engine_ms = engine_total.as_secs_f64() * 1000.0;
    println!(
        "Generation {}: population = {}",
        engine.generation(),
        engine.population()
    );
    println!(
        "  Engine: {engine_ms:.3} ms total, {:.6} ms/gen",
        engine_ms / generations
    );
    if reference.is_some() {
        let reference_ms = reference_total.as_secs_f64() * 1000.0;
        let status = if mismatches == 0 { "MATCH" } else { "MISMATCH" };
        println!(
            "  Sequential: {reference_ms:.3} ms total, {:.6} ms/gen [{status}]",
            reference_ms / generations
        );
        if mismatches > 0 {
            bail!("{mismatches} generations diverged from the sequential engine");
        }
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = parse_args()?;
    run(args)
}
