//! graft CLI - run a Graft turtle-graphics program and print its stroke
//! batches.
//!
//! Reads a `.graft` source file (or stdin with `-`), parses it, and
//! drives the scheduler for some number of ticks, printing the strokes
//! it produces one JSON line per batch.

mod config;
mod error;

use std::cell::RefCell;
use std::io::Read;
use std::path::PathBuf;

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::Config;
use error::{CliError, Result};

/// Run a Graft program and print the strokes it draws.
#[derive(Parser, Debug)]
#[command(name = "graft")]
#[command(author = "Graft Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Run a Graft turtle-graphics program", long_about = None)]
struct Cli {
    /// Path to a `.graft` source file, or `-` to read from stdin.
    program: PathBuf,

    /// Number of non-empty stroke batches to produce.
    #[arg(short = 'n', long)]
    ticks: Option<usize>,

    /// Maximum number of live turtles at any one time.
    #[arg(long)]
    max_forks: Option<usize>,

    /// Print every raw scheduler tick (including empty ones) instead of
    /// the filtered stroke-batch stream.
    #[arg(long)]
    debug: bool,

    /// Seed the random number generator for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,

    /// Path to a configuration file (default search: `./graft.toml`,
    /// then the user config directory).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };

    let ticks = cli.ticks.unwrap_or(config.ticks);
    let max_forks = cli.max_forks.unwrap_or(config.max_forks);

    let source = read_program(&cli.program)?;
    let ast = graft_par::parse(&source)?;

    let rng = RefCell::new(match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    });
    let rand_fn = |lo: i64, hi: i64| rng.borrow_mut().gen_range(lo..=hi);

    if cli.debug {
        for tick in graft_eval::graftrun_debug(ast, ticks, &rand_fn, max_forks) {
            let entries = tick?;
            for (strokes, bindings) in &entries {
                println!("{strokes:?}\t{bindings:?}");
            }
        }
    } else {
        for batch in graft_eval::graftrun(ast, ticks, &rand_fn, max_forks) {
            let strokes = batch?;
            let line = serde_json::to_string(&strokes).map_err(|e| CliError::Config(e.to_string()))?;
            println!("{line}");
        }
    }

    Ok(())
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_env("GRAFT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let subscriber = fmt::layer().with_target(false).with_thread_ids(false).with_thread_names(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(subscriber)
        .try_init()
        .map_err(|e| CliError::Config(format!("failed to initialize logging: {e}")))?;

    Ok(())
}

fn read_program(path: &std::path::Path) -> Result<String> {
    if path == std::path::Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| CliError::ProgramRead("<stdin>".to_string(), e))?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).map_err(|e| CliError::ProgramRead(path.display().to_string(), e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_positional_program_and_defaults() {
        let cli = Cli::parse_from(["graft", "walk.graft"]);
        assert_eq!(cli.program, PathBuf::from("walk.graft"));
        assert_eq!(cli.ticks, None);
        assert!(!cli.debug);
    }

    #[test]
    fn cli_parses_ticks_max_forks_seed_debug() {
        let cli = Cli::parse_from(["graft", "walk.graft", "-n", "5", "--max-forks", "2", "--seed", "7", "--debug"]);
        assert_eq!(cli.ticks, Some(5));
        assert_eq!(cli.max_forks, Some(2));
        assert_eq!(cli.seed, Some(7));
        assert!(cli.debug);
    }

    #[test]
    fn cli_accepts_stdin_marker() {
        let cli = Cli::parse_from(["graft", "-"]);
        assert_eq!(cli.program, PathBuf::from("-"));
    }
}
