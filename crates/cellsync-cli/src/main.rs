//! Command-line front end for the cellsync solver.
//!
//! Loads a puzzle file, solves it with the actor engine and prints the
//! resulting grid. The exit status is 0 when the puzzle is solved, 2 when the
//! deductions stall, and 1 on any error.

use std::{path::PathBuf, process::ExitCode, time::Duration};

use cellsync_core::{LoadError, load_puzzle};
use cellsync_engine::{
    Engine, EngineConfig, Outcome, SolveReport, SolverError,
    deduction::{self, BoxedDeduction},
};
use clap::{Parser, ValueEnum};
use log::info;

mod render;

/// Solves a Sudoku puzzle with one concurrent actor per cell.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Puzzle file: nine lines of `d,d,d;d,d,d;d,d,d;` with 0 for blanks.
    puzzle: PathBuf,

    /// Deductions to run on each house.
    #[arg(long, value_enum, default_value_t = Rules::All)]
    rules: Rules,

    /// Maximum number of requests staged in one round.
    #[arg(long, default_value_t = EngineConfig::DEFAULT_RELAY_CAPACITY)]
    relay_capacity: usize,

    /// Capacity of each cell actor's inbox.
    #[arg(long, default_value_t = EngineConfig::DEFAULT_INBOX_CAPACITY)]
    inbox_capacity: usize,

    /// How long to wait for a barrier before giving up, in milliseconds.
    #[arg(long, default_value_t = 30_000)]
    barrier_timeout_ms: u64,

    /// Output layout for the grid.
    #[arg(long, value_enum, default_value_t = Format::Boxed)]
    format: Format,

    /// Print round and deduction statistics after the grid.
    #[arg(long)]
    stats: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Rules {
    /// Hidden singles, locked candidates, pairs and triples.
    All,
    /// Hidden singles and locked candidates.
    Basic,
    /// Hidden singles only.
    Singles,
}

impl Rules {
    fn deductions(self) -> Vec<BoxedDeduction> {
        match self {
            Self::All => deduction::all_deductions(),
            Self::Basic => deduction::basic_deductions(),
            Self::Singles => deduction::fundamental_deductions(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Grid drawn with box borders.
    Boxed,
    /// All 81 cells on one line.
    Compact,
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
enum CliError {
    #[display("{_0}")]
    #[from]
    Load(LoadError),
    #[display("{_0}")]
    #[from]
    Solve(SolverError),
}

impl Args {
    fn config(&self) -> EngineConfig {
        EngineConfig::default()
            .with_deductions(self.rules.deductions())
            .with_relay_capacity(self.relay_capacity)
            .with_inbox_capacity(self.inbox_capacity)
            .with_barrier_timeout(Duration::from_millis(self.barrier_timeout_ms))
    }
}

fn run(args: &Args) -> Result<SolveReport, CliError> {
    let puzzle = load_puzzle(&args.puzzle)?;
    info!(
        "loaded {} with {} givens",
        args.puzzle.display(),
        puzzle.filled_count()
    );
    let report = Engine::new(args.config()).solve(&puzzle)?;
    Ok(report)
}

fn print_stats(report: &SolveReport) {
    let stats = &report.stats;
    println!("rounds: {}", stats.total_rounds());
    for round in stats.rounds() {
        println!(
            "  round {:>3}: delivered {:>4}, staged {:>4} ({} by finalization, {} by analysis), finalized {:>2}",
            round.round,
            round.delivered,
            round.staged(),
            round.staged_by_finalization,
            round.staged_by_analysis,
            round.finalized
        );
    }
    println!("requests by deduction:");
    for (name, count) in stats.applications() {
        println!("  {name:<18} {count}");
    }
}

fn main() -> ExitCode {
    better_panic::install();
    env_logger::init();

    let args = Args::parse();
    let report = match run(&args) {
        Ok(report) => report,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let grid = report.grid();
    match args.format {
        Format::Boxed => print!("{}", render::boxed(&grid)),
        Format::Compact => print!("{}", render::compact(&grid)),
    }
    if args.stats {
        print_stats(&report);
    }

    match report.outcome {
        Outcome::Solved => ExitCode::SUCCESS,
        Outcome::Stalled => {
            eprintln!(
                "stalled: {} of 81 cells finalized after {} rounds",
                report.board.finalized_count(),
                report.stats.total_rounds()
            );
            ExitCode::from(2)
        }
    }
}
