//! veritb CLI: the run selection surface for the adder verification harness.
//!
//! Provides `veritb run` to execute the directed or randomized test against a
//! DUT model and print the scoreboard summary, and `veritb list` to show what
//! can be selected.

#![warn(missing_docs)]

mod list;
mod run;
mod setup;

use std::process;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use veritb_config::{CaptureMode, DutModel, TestKind};

/// veritb: a self-checking, transaction-level adder testbench.
#[derive(Parser, Debug)]
#[command(name = "veritb", version, about = "Self-checking adder verification harness")]
pub struct Cli {
    /// Suppress all output except errors and the verdict.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `veritb.toml` file, or a directory containing one.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a test and report the scoreboard verdict.
    Run(RunArgs),
    /// List the selectable tests and DUT models.
    List,
}

/// Arguments for the `veritb run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Test to run (`directed` or `random`, or the full test name).
    #[arg(short, long)]
    pub test: Option<TestKind>,

    /// DUT model to bind.
    #[arg(long)]
    pub dut: Option<DutModel>,

    /// Operand width in bits.
    #[arg(long)]
    pub width: Option<u32>,

    /// Clock frequency (e.g., "100MHz").
    #[arg(long)]
    pub frequency: Option<String>,

    /// Number of random transactions.
    #[arg(short = 'n', long)]
    pub count: Option<usize>,

    /// Seed for the random sequence.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Monitor capture window.
    #[arg(long)]
    pub capture: Option<CaptureMode>,

    /// Fail the run if it has not finished after this many clock cycles.
    #[arg(long)]
    pub watchdog: Option<u64>,

    /// Output format for the report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Print every published transaction.
    #[arg(long)]
    pub dump: bool,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Report output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Number of `-v` flags given.
    pub verbose: u8,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => atty_is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    setup::init_logging(&global);

    let result = match cli.command {
        Command::Run(ref args) => run::run(args, &global),
        Command::List => list::run(&global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Rough terminal detection from the `TERM` variable.
fn atty_is_terminal() -> bool {
    std::env::var("TERM").is_ok_and(|term| term != "dumb")
}
