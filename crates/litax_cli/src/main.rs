//! litax CLI: runs the SPI ADC readout bench and writes its waveform.
//!
//! Provides `litax run` to drive the bench for one FSK burst (or a given
//! number of ticks) and `litax init` to write a default `litax.toml`.

#![warn(missing_docs)]

mod init;
mod project;
mod run;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

/// litax: clock/reset testbench for an SPI ADC readout model.
#[derive(Parser, Debug)]
#[command(name = "litax", version, about = "SPI ADC readout testbench")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a `litax.toml` file or a directory containing one.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the testbench.
    Run(RunArgs),
    /// Write a default `litax.toml`.
    Init {
        /// Directory to write into. Defaults to the current directory.
        dir: Option<PathBuf>,
    },
}

/// Arguments for the `litax run` subcommand.
#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Clock toggles to run (default: one full FSK burst).
    #[arg(long)]
    pub ticks: Option<u64>,

    /// Seed for the FSK data bits.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Output path for the waveform file.
    #[arg(long)]
    pub trace: Option<PathBuf>,

    /// Waveform output format.
    #[arg(long, value_enum)]
    pub format: Option<TraceFormatArg>,

    /// Disable waveform recording.
    #[arg(long, conflicts_with_all = ["trace", "format", "levels"])]
    pub no_trace: bool,

    /// Hierarchy depth to trace (1 = top-level ports only).
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub levels: Option<u32>,
}

/// Waveform output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TraceFormatArg {
    /// Value Change Dump (IEEE 1364).
    Vcd,
    /// Gzip-compressed VCD.
    #[value(name = "vcd-gz")]
    VcdGz,
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

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a config file or its directory.
    pub config: Option<PathBuf>,
}

impl GlobalArgs {
    fn from_cli(cli: &Cli) -> Self {
        Self {
            quiet: cli.quiet,
            verbose: cli.verbose,
            config: cli.config.clone(),
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let global = GlobalArgs::from_cli(&cli);
    init_logger(&global, cli.color);

    let result = match cli.command {
        Command::Run(ref args) => run::run(args, &global),
        Command::Init { ref dir } => init::run(dir.as_deref(), &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Maps `--quiet` / `--verbose` to a log level; quiet wins.
fn log_level(quiet: bool, verbose: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

fn init_logger(global: &GlobalArgs, color: ColorChoice) {
    let mut logger = env_logger::Builder::new();
    logger
        .format_timestamp(None)
        .filter_level(log_level(global.quiet, global.verbose));
    logger.write_style(match color {
        ColorChoice::Auto => env_logger::WriteStyle::Auto,
        ColorChoice::Always => env_logger::WriteStyle::Always,
        ColorChoice::Never => env_logger::WriteStyle::Never,
    });
    logger.init();
}
