//! `litax run`: drive the ADC bench and report the scoreboard.
//!
//! Loads the configuration, applies command-line overrides, builds the bench
//! model, runs the clock/reset loop with tracing and prints a summary.
//! Returns exit code 1 when any captured word mismatched.

use std::path::Path;

use litax_adc::{AdcBenchParams, AdcTbTop};
use litax_config::{BenchConfig, ResolvedBench, TraceFormat};
use litax_sim::time::format_fs;
use log::debug;

use crate::project::load_bench_config;
use crate::{GlobalArgs, RunArgs, TraceFormatArg};

/// Mismatches listed individually before the rest are summarized.
const MAX_REPORTED_MISMATCHES: usize = 10;

/// Runs the `litax run` command.
pub fn run(args: &RunArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let (mut config, project_dir) = load_bench_config(global)?;
    apply_overrides(&mut config, args, &std::env::current_dir()?);
    let bench = litax_config::resolve_bench(&config, &project_dir)?;
    debug!("resolved bench: {bench:?}");

    let mut top = AdcTbTop::new(&bench_params(&bench))?;
    if !global.quiet {
        eprintln!(
            "   Simulating {} ({} bits, seed {})",
            bench.top,
            bench.num_bits,
            top.seed()
        );
    }

    let result = litax_sim::simulate(&mut top, &bench.sim_config())?;

    if !global.quiet {
        eprintln!(
            "     Ran {} ticks ({} cycles, {} of trace time)",
            result.run.ticks,
            result.run.cycles,
            format_fs(result.final_time_fs)
        );
        if let Some(path) = &result.trace_path {
            eprintln!("   Waveform {}", path.display());
        }
    }

    let sb = top.scoreboard();
    if sb.passed() {
        if !global.quiet {
            eprintln!("  Scoreboard {} words checked, all matched", sb.checked());
        }
        return Ok(0);
    }

    eprintln!(
        "  Scoreboard {} of {} words mismatched",
        sb.mismatches().len(),
        sb.checked()
    );
    for m in sb.mismatches().iter().take(MAX_REPORTED_MISMATCHES) {
        eprintln!(
            "    cycle {} (sample {}): expected {:#x}, received {:#x}",
            m.cycle, m.sample_idx, m.expected, m.received
        );
    }
    if sb.mismatches().len() > MAX_REPORTED_MISMATCHES {
        eprintln!(
            "    ... and {} more",
            sb.mismatches().len() - MAX_REPORTED_MISMATCHES
        );
    }
    Ok(1)
}

/// Folds command-line flags into the loaded configuration.
///
/// A `--trace` path is taken relative to `cwd` and enables tracing.
fn apply_overrides(config: &mut BenchConfig, args: &RunArgs, cwd: &Path) {
    if let Some(ticks) = args.ticks {
        config.run.ticks = Some(ticks);
    }
    if let Some(seed) = args.seed {
        config.modem.seed = Some(seed);
    }
    if args.no_trace {
        config.trace.enabled = false;
        return;
    }
    if let Some(path) = &args.trace {
        config.trace.enabled = true;
        config.trace.path = cwd.join(path).to_string_lossy().into_owned();
    }
    if let Some(format) = args.format {
        config.trace.format = match format {
            TraceFormatArg::Vcd => TraceFormat::Vcd,
            TraceFormatArg::VcdGz => TraceFormat::VcdGz,
        };
    }
    if let Some(levels) = args.levels {
        config.trace.levels = levels;
    }
}

fn bench_params(bench: &ResolvedBench) -> AdcBenchParams {
    AdcBenchParams {
        top: bench.top.clone(),
        num_bits: bench.num_bits,
        bits: bench.bits,
        clock: bench.clock,
        baud: f64::from(bench.baud),
        mark: bench.mark,
        space: bench.space,
        seed: bench.seed,
    }
}
