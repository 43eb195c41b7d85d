//! Resolution of a validated [`BenchConfig`] into run-ready values.

use std::path::{Path, PathBuf};

use litax_common::Frequency;
use litax_sim::{SimConfig, TestbenchConfig, Timescale, TraceConfig, WaveformOutputFormat};

use crate::error::ConfigError;
use crate::loader::{parse_frequency, parse_timescale};
use crate::types::{BenchConfig, TraceFormat};

/// A testbench configuration with every string parsed and every default applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBench {
    /// The project name.
    pub name: String,
    /// Top-level module name.
    pub top: String,
    /// System clock frequency.
    pub clock: Frequency,
    /// Tick index at which reset is released.
    pub reset_release_tick: u64,
    /// Clock toggles to run.
    pub ticks: u64,
    /// Waveform output, or `None` when tracing is disabled.
    pub trace: Option<ResolvedTrace>,
    /// ADC word width.
    pub num_bits: u32,
    /// FSK data bits per burst.
    pub bits: usize,
    /// Symbol rate.
    pub baud: u32,
    /// Tone for a `1` bit.
    pub mark: Frequency,
    /// Tone for a `0` bit.
    pub space: Frequency,
    /// Seed for the data bits, if fixed.
    pub seed: Option<u64>,
}

/// Trace settings with the output path anchored to the project directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTrace {
    /// Output file.
    pub path: PathBuf,
    /// On-disk format.
    pub format: WaveformOutputFormat,
    /// Hierarchy depth to trace.
    pub levels: u32,
    /// Duration of one tick.
    pub timescale: Timescale,
}

/// Resolves `config`, anchoring a relative trace path at `project_dir`.
///
/// Without an explicit `[run] ticks`, the run lasts for one whole burst:
/// two ticks per clock cycle, `clock / baud` cycles per bit, `bits` bits.
pub fn resolve_bench(config: &BenchConfig, project_dir: &Path) -> Result<ResolvedBench, ConfigError> {
    let clock = parse_frequency("clock.frequency", &config.clock.frequency)?;
    let mark = parse_frequency("modem.mark", &config.modem.mark)?;
    let space = parse_frequency("modem.space", &config.modem.space)?;

    let ticks = match config.run.ticks {
        Some(ticks) => ticks,
        None => burst_ticks(clock, config.modem.bits, config.modem.baud)?,
    };

    let trace = if config.trace.enabled {
        let path = Path::new(&config.trace.path);
        Some(ResolvedTrace {
            path: if path.is_absolute() {
                path.to_path_buf()
            } else {
                project_dir.join(path)
            },
            format: match config.trace.format {
                TraceFormat::Vcd => WaveformOutputFormat::Vcd,
                TraceFormat::VcdGz => WaveformOutputFormat::VcdGz,
            },
            levels: config.trace.levels,
            timescale: parse_timescale(&config.trace.timescale)?,
        })
    } else {
        None
    };

    Ok(ResolvedBench {
        name: config.project.name.clone(),
        top: config.project.top.clone(),
        clock,
        reset_release_tick: config.reset.release_tick,
        ticks,
        trace,
        num_bits: config.adc.num_bits,
        bits: config.modem.bits,
        baud: config.modem.baud,
        mark,
        space,
        seed: config.modem.seed,
    })
}

/// Ticks needed to clock out `bits` symbols; a fractional bound rounds up.
fn burst_ticks(clock: Frequency, bits: usize, baud: u32) -> Result<u64, ConfigError> {
    if baud == 0 {
        return Err(ConfigError::ValidationError(
            "modem.baud must be positive".to_string(),
        ));
    }
    let ticks = (2.0 * bits as f64 * clock.hz() / f64::from(baud)).ceil();
    Ok(ticks as u64)
}

impl ResolvedBench {
    /// The driver settings for this bench.
    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            testbench: TestbenchConfig {
                max_ticks: self.ticks,
                reset_release_tick: self.reset_release_tick,
            },
            trace: self.trace.as_ref().map(|t| TraceConfig {
                path: t.path.clone(),
                format: t.format,
                levels: t.levels,
                timescale: t.timescale,
            }),
        }
    }
}
