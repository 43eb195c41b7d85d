//! Testbench driver and waveform tracing for litax cycle models.
//!
//! A model implements [`SimModel`]: clock and reset inputs, an evaluation
//! step, and a description of its signals. [`Testbench`] runs the fixed
//! clock/reset stimulus loop against it, and [`Tracer`] writes a change-only
//! waveform dump after every evaluation.
//!
//! # Usage
//!
//! ```ignore
//! use litax_sim::{simulate, SimConfig};
//!
//! let result = simulate(&mut model, &SimConfig::default())?;
//! println!("ran {} cycles", result.run.cycles);
//! ```
//!
//! # Modules
//!
//! - `error`: error type for runs and trace output
//! - `model`: the [`SimModel`] trait
//! - `testbench`: the clock/reset stimulus loop
//! - `time`: trace timescales
//! - `trace`: signal hierarchy and change detection
//! - `waveform`: VCD output, plain or gzip compressed

#![warn(missing_docs)]

pub mod error;
pub mod model;
pub mod testbench;
pub mod time;
pub mod trace;
pub mod waveform;

use std::path::PathBuf;

use log::info;

pub use error::SimError;
pub use model::SimModel;
pub use testbench::{Testbench, TestbenchConfig, TestbenchResult};
pub use time::Timescale;
pub use trace::{SimSignalId, TraceScope, TraceVar, Tracer};
pub use waveform::{open_recorder, VcdRecorder, WaveformOutputFormat, WaveformRecorder};

/// Where and how to write the waveform.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceConfig {
    /// Output file. Parent directories are created as needed.
    pub path: PathBuf,
    /// File format.
    pub format: WaveformOutputFormat,
    /// Hierarchy depth to trace; the model's root scope is level 1.
    pub levels: u32,
    /// Duration of one tick in the dump.
    pub timescale: Timescale,
}

/// Configuration for a complete run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimConfig {
    /// Loop bounds.
    pub testbench: TestbenchConfig,
    /// Waveform output, or `None` to run without a trace.
    pub trace: Option<TraceConfig>,
}

/// Outcome of [`simulate`].
#[derive(Debug, Clone, PartialEq)]
pub struct SimResult {
    /// Loop summary.
    pub run: TestbenchResult,
    /// Simulated time at the end of the run, in femtoseconds of the trace timescale.
    pub final_time_fs: u64,
    /// The waveform written, if any.
    pub trace_path: Option<PathBuf>,
}

/// Runs `model` through the stimulus loop described by `config`.
///
/// Opens the trace (if configured), drives the model, closes the trace and
/// calls the model's final hook.
pub fn simulate(model: &mut dyn SimModel, config: &SimConfig) -> Result<SimResult, SimError> {
    let mut bench = Testbench::new(model, config.testbench);

    if let Some(trace) = &config.trace {
        let recorder = open_recorder(&trace.path, trace.format, trace.timescale)?;
        let scope = bench.model().trace_scope();
        let tracer = Tracer::new(recorder, &scope, trace.levels)?;
        info!(
            "tracing {} signals to {}",
            tracer.traced_count(),
            trace.path.display()
        );
        bench.set_tracer(tracer);
    }

    let run = bench.run()?;
    let timescale = config
        .trace
        .as_ref()
        .map(|t| t.timescale)
        .unwrap_or_default();

    Ok(SimResult {
        final_time_fs: timescale.ticks_to_fs(run.ticks),
        trace_path: config.trace.as_ref().map(|t| t.path.clone()),
        run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use litax_common::LogicVec;

    struct Toggle {
        clk: bool,
        rst: bool,
        edges: u32,
    }

    impl SimModel for Toggle {
        fn name(&self) -> &str {
            "toggle"
        }
        fn set_clock(&mut self, level: bool) {
            if level && !self.clk {
                self.edges += 1;
            }
            self.clk = level;
        }
        fn set_reset(&mut self, level: bool) {
            self.rst = level;
        }
        fn clock(&self) -> bool {
            self.clk
        }
        fn eval(&mut self) -> Result<(), SimError> {
            Ok(())
        }
        fn trace_scope(&self) -> TraceScope {
            TraceScope::new("TOP").var("clk", 1).var("rst", 1)
        }
        fn sample(&self, out: &mut Vec<LogicVec>) {
            out.push(LogicVec::from_bool(self.clk));
            out.push(LogicVec::from_bool(self.rst));
        }
    }

    fn toggle() -> Toggle {
        Toggle {
            clk: false,
            rst: false,
            edges: 0,
        }
    }

    #[test]
    fn sim_config_default_has_no_trace() {
        let config = SimConfig::default();
        assert!(config.trace.is_none());
        assert_eq!(config.testbench, TestbenchConfig::default());
    }

    #[test]
    fn simulate_without_trace() {
        let mut model = toggle();
        let config = SimConfig {
            testbench: TestbenchConfig {
                max_ticks: 10,
                reset_release_tick: 5,
            },
            trace: None,
        };
        let result = simulate(&mut model, &config).unwrap();
        assert_eq!(result.run.ticks, 10);
        assert_eq!(result.final_time_fs, 10 * time::FS_PER_PS);
        assert!(result.trace_path.is_none());
        assert_eq!(model.edges, 5);
    }

    #[test]
    fn simulate_writes_vcd() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("logs").join("vlt_dump.vcd");
        let mut model = toggle();
        let config = SimConfig {
            testbench: TestbenchConfig {
                max_ticks: 8,
                reset_release_tick: 5,
            },
            trace: Some(TraceConfig {
                path: path.clone(),
                format: WaveformOutputFormat::Vcd,
                levels: 99,
                timescale: "1ns".parse().unwrap(),
            }),
        };
        let result = simulate(&mut model, &config).unwrap();
        assert_eq!(result.trace_path.as_deref(), Some(path.as_path()));
        assert_eq!(result.final_time_fs, 8 * time::FS_PER_NS);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("$timescale\n  1ns\n$end"));
        assert!(text.contains("$var wire 1 ! clk $end"));
        // reset drops together with the falling clock of tick 6
        assert!(text.contains("#6\n0!\n0\"\n"));
        assert!(text.contains("#8\n0!\n"));
    }
}
