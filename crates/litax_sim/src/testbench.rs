//! The clock/reset stimulus loop.
//!
//! [`Testbench`] holds reset high from the start, toggles the clock once per
//! tick, evaluates the model and dumps the trace after every evaluation. It
//! releases reset at a fixed tick and stops at the tick limit or as soon as
//! the model reports it has finished.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::model::SimModel;
use crate::trace::Tracer;

/// Loop bounds for a testbench run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestbenchConfig {
    /// Number of clock toggles to perform. Two ticks make one clock cycle.
    pub max_ticks: u64,
    /// Tick index at which reset is deasserted, before that tick's toggle.
    pub reset_release_tick: u64,
}

impl Default for TestbenchConfig {
    fn default() -> Self {
        Self {
            max_ticks: 200_000,
            reset_release_tick: 5,
        }
    }
}

/// Summary of a finished testbench run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestbenchResult {
    /// Clock toggles performed.
    pub ticks: u64,
    /// Complete clock cycles performed.
    pub cycles: u64,
    /// Whether the run ended because the model asked to finish.
    pub finished_by_model: bool,
    /// Tick at which reset was released, if the run got that far.
    pub reset_released_at: Option<u64>,
}

/// Drives a [`SimModel`] with clock and reset, optionally tracing it.
pub struct Testbench<M: SimModel> {
    model: M,
    config: TestbenchConfig,
    tracer: Option<Tracer>,
}

impl<M: SimModel> Testbench<M> {
    /// Wraps `model` with the given loop bounds.
    pub fn new(model: M, config: TestbenchConfig) -> Self {
        Self {
            model,
            config,
            tracer: None,
        }
    }

    /// Attaches a trace dumper. It is closed when the run ends.
    pub fn set_tracer(&mut self, tracer: Tracer) {
        self.tracer = Some(tracer);
    }

    /// The driven model.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Gives the model back.
    pub fn into_model(self) -> M {
        self.model
    }

    /// Runs the stimulus loop to completion.
    ///
    /// The tracer is closed and the model's [`finalize`](SimModel::finalize)
    /// hook runs even when the loop ends early.
    pub fn run(&mut self) -> Result<TestbenchResult, SimError> {
        info!(
            "driving {} for {} ticks (reset released at tick {})",
            self.model.name(),
            self.config.max_ticks,
            self.config.reset_release_tick
        );

        let outcome = self.drive();

        if let Some(tracer) = self.tracer.as_mut() {
            match (&outcome, tracer.close()) {
                (Ok(_), Err(e)) => return Err(e),
                (Err(_), Err(e)) => warn!("could not close trace after failed run: {e}"),
                _ => {}
            }
        }
        self.model.finalize();

        let result = outcome?;
        info!(
            "{} stopped after {} ticks{}",
            self.model.name(),
            result.ticks,
            if result.finished_by_model {
                " (model finished)"
            } else {
                ""
            }
        );
        Ok(result)
    }

    fn drive(&mut self) -> Result<TestbenchResult, SimError> {
        let model = &mut self.model;
        model.set_clock(false);
        model.set_reset(true);

        let mut tick = 0u64;
        let mut reset_released_at = None;
        while !model.got_finish() && tick < self.config.max_ticks {
            if tick == self.config.reset_release_tick {
                model.set_reset(false);
                reset_released_at = Some(tick);
                debug!("reset released at tick {tick}");
            }
            let level = !model.clock();
            model.set_clock(level);
            model.eval()?;
            tick += 1;
            if let Some(tracer) = self.tracer.as_mut() {
                tracer.dump(tick, &*model)?;
            }
        }

        Ok(TestbenchResult {
            ticks: tick,
            cycles: tick / 2,
            finished_by_model: model.got_finish(),
            reset_released_at,
        })
    }
}
