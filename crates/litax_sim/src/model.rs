//! The seam between the testbench driver and a circuit model.

use litax_common::LogicVec;

use crate::error::SimError;
use crate::trace::TraceScope;

/// A clocked circuit model with a single clock and a single reset input.
///
/// Inputs are latched by the setters and take effect on the next
/// [`eval`](SimModel::eval). Implementations detect clock edges inside `eval`
/// by comparing the clock level against the one seen at the previous `eval`.
pub trait SimModel {
    /// Name of the top-level module.
    fn name(&self) -> &str;

    /// Drives the clock input.
    fn set_clock(&mut self, level: bool);

    /// Drives the reset input.
    fn set_reset(&mut self, level: bool);

    /// Current level of the clock input.
    fn clock(&self) -> bool;

    /// Settles the model after its inputs changed.
    fn eval(&mut self) -> Result<(), SimError>;

    /// Whether the model has asked for the simulation to end.
    fn got_finish(&self) -> bool {
        false
    }

    /// The model's traceable signal hierarchy.
    fn trace_scope(&self) -> TraceScope;

    /// Appends the current value of every signal in [`trace_scope`](SimModel::trace_scope),
    /// depth-first, own signals before nested scopes.
    fn sample(&self, out: &mut Vec<LogicVec>);

    /// Runs once after the last evaluation.
    fn finalize(&mut self) {}
}

impl<T: SimModel + ?Sized> SimModel for &mut T {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn set_clock(&mut self, level: bool) {
        (**self).set_clock(level)
    }

    fn set_reset(&mut self, level: bool) {
        (**self).set_reset(level)
    }

    fn clock(&self) -> bool {
        (**self).clock()
    }

    fn eval(&mut self) -> Result<(), SimError> {
        (**self).eval()
    }

    fn got_finish(&self) -> bool {
        (**self).got_finish()
    }

    fn trace_scope(&self) -> TraceScope {
        (**self).trace_scope()
    }

    fn sample(&self, out: &mut Vec<LogicVec>) {
        (**self).sample(out)
    }

    fn finalize(&mut self) {
        (**self).finalize()
    }
}
