//! Model signal hierarchies and the change-only trace dumper.
//!
//! A model describes its traceable signals once as a [`TraceScope`] tree and
//! then hands out values in the same depth-first order on every sample.
//! [`Tracer`] declares the tree to a [`WaveformRecorder`], keeps the last
//! dumped value of each signal and emits only what changed.

use litax_common::LogicVec;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::model::SimModel;
use crate::waveform::WaveformRecorder;

/// Index of a traced signal in recorder registration order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct SimSignalId(u32);

impl SimSignalId {
    /// Creates an ID from a raw index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

/// A single traceable signal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceVar {
    /// Signal name within its scope.
    pub name: String,
    /// Bit width.
    pub width: u32,
}

/// One level of a model's signal hierarchy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceScope {
    /// Scope (instance) name.
    pub name: String,
    /// Signals owned directly by this scope.
    pub vars: Vec<TraceVar>,
    /// Nested scopes, in sample order after `vars`.
    pub children: Vec<TraceScope>,
}

impl TraceScope {
    /// Creates an empty scope.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds a signal, builder style.
    pub fn var(mut self, name: impl Into<String>, width: u32) -> Self {
        self.vars.push(TraceVar {
            name: name.into(),
            width,
        });
        self
    }

    /// Adds a nested scope, builder style.
    pub fn child(mut self, scope: TraceScope) -> Self {
        self.children.push(scope);
        self
    }

    /// Total number of signals in this scope and all nested scopes.
    pub fn signal_count(&self) -> usize {
        self.vars.len() + self.children.iter().map(TraceScope::signal_count).sum::<usize>()
    }
}

/// Dumps model values to a recorder, writing only changes after the first dump.
pub struct Tracer {
    recorder: Option<Box<dyn WaveformRecorder>>,
    /// For every sampled value, whether it is traced (scope depth within `levels`).
    keep: Vec<bool>,
    widths: Vec<u32>,
    last: Vec<LogicVec>,
    scratch: Vec<LogicVec>,
    dumped_once: bool,
}

impl Tracer {
    /// Declares `scope` to `recorder`, tracing scopes down to depth `levels`.
    ///
    /// The root scope is depth 1, so `levels == 1` traces only the root's own
    /// signals. `levels == 0` declares nothing.
    pub fn new(
        mut recorder: Box<dyn WaveformRecorder>,
        scope: &TraceScope,
        levels: u32,
    ) -> Result<Self, SimError> {
        let mut keep = Vec::with_capacity(scope.signal_count());
        let mut widths = Vec::new();
        declare(recorder.as_mut(), scope, 1, levels, &mut keep, &mut widths)?;
        debug!(
            "tracing {} of {} signals ({} levels)",
            widths.len(),
            keep.len(),
            levels
        );

        let last = widths.iter().map(|&w| LogicVec::all_x(w)).collect();
        Ok(Self {
            recorder: Some(recorder),
            keep,
            widths,
            last,
            scratch: Vec::new(),
            dumped_once: false,
        })
    }

    /// Number of signals that end up in the trace.
    pub fn traced_count(&self) -> usize {
        self.widths.len()
    }

    /// Samples `model` and records every traced value that changed since the
    /// previous dump. The first dump records all traced values.
    pub fn dump(&mut self, time: u64, model: &dyn SimModel) -> Result<(), SimError> {
        let Some(recorder) = self.recorder.as_mut() else {
            return Ok(());
        };

        self.scratch.clear();
        model.sample(&mut self.scratch);
        if self.scratch.len() != self.keep.len() {
            return Err(SimError::SampleMismatch {
                expected: self.keep.len(),
                actual: self.scratch.len(),
            });
        }

        let traced = self
            .scratch
            .iter()
            .zip(&self.keep)
            .filter_map(|(value, &keep)| keep.then_some(value));
        for (index, value) in traced.enumerate() {
            if self.dumped_once && self.last[index] == *value {
                continue;
            }
            recorder.record_change(time, SimSignalId::from_raw(index as u32), value)?;
            self.last[index] = value.clone();
        }
        self.dumped_once = true;
        Ok(())
    }

    /// Finalizes and releases the recorder. Later calls do nothing.
    pub fn close(&mut self) -> Result<(), SimError> {
        if let Some(mut recorder) = self.recorder.take() {
            recorder.finalize()?;
        }
        Ok(())
    }
}

fn declare(
    recorder: &mut dyn WaveformRecorder,
    scope: &TraceScope,
    depth: u32,
    levels: u32,
    keep: &mut Vec<bool>,
    widths: &mut Vec<u32>,
) -> Result<(), SimError> {
    let traced = depth <= levels;
    if traced {
        recorder.begin_scope(&scope.name)?;
    }
    for var in &scope.vars {
        keep.push(traced);
        if traced {
            let id = SimSignalId::from_raw(widths.len() as u32);
            recorder.register_signal(id, &var.name, var.width)?;
            widths.push(var.width);
        }
    }
    for child in &scope.children {
        declare(recorder, child, depth + 1, levels, keep, widths)?;
    }
    if traced {
        recorder.end_scope()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waveform::VcdRecorder;
    use std::cell::RefCell;
    use std::io::Write;
    use std::rc::Rc;

    /// Shares the VCD buffer with the test after the recorder is boxed.
    #[derive(Clone, Default)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl crate::waveform::TraceWriter for SharedBuf {}

    impl SharedBuf {
        fn text(&self) -> String {
            String::from_utf8(self.0.borrow().clone()).unwrap()
        }
    }

    struct Counter {
        value: u64,
        deep: bool,
    }

    impl SimModel for Counter {
        fn name(&self) -> &str {
            "counter"
        }
        fn set_clock(&mut self, _level: bool) {}
        fn set_reset(&mut self, _level: bool) {}
        fn clock(&self) -> bool {
            false
        }
        fn eval(&mut self) -> Result<(), SimError> {
            Ok(())
        }
        fn trace_scope(&self) -> TraceScope {
            scope()
        }
        fn sample(&self, out: &mut Vec<LogicVec>) {
            out.push(LogicVec::from_u64(self.value, 4));
            out.push(LogicVec::from_bool(self.deep));
        }
    }

    fn scope() -> TraceScope {
        TraceScope::new("TOP")
            .var("count", 4)
            .child(TraceScope::new("inner").var("flag", 1))
    }

    fn tracer(levels: u32) -> (Tracer, SharedBuf) {
        let buf = SharedBuf::default();
        let rec = Box::new(VcdRecorder::new(buf.clone()));
        (Tracer::new(rec, &scope(), levels).unwrap(), buf)
    }

    #[test]
    fn signal_count_includes_children() {
        assert_eq!(scope().signal_count(), 2);
    }

    #[test]
    fn first_dump_writes_everything_then_only_changes() {
        let (mut tracer, buf) = tracer(99);
        let mut model = Counter {
            value: 0,
            deep: false,
        };
        tracer.dump(1, &model).unwrap();
        tracer.dump(2, &model).unwrap();
        model.value = 3;
        tracer.dump(3, &model).unwrap();
        tracer.close().unwrap();

        let out = buf.text();
        let body = out.split("$enddefinitions $end\n").nth(1).unwrap();
        assert_eq!(body, "#1\n$dumpvars\nb0000 !\n0\"\n$end\n#3\nb0011 !\n");
    }

    #[test]
    fn levels_prune_nested_scopes() {
        let (mut tracer, buf) = tracer(1);
        assert_eq!(tracer.traced_count(), 1);
        let model = Counter {
            value: 1,
            deep: true,
        };
        tracer.dump(1, &model).unwrap();
        tracer.close().unwrap();

        let out = buf.text();
        assert!(!out.contains("inner"));
        assert!(!out.contains("flag"));
        assert!(out.contains("b0001 !"));
    }

    #[test]
    fn close_is_idempotent_and_stops_dumping() {
        let (mut tracer, buf) = tracer(99);
        tracer.close().unwrap();
        tracer.close().unwrap();
        let model = Counter {
            value: 1,
            deep: true,
        };
        tracer.dump(5, &model).unwrap();
        assert!(!buf.text().contains("#5"));
    }

    #[test]
    fn sample_count_mismatch_errors() {
        let buf = SharedBuf::default();
        let rec = Box::new(VcdRecorder::new(buf));
        let wide = scope().var("extra", 2);
        let mut tracer = Tracer::new(rec, &wide, 99).unwrap();
        let model = Counter {
            value: 0,
            deep: false,
        };
        let err = tracer.dump(1, &model).unwrap_err();
        assert!(matches!(
            err,
            SimError::SampleMismatch {
                expected: 3,
                actual: 2
            }
        ));
    }
}
