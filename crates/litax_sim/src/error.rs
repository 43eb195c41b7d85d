//! Errors raised while driving a model or writing its trace.

use std::io;

/// Errors that can occur during a testbench run.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Writing or creating the waveform file failed.
    #[error("waveform I/O error: {0}")]
    WaveformIo(#[from] io::Error),

    /// A traced signal was referenced that the recorder never registered,
    /// or a sampled value disagrees with its declared width.
    #[error("invalid signal reference: {reason}")]
    InvalidSignalRef {
        /// What was wrong with the reference.
        reason: String,
    },

    /// The model produced a different number of samples than its trace
    /// hierarchy declares.
    #[error("model sampled {actual} values but declares {expected} traced signals")]
    SampleMismatch {
        /// Number of signals in the trace hierarchy.
        expected: usize,
        /// Number of values the model produced.
        actual: usize,
    },

    /// The model rejected an evaluation step.
    #[error("model error: {reason}")]
    Model {
        /// Description supplied by the model.
        reason: String,
    },
}
