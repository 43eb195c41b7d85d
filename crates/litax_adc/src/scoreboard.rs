//! Checks each captured word against the word the converter sent.

use serde::{Deserialize, Serialize};

/// A captured word that differs from the one served.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    /// Rising edges since the start of the run.
    pub cycle: u64,
    /// Sample table index the converter was at.
    pub sample_idx: u64,
    /// The word the converter served.
    pub expected: u64,
    /// The word the receiver captured.
    pub received: u64,
}

/// Running tally of captures.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    checked: u64,
    skipped: u64,
    mismatches: Vec<Mismatch>,
}

impl Scoreboard {
    /// An empty scoreboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a capture. `expected` is `None` when the converter has not
    /// served a word yet, in which case the capture is only counted.
    pub fn record(&mut self, cycle: u64, sample_idx: u64, expected: Option<u64>, received: u64) {
        let Some(expected) = expected else {
            self.skipped += 1;
            return;
        };
        self.checked += 1;
        if expected != received {
            self.mismatches.push(Mismatch {
                cycle,
                sample_idx,
                expected,
                received,
            });
        }
    }

    /// Captures compared against a served word.
    pub fn checked(&self) -> u64 {
        self.checked
    }

    /// Captures taken before any word was served.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Every mismatching capture, in order.
    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    /// Whether every checked capture matched.
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }
}
