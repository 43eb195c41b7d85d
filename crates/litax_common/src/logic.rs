//! Single-bit 4-state values as they appear in a waveform dump.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One bit of a traced signal.
///
/// The cycle models only ever drive `Zero` and `One`. `X` is what a trace
/// shows before a signal has been sampled, and `Z` is kept so that dumps of
/// undriven nets stay representable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[repr(u8)]
pub enum Logic {
    /// Driven low.
    Zero = 0,
    /// Driven high.
    One = 1,
    /// Unknown.
    X = 2,
    /// High impedance.
    Z = 3,
}

impl Logic {
    /// Returns the lowercase character VCD uses for this value.
    pub fn vcd_char(self) -> char {
        match self {
            Logic::Zero => '0',
            Logic::One => '1',
            Logic::X => 'x',
            Logic::Z => 'z',
        }
    }
}

impl From<bool> for Logic {
    fn from(value: bool) -> Self {
        if value {
            Logic::One
        } else {
            Logic::Zero
        }
    }
}

impl fmt::Display for Logic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Logic::Zero => write!(f, "0"),
            Logic::One => write!(f, "1"),
            Logic::X => write!(f, "X"),
            Logic::Z => write!(f, "Z"),
        }
    }
}
