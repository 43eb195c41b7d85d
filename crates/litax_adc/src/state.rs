//! The shared SPI transfer state machine.
//!
//! Both ends of the link walk the same sequence: an idle state with chip
//! select high, three wait states (the last carries the converter's null bit)
//! and one state per data bit, most significant first.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Position within one SPI conversion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpiState {
    /// Chip select high, between conversions.
    #[default]
    Idle,
    /// First cycle with chip select low.
    Wait0,
    /// Output still released.
    Wait1,
    /// The converter drives its null bit.
    Wait2,
    /// Data bit `i` is on the line.
    Bit(u32),
}

impl SpiState {
    /// The state after one clock edge.
    pub fn next(self, num_bits: u32) -> Self {
        match self {
            SpiState::Idle => SpiState::Wait0,
            SpiState::Wait0 => SpiState::Wait1,
            SpiState::Wait1 => SpiState::Wait2,
            SpiState::Wait2 => SpiState::Bit(num_bits - 1),
            SpiState::Bit(0) => SpiState::Idle,
            SpiState::Bit(i) => SpiState::Bit(i - 1),
        }
    }

    /// Numeric encoding used in traces, in declaration order.
    pub fn code(self, num_bits: u32) -> u64 {
        match self {
            SpiState::Idle => 0,
            SpiState::Wait0 => 1,
            SpiState::Wait1 => 2,
            SpiState::Wait2 => 3,
            SpiState::Bit(i) => 4 + u64::from(num_bits - 1 - i),
        }
    }

    /// Bits needed for [`code`](SpiState::code) with `num_bits` data states.
    pub fn code_width(num_bits: u32) -> u32 {
        bits_to_hold(u64::from(num_bits) + 3)
    }
}

impl fmt::Display for SpiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpiState::Idle => write!(f, "B-1"),
            SpiState::Wait0 => write!(f, "WAIT0"),
            SpiState::Wait1 => write!(f, "WAIT1"),
            SpiState::Wait2 => write!(f, "WAIT2"),
            SpiState::Bit(i) => write!(f, "B{i}"),
        }
    }
}

/// Width of an unsigned register that can hold `max`.
pub(crate) fn bits_to_hold(max: u64) -> u32 {
    (u64::BITS - max.leading_zeros()).max(1)
}
