//! Trace timescales and human-readable time formatting.
//!
//! The testbench counts time in unitless ticks (one tick per clock toggle).
//! A [`Timescale`] gives those ticks a physical unit in the waveform header
//! and in run summaries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Femtoseconds per picosecond.
pub const FS_PER_PS: u64 = 1_000;
/// Femtoseconds per nanosecond.
pub const FS_PER_NS: u64 = 1_000_000;
/// Femtoseconds per microsecond.
pub const FS_PER_US: u64 = 1_000_000_000;
/// Femtoseconds per millisecond.
pub const FS_PER_MS: u64 = 1_000_000_000_000;
/// Femtoseconds per second.
pub const FS_PER_S: u64 = 1_000_000_000_000_000;

/// Unit part of a VCD `$timescale`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Femtoseconds.
    Fs,
    /// Picoseconds.
    Ps,
    /// Nanoseconds.
    Ns,
    /// Microseconds.
    Us,
    /// Milliseconds.
    Ms,
    /// Seconds.
    S,
}

impl TimeUnit {
    /// Length of one unit in femtoseconds.
    pub fn fs(self) -> u64 {
        match self {
            TimeUnit::Fs => 1,
            TimeUnit::Ps => FS_PER_PS,
            TimeUnit::Ns => FS_PER_NS,
            TimeUnit::Us => FS_PER_US,
            TimeUnit::Ms => FS_PER_MS,
            TimeUnit::S => FS_PER_S,
        }
    }

    /// The suffix used in VCD headers (`"ps"`, `"ns"`, ...).
    pub fn suffix(self) -> &'static str {
        match self {
            TimeUnit::Fs => "fs",
            TimeUnit::Ps => "ps",
            TimeUnit::Ns => "ns",
            TimeUnit::Us => "us",
            TimeUnit::Ms => "ms",
            TimeUnit::S => "s",
        }
    }

    fn from_suffix(s: &str) -> Option<Self> {
        match s {
            "fs" => Some(TimeUnit::Fs),
            "ps" => Some(TimeUnit::Ps),
            "ns" => Some(TimeUnit::Ns),
            "us" => Some(TimeUnit::Us),
            "ms" => Some(TimeUnit::Ms),
            "s" => Some(TimeUnit::S),
            _ => None,
        }
    }
}

/// The duration of one trace tick, e.g. `1ps` or `10ns`.
///
/// VCD only allows magnitudes of 1, 10 and 100.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timescale {
    magnitude: u32,
    unit: TimeUnit,
}

impl Timescale {
    /// Creates a timescale, rejecting magnitudes other than 1, 10 and 100.
    pub fn new(magnitude: u32, unit: TimeUnit) -> Option<Self> {
        matches!(magnitude, 1 | 10 | 100).then_some(Self { magnitude, unit })
    }

    /// The numeric part.
    pub fn magnitude(&self) -> u32 {
        self.magnitude
    }

    /// The unit part.
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Femtoseconds covered by one tick.
    pub fn fs_per_tick(&self) -> u64 {
        self.magnitude as u64 * self.unit.fs()
    }

    /// Converts a tick count to femtoseconds, saturating on overflow.
    pub fn ticks_to_fs(&self, ticks: u64) -> u64 {
        ticks.saturating_mul(self.fs_per_tick())
    }
}

impl Default for Timescale {
    fn default() -> Self {
        Self {
            magnitude: 1,
            unit: TimeUnit::Ps,
        }
    }
}

impl fmt::Display for Timescale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.magnitude, self.unit.suffix())
    }
}

/// Returned when a timescale string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timescale '{input}' (expected 1, 10 or 100 followed by fs, ps, ns, us, ms or s)")]
pub struct ParseTimescaleError {
    /// The rejected input.
    pub input: String,
}

impl FromStr for Timescale {
    type Err = ParseTimescaleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseTimescaleError {
            input: s.to_string(),
        };

        let digit_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let magnitude: u32 = s[..digit_end].parse().map_err(|_| err())?;
        let unit = TimeUnit::from_suffix(s[digit_end..].trim()).ok_or_else(err)?;
        Timescale::new(magnitude, unit).ok_or_else(err)
    }
}

/// Formats a femtosecond count using the largest unit that divides it.
pub fn format_fs(fs: u64) -> String {
    if fs == 0 {
        return "0 fs".to_string();
    }
    for (unit, name) in [
        (FS_PER_S, "s"),
        (FS_PER_MS, "ms"),
        (FS_PER_US, "us"),
        (FS_PER_NS, "ns"),
        (FS_PER_PS, "ps"),
    ] {
        if fs >= unit && fs.is_multiple_of(unit) {
            return format!("{} {name}", fs / unit);
        }
    }
    format!("{fs} fs")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_one_picosecond() {
        let ts = Timescale::default();
        assert_eq!(ts.to_string(), "1ps");
        assert_eq!(ts.fs_per_tick(), FS_PER_PS);
    }

    #[test]
    fn parse_valid() {
        let ts: Timescale = "10ns".parse().unwrap();
        assert_eq!(ts.magnitude(), 10);
        assert_eq!(ts.unit(), TimeUnit::Ns);
        assert_eq!(ts.fs_per_tick(), 10 * FS_PER_NS);
        assert_eq!(" 100 us ".parse::<Timescale>().unwrap().to_string(), "100us");
    }

    #[test]
    fn parse_rejects_bad_magnitude() {
        let err = "5ns".parse::<Timescale>().unwrap_err();
        assert_eq!(err.input, "5ns");
    }

    #[test]
    fn parse_rejects_bad_unit_or_missing_number() {
        assert!("1min".parse::<Timescale>().is_err());
        assert!("ns".parse::<Timescale>().is_err());
        assert!("".parse::<Timescale>().is_err());
    }

    #[test]
    fn ticks_to_fs_saturates() {
        let ts: Timescale = "100s".parse().unwrap();
        assert_eq!(ts.ticks_to_fs(2), 200 * FS_PER_S);
        assert_eq!(ts.ticks_to_fs(u64::MAX), u64::MAX);
    }

    #[test]
    fn format_fs_picks_largest_unit() {
        assert_eq!(format_fs(0), "0 fs");
        assert_eq!(format_fs(200_000 * FS_PER_PS), "200 ns");
        assert_eq!(format_fs(3 * FS_PER_MS), "3 ms");
        assert_eq!(format_fs(1500), "1500 fs");
    }

    #[test]
    fn serde_roundtrip() {
        let ts: Timescale = "10us".parse().unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        let back: Timescale = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, back);
    }
}
