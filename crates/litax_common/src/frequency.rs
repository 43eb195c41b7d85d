//! Frequencies written as `"6MHz"`, `"1200Hz"` and the like.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A frequency in Hertz.
///
/// Parses `GHz`, `MHz`, `kHz` and `Hz` suffixes case-insensitively. A bare
/// number is taken as Hertz.
#[derive(Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Frequency(f64);

impl Frequency {
    /// Creates a frequency from a value in Hertz.
    pub fn new(hz: f64) -> Self {
        Self(hz)
    }

    /// The value in Hertz.
    pub fn hz(&self) -> f64 {
        self.0
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({self})")
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hz = self.0;
        if hz >= 1e9 {
            write!(f, "{}GHz", hz / 1e9)
        } else if hz >= 1e6 {
            write!(f, "{}MHz", hz / 1e6)
        } else if hz >= 1e3 {
            write!(f, "{}kHz", hz / 1e3)
        } else {
            write!(f, "{hz}Hz")
        }
    }
}

/// Returned when a frequency string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseFrequencyError {
    /// The rejected input.
    pub input: String,
}

impl fmt::Display for ParseFrequencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid frequency: '{}'", self.input)
    }
}

impl std::error::Error for ParseFrequencyError {}

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseFrequencyError {
            input: s.to_string(),
        };

        let lower = s.to_ascii_lowercase();
        let (num, scale) = [("ghz", 1e9), ("mhz", 1e6), ("khz", 1e3), ("hz", 1.0)]
            .into_iter()
            .find_map(|(suffix, scale)| lower.strip_suffix(suffix).map(|n| (n, scale)))
            .unwrap_or((lower.as_str(), 1.0));

        let val: f64 = num.trim().parse().map_err(|_| err())?;
        let hz = val * scale;
        if !hz.is_finite() {
            return Err(err());
        }
        Ok(Frequency(hz))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_mhz() {
        let f: Frequency = "6MHz".parse().unwrap();
        assert_eq!(f.hz(), 6_000_000.0);
    }

    #[test]
    fn parse_khz_and_hz() {
        assert_eq!("2.2kHz".parse::<Frequency>().unwrap().hz(), 2200.0);
        assert_eq!("1200Hz".parse::<Frequency>().unwrap().hz(), 1200.0);
        assert_eq!("1GHz".parse::<Frequency>().unwrap().hz(), 1e9);
    }

    #[test]
    fn parse_bare_number() {
        assert_eq!("48000".parse::<Frequency>().unwrap().hz(), 48_000.0);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("6mhz".parse::<Frequency>().unwrap().hz(), 6e6);
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = "fast".parse::<Frequency>().unwrap_err();
        assert_eq!(err.to_string(), "invalid frequency: 'fast'");
        assert!("infHz".parse::<Frequency>().is_err());
    }

    #[test]
    fn parse_rejects_overflow_after_scaling() {
        assert!("1e308GHz".parse::<Frequency>().is_err());
        assert!("1e300kHz".parse::<Frequency>().is_err());
        assert_eq!("1e300Hz".parse::<Frequency>().unwrap().hz(), 1e300);
    }

    #[test]
    fn display_picks_unit() {
        assert_eq!(Frequency::new(6e6).to_string(), "6MHz");
        assert_eq!(Frequency::new(2200.0).to_string(), "2.2kHz");
        assert_eq!(Frequency::new(500.0).to_string(), "500Hz");
    }
}
