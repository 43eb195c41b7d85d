//! Errors raised while building the ADC bench.

/// Invalid bench parameters.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AdcError {
    /// The converter width is outside what the model supports.
    #[error("ADC width must be between 2 and 32 bits, got {0}")]
    InvalidWidth(u32),

    /// A rate or frequency that must be positive is not.
    #[error("{name} must be positive, got {value}")]
    NonPositive {
        /// Parameter name.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A rate or frequency is infinite.
    #[error("{name} must be finite")]
    NotFinite {
        /// Parameter name.
        name: &'static str,
    },

    /// The FSK burst would contain no samples.
    #[error("FSK burst is empty: {bits} bits at {samples_per_baud} samples per baud")]
    EmptyBurst {
        /// Requested data bits.
        bits: usize,
        /// Samples that fit in one symbol.
        samples_per_baud: usize,
    },

    /// The FSK burst would not fit in a sample table.
    #[error("FSK burst too long: {bits} bits at {samples_per_baud} samples per baud exceeds {max} samples")]
    BurstTooLong {
        /// Requested data bits.
        bits: usize,
        /// Samples that fit in one symbol.
        samples_per_baud: usize,
        /// Largest allowed table.
        max: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_width() {
        assert_eq!(
            AdcError::InvalidWidth(40).to_string(),
            "ADC width must be between 2 and 32 bits, got 40"
        );
    }

    #[test]
    fn display_non_positive() {
        let err = AdcError::NonPositive {
            name: "baud",
            value: 0.0,
        };
        assert_eq!(err.to_string(), "baud must be positive, got 0");
    }

    #[test]
    fn display_empty_burst() {
        let err = AdcError::EmptyBurst {
            bits: 4,
            samples_per_baud: 0,
        };
        assert!(err.to_string().contains("0 samples per baud"));
    }

    #[test]
    fn display_burst_too_long() {
        let err = AdcError::BurstTooLong {
            bits: 20,
            samples_per_baud: 1 << 30,
            max: 1 << 24,
        };
        assert!(err.to_string().contains("exceeds 16777216 samples"));
        assert_eq!(AdcError::NotFinite { name: "clock" }.to_string(), "clock must be finite");
    }
}
