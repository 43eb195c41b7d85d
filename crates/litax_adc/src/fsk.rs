//! Phase-continuous binary FSK stimulus and its quantized sample table.
//!
//! The burst is sampled at the converter's rate (one sample every
//! `cycles_per_sample` system clocks). When the data bit changes, the phase
//! offset is adjusted so the cosine continues without a jump.

use std::f64::consts::PI;

use litax_common::Frequency;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::AdcError;
use crate::state::bits_to_hold;

/// Largest sample table a burst may produce.
pub const MAX_BURST_SAMPLES: usize = 1 << 24;

/// Timing and tones of an FSK burst.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FskParams {
    /// System clock the converter runs from.
    pub clock: Frequency,
    /// Symbol rate.
    pub baud: f64,
    /// Tone for a `1` bit.
    pub mark: Frequency,
    /// Tone for a `0` bit.
    pub space: Frequency,
    /// System clocks per converter sample.
    pub cycles_per_sample: u32,
}

impl FskParams {
    /// Converter sample rate in Hertz.
    pub fn sample_hz(&self) -> f64 {
        self.clock.hz() / f64::from(self.cycles_per_sample)
    }

    /// Whole samples per symbol.
    pub fn samples_per_baud(&self) -> usize {
        (self.sample_hz() / self.baud) as usize
    }

    /// Number of samples in a burst of `bits` symbols.
    ///
    /// Fails for bad rates, an empty burst, or one larger than
    /// [`MAX_BURST_SAMPLES`].
    pub fn burst_samples(&self, bits: usize) -> Result<usize, AdcError> {
        self.validate()?;
        let samples_per_baud = self.samples_per_baud();
        if bits == 0 || samples_per_baud == 0 {
            return Err(AdcError::EmptyBurst {
                bits,
                samples_per_baud,
            });
        }
        samples_per_baud
            .checked_mul(bits)
            .filter(|&n| n <= MAX_BURST_SAMPLES)
            .ok_or(AdcError::BurstTooLong {
                bits,
                samples_per_baud,
                max: MAX_BURST_SAMPLES,
            })
    }

    fn validate(&self) -> Result<(), AdcError> {
        for (name, value) in [
            ("clock", self.clock.hz()),
            ("baud", self.baud),
            ("mark", self.mark.hz()),
            ("space", self.space.hz()),
            ("cycles_per_sample", f64::from(self.cycles_per_sample)),
        ] {
            if value.is_nan() || value <= 0.0 {
                return Err(AdcError::NonPositive { name, value });
            }
            if value.is_infinite() {
                return Err(AdcError::NotFinite { name });
            }
        }
        Ok(())
    }

    fn tone(&self, bit: bool) -> f64 {
        if bit {
            self.mark.hz()
        } else {
            self.space.hz()
        }
    }
}

/// Draws `count` uniformly random data bits.
pub fn random_bits<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<bool> {
    (0..count).map(|_| rng.gen_range(0..2u8) == 1).collect()
}

/// One converter sample of the burst.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FskSample {
    /// The data bit being sent.
    pub bit: bool,
    /// Signal level in `[-1, 1]`.
    pub value: f64,
}

/// Yields `samples_per_baud * bits.len()` samples of the modulated burst.
#[derive(Debug, Clone)]
pub struct Modulator<'a> {
    params: FskParams,
    bits: &'a [bool],
    samples_per_baud: usize,
    total: usize,
    index: usize,
    symbol: usize,
    phase: f64,
    bit: bool,
    freq: f64,
}

impl<'a> Modulator<'a> {
    /// Starts a burst over `bits`.
    pub fn new(params: FskParams, bits: &'a [bool]) -> Result<Self, AdcError> {
        let total = params.burst_samples(bits.len())?;
        let first = bits[0];
        Ok(Self {
            params,
            bits,
            samples_per_baud: params.samples_per_baud(),
            total,
            index: 0,
            symbol: 0,
            phase: 0.0,
            bit: first,
            freq: params.tone(first),
        })
    }
}

impl Iterator for Modulator<'_> {
    type Item = FskSample;

    fn next(&mut self) -> Option<FskSample> {
        if self.index >= self.total {
            return None;
        }
        let i = self.index;
        self.index += 1;

        let coeff = f64::from(self.params.cycles_per_sample) * i as f64 * 2.0 * PI
            / self.params.clock.hz();

        // symbol boundaries follow the exact rate, the bit lookup the whole-sample one
        let symbol = (i as f64 * self.params.baud / self.params.sample_hz()) as usize;
        if symbol > self.symbol {
            self.symbol = symbol;
            let bit_idx = (i / self.samples_per_baud).min(self.bits.len() - 1);
            let new_bit = self.bits[bit_idx];
            if new_bit != self.bit {
                let new_freq = self.params.tone(new_bit);
                self.phase += coeff * (self.freq - new_freq);
                self.bit = new_bit;
                self.freq = new_freq;
            }
        }

        Some(FskSample {
            bit: self.bit,
            value: (coeff * self.freq + self.phase).cos(),
        })
    }
}

/// Converts a level in `[-1, 1]` to a `num_bits` two's complement word.
///
/// The level is scaled by `2^(num_bits-1)`, truncated toward zero and offset
/// by one, then wrapped to the word width, so `-1.0` lands on the largest
/// positive code.
pub fn quantize(x: f64, num_bits: u32) -> u64 {
    let scaled = ((1u64 << (num_bits - 1)) as f64 * x) as i64 - 1;
    (scaled as u64) & word_mask(num_bits)
}

pub(crate) fn word_mask(num_bits: u32) -> u64 {
    if num_bits >= 64 {
        u64::MAX
    } else {
        (1u64 << num_bits) - 1
    }
}

/// The converter's lookup tables: one quantized word and its data bit per sample.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleTable {
    words: Vec<u64>,
    actual: Vec<bool>,
}

impl SampleTable {
    /// Quantizes `samples` to `num_bits` words.
    pub fn from_samples(samples: impl IntoIterator<Item = FskSample>, num_bits: u32) -> Self {
        let (words, actual) = samples
            .into_iter()
            .map(|s| (quantize(s.value, num_bits), s.bit))
            .unzip();
        Self { words, actual }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Whether the table holds no samples.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Word at `index`. Indices past the end read the last entry.
    pub fn word(&self, index: u64) -> u64 {
        self.clamped(index).map_or(0, |i| self.words[i])
    }

    /// Data bit at `index`, clamped like [`word`](SampleTable::word).
    pub fn actual(&self, index: u64) -> bool {
        self.clamped(index).is_some_and(|i| self.actual[i])
    }

    /// Width of a register that can index every entry.
    pub fn index_width(&self) -> u32 {
        bits_to_hold(self.words.len().saturating_sub(1) as u64)
    }

    fn clamped(&self, index: u64) -> Option<usize> {
        let last = self.words.len().checked_sub(1)?;
        Some(usize::try_from(index).map_or(last, |i| i.min(last)))
    }
}
