//! Packed multi-bit signal values.

use crate::logic::Logic;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A vector of [`Logic`] values, bit 0 being the least significant.
///
/// Each value takes 2 bits of storage, so one `u64` word holds 32 of them.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LogicVec {
    width: u32,
    data: Vec<u64>,
}

const VALUES_PER_WORD: u32 = 32;

impl LogicVec {
    /// Creates an all-`Zero` vector of the given width.
    pub fn new(width: u32) -> Self {
        Self {
            width,
            data: vec![0; word_count(width)],
        }
    }

    /// Creates an all-`X` vector of the given width.
    pub fn all_x(width: u32) -> Self {
        let mut v = Self::new(width);
        for i in 0..width {
            v.set(i, Logic::X);
        }
        v
    }

    /// Number of bits.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Reads bit `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn get(&self, index: u32) -> Logic {
        assert!(
            index < self.width,
            "index {index} out of bounds for width {}",
            self.width
        );
        let word = (index / VALUES_PER_WORD) as usize;
        let shift = (index % VALUES_PER_WORD) * 2;
        match (self.data[word] >> shift) & 0b11 {
            0 => Logic::Zero,
            1 => Logic::One,
            2 => Logic::X,
            _ => Logic::Z,
        }
    }

    /// Writes bit `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.width()`.
    pub fn set(&mut self, index: u32, value: Logic) {
        assert!(
            index < self.width,
            "index {index} out of bounds for width {}",
            self.width
        );
        let word = (index / VALUES_PER_WORD) as usize;
        let shift = (index % VALUES_PER_WORD) * 2;
        let mask = !(0b11u64 << shift);
        self.data[word] = (self.data[word] & mask) | ((value as u64) << shift);
    }

    /// Creates a 1-bit vector.
    pub fn from_bool(value: bool) -> Self {
        let mut v = Self::new(1);
        v.set(0, Logic::from(value));
        v
    }

    /// Creates a vector from the low `width` bits of `value`.
    pub fn from_u64(value: u64, width: u32) -> Self {
        let mut v = Self::new(width);
        for i in 0..width.min(64) {
            if (value >> i) & 1 != 0 {
                v.set(i, Logic::One);
            }
        }
        v
    }

    /// Iterates bits from the most significant down to bit 0.
    pub fn iter_msb_first(&self) -> impl Iterator<Item = Logic> + '_ {
        (0..self.width).rev().map(move |i| self.get(i))
    }
}

impl fmt::Display for LogicVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter_msb_first() {
            write!(f, "{bit}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for LogicVec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LogicVec({self})")
    }
}

fn word_count(width: u32) -> usize {
    width.div_ceil(VALUES_PER_WORD) as usize
}
