//! Value types shared by the litax testbench crates.
//!
//! Provides 4-state logic values, packed logic vectors used for traced signal
//! values, and frequency values parsed from configuration strings.

#![warn(missing_docs)]

pub mod frequency;
pub mod logic;
pub mod logic_vec;

pub use frequency::{Frequency, ParseFrequencyError};
pub use logic::Logic;
pub use logic_vec::LogicVec;
