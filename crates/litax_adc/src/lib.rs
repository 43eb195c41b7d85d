//! Cycle model of an SPI ADC readout bench.
//!
//! A behavioral converter ([`SpiAdcModel`]) serves a phase-continuous FSK
//! burst, one quantized sample per conversion, to an SPI receiver
//! ([`SpiReceiver`]). [`AdcTbTop`] wires the two together behind
//! [`litax_sim::SimModel`] and checks every received word on a
//! [`Scoreboard`].

#![warn(missing_docs)]

pub mod error;
pub mod fsk;
pub mod receiver;
pub mod scoreboard;
pub mod spi_adc;
pub mod state;
pub mod top;

pub use error::AdcError;
pub use fsk::{
    quantize, random_bits, FskParams, FskSample, Modulator, SampleTable, MAX_BURST_SAMPLES,
};
pub use receiver::SpiReceiver;
pub use scoreboard::{Mismatch, Scoreboard};
pub use spi_adc::SpiAdcModel;
pub use state::SpiState;
pub use top::{AdcBenchParams, AdcTbTop};
