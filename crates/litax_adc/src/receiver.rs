//! The device under test: an SPI master that reads one word per conversion.

use litax_common::LogicVec;
use litax_sim::TraceScope;

use crate::state::SpiState;

/// SPI receiver clocked on the rising edge.
///
/// It cycles through the transfer states unconditionally. Chip select and
/// the data-valid strobe are both high in the idle state; in data state `i`
/// the edge shifts `miso` into bit `i` of the word.
#[derive(Debug, Clone)]
pub struct SpiReceiver {
    num_bits: u32,
    state: SpiState,
    adc_data: u64,
}

impl SpiReceiver {
    /// Creates a receiver for `num_bits` words, in the idle state.
    pub fn new(num_bits: u32) -> Self {
        Self {
            num_bits,
            state: SpiState::Idle,
            adc_data: 0,
        }
    }

    /// Chip select to the converter.
    pub fn cs(&self) -> bool {
        self.state == SpiState::Idle
    }

    /// High while the word register holds a complete conversion.
    pub fn data_valid(&self) -> bool {
        self.cs()
    }

    /// Applies one rising clock edge with `miso` as seen before the edge.
    pub fn clock_edge(&mut self, miso: bool, reset: bool) {
        if reset {
            self.state = SpiState::Idle;
            self.adc_data = 0;
            return;
        }
        if let SpiState::Bit(i) = self.state {
            let mask = 1u64 << i;
            if miso {
                self.adc_data |= mask;
            } else {
                self.adc_data &= !mask;
            }
        }
        self.state = self.state.next(self.num_bits);
    }

    /// The received word.
    pub fn adc_data(&self) -> u64 {
        self.adc_data
    }

    /// Current transfer state.
    pub fn state(&self) -> SpiState {
        self.state
    }

    pub(crate) fn trace_scope(&self) -> TraceScope {
        TraceScope::new("dut")
            .var("miso", 1)
            .var("cs", 1)
            .var("sck", 1)
            .var("data_valid", 1)
            .var("adc_data", self.num_bits)
            .var("state", SpiState::code_width(self.num_bits))
    }

    pub(crate) fn sample(&self, miso: bool, sck: bool, out: &mut Vec<LogicVec>) {
        out.push(LogicVec::from_bool(miso));
        out.push(LogicVec::from_bool(self.cs()));
        out.push(LogicVec::from_bool(sck));
        out.push(LogicVec::from_bool(self.data_valid()));
        out.push(LogicVec::from_u64(self.adc_data, self.num_bits));
        out.push(LogicVec::from_u64(
            self.state.code(self.num_bits),
            SpiState::code_width(self.num_bits),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle_with_cs_high() {
        let rx = SpiReceiver::new(8);
        assert!(rx.cs());
        assert!(rx.data_valid());
        assert_eq!(rx.adc_data(), 0);
    }

    #[test]
    fn shifts_msb_first() {
        let mut rx = SpiReceiver::new(4);
        // idle, three waits, then 1 0 1 1
        for miso in [true, true, true, false, true, false, true, true] {
            rx.clock_edge(miso, false);
        }
        assert_eq!(rx.adc_data(), 0b1011);
        assert_eq!(rx.state(), SpiState::Idle);
        assert!(rx.data_valid());
    }

    #[test]
    fn cycle_is_bits_plus_four() {
        let mut rx = SpiReceiver::new(10);
        let mut edges = 0;
        loop {
            rx.clock_edge(false, false);
            edges += 1;
            if rx.data_valid() {
                break;
            }
        }
        assert_eq!(edges, 14);
    }

    #[test]
    fn ignores_miso_outside_data_states() {
        let mut rx = SpiReceiver::new(2);
        for _ in 0..4 {
            rx.clock_edge(true, false);
        }
        assert_eq!(rx.adc_data(), 0);
    }

    #[test]
    fn overwrites_previous_word() {
        let mut rx = SpiReceiver::new(2);
        for miso in [false, false, false, false, true, true] {
            rx.clock_edge(miso, false);
        }
        assert_eq!(rx.adc_data(), 0b11);
        for miso in [false, false, false, false, false, true] {
            rx.clock_edge(miso, false);
        }
        assert_eq!(rx.adc_data(), 0b01);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut rx = SpiReceiver::new(4);
        for _ in 0..6 {
            rx.clock_edge(true, false);
        }
        rx.clock_edge(true, true);
        assert_eq!(rx.state(), SpiState::Idle);
        assert_eq!(rx.adc_data(), 0);
    }
}
