//! Behavioral model of the SPI converter, clocked on the falling edge.
//!
//! It paces conversions with a free-running sample counter and serves the
//! word for the current sample index once chip select drops.

use litax_common::LogicVec;
use litax_sim::TraceScope;

use crate::fsk::SampleTable;
use crate::state::{bits_to_hold, SpiState};

/// Testbench-side converter: sample clock, table lookup and serializer.
#[derive(Debug, Clone)]
pub struct SpiAdcModel {
    num_bits: u32,
    cycles_per_sample: u32,
    table: SampleTable,
    index_mask: u64,
    sample_counter: u32,
    sample_idx: u64,
    adc_data: u64,
    actual: bool,
    state: SpiState,
    loaded: bool,
}

impl SpiAdcModel {
    /// Creates a converter serving `table` as `num_bits` words.
    pub fn new(num_bits: u32, cycles_per_sample: u32, table: SampleTable) -> Self {
        let index_mask = crate::fsk::word_mask(table.index_width());
        Self {
            num_bits,
            cycles_per_sample,
            table,
            index_mask,
            sample_counter: 0,
            sample_idx: 0,
            adc_data: 0,
            actual: false,
            state: SpiState::Idle,
            loaded: false,
        }
    }

    /// Serial data out, driven from the current state.
    ///
    /// High while the output is released, low for the null bit, then the
    /// word most significant bit first.
    pub fn miso(&self) -> bool {
        match self.state {
            SpiState::Idle | SpiState::Wait0 | SpiState::Wait1 => true,
            SpiState::Wait2 => false,
            SpiState::Bit(i) => (self.adc_data >> i) & 1 == 1,
        }
    }

    /// Applies one falling clock edge. `cs` is the chip select seen before the edge.
    pub fn clock_edge(&mut self, cs: bool, reset: bool) {
        if reset {
            self.sample_counter = 0;
            self.sample_idx = 0;
            self.adc_data = 0;
            self.actual = false;
            self.state = SpiState::Idle;
            self.loaded = false;
            return;
        }

        // every register update below reads pre-edge values
        if self.state == SpiState::Wait0 {
            self.adc_data = self.table.word(self.sample_idx);
            self.actual = self.table.actual(self.sample_idx);
            self.loaded = true;
        }

        if self.sample_counter >= self.cycles_per_sample {
            self.sample_counter = 0;
            self.sample_idx = (self.sample_idx + 1) & self.index_mask;
        } else {
            self.sample_counter += 1;
        }

        self.state = match self.state {
            SpiState::Idle if cs => SpiState::Idle,
            other => other.next(self.num_bits),
        };
    }

    /// The word currently being served.
    pub fn adc_data(&self) -> u64 {
        self.adc_data
    }

    /// Data bit of the sample currently being served.
    pub fn actual(&self) -> bool {
        self.actual
    }

    /// Index into the sample table.
    pub fn sample_idx(&self) -> u64 {
        self.sample_idx
    }

    /// Clocks since the last sample index advance.
    pub fn sample_counter(&self) -> u32 {
        self.sample_counter
    }

    /// Current transfer state.
    pub fn state(&self) -> SpiState {
        self.state
    }

    /// Whether a word has been loaded since the last reset.
    pub fn has_loaded(&self) -> bool {
        self.loaded
    }

    /// The sample table being served.
    pub fn table(&self) -> &SampleTable {
        &self.table
    }

    pub(crate) fn trace_scope(&self) -> TraceScope {
        TraceScope::new("tb")
            .var("miso", 1)
            .var("cs", 1)
            .var("adc_data", self.num_bits)
            .var("actual", 1)
            .var("sample_counter", bits_to_hold(u64::from(self.cycles_per_sample)))
            .var("sample_idx", self.table.index_width())
            .var("state", SpiState::code_width(self.num_bits))
    }

    pub(crate) fn sample(&self, cs: bool, out: &mut Vec<LogicVec>) {
        out.push(LogicVec::from_bool(self.miso()));
        out.push(LogicVec::from_bool(cs));
        out.push(LogicVec::from_u64(self.adc_data, self.num_bits));
        out.push(LogicVec::from_bool(self.actual));
        out.push(LogicVec::from_u64(
            u64::from(self.sample_counter),
            bits_to_hold(u64::from(self.cycles_per_sample)),
        ));
        out.push(LogicVec::from_u64(self.sample_idx, self.table.index_width()));
        out.push(LogicVec::from_u64(
            self.state.code(self.num_bits),
            SpiState::code_width(self.num_bits),
        ));
    }
}
