//! `adc_tb_top`: the receiver wired to the converter model.
//!
//! The receiver runs on the rising edge of `sys_clk` and the converter on
//! the falling edge, sharing the synchronous `sys_rst`. Whenever the receiver
//! signals a complete word, the top registers it and the scoreboard checks it.

use litax_common::{Frequency, LogicVec};
use litax_sim::{SimError, SimModel, TraceScope};
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::error::AdcError;
use crate::fsk::{random_bits, FskParams, Modulator, SampleTable};
use crate::receiver::SpiReceiver;
use crate::scoreboard::Scoreboard;
use crate::spi_adc::SpiAdcModel;

/// Parameters of the ADC bench.
#[derive(Clone, Debug, PartialEq)]
pub struct AdcBenchParams {
    /// Name of the top-level module.
    pub top: String,
    /// ADC word width.
    pub num_bits: u32,
    /// FSK data bits in the burst.
    pub bits: usize,
    /// System clock.
    pub clock: Frequency,
    /// Symbol rate.
    pub baud: f64,
    /// Tone for a `1` bit.
    pub mark: Frequency,
    /// Tone for a `0` bit.
    pub space: Frequency,
    /// Seed for the data bits. A fresh one is drawn when `None`.
    pub seed: Option<u64>,
}

impl Default for AdcBenchParams {
    fn default() -> Self {
        Self {
            top: "adc_tb_top".to_string(),
            num_bits: 10,
            bits: 20,
            clock: Frequency::new(6e6),
            baud: 1200.0,
            mark: Frequency::new(1200.0),
            space: Frequency::new(2200.0),
            seed: None,
        }
    }
}

impl AdcBenchParams {
    /// System clocks per conversion, including the three wait states.
    pub fn cycles_per_sample(&self) -> u32 {
        self.num_bits + 3
    }
}

/// The complete bench model.
#[derive(Debug, Clone)]
pub struct AdcTbTop {
    name: String,
    num_bits: u32,
    seed: u64,
    bits: Vec<bool>,
    sys_clk: bool,
    sys_rst: bool,
    prev_clk: bool,
    cycles: u64,
    adc_data: u64,
    tb: SpiAdcModel,
    dut: SpiReceiver,
    scoreboard: Scoreboard,
}

impl AdcTbTop {
    /// Generates the FSK burst and builds the bench around it.
    pub fn new(params: &AdcBenchParams) -> Result<Self, AdcError> {
        if !(2..=32).contains(&params.num_bits) {
            return Err(AdcError::InvalidWidth(params.num_bits));
        }
        let seed = match params.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::random();
                info!("drew FSK seed {seed}");
                seed
            }
        };
        let fsk = FskParams {
            clock: params.clock,
            baud: params.baud,
            mark: params.mark,
            space: params.space,
            cycles_per_sample: params.cycles_per_sample(),
        };
        fsk.burst_samples(params.bits)?;
        let bits = random_bits(&mut StdRng::seed_from_u64(seed), params.bits);

        let table = SampleTable::from_samples(Modulator::new(fsk, &bits)?, params.num_bits);
        debug!(
            "FSK burst: {} bits, {} samples at {:.1} Hz ({} per baud)",
            bits.len(),
            table.len(),
            fsk.sample_hz(),
            fsk.samples_per_baud()
        );

        Ok(Self::with_table(params, seed, bits, table))
    }

    /// Builds the bench around a prepared sample table.
    pub fn with_table(
        params: &AdcBenchParams,
        seed: u64,
        bits: Vec<bool>,
        table: SampleTable,
    ) -> Self {
        Self {
            name: params.top.clone(),
            num_bits: params.num_bits,
            seed,
            bits,
            sys_clk: false,
            sys_rst: false,
            prev_clk: false,
            cycles: 0,
            adc_data: 0,
            tb: SpiAdcModel::new(params.num_bits, params.cycles_per_sample(), table),
            dut: SpiReceiver::new(params.num_bits),
            scoreboard: Scoreboard::new(),
        }
    }

    /// Seed the data bits were drawn from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The data bits of the burst.
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    /// Word latched by the top on the last valid edge.
    pub fn adc_data(&self) -> u64 {
        self.adc_data
    }

    /// Data-valid output.
    pub fn data_valid(&self) -> bool {
        self.dut.data_valid()
    }

    /// Rising edges seen so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// The converter model.
    pub fn tb(&self) -> &SpiAdcModel {
        &self.tb
    }

    /// The receiver.
    pub fn dut(&self) -> &SpiReceiver {
        &self.dut
    }

    /// Capture results.
    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    fn rising_edge(&mut self) {
        self.cycles += 1;
        let miso = self.tb.miso();
        let valid = self.dut.data_valid();
        let received = self.dut.adc_data();

        self.dut.clock_edge(miso, self.sys_rst);
        if self.sys_rst {
            self.adc_data = 0;
        } else if valid {
            self.adc_data = received;
            let expected = self.tb.has_loaded().then(|| self.tb.adc_data());
            self.scoreboard
                .record(self.cycles, self.tb.sample_idx(), expected, received);
            if expected.is_some_and(|e| e != received) {
                debug!(
                    "cycle {}: captured {received:#x}, converter sent {:#x}",
                    self.cycles,
                    self.tb.adc_data()
                );
            }
        }
    }

    fn falling_edge(&mut self) {
        let cs = self.dut.cs();
        self.tb.clock_edge(cs, self.sys_rst);
    }
}

impl SimModel for AdcTbTop {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_clock(&mut self, level: bool) {
        self.sys_clk = level;
    }

    fn set_reset(&mut self, level: bool) {
        self.sys_rst = level;
    }

    fn clock(&self) -> bool {
        self.sys_clk
    }

    fn eval(&mut self) -> Result<(), SimError> {
        match (self.prev_clk, self.sys_clk) {
            (false, true) => self.rising_edge(),
            (true, false) => self.falling_edge(),
            _ => {}
        }
        self.prev_clk = self.sys_clk;
        Ok(())
    }

    fn trace_scope(&self) -> TraceScope {
        let ports = |scope: TraceScope| {
            scope
                .var("sys_clk", 1)
                .var("sys_rst", 1)
                .var("data_valid", 1)
                .var("adc_data", self.num_bits)
        };
        ports(TraceScope::new("TOP")).child(
            ports(TraceScope::new(self.name.clone()))
                .child(self.tb.trace_scope())
                .child(self.dut.trace_scope()),
        )
    }

    fn sample(&self, out: &mut Vec<LogicVec>) {
        for _ in 0..2 {
            out.push(LogicVec::from_bool(self.sys_clk));
            out.push(LogicVec::from_bool(self.sys_rst));
            out.push(LogicVec::from_bool(self.dut.data_valid()));
            out.push(LogicVec::from_u64(self.adc_data, self.num_bits));
        }
        self.tb.sample(self.dut.cs(), out);
        self.dut.sample(self.tb.miso(), self.sys_clk, out);
    }

    fn finalize(&mut self) {
        let sb = &self.scoreboard;
        if sb.passed() {
            info!(
                "scoreboard: {} words checked, all matched ({} before first conversion)",
                sb.checked(),
                sb.skipped()
            );
        } else {
            warn!(
                "scoreboard: {} of {} words mismatched",
                sb.mismatches().len(),
                sb.checked()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fsk::{quantize, FskSample};
    use crate::state::SpiState;
    use litax_sim::{simulate, SimConfig, TestbenchConfig, TraceConfig, WaveformOutputFormat};

    fn params(seed: u64) -> AdcBenchParams {
        AdcBenchParams {
            seed: Some(seed),
            ..AdcBenchParams::default()
        }
    }

    fn run(top: &mut AdcTbTop, max_ticks: u64) {
        let config = SimConfig {
            testbench: TestbenchConfig {
                max_ticks,
                reset_release_tick: 5,
            },
            trace: None,
        };
        simulate(top, &config).unwrap();
    }

    #[test]
    fn stock_burst_shape() {
        let top = AdcTbTop::new(&params(1)).unwrap();
        assert_eq!(top.seed(), 1);
        assert_eq!(top.bits().len(), 20);
        assert_eq!(top.tb().table().len(), 7680);
        assert_eq!(top.name(), "adc_tb_top");
    }

    #[test]
    fn same_seed_same_burst() {
        let a = AdcTbTop::new(&params(5)).unwrap();
        let b = AdcTbTop::new(&params(5)).unwrap();
        assert_eq!(a.bits(), b.bits());
        assert_eq!(a.tb().table(), b.tb().table());
    }

    #[test]
    fn rejects_bad_width() {
        let p = AdcBenchParams {
            num_bits: 1,
            ..params(0)
        };
        assert_eq!(AdcTbTop::new(&p).unwrap_err(), AdcError::InvalidWidth(1));
    }

    #[test]
    fn conversions_arrive_bit_exact() {
        let mut top = AdcTbTop::new(&params(11)).unwrap();
        run(&mut top, 20_000);
        let sb = top.scoreboard();
        assert!(sb.passed(), "{:?}", &sb.mismatches()[..sb.mismatches().len().min(3)]);
        // 10_000 cycles, 3 under reset, one word per 14 cycles
        assert!(sb.checked() >= 700, "checked {}", sb.checked());
        assert_eq!(sb.skipped(), 1);
    }

    #[test]
    fn one_conversion_per_fourteen_cycles() {
        let table = SampleTable::from_samples(
            (0..64).map(|i| FskSample {
                bit: i % 2 == 0,
                value: f64::from(i) / 64.0,
            }),
            10,
        );
        let p = params(0);
        let mut top = AdcTbTop::with_table(&p, 0, vec![true], table);
        // the first capture (nothing served yet) is at tick 6, then one every 28 ticks
        run(&mut top, 7 + 2 * 14 * 3);
        let sb = top.scoreboard();
        assert!(sb.passed());
        assert_eq!(sb.skipped(), 1);
        assert_eq!(sb.checked(), 3);
    }

    #[test]
    fn captured_word_matches_table_entry() {
        let table = SampleTable::from_samples(
            (0..8).map(|_| FskSample {
                bit: true,
                value: 0.25,
            }),
            10,
        );
        let mut top = AdcTbTop::with_table(&params(0), 0, vec![true], table);
        run(&mut top, 6 + 2 * 14 * 2);
        assert_eq!(top.adc_data(), quantize(0.25, 10));
        assert_eq!(top.adc_data(), 127);
    }

    #[test]
    fn oversized_burst_rejected_before_drawing_bits() {
        let bench = AdcBenchParams {
            clock: Frequency::new(1e300),
            bits: usize::MAX,
            ..params(1)
        };
        let err = AdcTbTop::new(&bench).unwrap_err();
        assert!(matches!(err, AdcError::BurstTooLong { .. }));
    }

    #[test]
    fn reset_holds_everything_idle() {
        let mut top = AdcTbTop::new(&params(2)).unwrap();
        let config = SimConfig {
            testbench: TestbenchConfig {
                max_ticks: 40,
                reset_release_tick: 1_000,
            },
            trace: None,
        };
        simulate(&mut top, &config).unwrap();
        assert_eq!(top.dut().state(), SpiState::Idle);
        assert_eq!(top.tb().state(), SpiState::Idle);
        assert_eq!(top.tb().sample_counter(), 0);
        assert_eq!(top.scoreboard().checked() + top.scoreboard().skipped(), 0);
    }

    #[test]
    fn sample_matches_trace_scope() {
        let top = AdcTbTop::new(&params(3)).unwrap();
        let scope = top.trace_scope();
        assert_eq!(scope.name, "TOP");
        assert_eq!(scope.children[0].name, "adc_tb_top");
        let names: Vec<_> = scope.children[0]
            .children
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["tb", "dut"]);

        let mut out = Vec::new();
        top.sample(&mut out);
        assert_eq!(out.len(), scope.signal_count());
    }

    #[test]
    fn writes_hierarchical_vcd() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("logs").join("vlt_dump.vcd");
        let mut top = AdcTbTop::new(&params(4)).unwrap();
        let config = SimConfig {
            testbench: TestbenchConfig {
                max_ticks: 200,
                reset_release_tick: 5,
            },
            trace: Some(TraceConfig {
                path: path.clone(),
                format: WaveformOutputFormat::Vcd,
                levels: 99,
                timescale: Default::default(),
            }),
        };
        simulate(&mut top, &config).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("$scope module TOP $end"));
        assert!(text.contains("$scope module adc_tb_top $end"));
        assert!(text.contains("$scope module tb $end"));
        assert!(text.contains("$scope module dut $end"));
        assert!(text.contains("$var wire 4 "));
        assert!(text.contains("sample_idx [12:0] $end"));
        assert!(text.contains("#200\n"));
    }
}
