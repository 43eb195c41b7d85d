//! End-to-end runs of the stimulus loop through the public API.

use std::io::Read;

use litax_common::LogicVec;
use litax_sim::{
    simulate, SimConfig, SimError, SimModel, TestbenchConfig, TraceConfig, TraceScope,
    WaveformOutputFormat,
};

/// A 4-bit counter with synchronous reset that requests `$finish` at `limit`.
struct Counter {
    clk: bool,
    rst: bool,
    prev_clk: bool,
    count: u64,
    limit: Option<u64>,
    finished: bool,
}

impl Counter {
    fn new(limit: Option<u64>) -> Self {
        Self {
            clk: false,
            rst: false,
            prev_clk: false,
            count: 0,
            limit,
            finished: false,
        }
    }
}

impl SimModel for Counter {
    fn name(&self) -> &str {
        "counter"
    }

    fn set_clock(&mut self, level: bool) {
        self.clk = level;
    }

    fn set_reset(&mut self, level: bool) {
        self.rst = level;
    }

    fn clock(&self) -> bool {
        self.clk
    }

    fn eval(&mut self) -> Result<(), SimError> {
        if self.clk && !self.prev_clk {
            self.count = if self.rst { 0 } else { (self.count + 1) & 0xf };
            if Some(self.count) == self.limit {
                self.finished = true;
            }
        }
        self.prev_clk = self.clk;
        Ok(())
    }

    fn got_finish(&self) -> bool {
        self.finished
    }

    fn trace_scope(&self) -> TraceScope {
        TraceScope::new("TOP")
            .var("clk", 1)
            .var("rst", 1)
            .child(TraceScope::new("counter").var("count", 4))
    }

    fn sample(&self, out: &mut Vec<LogicVec>) {
        out.push(LogicVec::from_bool(self.clk));
        out.push(LogicVec::from_bool(self.rst));
        out.push(LogicVec::from_u64(self.count, 4));
    }
}

fn config(path: std::path::PathBuf, format: WaveformOutputFormat, levels: u32) -> SimConfig {
    SimConfig {
        testbench: TestbenchConfig {
            max_ticks: 40,
            reset_release_tick: 5,
        },
        trace: Some(TraceConfig {
            path,
            format,
            levels,
            timescale: Default::default(),
        }),
    }
}

#[test]
fn counter_counts_after_reset_release() {
    let mut counter = Counter::new(None);
    let result = simulate(&mut counter, &SimConfig::default()).unwrap();
    assert_eq!(result.run.ticks, 200_000);
    // rising edges at ticks 0, 2, 4 are under reset; 6, 8, ... count
    let counted = result.run.cycles - 3;
    assert_eq!(counter.count, counted & 0xf);
}

#[test]
fn model_finish_ends_run_early() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("finish.vcd");
    let mut counter = Counter::new(Some(3));
    let result = simulate(&mut counter, &config(path.clone(), WaveformOutputFormat::Vcd, 99)).unwrap();

    assert!(result.run.finished_by_model);
    // third counting edge is tick index 10, so 11 ticks ran
    assert_eq!(result.run.ticks, 11);

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("$scope module counter $end"));
    assert!(text.contains("b0011 #"));
    assert!(!text.contains("#12"));
}

#[test]
fn gzip_trace_with_pruned_levels() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("dump.vcd.gz");
    let mut counter = Counter::new(None);
    simulate(&mut counter, &config(path.clone(), WaveformOutputFormat::VcdGz, 1)).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    let mut text = String::new();
    flate2::read::GzDecoder::new(bytes.as_slice())
        .read_to_string(&mut text)
        .unwrap();
    assert!(text.contains("$var wire 1 ! clk $end"));
    assert!(text.contains("$var wire 1 \" rst $end"));
    assert!(!text.contains("count"));
    assert!(text.contains("#40\n"));
}

#[test]
fn zero_ticks_writes_header_only() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("empty.vcd");
    let mut sim = config(path.clone(), WaveformOutputFormat::Vcd, 99);
    sim.testbench.max_ticks = 0;
    let mut counter = Counter::new(None);
    let result = simulate(&mut counter, &sim).unwrap();
    assert_eq!(result.run.ticks, 0);
    assert_eq!(result.run.cycles, 0);

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("$scope module TOP $end"));
    assert!(text.contains("$var wire 4 # count [3:0] $end"));
    assert!(text.trim_end().ends_with("$enddefinitions $end"));
    assert!(!text.contains("$dumpvars"));
    assert!(!text.lines().any(|line| line.starts_with('#')));
}

#[test]
fn initial_values_section_is_closed() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("dump.vcd");
    let mut counter = Counter::new(None);
    simulate(&mut counter, &config(path.clone(), WaveformOutputFormat::Vcd, 99)).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let body = text.split("$enddefinitions $end\n").nth(1).unwrap();
    assert!(body.starts_with("#1\n$dumpvars\n1!\n1\"\nb0000 #\n$end\n#2\n"));
    assert_eq!(text.matches("$dumpvars").count(), 1);
}
