//! Configuration types deserialized from `litax.toml`.
//!
//! Every section is optional; a missing section takes the stock testbench
//! values (a 10-bit ADC fed 20 random FSK bits at 1200 baud from a 6 MHz clock).

use serde::Deserialize;

/// The top-level configuration parsed from `litax.toml`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct BenchConfig {
    /// Project metadata.
    #[serde(default)]
    pub project: ProjectMeta,
    /// System clock.
    #[serde(default)]
    pub clock: ClockConfig,
    /// Reset timing.
    #[serde(default)]
    pub reset: ResetConfig,
    /// Loop length.
    #[serde(default)]
    pub run: RunConfig,
    /// Waveform output.
    #[serde(default)]
    pub trace: TraceSection,
    /// ADC word size.
    #[serde(default)]
    pub adc: AdcConfig,
    /// FSK stimulus.
    #[serde(default)]
    pub modem: ModemConfig,
}

/// Project metadata.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProjectMeta {
    /// The project name.
    #[serde(default = "default_project_name")]
    pub name: String,
    /// Name of the top-level module, also the second trace scope.
    #[serde(default = "default_top")]
    pub top: String,
}

impl Default for ProjectMeta {
    fn default() -> Self {
        Self {
            name: default_project_name(),
            top: default_top(),
        }
    }
}

/// The system clock driving the whole design.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ClockConfig {
    /// Frequency as a string (e.g. `"6MHz"`), parsed to [`Frequency`](litax_common::Frequency).
    #[serde(default = "default_clock_frequency")]
    pub frequency: String,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            frequency: default_clock_frequency(),
        }
    }
}

/// When the synchronous reset is released.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ResetConfig {
    /// Tick index at which reset is deasserted.
    #[serde(default = "default_release_tick")]
    pub release_tick: u64,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            release_tick: default_release_tick(),
        }
    }
}

/// Loop length.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RunConfig {
    /// Clock toggles to run. When unset, the run covers one full FSK burst.
    pub ticks: Option<u64>,
}

/// The `[trace]` section.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TraceSection {
    /// Whether a waveform is written at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Output path, relative to the configuration file's directory.
    #[serde(default = "default_trace_path")]
    pub path: String,
    /// Output format.
    #[serde(default)]
    pub format: TraceFormat,
    /// Hierarchy depth to trace. The top scope is level 1.
    #[serde(default = "default_levels")]
    pub levels: u32,
    /// Duration of one tick, e.g. `"1ps"` or `"10ns"`.
    #[serde(default = "default_timescale")]
    pub timescale: String,
}

impl Default for TraceSection {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_trace_path(),
            format: TraceFormat::default(),
            levels: default_levels(),
            timescale: default_timescale(),
        }
    }
}

/// Waveform file format.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TraceFormat {
    /// Value Change Dump text (default).
    #[default]
    Vcd,
    /// Gzip-compressed VCD.
    VcdGz,
}

/// ADC converter settings.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AdcConfig {
    /// Width of a converted sample in bits.
    #[serde(default = "default_num_bits")]
    pub num_bits: u32,
}

impl Default for AdcConfig {
    fn default() -> Self {
        Self {
            num_bits: default_num_bits(),
        }
    }
}

/// The FSK signal fed to the ADC.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModemConfig {
    /// Number of random data bits in the burst.
    #[serde(default = "default_bits")]
    pub bits: usize,
    /// Symbol rate in bits per second.
    #[serde(default = "default_baud")]
    pub baud: u32,
    /// Tone for a `1` bit.
    #[serde(default = "default_mark")]
    pub mark: String,
    /// Tone for a `0` bit.
    #[serde(default = "default_space")]
    pub space: String,
    /// Seed for the data bits. A fresh seed is drawn when unset.
    pub seed: Option<u64>,
}

impl Default for ModemConfig {
    fn default() -> Self {
        Self {
            bits: default_bits(),
            baud: default_baud(),
            mark: default_mark(),
            space: default_space(),
            seed: None,
        }
    }
}

fn default_project_name() -> String {
    "litax".to_string()
}

fn default_top() -> String {
    "adc_tb_top".to_string()
}

fn default_clock_frequency() -> String {
    "6MHz".to_string()
}

fn default_release_tick() -> u64 {
    5
}

fn default_true() -> bool {
    true
}

fn default_trace_path() -> String {
    "logs/vlt_dump.vcd".to_string()
}

fn default_levels() -> u32 {
    99
}

fn default_timescale() -> String {
    "1ps".to_string()
}

fn default_num_bits() -> u32 {
    10
}

fn default_bits() -> usize {
    20
}

fn default_baud() -> u32 {
    1200
}

fn default_mark() -> String {
    "1200Hz".to_string()
}

fn default_space() -> String {
    "2200Hz".to_string()
}
