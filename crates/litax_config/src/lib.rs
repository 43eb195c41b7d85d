//! Parsing and validation of `litax.toml` testbench configuration files.
//!
//! This crate reads the configuration file into a [`BenchConfig`], checks it,
//! and resolves it into a [`ResolvedBench`] with parsed frequencies, the
//! trace settings and the tick count the run will use.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::{resolve_bench, ResolvedBench, ResolvedTrace};
pub use types::*;
