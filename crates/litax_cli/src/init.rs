//! `litax init`: write a default `litax.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use litax_config::CONFIG_FILE_NAME;

use crate::GlobalArgs;

/// Runs the `litax init` command.
///
/// Creates `dir` if needed and writes a commented `litax.toml` holding the
/// stock bench settings. Refuses to overwrite an existing file.
pub fn run(dir: Option<&Path>, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let dir = match dir {
        Some(d) => d.to_path_buf(),
        None => std::env::current_dir()?,
    };
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() {
        return Err(format!("{} already exists", path.display()).into());
    }
    fs::create_dir_all(&dir)?;

    let name = project_name(&dir);
    fs::write(&path, default_config(&name))?;
    if !global.quiet {
        eprintln!("     Created {}", path.display());
    }
    Ok(0)
}

fn project_name(dir: &Path) -> String {
    let dir = if dir.as_os_str().is_empty() || dir == Path::new(".") {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    } else {
        dir.to_path_buf()
    };
    dir.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("litax")
        .to_string()
}

fn default_config(name: &str) -> String {
    format!(
        r#"[project]
name = "{name}"
top = "adc_tb_top"

[clock]
frequency = "6MHz"

[reset]
release_tick = 5

[run]
# Defaults to one whole FSK burst: 2 * bits * clock / baud.
# ticks = 200000

[trace]
enabled = true
path = "logs/vlt_dump.vcd"
format = "vcd"
levels = 99
timescale = "1ps"

[adc]
num_bits = 10

[modem]
bits = 20
baud = 1200
mark = "1200Hz"
space = "2200Hz"
# seed = 1
"#
    )
}
