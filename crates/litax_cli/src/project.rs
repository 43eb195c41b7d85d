//! Locating and loading the bench configuration.

use std::path::{Path, PathBuf};

use litax_config::{BenchConfig, CONFIG_FILE_NAME};
use log::{debug, info};

use crate::GlobalArgs;

/// Loads the configuration selected by the global flags.
///
/// `--config` may name a file or a directory holding `litax.toml`; it must
/// exist. Without it, `litax.toml` in the current directory is used when
/// present, and the built-in defaults otherwise. Also returns the directory
/// relative paths in the configuration are anchored to.
pub fn load_bench_config(
    global: &GlobalArgs,
) -> Result<(BenchConfig, PathBuf), Box<dyn std::error::Error>> {
    match &global.config {
        Some(path) => {
            let (file, root) = config_file_location(path)?;
            info!("using {}", file.display());
            Ok((litax_config::load_config_file(&file)?, root))
        }
        None => {
            let cwd = std::env::current_dir()?;
            load_from_dir_or_default(&cwd)
        }
    }
}

/// Loads `<dir>/litax.toml` if it exists, defaults otherwise.
pub fn load_from_dir_or_default(
    dir: &Path,
) -> Result<(BenchConfig, PathBuf), Box<dyn std::error::Error>> {
    let file = dir.join(CONFIG_FILE_NAME);
    if file.is_file() {
        info!("using {}", file.display());
        Ok((litax_config::load_config(dir)?, dir.to_path_buf()))
    } else {
        debug!("no {CONFIG_FILE_NAME} in {}, using defaults", dir.display());
        Ok((BenchConfig::default(), dir.to_path_buf()))
    }
}

/// Resolves `--config` to the file to read and its directory.
fn config_file_location(path: &Path) -> Result<(PathBuf, PathBuf), Box<dyn std::error::Error>> {
    if path.is_dir() {
        let file = path.join(CONFIG_FILE_NAME);
        if !file.is_file() {
            return Err(format!("no {CONFIG_FILE_NAME} in {}", path.display()).into());
        }
        Ok((file, path.to_path_buf()))
    } else if path.is_file() {
        let root = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok((path.to_path_buf(), root))
    } else {
        Err(format!("configuration '{}' does not exist", path.display()).into())
    }
}
