//! Subcommands of the `utilx` binary.

pub mod batch;
pub mod config;
pub mod process;
pub mod providers;

use std::path::Path;

use utilx_core::UtilxConfig;

/// Load the configuration named by `-c`, or the defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<UtilxConfig> {
    Ok(match config_path {
        Some(path) => UtilxConfig::from_file(Path::new(path))?,
        None => UtilxConfig::default(),
    })
}
