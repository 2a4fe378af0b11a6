//! Subcommand implementations.

pub mod config;
pub mod inspect;
pub mod output;
pub mod parse;
pub mod template;

use std::path::Path;

use elfaktura_core::models::config::ElfakturaConfig;

/// Load the configuration from `--config`, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ElfakturaConfig> {
    if let Some(path) = config_path {
        return Ok(ElfakturaConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        Ok(ElfakturaConfig::from_file(&default_path)?)
    } else {
        Ok(ElfakturaConfig::default())
    }
}
