//! Handles settings for the application. Configuration is read from
//! `config/dividi.toml` (optional), then `DIVIDI_*` environment variables,
//! then command-line flags.
use serde::Deserialize;

use crate::{cli::Cli, error::Result};

const DEFAULT_CONFIG_PATH: &str = "config/dividi";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Directory holding the `appState` and `savedStates` records.
    pub data_dir: String,
    /// Log level for `dividi` and `engine` targets.
    pub level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            level: "warn".to_string(),
        }
    }
}

impl Settings {
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = cli.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let mut settings: Settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(cli.config.is_some()))
            .add_source(config::Environment::with_prefix("DIVIDI"))
            .build()?
            .try_deserialize()?;

        if let Some(data_dir) = &cli.data_dir {
            settings.data_dir = data_dir.clone();
        }
        if let Some(level) = &cli.level {
            settings.level = level.clone();
        }

        Ok(settings)
    }
}
