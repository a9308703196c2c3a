//! Config command - inspect and edit the persisted configuration

use crate::cli::style::{check, Stylize};
use autopr::config::{config_file_path, init_config, ConfigHandle, TerminalDriver};
use autopr::error::{Error, Result};
use autopr::workflow::{self, APP_ID};
use serde_json::Value;

/// What to do with the configuration
#[derive(Debug, Clone)]
pub enum ConfigAction {
    /// Print one value
    Get {
        /// Key to read
        key: String,
    },
    /// Persist one value
    Set {
        /// Key to write
        key: String,
        /// New value; parsed as JSON when possible, else taken as a string
        value: String,
    },
    /// Print the config file path
    Path,
    /// Print the whole resolved snapshot
    Show,
}

fn load() -> Result<ConfigHandle> {
    init_config(APP_ID, &workflow::config_schema(), None, &TerminalDriver)
}

/// Run the config command
pub fn run_config(action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => {
            // Path resolution needs no resolved snapshot (and must not prompt).
            println!("{}", config_file_path(APP_ID)?.display());
        }
        ConfigAction::Get { key } => {
            let config = load()?;
            let value = config
                .get(key)
                .ok_or_else(|| Error::UnknownConfigKey { key: key.clone() })?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = load()?;
            let parsed = serde_json::from_str::<Value>(value)
                .unwrap_or_else(|_| Value::String(value.clone()));
            config.set(key, parsed)?;
            println!(
                "{} {} saved to {}",
                check(),
                key.accent(),
                config.config_file_path().display().muted()
            );
        }
        ConfigAction::Show => {
            let config = load()?;
            println!("{}", serde_json::to_string_pretty(&config.snapshot())?);
        }
    }

    Ok(())
}
