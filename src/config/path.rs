//! Config file path resolution
//!
//! Computes the per-user location of an application's persisted config file
//! and makes sure the containing directory exists.

use crate::error::{Error, Result};
use std::fs;
use std::path::PathBuf;

/// File name of the persisted snapshot inside the app's config directory
const CONFIG_FILE_NAME: &str = "config.json";

/// Resolve the config file path for an application identity.
///
/// Uses the platform-conventional per-user config root (roaming AppData on
/// Windows, Application Support on macOS, XDG config dir or `~/.config` on
/// other Unix), with `app_id` as the final directory component. Intermediate
/// directories are created; calling this repeatedly is safe.
pub fn config_file_path(app_id: &str) -> Result<PathBuf> {
    let root = dirs::config_dir().ok_or(Error::ConfigDirUnavailable)?;
    let dir = root.join(app_id);
    fs::create_dir_all(&dir)?;
    Ok(dir.join(CONFIG_FILE_NAME))
}
