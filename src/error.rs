//! Error types for autopr
//!
//! One crate-wide error enum. Fatal configuration conditions get their own
//! variants so callers can branch on the kind.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the crate error
pub type Result<T> = std::result::Result<T, Error>;

/// All errors that can occur in autopr
#[derive(Debug, Error)]
pub enum Error {
    /// No per-user configuration root could be determined (missing HOME/profile)
    #[error("could not determine a per-user configuration directory")]
    ConfigDirUnavailable,

    /// An interactive prompt was cancelled, leaving a required value empty
    #[error("configuration incomplete: no value provided for '{key}'")]
    ConfigIncomplete {
        /// The key that is still missing a value
        key: String,
    },

    /// `set` was called with a key not present in the original schema
    #[error("unknown config key '{key}'")]
    UnknownConfigKey {
        /// The rejected key
        key: String,
    },

    /// Writing the persisted config file failed
    #[error("failed to write config file {path}: {source}")]
    ConfigPersist {
        /// Path of the file that could not be written
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Authentication failed or no credentials were found
    #[error("authentication error: {0}")]
    Auth(String),

    /// GitHub API returned an error
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// A git subprocess exited with a failure status
    #[error("git {command} failed: {stderr}")]
    Git {
        /// The git subcommand that failed
        command: String,
        /// Captured stderr from the subprocess
        stderr: String,
    },

    /// The changeset could not be applied to the working tree
    #[error("changeset could not be applied: {0}")]
    Changeset(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        Self::GitHubApi(err.to_string())
    }
}
