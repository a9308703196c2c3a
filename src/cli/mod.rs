//! CLI commands
//!
//! Command implementations for the `autopr` binary.

mod auth;
mod config;
mod run;
mod serve;
mod style;

pub use auth::run_auth;
pub use config::{run_config, ConfigAction};
pub use run::{run_pr, RunOptions};
pub use serve::run_serve;
