//! autopr - automated pull request creation
//!
//! Clones a revision, creates a uniquely-named branch, applies an opaque
//! changeset, commits, pushes, and opens a labeled pull request. The
//! behavior of every run is driven by the layered configuration engine in
//! [`config`]: schema defaults, a persisted per-user file, environment
//! variables, explicit overrides, and interactive prompts are merged into
//! one snapshot with deterministic precedence.

pub mod auth;
pub mod config;
pub mod error;
pub mod git;
pub mod platform;
pub mod server;
pub mod types;
pub mod workflow;
