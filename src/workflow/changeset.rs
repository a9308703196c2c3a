//! Opaque changeset payloads
//!
//! The workflow does not interpret changesets; it hands the working tree to
//! the payload and lets it mutate the files. The shipped implementations
//! apply unified diffs through `git apply`.

use crate::error::Result;
use crate::git::GitWorkspace;
use async_trait::async_trait;
use std::path::PathBuf;

/// A change to apply to a freshly checked-out working tree
#[async_trait]
pub trait ChangeSet: Send + Sync {
    /// Short human-readable description (used in logs)
    fn describe(&self) -> String;

    /// Apply the change to the working tree
    async fn apply(&self, workspace: &GitWorkspace) -> Result<()>;
}

/// A unified diff stored in a file on disk
#[derive(Debug, Clone)]
pub struct PatchFile {
    path: PathBuf,
}

impl PatchFile {
    /// Wrap a patch file path
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl ChangeSet for PatchFile {
    fn describe(&self) -> String {
        format!("patch file {}", self.path.display())
    }

    async fn apply(&self, workspace: &GitWorkspace) -> Result<()> {
        workspace.apply_patch(&self.path).await
    }
}

/// A unified diff held in memory (HTTP payloads)
#[derive(Debug, Clone)]
pub struct InlinePatch {
    diff: String,
}

impl InlinePatch {
    /// Wrap a unified diff string
    pub fn new(diff: String) -> Self {
        Self { diff }
    }
}

#[async_trait]
impl ChangeSet for InlinePatch {
    fn describe(&self) -> String {
        format!("inline patch ({} bytes)", self.diff.len())
    }

    async fn apply(&self, workspace: &GitWorkspace) -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        std::io::Write::write_all(&mut file, self.diff.as_bytes())?;
        workspace.apply_patch(file.path()).await
    }
}
