//! Git shell invocations
//!
//! Thin wrapper over the `git` binary for the handful of operations the
//! workflow needs: clone, branch, apply, commit, push. Protocol internals
//! stay in git itself.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// A checked-out working tree driven through the `git` binary
#[derive(Debug)]
pub struct GitWorkspace {
    root: PathBuf,
}

impl GitWorkspace {
    /// Clone one branch of `url` into `dest` (shallow)
    pub async fn clone(url: &str, branch: &str, dest: &Path) -> Result<Self> {
        let dest_str = dest.to_string_lossy();
        run_git(
            None,
            &[
                "clone",
                "--depth",
                "1",
                "--branch",
                branch,
                url,
                dest_str.as_ref(),
            ],
        )
        .await?;
        Ok(Self {
            root: dest.to_path_buf(),
        })
    }

    /// Initialize a fresh repository at `dest` (used for local fixtures)
    pub async fn init(dest: &Path) -> Result<Self> {
        let dest_str = dest.to_string_lossy();
        run_git(None, &["init", "-b", "main", dest_str.as_ref()]).await?;
        Ok(Self {
            root: dest.to_path_buf(),
        })
    }

    /// Open an existing working tree
    pub fn open(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    /// Root of the working tree
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Set the local committer identity for this working tree
    pub async fn set_identity(&self, name: &str, email: &str) -> Result<()> {
        self.run(&["config", "user.name", name]).await?;
        self.run(&["config", "user.email", email]).await?;
        Ok(())
    }

    /// Create and switch to a new branch
    pub async fn create_branch(&self, name: &str) -> Result<()> {
        self.run(&["switch", "-c", name]).await?;
        Ok(())
    }

    /// Apply a patch file to the working tree
    pub async fn apply_patch(&self, patch: &Path) -> Result<()> {
        let patch_str = patch.to_string_lossy();
        self.run(&["apply", patch_str.as_ref()])
            .await
            .map_err(|err| Error::Changeset(err.to_string()))?;
        Ok(())
    }

    /// Whether the working tree has uncommitted changes
    pub async fn has_changes(&self) -> Result<bool> {
        let output = self.run(&["status", "--porcelain"]).await?;
        Ok(!output.trim().is_empty())
    }

    /// Stage everything and commit
    pub async fn commit_all(&self, message: &str) -> Result<()> {
        self.run(&["add", "--all"]).await?;
        self.run(&["commit", "-m", message]).await?;
        Ok(())
    }

    /// Push a branch to a remote
    pub async fn push(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["push", remote, branch]).await?;
        Ok(())
    }

    /// Push a branch, replacing whatever the remote currently holds.
    /// Used for fixed head branches that are rebuilt from base on every run.
    pub async fn push_force(&self, remote: &str, branch: &str) -> Result<()> {
        self.run(&["push", "--force", remote, branch]).await?;
        Ok(())
    }

    /// Name of the currently checked-out branch
    pub async fn current_branch(&self) -> Result<String> {
        let output = self.run(&["rev-parse", "--abbrev-ref", "HEAD"]).await?;
        Ok(output.trim().to_string())
    }

    pub(crate) async fn run(&self, args: &[&str]) -> Result<String> {
        run_git(Some(&self.root), args).await
    }
}

/// Run git with `args`, optionally inside `dir`, capturing stdout.
async fn run_git(dir: Option<&Path>, args: &[&str]) -> Result<String> {
    let mut cmd = Command::new("git");
    if let Some(dir) = dir {
        cmd.arg("-C").arg(dir);
    }
    let output = cmd.args(args).output().await?;

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    } else {
        Err(Error::Git {
            command: args.first().copied().unwrap_or("git").to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn fixture() -> (TempDir, GitWorkspace) {
        let dir = TempDir::new().unwrap();
        let repo = GitWorkspace::init(dir.path()).await.unwrap();
        repo.set_identity("test", "test@example.com").await.unwrap();
        (dir, repo)
    }

    #[tokio::test]
    async fn test_init_and_branch() {
        let (_dir, repo) = fixture().await;

        std::fs::write(repo.root().join("README.md"), "hi\n").unwrap();
        repo.commit_all("initial").await.unwrap();

        repo.create_branch("feature/test").await.unwrap();
        assert_eq!(repo.current_branch().await.unwrap(), "feature/test");
    }

    #[tokio::test]
    async fn test_has_changes_reflects_working_tree() {
        let (_dir, repo) = fixture().await;

        assert!(!repo.has_changes().await.unwrap());
        std::fs::write(repo.root().join("file.txt"), "contents\n").unwrap();
        assert!(repo.has_changes().await.unwrap());

        repo.commit_all("add file").await.unwrap();
        assert!(!repo.has_changes().await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_command_reports_stderr() {
        let (_dir, repo) = fixture().await;

        let err = repo.push("nonexistent-remote", "main").await.unwrap_err();
        match err {
            Error::Git { command, stderr } => {
                assert_eq!(command, "push");
                assert!(!stderr.is_empty());
            }
            other => panic!("expected Git error, got {other:?}"),
        }
    }
}
