//! Platform services for pull request operations
//!
//! Abstracts the hosting platform behind a trait so the workflow can be
//! exercised against a mock in tests.

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::types::{PullRequest, RepoTarget};
use async_trait::async_trait;

/// Platform service trait for PR operations
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Find an existing open PR for a head branch
    async fn find_existing_pr(&self, head_branch: &str) -> Result<Option<PullRequest>>;

    /// Create a new PR
    async fn create_pr(
        &self,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<PullRequest>;

    /// Add labels to an existing PR
    async fn add_labels(&self, pr_number: u64, labels: &[String]) -> Result<()>;

    /// The repository this service targets
    fn target(&self) -> &RepoTarget;
}
