//! Pull request workflow orchestration
//!
//! Drives checkout -> branch -> change-apply -> commit -> push -> PR
//! creation -> label -> cleanup, consuming a resolved configuration handle.
//! The orchestrator never touches the config file or environment directly;
//! the handle's accessor surface is the entire contract.

mod changeset;

pub use changeset::{ChangeSet, InlinePatch, PatchFile};

use crate::config::{ConfigHandle, ConfigSchema, DescriptorOptions, PromptPolicy};
use crate::error::{Error, Result};
use crate::git::GitWorkspace;
use crate::platform::PlatformService;
use crate::types::{RepoTarget, WorkflowOutcome};

/// Application identity namespacing this tool's persisted configuration
pub const APP_ID: &str = "autopr";

/// Committer identity used for automated commits
const COMMIT_AUTHOR_NAME: &str = "autopr";
const COMMIT_AUTHOR_EMAIL: &str = "autopr@users.noreply.github.com";

/// Configuration schema for the PR workflow.
///
/// Org, repo, and token are promptable on first run; automation supplies
/// them through overrides or the env variables instead, which keeps server
/// and CI runs prompt-free.
pub fn config_schema() -> ConfigSchema {
    ConfigSchema::new()
        .with_described(
            "github_org",
            "",
            DescriptorOptions {
                env_override: Some("AUTOPR_GITHUB_ORG".to_string()),
                prompt: Some(PromptPolicy::AskWith(
                    "GitHub organization or user that owns the target repository".to_string(),
                )),
            },
        )
        .with_described(
            "github_repo",
            "",
            DescriptorOptions {
                env_override: Some("AUTOPR_GITHUB_REPO".to_string()),
                prompt: Some(PromptPolicy::Ask),
            },
        )
        .with_described(
            "github_token",
            "",
            DescriptorOptions {
                env_override: Some("AUTOPR_GITHUB_TOKEN".to_string()),
                // No prompt: the gh CLI and GITHUB_TOKEN/GH_TOKEN are
                // consulted at auth time when this stays empty.
                prompt: None,
            },
        )
        .with_default("github_host", "")
        .with_default("base_branch", "main")
        .with_default("branch_prefix", "autopr")
        // Empty means "generate a unique branch per run". A fixed name makes
        // reruns rebuild the branch in place and reuse its open PR.
        .with_default("head_branch", "")
        .with_default("pr_title", "Automated change")
        .with_default("pr_body", "This pull request was opened automatically.")
        .with_default("pr_labels", "")
}

/// Everything the orchestrator needs, extracted from a resolved config
#[derive(Debug, Clone)]
pub struct WorkflowRequest {
    /// Target repository coordinates
    pub target: RepoTarget,
    /// Branch the PR merges into
    pub base_branch: String,
    /// Prefix for generated branch names
    pub branch_prefix: String,
    /// Fixed head branch; `None` generates a unique name per run
    pub head_branch: Option<String>,
    /// PR title (also the commit message)
    pub title: String,
    /// PR body
    pub body: String,
    /// Labels to add after creation (may be empty)
    pub labels: Vec<String>,
    /// Authentication token; empty means "discover at auth time"
    pub token: String,
    /// Override for the computed clone URL (mirrors, local test remotes)
    pub remote_url: Option<String>,
}

impl WorkflowRequest {
    /// Extract a request from a resolved configuration handle.
    ///
    /// Fails with [`Error::ConfigIncomplete`] when a required field is
    /// still empty.
    pub fn from_config(config: &ConfigHandle) -> Result<Self> {
        let required = |key: &str| -> Result<String> {
            config
                .get_str(key)
                .filter(|v| !v.is_empty())
                .map(ToString::to_string)
                .ok_or_else(|| Error::ConfigIncomplete {
                    key: key.to_string(),
                })
        };
        let optional =
            |key: &str| -> String { config.get_str(key).unwrap_or_default().to_string() };

        let host = optional("github_host");
        let head = optional("head_branch");
        Ok(Self {
            target: RepoTarget {
                owner: required("github_org")?,
                repo: required("github_repo")?,
                host: if host.is_empty() { None } else { Some(host) },
            },
            base_branch: required("base_branch")?,
            branch_prefix: required("branch_prefix")?,
            head_branch: if head.is_empty() { None } else { Some(head) },
            title: required("pr_title")?,
            body: optional("pr_body"),
            labels: parse_labels(&optional("pr_labels")),
            token: optional("github_token"),
            remote_url: None,
        })
    }

    fn clone_url(&self) -> String {
        self.remote_url
            .clone()
            .unwrap_or_else(|| self.target.clone_url(&self.token))
    }
}

/// Split a comma-separated label list, dropping empty entries
fn parse_labels(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Generate a unique branch name under the configured prefix
pub fn unique_branch_name(prefix: &str) -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%d-%H%M%S");
    let id = uuid::Uuid::new_v4().to_string()[..8].to_string();
    format!("{prefix}/{timestamp}-{id}")
}

/// Run the full pull request workflow.
///
/// The checkout lives in a temp directory removed on return, success or
/// failure. With a fixed head branch the remote branch is replaced wholesale
/// and its open PR reused; generated branch names are unique, so those runs
/// always push fresh and create. Label failures are logged, not fatal: by
/// that point the PR exists and its URL is the caller's answer.
pub async fn run_workflow(
    request: &WorkflowRequest,
    changeset: &dyn ChangeSet,
    platform: &dyn PlatformService,
) -> Result<WorkflowOutcome> {
    let checkout = tempfile::tempdir()?;
    let repo_dir = checkout.path().join("repo");

    tracing::info!(
        owner = %request.target.owner,
        repo = %request.target.repo,
        base = %request.base_branch,
        "cloning base branch"
    );
    let repo = GitWorkspace::clone(&request.clone_url(), &request.base_branch, &repo_dir).await?;
    repo.set_identity(COMMIT_AUTHOR_NAME, COMMIT_AUTHOR_EMAIL)
        .await?;

    let branch = request
        .head_branch
        .clone()
        .unwrap_or_else(|| unique_branch_name(&request.branch_prefix));
    repo.create_branch(&branch).await?;

    tracing::info!(changeset = %changeset.describe(), %branch, "applying changeset");
    changeset.apply(&repo).await?;

    if !repo.has_changes().await? {
        return Err(Error::Changeset(
            "changeset produced no modifications".to_string(),
        ));
    }
    repo.commit_all(&request.title).await?;

    let existing = if request.head_branch.is_some() {
        // The branch is rebuilt from base on every run; replace the remote
        // copy and keep whatever PR already tracks it.
        repo.push_force("origin", &branch).await?;
        platform.find_existing_pr(&branch).await?
    } else {
        // Generated names are unique, so there is never a PR to reuse.
        repo.push("origin", &branch).await?;
        None
    };

    let pr = match existing {
        Some(existing) => {
            tracing::info!(number = existing.number, "reusing existing open PR");
            existing
        }
        None => {
            platform
                .create_pr(&branch, &request.base_branch, &request.title, &request.body)
                .await?
        }
    };

    if !request.labels.is_empty() {
        if let Err(err) = platform.add_labels(pr.number, &request.labels).await {
            tracing::warn!(number = pr.number, %err, "failed to add labels");
        }
    }

    Ok(WorkflowOutcome {
        pr_url: pr.html_url,
        pr_number: pr.number,
        branch,
    })
}
