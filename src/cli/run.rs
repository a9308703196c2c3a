//! Run command - apply a changeset and open a pull request

use crate::cli::style::{check, Stylize};
use autopr::auth::get_github_auth;
use autopr::config::{init_config, Overrides, TerminalDriver};
use autopr::error::Result;
use autopr::platform::GitHubService;
use autopr::workflow::{self, PatchFile, WorkflowRequest, APP_ID};
use serde_json::Value;
use std::path::PathBuf;

/// Options collected from the command line
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Path to the unified diff to apply
    pub patch: PathBuf,
    /// Override: repository owner
    pub org: Option<String>,
    /// Override: repository name
    pub repo: Option<String>,
    /// Override: base branch
    pub base: Option<String>,
    /// Override: PR title
    pub title: Option<String>,
    /// Override: PR body
    pub body: Option<String>,
    /// Override: comma-separated labels
    pub labels: Option<String>,
    /// Override: fixed head branch (reruns update it and reuse its PR)
    pub branch: Option<String>,
    /// Override: authentication token
    pub token: Option<String>,
}

impl RunOptions {
    /// Turn the provided flags into explicit config overrides
    fn overrides(&self) -> Overrides {
        let mut overrides = Overrides::new();
        let mut put = |key: &str, value: &Option<String>| {
            if let Some(value) = value {
                overrides.insert(key.to_string(), Value::String(value.clone()));
            }
        };
        put("github_org", &self.org);
        put("github_repo", &self.repo);
        put("base_branch", &self.base);
        put("pr_title", &self.title);
        put("pr_body", &self.body);
        put("pr_labels", &self.labels);
        put("head_branch", &self.branch);
        put("github_token", &self.token);
        overrides
    }
}

/// Run the pull request workflow from the command line
pub async fn run_pr(options: RunOptions) -> Result<()> {
    let schema = workflow::config_schema();
    let overrides = options.overrides();
    let config = init_config(APP_ID, &schema, Some(&overrides), &TerminalDriver)?;

    let mut request = WorkflowRequest::from_config(&config)?;
    let auth = get_github_auth(Some(&request.token)).await?;
    request.token = auth.token.clone();

    let platform = GitHubService::new(
        &auth.token,
        request.target.owner.clone(),
        request.target.repo.clone(),
        request.target.host.clone(),
    )?;

    println!(
        "Opening PR against {}/{} ({})",
        request.target.owner.accent(),
        request.target.repo.accent(),
        request.base_branch.muted()
    );

    let changeset = PatchFile::new(options.patch);
    let outcome = workflow::run_workflow(&request, &changeset, &platform).await?;

    println!(
        "{} Pull request #{} ready on branch {}",
        check(),
        outcome.pr_number,
        outcome.branch.accent()
    );
    println!("  {}", outcome.pr_url.accent());

    Ok(())
}
