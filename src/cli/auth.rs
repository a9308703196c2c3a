//! Auth command - verify GitHub authentication

use crate::cli::style::{check, Stylize};
use autopr::auth::{get_github_auth, test_github_auth};
use autopr::error::Result;

/// Discover a token and validate it against the API
pub async fn run_auth(token: Option<String>) -> Result<()> {
    println!("Testing GitHub authentication...");
    let auth = get_github_auth(token.as_deref()).await?;
    let login = test_github_auth(&auth).await?;

    println!("{} Authenticated as {}", check(), login.accent());
    println!("  token source: {}", auth.source.label().muted());
    Ok(())
}
