//! autopr - automated pull request creation
//!
//! CLI binary for applying changesets and opening pull requests.

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli::{ConfigAction, RunOptions};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "autopr")]
#[command(about = "Clone, branch, apply a changeset, and open a pull request")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a patch and open a pull request
    Run {
        /// Path to a unified diff to apply
        #[arg(long)]
        patch: PathBuf,

        /// Repository owner (overrides config)
        #[arg(long)]
        org: Option<String>,

        /// Repository name (overrides config)
        #[arg(long)]
        repo: Option<String>,

        /// Base branch (overrides config)
        #[arg(long)]
        base: Option<String>,

        /// Pull request title (overrides config)
        #[arg(long)]
        title: Option<String>,

        /// Pull request body (overrides config)
        #[arg(long)]
        body: Option<String>,

        /// Comma-separated labels (overrides config)
        #[arg(long)]
        labels: Option<String>,

        /// Fixed head branch; reruns update it and reuse its open PR
        /// (overrides config)
        #[arg(long)]
        branch: Option<String>,

        /// Authentication token (overrides config)
        #[arg(long)]
        token: Option<String>,
    },

    /// Verify GitHub authentication
    Auth {
        /// Token to validate instead of the discovered one
        #[arg(long)]
        token: Option<String>,
    },

    /// Inspect or edit the persisted configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },

    /// Run the HTTP front end
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print one config value
    Get {
        /// Key to read
        key: String,
    },
    /// Persist one config value
    Set {
        /// Key to write
        key: String,
        /// New value
        value: String,
    },
    /// Print the config file path
    Path,
    /// Print the whole resolved snapshot
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("autopr=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            patch,
            org,
            repo,
            base,
            title,
            body,
            labels,
            branch,
            token,
        } => {
            cli::run_pr(RunOptions {
                patch,
                org,
                repo,
                base,
                title,
                body,
                labels,
                branch,
                token,
            })
            .await?;
        }
        Commands::Auth { token } => {
            cli::run_auth(token).await?;
        }
        Commands::Config { action } => {
            let action = match action {
                ConfigCommand::Get { key } => ConfigAction::Get { key },
                ConfigCommand::Set { key, value } => ConfigAction::Set { key, value },
                ConfigCommand::Path => ConfigAction::Path,
                ConfigCommand::Show => ConfigAction::Show,
            };
            cli::run_config(&action)?;
        }
        Commands::Serve { port } => {
            cli::run_serve(port).await?;
        }
    }

    Ok(())
}
