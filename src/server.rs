//! Thin HTTP front end
//!
//! One endpoint that accepts a unified diff plus per-request config
//! overrides and runs the PR workflow. Prompts never fire here: the handler
//! resolves configuration with a driver that cancels every prompt, so a
//! field left empty by all non-interactive sources comes back as a client
//! error naming the key.

use crate::auth::get_github_auth;
use crate::config::{init_config, Overrides, ScriptedDriver};
use crate::error::Error;
use crate::platform::GitHubService;
use crate::workflow::{self, InlinePatch, WorkflowRequest};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Shared state for the HTTP handlers
#[derive(Debug, Clone)]
struct AppState {
    app_id: String,
}

/// Request body for creating a pull request
#[derive(Debug, Deserialize)]
struct CreatePrRequest {
    /// Unified diff to apply to the base branch
    patch: String,
    /// Per-request config overrides (highest precedence)
    #[serde(default)]
    overrides: Overrides,
}

/// Response body on success
#[derive(Debug, Serialize)]
struct CreatePrResponse {
    pr_url: String,
    pr_number: u64,
    branch: String,
}

/// Error body returned to clients
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

struct ApiError {
    status: StatusCode,
    message: String,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::ConfigIncomplete { .. } | Error::UnknownConfigKey { .. } | Error::Changeset(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::Auth(_) => StatusCode::UNAUTHORIZED,
            Error::GitHubApi(_) => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Build the application router
pub fn router(app_id: &str) -> Router {
    Router::new()
        .route("/pull-requests", post(create_pull_request))
        .with_state(AppState {
            app_id: app_id.to_string(),
        })
}

async fn create_pull_request(
    State(state): State<AppState>,
    Json(body): Json<CreatePrRequest>,
) -> Result<Json<CreatePrResponse>, ApiError> {
    let schema = workflow::config_schema();
    // Cancels on any prompt; missing values surface as 400s.
    let no_prompts = ScriptedDriver::new();
    let config = init_config(&state.app_id, &schema, Some(&body.overrides), &no_prompts)?;

    let mut request = WorkflowRequest::from_config(&config)?;
    let auth = get_github_auth(Some(&request.token)).await?;
    request.token = auth.token.clone();

    let platform = GitHubService::new(
        &auth.token,
        request.target.owner.clone(),
        request.target.repo.clone(),
        request.target.host.clone(),
    )?;

    let changeset = InlinePatch::new(body.patch);
    let outcome = workflow::run_workflow(&request, &changeset, &platform).await?;

    Ok(Json(CreatePrResponse {
        pr_url: outcome.pr_url,
        pr_number: outcome.pr_number,
        branch: outcome.branch,
    }))
}

/// Bind and serve the HTTP front end until the process exits
pub async fn serve(addr: SocketAddr, app_id: &str) -> crate::error::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "HTTP front end listening");
    axum::serve(listener, router(app_id)).await?;
    Ok(())
}
