//! binfer web front-end.
//!
//! Serves the note pages on top of the binfer backend API. The modules live
//! in the library crate:
//!
//! - `config`: environment settings
//! - `api_client`: backend REST calls with bearer auth
//! - `auth`: token and post-login redirect cookies, Google OAuth URL
//! - `markdown`: rendering and previews
//! - `upload`: pasted-image upload to object storage
//! - `templates`: HTML/CSS/JS page rendering
//! - `handlers`: HTTP route handlers

use std::process::ExitCode;
use std::sync::Arc;

use binfer::{app, AppState, Config};
use tracing_subscriber::EnvFilter;

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("binfer=info,tower_http=info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    let bind = config.bind;
    let api_url = config.api_url.clone();
    let google = config.google_oauth().is_some();

    let state = match AppState::new(config) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!(error = %e, "failed to build HTTP client");
            return ExitCode::FAILURE;
        }
    };

    let listener = match tokio::net::TcpListener::bind(bind).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%bind, error = %e, "failed to bind");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(%bind, backend = %api_url, "binfer server running at http://{}", bind);
    if google {
        tracing::info!("Google sign-in: ENABLED");
    } else {
        tracing::info!("Google sign-in: DISABLED (set GOOGLE_CLIENT_ID and OAUTH_REDIRECT_URI)");
    }

    if let Err(e) = axum::serve(listener, app(state)).await {
        tracing::error!(error = %e, "server error");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
