//! binfer library - re-exports for testing and external use.
//!
//! The web front-end is a thin layer over the binfer backend: every page is
//! rendered on the server from one or two API calls, and the browser's
//! backend token lives in a cookie.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use rand::Rng;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api_client;
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod markdown;
pub mod models;
pub mod templates;
pub mod upload;

// ============================================================================
// Configuration
// ============================================================================

/// Length of the random slug a fresh note gets.
pub const SLUG_LEN: usize = 7;

/// Request body ceiling for the upload route. Larger than the image limit so
/// oversized images reach validation and get its message.
pub const UPLOAD_BODY_LIMIT: usize = 8 * 1024 * 1024;

const BASE36: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Random string over `[a-z0-9]`.
pub fn random_base36(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect()
}

/// Slug for a brand new note.
pub fn generate_slug() -> String {
    random_base36(SLUG_LEN)
}

// ============================================================================
// Application State
// ============================================================================

pub struct AppState {
    pub config: Config,
    pub api: ApiClient,
    pub uploader: Uploader,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let api = ApiClient::new(config.api_url.clone())?;
        let uploader = Uploader::new(
            api.http().clone(),
            config.upload_url.clone(),
            config.image_base_url.clone(),
        );
        Ok(Self {
            config,
            api,
            uploader,
        })
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/favicon.ico", get(handlers::favicon))
        .route("/how-to-use", get(handlers::how_to_use))
        .route("/search", get(handlers::search))
        // Authentication
        .route("/login", get(handlers::login_page).post(handlers::login_submit))
        .route("/login/google", get(handlers::google_login))
        .route("/login/callback", get(handlers::oauth_callback))
        .route("/logout", get(handlers::logout))
        // Uploads
        .route(
            "/api/upload",
            post(handlers::upload_image).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        // Notes
        .route("/share/{slug}", get(handlers::shared_note))
        .route("/{slug}", get(handlers::view_note).post(handlers::save_note))
        .route("/{slug}/delete", post(handlers::delete_note))
        .route("/{slug}/share", post(handlers::share_note))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Re-export commonly used types
pub use api_client::ApiClient;
pub use config::{Config, ConfigError, GoogleOAuth};
pub use error::{ApiError, UploadError};
pub use markdown::{html_escape, render_markdown};
pub use models::{Note, SearchNote, SharedNote};
pub use upload::{ImageUpload, Uploader, MAX_IMAGE_BYTES};
