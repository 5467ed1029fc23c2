//! HTTP route handlers for the web application.
//!
//! Each handler makes at most a couple of backend calls and renders a page or
//! a redirect. Failures fall into two buckets: an inline error message, or
//! the not-found / create path. A 401 from the backend anywhere signs the
//! browser out and sends it to `/login`, remembering where it was.

use crate::auth::{
    auth_token, clear_auth_token, google_auth_url, is_authenticated, save_redirect_url,
    set_auth_token, take_redirect_url,
};
use crate::error::UploadError;
use crate::models::{Note, SaveNoteRequest};
use crate::templates::{
    message_page, render_editor, render_how_to_use, render_login, render_login_failed,
    render_note_view, render_search, render_shared_note, EditorPage,
};
use crate::upload::ImageUpload;
use crate::AppState;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header::HOST, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Form, Json,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[cfg(test)]
#[path = "handlers_test.rs"]
mod handlers_test;

/// Sign the browser out and send it to the login page. `return_to` is
/// restored after the next successful login.
fn redirect_to_login(jar: CookieJar, return_to: &str, secure: bool) -> Response {
    let jar = save_redirect_url(clear_auth_token(jar), return_to, secure);
    (jar, Redirect::to("/login")).into_response()
}

/// Store the fresh token and go back to the remembered page, or home.
fn finish_login(jar: CookieJar, token: &str, secure: bool) -> Response {
    let (jar, target) = take_redirect_url(jar);
    let jar = set_auth_token(jar, token, secure);
    (jar, Redirect::to(target.as_deref().unwrap_or("/"))).into_response()
}

fn note_path(slug: &str) -> String {
    format!("/{}", urlencoding::encode(slug))
}

// ============================================================================
// Index Handler
// ============================================================================

pub async fn index() -> Redirect {
    Redirect::to(&note_path(&crate::generate_slug()))
}

// ============================================================================
// Note Handlers
// ============================================================================

#[derive(Deserialize, Default)]
pub struct NoteQuery {
    pub edit: Option<String>,
}

/// Whether the page for a fetched note is the editor rather than the view.
/// Missing or empty notes always edit; locked ones never do.
pub(crate) fn opens_editor(note: Option<&Note>, edit_requested: bool) -> bool {
    match note {
        Some(note) if note.has_content() => edit_requested && !note.locked(),
        _ => true,
    }
}

pub async fn view_note(
    Path(slug): Path<String>,
    Query(query): Query<NoteQuery>,
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Response {
    let token = auth_token(&jar);
    let edit_requested = query.edit.as_deref() == Some("1");

    let note = match state.api.get_note(&slug, token.as_deref()).await {
        Ok(note) => note,
        Err(e) if e.is_unauthorized() => {
            let return_to = if edit_requested {
                format!("{}?edit=1", note_path(&slug))
            } else {
                note_path(&slug)
            };
            return redirect_to_login(jar, &return_to, state.config.secure_cookies);
        }
        Err(e) => {
            tracing::warn!(%slug, error = %e, "failed to load note");
            None
        }
    };

    if !opens_editor(note.as_ref(), edit_requested) {
        if let Some(note) = note {
            return Html(render_note_view(&note, token.is_some())).into_response();
        }
    }

    let (title, content, show_cancel) = match &note {
        Some(n) => (n.title.as_str(), n.content_md.as_str(), n.has_content()),
        None => ("", "", false),
    };
    Html(render_editor(&EditorPage {
        slug: &slug,
        title,
        content,
        show_cancel,
        error: None,
    }))
    .into_response()
}

#[derive(Deserialize)]
pub struct SaveNoteForm {
    pub content_md: String,
    #[serde(default)]
    pub had_content: String,
}

pub async fn save_note(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<SaveNoteForm>,
) -> Response {
    let token = auth_token(&jar);
    let request = SaveNoteRequest::new(&slug, &form.content_md);

    match state.api.save_note(&request, token.as_deref()).await {
        Ok(()) => {
            tracing::info!(%slug, bytes = request.content_md.len(), "note saved");
            Redirect::to(&note_path(&slug)).into_response()
        }
        Err(e) if e.is_unauthorized() => redirect_to_login(
            jar,
            &format!("{}?edit=1", note_path(&slug)),
            state.config.secure_cookies,
        ),
        Err(e) => {
            tracing::warn!(%slug, error = %e, "failed to save note");
            Html(render_editor(&EditorPage {
                slug: &slug,
                title: "",
                content: &form.content_md,
                show_cancel: form.had_content == "1",
                error: Some("Failed to save note"),
            }))
            .into_response()
        }
    }
}

pub async fn delete_note(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Response {
    let token = auth_token(&jar);
    match state.api.delete_note(&slug, token.as_deref()).await {
        Ok(()) => {
            tracing::info!(%slug, "note deleted");
            Redirect::to("/").into_response()
        }
        Err(e) if e.is_unauthorized() => {
            redirect_to_login(jar, &note_path(&slug), state.config.secure_cookies)
        }
        Err(e) => {
            tracing::warn!(%slug, error = %e, "failed to delete note");
            let message = e.backend_message().unwrap_or("Failed to delete note");
            (
                StatusCode::BAD_GATEWAY,
                Html(message_page(
                    "Delete Failed - binfer",
                    "Delete Failed",
                    message,
                    &note_path(&slug),
                    "Back to note",
                )),
            )
                .into_response()
        }
    }
}

#[derive(Deserialize)]
pub struct ShareForm {
    #[serde(default)]
    pub shared: String,
}

pub async fn share_note(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<ShareForm>,
) -> Response {
    let token = auth_token(&jar);
    let shared = form.shared == "1";
    match state.api.share_note(&slug, shared, token.as_deref()).await {
        Ok(()) => {
            tracing::info!(%slug, shared, "note sharing updated");
            Redirect::to(&note_path(&slug)).into_response()
        }
        Err(e) if e.is_unauthorized() => {
            redirect_to_login(jar, &note_path(&slug), state.config.secure_cookies)
        }
        Err(e) => {
            tracing::warn!(%slug, error = %e, "failed to update sharing");
            let message = e.backend_message().unwrap_or("Failed to update sharing");
            (
                StatusCode::BAD_GATEWAY,
                Html(message_page(
                    "Share Failed - binfer",
                    "Share Failed",
                    message,
                    &note_path(&slug),
                    "Back to note",
                )),
            )
                .into_response()
        }
    }
}

// ============================================================================
// Public Share Handler
// ============================================================================

fn note_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(message_page(
            "Note Not Found - binfer",
            "Note Not Found",
            "This note does not exist or is no longer shared.",
            "/",
            "Go to binfer",
        )),
    )
        .into_response()
}

pub async fn shared_note(
    Path(slug): Path<String>,
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Response {
    let token = auth_token(&jar);
    match state.api.get_public_note(&slug, token.as_deref()).await {
        Ok(Some(note)) => Html(render_shared_note(&note)).into_response(),
        Ok(None) => note_not_found(),
        Err(e) if e.is_unauthorized() => redirect_to_login(
            jar,
            &format!("/share/{}", urlencoding::encode(&slug)),
            state.config.secure_cookies,
        ),
        Err(e) => {
            tracing::warn!(%slug, error = %e, "failed to load shared note");
            note_not_found()
        }
    }
}

// ============================================================================
// Search Handler
// ============================================================================

#[derive(Deserialize, Default)]
pub struct SearchParams {
    pub q: Option<String>,
}

pub async fn search(
    Query(params): Query<SearchParams>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Response {
    let host = headers
        .get(HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("binfer")
        .to_string();
    let query = params.q.unwrap_or_default();
    let query = query.trim();
    if query.is_empty() {
        return Html(render_search("", None, &host)).into_response();
    }

    let token = auth_token(&jar);
    let results = match state.api.search(query, token.as_deref()).await {
        Ok(results) => results,
        Err(e) if e.is_unauthorized() => {
            return redirect_to_login(
                jar,
                &format!("/search?q={}", urlencoding::encode(query)),
                state.config.secure_cookies,
            );
        }
        Err(e) => {
            tracing::warn!(%query, error = %e, "search failed");
            Vec::new()
        }
    };

    Html(render_search(query, Some(results.as_slice()), &host)).into_response()
}

// ============================================================================
// Authentication Handlers
// ============================================================================

pub async fn login_page(State(state): State<Arc<AppState>>, jar: CookieJar) -> Response {
    if is_authenticated(&jar) {
        let (jar, target) = take_redirect_url(jar);
        return (jar, Redirect::to(target.as_deref().unwrap_or("/"))).into_response();
    }
    Html(render_login(None, state.config.google_oauth().is_some())).into_response()
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

pub async fn login_submit(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Response {
    let google_enabled = state.config.google_oauth().is_some();
    let failed = |message: &str| Html(render_login(Some(message), google_enabled)).into_response();

    match state.api.login(form.username.trim(), &form.password).await {
        Ok(response) => match response.token.filter(|t| !t.is_empty()) {
            Some(token) => {
                tracing::info!(username = %form.username.trim(), "signed in");
                finish_login(jar, &token, state.config.secure_cookies)
            }
            None => failed("No token received from server"),
        },
        Err(e) => {
            tracing::warn!(error = %e, "login failed");
            let fallback = if e.status().map(|s| s.as_u16()) == Some(401) {
                "Invalid username or password"
            } else {
                "Login failed"
            };
            failed(e.backend_message().unwrap_or(fallback))
        }
    }
}

pub async fn google_login(State(state): State<Arc<AppState>>) -> Response {
    let Some(oauth) = state.config.google_oauth() else {
        return Html(render_login(Some("Google OAuth2 is not configured"), false)).into_response();
    };
    match google_auth_url(&oauth) {
        Ok(url) => Redirect::to(url.as_str()).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "could not build Google authorization URL");
            Html(render_login_failed("Google OAuth2 is not configured")).into_response()
        }
    }
}

#[derive(Deserialize, Default)]
pub struct OAuthCallback {
    pub code: Option<String>,
    pub error: Option<String>,
}

pub async fn oauth_callback(
    Query(params): Query<OAuthCallback>,
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Response {
    let failed = |message: &str| Html(render_login_failed(message)).into_response();

    if let Some(error) = params.error.filter(|e| !e.is_empty()) {
        return failed(&format!("Google login failed: {}", error));
    }
    let Some(code) = params.code.filter(|c| !c.is_empty()) else {
        return failed("No authorization code received from Google");
    };
    let Some(redirect_uri) = state.config.oauth_redirect_uri.as_deref() else {
        return failed("OAuth redirect URI is not configured");
    };

    match state.api.login_google(&code, redirect_uri).await {
        Ok(response) => match response.token.filter(|t| !t.is_empty()) {
            Some(token) => {
                tracing::info!("signed in with Google");
                finish_login(jar, &token, state.config.secure_cookies)
            }
            None => failed("No token received from server"),
        },
        Err(e) => {
            tracing::warn!(error = %e, "Google code exchange failed");
            failed(
                e.backend_message()
                    .unwrap_or("Failed to exchange authorization code"),
            )
        }
    }
}

pub async fn logout(jar: CookieJar) -> Response {
    tracing::info!("signed out");
    (clear_auth_token(jar), Redirect::to("/")).into_response()
}

// ============================================================================
// Image Upload Handler
// ============================================================================

fn upload_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut multipart: Multipart,
) -> Response {
    let mut image: Option<ImageUpload> = None;
    let mut return_to: Option<String> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "malformed upload");
                if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    return upload_error(StatusCode::BAD_REQUEST, &UploadError::TooLarge.to_string());
                }
                return upload_error(e.status(), "Failed to upload image");
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("image.png").to_string();
                let content_type = field.content_type().unwrap_or_default().to_string();
                let bytes = match field.bytes().await {
                    Ok(bytes) => bytes,
                    Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => {
                        return upload_error(StatusCode::BAD_REQUEST, &UploadError::TooLarge.to_string());
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to read upload body");
                        return upload_error(StatusCode::BAD_REQUEST, "Failed to upload image");
                    }
                };
                image = Some(ImageUpload {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            "return_to" => return_to = field.text().await.ok(),
            _ => {}
        }
    }

    let Some(image) = image else {
        return upload_error(StatusCode::BAD_REQUEST, "No image file provided");
    };

    let token = auth_token(&jar);
    match state.uploader.upload(&state.api, token.as_deref(), image).await {
        Ok(url) => Json(json!({ "url": url })).into_response(),
        Err(e) if e.is_unauthorized() => {
            let jar = clear_auth_token(jar);
            let jar = match return_to.as_deref() {
                Some(path) => save_redirect_url(jar, path, state.config.secure_cookies),
                None => jar,
            };
            (
                StatusCode::UNAUTHORIZED,
                jar,
                Json(json!({ "error": "Please log in again", "redirect": "/login" })),
            )
                .into_response()
        }
        Err(e @ (UploadError::NotAnImage | UploadError::TooLarge)) => {
            upload_error(StatusCode::BAD_REQUEST, &e.to_string())
        }
        Err(e) => {
            tracing::warn!(error = %e, source = ?std::error::Error::source(&e), "image upload failed");
            upload_error(StatusCode::BAD_GATEWAY, &e.to_string())
        }
    }
}

// ============================================================================
// Static Pages
// ============================================================================

pub async fn how_to_use() -> Html<String> {
    Html(render_how_to_use())
}

pub async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(content: &str, locked: bool) -> Note {
        Note {
            slug: "abc1234".to_string(),
            content_md: content.to_string(),
            is_locked: i32::from(locked),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_or_empty_note_opens_editor() {
        assert!(opens_editor(None, false));
        assert!(opens_editor(Some(&note("", false)), false));
        assert!(opens_editor(Some(&note("", true)), false));
    }

    #[test]
    fn test_existing_note_views_unless_edit_requested() {
        assert!(!opens_editor(Some(&note("hello", false)), false));
        assert!(opens_editor(Some(&note("hello", false)), true));
    }

    #[test]
    fn test_locked_note_never_edits() {
        assert!(!opens_editor(Some(&note("hello", true)), true));
    }

    #[test]
    fn test_note_path_encodes_slug() {
        assert_eq!(note_path("abc"), "/abc");
        assert_eq!(note_path("a b"), "/a%20b");
    }
}
