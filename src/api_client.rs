//! Typed client for the binfer backend REST API.
//!
//! Every call goes through the same two steps: the request side attaches
//! `Authorization: Bearer <token>` when the caller has a token, and the
//! response side turns a 401 into [`ApiError::Unauthorized`] so the page
//! layer can log the user out. Nothing is retried or cached.

use crate::error::ApiError;
use crate::models::{
    BackendError, GoogleOAuthRequest, LoginRequest, Note, SaveNoteRequest, SearchNote,
    ShareNoteRequest, SharedNote, SlugRequest, TokenResponse, UploadToken,
};
use reqwest::{header::AUTHORIZATION, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

#[cfg(test)]
#[path = "api_client_test.rs"]
mod api_client_test;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    pub fn new(base_url: Url) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Underlying HTTP client, shared with the upload helper.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ========================================================================
    // Notes
    // ========================================================================

    /// Fetch a note for viewing or editing. `Ok(None)` means the backend
    /// answered successfully with an empty body.
    pub async fn get_note(&self, slug: &str, token: Option<&str>) -> Result<Option<Note>, ApiError> {
        let url = self.endpoint(&["mgr", "note", slug])?;
        self.send_json(self.request(Method::GET, url, token)).await
    }

    pub async fn save_note(&self, req: &SaveNoteRequest, token: Option<&str>) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "note", "save"])?;
        self.send_empty(self.request(Method::POST, url, token).json(req))
            .await
    }

    pub async fn delete_note(&self, slug: &str, token: Option<&str>) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "note", "delete"])?;
        let body = SlugRequest {
            slug: slug.to_string(),
        };
        self.send_empty(self.request(Method::POST, url, token).json(&body))
            .await
    }

    pub async fn share_note(&self, slug: &str, shared: bool, token: Option<&str>) -> Result<(), ApiError> {
        let url = self.endpoint(&["api", "note", "share"])?;
        let body = ShareNoteRequest {
            slug: slug.to_string(),
            is_shared: i32::from(shared),
        };
        self.send_empty(self.request(Method::POST, url, token).json(&body))
            .await
    }

    /// Similarity search. The query is trimmed; a blank query never reaches
    /// the backend.
    pub async fn search(&self, query: &str, token: Option<&str>) -> Result<Vec<SearchNote>, ApiError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.endpoint(&["api", "note", "search"])?;
        let results: Option<Vec<SearchNote>> = self
            .send_json(self.request(Method::GET, url, token).query(&[("query", query)]))
            .await?;
        Ok(results.unwrap_or_default())
    }

    pub async fn get_public_note(&self, slug: &str, token: Option<&str>) -> Result<Option<SharedNote>, ApiError> {
        let url = self.endpoint(&["public", "note", slug])?;
        self.send_json(self.request(Method::GET, url, token)).await
    }

    // ========================================================================
    // Authentication
    // ========================================================================

    /// Password login. A 401 here is a rejected credential, not an expired
    /// session, so it comes back as `ApiError::Status` with the backend's
    /// message.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let url = self.endpoint(&["public", "login"])?;
        let body = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response: Option<TokenResponse> = self
            .send_credentials(self.request(Method::POST, url, None).json(&body))
            .await?;
        Ok(response.unwrap_or_default())
    }

    /// Exchange a Google authorization code for a binfer token.
    pub async fn login_google(&self, code: &str, redirect_uri: &str) -> Result<TokenResponse, ApiError> {
        let url = self.endpoint(&["public", "login-google-oauth2"])?;
        let body = GoogleOAuthRequest {
            code: code.to_string(),
            redirect_uri: redirect_uri.to_string(),
        };
        let response: Option<TokenResponse> = self
            .send_credentials(self.request(Method::POST, url, None).json(&body))
            .await?;
        Ok(response.unwrap_or_default())
    }

    // ========================================================================
    // Uploads
    // ========================================================================

    /// Ask the backend for a pre-signed object-storage token for `key`.
    pub async fn upload_token(&self, key: &str, token: Option<&str>) -> Result<UploadToken, ApiError> {
        let url = self.endpoint(&["api", "qiniu", "uptoken"])?;
        let response: Option<UploadToken> = self
            .send_json(self.request(Method::GET, url, token).query(&[("key", key)]))
            .await?;
        response.ok_or_else(|| ApiError::Decode("empty upload token response".to_string()))
    }

    // ========================================================================
    // Request / response plumbing
    // ========================================================================

    /// Join path segments onto the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, token: Option<&str>) -> RequestBuilder {
        tracing::debug!(%method, %url, authenticated = token.is_some(), "backend request");
        let builder = self.http.request(method, url);
        match token {
            Some(t) if !t.is_empty() => builder.header(AUTHORIZATION, format!("Bearer {}", t)),
            _ => builder,
        }
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<Option<T>, ApiError> {
        decode_body(check_status(builder.send().await?, true).await?).await
    }

    /// Like `send_json` for the login endpoints, where 401 keeps its body.
    async fn send_credentials<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<Option<T>, ApiError> {
        decode_body(check_status(builder.send().await?, false).await?).await
    }

    async fn send_empty(&self, builder: RequestBuilder) -> Result<(), ApiError> {
        check_status(builder.send().await?, true).await?;
        Ok(())
    }
}

/// Empty or `null` bodies decode to `None`.
async fn decode_body<T: DeserializeOwned>(response: Response) -> Result<Option<T>, ApiError> {
    let body = response.bytes().await?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice::<Option<T>>(&body).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Response side: with `session` set, 401 becomes `Unauthorized`. Other
/// failures carry the backend's message when its body has one.
async fn check_status(response: Response, session: bool) -> Result<Response, ApiError> {
    let status = response.status();
    if session && status == StatusCode::UNAUTHORIZED {
        tracing::info!(url = %response.url(), "backend rejected credentials");
        return Err(ApiError::Unauthorized);
    }
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<BackendError>(&body)
        .ok()
        .and_then(|e| e.message)
        .filter(|m| !m.trim().is_empty());
    Err(ApiError::Status { status, message })
}
