//! Per-browser authentication state.
//!
//! The backend issues an opaque bearer token; the front-end keeps it in an
//! HttpOnly cookie and forwards it on every API call. A second cookie
//! remembers where to send the user once they have logged in again.

use crate::config::GoogleOAuth;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use url::Url;

/// Cookie holding the backend bearer token.
pub const TOKEN_COOKIE: &str = "auth_token";

/// Cookie holding the local path to restore after login.
pub const REDIRECT_COOKIE: &str = "redirect_after_login";

pub const GOOGLE_AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";

// ============================================================================
// Token store
// ============================================================================

pub fn auth_token(jar: &CookieJar) -> Option<String> {
    jar.get(TOKEN_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
}

pub fn is_authenticated(jar: &CookieJar) -> bool {
    auth_token(jar).is_some()
}

pub fn set_auth_token(jar: CookieJar, token: &str, secure: bool) -> CookieJar {
    jar.add(build_cookie(TOKEN_COOKIE, token.to_string(), secure))
}

pub fn clear_auth_token(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(TOKEN_COOKIE).path("/"))
}

// ============================================================================
// Redirect after login
// ============================================================================

/// Remember `url` for after login. Anything but a local path is ignored.
pub fn save_redirect_url(jar: CookieJar, url: &str, secure: bool) -> CookieJar {
    if !is_local_path(url) {
        return jar;
    }
    jar.add(build_cookie(
        REDIRECT_COOKIE,
        urlencoding::encode(url).into_owned(),
        secure,
    ))
}

/// Read and clear the remembered path.
pub fn take_redirect_url(jar: CookieJar) -> (CookieJar, Option<String>) {
    let url = jar
        .get(REDIRECT_COOKIE)
        .and_then(|c| urlencoding::decode(c.value()).ok().map(|u| u.into_owned()))
        .filter(|u| is_local_path(u));
    if jar.get(REDIRECT_COOKIE).is_none() {
        return (jar, url);
    }
    (jar.remove(Cookie::build(REDIRECT_COOKIE).path("/")), url)
}

/// A same-origin absolute path: `/foo`, never `//host` or `/\host`.
pub fn is_local_path(url: &str) -> bool {
    url.starts_with('/')
        && !url.starts_with("//")
        && !url.starts_with("/\\")
        && !url.chars().any(char::is_control)
}

fn build_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

// ============================================================================
// Google OAuth2
// ============================================================================

/// Authorization URL for the Google consent screen.
pub fn google_auth_url(oauth: &GoogleOAuth) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(GOOGLE_AUTH_ENDPOINT)?;
    url.query_pairs_mut()
        .append_pair("client_id", &oauth.client_id)
        .append_pair("redirect_uri", &oauth.redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("scope", "openid email profile")
        .append_pair("access_type", "online")
        .append_pair("prompt", "select_account");
    Ok(url)
}
