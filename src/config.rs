//! Runtime configuration.
//!
//! Everything is read once from the environment at startup. Only the backend
//! URL is really required, and it has a production default.

use std::env;
use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://www.binfer.net";
pub const DEFAULT_UPLOAD_URL: &str = "https://up-z2.qiniup.com";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://img.binfer.net/ucimg";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is not a valid URL: {source}")]
    InvalidUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("{name} is not a valid socket address: {value}")]
    InvalidBind { name: &'static str, value: String },
}

/// Google OAuth2 settings. Present only when both halves are configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleOAuth {
    pub client_id: String,
    pub redirect_uri: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: Url,
    pub upload_url: Url,
    pub image_base_url: String,
    pub bind: SocketAddr,
    pub google_client_id: Option<String>,
    pub oauth_redirect_uri: Option<String>,
    pub secure_cookies: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build a config from an arbitrary variable source. Empty values count
    /// as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_url = parse_url(
            "BINFER_API_URL",
            &get("BINFER_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        )?;
        let upload_url = parse_url(
            "BINFER_UPLOAD_URL",
            &get("BINFER_UPLOAD_URL").unwrap_or_else(|| DEFAULT_UPLOAD_URL.to_string()),
        )?;
        let image_base_url = get("BINFER_IMAGE_BASE_URL")
            .unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let bind_value = get("BINFER_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_value
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBind {
                name: "BINFER_BIND",
                value: bind_value.clone(),
            })?;

        let secure_cookies = get("BINFER_SECURE_COOKIES")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            api_url,
            upload_url,
            image_base_url,
            bind,
            google_client_id: get("GOOGLE_CLIENT_ID"),
            oauth_redirect_uri: get("OAUTH_REDIRECT_URI"),
            secure_cookies,
        })
    }

    pub fn google_oauth(&self) -> Option<GoogleOAuth> {
        match (&self.google_client_id, &self.oauth_redirect_uri) {
            (Some(client_id), Some(redirect_uri)) => Some(GoogleOAuth {
                client_id: client_id.clone(),
                redirect_uri: redirect_uri.clone(),
            }),
            _ => None,
        }
    }
}

fn parse_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    Url::parse(value.trim()).map_err(|source| ConfigError::InvalidUrl { name, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.api_url.as_str(), "https://www.binfer.net/");
        assert_eq!(config.upload_url.as_str(), "https://up-z2.qiniup.com/");
        assert_eq!(config.image_base_url, "https://img.binfer.net/ucimg");
        assert_eq!(config.bind.to_string(), "127.0.0.1:3000");
        assert!(config.google_oauth().is_none());
        assert!(!config.secure_cookies);
    }

    #[test]
    fn test_google_requires_both_values() {
        let config = config_from(&[("GOOGLE_CLIENT_ID", "abc")]).unwrap();
        assert!(config.google_oauth().is_none());

        let config = config_from(&[
            ("GOOGLE_CLIENT_ID", "abc"),
            ("OAUTH_REDIRECT_URI", "https://example.com/login/callback"),
        ])
        .unwrap();
        let google = config.google_oauth().unwrap();
        assert_eq!(google.client_id, "abc");
        assert_eq!(google.redirect_uri, "https://example.com/login/callback");
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        let config = config_from(&[("BINFER_API_URL", "  "), ("GOOGLE_CLIENT_ID", "")]).unwrap();
        assert_eq!(config.api_url.as_str(), "https://www.binfer.net/");
        assert!(config.google_client_id.is_none());
    }

    #[test]
    fn test_invalid_api_url() {
        let err = config_from(&[("BINFER_API_URL", "not a url")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { name: "BINFER_API_URL", .. }));
    }

    #[test]
    fn test_invalid_bind() {
        let err = config_from(&[("BINFER_BIND", "localhost")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBind { .. }));
    }

    #[test]
    fn test_image_base_trailing_slash_trimmed() {
        let config = config_from(&[("BINFER_IMAGE_BASE_URL", "https://cdn.example.com/img/")]).unwrap();
        assert_eq!(config.image_base_url, "https://cdn.example.com/img");
    }

    #[test]
    fn test_secure_cookie_flag() {
        let config = config_from(&[("BINFER_SECURE_COOKIES", "true")]).unwrap();
        assert!(config.secure_cookies);
    }
}
