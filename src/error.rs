//! Error types for backend calls and image uploads.

use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a call to the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered 401. The page layer logs the user out.
    #[error("not authenticated")]
    Unauthorized,
    /// Any other non-success status, with the backend's message if it sent one.
    #[error("backend returned {status}: {}", message.as_deref().unwrap_or("no message"))]
    Status {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response body: {0}")]
    Decode(String),
    #[error("invalid request URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// HTTP status behind the failure, when the backend answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Backend-supplied message, when there is one.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message: Some(m), ..
            } => Some(m.as_str()),
            _ => None,
        }
    }
}

/// Failure of the clipboard image upload pipeline.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Only image files are allowed")]
    NotAnImage,
    #[error("Image size must be less than 5MB")]
    TooLarge,
    #[error("Failed to get upload token")]
    Token(#[source] ApiError),
    #[error("Failed to upload image")]
    Storage(String),
}

impl UploadError {
    /// True when the upload failed because the session expired.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, UploadError::Token(e) if e.is_unauthorized())
    }
}
