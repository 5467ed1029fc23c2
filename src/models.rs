//! Records exchanged with the backend API.
//!
//! The backend owns every entity; these are plain serde shapes with camelCase
//! field names and lenient defaults for anything the backend leaves out.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ============================================================================
// Notes
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Note {
    pub slug: String,
    pub inner_slug: Option<String>,
    pub content_md: String,
    pub title: String,
    pub is_locked: i32,
    pub is_shared: i32,
    pub uv: i64,
}

impl Note {
    pub fn has_content(&self) -> bool {
        !self.content_md.is_empty()
    }

    pub fn locked(&self) -> bool {
        self.is_locked != 0
    }

    pub fn shared(&self) -> bool {
        self.is_shared != 0
    }

    /// Slug used in public links: the inner slug when the backend assigned one.
    pub fn public_slug(&self) -> &str {
        public_slug(&self.slug, self.inner_slug.as_deref())
    }
}

/// A note as served on the public share page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SharedNote {
    pub slug: String,
    pub content_md: String,
    pub is_shared: i32,
    pub create_time: String,
    pub update_time: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchNote {
    pub slug: String,
    pub inner_slug: Option<String>,
    pub content_md: String,
    pub title: String,
    pub similarity: f64,
    pub create_time: String,
    pub update_time: String,
}

impl SearchNote {
    pub fn link_slug(&self) -> &str {
        public_slug(&self.slug, self.inner_slug.as_deref())
    }

    /// Similarity as a percentage with one decimal, e.g. `87.5%`.
    pub fn similarity_percent(&self) -> String {
        format!("{:.1}%", self.similarity * 100.0)
    }

    /// Date part of `updateTime`, or the raw string when it doesn't parse.
    pub fn updated_date(&self) -> String {
        display_date(&self.update_time)
    }
}

fn public_slug<'a>(slug: &'a str, inner: Option<&'a str>) -> &'a str {
    match inner {
        Some(s) if !s.is_empty() => s,
        _ => slug,
    }
}

/// Format a backend timestamp as `YYYY-MM-DD`.
pub fn display_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d").to_string();
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return dt.format("%Y-%m-%d").to_string();
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.to_string();
    }
    raw.to_string()
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SaveNoteRequest {
    pub slug: String,
    pub content_md: String,
    pub is_locked: i32,
}

impl SaveNoteRequest {
    /// Build a save request; content is trimmed and notes are never locked
    /// from the editor.
    pub fn new(slug: &str, content_md: &str) -> Self {
        Self {
            slug: slug.to_string(),
            content_md: content_md.trim().to_string(),
            is_locked: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SlugRequest {
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShareNoteRequest {
    pub slug: String,
    pub is_shared: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoogleOAuthRequest {
    pub code: String,
    pub redirect_uri: String,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TokenResponse {
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadToken {
    pub uptoken: String,
}

/// Object-storage reply to a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadResult {
    pub key: String,
}

/// Error body the backend sends with non-2xx responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendError {
    pub code: Option<i64>,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_lenient_decode() {
        let note: Note = serde_json::from_str(r##"{"slug":"abc1234","contentMd":"# Hi"}"##).unwrap();
        assert_eq!(note.slug, "abc1234");
        assert_eq!(note.content_md, "# Hi");
        assert_eq!(note.title, "");
        assert!(!note.locked());
        assert!(note.inner_slug.is_none());
    }

    #[test]
    fn test_note_public_slug_prefers_inner() {
        let mut note = Note {
            slug: "abc".to_string(),
            ..Default::default()
        };
        assert_eq!(note.public_slug(), "abc");
        note.inner_slug = Some(String::new());
        assert_eq!(note.public_slug(), "abc");
        note.inner_slug = Some("xyz".to_string());
        assert_eq!(note.public_slug(), "xyz");
    }

    #[test]
    fn test_save_request_trims_and_unlocks() {
        let req = SaveNoteRequest::new("abc", "\n  # Title\nbody  \n\n");
        assert_eq!(req.content_md, "# Title\nbody");
        assert_eq!(req.is_locked, 0);

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["contentMd"], "# Title\nbody");
        assert_eq!(json["isLocked"], 0);
    }

    #[test]
    fn test_search_note_similarity_percent() {
        let note = SearchNote {
            similarity: 0.875,
            ..Default::default()
        };
        assert_eq!(note.similarity_percent(), "87.5%");
    }

    #[test]
    fn test_display_date_formats() {
        assert_eq!(display_date("2024-03-01T10:20:30Z"), "2024-03-01");
        assert_eq!(display_date("2024-03-01T10:20:30.123"), "2024-03-01");
        assert_eq!(display_date("2024-03-01 10:20:30"), "2024-03-01");
        assert_eq!(display_date("2024-03-01"), "2024-03-01");
        assert_eq!(display_date("yesterday"), "yesterday");
    }

    #[test]
    fn test_google_request_field_names() {
        let req = GoogleOAuthRequest {
            code: "c".to_string(),
            redirect_uri: "https://x/cb".to_string(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["redirectUri"], "https://x/cb");
    }
}
