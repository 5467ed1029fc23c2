//! Image upload to object storage.
//!
//! The browser sends a pasted image here; we validate it, ask the backend
//! for a pre-signed upload token keyed by a fresh file name, post the file
//! straight to the storage endpoint, and hand back the public URL. One
//! attempt, no chunking.

use crate::api_client::ApiClient;
use crate::error::UploadError;
use crate::models::UploadResult;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use url::Url;

/// Largest accepted image, in bytes.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const DEFAULT_EXTENSION: &str = "jpg";

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Reject anything that is not an image or is over the size ceiling.
    pub fn validate(&self) -> Result<(), UploadError> {
        if !self.content_type.starts_with("image/") {
            return Err(UploadError::NotAnImage);
        }
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(UploadError::TooLarge);
        }
        Ok(())
    }
}

/// Storage key of the form `<unix-millis>-<6 base36 chars>.<ext>`.
pub fn generate_file_key(file_name: &str) -> String {
    format!(
        "{}-{}.{}",
        Utc::now().timestamp_millis(),
        crate::random_base36(6),
        file_extension(file_name)
    )
}

fn file_extension(file_name: &str) -> String {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

#[derive(Debug, Clone)]
pub struct Uploader {
    http: reqwest::Client,
    upload_url: Url,
    image_base_url: String,
}

impl Uploader {
    pub fn new(http: reqwest::Client, upload_url: Url, image_base_url: impl Into<String>) -> Self {
        Self {
            http,
            upload_url,
            image_base_url: image_base_url.into(),
        }
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.image_base_url.trim_end_matches('/'), key)
    }

    /// Validate, fetch an upload token, post to storage, return the public URL.
    pub async fn upload(
        &self,
        api: &ApiClient,
        token: Option<&str>,
        image: ImageUpload,
    ) -> Result<String, UploadError> {
        image.validate()?;

        let key = generate_file_key(&image.file_name);
        let uptoken = api
            .upload_token(&key, token)
            .await
            .map_err(UploadError::Token)?
            .uptoken;

        let size = image.bytes.len();
        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(&image.content_type)
            .map_err(|e| UploadError::Storage(e.to_string()))?;
        let form = Form::new()
            .text("token", uptoken)
            .text("key", key.clone())
            .part("file", part);

        let response = self
            .http
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Storage(e.to_string()))?;

        if !response.status().is_success() {
            return Err(UploadError::Storage(format!(
                "storage returned {}",
                response.status()
            )));
        }

        let result: UploadResult = response
            .json()
            .await
            .map_err(|e| UploadError::Storage(e.to_string()))?;

        tracing::info!(key = %result.key, size, "image uploaded");
        Ok(self.public_url(&result.key))
    }
}
