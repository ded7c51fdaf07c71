//! Pure SafeUpload REST API client.
//!
//! A minimal client for the SafeUpload service. Wraps the four endpoints the
//! publishing flow consumes: raw video upload, NSFW moderation check,
//! transcoding and addressed (permanent) storage of post manifests.
//!
//! # Example
//!
//! ```rust,ignore
//! use safeupload_client::{FileHandle, SafeUploadClient, TranscodeRequest};
//!
//! let client = SafeUploadClient::new("https://safeupload.fly.dev")?;
//!
//! let file = FileHandle::from_path("clip.mp4").await?;
//! let uploaded = client.upload(&file).await?;
//! let verdict = client.check_nsfw(&uploaded.upload_path).await?;
//! ```

pub mod error;
pub mod types;

pub use error::{Result, SafeUploadError};
pub use types::{
    FileHandle, ModerationRequest, ModerationResponse, StorageResponse, TranscodeRequest,
    TranscodeResponse, TranscodedAsset, UploadResponse, DEFAULT_VIDEO_MIME,
};

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://safeupload.fly.dev";

/// Default per-request timeout. Transcoding can take a while.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const UPLOAD_PATH: &str = "/upload";
const NSFW_CHECK_PATH: &str = "/nsfwcheck";
const TRANSCODE_PATH: &str = "/uploadtolivepeer";
const STORAGE_PATH: &str = "/uploadWithBundlr";

/// Multipart field name the upload endpoint expects.
const VIDEO_FIELD: &str = "video";

#[derive(Clone)]
pub struct SafeUploadClient {
    http_client: Client,
    base_url: String,
}

impl SafeUploadClient {
    /// Create a client for the given base URL with the default timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a client with a custom per-request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(SafeUploadError::Config(format!(
                "base URL must be http(s): {}",
                base_url
            )));
        }

        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SafeUploadError::Config(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Upload a raw video. Returns the server-side path of the stored file.
    pub async fn upload(&self, file: &FileHandle) -> Result<UploadResponse> {
        let part = Part::bytes(file.bytes().to_vec())
            .file_name(file.name().to_string())
            .mime_str(file.mime())?;
        let form = Form::new().part(VIDEO_FIELD, part);

        debug!(file = %file.name(), size = file.len(), "Uploading video");
        let resp = self
            .http_client
            .post(self.url(UPLOAD_PATH))
            .multipart(form)
            .send()
            .await?;

        let uploaded: UploadResponse = Self::parse(resp).await?;
        if uploaded.upload_path.is_empty() {
            return Err(SafeUploadError::MissingField("uploadPath"));
        }
        Ok(uploaded)
    }

    /// Run the NSFW classifier over a previously uploaded video.
    pub async fn check_nsfw(&self, video_path: &str) -> Result<ModerationResponse> {
        debug!(video_path, "Requesting NSFW check");
        self.post_json(
            NSFW_CHECK_PATH,
            &ModerationRequest {
                video_path: video_path.to_string(),
            },
        )
        .await
    }

    /// Submit an uploaded video for transcoding.
    pub async fn transcode(&self, request: &TranscodeRequest) -> Result<TranscodeResponse> {
        debug!(name = %request.name, video_url = %request.video_url, "Requesting transcode");
        self.post_json(TRANSCODE_PATH, request).await
    }

    /// Commit a manifest to addressed storage. Returns its content URI.
    pub async fn store_manifest<T: Serialize + ?Sized>(
        &self,
        manifest: &T,
    ) -> Result<StorageResponse> {
        debug!("Committing manifest to addressed storage");
        let stored: StorageResponse = self.post_json(STORAGE_PATH, manifest).await?;
        if stored.content_uri.is_empty() {
            return Err(SafeUploadError::MissingField("contentURI"));
        }
        Ok(stored)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R> {
        let resp = self
            .http_client
            .post(self.url(path))
            .json(body)
            .send()
            .await?;
        Self::parse(resp).await
    }

    async fn parse<R: DeserializeOwned>(resp: reqwest::Response) -> Result<R> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SafeUploadError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(resp.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_http_base_url() {
        let err = SafeUploadClient::new("ftp://example.org").err().unwrap();
        assert!(matches!(err, SafeUploadError::Config(_)));
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = SafeUploadClient::new("http://localhost:8080/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.url(UPLOAD_PATH), "http://localhost:8080/upload");
    }
}
