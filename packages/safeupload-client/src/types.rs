use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// MIME type assumed when the file name gives no hint.
pub const DEFAULT_VIDEO_MIME: &str = "video/mp4";

/// An in-memory file ready to be sent as the `video` multipart field.
#[derive(Debug, Clone)]
pub struct FileHandle {
    name: String,
    mime: String,
    bytes: Bytes,
}

impl FileHandle {
    /// Wrap bytes already in memory. The MIME type is guessed from `name`.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let name = name.into();
        let mime = mime_guess::from_path(&name)
            .first_raw()
            .unwrap_or(DEFAULT_VIDEO_MIME)
            .to_string();
        Self {
            name,
            mime,
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("{} has no file name", path.display()),
                )
            })?
            .to_string();
        let bytes = tokio::fs::read(path).await?;
        Ok(Self::from_bytes(name, bytes))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Response from `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(rename = "uploadPath")]
    pub upload_path: String,
}

/// Body for `POST /nsfwcheck`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModerationRequest {
    #[serde(rename = "videoPath")]
    pub video_path: String,
}

/// Response from `POST /nsfwcheck`.
///
/// The deployed service only returns `nsfwContent`. `clean` and `reasons`
/// are read when present so the service can move to an explicit verdict.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModerationResponse {
    #[serde(rename = "nsfwContent", default, skip_serializing_if = "Option::is_none")]
    pub nsfw_content: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clean: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reasons: Option<Vec<String>>,
}

/// Body for `POST /uploadtolivepeer`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscodeRequest {
    pub name: String,
    pub description: String,
    #[serde(rename = "videoUrl")]
    pub video_url: String,
}

/// Response from `POST /uploadtolivepeer`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscodeResponse {
    #[serde(default)]
    pub asset: Vec<TranscodedAsset>,
}

impl TranscodeResponse {
    /// Playback URL of the first returned asset, if any.
    pub fn playback_url(&self) -> Option<&str> {
        self.asset
            .first()
            .and_then(|a| a.playback_url.as_deref())
            .filter(|url| !url.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscodedAsset {
    #[serde(rename = "playbackUrl", default, skip_serializing_if = "Option::is_none")]
    pub playback_url: Option<String>,
}

/// Response from `POST /uploadWithBundlr`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageResponse {
    #[serde(rename = "contentURI", default)]
    pub content_uri: String,
}
