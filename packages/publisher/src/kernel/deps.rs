//! Publisher dependencies (using traits for testability)
//!
//! This module provides the dependency container used by every publishing
//! component. All external services sit behind trait abstractions so tests can
//! swap in the mocks from `test_dependencies`.

use anyhow::Result;
use async_trait::async_trait;
use safeupload_client::{
    FileHandle, ModerationResponse, SafeUploadClient, TranscodeRequest, TranscodeResponse,
};
use std::sync::Arc;

use crate::config::PublishSettings;
use crate::domains::metadata::Manifest;
use crate::kernel::{BaseIdentityService, BaseMediaServices, ProgressHub};

// =============================================================================
// SafeUploadClient Adapter (implements BaseMediaServices trait)
// =============================================================================

/// Wrapper around SafeUploadClient that implements BaseMediaServices trait
pub struct SafeUploadAdapter(pub Arc<SafeUploadClient>);

impl SafeUploadAdapter {
    pub fn new(client: Arc<SafeUploadClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseMediaServices for SafeUploadAdapter {
    async fn upload(&self, file: &FileHandle) -> Result<String> {
        Ok(self.0.upload(file).await?.upload_path)
    }

    async fn check_moderation(&self, upload_path: &str) -> Result<ModerationResponse> {
        Ok(self.0.check_nsfw(upload_path).await?)
    }

    async fn transcode(&self, request: &TranscodeRequest) -> Result<TranscodeResponse> {
        Ok(self.0.transcode(request).await?)
    }

    async fn store_manifest(&self, manifest: &Manifest) -> Result<String> {
        Ok(self.0.store_manifest(manifest).await?.content_uri)
    }
}

// =============================================================================
// PublisherDeps
// =============================================================================

/// Dependencies shared by the auth, pipeline, metadata and submission components
#[derive(Clone)]
pub struct PublisherDeps {
    pub identity: Arc<dyn BaseIdentityService>,
    pub media: Arc<dyn BaseMediaServices>,
    /// Progress fan-out for observers of a run
    pub progress: ProgressHub,
    pub settings: PublishSettings,
}

impl PublisherDeps {
    pub fn new(
        identity: Arc<dyn BaseIdentityService>,
        media: Arc<dyn BaseMediaServices>,
        progress: ProgressHub,
        settings: PublishSettings,
    ) -> Self {
        Self {
            identity,
            media,
            progress,
            settings,
        }
    }

    /// Production wiring: SafeUpload REST client for media, caller-supplied identity client.
    pub fn with_safeupload(
        identity: Arc<dyn BaseIdentityService>,
        client: SafeUploadClient,
        settings: PublishSettings,
    ) -> Self {
        Self::new(
            identity,
            Arc::new(SafeUploadAdapter::new(Arc::new(client))),
            ProgressHub::new(),
            settings,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::test_dependencies::MockIdentityService;

    #[test]
    fn test_safeupload_wiring_keeps_settings() {
        let client = SafeUploadClient::new("http://localhost:8080").unwrap();
        let settings = PublishSettings::builder()
            .transcode_description("staging")
            .build();

        let deps = PublisherDeps::with_safeupload(
            Arc::new(MockIdentityService::new()),
            client,
            settings,
        );

        assert_eq!(deps.settings.transcode_description, "staging");
    }
}

