use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::common::PublishError;
use crate::domains::metadata::models::{Manifest, ManifestDefaults, MetadataValidation};
use crate::kernel::{bounded, BaseIdentityService, BaseMediaServices, PublisherDeps};

/// Builds, validates and commits post manifests.
pub struct MetadataBuilder {
    identity: Arc<dyn BaseIdentityService>,
    media: Arc<dyn BaseMediaServices>,
    defaults: ManifestDefaults,
    call_timeout: Duration,
}

impl MetadataBuilder {
    pub fn new(deps: &PublisherDeps) -> Self {
        Self {
            identity: deps.identity.clone(),
            media: deps.media.clone(),
            defaults: deps.settings.manifest.clone(),
            call_timeout: deps.settings.call_timeout,
        }
    }

    /// Manifest for the transcoded video. Pure apart from the fresh `metadata_id`.
    pub fn build(&self, content: &str, playback_url: &str) -> Manifest {
        let manifest = Manifest::for_video(&self.defaults, content, playback_url);
        debug!(metadata_id = %manifest.metadata_id, %playback_url, "Built manifest");
        manifest
    }

    /// Ask the identity service whether the manifest is acceptable.
    ///
    /// An unreachable validator counts as invalid.
    pub async fn validate_remote(
        &self,
        manifest: &Manifest,
    ) -> Result<MetadataValidation, PublishError> {
        let validation = bounded(self.call_timeout, self.identity.validate_metadata(manifest))
            .await
            .map_err(|e| PublishError::MetadataInvalid {
                diagnostics: format!("validation request failed: {}", e),
            })?;

        if !validation.valid {
            let diagnostics = validation
                .diagnostics
                .clone()
                .unwrap_or_else(|| "no diagnostics returned".to_string());
            warn!(metadata_id = %manifest.metadata_id, %diagnostics, "Manifest rejected");
            return Err(PublishError::MetadataInvalid { diagnostics });
        }

        Ok(validation)
    }

    /// Commit a validated manifest, returning its content URI.
    pub async fn commit_to_storage(&self, manifest: &Manifest) -> Result<String, PublishError> {
        let content_uri = bounded(self.call_timeout, self.media.store_manifest(manifest))
            .await
            .map_err(|e| PublishError::StorageCommitFailed(e.to_string()))?;

        if content_uri.trim().is_empty() {
            return Err(PublishError::StorageCommitFailed(
                "storage returned an empty content URI".to_string(),
            ));
        }

        info!(metadata_id = %manifest.metadata_id, %content_uri, "Manifest committed");
        Ok(content_uri)
    }
}
