//! Upload -> ModerationCheck -> Transcode.
//!
//! Each stage consumes the previous stage's output, so none can be skipped or
//! reordered. The first failure ends the pipeline; nothing is retried.

use safeupload_client::{FileHandle, TranscodeRequest};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::common::PublishError;
use crate::domains::upload::models::{ModerationStatus, PipelineRun, Stage};
use crate::domains::upload::moderation::ModerationVerdict;
use crate::kernel::{bounded, BaseMediaServices, ProgressHub, PublisherDeps};

pub struct UploadPipeline {
    media: Arc<dyn BaseMediaServices>,
    progress: ProgressHub,
    call_timeout: Duration,
    transcode_description: String,
}

impl UploadPipeline {
    pub fn new(deps: &PublisherDeps) -> Self {
        Self {
            media: deps.media.clone(),
            progress: deps.progress.clone(),
            call_timeout: deps.settings.call_timeout,
            transcode_description: deps.settings.transcode_description.clone(),
        }
    }

    /// Run all three stages and return the playback URL of the transcoded video.
    pub async fn run(&self, run: &mut PipelineRun) -> Result<String, PublishError> {
        // Precondition, not a stage: nothing has been sent yet
        let file = run.source_file().cloned().ok_or(PublishError::NoFileSelected)?;

        let upload_path = self.upload(run, &file).await?;
        self.check_moderation(run, &upload_path).await?;
        self.transcode(run, &upload_path).await
    }

    async fn upload(
        &self,
        run: &mut PipelineRun,
        file: &FileHandle,
    ) -> Result<String, PublishError> {
        self.progress
            .publish(&run.advance(Stage::Upload, "Uploading video..."))
            .await;

        let upload_path = bounded(self.call_timeout, self.media.upload(file))
            .await
            .map_err(|e| PublishError::UploadFailed(e.to_string()))?;

        info!(run_id = %run.id(), %upload_path, size = file.len(), "Video uploaded");
        run.record_upload(upload_path.clone());
        Ok(upload_path)
    }

    async fn check_moderation(
        &self,
        run: &mut PipelineRun,
        upload_path: &str,
    ) -> Result<(), PublishError> {
        self.progress
            .publish(&run.advance(Stage::ModerationCheck, "Checking video for NSFW content..."))
            .await;

        let response = bounded(self.call_timeout, self.media.check_moderation(upload_path))
            .await
            .map_err(|e| PublishError::UploadFailed(format!("moderation check failed: {}", e)))?;

        match ModerationVerdict::from_response(&response) {
            ModerationVerdict::Clean => {
                run.record_moderation(ModerationStatus::Clean);
                Ok(())
            }
            verdict => {
                let reason = verdict.reason().unwrap_or_default();
                warn!(run_id = %run.id(), %upload_path, %reason, "Video rejected by moderation");
                run.record_moderation(ModerationStatus::Rejected);
                Err(PublishError::ContentRejected { reason })
            }
        }
    }

    async fn transcode(
        &self,
        run: &mut PipelineRun,
        upload_path: &str,
    ) -> Result<String, PublishError> {
        self.progress
            .publish(&run.advance(
                Stage::Transcode,
                "No NSFW content detected. Uploading to transcoder...",
            ))
            .await;

        let request = TranscodeRequest {
            name: transcode_name(upload_path),
            description: self.transcode_description.clone(),
            video_url: upload_path.to_string(),
        };

        let response = bounded(self.call_timeout, self.media.transcode(&request))
            .await
            .map_err(|e| PublishError::TranscodeFailed(e.to_string()))?;

        let playback_url = response
            .playback_url()
            .ok_or_else(|| PublishError::TranscodeFailed("no playback URL returned".to_string()))?
            .to_string();

        info!(run_id = %run.id(), %playback_url, "Video transcoded");
        run.record_playback(playback_url.clone());
        Ok(playback_url)
    }
}

/// Name sent to the transcoder: last path segment without its extension.
pub fn transcode_name(upload_path: &str) -> String {
    let segment = upload_path.rsplit('/').next().unwrap_or(upload_path);
    Path::new(segment)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(segment)
        .to_string()
}
