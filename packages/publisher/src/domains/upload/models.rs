use chrono::{DateTime, Utc};
use safeupload_client::FileHandle;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::PublishError;
use crate::domains::metadata::Manifest;

/// Where a run currently is. Stages only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Pending,
    Upload,
    ModerationCheck,
    Transcode,
    BuildMetadata,
    ValidateMetadata,
    CommitStorage,
    Submit,
    Completed,
    Failed,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Completed | Stage::Failed)
    }
}

/// Outcome of the moderation gate as recorded on the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModerationStatus {
    Clean,
    Rejected,
}

/// Snapshot published to observers on every transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunProgress {
    pub run_id: Uuid,
    pub stage: Stage,
    pub status_message: String,
}

/// State of a single publish attempt.
///
/// Created fresh for each attempt and dropped once terminal. Fields are only
/// written by the pipeline stages, in order, so `content_uri` is never set
/// without a validated manifest and `post_id` never without `content_uri`.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    id: Uuid,
    source_file: Option<FileHandle>,
    content: String,
    stage: Stage,
    upload_path: Option<String>,
    moderation: Option<ModerationStatus>,
    playback_url: Option<String>,
    manifest: Option<Manifest>,
    manifest_validated: bool,
    content_uri: Option<String>,
    post_id: Option<String>,
    status_message: String,
    error: Option<PublishError>,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl PipelineRun {
    pub fn new(source_file: Option<FileHandle>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_file,
            content: content.into(),
            stage: Stage::Pending,
            upload_path: None,
            moderation: None,
            playback_url: None,
            manifest: None,
            manifest_validated: false,
            content_uri: None,
            post_id: None,
            status_message: String::new(),
            error: None,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn source_file(&self) -> Option<&FileHandle> {
        self.source_file.as_ref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn upload_path(&self) -> Option<&str> {
        self.upload_path.as_deref()
    }

    pub fn moderation(&self) -> Option<ModerationStatus> {
        self.moderation
    }

    pub fn playback_url(&self) -> Option<&str> {
        self.playback_url.as_deref()
    }

    pub fn manifest(&self) -> Option<&Manifest> {
        self.manifest.as_ref()
    }

    pub fn manifest_validated(&self) -> bool {
        self.manifest_validated
    }

    pub fn content_uri(&self) -> Option<&str> {
        self.content_uri.as_deref()
    }

    pub fn post_id(&self) -> Option<&str> {
        self.post_id.as_deref()
    }

    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    pub fn error(&self) -> Option<&PublishError> {
        self.error.as_ref()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    pub fn is_terminal(&self) -> bool {
        self.stage.is_terminal()
    }

    pub fn progress(&self) -> RunProgress {
        RunProgress {
            run_id: self.id,
            stage: self.stage,
            status_message: self.status_message.clone(),
        }
    }

    pub(crate) fn advance(
        &mut self,
        stage: Stage,
        status_message: impl Into<String>,
    ) -> RunProgress {
        self.stage = stage;
        self.status_message = status_message.into();
        self.progress()
    }

    pub(crate) fn record_upload(&mut self, upload_path: String) {
        self.upload_path = Some(upload_path);
    }

    pub(crate) fn record_moderation(&mut self, status: ModerationStatus) {
        self.moderation = Some(status);
    }

    pub(crate) fn record_playback(&mut self, playback_url: String) {
        self.playback_url = Some(playback_url);
    }

    pub(crate) fn record_manifest(&mut self, manifest: Manifest) {
        self.manifest = Some(manifest);
        self.manifest_validated = false;
    }

    pub(crate) fn mark_manifest_validated(&mut self) {
        self.manifest_validated = self.manifest.is_some();
    }

    pub(crate) fn record_content_uri(&mut self, content_uri: String) {
        debug_assert!(self.manifest_validated, "content URI without validated manifest");
        self.content_uri = Some(content_uri);
    }

    pub(crate) fn record_post(&mut self, post_id: String) {
        debug_assert!(self.content_uri.is_some(), "post without content URI");
        self.post_id = Some(post_id);
    }

    pub(crate) fn complete(&mut self, status_message: impl Into<String>) -> RunProgress {
        self.finished_at = Some(Utc::now());
        self.advance(Stage::Completed, status_message)
    }

    pub(crate) fn fail(&mut self, error: &PublishError) -> RunProgress {
        self.error = Some(error.clone());
        self.finished_at = Some(Utc::now());
        self.advance(Stage::Failed, error.status_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_is_pending_and_empty() {
        let run = PipelineRun::new(None, "hello");
        assert_eq!(run.stage(), Stage::Pending);
        assert!(run.upload_path().is_none());
        assert!(run.content_uri().is_none());
        assert!(run.post_id().is_none());
        assert!(!run.is_terminal());
    }

    #[test]
    fn test_each_run_gets_its_own_id() {
        let a = PipelineRun::new(None, "x");
        let b = PipelineRun::new(None, "x");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_fail_records_error_and_message() {
        let mut run = PipelineRun::new(None, "x");
        let progress = run.fail(&PublishError::NoFileSelected);

        assert_eq!(progress.stage, Stage::Failed);
        assert_eq!(progress.status_message, "No file selected");
        assert_eq!(run.error(), Some(&PublishError::NoFileSelected));
        assert!(run.finished_at().is_some());
        assert!(run.is_terminal());
    }

    #[test]
    fn test_new_manifest_resets_validation() {
        use crate::domains::metadata::ManifestDefaults;

        let mut run = PipelineRun::new(None, "x");
        run.mark_manifest_validated();
        assert!(!run.manifest_validated());

        run.record_manifest(Manifest::for_video(&ManifestDefaults::default(), "x", "u"));
        run.mark_manifest_validated();
        assert!(run.manifest_validated());

        run.record_manifest(Manifest::for_video(&ManifestDefaults::default(), "y", "u"));
        assert!(!run.manifest_validated());
    }
}
