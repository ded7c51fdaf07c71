//! Publish video workflow
//!
//! Orchestrates one publish attempt end to end:
//! 1. Upload, moderation gate and transcode (UploadPipeline)
//! 2. Build the manifest and validate it remotely
//! 3. Commit the validated manifest to storage
//! 4. Re-check the session and submit the delegated post
//!
//! The first failure ends the run. Nothing is retried or rolled back.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::PublishError;
use crate::domains::auth::AuthSession;
use crate::domains::metadata::MetadataBuilder;
use crate::domains::posts::submitter::PostSubmitter;
use crate::domains::upload::{PipelineRun, Stage, UploadPipeline};
use crate::kernel::{ProgressHub, PublisherDeps};

/// Everything a caller needs once a post exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishOutcome {
    pub run_id: Uuid,
    pub post_id: String,
    pub content_uri: String,
    pub metadata_id: Uuid,
    pub playback_url: String,
    post_url: String,
}

impl PublishOutcome {
    /// Link to the post in the viewer app.
    pub fn post_url(&self) -> &str {
        &self.post_url
    }
}

pub struct Publisher {
    pipeline: UploadPipeline,
    metadata: MetadataBuilder,
    submitter: PostSubmitter,
    progress: ProgressHub,
    post_viewer_base_url: String,
}

impl Publisher {
    pub fn new(deps: &PublisherDeps) -> Self {
        Self {
            pipeline: UploadPipeline::new(deps),
            metadata: MetadataBuilder::new(deps),
            submitter: PostSubmitter::new(deps),
            progress: deps.progress.clone(),
            post_viewer_base_url: deps
                .settings
                .post_viewer_base_url
                .trim_end_matches('/')
                .to_string(),
        }
    }

    pub fn progress(&self) -> &ProgressHub {
        &self.progress
    }

    /// Drive `run` from Upload to a created post.
    ///
    /// Requires an authenticated session with no other publish in flight.
    /// On failure, including a refused start, the run is left in `Failed`
    /// with the error and its user facing status message recorded, and the
    /// run's progress channel is closed.
    pub async fn publish(
        &self,
        auth: &AuthSession,
        run: &mut PipelineRun,
    ) -> Result<PublishOutcome, PublishError> {
        let result = match auth.begin_run() {
            Ok(token) => {
                tracing::info!(
                    run_id = %run.id(),
                    file = run.source_file().map(|f| f.name()).unwrap_or("<none>"),
                    "Starting publish workflow"
                );
                let result = self.execute(auth, run).await;
                drop(token);
                result
            }
            Err(e) => {
                tracing::warn!(run_id = %run.id(), error = %e, "Publish refused");
                Err(e)
            }
        };

        let progress = match &result {
            Ok(outcome) => {
                tracing::info!(
                    run_id = %run.id(),
                    post_id = %outcome.post_id,
                    post_url = %outcome.post_url,
                    "Publish workflow completed"
                );
                run.complete("Post created successfully!")
            }
            Err(e) => {
                tracing::error!(
                    run_id = %run.id(),
                    error = %e,
                    stage = ?run.stage(),
                    "Publish workflow failed"
                );
                run.fail(e)
            }
        };
        self.progress.publish(&progress).await;
        self.progress.close(run.id()).await;
        self.progress.cleanup().await;

        result
    }

    async fn execute(
        &self,
        auth: &AuthSession,
        run: &mut PipelineRun,
    ) -> Result<PublishOutcome, PublishError> {
        self.progress
            .publish(&run.advance(Stage::Pending, "Creating post..."))
            .await;

        let playback_url = self.pipeline.run(run).await?;

        // Step 1: Build
        self.progress
            .publish(&run.advance(
                Stage::BuildMetadata,
                "Video uploaded, creating post metadata...",
            ))
            .await;
        let manifest = self.metadata.build(run.content(), &playback_url);
        let metadata_id = manifest.metadata_id;
        run.record_manifest(manifest.clone());

        // Step 2: Validate
        self.progress
            .publish(&run.advance(Stage::ValidateMetadata, "Validating post metadata..."))
            .await;
        self.metadata.validate_remote(&manifest).await?;
        run.mark_manifest_validated();

        // Step 3: Commit
        self.progress
            .publish(&run.advance(
                Stage::CommitStorage,
                "Metadata validated, uploading to storage...",
            ))
            .await;
        let content_uri = self.metadata.commit_to_storage(&manifest).await?;
        run.record_content_uri(content_uri.clone());

        // Step 4: Submit
        self.progress
            .publish(&run.advance(Stage::Submit, "Metadata uploaded, creating post..."))
            .await;
        let profile_id = self.profile_for_submission(auth).await?;
        let post_id = self.submitter.submit(auth, &profile_id, &content_uri).await?;
        run.record_post(post_id.clone());

        Ok(PublishOutcome {
            run_id: run.id(),
            post_url: format!("{}/{}", self.post_viewer_base_url, post_id),
            post_id,
            content_uri,
            metadata_id,
            playback_url,
        })
    }

    /// Profile to post as. A stale session wins over a missing profile.
    async fn profile_for_submission(&self, auth: &AuthSession) -> Result<String, PublishError> {
        match auth.session().profile_id() {
            Some(id) => Ok(id.to_string()),
            None if !auth.is_authenticated().await => Err(PublishError::NotAuthenticated),
            None => Err(PublishError::NoProfileFound {
                address: auth.session().address.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::upload::ModerationStatus;
    use crate::kernel::test_dependencies::{
        MockIdentityService, MockMediaServices, MockWalletSigner, TestDependencies,
    };
    use safeupload_client::FileHandle;
    use serde_json::json;

    async fn signed_in(test_deps: TestDependencies) -> (AuthSession, Publisher) {
        let deps = test_deps.into_deps();
        let mut auth = AuthSession::new(deps.identity.clone());
        let _ = auth
            .authenticate(Some(&MockWalletSigner::new("0xA11CE")))
            .await;
        (auth, Publisher::new(&deps))
    }

    fn clip_run() -> PipelineRun {
        PipelineRun::new(Some(FileHandle::from_bytes("clip.mp4", vec![0u8; 8])), "gm")
    }

    #[tokio::test]
    async fn test_publish_records_every_stage_output() {
        let test_deps = TestDependencies::new()
            .mock_identity(MockIdentityService::new().with_profile("0x01", "alice.test"))
            .mock_media(MockMediaServices::new().with_storage_uri("ar://abc"));
        let (auth, publisher) = signed_in(test_deps).await;

        let mut run = clip_run();
        let outcome = publisher.publish(&auth, &mut run).await.unwrap();

        assert_eq!(outcome.post_id, "0x01-0x01-DA-mock");
        assert_eq!(outcome.content_uri, "ar://abc");
        assert_eq!(
            outcome.post_url(),
            "https://testnet.lenster.xyz/posts/0x01-0x01-DA-mock"
        );
        assert_eq!(run.stage(), Stage::Completed);
        assert_eq!(run.status_message(), "Post created successfully!");
        assert_eq!(run.moderation(), Some(ModerationStatus::Clean));
        assert!(run.manifest_validated());
        assert_eq!(run.manifest().map(|m| m.metadata_id), Some(outcome.metadata_id));
        assert_eq!(run.post_id(), Some("0x01-0x01-DA-mock"));
    }

    #[tokio::test]
    async fn test_rejected_content_fails_run() {
        let test_deps = TestDependencies::new()
            .mock_identity(MockIdentityService::new().with_profile("0x01", "alice.test"))
            .mock_media(
                MockMediaServices::new().with_verdicts(vec![json!("frames"), json!("Hentai")]),
            );
        let (auth, publisher) = signed_in(test_deps).await;

        let mut run = clip_run();
        let err = publisher.publish(&auth, &mut run).await.unwrap_err();

        assert_eq!(
            err,
            PublishError::ContentRejected {
                reason: "Hentai".into()
            }
        );
        assert_eq!(run.stage(), Stage::Failed);
        assert_eq!(run.status_message(), "NSFW content detected: Hentai");
        assert!(run.manifest().is_none());
    }

    #[tokio::test]
    async fn test_requires_authenticated_session() {
        let deps = TestDependencies::new().into_deps();
        let auth = AuthSession::new(deps.identity.clone());
        let publisher = Publisher::new(&deps);

        let mut run = clip_run();
        let err = publisher.publish(&auth, &mut run).await.unwrap_err();

        assert_eq!(err, PublishError::NotAuthenticated);
        assert_eq!(run.stage(), Stage::Failed);
        assert_eq!(run.status_message(), "User is not authenticated");
        assert_eq!(run.error(), Some(&PublishError::NotAuthenticated));
    }

    #[tokio::test]
    async fn test_refused_start_closes_progress_channel() {
        let deps = TestDependencies::new().into_deps();
        let auth = AuthSession::new(deps.identity.clone());
        let publisher = Publisher::new(&deps);

        let mut run = clip_run();
        let mut rx = publisher.progress().subscribe(run.id()).await;
        publisher.publish(&auth, &mut run).await.unwrap_err();

        let update = rx.recv().await.unwrap();
        assert_eq!(update.stage, Stage::Failed);
        assert_eq!(update.status_message, "User is not authenticated");
        assert!(matches!(
            rx.recv().await,
            Err(tokio::sync::broadcast::error::RecvError::Closed)
        ));
    }

    #[tokio::test]
    async fn test_logout_leaves_finished_run_alone() {
        let test_deps = TestDependencies::new()
            .mock_identity(MockIdentityService::new().with_profile("0x01", "alice.test"));
        let (mut auth, publisher) = signed_in(test_deps).await;

        let mut done = clip_run();
        let mut rx = publisher.progress().subscribe(done.id()).await;
        publisher.publish(&auth, &mut done).await.unwrap();
        auth.logout();

        assert_eq!(done.stage(), Stage::Completed);
        let mut last = None;
        while let Ok(update) = rx.recv().await {
            last = Some(update.stage);
        }
        assert_eq!(last, Some(Stage::Completed));

        let mut next = clip_run();
        let err = publisher.publish(&auth, &mut next).await.unwrap_err();
        assert_eq!(err, PublishError::NotAuthenticated);
        assert_eq!(next.stage(), Stage::Failed);
    }

    #[tokio::test]
    async fn test_missing_profile_stops_at_submit() {
        let test_deps = TestDependencies::new();
        let identity = test_deps.identity.clone();
        let (auth, publisher) = signed_in(test_deps).await;

        let mut run = clip_run();
        let err = publisher.publish(&auth, &mut run).await.unwrap_err();

        assert_eq!(
            err,
            PublishError::NoProfileFound {
                address: "0xA11CE".into()
            }
        );
        assert!(run.content_uri().is_some());
        assert!(identity.post_requests().is_empty());
    }
}
