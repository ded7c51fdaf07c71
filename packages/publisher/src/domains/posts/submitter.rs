use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use crate::common::PublishError;
use crate::domains::auth::AuthSession;
use crate::domains::posts::models::{DelegatedPostRequest, RelayPayload};
use crate::kernel::{bounded, BaseIdentityService, PublisherDeps};

/// Creates posts through the identity service's delegated dispatcher.
pub struct PostSubmitter {
    identity: Arc<dyn BaseIdentityService>,
    call_timeout: Duration,
}

impl PostSubmitter {
    pub fn new(deps: &PublisherDeps) -> Self {
        Self {
            identity: deps.identity.clone(),
            call_timeout: deps.settings.call_timeout,
        }
    }

    /// Post `content_uri` as `profile_id` and return the new post's id.
    ///
    /// The session is re-checked against the server first; a stale local
    /// session never reaches the dispatcher.
    pub async fn submit(
        &self,
        auth: &AuthSession,
        profile_id: &str,
        content_uri: &str,
    ) -> Result<String, PublishError> {
        if !auth.is_authenticated().await {
            warn!(%profile_id, "Session expired before post submission");
            return Err(PublishError::NotAuthenticated);
        }

        let request = DelegatedPostRequest {
            from: profile_id.to_string(),
            content_uri: content_uri.to_string(),
        };

        let wrapped = bounded(self.call_timeout, self.identity.create_delegated_post(&request))
            .await
            .map_err(|e| PublishError::SubmissionUnwrapFailed(e.to_string()))?;

        let payload = wrapped.map_err(|e| PublishError::SubmissionUnwrapFailed(e.message))?;

        match payload {
            RelayPayload::Created(post) if !post.id.is_empty() => {
                info!(post_id = %post.id, %profile_id, %content_uri, "Post created");
                Ok(post.id)
            }
            RelayPayload::Created(_) => Err(PublishError::UnexpectedSubmissionShape(
                "created post has no id".to_string(),
            )),
            RelayPayload::RelayError { reason } => Err(PublishError::UnexpectedSubmissionShape(
                format!("relay error: {}", reason),
            )),
            RelayPayload::Unknown => Err(PublishError::UnexpectedSubmissionShape(
                "unrecognized result type".to_string(),
            )),
        }
    }
}
