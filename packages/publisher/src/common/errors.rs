use thiserror::Error;

/// Everything that can end a publish attempt (or an authentication attempt).
///
/// Every variant aborts the run it occurs in. Only `NotAuthenticated` and
/// `PublishInProgress` can be resolved without starting over from Upload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    #[error("No wallet signer available")]
    WalletUnavailable,

    #[error("Wallet failed to sign the challenge: {0}")]
    SigningFailed(String),

    #[error("Identity service rejected the challenge signature: {0}")]
    ChallengeRejected(String),

    #[error("Identity service error: {0}")]
    IdentityService(String),

    #[error("No profile owned by {address}")]
    NoProfileFound { address: String },

    #[error("No file selected")]
    NoFileSelected,

    #[error("A publish is already in progress for this session")]
    PublishInProgress,

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Content rejected by moderation: {reason}")]
    ContentRejected { reason: String },

    #[error("Transcode failed: {0}")]
    TranscodeFailed(String),

    #[error("Metadata is not valid: {diagnostics}")]
    MetadataInvalid { diagnostics: String },

    #[error("Storage commit failed: {0}")]
    StorageCommitFailed(String),

    #[error("User is not authenticated")]
    NotAuthenticated,

    #[error("Post submission failed: {0}")]
    SubmissionUnwrapFailed(String),

    #[error("Unexpected submission result: {0}")]
    UnexpectedSubmissionShape(String),
}

impl PublishError {
    /// Message shown to the user when this error ends a run.
    pub fn status_message(&self) -> String {
        match self {
            Self::NoFileSelected => "No file selected".to_string(),
            Self::ContentRejected { reason } => format!("NSFW content detected: {}", reason),
            Self::UploadFailed(_) | Self::TranscodeFailed(_) => {
                "Something went wrong while uploading the video.".to_string()
            }
            Self::MetadataInvalid { .. } => "Metadata is not valid.".to_string(),
            Self::StorageCommitFailed(_) => {
                "Something went wrong while uploading the post metadata.".to_string()
            }
            Self::NotAuthenticated => "User is not authenticated".to_string(),
            Self::SubmissionUnwrapFailed(_) | Self::UnexpectedSubmissionShape(_) => {
                "Something went wrong while creating the post.".to_string()
            }
            Self::NoProfileFound { .. } => "No profile found for this wallet".to_string(),
            Self::PublishInProgress => "A post is already being created".to_string(),
            Self::WalletUnavailable
            | Self::SigningFailed(_)
            | Self::ChallengeRejected(_)
            | Self::IdentityService(_) => "Authentication failed".to_string(),
        }
    }

    /// True when the user can fix the problem without restarting from Upload.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NotAuthenticated | Self::PublishInProgress)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_rejected_message_includes_reason() {
        let err = PublishError::ContentRejected {
            reason: "Porn: 0.97".into(),
        };
        assert_eq!(err.status_message(), "NSFW content detected: Porn: 0.97");
    }

    #[test]
    fn test_only_auth_and_busy_are_recoverable() {
        assert!(PublishError::NotAuthenticated.is_recoverable());
        assert!(PublishError::PublishInProgress.is_recoverable());
        assert!(!PublishError::UploadFailed("timeout".into()).is_recoverable());
        assert!(!PublishError::StorageCommitFailed("down".into()).is_recoverable());
        assert!(!PublishError::ContentRejected { reason: "x".into() }.is_recoverable());
    }

    #[test]
    fn test_no_file_selected_message() {
        assert_eq!(PublishError::NoFileSelected.status_message(), "No file selected");
    }
}
