//! Posts domain - delegated post creation and the end-to-end publish workflow

pub mod models;
pub mod submitter;
pub mod workflows;

pub use models::{
    CreatedPost, DelegatedPostRequest, RelayFailure, RelayPayload, SubmissionResult,
};
pub use submitter::PostSubmitter;
pub use workflows::{PublishOutcome, Publisher};
