pub mod models;
pub mod moderation;
pub mod pipeline;

pub use models::{ModerationStatus, PipelineRun, RunProgress, Stage};
pub use moderation::ModerationVerdict;
pub use pipeline::UploadPipeline;
