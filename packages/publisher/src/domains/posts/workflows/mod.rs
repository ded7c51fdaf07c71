pub mod publish_video;

pub use publish_video::{PublishOutcome, Publisher};
