//! Kernel module - publisher infrastructure and dependencies.

pub mod deps;
pub mod progress;
pub mod test_dependencies;
pub mod timeout;
pub mod traits;

pub use deps::{PublisherDeps, SafeUploadAdapter};
pub use progress::ProgressHub;
pub use test_dependencies::TestDependencies;
pub use timeout::bounded;
pub use traits::*;
