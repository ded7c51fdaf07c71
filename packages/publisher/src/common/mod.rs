// Common types shared across the publisher domains

pub mod errors;

pub use errors::PublishError;
