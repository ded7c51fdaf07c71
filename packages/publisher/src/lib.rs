// SafeUpload Publisher - Core
//
// Wallet-authenticated video publishing: upload, moderation gate, transcode,
// manifest validation, storage commit and delegated post creation.
//
// Workflows are organized per-domain in domains/*/workflows/

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
