//! Metadata domain - post manifests
//!
//! Builds the manifest for a transcoded video, validates it remotely and
//! commits it to addressed storage.

pub mod builder;
pub mod models;

pub use builder::MetadataBuilder;
pub use models::{
    Attribute, MainContentFocus, Manifest, ManifestDefaults, MediaItem, MetadataValidation,
};
