// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Publishing rules (moderation gate, freshness checks) live in the domains
// and call through these traits.
//
// Naming convention: Base* for trait names (e.g., BaseIdentityService)

use anyhow::Result;
use async_trait::async_trait;
use safeupload_client::{FileHandle, ModerationResponse, TranscodeRequest, TranscodeResponse};

use crate::domains::auth::Profile;
use crate::domains::metadata::{Manifest, MetadataValidation};
use crate::domains::posts::{DelegatedPostRequest, SubmissionResult};

// =============================================================================
// Wallet Signer Trait (Infrastructure - injected signing capability)
// =============================================================================

#[async_trait]
pub trait BaseWalletSigner: Send + Sync {
    /// Address of the account that will sign
    async fn get_address(&self) -> Result<String>;

    /// Sign an arbitrary message (the identity service's challenge)
    async fn sign_message(&self, message: &str) -> Result<String>;
}

// =============================================================================
// Identity Service Trait (Infrastructure - social graph client)
// =============================================================================

#[async_trait]
pub trait BaseIdentityService: Send + Sync {
    /// Request a one-time challenge for `address`
    async fn generate_challenge(&self, address: &str) -> Result<String>;

    /// Submit the signed challenge. Err means the signature was not accepted.
    async fn authenticate(&self, address: &str, signature: &str) -> Result<()>;

    /// Live server-side session state
    async fn is_authenticated(&self) -> Result<bool>;

    /// Profiles owned by `address`, most recent first
    async fn fetch_profiles_owned_by(&self, address: &str, limit: u32) -> Result<Vec<Profile>>;

    /// Schema/semantic validation of a post manifest
    async fn validate_metadata(&self, manifest: &Manifest) -> Result<MetadataValidation>;

    /// Post through the dispatcher the profile has pre-authorized.
    /// The outer Err is transport, the inner result is the dispatcher's wrapper.
    async fn create_delegated_post(&self, request: &DelegatedPostRequest)
        -> Result<SubmissionResult>;
}

// =============================================================================
// Media Services Trait (Infrastructure - upload/moderation/transcode/storage)
// =============================================================================

#[async_trait]
pub trait BaseMediaServices: Send + Sync {
    /// Upload the raw file, returning its server-side path
    async fn upload(&self, file: &FileHandle) -> Result<String>;

    /// NSFW classification of an uploaded file
    async fn check_moderation(&self, upload_path: &str) -> Result<ModerationResponse>;

    /// Transcode an uploaded file for playback
    async fn transcode(&self, request: &TranscodeRequest) -> Result<TranscodeResponse>;

    /// Commit a manifest to addressed storage, returning its content URI
    async fn store_manifest(&self, manifest: &Manifest) -> Result<String>;
}
