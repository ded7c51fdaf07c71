// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into PublisherDeps for tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use safeupload_client::{
    FileHandle, ModerationResponse, TranscodeRequest, TranscodeResponse, TranscodedAsset,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use super::{BaseIdentityService, BaseMediaServices, BaseWalletSigner, ProgressHub, PublisherDeps};
use crate::config::PublishSettings;
use crate::domains::auth::Profile;
use crate::domains::metadata::{Manifest, MetadataValidation};
use crate::domains::posts::{CreatedPost, DelegatedPostRequest, RelayPayload, SubmissionResult};

/// Signature the mock signer produces and the mock identity service accepts.
pub fn mock_signature(address: &str, message: &str) -> String {
    format!("sig:{}:{}", address, message)
}

// =============================================================================
// Mock Wallet Signer
// =============================================================================

pub struct MockWalletSigner {
    address: String,
    fail_signing: bool,
    signed: Arc<Mutex<Vec<String>>>,
}

impl MockWalletSigner {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            fail_signing: false,
            signed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Signer that refuses to sign (user dismissed the wallet prompt)
    pub fn refusing(mut self) -> Self {
        self.fail_signing = true;
        self
    }

    /// Messages the signer was asked to sign
    pub fn signed_messages(&self) -> Vec<String> {
        self.signed.lock().unwrap().clone()
    }
}

#[async_trait]
impl BaseWalletSigner for MockWalletSigner {
    async fn get_address(&self) -> Result<String> {
        Ok(self.address.clone())
    }

    async fn sign_message(&self, message: &str) -> Result<String> {
        self.signed.lock().unwrap().push(message.to_string());
        if self.fail_signing {
            return Err(anyhow!("User rejected the request"));
        }
        Ok(mock_signature(&self.address, message))
    }
}

// =============================================================================
// Mock Identity Service
// =============================================================================

/// Record of a call made to the mock identity service.
#[derive(Debug, Clone, PartialEq)]
pub enum IdentityCall {
    GenerateChallenge { address: String },
    Authenticate { address: String, signature: String },
    IsAuthenticated,
    FetchProfiles { address: String, limit: u32 },
    ValidateMetadata { metadata_id: Uuid },
    CreateDelegatedPost(DelegatedPostRequest),
}

pub struct MockIdentityService {
    reject_signatures: bool,
    challenge_error: Option<String>,
    live_session: Arc<Mutex<bool>>,
    profiles: Arc<Mutex<Vec<Profile>>>,
    validation: Arc<Mutex<MetadataValidation>>,
    submission: Arc<Mutex<Option<std::result::Result<SubmissionResult, String>>>>,
    calls: Arc<Mutex<Vec<IdentityCall>>>,
}

impl MockIdentityService {
    pub fn new() -> Self {
        Self {
            reject_signatures: false,
            challenge_error: None,
            live_session: Arc::new(Mutex::new(false)),
            profiles: Arc::new(Mutex::new(Vec::new())),
            validation: Arc::new(Mutex::new(MetadataValidation::valid())),
            submission: Arc::new(Mutex::new(None)),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Challenge text issued for an address
    pub fn challenge_for(address: &str) -> String {
        format!("Sign in to publish as {}\nNonce: mock-nonce", address)
    }

    /// Add a profile owned by the signing address
    pub fn with_profile(self, id: &str, handle: &str) -> Self {
        self.profiles.lock().unwrap().push(Profile {
            id: id.to_string(),
            handle: handle.to_string(),
        });
        self
    }

    /// Reject every signature
    pub fn rejecting_signatures(mut self) -> Self {
        self.reject_signatures = true;
        self
    }

    /// Fail challenge generation (service unreachable)
    pub fn with_challenge_error(mut self, message: &str) -> Self {
        self.challenge_error = Some(message.to_string());
        self
    }

    /// Set the remote validator's verdict
    pub fn with_validation(self, validation: MetadataValidation) -> Self {
        *self.validation.lock().unwrap() = validation;
        self
    }

    /// Set the dispatcher's result wrapper
    pub fn with_submission(self, result: SubmissionResult) -> Self {
        *self.submission.lock().unwrap() = Some(Ok(result));
        self
    }

    /// Make the dispatcher call itself fail
    pub fn with_submission_transport_error(self, message: &str) -> Self {
        *self.submission.lock().unwrap() = Some(Err(message.to_string()));
        self
    }

    /// Simulate server-side session expiry
    pub fn expire_session(&self) {
        *self.live_session.lock().unwrap() = false;
    }

    pub fn calls(&self) -> Vec<IdentityCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of delegated post requests issued
    pub fn post_requests(&self) -> Vec<DelegatedPostRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                IdentityCall::CreateDelegatedPost(req) => Some(req.clone()),
                _ => None,
            })
            .collect()
    }

    /// Metadata ids sent to the validator
    pub fn validated_ids(&self) -> Vec<Uuid> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                IdentityCall::ValidateMetadata { metadata_id } => Some(*metadata_id),
                _ => None,
            })
            .collect()
    }
}

impl Default for MockIdentityService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseIdentityService for MockIdentityService {
    async fn generate_challenge(&self, address: &str) -> Result<String> {
        self.calls.lock().unwrap().push(IdentityCall::GenerateChallenge {
            address: address.to_string(),
        });
        if let Some(message) = &self.challenge_error {
            return Err(anyhow!("{}", message));
        }
        Ok(Self::challenge_for(address))
    }

    async fn authenticate(&self, address: &str, signature: &str) -> Result<()> {
        self.calls.lock().unwrap().push(IdentityCall::Authenticate {
            address: address.to_string(),
            signature: signature.to_string(),
        });
        let expected = mock_signature(address, &Self::challenge_for(address));
        if self.reject_signatures || signature != expected {
            return Err(anyhow!("Invalid signature"));
        }
        *self.live_session.lock().unwrap() = true;
        Ok(())
    }

    async fn is_authenticated(&self) -> Result<bool> {
        self.calls.lock().unwrap().push(IdentityCall::IsAuthenticated);
        Ok(*self.live_session.lock().unwrap())
    }

    async fn fetch_profiles_owned_by(&self, address: &str, limit: u32) -> Result<Vec<Profile>> {
        self.calls.lock().unwrap().push(IdentityCall::FetchProfiles {
            address: address.to_string(),
            limit,
        });
        let profiles = self.profiles.lock().unwrap();
        Ok(profiles.iter().take(limit as usize).cloned().collect())
    }

    async fn validate_metadata(&self, manifest: &Manifest) -> Result<MetadataValidation> {
        self.calls.lock().unwrap().push(IdentityCall::ValidateMetadata {
            metadata_id: manifest.metadata_id,
        });
        Ok(self.validation.lock().unwrap().clone())
    }

    async fn create_delegated_post(
        &self,
        request: &DelegatedPostRequest,
    ) -> Result<SubmissionResult> {
        self.calls
            .lock()
            .unwrap()
            .push(IdentityCall::CreateDelegatedPost(request.clone()));

        match self.submission.lock().unwrap().clone() {
            Some(Ok(result)) => Ok(result),
            Some(Err(message)) => Err(anyhow!("{}", message)),
            None => Ok(Ok(RelayPayload::Created(CreatedPost {
                id: "0x01-0x01-DA-mock".to_string(),
                data_availability_id: Some(Uuid::new_v4().to_string()),
                proofs: None,
            }))),
        }
    }
}

// =============================================================================
// Mock Media Services
// =============================================================================

/// Record of a call made to the mock media services.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaCall {
    Upload { file_name: String },
    CheckModeration { upload_path: String },
    Transcode(TranscodeRequest),
    StoreManifest { metadata_id: Uuid },
}

pub struct MockMediaServices {
    upload_result: Arc<Mutex<std::result::Result<String, String>>>,
    moderation: Arc<Mutex<std::result::Result<ModerationResponse, String>>>,
    transcode: Arc<Mutex<std::result::Result<TranscodeResponse, String>>>,
    storage: Arc<Mutex<Option<std::result::Result<String, String>>>>,
    upload_delay: Option<Duration>,
    transcode_delay: Option<Duration>,
    calls: Arc<Mutex<Vec<MediaCall>>>,
}

impl MockMediaServices {
    pub fn new() -> Self {
        Self {
            upload_result: Arc::new(Mutex::new(Ok("uploads/clip.mp4".to_string()))),
            moderation: Arc::new(Mutex::new(Ok(ModerationResponse {
                nsfw_content: Some(vec![serde_json::json!("frames")]),
                ..Default::default()
            }))),
            transcode: Arc::new(Mutex::new(Ok(Self::playback("https://x/v.m3u8")))),
            storage: Arc::new(Mutex::new(None)),
            upload_delay: None,
            transcode_delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn playback(url: &str) -> TranscodeResponse {
        TranscodeResponse {
            asset: vec![TranscodedAsset {
                playback_url: Some(url.to_string()),
            }],
        }
    }

    /// Path the upload endpoint returns
    pub fn with_upload_path(self, path: &str) -> Self {
        *self.upload_result.lock().unwrap() = Ok(path.to_string());
        self
    }

    pub fn with_upload_error(self, message: &str) -> Self {
        *self.upload_result.lock().unwrap() = Err(message.to_string());
        self
    }

    /// Raw `nsfwContent` verdict sequence
    pub fn with_verdicts(self, verdicts: Vec<serde_json::Value>) -> Self {
        *self.moderation.lock().unwrap() = Ok(ModerationResponse {
            nsfw_content: Some(verdicts),
            ..Default::default()
        });
        self
    }

    pub fn with_moderation_response(self, response: ModerationResponse) -> Self {
        *self.moderation.lock().unwrap() = Ok(response);
        self
    }

    pub fn with_moderation_error(self, message: &str) -> Self {
        *self.moderation.lock().unwrap() = Err(message.to_string());
        self
    }

    pub fn with_playback_url(self, url: &str) -> Self {
        *self.transcode.lock().unwrap() = Ok(Self::playback(url));
        self
    }

    /// Transcode succeeds but returns no assets
    pub fn with_empty_transcode(self) -> Self {
        *self.transcode.lock().unwrap() = Ok(TranscodeResponse::default());
        self
    }

    pub fn with_transcode_error(self, message: &str) -> Self {
        *self.transcode.lock().unwrap() = Err(message.to_string());
        self
    }

    pub fn with_storage_uri(self, uri: &str) -> Self {
        *self.storage.lock().unwrap() = Some(Ok(uri.to_string()));
        self
    }

    pub fn with_storage_error(self, message: &str) -> Self {
        *self.storage.lock().unwrap() = Some(Err(message.to_string()));
        self
    }

    pub fn with_upload_delay(mut self, delay: Duration) -> Self {
        self.upload_delay = Some(delay);
        self
    }

    pub fn with_transcode_delay(mut self, delay: Duration) -> Self {
        self.transcode_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<MediaCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn transcode_calls(&self) -> Vec<TranscodeRequest> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                MediaCall::Transcode(req) => Some(req.clone()),
                _ => None,
            })
            .collect()
    }

    /// Metadata ids committed to storage
    pub fn stored_ids(&self) -> Vec<Uuid> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                MediaCall::StoreManifest { metadata_id } => Some(*metadata_id),
                _ => None,
            })
            .collect()
    }
}

impl Default for MockMediaServices {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseMediaServices for MockMediaServices {
    async fn upload(&self, file: &FileHandle) -> Result<String> {
        self.calls.lock().unwrap().push(MediaCall::Upload {
            file_name: file.name().to_string(),
        });
        if let Some(delay) = self.upload_delay {
            tokio::time::sleep(delay).await;
        }
        let result = self.upload_result.lock().unwrap().clone();
        result.map_err(|e| anyhow!("{}", e))
    }

    async fn check_moderation(&self, upload_path: &str) -> Result<ModerationResponse> {
        self.calls.lock().unwrap().push(MediaCall::CheckModeration {
            upload_path: upload_path.to_string(),
        });
        let result = self.moderation.lock().unwrap().clone();
        result.map_err(|e| anyhow!("{}", e))
    }

    async fn transcode(&self, request: &TranscodeRequest) -> Result<TranscodeResponse> {
        self.calls
            .lock()
            .unwrap()
            .push(MediaCall::Transcode(request.clone()));
        if let Some(delay) = self.transcode_delay {
            tokio::time::sleep(delay).await;
        }
        let result = self.transcode.lock().unwrap().clone();
        result.map_err(|e| anyhow!("{}", e))
    }

    async fn store_manifest(&self, manifest: &Manifest) -> Result<String> {
        self.calls.lock().unwrap().push(MediaCall::StoreManifest {
            metadata_id: manifest.metadata_id,
        });
        let configured = self.storage.lock().unwrap().clone();
        match configured {
            Some(result) => result.map_err(|e| anyhow!("{}", e)),
            None => Ok(format!("ar://{}", manifest.metadata_id)),
        }
    }
}

// =============================================================================
// TestDependencies - Builder for test dependencies
// =============================================================================

#[derive(Clone)]
pub struct TestDependencies {
    pub identity: Arc<MockIdentityService>,
    pub media: Arc<MockMediaServices>,
    pub progress: ProgressHub,
    pub settings: PublishSettings,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            identity: Arc::new(MockIdentityService::new()),
            media: Arc::new(MockMediaServices::new()),
            progress: ProgressHub::new(),
            settings: PublishSettings::default(),
        }
    }

    /// Set a mock identity service
    pub fn mock_identity(mut self, identity: MockIdentityService) -> Self {
        self.identity = Arc::new(identity);
        self
    }

    /// Set mock media services
    pub fn mock_media(mut self, media: MockMediaServices) -> Self {
        self.media = Arc::new(media);
        self
    }

    /// Override publish settings (timeouts, manifest defaults)
    pub fn settings(mut self, settings: PublishSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Convert into PublisherDeps for testing
    pub fn into_deps(self) -> PublisherDeps {
        PublisherDeps::new(self.identity, self.media, self.progress, self.settings)
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
