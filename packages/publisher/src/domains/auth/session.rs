//! Wallet challenge/response authentication.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, warn};

use crate::common::PublishError;
use crate::domains::auth::models::{AuthState, Session};
use crate::kernel::{BaseIdentityService, BaseWalletSigner};

/// Only the most recently owned profile is used.
const PROFILE_LOOKUP_LIMIT: u32 = 1;

/// Proof that the holder is the only publish in flight for a session.
///
/// Released on drop.
pub struct RunToken {
    _guard: OwnedMutexGuard<()>,
}

/// Owner of the wallet session and the only thing allowed to change it.
pub struct AuthSession {
    identity: Arc<dyn BaseIdentityService>,
    session: Session,
    state: AuthState,
    run_lock: Arc<Mutex<()>>,
}

impl AuthSession {
    pub fn new(identity: Arc<dyn BaseIdentityService>) -> Self {
        Self {
            identity,
            session: Session::default(),
            state: AuthState::Unauthenticated,
            run_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    /// Authenticate by signing the identity service's challenge.
    ///
    /// On success the session is authenticated and carries the address's most
    /// recent profile. An address without any profile is still authenticated
    /// but the call returns `NoProfileFound`.
    pub async fn authenticate(
        &mut self,
        signer: Option<&dyn BaseWalletSigner>,
    ) -> Result<&Session, PublishError> {
        self.session = Session::default();
        self.state = AuthState::Unauthenticated;

        let Some(signer) = signer else {
            return Err(self.fail(PublishError::WalletUnavailable));
        };

        let address = match signer.get_address().await {
            Ok(address) => address,
            Err(e) => {
                warn!(error = %e, "Wallet did not provide an address");
                return Err(self.fail(PublishError::WalletUnavailable));
            }
        };

        let challenge = match self.identity.generate_challenge(&address).await {
            Ok(challenge) => challenge,
            Err(e) => {
                return Err(self.fail(PublishError::IdentityService(format!(
                    "challenge request failed: {}",
                    e
                ))))
            }
        };
        self.state = AuthState::ChallengeIssued;

        let signature = match signer.sign_message(&challenge).await {
            Ok(signature) => signature,
            Err(e) => return Err(self.fail(PublishError::SigningFailed(e.to_string()))),
        };
        self.state = AuthState::Signed;

        if let Err(e) = self.identity.authenticate(&address, &signature).await {
            return Err(self.fail(PublishError::ChallengeRejected(e.to_string())));
        }

        self.state = AuthState::Authenticated;
        self.session.address = address.clone();
        self.session.authenticated = true;
        self.session.authenticated_at = Some(Utc::now());
        info!(%address, "Wallet authenticated");

        let profiles = match self
            .identity
            .fetch_profiles_owned_by(&address, PROFILE_LOOKUP_LIMIT)
            .await
        {
            Ok(profiles) => profiles,
            Err(e) => {
                return Err(self.fail(PublishError::IdentityService(format!(
                    "profile lookup failed: {}",
                    e
                ))))
            }
        };

        match profiles.into_iter().next() {
            Some(profile) => {
                info!(%address, handle = %profile.handle, "Using profile");
                self.session.profile = Some(profile);
                Ok(&self.session)
            }
            None => {
                warn!(%address, "Authenticated address owns no profile");
                Err(PublishError::NoProfileFound { address })
            }
        }
    }

    /// Ask the identity service whether the session is still live.
    ///
    /// The local flag can be stale once the server expires the session, so
    /// privileged actions call this right before acting.
    pub async fn is_authenticated(&self) -> bool {
        match self.identity.is_authenticated().await {
            Ok(live) => live,
            Err(e) => {
                warn!(error = %e, "Session check failed, treating as unauthenticated");
                false
            }
        }
    }

    /// Claim the single publish slot for this session.
    pub fn begin_run(&self) -> Result<RunToken, PublishError> {
        if self.state != AuthState::Authenticated || !self.session.authenticated {
            return Err(PublishError::NotAuthenticated);
        }
        self.run_lock
            .clone()
            .try_lock_owned()
            .map(|guard| RunToken { _guard: guard })
            .map_err(|_| PublishError::PublishInProgress)
    }

    /// Clear the session and return to `Unauthenticated`.
    ///
    /// Takes `&mut self`, so it cannot run while a publish borrows the
    /// session. Any `PipelineRun` the caller still holds is finished: its
    /// progress channel was closed when `publish` returned. Drop it and
    /// start a new run after signing in again.
    pub fn logout(&mut self) {
        info!(address = %self.session.address, "Logging out");
        self.session = Session::default();
        self.state = AuthState::Unauthenticated;
    }

    fn fail(&mut self, error: PublishError) -> PublishError {
        warn!(error = %error, state = ?self.state, "Authentication failed");
        self.state = AuthState::Failed;
        self.session = Session::default();
        error
    }
}
