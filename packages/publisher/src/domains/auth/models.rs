use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identity profile owned by a wallet address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,
    pub handle: String,
}

/// Local view of the wallet session.
///
/// Only `AuthSession` mutates this. Everything else reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub address: String,
    pub authenticated: bool,
    pub profile: Option<Profile>,
    pub authenticated_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn profile_id(&self) -> Option<&str> {
        self.profile.as_ref().map(|p| p.id.as_str())
    }
}

/// Challenge/response progress.
///
/// `Unauthenticated -> ChallengeIssued -> Signed -> Authenticated`, with
/// `Failed` reachable from every step before `Authenticated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthState {
    Unauthenticated,
    ChallengeIssued,
    Signed,
    Authenticated,
    Failed,
}
