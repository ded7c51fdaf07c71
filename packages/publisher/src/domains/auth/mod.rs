//! Auth domain - wallet challenge/response authentication
//!
//! Responsibilities:
//! - Challenge signing through an injected wallet signer
//! - Session state and the cached identity profile
//! - Live session checks before privileged actions
//! - One publish run per session at a time

pub mod models;
pub mod session;

pub use models::{AuthState, Profile, Session};
pub use session::{AuthSession, RunToken};
