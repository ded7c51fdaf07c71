use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;
use typed_builder::TypedBuilder;

use crate::domains::metadata::ManifestDefaults;

pub const DEFAULT_SAFEUPLOAD_BASE_URL: &str = safeupload_client::DEFAULT_BASE_URL;
pub const DEFAULT_TRANSCODE_DESCRIPTION: &str = "Test for NSFW content";
pub const DEFAULT_POST_VIEWER_BASE_URL: &str = "https://testnet.lenster.xyz/posts";
pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 120;

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub safeupload_base_url: String,
    pub call_timeout: Duration,
    pub transcode_description: String,
    pub post_viewer_base_url: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            safeupload_base_url: env::var("SAFEUPLOAD_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_SAFEUPLOAD_BASE_URL.to_string()),
            call_timeout: Duration::from_secs(
                env::var("SAFEUPLOAD_TIMEOUT_SECS")
                    .unwrap_or_else(|_| DEFAULT_CALL_TIMEOUT_SECS.to_string())
                    .parse()
                    .context("SAFEUPLOAD_TIMEOUT_SECS must be a valid number")?,
            ),
            transcode_description: env::var("TRANSCODE_DESCRIPTION")
                .unwrap_or_else(|_| DEFAULT_TRANSCODE_DESCRIPTION.to_string()),
            post_viewer_base_url: env::var("POST_VIEWER_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_POST_VIEWER_BASE_URL.to_string()),
        })
    }

    pub fn publish_settings(&self) -> PublishSettings {
        PublishSettings::builder()
            .call_timeout(self.call_timeout)
            .transcode_description(self.transcode_description.clone())
            .post_viewer_base_url(self.post_viewer_base_url.clone())
            .build()
    }
}

/// Knobs the publishing components read. Never sourced from the environment directly.
#[derive(Debug, Clone, TypedBuilder)]
pub struct PublishSettings {
    /// Bounded wait applied to every external call
    #[builder(default = Duration::from_secs(DEFAULT_CALL_TIMEOUT_SECS))]
    pub call_timeout: Duration,
    #[builder(default = String::from(DEFAULT_TRANSCODE_DESCRIPTION), setter(into))]
    pub transcode_description: String,
    #[builder(default = String::from(DEFAULT_POST_VIEWER_BASE_URL), setter(into))]
    pub post_viewer_base_url: String,
    #[builder(default)]
    pub manifest: ManifestDefaults,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}
