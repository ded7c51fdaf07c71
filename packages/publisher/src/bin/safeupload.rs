//! CLI for the SafeUpload media endpoints
//!
//! Talks to the REST service directly, without a wallet session, so each
//! stage can be exercised on its own. Publishing a post needs an identity
//! service and goes through `Publisher`.
//! Results are printed as JSON.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use publisher_core::config::Config;
use publisher_core::domains::metadata::Manifest;
use publisher_core::domains::upload::pipeline::transcode_name;
use publisher_core::domains::upload::ModerationVerdict;
use safeupload_client::{FileHandle, SafeUploadClient, TranscodeRequest};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "safeupload")]
#[command(about = "Upload, moderate and transcode videos through SafeUpload")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a video file
    Upload { file: PathBuf },

    /// Run the NSFW check on an uploaded video
    Check { upload_path: String },

    /// Transcode an uploaded video for playback
    Transcode { upload_path: String },

    /// Build the post manifest for a playback URL
    Manifest {
        playback_url: String,
        #[arg(long, default_value = "")]
        content: String,
        /// Commit the manifest to storage and print its content URI
        #[arg(long)]
        store: bool,
    },
}

#[derive(Serialize)]
struct CheckOutput {
    upload_path: String,
    clean: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

fn output<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,publisher_core=debug,safeupload_client=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let client = SafeUploadClient::with_timeout(&config.safeupload_base_url, config.call_timeout)
        .context("Failed to create SafeUpload client")?;

    tracing::debug!(base_url = %client.base_url(), "Using SafeUpload service");

    match cli.command {
        Commands::Upload { file } => cmd_upload(&client, file).await,
        Commands::Check { upload_path } => cmd_check(&client, upload_path).await,
        Commands::Transcode { upload_path } => cmd_transcode(&client, &config, upload_path).await,
        Commands::Manifest {
            playback_url,
            content,
            store,
        } => cmd_manifest(&client, &config, &playback_url, &content, store).await,
    }
}

async fn cmd_upload(client: &SafeUploadClient, file: PathBuf) -> Result<()> {
    let handle = FileHandle::from_path(&file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    tracing::info!(file = %handle.name(), size = handle.len(), mime = %handle.mime(), "Uploading");
    let response = client.upload(&handle).await.context("Upload failed")?;
    output(&response)
}

async fn cmd_check(client: &SafeUploadClient, upload_path: String) -> Result<()> {
    let response = client
        .check_nsfw(&upload_path)
        .await
        .context("Moderation check failed")?;
    let verdict = ModerationVerdict::from_response(&response);

    output(&CheckOutput {
        upload_path,
        clean: verdict.is_clean(),
        reason: verdict.reason(),
    })?;

    if !verdict.is_clean() {
        bail!("Video rejected by moderation");
    }
    Ok(())
}

async fn cmd_transcode(
    client: &SafeUploadClient,
    config: &Config,
    upload_path: String,
) -> Result<()> {
    let request = TranscodeRequest {
        name: transcode_name(&upload_path),
        description: config.transcode_description.clone(),
        video_url: upload_path,
    };
    let response = client.transcode(&request).await.context("Transcode failed")?;

    if response.playback_url().is_none() {
        bail!("Transcoder returned no playback URL");
    }
    output(&response)
}

async fn cmd_manifest(
    client: &SafeUploadClient,
    config: &Config,
    playback_url: &str,
    content: &str,
    store: bool,
) -> Result<()> {
    let settings = config.publish_settings();
    let manifest = Manifest::for_video(&settings.manifest, content, playback_url);

    if !store {
        return output(&manifest);
    }

    let response = client
        .store_manifest(&manifest)
        .await
        .context("Failed to commit manifest to storage")?;
    tracing::info!(
        metadata_id = %manifest.metadata_id,
        content_uri = %response.content_uri,
        "Manifest stored"
    );
    output(&response)
}
