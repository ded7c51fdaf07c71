//! Test fixtures for publish runs.

use publisher_core::domains::upload::PipelineRun;
use safeupload_client::FileHandle;

pub const TEST_ADDRESS: &str = "0xA11CE";
pub const TEST_PROFILE_ID: &str = "0x01";
pub const TEST_HANDLE: &str = "alice.test";
pub const TEST_PLAYBACK_URL: &str = "https://x/v.m3u8";

/// Small in-memory clip
pub fn test_clip() -> FileHandle {
    FileHandle::from_bytes("clip.mp4", vec![0u8; 64])
}

/// Fresh run for the test clip
pub fn clip_run(content: &str) -> PipelineRun {
    PipelineRun::new(Some(test_clip()), content)
}

/// Fresh run with no file selected
pub fn empty_run(content: &str) -> PipelineRun {
    PipelineRun::new(None, content)
}
