//! Fixtures shared by the workflow tests.

use crate::config::settings::AppConfig;
use crate::config::settings::tests::test_config;
use crate::infrastructure::encoding::fake::FakeEncodingService;
use crate::infrastructure::encoding::model::{AacConfig, CodecConfig, H264Config, H264Profile};
use crate::state::AppState;
use std::sync::Arc;
use std::time::Duration;

/// Default test configuration with polling shortened to a millisecond.
pub fn fast_config() -> AppConfig {
    let mut config = test_config();
    config.poll.interval = Duration::from_millis(1);
    config.poll.max_interval = Duration::from_millis(1);
    config
}

pub fn fake_state() -> (AppState, Arc<FakeEncodingService>) {
    state_with(fast_config())
}

pub fn state_with(config: AppConfig) -> (AppState, Arc<FakeEncodingService>) {
    let fake = Arc::new(FakeEncodingService::new());
    (AppState::new(config, fake.clone()), fake)
}

pub fn h264(height: u32) -> CodecConfig {
    CodecConfig::Video(H264Config {
        name: format!("Video Codec {}p", height),
        height,
        bitrate: 1_000_000,
        profile: H264Profile::Main,
        preset_configuration: None,
        min_keyframe_interval: None,
        max_keyframe_interval: None,
        ref_frames: None,
        bframes: None,
        max_bitrate: None,
        min_bitrate: None,
        bufsize: None,
    })
}

pub fn aac(bitrate: u64) -> CodecConfig {
    CodecConfig::Audio(AacConfig {
        name: format!("Audio Codec {} kbps", bitrate / 1000),
        bitrate,
        rate: Some(44_100.0),
        channel_layout: None,
    })
}
