use super::model::{AudioProfile, ConstrainedRateControl, RenditionLadder, VideoProfile};
use crate::infrastructure::encoding::model::{
    ChannelLayout, H264Profile, PresetConfiguration, StreamMode,
};

fn video(height: u32, bitrate: u64, profile: H264Profile) -> VideoProfile {
    VideoProfile {
        height,
        bitrate,
        profile,
        mode: StreamMode::Standard,
        preset: PresetConfiguration::VodStandard,
        rate_control: None,
    }
}

fn stereo_aac(bitrate: u64) -> AudioProfile {
    AudioProfile {
        bitrate,
        rate: 44_100.0,
        channel_layout: ChannelLayout::Stereo,
    }
}

/// Three H.264 rungs plus one AAC track, packaged as whole-file MP4.
pub fn fixed_mp4_ladder() -> RenditionLadder {
    RenditionLadder {
        video: vec![
            video(360, 512_000, H264Profile::Main),
            video(450, 1_000_000, H264Profile::Main),
            video(720, 2_000_000, H264Profile::High),
        ],
        audio: vec![stereo_aac(96_000)],
    }
}

/// Single 720p rung with constrained rate control, packaged as fragmented MP4.
pub fn fmp4_ladder() -> RenditionLadder {
    RenditionLadder {
        video: vec![VideoProfile {
            rate_control: Some(ConstrainedRateControl {
                keyframe_interval_secs: 2.0,
                ref_frames: 4,
                bframes: 3,
            }),
            ..video(720, 2_000_000, H264Profile::High)
        }],
        audio: vec![stereo_aac(64_000)],
    }
}
