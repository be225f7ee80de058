use crate::infrastructure::encoding::model::{
    AacConfig, ChannelLayout, CodecConfig, H264Config, H264Profile, MuxingContainer, MuxingKind,
    PresetConfiguration, StreamMode,
};
use serde::Serialize;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
}

impl MediaKind {
    pub fn folder(&self) -> &'static str {
        match self {
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
        }
    }
}

/// Tighter rate control used by the fragmented MP4 ladder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConstrainedRateControl {
    pub keyframe_interval_secs: f64,
    pub ref_frames: u32,
    pub bframes: u32,
}

impl ConstrainedRateControl {
    pub const MAX_BITRATE_FACTOR: f64 = 1.2;
    pub const MIN_BITRATE_FACTOR: f64 = 0.8;
    pub const BUFSIZE_FACTOR: f64 = 2.0;
}

#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct VideoProfile {
    #[validate(range(min = 16, max = 4320))]
    pub height: u32,
    #[validate(range(min = 1))]
    pub bitrate: u64,
    pub profile: H264Profile,
    pub mode: StreamMode,
    pub preset: PresetConfiguration,
    pub rate_control: Option<ConstrainedRateControl>,
}

impl VideoProfile {
    pub fn codec_config(&self) -> CodecConfig {
        let scaled = |factor: f64| Some((self.bitrate as f64 * factor).round() as u64);
        let rc = self.rate_control;

        CodecConfig::Video(H264Config {
            name: format!("Video Codec {}p", self.height),
            height: self.height,
            bitrate: self.bitrate,
            profile: self.profile,
            preset_configuration: Some(self.preset),
            min_keyframe_interval: rc.map(|rc| rc.keyframe_interval_secs),
            max_keyframe_interval: rc.map(|rc| rc.keyframe_interval_secs),
            ref_frames: rc.map(|rc| rc.ref_frames),
            bframes: rc.map(|rc| rc.bframes),
            max_bitrate: rc.and_then(|_| scaled(ConstrainedRateControl::MAX_BITRATE_FACTOR)),
            min_bitrate: rc.and_then(|_| scaled(ConstrainedRateControl::MIN_BITRATE_FACTOR)),
            bufsize: rc.and_then(|_| scaled(ConstrainedRateControl::BUFSIZE_FACTOR)),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct AudioProfile {
    #[validate(range(min = 1))]
    pub bitrate: u64,
    #[validate(range(min = 8000.0, max = 192000.0))]
    pub rate: f64,
    pub channel_layout: ChannelLayout,
}

impl AudioProfile {
    pub fn codec_config(&self) -> CodecConfig {
        CodecConfig::Audio(AacConfig {
            name: format!("Audio Codec {} kbps", kbps(self.bitrate)),
            bitrate: self.bitrate,
            rate: Some(self.rate),
            channel_layout: Some(self.channel_layout),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Validate)]
pub struct RenditionLadder {
    #[validate(length(min = 1), nested)]
    pub video: Vec<VideoProfile>,
    #[validate(nested)]
    pub audio: Vec<AudioProfile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuxingFormat {
    /// Whole-file MP4 with byte-range addressed fragments.
    Mp4,
    /// Fragmented MP4 (CMAF) segments.
    Fmp4,
}

impl MuxingFormat {
    pub const FRAGMENT_DURATION_MS: u32 = 6000;
    pub const SEGMENT_LENGTH_SECS: f64 = 6.0;

    pub fn kind(&self) -> MuxingKind {
        match self {
            MuxingFormat::Mp4 => MuxingKind::Mp4,
            MuxingFormat::Fmp4 => MuxingKind::Fmp4,
        }
    }

    /// `stem` names the file for whole-file muxings, e.g. `video_720`.
    pub fn container(&self, stem: &str) -> MuxingContainer {
        match self {
            MuxingFormat::Mp4 => MuxingContainer::Mp4 {
                filename: format!("{}.mp4", stem),
                fragment_duration: Self::FRAGMENT_DURATION_MS,
                manifest_type: "HLS_BYTE_RANGES".to_string(),
            },
            MuxingFormat::Fmp4 => MuxingContainer::Fmp4 {
                segment_length: Self::SEGMENT_LENGTH_SECS,
                init_segment_name: "init.mp4".to_string(),
                segment_naming: "segment_%number%.m4s".to_string(),
            },
        }
    }
}

/// A created rendition with everything hanging off it.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltRendition {
    pub kind: MediaKind,
    pub codec_config_id: String,
    pub rendition_id: String,
    pub muxing_id: String,
    pub output_path: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EncodingJob {
    pub id: String,
    pub name: String,
    pub muxing_kind: MuxingKind,
    pub renditions: Vec<BuiltRendition>,
}

/// Bitrate in kbps, without a fractional part when it divides evenly.
pub fn kbps(bitrate: u64) -> String {
    if bitrate % 1000 == 0 {
        (bitrate / 1000).to_string()
    } else {
        (bitrate as f64 / 1000.0).to_string()
    }
}

/// `{base}{video|audio}/{key}` where `base` already ends with '/'.
pub fn output_path(base: &str, kind: MediaKind, key: u64) -> String {
    let base = base.trim_end_matches('/');
    if base.is_empty() {
        format!("{}/{}", kind.folder(), key)
    } else {
        format!("{}/{}/{}", base, kind.folder(), key)
    }
}
