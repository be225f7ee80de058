use crate::infrastructure::encoding::model::{ManifestKind, StorageKind};
use crate::modules::job::model::{MuxingFormat, RenditionLadder};
use crate::modules::job::profiles;
use crate::modules::manifest::model::ManifestMode;
use std::str::FromStr;

/// Built-in workflow shapes. Each preset fixes the ladder, packaging and manifest
/// strategy; storage credentials and paths still come from the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowPreset {
    /// H.264/AAC in whole-file MP4, HLS manifest generated after the encoding.
    FixedMp4Hls,
    /// H.264/AAC in fragmented MP4, HLS and DASH generated by the encoding itself,
    /// with FINISHED/ERROR webhooks.
    Fmp4HlsDash,
}

impl WorkflowPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowPreset::FixedMp4Hls => "fixed-mp4-hls",
            WorkflowPreset::Fmp4HlsDash => "fmp4-hls-dash",
        }
    }

    pub fn default_name(&self) -> &'static str {
        match self {
            WorkflowPreset::FixedMp4Hls => "h264-aac-fixed-mp4-clear-hls",
            WorkflowPreset::Fmp4HlsDash => "h264-aac-fmp4-hls-dash-vod-standard",
        }
    }

    pub fn default_region(&self) -> &'static str {
        match self {
            WorkflowPreset::FixedMp4Hls => "AZURE_JAPAN_EAST",
            WorkflowPreset::Fmp4HlsDash => "AWS_AP_NORTHEAST_1",
        }
    }

    pub fn default_encoder_version(&self) -> &'static str {
        match self {
            WorkflowPreset::FixedMp4Hls => "BETA",
            WorkflowPreset::Fmp4HlsDash => "STABLE",
        }
    }

    pub fn default_storage(&self) -> StorageKind {
        match self {
            WorkflowPreset::FixedMp4Hls => StorageKind::Azure,
            WorkflowPreset::Fmp4HlsDash => StorageKind::S3,
        }
    }

    pub fn ladder(&self) -> RenditionLadder {
        match self {
            WorkflowPreset::FixedMp4Hls => profiles::fixed_mp4_ladder(),
            WorkflowPreset::Fmp4HlsDash => profiles::fmp4_ladder(),
        }
    }

    pub fn muxing_format(&self) -> MuxingFormat {
        match self {
            WorkflowPreset::FixedMp4Hls => MuxingFormat::Mp4,
            WorkflowPreset::Fmp4HlsDash => MuxingFormat::Fmp4,
        }
    }

    pub fn manifests(&self) -> Vec<ManifestKind> {
        match self {
            WorkflowPreset::FixedMp4Hls => vec![ManifestKind::Hls],
            WorkflowPreset::Fmp4HlsDash => vec![ManifestKind::Hls, ManifestKind::Dash],
        }
    }

    pub fn manifest_mode(&self) -> ManifestMode {
        match self {
            WorkflowPreset::FixedMp4Hls => ManifestMode::Standalone,
            WorkflowPreset::Fmp4HlsDash => ManifestMode::AttachedToJob,
        }
    }
}

impl FromStr for WorkflowPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed-mp4-hls" => Ok(WorkflowPreset::FixedMp4Hls),
            "fmp4-hls-dash" => Ok(WorkflowPreset::Fmp4HlsDash),
            other => Err(format!(
                "unknown preset {:?}, expected fixed-mp4-hls or fmp4-hls-dash",
                other
            )),
        }
    }
}
