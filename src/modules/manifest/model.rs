use crate::infrastructure::encoding::model::{CodecConfig, ManifestKind, StreamMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestMode {
    /// Assemble once the encoding has FINISHED, then start and poll each manifest.
    Standalone,
    /// Assemble before starting the encoding and hand the manifests to the start
    /// request; the encoding generates them as part of its own run.
    AttachedToJob,
}

/// A muxing read back from the service together with what its rendition resolved to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMuxing {
    pub muxing_id: String,
    pub stream_id: String,
    pub output_path: String,
    pub mode: StreamMode,
    /// Not looked up for per-title-template renditions.
    pub codec: Option<CodecConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum EntryKind {
    Audio,
    Video,
}

/// One manifest entry to be created, independent of HLS or DASH.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryPlan {
    pub kind: EntryKind,
    pub muxing_id: String,
    pub stream_id: String,
    pub segment_path: String,
    /// Variant playlist name (`audio_96.m3u8`, `video_720.m3u8`).
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssembledManifest {
    pub kind: ManifestKind,
    pub id: String,
    pub entries: Vec<EntryPlan>,
}
