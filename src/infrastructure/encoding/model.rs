use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

// --- TASK STATUS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Created,
    Queued,
    Running,
    Finished,
    Error,
    Canceled,
    TransferError,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Created => "CREATED",
            Status::Queued => "QUEUED",
            Status::Running => "RUNNING",
            Status::Finished => "FINISHED",
            Status::Error => "ERROR",
            Status::Canceled => "CANCELED",
            Status::TransferError => "TRANSFER_ERROR",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageType {
    Error,
    Warning,
    Info,
    Debug,
    Trace,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub text: String,
    #[serde(
        default,
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<OffsetDateTime>,
}

/// Snapshot of a remote encoding or manifest task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub status: Status,
    #[serde(default)]
    pub progress: Option<u32>,
    #[serde(default)]
    pub messages: Option<Vec<Message>>,
}

impl Task {
    pub fn new(status: Status) -> Self {
        Self {
            status,
            progress: None,
            messages: None,
        }
    }

    /// Texts of every ERROR-severity message, in the order the service reported them.
    pub fn error_messages(&self) -> Vec<String> {
        self.messages
            .iter()
            .flatten()
            .filter(|m| m.kind == MessageType::Error)
            .map(|m| m.text.clone())
            .collect()
    }
}

// --- STORAGE ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    S3,
    Azure,
}

impl StorageKind {
    pub fn path_segment(&self) -> &'static str {
        match self {
            StorageKind::S3 => "s3",
            StorageKind::Azure => "azure",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct S3Storage {
    pub bucket_name: String,
    pub access_key: String,
    pub secret_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureStorage {
    pub account_name: String,
    pub account_key: String,
    pub container: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StorageConfig {
    S3(S3Storage),
    Azure(AzureStorage),
}

impl StorageConfig {
    pub fn kind(&self) -> StorageKind {
        match self {
            StorageConfig::S3(_) => StorageKind::S3,
            StorageConfig::Azure(_) => StorageKind::Azure,
        }
    }
}

// --- ENCODING JOB ---

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSpec {
    pub name: String,
    pub cloud_region: String,
    pub encoder_version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionMode {
    VideoRelative,
    AudioRelative,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestStreamSpec {
    pub input_id: String,
    pub input_path: String,
    pub selection_mode: SelectionMode,
    pub position: u32,
}

// --- CODEC CONFIGURATIONS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum H264Profile {
    Baseline,
    Main,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PresetConfiguration {
    VodStandard,
    VodHighQuality,
    VodSpeed,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelLayout {
    #[serde(rename = "1.0")]
    Mono,
    #[serde(rename = "2.0")]
    Stereo,
    #[serde(rename = "5.1")]
    Surround51,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct H264Config {
    #[serde(default)]
    pub name: String,
    pub height: u32,
    pub bitrate: u64,
    pub profile: H264Profile,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset_configuration: Option<PresetConfiguration>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_keyframe_interval: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_keyframe_interval: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_frames: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bframes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bitrate: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_bitrate: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bufsize: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AacConfig {
    #[serde(default)]
    pub name: String,
    pub bitrate: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_layout: Option<ChannelLayout>,
}

/// Codec configuration as far as this workflow understands it.
#[derive(Debug, Clone, PartialEq)]
pub enum CodecConfig {
    Video(H264Config),
    Audio(AacConfig),
    Unsupported { kind: String },
}

impl CodecConfig {
    pub fn family(&self) -> Option<CodecFamily> {
        match self {
            CodecConfig::Video(_) => Some(CodecFamily::H264),
            CodecConfig::Audio(_) => Some(CodecFamily::Aac),
            CodecConfig::Unsupported { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecFamily {
    H264,
    Aac,
}

impl CodecFamily {
    pub fn type_name(&self) -> &'static str {
        match self {
            CodecFamily::H264 => "H264",
            CodecFamily::Aac => "AAC",
        }
    }

    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "H264" => Some(CodecFamily::H264),
            "AAC" => Some(CodecFamily::Aac),
            _ => None,
        }
    }

    pub fn path_segment(&self) -> &'static str {
        match self {
            CodecFamily::H264 => "video/h264",
            CodecFamily::Aac => "audio/aac",
        }
    }
}

// --- STREAMS (RENDITIONS) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StreamMode {
    #[default]
    Standard,
    PerTitleTemplate,
    PerTitleTemplateFixedResolution,
    PerTitleTemplateFixedResolutionAndBitrate,
    PerTitleResult,
    #[serde(other)]
    Other,
}

impl StreamMode {
    /// Template renditions feed the per-title ladder search and are never published directly.
    pub fn is_per_title_template(&self) -> bool {
        matches!(
            self,
            StreamMode::PerTitleTemplate
                | StreamMode::PerTitleTemplateFixedResolution
                | StreamMode::PerTitleTemplateFixedResolutionAndBitrate
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamInput {
    pub input_stream_id: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenditionSpec {
    pub name: String,
    pub codec_config_id: String,
    pub input_streams: Vec<StreamInput>,
    pub mode: StreamMode,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rendition {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub codec_config_id: String,
    #[serde(default)]
    pub input_streams: Vec<StreamInput>,
    #[serde(default)]
    pub mode: StreamMode,
}

// --- MUXINGS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AclPermission {
    PublicRead,
    Private,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AclEntry {
    pub permission: AclPermission,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodingOutput {
    pub output_id: String,
    pub output_path: String,
    #[serde(default)]
    pub acl: Vec<AclEntry>,
}

impl EncodingOutput {
    pub fn public_read(output_id: &str, output_path: impl Into<String>) -> Self {
        Self {
            output_id: output_id.to_string(),
            output_path: output_path.into(),
            acl: vec![AclEntry {
                permission: AclPermission::PublicRead,
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MuxingStream {
    pub stream_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuxingKind {
    Mp4,
    Fmp4,
}

impl MuxingKind {
    pub fn path_segment(&self) -> &'static str {
        match self {
            MuxingKind::Mp4 => "mp4",
            MuxingKind::Fmp4 => "fmp4",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MuxingKind::Mp4 => "MP4",
            MuxingKind::Fmp4 => "FMP4",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MuxingContainer {
    #[serde(rename_all = "camelCase")]
    Mp4 {
        filename: String,
        fragment_duration: u32,
        #[serde(rename = "fragmentedMP4MuxingManifestType")]
        manifest_type: String,
    },
    #[serde(rename_all = "camelCase")]
    Fmp4 {
        segment_length: f64,
        init_segment_name: String,
        segment_naming: String,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MuxingSpec {
    pub name: String,
    pub streams: Vec<MuxingStream>,
    pub outputs: Vec<EncodingOutput>,
    #[serde(flatten)]
    pub container: MuxingContainer,
}

impl MuxingSpec {
    pub fn kind(&self) -> MuxingKind {
        match self.container {
            MuxingContainer::Mp4 { .. } => MuxingKind::Mp4,
            MuxingContainer::Fmp4 { .. } => MuxingKind::Fmp4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Muxing {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub streams: Vec<MuxingStream>,
    #[serde(default)]
    pub outputs: Vec<EncodingOutput>,
}

// --- START REQUESTS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ManifestGenerator {
    V2,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestResource {
    pub manifest_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartJobOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_generator: Option<ManifestGenerator>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vod_hls_manifests: Vec<ManifestResource>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub vod_dash_manifests: Vec<ManifestResource>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartManifestOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_generator: Option<ManifestGenerator>,
}

// --- MANIFESTS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestKind {
    Hls,
    Dash,
}

impl ManifestKind {
    pub fn path_segment(&self) -> &'static str {
        match self {
            ManifestKind::Hls => "hls",
            ManifestKind::Dash => "dash",
        }
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManifestKind::Hls => f.write_str("HLS"),
            ManifestKind::Dash => f.write_str("DASH"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestSpec {
    pub name: String,
    pub manifest_name: String,
    pub outputs: Vec<EncodingOutput>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioMediaInfo {
    pub name: String,
    pub group_id: String,
    pub language: String,
    pub segment_path: String,
    pub encoding_id: String,
    pub stream_id: String,
    pub muxing_id: String,
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamInfo {
    pub audio: String,
    pub closed_captions: String,
    pub segment_path: String,
    pub uri: String,
    pub encoding_id: String,
    pub stream_id: String,
    pub muxing_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DashRepresentationType {
    Template,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DashRepresentationTypeMode {
    TemplateRepresentation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashFmp4Representation {
    pub encoding_id: String,
    pub muxing_id: String,
    #[serde(rename = "type")]
    pub kind: DashRepresentationType,
    pub mode: DashRepresentationTypeMode,
    pub segment_path: String,
}

/// One child resource attached to a manifest.
#[derive(Debug, Clone, PartialEq)]
pub enum ManifestEntry {
    HlsAudioMedia(AudioMediaInfo),
    HlsStreamInfo(StreamInfo),
    DashPeriod,
    DashVideoAdaptationSet {
        period_id: String,
    },
    DashAudioAdaptationSet {
        period_id: String,
        lang: String,
    },
    DashRepresentation {
        period_id: String,
        adaptation_set_id: String,
        representation: DashFmp4Representation,
    },
}

impl ManifestEntry {
    pub fn manifest_kind(&self) -> ManifestKind {
        match self {
            ManifestEntry::HlsAudioMedia(_) | ManifestEntry::HlsStreamInfo(_) => ManifestKind::Hls,
            _ => ManifestKind::Dash,
        }
    }
}

// --- WEBHOOKS ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookEvent {
    Finished,
    Error,
}

impl WebhookEvent {
    pub fn path_segment(&self) -> &'static str {
        match self {
            WebhookEvent::Finished => "finished",
            WebhookEvent::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WebhookHttpMethod {
    Post,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Webhook {
    pub url: String,
    pub method: WebhookHttpMethod,
}

// --- COMPENSATION ---

/// A remote resource that can be deleted again if the workflow fails.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteResource {
    Input { kind: StorageKind, id: String },
    Output { kind: StorageKind, id: String },
    Encoding { id: String },
    CodecConfig { family: CodecFamily, id: String },
    Manifest { kind: ManifestKind, id: String },
}

impl fmt::Display for RemoteResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemoteResource::Input { kind, id } => write!(f, "{} input {}", kind.path_segment(), id),
            RemoteResource::Output { kind, id } => {
                write!(f, "{} output {}", kind.path_segment(), id)
            }
            RemoteResource::Encoding { id } => write!(f, "encoding {}", id),
            RemoteResource::CodecConfig { family, id } => {
                write!(f, "{} codec configuration {}", family.type_name(), id)
            }
            RemoteResource::Manifest { kind, id } => write!(f, "{} manifest {}", kind, id),
        }
    }
}
