use super::model::{EntryKind, EntryPlan, ResolvedMuxing};
use crate::common::error::AssemblyError;
use crate::infrastructure::encoding::EncodingService;
use crate::infrastructure::encoding::model::{CodecConfig, MuxingKind};
use crate::modules::job::model::kbps;
use tracing::{debug, warn};

pub fn audio_uri(bitrate: u64) -> String {
    format!("audio_{}.m3u8", kbps(bitrate))
}

pub fn video_uri(height: u32) -> String {
    format!("video_{}.m3u8", height)
}

/// Output path relative to the job's base path, e.g. `video/720`.
pub fn segment_path(base: &str, output_path: &str) -> Result<String, AssemblyError> {
    output_path
        .strip_prefix(base)
        .map(|rest| rest.trim_start_matches('/').to_string())
        .ok_or_else(|| AssemblyError::OutsideBasePath {
            path: output_path.to_string(),
            base: base.to_string(),
        })
}

/// Reads back every muxing of the job and resolves its rendition and codec.
pub async fn resolve_muxings(
    service: &dyn EncodingService,
    job_id: &str,
    kind: MuxingKind,
) -> Result<Vec<ResolvedMuxing>, AssemblyError> {
    let muxings = service
        .list_muxings(job_id, kind)
        .await
        .map_err(AssemblyError::Api)?;

    let mut resolved = Vec::with_capacity(muxings.len());
    for muxing in muxings {
        let stream_id = muxing
            .streams
            .first()
            .map(|s| s.stream_id.clone())
            .ok_or_else(|| AssemblyError::Incomplete {
                muxing_id: muxing.id.clone(),
                what: "stream",
            })?;
        let output_path = muxing
            .outputs
            .first()
            .map(|o| o.output_path.clone())
            .ok_or_else(|| AssemblyError::Incomplete {
                muxing_id: muxing.id.clone(),
                what: "output",
            })?;

        let rendition = service
            .get_rendition(job_id, &stream_id)
            .await
            .map_err(AssemblyError::Api)?;

        let codec = if rendition.mode.is_per_title_template() {
            None
        } else {
            Some(
                service
                    .get_codec_config(&rendition.codec_config_id)
                    .await
                    .map_err(AssemblyError::Api)?,
            )
        };

        resolved.push(ResolvedMuxing {
            muxing_id: muxing.id,
            stream_id,
            output_path,
            mode: rendition.mode,
            codec,
        });
    }

    Ok(resolved)
}

/// Decides which manifest entries the muxings turn into.
///
/// Per-title-template renditions are skipped. Codecs other than H.264 and AAC are
/// skipped too, with a warning when `warn_on_unsupported` is set. The result is
/// sorted (audio first, then by URI and muxing id) so the enumeration order of the
/// muxings never changes the manifest.
pub fn plan_entries(
    base: &str,
    muxings: &[ResolvedMuxing],
    warn_on_unsupported: bool,
) -> Result<Vec<EntryPlan>, AssemblyError> {
    let mut plans = Vec::with_capacity(muxings.len());

    for muxing in muxings {
        if muxing.mode.is_per_title_template() {
            debug!("Skipping per-title template muxing {}", muxing.muxing_id);
            continue;
        }
        let Some(codec) = &muxing.codec else {
            continue;
        };

        let (kind, uri) = match codec {
            CodecConfig::Audio(aac) => (EntryKind::Audio, audio_uri(aac.bitrate)),
            CodecConfig::Video(h264) => (EntryKind::Video, video_uri(h264.height)),
            CodecConfig::Unsupported { kind } => {
                if warn_on_unsupported {
                    warn!(
                        "Muxing {} uses unsupported codec {} and is left out of the manifest",
                        muxing.muxing_id, kind
                    );
                } else {
                    debug!("Skipping muxing {} with codec {}", muxing.muxing_id, kind);
                }
                continue;
            }
        };

        plans.push(EntryPlan {
            kind,
            muxing_id: muxing.muxing_id.clone(),
            stream_id: muxing.stream_id.clone(),
            segment_path: segment_path(base, &muxing.output_path)?,
            uri,
        });
    }

    plans.sort_by(|a, b| {
        (a.kind, &a.uri, &a.muxing_id).cmp(&(b.kind, &b.uri, &b.muxing_id))
    });
    Ok(plans)
}
