use super::assembler::{plan_entries, resolve_muxings};
use super::model::{AssembledManifest, EntryKind, EntryPlan};
use crate::common::error::{AssemblyError, WorkflowError};
use crate::infrastructure::encoding::model::{
    AudioMediaInfo, DashFmp4Representation, DashRepresentationType, DashRepresentationTypeMode,
    EncodingOutput, ManifestEntry, ManifestKind, ManifestSpec, MuxingKind, RemoteResource,
    StreamInfo,
};
use crate::modules::job::model::EncodingJob;
use crate::modules::provisioning::model::ProvisionedStorage;
use crate::modules::provisioning::rollback::CleanupStack;
use crate::state::AppState;
use tracing::info;

pub const AUDIO_GROUP_ID: &str = "AUDIO";
pub const AUDIO_LANGUAGE: &str = "en";

pub struct ManifestService;

impl ManifestService {
    /// Creates the manifest resource and one entry per publishable muxing of `job`.
    pub async fn assemble(
        state: &AppState,
        job: &EncodingJob,
        storage: &ProvisionedStorage,
        kind: ManifestKind,
        cleanup: &mut CleanupStack,
    ) -> Result<AssembledManifest, WorkflowError> {
        let fail = |reason: AssemblyError| WorkflowError::ManifestAssembly {
            manifest: kind,
            reason,
        };

        if kind == ManifestKind::Dash && job.muxing_kind != MuxingKind::Fmp4 {
            return Err(fail(AssemblyError::UnsupportedContainer(
                job.muxing_kind.label(),
            )));
        }

        let base = &state.config.output_base_path;
        let service = state.encoding.as_ref();

        let (name, manifest_name) = match kind {
            ManifestKind::Hls => ("Hls manifest", "stream.m3u8"),
            ManifestKind::Dash => ("Dash manifest", "stream.mpd"),
        };
        let spec = ManifestSpec {
            name: name.to_string(),
            manifest_name: manifest_name.to_string(),
            outputs: vec![EncodingOutput::public_read(&storage.output_id, base.as_str())],
        };

        let manifest_id = service
            .create_manifest(kind, &spec)
            .await
            .map_err(|e| fail(AssemblyError::Api(e)))?;
        cleanup.push(RemoteResource::Manifest {
            kind,
            id: manifest_id.clone(),
        });

        let muxings = resolve_muxings(service, &job.id, job.muxing_kind)
            .await
            .map_err(fail)?;
        let plans = plan_entries(base, &muxings, state.config.warn_on_unsupported_codec)
            .map_err(fail)?;

        let entries = match kind {
            ManifestKind::Hls => hls_entries(&job.id, &plans),
            ManifestKind::Dash => {
                dash_entries(state, &job.id, &manifest_id, &plans)
                    .await
                    .map_err(fail)?
            }
        };
        for entry in &entries {
            service
                .add_manifest_entry(&manifest_id, entry)
                .await
                .map_err(|e| fail(AssemblyError::Api(e)))?;
        }

        info!(
            "✅ {} manifest {} assembled with {} of {} muxings",
            kind,
            manifest_id,
            plans.len(),
            muxings.len()
        );

        Ok(AssembledManifest {
            kind,
            id: manifest_id,
            entries: plans,
        })
    }
}

fn hls_entries(job_id: &str, plans: &[EntryPlan]) -> Vec<ManifestEntry> {
    plans
        .iter()
        .map(|plan| match plan.kind {
            EntryKind::Audio => ManifestEntry::HlsAudioMedia(AudioMediaInfo {
                name: "HLS Audio Media".to_string(),
                group_id: AUDIO_GROUP_ID.to_string(),
                language: AUDIO_LANGUAGE.to_string(),
                segment_path: plan.segment_path.clone(),
                encoding_id: job_id.to_string(),
                stream_id: plan.stream_id.clone(),
                muxing_id: plan.muxing_id.clone(),
                uri: plan.uri.clone(),
            }),
            EntryKind::Video => ManifestEntry::HlsStreamInfo(StreamInfo {
                audio: AUDIO_GROUP_ID.to_string(),
                closed_captions: "NONE".to_string(),
                segment_path: plan.segment_path.clone(),
                uri: plan.uri.clone(),
                encoding_id: job_id.to_string(),
                stream_id: plan.stream_id.clone(),
                muxing_id: plan.muxing_id.clone(),
            }),
        })
        .collect()
}

/// Creates the single period and the two adaptation sets up front, then returns one
/// representation per plan.
async fn dash_entries(
    state: &AppState,
    job_id: &str,
    manifest_id: &str,
    plans: &[EntryPlan],
) -> Result<Vec<ManifestEntry>, AssemblyError> {
    let service = state.encoding.as_ref();

    let period_id = service
        .add_manifest_entry(manifest_id, &ManifestEntry::DashPeriod)
        .await
        .map_err(AssemblyError::Api)?;
    let video_set_id = service
        .add_manifest_entry(
            manifest_id,
            &ManifestEntry::DashVideoAdaptationSet {
                period_id: period_id.clone(),
            },
        )
        .await
        .map_err(AssemblyError::Api)?;
    let audio_set_id = service
        .add_manifest_entry(
            manifest_id,
            &ManifestEntry::DashAudioAdaptationSet {
                period_id: period_id.clone(),
                lang: AUDIO_LANGUAGE.to_string(),
            },
        )
        .await
        .map_err(AssemblyError::Api)?;

    Ok(plans
        .iter()
        .map(|plan| ManifestEntry::DashRepresentation {
            period_id: period_id.clone(),
            adaptation_set_id: match plan.kind {
                EntryKind::Audio => audio_set_id.clone(),
                EntryKind::Video => video_set_id.clone(),
            },
            representation: DashFmp4Representation {
                encoding_id: job_id.to_string(),
                muxing_id: plan.muxing_id.clone(),
                kind: DashRepresentationType::Template,
                mode: DashRepresentationTypeMode::TemplateRepresentation,
                segment_path: plan.segment_path.clone(),
            },
        })
        .collect())
}
