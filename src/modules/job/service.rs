use super::model::{BuiltRendition, EncodingJob, MediaKind, kbps, output_path};
use crate::common::error::WorkflowError;
use crate::infrastructure::encoding::error::ApiError;
use crate::infrastructure::encoding::model::{
    CodecConfig, EncodingOutput, IngestStreamSpec, JobSpec, MuxingSpec, MuxingStream,
    RemoteResource, RenditionSpec, SelectionMode, StreamInput, StreamMode,
};
use crate::modules::provisioning::model::ProvisionedStorage;
use crate::modules::provisioning::rollback::CleanupStack;
use crate::state::AppState;
use tracing::info;

pub struct JobService;

/// What one rendition needs besides its codec configuration.
struct RenditionPlan {
    kind: MediaKind,
    codec: CodecConfig,
    mode: StreamMode,
    stream_name: String,
    muxing_name: String,
    file_stem: String,
    output_path: String,
}

impl JobService {
    /// Creates the encoding and every rendition of the configured ladder together with
    /// its codec configuration and muxing. Nothing is started.
    pub async fn build(
        state: &AppState,
        storage: &ProvisionedStorage,
        cleanup: &mut CleanupStack,
    ) -> Result<EncodingJob, WorkflowError> {
        Self::try_build(state, storage, cleanup)
            .await
            .map_err(WorkflowError::JobSubmission)
    }

    async fn try_build(
        state: &AppState,
        storage: &ProvisionedStorage,
        cleanup: &mut CleanupStack,
    ) -> Result<EncodingJob, ApiError> {
        let config = &state.config;
        let service = state.encoding.as_ref();

        let spec = JobSpec {
            name: config.workflow_name.clone(),
            cloud_region: config.cloud_region.clone(),
            encoder_version: config.encoder_version.clone(),
        };
        let job_id = service.create_job(&spec).await?;
        cleanup.push(RemoteResource::Encoding { id: job_id.clone() });
        info!("✅ Encoding created: {} ({})", job_id, spec.name);

        let plans = plan_renditions(state);

        let mut video_input = None;
        let mut audio_input = None;
        for kind in [MediaKind::Video, MediaKind::Audio] {
            if !plans.iter().any(|p| p.kind == kind) {
                continue;
            }
            let ingest = IngestStreamSpec {
                input_id: storage.input_id.clone(),
                input_path: config.input_path.clone(),
                selection_mode: match kind {
                    MediaKind::Video => SelectionMode::VideoRelative,
                    MediaKind::Audio => SelectionMode::AudioRelative,
                },
                position: 0,
            };
            let id = service.create_ingest_stream(&job_id, &ingest).await?;
            match kind {
                MediaKind::Video => video_input = Some(id),
                MediaKind::Audio => audio_input = Some(id),
            }
        }

        let muxing_kind = config.muxing_format.kind();
        let mut renditions = Vec::with_capacity(plans.len());

        for plan in plans {
            let input_stream_id = match plan.kind {
                MediaKind::Video => video_input.clone(),
                MediaKind::Audio => audio_input.clone(),
            }
            .ok_or(ApiError::MissingResult)?;

            let codec_config_id = service.create_codec_config(&plan.codec).await?;
            if let Some(family) = plan.codec.family() {
                cleanup.push(RemoteResource::CodecConfig {
                    family,
                    id: codec_config_id.clone(),
                });
            }

            let rendition_id = service
                .create_rendition(
                    &job_id,
                    &RenditionSpec {
                        name: plan.stream_name,
                        codec_config_id: codec_config_id.clone(),
                        input_streams: vec![StreamInput { input_stream_id }],
                        mode: plan.mode,
                    },
                )
                .await?;

            let muxing_id = service
                .create_muxing(
                    &job_id,
                    &MuxingSpec {
                        name: plan.muxing_name,
                        streams: vec![MuxingStream {
                            stream_id: rendition_id.clone(),
                        }],
                        outputs: vec![EncodingOutput::public_read(
                            &storage.output_id,
                            plan.output_path.as_str(),
                        )],
                        container: config.muxing_format.container(&plan.file_stem),
                    },
                )
                .await?;

            renditions.push(BuiltRendition {
                kind: plan.kind,
                codec_config_id,
                rendition_id,
                muxing_id,
                output_path: plan.output_path,
            });
        }

        info!(
            "✅ Encoding {} has {} renditions with {} muxings",
            job_id,
            renditions.len(),
            muxing_kind.label()
        );

        Ok(EncodingJob {
            id: job_id,
            name: spec.name,
            muxing_kind,
            renditions,
        })
    }
}

fn plan_renditions(state: &AppState) -> Vec<RenditionPlan> {
    let config = &state.config;
    let base = &config.output_base_path;
    let label = config.muxing_format.kind().label();

    let video = config.ladder.video.iter().map(|profile| RenditionPlan {
        kind: MediaKind::Video,
        codec: profile.codec_config(),
        mode: profile.mode,
        stream_name: format!("Video Stream {}p", profile.height),
        muxing_name: format!("Video {} Muxing {}p", label, profile.height),
        file_stem: format!("video_{}", profile.height),
        output_path: output_path(base, MediaKind::Video, profile.height as u64),
    });

    let audio = config.ladder.audio.iter().map(|profile| {
        let rate = kbps(profile.bitrate);
        RenditionPlan {
            kind: MediaKind::Audio,
            codec: profile.codec_config(),
            mode: StreamMode::Standard,
            stream_name: format!("Audio Stream {} kbps", rate),
            muxing_name: format!("Audio {} Muxing {} kbps", label, rate),
            file_stem: format!("audio_{}", rate),
            output_path: output_path(base, MediaKind::Audio, profile.bitrate),
        }
    });

    video.chain(audio).collect()
}
