use crate::common::error::WorkflowError;
use crate::infrastructure::encoding::model::{
    ManifestGenerator, ManifestKind, ManifestResource, StartJobOptions,
};
use crate::modules::job::runner::JobRunner;
use crate::modules::job::service::JobService;
use crate::modules::manifest::model::{AssembledManifest, ManifestMode};
use crate::modules::manifest::runner::ManifestRunner;
use crate::modules::manifest::service::ManifestService;
use crate::modules::notification::service::NotificationService;
use crate::modules::provisioning::rollback::CleanupStack;
use crate::modules::provisioning::service::ProvisioningService;
use crate::state::AppState;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowOutcome {
    pub job_id: String,
    pub manifests: Vec<AssembledManifest>,
}

/// Runs the whole workflow once: provision, build, start and wait, publish manifests.
///
/// When a step fails and rollback is enabled, every remote resource created so far is
/// deleted again before the error is returned.
pub async fn run(
    state: &AppState,
    cancel: &CancellationToken,
) -> Result<WorkflowOutcome, WorkflowError> {
    let mut cleanup = CleanupStack::new();

    match execute(state, cancel, &mut cleanup).await {
        Ok(outcome) => {
            cleanup.commit();
            Ok(outcome)
        }
        Err(e) => {
            if state.config.rollback_on_failure && !cleanup.is_empty() {
                let failed = cleanup.unwind(state.encoding.as_ref()).await;
                if failed > 0 {
                    warn!("⚠️ {} resources could not be rolled back", failed);
                }
            } else {
                let kept = cleanup.commit();
                if !kept.is_empty() {
                    info!("Keeping {} remote resources after failure", kept.len());
                }
            }
            Err(e)
        }
    }
}

async fn execute(
    state: &AppState,
    cancel: &CancellationToken,
    cleanup: &mut CleanupStack,
) -> Result<WorkflowOutcome, WorkflowError> {
    let config = &state.config;
    info!(
        "⏳ Starting workflow {} ({})",
        config.workflow_name,
        config.preset.as_str()
    );

    let storage = ProvisioningService::provision(state, cleanup).await?;
    let job = JobService::build(state, &storage, cleanup).await?;

    if let Some(url) = &config.webhook_url {
        NotificationService::register(state, &job.id, url).await?;
    }

    let mut manifests = Vec::with_capacity(config.manifests.len());

    match config.manifest_mode {
        ManifestMode::Standalone => {
            JobRunner::start(state, &job, &StartJobOptions::default()).await?;
            JobRunner::run(state, &job, cancel).await?;

            for &kind in &config.manifests {
                let manifest =
                    ManifestService::assemble(state, &job, &storage, kind, cleanup).await?;
                ManifestRunner::run(state, &manifest, cancel).await?;
                manifests.push(manifest);
            }
        }
        ManifestMode::AttachedToJob => {
            for &kind in &config.manifests {
                manifests
                    .push(ManifestService::assemble(state, &job, &storage, kind, cleanup).await?);
            }

            let options = attached_start_options(&manifests);
            JobRunner::start(state, &job, &options).await?;
            JobRunner::run(state, &job, cancel).await?;
        }
    }

    info!("✅ Workflow {} completed", config.workflow_name);
    Ok(WorkflowOutcome {
        job_id: job.id,
        manifests,
    })
}

fn attached_start_options(manifests: &[AssembledManifest]) -> StartJobOptions {
    let of_kind = |kind: ManifestKind| {
        manifests
            .iter()
            .filter(|m| m.kind == kind)
            .map(|m| ManifestResource {
                manifest_id: m.id.clone(),
            })
            .collect()
    };

    StartJobOptions {
        manifest_generator: Some(ManifestGenerator::V2),
        vod_hls_manifests: of_kind(ManifestKind::Hls),
        vod_dash_manifests: of_kind(ManifestKind::Dash),
    }
}
