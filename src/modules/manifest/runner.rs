use super::model::AssembledManifest;
use crate::common::error::{TaskFailure, WorkflowError};
use crate::infrastructure::encoding::model::{
    ManifestGenerator, ManifestKind, StartManifestOptions, Status,
};
use crate::state::AppState;
use crate::workers::poller::TaskPoller;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Manifest tasks are never cancelled by the service, so only these two end a wait.
const MANIFEST_TERMINAL: [Status; 2] = [Status::Finished, Status::Error];

pub struct ManifestRunner;

impl ManifestRunner {
    pub async fn start(state: &AppState, manifest: &AssembledManifest) -> Result<(), WorkflowError> {
        let options = StartManifestOptions {
            manifest_generator: Some(ManifestGenerator::V2),
        };
        state
            .encoding
            .start_manifest(manifest.kind, &manifest.id, &options)
            .await
            .map_err(|e| WorkflowError::ManifestExecution {
                manifest: manifest.kind,
                failure: TaskFailure::Start(e),
            })?;
        info!("🚀 {} manifest {} started", manifest.kind, manifest.id);
        Ok(())
    }

    /// Starts the manifest and waits for it to finish.
    pub async fn run(
        state: &AppState,
        manifest: &AssembledManifest,
        cancel: &CancellationToken,
    ) -> Result<(), WorkflowError> {
        Self::start(state, manifest).await?;
        Self::wait(state, manifest.kind, &manifest.id, cancel)
            .await
            .map_err(|failure| WorkflowError::ManifestExecution {
                manifest: manifest.kind,
                failure,
            })
    }

    async fn wait(
        state: &AppState,
        kind: ManifestKind,
        manifest_id: &str,
        cancel: &CancellationToken,
    ) -> Result<(), TaskFailure> {
        let poller = TaskPoller::new("Manifest", &state.config.poll, cancel);
        let task = poller
            .wait(&MANIFEST_TERMINAL, || {
                state.encoding.manifest_status(kind, manifest_id)
            })
            .await?;

        if task.status == Status::Error {
            let messages = task.error_messages();
            for message in &messages {
                error!("❌ {}", message);
            }
            return Err(TaskFailure::Failed {
                status: task.status,
                messages,
            });
        }

        info!("✅ Manifest finished successfully");
        Ok(())
    }
}
