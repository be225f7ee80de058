use super::model::ProvisionedStorage;
use super::rollback::CleanupStack;
use crate::common::error::WorkflowError;
use crate::infrastructure::encoding::model::RemoteResource;
use crate::state::AppState;
use tracing::info;

pub struct ProvisioningService;

impl ProvisioningService {
    /// Registers the input and output storage with the encoding service.
    pub async fn provision(
        state: &AppState,
        cleanup: &mut CleanupStack,
    ) -> Result<ProvisionedStorage, WorkflowError> {
        let input = &state.config.input_storage;
        let output = &state.config.output_storage;

        let input_id = state
            .encoding
            .create_input(input)
            .await
            .map_err(WorkflowError::Provisioning)?;
        cleanup.push(RemoteResource::Input {
            kind: input.kind(),
            id: input_id.clone(),
        });
        info!("✅ {} input created: {}", input.kind().path_segment(), input_id);

        let output_id = state
            .encoding
            .create_output(output)
            .await
            .map_err(WorkflowError::Provisioning)?;
        cleanup.push(RemoteResource::Output {
            kind: output.kind(),
            id: output_id.clone(),
        });
        info!("✅ {} output created: {}", output.kind().path_segment(), output_id);

        Ok(ProvisionedStorage {
            input_id,
            output_id,
        })
    }
}
