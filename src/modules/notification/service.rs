use crate::common::error::WorkflowError;
use crate::infrastructure::encoding::model::{Webhook, WebhookEvent, WebhookHttpMethod};
use crate::state::AppState;
use tracing::info;

pub struct NotificationService;

impl NotificationService {
    /// Subscribes `url` to the FINISHED and ERROR events of one encoding. Must run
    /// before the encoding is started.
    pub async fn register(state: &AppState, job_id: &str, url: &str) -> Result<(), WorkflowError> {
        let webhook = Webhook {
            url: url.to_string(),
            method: WebhookHttpMethod::Post,
        };

        for event in [WebhookEvent::Finished, WebhookEvent::Error] {
            state
                .encoding
                .register_webhook(job_id, event, &webhook)
                .await
                .map_err(WorkflowError::JobSubmission)?;
        }

        info!("🔔 Webhooks registered for encoding {}: {}", job_id, url);
        Ok(())
    }
}
