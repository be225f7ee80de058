use crate::infrastructure::encoding::EncodingService;
use crate::infrastructure::encoding::model::RemoteResource;
use tracing::{info, warn};

/// Remote resources created during a run, in creation order.
///
/// On failure the stack is unwound newest first so nothing is deleted before the
/// resources that reference it.
#[derive(Debug, Default)]
pub struct CleanupStack {
    resources: Vec<RemoteResource>,
}

impl CleanupStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, resource: RemoteResource) {
        self.resources.push(resource);
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Deletes everything in reverse creation order. Failures are logged and skipped;
    /// the number of resources that could not be deleted is returned.
    pub async fn unwind(mut self, service: &dyn EncodingService) -> usize {
        let mut failed = 0;
        info!("🧹 Rolling back {} remote resources", self.resources.len());

        while let Some(resource) = self.resources.pop() {
            match service.delete_resource(&resource).await {
                Ok(()) => info!("🗑️ Deleted {}", resource),
                Err(e) => {
                    failed += 1;
                    warn!("⚠️ Could not delete {}: {}", resource, e);
                }
            }
        }
        failed
    }

    /// Keeps every resource and returns them, e.g. after a successful run.
    pub fn commit(self) -> Vec<RemoteResource> {
        self.resources
    }
}
