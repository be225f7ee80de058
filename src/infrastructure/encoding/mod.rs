pub mod client;
pub mod error;
#[cfg(test)]
pub mod fake;
pub mod model;

use async_trait::async_trait;
use error::ApiResult;
use model::{
    CodecConfig, IngestStreamSpec, JobSpec, ManifestEntry, ManifestKind, ManifestSpec, Muxing,
    MuxingKind, MuxingSpec, RemoteResource, Rendition, RenditionSpec, StartJobOptions,
    StartManifestOptions, StorageConfig, Task, Webhook, WebhookEvent,
};

/// Remote encoding service as seen by the workflow. Every call maps to one
/// (or, for lookups, a few) requests; ids are assigned by the service.
#[async_trait]
pub trait EncodingService: Send + Sync {
    async fn create_input(&self, storage: &StorageConfig) -> ApiResult<String>;

    async fn create_output(&self, storage: &StorageConfig) -> ApiResult<String>;

    async fn create_job(&self, spec: &JobSpec) -> ApiResult<String>;

    async fn create_ingest_stream(&self, job_id: &str, spec: &IngestStreamSpec)
    -> ApiResult<String>;

    async fn create_codec_config(&self, config: &CodecConfig) -> ApiResult<String>;

    async fn create_rendition(&self, job_id: &str, spec: &RenditionSpec) -> ApiResult<String>;

    async fn create_muxing(&self, job_id: &str, spec: &MuxingSpec) -> ApiResult<String>;

    async fn start_job(&self, job_id: &str, options: &StartJobOptions) -> ApiResult<()>;

    async fn job_status(&self, job_id: &str) -> ApiResult<Task>;

    async fn stop_job(&self, job_id: &str) -> ApiResult<()>;

    async fn list_muxings(&self, job_id: &str, kind: MuxingKind) -> ApiResult<Vec<Muxing>>;

    async fn get_rendition(&self, job_id: &str, rendition_id: &str) -> ApiResult<Rendition>;

    async fn get_codec_config(&self, config_id: &str) -> ApiResult<CodecConfig>;

    async fn create_manifest(&self, kind: ManifestKind, spec: &ManifestSpec)
    -> ApiResult<String>;

    async fn add_manifest_entry(&self, manifest_id: &str, entry: &ManifestEntry)
    -> ApiResult<String>;

    async fn start_manifest(
        &self,
        kind: ManifestKind,
        manifest_id: &str,
        options: &StartManifestOptions,
    ) -> ApiResult<()>;

    async fn manifest_status(&self, kind: ManifestKind, manifest_id: &str) -> ApiResult<Task>;

    async fn register_webhook(
        &self,
        job_id: &str,
        event: WebhookEvent,
        webhook: &Webhook,
    ) -> ApiResult<String>;

    async fn delete_resource(&self, resource: &RemoteResource) -> ApiResult<()>;
}
