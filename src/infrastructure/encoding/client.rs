use super::EncodingService;
use super::error::{ApiError, ApiResult};
use super::model::{
    CodecConfig, CodecFamily, IngestStreamSpec, JobSpec, ManifestEntry, ManifestKind,
    ManifestSpec, Muxing, MuxingKind, MuxingSpec, RemoteResource, Rendition, RenditionSpec,
    StartJobOptions, StartManifestOptions, StorageConfig, Task, Webhook, WebhookEvent,
};
use crate::common::response::{ApiResponse, CodecConfigTypeResult, IdResult, PaginationResponse};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

const API_KEY_HEADER: &str = "X-Api-Key";
const TENANT_ORG_HEADER: &str = "X-Tenant-Org-Id";
const PAGE_LIMIT: usize = 100;

/// `EncodingService` backed by the REST API.
#[derive(Clone)]
pub struct HttpEncodingClient {
    client: Client,
    base_url: Url,
    api_key: String,
    tenant_org_id: Option<String>,
}

impl HttpEncodingClient {
    pub fn new(api_url: &str, api_key: &str, tenant_org_id: Option<&str>) -> ApiResult<Self> {
        // Url::join drops the last segment unless the base ends with '/'
        let base_url = Url::parse(&format!("{}/", api_url.trim_end_matches('/')))?;

        let client = Client::builder()
            .user_agent(concat!("encoding-workflows/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(60))
            .build()?;

        info!("✅ Encoding API client ready ({})", base_url);

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_string(),
            tenant_org_id: tenant_org_id.map(str::to_string),
        })
    }

    fn request(&self, method: Method, path: &str) -> ApiResult<RequestBuilder> {
        let url = self.base_url.join(path)?;
        debug!("{} {}", method, url);

        let mut builder = self
            .client
            .request(method, url)
            .header(API_KEY_HEADER, &self.api_key);
        if let Some(tenant) = &self.tenant_org_id {
            builder = builder.header(TENANT_ORG_HEADER, tenant);
        }
        Ok(builder)
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<Option<T>> {
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        let is_success = (200..300).contains(&status);

        if body.is_empty() && is_success {
            return Ok(None);
        }

        match serde_json::from_slice::<ApiResponse<T>>(&body) {
            Ok(envelope) => envelope.into_result(status),
            Err(_) if !is_success => Err(ApiError::Status {
                status,
                code: None,
                message: String::from_utf8_lossy(&body).trim().to_string(),
                request_id: None,
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let builder = self.request(Method::GET, path)?;
        self.execute(builder).await?.ok_or(ApiError::MissingResult)
    }

    async fn create<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<String> {
        let builder = self.request(Method::POST, path)?.json(body);
        let result: IdResult = self
            .execute(builder)
            .await?
            .ok_or(ApiError::MissingResult)?;
        Ok(result.id)
    }

    async fn post_ignoring_result<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<()> {
        let builder = self.request(Method::POST, path)?.json(body);
        self.execute::<serde_json::Value>(builder).await?;
        Ok(())
    }

    async fn delete(&self, path: &str) -> ApiResult<()> {
        let builder = self.request(Method::DELETE, path)?;
        self.execute::<serde_json::Value>(builder).await?;
        Ok(())
    }
}

fn encoding_path(job_id: &str) -> String {
    format!("encoding/encodings/{}", job_id)
}

fn manifest_path(kind: ManifestKind, manifest_id: &str) -> String {
    format!("encoding/manifests/{}/{}", kind.path_segment(), manifest_id)
}

#[async_trait]
impl EncodingService for HttpEncodingClient {
    async fn create_input(&self, storage: &StorageConfig) -> ApiResult<String> {
        let path = format!("encoding/inputs/{}", storage.kind().path_segment());
        match storage {
            StorageConfig::S3(s3) => self.create(&path, s3).await,
            StorageConfig::Azure(azure) => self.create(&path, azure).await,
        }
    }

    async fn create_output(&self, storage: &StorageConfig) -> ApiResult<String> {
        let path = format!("encoding/outputs/{}", storage.kind().path_segment());
        match storage {
            StorageConfig::S3(s3) => self.create(&path, s3).await,
            StorageConfig::Azure(azure) => self.create(&path, azure).await,
        }
    }

    async fn create_job(&self, spec: &JobSpec) -> ApiResult<String> {
        self.create("encoding/encodings", spec).await
    }

    async fn create_ingest_stream(
        &self,
        job_id: &str,
        spec: &IngestStreamSpec,
    ) -> ApiResult<String> {
        let path = format!("{}/input-streams/ingest", encoding_path(job_id));
        self.create(&path, spec).await
    }

    async fn create_codec_config(&self, config: &CodecConfig) -> ApiResult<String> {
        match config {
            CodecConfig::Video(h264) => {
                let path = format!("encoding/configurations/{}", CodecFamily::H264.path_segment());
                self.create(&path, h264).await
            }
            CodecConfig::Audio(aac) => {
                let path = format!("encoding/configurations/{}", CodecFamily::Aac.path_segment());
                self.create(&path, aac).await
            }
            CodecConfig::Unsupported { kind } => Err(ApiError::UnsupportedCodec(kind.clone())),
        }
    }

    async fn create_rendition(&self, job_id: &str, spec: &RenditionSpec) -> ApiResult<String> {
        let path = format!("{}/streams", encoding_path(job_id));
        self.create(&path, spec).await
    }

    async fn create_muxing(&self, job_id: &str, spec: &MuxingSpec) -> ApiResult<String> {
        let path = format!(
            "{}/muxings/{}",
            encoding_path(job_id),
            spec.kind().path_segment()
        );
        self.create(&path, spec).await
    }

    async fn start_job(&self, job_id: &str, options: &StartJobOptions) -> ApiResult<()> {
        let path = format!("{}/start", encoding_path(job_id));
        self.post_ignoring_result(&path, options).await
    }

    async fn job_status(&self, job_id: &str) -> ApiResult<Task> {
        self.get(&format!("{}/status", encoding_path(job_id))).await
    }

    async fn stop_job(&self, job_id: &str) -> ApiResult<()> {
        let path = format!("{}/stop", encoding_path(job_id));
        self.post_ignoring_result(&path, &serde_json::json!({})).await
    }

    async fn list_muxings(&self, job_id: &str, kind: MuxingKind) -> ApiResult<Vec<Muxing>> {
        let path = format!("{}/muxings/{}", encoding_path(job_id), kind.path_segment());
        let mut muxings = Vec::new();

        loop {
            let offset = muxings.len();
            let builder = self
                .request(Method::GET, &path)?
                .query(&[("offset", offset), ("limit", PAGE_LIMIT)]);
            let page: PaginationResponse<Muxing> = self
                .execute(builder)
                .await?
                .ok_or(ApiError::MissingResult)?;

            let received = page.items.len();
            muxings.extend(page.items);

            let reached_total = page
                .total_count
                .is_some_and(|total| muxings.len() as u64 >= total);
            if received < PAGE_LIMIT || reached_total {
                break;
            }
        }

        debug!("Listed {} {} muxings of encoding {}", muxings.len(), kind.label(), job_id);
        Ok(muxings)
    }

    async fn get_rendition(&self, job_id: &str, rendition_id: &str) -> ApiResult<Rendition> {
        self.get(&format!("{}/streams/{}", encoding_path(job_id), rendition_id))
            .await
    }

    async fn get_codec_config(&self, config_id: &str) -> ApiResult<CodecConfig> {
        let type_result: CodecConfigTypeResult = self
            .get(&format!("encoding/configurations/{}/type", config_id))
            .await?;

        let Some(family) = CodecFamily::from_type_name(&type_result.kind) else {
            return Ok(CodecConfig::Unsupported {
                kind: type_result.kind,
            });
        };

        let path = format!("encoding/configurations/{}/{}", family.path_segment(), config_id);
        match family {
            CodecFamily::H264 => Ok(CodecConfig::Video(self.get(&path).await?)),
            CodecFamily::Aac => Ok(CodecConfig::Audio(self.get(&path).await?)),
        }
    }

    async fn create_manifest(&self, kind: ManifestKind, spec: &ManifestSpec) -> ApiResult<String> {
        let path = format!("encoding/manifests/{}", kind.path_segment());
        self.create(&path, spec).await
    }

    async fn add_manifest_entry(
        &self,
        manifest_id: &str,
        entry: &ManifestEntry,
    ) -> ApiResult<String> {
        let base = manifest_path(entry.manifest_kind(), manifest_id);
        match entry {
            ManifestEntry::HlsAudioMedia(media) => {
                self.create(&format!("{}/media/audio", base), media).await
            }
            ManifestEntry::HlsStreamInfo(stream) => {
                self.create(&format!("{}/streams", base), stream).await
            }
            ManifestEntry::DashPeriod => {
                self.create(&format!("{}/periods", base), &serde_json::json!({}))
                    .await
            }
            ManifestEntry::DashVideoAdaptationSet { period_id } => {
                let path = format!("{}/periods/{}/adaptationsets/video", base, period_id);
                self.create(&path, &serde_json::json!({})).await
            }
            ManifestEntry::DashAudioAdaptationSet { period_id, lang } => {
                let path = format!("{}/periods/{}/adaptationsets/audio", base, period_id);
                self.create(&path, &serde_json::json!({ "lang": lang })).await
            }
            ManifestEntry::DashRepresentation {
                period_id,
                adaptation_set_id,
                representation,
            } => {
                let path = format!(
                    "{}/periods/{}/adaptationsets/{}/representations/fmp4",
                    base, period_id, adaptation_set_id
                );
                self.create(&path, representation).await
            }
        }
    }

    async fn start_manifest(
        &self,
        kind: ManifestKind,
        manifest_id: &str,
        options: &StartManifestOptions,
    ) -> ApiResult<()> {
        let path = format!("{}/start", manifest_path(kind, manifest_id));
        self.post_ignoring_result(&path, options).await
    }

    async fn manifest_status(&self, kind: ManifestKind, manifest_id: &str) -> ApiResult<Task> {
        self.get(&format!("{}/status", manifest_path(kind, manifest_id)))
            .await
    }

    async fn register_webhook(
        &self,
        job_id: &str,
        event: WebhookEvent,
        webhook: &Webhook,
    ) -> ApiResult<String> {
        let path = format!(
            "notifications/webhooks/encoding/encodings/{}/{}",
            job_id,
            event.path_segment()
        );
        self.create(&path, webhook).await
    }

    async fn delete_resource(&self, resource: &RemoteResource) -> ApiResult<()> {
        let path = match resource {
            RemoteResource::Input { kind, id } => {
                format!("encoding/inputs/{}/{}", kind.path_segment(), id)
            }
            RemoteResource::Output { kind, id } => {
                format!("encoding/outputs/{}/{}", kind.path_segment(), id)
            }
            RemoteResource::Encoding { id } => encoding_path(id),
            RemoteResource::CodecConfig { family, id } => {
                format!("encoding/configurations/{}/{}", family.path_segment(), id)
            }
            RemoteResource::Manifest { kind, id } => manifest_path(*kind, id),
        };
        self.delete(&path).await
    }
}
