//! In-memory `EncodingService` used by the workflow tests.

use super::EncodingService;
use super::error::{ApiError, ApiResult};
use super::model::{
    CodecConfig, EncodingOutput, IngestStreamSpec, JobSpec, ManifestEntry, ManifestKind,
    ManifestSpec, Muxing, MuxingKind, MuxingSpec, MuxingStream, RemoteResource, Rendition,
    RenditionSpec, StartJobOptions, StartManifestOptions, Status, StorageConfig, Task, Webhook,
    WebhookEvent,
};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};

/// A scripted answer to a status poll.
#[derive(Debug, Clone)]
pub enum Poll {
    Task(Task),
    Fail,
}

impl Poll {
    pub fn status(status: Status) -> Self {
        Poll::Task(Task::new(status))
    }
}

#[derive(Default)]
pub struct FakeState {
    next_id: u64,
    pub calls: Vec<&'static str>,
    pub fail_on: Option<&'static str>,
    pub inputs: Vec<(String, StorageConfig)>,
    pub outputs: Vec<(String, StorageConfig)>,
    pub jobs: Vec<(String, JobSpec)>,
    pub ingest_streams: Vec<(String, IngestStreamSpec)>,
    pub codec_configs: HashMap<String, CodecConfig>,
    pub rendition_specs: Vec<(String, RenditionSpec)>,
    pub renditions: HashMap<String, Rendition>,
    pub muxing_specs: Vec<(String, MuxingSpec)>,
    pub muxings: Vec<(MuxingKind, Muxing)>,
    pub started_jobs: Vec<(String, StartJobOptions)>,
    pub stopped_jobs: Vec<String>,
    pub job_polls: VecDeque<Poll>,
    pub manifests: Vec<(String, ManifestKind, ManifestSpec)>,
    pub manifest_entries: Vec<(String, String, ManifestEntry)>,
    pub started_manifests: Vec<(ManifestKind, String)>,
    pub manifest_polls: VecDeque<Poll>,
    pub webhooks: Vec<(String, WebhookEvent, Webhook)>,
    pub deleted: Vec<RemoteResource>,
}

impl FakeState {
    fn id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-{}", prefix, self.next_id)
    }
}

#[derive(Default)]
pub struct FakeEncodingService {
    state: Mutex<FakeState>,
}

fn injected_failure(operation: &str) -> ApiError {
    ApiError::Status {
        status: 500,
        code: Some(9999),
        message: format!("injected failure in {}", operation),
        request_id: None,
    }
}

fn next_poll(polls: &mut VecDeque<Poll>, operation: &str) -> ApiResult<Task> {
    // The last scripted answer repeats forever.
    let poll = if polls.len() > 1 {
        polls.pop_front()
    } else {
        polls.front().cloned()
    };
    match poll.unwrap_or(Poll::status(Status::Finished)) {
        Poll::Task(task) => Ok(task),
        Poll::Fail => Err(injected_failure(operation)),
    }
}

impl FakeEncodingService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn fail_on(&self, operation: &'static str) {
        self.state().fail_on = Some(operation);
    }

    pub fn script_job_polls(&self, polls: Vec<Poll>) {
        self.state().job_polls = polls.into();
    }

    pub fn script_manifest_polls(&self, polls: Vec<Poll>) {
        self.state().manifest_polls = polls.into();
    }

    /// Seeds a finished muxing together with its rendition and codec configuration.
    pub fn seed_muxing(
        &self,
        kind: MuxingKind,
        output_path: &str,
        codec: CodecConfig,
        mode: super::model::StreamMode,
    ) -> String {
        let mut state = self.state();
        let config_id = state.id("codec");
        let rendition_id = state.id("stream");
        let muxing_id = state.id("muxing");

        state.codec_configs.insert(config_id.clone(), codec);
        state.renditions.insert(
            rendition_id.clone(),
            Rendition {
                id: rendition_id.clone(),
                name: None,
                codec_config_id: config_id,
                input_streams: vec![],
                mode,
            },
        );
        state.muxings.push((
            kind,
            Muxing {
                id: muxing_id.clone(),
                name: None,
                streams: vec![MuxingStream {
                    stream_id: rendition_id,
                }],
                outputs: vec![EncodingOutput::public_read("output-seeded", output_path)],
            },
        ));
        muxing_id
    }

    fn enter(&self, operation: &'static str) -> ApiResult<MutexGuard<'_, FakeState>> {
        let mut state = self.state();
        state.calls.push(operation);
        if state.fail_on == Some(operation) {
            return Err(injected_failure(operation));
        }
        Ok(state)
    }
}

#[async_trait]
impl EncodingService for FakeEncodingService {
    async fn create_input(&self, storage: &StorageConfig) -> ApiResult<String> {
        let mut state = self.enter("create_input")?;
        let id = state.id("input");
        state.inputs.push((id.clone(), storage.clone()));
        Ok(id)
    }

    async fn create_output(&self, storage: &StorageConfig) -> ApiResult<String> {
        let mut state = self.enter("create_output")?;
        let id = state.id("output");
        state.outputs.push((id.clone(), storage.clone()));
        Ok(id)
    }

    async fn create_job(&self, spec: &JobSpec) -> ApiResult<String> {
        let mut state = self.enter("create_job")?;
        let id = state.id("encoding");
        state.jobs.push((id.clone(), spec.clone()));
        Ok(id)
    }

    async fn create_ingest_stream(
        &self,
        _job_id: &str,
        spec: &IngestStreamSpec,
    ) -> ApiResult<String> {
        let mut state = self.enter("create_ingest_stream")?;
        let id = state.id("ingest");
        state.ingest_streams.push((id.clone(), spec.clone()));
        Ok(id)
    }

    async fn create_codec_config(&self, config: &CodecConfig) -> ApiResult<String> {
        let mut state = self.enter("create_codec_config")?;
        if let CodecConfig::Unsupported { kind } = config {
            return Err(ApiError::UnsupportedCodec(kind.clone()));
        }
        let id = state.id("codec");
        state.codec_configs.insert(id.clone(), config.clone());
        Ok(id)
    }

    async fn create_rendition(&self, _job_id: &str, spec: &RenditionSpec) -> ApiResult<String> {
        let mut state = self.enter("create_rendition")?;
        let id = state.id("stream");
        state.renditions.insert(
            id.clone(),
            Rendition {
                id: id.clone(),
                name: Some(spec.name.clone()),
                codec_config_id: spec.codec_config_id.clone(),
                input_streams: spec.input_streams.clone(),
                mode: spec.mode,
            },
        );
        state.rendition_specs.push((id.clone(), spec.clone()));
        Ok(id)
    }

    async fn create_muxing(&self, _job_id: &str, spec: &MuxingSpec) -> ApiResult<String> {
        let mut state = self.enter("create_muxing")?;
        let id = state.id("muxing");
        state.muxings.push((
            spec.kind(),
            Muxing {
                id: id.clone(),
                name: Some(spec.name.clone()),
                streams: spec.streams.clone(),
                outputs: spec.outputs.clone(),
            },
        ));
        state.muxing_specs.push((id.clone(), spec.clone()));
        Ok(id)
    }

    async fn start_job(&self, job_id: &str, options: &StartJobOptions) -> ApiResult<()> {
        let mut state = self.enter("start_job")?;
        state.started_jobs.push((job_id.to_string(), options.clone()));
        Ok(())
    }

    async fn job_status(&self, _job_id: &str) -> ApiResult<Task> {
        let mut state = self.enter("job_status")?;
        next_poll(&mut state.job_polls, "job_status")
    }

    async fn stop_job(&self, job_id: &str) -> ApiResult<()> {
        let mut state = self.enter("stop_job")?;
        state.stopped_jobs.push(job_id.to_string());
        Ok(())
    }

    async fn list_muxings(&self, _job_id: &str, kind: MuxingKind) -> ApiResult<Vec<Muxing>> {
        let state = self.enter("list_muxings")?;
        Ok(state
            .muxings
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, m)| m.clone())
            .collect())
    }

    async fn get_rendition(&self, _job_id: &str, rendition_id: &str) -> ApiResult<Rendition> {
        let state = self.enter("get_rendition")?;
        state
            .renditions
            .get(rendition_id)
            .cloned()
            .ok_or(ApiError::MissingResult)
    }

    async fn get_codec_config(&self, config_id: &str) -> ApiResult<CodecConfig> {
        let state = self.enter("get_codec_config")?;
        state
            .codec_configs
            .get(config_id)
            .cloned()
            .ok_or(ApiError::MissingResult)
    }

    async fn create_manifest(&self, kind: ManifestKind, spec: &ManifestSpec) -> ApiResult<String> {
        let mut state = self.enter("create_manifest")?;
        let id = state.id("manifest");
        state.manifests.push((id.clone(), kind, spec.clone()));
        Ok(id)
    }

    async fn add_manifest_entry(
        &self,
        manifest_id: &str,
        entry: &ManifestEntry,
    ) -> ApiResult<String> {
        let mut state = self.enter("add_manifest_entry")?;
        let id = state.id("entry");
        state
            .manifest_entries
            .push((manifest_id.to_string(), id.clone(), entry.clone()));
        Ok(id)
    }

    async fn start_manifest(
        &self,
        kind: ManifestKind,
        manifest_id: &str,
        _options: &StartManifestOptions,
    ) -> ApiResult<()> {
        let mut state = self.enter("start_manifest")?;
        state.started_manifests.push((kind, manifest_id.to_string()));
        Ok(())
    }

    async fn manifest_status(&self, _kind: ManifestKind, _manifest_id: &str) -> ApiResult<Task> {
        let mut state = self.enter("manifest_status")?;
        next_poll(&mut state.manifest_polls, "manifest_status")
    }

    async fn register_webhook(
        &self,
        job_id: &str,
        event: WebhookEvent,
        webhook: &Webhook,
    ) -> ApiResult<String> {
        let mut state = self.enter("register_webhook")?;
        let id = state.id("webhook");
        state
            .webhooks
            .push((job_id.to_string(), event, webhook.clone()));
        Ok(id)
    }

    async fn delete_resource(&self, resource: &RemoteResource) -> ApiResult<()> {
        let mut state = self.enter("delete_resource")?;
        state.deleted.push(resource.clone());
        Ok(())
    }
}
