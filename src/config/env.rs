use crate::common::error::ConfigError;
use std::env;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, Copy)]
pub enum EnvKey {
    ApiKey,
    TenantOrgId,
    ApiUrl,
    WorkflowPreset,
    WorkflowName,
    CloudRegion,
    EncoderVersion,
    InputStorage,
    InputS3Bucket,
    InputS3AccessKey,
    InputS3SecretKey,
    InputAzureAccountName,
    InputAzureAccountKey,
    InputAzureContainer,
    InputPath,
    OutputStorage,
    OutputS3Bucket,
    OutputS3AccessKey,
    OutputS3SecretKey,
    OutputAzureAccountName,
    OutputAzureAccountKey,
    OutputAzureContainer,
    OutputBasePath,
    WebhookUrl,
    PollIntervalSecs,
    PollMaxIntervalSecs,
    PollBackoffMultiplier,
    PollTimeoutSecs,
    PollMaxConsecutiveFailures,
    PollJitter,
    RollbackOnFailure,
    WarnOnUnsupportedCodec,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ApiKey => "ENCODING_API_KEY",
            EnvKey::TenantOrgId => "ENCODING_TENANT_ORG_ID",
            EnvKey::ApiUrl => "ENCODING_API_URL",
            EnvKey::WorkflowPreset => "WORKFLOW_PRESET",
            EnvKey::WorkflowName => "WORKFLOW_NAME",
            EnvKey::CloudRegion => "CLOUD_REGION",
            EnvKey::EncoderVersion => "ENCODER_VERSION",
            EnvKey::InputStorage => "INPUT_STORAGE",
            EnvKey::InputS3Bucket => "INPUT_S3_BUCKET",
            EnvKey::InputS3AccessKey => "INPUT_S3_ACCESS_KEY",
            EnvKey::InputS3SecretKey => "INPUT_S3_SECRET_KEY",
            EnvKey::InputAzureAccountName => "INPUT_AZURE_ACCOUNT_NAME",
            EnvKey::InputAzureAccountKey => "INPUT_AZURE_ACCOUNT_KEY",
            EnvKey::InputAzureContainer => "INPUT_AZURE_CONTAINER",
            EnvKey::InputPath => "INPUT_PATH",
            EnvKey::OutputStorage => "OUTPUT_STORAGE",
            EnvKey::OutputS3Bucket => "OUTPUT_S3_BUCKET",
            EnvKey::OutputS3AccessKey => "OUTPUT_S3_ACCESS_KEY",
            EnvKey::OutputS3SecretKey => "OUTPUT_S3_SECRET_KEY",
            EnvKey::OutputAzureAccountName => "OUTPUT_AZURE_ACCOUNT_NAME",
            EnvKey::OutputAzureAccountKey => "OUTPUT_AZURE_ACCOUNT_KEY",
            EnvKey::OutputAzureContainer => "OUTPUT_AZURE_CONTAINER",
            EnvKey::OutputBasePath => "OUTPUT_BASE_PATH",
            EnvKey::WebhookUrl => "WEBHOOK_URL",
            EnvKey::PollIntervalSecs => "POLL_INTERVAL_SECS",
            EnvKey::PollMaxIntervalSecs => "POLL_MAX_INTERVAL_SECS",
            EnvKey::PollBackoffMultiplier => "POLL_BACKOFF_MULTIPLIER",
            EnvKey::PollTimeoutSecs => "POLL_TIMEOUT_SECS",
            EnvKey::PollMaxConsecutiveFailures => "POLL_MAX_CONSECUTIVE_FAILURES",
            EnvKey::PollJitter => "POLL_JITTER",
            EnvKey::RollbackOnFailure => "ROLLBACK_ON_FAILURE",
            EnvKey::WarnOnUnsupportedCodec => "WARN_ON_UNSUPPORTED_CODEC",
        }
    }
}

/// Reads settings through a lookup function so tests can feed a fixed map
/// instead of the process environment.
pub struct EnvReader<F> {
    lookup: F,
}

impl<F> EnvReader<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub fn new(lookup: F) -> Self {
        Self { lookup }
    }

    /// Blank values count as unset.
    pub fn get_opt(&self, key: EnvKey) -> Option<String> {
        (self.lookup)(key.as_str()).filter(|v| !v.trim().is_empty())
    }

    pub fn get(&self, key: EnvKey) -> Result<String, ConfigError> {
        self.get_opt(key).ok_or(ConfigError::Missing(key.as_str()))
    }

    pub fn get_or(&self, key: EnvKey, default: &str) -> String {
        self.get_opt(key).unwrap_or_else(|| default.to_string())
    }

    pub fn get_parsed<T>(&self, key: EnvKey, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.get_opt(key) {
            Some(val) => val.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
                key: key.as_str(),
                value: val.clone(),
                reason: e.to_string(),
            }),
            None => Ok(default),
        }
    }
}

pub fn process_env() -> EnvReader<impl Fn(&str) -> Option<String>> {
    EnvReader::new(|key: &str| env::var(key).ok())
}
