use crate::common::error::ConfigError;
use crate::config::env::{self, EnvKey, EnvReader};
use crate::config::presets::WorkflowPreset;
use crate::infrastructure::encoding::model::{
    AzureStorage, ManifestKind, S3Storage, StorageConfig, StorageKind,
};
use crate::modules::job::model::{MuxingFormat, RenditionLadder};
use crate::modules::manifest::model::ManifestMode;
use crate::workers::poller::PollConfig;
use std::time::Duration;
use validator::Validate;

pub const DEFAULT_API_URL: &str = "https://api.bitmovin.com/v1";
/// Upper bound for the poll delays: one day.
pub const MAX_POLL_INTERVAL_SECS: u64 = 86_400;
/// Upper bound for the overall wait: thirty days.
pub const MAX_POLL_TIMEOUT_SECS: u64 = 30 * 86_400;

#[derive(Clone, Debug, Validate)]
pub struct AppConfig {
    #[validate(length(min = 1))]
    pub api_key: String,
    pub tenant_org_id: Option<String>,
    #[validate(url)]
    pub api_url: String,
    pub preset: WorkflowPreset,
    #[validate(length(min = 1))]
    pub workflow_name: String,
    #[validate(length(min = 1))]
    pub cloud_region: String,
    #[validate(length(min = 1))]
    pub encoder_version: String,
    pub input_storage: StorageConfig,
    pub output_storage: StorageConfig,
    #[validate(length(min = 1))]
    pub input_path: String,
    /// Always ends with exactly one '/'.
    pub output_base_path: String,
    #[validate(url)]
    pub webhook_url: Option<String>,
    #[validate(nested)]
    pub ladder: RenditionLadder,
    pub muxing_format: MuxingFormat,
    pub manifests: Vec<ManifestKind>,
    pub manifest_mode: ManifestMode,
    pub poll: PollConfig,
    pub rollback_on_failure: bool,
    pub warn_on_unsupported_codec: bool,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_reader(&env::process_env())
    }

    pub fn from_reader<F>(reader: &EnvReader<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let preset: WorkflowPreset =
            reader.get_parsed(EnvKey::WorkflowPreset, WorkflowPreset::FixedMp4Hls)?;
        let workflow_name = reader.get_or(EnvKey::WorkflowName, preset.default_name());
        let output_base_path = normalize_base_path(&reader.get_or(
            EnvKey::OutputBasePath,
            &format!("output/{}/", workflow_name),
        ));

        let poll = PollConfig {
            interval: Duration::from_secs(reader.get_parsed(EnvKey::PollIntervalSecs, 5u64)?),
            max_interval: Duration::from_secs(
                reader.get_parsed(EnvKey::PollMaxIntervalSecs, 60u64)?,
            ),
            backoff_multiplier: reader.get_parsed(EnvKey::PollBackoffMultiplier, 1.0f64)?,
            timeout: match reader.get_parsed(EnvKey::PollTimeoutSecs, 0u64)? {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            max_consecutive_failures: reader
                .get_parsed(EnvKey::PollMaxConsecutiveFailures, 0u32)?,
            jitter: reader.get_parsed(EnvKey::PollJitter, false)?,
        };

        let config = Self {
            api_key: reader.get(EnvKey::ApiKey)?,
            tenant_org_id: reader.get_opt(EnvKey::TenantOrgId),
            api_url: reader.get_or(EnvKey::ApiUrl, DEFAULT_API_URL),
            preset,
            workflow_name,
            cloud_region: reader.get_or(EnvKey::CloudRegion, preset.default_region()),
            encoder_version: reader.get_or(EnvKey::EncoderVersion, preset.default_encoder_version()),
            input_storage: storage_from_env(reader, Side::Input, preset.default_storage())?,
            output_storage: storage_from_env(reader, Side::Output, preset.default_storage())?,
            input_path: reader.get(EnvKey::InputPath)?,
            output_base_path,
            webhook_url: reader.get_opt(EnvKey::WebhookUrl),
            ladder: preset.ladder(),
            muxing_format: preset.muxing_format(),
            manifests: preset.manifests(),
            manifest_mode: preset.manifest_mode(),
            poll,
            rollback_on_failure: reader.get_parsed(EnvKey::RollbackOnFailure, true)?,
            warn_on_unsupported_codec: reader.get_parsed(EnvKey::WarnOnUnsupportedCodec, true)?,
        };

        config.validate()?;
        config.check_combinations()?;
        Ok(config)
    }

    fn check_combinations(&self) -> Result<(), ConfigError> {
        if self.muxing_format == MuxingFormat::Mp4 && self.manifests.contains(&ManifestKind::Dash) {
            return Err(ConfigError::Invalid {
                key: EnvKey::WorkflowPreset.as_str(),
                value: self.preset.as_str().to_string(),
                reason: "DASH manifests need fragmented MP4 muxings".to_string(),
            });
        }
        self.check_poll()
    }

    fn check_poll(&self) -> Result<(), ConfigError> {
        let poll = &self.poll;
        let invalid = |key: EnvKey, value: String, reason: String| ConfigError::Invalid {
            key: key.as_str(),
            value,
            reason,
        };

        let interval = poll.interval.as_secs();
        if poll.interval.is_zero() || interval > MAX_POLL_INTERVAL_SECS {
            return Err(invalid(
                EnvKey::PollIntervalSecs,
                interval.to_string(),
                format!("must be between 1 and {}", MAX_POLL_INTERVAL_SECS),
            ));
        }

        let max_interval = poll.max_interval.as_secs();
        if poll.max_interval < poll.interval || max_interval > MAX_POLL_INTERVAL_SECS {
            return Err(invalid(
                EnvKey::PollMaxIntervalSecs,
                max_interval.to_string(),
                format!(
                    "must be between {} ({}) and {}",
                    interval,
                    EnvKey::PollIntervalSecs.as_str(),
                    MAX_POLL_INTERVAL_SECS
                ),
            ));
        }

        if !poll.backoff_multiplier.is_finite() || poll.backoff_multiplier < 1.0 {
            return Err(invalid(
                EnvKey::PollBackoffMultiplier,
                poll.backoff_multiplier.to_string(),
                "must be a finite number of at least 1.0".to_string(),
            ));
        }

        if let Some(timeout) = poll.timeout {
            if timeout.as_secs() > MAX_POLL_TIMEOUT_SECS {
                return Err(invalid(
                    EnvKey::PollTimeoutSecs,
                    timeout.as_secs().to_string(),
                    format!("must be at most {} (0 waits forever)", MAX_POLL_TIMEOUT_SECS),
                ));
            }
        }
        Ok(())
    }
}

/// Collapses trailing slashes into exactly one and drops leading ones.
pub fn normalize_base_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{}/", trimmed)
    }
}

#[derive(Clone, Copy)]
enum Side {
    Input,
    Output,
}

fn storage_from_env<F>(
    reader: &EnvReader<F>,
    side: Side,
    default_kind: StorageKind,
) -> Result<StorageConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let (kind_key, bucket, access, secret, account, key, container) = match side {
        Side::Input => (
            EnvKey::InputStorage,
            EnvKey::InputS3Bucket,
            EnvKey::InputS3AccessKey,
            EnvKey::InputS3SecretKey,
            EnvKey::InputAzureAccountName,
            EnvKey::InputAzureAccountKey,
            EnvKey::InputAzureContainer,
        ),
        Side::Output => (
            EnvKey::OutputStorage,
            EnvKey::OutputS3Bucket,
            EnvKey::OutputS3AccessKey,
            EnvKey::OutputS3SecretKey,
            EnvKey::OutputAzureAccountName,
            EnvKey::OutputAzureAccountKey,
            EnvKey::OutputAzureContainer,
        ),
    };

    let kind = match reader.get_opt(kind_key) {
        None => default_kind,
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "s3" => StorageKind::S3,
            "azure" => StorageKind::Azure,
            _ => {
                return Err(ConfigError::Invalid {
                    key: kind_key.as_str(),
                    value,
                    reason: "expected s3 or azure".to_string(),
                });
            }
        },
    };

    Ok(match kind {
        StorageKind::S3 => StorageConfig::S3(S3Storage {
            bucket_name: reader.get(bucket)?,
            access_key: reader.get(access)?,
            secret_key: reader.get(secret)?,
        }),
        StorageKind::Azure => StorageConfig::Azure(AzureStorage {
            account_name: reader.get(account)?,
            account_key: reader.get(key)?,
            container: reader.get(container)?,
        }),
    })
}
