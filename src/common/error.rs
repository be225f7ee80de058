use crate::infrastructure::encoding::error::ApiError;
use crate::infrastructure::encoding::model::{ManifestKind, Status};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid configuration: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Why waiting on a remote task did not end in FINISHED.
#[derive(Debug, Error)]
pub enum TaskFailure {
    #[error("failed with status {status}")]
    Failed {
        status: Status,
        messages: Vec<String>,
    },

    #[error("was cancelled")]
    Canceled { messages: Vec<String> },

    #[error("did not reach a terminal state within {after:?}")]
    TimedOut { after: Duration },

    #[error("wait was aborted")]
    Aborted,

    #[error("could not be started: {0}")]
    Start(ApiError),

    #[error("status poll failed: {0}")]
    Poll(ApiError),
}

#[derive(Debug, Error)]
pub enum AssemblyError {
    #[error("{0}")]
    Api(ApiError),

    #[error("muxing {muxing_id} has no {what}")]
    Incomplete {
        muxing_id: String,
        what: &'static str,
    },

    #[error("output path {path:?} is outside the base path {base:?}")]
    OutsideBasePath { path: String, base: String },

    #[error("{0} muxings cannot be published in a DASH manifest")]
    UnsupportedContainer(&'static str),
}

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("configuration error: {0}")]
    Config(ConfigError),

    #[error("failed to provision storage: {0}")]
    Provisioning(ApiError),

    #[error("failed to submit encoding: {0}")]
    JobSubmission(ApiError),

    #[error("encoding {0}")]
    JobExecution(TaskFailure),

    #[error("failed to assemble {manifest} manifest: {reason}")]
    ManifestAssembly {
        manifest: ManifestKind,
        reason: AssemblyError,
    },

    #[error("{manifest} manifest generation {failure}")]
    ManifestExecution {
        manifest: ManifestKind,
        failure: TaskFailure,
    },
}

impl WorkflowError {
    pub fn is_aborted(&self) -> bool {
        matches!(
            self,
            WorkflowError::JobExecution(TaskFailure::Aborted)
                | WorkflowError::ManifestExecution {
                    failure: TaskFailure::Aborted,
                    ..
                }
        )
    }
}

impl From<ConfigError> for WorkflowError {
    fn from(err: ConfigError) -> Self {
        WorkflowError::Config(err)
    }
}
