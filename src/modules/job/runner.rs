use super::model::EncodingJob;
use crate::common::error::{TaskFailure, WorkflowError};
use crate::infrastructure::encoding::model::{StartJobOptions, Status};
use crate::state::AppState;
use crate::workers::poller::TaskPoller;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

const JOB_TERMINAL: [Status; 4] = [
    Status::Finished,
    Status::Error,
    Status::Canceled,
    Status::TransferError,
];

pub struct JobRunner;

impl JobRunner {
    pub async fn start(
        state: &AppState,
        job: &EncodingJob,
        options: &StartJobOptions,
    ) -> Result<(), WorkflowError> {
        state
            .encoding
            .start_job(&job.id, options)
            .await
            .map_err(WorkflowError::JobSubmission)?;
        info!("🎥 Encoding {} started", job.id);
        Ok(())
    }

    /// Waits for the started encoding to reach a terminal status. Only FINISHED
    /// counts as success.
    pub async fn run(
        state: &AppState,
        job: &EncodingJob,
        cancel: &CancellationToken,
    ) -> Result<(), WorkflowError> {
        let poller = TaskPoller::new("Encoding", &state.config.poll, cancel);
        let waited = poller
            .wait(&JOB_TERMINAL, || state.encoding.job_status(&job.id))
            .await;

        let task = match waited {
            Ok(task) => task,
            Err(TaskFailure::Aborted) => {
                info!("⏹️ Wait aborted, asking encoding {} to stop", job.id);
                if let Err(e) = state.encoding.stop_job(&job.id).await {
                    warn!("⚠️ Could not stop encoding {}: {}", job.id, e);
                }
                return Err(WorkflowError::JobExecution(TaskFailure::Aborted));
            }
            Err(failure) => return Err(WorkflowError::JobExecution(failure)),
        };

        if task.status == Status::Finished {
            info!("✅ Encoding finished successfully");
            return Ok(());
        }

        let messages = task.error_messages();
        for message in &messages {
            error!("❌ {}", message);
        }
        let failure = match task.status {
            Status::Canceled => TaskFailure::Canceled { messages },
            status => TaskFailure::Failed { status, messages },
        };
        Err(WorkflowError::JobExecution(failure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::testing::fake_state;
    use crate::infrastructure::encoding::fake::Poll;
    use crate::infrastructure::encoding::model::{Message, MessageType, MuxingKind, Task};
    use std::time::Duration;

    fn job() -> EncodingJob {
        EncodingJob {
            id: "encoding-1".into(),
            name: "test".into(),
            muxing_kind: MuxingKind::Mp4,
            renditions: vec![],
        }
    }

    fn message(kind: MessageType, text: &str) -> Message {
        Message {
            kind,
            text: text.into(),
            date: None,
        }
    }

    #[tokio::test]
    async fn finished_after_queue_and_progress() {
        let (state, fake) = fake_state();
        let mut running = Task::new(Status::Running);
        running.progress = Some(50);
        fake.script_job_polls(vec![
            Poll::status(Status::Queued),
            Poll::Task(running),
            Poll::status(Status::Finished),
        ]);

        JobRunner::run(&state, &job(), &CancellationToken::new())
            .await
            .unwrap();

        let polls = fake
            .state()
            .calls
            .iter()
            .filter(|c| **c == "job_status")
            .count();
        assert_eq!(polls, 3);
    }

    #[tokio::test]
    async fn error_reports_only_error_messages_in_order() {
        let (state, fake) = fake_state();
        let mut task = Task::new(Status::Error);
        task.messages = Some(vec![
            message(MessageType::Error, "decoder crashed"),
            message(MessageType::Info, "retrying segment"),
            message(MessageType::Error, "segment 12 failed"),
        ]);
        fake.script_job_polls(vec![
            Poll::status(Status::Running),
            Poll::Task(task),
            Poll::status(Status::Finished),
        ]);

        let result = JobRunner::run(&state, &job(), &CancellationToken::new()).await;

        match result {
            Err(WorkflowError::JobExecution(TaskFailure::Failed { status, messages })) => {
                assert_eq!(status, Status::Error);
                assert_eq!(messages, vec!["decoder crashed", "segment 12 failed"]);
            }
            other => panic!("unexpected result: {:?}", other),
        }
        // nothing is polled after the terminal ERROR
        let polls = fake
            .state()
            .calls
            .iter()
            .filter(|c| **c == "job_status")
            .count();
        assert_eq!(polls, 2);
    }

    #[tokio::test]
    async fn canceled_is_a_failure() {
        let (state, fake) = fake_state();
        fake.script_job_polls(vec![Poll::status(Status::Canceled)]);

        let result = JobRunner::run(&state, &job(), &CancellationToken::new()).await;

        assert!(matches!(
            result,
            Err(WorkflowError::JobExecution(TaskFailure::Canceled { .. }))
        ));
    }

    #[tokio::test]
    async fn transfer_error_is_terminal() {
        let (state, fake) = fake_state();
        fake.script_job_polls(vec![Poll::status(Status::TransferError)]);

        let result = JobRunner::run(&state, &job(), &CancellationToken::new()).await;

        assert!(matches!(
            result,
            Err(WorkflowError::JobExecution(TaskFailure::Failed {
                status: Status::TransferError,
                ..
            }))
        ));
    }

    #[tokio::test]
    async fn first_poll_failure_is_fatal_by_default() {
        let (state, fake) = fake_state();
        fake.script_job_polls(vec![Poll::Fail, Poll::status(Status::Finished)]);

        let result = JobRunner::run(&state, &job(), &CancellationToken::new()).await;

        assert!(matches!(
            result,
            Err(WorkflowError::JobExecution(TaskFailure::Poll(_)))
        ));
    }

    #[tokio::test]
    async fn aborting_the_wait_stops_the_encoding() {
        let (mut state, fake) = fake_state();
        state.config.poll.interval = Duration::from_secs(60);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = JobRunner::run(&state, &job(), &cancel).await;

        assert!(matches!(
            result,
            Err(WorkflowError::JobExecution(TaskFailure::Aborted))
        ));
        assert_eq!(fake.state().stopped_jobs, vec!["encoding-1".to_string()]);
    }
}
