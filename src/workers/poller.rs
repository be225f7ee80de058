use crate::common::error::TaskFailure;
use crate::infrastructure::encoding::error::ApiResult;
use crate::infrastructure::encoding::model::{Status, Task};
use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay before the first poll and between polls while backoff is flat.
    pub interval: Duration,
    /// Upper bound for the delay once backoff kicks in.
    pub max_interval: Duration,
    /// 1.0 keeps a fixed delay.
    pub backoff_multiplier: f64,
    /// `None` waits forever.
    pub timeout: Option<Duration>,
    /// Failed polls tolerated in a row before giving up. 0 makes the first failure fatal.
    pub max_consecutive_failures: u32,
    /// Add ±10% random jitter to every delay.
    pub jitter: bool,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_interval: Duration::from_secs(60),
            backoff_multiplier: 1.0,
            timeout: None,
            max_consecutive_failures: 0,
            jitter: false,
        }
    }
}

impl PollConfig {
    pub fn next_interval(&self, current: Duration) -> Duration {
        if self.backoff_multiplier <= 1.0 {
            return current;
        }
        let next = current.as_secs_f64() * self.backoff_multiplier;
        Duration::try_from_secs_f64(next.min(self.max_interval.as_secs_f64()))
            .unwrap_or(self.max_interval)
    }

    fn jittered(&self, delay: Duration) -> Duration {
        if !self.jitter {
            return delay;
        }
        let factor = 1.0 + rand::rng().random_range(-0.1..=0.1);
        Duration::try_from_secs_f64(delay.as_secs_f64() * factor).unwrap_or(delay)
    }
}

/// Stand-in wake time for delays that overflow `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Polls a remote task until it reports one of the terminal statuses.
pub struct TaskPoller<'a> {
    label: &'static str,
    config: &'a PollConfig,
    cancel: &'a CancellationToken,
}

impl<'a> TaskPoller<'a> {
    pub fn new(label: &'static str, config: &'a PollConfig, cancel: &'a CancellationToken) -> Self {
        Self {
            label,
            config,
            cancel,
        }
    }

    /// Returns the first task snapshot whose status is in `terminal`. Interpreting that
    /// status is left to the caller.
    pub async fn wait<F, Fut>(&self, terminal: &[Status], mut fetch: F) -> Result<Task, TaskFailure>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ApiResult<Task>>,
    {
        let started = Instant::now();
        // a timeout too large to represent means no deadline
        let deadline = self.config.timeout.and_then(|t| started.checked_add(t));
        let mut delay = self.config.interval;
        let mut failures = 0u32;

        loop {
            let now = Instant::now();
            let mut wake_at = now
                .checked_add(self.config.jittered(delay))
                .unwrap_or_else(|| now + FAR_FUTURE);
            if let Some(deadline) = deadline {
                if Instant::now() >= deadline {
                    return Err(TaskFailure::TimedOut {
                        after: started.elapsed(),
                    });
                }
                wake_at = wake_at.min(deadline);
            }

            tokio::select! {
                _ = self.cancel.cancelled() => return Err(TaskFailure::Aborted),
                _ = tokio::time::sleep_until(wake_at) => {}
            }

            let polled = tokio::select! {
                _ = self.cancel.cancelled() => return Err(TaskFailure::Aborted),
                polled = fetch() => polled,
            };

            match polled {
                Ok(task) => {
                    failures = 0;
                    info!(
                        "{} status is {} (progress: {} %)",
                        self.label,
                        task.status,
                        task.progress.unwrap_or(0)
                    );
                    if terminal.contains(&task.status) {
                        return Ok(task);
                    }
                }
                Err(e) => {
                    failures += 1;
                    if failures > self.config.max_consecutive_failures {
                        return Err(TaskFailure::Poll(e));
                    }
                    warn!(
                        "{} status poll failed ({}/{}): {}",
                        self.label, failures, self.config.max_consecutive_failures, e
                    );
                }
            }

            delay = self.config.next_interval(delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::encoding::error::ApiError;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn fast_config() -> PollConfig {
        PollConfig {
            interval: Duration::from_millis(5),
            max_interval: Duration::from_millis(20),
            ..PollConfig::default()
        }
    }

    fn transient() -> ApiError {
        ApiError::Status {
            status: 503,
            code: None,
            message: "unavailable".into(),
            request_id: None,
        }
    }

    const JOB_TERMINAL: [Status; 3] = [Status::Finished, Status::Error, Status::Canceled];

    async fn run_script(
        config: &PollConfig,
        script: Vec<ApiResult<Task>>,
    ) -> (Result<Task, TaskFailure>, usize) {
        let script = Mutex::new(VecDeque::from(script));
        let calls = Mutex::new(0usize);
        let cancel = CancellationToken::new();
        let poller = TaskPoller::new("Encoding", config, &cancel);

        let result = poller
            .wait(&JOB_TERMINAL, || {
                *calls.lock().unwrap() += 1;
                let next = script
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or_else(|| Ok(Task::new(Status::Running)));
                async move { next }
            })
            .await;
        let calls = *calls.lock().unwrap();
        (result, calls)
    }

    #[tokio::test]
    async fn stops_at_first_terminal_status() {
        let (result, calls) = run_script(
            &fast_config(),
            vec![
                Ok(Task::new(Status::Queued)),
                Ok(Task::new(Status::Running)),
                Ok(Task::new(Status::Error)),
                Ok(Task::new(Status::Finished)),
            ],
        )
        .await;

        assert_eq!(result.unwrap().status, Status::Error);
        assert_eq!(calls, 3);
    }

    #[tokio::test]
    async fn first_poll_failure_is_fatal_by_default() {
        let (result, calls) = run_script(&fast_config(), vec![Err(transient())]).await;
        assert!(matches!(result, Err(TaskFailure::Poll(_))));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn tolerates_configured_consecutive_failures() {
        let config = PollConfig {
            max_consecutive_failures: 2,
            ..fast_config()
        };
        let (result, calls) = run_script(
            &config,
            vec![
                Err(transient()),
                Err(transient()),
                Ok(Task::new(Status::Running)),
                Err(transient()),
                Ok(Task::new(Status::Finished)),
            ],
        )
        .await;

        assert_eq!(result.unwrap().status, Status::Finished);
        assert_eq!(calls, 5);
    }

    #[tokio::test]
    async fn times_out_when_never_terminal() {
        let config = PollConfig {
            timeout: Some(Duration::from_millis(40)),
            ..fast_config()
        };
        let (result, _) = run_script(&config, vec![]).await;
        assert!(matches!(result, Err(TaskFailure::TimedOut { .. })));
    }

    #[tokio::test]
    async fn cancellation_aborts_the_wait() {
        let config = PollConfig {
            interval: Duration::from_secs(30),
            ..PollConfig::default()
        };
        let cancel = CancellationToken::new();
        let poller = TaskPoller::new("Encoding", &config, &cancel);

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });

        let result = poller
            .wait(&JOB_TERMINAL, || async { Ok(Task::new(Status::Running)) })
            .await;
        assert!(matches!(result, Err(TaskFailure::Aborted)));
    }

    #[test]
    fn backoff_grows_up_to_the_cap() {
        let config = PollConfig {
            interval: Duration::from_secs(5),
            max_interval: Duration::from_secs(12),
            backoff_multiplier: 2.0,
            ..PollConfig::default()
        };
        let second = config.next_interval(config.interval);
        let third = config.next_interval(second);
        assert_eq!(second, Duration::from_secs(10));
        assert_eq!(third, Duration::from_secs(12));
    }

    #[test]
    fn backoff_with_unbounded_cap_saturates() {
        let config = PollConfig {
            interval: Duration::from_secs(u64::MAX / 2),
            max_interval: Duration::MAX,
            backoff_multiplier: 4.0,
            ..PollConfig::default()
        };
        assert_eq!(config.next_interval(config.interval), Duration::MAX);
    }

    #[tokio::test]
    async fn unrepresentable_timeout_waits_without_deadline() {
        let config = PollConfig {
            timeout: Some(Duration::from_secs(u64::MAX)),
            ..fast_config()
        };
        let (result, calls) = run_script(
            &config,
            vec![Ok(Task::new(Status::Running)), Ok(Task::new(Status::Finished))],
        )
        .await;

        assert_eq!(result.unwrap().status, Status::Finished);
        assert_eq!(calls, 2);
    }

    #[tokio::test]
    async fn unrepresentable_interval_can_still_be_cancelled() {
        let config = PollConfig {
            interval: Duration::from_secs(u64::MAX),
            max_interval: Duration::from_secs(u64::MAX),
            ..PollConfig::default()
        };
        let cancel = CancellationToken::new();
        let poller = TaskPoller::new("Encoding", &config, &cancel);

        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });

        let result = poller
            .wait(&JOB_TERMINAL, || async { Ok(Task::new(Status::Running)) })
            .await;
        assert!(matches!(result, Err(TaskFailure::Aborted)));
    }

    #[test]
    fn jitter_stays_within_ten_percent() {
        let config = PollConfig {
            jitter: true,
            ..PollConfig::default()
        };
        let delay = Duration::from_secs(10);
        for _ in 0..200 {
            let jittered = config.jittered(delay);
            assert!(jittered >= Duration::from_secs(9), "{:?}", jittered);
            assert!(jittered <= Duration::from_secs(11), "{:?}", jittered);
        }
        assert_eq!(PollConfig::default().jittered(delay), delay);
    }

    #[test]
    fn flat_multiplier_keeps_fixed_delay() {
        let config = PollConfig::default();
        assert_eq!(config.next_interval(config.interval), Duration::from_secs(5));
    }
}
