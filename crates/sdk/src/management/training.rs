// Training poll loop

use super::cancel::CancelToken;
use super::ManagementClient;
use crate::error::{LuisError, Result};
use crate::types::{ModelTrainingStatus, TrainingStatus};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Delay between two `trainingStatus` polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(2500);

/// Outcome of one poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// Some model is `InProgress`, none failed
    Pending,
    /// No model is `InProgress`, none failed
    Done,
    /// Some model reported `Fail`
    Failed,
}

/// Decide the poll state from the per-model statuses. `Fail` wins over
/// `InProgress`.
pub fn classify<'a, I>(statuses: I) -> PollState
where
    I: IntoIterator<Item = &'a TrainingStatus>,
{
    let mut pending = false;
    for status in statuses {
        match status {
            TrainingStatus::Fail => return PollState::Failed,
            TrainingStatus::InProgress => pending = true,
            _ => {}
        }
    }
    if pending {
        PollState::Pending
    } else {
        PollState::Done
    }
}

/// Whether sleeping `interval` more would pass `max`
fn outlasts(elapsed: Duration, interval: Duration, max: Duration) -> bool {
    elapsed.checked_add(interval).map_or(true, |next| next > max)
}

/// Opt-in bounds for [`ManagementClient::wait_for_training_with`].
///
/// The default polls every 2.5 s with no attempt limit, no deadline and
/// no cancellation.
#[derive(Debug, Clone)]
pub struct WaitOptions {
    pub interval: Duration,
    pub max_attempts: Option<u32>,
    pub max_duration: Option<Duration>,
    pub cancel: Option<CancelToken>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
            max_duration: None,
            cancel: None,
        }
    }
}

impl WaitOptions {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn with_max_duration(mut self, duration: Duration) -> Self {
        self.max_duration = Some(duration);
        self
    }

    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

impl ManagementClient {
    /// Poll `trainingStatus` every 2.5 s until no model is in progress.
    ///
    /// Fails with [`LuisError::TrainingFailed`] as soon as any model
    /// reports `Fail`. Never gives up on its own.
    pub async fn wait_for_training(&self, app_id: &str, version_id: &str) -> Result<()> {
        self.wait_for_training_with(app_id, version_id, WaitOptions::default())
            .await
    }

    /// [`ManagementClient::wait_for_training`] with bounds and cancellation
    pub async fn wait_for_training_with(
        &self,
        app_id: &str,
        version_id: &str,
        mut options: WaitOptions,
    ) -> Result<()> {
        let started = Instant::now();
        let mut attempts: u32 = 0;

        loop {
            if options.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                info!(app_id, version_id, attempts, "Training wait cancelled");
                return Err(LuisError::Cancelled);
            }

            let response = self.training_status(app_id, version_id).await?;
            attempts += 1;

            let models: Vec<ModelTrainingStatus> = response.model_statuses()?;
            let state = classify(models.iter().map(|m| &m.details.status));
            debug!(app_id, version_id, attempt = attempts, state = ?state, "Training status polled");

            match state {
                PollState::Done => {
                    info!(app_id, version_id, attempts, "Training completed");
                    return Ok(());
                }
                PollState::Failed => {
                    warn!(app_id, version_id, attempts, "Training failed");
                    return Err(LuisError::TrainingFailed {
                        body: response.body,
                    });
                }
                PollState::Pending => {}
            }

            if options.max_attempts.is_some_and(|max| attempts >= max) {
                return Err(LuisError::PollLimitExceeded { attempts });
            }
            if options
                .max_duration
                .is_some_and(|max| outlasts(started.elapsed(), options.interval, max))
            {
                return Err(LuisError::PollLimitExceeded { attempts });
            }

            match options.cancel.as_mut() {
                Some(token) => {
                    tokio::select! {
                        _ = tokio::time::sleep(options.interval) => {}
                        _ = token.cancelled() => {
                            info!(app_id, version_id, attempts, "Training wait cancelled");
                            return Err(LuisError::Cancelled);
                        }
                    }
                }
                None => tokio::time::sleep(options.interval).await,
            }
        }
    }

    /// Start training and wait for it to finish
    pub async fn train_and_wait(
        &self,
        app_id: &str,
        version_id: &str,
        options: WaitOptions,
    ) -> Result<()> {
        self.train_app(app_id, version_id).await?;
        info!(app_id, version_id, "Training started");
        self.wait_for_training_with(app_id, version_id, options)
            .await
    }
}
