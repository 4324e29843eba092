//! Generation job polling
//!
//! Media jobs (comic, podcast, video) are submitted and then polled at a
//! fixed interval with a fixed attempt budget. Transient fetch errors
//! consume an attempt and polling continues; a job that never reaches a
//! terminal state ends in a timeout error, never a silent hang.

use std::future::Future;
use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::StudioError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobStatus {
    #[serde(rename = "status")]
    pub state: JobState,
    #[serde(default)]
    pub progress: Option<f32>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Fixed-budget polling policy. The defaults match the comic generator:
/// 60 attempts at 2-second intervals, two minutes in total.
#[derive(Debug, Clone, Copy)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 60,
        }
    }
}

/// Poll `fetch` until the job reaches a terminal state or the attempt
/// budget runs out.
///
/// Returns the completed status, `StudioError::JobFailed` with the
/// backend's reason, or `StudioError::JobTimedOut` once the budget is
/// exhausted.
pub async fn poll_job<F, Fut>(
    job_id: &str,
    config: PollConfig,
    mut fetch: F,
) -> Result<JobStatus, StudioError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<JobStatus, StudioError>>,
{
    for attempt in 0..config.max_attempts {
        match fetch().await {
            Ok(status) => {
                debug!(job_id, attempt, state = ?status.state, "job poll");
                match status.state {
                    JobState::Completed => return Ok(status),
                    JobState::Failed => {
                        return Err(StudioError::JobFailed {
                            job_id: job_id.to_string(),
                            reason: status
                                .error
                                .unwrap_or_else(|| "no reason given".to_string()),
                        })
                    }
                    JobState::Pending | JobState::Processing => {}
                }
            }
            Err(e) => {
                // Transient; keep polling on the remaining budget.
                warn!(job_id, attempt, error = %e, "job poll attempt failed");
            }
        }

        if attempt + 1 < config.max_attempts {
            tokio::time::sleep(config.interval).await;
        }
    }

    Err(StudioError::JobTimedOut {
        job_id: job_id.to_string(),
        attempts: config.max_attempts,
    })
}
