use thiserror::Error;

/// Error types for studio client operations.
#[derive(Debug, Error)]
pub enum StudioError {
    #[error("studio backend not reachable at {0}")]
    NotReachable(String),

    #[error("studio API error: {0}")]
    Api(String),

    #[error("failed to parse studio response: {0}")]
    Parse(String),

    /// The backend reported the job as failed.
    #[error("job {job_id} failed: {reason}")]
    JobFailed { job_id: String, reason: String },

    /// We stopped waiting; distinct from the backend saying no.
    #[error("job {job_id} timed out after {attempts} polls")]
    JobTimedOut { job_id: String, attempts: u32 },
}
