//! Error types for the wait pipeline.

use thiserror::Error;

/// Errors from the platform API clients.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from deploy API: {0}")]
    UnexpectedResponse(String),
}

/// Fatal wait failures.
///
/// Every variant here funnels to the caller's single failure handler. The two
/// soft conditions — the no-content-change skip and an exhausted reachability
/// budget — are deliberately not errors; they surface as
/// [`crate::WaitOutcome::NoPreview`] and
/// [`crate::ProbeOutcome::ExhaustedRetries`].
#[derive(Error, Debug)]
pub enum WaitError {
    /// A required credential or setting is absent.
    #[error("missing required configuration: {0}")]
    MissingConfig(String),

    /// The platform answered without the thing we asked about.
    #[error("not found: {0}")]
    NotFound(String),

    /// No deploy for the commit appeared within the budget.
    #[error("timeout reached before deployment was created ({budget_secs}s)")]
    CreationTimeout { budget_secs: u64 },

    /// The deploy never reached a terminal state within the budget.
    #[error("timeout reached before deployment was ready ({budget_secs}s, last state: {last_state})")]
    ReadinessTimeout { budget_secs: u64, last_state: String },

    /// The deploy ended in an error state; the platform's message is passed
    /// through verbatim.
    #[error("{0}")]
    DeployFailed(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}
