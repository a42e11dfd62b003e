use phi_core::TaskId;
use thiserror::Error;

/// Errors returned by the backend API client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status.
    #[error("API error (HTTP {status}): {detail}")]
    Api { status: u16, detail: String },

    #[error("not found: {url}")]
    NotFound { url: String },

    /// The creation response carried no usable `task_id`.
    #[error("response did not contain a task_id")]
    MissingTaskId,

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl ClientError {
    /// Whether another attempt could succeed: connection failures, timeouts,
    /// 5xx, and the 408/429 throttling statuses. Everything else describes a
    /// request the backend will keep refusing.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Http(e) => match e.status() {
                Some(status) => status.is_server_error(),
                None => e.is_timeout() || e.is_connect() || e.is_request(),
            },
            ClientError::Api { status, .. } => *status >= 500 || matches!(status, 408 | 429),
            ClientError::NotFound { .. }
            | ClientError::MissingTaskId
            | ClientError::Deserialize { .. }
            | ClientError::InvalidBaseUrl { .. } => false,
        }
    }
}

/// A task that can no longer be polled: unknown to the backend, or answering
/// with a payload that will not decode. Distinct from a backend `failed`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("task {task_id} is unavailable: {reason}")]
pub struct TaskUnavailable {
    pub task_id: TaskId,
    /// The backend does not know this task id.
    pub not_found: bool,
    pub reason: String,
}

impl TaskUnavailable {
    #[must_use]
    pub fn new(task_id: TaskId, err: &ClientError) -> Self {
        Self {
            task_id,
            not_found: matches!(err, ClientError::NotFound { .. }),
            reason: err.to_string(),
        }
    }
}

/// Errors surfaced by the submission flow.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The URL was empty after trimming; no request was made.
    #[error("URL must not be empty")]
    EmptyUrl,

    /// A submission is already in flight for this context.
    #[error("a submission is already in progress")]
    InFlight,

    /// The creation request failed or returned no task id.
    #[error("submission rejected: {0}")]
    Rejected(#[from] ClientError),
}
