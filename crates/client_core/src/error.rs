use shared::{domain::RunStatus, error::ApiErrorBody};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Debug, Error)]
pub enum ClientError {
    /// A named input, output, or experiment is absent.
    #[error("{0} not found")]
    NotFound(String),

    /// The requested operation is not valid for the target's current type or
    /// state.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// The server answered with a non-2xx status.
    #[error("server returned status {status}: {body}")]
    Server { status: u16, body: ApiErrorBody },

    /// A waited-on run reached ERROR or STOPPED instead of COMPLETED.
    #[error("run finished with status {}", .0.as_str())]
    RunFailed(RunStatus),

    /// The results payload violated a reshaping invariant. This indicates a
    /// server/client protocol mismatch, not a recoverable condition.
    #[error("result payload mismatch: {0}")]
    ProtocolMismatch(String),

    /// The caller's cancellation token fired while waiting for completion.
    #[error("wait for completion was cancelled")]
    Cancelled,

    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed payload: {0}")]
    Decode(String),
}

impl ClientError {
    /// The server's "no run exists for this input combination" answer, the one
    /// error `outputs_or_run_if_absent` recovers from.
    pub fn is_not_found_status(&self) -> bool {
        matches!(self, ClientError::Server { status: 404, .. })
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

impl From<chrono::ParseError> for ClientError {
    fn from(err: chrono::ParseError) -> Self {
        ClientError::Decode(err.to_string())
    }
}
