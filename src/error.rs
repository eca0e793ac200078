//! Error types for the API client, processors and the dispatcher.

/// Errors from talking to the tier configuration API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("invalid request body: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Errors a processor can report instead of an outcome.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// The processor does not handle this request at all. Never swallowed.
    #[error("process_request is not implemented: {0}")]
    Unimplemented(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ApiError> for ProcessError {
    fn from(err: ApiError) -> Self {
        ProcessError::Other(err.into())
    }
}

/// The only failure that crosses the dispatch boundary.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("request {request_id}: process_request is not implemented: {reason}")]
    Unimplemented { request_id: String, reason: String },
}
