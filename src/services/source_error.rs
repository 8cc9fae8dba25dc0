use reqwest::StatusCode;

/// Failure talking to an external JSON-over-HTTP service.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("{service} returned error {status}: {body}")]
    Status {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("Invalid response format: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}
