use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Server returned error status {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Malformed ratings payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Transport failed: {0}")]
    Transport(String),
}
