use thiserror::Error;

/// Failures talking to the control plane.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server url: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status} for {path}")]
    Status {
        status: reqwest::StatusCode,
        path: String,
    },

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no such record '{id}' in '{collection}'")]
    UnknownRecord { collection: String, id: String },
}
