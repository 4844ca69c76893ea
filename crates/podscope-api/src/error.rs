use thiserror::Error;

/// Failure talking to the backend
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered 401; the session must be re-established
    #[error("authentication required")]
    Unauthorized,

    /// The backend answered with an explicit `{error}` payload
    #[error("{0}")]
    Backend(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("response is missing `{0}`")]
    Incomplete(&'static str),

    #[error("invalid server URL: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// The message of an explicit backend error payload, if that is what this is
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Backend(msg) => Some(msg),
            _ => None,
        }
    }
}
