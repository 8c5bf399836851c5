use thiserror::Error;

/// A failed call to the remote API.
///
/// Holds messages rather than the source errors so the value can be shared
/// by every caller waiting on the same cached request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Request to '{url}' failed: {message}")]
    Transport { url: String, message: String },

    #[error("Upstream returned HTTP {status} for '{url}'")]
    Status { url: String, status: u16 },

    #[error("Failed to decode response from '{url}': {message}")]
    Decode { url: String, message: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// A bulk card search that could not be answered.
///
/// Distinct from an empty result: callers render it as an error with a retry
/// affordance, never as "nothing matched".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Search failed: {source}")]
pub struct SearchFailed {
    #[source]
    pub source: FetchError,
}

impl SearchFailed {
    pub fn status(&self) -> Option<u16> {
        self.source.status()
    }
}

impl From<FetchError> for SearchFailed {
    fn from(source: FetchError) -> Self {
        Self { source }
    }
}
