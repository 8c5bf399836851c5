use thiserror::Error;

use crate::filters::FilterError;

/// Errors raised while restoring a search from a query string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Invalid value for parameter '{param}': {reason}")]
    InvalidParameter { param: String, reason: String },

    /// The decoded values violate a form invariant.
    #[error(transparent)]
    Filter(#[from] FilterError),
}

impl CodecError {
    pub(crate) fn invalid(param: &str, reason: impl Into<String>) -> Self {
        CodecError::InvalidParameter {
            param: param.to_string(),
            reason: reason.into(),
        }
    }
}
