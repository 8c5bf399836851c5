use thiserror::Error;

/// Errors raised while validating a filter action.
///
/// The reducer returns these before touching the state, so a rejected action
/// never leaves a half-applied form behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The action names a facet that is not part of the form.
    #[error("Invalid key: {key}")]
    InvalidKey { key: String },

    /// The wire action tag is not one of `set`, `delete` or `reset`.
    #[error("Unknown action: {action}")]
    UnknownAction { action: String },

    /// The value does not fit the facet it targets.
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

impl FilterError {
    pub(crate) fn invalid_value(key: impl ToString, reason: impl Into<String>) -> Self {
        FilterError::InvalidValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
