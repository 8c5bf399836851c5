use serde::{Deserialize, Serialize};

use crate::mvi::Action;

use super::error::FilterError;
use super::key::{FieldKey, ListKey};
use super::state::FieldValue;

/// Commands accepted by [`FilterReducer`](super::FilterReducer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    /// Replace the value at `key`.
    Set { key: FieldKey, value: FieldValue },
    /// Remove the entry with `id` from a list key.
    Delete { key: ListKey, id: String },
    /// Restore one key, or the whole form when `key` is `None`.
    Reset { key: Option<FieldKey> },
}

impl Action for FilterAction {}

impl FilterAction {
    pub fn set(key: impl Into<FieldKey>, value: impl Into<FieldValue>) -> Self {
        FilterAction::Set {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn delete(key: impl Into<ListKey>, id: impl Into<String>) -> Self {
        FilterAction::Delete {
            key: key.into(),
            id: id.into(),
        }
    }

    pub fn reset(key: impl Into<FieldKey>) -> Self {
        FilterAction::Reset {
            key: Some(key.into()),
        }
    }

    pub fn reset_all() -> Self {
        FilterAction::Reset { key: None }
    }
}

/// Untyped action as it arrives over the wire:
/// `{"type": "set", "key": "types", "value": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAction {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
    #[serde(default)]
    pub id: Option<String>,
}

impl TryFrom<RawAction> for FilterAction {
    type Error = FilterError;

    /// Keys are validated the same way for every variant: an unknown key is
    /// `InvalidKey` whether the action sets, deletes or resets it.
    fn try_from(raw: RawAction) -> Result<Self, Self::Error> {
        match raw.kind.as_str() {
            "set" => {
                let key: FieldKey = required_key(raw.key)?.parse()?;
                let value = raw
                    .value
                    .ok_or_else(|| FilterError::invalid_value(key, "missing value"))?;
                Ok(FilterAction::Set {
                    key,
                    value: FieldValue::from_json(key, value)?,
                })
            }
            "delete" => {
                let key: ListKey = required_key(raw.key)?.parse()?;
                let id = raw
                    .id
                    .ok_or_else(|| FilterError::invalid_value(key, "missing id"))?;
                Ok(FilterAction::Delete { key, id })
            }
            "reset" => {
                let key = raw.key.map(|k| k.parse::<FieldKey>()).transpose()?;
                Ok(FilterAction::Reset { key })
            }
            other => Err(FilterError::UnknownAction {
                action: other.to_string(),
            }),
        }
    }
}

fn required_key(key: Option<String>) -> Result<String, FilterError> {
    key.ok_or_else(|| FilterError::InvalidKey {
        key: "<missing>".to_string(),
    })
}
