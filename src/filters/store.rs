//! Owner of the live search form.

use crate::mvi::Reducer;

use super::action::{FilterAction, RawAction};
use super::error::FilterError;
use super::reducer::FilterReducer;
use super::state::FilterState;

/// Holds the current [`FilterState`] for one browsing session.
///
/// Passed explicitly to whoever needs it; there is no global instance.
/// `generation` increases on every accepted action, so a search started for
/// generation `n` can be discarded when it resolves after the form moved on.
#[derive(Debug, Clone, Default)]
pub struct FilterStore {
    state: FilterState,
    generation: u64,
}

impl FilterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a state restored elsewhere, e.g. decoded from a shared URL.
    pub fn with_state(state: FilterState) -> Self {
        Self {
            state,
            generation: 0,
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether a result computed for `generation` still matches the form.
    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Apply an action. On error the current state is kept as is.
    pub fn dispatch(&mut self, action: FilterAction) -> Result<&FilterState, FilterError> {
        match FilterReducer::reduce(&self.state, action) {
            Ok(next) => {
                self.state = next;
                self.generation += 1;
                Ok(&self.state)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Rejected filter action");
                Err(err)
            }
        }
    }

    /// Parse and apply a wire action.
    pub fn dispatch_raw(&mut self, raw: RawAction) -> Result<&FilterState, FilterError> {
        let action = FilterAction::try_from(raw).inspect_err(|err| {
            tracing::warn!(error = %err, "Rejected filter action");
        })?;
        self.dispatch(action)
    }

    pub fn into_state(self) -> FilterState {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{FacetKey, FieldKey};

    #[test]
    fn accepted_action_bumps_generation() {
        let mut store = FilterStore::new();
        let before = store.generation();
        store.dispatch(FilterAction::set(FieldKey::Exclude, true)).unwrap();
        assert!(!store.is_current(before));
        assert!(store.is_current(before + 1));
    }

    #[test]
    fn rejected_action_keeps_state_and_generation() {
        let mut store = FilterStore::new();
        store
            .dispatch(store.state().select(FacetKey::Types, "fire", "Fire"))
            .unwrap();
        let snapshot = store.state().clone();
        let generation = store.generation();

        let err = store
            .dispatch(FilterAction::set(FieldKey::Hp, false))
            .unwrap_err();

        assert!(matches!(err, FilterError::InvalidValue { .. }));
        assert_eq!(store.state(), &snapshot);
        assert_eq!(store.generation(), generation);
    }
}
