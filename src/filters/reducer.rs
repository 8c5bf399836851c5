//! Reducer for the search form.

use crate::mvi::Reducer;

use super::action::FilterAction;
use super::error::FilterError;
use super::state::FilterState;

/// Reducer for search form state transitions.
///
/// Pure function: validation happens before the new state is built, and the
/// input state is only ever read. Network calls and URL updates are the
/// caller's business.
pub struct FilterReducer;

impl Reducer for FilterReducer {
    type State = FilterState;
    type Action = FilterAction;
    type Error = FilterError;

    fn reduce(state: &Self::State, action: Self::Action) -> Result<Self::State, Self::Error> {
        match action {
            FilterAction::Set { key, value } => {
                let mut next = state.clone();
                next.replace(key, value)?;
                Ok(next)
            }
            FilterAction::Delete { key, id } => {
                let mut next = state.clone();
                next.remove(key, &id);
                Ok(next)
            }
            FilterAction::Reset { key: None } => Ok(FilterState::default()),
            FilterAction::Reset { key: Some(key) } => {
                let mut next = state.clone();
                next.replace(key, FilterState::default().get(key))?;
                Ok(next)
            }
        }
    }
}
