//! Reducer trait for MVI architecture.

use super::action::Action;
use super::state::FormState;

/// Reducer transforms state based on actions.
///
/// The reducer is the only place where state transitions happen.
/// It must be a pure function: (&State, Action) -> Result<State, Error>.
/// A rejected action leaves the input state untouched.
pub trait Reducer {
    /// The state type this reducer operates on.
    type State: FormState;

    /// The action type this reducer handles.
    type Action: Action;

    /// Error returned when an action is rejected.
    type Error: std::error::Error;

    /// Validate an action and return the new state.
    ///
    /// This should be a pure function with no side effects.
    fn reduce(state: &Self::State, action: Self::Action) -> Result<Self::State, Self::Error>;
}
