//! Base trait for actions dispatched to a reducer.

/// Marker trait for action objects.
///
/// Actions represent:
/// - User edits of the search form (adding a facet value, moving a slider)
/// - Restoring a form from a shared URL
/// - Resets
///
/// Actions are processed by reducers to produce new states.
pub trait Action: Send + 'static {}
