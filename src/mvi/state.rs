//! Base trait for form state in MVI architecture.

/// Marker trait for form state objects.
///
/// States should be:
/// - Immutable (Clone to create new states)
/// - Self-contained (everything needed to build a query)
/// - Comparable (PartialEq for detecting changes)
/// - Defaultable (the state a fresh browsing session starts from)
pub trait FormState: Clone + PartialEq + Default + Send + 'static {}
