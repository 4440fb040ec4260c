//! Base trait for machine state.

/// Marker trait for state objects.
///
/// States should be:
/// - Immutable (Clone to create new states)
/// - Self-contained (all data needed to act on the machine)
/// - Comparable (PartialEq for detecting transitions)
pub trait State: Clone + PartialEq + Default + Send + 'static {}
