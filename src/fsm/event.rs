//! Base trait for events driving a state machine.

/// Marker trait for event objects.
///
/// Events represent:
/// - Session lifecycle callbacks (connected, suspended, failed)
/// - Device callbacks (visibility, display mode, properties)
/// - Completed background operations (staged assets, decoded records)
///
/// Events are processed by reducers to produce new states.
pub trait Event: Send + 'static {}
