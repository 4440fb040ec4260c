//! State-machine primitives.
//!
//! Connection lifecycle and render state are both modeled as explicit
//! state machines driven by discrete named events.
//!
//! # Architecture
//!
//! ```text
//! Event ──→ Reducer ──→ State ──→ (side effects applied by the caller)
//! ```
//!
//! - **State**: immutable snapshot of a machine
//! - **Event**: session callbacks, device callbacks, staged results
//! - **Reducer**: pure function that transforms state based on events

mod event;
mod reducer;
mod state;

pub use event::Event;
pub use reducer::Reducer;
pub use state::State;
