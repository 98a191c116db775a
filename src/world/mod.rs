//! Client-side world state: who is on the map, where, and which map it is.

pub mod client;
pub mod components;
pub mod event_queue;
pub mod interaction;
pub mod portal;
pub mod registry;
pub mod throttle;
pub mod transition;

pub use client::{Identity, Ports, WorldClient};
pub use interaction::InteractionState;
pub use transition::{SpawnPoint, TransitionError, TransitionPhase, TransitionTarget};
