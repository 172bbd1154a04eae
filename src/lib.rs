//! Orrery Sim - Simulation Core
//!
//! A deterministic hierarchical n-body simulation for orrery-style solar
//! system display. Uses `bevy_ecs` for the entity-component-system
//! architecture.
//!
//! Primaries (and the central body) interact under full mutual gravity;
//! secondaries orbit their parent alone. Clients drive the tick loop through
//! [`SimWorld`] and read state back as serializable [`Snapshot`]s.

pub mod api;
pub mod clock;
pub mod components;
pub mod error;
pub mod systems;
pub mod world;

pub use api::SimWorld;
pub use clock::{SimulationClock, TimeBreakdown, DEFAULT_STEP_INDEX, STEP_PRESETS};
pub use components::*;
pub use error::SimError;
pub use systems::*;
pub use world::{BodySnapshot, Snapshot};
