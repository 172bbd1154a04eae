//! ECS systems for the orrery simulation.
//!
//! One tick runs the following chain to completion, strictly in order:
//!
//! 1. `primary_motion_system` - full mutual gravity among primaries,
//!    advanced sequentially in collection order.
//! 2. `secondary_motion_system` - each secondary against its (already
//!    advanced) parent only.
//! 3. `collision_merge_system` - optional merge pass over overlapping
//!    primaries.
//! 4. `clock_advance_system` - accumulates elapsed simulated time.
//!
//! Everything is single-threaded and synchronous; no system suspends
//! mid-tick, and control requests from the presentation layer only land
//! between ticks.

pub mod collision;
pub mod gravity;
pub mod motion;

pub use collision::collision_merge_system;
pub use gravity::{orbital_velocity, pairwise_force, PairForce, G};
pub use motion::{
    advance_body, primary_motion_system, secondary_motion_system, BodyOrder, FocusState,
    SimConfig, StepSize, AU,
};
