//! Snapshot types - the read-only view handed to the presentation layer.
//!
//! A `Snapshot` is extracted between ticks and is fully serializable, so a
//! non-Rust client (or a render loop in another thread) can consume the
//! simulation without ever touching the ECS world. Snapshots never alias
//! live state; trajectories are copied out.

use crate::clock::{SimulationClock, TimeBreakdown};
use crate::components::*;
use crate::systems::motion::{BodyOrder, FocusState, SimConfig};
use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Snapshot of a single body's state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodySnapshot {
    pub name: String,
    pub role: String,
    /// Position in meters.
    pub x: f64,
    pub y: f64,
    /// Projected position in view units.
    pub px: f64,
    pub py: f64,
    pub vx: f64,
    pub vy: f64,
    /// Orbital speed, `|v|` in m/s.
    pub speed: f64,
    pub mass: f64,
    pub radius: f64,
    pub color: [f32; 4],
    /// Cached distance to the central body in meters (primaries only).
    pub distance_from_central: f64,
    pub focused: bool,
    /// Name of the parent body, secondaries only.
    pub parent: Option<String>,
    /// Names of this body's secondaries; `["none"]` when a primary has
    /// none, empty for secondaries themselves.
    pub moons: Vec<String>,
    /// Orbit trail: projected positions, one per tick since start.
    pub trail: Vec<[f64; 2]>,
}

/// Complete simulation state snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Ticks executed since construction.
    pub tick: u64,
    /// Elapsed simulated seconds (signed).
    pub elapsed: f64,
    /// Step size that will apply to the next tick.
    pub step_size: f64,
    pub step_index: usize,
    /// Name of the focused body, empty if none is set yet.
    pub focused: String,
    pub time: TimeBreakdown,
    /// All bodies: primaries in collection order, then secondaries.
    pub bodies: Vec<BodySnapshot>,
}

impl Snapshot {
    /// Extract a snapshot from the ECS world. Must only be called between
    /// ticks.
    pub fn from_world(world: &mut World, tick: u64) -> Self {
        let order = world
            .get_resource::<BodyOrder>()
            .cloned()
            .unwrap_or_default();
        let focused_entity = world
            .get_resource::<FocusState>()
            .and_then(|f| f.focused);
        let view_size = world
            .get_resource::<SimConfig>()
            .map(|c| c.view_size)
            .unwrap_or(800.0);
        let (elapsed, step_size, step_index, time) = world
            .get_resource::<SimulationClock>()
            .map(|c| (c.elapsed(), c.step_size(), c.step_index(), c.breakdown()))
            .unwrap_or((0.0, 1.0, 0, TimeBreakdown::default()));

        let mut query = world.query::<(
            &BodyName,
            &Role,
            &Position,
            &Velocity,
            &Mass,
            &Radius,
            &BodyColor,
            &ViewScale,
            &Trajectory,
            &DistanceFromCentral,
            Option<&ParentBody>,
        )>();

        // Children are reconstructed by scanning the secondaries, never
        // cached on the parent.
        let mut children: HashMap<Entity, Vec<String>> = HashMap::new();
        for &moon in &order.secondaries {
            if let Ok((name, .., parent)) = query.get(world, moon) {
                if let Some(parent) = parent {
                    children.entry(parent.0).or_default().push(name.0.clone());
                }
            }
        }

        let mut focused_name = String::new();
        let mut bodies = Vec::with_capacity(order.primaries.len() + order.secondaries.len());

        for &entity in order.primaries.iter().chain(order.secondaries.iter()) {
            let Ok((name, role, pos, vel, mass, radius, color, view_scale, trajectory, central, parent)) =
                query.get(world, entity)
            else {
                continue;
            };

            let focused = Some(entity) == focused_entity;
            if focused {
                focused_name = name.0.clone();
            }

            let moons = match role {
                Role::Secondary => Vec::new(),
                _ => children
                    .get(&entity)
                    .cloned()
                    .unwrap_or_else(|| vec!["none".to_string()]),
            };

            let mut parent_name = None;
            let mut frame_origin = Position::default();
            if let Some(p) = parent {
                if let Some(pname) = world.get::<BodyName>(p.0) {
                    parent_name = Some(pname.0.clone());
                }
                if let Some(ppos) = world.get::<Position>(p.0) {
                    frame_origin = *ppos;
                }
            }

            // Secondaries project in their parent's frame, same as the
            // motion pass.
            let offset = Position::new(pos.x - frame_origin.x, pos.y - frame_origin.y);
            let projected = offset.projected(view_scale.0, view_size);
            bodies.push(BodySnapshot {
                name: name.0.clone(),
                role: role.as_str().to_string(),
                x: pos.x,
                y: pos.y,
                px: projected[0],
                py: projected[1],
                vx: vel.vx,
                vy: vel.vy,
                speed: vel.magnitude(),
                mass: mass.0,
                radius: radius.0,
                color: color.0,
                distance_from_central: central.0,
                focused,
                parent: parent_name,
                moons,
                trail: trajectory.0.clone(),
            });
        }

        Self {
            tick,
            elapsed,
            step_size,
            step_index,
            focused: focused_name,
            time,
            bodies,
        }
    }

    /// Serialize snapshot to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize snapshot to a pretty JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
