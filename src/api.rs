//! Public API for the simulation core.
//!
//! This module provides the main interface for a render/input loop (or any
//! other client) to drive the simulation.
//!
//! ## Stepping
//!
//! The simulation advances one discrete tick per `step_once()` call. The
//! step size is whatever the clock's preset index selects at the start of
//! the tick; control requests issued between ticks (focus changes, step
//! index moves) take effect on the next tick, never mid-tick.
//!
//! ## Boundary
//!
//! The presentation layer never mutates body state. It reads `Snapshot`s
//! and issues the control operations exposed here.

use crate::clock::{clock_advance_system, SimulationClock, TimeBreakdown};
use crate::components::*;
use crate::error::SimError;
use crate::systems::collision::collision_merge_system;
use crate::systems::gravity::orbital_velocity;
use crate::systems::motion::{
    primary_motion_system, secondary_motion_system, BodyOrder, FocusState, SimConfig, StepSize, AU,
};
use crate::world::Snapshot;
use bevy_ecs::prelude::*;

/// The main simulation world container.
///
/// Holds the ECS world and tick schedule, providing a clean API for:
/// - Building the body system before the first tick
/// - Stepping the simulation forward (or backward)
/// - Extracting state snapshots
/// - Clock and focus control
pub struct SimWorld {
    world: World,
    schedule: Schedule,
    tick: u64,
}

impl SimWorld {
    /// Create a new empty simulation world.
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    /// Create a new simulation world with custom configuration.
    pub fn with_config(config: SimConfig) -> Self {
        let mut world = World::new();

        let clock = SimulationClock::new();
        world.insert_resource(StepSize(clock.step_size()));
        world.insert_resource(clock);
        world.insert_resource(BodyOrder::default());
        world.insert_resource(FocusState::default());
        world.insert_resource(config);

        // One tick, strictly in order: primaries, secondaries, optional
        // merge, clock.
        let mut schedule = Schedule::default();
        schedule.add_systems(
            (
                primary_motion_system,
                secondary_motion_system,
                collision_merge_system,
                clock_advance_system,
            )
                .chain(),
        );

        Self {
            world,
            schedule,
            tick: 0,
        }
    }

    /// Create the stock inner solar system: the sun, mercury through mars,
    /// and the moons luna, phobos and deimos.
    pub fn new_solar_system() -> Result<Self, SimError> {
        let sun_mass = 1.98e30;
        let earth_mass = 5.97e24;
        let mars_mass = 6.39e23;

        let mut sim = Self::new();
        sim.spawn_central("sun", sun_mass, 30.0, [1.0, 1.0, 0.2, 1.0])?;
        sim.spawn_primary(
            "mercury",
            -0.38 * AU,
            0.0,
            0.0,
            -47.36e3,
            3.30e23,
            10.0,
            [0.8, 0.8, 0.8, 1.0],
        )?;
        sim.spawn_primary(
            "venus",
            -0.72 * AU,
            0.0,
            0.0,
            -35.02e3,
            4.86e24,
            14.0,
            [0.9, 0.85, 0.7, 1.0],
        )?;
        sim.spawn_primary(
            "earth",
            -AU,
            0.0,
            0.0,
            -orbital_velocity(AU, sun_mass),
            earth_mass,
            15.0,
            [0.6, 0.8, 1.0, 1.0],
        )?;
        sim.spawn_primary(
            "mars",
            -1.5 * AU,
            0.0,
            0.0,
            -24.07e3,
            mars_mass,
            13.0,
            [0.8, 0.2, 0.2, 1.0],
        )?;

        sim.spawn_secondary(
            "luna",
            "earth",
            -0.0025 * AU,
            0.0,
            0.0,
            -orbital_velocity(0.0025 * AU, earth_mass),
            7.34e22,
            5.0,
            [1.0, 1.0, 1.0, 1.0],
        )?;
        sim.spawn_secondary(
            "phobos",
            "mars",
            -0.001 * AU,
            0.0,
            0.0,
            -orbital_velocity(0.001 * AU, mars_mass),
            1.06e16,
            5.0,
            [0.63, 0.51, 0.43, 1.0],
        )?;
        sim.spawn_secondary(
            "deimos",
            "mars",
            -0.0045 * AU,
            0.0,
            0.0,
            -orbital_velocity(0.0045 * AU, mars_mass),
            1.06e15,
            3.0,
            [0.73, 0.73, 0.67, 1.0],
        )?;

        Ok(sim)
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Spawn the central body at the origin. Must be the first body; the
    /// focus defaults to it.
    pub fn spawn_central(
        &mut self,
        name: &str,
        mass: f64,
        radius: f64,
        color: [f32; 4],
    ) -> Result<(), SimError> {
        if self.find_body(name).is_some() {
            return Err(SimError::DuplicateName(name.to_string()));
        }
        if !self.order().primaries.is_empty() || !self.order().secondaries.is_empty() {
            return Err(SimError::InvalidParameter(
                "the central body must be spawned first".to_string(),
            ));
        }
        self.validate_physical(mass, radius)?;

        let entity = self.spawn_body(
            name,
            Role::Central,
            Position::default(),
            Velocity::default(),
            mass,
            radius,
            color,
            1.0,
        );
        self.world.resource_mut::<BodyOrder>().primaries.push(entity);
        self.world.resource_mut::<FocusState>().focused = Some(entity);
        Ok(())
    }

    /// Spawn a primary body in full mutual gravity with all other
    /// primaries. Position and velocity are absolute.
    #[allow(clippy::too_many_arguments)]
    pub fn spawn_primary(
        &mut self,
        name: &str,
        x: f64,
        y: f64,
        vx: f64,
        vy: f64,
        mass: f64,
        radius: f64,
        color: [f32; 4],
    ) -> Result<(), SimError> {
        self.validate_new_body(name, mass, radius, x, y)?;
        if self.central_entity().is_none() {
            return Err(SimError::NoCentralBody);
        }

        let entity = self.spawn_body(
            name,
            Role::Primary,
            Position::new(x, y),
            Velocity::new(vx, vy),
            mass,
            radius,
            color,
            1.0,
        );
        self.world.resource_mut::<BodyOrder>().primaries.push(entity);
        Ok(())
    }

    /// Spawn a secondary body coupled only to `parent` (a primary or the
    /// central body). Position and velocity are given relative to the
    /// parent; the secondary starts at `parent + offset` moving at
    /// `parent_velocity + (vx, vy)`.
    #[allow(clippy::too_many_arguments)]
    pub fn spawn_secondary(
        &mut self,
        name: &str,
        parent: &str,
        offset_x: f64,
        offset_y: f64,
        vx: f64,
        vy: f64,
        mass: f64,
        radius: f64,
        color: [f32; 4],
    ) -> Result<(), SimError> {
        let parent_entity = self
            .order()
            .primaries
            .iter()
            .copied()
            .find(|&e| {
                self.world
                    .get::<BodyName>(e)
                    .is_some_and(|n| n.0 == parent)
            })
            .ok_or_else(|| SimError::UnknownBody(parent.to_string()))?;

        let parent_pos = *self
            .world
            .get::<Position>(parent_entity)
            .unwrap_or(&Position { x: 0.0, y: 0.0 });
        let parent_vel = *self
            .world
            .get::<Velocity>(parent_entity)
            .unwrap_or(&Velocity { vx: 0.0, vy: 0.0 });

        let x = parent_pos.x + offset_x;
        let y = parent_pos.y + offset_y;
        self.validate_new_body(name, mass, radius, x, y)?;

        let boost = self.config().secondary_view_boost;
        let entity = self.spawn_body(
            name,
            Role::Secondary,
            Position::new(x, y),
            Velocity::new(parent_vel.vx + vx, parent_vel.vy + vy),
            mass,
            radius,
            color,
            boost,
        );
        self.world.entity_mut(entity).insert(ParentBody(parent_entity));
        self.world
            .resource_mut::<BodyOrder>()
            .secondaries
            .push(entity);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Stepping
    // ------------------------------------------------------------------

    /// Run one full physics tick: all primaries, then all secondaries,
    /// then the optional merge pass, then the clock.
    pub fn step_once(&mut self) {
        let step = self
            .world
            .get_resource::<SimulationClock>()
            .map(|c| c.step_size())
            .unwrap_or(1.0);
        if let Some(mut tick_step) = self.world.get_resource_mut::<StepSize>() {
            tick_step.0 = step;
        }

        self.schedule.run(&mut self.world);
        self.tick += 1;
    }

    /// Run `n` ticks back to back.
    pub fn step_n(&mut self, n: usize) {
        for _ in 0..n {
            self.step_once();
        }
    }

    // ------------------------------------------------------------------
    // Snapshots
    // ------------------------------------------------------------------

    /// Get a snapshot of the current simulation state.
    pub fn snapshot(&mut self) -> Snapshot {
        Snapshot::from_world(&mut self.world, self.tick)
    }

    /// Get the snapshot as a JSON string.
    pub fn snapshot_json(&mut self) -> String {
        self.snapshot().to_json().unwrap_or_else(|_| "{}".to_string())
    }

    /// Get the number of ticks executed so far.
    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Total number of live bodies.
    pub fn body_count(&self) -> usize {
        let order = self.order();
        order.primaries.len() + order.secondaries.len()
    }

    /// Names of the secondaries currently parented to `primary`, in
    /// collection order; `["none"]` if it has none.
    pub fn children_of(&self, primary: &str) -> Result<Vec<String>, SimError> {
        let parent = self
            .find_body(primary)
            .ok_or_else(|| SimError::UnknownBody(primary.to_string()))?;

        let mut names = Vec::new();
        for &moon in &self.order().secondaries {
            let Some(key) = self.world.get::<ParentBody>(moon) else {
                continue;
            };
            if key.0 == parent {
                if let Some(name) = self.world.get::<BodyName>(moon) {
                    names.push(name.0.clone());
                }
            }
        }
        if names.is_empty() {
            names.push("none".to_string());
        }
        Ok(names)
    }

    // ------------------------------------------------------------------
    // Clock control
    // ------------------------------------------------------------------

    /// Select a step-size preset by index. Out-of-range requests are
    /// silently ignored.
    pub fn set_step_index(&mut self, index: usize) {
        self.world
            .resource_mut::<SimulationClock>()
            .set_index(index);
    }

    /// Move the step-size preset index by a signed delta; moves past
    /// either end of the preset list are ignored.
    pub fn shift_step_index(&mut self, delta: i32) {
        self.world
            .resource_mut::<SimulationClock>()
            .shift_index(delta);
    }

    /// Step size that will apply to the next tick, in simulated seconds.
    pub fn current_step(&self) -> f64 {
        self.world.resource::<SimulationClock>().step_size()
    }

    /// Current index into the step preset list.
    pub fn step_index(&self) -> usize {
        self.world.resource::<SimulationClock>().step_index()
    }

    /// Elapsed simulated seconds since the start of the run (signed).
    pub fn elapsed_seconds(&self) -> f64 {
        self.world.resource::<SimulationClock>().elapsed()
    }

    /// Elapsed time decomposed for display (360-day-year convention).
    pub fn elapsed_breakdown(&self) -> TimeBreakdown {
        self.world.resource::<SimulationClock>().breakdown()
    }

    // ------------------------------------------------------------------
    // Focus control
    // ------------------------------------------------------------------

    /// Focus a body by name. Only the central body and primaries can hold
    /// focus.
    pub fn request_focus(&mut self, name: &str) -> Result<(), SimError> {
        let entity = self
            .find_body(name)
            .ok_or_else(|| SimError::UnknownBody(name.to_string()))?;
        if !self.order().primaries.contains(&entity) {
            return Err(SimError::InvalidParameter(format!(
                "`{name}` is a secondary and cannot hold focus"
            )));
        }
        self.world.resource_mut::<FocusState>().focused = Some(entity);
        log::debug!("focus moved to `{name}`");
        Ok(())
    }

    /// Translate a pointer position in view units into a focus request via
    /// a hit test over the primaries' bounds, first hit in collection
    /// order wins. Honored only while the central body is focused; the
    /// detail view is not click-navigable. Returns the name of the newly
    /// focused body, if any.
    pub fn request_focus_at(&mut self, x: f64, y: f64) -> Option<String> {
        let focused = self.world.get_resource::<FocusState>()?.focused?;
        if self.world.get::<Role>(focused) != Some(&Role::Central) {
            return None;
        }

        let hit = self.hit_test(x, y)?;
        let name = self.world.get::<BodyName>(hit)?.0.clone();
        self.world.resource_mut::<FocusState>().focused = Some(hit);
        log::debug!("focus moved to `{name}` by pointer");
        Some(name)
    }

    /// Return focus to the central body.
    pub fn reset_focus(&mut self) {
        if let Some(central) = self.central_entity() {
            self.world.resource_mut::<FocusState>().focused = Some(central);
        }
    }

    /// Name of the currently focused body.
    pub fn focused_name(&self) -> Option<String> {
        let focused = self.world.get_resource::<FocusState>()?.focused?;
        self.world.get::<BodyName>(focused).map(|n| n.0.clone())
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// First primary (in collection order) whose bounds contain the point.
    fn hit_test(&self, x: f64, y: f64) -> Option<Entity> {
        self.order()
            .primaries
            .iter()
            .copied()
            .find(|&e| self.world.get::<Bounds>(e).is_some_and(|b| b.contains(x, y)))
    }

    fn order(&self) -> &BodyOrder {
        self.world.resource::<BodyOrder>()
    }

    fn config(&self) -> &SimConfig {
        self.world.resource::<SimConfig>()
    }

    fn central_entity(&self) -> Option<Entity> {
        self.order()
            .primaries
            .iter()
            .copied()
            .find(|&e| self.world.get::<Role>(e) == Some(&Role::Central))
    }

    fn find_body(&self, name: &str) -> Option<Entity> {
        let order = self.order();
        order
            .primaries
            .iter()
            .chain(order.secondaries.iter())
            .copied()
            .find(|&e| self.world.get::<BodyName>(e).is_some_and(|n| n.0 == name))
    }

    fn validate_physical(&self, mass: f64, radius: f64) -> Result<(), SimError> {
        if mass <= 0.0 {
            return Err(SimError::InvalidParameter(format!(
                "mass must be positive, got {mass}"
            )));
        }
        if radius <= 0.0 {
            return Err(SimError::InvalidParameter(format!(
                "radius must be positive, got {radius}"
            )));
        }
        Ok(())
    }

    fn validate_new_body(
        &mut self,
        name: &str,
        mass: f64,
        radius: f64,
        x: f64,
        y: f64,
    ) -> Result<(), SimError> {
        if self.find_body(name).is_some() {
            return Err(SimError::DuplicateName(name.to_string()));
        }
        self.validate_physical(mass, radius)?;

        // Coincident bodies make the pair force undefined; reject up front
        // rather than guard the hot path.
        let mut query = self.world.query::<&Position>();
        if query.iter(&self.world).any(|p| p.x == x && p.y == y) {
            return Err(SimError::DegenerateDistance { x, y });
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn spawn_body(
        &mut self,
        name: &str,
        role: Role,
        position: Position,
        velocity: Velocity,
        mass: f64,
        radius: f64,
        color: [f32; 4],
        scale_boost: f64,
    ) -> Entity {
        let config = self.config();
        let view_scale = config.base_view_scale * scale_boost;
        let view_size = config.view_size;

        // Bounds are recomputed from scratch every tick; this seed value
        // only matters for hit tests issued before the first tick.
        let projected = position.projected(view_scale, view_size);

        self.world
            .spawn(BodyBundle {
                name: BodyName::new(name),
                role,
                position,
                velocity,
                mass: Mass(mass),
                radius: Radius(radius),
                color: BodyColor(color),
                view_scale: ViewScale(view_scale),
                trajectory: Trajectory::default(),
                bounds: Bounds::centered(projected, radius),
                distance: DistanceFromCentral::default(),
            })
            .id()
    }

    /// Get direct access to the ECS world (for advanced usage).
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Get mutable access to the ECS world (for advanced usage).
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }
}

impl Default for SimWorld {
    fn default() -> Self {
        Self::new()
    }
}
