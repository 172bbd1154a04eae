//! Motion systems - force accumulation and per-tick integration.
//!
//! Two systems drive the hierarchy, chained in this order every tick:
//!
//! - `primary_motion_system` - full mutual gravity among the primaries
//!   (the central body included as an ordinary member).
//! - `secondary_motion_system` - each secondary against its parent only.
//!
//! Primaries are advanced in collection order, one at a time: each body's
//! force sum sees earlier primaries at their already-advanced positions for
//! this tick. This sequential formulation is the pinned semantics; it is not
//! numerically equivalent to a compute-all-then-apply-all pass.

use crate::components::*;
use crate::systems::gravity::pairwise_force;
use bevy_ecs::prelude::*;

/// One astronomical unit in meters.
pub const AU: f64 = 1.496e11;

/// Resource containing the step size for the current tick, in simulated
/// seconds. Copied from the clock at the start of each tick so that step
/// changes requested mid-tick only apply from the next tick on.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct StepSize(pub f64);

/// Static configuration for the simulation core.
#[derive(Resource, Debug, Clone)]
pub struct SimConfig {
    /// Side length of the square view in view units.
    pub view_size: f64,
    /// Meters-to-view-units factor for the central body and primaries.
    pub base_view_scale: f64,
    /// Extra zoom applied to secondaries (they render in their parent's
    /// close-up frame).
    pub secondary_view_boost: f64,
    /// Whether the collision-merge pass runs each tick.
    pub merge_enabled: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            view_size: 800.0,
            base_view_scale: 250.0 / AU, // 1 AU = 250 view units
            secondary_view_boost: 100.0,
            merge_enabled: false,
        }
    }
}

/// Ordered body collections, the authoritative iteration order for every
/// per-tick pass, hit test and snapshot.
///
/// `primaries` always contains the central body and may shrink through
/// merging; `secondaries` has fixed membership for the run.
#[derive(Resource, Debug, Default, Clone)]
pub struct BodyOrder {
    pub primaries: Vec<Entity>,
    pub secondaries: Vec<Entity>,
}

/// The single body currently selected for detail display.
///
/// Defaults to the central body once one is spawned. Exactly one body is
/// focused at a time; secondaries are only shown in detail while their
/// parent is focused, which the presentation layer derives from this.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct FocusState {
    pub focused: Option<Entity>,
}

/// Advance one body by one step of semi-implicit Euler:
/// velocity from the accumulated force first, then position from the new
/// velocity. A step of exactly zero leaves both untouched.
///
/// Stability under large or sign-flipped steps is the caller's concern; no
/// guarding happens here.
pub fn advance_body(dt: f64, fx: f64, fy: f64, mass: f64, pos: &mut Position, vel: &mut Velocity) {
    vel.vx += fx / mass * dt;
    vel.vy += fy / mass * dt;
    pos.x += vel.vx * dt;
    pos.y += vel.vy * dt;
}

/// System that advances all primaries by one tick.
///
/// For each primary in collection order: sum pairwise gravity against every
/// other current primary, integrate, then refresh the projected trajectory
/// point and bounds. The cached distance-to-central is updated whenever the
/// central body shows up in the pair sum.
pub fn primary_motion_system(
    step: Res<StepSize>,
    config: Res<SimConfig>,
    order: Res<BodyOrder>,
    mut bodies: Query<
        (
            &Mass,
            &Role,
            &ViewScale,
            &Radius,
            &mut Position,
            &mut Velocity,
            &mut Trajectory,
            &mut Bounds,
            &mut DistanceFromCentral,
        ),
        Without<ParentBody>,
    >,
) {
    let dt = step.0;

    for index in 0..order.primaries.len() {
        let entity = order.primaries[index];
        let (self_mass, self_pos) = match bodies.get(entity) {
            Ok((mass, _, _, _, pos, ..)) => (mass.0, *pos),
            Err(_) => continue,
        };

        let mut fx = 0.0;
        let mut fy = 0.0;
        let mut central_distance = None;

        for &other in &order.primaries {
            if other == entity {
                continue;
            }
            let Ok((other_mass, other_role, _, _, other_pos, ..)) = bodies.get(other) else {
                continue;
            };
            match pairwise_force(&self_pos, self_mass, other_pos, other_mass.0) {
                Ok(pair) => {
                    fx += pair.fx;
                    fy += pair.fy;
                    if *other_role == Role::Central {
                        central_distance = Some(pair.distance);
                    }
                }
                Err(err) => {
                    // Undefined pair force; it contributes nothing this tick.
                    log::warn!("skipping force between coincident primaries: {err}");
                }
            }
        }

        let Ok((mass, _, view_scale, radius, mut pos, mut vel, mut trajectory, mut bounds, mut central)) =
            bodies.get_mut(entity)
        else {
            continue;
        };
        if let Some(distance) = central_distance {
            central.0 = distance;
        }
        advance_body(dt, fx, fy, mass.0, &mut pos, &mut vel);
        let projected = pos.projected(view_scale.0, config.view_size);
        trajectory.0.push(projected);
        *bounds = Bounds::centered(projected, radius.0);
    }
}

/// System that advances all secondaries by one tick.
///
/// Runs after the primaries, so each secondary feels its parent's pull at
/// the parent's already-advanced position. Other secondaries never
/// contribute; this is the hierarchical two-body restriction.
pub fn secondary_motion_system(
    step: Res<StepSize>,
    config: Res<SimConfig>,
    order: Res<BodyOrder>,
    parents: Query<(&Mass, &Position), Without<ParentBody>>,
    mut moons: Query<(
        &Mass,
        &ParentBody,
        &ViewScale,
        &Radius,
        &mut Position,
        &mut Velocity,
        &mut Trajectory,
        &mut Bounds,
    )>,
) {
    let dt = step.0;

    for &entity in &order.secondaries {
        let (self_mass, self_pos, parent_entity) = match moons.get(entity) {
            Ok((mass, parent, _, _, pos, ..)) => (mass.0, *pos, parent.0),
            Err(_) => continue,
        };

        // Physics is absolute; the view frame is parent-centric, so trails
        // and bounds are projected from the offset to the parent.
        let (fx, fy, frame_origin) = match parents.get(parent_entity) {
            Ok((parent_mass, parent_pos)) => {
                match pairwise_force(&self_pos, self_mass, parent_pos, parent_mass.0) {
                    Ok(pair) => (pair.fx, pair.fy, *parent_pos),
                    Err(err) => {
                        log::warn!("skipping force on secondary over its parent: {err}");
                        (0.0, 0.0, *parent_pos)
                    }
                }
            }
            Err(_) => {
                // Merge re-parenting keeps this unreachable; coast if it
                // ever happens rather than freezing the body.
                log::warn!("secondary {entity:?} has no live parent; coasting");
                (0.0, 0.0, Position::default())
            }
        };

        let Ok((mass, _, view_scale, radius, mut pos, mut vel, mut trajectory, mut bounds)) =
            moons.get_mut(entity)
        else {
            continue;
        };
        advance_body(dt, fx, fy, mass.0, &mut pos, &mut vel);
        let offset = Position::new(pos.x - frame_origin.x, pos.y - frame_origin.y);
        let projected = offset.projected(view_scale.0, config.view_size);
        trajectory.0.push(projected);
        *bounds = Bounds::centered(projected, radius.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::systems::gravity::G;

    fn spawn_body(
        world: &mut World,
        name: &str,
        role: Role,
        pos: Position,
        vel: Velocity,
        mass: f64,
    ) -> Entity {
        world
            .spawn(BodyBundle {
                name: BodyName::new(name),
                role,
                position: pos,
                velocity: vel,
                mass: Mass(mass),
                radius: Radius(10.0),
                color: BodyColor::default(),
                view_scale: ViewScale(1.0),
                trajectory: Trajectory::default(),
                bounds: Bounds::default(),
                distance: DistanceFromCentral::default(),
            })
            .id()
    }

    fn test_world(step: f64) -> World {
        let mut world = World::new();
        world.insert_resource(StepSize(step));
        world.insert_resource(SimConfig::default());
        world.insert_resource(BodyOrder::default());
        world
    }

    fn run_motion(world: &mut World) {
        let mut schedule = Schedule::default();
        schedule.add_systems((primary_motion_system, secondary_motion_system).chain());
        schedule.run(world);
    }

    #[test]
    fn test_lone_primary_coasts_linearly() {
        let mut world = test_world(10.0);
        let e = spawn_body(
            &mut world,
            "probe",
            Role::Primary,
            Position::new(0.0, 0.0),
            Velocity::new(3.0, -2.0),
            1.0e20,
        );
        world.resource_mut::<BodyOrder>().primaries.push(e);

        run_motion(&mut world);

        let pos = world.get::<Position>(e).unwrap();
        assert_eq!((pos.x, pos.y), (30.0, -20.0));
        assert_eq!(world.get::<Trajectory>(e).unwrap().0.len(), 1);
    }

    #[test]
    fn test_zero_step_freezes_state_but_appends_trajectory() {
        let mut world = test_world(0.0);
        let e = spawn_body(
            &mut world,
            "probe",
            Role::Primary,
            Position::new(5.0, 5.0),
            Velocity::new(100.0, 100.0),
            1.0e20,
        );
        world.resource_mut::<BodyOrder>().primaries.push(e);

        run_motion(&mut world);
        run_motion(&mut world);

        let pos = world.get::<Position>(e).unwrap();
        let vel = world.get::<Velocity>(e).unwrap();
        assert_eq!((pos.x, pos.y), (5.0, 5.0));
        assert_eq!((vel.vx, vel.vy), (100.0, 100.0));
        assert_eq!(world.get::<Trajectory>(e).unwrap().0.len(), 2);

        let bounds = world.get::<Bounds>(e).unwrap();
        let expected = Bounds::centered(pos.projected(1.0, 800.0), 10.0);
        assert_eq!(*bounds, expected);
    }

    #[test]
    fn test_negative_step_reverses_a_coasting_body() {
        let mut world = test_world(25.0);
        let e = spawn_body(
            &mut world,
            "probe",
            Role::Primary,
            Position::new(1.0, 2.0),
            Velocity::new(-4.0, 8.0),
            1.0e20,
        );
        world.resource_mut::<BodyOrder>().primaries.push(e);

        run_motion(&mut world);
        world.resource_mut::<StepSize>().0 = -25.0;
        run_motion(&mut world);

        let pos = world.get::<Position>(e).unwrap();
        assert_eq!((pos.x, pos.y), (1.0, 2.0));
    }

    #[test]
    fn test_two_primaries_attract_each_other() {
        let mut world = test_world(1.0);
        let a = spawn_body(
            &mut world,
            "a",
            Role::Central,
            Position::new(0.0, 0.0),
            Velocity::default(),
            1.0e30,
        );
        let b = spawn_body(
            &mut world,
            "b",
            Role::Primary,
            Position::new(1.0e9, 0.0),
            Velocity::default(),
            1.0e24,
        );
        {
            let mut order = world.resource_mut::<BodyOrder>();
            order.primaries.push(a);
            order.primaries.push(b);
        }

        run_motion(&mut world);

        let pa = world.get::<Position>(a).unwrap();
        let pb = world.get::<Position>(b).unwrap();
        assert!(pa.x > 0.0, "a pulled toward b");
        assert!(pb.x < 1.0e9, "b pulled toward a");
        assert_eq!(pa.y, 0.0);
        assert_eq!(pb.y, 0.0);
    }

    #[test]
    fn test_sequential_update_semantics_pinned() {
        // Replicate the per-body pass by hand: b's force must be computed
        // from a's already-advanced position, not a's start-of-tick one.
        let dt = 100.0;
        let (ma, mb) = (1.0e30, 1.0e24);
        let mut pa = Position::new(0.0, 0.0);
        let mut va = Velocity::default();
        let mut pb = Position::new(1.0e9, 0.0);
        let mut vb = Velocity::default();

        let fa = pairwise_force(&pa, ma, &pb, mb).unwrap();
        advance_body(dt, fa.fx, fa.fy, ma, &mut pa, &mut va);
        let fb = pairwise_force(&pb, mb, &pa, ma).unwrap();
        advance_body(dt, fb.fx, fb.fy, mb, &mut pb, &mut vb);

        let mut world = test_world(dt);
        let a = spawn_body(
            &mut world,
            "a",
            Role::Central,
            Position::new(0.0, 0.0),
            Velocity::default(),
            ma,
        );
        let b = spawn_body(
            &mut world,
            "b",
            Role::Primary,
            Position::new(1.0e9, 0.0),
            Velocity::default(),
            mb,
        );
        {
            let mut order = world.resource_mut::<BodyOrder>();
            order.primaries.push(a);
            order.primaries.push(b);
        }
        run_motion(&mut world);

        assert_eq!(*world.get::<Position>(a).unwrap(), pa);
        assert_eq!(*world.get::<Position>(b).unwrap(), pb);
    }

    #[test]
    fn test_distance_from_central_is_cached_for_primaries() {
        let mut world = test_world(0.0);
        let sun = spawn_body(
            &mut world,
            "sun",
            Role::Central,
            Position::new(0.0, 0.0),
            Velocity::default(),
            1.98e30,
        );
        let planet = spawn_body(
            &mut world,
            "planet",
            Role::Primary,
            Position::new(-AU, 0.0),
            Velocity::default(),
            5.97e24,
        );
        {
            let mut order = world.resource_mut::<BodyOrder>();
            order.primaries.push(sun);
            order.primaries.push(planet);
        }

        run_motion(&mut world);

        let d = world.get::<DistanceFromCentral>(planet).unwrap();
        assert!((d.0 - AU).abs() < 1.0);
    }

    #[test]
    fn test_secondary_feels_only_its_parent() {
        // Identical moon around identical parent, with and without an extra
        // sibling moon: the first moon's state must match bit for bit.
        let build = |with_sibling: bool| -> (World, Entity) {
            let mut world = test_world(50.0);
            let planet = spawn_body(
                &mut world,
                "planet",
                Role::Central,
                Position::new(0.0, 0.0),
                Velocity::default(),
                5.97e24,
            );
            let moon = spawn_body(
                &mut world,
                "moon",
                Role::Secondary,
                Position::new(-3.84e8, 0.0),
                Velocity::new(0.0, -orbital_speed(3.84e8, 5.97e24)),
                7.34e22,
            );
            world.entity_mut(moon).insert(ParentBody(planet));
            {
                let mut order = world.resource_mut::<BodyOrder>();
                order.primaries.push(planet);
                order.secondaries.push(moon);
            }
            if with_sibling {
                let sibling = spawn_body(
                    &mut world,
                    "sibling",
                    Role::Secondary,
                    Position::new(2.0e8, 1.0e8),
                    Velocity::default(),
                    9.0e22,
                );
                world.entity_mut(sibling).insert(ParentBody(planet));
                world.resource_mut::<BodyOrder>().secondaries.push(sibling);
            }
            (world, moon)
        };

        let (mut isolated, moon_a) = build(false);
        let (mut crowded, moon_b) = build(true);
        for _ in 0..50 {
            run_motion(&mut isolated);
            run_motion(&mut crowded);
        }

        assert_eq!(
            *isolated.get::<Position>(moon_a).unwrap(),
            *crowded.get::<Position>(moon_b).unwrap()
        );
        assert_eq!(
            *isolated.get::<Velocity>(moon_a).unwrap(),
            *crowded.get::<Velocity>(moon_b).unwrap()
        );
    }

    fn orbital_speed(dist: f64, mass: f64) -> f64 {
        (G * mass / dist).sqrt()
    }
}
