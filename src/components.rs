//! ECS components for the orrery simulation.
//!
//! Components are pure data containers attached to body entities.
//! All physics lives in systems that query these components.
//!
//! Every body — central, primary or secondary — is the same archetype plus a
//! [`Role`] tag; secondaries additionally carry a [`ParentBody`] key. The
//! parent is stored as an `Entity` id rather than a reference so that the
//! relation survives arbitrary mutation of the primaries collection.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// SPATIAL COMPONENTS
// ============================================================================

/// 2D position in meters, heliocentric frame.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Project into view units: `pos * scale + view_size / 2`.
    ///
    /// This is the coordinate space in which trajectories, bounds and
    /// pointer hit tests live.
    pub fn projected(&self, scale: f64, view_size: f64) -> [f64; 2] {
        [
            self.x * scale + view_size / 2.0,
            self.y * scale + view_size / 2.0,
        ]
    }
}

/// 2D velocity vector in m/s.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub vx: f64,
    pub vy: f64,
}

impl Velocity {
    pub fn new(vx: f64, vy: f64) -> Self {
        Self { vx, vy }
    }

    pub fn magnitude(&self) -> f64 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }
}

// ============================================================================
// IDENTITY COMPONENTS
// ============================================================================

/// Unique display name of a body.
#[derive(Component, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyName(pub String);

impl BodyName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Gravitational coupling role of a body.
///
/// - `Central`: the anchor mass; participates in the primary sum as an
///   ordinary member.
/// - `Primary`: feels full mutual gravity from all other primaries.
/// - `Secondary`: feels only its parent's pull.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Central,
    Primary,
    Secondary,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Central => "Central",
            Role::Primary => "Primary",
            Role::Secondary => "Secondary",
        }
    }
}

/// Parent key for a secondary body.
///
/// Holds the ECS entity id of the primary (or central) body this secondary
/// orbits. Entity ids are stable for the lifetime of the entity, so the key
/// stays valid as the primaries collection is reordered or shrunk; the merge
/// pass re-points orphaned keys at the survivor.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentBody(pub Entity);

// ============================================================================
// PHYSICAL COMPONENTS
// ============================================================================

/// Mass in kilograms. Invariant: always > 0.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mass(pub f64);

/// Render/collision radius in view units. Invariant: always > 0.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Radius(pub f64);

/// RGBA display color. Opaque to the core; passed through to snapshots.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyColor(pub [f32; 4]);

impl Default for BodyColor {
    fn default() -> Self {
        Self([1.0, 1.0, 1.0, 1.0])
    }
}

// ============================================================================
// DERIVED / VIEW COMPONENTS
// ============================================================================

/// Meters-to-view-units projection factor for this body.
///
/// Secondaries render in a zoomed-in frame, so they carry a boosted scale
/// relative to primaries.
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewScale(pub f64);

/// Append-only history of projected positions, one entry per tick.
///
/// Unbounded by design; used only for drawing orbit trails.
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Trajectory(pub Vec<[f64; 2]>);

/// Axis-aligned bounding box in view units, recomputed every tick.
///
/// Centered on the projected position with half-extent equal to the body
/// radius. Used for pointer hit tests and for collision overlap checks.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    /// Build a box centered on a projected point with the given radius.
    pub fn centered(center: [f64; 2], radius: f64) -> Self {
        Self {
            min_x: center[0] - radius,
            min_y: center[1] - radius,
            max_x: center[0] + radius,
            max_y: center[1] + radius,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    pub fn overlaps(&self, other: &Bounds) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_y <= other.max_y
            && self.max_y >= other.min_y
    }
}

/// Cached distance to the central body in meters.
///
/// Refreshed whenever a pairwise force against the central body is computed.
/// Display-only; meaningful for primaries, stays zero on secondaries.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DistanceFromCentral(pub f64);

// ============================================================================
// BUNDLE HELPERS
// ============================================================================

/// Bundle for spawning a complete body entity.
///
/// Secondaries get a [`ParentBody`] inserted on top of this.
#[derive(Bundle)]
pub struct BodyBundle {
    pub name: BodyName,
    pub role: Role,
    pub position: Position,
    pub velocity: Velocity,
    pub mass: Mass,
    pub radius: Radius,
    pub color: BodyColor,
    pub view_scale: ViewScale,
    pub trajectory: Trajectory,
    pub bounds: Bounds,
    pub distance: DistanceFromCentral,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_centers_origin() {
        let pos = Position::new(0.0, 0.0);
        let p = pos.projected(1.0, 800.0);
        assert_eq!(p, [400.0, 400.0]);
    }

    #[test]
    fn test_bounds_contains_and_overlaps() {
        let a = Bounds::centered([100.0, 100.0], 10.0);
        assert!(a.contains(100.0, 100.0));
        assert!(a.contains(91.0, 109.0));
        assert!(!a.contains(100.0, 111.0));

        let b = Bounds::centered([115.0, 100.0], 10.0);
        let c = Bounds::centered([150.0, 100.0], 10.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_velocity_magnitude() {
        let v = Velocity::new(3.0, 4.0);
        assert!((v.magnitude() - 5.0).abs() < 1e-12);
    }
}
