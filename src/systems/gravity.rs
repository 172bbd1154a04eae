//! Pairwise Newtonian gravity.
//!
//! One pair at a time: the hierarchy systems decide which pairs are coupled
//! (all primaries against each other, each secondary against its parent
//! only) and sum the contributions themselves.

use crate::components::Position;
use crate::error::SimError;

/// Gravitational constant in SI units.
pub const G: f64 = 6.674e-11;

/// Result of a single pairwise force evaluation: the separation distance and
/// the force components body A experiences, pointing toward body B.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairForce {
    pub distance: f64,
    pub fx: f64,
    pub fy: f64,
}

/// Compute the gravitational force body A experiences from body B.
///
/// Magnitude is `G * ma * mb / d^2`; direction is the unit vector from A
/// toward B via `atan2`. Coincident bodies are a computation error, not a
/// value — there is no softening in this model.
pub fn pairwise_force(
    a_pos: &Position,
    a_mass: f64,
    b_pos: &Position,
    b_mass: f64,
) -> Result<PairForce, SimError> {
    let dx = b_pos.x - a_pos.x;
    let dy = b_pos.y - a_pos.y;
    let distance = (dx * dx + dy * dy).sqrt();

    if distance == 0.0 {
        return Err(SimError::DegenerateDistance {
            x: a_pos.x,
            y: a_pos.y,
        });
    }

    let angle = dy.atan2(dx);
    let force = G * a_mass * b_mass / (distance * distance);

    Ok(PairForce {
        distance,
        fx: angle.cos() * force,
        fy: angle.sin() * force,
    })
}

/// Speed of a circular orbit at distance `dist` around mass `central_mass`.
///
/// Scenario helper: `v = sqrt(G * M / d)`.
pub fn orbital_velocity(dist: f64, central_mass: f64) -> f64 {
    (G * central_mass / dist).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pairwise_magnitude() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0e8, 4.0e8);
        let (ma, mb) = (5.97e24, 7.34e22);

        let f = pairwise_force(&a, ma, &b, mb).unwrap();
        let d = 5.0e8;
        assert!((f.distance - d).abs() < 1e-3);

        let expected = G * ma * mb / (d * d);
        let magnitude = (f.fx * f.fx + f.fy * f.fy).sqrt();
        assert!((magnitude - expected).abs() / expected < 1e-12);
    }

    #[test]
    fn test_newtons_third_law_symmetry() {
        let a = Position::new(-1.0e9, 2.0e9);
        let b = Position::new(4.0e9, -0.5e9);
        let (ma, mb) = (1.98e30, 6.39e23);

        let fab = pairwise_force(&a, ma, &b, mb).unwrap();
        let fba = pairwise_force(&b, mb, &a, ma).unwrap();

        assert_eq!(fab.distance, fba.distance);
        assert!((fab.fx + fba.fx).abs() <= 1e-12 * fab.fx.abs());
        assert!((fab.fy + fba.fy).abs() <= 1e-12 * fab.fy.abs());
    }

    #[test]
    fn test_force_points_toward_other_body() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(1.0e9, 0.0);
        let f = pairwise_force(&a, 1.0e24, &b, 1.0e24).unwrap();
        assert!(f.fx > 0.0);
        assert!(f.fy.abs() < f.fx * 1e-12);
    }

    #[test]
    fn test_coincident_bodies_are_an_error() {
        let p = Position::new(7.0, -7.0);
        let err = pairwise_force(&p, 1.0e10, &p.clone(), 2.0e10).unwrap_err();
        assert_eq!(err, SimError::DegenerateDistance { x: 7.0, y: -7.0 });
    }

    #[test]
    fn test_orbital_velocity_earth() {
        // Circular speed around the sun at 1 AU is roughly 29.8 km/s.
        let v = orbital_velocity(1.496e11, 1.98e30);
        assert!((v - 29.7e3).abs() < 0.5e3);
    }
}
