//! Force accumulation, steering and gravity wells

use glam::Vec2;

use super::consts::{BLACK_HOLE_MASS, BLACK_HOLE_RADIUS, EVENT_HORIZON, GRAVITY_MIN_DISTANCE};
use crate::limit;

/// Position, velocity and the force accumulated this frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Kinematics {
    pub pos: Vec2,
    pub vel: Vec2,
    pub acc: Vec2,
}

impl Kinematics {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            acc: Vec2::ZERO,
        }
    }

    pub fn apply_force(&mut self, force: Vec2) {
        self.acc += force;
    }

    /// vel += acc, vel *= friction, pos += vel, then clear the accumulator
    pub fn integrate(&mut self, friction: f32) {
        self.vel += self.acc;
        self.vel *= friction;
        self.pos += self.vel;
        self.acc = Vec2::ZERO;
    }
}

/// Steering force toward `target`: (desired velocity - current velocity),
/// clamped to `max_force`
pub fn steer(pos: Vec2, vel: Vec2, target: Vec2, max_speed: f32, max_force: f32) -> Vec2 {
    let desired = (target - pos).normalize_or_zero() * max_speed;
    limit(desired - vel, max_force)
}

/// Inverse-square attractor (a black hole)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GravityWell {
    pub pos: Vec2,
    pub mass: f32,
    /// Drawn radius
    pub radius: f32,
    /// Attraction range
    pub event_horizon: f32,
    /// Vortex spin, cosmetic
    pub angle: f32,
}

impl GravityWell {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            mass: BLACK_HOLE_MASS,
            radius: BLACK_HOLE_RADIUS,
            event_horizon: EVENT_HORIZON,
            angle: 0.0,
        }
    }

    pub fn update(&mut self) {
        self.angle += 0.05;
    }

    /// Velocity change for a body at `pos`. Zero outside the event horizon
    /// and inside the minimum distance.
    pub fn force_on(&self, pos: Vec2) -> Vec2 {
        let to_well = self.pos - pos;
        let dist = to_well.length();
        if dist < self.event_horizon && dist > GRAVITY_MIN_DISTANCE {
            to_well / dist * (self.mass / (dist * dist))
        } else {
            Vec2::ZERO
        }
    }

    /// Add the pull straight into the body's velocity
    pub fn pull(&self, body: &mut Kinematics) {
        body.vel += self.force_on(body.pos);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_integrate_applies_friction_then_moves() {
        let mut body = Kinematics::new(Vec2::ZERO, Vec2::new(1.0, 0.0));
        body.apply_force(Vec2::new(1.0, 0.0));
        body.integrate(0.5);
        assert_eq!(body.vel, Vec2::new(1.0, 0.0));
        assert_eq!(body.pos, Vec2::new(1.0, 0.0));
        assert_eq!(body.acc, Vec2::ZERO);
    }

    #[test]
    fn test_gravity_range() {
        let well = GravityWell::new(Vec2::ZERO);
        assert_eq!(well.force_on(Vec2::new(150.0, 0.0)), Vec2::ZERO);
        assert_eq!(well.force_on(Vec2::new(200.0, 0.0)), Vec2::ZERO);
        assert_eq!(well.force_on(Vec2::new(10.0, 0.0)), Vec2::ZERO);
        assert_eq!(well.force_on(Vec2::new(5.0, 0.0)), Vec2::ZERO);

        // mass / d^2 toward the centre
        let f = well.force_on(Vec2::new(100.0, 0.0));
        assert!((f.x + 0.1).abs() < 1e-6);
        assert_eq!(f.y, 0.0);
    }

    #[test]
    fn test_pull_changes_velocity_only() {
        let well = GravityWell::new(Vec2::ZERO);
        let mut body = Kinematics::new(Vec2::new(0.0, 50.0), Vec2::ZERO);
        well.pull(&mut body);
        assert_eq!(body.pos, Vec2::new(0.0, 50.0));
        assert!((body.vel.y + 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_steer_from_rest() {
        let force = steer(Vec2::ZERO, Vec2::ZERO, Vec2::new(100.0, 0.0), 2.0, 0.05);
        assert!((force - Vec2::new(0.05, 0.0)).length() < 1e-6);
        // Already at desired velocity
        let force = steer(Vec2::ZERO, Vec2::new(2.0, 0.0), Vec2::new(100.0, 0.0), 2.0, 0.05);
        assert!(force.length() < 1e-6);
    }

    proptest! {
        #[test]
        fn steering_force_never_exceeds_max(
            px in -1000.0f32..1000.0, py in -1000.0f32..1000.0,
            vx in -10.0f32..10.0, vy in -10.0f32..10.0,
            tx in -1000.0f32..1000.0, ty in -1000.0f32..1000.0,
        ) {
            let force = steer(Vec2::new(px, py), Vec2::new(vx, vy), Vec2::new(tx, ty), 2.0, 0.05);
            prop_assert!(force.length() <= 0.05 + 1e-5);
        }

        #[test]
        fn gravity_zero_outside_band(angle in 0.0f32..6.28, dist in 0.0f32..400.0) {
            let well = GravityWell::new(Vec2::new(500.0, 500.0));
            let pos = well.pos + crate::from_angle(angle) * dist;
            let force = well.force_on(pos);
            if dist >= 150.5 || dist <= 9.5 {
                prop_assert_eq!(force, Vec2::ZERO);
            }
        }
    }
}
