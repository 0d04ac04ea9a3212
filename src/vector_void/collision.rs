//! Vector Void collision resolver
//!
//! Lists are walked front to back. Each bullet is spent on the first
//! asteroid or seeker it touches, and each target absorbs at most one
//! bullet per frame. The ship takes at most one hit per frame.

use super::consts::{BLACK_HOLE_LETHAL_RADIUS, SEEKER_RADIUS, SHIP_RADIUS};
use super::state::VoidState;
use crate::sim::circles_overlap;

/// What struck the ship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipHit {
    Asteroid(usize),
    Seeker(usize),
    BlackHole(usize),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoidCollisionReport {
    /// (bullet, asteroid)
    pub asteroid_hits: Vec<(usize, usize)>,
    /// (bullet, seeker)
    pub seeker_hits: Vec<(usize, usize)>,
    pub ship_hit: Option<ShipHit>,
}

impl VoidCollisionReport {
    pub fn spent_bullets(&self) -> Vec<usize> {
        self.asteroid_hits
            .iter()
            .chain(&self.seeker_hits)
            .map(|(bullet, _)| *bullet)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub fn resolve(state: &VoidState) -> VoidCollisionReport {
    let mut report = VoidCollisionReport::default();
    let mut asteroid_taken = vec![false; state.asteroids.len()];
    let mut seeker_taken = vec![false; state.seekers.len()];

    for (bullet_idx, bullet) in state.bullets.iter().enumerate() {
        let pos = bullet.body.pos;

        let asteroid = state.asteroids.iter().enumerate().position(|(i, a)| {
            !asteroid_taken[i] && pos.distance(a.body.pos) < a.radius()
        });
        if let Some(i) = asteroid {
            asteroid_taken[i] = true;
            report.asteroid_hits.push((bullet_idx, i));
            continue;
        }

        let seeker = state.seekers.iter().enumerate().position(|(i, s)| {
            !seeker_taken[i] && pos.distance(s.body.pos) < SEEKER_RADIUS
        });
        if let Some(i) = seeker {
            seeker_taken[i] = true;
            report.seeker_hits.push((bullet_idx, i));
        }
    }

    let ship = &state.ship;
    if ship.alive && !ship.invulnerable() {
        let pos = ship.body.pos;
        report.ship_hit = state
            .asteroids
            .iter()
            .position(|a| circles_overlap(pos, SHIP_RADIUS, a.body.pos, a.radius()))
            .map(ShipHit::Asteroid)
            .or_else(|| {
                state
                    .seekers
                    .iter()
                    .position(|s| circles_overlap(pos, SHIP_RADIUS, s.body.pos, SEEKER_RADIUS))
                    .map(ShipHit::Seeker)
            })
            .or_else(|| {
                state
                    .black_holes
                    .iter()
                    .position(|b| pos.distance(b.pos) < BLACK_HOLE_LETHAL_RADIUS)
                    .map(ShipHit::BlackHole)
            });
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector_void::physics::{GravityWell, Kinematics};
    use crate::vector_void::state::{Asteroid, AsteroidSize, Seeker, VoidBullet};
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn empty_field() -> VoidState {
        let mut state = VoidState::new(5, 1000.0, 800.0);
        state.ship.body = Kinematics::new(Vec2::new(900.0, 700.0), Vec2::ZERO);
        state
    }

    fn asteroid_at(pos: Vec2, size: AsteroidSize) -> Asteroid {
        let mut rng = Pcg32::seed_from_u64(0);
        Asteroid::new(pos, size, &mut rng)
    }

    #[test]
    fn test_bullet_spent_on_first_asteroid() {
        let mut state = empty_field();
        state.asteroids.push(asteroid_at(Vec2::new(100.0, 100.0), AsteroidSize::Large));
        state.asteroids.push(asteroid_at(Vec2::new(110.0, 100.0), AsteroidSize::Large));
        state.bullets.push(VoidBullet::new(Vec2::new(105.0, 100.0), Vec2::ZERO));

        let report = resolve(&state);
        assert_eq!(report.asteroid_hits, vec![(0, 0)]);
        assert_eq!(report.spent_bullets(), vec![0]);
    }

    #[test]
    fn test_asteroid_absorbs_one_bullet() {
        let mut state = empty_field();
        state.asteroids.push(asteroid_at(Vec2::new(100.0, 100.0), AsteroidSize::Small));
        state.bullets.push(VoidBullet::new(Vec2::new(100.0, 100.0), Vec2::ZERO));
        state.bullets.push(VoidBullet::new(Vec2::new(101.0, 100.0), Vec2::ZERO));

        let report = resolve(&state);
        assert_eq!(report.asteroid_hits, vec![(0, 0)]);
        // The second bullet flies on
        assert_eq!(report.spent_bullets(), vec![0]);
    }

    #[test]
    fn test_bullet_hits_seeker() {
        let mut state = empty_field();
        state.seekers.push(Seeker::new(Vec2::new(300.0, 300.0)));
        state.bullets.push(VoidBullet::new(Vec2::new(310.0, 300.0), Vec2::ZERO));
        let report = resolve(&state);
        assert_eq!(report.seeker_hits, vec![(0, 0)]);
        assert!(report.asteroid_hits.is_empty());
    }

    #[test]
    fn test_ship_hit_precedence() {
        let mut state = empty_field();
        let ship = state.ship.body.pos;
        state.black_holes.push(GravityWell::new(ship));
        state.seekers.push(Seeker::new(ship + Vec2::new(5.0, 0.0)));
        assert_eq!(resolve(&state).ship_hit, Some(ShipHit::Seeker(0)));

        state.asteroids.push(asteroid_at(ship + Vec2::new(30.0, 0.0), AsteroidSize::Small));
        assert_eq!(resolve(&state).ship_hit, Some(ShipHit::Asteroid(0)));

        state.asteroids.clear();
        state.seekers.clear();
        assert_eq!(resolve(&state).ship_hit, Some(ShipHit::BlackHole(0)));
    }

    #[test]
    fn test_invulnerable_ship_ignores_contacts() {
        let mut state = empty_field();
        let ship = state.ship.body.pos;
        state.asteroids.push(asteroid_at(ship, AsteroidSize::Large));
        state.ship.invulnerable_timer = 10;
        assert!(resolve(&state).is_empty());
    }

    #[test]
    fn test_black_hole_edge_is_safe() {
        let mut state = empty_field();
        let ship = state.ship.body.pos;
        state.black_holes.push(GravityWell::new(ship + Vec2::new(25.0, 0.0)));
        assert_eq!(resolve(&state).ship_hit, None);
    }
}
