//! Vector Void frame driver

use rand::Rng;

use super::VoidEvent;
use super::collision::{self, ShipHit, VoidCollisionReport};
use super::consts::*;
use super::state::{ASTEROID_COLOR, AsteroidSize, SEEKER_COLOR, SHIP_COLOR, VoidState};
use crate::input::{Action, InputState};
use crate::sim::{GamePhase, remove_at_indices};

/// Advance the session by one frame
pub fn tick(state: &mut VoidState, input: &InputState) {
    state.frame += 1;

    if input.was_pressed(Action::Mute) {
        state.events.push(VoidEvent::MuteToggled);
    }

    match state.phase {
        GamePhase::Playing => play_frame(state, input),
        GamePhase::Paused => {
            if input.was_pressed(Action::Pause) {
                state.resume_game();
            }
        }
        GamePhase::Menu | GamePhase::Transition | GamePhase::GameOver | GamePhase::Victory => {
            state.particles.update();
        }
    }
}

fn play_frame(state: &mut VoidState, input: &InputState) {
    if input.was_pressed(Action::Pause) {
        state.pause_game();
        return;
    }

    let (width, height) = (state.width, state.height);

    if let Some(bullet) = state.ship.update(input, width, height) {
        state.bullets.push(bullet);
        state.events.push(VoidEvent::Shot);
    }
    if state.ship.thrusting {
        let exhaust = state.ship.exhaust_point();
        state.particles.exhaust(exhaust, state.ship.heading, SHIP_COLOR);
    }
    state.particles.update();

    for bullet in &mut state.bullets {
        bullet.update();
    }
    for asteroid in &mut state.asteroids {
        asteroid.update(width, height);
    }
    for hole in &mut state.black_holes {
        hole.update();
    }
    let target = state.ship.body.pos;
    for seeker in &mut state.seekers {
        seeker.update(target);
    }

    apply_gravity(state);

    let report = collision::resolve(state);
    apply_collisions(state, report);
    if state.phase != GamePhase::Playing {
        return;
    }

    state.bullets.retain(|b| !b.is_dead(width, height));
    top_up(state);
}

/// Every well pulls every other moving body
fn apply_gravity(state: &mut VoidState) {
    for hole in &state.black_holes {
        if state.ship.alive {
            hole.pull(&mut state.ship.body);
        }
        for asteroid in &mut state.asteroids {
            hole.pull(&mut asteroid.body);
        }
        for bullet in &mut state.bullets {
            hole.pull(&mut bullet.body);
        }
        for seeker in &mut state.seekers {
            hole.pull(&mut seeker.body);
        }
    }
}

fn apply_collisions(state: &mut VoidState, report: VoidCollisionReport) {
    if report.is_empty() {
        return;
    }

    let mut spawned = Vec::new();
    for &(_, idx) in &report.asteroid_hits {
        let asteroid = &state.asteroids[idx];
        let (pos, size) = (asteroid.body.pos, asteroid.size);
        let points = size.points();
        state.score += u64::from(points);
        state.particles.explode(pos, ASTEROID_COLOR, 10 * size as u32);
        spawned.extend(asteroid.split(&mut state.rng));
        state
            .events
            .push(VoidEvent::AsteroidDestroyed { pos, size, points });
    }

    for &(_, idx) in &report.seeker_hits {
        let pos = state.seekers[idx].body.pos;
        state.score += u64::from(SEEKER_POINTS);
        state.particles.explode(pos, SEEKER_COLOR, 15);
        state.events.push(VoidEvent::SeekerDestroyed {
            pos,
            points: SEEKER_POINTS,
        });
    }

    let asteroid_idx: Vec<usize> = report.asteroid_hits.iter().map(|(_, a)| *a).collect();
    let seeker_idx: Vec<usize> = report.seeker_hits.iter().map(|(_, s)| *s).collect();
    remove_at_indices(&mut state.asteroids, &asteroid_idx);
    remove_at_indices(&mut state.seekers, &seeker_idx);
    remove_at_indices(&mut state.bullets, &report.spent_bullets());
    state.asteroids.extend(spawned);

    if let Some(hit) = report.ship_hit {
        ship_hit(state, hit);
    }
}

fn ship_hit(state: &mut VoidState, hit: ShipHit) {
    log::debug!("Ship struck by {:?}", hit);
    state.lives = state.lives.saturating_sub(1);
    state
        .particles
        .debris(state.ship.body.pos, SHIP_COLOR, 20);
    state.events.push(VoidEvent::ShipHit { lives: state.lives });

    if state.lives == 0 {
        state.game_over();
    } else {
        let center = state.center();
        state.ship.respawn(center);
    }
}

/// Keep the field busy
fn top_up(state: &mut VoidState) {
    while state.asteroids.len() < MIN_ASTEROIDS {
        state.spawn_asteroid(None, AsteroidSize::Large);
    }
    if state.seekers.is_empty() && state.rng.random::<f32>() < SEEKER_SPAWN_CHANCE {
        state.spawn_seeker();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyBindings;
    use crate::vector_void::physics::{GravityWell, Kinematics};
    use crate::vector_void::state::{Asteroid, Seeker, VoidBullet};
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn idle() -> InputState {
        InputState::new(KeyBindings::vector_void())
    }

    /// Playing field with nothing in it but the ship
    fn bare_game(seed: u64) -> VoidState {
        let mut state = VoidState::new(seed, 1280.0, 720.0);
        state.start_game();
        state.asteroids.clear();
        state.black_holes.clear();
        state.drain_events();
        state
    }

    fn rock(pos: Vec2, size: AsteroidSize) -> Asteroid {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut asteroid = Asteroid::new(pos, size, &mut rng);
        asteroid.body.vel = Vec2::ZERO;
        asteroid
    }

    #[test]
    fn test_large_asteroid_splits() {
        let mut state = bare_game(1);
        for pos in [Vec2::new(100.0, 100.0), Vec2::new(1100.0, 600.0), Vec2::new(100.0, 600.0)] {
            state.asteroids.push(rock(pos, AsteroidSize::Small));
        }
        state.asteroids.push(rock(Vec2::new(300.0, 300.0), AsteroidSize::Large));
        state
            .bullets
            .push(VoidBullet::new(Vec2::new(300.0, 300.0), Vec2::ZERO));

        tick(&mut state, &idle());

        assert_eq!(state.score(), 100);
        assert!(state.bullets.is_empty());
        let medium = state
            .asteroids
            .iter()
            .filter(|a| a.size == AsteroidSize::Medium)
            .count();
        assert_eq!(medium, 2);
        assert_eq!(state.asteroids.len(), 5);
        assert!(matches!(
            state.drain_events().as_slice(),
            [VoidEvent::AsteroidDestroyed {
                size: AsteroidSize::Large,
                points: 100,
                ..
            }]
        ));
    }

    #[test]
    fn test_small_asteroid_vanishes() {
        let mut state = bare_game(2);
        for pos in [Vec2::new(100.0, 100.0), Vec2::new(1100.0, 600.0), Vec2::new(100.0, 600.0)] {
            state.asteroids.push(rock(pos, AsteroidSize::Medium));
        }
        state.asteroids.push(rock(Vec2::new(300.0, 300.0), AsteroidSize::Small));
        state
            .bullets
            .push(VoidBullet::new(Vec2::new(300.0, 300.0), Vec2::ZERO));

        tick(&mut state, &idle());

        assert_eq!(state.score(), 300);
        assert_eq!(state.asteroids.len(), 3);
        assert!(state.asteroids.iter().all(|a| a.size == AsteroidSize::Medium));
    }

    #[test]
    fn test_field_topped_up() {
        let mut state = bare_game(3);
        tick(&mut state, &idle());
        assert_eq!(state.asteroids.len(), MIN_ASTEROIDS);
        assert!(state.asteroids.iter().all(|a| a.size == AsteroidSize::Large));
    }

    #[test]
    fn test_seeker_kill_scores() {
        let mut state = bare_game(4);
        state.seekers.push(Seeker::new(Vec2::new(200.0, 200.0)));
        state
            .bullets
            .push(VoidBullet::new(Vec2::new(200.0, 200.0), Vec2::ZERO));
        tick(&mut state, &idle());
        assert_eq!(state.score(), u64::from(SEEKER_POINTS));
        // Any seeker left is a fresh spawn out on an edge
        assert!(
            state
                .seekers
                .iter()
                .all(|s| s.body.pos.distance(Vec2::new(200.0, 200.0)) > SEEKER_RADIUS)
        );
    }

    #[test]
    fn test_hit_respawns_with_invulnerability() {
        let mut state = bare_game(5);
        let center = state.center();
        state.ship.body = Kinematics::new(Vec2::new(200.0, 200.0), Vec2::new(3.0, 0.0));
        state.asteroids.push(rock(Vec2::new(203.0, 200.0), AsteroidSize::Large));

        tick(&mut state, &idle());

        assert_eq!(state.lives(), START_LIVES - 1);
        assert_eq!(state.ship.body.pos, center);
        assert_eq!(state.ship.body.vel, Vec2::ZERO);
        assert_eq!(state.ship.invulnerable_timer, RESPAWN_INVULNERABLE_FRAMES);
        assert!(
            state
                .drain_events()
                .contains(&VoidEvent::ShipHit { lives: START_LIVES - 1 })
        );

        // Parked on a rock while invulnerable: no further loss
        state.asteroids.push(rock(center, AsteroidSize::Large));
        for _ in 0..60 {
            tick(&mut state, &idle());
        }
        assert_eq!(state.lives(), START_LIVES - 1);
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut state = bare_game(6);
        state.lives = 1;
        let mut drifter = rock(Vec2::new(100.0, 100.0), AsteroidSize::Large);
        drifter.body.vel = Vec2::new(1.0, 1.0);
        state.asteroids.push(drifter);
        state.black_holes.push(GravityWell::new(state.ship.body.pos));

        tick(&mut state, &idle());

        assert_eq!(state.phase(), GamePhase::GameOver);
        assert_eq!(state.lives(), 0);
        assert!(!state.ship.alive);
        assert!(state.drain_events().contains(&VoidEvent::GameOver { score: 0 }));

        // Nothing moves after the end
        let snapshot: Vec<Vec2> = state.asteroids.iter().map(|a| a.body.pos).collect();
        tick(&mut state, &idle());
        let after: Vec<Vec2> = state.asteroids.iter().map(|a| a.body.pos).collect();
        assert_eq!(snapshot, after);
    }

    #[test]
    fn test_gravity_bends_bullet() {
        let mut state = bare_game(7);
        state.ship.body.pos = Vec2::new(1200.0, 700.0);
        state.black_holes.push(GravityWell::new(Vec2::new(600.0, 400.0)));
        state
            .bullets
            .push(VoidBullet::new(Vec2::new(600.0, 300.0), Vec2::new(1.0, 0.0)));
        tick(&mut state, &idle());
        assert!(state.bullets[0].body.vel.y > 0.0);
    }

    #[test]
    fn test_pause_freezes_field() {
        let mut state = bare_game(8);
        state.asteroids.push(rock(Vec2::new(100.0, 100.0), AsteroidSize::Large));
        state.asteroids[0].body.vel = Vec2::new(1.0, 0.0);

        let mut input = idle();
        input.key_down("KeyP", false);
        tick(&mut state, &input);
        input.end_frame();
        assert_eq!(state.phase(), GamePhase::Paused);

        for _ in 0..30 {
            tick(&mut state, &input);
        }
        assert_eq!(state.asteroids[0].body.pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut input = idle();
        input.key_down("ArrowUp", false);
        input.key_down("Space", false);

        let run = |seed| {
            let mut state = VoidState::new(seed, 1280.0, 720.0);
            state.start_game();
            for _ in 0..600 {
                tick(&mut state, &input);
            }
            (state.score(), state.lives(), state.ship.body.pos, state.asteroids.len())
        };
        assert_eq!(run(42), run(42));
    }
}
