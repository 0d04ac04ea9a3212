//! Vector Void entities and session controller

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::VoidEvent;
use super::consts::*;
use super::physics::{GravityWell, Kinematics};
use crate::consts::OFFSCREEN_MARGIN;
use crate::input::{Action, InputState};
use crate::sim::{GamePhase, ParticleSystem};
use crate::{Color, from_angle, wrap_position};

pub const SHIP_COLOR: Color = Color::hex(0x00ff41);
pub const ASTEROID_COLOR: Color = Color::hex(0xff00ff);
pub const SEEKER_COLOR: Color = Color::hex(0xff2a2a);
pub const BULLET_COLOR: Color = Color::hex(0x00f3ff);
pub const BLACK_HOLE_COLOR: Color = Color::hex(0x9900ff);

/// Unit vector in a uniformly random direction
fn random_unit(rng: &mut Pcg32) -> Vec2 {
    from_angle(rng.random::<f32>() * TAU)
}

#[derive(Debug, Clone)]
pub struct Ship {
    pub body: Kinematics,
    /// Radians; 0 points right, -PI/2 up
    pub heading: f32,
    pub thrusting: bool,
    pub shot_cooldown: u32,
    pub invulnerable_timer: u32,
    pub alive: bool,
}

impl Ship {
    pub fn new(center: Vec2) -> Self {
        Self {
            body: Kinematics::new(center, Vec2::ZERO),
            heading: -FRAC_PI_2,
            thrusting: false,
            shot_cooldown: 0,
            invulnerable_timer: 0,
            alive: true,
        }
    }

    /// Rotate, thrust, integrate and wrap. Returns a bullet when fired.
    pub fn update(&mut self, input: &InputState, width: f32, height: f32) -> Option<VoidBullet> {
        if input.is_held(Action::Left) {
            self.heading -= SHIP_ROTATION_SPEED;
        }
        if input.is_held(Action::Right) {
            self.heading += SHIP_ROTATION_SPEED;
        }

        self.thrusting = input.is_held(Action::Thrust);
        if self.thrusting {
            self.body.apply_force(from_angle(self.heading) * SHIP_THRUST);
        }

        self.body.integrate(SHIP_FRICTION);
        self.body.pos = wrap_position(self.body.pos, width, height, SHIP_RADIUS);

        self.invulnerable_timer = self.invulnerable_timer.saturating_sub(1);
        self.shot_cooldown = self.shot_cooldown.saturating_sub(1);

        if input.is_held(Action::Shoot) && self.shot_cooldown == 0 {
            self.shot_cooldown = SHOT_COOLDOWN;
            let dir = from_angle(self.heading);
            return Some(VoidBullet::new(
                self.body.pos + dir * SHIP_RADIUS,
                dir * BULLET_SPEED + self.body.vel,
            ));
        }
        None
    }

    pub fn exhaust_point(&self) -> Vec2 {
        self.body.pos - from_angle(self.heading) * SHIP_RADIUS
    }

    pub fn invulnerable(&self) -> bool {
        self.invulnerable_timer > 0
    }

    /// Back to the centre, at rest, briefly untouchable
    pub fn respawn(&mut self, center: Vec2) {
        self.body = Kinematics::new(center, Vec2::ZERO);
        self.invulnerable_timer = RESPAWN_INVULNERABLE_FRAMES;
    }

    /// Blink while invulnerable
    pub fn visible(&self) -> bool {
        self.alive && (self.invulnerable_timer / 6) % 2 == 0
    }
}

#[derive(Debug, Clone)]
pub struct VoidBullet {
    pub body: Kinematics,
    pub life: u32,
}

impl VoidBullet {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            body: Kinematics::new(pos, vel),
            life: BULLET_LIFE,
        }
    }

    pub fn update(&mut self) {
        self.body.integrate(1.0);
        self.life = self.life.saturating_sub(1);
    }

    pub fn is_dead(&self, width: f32, height: f32) -> bool {
        let p = self.body.pos;
        self.life == 0
            || p.x < -OFFSCREEN_MARGIN
            || p.x > width + OFFSCREEN_MARGIN
            || p.y < -OFFSCREEN_MARGIN
            || p.y > height + OFFSCREEN_MARGIN
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AsteroidSize {
    Small = 1,
    Medium = 2,
    Large = 3,
}

impl AsteroidSize {
    fn value(self) -> f32 {
        self as u8 as f32
    }

    pub fn radius(self) -> f32 {
        20.0 * self.value()
    }

    /// Smaller rocks drift faster
    pub fn speed(self) -> f32 {
        (4.0 - self.value()) * 0.5
    }

    pub fn points(self) -> u32 {
        100 * (4 - self as u32)
    }

    pub fn smaller(self) -> Option<AsteroidSize> {
        match self {
            AsteroidSize::Large => Some(AsteroidSize::Medium),
            AsteroidSize::Medium => Some(AsteroidSize::Small),
            AsteroidSize::Small => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Asteroid {
    pub body: Kinematics,
    pub size: AsteroidSize,
    /// Jagged outline relative to the centre
    pub vertices: Vec<Vec2>,
    pub angle: f32,
    pub spin: f32,
}

impl Asteroid {
    pub fn new(pos: Vec2, size: AsteroidSize, rng: &mut Pcg32) -> Self {
        let radius = size.radius();
        let corners = rng.random_range(8..=12);
        let vertices = (0..corners)
            .map(|i| {
                let angle = TAU / corners as f32 * i as f32;
                from_angle(angle) * radius * (0.8 + rng.random::<f32>() * 0.4)
            })
            .collect();
        Self {
            body: Kinematics::new(pos, random_unit(rng) * size.speed()),
            size,
            vertices,
            angle: 0.0,
            spin: (rng.random::<f32>() - 0.5) * 0.05,
        }
    }

    pub fn radius(&self) -> f32 {
        self.size.radius()
    }

    pub fn update(&mut self, width: f32, height: f32) {
        self.body.integrate(1.0);
        self.angle += self.spin;
        self.body.pos = wrap_position(self.body.pos, width, height, self.radius());
    }

    /// Two children one size down, each kicked apart from the parent's
    /// velocity. The smallest size leaves nothing.
    pub fn split(&self, rng: &mut Pcg32) -> Vec<Asteroid> {
        let Some(size) = self.size.smaller() else {
            return Vec::new();
        };
        (0..2)
            .map(|_| {
                let mut child = Asteroid::new(self.body.pos, size, rng);
                child.body.vel = self.body.vel + random_unit(rng);
                child
            })
            .collect()
    }
}

/// Hunter that steers toward the ship
#[derive(Debug, Clone)]
pub struct Seeker {
    pub body: Kinematics,
    pub heading: f32,
}

impl Seeker {
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: Kinematics::new(pos, Vec2::ZERO),
            heading: 0.0,
        }
    }

    pub fn update(&mut self, target: Vec2) {
        let force = super::physics::steer(
            self.body.pos,
            self.body.vel,
            target,
            SEEKER_MAX_SPEED,
            SEEKER_MAX_FORCE,
        );
        self.body.apply_force(force);
        self.body.integrate(1.0);
        if self.body.vel.length_squared() > 0.0 {
            self.heading = self.body.vel.to_angle();
        }
    }
}

/// Complete Vector Void session
#[derive(Debug, Clone)]
pub struct VoidState {
    pub seed: u64,
    pub width: f32,
    pub height: f32,
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u32,
    pub frame: u64,
    pub ship: Ship,
    pub bullets: Vec<VoidBullet>,
    pub asteroids: Vec<Asteroid>,
    pub seekers: Vec<Seeker>,
    pub black_holes: Vec<GravityWell>,
    pub particles: ParticleSystem,
    pub events: Vec<VoidEvent>,
    pub rng: Pcg32,
}

impl VoidState {
    pub fn new(seed: u64, width: f32, height: f32) -> Self {
        let center = Vec2::new(width / 2.0, height / 2.0);
        Self {
            seed,
            width,
            height,
            phase: GamePhase::Menu,
            score: 0,
            lives: START_LIVES,
            frame: 0,
            ship: Ship::new(center),
            bullets: Vec::new(),
            asteroids: Vec::new(),
            seekers: Vec::new(),
            black_holes: Vec::new(),
            particles: ParticleSystem::new(seed),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Follow the container size
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    pub fn start_game(&mut self) {
        log::info!(
            "Vector Void: new game (seed {}, field {}x{})",
            self.seed,
            self.width,
            self.height
        );
        self.score = 0;
        self.lives = START_LIVES;
        self.ship = Ship::new(self.center());
        self.bullets.clear();
        self.asteroids.clear();
        self.seekers.clear();
        self.black_holes.clear();
        self.particles.clear();

        for _ in 0..START_ASTEROIDS {
            self.spawn_asteroid(None, AsteroidSize::Large);
        }
        if self.rng.random::<f32>() < BLACK_HOLE_SPAWN_CHANCE {
            self.spawn_black_hole();
        }

        self.phase = GamePhase::Playing;
        self.events.push(VoidEvent::Started);
    }

    pub fn pause_game(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
            self.events.push(VoidEvent::Paused);
        }
    }

    pub fn resume_game(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
            self.events.push(VoidEvent::Resumed);
        }
    }

    pub fn quit_to_menu(&mut self) {
        self.phase = GamePhase::Menu;
        self.particles.clear();
    }

    pub(crate) fn game_over(&mut self) {
        log::info!("Vector Void over with {} points", self.score);
        self.ship.alive = false;
        self.phase = GamePhase::GameOver;
        self.events.push(VoidEvent::GameOver { score: self.score });
    }

    /// Random point just outside one of the four edges
    fn edge_point(&mut self) -> Vec2 {
        let rng = &mut self.rng;
        let near_or_far = |rng: &mut Pcg32, extent: f32| {
            if rng.random::<f32>() < 0.5 {
                -SPAWN_MARGIN
            } else {
                extent + SPAWN_MARGIN
            }
        };
        if rng.random::<f32>() < 0.5 {
            let x = near_or_far(rng, self.width);
            Vec2::new(x, rng.random::<f32>() * self.height)
        } else {
            let x = rng.random::<f32>() * self.width;
            Vec2::new(x, near_or_far(rng, self.height))
        }
    }

    /// Spawn at `pos`, or just outside a random edge
    pub fn spawn_asteroid(&mut self, pos: Option<Vec2>, size: AsteroidSize) {
        let pos = match pos {
            Some(pos) => pos,
            None => self.edge_point(),
        };
        let asteroid = Asteroid::new(pos, size, &mut self.rng);
        self.asteroids.push(asteroid);
    }

    pub fn spawn_seeker(&mut self) {
        let pos = self.edge_point();
        self.seekers.push(Seeker::new(pos));
    }

    /// Place a black hole well away from the ship's start point
    pub fn spawn_black_hole(&mut self) {
        const ATTEMPTS: usize = 64;
        let center = self.center();
        let mut best = Vec2::ZERO;
        for _ in 0..ATTEMPTS {
            let candidate = Vec2::new(
                self.rng.random::<f32>() * self.width,
                self.rng.random::<f32>() * self.height,
            );
            if candidate.distance(center) >= BLACK_HOLE_MIN_CENTER_DISTANCE {
                best = candidate;
                break;
            }
            if candidate.distance(center) > best.distance(center) {
                best = candidate;
            }
        }
        self.black_holes.push(GravityWell::new(best));
    }

    pub fn drain_events(&mut self) -> Vec<VoidEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }
}
