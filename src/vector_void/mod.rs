//! Vector Void
//!
//! Inertia-driven ship in a wrapping field of splitting asteroids, with
//! seekers that steer toward the ship and black holes that bend everything
//! nearby.

pub mod collision;
pub mod physics;
pub mod state;
pub mod tick;

use glam::Vec2;

pub use collision::{ShipHit, VoidCollisionReport, resolve};
pub use physics::{GravityWell, Kinematics, steer};
pub use state::{Asteroid, AsteroidSize, Seeker, Ship, VoidBullet, VoidState};
pub use tick::tick;

/// Gameplay constants (per frame at 60 Hz)
pub mod consts {
    pub const START_LIVES: u32 = 3;

    pub const SHIP_RADIUS: f32 = 15.0;
    /// Radians per frame
    pub const SHIP_ROTATION_SPEED: f32 = 0.1;
    pub const SHIP_THRUST: f32 = 0.2;
    pub const SHIP_FRICTION: f32 = 0.98;
    pub const SHOT_COOLDOWN: u32 = 15;
    /// Invulnerability after losing a life
    pub const RESPAWN_INVULNERABLE_FRAMES: u32 = 120;

    pub const BULLET_SPEED: f32 = 10.0;
    pub const BULLET_LIFE: u32 = 60;

    pub const SEEKER_MAX_SPEED: f32 = 2.0;
    pub const SEEKER_MAX_FORCE: f32 = 0.05;
    pub const SEEKER_RADIUS: f32 = 15.0;
    pub const SEEKER_POINTS: u32 = 500;
    pub const SEEKER_SPAWN_CHANCE: f32 = 0.005;

    pub const BLACK_HOLE_MASS: f32 = 1000.0;
    pub const BLACK_HOLE_RADIUS: f32 = 40.0;
    pub const EVENT_HORIZON: f32 = 150.0;
    /// No pull inside this distance
    pub const GRAVITY_MIN_DISTANCE: f32 = 10.0;
    /// Ship dies this close to a black hole's centre
    pub const BLACK_HOLE_LETHAL_RADIUS: f32 = 20.0;
    pub const BLACK_HOLE_SPAWN_CHANCE: f32 = 0.5;
    /// Black holes keep clear of the ship's start point
    pub const BLACK_HOLE_MIN_CENTER_DISTANCE: f32 = 300.0;

    pub const START_ASTEROIDS: usize = 5;
    /// Top the field back up below this
    pub const MIN_ASTEROIDS: usize = 3;
    /// Spawns happen this far outside an edge
    pub const SPAWN_MARGIN: f32 = 50.0;
}

/// Vector Void happenings for the shell
#[derive(Debug, Clone, PartialEq)]
pub enum VoidEvent {
    Started,
    Shot,
    AsteroidDestroyed {
        pos: Vec2,
        size: AsteroidSize,
        points: u32,
    },
    SeekerDestroyed { pos: Vec2, points: u32 },
    ShipHit { lives: u32 },
    Paused,
    Resumed,
    MuteToggled,
    GameOver { score: u64 },
}
