//! Space Invaders: Enhanced Edition
//!
//! Ten levels of descending formations, a three-phase Mothership boss, combo
//! scoring and falling power-ups. Everything in here is deterministic for a
//! given seed and input sequence; the browser shell only feeds input, drains
//! events and draws.

pub mod boss;
pub mod collision;
pub mod level;
pub mod scenery;
pub mod score;
pub mod state;
pub mod tick;

use glam::Vec2;

pub use boss::{Boss, BossAttack, CoreId, LaserBeam, LaserStage};
pub use collision::{CollisionReport, resolve};
pub use level::{Formation, LEVELS, LevelConfig};
pub use score::{ScoreKeeper, multiplier_for};
pub use state::{
    Effects, Enemy, EnemyKind, InvadersState, Player, PowerUp, PowerUpKind, Projectile,
    ProjectileKind,
};
pub use tick::tick;

/// Gameplay constants (per frame at 60 Hz)
pub mod consts {
    pub const START_LIVES: u32 = 3;
    pub const MAX_LIVES: u32 = 5;

    pub const PLAYER_SIZE: f32 = 40.0;
    /// Distance from the bottom edge to the player's centre
    pub const PLAYER_BOTTOM_OFFSET: f32 = 60.0;
    pub const PLAYER_ACCEL: f32 = 0.8;
    pub const PLAYER_FRICTION: f32 = 0.85;
    pub const PLAYER_MAX_SPEED: f32 = 5.0;
    pub const PLAYER_FIRE_INTERVAL: u32 = 15;
    pub const PLAYER_BULLET_SPEED: f32 = 12.0;
    /// Invulnerability after taking a hit
    pub const HIT_INVULNERABLE_FRAMES: u32 = 120;
    /// Invulnerability after a respawn
    pub const RESPAWN_INVULNERABLE_FRAMES: u32 = 180;

    pub const POWER_UP_SIZE: f32 = 24.0;
    pub const POWER_UP_FALL_SPEED: f32 = 1.5;

    /// Enemies reaching this far from the bottom end the run
    pub const INVASION_LINE_OFFSET: f32 = 80.0;

    /// Level banner duration
    pub const TRANSITION_FRAMES: u32 = 120;
    /// Delay before the game-over screen
    pub const GAME_OVER_SCREEN_DELAY: u32 = 90;
    /// Delay before the victory screen
    pub const VICTORY_SCREEN_DELAY: u32 = 180;
}

/// Something happened this frame that the shell may want to react to
/// (sound, HUD, high-score recording).
#[derive(Debug, Clone, PartialEq)]
pub enum InvaderEvent {
    /// Level banner is up
    LevelBanner { level: u32, name: &'static str },
    /// Banner finished and hostiles spawned
    LevelStarted { level: u32, boss: bool },
    LevelCleared { next_level: u32 },
    PlayerShot,
    EnemyShot,
    PlayerHit { lives: u32 },
    ShieldAbsorbed,
    EnemyKilled {
        pos: Vec2,
        points: u32,
        combo: u32,
        multiplier: f32,
    },
    BossHit {
        core: CoreId,
        destroyed: bool,
        points: u32,
    },
    BossPhase { phase: u8 },
    BossDefeated { points: u32 },
    PowerUpCollected { kind: PowerUpKind },
    Bomb,
    Paused,
    Resumed,
    MuteToggled,
    GameOver { score: u64, max_combo: u32, level: u32 },
    Victory { score: u64, max_combo: u32 },
    /// Delayed end screens
    ShowGameOver { score: u64 },
    ShowVictory { score: u64 },
}

/// Work scheduled on the state's timer queue
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InvaderTimer {
    /// Banner finished; spawn the level's hostiles
    BeginLevel,
    ShowGameOver,
    ShowVictory,
    /// Staggered multi-laser beam at this x offset from the boss
    BossLaser { offset: f32 },
    /// Staggered bullet-hell fan
    BossBulletWave { wave: u32 },
}
