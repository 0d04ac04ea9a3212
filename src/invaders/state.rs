//! Space Invaders entities and session controller
//!
//! `InvadersState` is the sole owner of every entity list. Entities never
//! point back at it; the player reads input and the field size through
//! arguments instead.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::boss::Boss;
use super::consts::*;
use super::level::{self, Formation};
use super::scenery::Scenery;
use super::score::ScoreKeeper;
use super::{InvaderEvent, InvaderTimer};
use crate::consts::{INVADERS_HEIGHT, INVADERS_WIDTH, OFFSCREEN_MARGIN};
use crate::input::{Action, InputState};
use crate::sim::{GamePhase, ParticleSystem, Rect, TimerQueue};
use crate::{Color, limit};

/// Projectile behaviour
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileKind {
    Normal,
    /// Steers toward the player every frame
    Homing { strength: f32 },
}

const HOMING_MAX_SPEED: f32 = 8.0;
const PROJECTILE_TRAIL: usize = 5;

#[derive(Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
    pub height: f32,
    pub color: Color,
    pub damage: u32,
    /// Fired by the player
    pub friendly: bool,
    pub kind: ProjectileKind,
    /// Frames left; `None` lives until it leaves the field
    pub life: Option<u32>,
    pub trail: Vec<Vec2>,
}

impl Projectile {
    /// Standard 4x15 player bolt
    pub fn player(pos: Vec2, vel: Vec2, color: Color) -> Self {
        Self {
            pos,
            vel,
            width: 4.0,
            height: 15.0,
            color,
            damage: 1,
            friendly: true,
            kind: ProjectileKind::Normal,
            life: None,
            trail: Vec::with_capacity(PROJECTILE_TRAIL + 1),
        }
    }

    pub fn hostile(pos: Vec2, vel: Vec2, width: f32, height: f32, color: Color) -> Self {
        Self {
            width,
            height,
            friendly: false,
            ..Self::player(pos, vel, color)
        }
    }

    /// Turn this projectile into a homing missile with a limited lifetime
    pub fn homing(mut self, strength: f32, life: u32) -> Self {
        self.kind = ProjectileKind::Homing { strength };
        self.life = Some(life);
        self
    }

    /// Move one frame. Homing projectiles steer toward `target`.
    pub fn update(&mut self, target: Option<Vec2>) {
        self.trail.push(self.pos);
        if self.trail.len() > PROJECTILE_TRAIL {
            self.trail.remove(0);
        }

        if let (ProjectileKind::Homing { strength }, Some(target)) = (self.kind, target) {
            let to_target = target - self.pos;
            if to_target.length_squared() > 0.0 {
                self.vel += to_target.normalize() * strength;
                self.vel = limit(self.vel, HOMING_MAX_SPEED);
            }
        }

        self.pos += self.vel;
        if let Some(life) = self.life.as_mut() {
            *life = life.saturating_sub(1);
        }
    }

    pub fn is_off_screen(&self, width: f32, height: f32) -> bool {
        self.pos.x < -OFFSCREEN_MARGIN
            || self.pos.x > width + OFFSCREEN_MARGIN
            || self.pos.y < -OFFSCREEN_MARGIN
            || self.pos.y > height + OFFSCREEN_MARGIN
    }

    pub fn is_expired(&self) -> bool {
        self.life == Some(0)
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, self.width, self.height)
    }
}

/// Hostile types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    Basic,
    /// Wobbles sideways while the formation moves
    Fast,
    /// Three hit points, shows a health bar
    Elite,
    /// Spawned by the boss
    Minion,
}

/// Static per-kind configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub width: f32,
    pub height: f32,
    pub hp: u32,
    pub points: u32,
    pub color: Color,
    /// Chance per frame to fire (before the level multiplier)
    pub shoot_chance: f32,
    /// Chance to drop a power-up on death
    pub drop_chance: f32,
}

impl EnemyKind {
    pub fn stats(self) -> EnemyStats {
        match self {
            EnemyKind::Basic => EnemyStats {
                width: 35.0,
                height: 30.0,
                hp: 1,
                points: 100,
                color: Color::hex(0xff4444),
                shoot_chance: 0.002,
                drop_chance: 0.05,
            },
            EnemyKind::Fast => EnemyStats {
                width: 30.0,
                height: 25.0,
                hp: 1,
                points: 150,
                color: Color::hex(0xff8844),
                shoot_chance: 0.003,
                drop_chance: 0.08,
            },
            EnemyKind::Elite => EnemyStats {
                width: 40.0,
                height: 35.0,
                hp: 3,
                points: 300,
                color: Color::hex(0xaa44ff),
                shoot_chance: 0.004,
                drop_chance: 0.20,
            },
            EnemyKind::Minion => EnemyStats {
                width: 25.0,
                height: 20.0,
                hp: 1,
                points: 50,
                color: Color::hex(0x44ff44),
                shoot_chance: 0.001,
                drop_chance: 0.02,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub pos: Vec2,
    pub kind: EnemyKind,
    pub width: f32,
    pub height: f32,
    pub hp: u32,
    pub max_hp: u32,
    pub shoot_chance: f32,
    pub alive: bool,
    pub move_phase: f32,
    pub anim_phase: f32,
    /// Frames of white flash after a hit
    pub hit_flash: u32,
}

impl Enemy {
    pub fn new(pos: Vec2, kind: EnemyKind, rng: &mut Pcg32) -> Self {
        let stats = kind.stats();
        Self {
            pos,
            kind,
            width: stats.width,
            height: stats.height,
            hp: stats.hp,
            max_hp: stats.hp,
            shoot_chance: stats.shoot_chance,
            alive: true,
            move_phase: rng.random::<f32>() * TAU,
            anim_phase: rng.random::<f32>() * TAU,
            hit_flash: 0,
        }
    }

    /// Apply the shared formation displacement plus per-kind motion
    pub fn update(&mut self, formation_delta: Vec2) {
        self.pos += formation_delta;
        self.move_phase += 0.02;
        self.anim_phase += 0.1;

        if self.kind == EnemyKind::Fast {
            self.pos.x += (self.move_phase * 2.0).sin() * 0.5;
        }

        self.hit_flash = self.hit_flash.saturating_sub(1);
    }

    pub fn try_shoot(&self, rng: &mut Pcg32) -> Option<Projectile> {
        if rng.random::<f32>() < self.shoot_chance {
            let speed = 4.0 + rng.random::<f32>() * 2.0;
            Some(Projectile::hostile(
                self.pos + Vec2::new(0.0, self.height / 2.0),
                Vec2::new(0.0, speed),
                4.0,
                10.0,
                Color::hex(0xff6666),
            ))
        } else {
            None
        }
    }

    /// Take damage. Returns true if this hit killed it.
    pub fn hit(&mut self, damage: u32) -> bool {
        self.hp = self.hp.saturating_sub(damage);
        self.hit_flash = 10;
        if self.hp == 0 {
            self.alive = false;
            true
        } else {
            false
        }
    }

    pub fn should_drop_power_up(&self, rng: &mut Pcg32) -> bool {
        rng.random::<f32>() < self.kind.stats().drop_chance
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, self.width, self.height)
    }

    pub fn eye_glow(&self) -> f32 {
        0.5 + self.anim_phase.sin() * 0.5
    }
}

/// Falling pickups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    RapidFire,
    TripleShot,
    Shield,
    Bomb,
    ExtraLife,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerUpConfig {
    pub name: &'static str,
    pub color: Color,
    pub symbol: &'static str,
    /// Frames the effect lasts (0 = instant)
    pub duration: u32,
    /// Shield strikes absorbed
    pub shield_hits: u32,
    /// Relative drop weight
    pub weight: u32,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::RapidFire,
        PowerUpKind::TripleShot,
        PowerUpKind::Shield,
        PowerUpKind::Bomb,
        PowerUpKind::ExtraLife,
    ];

    pub fn config(self) -> PowerUpConfig {
        match self {
            PowerUpKind::RapidFire => PowerUpConfig {
                name: "RAPID FIRE",
                color: Color::hex(0x00aaff),
                symbol: "⚡",
                duration: 600,
                shield_hits: 0,
                weight: 30,
            },
            PowerUpKind::TripleShot => PowerUpConfig {
                name: "TRIPLE SHOT",
                color: Color::hex(0x00ff66),
                symbol: "▼",
                duration: 900,
                shield_hits: 0,
                weight: 25,
            },
            PowerUpKind::Shield => PowerUpConfig {
                name: "SHIELD",
                color: Color::hex(0xffff00),
                symbol: "◆",
                duration: 0,
                shield_hits: 3,
                weight: 20,
            },
            PowerUpKind::Bomb => PowerUpConfig {
                name: "BOMB",
                color: Color::hex(0xff4444),
                symbol: "✸",
                duration: 0,
                shield_hits: 0,
                weight: 15,
            },
            PowerUpKind::ExtraLife => PowerUpConfig {
                name: "EXTRA LIFE",
                color: Color::hex(0xff00ff),
                symbol: "♥",
                duration: 0,
                shield_hits: 0,
                weight: 10,
            },
        }
    }

    /// Weighted pick; rarer kinds have lower weight
    pub fn random(rng: &mut Pcg32) -> Self {
        let total: u32 = Self::ALL.iter().map(|k| k.config().weight).sum();
        let mut roll = rng.random::<f32>() * total as f32;
        for kind in Self::ALL {
            roll -= kind.config().weight as f32;
            if roll <= 0.0 {
                return kind;
            }
        }
        PowerUpKind::RapidFire
    }
}

#[derive(Debug, Clone)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub rotation: f32,
    pub pulse_phase: f32,
    pub collected: bool,
}

impl PowerUp {
    pub fn new(pos: Vec2, kind: PowerUpKind) -> Self {
        Self {
            pos,
            kind,
            rotation: 0.0,
            pulse_phase: 0.0,
            collected: false,
        }
    }

    pub fn update(&mut self) {
        self.pos.y += POWER_UP_FALL_SPEED;
        self.rotation += 0.02;
        self.pulse_phase += 0.1;
    }

    pub fn is_off_screen(&self, height: f32) -> bool {
        self.pos.y > height + POWER_UP_SIZE
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, POWER_UP_SIZE, POWER_UP_SIZE)
    }
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vx: f32,
    pub tilt: f32,
    pub thrust_intensity: f32,
    pub shoot_cooldown: u32,
    pub fire_interval: u32,
    /// Timed weapon power-up (rapid fire or triple shot)
    pub weapon: Option<PowerUpKind>,
    pub weapon_timer: u32,
    pub shield_hits: u32,
    pub shield_pulse: f32,
    pub invulnerable_timer: u32,
    pub flash_timer: u32,
    pub alive: bool,
}

impl Player {
    pub fn new(field_width: f32, field_height: f32) -> Self {
        Self {
            pos: Vec2::new(field_width / 2.0, field_height - PLAYER_BOTTOM_OFFSET),
            vx: 0.0,
            tilt: 0.0,
            thrust_intensity: 0.0,
            shoot_cooldown: 0,
            fire_interval: PLAYER_FIRE_INTERVAL,
            weapon: None,
            weapon_timer: 0,
            shield_hits: 0,
            shield_pulse: 0.0,
            invulnerable_timer: 0,
            flash_timer: 0,
            alive: true,
        }
    }

    pub fn update(&mut self, input: &InputState, field_width: f32) {
        if !self.alive {
            return;
        }

        if input.is_held(Action::Left) {
            self.vx -= PLAYER_ACCEL;
            self.tilt = (self.tilt - 0.1).max(-0.3);
        } else if input.is_held(Action::Right) {
            self.vx += PLAYER_ACCEL;
            self.tilt = (self.tilt + 0.1).min(0.3);
        } else {
            self.tilt *= 0.9;
        }

        self.vx *= PLAYER_FRICTION;
        self.pos.x += self.vx;
        self.thrust_intensity = self.vx.abs() / PLAYER_MAX_SPEED;

        let half = PLAYER_SIZE / 2.0;
        if self.pos.x < half {
            self.pos.x = half;
            self.vx = 0.0;
        }
        if self.pos.x > field_width - half {
            self.pos.x = field_width - half;
            self.vx = 0.0;
        }

        self.shoot_cooldown = self.shoot_cooldown.saturating_sub(1);

        if self.weapon_timer > 0 {
            self.weapon_timer -= 1;
            if self.weapon_timer == 0 {
                self.clear_weapon();
            }
        }

        if self.shield_hits > 0 {
            self.shield_pulse += 0.1;
        }

        if self.invulnerable_timer > 0 {
            self.invulnerable_timer -= 1;
            self.flash_timer += 1;
        }
    }

    /// Fire if the cooldown allows. Triple shot fans three bolts.
    pub fn shoot(&mut self) -> Vec<Projectile> {
        if self.shoot_cooldown > 0 || !self.alive {
            return Vec::new();
        }
        self.shoot_cooldown = self.fire_interval;

        let muzzle = self.pos - Vec2::new(0.0, PLAYER_SIZE / 2.0);
        if self.weapon == Some(PowerUpKind::TripleShot) {
            let green = Color::hex(0x00ff66);
            vec![
                Projectile::player(muzzle, Vec2::new(0.0, -PLAYER_BULLET_SPEED), green),
                Projectile::player(
                    muzzle + Vec2::new(-15.0, 5.0),
                    Vec2::new(-2.0, -11.0),
                    green,
                ),
                Projectile::player(muzzle + Vec2::new(15.0, 5.0), Vec2::new(2.0, -11.0), green),
            ]
        } else {
            vec![Projectile::player(
                muzzle,
                Vec2::new(0.0, -PLAYER_BULLET_SPEED),
                Color::CYAN,
            )]
        }
    }

    pub fn set_weapon(&mut self, kind: PowerUpKind, duration: u32) {
        self.weapon = Some(kind);
        self.weapon_timer = duration;
        self.fire_interval = if kind == PowerUpKind::RapidFire {
            PLAYER_FIRE_INTERVAL / 3
        } else {
            PLAYER_FIRE_INTERVAL
        };
    }

    pub fn clear_weapon(&mut self) {
        self.weapon = None;
        self.weapon_timer = 0;
        self.fire_interval = PLAYER_FIRE_INTERVAL;
    }

    pub fn activate_shield(&mut self, hits: u32) {
        self.shield_hits = hits;
    }

    pub fn shield_active(&self) -> bool {
        self.shield_hits > 0
    }

    pub fn invulnerable(&self) -> bool {
        self.invulnerable_timer > 0
    }

    /// One strike against the ship. Returns true if it cost a life; the
    /// shield and invulnerability absorb strikes.
    pub fn hit(&mut self) -> bool {
        if self.invulnerable() {
            return false;
        }
        if self.shield_hits > 0 {
            self.shield_hits -= 1;
            return false;
        }
        self.invulnerable_timer = HIT_INVULNERABLE_FRAMES;
        self.flash_timer = 0;
        true
    }

    pub fn die(&mut self) {
        self.alive = false;
    }

    pub fn respawn(&mut self, field_width: f32, field_height: f32) {
        *self = Self::new(field_width, field_height);
        self.invulnerable_timer = RESPAWN_INVULNERABLE_FRAMES;
    }

    /// Hitbox, inset 5 px from the sprite
    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, PLAYER_SIZE - 10.0, PLAYER_SIZE - 10.0)
    }

    /// Blink while invulnerable
    pub fn visible(&self) -> bool {
        self.alive && (!self.invulnerable() || (self.flash_timer / 4) % 2 == 1)
    }

    pub fn active_power_up_name(&self) -> &'static str {
        if self.shield_active() {
            return "SHIELD";
        }
        self.weapon.map(|k| k.config().name).unwrap_or("NONE")
    }
}

/// Screen-space feedback read by the renderer
#[derive(Debug, Clone, Default)]
pub struct Effects {
    pub screen_shake: f32,
    pub screen_flash: f32,
    pub flash_color: Option<Color>,
    /// Frames of half-speed simulation left
    pub slow_motion: u32,
    pub reduced_motion: bool,
}

impl Effects {
    pub fn shake(&mut self, amount: f32) {
        if !self.reduced_motion {
            self.screen_shake = amount;
        }
    }

    pub fn flash(&mut self, alpha: f32, color: Color) {
        self.screen_flash = if self.reduced_motion { alpha * 0.5 } else { alpha };
        self.flash_color = Some(color);
    }

    pub fn slow_motion(&mut self, frames: u32) {
        if !self.reduced_motion {
            self.slow_motion = self.slow_motion.max(frames);
        }
    }

    /// Decay once per display frame
    pub fn update(&mut self) {
        self.screen_shake = (self.screen_shake - 0.5).max(0.0);
        self.screen_flash = (self.screen_flash - 0.05).max(0.0);
    }

    /// Deterministic jitter for the current shake amount
    pub fn shake_offset(&self, frame: u64) -> Vec2 {
        if self.screen_shake <= 0.0 {
            return Vec2::ZERO;
        }
        let t = frame as f32;
        Vec2::new((t * 12.9898).sin(), (t * 78.233).sin()) * self.screen_shake
    }

    pub fn clear(&mut self) {
        let reduced_motion = self.reduced_motion;
        *self = Self {
            reduced_motion,
            ..Self::default()
        };
    }
}

/// Complete Space Invaders session
#[derive(Debug, Clone)]
pub struct InvadersState {
    pub seed: u64,
    pub width: f32,
    pub height: f32,
    pub phase: GamePhase,
    /// 1-based level number
    pub level: u32,
    pub lives: u32,
    /// Simulated frames since boot
    pub frame: u64,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub player_bullets: Vec<Projectile>,
    pub enemy_bullets: Vec<Projectile>,
    pub power_ups: Vec<PowerUp>,
    pub boss: Option<Boss>,
    pub formation: Formation,
    pub score: ScoreKeeper,
    pub particles: ParticleSystem,
    pub scenery: Scenery,
    pub effects: Effects,
    pub timers: TimerQueue<InvaderTimer>,
    pub events: Vec<InvaderEvent>,
    pub rng: Pcg32,
}

impl InvadersState {
    /// Fresh state on the title screen
    pub fn new(seed: u64) -> Self {
        let (width, height) = (INVADERS_WIDTH, INVADERS_HEIGHT);
        Self {
            seed,
            width,
            height,
            phase: GamePhase::Menu,
            level: 1,
            lives: START_LIVES,
            frame: 0,
            player: Player::new(width, height),
            enemies: Vec::new(),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            power_ups: Vec::new(),
            boss: None,
            formation: Formation::new(1.0),
            score: ScoreKeeper::new(),
            particles: ParticleSystem::new(seed),
            scenery: Scenery::new(width, height, seed),
            effects: Effects::default(),
            timers: TimerQueue::new(),
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Begin a new run at level 1
    pub fn start_game(&mut self) {
        log::info!("Space Invaders: new game (seed {})", self.seed);
        self.timers.cancel_all();
        self.lives = START_LIVES;
        self.level = 1;
        self.score.reset();
        self.particles.clear();
        self.effects.clear();
        self.player = Player::new(self.width, self.height);
        self.clear_entities();
        self.start_level();
    }

    fn clear_entities(&mut self) {
        self.enemies.clear();
        self.player_bullets.clear();
        self.enemy_bullets.clear();
        self.power_ups.clear();
        self.boss = None;
    }

    /// Show the level banner; hostiles spawn when it finishes
    pub(crate) fn start_level(&mut self) {
        let config = level::config_for(self.level);
        self.phase = GamePhase::Transition;
        self.scenery.set_level(self.level);
        self.timers.schedule(TRANSITION_FRAMES, InvaderTimer::BeginLevel);
        self.events.push(InvaderEvent::LevelBanner {
            level: self.level,
            name: config.name,
        });
    }

    /// Banner timer fired: spawn the wave (and the boss on the boss level)
    pub(crate) fn begin_level(&mut self) {
        let config = level::config_for(self.level);
        self.enemies = level::generate_enemies(config, self.width, &mut self.rng);
        self.formation = Formation::new(config.speed_multiplier);
        self.boss = config.boss.then(|| Boss::new(self.width, self.height));
        self.phase = GamePhase::Playing;
        log::info!(
            "Level {} ({}) started: {} enemies{}",
            self.level,
            config.name,
            self.enemies.len(),
            if config.boss { " + Mothership" } else { "" }
        );
        self.events.push(InvaderEvent::LevelStarted {
            level: self.level,
            boss: config.boss,
        });
    }

    pub fn pause_game(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
            self.events.push(InvaderEvent::Paused);
        }
    }

    pub fn resume_game(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
            self.events.push(InvaderEvent::Resumed);
        }
    }

    pub fn quit_to_menu(&mut self) {
        self.timers.cancel_all();
        self.phase = GamePhase::Menu;
        self.particles.clear();
        self.effects.clear();
        self.clear_entities();
    }

    pub(crate) fn game_over(&mut self) {
        log::info!(
            "Game over at level {} with {} points",
            self.level,
            self.score.score()
        );
        self.timers.cancel_all();
        self.phase = GamePhase::GameOver;
        self.events.push(InvaderEvent::GameOver {
            score: self.score.score(),
            max_combo: self.score.max_combo(),
            level: self.level,
        });
        self.timers
            .schedule(GAME_OVER_SCREEN_DELAY, InvaderTimer::ShowGameOver);
    }

    pub(crate) fn victory(&mut self) {
        log::info!("Victory with {} points", self.score.score());
        self.timers.cancel_all();
        self.phase = GamePhase::Victory;
        self.particles.celebrate(self.width, self.height);
        self.events.push(InvaderEvent::Victory {
            score: self.score.score(),
            max_combo: self.score.max_combo(),
        });
        self.timers
            .schedule(VICTORY_SCREEN_DELAY, InvaderTimer::ShowVictory);
    }

    /// Bomb power-up: every live enemy dies (scored as kills) and enemy fire is cleared
    pub(crate) fn trigger_bomb(&mut self) {
        for enemy in self.enemies.iter_mut().filter(|e| e.alive) {
            enemy.alive = false;
            self.particles
                .explode(enemy.pos, enemy.kind.stats().color, 30);
            self.score.add_kill(enemy.kind.stats().points);
        }
        self.enemy_bullets.clear();
        self.effects.flash(0.8, Color::hex(0xff4444));
        self.effects.shake(20.0);
        self.events.push(InvaderEvent::Bomb);
    }

    pub(crate) fn add_life(&mut self) {
        if self.lives < MAX_LIVES {
            self.lives += 1;
        }
    }

    /// Take the events produced since the last drain
    pub fn drain_events(&mut self) -> Vec<InvaderEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn score(&self) -> u64 {
        self.score.score()
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn combo(&self) -> u32 {
        self.score.combo()
    }

    pub fn multiplier(&self) -> f32 {
        self.score.multiplier()
    }

    /// Boss health fraction and phase while a boss is on the field
    pub fn boss_health(&self) -> Option<(f32, u8)> {
        self.boss
            .as_ref()
            .filter(|b| b.alive)
            .map(|b| (b.health_fraction(), b.phase))
    }

    pub fn active_power_up_name(&self) -> &'static str {
        self.player.active_power_up_name()
    }
}
