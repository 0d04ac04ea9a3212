//! Cosmetic particle effects
//!
//! Particles never collide and never affect gameplay. The system owns its own
//! RNG so the number of particles drawn (quality preset) cannot shift the
//! gameplay random stream.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::timers::TimerQueue;
use crate::{Color, from_angle};

/// Default particle cap (High quality)
pub const MAX_PARTICLES: usize = 1500;

#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Color,
    /// Frames remaining
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub gravity: f32,
    pub friction: f32,
    pub shrink: bool,
    pub glow: bool,
    /// Past positions, oldest first
    pub trail: Vec<Vec2>,
    pub trail_length: usize,
}

impl Particle {
    pub fn new(pos: Vec2, vel: Vec2, color: Color, life: f32, size: f32) -> Self {
        Self {
            pos,
            vel,
            color,
            life,
            max_life: life,
            size,
            gravity: 0.0,
            friction: 0.98,
            shrink: true,
            glow: false,
            trail: Vec::new(),
            trail_length: 0,
        }
    }

    pub fn update(&mut self) {
        if self.trail_length > 0 {
            self.trail.push(self.pos);
            if self.trail.len() > self.trail_length {
                self.trail.remove(0);
            }
        }

        self.vel *= self.friction;
        self.vel.y += self.gravity;
        self.pos += self.vel;
        self.life -= 1.0;

        if self.shrink {
            self.size *= (self.life / self.max_life).max(0.0);
        }
    }

    /// Opacity from remaining life
    pub fn alpha(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }

    pub fn is_dead(&self) -> bool {
        self.life <= 0.0 || self.size <= 0.0
    }
}

/// Overrides for a radial burst
#[derive(Debug, Clone, Copy)]
pub struct BurstOptions {
    /// Fixed speed; random 2..6 when `None`
    pub speed: Option<f32>,
    pub life: f32,
    /// Fixed size; random 2..6 when `None`
    pub size: Option<f32>,
    pub gravity: f32,
}

impl Default for BurstOptions {
    fn default() -> Self {
        Self {
            speed: None,
            life: 40.0,
            size: None,
            gravity: 0.0,
        }
    }
}

/// Delayed follow-up bursts
#[derive(Debug, Clone)]
enum Burst {
    Explode {
        pos: Vec2,
        color: Color,
        count: u32,
        options: BurstOptions,
    },
    Confetti {
        width: f32,
        height: f32,
    },
}

const CONFETTI: [Color; 6] = [
    Color::hex(0xff0066),
    Color::hex(0x00ff66),
    Color::hex(0x6600ff),
    Color::hex(0xffff00),
    Color::hex(0x00ffff),
    Color::hex(0xff00ff),
];

const BOSS_RINGS: [Color; 5] = [
    Color::hex(0xff0000),
    Color::hex(0xff4400),
    Color::hex(0xff8800),
    Color::hex(0xffff00),
    Color::hex(0xffffff),
];

/// Owns every live particle plus queued follow-up bursts
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    pub particles: Vec<Particle>,
    pending: TimerQueue<Burst>,
    rng: Pcg32,
    max_particles: usize,
}

impl ParticleSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            pending: TimerQueue::new(),
            rng: Pcg32::seed_from_u64(seed ^ 0x9e37_79b9_7f4a_7c15),
            max_particles: MAX_PARTICLES,
        }
    }

    /// Change the cap (quality preset). Excess particles are dropped oldest first.
    pub fn set_max_particles(&mut self, max: usize) {
        self.max_particles = max;
        self.enforce_cap();
    }

    pub fn max_particles(&self) -> usize {
        self.max_particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Advance one frame: fire due bursts, move particles, drop dead ones
    pub fn update(&mut self) {
        for burst in self.pending.advance() {
            match burst {
                Burst::Explode {
                    pos,
                    color,
                    count,
                    options,
                } => self.explode_with(pos, color, count, options),
                Burst::Confetti { width, height } => self.confetti(width, height),
            }
        }

        for p in &mut self.particles {
            p.update();
        }
        self.particles.retain(|p| !p.is_dead());
    }

    /// Drop every particle and queued burst
    pub fn clear(&mut self) {
        self.particles.clear();
        self.pending.cancel_all();
    }

    fn push(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    fn enforce_cap(&mut self) {
        if self.particles.len() > self.max_particles {
            let excess = self.particles.len() - self.max_particles;
            self.particles.drain(..excess);
        }
    }

    /// Radial explosion with default options
    pub fn explode(&mut self, pos: Vec2, color: Color, count: u32) {
        self.explode_with(pos, color, count, BurstOptions::default());
    }

    pub fn explode_with(&mut self, pos: Vec2, color: Color, count: u32, options: BurstOptions) {
        for i in 0..count {
            let angle = TAU / count as f32 * i as f32 + self.rng.random::<f32>() * 0.5;
            let speed = options
                .speed
                .unwrap_or_else(|| self.rng.random::<f32>() * 4.0 + 2.0);
            let size = options
                .size
                .unwrap_or_else(|| self.rng.random::<f32>() * 4.0 + 2.0);
            let mut p = Particle::new(pos, from_angle(angle) * speed, color, options.life, size);
            p.glow = true;
            p.friction = 0.95;
            p.gravity = options.gravity;
            self.push(p);
        }
        self.enforce_cap();
    }

    /// Flash, fireball, then staggered embers and smoke
    pub fn big_explosion(&mut self, pos: Vec2) {
        self.explode_with(
            pos,
            Color::WHITE,
            10,
            BurstOptions {
                speed: Some(8.0),
                life: 10.0,
                size: Some(6.0),
                ..Default::default()
            },
        );
        self.explode_with(
            pos,
            Color::ORANGE,
            40,
            BurstOptions {
                speed: Some(5.0),
                life: 50.0,
                ..Default::default()
            },
        );
        self.pending.schedule(
            3,
            Burst::Explode {
                pos,
                color: Color::hex(0xff4400),
                count: 20,
                options: BurstOptions {
                    speed: Some(3.0),
                    life: 40.0,
                    ..Default::default()
                },
            },
        );
        self.pending.schedule(
            6,
            Burst::Explode {
                pos,
                color: Color::GREY,
                count: 15,
                options: BurstOptions {
                    speed: Some(1.0),
                    life: 60.0,
                    gravity: -0.02,
                    ..Default::default()
                },
            },
        );
    }

    /// Five expanding rings, six frames apart
    pub fn boss_explosion(&mut self, pos: Vec2) {
        for (ring, color) in BOSS_RINGS.iter().enumerate() {
            self.pending.schedule(
                ring as u32 * 6,
                Burst::Explode {
                    pos,
                    color: *color,
                    count: 50,
                    options: BurstOptions {
                        speed: Some(6.0 + ring as f32 * 2.0),
                        life: 60.0,
                        size: Some(5.0 - ring as f32 * 0.5),
                        ..Default::default()
                    },
                },
            );
        }
    }

    /// Engine exhaust cone around `angle`
    pub fn thrust(&mut self, pos: Vec2, angle: f32, color: Color) {
        for _ in 0..3 {
            let a = angle + (self.rng.random::<f32>() - 0.5) * 0.3;
            let speed = self.rng.random::<f32>() * 2.0 + 1.0;
            let size = self.rng.random::<f32>() * 2.0 + 1.0;
            let mut p = Particle::new(pos, from_angle(a) * speed, color, 15.0, size);
            p.glow = true;
            self.push(p);
        }
        self.enforce_cap();
    }

    pub fn hit_spark(&mut self, pos: Vec2, color: Color) {
        for _ in 0..8 {
            let angle = self.rng.random::<f32>() * TAU;
            let speed = self.rng.random::<f32>() * 5.0 + 3.0;
            let mut p = Particle::new(pos, from_angle(angle) * speed, color, 15.0, 2.0);
            p.glow = true;
            self.push(p);
        }
        self.enforce_cap();
    }

    /// Ring of trailing sparks
    pub fn power_up_collect(&mut self, pos: Vec2, color: Color) {
        for i in 0..20 {
            let angle = TAU / 20.0 * i as f32;
            let speed = self.rng.random::<f32>() * 3.0 + 2.0;
            let mut p = Particle::new(pos, from_angle(angle) * speed, color, 30.0, 3.0);
            p.glow = true;
            p.trail_length = 8;
            self.push(p);
        }
        self.enforce_cap();
    }

    /// Fireworks rising from the bottom edge, one every ~2 frames
    pub fn celebrate(&mut self, width: f32, height: f32) {
        for i in 0..100u32 {
            self.pending
                .schedule(i * 9 / 5, Burst::Confetti { width, height });
        }
    }

    fn confetti(&mut self, width: f32, height: f32) {
        let pos = Vec2::new(self.rng.random::<f32>() * width, height + 10.0);
        let vel = Vec2::new(
            (self.rng.random::<f32>() - 0.5) * 3.0,
            -self.rng.random::<f32>() * 8.0 - 5.0,
        );
        let color = CONFETTI[self.rng.random_range(0..CONFETTI.len())];
        let size = self.rng.random::<f32>() * 4.0 + 2.0;
        let mut p = Particle::new(pos, vel, color, 80.0, size);
        p.glow = true;
        p.gravity = 0.1;
        p.trail_length = 10;
        self.push(p);
        self.enforce_cap();
    }

    /// Cosmetic coin flip on the particle RNG
    pub fn roll(&mut self, chance: f32) -> bool {
        self.rng.random::<f32>() < chance
    }

    /// Slow rising smoke puff somewhere inside `center ± spread / 2`
    pub fn smoke(&mut self, center: Vec2, spread: Vec2) {
        let offset = Vec2::new(
            (self.rng.random::<f32>() - 0.5) * spread.x,
            self.rng.random::<f32>() * spread.y / 2.0,
        );
        let size = 5.0 + self.rng.random::<f32>() * 10.0;
        let mut p = Particle::new(center + offset, Vec2::new(0.0, -0.5), Color::GREY, 30.0, size);
        p.friction = 1.0;
        p.shrink = false;
        self.push(p);
        self.enforce_cap();
    }

    /// Short-lived spark falling from a wrecked component
    pub fn ember(&mut self, pos: Vec2, color: Color) {
        let vel = Vec2::new(
            (self.rng.random::<f32>() - 0.5) * 3.0,
            self.rng.random::<f32>() * 2.0,
        );
        let mut p = Particle::new(pos, vel, color, 10.0, 2.0);
        p.friction = 1.0;
        p.glow = true;
        self.push(p);
        self.enforce_cap();
    }

    /// Vector-style debris: straight lines, constant size, fading out
    pub fn debris(&mut self, pos: Vec2, color: Color, count: u32) {
        for _ in 0..count {
            let dir = from_angle(self.rng.random::<f32>() * TAU);
            let vel = dir * (self.rng.random::<f32>() * 3.0);
            let p = self.fading(pos, vel, color);
            self.push(p);
        }
        self.enforce_cap();
    }

    /// Single exhaust puff opposite the ship heading
    pub fn exhaust(&mut self, pos: Vec2, heading: f32, color: Color) {
        let angle = heading + std::f32::consts::PI + (self.rng.random::<f32>() - 0.5);
        let p = self.fading(pos, from_angle(angle) * 2.0, color);
        self.push(p);
        self.enforce_cap();
    }

    fn fading(&mut self, pos: Vec2, vel: Vec2, color: Color) -> Particle {
        // Fades by 2-5% per frame
        let decay = 0.02 + self.rng.random::<f32>() * 0.03;
        let mut p = Particle::new(pos, vel, color, 1.0 / decay, 2.0);
        p.friction = 1.0;
        p.shrink = false;
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particles_expire() {
        let mut ps = ParticleSystem::new(1);
        ps.hit_spark(Vec2::ZERO, Color::WHITE);
        assert_eq!(ps.len(), 8);
        for _ in 0..15 {
            ps.update();
        }
        assert!(ps.is_empty());
    }

    #[test]
    fn test_cull_leaves_only_live_particles() {
        let mut ps = ParticleSystem::new(7);
        ps.explode(Vec2::new(100.0, 100.0), Color::RED, 30);
        ps.thrust(Vec2::ZERO, 1.0, Color::CYAN);
        for _ in 0..20 {
            ps.update();
            assert!(ps.particles.iter().all(|p| !p.is_dead()));
        }
    }

    #[test]
    fn test_big_explosion_follow_ups() {
        let mut ps = ParticleSystem::new(3);
        ps.big_explosion(Vec2::ZERO);
        assert_eq!(ps.len(), 50);
        for _ in 0..10 {
            ps.update();
        }
        // Flash particles gone, fireball alive, embers and smoke added
        assert_eq!(ps.len(), 40 + 20 + 15);
    }

    #[test]
    fn test_clear_cancels_pending_bursts() {
        let mut ps = ParticleSystem::new(3);
        ps.celebrate(800.0, 600.0);
        ps.update();
        assert!(!ps.is_empty());
        ps.clear();
        for _ in 0..200 {
            ps.update();
        }
        assert!(ps.is_empty());
    }

    #[test]
    fn test_cap_drops_oldest() {
        let mut ps = ParticleSystem::new(5);
        ps.set_max_particles(25);
        ps.explode(Vec2::ZERO, Color::RED, 20);
        ps.explode(Vec2::ONE, Color::CYAN, 20);
        assert_eq!(ps.len(), 25);
        assert_eq!(ps.particles[0].color, Color::RED);
        assert_eq!(ps.particles[24].color, Color::CYAN);
    }
}
