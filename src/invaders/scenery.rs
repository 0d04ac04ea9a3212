//! Parallax starfield and per-level backdrops
//!
//! Purely cosmetic. Owns its own RNG so drawing detail never shifts the
//! gameplay random stream.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::Color;

const SHOOTING_STAR_CHANCE: f32 = 0.002;
const ROCK_CHANCE: f32 = 0.01;
const PLANET_CHANCE: f32 = 0.0005;
const MAX_PLANETS: usize = 2;
const SPEED_LINES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StarLayer {
    Far,
    Mid,
    /// Twinkles
    Near,
    Shooting,
}

#[derive(Debug, Clone)]
pub struct Star {
    pub pos: Vec2,
    pub layer: StarLayer,
    pub size: f32,
    pub speed: f32,
    pub brightness: f32,
    pub twinkle_phase: f32,
    pub twinkle_speed: f32,
    pub trail_length: f32,
}

impl Star {
    fn new(layer: StarLayer, width: f32, y: f32, rng: &mut Pcg32) -> Self {
        let mut star = Self {
            pos: Vec2::new(rng.random::<f32>() * width, y),
            layer,
            size: 1.0,
            speed: 0.0,
            brightness: 1.0,
            twinkle_phase: 0.0,
            twinkle_speed: 0.0,
            trail_length: 0.0,
        };
        match layer {
            StarLayer::Far => {
                star.size = rng.random::<f32>() + 0.5;
                star.speed = 0.2;
                star.brightness = 0.3 + rng.random::<f32>() * 0.3;
            }
            StarLayer::Mid => {
                star.size = rng.random::<f32>() * 1.5 + 0.5;
                star.speed = 0.5;
                star.brightness = 0.5 + rng.random::<f32>() * 0.3;
            }
            StarLayer::Near => {
                star.size = rng.random::<f32>() * 2.0 + 1.0;
                star.speed = 1.0;
                star.brightness = 0.7 + rng.random::<f32>() * 0.3;
                star.twinkle_phase = rng.random::<f32>() * TAU;
                star.twinkle_speed = rng.random::<f32>() * 0.1 + 0.05;
            }
            StarLayer::Shooting => {
                star.size = rng.random::<f32>() * 2.0 + 2.0;
                star.speed = 3.0 + rng.random::<f32>() * 2.0;
                star.trail_length = 20.0 + rng.random::<f32>() * 30.0;
            }
        }
        star
    }

    pub fn alpha(&self) -> f32 {
        if self.layer == StarLayer::Near {
            self.brightness * (0.5 + 0.5 * self.twinkle_phase.sin())
        } else {
            self.brightness
        }
    }
}

#[derive(Debug, Clone)]
pub struct Nebula {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Color,
    pub drift: f32,
    pub opacity: f32,
}

const NEBULA_COLORS: [Color; 5] = [
    Color::hex(0x8000ff),
    Color::hex(0x0064ff),
    Color::hex(0xff0080),
    Color::hex(0x00c8c8),
    Color::hex(0xff6400),
];

/// Background rock drifting past on asteroid-belt levels
#[derive(Debug, Clone)]
pub struct Rock {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
    pub rotation: f32,
    pub spin: f32,
    /// Outline relative to the centre
    pub vertices: Vec<Vec2>,
}

#[derive(Debug, Clone)]
pub struct Planet {
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub color: Color,
    pub ringed: bool,
}

const PLANET_COLORS: [Color; 6] = [
    Color::hex(0x8b4513),
    Color::hex(0xcd853f),
    Color::hex(0x4169e1),
    Color::hex(0x228b22),
    Color::hex(0xff6347),
    Color::hex(0x9370db),
];

/// Per-level look
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Environment {
    pub star_color: Color,
    pub bg_color: Color,
    pub nebula: bool,
    pub rocks: bool,
    pub speed_lines: bool,
    pub lightning: bool,
}

impl Environment {
    pub fn for_level(level: u32) -> Self {
        let base = Self {
            star_color: Color::hex(0xaaddff),
            bg_color: Color::hex(0x050510),
            nebula: false,
            rocks: false,
            speed_lines: false,
            lightning: false,
        };
        match level {
            2 => Self {
                bg_color: Color::hex(0x050515),
                ..base
            },
            3 | 4 => Self {
                star_color: Color::hex(0xffccff),
                bg_color: Color::hex(if level == 3 { 0x100520 } else { 0x150525 }),
                nebula: true,
                ..base
            },
            5 | 6 => Self {
                star_color: Color::hex(0xffaa77),
                bg_color: Color::hex(if level == 5 { 0x151005 } else { 0x1a1508 }),
                rocks: true,
                ..base
            },
            7 | 8 => Self {
                star_color: Color::hex(0x77ffaa),
                bg_color: Color::hex(if level == 7 { 0x051510 } else { 0x081a15 }),
                nebula: true,
                ..base
            },
            9 => Self {
                star_color: Color::hex(0xff77ff),
                bg_color: Color::hex(0x200530),
                nebula: true,
                speed_lines: true,
                ..base
            },
            10 => Self {
                star_color: Color::hex(0xff4444),
                bg_color: Color::hex(0x1a0505),
                lightning: true,
                ..base
            },
            _ => base,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Scenery {
    pub width: f32,
    pub height: f32,
    pub stars: Vec<Star>,
    pub nebulae: Vec<Nebula>,
    pub rocks: Vec<Rock>,
    pub planets: Vec<Planet>,
    /// (start, length) of this frame's warp streaks
    pub speed_lines: Vec<(Vec2, f32)>,
    pub environment: Environment,
    pub lightning_timer: u32,
    /// Frames of red flash left
    pub lightning_flash: u32,
    rng: Pcg32,
}

impl Scenery {
    pub fn new(width: f32, height: f32, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed.wrapping_add(0x5eed));
        let mut stars = Vec::with_capacity(100);
        for (layer, count) in [(StarLayer::Far, 50), (StarLayer::Mid, 30), (StarLayer::Near, 20)] {
            for _ in 0..count {
                let y = rng.random::<f32>() * height;
                stars.push(Star::new(layer, width, y, &mut rng));
            }
        }

        let nebulae = (0..3)
            .map(|_| Nebula {
                pos: Vec2::new(
                    rng.random::<f32>() * width,
                    rng.random::<f32>() * height * 0.6,
                ),
                radius: 100.0 + rng.random::<f32>() * 200.0,
                color: NEBULA_COLORS[rng.random_range(0..NEBULA_COLORS.len())],
                drift: (rng.random::<f32>() - 0.5) * 0.2,
                opacity: 0.1 + rng.random::<f32>() * 0.1,
            })
            .collect();

        Self {
            width,
            height,
            stars,
            nebulae,
            rocks: Vec::new(),
            planets: Vec::new(),
            speed_lines: Vec::new(),
            environment: Environment::for_level(1),
            lightning_timer: 0,
            lightning_flash: 0,
            rng,
        }
    }

    pub fn set_level(&mut self, level: u32) {
        self.environment = Environment::for_level(level);
        self.rocks.clear();
        self.lightning_timer = 0;
        self.lightning_flash = 0;
    }

    pub fn update(&mut self) {
        let (width, height) = (self.width, self.height);

        for i in 0..self.stars.len() {
            let star = &mut self.stars[i];
            star.pos.y += star.speed;
            star.twinkle_phase += star.twinkle_speed;
            if star.pos.y > height + 10.0 && star.layer != StarLayer::Shooting {
                let layer = star.layer;
                self.stars[i] = Star::new(layer, width, -5.0, &mut self.rng);
            }
        }
        self.stars
            .retain(|s| s.layer != StarLayer::Shooting || s.pos.y <= height + 10.0);

        if self.rng.random::<f32>() < SHOOTING_STAR_CHANCE {
            let star = Star::new(StarLayer::Shooting, width, -5.0, &mut self.rng);
            self.stars.push(star);
        }

        if self.environment.nebula {
            for nebula in &mut self.nebulae {
                nebula.pos.x += nebula.drift;
                nebula.pos.x = crate::wrap_coord(nebula.pos.x, width, nebula.radius);
            }
        }

        if self.environment.rocks && self.rng.random::<f32>() < ROCK_CHANCE {
            let rock = self.spawn_rock();
            self.rocks.push(rock);
        }
        for rock in &mut self.rocks {
            rock.pos.y += rock.speed;
            rock.rotation += rock.spin;
        }
        self.rocks.retain(|r| r.pos.y < height + 50.0);

        if self.planets.len() < MAX_PLANETS && self.rng.random::<f32>() < PLANET_CHANCE {
            let planet = Planet {
                pos: Vec2::new(self.rng.random::<f32>() * width, -100.0),
                radius: 30.0 + self.rng.random::<f32>() * 50.0,
                speed: 0.1 + self.rng.random::<f32>() * 0.1,
                color: PLANET_COLORS[self.rng.random_range(0..PLANET_COLORS.len())],
                ringed: self.rng.random::<f32>() > 0.7,
            };
            self.planets.push(planet);
        }
        for planet in &mut self.planets {
            planet.pos.y += planet.speed;
        }
        self.planets.retain(|p| p.pos.y < height + 100.0);

        self.speed_lines.clear();
        if self.environment.speed_lines {
            for _ in 0..SPEED_LINES {
                let start = Vec2::new(
                    self.rng.random::<f32>() * width,
                    self.rng.random::<f32>() * height,
                );
                let length = 50.0 + self.rng.random::<f32>() * 100.0;
                self.speed_lines.push((start, length));
            }
        }

        if self.environment.lightning {
            self.lightning_timer += 1;
            if self.lightning_timer > 60 && self.rng.random::<f32>() < 0.02 {
                self.lightning_flash = 10;
                self.lightning_timer = 0;
            }
            self.lightning_flash = self.lightning_flash.saturating_sub(1);
        }
    }

    fn spawn_rock(&mut self) -> Rock {
        let size = 10.0 + self.rng.random::<f32>() * 20.0;
        let corners = 6 + self.rng.random_range(0..4);
        let vertices = (0..corners)
            .map(|i| {
                let angle = TAU / corners as f32 * i as f32;
                crate::from_angle(angle) * size * (0.7 + self.rng.random::<f32>() * 0.3)
            })
            .collect();
        Rock {
            pos: Vec2::new(self.rng.random::<f32>() * self.width, -30.0),
            size,
            speed: 1.0 + self.rng.random::<f32>(),
            rotation: 0.0,
            spin: (self.rng.random::<f32>() - 0.5) * 0.05,
            vertices,
        }
    }
}
