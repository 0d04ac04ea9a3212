//! The Mothership: final boss with three cores, three phases and a
//! per-phase attack pool.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::InvaderTimer;
use super::state::Projectile;
use crate::Color;
use crate::sim::{ParticleSystem, Rect, circles_overlap};

pub const BOSS_WIDTH: f32 = 200.0;
pub const BOSS_HEIGHT: f32 = 100.0;
const SPAWN_Y: f32 = -150.0;
const TARGET_Y: f32 = 80.0;
const ENTRY_SPEED: f32 = 2.0;
const PHASE_TRANSITION_FRAMES: u32 = 60;
pub const EMP_FRAMES: u32 = 120;

const SIDE_CORE_HP: u32 = 15;
const MAIN_CORE_HP: u32 = 70;
const SIDE_CORE_RADIUS: f32 = 20.0;
const MAIN_CORE_RADIUS: f32 = 30.0;

const LASER_WIDTH: f32 = 60.0;
const MULTI_LASER_WIDTH: f32 = 50.0;
const LASER_CHARGE_FRAMES: u32 = 60;
const LASER_ACTIVE_FRAMES: u32 = 120;
const LASER_DECAY_FRAMES: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoreId {
    Left,
    Right,
    Main,
}

/// Destructible weak point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Core {
    pub id: CoreId,
    /// Centre relative to the boss
    pub offset: Vec2,
    pub radius: f32,
    pub hp: u32,
    pub max_hp: u32,
    pub destroyed: bool,
}

impl Core {
    fn new(id: CoreId) -> Self {
        let (offset, radius, hp) = match id {
            CoreId::Left => (Vec2::new(-60.0, 20.0), SIDE_CORE_RADIUS, SIDE_CORE_HP),
            CoreId::Right => (Vec2::new(60.0, 20.0), SIDE_CORE_RADIUS, SIDE_CORE_HP),
            CoreId::Main => (Vec2::new(0.0, 10.0), MAIN_CORE_RADIUS, MAIN_CORE_HP),
        };
        Self {
            id,
            offset,
            radius,
            hp,
            max_hp: hp,
            destroyed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BossAttack {
    /// Radial ring of bullets
    Spread,
    /// Three-bullet burst at the player
    Aimed,
    Laser,
    /// Three staggered lasers
    MultiLaser,
    Homing,
    Minions,
    /// Three staggered 16-bullet fans
    BulletHell,
    /// Visual shockwave
    Emp,
}

impl BossAttack {
    pub fn pool(phase: u8) -> &'static [BossAttack] {
        use BossAttack::*;
        match phase {
            1 => &[Spread, Aimed, Minions],
            2 => &[Spread, Aimed, Laser, Minions, Homing],
            3 => &[BulletHell, Laser, Homing, Emp, MultiLaser],
            _ => &[Spread],
        }
    }

    /// Frames before the next attack
    pub fn cooldown(self) -> u32 {
        match self {
            BossAttack::Spread => 60,
            BossAttack::Aimed => 30,
            BossAttack::Laser => 180,
            BossAttack::MultiLaser => 240,
            BossAttack::Homing => 90,
            BossAttack::Minions => 120,
            BossAttack::BulletHell => 120,
            BossAttack::Emp => 180,
        }
    }

    /// Later stages, as (delay in frames, timer). The first stage fires
    /// immediately.
    pub fn follow_ups(self) -> &'static [(u32, InvaderTimer)] {
        match self {
            BossAttack::MultiLaser => &[
                (12, InvaderTimer::BossLaser { offset: 0.0 }),
                (24, InvaderTimer::BossLaser { offset: 80.0 }),
            ],
            BossAttack::BulletHell => &[
                (9, InvaderTimer::BossBulletWave { wave: 1 }),
                (18, InvaderTimer::BossBulletWave { wave: 2 }),
            ],
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaserStage {
    /// Telegraph line, harmless
    Charging,
    /// Full beam, damages
    Active,
    /// Shrinking beam, harmless
    Decay,
    Spent,
}

/// Vertical beam fired down from the boss
#[derive(Debug, Clone, PartialEq)]
pub struct LaserBeam {
    pub x: f32,
    pub start_y: f32,
    pub end_y: f32,
    pub target_width: f32,
    pub width: f32,
    pub stage: LaserStage,
    /// Frames spent in the current stage
    pub timer: u32,
    pub warning_alpha: f32,
}

impl LaserBeam {
    pub fn new(x: f32, start_y: f32, end_y: f32, width: f32) -> Self {
        Self {
            x,
            start_y,
            end_y,
            target_width: width,
            width: 0.0,
            stage: LaserStage::Charging,
            timer: 0,
            warning_alpha: 0.0,
        }
    }

    pub fn update(&mut self, rng: &mut Pcg32) {
        self.timer += 1;
        match self.stage {
            LaserStage::Charging => {
                self.warning_alpha = 0.3 + (self.timer as f32 * 0.3).sin() * 0.2;
                if self.timer >= LASER_CHARGE_FRAMES {
                    self.stage = LaserStage::Active;
                    self.timer = 0;
                    self.width = self.target_width;
                }
            }
            LaserStage::Active => {
                self.width = self.target_width * (0.8 + rng.random::<f32>() * 0.4);
                if self.timer >= LASER_ACTIVE_FRAMES {
                    self.stage = LaserStage::Decay;
                    self.timer = 0;
                }
            }
            LaserStage::Decay => {
                let left = LASER_DECAY_FRAMES.saturating_sub(self.timer) as f32;
                self.width = self.target_width * left / LASER_DECAY_FRAMES as f32;
                if self.timer >= LASER_DECAY_FRAMES {
                    self.stage = LaserStage::Spent;
                    self.width = 0.0;
                }
            }
            LaserStage::Spent => {}
        }
    }

    /// Damage area; `None` unless the beam is active
    pub fn bounds(&self) -> Option<Rect> {
        (self.stage == LaserStage::Active).then(|| {
            Rect::new(
                self.x - self.width / 2.0,
                self.start_y,
                self.width,
                self.end_y - self.start_y,
            )
        })
    }

    pub fn is_spent(&self) -> bool {
        self.stage == LaserStage::Spent
    }
}

/// What the boss did this frame
#[derive(Debug, Default)]
pub struct BossStep {
    pub projectiles: Vec<Projectile>,
    pub attack: Option<BossAttack>,
    /// New phase entered this frame
    pub phase_changed: Option<u8>,
}

#[derive(Debug, Clone)]
pub struct Boss {
    pub pos: Vec2,
    pub field_width: f32,
    pub field_height: f32,
    pub cores: [Core; 3],
    /// Sum of remaining core hp
    pub hp: u32,
    pub max_hp: u32,
    pub main_vulnerable: bool,
    pub phase: u8,
    pub transition_timer: u32,
    pub entering: bool,
    pub move_phase: f32,
    pub attack_cooldown: u32,
    pub lasers: Vec<LaserBeam>,
    pub spawn_minions: bool,
    pub emp_timer: u32,
    pub hit_flash: u32,
    pub alive: bool,
}

impl Boss {
    pub fn new(field_width: f32, field_height: f32) -> Self {
        let cores = [
            Core::new(CoreId::Left),
            Core::new(CoreId::Right),
            Core::new(CoreId::Main),
        ];
        let max_hp = cores.iter().map(|c| c.max_hp).sum();
        Self {
            pos: Vec2::new(field_width / 2.0, SPAWN_Y),
            field_width,
            field_height,
            cores,
            hp: max_hp,
            max_hp,
            main_vulnerable: false,
            phase: 1,
            transition_timer: 0,
            entering: true,
            move_phase: 0.0,
            attack_cooldown: 0,
            lasers: Vec::new(),
            spawn_minions: false,
            emp_timer: 0,
            hit_flash: 0,
            alive: true,
        }
    }

    pub fn core(&self, id: CoreId) -> &Core {
        &self.cores[Self::core_index(id)]
    }

    fn core_index(id: CoreId) -> usize {
        match id {
            CoreId::Left => 0,
            CoreId::Right => 1,
            CoreId::Main => 2,
        }
    }

    pub fn transitioning(&self) -> bool {
        self.transition_timer > 0
    }

    pub fn health_fraction(&self) -> f32 {
        self.hp as f32 / self.max_hp as f32
    }

    pub fn core_center(&self, id: CoreId) -> Vec2 {
        self.pos + self.core(id).offset
    }

    /// Whether `id` can currently take damage
    pub fn core_targetable(&self, id: CoreId) -> bool {
        let core = self.core(id);
        !core.destroyed && (id != CoreId::Main || self.main_vulnerable)
    }

    /// Targetable core whose circle contains `point`, side cores first
    pub fn core_at(&self, point: Vec2) -> Option<CoreId> {
        self.cores
            .iter()
            .filter(|c| self.core_targetable(c.id))
            .find(|c| circles_overlap(point, 0.0, self.pos + c.offset, c.radius))
            .map(|c| c.id)
    }

    /// Damage a core. `None` if it cannot be hit; otherwise whether this
    /// hit destroyed it. Destroying the main core kills the boss.
    pub fn hit_core(&mut self, id: CoreId, damage: u32) -> Option<bool> {
        if !self.core_targetable(id) {
            return None;
        }
        let core = &mut self.cores[Self::core_index(id)];
        core.hp = core.hp.saturating_sub(damage);
        core.destroyed = core.hp == 0;
        let destroyed = core.destroyed;
        self.hit_flash = 10;

        self.hp = self.cores.iter().map(|c| c.hp).sum();
        if destroyed && id == CoreId::Main {
            self.hp = 0;
            self.alive = false;
        }
        Some(destroyed)
    }

    pub fn bounds(&self) -> Rect {
        Rect::centered(self.pos, BOSS_WIDTH, BOSS_HEIGHT)
    }

    pub fn update(&mut self, player_pos: Vec2, rng: &mut Pcg32) -> BossStep {
        let mut step = BossStep::default();
        if !self.alive {
            return step;
        }

        if self.entering {
            self.pos.y += ENTRY_SPEED;
            if self.pos.y >= TARGET_Y {
                self.pos.y = TARGET_Y;
                self.entering = false;
            }
            return step;
        }

        for laser in &mut self.lasers {
            laser.update(rng);
        }
        self.lasers.retain(|l| !l.is_spent());
        self.hit_flash = self.hit_flash.saturating_sub(1);
        self.emp_timer = self.emp_timer.saturating_sub(1);

        if self.transition_timer > 0 {
            self.transition_timer -= 1;
            return step;
        }

        step.phase_changed = self.update_phase();
        if step.phase_changed.is_some() {
            return step;
        }

        self.move_phase += 0.02;
        let sway = if self.phase == 3 { 150.0 } else { 100.0 };
        self.pos.x = self.field_width / 2.0 + self.move_phase.sin() * sway;

        if self.attack_cooldown > 0 {
            self.attack_cooldown -= 1;
            return step;
        }

        let pool = BossAttack::pool(self.phase);
        let attack = pool[rng.random_range(0..pool.len())];
        step.projectiles = self.execute(attack, player_pos);
        step.attack = Some(attack);
        step
    }

    fn update_phase(&mut self) -> Option<u8> {
        if self.core(CoreId::Left).destroyed && self.core(CoreId::Right).destroyed {
            self.main_vulnerable = true;
        }

        let fraction = self.health_fraction();
        let next = if fraction <= 0.33 && self.phase < 3 {
            3
        } else if fraction <= 0.66 && self.phase < 2 {
            2
        } else {
            return None;
        };

        log::debug!("Mothership entering phase {next} at {:.0}% hp", fraction * 100.0);
        self.phase = next;
        self.transition_timer = PHASE_TRANSITION_FRAMES;
        Some(next)
    }

    /// Run the first stage of `attack` and set the cooldown
    pub fn execute(&mut self, attack: BossAttack, player_pos: Vec2) -> Vec<Projectile> {
        self.attack_cooldown = attack.cooldown();
        match attack {
            BossAttack::Spread => self.spread(),
            BossAttack::Aimed => self.aimed(player_pos),
            BossAttack::Laser => {
                self.fire_laser(0.0, LASER_WIDTH);
                Vec::new()
            }
            BossAttack::MultiLaser => {
                self.fire_laser(-80.0, MULTI_LASER_WIDTH);
                Vec::new()
            }
            BossAttack::Homing => self.homing(),
            BossAttack::Minions => {
                self.spawn_minions = true;
                Vec::new()
            }
            BossAttack::BulletHell => self.bullet_wave(0),
            BossAttack::Emp => {
                self.emp_timer = EMP_FRAMES;
                Vec::new()
            }
        }
    }

    fn spread(&self) -> Vec<Projectile> {
        let count = 8 + 4 * self.phase as u32;
        let origin = self.pos + Vec2::new(0.0, 30.0);
        (0..count)
            .map(|i| {
                let angle = TAU / count as f32 * i as f32 + FRAC_PI_2;
                Projectile::hostile(
                    origin,
                    crate::from_angle(angle) * 3.0,
                    6.0,
                    6.0,
                    Color::hex(0xff4444),
                )
            })
            .collect()
    }

    fn aimed(&self, player_pos: Vec2) -> Vec<Projectile> {
        let dir = (player_pos - self.pos).normalize_or(Vec2::Y);
        let origin = self.pos + Vec2::new(0.0, 40.0);
        (-1..=1)
            .map(|i| {
                let vel = dir * 5.0 + Vec2::new(i as f32 * 0.2, 0.0);
                Projectile::hostile(origin, vel, 5.0, 12.0, Color::hex(0xff8800))
            })
            .collect()
    }

    fn homing(&self) -> Vec<Projectile> {
        [-1.0f32, 1.0]
            .iter()
            .map(|side| {
                Projectile::hostile(
                    self.pos + Vec2::new(side * 50.0, 30.0),
                    Vec2::new(side * 2.0, 2.0),
                    8.0,
                    16.0,
                    Color::MAGENTA,
                )
                .homing(0.15, 300)
            })
            .collect()
    }

    /// Laser at `offset` from the boss's current x
    pub fn fire_laser(&mut self, offset: f32, width: f32) {
        self.lasers.push(LaserBeam::new(
            self.pos.x + offset,
            self.pos.y + 50.0,
            self.field_height,
            width,
        ));
    }

    pub fn multi_laser_stage(&mut self, offset: f32) {
        self.fire_laser(offset, MULTI_LASER_WIDTH);
    }

    /// One 16-bullet half-ring fan; later waves are rotated slightly
    pub fn bullet_wave(&self, wave: u32) -> Vec<Projectile> {
        const COUNT: u32 = 16;
        let origin = self.pos + Vec2::new(0.0, 40.0);
        (0..COUNT)
            .map(|i| {
                let angle = PI / COUNT as f32 * i as f32 + FRAC_PI_2 + wave as f32 * 0.1;
                Projectile::hostile(
                    origin,
                    crate::from_angle(angle) * 4.0,
                    5.0,
                    5.0,
                    Color::hex(0xff0066),
                )
            })
            .collect()
    }

    /// Consume the minion-spawn request
    pub fn take_minion_request(&mut self) -> bool {
        std::mem::take(&mut self.spawn_minions)
    }

    /// Damage smoke and sparks from wrecked cores
    pub fn emit_damage_effects(&self, particles: &mut ParticleSystem) {
        if self.hp * 2 < self.max_hp && particles.roll(0.1) {
            particles.smoke(
                self.pos - Vec2::new(0.0, BOSS_HEIGHT / 4.0),
                Vec2::new(BOSS_WIDTH, BOSS_HEIGHT),
            );
        }
        for id in [CoreId::Left, CoreId::Right] {
            if self.core(id).destroyed && particles.roll(0.1) {
                particles.ember(self.core_center(id), Color::YELLOW);
            }
        }
    }

    /// EMP ring radius and alpha while the shockwave is showing
    pub fn emp_wave(&self) -> Option<(f32, f32)> {
        (self.emp_timer > 0).then(|| {
            let elapsed = (EMP_FRAMES - self.emp_timer) as f32;
            (elapsed * 5.0, self.emp_timer as f32 / EMP_FRAMES as f32)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn arrived_boss() -> Boss {
        let mut boss = Boss::new(800.0, 600.0);
        boss.pos.y = TARGET_Y;
        boss.entering = false;
        boss
    }

    #[test]
    fn test_entry_descends_to_target() {
        let mut boss = Boss::new(800.0, 600.0);
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..115 {
            let step = boss.update(Vec2::ZERO, &mut rng);
            assert!(step.attack.is_none());
        }
        assert!(!boss.entering);
        assert_eq!(boss.pos.y, TARGET_Y);
    }

    #[test]
    fn test_main_core_shielded_until_side_cores_fall() {
        let mut boss = arrived_boss();
        let mut rng = Pcg32::seed_from_u64(2);
        assert_eq!(boss.hit_core(CoreId::Main, 1), None);
        assert_eq!(boss.core_at(boss.core_center(CoreId::Main)), None);

        assert_eq!(boss.hit_core(CoreId::Left, 14), Some(false));
        assert_eq!(boss.hit_core(CoreId::Left, 1), Some(true));
        assert_eq!(boss.hit_core(CoreId::Left, 1), None);
        assert_eq!(boss.hit_core(CoreId::Right, 15), Some(true));

        // Vulnerability is picked up by the next update
        assert_eq!(boss.hit_core(CoreId::Main, 1), None);
        boss.update(Vec2::ZERO, &mut rng);
        assert!(boss.main_vulnerable);
        assert_eq!(
            boss.core_at(boss.core_center(CoreId::Main)),
            Some(CoreId::Main)
        );
        assert_eq!(boss.hit_core(CoreId::Main, 69), Some(false));
        assert!(boss.alive);
        assert_eq!(boss.hit_core(CoreId::Main, 1), Some(true));
        assert!(!boss.alive);
        assert_eq!(boss.hp, 0);
    }

    #[test]
    fn test_phase_thresholds() {
        let mut boss = arrived_boss();
        let mut rng = Pcg32::seed_from_u64(3);

        // 100 -> 70: still phase 1
        boss.hit_core(CoreId::Left, 15);
        boss.hit_core(CoreId::Right, 15);
        assert_eq!(boss.hp, 70);
        assert_eq!(boss.update(Vec2::ZERO, &mut rng).phase_changed, None);

        // 66%
        boss.hit_core(CoreId::Main, 4);
        assert_eq!(boss.update(Vec2::ZERO, &mut rng).phase_changed, Some(2));
        assert!(boss.transitioning());
        for _ in 0..PHASE_TRANSITION_FRAMES {
            assert!(boss.update(Vec2::ZERO, &mut rng).attack.is_none());
        }
        assert!(!boss.transitioning());

        // 33%
        boss.hit_core(CoreId::Main, 33);
        assert_eq!(boss.update(Vec2::ZERO, &mut rng).phase_changed, Some(3));
        assert_eq!(boss.phase, 3);
    }

    #[test]
    fn test_phase_skips_straight_to_three() {
        let mut boss = arrived_boss();
        let mut rng = Pcg32::seed_from_u64(3);
        boss.hp = 30;
        assert_eq!(boss.update(Vec2::ZERO, &mut rng).phase_changed, Some(3));
    }

    #[test]
    fn test_laser_damages_only_while_active() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut laser = LaserBeam::new(400.0, 130.0, 600.0, 60.0);
        for _ in 0..LASER_CHARGE_FRAMES - 1 {
            laser.update(&mut rng);
            assert!(laser.bounds().is_none());
        }
        laser.update(&mut rng);
        assert_eq!(laser.stage, LaserStage::Active);
        for _ in 0..LASER_ACTIVE_FRAMES - 1 {
            laser.update(&mut rng);
            let bounds = laser.bounds().unwrap();
            assert!(bounds.w >= 48.0 && bounds.w <= 72.0);
        }
        laser.update(&mut rng);
        assert_eq!(laser.stage, LaserStage::Decay);
        assert!(laser.bounds().is_none());
        for _ in 0..LASER_DECAY_FRAMES {
            laser.update(&mut rng);
            assert!(laser.bounds().is_none());
        }
        assert!(laser.is_spent());
    }

    #[test]
    fn test_spread_count_scales_with_phase() {
        let mut boss = arrived_boss();
        assert_eq!(boss.execute(BossAttack::Spread, Vec2::ZERO).len(), 12);
        boss.phase = 3;
        assert_eq!(boss.execute(BossAttack::Spread, Vec2::ZERO).len(), 20);
        assert_eq!(boss.attack_cooldown, 60);
    }

    #[test]
    fn test_attack_pools_by_phase() {
        assert!(!BossAttack::pool(1).contains(&BossAttack::Laser));
        assert!(BossAttack::pool(2).contains(&BossAttack::Homing));
        assert!(BossAttack::pool(3).contains(&BossAttack::MultiLaser));
        assert_eq!(BossAttack::MultiLaser.follow_ups().len(), 2);
        assert!(BossAttack::Spread.follow_ups().is_empty());
    }

    #[test]
    fn test_minion_request_consumed_once() {
        let mut boss = arrived_boss();
        boss.execute(BossAttack::Minions, Vec2::ZERO);
        assert!(boss.take_minion_request());
        assert!(!boss.take_minion_request());
    }
}
