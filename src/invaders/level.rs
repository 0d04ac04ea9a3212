//! Level table and wave/formation generator

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{Enemy, EnemyKind};

/// Grid spacing between formation slots
pub const GRID_SPACING_X: f32 = 55.0;
pub const GRID_SPACING_Y: f32 = 45.0;
/// y of the first formation row
pub const GRID_TOP: f32 = 60.0;
/// Formation reverses before a member crosses this distance from either wall
pub const FORMATION_MARGIN: f32 = 50.0;
/// Vertical step on reversal
pub const FORMATION_DROP: f32 = 10.0;

/// Row the boss's minions spawn on
pub const MINION_ROW_Y: f32 = 150.0;
const MINION_SPACING: f32 = 50.0;

/// Static configuration for one level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelConfig {
    pub name: &'static str,
    pub rows: u32,
    pub cols: u32,
    /// (kind, weight) pairs; weights sum to 1
    pub weights: &'static [(EnemyKind, f32)],
    pub speed_multiplier: f32,
    pub shoot_multiplier: f32,
    pub boss: bool,
}

impl LevelConfig {
    pub fn enemy_count(&self) -> u32 {
        self.rows * self.cols
    }
}

use EnemyKind::{Basic, Elite, Fast};

pub const LEVELS: [LevelConfig; 10] = [
    LevelConfig {
        name: "Deep Space",
        rows: 4,
        cols: 6,
        weights: &[(Basic, 1.0)],
        speed_multiplier: 1.0,
        shoot_multiplier: 1.0,
        boss: false,
    },
    LevelConfig {
        name: "Deep Space",
        rows: 4,
        cols: 7,
        weights: &[(Basic, 1.0)],
        speed_multiplier: 1.1,
        shoot_multiplier: 1.2,
        boss: false,
    },
    LevelConfig {
        name: "Nebula Field",
        rows: 5,
        cols: 6,
        weights: &[(Basic, 0.7), (Fast, 0.3)],
        speed_multiplier: 1.2,
        shoot_multiplier: 1.3,
        boss: false,
    },
    LevelConfig {
        name: "Nebula Field",
        rows: 4,
        cols: 8,
        weights: &[(Basic, 0.6), (Fast, 0.4)],
        speed_multiplier: 1.3,
        shoot_multiplier: 1.4,
        boss: false,
    },
    LevelConfig {
        name: "Asteroid Belt",
        rows: 6,
        cols: 6,
        weights: &[(Basic, 0.5), (Fast, 0.3), (Elite, 0.2)],
        speed_multiplier: 1.3,
        shoot_multiplier: 1.5,
        boss: false,
    },
    LevelConfig {
        name: "Asteroid Belt",
        rows: 5,
        cols: 8,
        weights: &[(Basic, 0.4), (Fast, 0.3), (Elite, 0.3)],
        speed_multiplier: 1.4,
        shoot_multiplier: 1.6,
        boss: false,
    },
    LevelConfig {
        name: "Alien Territory",
        rows: 5,
        cols: 8,
        weights: &[(Basic, 0.3), (Fast, 0.4), (Elite, 0.3)],
        speed_multiplier: 1.5,
        shoot_multiplier: 1.7,
        boss: false,
    },
    LevelConfig {
        name: "Alien Territory",
        rows: 4,
        cols: 11,
        weights: &[(Basic, 0.2), (Fast, 0.4), (Elite, 0.4)],
        speed_multiplier: 1.6,
        shoot_multiplier: 1.8,
        boss: false,
    },
    LevelConfig {
        name: "Warp Zone",
        rows: 6,
        cols: 8,
        weights: &[(Fast, 0.5), (Elite, 0.5)],
        speed_multiplier: 1.8,
        shoot_multiplier: 2.0,
        boss: false,
    },
    LevelConfig {
        name: "Boss Lair",
        rows: 4,
        cols: 5,
        weights: &[(Fast, 0.6), (Elite, 0.4)],
        speed_multiplier: 1.5,
        shoot_multiplier: 1.5,
        boss: true,
    },
];

pub const FINAL_LEVEL: u32 = LEVELS.len() as u32;

/// Config for a 1-based level, clamped into the table
pub fn config_for(level: u32) -> &'static LevelConfig {
    let index = (level.max(1) as usize - 1).min(LEVELS.len() - 1);
    &LEVELS[index]
}

/// First kind whose cumulative weight reaches `roll` (in `[0, 1)`)
pub fn pick_enemy_kind(weights: &[(EnemyKind, f32)], roll: f32) -> EnemyKind {
    let mut cumulative = 0.0;
    for &(kind, weight) in weights {
        cumulative += weight;
        if roll <= cumulative {
            return kind;
        }
    }
    EnemyKind::Basic
}

/// Build the level's grid, horizontally centred
pub fn generate_enemies(config: &LevelConfig, field_width: f32, rng: &mut Pcg32) -> Vec<Enemy> {
    let start_x = (field_width - (config.cols as f32 - 1.0) * GRID_SPACING_X) / 2.0;
    let mut enemies = Vec::with_capacity(config.enemy_count() as usize);

    for row in 0..config.rows {
        for col in 0..config.cols {
            let pos = Vec2::new(
                start_x + col as f32 * GRID_SPACING_X,
                GRID_TOP + row as f32 * GRID_SPACING_Y,
            );
            let kind = pick_enemy_kind(config.weights, rng.random::<f32>());
            let mut enemy = Enemy::new(pos, kind, rng);
            enemy.shoot_chance *= config.shoot_multiplier;
            enemies.push(enemy);
        }
    }

    enemies
}

/// A row of 4..=6 minions under the boss
pub fn generate_minions(field_width: f32, rng: &mut Pcg32) -> Vec<Enemy> {
    let count = 4 + rng.random_range(0..3);
    (0..count)
        .map(|i| {
            let x = field_width / 2.0 + (i as f32 - count as f32 / 2.0) * MINION_SPACING;
            Enemy::new(Vec2::new(x, MINION_ROW_Y), EnemyKind::Minion, rng)
        })
        .collect()
}

/// Shared horizontal motion of the enemy grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Formation {
    pub vx: f32,
}

impl Formation {
    pub fn new(speed: f32) -> Self {
        Self { vx: speed }
    }

    /// Displacement for this frame. Reverses and steps down when the next
    /// move would carry a live member past the margin.
    pub fn step(&mut self, enemies: &[Enemy], field_width: f32) -> Vec2 {
        let mut live = enemies.iter().filter(|e| e.alive).peekable();
        if live.peek().is_none() {
            return Vec2::ZERO;
        }

        let (min_x, max_x) = live.fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), e| {
            (lo.min(e.pos.x), hi.max(e.pos.x))
        });

        if min_x + self.vx < FORMATION_MARGIN || max_x + self.vx > field_width - FORMATION_MARGIN {
            self.vx = -self.vx;
            Vec2::new(self.vx, FORMATION_DROP)
        } else {
            Vec2::new(self.vx, 0.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_level_table_counts() {
        let counts: Vec<u32> = LEVELS.iter().map(|l| l.enemy_count()).collect();
        assert_eq!(counts, vec![24, 28, 30, 32, 36, 40, 40, 44, 48, 20]);
        assert!(LEVELS[9].boss);
        assert!(LEVELS.iter().take(9).all(|l| !l.boss));
        for level in &LEVELS {
            let total: f32 = level.weights.iter().map(|(_, w)| w).sum();
            assert!((total - 1.0).abs() < 1e-5, "{} weights sum to {total}", level.name);
        }
    }

    #[test]
    fn test_cumulative_weight_sampling() {
        let weights = [(Basic, 0.5), (Fast, 0.3), (Elite, 0.2)];
        assert_eq!(pick_enemy_kind(&weights, 0.0), Basic);
        assert_eq!(pick_enemy_kind(&weights, 0.5), Basic);
        assert_eq!(pick_enemy_kind(&weights, 0.51), Fast);
        assert_eq!(pick_enemy_kind(&weights, 0.8), Fast);
        assert_eq!(pick_enemy_kind(&weights, 0.81), Elite);
        // Past the table falls back
        assert_eq!(pick_enemy_kind(&[(Fast, 0.5)], 0.9), Basic);
    }

    #[test]
    fn test_level_one_grid() {
        let mut rng = Pcg32::seed_from_u64(3);
        let enemies = generate_enemies(config_for(1), 800.0, &mut rng);
        assert_eq!(enemies.len(), 24);
        assert!(enemies.iter().all(|e| e.kind == Basic));
        // Centred: 6 columns span 275 px
        assert_eq!(enemies[0].pos, Vec2::new(262.5, 60.0));
        assert_eq!(enemies[23].pos, Vec2::new(537.5, 195.0));
    }

    #[test]
    fn test_shoot_multiplier_applied() {
        let mut rng = Pcg32::seed_from_u64(3);
        let enemies = generate_enemies(config_for(2), 800.0, &mut rng);
        assert!((enemies[0].shoot_chance - 0.002 * 1.2).abs() < 1e-7);
    }

    #[test]
    fn test_minion_row() {
        let mut rng = Pcg32::seed_from_u64(9);
        for _ in 0..20 {
            let minions = generate_minions(800.0, &mut rng);
            assert!((4..=6).contains(&minions.len()));
            assert!(minions.iter().all(|m| m.pos.y == MINION_ROW_Y && m.kind == EnemyKind::Minion));
        }
    }

    #[test]
    fn test_formation_reverses_at_margin() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut enemies = vec![
            Enemy::new(Vec2::new(100.0, 60.0), Basic, &mut rng),
            Enemy::new(Vec2::new(749.5, 60.0), Basic, &mut rng),
        ];
        let mut formation = Formation::new(1.0);

        // 749.5 + 1 crosses 750
        assert_eq!(formation.step(&enemies, 800.0), Vec2::new(-1.0, FORMATION_DROP));
        assert_eq!(formation.vx, -1.0);

        enemies[1].pos.x = 700.0;
        assert_eq!(formation.step(&enemies, 800.0), Vec2::new(-1.0, 0.0));

        // Dead members do not count
        enemies[0].pos.x = 50.5;
        enemies[0].alive = false;
        assert_eq!(formation.step(&enemies, 800.0), Vec2::new(-1.0, 0.0));
        enemies[0].alive = true;
        assert_eq!(formation.step(&enemies, 800.0), Vec2::new(1.0, FORMATION_DROP));
    }

    #[test]
    fn test_formation_empty() {
        let mut formation = Formation::new(1.0);
        assert_eq!(formation.step(&[], 800.0), Vec2::ZERO);
    }
}
