//! Score and combo multiplier

use serde::{Deserialize, Serialize};

/// Frames a combo survives without another kill
pub const COMBO_WINDOW: u32 = 120;

/// Points for a boss core hit that does not destroy it
pub const BOSS_HIT_POINTS: u32 = 50;
/// Points for destroying a boss core
pub const BOSS_CORE_POINTS: u32 = 2000;
/// Bonus for defeating the Mothership
pub const BOSS_DEFEAT_POINTS: u32 = 10_000;

/// (minimum combo, multiplier), ascending
const COMBO_THRESHOLDS: [(u32, f32); 4] = [(5, 1.5), (10, 2.0), (20, 3.0), (50, 5.0)];

/// Multiplier for a consecutive-kill count. Pure step function.
pub fn multiplier_for(combo: u32) -> f32 {
    COMBO_THRESHOLDS
        .iter()
        .rev()
        .find(|(min, _)| combo >= *min)
        .map(|(_, mult)| *mult)
        .unwrap_or(1.0)
}

/// Result of scoring one kill
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KillScore {
    pub points: u32,
    pub combo: u32,
    pub multiplier: f32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreKeeper {
    score: u64,
    combo: u32,
    combo_timer: u32,
    max_combo: u32,
}

impl ScoreKeeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score a kill worth `base` points and extend the combo
    pub fn add_kill(&mut self, base: u32) -> KillScore {
        self.combo += 1;
        self.combo_timer = COMBO_WINDOW;
        self.max_combo = self.max_combo.max(self.combo);

        let multiplier = multiplier_for(self.combo);
        let points = (base as f32 * multiplier).floor() as u32;
        self.score += points as u64;

        KillScore {
            points,
            combo: self.combo,
            multiplier,
        }
    }

    /// Boss core hit; destroying a core is worth more. No multiplier.
    pub fn add_boss_hit(&mut self, destroyed: bool) -> u32 {
        let points = if destroyed {
            BOSS_CORE_POINTS
        } else {
            BOSS_HIT_POINTS
        };
        self.score += points as u64;
        points
    }

    pub fn add_boss_defeat(&mut self) -> u32 {
        self.score += BOSS_DEFEAT_POINTS as u64;
        BOSS_DEFEAT_POINTS
    }

    /// Per-frame combo decay
    pub fn update(&mut self) {
        if self.combo_timer > 0 {
            self.combo_timer -= 1;
            if self.combo_timer == 0 {
                self.combo = 0;
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn multiplier(&self) -> f32 {
        multiplier_for(self.combo)
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_threshold_table() {
        assert_eq!(multiplier_for(0), 1.0);
        assert_eq!(multiplier_for(4), 1.0);
        assert_eq!(multiplier_for(5), 1.5);
        assert_eq!(multiplier_for(9), 1.5);
        assert_eq!(multiplier_for(10), 2.0);
        assert_eq!(multiplier_for(20), 3.0);
        assert_eq!(multiplier_for(49), 3.0);
        assert_eq!(multiplier_for(50), 5.0);
        assert_eq!(multiplier_for(500), 5.0);
    }

    #[test]
    fn test_kill_scoring_uses_floor() {
        let mut score = ScoreKeeper::new();
        for _ in 0..4 {
            assert_eq!(score.add_kill(150).points, 150);
        }
        // Fifth kill: 150 * 1.5
        let kill = score.add_kill(150);
        assert_eq!(kill.points, 225);
        assert_eq!(kill.combo, 5);
        assert_eq!(kill.multiplier, 1.5);
        assert_eq!(score.score(), 150 * 4 + 225);

        // Odd base value floors
        let mut score = ScoreKeeper::new();
        for _ in 0..4 {
            score.add_kill(1);
        }
        assert_eq!(score.add_kill(1).points, 1);
    }

    #[test]
    fn test_combo_decays_after_window() {
        let mut score = ScoreKeeper::new();
        for _ in 0..6 {
            score.add_kill(100);
        }
        for _ in 0..COMBO_WINDOW - 1 {
            score.update();
        }
        assert_eq!(score.combo(), 6);
        score.update();
        assert_eq!(score.combo(), 0);
        assert_eq!(score.multiplier(), 1.0);
        assert_eq!(score.max_combo(), 6);
    }

    #[test]
    fn test_boss_points() {
        let mut score = ScoreKeeper::new();
        assert_eq!(score.add_boss_hit(false), 50);
        assert_eq!(score.add_boss_hit(true), 2000);
        assert_eq!(score.add_boss_defeat(), 10_000);
        assert_eq!(score.score(), 12_050);
        // Boss hits do not touch the combo
        assert_eq!(score.combo(), 0);
    }

    proptest! {
        #[test]
        fn multiplier_is_monotonic_step(a in 0u32..200, b in 0u32..200) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(multiplier_for(lo) <= multiplier_for(hi));
            let m = multiplier_for(a);
            prop_assert!([1.0, 1.5, 2.0, 3.0, 5.0].contains(&m));
        }

        #[test]
        fn awarded_points_are_floored_product(kills in 1u32..80, base in 1u32..400) {
            let mut score = ScoreKeeper::new();
            let mut last = None;
            for _ in 0..kills {
                last = Some(score.add_kill(base));
            }
            let kill = last.unwrap();
            prop_assert_eq!(kill.points, (base as f32 * multiplier_for(kills)).floor() as u32);
        }
    }
}
