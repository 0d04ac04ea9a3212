//! Space Invaders collision resolver
//!
//! `resolve` only reads the state and returns what happened. The frame
//! driver applies the report and then removes the spent indices.
//!
//! Every list is walked in insertion order, and a player bullet stops at
//! the first enemy or core it touches. When one bullet overlaps two
//! enemies, the earlier enemy in the list takes the hit.

use super::boss::CoreId;
use super::state::InvadersState;
use crate::sim::circles_overlap;

/// A player bullet landed on an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyHit {
    pub enemy: usize,
    pub bullet: usize,
    /// This hit takes the enemy to zero hp
    pub kills: bool,
}

/// A player bullet landed on a boss core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoreHit {
    pub core: CoreId,
    pub bullet: usize,
    pub destroys: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionReport {
    pub enemy_hits: Vec<EnemyHit>,
    pub core_hits: Vec<CoreHit>,
    pub spent_player_bullets: Vec<usize>,
    pub spent_enemy_bullets: Vec<usize>,
    /// Contacts against the player (bullets, lasers, bodies)
    pub player_strikes: u32,
    pub power_ups: Vec<usize>,
}

impl CollisionReport {
    pub fn kills(&self) -> impl Iterator<Item = &EnemyHit> {
        self.enemy_hits.iter().filter(|h| h.kills)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

pub fn resolve(state: &InvadersState) -> CollisionReport {
    let mut report = CollisionReport::default();

    // Remaining hp after the hits found so far this frame
    let mut enemy_hp: Vec<u32> = state
        .enemies
        .iter()
        .map(|e| if e.alive { e.hp } else { 0 })
        .collect();

    let boss = state
        .boss
        .as_ref()
        .filter(|b| b.alive && !b.entering);
    let mut core_hp: Vec<(CoreId, u32)> = boss
        .map(|b| {
            b.cores
                .iter()
                .filter(|c| b.core_targetable(c.id))
                .map(|c| (c.id, c.hp))
                .collect()
        })
        .unwrap_or_default();

    for (bullet_idx, bullet) in state.player_bullets.iter().enumerate() {
        let bullet_rect = bullet.bounds();

        let struck = state
            .enemies
            .iter()
            .enumerate()
            .find(|(i, e)| enemy_hp[*i] > 0 && bullet_rect.overlaps(&e.bounds()))
            .map(|(i, _)| i);

        if let Some(enemy_idx) = struck {
            enemy_hp[enemy_idx] = enemy_hp[enemy_idx].saturating_sub(bullet.damage);
            report.enemy_hits.push(EnemyHit {
                enemy: enemy_idx,
                bullet: bullet_idx,
                kills: enemy_hp[enemy_idx] == 0,
            });
            report.spent_player_bullets.push(bullet_idx);
            continue;
        }

        let Some(boss) = boss else { continue };
        let core = core_hp.iter_mut().find(|(id, hp)| {
            let c = boss.core(*id);
            *hp > 0 && circles_overlap(bullet.pos, 0.0, boss.pos + c.offset, c.radius)
        });
        if let Some((id, hp)) = core {
            *hp = hp.saturating_sub(bullet.damage);
            report.core_hits.push(CoreHit {
                core: *id,
                bullet: bullet_idx,
                destroys: *hp == 0,
            });
            report.spent_player_bullets.push(bullet_idx);
        }
    }

    let player = &state.player;
    if player.alive && !player.invulnerable() {
        let player_rect = player.bounds();

        for (idx, bullet) in state.enemy_bullets.iter().enumerate() {
            if bullet.bounds().overlaps(&player_rect) {
                report.spent_enemy_bullets.push(idx);
                report.player_strikes += 1;
            }
        }

        if let Some(boss) = state.boss.as_ref().filter(|b| b.alive) {
            report.player_strikes += boss
                .lasers
                .iter()
                .filter_map(|l| l.bounds())
                .filter(|r| r.overlaps(&player_rect))
                .count() as u32;
        }

        report.player_strikes += state
            .enemies
            .iter()
            .enumerate()
            .filter(|(i, e)| enemy_hp[*i] > 0 && e.bounds().overlaps(&player_rect))
            .count() as u32;
    }

    if player.alive {
        let player_rect = player.bounds();
        report.power_ups = state
            .power_ups
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.collected && p.bounds().overlaps(&player_rect))
            .map(|(i, _)| i)
            .collect();
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;
    use crate::invaders::boss::{Boss, LaserBeam, LaserStage};
    use crate::invaders::state::{Enemy, EnemyKind, PowerUp, PowerUpKind, Projectile};
    use crate::sim::GamePhase;
    use glam::Vec2;

    fn playing_state() -> InvadersState {
        let mut state = InvadersState::new(5);
        state.phase = GamePhase::Playing;
        state
    }

    fn enemy(state: &mut InvadersState, x: f32, y: f32, kind: EnemyKind) -> usize {
        let e = Enemy::new(Vec2::new(x, y), kind, &mut state.rng);
        state.enemies.push(e);
        state.enemies.len() - 1
    }

    fn bolt(state: &mut InvadersState, pos: Vec2) -> usize {
        state
            .player_bullets
            .push(Projectile::player(pos, Vec2::new(0.0, -12.0), Color::CYAN));
        state.player_bullets.len() - 1
    }

    #[test]
    fn test_first_enemy_in_list_wins_overlap() {
        let mut state = playing_state();
        // Two overlapping enemies under one bullet
        enemy(&mut state, 200.0, 100.0, EnemyKind::Basic);
        enemy(&mut state, 210.0, 100.0, EnemyKind::Basic);
        bolt(&mut state, Vec2::new(205.0, 100.0));

        let report = resolve(&state);
        assert_eq!(
            report.enemy_hits,
            vec![EnemyHit {
                enemy: 0,
                bullet: 0,
                kills: true
            }]
        );
        assert_eq!(report.spent_player_bullets, vec![0]);
    }

    #[test]
    fn test_no_double_kill_in_one_frame() {
        let mut state = playing_state();
        enemy(&mut state, 200.0, 100.0, EnemyKind::Basic);
        bolt(&mut state, Vec2::new(200.0, 100.0));
        bolt(&mut state, Vec2::new(201.0, 101.0));

        let report = resolve(&state);
        assert_eq!(report.kills().count(), 1);
        // The second bullet flies on
        assert_eq!(report.spent_player_bullets, vec![0]);
    }

    #[test]
    fn test_elite_takes_three_bullets() {
        let mut state = playing_state();
        enemy(&mut state, 200.0, 100.0, EnemyKind::Elite);
        for _ in 0..4 {
            bolt(&mut state, Vec2::new(200.0, 100.0));
        }
        let report = resolve(&state);
        let kills: Vec<bool> = report.enemy_hits.iter().map(|h| h.kills).collect();
        assert_eq!(kills, vec![false, false, true]);
        assert_eq!(report.spent_player_bullets, vec![0, 1, 2]);
    }

    #[test]
    fn test_dead_enemies_are_ignored() {
        let mut state = playing_state();
        let idx = enemy(&mut state, 200.0, 100.0, EnemyKind::Basic);
        state.enemies[idx].alive = false;
        bolt(&mut state, Vec2::new(200.0, 100.0));
        assert!(resolve(&state).is_empty());
    }

    #[test]
    fn test_boss_core_hit_by_point() {
        let mut state = playing_state();
        let mut boss = Boss::new(800.0, 600.0);
        boss.entering = false;
        boss.pos = Vec2::new(400.0, 80.0);
        state.boss = Some(boss);

        bolt(&mut state, Vec2::new(340.0, 100.0));
        // Main core is shielded
        bolt(&mut state, Vec2::new(400.0, 90.0));

        let report = resolve(&state);
        assert_eq!(
            report.core_hits,
            vec![CoreHit {
                core: CoreId::Left,
                bullet: 0,
                destroys: false
            }]
        );
        assert_eq!(report.spent_player_bullets, vec![0]);
    }

    #[test]
    fn test_entering_boss_cannot_be_hit() {
        let mut state = playing_state();
        let mut boss = Boss::new(800.0, 600.0);
        boss.pos = Vec2::new(400.0, 80.0);
        state.boss = Some(boss);
        bolt(&mut state, Vec2::new(340.0, 100.0));
        assert!(resolve(&state).core_hits.is_empty());
    }

    #[test]
    fn test_strikes_counted_and_bullets_spent() {
        let mut state = playing_state();
        let p = state.player.pos;
        state.enemy_bullets.push(Projectile::hostile(
            Vec2::new(10.0, 10.0),
            Vec2::Y,
            4.0,
            10.0,
            Color::RED,
        ));
        state
            .enemy_bullets
            .push(Projectile::hostile(p, Vec2::Y, 4.0, 10.0, Color::RED));
        let mut boss = Boss::new(800.0, 600.0);
        let mut laser = LaserBeam::new(p.x, 130.0, 600.0, 60.0);
        laser.stage = LaserStage::Active;
        laser.width = 60.0;
        boss.lasers.push(laser);
        state.boss = Some(boss);

        let report = resolve(&state);
        assert_eq!(report.spent_enemy_bullets, vec![1]);
        assert_eq!(report.player_strikes, 2);
    }

    #[test]
    fn test_invulnerable_player_takes_no_strikes() {
        let mut state = playing_state();
        state.player.invulnerable_timer = 10;
        let p = state.player.pos;
        state
            .enemy_bullets
            .push(Projectile::hostile(p, Vec2::Y, 4.0, 10.0, Color::RED));
        let report = resolve(&state);
        assert_eq!(report.player_strikes, 0);
        assert!(report.spent_enemy_bullets.is_empty());
    }

    #[test]
    fn test_power_up_needs_live_player() {
        let mut state = playing_state();
        let p = state.player.pos;
        state.power_ups.push(PowerUp::new(p, PowerUpKind::Shield));
        assert_eq!(resolve(&state).power_ups, vec![0]);
        state.player.die();
        assert!(resolve(&state).power_ups.is_empty());
    }
}
