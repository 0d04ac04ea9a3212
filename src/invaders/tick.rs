//! Space Invaders frame driver
//!
//! One call advances the game by exactly one 60 Hz frame. Nothing here
//! reads the clock; the browser loop decides how many frames to run.

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;

use super::collision::{self, CollisionReport};
use super::consts::*;
use super::level;
use super::state::{InvadersState, PowerUp, PowerUpKind};
use super::{InvaderEvent, InvaderTimer};
use crate::Color;
use crate::input::{Action, InputState};
use crate::sim::{GamePhase, remove_at_indices};

/// Advance the session by one frame
pub fn tick(state: &mut InvadersState, input: &InputState) {
    state.frame += 1;
    state.effects.update();

    if input.was_pressed(Action::Mute) {
        state.events.push(InvaderEvent::MuteToggled);
    }

    if state.phase.runs_timers() {
        run_timers(state);
    }

    match state.phase {
        GamePhase::Playing => play_frame(state, input),
        GamePhase::Paused => {
            if input.was_pressed(Action::Pause) {
                state.resume_game();
            }
        }
        GamePhase::Menu
        | GamePhase::Transition
        | GamePhase::GameOver
        | GamePhase::Victory => {
            state.scenery.update();
            state.particles.update();
        }
    }
}

fn run_timers(state: &mut InvadersState) {
    for timer in state.timers.advance() {
        match timer {
            InvaderTimer::BeginLevel => state.begin_level(),
            InvaderTimer::ShowGameOver => state.events.push(InvaderEvent::ShowGameOver {
                score: state.score.score(),
            }),
            InvaderTimer::ShowVictory => state.events.push(InvaderEvent::ShowVictory {
                score: state.score.score(),
            }),
            InvaderTimer::BossLaser { offset } => {
                if let Some(boss) = state.boss.as_mut().filter(|b| b.alive) {
                    boss.multi_laser_stage(offset);
                }
            }
            InvaderTimer::BossBulletWave { wave } => {
                if let Some(boss) = state.boss.as_ref().filter(|b| b.alive) {
                    state.enemy_bullets.extend(boss.bullet_wave(wave));
                    state.events.push(InvaderEvent::EnemyShot);
                }
            }
        }
    }
}

fn play_frame(state: &mut InvadersState, input: &InputState) {
    if input.was_pressed(Action::Pause) {
        state.pause_game();
        return;
    }

    if state.effects.slow_motion > 0 {
        state.effects.slow_motion -= 1;
        if state.frame % 2 == 1 {
            return;
        }
    }

    state.scenery.update();
    state.player.update(input, state.width);

    if input.is_held(Action::Shoot) && state.player.alive {
        let shots = state.player.shoot();
        if !shots.is_empty() {
            state.player_bullets.extend(shots);
            state.events.push(InvaderEvent::PlayerShot);
        }
    }

    update_enemies(state);
    update_boss(state);

    let target = state.player.alive.then_some(state.player.pos);
    for bullet in &mut state.player_bullets {
        bullet.update(None);
    }
    for bullet in &mut state.enemy_bullets {
        bullet.update(target);
    }
    for power_up in &mut state.power_ups {
        power_up.update();
    }

    state.particles.update();
    if state.player.alive && state.particles.roll(0.5) {
        let exhaust = state.player.pos + Vec2::new(0.0, PLAYER_SIZE / 2.0);
        state.particles.thrust(exhaust, FRAC_PI_2, Color::CYAN);
    }

    state.score.update();

    let report = collision::resolve(state);
    apply_collisions(state, &report);

    cull(state);

    check_game_over(state);
    if state.phase == GamePhase::Playing {
        check_level_complete(state);
    }
}

fn update_enemies(state: &mut InvadersState) {
    let delta = state.formation.step(&state.enemies, state.width);
    for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
        enemy.update(delta);
        if let Some(shot) = enemy.try_shoot(&mut state.rng) {
            state.enemy_bullets.push(shot);
            state.events.push(InvaderEvent::EnemyShot);
        }
    }
}

fn update_boss(state: &mut InvadersState) {
    let Some(boss) = state.boss.as_mut().filter(|b| b.alive) else {
        return;
    };

    let step = boss.update(state.player.pos, &mut state.rng);

    if let Some(phase) = step.phase_changed {
        state.effects.shake(10.0);
        state.effects.slow_motion(30);
        state.events.push(InvaderEvent::BossPhase { phase });
    }

    if let Some(attack) = step.attack {
        for &(delay, timer) in attack.follow_ups() {
            state.timers.schedule(delay, timer);
        }
    }

    if !step.projectiles.is_empty() {
        state.enemy_bullets.extend(step.projectiles);
        state.events.push(InvaderEvent::EnemyShot);
    }

    if boss.take_minion_request() {
        state
            .enemies
            .extend(level::generate_minions(state.width, &mut state.rng));
    }

    boss.emit_damage_effects(&mut state.particles);
}

fn apply_collisions(state: &mut InvadersState, report: &CollisionReport) {
    for _ in 0..report.player_strikes {
        let shielded = state.player.shield_active();
        if state.player.hit() {
            state.lives = state.lives.saturating_sub(1);
            state.events.push(InvaderEvent::PlayerHit { lives: state.lives });
            state.effects.shake(15.0);
            state.effects.flash(0.5, Color::RED);
            state.particles.hit_spark(state.player.pos, Color::RED);

            if state.lives == 0 {
                state.player.die();
                state.particles.big_explosion(state.player.pos);
                break;
            }
        } else if shielded {
            state.events.push(InvaderEvent::ShieldAbsorbed);
        }
    }

    for hit in &report.enemy_hits {
        let damage = state.player_bullets[hit.bullet].damage;
        let enemy = &mut state.enemies[hit.enemy];
        let killed = enemy.hit(damage);
        debug_assert_eq!(killed, hit.kills, "resolver kill prediction diverged");
        if !killed {
            continue;
        }

        let stats = enemy.kind.stats();
        let pos = enemy.pos;
        let drops = enemy.should_drop_power_up(&mut state.rng);

        let kill = state.score.add_kill(stats.points);
        state.particles.explode(pos, stats.color, 20);
        state.events.push(InvaderEvent::EnemyKilled {
            pos,
            points: kill.points,
            combo: kill.combo,
            multiplier: kill.multiplier,
        });

        if drops {
            let kind = PowerUpKind::random(&mut state.rng);
            state.power_ups.push(PowerUp::new(pos, kind));
        }
    }

    for hit in &report.core_hits {
        let damage = state.player_bullets[hit.bullet].damage;
        let Some(boss) = state.boss.as_mut() else {
            break;
        };
        let Some(destroyed) = boss.hit_core(hit.core, damage) else {
            continue;
        };
        debug_assert_eq!(destroyed, hit.destroys, "resolver core prediction diverged");

        let center = boss.core_center(hit.core);
        let points = state.score.add_boss_hit(destroyed);
        state.particles.hit_spark(center, Color::YELLOW);
        state.events.push(InvaderEvent::BossHit {
            core: hit.core,
            destroyed,
            points,
        });
        if destroyed {
            state.effects.shake(20.0);
            state.particles.big_explosion(center);
        }
    }

    // Report indices go stale once a bomb clears the bullet lists
    remove_at_indices(&mut state.player_bullets, &report.spent_player_bullets);
    remove_at_indices(&mut state.enemy_bullets, &report.spent_enemy_bullets);

    for &idx in &report.power_ups {
        let power_up = &mut state.power_ups[idx];
        power_up.collected = true;
        let (kind, pos) = (power_up.kind, power_up.pos);
        collect_power_up(state, kind);
        state.particles.power_up_collect(pos, kind.config().color);
        state.events.push(InvaderEvent::PowerUpCollected { kind });
    }
    remove_at_indices(&mut state.power_ups, &report.power_ups);
}

fn collect_power_up(state: &mut InvadersState, kind: PowerUpKind) {
    let config = kind.config();
    match kind {
        PowerUpKind::RapidFire | PowerUpKind::TripleShot => {
            state.player.set_weapon(kind, config.duration)
        }
        PowerUpKind::Shield => state.player.activate_shield(config.shield_hits),
        PowerUpKind::Bomb => state.trigger_bomb(),
        PowerUpKind::ExtraLife => state.add_life(),
    }
}

fn cull(state: &mut InvadersState) {
    let (width, height) = (state.width, state.height);
    state.enemies.retain(|e| e.alive);
    state
        .player_bullets
        .retain(|b| !b.is_off_screen(width, height) && !b.is_expired());
    state
        .enemy_bullets
        .retain(|b| !b.is_off_screen(width, height) && !b.is_expired());
    state
        .power_ups
        .retain(|p| !p.collected && !p.is_off_screen(height));
}

fn check_level_complete(state: &mut InvadersState) {
    let config = level::config_for(state.level);
    let complete = if config.boss {
        state.boss.as_ref().is_some_and(|b| !b.alive)
    } else {
        state.enemies.is_empty()
    };
    if !complete {
        return;
    }

    if let Some(boss) = state.boss.take() {
        let points = state.score.add_boss_defeat();
        state.particles.boss_explosion(boss.pos);
        state.effects.shake(30.0);
        state.events.push(InvaderEvent::BossDefeated { points });
    }

    if state.level >= level::FINAL_LEVEL {
        state.victory();
        return;
    }

    state.level += 1;
    state.player_bullets.clear();
    state.enemy_bullets.clear();
    state.power_ups.clear();
    if !state.player.alive {
        state.player.respawn(state.width, state.height);
    }
    log::info!("Level cleared, advancing to {}", state.level);
    state.events.push(InvaderEvent::LevelCleared {
        next_level: state.level,
    });
    state.start_level();
}

fn check_game_over(state: &mut InvadersState) {
    let invasion_line = state.height - INVASION_LINE_OFFSET;
    let overrun = state
        .enemies
        .iter()
        .any(|e| e.alive && e.pos.y + e.height / 2.0 >= invasion_line);

    if (state.lives == 0 && !state.player.alive) || overrun {
        state.game_over();
    }
}
