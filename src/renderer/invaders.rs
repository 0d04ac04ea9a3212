//! Space Invaders scene

use glam::Vec2;

use super::{Canvas, TextAlign, ViewOptions, draw_particles, regular_polygon};
use crate::Color;
use crate::invaders::boss::{BOSS_HEIGHT, BOSS_WIDTH, Boss, CoreId, LaserStage};
use crate::invaders::consts::{INVASION_LINE_OFFSET, PLAYER_SIZE};
use crate::invaders::level;
use crate::invaders::scenery::{Scenery, StarLayer};
use crate::invaders::state::{Enemy, EnemyKind, InvadersState, Player, PowerUp, Projectile};
use crate::sim::{GamePhase, Rect};

const HUD_COLOR: Color = Color::hex(0x00ff88);
const HULL_COLOR: Color = Color::hex(0x442266);
const SHIELD_COLOR: Color = Color::hex(0x00aaff);

/// Draw the full frame
pub fn draw_invaders(canvas: &mut impl Canvas, state: &InvadersState, view: ViewOptions) {
    canvas.clear(state.scenery.environment.bg_color);

    canvas.save();
    if view.screen_shake {
        canvas.translate(state.effects.shake_offset(state.frame));
    }

    draw_scenery(canvas, &state.scenery, view);

    if matches!(state.phase, GamePhase::Playing | GamePhase::Paused) {
        let line_y = state.height - INVASION_LINE_OFFSET;
        canvas.save();
        canvas.set_alpha(0.15);
        canvas.line(
            Vec2::new(0.0, line_y),
            Vec2::new(state.width, line_y),
            Color::RED,
            1.0,
        );
        canvas.restore();
    }

    for enemy in state.enemies.iter().filter(|e| e.alive) {
        draw_enemy(canvas, enemy);
    }
    if let Some(boss) = state.boss.as_ref().filter(|b| b.alive) {
        draw_boss(canvas, boss, state.frame);
    }
    for power_up in &state.power_ups {
        draw_power_up(canvas, power_up);
    }
    for bullet in state.player_bullets.iter().chain(&state.enemy_bullets) {
        draw_projectile(canvas, bullet);
    }
    if state.phase != GamePhase::Menu && state.player.visible() {
        draw_player(canvas, &state.player);
    }

    draw_particles(canvas, &state.particles);
    canvas.restore();

    if state.effects.screen_flash > 0.0 {
        canvas.save();
        canvas.set_alpha(state.effects.screen_flash);
        canvas.fill_rect(
            Rect::new(0.0, 0.0, state.width, state.height),
            state.effects.flash_color.unwrap_or(Color::WHITE),
        );
        canvas.restore();
    }
    if state.scenery.lightning_flash > 0 {
        canvas.save();
        canvas.set_alpha(0.2);
        canvas.fill_rect(Rect::new(0.0, 0.0, state.width, state.height), Color::RED);
        canvas.restore();
    }

    draw_hud(canvas, state);
    draw_overlay(canvas, state);
}

fn draw_scenery(canvas: &mut impl Canvas, scenery: &Scenery, view: ViewOptions) {
    if view.backdrop {
        for nebula in &scenery.nebulae {
            canvas.save();
            canvas.set_alpha(nebula.opacity);
            canvas.fill_circle(nebula.pos, nebula.radius, nebula.color);
            canvas.restore();
        }
        for planet in &scenery.planets {
            canvas.fill_circle(planet.pos, planet.radius, planet.color);
            if planet.ringed {
                canvas.stroke_circle(planet.pos, planet.radius * 1.6, planet.color, 3.0);
            }
        }
    }

    let star_color = scenery.environment.star_color;
    for star in &scenery.stars {
        canvas.save();
        canvas.set_alpha(star.alpha());
        if star.layer == StarLayer::Shooting {
            canvas.line(
                star.pos,
                star.pos - Vec2::new(star.trail_length, -star.trail_length * 0.5),
                star_color,
                star.size * 0.5,
            );
        }
        canvas.fill_circle(star.pos, star.size, star_color);
        canvas.restore();
    }

    for rock in &scenery.rocks {
        canvas.save();
        canvas.translate(rock.pos);
        canvas.rotate(rock.rotation);
        canvas.fill_polygon(&rock.vertices, Color::GREY);
        canvas.restore();
    }

    canvas.save();
    canvas.set_alpha(0.4);
    for (start, length) in &scenery.speed_lines {
        canvas.line(*start, *start + Vec2::new(0.0, *length), star_color, 1.0);
    }
    canvas.restore();
}

fn draw_enemy(canvas: &mut impl Canvas, enemy: &Enemy) {
    let stats = enemy.kind.stats();
    let color = if enemy.hit_flash > 0 {
        Color::WHITE
    } else {
        stats.color
    };
    let (w, h) = (enemy.width, enemy.height);
    let bob = enemy.anim_phase.sin() * 2.0;

    canvas.save();
    canvas.translate(enemy.pos + Vec2::new(0.0, bob));
    canvas.set_glow(stats.color, 10.0);

    match enemy.kind {
        EnemyKind::Basic => {
            canvas.fill_rect(Rect::centered(Vec2::ZERO, w, h * 0.6), color);
            // Legs
            for side in [-1.0, 1.0] {
                canvas.fill_rect(
                    Rect::centered(Vec2::new(side * w * 0.35, h * 0.4), w * 0.15, h * 0.25),
                    color,
                );
            }
        }
        EnemyKind::Fast => {
            canvas.fill_polygon(
                &[
                    Vec2::new(0.0, h / 2.0),
                    Vec2::new(-w / 2.0, -h / 2.0),
                    Vec2::new(w / 2.0, -h / 2.0),
                ],
                color,
            );
        }
        EnemyKind::Elite => {
            canvas.fill_polygon(&regular_polygon(Vec2::ZERO, w / 2.0, 6, 0.0), color);
            if enemy.hp < enemy.max_hp {
                let frac = enemy.hp as f32 / enemy.max_hp as f32;
                let bar = Rect::new(-w / 2.0, -h / 2.0 - 8.0, w, 4.0);
                canvas.fill_rect(bar, Color::GREY);
                canvas.fill_rect(Rect { w: w * frac, ..bar }, Color::RED);
            }
        }
        EnemyKind::Minion => {
            canvas.fill_polygon(&regular_polygon(Vec2::ZERO, w / 2.0, 4, 0.0), color);
        }
    }

    canvas.set_glow(Color::RED, 0.0);
    canvas.set_alpha(enemy.eye_glow());
    for side in [-1.0, 1.0] {
        canvas.fill_circle(Vec2::new(side * w * 0.18, -h * 0.08), 3.0, Color::WHITE);
    }
    canvas.restore();
}

fn draw_boss(canvas: &mut impl Canvas, boss: &Boss, frame: u64) {
    for laser in &boss.lasers {
        let beam = Rect::new(
            laser.x - laser.target_width / 2.0,
            laser.start_y,
            laser.target_width,
            laser.end_y - laser.start_y,
        );
        canvas.save();
        match laser.stage {
            LaserStage::Charging => {
                canvas.set_alpha(laser.warning_alpha);
                canvas.fill_rect(beam, Color::RED);
            }
            LaserStage::Active | LaserStage::Decay => {
                canvas.set_glow(Color::RED, 20.0);
                canvas.fill_rect(Rect { x: laser.x - laser.width / 2.0, w: laser.width, ..beam }, Color::RED);
                canvas.fill_rect(
                    Rect { x: laser.x - laser.width / 6.0, w: laser.width / 3.0, ..beam },
                    Color::WHITE,
                );
            }
            LaserStage::Spent => {}
        }
        canvas.restore();
    }

    canvas.save();
    if boss.transitioning() && frame % 4 < 2 {
        canvas.set_alpha(0.5);
    }
    let hull_color = if boss.hit_flash > 0 { Color::WHITE } else { HULL_COLOR };
    let (w, h) = (BOSS_WIDTH, BOSS_HEIGHT);
    let p = boss.pos;
    canvas.set_glow(Color::MAGENTA, 15.0);
    canvas.fill_polygon(
        &[
            p + Vec2::new(-w / 2.0, 0.0),
            p + Vec2::new(-w / 3.0, -h / 2.0),
            p + Vec2::new(w / 3.0, -h / 2.0),
            p + Vec2::new(w / 2.0, 0.0),
            p + Vec2::new(w / 3.0, h / 2.0),
            p + Vec2::new(-w / 3.0, h / 2.0),
        ],
        hull_color,
    );

    for core in &boss.cores {
        let center = boss.core_center(core.id);
        if core.destroyed {
            canvas.fill_circle(center, core.radius * 0.6, Color::GREY);
            continue;
        }
        let health = core.hp as f32 / core.max_hp as f32;
        let color = if health > 0.5 { Color::CYAN } else { Color::ORANGE };
        canvas.fill_circle(center, core.radius, color);
        if core.id == CoreId::Main && !boss.main_vulnerable {
            canvas.stroke_circle(center, core.radius + 6.0, SHIELD_COLOR, 3.0);
        }
    }
    canvas.restore();

    if let Some((radius, alpha)) = boss.emp_wave() {
        canvas.save();
        canvas.set_alpha(alpha);
        canvas.stroke_circle(boss.pos, radius, SHIELD_COLOR, 4.0);
        canvas.restore();
    }
}

fn draw_power_up(canvas: &mut impl Canvas, power_up: &PowerUp) {
    let config = power_up.kind.config();
    let pulse = 1.0 + power_up.pulse_phase.sin() * 0.1;

    canvas.save();
    canvas.set_glow(config.color, 15.0);
    canvas.stroke_polygon(
        &regular_polygon(power_up.pos, 12.0 * pulse, 6, power_up.rotation),
        config.color,
        2.0,
    );
    canvas.text(
        config.symbol,
        power_up.pos + Vec2::new(0.0, 5.0),
        14.0,
        config.color,
        TextAlign::Center,
    );
    canvas.restore();
}

fn draw_projectile(canvas: &mut impl Canvas, bullet: &Projectile) {
    canvas.save();
    canvas.set_glow(bullet.color, 8.0);
    for (i, pair) in bullet.trail.windows(2).enumerate() {
        canvas.save();
        canvas.set_alpha((i + 1) as f32 / bullet.trail.len() as f32 * 0.5);
        canvas.line(pair[0], pair[1], bullet.color, bullet.width * 0.5);
        canvas.restore();
    }
    canvas.fill_rect(bullet.bounds(), bullet.color);
    canvas.restore();
}

fn draw_player(canvas: &mut impl Canvas, player: &Player) {
    let half = PLAYER_SIZE / 2.0;

    canvas.save();
    canvas.translate(player.pos);
    canvas.rotate(player.tilt);

    if player.thrust_intensity > 0.0 {
        canvas.save();
        canvas.set_alpha(player.thrust_intensity.min(1.0));
        canvas.fill_polygon(
            &[
                Vec2::new(-6.0, half * 0.6),
                Vec2::new(6.0, half * 0.6),
                Vec2::new(0.0, half * 0.6 + 14.0 * player.thrust_intensity),
            ],
            Color::ORANGE,
        );
        canvas.restore();
    }

    canvas.set_glow(Color::CYAN, 12.0);
    canvas.fill_polygon(
        &[
            Vec2::new(0.0, -half),
            Vec2::new(half, half * 0.6),
            Vec2::new(-half, half * 0.6),
        ],
        Color::CYAN,
    );
    canvas.restore();

    if player.shield_active() {
        canvas.save();
        canvas.set_alpha(0.5 + player.shield_pulse.sin() * 0.2);
        canvas.stroke_circle(player.pos, half + 10.0, SHIELD_COLOR, 2.0);
        canvas.restore();
    }
}

fn draw_hud(canvas: &mut impl Canvas, state: &InvadersState) {
    if matches!(state.phase, GamePhase::Menu) {
        return;
    }
    canvas.text(
        &format!("SCORE {}", state.score()),
        Vec2::new(10.0, 24.0),
        18.0,
        HUD_COLOR,
        TextAlign::Left,
    );
    canvas.text(
        &format!("LEVEL {}", state.level()),
        Vec2::new(state.width / 2.0, 24.0),
        18.0,
        HUD_COLOR,
        TextAlign::Center,
    );
    canvas.text(
        &format!("LIVES {}", state.lives()),
        Vec2::new(state.width - 10.0, 24.0),
        18.0,
        HUD_COLOR,
        TextAlign::Right,
    );

    if state.combo() > 1 {
        canvas.text(
            &format!("{} COMBO x{}", state.combo(), state.multiplier()),
            Vec2::new(10.0, 46.0),
            14.0,
            Color::YELLOW,
            TextAlign::Left,
        );
    }
    let power = state.active_power_up_name();
    if power != "NONE" {
        canvas.text(
            power,
            Vec2::new(state.width - 10.0, 46.0),
            14.0,
            Color::MAGENTA,
            TextAlign::Right,
        );
    }

    if let Some((health, phase)) = state.boss_health() {
        let bar = Rect::new(state.width * 0.2, state.height - 20.0, state.width * 0.6, 8.0);
        canvas.fill_rect(bar, Color::GREY);
        canvas.fill_rect(Rect { w: bar.w * health, ..bar }, Color::RED);
        canvas.text(
            &format!("MOTHERSHIP - PHASE {}", phase),
            Vec2::new(state.width / 2.0, bar.y - 6.0),
            12.0,
            Color::RED,
            TextAlign::Center,
        );
    }
}

fn draw_overlay(canvas: &mut impl Canvas, state: &InvadersState) {
    let center = Vec2::new(state.width / 2.0, state.height / 2.0);

    match state.phase {
        GamePhase::Menu => {
            draw_title(canvas, "SPACE INVADERS", center, Color::CYAN);
            canvas.text(
                "ENHANCED EDITION",
                center + Vec2::new(0.0, 36.0),
                18.0,
                Color::MAGENTA,
                TextAlign::Center,
            );
        }
        GamePhase::Transition => {
            draw_title(canvas, &format!("LEVEL {}", state.level()), center, Color::CYAN);
            canvas.text(
                level::config_for(state.level()).name,
                center + Vec2::new(0.0, 36.0),
                20.0,
                Color::YELLOW,
                TextAlign::Center,
            );
        }
        GamePhase::Paused => draw_title(canvas, "PAUSED", center, Color::WHITE),
        GamePhase::GameOver => draw_title(canvas, "GAME OVER", center, Color::RED),
        GamePhase::Victory => draw_title(canvas, "VICTORY", center, Color::YELLOW),
        GamePhase::Playing => {}
    }
}

fn draw_title<C: Canvas>(canvas: &mut C, text: &str, center: Vec2, color: Color) {
    canvas.save();
    canvas.set_glow(color, 20.0);
    canvas.text(text, center, 42.0, color, TextAlign::Center);
    canvas.restore();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputState, KeyBindings};
    use crate::invaders::tick;
    use crate::renderer::{DrawCmd, DrawList};

    fn run(state: &mut InvadersState, frames: usize) {
        let input = InputState::new(KeyBindings::invaders());
        for _ in 0..frames {
            tick(state, &input);
        }
    }

    #[test]
    fn test_menu_frame() {
        let state = InvadersState::new(1);
        let mut list = DrawList::new();
        draw_invaders(&mut list, &state, ViewOptions::default());

        assert!(matches!(list.commands.first(), Some(DrawCmd::Clear(_))));
        assert!(list.contains_text("SPACE INVADERS"));
        assert!(!list.contains_text("SCORE"));
        assert_eq!(list.depth(), 0);
    }

    #[test]
    fn test_banner_shows_level_name() {
        let mut state = InvadersState::new(2);
        state.start_game();
        let mut list = DrawList::new();
        draw_invaders(&mut list, &state, ViewOptions::default());
        assert!(list.contains_text("LEVEL 1"));
        assert!(list.contains_text(level::config_for(1).name));
    }

    #[test]
    fn test_playing_frame_draws_formation_and_hud() {
        let mut state = InvadersState::new(3);
        state.start_game();
        run(&mut state, 130);
        assert_eq!(state.phase(), GamePhase::Playing);

        let mut list = DrawList::new();
        draw_invaders(&mut list, &state, ViewOptions::default());
        assert!(list.contains_text("SCORE 0"));
        assert!(list.contains_text("LIVES 3"));
        // One body per enemy in its kind colour, at least
        let basic = EnemyKind::Basic.stats().color;
        let basics = state
            .enemies
            .iter()
            .filter(|e| e.kind == EnemyKind::Basic)
            .count();
        assert!(list.count_color(basic) >= basics);
        assert_eq!(list.depth(), 0);
    }

    #[test]
    fn test_shake_respects_view_options() {
        let mut state = InvadersState::new(4);
        state.effects.shake(8.0);
        state.frame = 7;

        let mut list = DrawList::new();
        draw_invaders(
            &mut list,
            &state,
            ViewOptions {
                screen_shake: false,
                ..ViewOptions::default()
            },
        );
        assert!(!matches!(list.commands[2], DrawCmd::Translate(_)));

        let mut list = DrawList::new();
        draw_invaders(&mut list, &state, ViewOptions::default());
        assert!(matches!(list.commands[2], DrawCmd::Translate(_)));
    }
}
