//! Vector Void scene: glowing wireframes on black

use glam::Vec2;

use super::{Canvas, TextAlign, draw_particles, regular_polygon};
use crate::Color;
use crate::from_angle;
use crate::sim::GamePhase;
use crate::vector_void::consts::{SEEKER_RADIUS, SHIP_RADIUS};
use crate::vector_void::state::{
    ASTEROID_COLOR, Asteroid, BLACK_HOLE_COLOR, BULLET_COLOR, SEEKER_COLOR, SHIP_COLOR, Seeker,
    Ship, VoidState,
};
use crate::vector_void::GravityWell;

const BACKGROUND: Color = Color::hex(0x050510);
const GLOW: f32 = 12.0;

pub fn draw_vector_void(canvas: &mut impl Canvas, state: &VoidState) {
    canvas.clear(BACKGROUND);

    for hole in &state.black_holes {
        draw_black_hole(canvas, hole);
    }
    for asteroid in &state.asteroids {
        draw_asteroid(canvas, asteroid);
    }
    for seeker in &state.seekers {
        draw_seeker(canvas, seeker);
    }

    canvas.save();
    canvas.set_glow(BULLET_COLOR, GLOW);
    for bullet in &state.bullets {
        canvas.fill_circle(bullet.body.pos, 2.0, BULLET_COLOR);
    }
    canvas.restore();

    if state.phase != GamePhase::Menu && state.ship.visible() {
        draw_ship(canvas, &state.ship);
    }
    draw_particles(canvas, &state.particles);

    let center = Vec2::new(state.width / 2.0, state.height / 2.0);
    match state.phase {
        GamePhase::Menu => title(canvas, "VECTOR VOID", center, SHIP_COLOR),
        GamePhase::Paused => title(canvas, "PAUSED", center, Color::WHITE),
        GamePhase::GameOver => title(canvas, "GAME OVER", center, SEEKER_COLOR),
        GamePhase::Playing | GamePhase::Transition | GamePhase::Victory => {}
    }

    if state.phase != GamePhase::Menu {
        canvas.text(
            &format!("SCORE: {}", state.score()),
            Vec2::new(20.0, 30.0),
            20.0,
            SHIP_COLOR,
            TextAlign::Left,
        );
        canvas.text(
            &format!("LIVES: {}", state.lives()),
            Vec2::new(state.width - 20.0, 30.0),
            20.0,
            SHIP_COLOR,
            TextAlign::Right,
        );
    }
}

fn title(canvas: &mut impl Canvas, text: &str, center: Vec2, color: Color) {
    canvas.save();
    canvas.set_glow(color, 20.0);
    canvas.text(text, center, 48.0, color, TextAlign::Center);
    canvas.restore();
}

fn draw_ship(canvas: &mut impl Canvas, ship: &Ship) {
    canvas.save();
    canvas.translate(ship.body.pos);
    // Nose along +x before rotation
    canvas.rotate(ship.heading);
    canvas.set_glow(SHIP_COLOR, GLOW);
    let r = SHIP_RADIUS;
    canvas.stroke_polygon(
        &[
            Vec2::new(r, 0.0),
            Vec2::new(-r, -r * 0.7),
            Vec2::new(-r * 0.5, 0.0),
            Vec2::new(-r, r * 0.7),
        ],
        SHIP_COLOR,
        2.0,
    );
    if ship.thrusting {
        canvas.line(
            Vec2::new(-r * 0.6, 0.0),
            Vec2::new(-r * 1.4, 0.0),
            Color::ORANGE,
            2.0,
        );
    }
    canvas.restore();
}

fn draw_asteroid(canvas: &mut impl Canvas, asteroid: &Asteroid) {
    canvas.save();
    canvas.translate(asteroid.body.pos);
    canvas.rotate(asteroid.angle);
    canvas.set_glow(ASTEROID_COLOR, GLOW);
    canvas.stroke_polygon(&asteroid.vertices, ASTEROID_COLOR, 2.0);
    canvas.restore();
}

fn draw_seeker(canvas: &mut impl Canvas, seeker: &Seeker) {
    canvas.save();
    canvas.translate(seeker.body.pos);
    canvas.rotate(seeker.heading);
    canvas.set_glow(SEEKER_COLOR, GLOW);
    canvas.stroke_polygon(
        &regular_polygon(Vec2::ZERO, SEEKER_RADIUS, 4, 0.0),
        SEEKER_COLOR,
        2.0,
    );
    canvas.line(Vec2::ZERO, Vec2::new(SEEKER_RADIUS, 0.0), SEEKER_COLOR, 1.0);
    canvas.restore();
}

fn draw_black_hole(canvas: &mut impl Canvas, hole: &GravityWell) {
    canvas.save();
    canvas.set_alpha(0.25);
    canvas.stroke_circle(hole.pos, hole.event_horizon, BLACK_HOLE_COLOR, 1.0);
    canvas.restore();

    canvas.save();
    canvas.set_glow(BLACK_HOLE_COLOR, 25.0);
    canvas.fill_circle(hole.pos, hole.radius, Color::BLACK);
    canvas.stroke_circle(hole.pos, hole.radius, BLACK_HOLE_COLOR, 2.0);
    // Spiral arms
    for arm in 0..4 {
        let angle = hole.angle + arm as f32 * std::f32::consts::FRAC_PI_2;
        let inner = hole.pos + from_angle(angle) * hole.radius * 0.3;
        let outer = hole.pos + from_angle(angle + 0.8) * hole.radius * 1.4;
        canvas.line(inner, outer, BLACK_HOLE_COLOR, 1.5);
    }
    canvas.restore();
}
