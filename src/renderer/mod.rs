//! Immediate-mode 2D rendering
//!
//! Both games redraw the whole scene every display frame through the
//! `Canvas` trait. The browser backs it with a `CanvasRenderingContext2d`;
//! tests use the recording `DrawList`.

#[cfg(target_arch = "wasm32")]
pub mod canvas2d;
pub mod invaders;
pub mod recorder;
pub mod vector_void;

use glam::Vec2;

use crate::Color;
use crate::sim::Rect;

#[cfg(target_arch = "wasm32")]
pub use canvas2d::Canvas2d;
pub use invaders::draw_invaders;
pub use recorder::{DrawCmd, DrawList};
pub use vector_void::draw_vector_void;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Drawing surface. Transforms, alpha and glow stack with `save`/`restore`.
pub trait Canvas {
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Vec2);
    fn rotate(&mut self, angle: f32);
    /// Multiplies into the current alpha
    fn set_alpha(&mut self, alpha: f32);
    /// Neon glow (shadow blur) for following shapes; `blur` 0 turns it off
    fn set_glow(&mut self, color: Color, blur: f32);

    fn clear(&mut self, color: Color);
    fn fill_rect(&mut self, rect: Rect, color: Color);
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);
    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, line_width: f32);
    fn fill_polygon(&mut self, points: &[Vec2], color: Color);
    fn stroke_polygon(&mut self, points: &[Vec2], color: Color, line_width: f32);
    fn line(&mut self, from: Vec2, to: Vec2, color: Color, line_width: f32);
    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Color, align: TextAlign);
}

/// Presentation switches taken from the player's settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewOptions {
    pub screen_shake: bool,
    /// Nebulae and planets
    pub backdrop: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            screen_shake: true,
            backdrop: true,
        }
    }
}

impl From<&crate::Settings> for ViewOptions {
    fn from(settings: &crate::Settings) -> Self {
        Self {
            screen_shake: settings.effective_screen_shake(),
            backdrop: settings.quality.backdrop_enabled(),
        }
    }
}

/// Regular polygon around `center`, first corner at `rotation`
pub(crate) fn regular_polygon(center: Vec2, radius: f32, sides: usize, rotation: f32) -> Vec<Vec2> {
    (0..sides)
        .map(|i| {
            let angle = rotation + std::f32::consts::TAU * i as f32 / sides as f32;
            center + crate::from_angle(angle) * radius
        })
        .collect()
}

/// Shared particle pass
pub(crate) fn draw_particles(canvas: &mut impl Canvas, particles: &crate::sim::ParticleSystem) {
    for p in &particles.particles {
        canvas.save();
        canvas.set_alpha(p.alpha());
        if p.glow {
            canvas.set_glow(p.color, p.size * 2.0);
        }
        if p.trail.len() > 1 {
            for pair in p.trail.windows(2) {
                canvas.line(pair[0], pair[1], p.color, p.size * 0.5);
            }
        }
        canvas.fill_circle(p.pos, p.size.max(0.5), p.color);
        canvas.restore();
    }
}
