//! Recording canvas for tests and headless runs

use glam::Vec2;

use super::{Canvas, TextAlign};
use crate::Color;
use crate::sim::Rect;

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Save,
    Restore,
    Translate(Vec2),
    Rotate(f32),
    Alpha(f32),
    Glow { color: Color, blur: f32 },
    Clear(Color),
    FillRect { rect: Rect, color: Color },
    FillCircle { center: Vec2, radius: f32, color: Color },
    StrokeCircle { center: Vec2, radius: f32, color: Color },
    FillPolygon { points: Vec<Vec2>, color: Color },
    StrokePolygon { points: Vec<Vec2>, color: Color },
    Line { from: Vec2, to: Vec2, color: Color },
    Text { text: String, pos: Vec2, color: Color },
}

/// Every call in order
#[derive(Debug, Default, Clone)]
pub struct DrawList {
    pub commands: Vec<DrawCmd>,
    depth: usize,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Text drawn so far, in order
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCmd::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn contains_text(&self, needle: &str) -> bool {
        self.texts().iter().any(|t| t.contains(needle))
    }

    /// Count of commands using `color`
    pub fn count_color(&self, color: Color) -> usize {
        self.commands
            .iter()
            .filter(|c| match c {
                DrawCmd::FillRect { color: c, .. }
                | DrawCmd::FillCircle { color: c, .. }
                | DrawCmd::StrokeCircle { color: c, .. }
                | DrawCmd::FillPolygon { color: c, .. }
                | DrawCmd::StrokePolygon { color: c, .. }
                | DrawCmd::Line { color: c, .. }
                | DrawCmd::Text { color: c, .. } => *c == color,
                _ => false,
            })
            .count()
    }

    /// `save` calls not yet matched by `restore`
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl Canvas for DrawList {
    fn save(&mut self) {
        self.depth += 1;
        self.commands.push(DrawCmd::Save);
    }

    fn restore(&mut self) {
        debug_assert!(self.depth > 0, "restore without save");
        self.depth = self.depth.saturating_sub(1);
        self.commands.push(DrawCmd::Restore);
    }

    fn translate(&mut self, offset: Vec2) {
        self.commands.push(DrawCmd::Translate(offset));
    }

    fn rotate(&mut self, angle: f32) {
        self.commands.push(DrawCmd::Rotate(angle));
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.commands.push(DrawCmd::Alpha(alpha));
    }

    fn set_glow(&mut self, color: Color, blur: f32) {
        self.commands.push(DrawCmd::Glow { color, blur });
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(DrawCmd::Clear(color));
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(DrawCmd::FillRect { rect, color });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.commands.push(DrawCmd::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, _line_width: f32) {
        self.commands.push(DrawCmd::StrokeCircle {
            center,
            radius,
            color,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        self.commands.push(DrawCmd::FillPolygon {
            points: points.to_vec(),
            color,
        });
    }

    fn stroke_polygon(&mut self, points: &[Vec2], color: Color, _line_width: f32) {
        self.commands.push(DrawCmd::StrokePolygon {
            points: points.to_vec(),
            color,
        });
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, _line_width: f32) {
        self.commands.push(DrawCmd::Line { from, to, color });
    }

    fn text(&mut self, text: &str, pos: Vec2, _size: f32, color: Color, _align: TextAlign) {
        self.commands.push(DrawCmd::Text {
            text: text.to_string(),
            pos,
            color,
        });
    }
}
