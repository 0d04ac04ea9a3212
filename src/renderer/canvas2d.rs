//! `CanvasRenderingContext2d` backend

use std::f64::consts::TAU;

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use super::{Canvas, TextAlign};
use crate::Color;
use crate::sim::Rect;

pub struct Canvas2d {
    context: CanvasRenderingContext2d,
    width: f64,
    height: f64,
}

impl Canvas2d {
    pub fn new(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("Failed to get 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Self {
            context,
            width: f64::from(canvas.width()),
            height: f64::from(canvas.height()),
        })
    }

    /// Track a canvas resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = f64::from(width);
        self.height = f64::from(height);
    }

    fn path(&self, points: &[Vec2]) -> bool {
        let Some((first, rest)) = points.split_first() else {
            return false;
        };
        let ctx = &self.context;
        ctx.begin_path();
        ctx.move_to(f64::from(first.x), f64::from(first.y));
        for p in rest {
            ctx.line_to(f64::from(p.x), f64::from(p.y));
        }
        ctx.close_path();
        true
    }

    fn circle(&self, center: Vec2, radius: f32) {
        let ctx = &self.context;
        ctx.begin_path();
        let _ = ctx.arc(
            f64::from(center.x),
            f64::from(center.y),
            f64::from(radius.max(0.0)),
            0.0,
            TAU,
        );
    }
}

impl Canvas for Canvas2d {
    fn save(&mut self) {
        self.context.save();
    }

    fn restore(&mut self) {
        self.context.restore();
    }

    fn translate(&mut self, offset: Vec2) {
        let _ = self
            .context
            .translate(f64::from(offset.x), f64::from(offset.y));
    }

    fn rotate(&mut self, angle: f32) {
        let _ = self.context.rotate(f64::from(angle));
    }

    fn set_alpha(&mut self, alpha: f32) {
        let current = self.context.global_alpha();
        self.context
            .set_global_alpha(current * f64::from(alpha.clamp(0.0, 1.0)));
    }

    fn set_glow(&mut self, color: Color, blur: f32) {
        self.context.set_shadow_color(&color.to_css());
        self.context.set_shadow_blur(f64::from(blur.max(0.0)));
    }

    fn clear(&mut self, color: Color) {
        let ctx = &self.context;
        ctx.save();
        let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        ctx.set_fill_style_str(&color.to_css());
        ctx.fill_rect(0.0, 0.0, self.width, self.height);
        ctx.restore();
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.context.set_fill_style_str(&color.to_css());
        self.context.fill_rect(
            f64::from(rect.x),
            f64::from(rect.y),
            f64::from(rect.w),
            f64::from(rect.h),
        );
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.circle(center, radius);
        self.context.set_fill_style_str(&color.to_css());
        self.context.fill();
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, line_width: f32) {
        self.circle(center, radius);
        self.context.set_stroke_style_str(&color.to_css());
        self.context.set_line_width(f64::from(line_width));
        self.context.stroke();
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Color) {
        if self.path(points) {
            self.context.set_fill_style_str(&color.to_css());
            self.context.fill();
        }
    }

    fn stroke_polygon(&mut self, points: &[Vec2], color: Color, line_width: f32) {
        if self.path(points) {
            self.context.set_stroke_style_str(&color.to_css());
            self.context.set_line_width(f64::from(line_width));
            self.context.stroke();
        }
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color, line_width: f32) {
        let ctx = &self.context;
        ctx.begin_path();
        ctx.move_to(f64::from(from.x), f64::from(from.y));
        ctx.line_to(f64::from(to.x), f64::from(to.y));
        ctx.set_stroke_style_str(&color.to_css());
        ctx.set_line_width(f64::from(line_width));
        ctx.stroke();
    }

    fn text(&mut self, text: &str, pos: Vec2, size: f32, color: Color, align: TextAlign) {
        let ctx = &self.context;
        ctx.set_font(&format!("bold {}px 'Courier New', monospace", size.round()));
        ctx.set_text_align(match align {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        });
        ctx.set_fill_style_str(&color.to_css());
        let _ = ctx.fill_text(text, f64::from(pos.x), f64::from(pos.y));
    }
}
