//! Neon palette colors

use serde::{Deserialize, Serialize};

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// From a `0xRRGGBB` literal
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as u8,
            g: ((rgb >> 8) & 0xff) as u8,
            b: (rgb & 0xff) as u8,
        }
    }

    /// `#rrggbb` for canvas fill/stroke styles
    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// `rgba(r, g, b, a)` with alpha clamped to [0, 1]
    pub fn to_css_alpha(self, alpha: f32) -> String {
        format!(
            "rgba({}, {}, {}, {:.3})",
            self.r,
            self.g,
            self.b,
            alpha.clamp(0.0, 1.0)
        )
    }

    pub const WHITE: Color = Color::hex(0xffffff);
    pub const BLACK: Color = Color::hex(0x000000);
    pub const CYAN: Color = Color::hex(0x00ffff);
    pub const RED: Color = Color::hex(0xff4444);
    pub const ORANGE: Color = Color::hex(0xff6600);
    pub const YELLOW: Color = Color::hex(0xffff00);
    pub const MAGENTA: Color = Color::hex(0xff00ff);
    pub const GREY: Color = Color::hex(0x666666);
}
