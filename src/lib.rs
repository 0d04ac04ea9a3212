//! Neon Arcade - Space Invaders: Enhanced Edition and Vector Void
//!
//! Core modules:
//! - `sim`: Shared simulation pieces (collision primitives, phases, timers, particles)
//! - `invaders`: Space Invaders: Enhanced Edition (formations, boss, combos)
//! - `vector_void`: Vector Void (inertia ship, seekers, gravity wells)
//! - `input`: Keyboard/touch poller with held and just-pressed queries
//! - `renderer`: Immediate-mode 2D drawing of both games
//! - `persistence`: Key-value storage capability (LocalStorage on web)
//! - `highscores`, `settings`: Persisted player data
//! - `audio`: Sound effect recipes and the Web Audio sink

pub mod audio;
pub mod color;
pub mod highscores;
pub mod input;
pub mod invaders;
pub mod persistence;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod vector_void;

pub use color::Color;
pub use highscores::HighScores;
pub use input::{Action, InputState, KeyBindings};
pub use settings::{QualityPreset, Settings};
pub use sim::GamePhase;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep. All gameplay constants are per frame at this rate.
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per display frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Space Invaders play field (fixed resolution)
    pub const INVADERS_WIDTH: f32 = 800.0;
    pub const INVADERS_HEIGHT: f32 = 600.0;

    /// Default Vector Void play field (resized to the container at boot)
    pub const VOID_DEFAULT_WIDTH: f32 = 1280.0;
    pub const VOID_DEFAULT_HEIGHT: f32 = 720.0;

    /// Projectiles further than this outside the field are culled
    pub const OFFSCREEN_MARGIN: f32 = 50.0;
}

/// Wrap a single coordinate around `[-margin, extent + margin]`.
///
/// Past the far edge the value resets to `-margin`, past the near edge to
/// `extent + margin`. Inside the band it is returned unchanged.
#[inline]
pub fn wrap_coord(value: f32, extent: f32, margin: f32) -> f32 {
    if value < -margin {
        extent + margin
    } else if value > extent + margin {
        -margin
    } else {
        value
    }
}

/// Screen-wrap a position on both axes. Velocity is never touched.
#[inline]
pub fn wrap_position(pos: Vec2, width: f32, height: f32, margin: f32) -> Vec2 {
    Vec2::new(
        wrap_coord(pos.x, width, margin),
        wrap_coord(pos.y, height, margin),
    )
}

/// Clamp a vector's length to `max`
#[inline]
pub fn limit(v: Vec2, max: f32) -> Vec2 {
    if v.length_squared() > max * max {
        v.normalize_or_zero() * max
    } else {
        v
    }
}

/// Unit vector pointing along `angle` (radians)
#[inline]
pub fn from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wrap_coord_edges() {
        assert_eq!(wrap_coord(861.0, 800.0, 60.0), -60.0);
        assert_eq!(wrap_coord(-61.0, 800.0, 60.0), 860.0);
        assert_eq!(wrap_coord(400.0, 800.0, 60.0), 400.0);
        // Exactly on the band edge stays put
        assert_eq!(wrap_coord(860.0, 800.0, 60.0), 860.0);
    }

    #[test]
    fn test_limit() {
        let v = limit(Vec2::new(3.0, 4.0), 1.0);
        assert!((v.length() - 1.0).abs() < 1e-5);
        assert_eq!(limit(Vec2::new(0.1, 0.0), 1.0), Vec2::new(0.1, 0.0));
    }

    proptest! {
        #[test]
        fn wrapped_position_stays_in_band(
            x in -2000.0f32..2000.0,
            y in -2000.0f32..2000.0,
            margin in 0.0f32..100.0,
        ) {
            let p = wrap_position(Vec2::new(x, y), 800.0, 600.0, margin);
            prop_assert!(p.x >= -margin && p.x <= 800.0 + margin);
            prop_assert!(p.y >= -margin && p.y <= 600.0 + margin);
        }
    }
}
