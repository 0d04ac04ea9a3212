//! Player preferences
//!
//! Persisted as JSON under `neon_arcade_settings`, separate from the high
//! score list.

use serde::{Deserialize, Serialize};

use crate::invaders::InvadersState;
use crate::persistence::KeyValueStore;
use crate::sim::ParticleSystem;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Maximum particles for this preset
    pub fn max_particles(&self) -> usize {
        match self {
            QualityPreset::Low => 300,
            QualityPreset::Medium => 800,
            QualityPreset::High => 1500,
        }
    }

    /// Whether to draw nebulae and planets behind the starfield
    pub fn backdrop_enabled(&self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master volume (0.0 - 1.0)
    pub volume: f32,
    pub muted: bool,
    /// Screen shake on explosions and boss phases
    pub screen_shake: bool,
    /// Minimise shake and halve flashes
    pub reduced_motion: bool,
    pub quality: QualityPreset,
    /// On-screen Left/Right/Fire buttons (Space Invaders)
    pub touch_controls: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: 0.8,
            muted: false,
            screen_shake: true,
            reduced_motion: false,
            quality: QualityPreset::Medium,
            touch_controls: false,
        }
    }
}

impl Settings {
    pub const STORAGE_KEY: &'static str = "neon_arcade_settings";

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    pub fn max_particles(&self) -> usize {
        self.quality.max_particles()
    }

    pub fn apply_to_particles(&self, particles: &mut ParticleSystem) {
        particles.set_max_particles(self.max_particles());
    }

    pub fn apply_to_invaders(&self, state: &mut InvadersState) {
        state.effects.reduced_motion = !self.effective_screen_shake();
        self.apply_to_particles(&mut state.particles);
    }

    /// Load from the store, falling back to defaults
    pub fn load<S: KeyValueStore>(store: &S) -> Self {
        match store.load_json::<Settings>(Self::STORAGE_KEY) {
            Ok(Some(mut settings)) => {
                settings.volume = settings.volume.clamp(0.0, 1.0);
                log::info!("Loaded settings");
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Could not load settings, using defaults: {}", e);
                Self::default()
            }
        }
    }

    pub fn save<S: KeyValueStore>(&self, store: &mut S) {
        match store.save_json(Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("Settings saved"),
            Err(e) => log::warn!("Could not save settings: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_preset_parse() {
        assert_eq!(QualityPreset::parse("HIGH"), Some(QualityPreset::High));
        assert_eq!(QualityPreset::parse("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
        assert!(QualityPreset::Low.max_particles() < QualityPreset::High.max_particles());
    }

    #[test]
    fn test_reduced_motion_overrides_shake() {
        let settings = Settings {
            reduced_motion: true,
            ..Settings::default()
        };
        assert!(!settings.effective_screen_shake());

        let mut state = InvadersState::new(1);
        settings.apply_to_invaders(&mut state);
        state.effects.shake(10.0);
        assert_eq!(state.effects.screen_shake, 0.0);
    }

    #[test]
    fn test_quality_caps_particles() {
        let settings = Settings {
            quality: QualityPreset::Low,
            ..Settings::default()
        };
        let mut particles = ParticleSystem::new(3);
        settings.apply_to_particles(&mut particles);
        assert_eq!(particles.max_particles(), 300);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let mut store = MemoryStore::new();
        store
            .set(Settings::STORAGE_KEY, r#"{"muted":true,"volume":7.0}"#)
            .unwrap();
        let settings = Settings::load(&store);
        assert!(settings.muted);
        assert_eq!(settings.volume, 1.0);
        assert!(settings.screen_shake);
    }

    #[test]
    fn test_roundtrip_through_store() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            touch_controls: true,
            quality: QualityPreset::High,
            ..Settings::default()
        };
        settings.save(&mut store);
        assert_eq!(Settings::load(&store), settings);
    }
}
