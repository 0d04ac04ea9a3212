//! Procedural sound effects
//!
//! Every effect is a short list of oscillator tones with a gain envelope,
//! described as data so the mapping can be checked without a browser.
//! `WebAudio` plays them through the Web Audio API; `SilentAudio` is the
//! no-op sink used natively and when the audio context cannot be created.

use crate::invaders::InvaderEvent;
use crate::vector_void::VoidEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player laser (Space Invaders)
    Shoot,
    EnemyShoot,
    Explosion,
    BigExplosion,
    PowerUp,
    /// Bullet on a boss core or a shield absorbing a strike
    Hit,
    PlayerHit,
    LevelUp,
    BossWarning,
    MenuSelect,
    GameOver,
    Victory,
    /// Vector Void laser pew
    Pew,
    Thrust,
    Shatter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wave {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// How the pitch moves after the start
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sweep {
    Hold,
    /// Exponential glide to the frequency by the end of the tone
    Exponential(f32),
    Linear(f32),
    /// Jump to the frequency at the given offset (seconds)
    Step(&'static [(f32, f32)]),
}

/// One oscillator: starts `delay` seconds after the trigger, decays from
/// `gain` to near silence over `duration`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub wave: Wave,
    pub delay: f32,
    pub freq: f32,
    pub sweep: Sweep,
    pub gain: f32,
    pub duration: f32,
}

const fn tone(wave: Wave, delay: f32, freq: f32, gain: f32, duration: f32) -> Tone {
    Tone {
        wave,
        delay,
        freq,
        sweep: Sweep::Hold,
        gain,
        duration,
    }
}

const fn glide(wave: Wave, freq: f32, to: f32, gain: f32, duration: f32) -> Tone {
    Tone {
        wave,
        delay: 0.0,
        freq,
        sweep: Sweep::Exponential(to),
        gain,
        duration,
    }
}

use Wave::*;

const SHOOT: [Tone; 1] = [glide(Square, 600.0, 200.0, 0.2, 0.1)];
const ENEMY_SHOOT: [Tone; 1] = [glide(Sawtooth, 300.0, 100.0, 0.15, 0.15)];
const EXPLOSION: [Tone; 2] = [
    glide(Sawtooth, 180.0, 40.0, 0.3, 0.3),
    glide(Square, 90.0, 30.0, 0.2, 0.3),
];
const BIG_EXPLOSION: [Tone; 3] = [
    glide(Sawtooth, 140.0, 25.0, 0.4, 0.8),
    glide(Square, 70.0, 20.0, 0.3, 0.8),
    glide(Sine, 50.0, 20.0, 0.4, 0.6),
];
const POWER_UP: [Tone; 4] = [
    tone(Sine, 0.0, 400.0, 0.2, 0.1),
    tone(Sine, 0.05, 500.0, 0.2, 0.1),
    tone(Sine, 0.1, 600.0, 0.2, 0.1),
    tone(Sine, 0.15, 800.0, 0.2, 0.1),
];
const HIT: [Tone; 1] = [glide(Square, 150.0, 50.0, 0.3, 0.1)];
const PLAYER_HIT: [Tone; 2] = [
    tone(Sawtooth, 0.0, 80.0, 0.3, 0.3),
    Tone {
        wave: Square,
        delay: 0.0,
        freq: 400.0,
        sweep: Sweep::Step(&[(0.1, 300.0), (0.2, 400.0)]),
        gain: 0.3,
        duration: 0.3,
    },
];
const LEVEL_UP: [Tone; 4] = [
    tone(Sine, 0.0, 523.0, 0.2, 0.2),
    tone(Sine, 0.1, 659.0, 0.2, 0.2),
    tone(Sine, 0.2, 784.0, 0.2, 0.2),
    tone(Sine, 0.3, 1047.0, 0.2, 0.2),
];
const ALARM: Sweep = Sweep::Step(&[(0.2, 880.0)]);
const BOSS_WARNING: [Tone; 3] = [
    Tone {
        wave: Square,
        delay: 0.0,
        freq: 440.0,
        sweep: ALARM,
        gain: 0.3,
        duration: 0.4,
    },
    Tone {
        wave: Square,
        delay: 0.5,
        freq: 440.0,
        sweep: ALARM,
        gain: 0.3,
        duration: 0.4,
    },
    Tone {
        wave: Square,
        delay: 1.0,
        freq: 440.0,
        sweep: ALARM,
        gain: 0.3,
        duration: 0.4,
    },
];
const MENU_SELECT: [Tone; 1] = [tone(Sine, 0.0, 600.0, 0.15, 0.1)];
const GAME_OVER: [Tone; 4] = [
    tone(Sawtooth, 0.0, 400.0, 0.2, 0.3),
    tone(Sawtooth, 0.2, 350.0, 0.2, 0.3),
    tone(Sawtooth, 0.4, 300.0, 0.2, 0.3),
    tone(Sawtooth, 0.6, 200.0, 0.2, 0.3),
];
const VICTORY: [Tone; 7] = [
    tone(Sine, 0.0, 523.0, 0.2, 0.2),
    tone(Sine, 0.15, 659.0, 0.2, 0.2),
    tone(Sine, 0.3, 784.0, 0.2, 0.2),
    tone(Sine, 0.45, 1047.0, 0.2, 0.2),
    tone(Sine, 0.6, 784.0, 0.2, 0.2),
    tone(Sine, 0.75, 1047.0, 0.2, 0.2),
    tone(Sine, 0.9, 1319.0, 0.2, 0.2),
];
const PEW: [Tone; 1] = [glide(Sawtooth, 880.0, 110.0, 0.3, 0.1)];
const THRUST: [Tone; 1] = [tone(Square, 0.0, 55.0, 0.1, 0.1)];
const SHATTER: [Tone; 3] = [
    tone(Sawtooth, 0.0, 140.0, 0.5, 0.3),
    tone(Sawtooth, 0.0, 210.0, 0.5, 0.25),
    tone(Sawtooth, 0.0, 260.0, 0.5, 0.35),
];

impl SoundEffect {
    pub fn recipe(self) -> &'static [Tone] {
        match self {
            SoundEffect::Shoot => &SHOOT,
            SoundEffect::EnemyShoot => &ENEMY_SHOOT,
            SoundEffect::Explosion => &EXPLOSION,
            SoundEffect::BigExplosion => &BIG_EXPLOSION,
            SoundEffect::PowerUp => &POWER_UP,
            SoundEffect::Hit => &HIT,
            SoundEffect::PlayerHit => &PLAYER_HIT,
            SoundEffect::LevelUp => &LEVEL_UP,
            SoundEffect::BossWarning => &BOSS_WARNING,
            SoundEffect::MenuSelect => &MENU_SELECT,
            SoundEffect::GameOver => &GAME_OVER,
            SoundEffect::Victory => &VICTORY,
            SoundEffect::Pew => &PEW,
            SoundEffect::Thrust => &THRUST,
            SoundEffect::Shatter => &SHATTER,
        }
    }
}

/// Sound for a Space Invaders event, if it has one
pub fn invader_sound(event: &InvaderEvent) -> Option<SoundEffect> {
    let sound = match event {
        InvaderEvent::PlayerShot => SoundEffect::Shoot,
        InvaderEvent::EnemyShot => SoundEffect::EnemyShoot,
        InvaderEvent::EnemyKilled { .. } => SoundEffect::Explosion,
        InvaderEvent::PlayerHit { .. } => SoundEffect::PlayerHit,
        InvaderEvent::ShieldAbsorbed | InvaderEvent::BossHit { destroyed: false, .. } => {
            SoundEffect::Hit
        }
        InvaderEvent::BossHit { destroyed: true, .. } | InvaderEvent::BossDefeated { .. } => {
            SoundEffect::BigExplosion
        }
        InvaderEvent::Bomb => SoundEffect::BigExplosion,
        InvaderEvent::BossPhase { .. } => SoundEffect::BossWarning,
        InvaderEvent::PowerUpCollected { .. } => SoundEffect::PowerUp,
        InvaderEvent::LevelCleared { .. } => SoundEffect::LevelUp,
        InvaderEvent::Paused | InvaderEvent::Resumed => SoundEffect::MenuSelect,
        InvaderEvent::GameOver { .. } => SoundEffect::GameOver,
        InvaderEvent::Victory { .. } => SoundEffect::Victory,
        InvaderEvent::LevelBanner { .. }
        | InvaderEvent::LevelStarted { .. }
        | InvaderEvent::MuteToggled
        | InvaderEvent::ShowGameOver { .. }
        | InvaderEvent::ShowVictory { .. } => return None,
    };
    Some(sound)
}

/// Sound for a Vector Void event, if it has one
pub fn void_sound(event: &VoidEvent) -> Option<SoundEffect> {
    match event {
        VoidEvent::Shot => Some(SoundEffect::Pew),
        VoidEvent::AsteroidDestroyed { .. }
        | VoidEvent::SeekerDestroyed { .. }
        | VoidEvent::ShipHit { .. } => Some(SoundEffect::Shatter),
        VoidEvent::GameOver { .. } => Some(SoundEffect::GameOver),
        VoidEvent::Started | VoidEvent::Paused | VoidEvent::Resumed | VoidEvent::MuteToggled => {
            None
        }
    }
}

/// Fire-and-forget audio output
pub trait AudioSink {
    fn play(&self, effect: SoundEffect);
    fn set_muted(&mut self, muted: bool);
    fn is_muted(&self) -> bool;
    /// Master volume, clamped to 0..=1
    fn set_volume(&mut self, volume: f32);

    /// Flip mute and return the new state
    fn toggle_mute(&mut self) -> bool {
        let muted = !self.is_muted();
        self.set_muted(muted);
        muted
    }
}

/// Plays nothing
#[derive(Debug, Clone)]
pub struct SilentAudio {
    muted: bool,
    volume: f32,
}

impl SilentAudio {
    pub fn new() -> Self {
        Self {
            muted: false,
            volume: 1.0,
        }
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl Default for SilentAudio {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioSink for SilentAudio {
    fn play(&self, _effect: SoundEffect) {}

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn is_muted(&self) -> bool {
        self.muted
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioSink, SoundEffect, Sweep, Tone, Wave};

    /// Web Audio output. Falls back to silence when no context is available.
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        volume: f32,
        muted: bool,
    }

    impl WebAudio {
        pub fn new(volume: f32, muted: bool) -> Self {
            // Fails outside a secure context or without audio hardware
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                volume: volume.clamp(0.0, 1.0),
                muted,
            }
        }

        /// Browsers start the context suspended until a user gesture
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        fn voice(
            ctx: &AudioContext,
            wave: Wave,
            freq: f32,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(match wave {
                Wave::Sine => OscillatorType::Sine,
                Wave::Square => OscillatorType::Square,
                Wave::Sawtooth => OscillatorType::Sawtooth,
                Wave::Triangle => OscillatorType::Triangle,
            });
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        fn play_tone(&self, ctx: &AudioContext, tone: &Tone, vol: f32) {
            let Some((osc, gain)) = Self::voice(ctx, tone.wave, tone.freq) else {
                return;
            };
            let t = ctx.current_time() + f64::from(tone.delay);
            let end = t + f64::from(tone.duration);

            gain.gain().set_value_at_time(tone.gain * vol, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();

            osc.frequency().set_value_at_time(tone.freq, t).ok();
            match tone.sweep {
                Sweep::Hold => {}
                Sweep::Exponential(to) => {
                    osc.frequency().exponential_ramp_to_value_at_time(to, end).ok();
                }
                Sweep::Linear(to) => {
                    osc.frequency().linear_ramp_to_value_at_time(to, end).ok();
                }
                Sweep::Step(steps) => {
                    for &(at, freq) in steps {
                        osc.frequency()
                            .set_value_at_time(freq, t + f64::from(at))
                            .ok();
                    }
                }
            }

            osc.start_with_when(t).ok();
            osc.stop_with_when(end).ok();
        }
    }

    impl AudioSink for WebAudio {
        fn play(&self, effect: SoundEffect) {
            if self.muted || self.volume <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for tone in effect.recipe() {
                self.play_tone(ctx, tone, self.volume);
            }
        }

        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        fn is_muted(&self) -> bool {
            self.muted
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume.clamp(0.0, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invaders::PowerUpKind;
    use glam::Vec2;

    const ALL: [SoundEffect; 15] = [
        SoundEffect::Shoot,
        SoundEffect::EnemyShoot,
        SoundEffect::Explosion,
        SoundEffect::BigExplosion,
        SoundEffect::PowerUp,
        SoundEffect::Hit,
        SoundEffect::PlayerHit,
        SoundEffect::LevelUp,
        SoundEffect::BossWarning,
        SoundEffect::MenuSelect,
        SoundEffect::GameOver,
        SoundEffect::Victory,
        SoundEffect::Pew,
        SoundEffect::Thrust,
        SoundEffect::Shatter,
    ];

    #[test]
    fn test_recipes_are_audible_and_short() {
        for effect in ALL {
            let recipe = effect.recipe();
            assert!(!recipe.is_empty(), "{:?} has no tones", effect);
            for tone in recipe {
                assert!(tone.gain > 0.0 && tone.gain <= 1.0);
                assert!(tone.freq > 0.0);
                assert!(tone.delay + tone.duration <= 1.5, "{:?} too long", effect);
                // Exponential ramps cannot reach zero
                if let Sweep::Exponential(to) = tone.sweep {
                    assert!(to > 0.0);
                }
            }
        }
    }

    #[test]
    fn test_invader_event_sounds() {
        assert_eq!(
            invader_sound(&InvaderEvent::PlayerShot),
            Some(SoundEffect::Shoot)
        );
        assert_eq!(
            invader_sound(&InvaderEvent::PowerUpCollected {
                kind: PowerUpKind::Shield
            }),
            Some(SoundEffect::PowerUp)
        );
        assert_eq!(
            invader_sound(&InvaderEvent::BossHit {
                core: crate::invaders::CoreId::Left,
                destroyed: true,
                points: 2000
            }),
            Some(SoundEffect::BigExplosion)
        );
        assert_eq!(invader_sound(&InvaderEvent::MuteToggled), None);
    }

    #[test]
    fn test_void_event_sounds() {
        assert_eq!(void_sound(&VoidEvent::Shot), Some(SoundEffect::Pew));
        assert_eq!(
            void_sound(&VoidEvent::SeekerDestroyed {
                pos: Vec2::ZERO,
                points: 500
            }),
            Some(SoundEffect::Shatter)
        );
        assert_eq!(void_sound(&VoidEvent::Started), None);
    }

    #[test]
    fn test_silent_sink_mute_and_volume() {
        let mut audio = SilentAudio::new();
        assert!(!audio.is_muted());
        assert!(audio.toggle_mute());
        assert!(!audio.toggle_mute());
        audio.set_volume(3.0);
        assert_eq!(audio.volume(), 1.0);
        audio.play(SoundEffect::Victory);
    }
}
