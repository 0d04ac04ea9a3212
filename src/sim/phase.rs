//! Game phase state machine shared by both games

use serde::{Deserialize, Serialize};

/// Current phase of a game session
///
/// `Menu → Transition → Playing ⇄ Paused`, ending in `GameOver` or `Victory`,
/// both of which return to `Menu`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, background animates
    #[default]
    Menu,
    /// Level banner is showing; hostiles spawn when it ends
    Transition,
    /// Active gameplay
    Playing,
    /// Frozen: drawn but not updated
    Paused,
    /// Session lost
    GameOver,
    /// Final wave/boss defeated
    Victory,
}

impl GamePhase {
    /// Whether gameplay entities advance this frame
    pub fn updates_entities(self) -> bool {
        self == GamePhase::Playing
    }

    /// Session has ended (score is final)
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Victory)
    }

    /// Whether scheduled timers advance in this phase
    pub fn runs_timers(self) -> bool {
        !matches!(self, GamePhase::Paused | GamePhase::Menu)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GamePhase::Menu => "menu",
            GamePhase::Transition => "transition",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "gameover",
            GamePhase::Victory => "victory",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_playing_updates() {
        for phase in [
            GamePhase::Menu,
            GamePhase::Transition,
            GamePhase::Paused,
            GamePhase::GameOver,
            GamePhase::Victory,
        ] {
            assert!(!phase.updates_entities(), "{}", phase.as_str());
        }
        assert!(GamePhase::Playing.updates_entities());
    }

    #[test]
    fn test_paused_freezes_timers() {
        assert!(!GamePhase::Paused.runs_timers());
        assert!(GamePhase::GameOver.runs_timers());
        assert!(GamePhase::Transition.runs_timers());
    }
}
