//! High score leaderboard
//!
//! Persisted as a JSON array under `spaceInvadersHighScores`, best first,
//! at most ten entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::persistence::KeyValueStore;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Names are stored upper-cased and cut to this many characters
pub const MAX_NAME_LEN: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub name: String,
    pub score: u64,
    /// Serialized as `YYYY-MM-DD`
    pub date: NaiveDate,
    #[serde(rename = "maxCombo")]
    pub max_combo: u32,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScores {
    entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub const STORAGE_KEY: &'static str = "spaceInvadersHighScores";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[HighScoreEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best score so far, 0 when the board is empty
    pub fn top_score(&self) -> u64 {
        self.entries.first().map(|e| e.score).unwrap_or(0)
    }

    /// A score makes the board while it has free slots, otherwise only by
    /// beating the lowest entry
    pub fn qualifies(&self, score: u64) -> bool {
        self.entries.len() < MAX_HIGH_SCORES
            || self.entries.last().is_some_and(|e| score > e.score)
    }

    /// Insert a score and return its 1-based rank, or `None` when it did
    /// not make the board. Ties rank below existing entries.
    pub fn add(&mut self, name: &str, score: u64, max_combo: u32, date: NaiveDate) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            name: name.to_uppercase().chars().take(MAX_NAME_LEN).collect(),
            score,
            date,
            max_combo,
        };

        let idx = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(idx, entry);
        self.entries.truncate(MAX_HIGH_SCORES);

        Some(idx + 1)
    }

    /// Load from the store. Anything unreadable yields an empty board.
    pub fn load<S: KeyValueStore>(store: &S) -> Self {
        match store.load_json::<Vec<HighScoreEntry>>(Self::STORAGE_KEY) {
            Ok(Some(mut entries)) => {
                // Keep the invariants even if the stored list was edited by hand
                entries.sort_by(|a, b| b.score.cmp(&a.score));
                entries.truncate(MAX_HIGH_SCORES);
                log::info!("Loaded {} high scores", entries.len());
                Self { entries }
            }
            Ok(None) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
            Err(e) => {
                log::warn!("Could not load high scores: {}", e);
                Self::new()
            }
        }
    }

    /// Save to the store; failures are logged and otherwise ignored
    pub fn save<S: KeyValueStore>(&self, store: &mut S) {
        match store.save_json(Self::STORAGE_KEY, self) {
            Ok(()) => log::info!("High scores saved ({} entries)", self.entries.len()),
            Err(e) => log::warn!("Could not save high scores: {}", e),
        }
    }
}

/// Today's UTC date, the day an ISO timestamp would carry
#[cfg(target_arch = "wasm32")]
pub fn today() -> NaiveDate {
    let now = js_sys::Date::new_0();
    NaiveDate::from_ymd_opt(
        now.get_utc_full_year() as i32,
        now.get_utc_month() + 1,
        now.get_utc_date(),
    )
    .unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use proptest::prelude::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    fn full_board() -> HighScores {
        let mut board = HighScores::new();
        for i in 1..=10 {
            board.add("ace", i * 1000, 0, day());
        }
        board
    }

    #[test]
    fn test_today_is_utc_calendar_day() {
        let before = chrono::Utc::now().date_naive();
        let day = today();
        let after = chrono::Utc::now().date_naive();
        assert!(day == before || day == after);
    }

    #[test]
    fn test_empty_board_takes_anything() {
        let board = HighScores::new();
        assert!(board.qualifies(0));
        assert_eq!(board.top_score(), 0);
    }

    #[test]
    fn test_full_board_needs_to_beat_last() {
        let mut board = full_board();
        assert!(!board.qualifies(1000));
        assert!(board.qualifies(1001));
        assert_eq!(board.add("x", 500, 0, day()), None);

        assert_eq!(board.add("x", 5500, 0, day()), Some(6));
        assert_eq!(board.entries().len(), MAX_HIGH_SCORES);
        assert_eq!(board.entries().last().map(|e| e.score), Some(2000));
    }

    #[test]
    fn test_ties_rank_below_existing() {
        let mut board = HighScores::new();
        board.add("first", 100, 0, day());
        assert_eq!(board.add("second", 100, 0, day()), Some(2));
        assert_eq!(board.entries()[0].name, "FIRST");
    }

    #[test]
    fn test_name_normalised() {
        let mut board = HighScores::new();
        board.add("victorious player", 10, 3, day());
        assert_eq!(board.entries()[0].name, "VICTORIOUS");
    }

    #[test]
    fn test_json_shape() {
        let mut board = HighScores::new();
        board.add("player", 4650, 12, day());
        let json = serde_json::to_string(&board).unwrap();
        assert_eq!(
            json,
            r#"[{"name":"PLAYER","score":4650,"date":"2024-03-09","maxCombo":12}]"#
        );
        let back: HighScores = serde_json::from_str(&json).unwrap();
        assert_eq!(back, board);
    }

    #[test]
    fn test_load_save_through_store() {
        let mut store = MemoryStore::new();
        assert!(HighScores::load(&store).is_empty());

        let board = full_board();
        board.save(&mut store);
        assert_eq!(HighScores::load(&store), board);
    }

    #[test]
    fn test_corrupt_store_degrades_to_empty() {
        let mut store = MemoryStore::new();
        store.set(HighScores::STORAGE_KEY, "[{\"name\":").unwrap();
        assert!(HighScores::load(&store).is_empty());
    }

    proptest! {
        #[test]
        fn board_stays_sorted_and_bounded(scores in prop::collection::vec(0u64..100_000, 0..40)) {
            let mut board = HighScores::new();
            for score in scores {
                board.add("p", score, 0, day());
            }
            prop_assert!(board.entries().len() <= MAX_HIGH_SCORES);
            prop_assert!(board.entries().windows(2).all(|w| w[0].score >= w[1].score));
        }

        #[test]
        fn names_never_exceed_limit(name in "[a-z ]{0,30}") {
            let mut board = HighScores::new();
            board.add(&name, 1, 0, day());
            let stored = &board.entries()[0].name;
            prop_assert!(stored.chars().count() <= MAX_NAME_LEN);
            prop_assert_eq!(stored.clone(), name.to_uppercase().chars().take(MAX_NAME_LEN).collect::<String>());
        }
    }
}
