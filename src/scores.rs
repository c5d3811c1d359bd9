//! Score bookkeeping
//!
//! Per-game best scores cached in LocalStorage, the payload a finished run
//! sends to the score service, and the leaderboard rows it returns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::platform;

/// Maximum number of leaderboard rows kept
pub const MAX_LEADERBOARD_ENTRIES: usize = 10;

/// The three games, named the way the score service names them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameKind {
    #[serde(rename = "slideJannah")]
    SlideJannah,
    #[serde(rename = "warTakjil")]
    WarTakjil,
    #[serde(rename = "dilema")]
    Dilema,
}

impl GameKind {
    pub const ALL: [GameKind; 3] = [GameKind::SlideJannah, GameKind::WarTakjil, GameKind::Dilema];

    /// Menu title
    pub fn title(self) -> &'static str {
        match self {
            GameKind::SlideJannah => "Slide to Jannah",
            GameKind::WarTakjil => "War Takjil",
            GameKind::Dilema => "Dilema Ramadan",
        }
    }
}

/// Best score per game, kept locally between sessions
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestScores {
    scores: BTreeMap<GameKind, u64>,
}

impl BestScores {
    /// LocalStorage key (used only in wasm32)
    const STORAGE_KEY: &'static str = "ramadan_arcade_best_scores";

    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished run. Only a higher score replaces the cached one.
    ///
    /// Returns true when the score is a new best.
    pub fn record(&mut self, game: GameKind, score: u64) -> bool {
        let best = self.scores.entry(game).or_insert(0);
        if score > *best {
            *best = score;
            true
        } else {
            false
        }
    }

    pub fn get(&self, game: GameKind) -> u64 {
        self.scores.get(&game).copied().unwrap_or(0)
    }

    /// Sum of the best scores across all games
    pub fn total(&self) -> u64 {
        self.scores.values().sum()
    }

    pub fn load() -> Self {
        platform::load_json(Self::STORAGE_KEY).unwrap_or_default()
    }

    pub fn save(&self) {
        platform::save_json(Self::STORAGE_KEY, self);
    }
}

/// Body of an `update_score` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreSubmission {
    pub action: &'static str,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub game: GameKind,
    pub score: u64,
}

impl ScoreSubmission {
    pub fn new(user_id: impl Into<String>, game: GameKind, score: u64) -> Self {
        Self {
            action: "update_score",
            user_id: user_id.into(),
            game,
            score,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// One leaderboard row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub username: String,
    #[serde(rename = "totalScore")]
    pub total_score: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game: Option<GameKind>,
}

/// Leaderboard as returned by the score service, best first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// LocalStorage key of the last list seen
    const STORAGE_KEY: &'static str = "ramadan_arcade_leaderboard";

    /// Sort descending and keep the top entries
    pub fn from_entries(mut entries: Vec<LeaderboardEntry>) -> Self {
        // Stable sort keeps service order among equal scores
        entries.sort_by(|a, b| b.total_score.cmp(&a.total_score));
        entries.truncate(MAX_LEADERBOARD_ENTRIES);
        Self { entries }
    }

    /// Parse a JSON array of rows
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<LeaderboardEntry> = serde_json::from_str(json)?;
        Ok(Self::from_entries(entries))
    }

    /// Cached list, empty when nothing was stored yet
    pub fn load() -> Self {
        platform::load_json::<Vec<LeaderboardEntry>>(Self::STORAGE_KEY)
            .map(Self::from_entries)
            .unwrap_or_default()
    }

    pub fn save(&self) {
        platform::save_json(Self::STORAGE_KEY, &self.entries);
    }

    /// Put a player's current total on the board.
    ///
    /// A lower total never replaces a listed one. Returns the player's rank,
    /// or None when the total did not make the cut.
    pub fn upsert(&mut self, username: &str, total_score: u64) -> Option<usize> {
        let mut entries = std::mem::take(&mut self.entries);
        match entries.iter_mut().find(|e| e.username == username) {
            Some(entry) => entry.total_score = entry.total_score.max(total_score),
            None => entries.push(LeaderboardEntry {
                username: username.to_string(),
                total_score,
                game: None,
            }),
        }
        *self = Self::from_entries(entries);
        self.rank_of(username)
    }

    /// 1-indexed rank of a user, if listed
    pub fn rank_of(&self, username: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|e| e.username == username)
            .map(|i| i + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ArcadeError;

    #[test]
    fn test_record_keeps_best_only() {
        let mut best = BestScores::new();
        assert!(best.record(GameKind::WarTakjil, 120));
        assert!(!best.record(GameKind::WarTakjil, 80));
        assert!(!best.record(GameKind::WarTakjil, 120));
        assert_eq!(best.get(GameKind::WarTakjil), 120);
        assert_eq!(best.get(GameKind::Dilema), 0);

        best.record(GameKind::Dilema, 550);
        assert_eq!(best.total(), 670);
    }

    #[test]
    fn test_zero_score_is_not_a_best() {
        let mut best = BestScores::new();
        assert!(!best.record(GameKind::SlideJannah, 0));
    }

    #[test]
    fn test_best_scores_roundtrip_uses_wire_names() {
        let mut best = BestScores::new();
        best.record(GameKind::SlideJannah, 35);
        let json = serde_json::to_string(&best).unwrap();
        assert!(json.contains("\"slideJannah\":35"));
        let back: BestScores = serde_json::from_str(&json).unwrap();
        assert_eq!(back, best);
    }

    #[test]
    fn test_submission_payload() {
        let json = ScoreSubmission::new("u-42", GameKind::WarTakjil, 170)
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["action"], "update_score");
        assert_eq!(value["userId"], "u-42");
        assert_eq!(value["game"], "warTakjil");
        assert_eq!(value["score"], 170);
    }

    #[test]
    fn test_game_wire_names() {
        let names: Vec<String> = GameKind::ALL
            .iter()
            .map(|g| serde_json::to_string(g).unwrap())
            .collect();
        assert_eq!(names, ["\"slideJannah\"", "\"warTakjil\"", "\"dilema\""]);
    }

    #[test]
    fn test_leaderboard_sorted_and_truncated() {
        let rows: Vec<String> = (0..12)
            .map(|i| format!(r#"{{"username":"p{i}","totalScore":{}}}"#, i * 10))
            .collect();
        let json = format!("[{}]", rows.join(","));
        let board = Leaderboard::from_json(&json).unwrap();
        assert_eq!(board.entries.len(), MAX_LEADERBOARD_ENTRIES);
        assert_eq!(board.entries[0].username, "p11");
        assert_eq!(board.entries[9].total_score, 20);
        assert_eq!(board.rank_of("p11"), Some(1));
        assert_eq!(board.rank_of("p0"), None);
    }

    #[test]
    fn test_leaderboard_with_game_tag() {
        let board = Leaderboard::from_json(
            r#"[{"username":"a","totalScore":5,"game":"dilema"},{"username":"b","totalScore":9}]"#,
        )
        .unwrap();
        assert_eq!(board.entries[0].username, "b");
        assert_eq!(board.entries[1].game, Some(GameKind::Dilema));
    }

    #[test]
    fn test_upsert_places_player() {
        let mut board = Leaderboard::default();
        assert!(board.is_empty());
        assert_eq!(board.upsert("dila", 300), Some(1));
        assert_eq!(board.upsert("budi", 500), Some(1));
        assert_eq!(board.rank_of("dila"), Some(2));

        // A worse total keeps the listed one
        assert_eq!(board.upsert("budi", 100), Some(1));
        assert_eq!(board.entries[0].total_score, 500);
        assert_eq!(board.entries.len(), 2);
    }

    #[test]
    fn test_upsert_on_full_board() {
        let rows: Vec<String> = (1..=10)
            .map(|i| format!(r#"{{"username":"p{i}","totalScore":{}}}"#, i * 100))
            .collect();
        let mut board = Leaderboard::from_json(&format!("[{}]", rows.join(","))).unwrap();
        assert_eq!(board.upsert("late", 50), None);
        assert_eq!(board.entries.len(), MAX_LEADERBOARD_ENTRIES);
        assert_eq!(board.upsert("late", 450), Some(7));
        assert_eq!(board.rank_of("p1"), None);
        assert_eq!(board.entries.len(), MAX_LEADERBOARD_ENTRIES);
    }

    #[test]
    fn test_malformed_leaderboard_is_error() {
        assert!(matches!(
            Leaderboard::from_json("{\"oops\":1}"),
            Err(ArcadeError::Json(_))
        ));
    }
}
