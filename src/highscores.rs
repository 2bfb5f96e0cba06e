//! High score leaderboard
//!
//! The leaderboard itself is an outside collaborator. The core only needs
//! a board to show before play and somewhere to submit the final score;
//! failures on either side never touch match state.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Player name as entered
    pub name: String,
    /// Kills in the match
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: u64,
}

/// High score leaderboard, sorted descending by score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a new entry (if it qualifies); returns the 1-indexed rank achieved
    pub fn add(&mut self, entry: HighScoreEntry) -> Option<usize> {
        if !self.qualifies(entry.score) {
            return None;
        }

        let pos = self.entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

/// Where submitting the final score ended up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// No leaderboard configured, or the session already ended
    Skipped,
    /// Accepted; rank on the local copy of the board if it placed
    Submitted { rank: Option<usize> },
    /// Rejected; message meant for a user-visible alert
    Failed { alert: String },
}

/// Remote/durable leaderboard storage
pub trait Leaderboard {
    fn fetch(&mut self) -> Result<HighScores, PersistenceError>;
    fn submit(&mut self, entry: &HighScoreEntry) -> Result<(), PersistenceError>;
}

/// Leaderboard kept in a JSON document on disk
#[derive(Debug, Clone)]
pub struct JsonFileLeaderboard {
    path: PathBuf,
}

impl JsonFileLeaderboard {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Leaderboard for JsonFileLeaderboard {
    fn fetch(&mut self) -> Result<HighScores, PersistenceError> {
        if !self.path.exists() {
            log::info!("No high scores found, starting fresh");
            return Ok(HighScores::new());
        }
        let json = fs::read_to_string(&self.path)?;
        let scores: HighScores = serde_json::from_str(&json)?;
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    fn submit(&mut self, entry: &HighScoreEntry) -> Result<(), PersistenceError> {
        let mut scores = self.fetch()?;
        scores.add(entry.clone());
        let json = serde_json::to_string_pretty(&scores)?;
        fs::write(&self.path, json)?;
        log::info!("High scores saved ({} entries)", scores.entries.len());
        Ok(())
    }
}

/// Fetch the board, degrading to an empty one on failure
pub fn fetch_or_empty(board: &mut dyn Leaderboard) -> HighScores {
    match board.fetch() {
        Ok(scores) => scores,
        Err(e) => {
            log::warn!("leaderboard fetch failed, showing empty board: {e}");
            HighScores::new()
        }
    }
}
