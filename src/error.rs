//! Error types
//!
//! The simulation itself never fails; errors only come from the edges:
//! configuration, asset loading and the leaderboard.

use thiserror::Error;

/// Configuration loading/validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Leaderboard fetch/submit errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("leaderboard unavailable: {0}")]
    Unavailable(String),

    #[error("leaderboard I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed leaderboard document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Fatal startup errors
#[derive(Debug, Error)]
pub enum GameError {
    #[error("asset loading failed: {0}")]
    AssetLoad(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Convenience type alias for startup results
pub type Result<T> = std::result::Result<T, GameError>;
