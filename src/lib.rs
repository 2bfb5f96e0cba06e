//! Horde Core - gameplay core of a top-down survival shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (phases, spawning, movement, hit resolution)
//! - `session`: Startup sequencing and the frame/timer driver
//! - `settings`: Data-driven tuning and difficulty presets
//! - `highscores`: Leaderboard collaborator boundary
//! - `audio`: Audio cue boundary

pub mod audio;
pub mod error;
pub mod highscores;
pub mod session;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, GameError, PersistenceError};
pub use highscores::{HighScores, Leaderboard, SubmitOutcome};
pub use session::Session;
pub use settings::{Difficulty, Settings, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Reference frame rate the per-tick intro step is tuned for
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Half-extent of the square arena (world units, origin at centre)
    pub const ARENA_HALF_EXTENT: f32 = 200.0;
    /// Projectiles this far past the arena edge are culled
    pub const CULL_MARGIN: f32 = 32.0;

    /// Intro zoom: player scale in PreIntro, per-tick step, and target
    pub const INTRO_START_SCALE: f32 = 4.0;
    pub const INTRO_SCALE_STEP: f32 = 0.01;
    pub const INTRO_END_SCALE: f32 = 1.0;

    /// Collision radii used by the hit resolver
    pub const PROJECTILE_RADIUS: f32 = 8.0;
    pub const ENEMY_RADIUS: f32 = 16.0;
    pub const PLAYER_RADIUS: f32 = 16.0;

    /// Spawner reference periods (milliseconds)
    pub const SPAWN_PERIOD_MS: u64 = 1_000;
    pub const WAVE_PERIOD_MS: u64 = 10_000;
}

/// Euclidean distance between two centres
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// True when two circles overlap (touching edges do not count)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    distance(a, b) < ra + rb
}

/// Clamp a point into the arena square
#[inline]
pub fn clamp_to_arena(pos: Vec2, half_extent: f32) -> Vec2 {
    pos.clamp(Vec2::splat(-half_extent), Vec2::splat(half_extent))
}
