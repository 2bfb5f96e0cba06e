//! Session: startup sequencing and the frame/timer driver
//!
//! Startup order is leaderboard fetch, then asset loading, then play. The
//! session owns the match state and the spawner, and is the only thing
//! that mutates either; collaborators get events and snapshots.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::audio::{self, AudioSink};
use crate::error::Result;
use crate::highscores::{self, HighScoreEntry, HighScores, Leaderboard, SubmitOutcome};
use crate::settings::{Settings, Tuning};
use crate::sim::{
    EdgeFactory, EnemyFactory, GameEvent, MatchState, Phase, Snapshot, Spawner, TickInput,
    activate, tick,
};

/// Provides the enemy factory once enemy assets are ready
pub trait AssetLoader {
    fn load(&mut self, tuning: &Tuning, seed: u64) -> Result<Box<dyn EnemyFactory>>;
}

/// Asset-free loader for headless runs: enemies appear on the arena edge
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadlessAssets;

impl AssetLoader for HeadlessAssets {
    fn load(&mut self, _tuning: &Tuning, seed: u64) -> Result<Box<dyn EnemyFactory>> {
        Ok(Box::new(EdgeFactory::new(seed)))
    }
}

/// One match from startup to submission
pub struct Session {
    state: MatchState,
    spawner: Spawner,
    audio: Box<dyn AudioSink>,
    leaderboard: Option<Box<dyn Leaderboard>>,
    board: HighScores,
    /// Events already forwarded to the audio sink
    audio_cursor: usize,
    ended: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.state.phase)
            .field("score", &self.state.score())
            .field("spawner", &self.spawner)
            .field("has_leaderboard", &self.leaderboard.is_some())
            .field("ended", &self.ended)
            .finish()
    }
}

impl Session {
    /// Run startup: fetch the board (if any), load assets, build the match
    pub fn start(
        settings: &Settings,
        assets: &mut dyn AssetLoader,
        mut leaderboard: Option<Box<dyn Leaderboard>>,
        audio: Box<dyn AudioSink>,
    ) -> Result<Self> {
        settings.tuning.validate()?;

        let board = match leaderboard.as_deref_mut() {
            Some(lb) => highscores::fetch_or_empty(lb),
            None => HighScores::new(),
        };

        log::info!("Game loading...");
        let factory = assets.load(&settings.tuning, settings.seed).map_err(|e| {
            log::error!("[Load Failed] -> {e}");
            e
        })?;

        let state = MatchState::new(settings.tuning.clone());
        let spawner = Spawner::new(&state.tuning, factory);
        log::info!(
            "Game assets loaded ({} preset, seed {})",
            settings.difficulty.as_str(),
            settings.seed
        );

        Ok(Self {
            state,
            spawner,
            audio,
            leaderboard,
            board,
            audio_cursor: 0,
            ended: false,
        })
    }

    /// Deliver the activate signal (click/tap)
    pub fn activate(&mut self) -> bool {
        if self.ended {
            return false;
        }
        let changed = activate(&mut self.state);
        self.flush_audio();
        changed
    }

    /// Run one frame
    ///
    /// `elapsed_ms` is wall-clock time since the previous frame and drives
    /// the spawner timers; `dt` (seconds) drives movement. Spawns land
    /// before this frame's tick. Returns every event since the last frame.
    ///
    /// Once the session has ended the match is frozen and nothing advances.
    pub fn frame(&mut self, input: &TickInput, dt: f32, elapsed_ms: u64) -> Vec<GameEvent> {
        if self.ended {
            return Vec::new();
        }
        self.spawner.advance(elapsed_ms, &mut self.state);
        tick(&mut self.state, input, dt);
        self.flush_audio();
        self.audio_cursor = 0;
        self.state.drain_events()
    }

    fn flush_audio(&mut self) {
        let pending = &self.state.events[self.audio_cursor..];
        audio::dispatch(pending, self.audio.as_mut());
        self.audio_cursor = self.state.events.len();
    }

    /// End the session: stop the spawner and submit the final score
    pub fn end(&mut self, name: &str) -> SubmitOutcome {
        if self.ended {
            return SubmitOutcome::Skipped;
        }
        self.ended = true;
        self.spawner.cancel();

        let score = self.final_score();
        let Some(leaderboard) = self.leaderboard.as_deref_mut() else {
            log::info!("session ended with score {score}");
            return SubmitOutcome::Skipped;
        };

        let entry = HighScoreEntry {
            name: name.to_string(),
            score,
            timestamp: now_ms(),
        };
        match leaderboard.submit(&entry) {
            Ok(()) => {
                let rank = self.board.add(entry);
                log::info!("score {score} submitted (rank {rank:?})");
                SubmitOutcome::Submitted { rank }
            }
            Err(e) => {
                log::warn!("score submission failed: {e}");
                SubmitOutcome::Failed {
                    alert: format!("Could not submit your score of {score}: {e}"),
                }
            }
        }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn final_score(&self) -> u64 {
        self.state.score()
    }

    pub fn is_over(&self) -> bool {
        self.state.phase == Phase::GameOver
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn spawner(&self) -> &Spawner {
        &self.spawner
    }

    /// Leaderboard fetched at startup
    pub fn board(&self) -> &HighScores {
        &self.board
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
