//! Horde Core entry point
//!
//! Headless native driver: runs one scripted match on a fixed 60 Hz clock
//! with a simple auto-aim pilot and logs the outcome.
//!
//! Usage: `horde-core [settings.json] [scores.json]`

use std::path::PathBuf;
use std::process::ExitCode;

use horde_core::audio::LogAudio;
use horde_core::consts::FRAME_DT;
use horde_core::highscores::JsonFileLeaderboard;
use horde_core::session::HeadlessAssets;
use horde_core::sim::{GameEvent, MatchState, Phase, TickInput};
use horde_core::{Leaderboard, Session, Settings, SubmitOutcome};

/// Hard stop for the demo (10 minutes of game time)
const MAX_FRAMES: u64 = 60 * 60 * 10;

/// Wall-clock milliseconds for frame `n` on an exact 60 Hz clock
fn frame_ms(n: u64) -> u64 {
    (n + 1) * 1000 / 60 - n * 1000 / 60
}

/// Aim at the nearest enemy and back away from it
fn pilot(state: &MatchState) -> TickInput {
    let me = state.player.pos;
    let nearest = state
        .enemies
        .iter()
        .min_by(|a, b| {
            a.pos
                .distance_squared(me)
                .partial_cmp(&b.pos.distance_squared(me))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|e| e.pos);

    match nearest {
        Some(target) => {
            // Retreat toward the centre so the player doesn't pin itself to a wall
            let away = (me - target).normalize_or_zero();
            let home = -me * 0.01;
            TickInput {
                move_dir: away + home,
                aim: Some(target),
                fire: true,
            }
        }
        None if me.length() > 1.0 => TickInput {
            move_dir: -me,
            ..Default::default()
        },
        None => TickInput::default(),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Horde Core (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next().map(PathBuf::from) {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{e}");
                return ExitCode::FAILURE;
            }
        },
        None => Settings::default(),
    };
    let leaderboard = args
        .next()
        .map(|path| Box::new(JsonFileLeaderboard::new(path)) as Box<dyn Leaderboard>);

    let mut session = match Session::start(
        &settings,
        &mut HeadlessAssets,
        leaderboard,
        Box::new(LogAudio::default()),
    ) {
        Ok(session) => session,
        Err(e) => {
            log::error!("startup aborted: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(top) = session.board().top_score() {
        log::info!("Score to beat: {top}");
    }

    // Click through the title, let the intro play out, click to start
    session.activate();
    let mut frame = 0;
    let mut started = false;
    while frame < MAX_FRAMES && !session.is_over() {
        let input = if started {
            pilot(session.state())
        } else {
            TickInput::default()
        };
        let events = session.frame(&input, FRAME_DT, frame_ms(frame));
        frame += 1;

        for event in &events {
            if let GameEvent::ScoreChanged(score) = event {
                if score % 10 == 0 {
                    log::info!("Score: {score}");
                }
            }
        }

        if !started && session.phase() == Phase::Start {
            started = session.activate();
        }
    }

    let snapshot = session.snapshot();
    log::debug!(
        "final frame: {}",
        serde_json::to_string(&snapshot).unwrap_or_default()
    );
    log::info!(
        "Match finished after {:.1}s in {} with score {} ({} enemies alive, {} waves)",
        frame as f32 * FRAME_DT,
        snapshot.phase.as_str(),
        snapshot.score,
        snapshot.enemies.len(),
        session.spawner().waves_fired()
    );

    match session.end("headless") {
        SubmitOutcome::Failed { alert } => log::warn!("{alert}"),
        SubmitOutcome::Submitted { rank: Some(rank) } => log::info!("New high score! Rank #{rank}"),
        SubmitOutcome::Submitted { rank: None } | SubmitOutcome::Skipped => {}
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_ms_sums_to_one_second() {
        let total: u64 = (0..60).map(frame_ms).sum();
        assert_eq!(total, 1000);
    }
}
