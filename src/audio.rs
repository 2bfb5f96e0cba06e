//! Audio cue boundary
//!
//! The core never plays sound itself. It emits discrete cues at phase
//! transitions and an [`AudioSink`] turns them into music and ambience.

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Audio trigger events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCue {
    /// Background music starts (leaving PreIntro)
    AmbientStart,
    /// Weather/ambient sound effects unmuted (leaving PreIntro)
    AmbientSoundEnable,
    /// Looping horde ambience (entering Running)
    HordeStart,
}

impl AudioCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            AudioCue::AmbientStart => "ambient-start",
            AudioCue::AmbientSoundEnable => "ambient-sound-enable",
            AudioCue::HordeStart => "horde-start",
        }
    }
}

/// Something that can act on audio cues
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

/// Headless sink that only logs cues
#[derive(Debug, Default)]
pub struct LogAudio {
    pub played: Vec<AudioCue>,
}

impl AudioSink for LogAudio {
    fn play(&mut self, cue: AudioCue) {
        log::info!("audio cue: {}", cue.as_str());
        self.played.push(cue);
    }
}

/// Forward every audio cue in `events` to `sink`, in order
pub fn dispatch(events: &[GameEvent], sink: &mut dyn AudioSink) {
    for event in events {
        if let GameEvent::Audio(cue) = event {
            sink.play(*cue);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{EntityId, Phase};

    #[test]
    fn test_dispatch_only_forwards_audio() {
        let events = vec![
            GameEvent::PhaseChanged {
                from: Phase::PreIntro,
                to: Phase::Intro,
            },
            GameEvent::Audio(AudioCue::AmbientStart),
            GameEvent::EnemyKilled(EntityId(4)),
            GameEvent::Audio(AudioCue::AmbientSoundEnable),
        ];
        let mut sink = LogAudio::default();
        dispatch(&events, &mut sink);
        assert_eq!(
            sink.played,
            vec![AudioCue::AmbientStart, AudioCue::AmbientSoundEnable]
        );
    }
}
