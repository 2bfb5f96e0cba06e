//! Match state and core simulation types
//!
//! Everything the phase controller, spawner and hit resolver mutate lives
//! in one owned [`MatchState`] that is passed by reference to each of them.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, PlayerState};
use crate::audio::AudioCue;
use crate::settings::Tuning;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Title screen, waiting for the first activate
    PreIntro,
    /// Zoom-in animation, advances on its own
    Intro,
    /// Waiting for the activate that starts play
    Start,
    /// Active gameplay
    Running,
    /// Match ended (terminal)
    GameOver,
}

impl Phase {
    /// The overlay scene shown for this phase (the intro has none)
    pub fn scene(&self) -> Option<Scene> {
        match self {
            Phase::PreIntro => Some(Scene::PreIntro),
            Phase::Intro => None,
            Phase::Start => Some(Scene::Start),
            Phase::Running => Some(Scene::Running),
            Phase::GameOver => Some(Scene::GameOver),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::PreIntro => "PRE_INTRO",
            Phase::Intro => "INTRO",
            Phase::Start => "START",
            Phase::Running => "RUNNING",
            Phase::GameOver => "GAME_OVER",
        }
    }
}

/// Presentation overlays selected by phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scene {
    /// "Click to Continue"
    PreIntro,
    /// "Click to Start Game"
    Start,
    /// Score HUD
    Running,
    /// "Game Over!"
    GameOver,
}

impl Scene {
    pub const ALL: [Scene; 4] = [Scene::PreIntro, Scene::Start, Scene::GameOver, Scene::Running];
}

/// Things collaborators should react to, in the order they happened
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: Phase, to: Phase },
    Audio(AudioCue),
    /// New score value after a confirmed kill
    ScoreChanged(u64),
    EnemySpawned(EntityId),
    EnemyKilled(EntityId),
    PlayerDied,
}

/// Intro zoom countdown
///
/// Kept as whole steps so the scale lands exactly on the end value after
/// the configured number of ticks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntroZoom {
    pub remaining: u32,
    pub total: u32,
    pub step: f32,
    pub end_scale: f32,
}

impl IntroZoom {
    pub fn from_tuning(tuning: &Tuning) -> Self {
        let total = tuning.intro_ticks();
        Self {
            remaining: total,
            total,
            step: tuning.intro_scale_step,
            end_scale: tuning.intro_end_scale,
        }
    }

    pub fn scale(&self) -> f32 {
        self.end_scale + self.remaining as f32 * self.step
    }

    pub fn reset(&mut self) {
        self.remaining = self.total;
    }

    /// Shrink by one step; true once the end scale has been reached
    pub fn advance(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.is_done()
    }

    pub fn is_done(&self) -> bool {
        self.remaining == 0
    }
}

/// Read-only view handed to the renderer each frame
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: Phase,
    pub scene: Option<Scene>,
    pub score: u64,
    pub player_scale: f32,
    pub player_health: f32,
    pub player_pos: Vec2,
    pub enemies: Vec<(EntityId, Vec2)>,
    pub projectiles: Vec<(EntityId, Vec2)>,
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct MatchState {
    /// Tuning the match was started with
    pub tuning: Tuning,
    /// Current phase
    pub phase: Phase,
    /// The player
    pub player: Entity,
    /// Live enemies, in spawn order
    pub enemies: Vec<Entity>,
    /// Live projectiles, in fire order
    pub projectiles: Vec<Entity>,
    /// Intro zoom countdown
    pub intro: IntroZoom,
    /// Frame counter
    pub time_ticks: u64,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl MatchState {
    /// Fresh match in PreIntro
    pub fn new(tuning: Tuning) -> Self {
        let intro = IntroZoom::from_tuning(&tuning);
        let mut state = Self {
            phase: Phase::PreIntro,
            player: Entity::player(EntityId(0), Vec2::ZERO, tuning.player_health, intro.scale()),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            intro,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
            tuning,
        };
        state.player.id = state.next_entity_id();
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn player_state(&self) -> &PlayerState {
        match self.player.as_player() {
            Some(p) => p,
            None => unreachable!("player slot always holds a player"),
        }
    }

    pub fn player_state_mut(&mut self) -> &mut PlayerState {
        match self.player.as_player_mut() {
            Some(p) => p,
            None => unreachable!("player slot always holds a player"),
        }
    }

    pub fn score(&self) -> u64 {
        self.player_state().score
    }

    /// Either liveness flag going down counts as death
    pub fn player_dead(&self) -> bool {
        !self.player.is_alive() || self.player_state().dead
    }

    pub fn live_enemy_count(&self) -> usize {
        self.enemies.len()
    }

    /// True when the spawner may add another enemy
    pub fn below_cap(&self) -> bool {
        self.enemies.len() < self.tuning.population_cap
    }

    /// Append a freshly created enemy to the live set
    pub fn push_enemy(&mut self, enemy: Entity) {
        debug_assert!(enemy.is_enemy());
        debug_assert!(
            self.enemies.iter().all(|e| e.id != enemy.id),
            "enemy {:?} already live",
            enemy.id
        );
        self.events.push(GameEvent::EnemySpawned(enemy.id));
        self.enemies.push(enemy);
    }

    /// Move to a new phase, recording the transition
    pub fn set_phase(&mut self, to: Phase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("phase {} -> {}", from.as_str(), to.as_str());
        self.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    /// The single visible overlay, if any
    pub fn visible_scene(&self) -> Option<Scene> {
        self.phase.scene()
    }

    /// Visibility flag for every overlay scene
    pub fn scene_visibility(&self) -> [(Scene, bool); 4] {
        let visible = self.visible_scene();
        Scene::ALL.map(|scene| (scene, Some(scene) == visible))
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> Snapshot {
        let player = self.player_state();
        Snapshot {
            phase: self.phase,
            scene: self.visible_scene(),
            score: player.score,
            player_scale: player.scale,
            player_health: player.health,
            player_pos: self.player.pos,
            enemies: self.enemies.iter().map(|e| (e.id, e.pos)).collect(),
            projectiles: self.projectiles.iter().map(|p| (p.id, p.pos)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_match_starts_pre_intro() {
        let state = MatchState::new(Tuning::default());
        assert_eq!(state.phase, Phase::PreIntro);
        assert_eq!(state.score(), 0);
        assert!(!state.player_dead());
        assert!((state.player_state().scale - 4.0).abs() < 1e-5);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_ids_unique() {
        let mut state = MatchState::new(Tuning::default());
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
        assert_ne!(a, state.player.id);
    }

    #[test]
    fn test_intro_zoom_lands_exactly() {
        let mut zoom = IntroZoom::from_tuning(&Tuning::default());
        assert!((zoom.scale() - 4.0).abs() < 1e-5);
        for _ in 0..299 {
            assert!(!zoom.advance());
        }
        assert!(zoom.scale() > 1.0);
        assert!(zoom.advance());
        assert_eq!(zoom.scale(), 1.0);
    }

    #[test]
    fn test_exactly_one_scene_per_phase() {
        let mut state = MatchState::new(Tuning::default());
        for phase in [Phase::PreIntro, Phase::Start, Phase::Running, Phase::GameOver] {
            state.phase = phase;
            let visible: Vec<_> = state
                .scene_visibility()
                .iter()
                .filter(|(_, v)| *v)
                .map(|(s, _)| *s)
                .collect();
            assert_eq!(visible.len(), 1);
            assert_eq!(Some(visible[0]), phase.scene());
        }

        state.phase = Phase::Intro;
        assert!(state.scene_visibility().iter().all(|(_, v)| !v));
    }

    #[test]
    fn test_set_phase_records_event() {
        let mut state = MatchState::new(Tuning::default());
        state.set_phase(Phase::Intro);
        state.set_phase(Phase::Intro);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::PhaseChanged {
                from: Phase::PreIntro,
                to: Phase::Intro
            }]
        );
        assert!(state.events.is_empty());
    }
}
