//! Enemy spawning
//!
//! Two recurring timers feed the horde: a steady one-at-a-time trickle and
//! a slower wave timer whose batch grows after every wave. Both run on
//! wall-clock time, independent of the frame tick, and only produce
//! enemies while the match is Running and under the population cap.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId};
use super::state::{MatchState, Phase};
use crate::settings::Tuning;

/// How the wave timer behaves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WavePolicy {
    /// Wave timer fires but never spawns
    Disabled,
    /// Spawn `ceil(size)` enemies per wave, then multiply size by `growth`
    Escalating { initial_size: f64, growth: f64 },
}

/// A recurring timer driven by elapsed milliseconds
///
/// Cancelling is permanent; a cancelled timer never fires again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalTimer {
    period_ms: u64,
    elapsed_ms: u64,
    active: bool,
}

impl IntervalTimer {
    pub fn new(period_ms: u64) -> Self {
        Self {
            period_ms: period_ms.max(1),
            elapsed_ms: 0,
            active: true,
        }
    }

    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn cancel(&mut self) {
        self.active = false;
    }

    /// Milliseconds until the next fire, or None once cancelled
    pub fn until_next(&self) -> Option<u64> {
        self.active.then(|| self.period_ms - self.elapsed_ms)
    }

    /// Advance by any amount without reporting fires
    fn skip(&mut self, ms: u64) {
        if self.active {
            self.elapsed_ms = (self.elapsed_ms + ms % self.period_ms) % self.period_ms;
        }
    }

    /// Advance by at most one period; true if the timer fired
    fn step(&mut self, ms: u64) -> bool {
        if !self.active {
            return false;
        }
        self.elapsed_ms += ms;
        if self.elapsed_ms >= self.period_ms {
            self.elapsed_ms -= self.period_ms;
            true
        } else {
            false
        }
    }
}

/// Builds enemy entities; supplied by whoever owns the enemy assets
pub trait EnemyFactory {
    fn create(&mut self, id: EntityId, tuning: &Tuning) -> Entity;
}

impl<F> EnemyFactory for F
where
    F: FnMut(EntityId, &Tuning) -> Entity,
{
    fn create(&mut self, id: EntityId, tuning: &Tuning) -> Entity {
        self(id, tuning)
    }
}

/// Places enemies at a random point on the arena's edge
#[derive(Debug, Clone)]
pub struct EdgeFactory {
    rng: Pcg32,
}

impl EdgeFactory {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl EnemyFactory for EdgeFactory {
    fn create(&mut self, id: EntityId, tuning: &Tuning) -> Entity {
        let h = tuning.arena_half_extent;
        let along = self.rng.random_range(-h..=h);
        let pos = match self.rng.random_range(0..4u8) {
            0 => Vec2::new(along, -h),
            1 => Vec2::new(h, along),
            2 => Vec2::new(along, h),
            _ => Vec2::new(-h, along),
        };
        Entity::enemy(id, pos, tuning.enemy_speed)
    }
}

/// The horde spawner
pub struct Spawner {
    factory: Box<dyn EnemyFactory>,
    spawn_timer: IntervalTimer,
    wave_timer: IntervalTimer,
    policy: WavePolicy,
    /// Current batch size (grows, never resets)
    wave_size: f64,
    waves_fired: u32,
}

impl std::fmt::Debug for Spawner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spawner")
            .field("spawn_timer", &self.spawn_timer)
            .field("wave_timer", &self.wave_timer)
            .field("policy", &self.policy)
            .field("wave_size", &self.wave_size)
            .field("waves_fired", &self.waves_fired)
            .finish()
    }
}

impl Spawner {
    /// Create the spawner; both timers start running immediately
    pub fn new(tuning: &Tuning, factory: Box<dyn EnemyFactory>) -> Self {
        let wave_size = match tuning.wave_policy {
            WavePolicy::Escalating { initial_size, .. } => initial_size,
            WavePolicy::Disabled => 0.0,
        };
        Self {
            factory,
            spawn_timer: IntervalTimer::new(tuning.spawn_period_ms),
            wave_timer: IntervalTimer::new(tuning.wave_period_ms),
            policy: tuning.wave_policy,
            wave_size,
            waves_fired: 0,
        }
    }

    pub fn wave_size(&self) -> f64 {
        self.wave_size
    }

    pub fn waves_fired(&self) -> u32 {
        self.waves_fired
    }

    pub fn policy(&self) -> WavePolicy {
        self.policy
    }

    pub fn is_active(&self) -> bool {
        self.spawn_timer.is_active() || self.wave_timer.is_active()
    }

    /// Stop both timers for good
    pub fn cancel(&mut self) {
        if self.is_active() {
            log::info!("spawner timers cancelled after {} waves", self.waves_fired);
        }
        self.spawn_timer.cancel();
        self.wave_timer.cancel();
    }

    fn create_enemy(&mut self, state: &mut MatchState) -> EntityId {
        let id = state.next_entity_id();
        let enemy = self.factory.create(id, &state.tuning);
        state.push_enemy(enemy);
        id
    }

    /// Trickle spawn: one enemy if Running and under the cap
    pub fn spawn(&mut self, state: &mut MatchState) -> Option<EntityId> {
        if state.phase != Phase::Running || !state.below_cap() {
            return None;
        }
        let id = self.create_enemy(state);
        log::debug!("spawned {:?} ({} live)", id, state.live_enemy_count());
        Some(id)
    }

    /// Wave spawn: a batch if Running and under the cap, then grow the batch
    ///
    /// The batch is clamped to the room left under the cap. Growth applies
    /// whenever the wave fires, however many enemies fit.
    pub fn wave(&mut self, state: &mut MatchState) -> usize {
        let WavePolicy::Escalating { growth, .. } = self.policy else {
            return 0;
        };
        if state.phase != Phase::Running || !state.below_cap() {
            return 0;
        }

        let wanted = self.wave_size.ceil() as usize;
        let room = state.tuning.population_cap - state.live_enemy_count();
        let count = wanted.min(room);
        for _ in 0..count {
            self.create_enemy(state);
        }

        self.waves_fired += 1;
        let next = self.wave_size * growth;
        log::info!(
            "wave {} spawned {}/{} enemies, next size {:.2}",
            self.waves_fired,
            count,
            wanted,
            next
        );
        self.wave_size = next;
        count
    }

    /// Advance both timers by `elapsed_ms` of wall-clock time
    ///
    /// Fires are processed in time order; when both land on the same
    /// instant the trickle goes first. Returns the number of enemies created.
    pub fn advance(&mut self, elapsed_ms: u64, state: &mut MatchState) -> usize {
        let mut remaining = elapsed_ms;
        let mut created = 0;

        loop {
            // Nothing can spawn until the host changes the state
            if state.phase != Phase::Running || !state.below_cap() {
                self.spawn_timer.skip(remaining);
                self.wave_timer.skip(remaining);
                return created;
            }

            let next = match (self.spawn_timer.until_next(), self.wave_timer.until_next()) {
                (Some(a), Some(b)) => a.min(b),
                (Some(a), None) | (None, Some(a)) => a,
                (None, None) => return created,
            };
            if next > remaining {
                self.spawn_timer.step(remaining);
                self.wave_timer.step(remaining);
                return created;
            }

            remaining -= next;
            let spawn_fired = self.spawn_timer.step(next);
            let wave_fired = self.wave_timer.step(next);
            if spawn_fired && self.spawn(state).is_some() {
                created += 1;
            }
            if wave_fired {
                created += self.wave(state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_state(cap: usize) -> MatchState {
        let tuning = Tuning {
            population_cap: cap,
            ..Tuning::default()
        };
        let mut state = MatchState::new(tuning);
        state.phase = Phase::Running;
        state
    }

    fn origin_factory() -> Box<dyn EnemyFactory> {
        Box::new(|id: EntityId, _: &Tuning| Entity::enemy(id, Vec2::ZERO, 0.0))
    }

    fn fill(state: &mut MatchState, n: usize) {
        for _ in 0..n {
            let id = state.next_entity_id();
            state.enemies.push(Entity::enemy(id, Vec2::ZERO, 0.0));
        }
    }

    #[test]
    fn test_spawn_only_while_running() {
        let mut state = running_state(40);
        let mut spawner = Spawner::new(&state.tuning, origin_factory());

        for phase in [Phase::PreIntro, Phase::Intro, Phase::Start, Phase::GameOver] {
            state.phase = phase;
            assert!(spawner.spawn(&mut state).is_none());
            assert_eq!(spawner.wave(&mut state), 0);
        }
        assert!(state.enemies.is_empty());
        assert_eq!(spawner.wave_size(), 5.0);

        state.phase = Phase::Running;
        assert!(spawner.spawn(&mut state).is_some());
        assert_eq!(state.live_enemy_count(), 1);
    }

    #[test]
    fn test_spawn_respects_cap() {
        let mut state = running_state(3);
        let mut spawner = Spawner::new(&state.tuning, origin_factory());
        for _ in 0..10 {
            spawner.spawn(&mut state);
        }
        assert_eq!(state.live_enemy_count(), 3);
    }

    #[test]
    fn test_wave_clamps_to_cap() {
        let mut state = running_state(40);
        fill(&mut state, 39);
        let mut spawner = Spawner::new(&state.tuning, origin_factory());

        assert_eq!(spawner.wave(&mut state), 1);
        assert_eq!(state.live_enemy_count(), 40);
        // Growth still applies even though only one fit
        assert!((spawner.wave_size() - 6.5).abs() < 1e-9);
    }

    #[test]
    fn test_wave_at_cap_does_not_fire_or_grow() {
        let mut state = running_state(10);
        fill(&mut state, 10);
        let mut spawner = Spawner::new(&state.tuning, origin_factory());

        assert_eq!(spawner.wave(&mut state), 0);
        assert_eq!(spawner.waves_fired(), 0);
        assert_eq!(spawner.wave_size(), 5.0);
    }

    #[test]
    fn test_wave_size_grows_and_rounds_up() {
        let mut state = running_state(1000);
        let mut spawner = Spawner::new(&state.tuning, origin_factory());

        assert_eq!(spawner.wave(&mut state), 5);
        // 6.5 -> 7 enemies
        assert_eq!(spawner.wave(&mut state), 7);
        // 8.45 -> 9 enemies
        assert_eq!(spawner.wave(&mut state), 9);
        assert_eq!(state.live_enemy_count(), 21);
        assert!((spawner.wave_size() - 5.0 * 1.3f64.powi(3)).abs() < 1e-9);
    }

    #[test]
    fn test_disabled_waves() {
        let tuning = Tuning {
            population_cap: 10,
            wave_policy: WavePolicy::Disabled,
            ..Tuning::default()
        };
        let mut state = MatchState::new(tuning);
        state.phase = Phase::Running;
        let mut spawner = Spawner::new(&state.tuning, origin_factory());

        assert_eq!(spawner.wave(&mut state), 0);
        assert_eq!(spawner.waves_fired(), 0);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_timers_drive_trickle_and_waves() {
        let mut state = running_state(1000);
        let mut spawner = Spawner::new(&state.tuning, origin_factory());

        // 999ms: nothing yet
        assert_eq!(spawner.advance(999, &mut state), 0);
        // 1ms later the trickle fires
        assert_eq!(spawner.advance(1, &mut state), 1);
        // Up to 10s: 9 more trickles, then the first wave of 5
        assert_eq!(spawner.advance(9_000, &mut state), 14);
        assert_eq!(spawner.waves_fired(), 1);
        assert_eq!(state.live_enemy_count(), 15);
    }

    #[test]
    fn test_large_elapsed_processes_every_fire() {
        let mut state = running_state(1000);
        let mut spawner = Spawner::new(&state.tuning, origin_factory());

        // 20s in one call: 20 trickles plus waves of 5 and 7
        assert_eq!(spawner.advance(20_000, &mut state), 32);
        assert_eq!(spawner.waves_fired(), 2);
    }

    #[test]
    fn test_timers_run_outside_running_but_spawn_nothing() {
        let mut state = running_state(40);
        state.phase = Phase::Start;
        let mut spawner = Spawner::new(&state.tuning, origin_factory());

        assert_eq!(spawner.advance(30_000, &mut state), 0);
        assert!(state.enemies.is_empty());
        assert_eq!(spawner.wave_size(), 5.0);
    }

    #[test]
    fn test_full_arena_skips_idle_fires_but_keeps_timer_phase() {
        let mut state = running_state(1);
        fill(&mut state, 1);
        let mut spawner = Spawner::new(&state.tuning, origin_factory());

        assert_eq!(spawner.advance(u64::MAX / 2, &mut state), 0);
        assert_eq!(spawner.waves_fired(), 0);

        let mut state = running_state(1);
        fill(&mut state, 1);
        let mut spawner = Spawner::new(&state.tuning, origin_factory());
        assert_eq!(spawner.advance(10_500, &mut state), 0);
        assert_eq!(spawner.wave_size(), 5.0);

        // Room frees up; the trickle still fires on the original 1s grid
        state.enemies.clear();
        assert_eq!(spawner.advance(499, &mut state), 0);
        assert_eq!(spawner.advance(1, &mut state), 1);
    }

    #[test]
    fn test_cancel_stops_spawning() {
        let mut state = running_state(40);
        let mut spawner = Spawner::new(&state.tuning, origin_factory());
        spawner.cancel();
        assert!(!spawner.is_active());
        assert_eq!(spawner.advance(60_000, &mut state), 0);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_edge_factory_places_on_edge() {
        let tuning = Tuning::default();
        let mut factory = EdgeFactory::new(42);
        let h = tuning.arena_half_extent;
        for i in 0..50 {
            let enemy = factory.create(EntityId(i), &tuning);
            assert!(enemy.is_enemy());
            let on_edge = (enemy.pos.x.abs() - h).abs() < 1e-4 || (enemy.pos.y.abs() - h).abs() < 1e-4;
            assert!(on_edge, "{:?} not on edge", enemy.pos);
        }
    }

    #[test]
    fn test_edge_factory_deterministic() {
        let tuning = Tuning::default();
        let mut a = EdgeFactory::new(7);
        let mut b = EdgeFactory::new(7);
        for i in 0..10 {
            assert_eq!(
                a.create(EntityId(i), &tuning).pos,
                b.create(EntityId(i), &tuning).pos
            );
        }
    }
}
