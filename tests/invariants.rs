//! Property tests for the match invariants: population cap, score
//! monotonicity, one credit per enemy, and wave growth.

use glam::Vec2;
use proptest::prelude::*;

use horde_core::consts::FRAME_DT;
use horde_core::settings::{Difficulty, Settings, Tuning};
use horde_core::sim::{
    Entity, EntityId, EnemyFactory, MatchState, Phase, Spawner, TickInput, WavePolicy, activate,
    resolve_hits, tick,
};

fn running_state(tuning: Tuning) -> MatchState {
    let mut state = MatchState::new(tuning);
    activate(&mut state);
    while state.phase == Phase::Intro {
        tick(&mut state, &TickInput::default(), FRAME_DT);
    }
    activate(&mut state);
    assert_eq!(state.phase, Phase::Running);
    state
}

fn parked() -> Box<dyn EnemyFactory> {
    Box::new(|id: EntityId, _: &Tuning| Entity::enemy(id, Vec2::new(180.0, 180.0), 0.0))
}

proptest! {
    #[test]
    fn spawner_never_exceeds_cap(
        cap in 1usize..60,
        preload in 0usize..60,
        steps in prop::collection::vec(1u64..25_000, 1..20),
    ) {
        let tuning = Tuning { population_cap: cap, ..Tuning::default() };
        let mut state = running_state(tuning);
        for _ in 0..preload.min(cap) {
            let id = state.next_entity_id();
            state.enemies.push(Entity::enemy(id, Vec2::new(180.0, 180.0), 0.0));
        }
        let mut spawner = Spawner::new(&state.tuning, parked());

        for ms in steps {
            spawner.advance(ms, &mut state);
            prop_assert!(state.live_enemy_count() <= cap);
        }
    }

    #[test]
    fn wave_size_only_grows(waves in 1usize..30, cap in 1usize..50) {
        let tuning = Tuning { population_cap: cap, ..Tuning::default() };
        let mut state = running_state(tuning);
        let mut spawner = Spawner::new(&state.tuning, parked());

        let mut last = spawner.wave_size();
        for _ in 0..waves {
            let fired_before = spawner.waves_fired();
            spawner.wave(&mut state);
            if spawner.waves_fired() > fired_before {
                prop_assert!((spawner.wave_size() - last * 1.3).abs() < 1e-6 * last.max(1.0));
            } else {
                prop_assert_eq!(spawner.wave_size(), last);
            }
            prop_assert!(spawner.wave_size() >= last);
            last = spawner.wave_size();
            prop_assert!(state.live_enemy_count() <= cap);
        }
    }

    #[test]
    fn each_enemy_credited_at_most_once(
        projectiles in prop::collection::vec((-50.0f32..50.0, -50.0f32..50.0), 0..12),
        enemies in prop::collection::vec((-50.0f32..50.0, -50.0f32..50.0), 0..12),
    ) {
        let projectiles: Vec<Entity> = projectiles
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Entity::projectile(EntityId(1000 + i as u32), EntityId(0), Vec2::new(x, y), Vec2::X, 0.0))
            .collect();
        let mut live: Vec<Entity> = enemies
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| Entity::enemy(EntityId(i as u32 + 1), Vec2::new(x, y), 0.0))
            .collect();
        let before = live.len();

        let report = resolve_hits(&projectiles, &mut live, 8.0, 16.0);

        let mut ids: Vec<_> = report.killed.iter().map(|e| e.id).collect();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), report.kill_count());
        prop_assert_eq!(live.len() + report.kill_count(), before);
        prop_assert!(live.iter().all(|e| !ids.contains(&e.id)));
        // Every survivor really is out of reach of every projectile
        for e in &live {
            for p in &projectiles {
                prop_assert!(p.pos.distance(e.pos) >= 24.0);
            }
        }
    }

    #[test]
    fn score_never_decreases(
        seed in any::<u64>(),
        inputs in prop::collection::vec((-1.0f32..1.0, -1.0f32..1.0, any::<bool>()), 1..400),
    ) {
        let settings = Settings { seed, ..Settings::from_preset(Difficulty::Horde) };
        let mut state = running_state(settings.tuning.clone());
        let mut spawner = Spawner::new(
            &state.tuning,
            Box::new(horde_core::sim::EdgeFactory::new(settings.seed)),
        );

        let mut last = state.score();
        for (i, &(x, y, fire)) in inputs.iter().enumerate() {
            spawner.advance(if i % 3 == 0 { 17 } else { 16 }, &mut state);
            let aim = state.enemies.first().map(|e| e.pos);
            let input = TickInput { move_dir: Vec2::new(x, y), aim, fire };
            tick(&mut state, &input, FRAME_DT);

            prop_assert!(state.score() >= last);
            prop_assert!(state.score() - last <= 40);
            prop_assert!(state.live_enemy_count() <= state.tuning.population_cap);
            last = state.score();
            if state.phase == Phase::GameOver {
                break;
            }
        }
    }
}

#[test]
fn disabled_policy_trickles_only() {
    let settings = Settings::from_preset(Difficulty::Trickle);
    assert_eq!(settings.tuning.wave_policy, WavePolicy::Disabled);
    let mut state = running_state(settings.tuning.clone());
    let mut spawner = Spawner::new(&state.tuning, parked());

    spawner.advance(5_000, &mut state);
    assert_eq!(state.live_enemy_count(), 5);
    // Waves would have added a burst at 10s; the trickle caps out at 10
    spawner.advance(60_000, &mut state);
    assert_eq!(state.live_enemy_count(), 10);
    assert_eq!(spawner.waves_fired(), 0);
}
