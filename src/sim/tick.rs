//! Per-frame simulation tick and the activate signal
//!
//! Frame order: player-death check, then phase logic, then (Running only)
//! movement, contact damage and hit resolution.

use glam::Vec2;

use super::collision::{contact_count, out_of_bounds, resolve_match_hits};
use super::entity::{Entity, EntityKind};
use super::state::{GameEvent, MatchState, Phase};
use crate::audio::AudioCue;
use crate::clamp_to_arena;
use crate::consts::CULL_MARGIN;

/// Player input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired movement direction (normalised here)
    pub move_dir: Vec2,
    /// World point the player is aiming at
    pub aim: Option<Vec2>,
    /// Fire toward `aim`
    pub fire: bool,
}

/// Handle the single generic user input (click/tap)
///
/// Advances PreIntro to Intro and Start to Running; ignored everywhere else.
/// Returns true if the phase changed.
pub fn activate(state: &mut MatchState) -> bool {
    match state.phase {
        Phase::PreIntro => {
            state.set_phase(Phase::Intro);
            state.events.push(GameEvent::Audio(AudioCue::AmbientStart));
            state.events.push(GameEvent::Audio(AudioCue::AmbientSoundEnable));
            true
        }
        Phase::Start => {
            state.set_phase(Phase::Running);
            state.events.push(GameEvent::Audio(AudioCue::HordeStart));
            true
        }
        Phase::Intro | Phase::Running | Phase::GameOver => {
            log::debug!("activate ignored in {}", state.phase.as_str());
            false
        }
    }
}

/// Advance the match by one frame of `dt` seconds
pub fn tick(state: &mut MatchState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    // Death overrides everything else this frame
    if state.player_dead() && state.phase != Phase::GameOver {
        end_match(state);
        return;
    }

    match state.phase {
        Phase::PreIntro => {
            state.intro.reset();
            state.player_state_mut().scale = state.intro.scale();
        }
        Phase::Intro => {
            let done = state.intro.advance();
            state.player_state_mut().scale = state.intro.scale();
            if done {
                state.set_phase(Phase::Start);
            }
        }
        Phase::Running => run_frame(state, input, dt),
        Phase::Start | Phase::GameOver => {}
    }
}

fn end_match(state: &mut MatchState) {
    state.player.kill();
    state.events.push(GameEvent::PlayerDied);
    state.set_phase(Phase::GameOver);
    log::info!(
        "game over at tick {} with score {}",
        state.time_ticks,
        state.score()
    );
}

fn run_frame(state: &mut MatchState, input: &TickInput, dt: f32) {
    update_player(state, input, dt);
    update_enemies(state, dt);
    update_projectiles(state, dt);

    // Contact damage can kill the player; that ends the match before any
    // kill this frame is credited
    apply_contact_damage(state, dt);
    if state.player_dead() {
        end_match(state);
        return;
    }

    resolve_match_hits(state);
}

fn update_player(state: &mut MatchState, input: &TickInput, dt: f32) {
    let speed = state.tuning.player_speed;
    let half = state.tuning.arena_half_extent;
    let step = input.move_dir.normalize_or_zero() * speed * dt;
    state.player.vel = step / dt.max(f32::EPSILON);
    state.player.pos = clamp_to_arena(state.player.pos + step, half);

    let cooldown = {
        let player = state.player_state_mut();
        player.fire_cooldown = (player.fire_cooldown - dt).max(0.0);
        player.fire_cooldown
    };

    if !input.fire || cooldown > 0.0 {
        return;
    }
    let Some(aim) = input.aim else {
        return;
    };
    let dir = aim - state.player.pos;
    if dir.length_squared() <= f32::EPSILON {
        return;
    }

    let id = state.next_entity_id();
    let projectile = Entity::projectile(
        id,
        state.player.id,
        state.player.pos,
        dir,
        state.tuning.projectile_speed,
    );
    state.projectiles.push(projectile);
    state.player_state_mut().fire_cooldown = state.tuning.fire_cooldown_secs;
}

fn update_enemies(state: &mut MatchState, dt: f32) {
    let target = state.player.pos;
    for enemy in state.enemies.iter_mut().filter(|e| e.is_alive()) {
        let speed = match &enemy.kind {
            EntityKind::Enemy(e) => e.speed,
            _ => continue,
        };
        enemy.vel = (target - enemy.pos).normalize_or_zero() * speed;
        enemy.integrate(dt);
    }
}

fn update_projectiles(state: &mut MatchState, dt: f32) {
    let half = state.tuning.arena_half_extent;
    for projectile in state.projectiles.iter_mut() {
        projectile.integrate(dt);
        if out_of_bounds(projectile.pos, half, CULL_MARGIN) {
            projectile.alive = false;
        }
    }
    state.projectiles.retain(|p| p.is_alive());
}

fn apply_contact_damage(state: &mut MatchState, dt: f32) {
    let touching = contact_count(
        state.player.pos,
        state.tuning.player_radius,
        &state.enemies,
        state.tuning.enemy_radius,
    );
    if touching == 0 {
        return;
    }

    let damage = touching as f32 * state.tuning.contact_damage_per_sec * dt;
    let player = state.player_state_mut();
    player.health -= damage;
    if player.health <= 0.0 {
        player.health = 0.0;
        state.player.kill();
    }
}
