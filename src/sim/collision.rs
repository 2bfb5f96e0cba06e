//! Hit detection between projectiles, enemies and the player
//!
//! Everything is circle-vs-circle with a strict overlap test: circles that
//! only touch do not collide. Resolution is brute force over every pair,
//! which is fine for a population capped at a few dozen.

use std::collections::HashSet;

use glam::Vec2;

use super::entity::{Entity, EntityId};
use super::state::{GameEvent, MatchState};
use crate::circles_overlap;

/// Enemies confirmed dead by one resolution pass, in the order they were first hit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitReport {
    pub killed: Vec<Entity>,
}

impl HitReport {
    pub fn kill_count(&self) -> usize {
        self.killed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.killed.is_empty()
    }
}

/// First pass: ids of every live enemy overlapped by at least one projectile
///
/// Each enemy appears once no matter how many projectiles overlap it.
pub fn find_hits(
    projectiles: &[Entity],
    enemies: &[Entity],
    projectile_radius: f32,
    enemy_radius: f32,
) -> Vec<EntityId> {
    let mut seen = HashSet::new();
    let mut hits = Vec::new();

    for projectile in projectiles.iter().filter(|p| p.is_alive()) {
        for enemy in enemies.iter().filter(|e| e.is_alive()) {
            if circles_overlap(projectile.pos, projectile_radius, enemy.pos, enemy_radius)
                && seen.insert(enemy.id)
            {
                hits.push(enemy.id);
            }
        }
    }

    hits
}

/// Resolve projectile/enemy hits
///
/// Hit enemies are collected first, then removed from `enemies` and marked
/// dead in a second pass, so an enemy can be credited at most once per
/// call. Projectiles are not consumed.
pub fn resolve_hits(
    projectiles: &[Entity],
    enemies: &mut Vec<Entity>,
    projectile_radius: f32,
    enemy_radius: f32,
) -> HitReport {
    let hits = find_hits(projectiles, enemies, projectile_radius, enemy_radius);
    if hits.is_empty() {
        return HitReport::default();
    }

    let hit_set: HashSet<EntityId> = hits.iter().copied().collect();
    let mut removed = Vec::with_capacity(hits.len());
    enemies.retain(|enemy| {
        if hit_set.contains(&enemy.id) {
            removed.push(enemy.clone());
            false
        } else {
            true
        }
    });

    // Report in first-hit order rather than list order
    let mut killed = Vec::with_capacity(removed.len());
    for id in hits {
        if let Some(idx) = removed.iter().position(|e| e.id == id) {
            let mut enemy = removed.swap_remove(idx);
            enemy.kill();
            killed.push(enemy);
        }
    }

    HitReport { killed }
}

/// Resolve hits for the match and credit the player one point per kill
pub fn resolve_match_hits(state: &mut MatchState) -> HitReport {
    let projectile_radius = state.tuning.projectile_radius;
    let enemy_radius = state.tuning.enemy_radius;
    let report = resolve_hits(
        &state.projectiles,
        &mut state.enemies,
        projectile_radius,
        enemy_radius,
    );

    for enemy in &report.killed {
        let score = {
            let player = state.player_state_mut();
            player.score += 1;
            player.score
        };
        log::debug!("enemy {:?} killed, score {}", enemy.id, score);
        state.events.push(GameEvent::EnemyKilled(enemy.id));
        state.events.push(GameEvent::ScoreChanged(score));
    }

    report
}

/// Number of live enemies overlapping a circle (the player's body)
pub fn contact_count(center: Vec2, radius: f32, enemies: &[Entity], enemy_radius: f32) -> usize {
    enemies
        .iter()
        .filter(|e| e.is_alive() && circles_overlap(center, radius, e.pos, enemy_radius))
        .count()
}

/// True if a point lies outside the arena square grown by `margin`
pub fn out_of_bounds(pos: Vec2, half_extent: f32, margin: f32) -> bool {
    let limit = half_extent + margin;
    pos.x.abs() > limit || pos.y.abs() > limit
}
