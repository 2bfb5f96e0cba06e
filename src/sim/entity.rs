//! Entities: the player, the horde, and projectiles
//!
//! One tagged type covers all three so the shared position/liveness
//! interface does not depend on which fields happen to be present.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Opaque entity identity, unique for the lifetime of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// Player-only state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Confirmed kills this match
    pub score: u64,
    /// Visual scale (zoom-in during the intro)
    pub scale: f32,
    /// Set once health runs out; observed by the phase controller
    pub dead: bool,
    pub health: f32,
    /// Seconds until the next shot is allowed
    pub fire_cooldown: f32,
}

/// Enemy-only state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyState {
    /// Chase speed (units/s)
    pub speed: f32,
}

/// Projectile-only state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileState {
    /// Actor that fired it
    pub owner: EntityId,
    /// Unit travel direction
    pub dir: Vec2,
}

/// Kind-specific state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Player(PlayerState),
    Enemy(EnemyState),
    Projectile(ProjectileState),
}

/// A positioned actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub alive: bool,
    pub kind: EntityKind,
}

impl Entity {
    pub fn player(id: EntityId, pos: Vec2, health: f32, scale: f32) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            alive: true,
            kind: EntityKind::Player(PlayerState {
                score: 0,
                scale,
                dead: false,
                health,
                fire_cooldown: 0.0,
            }),
        }
    }

    pub fn enemy(id: EntityId, pos: Vec2, speed: f32) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            alive: true,
            kind: EntityKind::Enemy(EnemyState { speed }),
        }
    }

    /// Projectile heading toward `dir` (normalised here; zero stays zero)
    pub fn projectile(id: EntityId, owner: EntityId, pos: Vec2, dir: Vec2, speed: f32) -> Self {
        let dir = dir.normalize_or_zero();
        Self {
            id,
            pos,
            vel: dir * speed,
            alive: true,
            kind: EntityKind::Projectile(ProjectileState { owner, dir }),
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Mark the entity dead; the owning collection drops it before the next frame
    pub fn kill(&mut self) {
        self.alive = false;
        if let EntityKind::Player(player) = &mut self.kind {
            player.dead = true;
        }
    }

    pub fn is_enemy(&self) -> bool {
        matches!(self.kind, EntityKind::Enemy(_))
    }

    pub fn is_projectile(&self) -> bool {
        matches!(self.kind, EntityKind::Projectile(_))
    }

    pub fn as_player(&self) -> Option<&PlayerState> {
        match &self.kind {
            EntityKind::Player(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut PlayerState> {
        match &mut self.kind {
            EntityKind::Player(p) => Some(p),
            _ => None,
        }
    }

    /// Advance position by velocity
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }
}
