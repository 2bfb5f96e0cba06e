//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Frame delta and elapsed milliseconds come in as arguments
//! - Seeded RNG only
//! - Stable iteration order (spawn order for enemies, fire order for projectiles)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod entity;
pub mod spawner;
pub mod state;
pub mod tick;

pub use collision::{HitReport, contact_count, find_hits, resolve_hits, resolve_match_hits};
pub use entity::{EnemyState, Entity, EntityId, EntityKind, PlayerState, ProjectileState};
pub use spawner::{EdgeFactory, EnemyFactory, IntervalTimer, Spawner, WavePolicy};
pub use state::{GameEvent, IntroZoom, MatchState, Phase, Scene, Snapshot};
pub use tick::{TickInput, activate, tick};
