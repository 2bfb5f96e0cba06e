//! Game settings and tuning
//!
//! Every gameplay constant is a named value here so the two shipped
//! difficulty presets can differ without forking the simulation.
//! Persisted as JSON alongside the leaderboard.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::WavePolicy;

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    /// Small population, steady one-per-second trickle, no waves
    Trickle,
    /// Large population with escalating waves on top of the trickle
    #[default]
    Horde,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Trickle => "Trickle",
            Difficulty::Horde => "Horde",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "trickle" | "easy" => Some(Difficulty::Trickle),
            "horde" | "hard" => Some(Difficulty::Horde),
            _ => None,
        }
    }

    /// Maximum concurrent live enemies for this preset
    pub fn population_cap(&self) -> usize {
        match self {
            Difficulty::Trickle => 10,
            Difficulty::Horde => 40,
        }
    }

    /// Wave behaviour for this preset
    pub fn wave_policy(&self) -> WavePolicy {
        match self {
            Difficulty::Trickle => WavePolicy::Disabled,
            Difficulty::Horde => WavePolicy::Escalating {
                initial_size: 5.0,
                growth: 1.3,
            },
        }
    }
}

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Intro zoom ===
    /// Player scale while waiting in PreIntro
    pub intro_start_scale: f32,
    /// Scale removed each Intro tick
    pub intro_scale_step: f32,
    /// Scale at which the intro hands over to Start
    pub intro_end_scale: f32,

    // === Arena ===
    pub arena_half_extent: f32,

    // === Collision ===
    pub projectile_radius: f32,
    pub enemy_radius: f32,
    pub player_radius: f32,

    // === Actors ===
    /// Player movement speed (units/s)
    pub player_speed: f32,
    /// Player starting health
    pub player_health: f32,
    /// Health drained per second by each touching enemy
    pub contact_damage_per_sec: f32,
    /// Minimum seconds between shots
    pub fire_cooldown_secs: f32,
    /// Projectile speed (units/s)
    pub projectile_speed: f32,
    /// Enemy chase speed (units/s)
    pub enemy_speed: f32,

    // === Spawning ===
    pub spawn_period_ms: u64,
    pub wave_period_ms: u64,
    pub population_cap: usize,
    pub wave_policy: WavePolicy,
}

impl Default for Tuning {
    fn default() -> Self {
        let preset = Difficulty::default();
        Self {
            intro_start_scale: INTRO_START_SCALE,
            intro_scale_step: INTRO_SCALE_STEP,
            intro_end_scale: INTRO_END_SCALE,

            arena_half_extent: ARENA_HALF_EXTENT,

            projectile_radius: PROJECTILE_RADIUS,
            enemy_radius: ENEMY_RADIUS,
            player_radius: PLAYER_RADIUS,

            player_speed: 120.0,
            player_health: 100.0,
            contact_damage_per_sec: 25.0,
            fire_cooldown_secs: 0.25,
            projectile_speed: 360.0,
            enemy_speed: 40.0,

            spawn_period_ms: SPAWN_PERIOD_MS,
            wave_period_ms: WAVE_PERIOD_MS,
            population_cap: preset.population_cap(),
            wave_policy: preset.wave_policy(),
        }
    }
}

impl Tuning {
    /// Number of Intro ticks before the zoom reaches its end scale
    pub fn intro_ticks(&self) -> u32 {
        ((self.intro_start_scale - self.intro_end_scale) / self.intro_scale_step)
            .round()
            .max(0.0) as u32
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let floats = [
            ("intro_start_scale", self.intro_start_scale),
            ("intro_scale_step", self.intro_scale_step),
            ("intro_end_scale", self.intro_end_scale),
            ("arena_half_extent", self.arena_half_extent),
            ("projectile_radius", self.projectile_radius),
            ("enemy_radius", self.enemy_radius),
            ("player_radius", self.player_radius),
            ("player_speed", self.player_speed),
            ("player_health", self.player_health),
            ("contact_damage_per_sec", self.contact_damage_per_sec),
            ("fire_cooldown_secs", self.fire_cooldown_secs),
            ("projectile_speed", self.projectile_speed),
            ("enemy_speed", self.enemy_speed),
        ];
        if let Some((field, _)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::invalid(*field, "must be finite"));
        }
        if self.intro_scale_step <= 0.0 {
            return Err(ConfigError::invalid("intro_scale_step", "must be positive"));
        }
        if self.intro_start_scale < self.intro_end_scale {
            return Err(ConfigError::invalid(
                "intro_start_scale",
                "must not be below intro_end_scale",
            ));
        }
        if self.arena_half_extent <= 0.0 {
            return Err(ConfigError::invalid("arena_half_extent", "must be positive"));
        }
        if self.projectile_radius < 0.0 || self.enemy_radius < 0.0 || self.player_radius < 0.0 {
            return Err(ConfigError::invalid("radius", "must not be negative"));
        }
        if self.spawn_period_ms == 0 {
            return Err(ConfigError::invalid("spawn_period_ms", "must be non-zero"));
        }
        if self.wave_period_ms == 0 {
            return Err(ConfigError::invalid("wave_period_ms", "must be non-zero"));
        }
        if let WavePolicy::Escalating {
            initial_size,
            growth,
        } = self.wave_policy
        {
            if !initial_size.is_finite() || !growth.is_finite() {
                return Err(ConfigError::invalid("wave_policy", "values must be finite"));
            }
            if initial_size < 0.0 {
                return Err(ConfigError::invalid("wave_policy", "initial_size must not be negative"));
            }
            if growth < 1.0 {
                return Err(ConfigError::invalid("wave_policy", "growth must be at least 1.0"));
            }
        }
        Ok(())
    }
}

/// Game settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Difficulty preset the tuning was derived from
    pub difficulty: Difficulty,
    /// Run seed for enemy placement
    pub seed: u64,
    /// Gameplay tuning
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self::from_preset(Difficulty::default())
    }
}

impl Settings {
    /// Create settings from a difficulty preset (applies preset defaults)
    pub fn from_preset(preset: Difficulty) -> Self {
        let mut settings = Self {
            difficulty: preset,
            seed: 0x5EED,
            tuning: Tuning::default(),
        };
        settings.apply_preset(preset);
        settings
    }

    /// Apply a difficulty preset (updates spawn-dependent tuning)
    pub fn apply_preset(&mut self, preset: Difficulty) {
        self.difficulty = preset;
        self.tuning.population_cap = preset.population_cap();
        self.tuning.wave_policy = preset.wave_policy();
    }

    /// Parse settings from JSON and validate them
    ///
    /// Spawn values the file leaves out follow its difficulty preset.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let tuning = value.get("tuning");
        let has = |key: &str| tuning.and_then(|t| t.get(key)).is_some();
        let (has_cap, has_policy) = (has("population_cap"), has("wave_policy"));

        let mut settings: Settings = serde_json::from_value(value)?;
        if !has_cap {
            settings.tuning.population_cap = settings.difficulty.population_cap();
        }
        if !has_policy {
            settings.tuning.wave_policy = settings.difficulty.wave_policy();
        }
        settings.tuning.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file, falling back to defaults when absent
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!(
            "Loaded settings from {} ({})",
            path.display(),
            settings.difficulty.as_str()
        );
        Ok(settings)
    }

    /// Save settings as pretty JSON
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
