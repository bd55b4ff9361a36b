//! Data-driven game balance
//!
//! Every gameplay constant and the level table live here so a session can be
//! re-tuned from a JSON file without touching the simulation.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::{AquariumLevel, CreatureKind};
use crate::sprite::SpriteAtlas;

/// Errors raised while loading or validating tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(&'static str),
}

/// One `{ kind, count }` entry of a level's population
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationSpec {
    pub kind: String,
    pub count: u32,
}

impl PopulationSpec {
    fn new(kind: CreatureKind, count: u32) -> Self {
        Self {
            kind: kind.as_str().to_string(),
            count,
        }
    }
}

/// A level entry in the level table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelSpec {
    pub target_score: u64,
    #[serde(default)]
    pub background: Option<String>,
    pub population: Vec<PopulationSpec>,
}

/// Full game balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Tank ===
    pub tank_width: f32,
    pub tank_height: f32,

    // === Player ===
    pub player_start: (f32, f32),
    pub player_speed: u32,
    pub player_lives: u8,

    // === Combat ===
    /// Collision pass runs every Nth tick
    pub collision_cadence: u32,
    /// Frames of immunity after losing a life
    pub damage_debounce: u32,
    /// Score per permanent power level
    pub power_step: u64,

    // === Speed power-up ===
    pub boost_speed: u32,
    pub boost_frames: u32,
    /// Aquarium updates between power-up spawn attempts
    pub powerup_interval: u64,

    // === Boss ===
    pub boss_speed: u32,
    pub boss_target_score: u64,
    pub boss_attack_cooldown: f32,
    pub projectile_speed: f32,
    pub projectile_radius: f32,

    pub sprites: SpriteAtlas,
    pub levels: Vec<LevelSpec>,
}

impl Default for Tuning {
    fn default() -> Self {
        use CreatureKind::*;

        let level = |target_score, population: Vec<PopulationSpec>| LevelSpec {
            target_score,
            background: None,
            population,
        };
        let pop = PopulationSpec::new;

        Self {
            tank_width: TANK_WIDTH,
            tank_height: TANK_HEIGHT,

            player_start: (TANK_WIDTH / 2.0, TANK_HEIGHT / 2.0),
            player_speed: PLAYER_SPEED,
            player_lives: PLAYER_LIVES,

            collision_cadence: COLLISION_CADENCE,
            damage_debounce: DAMAGE_DEBOUNCE,
            power_step: POWER_STEP,

            boost_speed: BOOST_SPEED,
            boost_frames: BOOST_FRAMES,
            powerup_interval: POWERUP_INTERVAL,

            boss_speed: BOSS_SPEED,
            boss_target_score: BOSS_TARGET_SCORE,
            boss_attack_cooldown: BOSS_ATTACK_COOLDOWN,
            projectile_speed: PROJECTILE_SPEED,
            projectile_radius: PROJECTILE_RADIUS,

            sprites: SpriteAtlas::default(),
            levels: vec![
                level(10, vec![pop(Fish, 10)]),
                level(15, vec![pop(Fish, 20)]),
                level(20, vec![pop(Fish, 30), pop(BiggerFish, 5)]),
                level(25, vec![pop(Fish, 35), pop(BiggerFish, 5), pop(ZaggyFish, 4)]),
                level(
                    30,
                    vec![pop(Fish, 40), pop(BiggerFish, 5), pop(ZaggyFish, 4), pop(Slowfish, 3)],
                ),
                LevelSpec {
                    target_score: 100,
                    background: Some("backgroundBoss.png".to_string()),
                    population: vec![pop(Fish, 20), pop(Slowfish, 2), pop(BossFish, 1)],
                },
            ],
        }
    }
}

impl Tuning {
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn tank_size(&self) -> Vec2 {
        Vec2::new(self.tank_width, self.tank_height)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        let min_side = SPAWN_INSET * 2.0;
        if !(self.tank_width > min_side && self.tank_height > min_side) {
            return Err(TuningError::Invalid("tank must be larger than the spawn inset"));
        }
        if self.collision_cadence == 0 {
            return Err(TuningError::Invalid("collision_cadence must be non-zero"));
        }
        if self.player_speed == 0 {
            return Err(TuningError::Invalid("player_speed must be at least 1"));
        }
        if self.player_lives == 0 {
            return Err(TuningError::Invalid("player_lives must be at least 1"));
        }
        if self.levels.is_empty() {
            return Err(TuningError::Invalid("level table must contain at least one level"));
        }
        let all_empty = |l: &LevelSpec| {
            l.population
                .iter()
                .all(|p| p.count == 0 || CreatureKind::from_name(&p.kind).is_none())
        };
        if self.levels.iter().any(all_empty) {
            return Err(TuningError::Invalid("every level needs a recognizable population"));
        }
        for level in &self.levels {
            let count_of = |kind: CreatureKind| -> u32 {
                level
                    .population
                    .iter()
                    .filter(|p| CreatureKind::from_name(&p.kind) == Some(kind))
                    .map(|p| p.count)
                    .sum()
            };
            if count_of(CreatureKind::PowerUp) > 0 {
                return Err(TuningError::Invalid("levels may not list power-ups"));
            }
            if count_of(CreatureKind::BossFish) > 1 {
                return Err(TuningError::Invalid("a level may hold at most one boss"));
            }
        }
        Ok(())
    }

    /// Build the ledgers for every level. Unrecognized kind names are
    /// reported and skipped.
    pub fn build_levels(&self) -> Vec<AquariumLevel> {
        self.levels
            .iter()
            .enumerate()
            .map(|(i, level_spec)| {
                let mut level = AquariumLevel::new(i as u32, level_spec.target_score);
                for entry in &level_spec.population {
                    match CreatureKind::from_name(&entry.kind) {
                        Some(kind) => level = level.with_population(kind, entry.count),
                        None => log::error!("Unknown creature kind '{}' in level {}", entry.kind, i),
                    }
                }
                if let Some(bg) = &level_spec.background {
                    level = level.with_background(bg.clone());
                }
                level
            })
            .collect()
    }
}
