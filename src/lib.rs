//! Aquarium - an eat-or-be-eaten arcade simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (creatures, levels, spawning, combat)
//! - `sprite`: Sprite handles and the per-kind sprite atlas
//! - `tuning`: Data-driven game balance and level tables

pub mod sim;
pub mod sprite;
pub mod tuning;

pub use sprite::{Sprite, SpriteAtlas};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal frame step used when the clock reports a non-positive delta
    pub const NOMINAL_DT: f32 = 1.0 / 60.0;

    /// Default tank dimensions
    pub const TANK_WIDTH: f32 = 1024.0;
    pub const TANK_HEIGHT: f32 = 768.0;

    /// Spawn positions stay this far from every tank edge
    pub const SPAWN_INSET: f32 = 20.0;
    /// Bounce bounds are the tank size shrunk by this much
    pub const BOUNDS_INSET: f32 = 20.0;
    /// Random spawn speed range (inclusive)
    pub const MIN_SPAWN_SPEED: u32 = 1;
    pub const MAX_SPAWN_SPEED: u32 = 25;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 10.0;
    pub const PLAYER_SPEED: u32 = 5;
    pub const PLAYER_LIVES: u8 = 3;
    pub const PLAYER_POWER: u32 = 1;

    /// Collision pass runs on every Nth tick
    pub const COLLISION_CADENCE: u32 = 5;
    /// Frames of damage immunity after losing a life (3s at 60fps)
    pub const DAMAGE_DEBOUNCE: u32 = 3 * 60;
    /// Score needed for each permanent power increase
    pub const POWER_STEP: u64 = 25;

    /// Speed power-up
    pub const BOOST_SPEED: u32 = 2;
    pub const BOOST_FRAMES: u32 = 300;
    pub const POWERUP_RADIUS: f32 = 40.0;
    pub const POWERUP_INTERVAL: u64 = 240;

    /// Boss defaults
    pub const BOSS_SPEED: u32 = 2;
    pub const BOSS_TARGET_SCORE: u64 = 40;
    pub const BOSS_ATTACK_COOLDOWN: f32 = 2.0;
    pub const PROJECTILE_SPEED: f32 = 10.0;
    pub const PROJECTILE_RADIUS: f32 = 8.0;
}

/// Frame step with the nominal fallback for a stalled or reversed clock
#[inline]
pub fn effective_dt(dt: f32) -> f32 {
    if dt > 0.0 { dt } else { consts::NOMINAL_DT }
}

/// Euclidean overlap test between two circles
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) < reach * reach
}
