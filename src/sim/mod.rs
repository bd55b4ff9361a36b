//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Tick-count gating, never wall-clock gating
//! - Seeded RNG only
//! - Stable iteration order (creature insertion order)
//! - No rendering or platform dependencies

pub mod aquarium;
pub mod boss;
pub mod collision;
pub mod creature;
pub mod level;
pub mod player;
pub mod scene;

pub use aquarium::Aquarium;
pub use boss::{BossCombat, BossState, Projectile, update_boss};
pub use collision::{CollisionHit, CollisionOutcome, detect_collision, resolve_collision};
pub use creature::{Body, Creature, CreatureKind, MoveContext};
pub use level::{AquariumLevel, PopulationNode};
pub use player::PlayerCreature;
pub use scene::{FrameGate, GameEvent, GamePhase, GameScene, Hud, TickInput};
