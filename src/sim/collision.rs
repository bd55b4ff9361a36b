//! Player-vs-creature collision detection and outcome resolution
//!
//! Detection is first-match over the creature list in insertion order, not
//! closest-match. Resolution applies the eat/flee/damage/power-up rules.

use serde::{Deserialize, Serialize};

use super::aquarium::Aquarium;
use super::creature::CreatureKind;
use super::player::PlayerCreature;
use crate::tuning::Tuning;

/// The creature the player ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionHit {
    pub id: u32,
    pub kind: CreatureKind,
}

/// What a collision did
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CollisionOutcome {
    /// Speed pickup collected
    PowerUpCollected { power: u32 },
    /// Player was too weak; both bounced apart
    Repelled { kind: CreatureKind, life_lost: bool },
    /// Player ate the creature
    Eaten {
        kind: CreatureKind,
        value: u32,
        power_gained: u32,
    },
    /// Player lost their last life
    GameOver,
}

/// First creature overlapping the player, in list order
pub fn detect_collision(aquarium: &Aquarium, player: &PlayerCreature) -> Option<CollisionHit> {
    aquarium
        .creatures()
        .iter()
        .find(|c| player.body.overlaps(&c.body))
        .map(|c| CollisionHit {
            id: c.id,
            kind: c.kind,
        })
}

/// Apply the consequences of `hit`. A stale hit (creature already gone)
/// resolves to nothing.
pub fn resolve_collision(
    aquarium: &mut Aquarium,
    player: &mut PlayerCreature,
    hit: CollisionHit,
    tuning: &Tuning,
) -> Option<CollisionOutcome> {
    let creature = aquarium.creature_mut(hit.id)?;

    if hit.kind == CreatureKind::PowerUp {
        player.apply_speed_boost(tuning.boost_speed, tuning.boost_frames);
        player.increase_power(1);
        aquarium.remove_creature(hit.id);
        log::info!(
            "Speed power-up collected, speed {} power {}",
            player.speed(),
            player.power()
        );
        return Some(CollisionOutcome::PowerUpCollected {
            power: player.power(),
        });
    }

    if hit.kind.is_npc() {
        creature.body.reverse_direction();
    }
    player.reverse_direction();
    let value = creature.value;

    if player.power() < value {
        log::debug!("Player too weak to eat {} ({} < {})", hit.kind, player.power(), value);
        let life_lost = player.lose_life(tuning.damage_debounce, tuning.boost_speed);
        if life_lost && player.is_dead() {
            return Some(CollisionOutcome::GameOver);
        }
        return Some(CollisionOutcome::Repelled {
            kind: hit.kind,
            life_lost,
        });
    }

    aquarium.remove_creature(hit.id);
    let power_gained = player.add_score(1, u64::from(value), tuning.power_step);
    if power_gained > 0 {
        log::info!("Player power increased to {}", player.power());
    }
    Some(CollisionOutcome::Eaten {
        kind: hit.kind,
        value,
        power_gained,
    })
}
