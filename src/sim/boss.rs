//! Boss fish combat: attack cadence, projectiles and body contact

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::creature::{Creature, MoveContext};
use super::player::PlayerCreature;
use crate::tuning::Tuning;
use crate::{circles_overlap, effective_dt};

/// Boss lifecycle as seen by the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BossState {
    /// No boss spawned for this level instance
    #[default]
    Inactive,
    /// Boss is alive and attacking
    Active,
    /// Player reached the boss target; waiting for the scene to prune it
    Removed,
}

/// A projectile fired by the boss (moves by velocity only, never bounces)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Projectile {
    pub fn advance(&mut self) {
        self.pos += self.vel;
    }

    pub fn out_of_bounds(&self, tank: Vec2) -> bool {
        self.pos.x < 0.0 || self.pos.x > tank.x || self.pos.y < 0.0 || self.pos.y > tank.y
    }
}

/// Combat component attached to the boss creature
#[derive(Debug, Clone)]
pub struct BossCombat {
    pub removed: bool,
    /// Seconds between shots
    pub cooldown: f32,
    /// Seconds since the last shot
    pub since_attack: f32,
    /// Player score at which the boss leaves
    pub target_score: u64,
    pub projectile_speed: f32,
    pub projectile_radius: f32,
    pub projectiles: Vec<Projectile>,
}

impl Default for BossCombat {
    fn default() -> Self {
        Self::new(&Tuning::default())
    }
}

impl BossCombat {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            removed: false,
            cooldown: tuning.boss_attack_cooldown,
            since_attack: 0.0,
            target_score: tuning.boss_target_score,
            projectile_speed: tuning.projectile_speed,
            projectile_radius: tuning.projectile_radius,
            projectiles: Vec::new(),
        }
    }

    /// Fire one projectile from `origin` toward `target`
    pub fn shoot(&mut self, origin: Vec2, target: Vec2) {
        let aim = target - origin;
        // A player sitting exactly on the muzzle still gets shot at; direction is then zero
        let dir = if aim.length_squared() > 0.0 { aim.normalize() } else { Vec2::ZERO };
        self.projectiles.push(Projectile {
            pos: origin,
            vel: dir * self.projectile_speed,
            radius: self.projectile_radius,
        });
        log::debug!("Boss fired at ({:.1}, {:.1})", origin.x, origin.y);
    }
}

/// Run one boss update: move, shoot, body contact, projectiles, removal check.
///
/// Returns true when the player lost their last life during this update; the
/// caller must stop processing the tick.
pub fn update_boss(
    boss: &mut Creature,
    player: &mut PlayerCreature,
    ctx: &MoveContext,
    dt: f32,
    tuning: &Tuning,
) -> bool {
    if boss.boss.as_ref().is_none_or(|c| c.removed) {
        return false;
    }

    boss.advance(ctx);
    let center = boss.body.pos + boss.half_extent();
    let body_radius = boss.body.radius;

    let Some(combat) = boss.boss.as_mut() else {
        return false;
    };

    combat.since_attack += effective_dt(dt);
    if combat.since_attack >= combat.cooldown {
        combat.shoot(center, player.body.pos);
        combat.since_attack = 0.0;
    }

    // The boss itself never takes damage from contact
    if circles_overlap(center, body_radius, player.body.pos, player.body.radius) {
        let lost = player.lose_life(tuning.damage_debounce, tuning.boost_speed);
        boss.body.reverse_direction();
        player.reverse_direction();
        if lost && player.is_dead() {
            return true;
        }
    }

    let mut i = 0;
    while i < combat.projectiles.len() {
        let shot = &mut combat.projectiles[i];
        shot.advance();
        if circles_overlap(shot.pos, shot.radius, player.body.pos, player.body.radius) {
            combat.projectiles.remove(i);
            if player.lose_life(tuning.damage_debounce, tuning.boost_speed) && player.is_dead() {
                return true;
            }
            continue;
        }
        if shot.out_of_bounds(ctx.tank) {
            combat.projectiles.remove(i);
        } else {
            i += 1;
        }
    }

    if player.score() >= combat.target_score {
        combat.removed = true;
        log::info!("Boss defeated at score {}", player.score());
    }
    false
}
