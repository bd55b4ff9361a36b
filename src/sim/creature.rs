//! Creature kinds, bodies and per-kind movement laws

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boss::BossCombat;
use crate::sprite::Sprite;

/// Closed set of creatures that can live in the tank
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreatureKind {
    /// Base NPC fish
    Fish,
    BiggerFish,
    ZaggyFish,
    Slowfish,
    BossFish,
    /// Speed power-up pickup
    PowerUp,
}

impl CreatureKind {
    pub const ALL: [CreatureKind; 6] = [
        CreatureKind::Fish,
        CreatureKind::BiggerFish,
        CreatureKind::ZaggyFish,
        CreatureKind::Slowfish,
        CreatureKind::BossFish,
        CreatureKind::PowerUp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CreatureKind::Fish => "BaseFish",
            CreatureKind::BiggerFish => "BiggerFish",
            CreatureKind::ZaggyFish => "ZaggyFish",
            CreatureKind::Slowfish => "SlowFish",
            CreatureKind::BossFish => "BossFish",
            CreatureKind::PowerUp => "PowerUp",
        }
    }

    /// Parse a kind name from configuration (case-insensitive, a few aliases)
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "basefish" | "fish" | "npcreature" | "npc" => Some(CreatureKind::Fish),
            "biggerfish" | "bigger" => Some(CreatureKind::BiggerFish),
            "zaggyfish" | "zaggy" => Some(CreatureKind::ZaggyFish),
            "slowfish" | "slow" => Some(CreatureKind::Slowfish),
            "bossfish" | "boss" => Some(CreatureKind::BossFish),
            "powerup" | "powerupspeed" => Some(CreatureKind::PowerUp),
            _ => None,
        }
    }

    /// Nutrition/score value; the player needs at least this much power to eat it
    pub fn value(&self) -> u32 {
        match self {
            CreatureKind::Fish => 1,
            CreatureKind::BiggerFish => 5,
            CreatureKind::ZaggyFish => 4,
            CreatureKind::Slowfish => 6,
            CreatureKind::BossFish => 100,
            CreatureKind::PowerUp => 0,
        }
    }

    pub fn collision_radius(&self) -> f32 {
        match self {
            CreatureKind::Fish => 30.0,
            CreatureKind::BiggerFish => 60.0,
            CreatureKind::ZaggyFish => 40.0,
            CreatureKind::Slowfish => 50.0,
            CreatureKind::BossFish => 80.0,
            CreatureKind::PowerUp => crate::consts::POWERUP_RADIUS,
        }
    }

    /// NPC variants bounce off the player on contact; pickups don't
    pub fn is_npc(&self) -> bool {
        !matches!(self, CreatureKind::PowerUp)
    }
}

impl std::fmt::Display for CreatureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position, heading and extent shared by the player and every creature
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    /// Heading, unit length or zero
    pub dir: Vec2,
    pub speed: u32,
    pub radius: f32,
    /// Bounce box, from the origin to this corner
    pub bounds: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, speed: u32, radius: f32) -> Self {
        Self {
            pos,
            dir: Vec2::ZERO,
            speed,
            radius,
            bounds: Vec2::ZERO,
        }
    }

    /// Set heading; stored normalized (or zero)
    pub fn set_direction(&mut self, dir: Vec2) {
        self.dir = dir.normalize_or_zero();
    }

    pub fn reverse_direction(&mut self) {
        self.dir = -self.dir;
    }

    /// Advance along the heading at `speed * scale`
    #[inline]
    pub fn step(&mut self, scale: f32) {
        self.pos += self.dir * (self.speed as f32 * scale);
    }

    /// Reflect off the bounce box and clamp back inside it
    pub fn bounce(&mut self) {
        if self.pos.x < 0.0 {
            self.pos.x = 0.0;
            self.dir.x = self.dir.x.abs();
        } else if self.pos.x > self.bounds.x {
            self.pos.x = self.bounds.x;
            self.dir.x = -self.dir.x.abs();
        }
        if self.pos.y < 0.0 {
            self.pos.y = 0.0;
            self.dir.y = self.dir.y.abs();
        } else if self.pos.y > self.bounds.y {
            self.pos.y = self.bounds.y;
            self.dir.y = -self.dir.y.abs();
        }
    }

    #[inline]
    pub fn facing_left(&self) -> bool {
        self.dir.x < 0.0
    }

    #[inline]
    pub fn overlaps(&self, other: &Body) -> bool {
        crate::circles_overlap(self.pos, self.radius, other.pos, other.radius)
    }
}

/// Per-tick inputs to the movement laws
#[derive(Debug, Clone, Copy)]
pub struct MoveContext {
    /// Seconds since the session started
    pub elapsed: f32,
    /// Full tank size (the boss clamps against this, not its bounce box)
    pub tank: Vec2,
}

/// A live creature in the tank
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Creature {
    pub id: u32,
    pub kind: CreatureKind,
    pub body: Body,
    pub value: u32,
    #[serde(skip)]
    pub sprite: Option<Sprite>,
    /// Attack state, present only on the boss
    #[serde(skip)]
    pub boss: Option<BossCombat>,
}

impl Creature {
    pub fn new(id: u32, kind: CreatureKind, pos: Vec2, speed: u32, sprite: Option<Sprite>) -> Self {
        let boss = (kind == CreatureKind::BossFish).then(BossCombat::default);
        Self {
            id,
            kind,
            body: Body::new(pos, speed, kind.collision_radius()),
            value: kind.value(),
            sprite,
            boss,
        }
    }

    pub fn is_boss(&self) -> bool {
        self.kind == CreatureKind::BossFish
    }

    /// Half the sprite size; the boss is anchored at its sprite's top-left corner
    pub fn half_extent(&self) -> Vec2 {
        self.sprite.map(|s| s.half_size()).unwrap_or(Vec2::ZERO)
    }

    /// Apply this kind's movement law for one tick
    pub fn advance(&mut self, ctx: &MoveContext) {
        let body = &mut self.body;
        match self.kind {
            CreatureKind::Fish => {
                body.step(1.0);
                body.bounce();
            }
            CreatureKind::BiggerFish => {
                body.step(0.5);
                body.bounce();
            }
            CreatureKind::ZaggyFish => {
                // Zig-zag ignores the vertical heading
                body.pos.x += body.dir.x * body.speed as f32;
                body.pos.y += (ctx.elapsed * 5.0).sin() * 10.0;
                body.bounce();
            }
            CreatureKind::Slowfish => {
                body.step(0.25);
                body.pos.y += (ctx.elapsed * 2.0).sin() * 2.0;
                body.bounce();
            }
            CreatureKind::BossFish => {
                let width = self.sprite.map(|s| s.width).unwrap_or(0.0);
                body.pos.x += body.dir.x * body.speed as f32;
                body.pos.y += (ctx.elapsed * 2.0).sin() * 2.0;
                if body.pos.x < 0.0 {
                    body.pos.x = 0.0;
                    body.dir.x = -body.dir.x;
                }
                if body.pos.x + width > ctx.tank.x {
                    body.pos.x = ctx.tank.x - width;
                    body.dir.x = -body.dir.x;
                }
            }
            CreatureKind::PowerUp => body.step(1.0),
        }
        let facing_left = self.body.facing_left();
        if let Some(sprite) = self.sprite.as_mut() {
            sprite.flipped = facing_left;
        }
    }
}
