//! Sprite handles for the renderer
//!
//! The simulation never draws. It only hands out a sized handle per creature
//! and keeps the `flipped` flag in sync with horizontal motion.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::CreatureKind;

/// A drawable handle with a fixed intrinsic size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub width: f32,
    pub height: f32,
    /// Mirror horizontally when drawing (creature faces left)
    pub flipped: bool,
}

impl Sprite {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            flipped: false,
        }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Half extents, used to find the sprite center from its top-left anchor
    #[inline]
    pub fn half_size(&self) -> Vec2 {
        self.size() * 0.5
    }
}

/// Intrinsic sprite sizes per creature kind
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteAtlas {
    pub fish: (f32, f32),
    pub bigger_fish: (f32, f32),
    pub zaggy_fish: (f32, f32),
    pub slowfish: (f32, f32),
    pub boss_fish: (f32, f32),
}

impl Default for SpriteAtlas {
    fn default() -> Self {
        Self {
            fish: (70.0, 70.0),
            bigger_fish: (120.0, 120.0),
            zaggy_fish: (80.0, 80.0),
            slowfish: (100.0, 120.0),
            boss_fish: (200.0, 200.0),
        }
    }
}

impl SpriteAtlas {
    /// Fresh sprite handle for a creature kind (power-ups are drawn as plain circles)
    pub fn sprite_for(&self, kind: CreatureKind) -> Option<Sprite> {
        let (w, h) = match kind {
            CreatureKind::Fish => self.fish,
            CreatureKind::BiggerFish => self.bigger_fish,
            CreatureKind::ZaggyFish => self.zaggy_fish,
            CreatureKind::Slowfish => self.slowfish,
            CreatureKind::BossFish => self.boss_fish,
            CreatureKind::PowerUp => return None,
        };
        Some(Sprite::new(w, h))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_up_has_no_sprite() {
        let atlas = SpriteAtlas::default();
        assert!(atlas.sprite_for(CreatureKind::PowerUp).is_none());
        let boss = atlas.sprite_for(CreatureKind::BossFish).unwrap();
        assert_eq!(boss.half_size(), Vec2::new(100.0, 100.0));
        assert!(!boss.flipped);
    }
}
