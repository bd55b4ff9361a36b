//! The player-controlled creature

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::creature::Body;
use crate::consts::*;

/// The player's creature: a body plus score, lives, power and timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerCreature {
    pub body: Body,
    /// Sprite facing, mirrors the horizontal heading
    pub flipped: bool,
    score: u64,
    lives: u8,
    power: u32,
    /// Frames left during which damage is ignored
    damage_debounce: u32,
    /// Frames left of the temporary speed bonus
    speed_boost_timer: u32,
    /// Score multiples of `POWER_STEP` already converted into power
    power_awards: u64,
}

impl PlayerCreature {
    pub fn new(pos: Vec2, speed: u32) -> Self {
        Self {
            body: Body::new(pos, speed.max(1), PLAYER_RADIUS),
            flipped: false,
            score: 0,
            lives: PLAYER_LIVES,
            power: PLAYER_POWER,
            damage_debounce: 0,
            speed_boost_timer: 0,
            power_awards: 0,
        }
    }

    pub fn with_lives(mut self, lives: u8) -> Self {
        self.lives = lives;
        self
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn power(&self) -> u32 {
        self.power
    }

    pub fn speed(&self) -> u32 {
        self.body.speed
    }

    pub fn damage_debounce(&self) -> u32 {
        self.damage_debounce
    }

    pub fn speed_boost_timer(&self) -> u32 {
        self.speed_boost_timer
    }

    pub fn is_damage_debounce(&self) -> bool {
        self.damage_debounce > 0
    }

    pub fn is_dead(&self) -> bool {
        self.lives == 0
    }

    pub fn set_direction(&mut self, dir: Vec2) {
        self.body.set_direction(dir);
    }

    pub fn reverse_direction(&mut self) {
        self.body.reverse_direction();
    }

    /// Permanent power gain
    pub fn increase_power(&mut self, amount: u32) {
        self.power += amount;
    }

    /// Add `amount * weight` to the score, then convert every newly crossed
    /// multiple of `step` into one power level. Returns the power gained.
    pub fn add_score(&mut self, amount: u64, weight: u64, step: u64) -> u32 {
        self.score += amount * weight;
        if step == 0 {
            return 0;
        }
        let earned = self.score / step;
        let gained = earned.saturating_sub(self.power_awards);
        self.power_awards = self.power_awards.max(earned);
        self.power += gained as u32;
        gained as u32
    }

    /// Start (or restart) the temporary speed boost. The bonus itself is only
    /// applied when no boost is running, so repeated pickups refresh the timer.
    pub fn apply_speed_boost(&mut self, bonus: u32, frames: u32) {
        if self.speed_boost_timer == 0 {
            self.body.speed += bonus;
        }
        self.speed_boost_timer = frames;
    }

    fn end_speed_boost(&mut self, bonus: u32) {
        self.speed_boost_timer = 0;
        self.body.speed = self.body.speed.saturating_sub(bonus).max(1);
    }

    /// Lose a life unless debounced. Any running boost is cancelled either way.
    /// Returns true when a life was actually taken.
    pub fn lose_life(&mut self, debounce: u32, boost_bonus: u32) -> bool {
        let mut lost = false;
        if self.damage_debounce == 0 && self.lives > 0 {
            self.lives -= 1;
            self.damage_debounce = debounce;
            lost = true;
            log::info!("Player lost a life, {} remaining", self.lives);
        }

        if self.speed_boost_timer > 0 {
            self.end_speed_boost(boost_bonus);
            log::info!("Speed boost cancelled by damage, speed back to {}", self.body.speed);
        }

        if !lost && self.damage_debounce > 0 {
            log::trace!("Damage ignored, {} debounce frames left", self.damage_debounce);
        }
        lost
    }

    /// Per-tick update: timers count down, then the body moves and bounces
    pub fn update(&mut self, boost_bonus: u32) {
        self.damage_debounce = self.damage_debounce.saturating_sub(1);

        if self.speed_boost_timer > 0 {
            self.speed_boost_timer -= 1;
            if self.speed_boost_timer == 0 {
                self.end_speed_boost(boost_bonus);
                log::debug!("Speed boost ended, speed reset to {}", self.body.speed);
            }
        }

        self.body.step(1.0);
        self.body.bounce();
        self.flipped = self.body.facing_left();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn player() -> PlayerCreature {
        let mut p = PlayerCreature::new(Vec2::new(100.0, 100.0), 5);
        p.body.bounds = Vec2::new(780.0, 580.0);
        p
    }

    #[test]
    fn test_defaults() {
        let p = player();
        assert_eq!(p.lives(), 3);
        assert_eq!(p.power(), 1);
        assert_eq!(p.score(), 0);
        assert!(!p.is_damage_debounce());
    }

    #[test]
    fn test_lose_life_arms_debounce() {
        let mut p = player();
        assert!(p.lose_life(DAMAGE_DEBOUNCE, BOOST_SPEED));
        assert_eq!(p.lives(), 2);
        assert_eq!(p.damage_debounce(), 180);

        // Debounced hit is ignored
        assert!(!p.lose_life(DAMAGE_DEBOUNCE, BOOST_SPEED));
        assert_eq!(p.lives(), 2);

        for _ in 0..180 {
            p.update(BOOST_SPEED);
        }
        assert!(!p.is_damage_debounce());
        assert!(p.lose_life(DAMAGE_DEBOUNCE, BOOST_SPEED));
        assert_eq!(p.lives(), 1);
    }

    #[test]
    fn test_lives_never_negative() {
        let mut p = player().with_lives(1);
        assert!(p.lose_life(0, BOOST_SPEED));
        assert!(p.is_dead());
        assert!(!p.lose_life(0, BOOST_SPEED));
        assert_eq!(p.lives(), 0);
    }

    #[test]
    fn test_boost_refresh_does_not_stack() {
        let mut p = player();
        p.apply_speed_boost(BOOST_SPEED, BOOST_FRAMES);
        assert_eq!(p.speed(), 7);
        for _ in 0..100 {
            p.update(BOOST_SPEED);
        }
        assert_eq!(p.speed_boost_timer(), 200);

        p.apply_speed_boost(BOOST_SPEED, BOOST_FRAMES);
        assert_eq!(p.speed_boost_timer(), 300);
        assert_eq!(p.speed(), 7);

        for _ in 0..300 {
            p.update(BOOST_SPEED);
        }
        assert_eq!(p.speed_boost_timer(), 0);
        assert_eq!(p.speed(), 5);
    }

    #[test]
    fn test_boost_cancelled_on_damage_and_speed_floor() {
        let mut p = PlayerCreature::new(Vec2::ZERO, 1);
        p.apply_speed_boost(BOOST_SPEED, BOOST_FRAMES);
        assert_eq!(p.speed(), 3);
        p.body.speed = 1;
        p.lose_life(DAMAGE_DEBOUNCE, BOOST_SPEED);
        assert_eq!(p.speed_boost_timer(), 0);
        assert_eq!(p.speed(), 1);
    }

    #[test]
    fn test_power_awarded_once_per_crossing() {
        let mut p = player();
        assert_eq!(p.add_score(1, 24, POWER_STEP), 0);
        assert_eq!(p.add_score(1, 1, POWER_STEP), 1);
        assert_eq!(p.power(), 2);
        // Staying on the multiple awards nothing more
        assert_eq!(p.add_score(0, 1, POWER_STEP), 0);
        assert_eq!(p.power(), 2);
        // Jumping over a multiple still awards it
        assert_eq!(p.add_score(1, 6, POWER_STEP), 0);
        assert_eq!(p.add_score(1, 20, POWER_STEP), 1);
        assert_eq!(p.score(), 51);
        assert_eq!(p.power(), 3);
    }

    proptest! {
        #[test]
        fn prop_debounce_drops_by_at_most_one(ticks in 1usize..400) {
            let mut p = player();
            p.lose_life(DAMAGE_DEBOUNCE, BOOST_SPEED);
            let mut prev = p.damage_debounce();
            for _ in 0..ticks {
                p.update(BOOST_SPEED);
                let now = p.damage_debounce();
                prop_assert!(prev - now <= 1);
                if now > 0 {
                    let lives = p.lives();
                    prop_assert!(!p.lose_life(DAMAGE_DEBOUNCE, BOOST_SPEED));
                    prop_assert_eq!(p.lives(), lives);
                }
                prev = now;
            }
        }
    }
}
