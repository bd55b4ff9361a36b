//! The tank: creature collection, level sequencing and spawning
//!
//! The aquarium is the only place creatures are created or destroyed, and the
//! only bridge between eaten creatures and the level ledgers.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::boss::BossCombat;
use super::creature::{Creature, CreatureKind};
use super::level::AquariumLevel;
use crate::consts::*;
use crate::sprite::SpriteAtlas;
use crate::tuning::{Tuning, TuningError};

#[derive(Debug, Clone)]
pub struct Aquarium {
    width: f32,
    height: f32,
    /// Live creatures in insertion order (collision scans depend on it)
    creatures: Vec<Creature>,
    levels: Vec<AquariumLevel>,
    current_level: usize,
    sprites: SpriteAtlas,
    rng: Pcg32,
    next_id: u32,
    /// Aquarium updates since session start (drives the power-up cadence)
    frame_counter: u64,
    powerup_interval: u64,
    boss_speed: u32,
    boss_template: BossCombat,
}

impl Aquarium {
    pub fn new(width: f32, height: f32, seed: u64) -> Self {
        let tuning = Tuning {
            tank_width: width,
            tank_height: height,
            ..Tuning::default()
        };
        let mut aquarium = Self::with_tuning(&tuning, seed);
        aquarium.levels.clear();
        aquarium
    }

    /// Build a tank and its level table from validated tuning
    pub fn from_tuning(tuning: &Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::with_tuning(tuning, seed))
    }

    fn with_tuning(tuning: &Tuning, seed: u64) -> Self {
        Self {
            width: tuning.tank_width,
            height: tuning.tank_height,
            creatures: Vec::new(),
            levels: tuning.build_levels(),
            current_level: 0,
            sprites: tuning.sprites.clone(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            frame_counter: 0,
            powerup_interval: tuning.powerup_interval,
            boss_speed: tuning.boss_speed,
            boss_template: BossCombat::new(tuning),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Bounce box handed to creatures added to this tank
    pub fn creature_bounds(&self) -> Vec2 {
        Vec2::new(
            (self.width - BOUNDS_INSET).max(0.0),
            (self.height - BOUNDS_INSET).max(0.0),
        )
    }

    pub fn set_bounds(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Random coordinate inside the spawn inset. A tank too small for the
    /// inset collapses the range to its near edge.
    fn spawn_coord(&mut self, extent: f32) -> f32 {
        let far = (extent - SPAWN_INSET).max(SPAWN_INSET + 1.0);
        self.rng.random_range(SPAWN_INSET..far)
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    // === Creature collection ===

    pub fn creatures(&self) -> &[Creature] {
        &self.creatures
    }

    pub fn creatures_mut(&mut self) -> &mut [Creature] {
        &mut self.creatures
    }

    pub fn creature_count(&self) -> usize {
        self.creatures.len()
    }

    pub fn creature_at(&self, index: usize) -> Option<&Creature> {
        self.creatures.get(index)
    }

    pub fn creature(&self, id: u32) -> Option<&Creature> {
        self.creatures.iter().find(|c| c.id == id)
    }

    pub fn creature_mut(&mut self, id: u32) -> Option<&mut Creature> {
        self.creatures.iter_mut().find(|c| c.id == id)
    }

    pub fn count_of(&self, kind: CreatureKind) -> usize {
        self.creatures.iter().filter(|c| c.kind == kind).count()
    }

    pub fn has_boss(&self) -> bool {
        self.creatures.iter().any(Creature::is_boss)
    }

    pub fn has_power_up(&self) -> bool {
        self.creatures.iter().any(|c| c.kind == CreatureKind::PowerUp)
    }

    /// Add a creature, fitting its bounce box to the tank. Returns its id.
    pub fn add_creature(&mut self, mut creature: Creature) -> u32 {
        creature.body.bounds = self.creature_bounds();
        let id = creature.id;
        self.creatures.push(creature);
        id
    }

    /// Remove a creature by id, debiting its kind from the current level's ledger
    pub fn remove_creature(&mut self, id: u32) -> Option<Creature> {
        let index = self.creatures.iter().position(|c| c.id == id)?;
        let creature = self.creatures.remove(index);
        if !self.levels.is_empty() {
            let selected = self.current_level % self.levels.len();
            self.levels[selected].consume_population(creature.kind, creature.value);
        }
        log::trace!("Removed {} #{}", creature.kind, creature.id);
        Some(creature)
    }

    pub fn clear_creatures(&mut self) {
        self.creatures.clear();
    }

    // === Levels ===

    pub fn add_level(&mut self, level: AquariumLevel) {
        self.levels.push(level);
    }

    pub fn levels(&self) -> &[AquariumLevel] {
        &self.levels
    }

    pub fn current_level_index(&self) -> usize {
        self.current_level
    }

    pub fn current_level(&self) -> Option<&AquariumLevel> {
        if self.levels.is_empty() {
            return None;
        }
        self.levels.get(self.current_level.min(self.levels.len() - 1))
    }

    pub fn is_last_level(&self) -> bool {
        !self.levels.is_empty() && self.current_level == self.levels.len() - 1
    }

    // === Spawning ===

    /// Spawn one creature of `kind`. Returns the new id, or None when the
    /// request was dropped (a boss or power-up of that kind is already alive).
    pub fn spawn_creature(&mut self, kind: CreatureKind) -> Option<u32> {
        let x = self.spawn_coord(self.width);
        let y = self.spawn_coord(self.height);
        let speed = self.rng.random_range(MIN_SPAWN_SPEED..=MAX_SPAWN_SPEED);
        let pos = Vec2::new(x, y);

        match kind {
            CreatureKind::Fish
            | CreatureKind::BiggerFish
            | CreatureKind::ZaggyFish
            | CreatureKind::Slowfish => {
                let dir = Vec2::new(
                    self.rng.random_range(-1i32..=1) as f32,
                    self.rng.random_range(-1i32..=1) as f32,
                );
                let id = self.next_entity_id();
                let mut creature = Creature::new(id, kind, pos, speed, self.sprites.sprite_for(kind));
                creature.body.set_direction(dir);
                Some(self.add_creature(creature))
            }
            CreatureKind::BossFish => {
                if self.has_boss() {
                    log::trace!("Boss already alive, spawn request dropped");
                    return None;
                }
                let sprite = self.sprites.sprite_for(kind);
                let half = sprite.map(|s| s.half_size()).unwrap_or(Vec2::ZERO);
                let center = self.size() * 0.5 - half;
                let id = self.next_entity_id();
                let mut boss = Creature::new(id, kind, center, self.boss_speed, sprite);
                boss.body.set_direction(Vec2::X);
                boss.boss = Some(self.boss_template.clone());
                // The boss clamps against the tank itself, not a bounce box
                self.creatures.push(boss);
                log::info!("Boss spawned at ({:.0}, {:.0})", center.x, center.y);
                Some(id)
            }
            CreatureKind::PowerUp => {
                if self.has_power_up() {
                    log::trace!("Power-up already alive, spawn request dropped");
                    return None;
                }
                let id = self.next_entity_id();
                let creature = Creature::new(id, kind, pos, 0, None);
                log::debug!("Power-up spawned at ({:.0}, {:.0})", x, y);
                Some(self.add_creature(creature))
            }
        }
    }

    /// Spawn by configuration name; unknown names are reported and ignored
    pub fn spawn_named(&mut self, name: &str) -> Option<u32> {
        match CreatureKind::from_name(name) {
            Some(kind) => self.spawn_creature(kind),
            None => {
                log::error!("Unknown creature type to spawn: '{}'", name);
                None
            }
        }
    }

    /// Advance past a completed level and refill the current one.
    ///
    /// Returns the level index that was (re)started when the current level
    /// completed. Progression saturates at the last level.
    pub fn repopulate(&mut self) -> Option<usize> {
        if self.levels.is_empty() {
            return None;
        }
        let last = self.levels.len() - 1;
        self.current_level = self.current_level.min(last);

        let mut started = None;
        if self.levels[self.current_level].is_completed() {
            self.levels[self.current_level].level_reset();
            if self.current_level < last {
                self.current_level += 1;
            }
            log::info!("New level reached: {}", self.current_level);
            self.clear_creatures();
            started = Some(self.current_level);
        }

        let to_spawn = self.levels[self.current_level].repopulate();
        if !to_spawn.is_empty() {
            log::debug!("Repopulating {} creatures", to_spawn.len());
        }
        for kind in to_spawn {
            self.spawn_creature(kind);
        }
        started
    }

    /// Per-update housekeeping: power-up cadence, then repopulation
    pub fn update(&mut self) -> Option<usize> {
        let has_power_up = self.has_power_up();
        self.frame_counter += 1;
        if !has_power_up
            && self.powerup_interval > 0
            && self.frame_counter.is_multiple_of(self.powerup_interval)
        {
            self.spawn_creature(CreatureKind::PowerUp);
        }
        self.repopulate()
    }

    pub fn frame_counter(&self) -> u64 {
        self.frame_counter
    }
}
