//! Per-tick scene controller
//!
//! Owns the player and the aquarium and runs one simulation step per call:
//! player update every tick, then (every Nth tick) collisions, boss
//! lifecycle, creature movement and repopulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aquarium::Aquarium;
use super::boss::{BossState, update_boss};
use super::collision::{CollisionOutcome, detect_collision, resolve_collision};
use super::creature::{CreatureKind, MoveContext};
use super::player::PlayerCreature;
use crate::effective_dt;
use crate::tuning::{Tuning, TuningError};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired swim direction (normalized by the core); None keeps the current heading
    pub direction: Option<Vec2>,
}

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    GameOver,
}

/// Most recent significant thing that happened in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Collision(CollisionOutcome),
    /// A level completed; `level` is the index now being played
    LevelAdvanced { level: usize },
    BossSpawned,
    BossDefeated,
    GameOver,
}

/// HUD scalars for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub power: u32,
    pub lives: u8,
    pub level: usize,
}

/// Fires on every `every`-th call
#[derive(Debug, Clone)]
pub struct FrameGate {
    every: u32,
    count: u32,
}

impl FrameGate {
    pub fn new(every: u32) -> Self {
        Self {
            every: every.max(1),
            count: 0,
        }
    }

    pub fn tick(&mut self) -> bool {
        self.count += 1;
        if self.count >= self.every {
            self.count = 0;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameScene {
    name: String,
    tuning: Tuning,
    player: PlayerCreature,
    aquarium: Aquarium,
    phase: GamePhase,
    boss_state: BossState,
    last_event: Option<GameEvent>,
    gate: FrameGate,
    time_ticks: u64,
    /// Seconds since session start
    elapsed: f32,
}

impl GameScene {
    /// Start a session: validated tuning, seeded tank, first level populated
    pub fn new(name: impl Into<String>, tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        let aquarium = Aquarium::from_tuning(&tuning, seed)?;
        let player = Self::spawn_player(&tuning, &aquarium);
        let mut scene = Self {
            name: name.into(),
            gate: FrameGate::new(tuning.collision_cadence),
            tuning,
            player,
            aquarium,
            phase: GamePhase::Playing,
            boss_state: BossState::Inactive,
            last_event: None,
            time_ticks: 0,
            elapsed: 0.0,
        };
        scene.aquarium.repopulate();
        log::info!(
            "Scene '{}' started with seed {} ({} levels)",
            scene.name,
            seed,
            scene.aquarium.levels().len()
        );
        Ok(scene)
    }

    fn spawn_player(tuning: &Tuning, aquarium: &Aquarium) -> PlayerCreature {
        let (x, y) = tuning.player_start;
        let mut player = PlayerCreature::new(Vec2::new(x, y), tuning.player_speed)
            .with_lives(tuning.player_lives);
        player.body.bounds = aquarium.creature_bounds();
        player
    }

    /// Throw away the session and start over with a new seed
    pub fn restart(&mut self, seed: u64) -> Result<(), TuningError> {
        *self = Self::new(self.name.clone(), self.tuning.clone(), seed)?;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn player(&self) -> &PlayerCreature {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerCreature {
        &mut self.player
    }

    pub fn aquarium(&self) -> &Aquarium {
        &self.aquarium
    }

    pub fn aquarium_mut(&mut self) -> &mut Aquarium {
        &mut self.aquarium
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn boss_state(&self) -> BossState {
        self.boss_state
    }

    pub fn last_event(&self) -> Option<&GameEvent> {
        self.last_event.as_ref()
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Background of the level being played, if it has one
    pub fn background(&self) -> Option<&str> {
        self.aquarium.current_level()?.background.as_deref()
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.player.score(),
            power: self.player.power(),
            lives: self.player.lives(),
            level: self.aquarium.current_level_index(),
        }
    }

    fn game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        self.last_event = Some(GameEvent::GameOver);
        log::info!("Game over with score {}", self.player.score());
    }

    /// Advance the scene by one tick. `dt` is the clock's frame time in seconds.
    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        if self.phase == GamePhase::GameOver {
            return;
        }

        let dt = effective_dt(dt);
        self.time_ticks += 1;
        self.elapsed += dt;

        if let Some(dir) = input.direction {
            self.player.set_direction(dir);
        }
        self.player.update(self.tuning.boost_speed);

        if !self.gate.tick() {
            return;
        }

        if let Some(hit) = detect_collision(&self.aquarium, &self.player) {
            log::debug!("Collision between player and {} #{}", hit.kind, hit.id);
            if let Some(outcome) =
                resolve_collision(&mut self.aquarium, &mut self.player, hit, &self.tuning)
            {
                match outcome {
                    CollisionOutcome::GameOver => {
                        self.game_over();
                        return;
                    }
                    CollisionOutcome::PowerUpCollected { .. } => {
                        self.last_event = Some(GameEvent::Collision(outcome));
                        return;
                    }
                    _ => self.last_event = Some(GameEvent::Collision(outcome)),
                }
            }
        }

        if self.boss_state == BossState::Inactive && self.aquarium.is_last_level() {
            // The level ledger may already have spawned one; only a fresh spawn is reported
            if self.aquarium.spawn_creature(CreatureKind::BossFish).is_some() {
                self.last_event = Some(GameEvent::BossSpawned);
            }
            self.boss_state = BossState::Active;
        }

        let ctx = MoveContext {
            elapsed: self.elapsed,
            tank: self.aquarium.size(),
        };
        let mut player_died = false;
        for creature in self.aquarium.creatures_mut() {
            if creature.is_boss() {
                if update_boss(creature, &mut self.player, &ctx, dt, &self.tuning) {
                    player_died = true;
                    break;
                }
            } else {
                creature.advance(&ctx);
            }
        }
        if player_died {
            self.game_over();
            return;
        }

        self.mark_defeated_boss();
        self.prune_defeated_boss();

        if let Some(level) = self.aquarium.update() {
            // The board was cleared, so the new level instance gets its own boss
            self.boss_state = BossState::Inactive;
            self.last_event = Some(GameEvent::LevelAdvanced { level });
        }
    }

    /// Active -> Removed once the live boss has flagged itself for removal
    fn mark_defeated_boss(&mut self) {
        let defeated = self
            .aquarium
            .creatures()
            .iter()
            .any(|c| c.boss.as_ref().is_some_and(|b| b.removed));
        if defeated {
            self.boss_state = BossState::Removed;
        }
    }

    /// Removed -> Inactive: take the boss out through the aquarium so the
    /// level ledger consumes it
    fn prune_defeated_boss(&mut self) {
        if self.boss_state != BossState::Removed {
            return;
        }
        let removed: Vec<u32> = self
            .aquarium
            .creatures()
            .iter()
            .filter(|c| c.boss.as_ref().is_some_and(|b| b.removed))
            .map(|c| c.id)
            .collect();
        for id in removed {
            log::info!("Removing defeated boss #{}", id);
            self.aquarium.remove_creature(id);
        }
        self.boss_state = BossState::Inactive;
        self.last_event = Some(GameEvent::BossDefeated);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{AquariumLevel, Creature};
    use crate::tuning::{LevelSpec, PopulationSpec};

    fn scene(seed: u64) -> GameScene {
        GameScene::new("test", Tuning::default(), seed).unwrap()
    }

    /// Park every creature in a corner so the player can move freely
    fn park_creatures(scene: &mut GameScene) {
        for c in scene.aquarium_mut().creatures_mut() {
            c.body.pos = Vec2::new(980.0, 720.0);
            c.body.speed = 0;
        }
    }

    /// A single boss level holding one fish and no ledger boss
    fn boss_only_scene(seed: u64) -> GameScene {
        let tuning = Tuning {
            levels: vec![LevelSpec {
                target_score: 1,
                background: None,
                population: vec![PopulationSpec {
                    kind: "Fish".into(),
                    count: 1,
                }],
            }],
            ..Tuning::default()
        };
        let mut s = GameScene::new("boss-only", tuning, seed).unwrap();
        s.player_mut().body.pos = Vec2::new(20.0, 20.0);
        park_fish(&mut s);
        s
    }

    /// Park everything except the boss away from the player and the boss lane
    fn park_fish(scene: &mut GameScene) {
        for c in scene.aquarium_mut().creatures_mut() {
            if !c.is_boss() {
                c.body.pos = Vec2::new(600.0, 600.0);
                c.body.speed = 0;
            }
        }
    }

    fn idle(scene: &mut GameScene, ticks: usize) {
        for _ in 0..ticks {
            scene.tick(&TickInput::default(), 1.0 / 60.0);
        }
    }

    #[test]
    fn test_frame_gate_fires_every_nth() {
        let mut gate = FrameGate::new(5);
        let fired: Vec<bool> = (0..10).map(|_| gate.tick()).collect();
        assert_eq!(
            fired,
            vec![false, false, false, false, true, false, false, false, false, true]
        );
    }

    #[test]
    fn test_starts_populated() {
        let s = scene(1);
        assert_eq!(s.aquarium().creature_count(), 10);
        assert_eq!(s.phase(), GamePhase::Playing);
        assert_eq!(s.hud(), Hud { score: 0, power: 1, lives: 3, level: 0 });
    }

    #[test]
    fn test_collisions_only_on_gated_ticks() {
        let mut s = scene(2);
        park_creatures(&mut s);
        let pos = s.player().body.pos;
        let id = s.aquarium_mut().add_creature(Creature::new(
            9000,
            CreatureKind::BiggerFish,
            pos,
            0,
            None,
        ));
        idle(&mut s, 4);
        assert_eq!(s.player().lives(), 3);
        idle(&mut s, 1);
        assert_eq!(s.player().lives(), 2);
        assert!(s.aquarium().creature(id).is_some());
        assert_eq!(
            s.last_event(),
            Some(&GameEvent::Collision(CollisionOutcome::Repelled {
                kind: CreatureKind::BiggerFish,
                life_lost: true
            }))
        );
    }

    #[test]
    fn test_debounce_ticks_every_frame() {
        let mut s = scene(3);
        park_creatures(&mut s);
        s.player_mut().lose_life(180, 2);
        idle(&mut s, 7);
        assert_eq!(s.player().damage_debounce(), 173);
    }

    #[test]
    fn test_game_over_stops_the_scene() {
        let mut s = scene(4);
        park_creatures(&mut s);
        let pos = s.player().body.pos;
        let weakened = s.player().clone().with_lives(1);
        *s.player_mut() = weakened;
        s.aquarium_mut()
            .add_creature(Creature::new(9001, CreatureKind::Slowfish, pos, 0, None));
        idle(&mut s, 5);
        assert_eq!(s.phase(), GamePhase::GameOver);
        assert_eq!(s.last_event(), Some(&GameEvent::GameOver));

        let ticks = s.time_ticks();
        idle(&mut s, 20);
        assert_eq!(s.time_ticks(), ticks);
        assert_eq!(s.player().lives(), 0);
    }

    #[test]
    fn test_power_up_pickup_ends_gated_work() {
        let mut s = scene(5);
        park_creatures(&mut s);
        let pos = s.player().body.pos;
        s.aquarium_mut()
            .add_creature(Creature::new(9002, CreatureKind::PowerUp, pos, 0, None));
        idle(&mut s, 5);
        assert!(matches!(
            s.last_event(),
            Some(GameEvent::Collision(CollisionOutcome::PowerUpCollected { power: 2 }))
        ));
        assert_eq!(s.player().speed(), s.tuning().player_speed + 2);
        // Repopulation was skipped this tick, so the frame counter didn't move
        assert_eq!(s.aquarium().frame_counter(), 0);
    }

    #[test]
    fn test_boss_level_spawns_exactly_one_boss() {
        let mut tuning = Tuning::default();
        tuning.levels.truncate(1);
        tuning.levels[0].population.push(crate::tuning::PopulationSpec {
            kind: "BossFish".into(),
            count: 1,
        });
        let mut s = GameScene::new("boss", tuning, 6).unwrap();
        assert!(s.aquarium().is_last_level());
        assert_eq!(s.aquarium().count_of(CreatureKind::BossFish), 1);
        s.player_mut().body.pos = Vec2::new(20.0, 20.0);

        idle(&mut s, 5);
        assert_eq!(s.boss_state(), BossState::Active);
        assert_eq!(s.aquarium().count_of(CreatureKind::BossFish), 1);
        assert!(s.aquarium_mut().spawn_creature(CreatureKind::BossFish).is_none());
    }

    #[test]
    fn test_defeated_boss_is_pruned() {
        let mut s = scene(7);
        let mut aq = Aquarium::new(1024.0, 768.0, 7);
        aq.add_level(AquariumLevel::new(0, 10_000).with_population(CreatureKind::Fish, 1));
        *s.aquarium_mut() = aq;
        s.aquarium_mut().spawn_creature(CreatureKind::BossFish);
        park_creatures(&mut s);
        s.player_mut().body.pos = Vec2::new(20.0, 20.0);
        s.player_mut().add_score(1, 40, 25);

        idle(&mut s, 5);
        assert_eq!(s.aquarium().count_of(CreatureKind::BossFish), 0);
        assert_eq!(s.boss_state(), BossState::Inactive);
        assert_eq!(s.last_event(), Some(&GameEvent::BossDefeated));

        // Still on the last level: a fresh boss spawns, sees the score already
        // past its target and is pruned again within the same tick
        idle(&mut s, 5);
        assert_eq!(s.aquarium().count_of(CreatureKind::BossFish), 0);
        assert_eq!(s.last_event(), Some(&GameEvent::BossDefeated));
    }

    #[test]
    fn test_level_completion_clears_board() {
        let mut s = scene(8);
        park_creatures(&mut s);
        let ids: Vec<u32> = s.aquarium().creatures().iter().map(|c| c.id).collect();
        for id in ids {
            s.aquarium_mut().remove_creature(id);
        }
        s.player_mut().body.pos = Vec2::new(20.0, 20.0);
        idle(&mut s, 5);
        assert_eq!(s.last_event(), Some(&GameEvent::LevelAdvanced { level: 1 }));
        assert_eq!(s.hud().level, 1);
        assert_eq!(s.aquarium().creature_count(), 20);
    }

    #[test]
    fn test_same_seed_same_session() {
        let mut a = scene(99);
        let mut b = scene(99);
        let input = TickInput {
            direction: Some(Vec2::new(1.0, 0.5)),
        };
        for _ in 0..200 {
            a.tick(&input, 1.0 / 60.0);
            b.tick(&input, 1.0 / 60.0);
        }
        assert_eq!(a.hud(), b.hud());
        assert_eq!(a.aquarium().creature_count(), b.aquarium().creature_count());
        assert_eq!(a.player().body.pos, b.player().body.pos);
    }

    #[test]
    fn test_boss_returns_after_level_restart() {
        let mut s = boss_only_scene(12);
        idle(&mut s, 5);
        assert_eq!(s.last_event(), Some(&GameEvent::BossSpawned));
        assert_eq!(s.boss_state(), BossState::Active);
        assert_eq!(s.aquarium().count_of(CreatureKind::BossFish), 1);

        let fish = s.aquarium().creatures().iter().find(|c| !c.is_boss()).unwrap().id;
        s.aquarium_mut().remove_creature(fish);
        idle(&mut s, 5);
        assert_eq!(s.last_event(), Some(&GameEvent::LevelAdvanced { level: 0 }));
        assert_eq!(s.boss_state(), BossState::Inactive);
        assert_eq!(s.aquarium().count_of(CreatureKind::BossFish), 0);

        park_fish(&mut s);
        idle(&mut s, 5);
        assert_eq!(s.last_event(), Some(&GameEvent::BossSpawned));
        assert_eq!(s.boss_state(), BossState::Active);
        assert_eq!(s.aquarium().count_of(CreatureKind::BossFish), 1);
    }

    #[test]
    fn test_defeated_boss_is_removed_before_prune() {
        let mut s = boss_only_scene(13);
        idle(&mut s, 5);
        assert_eq!(s.boss_state(), BossState::Active);
        s.player_mut().add_score(1, 40, 25);

        let ctx = MoveContext {
            elapsed: s.elapsed,
            tank: s.aquarium.size(),
        };
        let boss = s.aquarium.creatures_mut().iter_mut().find(|c| c.is_boss()).unwrap();
        assert!(!update_boss(boss, &mut s.player, &ctx, 1.0 / 60.0, &s.tuning));

        s.mark_defeated_boss();
        assert_eq!(s.boss_state(), BossState::Removed);
        assert_eq!(s.aquarium().count_of(CreatureKind::BossFish), 1);

        s.prune_defeated_boss();
        assert_eq!(s.boss_state(), BossState::Inactive);
        assert_eq!(s.aquarium().count_of(CreatureKind::BossFish), 0);
        assert_eq!(s.last_event(), Some(&GameEvent::BossDefeated));
    }

    #[test]
    fn test_default_progression_reaches_boss_level() {
        let mut s = scene(10);
        s.player_mut().body.pos = Vec2::new(20.0, 20.0);
        for level in 1..=5usize {
            let ids: Vec<u32> = s.aquarium().creatures().iter().map(|c| c.id).collect();
            for id in ids {
                s.aquarium_mut().remove_creature(id);
            }
            idle(&mut s, 5);
            assert_eq!(s.last_event(), Some(&GameEvent::LevelAdvanced { level }));
            assert_eq!(s.hud().level, level);
        }
        assert!(s.aquarium().is_last_level());
        assert_eq!(s.background(), Some("backgroundBoss.png"));
        assert_eq!(s.aquarium().count_of(CreatureKind::BossFish), 1);
        assert_eq!(s.aquarium().count_of(CreatureKind::Fish), 20);

        // The ledger already placed the boss, so the scene only activates it
        park_creatures(&mut s);
        idle(&mut s, 5);
        assert_eq!(s.boss_state(), BossState::Active);
        assert_eq!(s.aquarium().count_of(CreatureKind::BossFish), 1);
        assert_eq!(s.last_event(), Some(&GameEvent::LevelAdvanced { level: 5 }));
    }
}
