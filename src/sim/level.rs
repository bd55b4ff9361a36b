//! Per-level population ledger
//!
//! Each level tracks how many creatures of each kind it wants alive, how many
//! it believes are alive, and the score eaten so far.

use serde::{Deserialize, Serialize};

use super::creature::CreatureKind;

/// Target and live count for one creature kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationNode {
    pub kind: CreatureKind,
    /// Wanted population
    pub population: u32,
    /// Population believed alive (always within `0..=population`)
    pub current: u32,
}

impl PopulationNode {
    pub fn new(kind: CreatureKind, population: u32) -> Self {
        Self {
            kind,
            population,
            current: 0,
        }
    }
}

/// One level: its population ledger, running score and completion threshold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AquariumLevel {
    pub number: u32,
    nodes: Vec<PopulationNode>,
    level_score: u64,
    target_score: u64,
    /// Background asset drawn behind this level, if any
    pub background: Option<String>,
}

impl AquariumLevel {
    pub fn new(number: u32, target_score: u64) -> Self {
        Self {
            number,
            nodes: Vec::new(),
            level_score: 0,
            target_score,
            background: None,
        }
    }

    pub fn with_population(mut self, kind: CreatureKind, population: u32) -> Self {
        self.nodes.push(PopulationNode::new(kind, population));
        self
    }

    pub fn with_background(mut self, background: impl Into<String>) -> Self {
        self.background = Some(background.into());
        self
    }

    pub fn nodes(&self) -> &[PopulationNode] {
        &self.nodes
    }

    pub fn level_score(&self) -> u64 {
        self.level_score
    }

    pub fn target_score(&self) -> u64 {
        self.target_score
    }

    /// Live count the ledger believes for `kind`
    pub fn current_population(&self, kind: CreatureKind) -> Option<u32> {
        self.nodes.iter().find(|n| n.kind == kind).map(|n| n.current)
    }

    /// Kinds to spawn so every node reaches its target, in node order.
    ///
    /// Counts are bumped immediately, before the creatures exist; a dropped
    /// spawn (e.g. a duplicate boss) leaves the ledger ahead of reality.
    pub fn repopulate(&mut self) -> Vec<CreatureKind> {
        let mut to_spawn = Vec::new();
        for node in &mut self.nodes {
            let delta = node.population.saturating_sub(node.current);
            if delta > 0 {
                to_spawn.extend(std::iter::repeat_n(node.kind, delta as usize));
                node.current += delta;
            }
        }
        to_spawn
    }

    /// Record one eaten creature of `kind` worth `value`.
    /// Ignored when the first matching node is already empty.
    pub fn consume_population(&mut self, kind: CreatureKind, value: u32) {
        let Some(node) = self.nodes.iter_mut().find(|n| n.kind == kind) else {
            return;
        };
        if node.current == 0 {
            return;
        }
        node.current -= 1;
        self.level_score += u64::from(value);
        log::trace!("Consumed {}, {} left, level score {}", kind, node.current, self.level_score);
    }

    pub fn is_completed(&self) -> bool {
        self.level_score >= self.target_score
    }

    /// Zero the live counts so the next repopulation refills everything
    pub fn population_reset(&mut self) {
        for node in &mut self.nodes {
            node.current = 0;
        }
    }

    pub fn level_reset(&mut self) {
        self.level_score = 0;
        self.population_reset();
    }
}
