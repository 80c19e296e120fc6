//! The tower: an endless stack of floors
//!
//! Floors are kept in a contiguous run of levels. New floors are generated in
//! batches below the ball as it descends, and passed floors are pruned in
//! batches from the top.

use std::collections::VecDeque;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::{FloorGeometry, GameConfig, TowerConfig};
use crate::error::GameError;
use crate::scene::{NodeId, NodeKind, Transform};

use super::floor::Floor;
use super::layout::derive;
use super::stage::Stage;

/// Result of a score event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreUpdate {
    /// The expected floor was passed
    Scored { score: u64 },
    /// Repeat event for the floor just passed
    Duplicate,
}

/// Snapshot of tower bookkeeping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TowerStats {
    pub score: u64,
    pub passed_levels: u32,
    pub next_level: u32,
    pub floor_count: usize,
    /// Lowest level still held, if any
    pub first_level: Option<u32>,
}

pub struct Tower {
    config: TowerConfig,
    geometry: FloorGeometry,
    group: NodeId,
    /// Ordered by level ascending; front is the level nearest the ball
    floors: VecDeque<Floor>,
    next_level: u32,
    passed_levels: u32,
    score: u64,
    rng: Pcg32,
}

impl Tower {
    /// Create the tower and generate its first batch of floors
    pub fn new(stage: &mut Stage, config: &GameConfig, seed: u64) -> Result<Self, GameError> {
        let root = stage.scene.root();
        let group = stage.scene.add_child(root, NodeKind::Group, Transform::default());
        let mut tower = Self {
            config: config.tower.clone(),
            geometry: config.geometry.clone(),
            group,
            floors: VecDeque::new(),
            next_level: 0,
            passed_levels: 0,
            score: 0,
            rng: Pcg32::seed_from_u64(seed),
        };
        tower.generate(stage)?;
        Ok(tower)
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn passed_levels(&self) -> u32 {
        self.passed_levels
    }

    pub fn next_level(&self) -> u32 {
        self.next_level
    }

    pub fn floors(&self) -> impl Iterator<Item = &Floor> {
        self.floors.iter()
    }

    pub fn floor(&self, level: u32) -> Option<&Floor> {
        self.floors.iter().find(|f| f.level() == level)
    }

    pub fn floor_count(&self) -> usize {
        self.floors.len()
    }

    pub fn stats(&self) -> TowerStats {
        TowerStats {
            score: self.score,
            passed_levels: self.passed_levels,
            next_level: self.next_level,
            floor_count: self.floors.len(),
            first_level: self.floors.front().map(Floor::level),
        }
    }

    /// Append one batch of freshly derived floors below the current bottom
    pub fn generate(&mut self, stage: &mut Stage) -> Result<(), GameError> {
        let first = self.next_level;
        for _ in 0..self.config.batch_size {
            let layout = derive(&self.config.template, self.geometry.unit_angle, &mut self.rng)?;
            let floor = Floor::new(stage, self.group, self.next_level, &layout, &self.geometry)?;
            self.floors.push_back(floor);
            self.next_level += 1;
        }
        log::debug!("Generated levels {}..{}", first, self.next_level);
        Ok(())
    }

    /// Fewer than `lookahead` generated levels remain below `level`
    pub fn should_generate(&self, level: u32) -> bool {
        self.next_level.saturating_sub(level) < self.config.lookahead
    }

    /// Unpassed floors make up less than `prune_ratio` of retained floors
    pub fn should_prune(&self, level: u32) -> bool {
        if self.floors.is_empty() {
            return false;
        }
        let remaining = self.next_level.saturating_sub(level) as f32;
        remaining / (self.floors.len() as f32) < self.config.prune_ratio
    }

    /// Drop one batch of the oldest (highest) floors
    pub fn prune(&mut self, stage: &mut Stage) {
        let count = (self.config.batch_size as usize).min(self.floors.len());
        for floor in self.floors.drain(..count) {
            floor.destroy(stage);
        }
        log::debug!(
            "Pruned {} floors, now holding {:?}..{}",
            count,
            self.floors.front().map(Floor::level),
            self.next_level
        );
    }

    /// Handle a void-pass event at `level`
    pub fn update_score(&mut self, stage: &mut Stage, level: u32) -> Result<ScoreUpdate, GameError> {
        if level == self.passed_levels {
            if let Some(floor) = self.floors.iter_mut().find(|f| f.level() == level) {
                floor.fly(stage);
            }
            self.score += 1;
            self.passed_levels += 1;

            let stats = self.stats();
            log::info!(
                "latest stat: score={} level={} next_level={} floors={}",
                stats.score,
                level,
                stats.next_level,
                stats.floor_count
            );

            if self.should_prune(level) {
                self.prune(stage);
            }
            if self.should_generate(level) {
                self.generate(stage)?;
            }
            Ok(ScoreUpdate::Scored { score: self.score })
        } else if level + 1 == self.passed_levels {
            Ok(ScoreUpdate::Duplicate)
        } else {
            Err(GameError::InconsistentLevel {
                level,
                passed: self.passed_levels,
            })
        }
    }

    /// Turn every floor by `angle` degrees
    pub fn rotate(&mut self, stage: &mut Stage, angle: f32) {
        for floor in &mut self.floors {
            floor.rotate(stage, angle);
        }
    }

    /// Tear everything down and start again from level 0
    pub fn reset(&mut self, stage: &mut Stage) -> Result<(), GameError> {
        for floor in self.floors.drain(..) {
            floor.destroy(stage);
        }
        self.next_level = 0;
        self.passed_levels = 0;
        self.score = 0;
        self.generate(stage)
    }
}
