//! Score-indexed difficulty tables
//!
//! Each table is a step function: the value of the highest threshold not
//! exceeding the score wins, and `default` applies below the lowest one.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// One `(min_score, value)` threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub min_score: u32,
    pub value: u32,
}

/// Step function of score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTable {
    pub default: u32,
    pub steps: Vec<Step>,
}

impl StepTable {
    pub fn new(default: u32, steps: &[(u32, u32)]) -> Self {
        let mut steps: Vec<Step> = steps
            .iter()
            .map(|&(min_score, value)| Step { min_score, value })
            .collect();
        steps.sort_by_key(|s| s.min_score);
        Self { default, steps }
    }

    /// Value for a score. Order-independent, so hand-edited JSON need not be sorted.
    pub fn value_at(&self, score: u32) -> u32 {
        self.steps
            .iter()
            .filter(|s| s.min_score <= score)
            .max_by_key(|s| s.min_score)
            .map(|s| s.value)
            .unwrap_or(self.default)
    }
}

/// Base movement rate (cells/sec) for a score
pub fn base_speed(config: &GameConfig, score: u32) -> u32 {
    config.speed_levels.value_at(score).max(1)
}

/// How many obstacles should exist at this score.
///
/// A floor on additions: obstacles are never removed even if this drops.
pub fn obstacle_target(config: &GameConfig, score: u32) -> usize {
    config.obstacle_levels.value_at(score) as usize
}

/// Background tier index exposed to the renderer
pub fn background_tier(config: &GameConfig, score: u32) -> u32 {
    config.background_levels.value_at(score)
}
