//! Opponent stance selection.

use std::collections::BTreeMap;

use crate::rng::RngOracle;

/// Stance the opponent plans its round with.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EnemyMode {
    /// Favors attack cards and raw damage.
    Aggro,
    /// Favors defense cards and block.
    Turtle,
    /// Favors an even attack/defense split.
    Balanced,
}

impl EnemyMode {
    pub const ALL: [Self; 3] = [Self::Aggro, Self::Turtle, Self::Balanced];
}

/// Relative likelihood of each mode. Weights need not sum to anything.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ModeWeightTable {
    pub aggro: u32,
    pub turtle: u32,
    pub balanced: u32,
}

impl ModeWeightTable {
    pub const UNIFORM: Self = Self {
        aggro: 1,
        turtle: 1,
        balanced: 1,
    };

    pub const fn new(aggro: u32, turtle: u32, balanced: u32) -> Self {
        Self {
            aggro,
            turtle,
            balanced,
        }
    }

    pub const fn weight(&self, mode: EnemyMode) -> u32 {
        match mode {
            EnemyMode::Aggro => self.aggro,
            EnemyMode::Turtle => self.turtle,
            EnemyMode::Balanced => self.balanced,
        }
    }

    pub fn total(&self) -> u64 {
        u64::from(self.aggro) + u64::from(self.turtle) + u64::from(self.balanced)
    }
}

impl Default for ModeWeightTable {
    fn default() -> Self {
        Self::UNIFORM
    }
}

/// Per-opponent mode weight lookup.
pub trait ModeWeights {
    /// Weight table for `enemy_id`, or `None` for unknown opponents.
    fn mode_weights(&self, enemy_id: &str) -> Option<ModeWeightTable>;
}

/// Lookup that knows no opponent; everything uses the uniform table.
#[derive(Clone, Copy, Debug, Default)]
pub struct UniformWeights;

impl ModeWeights for UniformWeights {
    fn mode_weights(&self, _enemy_id: &str) -> Option<ModeWeightTable> {
        None
    }
}

impl ModeWeights for BTreeMap<String, ModeWeightTable> {
    fn mode_weights(&self, enemy_id: &str) -> Option<ModeWeightTable> {
        self.get(enemy_id).copied()
    }
}

/// Weighted random choice of mode for `enemy_id`.
pub fn decide_enemy_mode<W>(enemy_id: &str, weights: &W, rng: &dyn RngOracle, seed: u64) -> EnemyMode
where
    W: ModeWeights + ?Sized,
{
    let table = weights
        .mode_weights(enemy_id)
        .filter(|t| t.total() > 0)
        .unwrap_or_default();
    let values = EnemyMode::ALL.map(|mode| table.weight(mode));
    let mode = rng
        .weighted_index(seed, &values)
        .map_or(EnemyMode::Balanced, |index| EnemyMode::ALL[index]);

    tracing::debug!(enemy_id, %mode, ?table, "enemy mode decided");
    mode
}
