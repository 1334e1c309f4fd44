//! Battle configuration constants and tunable parameters.

use crate::card::Rarity;
use crate::combo::ComboName;

/// Tunable battle parameters.
///
/// Every balance number the engine uses lives here so that content files can
/// override it. Missing fields in a TOML file fall back to [`Default`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Multiplier applied once per previous use of the same combo in a run.
    pub deflation_rate: f64,
    /// Ether value of a card by rarity.
    pub rarity_values: RarityValues,
    /// Base ether multiplier by combo.
    pub combo_multipliers: ComboMultipliers,
    /// Multiplier bonus per point of `action_cost - 1` on eligible cards.
    pub action_cost_bonus_per_point: f64,
    /// Damage multiplier while ether overdrive is active.
    pub overdrive_multiplier: u32,
    /// Extra stacks added to token grants from a critical resolution.
    pub critical_bonus_stacks: u32,
    /// Rewinds from respond back to select allowed per round.
    pub max_rewinds: u32,
    /// Ether points per overdrive slot.
    pub ether_per_slot: u32,
    /// Opponent overdrive decision hook. Disabled until the pattern is confirmed.
    ///
    /// Rounds only credit the player's pool, so the hook can fire only when
    /// the caller seeds `enemy_ether` (see [`BattleState::with_ether`]).
    ///
    /// [`BattleState::with_ether`]: crate::combat::BattleState::with_ether
    pub enemy_overdrive_enabled: bool,
    /// Opponent planner budgets and heuristics.
    pub planner: PlannerConfig,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of units a grouped opponent can field.
    pub const MAX_UNITS: usize = 8;
    /// Maximum number of cards a single actor can commit to one round.
    pub const MAX_HAND: usize = 16;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_DEFLATION_RATE: f64 = 0.8;
    pub const DEFAULT_ACTION_COST_BONUS: f64 = 0.1;
    pub const DEFAULT_OVERDRIVE_MULTIPLIER: u32 = 2;
    pub const DEFAULT_CRITICAL_BONUS_STACKS: u32 = 1;
    pub const DEFAULT_MAX_REWINDS: u32 = 1;
    pub const DEFAULT_ETHER_PER_SLOT: u32 = 100;

    pub fn new() -> Self {
        Self {
            deflation_rate: Self::DEFAULT_DEFLATION_RATE,
            rarity_values: RarityValues::default(),
            combo_multipliers: ComboMultipliers::default(),
            action_cost_bonus_per_point: Self::DEFAULT_ACTION_COST_BONUS,
            overdrive_multiplier: Self::DEFAULT_OVERDRIVE_MULTIPLIER,
            critical_bonus_stacks: Self::DEFAULT_CRITICAL_BONUS_STACKS,
            max_rewinds: Self::DEFAULT_MAX_REWINDS,
            ether_per_slot: Self::DEFAULT_ETHER_PER_SLOT,
            enemy_overdrive_enabled: false,
            planner: PlannerConfig::default(),
        }
    }

    pub fn with_deflation_rate(mut self, deflation_rate: f64) -> Self {
        self.deflation_rate = deflation_rate;
        self
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Ether value per card rarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RarityValues {
    pub common: u32,
    pub rare: u32,
    pub special: u32,
    pub legendary: u32,
}

impl RarityValues {
    pub const fn value(&self, rarity: Rarity) -> u32 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Rare => self.rare,
            Rarity::Special => self.special,
            Rarity::Legendary => self.legendary,
        }
    }
}

impl Default for RarityValues {
    fn default() -> Self {
        Self {
            common: 10,
            rare: 25,
            special: 100,
            legendary: 500,
        }
    }
}

/// Base ether multiplier per combo.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ComboMultipliers {
    pub high_card: f64,
    pub pair: f64,
    pub two_pair: f64,
    pub triple: f64,
    pub flush: f64,
    pub full_house: f64,
    pub four_of_a_kind: f64,
    pub five_of_a_kind: f64,
}

impl ComboMultipliers {
    /// Looks up the multiplier for a combo. No combo counts as high card.
    pub fn multiplier(&self, combo: Option<ComboName>) -> f64 {
        match combo {
            None | Some(ComboName::HighCard) => self.high_card,
            Some(ComboName::Pair) => self.pair,
            Some(ComboName::TwoPair) => self.two_pair,
            Some(ComboName::Triple) => self.triple,
            Some(ComboName::Flush) => self.flush,
            Some(ComboName::FullHouse) => self.full_house,
            Some(ComboName::FourOfAKind) => self.four_of_a_kind,
            Some(ComboName::FiveOfAKind) => self.five_of_a_kind,
        }
    }
}

impl Default for ComboMultipliers {
    fn default() -> Self {
        Self {
            high_card: 1.0,
            pair: 2.0,
            two_pair: 2.5,
            triple: 3.0,
            flush: 3.25,
            full_house: 3.5,
            four_of_a_kind: 4.0,
            five_of_a_kind: 5.0,
        }
    }
}

/// Opponent planner budgets and heuristic weights.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    /// Total speed the opponent may commit in one round.
    pub speed_ceiling: u32,
    /// Total action cost the opponent may commit in one round.
    pub energy_budget: u32,
    /// Largest action set considered.
    pub max_cards: usize,
    /// Pool size below which the shared fallback pool is mixed in.
    pub min_cards: usize,
    /// Speed ceiling added per living unit beyond the first.
    pub speed_per_extra_unit: u32,
    /// Energy budget added per living unit beyond the first.
    pub energy_per_extra_unit: u32,
    /// Attack-cost sum an aggro plan should reach.
    pub aggro_min_attack_cost: u32,
    /// Defense-cost sum a turtle plan should reach.
    pub turtle_min_defense_cost: u32,
    /// Score bonus per selected card.
    pub card_bonus: i64,
    /// Largest `max_cards` searched exhaustively; larger searches are greedy.
    pub exhaustive_limit: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            speed_ceiling: 30,
            energy_budget: 6,
            max_cards: 3,
            min_cards: 2,
            speed_per_extra_unit: 10,
            energy_per_extra_unit: 2,
            aggro_min_attack_cost: 2,
            turtle_min_defense_cost: 2,
            card_bonus: 10_000,
            exhaustive_limit: 3,
        }
    }
}
