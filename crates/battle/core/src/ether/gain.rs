//! Ether gain with repetition deflation.
//!
//! ```text
//! base_gain   = Σ rarity_value(card)            (non-ghost cards)
//!             | card_count × common_value       (no card list)
//! combo_mult  = table[combo] + Σ bonus × (action_cost − 1)   (eligible cards, cost ≥ 2)
//! multiplied  = round(base_gain × combo_mult × extra)
//! gain        = round(multiplied × deflation_rate ^ uses(combo))
//! ```

use super::ComboUsage;
use crate::card::CardInstance;
use crate::combo::ComboName;
use crate::config::BattleConfig;

/// Inputs of [`calculate_combo_ether_gain`].
#[derive(Clone, Copy, Debug)]
pub struct EtherGainInput<'a> {
    /// Played cards. When absent, `card_count` common cards are assumed.
    pub cards: Option<&'a [CardInstance]>,
    pub card_count: usize,
    pub combo: Option<ComboName>,
    pub usage: &'a ComboUsage,
    pub extra_multiplier: f64,
}

impl<'a> EtherGainInput<'a> {
    pub fn from_cards(
        cards: &'a [CardInstance],
        combo: Option<ComboName>,
        usage: &'a ComboUsage,
    ) -> Self {
        Self {
            cards: Some(cards),
            card_count: cards.len(),
            combo,
            usage,
            extra_multiplier: 1.0,
        }
    }

    pub fn with_extra_multiplier(mut self, extra_multiplier: f64) -> Self {
        self.extra_multiplier = extra_multiplier;
        self
    }
}

/// Breakdown of an ether gain, for display.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EtherGainResult {
    pub gain: u32,
    pub base_gain: u32,
    pub combo_mult: f64,
    pub action_cost_bonus: f64,
    /// Reduction from deflation in whole percent.
    pub deflation_pct: u32,
    pub deflation_mult: f64,
}

/// Computes the ether a set of played cards yields. Pure and repeatable.
pub fn calculate_combo_ether_gain(
    input: &EtherGainInput<'_>,
    config: &BattleConfig,
) -> EtherGainResult {
    let values = &config.rarity_values;
    let (base_gain, cost_points) = match input.cards {
        Some(cards) => {
            let base = cards
                .iter()
                .filter(|c| c.counts_for_economy())
                .map(|c| values.value(c.card.rarity))
                .sum::<u32>();
            let points = cards
                .iter()
                .filter(|c| c.counts_for_combo() && c.card.action_cost >= 2)
                .map(|c| c.card.action_cost - 1)
                .sum::<u32>();
            (base, points)
        }
        None => {
            let count = u32::try_from(input.card_count).unwrap_or(u32::MAX);
            (count.saturating_mul(values.common), 0)
        }
    };

    let action_cost_bonus = f64::from(cost_points) * config.action_cost_bonus_per_point;
    let combo_mult = config.combo_multipliers.multiplier(input.combo) + action_cost_bonus;
    let multiplied = (f64::from(base_gain) * combo_mult * input.extra_multiplier).round();

    let deflation_mult = match input.combo {
        Some(name) => {
            let uses = i32::try_from(input.usage.count(name)).unwrap_or(i32::MAX);
            config.deflation_rate.powi(uses)
        }
        None => 1.0,
    };
    let gain = to_u32((multiplied * deflation_mult).round());
    let deflation_pct = to_u32(((1.0 - deflation_mult) * 100.0).round());

    tracing::debug!(
        combo = ?input.combo,
        base_gain,
        combo_mult,
        deflation_mult,
        gain,
        "ether gain"
    );

    EtherGainResult {
        gain,
        base_gain,
        combo_mult,
        action_cost_bonus,
        deflation_pct,
        deflation_mult,
    }
}

fn to_u32(value: f64) -> u32 {
    if value.is_nan() || value <= 0.0 {
        0
    } else if value >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        value as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Card, Rarity, TraitFlags};
    use crate::combo::detect_poker_combo;
    use crate::ether::record_combo_usage;

    fn hand(costs: &[u32]) -> Vec<CardInstance> {
        costs
            .iter()
            .enumerate()
            .map(|(i, &cost)| CardInstance::new(format!("p-{i}"), Card::attack("strike", cost, 4, 5)))
            .collect()
    }

    #[test]
    fn first_pair_of_cost_two_cards_yields_44() {
        let cards = hand(&[2, 2]);
        let combo = detect_poker_combo(&cards).map(|c| c.name);
        assert_eq!(combo, Some(ComboName::Pair));

        let usage = ComboUsage::default();
        let result = calculate_combo_ether_gain(
            &EtherGainInput::from_cards(&cards, combo, &usage),
            &BattleConfig::default(),
        );
        assert_eq!(result.base_gain, 20);
        assert!((result.action_cost_bonus - 0.2).abs() < 1e-9);
        assert!((result.combo_mult - 2.2).abs() < 1e-9);
        assert_eq!(result.deflation_pct, 0);
        assert_eq!(result.gain, 44);
    }

    #[test]
    fn card_count_fallback_uses_common_value() {
        let usage = ComboUsage::default();
        let input = EtherGainInput {
            cards: None,
            card_count: 3,
            combo: Some(ComboName::Triple),
            usage: &usage,
            extra_multiplier: 1.0,
        };
        let result = calculate_combo_ether_gain(&input, &BattleConfig::default());
        assert_eq!(result.base_gain, 30);
        assert_eq!(result.action_cost_bonus, 0.0);
        assert_eq!(result.gain, 90);
    }

    #[test]
    fn rarity_drives_base_and_ghosts_are_free() {
        let mut cards = hand(&[1, 1]);
        cards[0].card = cards[0].card.clone().with_rarity(Rarity::Legendary);
        cards.push(cards[1].ghost_for(crate::combat::UnitId(1)));

        let usage = ComboUsage::default();
        let result = calculate_combo_ether_gain(
            &EtherGainInput::from_cards(&cards, Some(ComboName::Pair), &usage),
            &BattleConfig::default(),
        );
        assert_eq!(result.base_gain, 510);
    }

    #[test]
    fn outcast_cards_score_but_skip_cost_bonus() {
        let mut cards = hand(&[3]);
        cards[0].card = cards[0].card.clone().with_traits(TraitFlags::OUTCAST);
        let usage = ComboUsage::default();
        let result = calculate_combo_ether_gain(
            &EtherGainInput::from_cards(&cards, None, &usage),
            &BattleConfig::default(),
        );
        assert_eq!(result.base_gain, 10);
        assert_eq!(result.action_cost_bonus, 0.0);
        assert_eq!(result.gain, 10);
    }

    #[test]
    fn deflation_is_monotonic_and_never_zero_multiplier() {
        let cards = hand(&[2, 2]);
        let config = BattleConfig::default();
        let mut usage = ComboUsage::default();
        let mut previous_gain = u32::MAX;
        let mut previous_mult = f64::INFINITY;

        for uses in 0..50 {
            let result = calculate_combo_ether_gain(
                &EtherGainInput::from_cards(&cards, Some(ComboName::Pair), &usage),
                &config,
            );
            assert!(result.gain <= previous_gain, "gain rose at {uses} uses");
            assert!(result.deflation_mult < previous_mult);
            assert!(result.deflation_mult > 0.0);
            previous_gain = result.gain;
            previous_mult = result.deflation_mult;
            usage = record_combo_usage(&usage, ComboName::Pair);
        }
    }

    #[test]
    fn second_use_reports_deflation() {
        let cards = hand(&[2, 2]);
        let usage = record_combo_usage(&ComboUsage::default(), ComboName::Pair);
        let result = calculate_combo_ether_gain(
            &EtherGainInput::from_cards(&cards, Some(ComboName::Pair), &usage),
            &BattleConfig::default(),
        );
        assert_eq!(result.deflation_pct, 20);
        assert_eq!(result.gain, 35);
    }

    #[test]
    fn usage_of_other_combos_does_not_deflate() {
        let cards = hand(&[2, 2]);
        let usage = record_combo_usage(&ComboUsage::default(), ComboName::Flush);
        let result = calculate_combo_ether_gain(
            &EtherGainInput::from_cards(&cards, Some(ComboName::Pair), &usage),
            &BattleConfig::default(),
        );
        assert_eq!(result.gain, 44);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let cards = hand(&[3, 3, 3]);
        let usage = record_combo_usage(&ComboUsage::default(), ComboName::Triple);
        let input = EtherGainInput::from_cards(&cards, Some(ComboName::Triple), &usage)
            .with_extra_multiplier(1.5);
        let config = BattleConfig::default();
        let a = calculate_combo_ether_gain(&input, &config);
        let b = calculate_combo_ether_gain(&input, &config);
        assert_eq!(a, b);
        assert_eq!(a.gain.to_le_bytes(), b.gain.to_le_bytes());
        assert_eq!(a.combo_mult.to_bits(), b.combo_mult.to_bits());
    }
}
