//! Poker-style combo detection over selected cards.
//!
//! Cards are grouped by `action_cost`. Ghost cards and cards with the
//! `outcast` trait are ignored. The pattern is decided by strict priority:
//!
//! ```text
//! five of a kind > four of a kind > full house > flush
//!     > two pair > triple > pair > high card
//! ```
//!
//! A flush is not cost-keyed: it needs at least four cards that all sit on the
//! same side of the attack / non-attack split.

use std::collections::{BTreeMap, BTreeSet};

use crate::card::CardInstance;

/// Detected pattern, ordered from weakest to strongest.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ComboName {
    #[strum(serialize = "High Card")]
    HighCard,
    #[strum(serialize = "Pair")]
    Pair,
    #[strum(serialize = "Two Pair")]
    TwoPair,
    #[strum(serialize = "Triple")]
    Triple,
    #[strum(serialize = "Flush")]
    Flush,
    #[strum(serialize = "Full House")]
    FullHouse,
    #[strum(serialize = "Four of a Kind")]
    FourOfAKind,
    #[strum(serialize = "Five of a Kind")]
    FiveOfAKind,
}

/// Result of combo detection.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComboResult {
    pub name: ComboName,
    /// Action costs in the winning group; `None` for a flush.
    pub bonus_keys: Option<BTreeSet<u32>>,
}

impl ComboResult {
    fn keyed(name: ComboName, keys: BTreeSet<u32>) -> Self {
        Self {
            name,
            bonus_keys: Some(keys),
        }
    }
}

/// Classifies the selected cards. Returns `None` when no eligible card remains.
pub fn detect_poker_combo(cards: &[CardInstance]) -> Option<ComboResult> {
    let eligible: Vec<&CardInstance> = cards.iter().filter(|c| c.counts_for_combo()).collect();
    if eligible.is_empty() {
        return None;
    }

    let mut frequency: BTreeMap<u32, usize> = BTreeMap::new();
    for card in &eligible {
        *frequency.entry(card.card.action_cost).or_insert(0) += 1;
    }
    let costs_where = |pred: &dyn Fn(usize) -> bool| -> BTreeSet<u32> {
        frequency
            .iter()
            .filter(|&(_, &count)| pred(count))
            .map(|(&cost, _)| cost)
            .collect()
    };

    let fives = costs_where(&|count| count >= 5);
    if !fives.is_empty() {
        return Some(ComboResult::keyed(ComboName::FiveOfAKind, fives));
    }

    let fours = costs_where(&|count| count == 4);
    if !fours.is_empty() {
        return Some(ComboResult::keyed(ComboName::FourOfAKind, fours));
    }

    let threes = costs_where(&|count| count == 3);
    let twos = costs_where(&|count| count == 2);
    if !threes.is_empty() && !twos.is_empty() {
        let keys = threes.union(&twos).copied().collect();
        return Some(ComboResult::keyed(ComboName::FullHouse, keys));
    }

    if eligible.len() >= 4 {
        let offensive = eligible[0].card.kind.is_offensive();
        if eligible.iter().all(|c| c.card.kind.is_offensive() == offensive) {
            return Some(ComboResult {
                name: ComboName::Flush,
                bonus_keys: None,
            });
        }
    }

    if twos.len() >= 2 {
        return Some(ComboResult::keyed(ComboName::TwoPair, twos));
    }
    if !threes.is_empty() {
        return Some(ComboResult::keyed(ComboName::Triple, threes));
    }
    if !twos.is_empty() {
        return Some(ComboResult::keyed(ComboName::Pair, twos));
    }

    let highest = frequency.keys().next_back().copied().into_iter().collect();
    Some(ComboResult::keyed(ComboName::HighCard, highest))
}
