//! Ether economy.
//!
//! - [`gain`]: converts played cards and their combo into ether
//! - [`pool`]: stores ether and spends it on overdrive
//!
//! [`ComboUsage`] is the per-run history that drives deflation. It is owned
//! by the caller and incremented once per resolved round.

pub mod gain;
pub mod pool;

use std::collections::BTreeMap;

pub use gain::{EtherGainInput, EtherGainResult, calculate_combo_ether_gain};
pub use pool::{EtherPool, OverdriveOutcome, activate_overdrive, should_enemy_overdrive};

use crate::combo::ComboName;

/// How often each combo has been realized this run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ComboUsage {
    counts: BTreeMap<ComboName, u32>,
}

impl ComboUsage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, name: ComboName) -> u32 {
        self.counts.get(&name).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ComboName, u32)> + '_ {
        self.counts.iter().map(|(&name, &count)| (name, count))
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl FromIterator<(ComboName, u32)> for ComboUsage {
    fn from_iter<I: IntoIterator<Item = (ComboName, u32)>>(iter: I) -> Self {
        Self {
            counts: iter.into_iter().filter(|&(_, count)| count > 0).collect(),
        }
    }
}

/// Returns a copy of `usage` with `name` counted once more.
pub fn record_combo_usage(usage: &ComboUsage, name: ComboName) -> ComboUsage {
    let mut next = usage.clone();
    *next.counts.entry(name).or_insert(0) += 1;
    next
}
