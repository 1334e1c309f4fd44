//! Runtime card copies.

use std::fmt;

use super::{Card, CardTrait};
use crate::combat::UnitId;

/// Unique id of a card instance within a battle.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct InstanceId(String);

impl InstanceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "InstanceId({})", self.0)
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which defending unit(s) an attack lands on.
///
/// Ignored when the defender has no units.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Targeting {
    /// First living unit.
    #[default]
    Default,
    Unit(UnitId),
    Units(Vec<UnitId>),
    /// Every living unit.
    Area,
}

/// A card drawn into a hand or generated by the opponent planner.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardInstance {
    pub instance_id: InstanceId,
    pub card: Card,
    #[cfg_attr(feature = "serde", serde(default))]
    pub targeting: Targeting,
    /// Visual duplicate for a multi-unit opponent. Never scores, never deals damage.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ghost: bool,
    /// Opponent unit this action belongs to.
    #[cfg_attr(feature = "serde", serde(default))]
    pub bound_unit: Option<UnitId>,
}

impl CardInstance {
    pub fn new(instance_id: impl Into<String>, card: Card) -> Self {
        Self {
            instance_id: InstanceId::new(instance_id),
            card,
            targeting: Targeting::Default,
            ghost: false,
            bound_unit: None,
        }
    }

    pub fn with_targeting(mut self, targeting: Targeting) -> Self {
        self.targeting = targeting;
        self
    }

    pub fn bound_to(mut self, unit: UnitId) -> Self {
        self.bound_unit = Some(unit);
        self
    }

    /// Ghost duplicate of this instance for another unit.
    pub fn ghost_for(&self, unit: UnitId) -> Self {
        Self {
            instance_id: InstanceId::new(format!("{}-ghost-{}", self.instance_id, unit)),
            card: self.card.clone(),
            targeting: self.targeting.clone(),
            ghost: true,
            bound_unit: Some(unit),
        }
    }

    /// Counts toward ether and other resource gains.
    pub const fn counts_for_economy(&self) -> bool {
        !self.ghost
    }

    /// Takes part in combo detection and the action-cost bonus.
    pub const fn counts_for_combo(&self) -> bool {
        !self.ghost && !self.card.has_trait(CardTrait::Outcast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::TraitFlags;

    #[test]
    fn ghost_copies_are_excluded_everywhere() {
        let real = CardInstance::new("e-1", Card::attack("bite", 1, 4, 3)).bound_to(UnitId(0));
        let ghost = real.ghost_for(UnitId(1));
        assert_eq!(ghost.instance_id.as_str(), "e-1-ghost-1");
        assert!(ghost.ghost);
        assert_eq!(ghost.bound_unit, Some(UnitId(1)));
        assert!(!ghost.counts_for_economy());
        assert!(!ghost.counts_for_combo());
        assert!(real.counts_for_combo());
    }

    #[test]
    fn outcast_cards_still_count_for_economy() {
        let card = Card::general("filler", 1, 2).with_traits(TraitFlags::OUTCAST);
        let instance = CardInstance::new("p-1", card);
        assert!(instance.counts_for_economy());
        assert!(!instance.counts_for_combo());
    }
}
