//! Assigns planned opponent cards to its living units.

use crate::card::{Card, CardInstance};
use crate::combat::{Combatant, UnitId};

/// Turns a planned card list into round instances.
///
/// Instance ids are `e{round}-{slot}`. With living units, the real copy of
/// slot `n` is bound to the `n`-th living unit (cycling), and every other
/// living unit gets a ghost copy so each unit shows an action on the timeline.
/// Without units the cards are emitted unbound.
pub fn bind_to_units(cards: &[Card], enemy: &Combatant, round: u64) -> Vec<CardInstance> {
    let living: Vec<UnitId> = enemy.living_units().map(|u| u.id).collect();
    let mut instances = Vec::with_capacity(cards.len() * living.len().max(1));

    for (slot, card) in cards.iter().enumerate() {
        let real = CardInstance::new(format!("e{round}-{slot}"), card.clone());
        if living.is_empty() {
            instances.push(real);
            continue;
        }

        let owner = living[slot % living.len()];
        let real = real.bound_to(owner);
        let ghosts: Vec<CardInstance> = living
            .iter()
            .filter(|&&unit| unit != owner)
            .map(|&unit| real.ghost_for(unit))
            .collect();
        instances.push(real);
        instances.extend(ghosts);
    }
    instances
}
