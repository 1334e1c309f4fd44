//! Turn-boundary token passes.
//!
//! - [`start_of_turn`] ticks every positive `turn` token (regen heals here).
//! - [`end_of_turn`] ticks every negative `turn` token (burn and poison hit here).
//!
//! Each ticked token applies its hp effect for its current stacks and then
//! loses exactly one stack.

use super::{DurationType, TokenCatalog, TokenCategory, TokenEffect, TokenEntry, TokenLedger};
use crate::side::Side;

/// Net hp change and updated ledger after a turn-boundary pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnPassiveOutcome {
    /// Positive for healing, negative for damage.
    pub hp_delta: i32,
    pub tokens: TokenLedger,
    pub logs: Vec<String>,
}

pub fn start_of_turn<C>(
    tokens: &TokenLedger,
    catalog: &C,
    owner: Side,
    hp: u32,
    max_hp: u32,
) -> TurnPassiveOutcome
where
    C: TokenCatalog + ?Sized,
{
    tick(tokens, catalog, owner, hp, max_hp, TokenCategory::Positive)
}

pub fn end_of_turn<C>(
    tokens: &TokenLedger,
    catalog: &C,
    owner: Side,
    hp: u32,
    max_hp: u32,
) -> TurnPassiveOutcome
where
    C: TokenCatalog + ?Sized,
{
    tick(tokens, catalog, owner, hp, max_hp, TokenCategory::Negative)
}

fn tick<C>(
    tokens: &TokenLedger,
    catalog: &C,
    owner: Side,
    hp: u32,
    max_hp: u32,
    category: TokenCategory,
) -> TurnPassiveOutcome
where
    C: TokenCatalog + ?Sized,
{
    let mut next = tokens.clone();
    let mut logs = Vec::new();
    let mut current_hp = i64::from(hp);

    let due: Vec<_> = tokens
        .iter()
        .filter(|(_, entry)| {
            entry.duration_type == DurationType::Turn && entry.category == category
        })
        .map(|(id, entry)| (id.clone(), *entry))
        .collect();

    for (id, entry) in due {
        let effect = catalog
            .definition(&id)
            .map_or(TokenEffect::None, |definition| definition.effect);
        let stacks = i64::from(entry.stacks);

        match effect {
            TokenEffect::Regen => {
                let healed = stacks.min(i64::from(max_hp) - current_hp).max(0);
                logs.push(format!(
                    "{owner} regenerates {healed} hp from {id} ({current_hp} → {})",
                    current_hp + healed
                ));
                current_hp += healed;
            }
            TokenEffect::DamageOverTime => {
                let dealt = stacks.min(current_hp);
                logs.push(format!(
                    "{owner} takes {dealt} damage from {id} ({current_hp} → {})",
                    current_hp - dealt
                ));
                current_hp -= dealt;
            }
            _ => {}
        }

        next.write(
            &id,
            TokenEntry {
                stacks: entry.stacks - 1,
                ..entry
            },
        );
    }

    let hp_delta = i32::try_from(current_hp - i64::from(hp)).unwrap_or_default();
    TurnPassiveOutcome {
        hp_delta,
        tokens: next,
        logs,
    }
}
