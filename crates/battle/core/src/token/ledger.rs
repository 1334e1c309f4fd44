use std::collections::BTreeMap;

use super::{DurationType, TokenCatalog, TokenCategory, TokenId};
use crate::side::Side;

/// One ledger entry. `stacks` is always at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenEntry {
    pub stacks: u32,
    pub duration_type: DurationType,
    pub category: TokenCategory,
}

/// Token stacks held by one combatant.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TokenLedger {
    entries: BTreeMap<TokenId, TokenEntry>,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &TokenId) -> Option<&TokenEntry> {
        self.entries.get(id)
    }

    pub fn stacks(&self, id: &TokenId) -> u32 {
        self.entries.get(id).map_or(0, |entry| entry.stacks)
    }

    pub fn contains(&self, id: &TokenId) -> bool {
        self.entries.contains_key(id)
    }

    /// Iterates entries in token id order.
    pub fn iter(&self) -> impl Iterator<Item = (&TokenId, &TokenEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Writes `stacks` for `id`, deleting the entry at zero.
    pub(crate) fn write(&mut self, id: &TokenId, entry: TokenEntry) {
        if entry.stacks == 0 {
            self.entries.remove(id);
        } else {
            self.entries.insert(id.clone(), entry);
        }
    }
}

/// New ledger snapshot plus transcript lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenOutcome {
    pub tokens: TokenLedger,
    pub logs: Vec<String>,
}

impl TokenOutcome {
    fn unchanged(tokens: &TokenLedger) -> Self {
        Self {
            tokens: tokens.clone(),
            logs: Vec::new(),
        }
    }
}

/// Circumstances of a token grant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrantedAt {
    /// The granting action was a critical resolution.
    pub critical: bool,
    /// Extra stacks a critical resolution adds.
    pub critical_bonus: u32,
}

impl GrantedAt {
    pub const fn critical(bonus: u32) -> Self {
        Self {
            critical: true,
            critical_bonus: bonus,
        }
    }
}

/// Adds `stacks` of `id` to `owner`'s ledger.
///
/// A critical grant adds the critical bonus on top of the requested amount
/// and logs it on its own line.
pub fn add_token<C>(
    tokens: &TokenLedger,
    catalog: &C,
    owner: Side,
    id: &TokenId,
    stacks: u32,
    granted_at: Option<GrantedAt>,
) -> TokenOutcome
where
    C: TokenCatalog + ?Sized,
{
    let Some(definition) = catalog.definition(id) else {
        tracing::trace!(%id, "add_token: unknown token");
        return TokenOutcome::unchanged(tokens);
    };

    let bonus = granted_at
        .filter(|g| g.critical)
        .map_or(0, |g| g.critical_bonus);
    let total = stacks.saturating_add(bonus);
    if total == 0 {
        return TokenOutcome::unchanged(tokens);
    }

    let mut next = tokens.clone();
    let current = next.stacks(id);
    let updated = current.saturating_add(total);
    next.write(
        id,
        TokenEntry {
            stacks: updated,
            duration_type: definition.duration_type,
            category: definition.category,
        },
    );

    let mut logs = Vec::with_capacity(2);
    if stacks > 0 {
        logs.push(format!(
            "{owner} gains {stacks} {} ({current} → {})",
            definition.name,
            current + stacks
        ));
    }
    if bonus > 0 {
        logs.push(format!(
            "Critical! {owner} gains {bonus} extra {} ({updated} total)",
            definition.name
        ));
    }
    tracing::trace!(%id, %owner, stacks = updated, "token added");

    TokenOutcome { tokens: next, logs }
}

/// Removes up to `stacks` of `id`, clamping at zero and deleting the entry there.
///
/// The entry must have the given duration class; otherwise nothing changes.
pub fn remove_token(
    tokens: &TokenLedger,
    owner: Side,
    id: &TokenId,
    duration_type: DurationType,
    stacks: u32,
) -> TokenOutcome {
    let Some(entry) = tokens.get(id).copied() else {
        return TokenOutcome::unchanged(tokens);
    };
    if entry.duration_type != duration_type || stacks == 0 {
        return TokenOutcome::unchanged(tokens);
    }

    let remaining = entry.stacks.saturating_sub(stacks);
    let mut next = tokens.clone();
    next.write(
        id,
        TokenEntry {
            stacks: remaining,
            ..entry
        },
    );

    let line = if remaining == 0 {
        format!("{owner} loses all {id} ({} → 0)", entry.stacks)
    } else {
        format!("{owner} loses {} {id} ({} → {remaining})", entry.stacks - remaining, entry.stacks)
    };
    tracing::trace!(%id, %owner, stacks = remaining, "token removed");

    TokenOutcome {
        tokens: next,
        logs: vec![line],
    }
}

/// Sets the stack count of `id` to an absolute value. `n <= 0` deletes the entry.
pub fn set_token_stacks<C>(
    tokens: &TokenLedger,
    catalog: &C,
    owner: Side,
    id: &TokenId,
    duration_type: DurationType,
    n: i64,
) -> TokenOutcome
where
    C: TokenCatalog + ?Sized,
{
    let Some(definition) = catalog.definition(id) else {
        return TokenOutcome::unchanged(tokens);
    };

    let stacks = u32::try_from(n.max(0)).unwrap_or(u32::MAX);
    let previous = tokens.stacks(id);
    if previous == stacks {
        return TokenOutcome::unchanged(tokens);
    }

    let mut next = tokens.clone();
    next.write(
        id,
        TokenEntry {
            stacks,
            duration_type,
            category: definition.category,
        },
    );

    TokenOutcome {
        tokens: next,
        logs: vec![format!(
            "{owner} {} set to {stacks} (was {previous})",
            definition.name
        )],
    }
}

/// Current stacks of `id`, zero when absent.
pub fn get_token_stacks(tokens: &TokenLedger, id: &TokenId) -> u32 {
    tokens.stacks(id)
}

pub fn has_token(tokens: &TokenLedger, id: &TokenId) -> bool {
    tokens.contains(id)
}
