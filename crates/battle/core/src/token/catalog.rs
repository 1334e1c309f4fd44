//! Token definitions and the catalog lookup.

use std::collections::BTreeMap;

use super::TokenId;

/// When a token decays.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum DurationType {
    /// Stays until removed explicitly.
    Permanent,
    /// Loses a stack each time a card consumes it.
    Usage,
    /// Loses a stack at a turn boundary.
    Turn,
}

/// Buff or debuff.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum TokenCategory {
    Positive,
    Negative,
}

/// Rule hook a token carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TokenEffect {
    /// Pure marker with no built-in rule.
    #[default]
    None,
    /// Heals `stacks` hp at the start of the owner's turn.
    Regen,
    /// Deals `stacks` damage at the end of the owner's turn.
    DamageOverTime,
    /// Adds `n × stacks` damage to every hit of an attack card.
    AttackUp(u32),
    /// Adds `n × stacks` block to a defense card.
    GuardUp(u32),
}

/// Static description of a token.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenDefinition {
    pub id: TokenId,
    pub name: String,
    pub duration_type: DurationType,
    pub category: TokenCategory,
    #[cfg_attr(feature = "serde", serde(default))]
    pub effect: TokenEffect,
}

impl TokenDefinition {
    pub fn new(
        id: impl Into<TokenId>,
        name: impl Into<String>,
        duration_type: DurationType,
        category: TokenCategory,
        effect: TokenEffect,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duration_type,
            category,
            effect,
        }
    }
}

/// Catalog of token definitions.
///
/// Unknown ids return `None`; every ledger operation treats that as a no-op.
pub trait TokenCatalog: Send + Sync {
    fn definition(&self, id: &TokenId) -> Option<&TokenDefinition>;
}

/// In-memory token catalog.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenRegistry {
    definitions: BTreeMap<TokenId, TokenDefinition>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-in tokens every battle understands.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.insert(TokenDefinition::new(
            "regen",
            "Regeneration",
            DurationType::Turn,
            TokenCategory::Positive,
            TokenEffect::Regen,
        ));
        registry.insert(TokenDefinition::new(
            "burn",
            "Burn",
            DurationType::Turn,
            TokenCategory::Negative,
            TokenEffect::DamageOverTime,
        ));
        registry.insert(TokenDefinition::new(
            "poison",
            "Poison",
            DurationType::Turn,
            TokenCategory::Negative,
            TokenEffect::DamageOverTime,
        ));
        registry.insert(TokenDefinition::new(
            "offense",
            "Offense",
            DurationType::Usage,
            TokenCategory::Positive,
            TokenEffect::AttackUp(2),
        ));
        registry.insert(TokenDefinition::new(
            "guard",
            "Guard",
            DurationType::Usage,
            TokenCategory::Positive,
            TokenEffect::GuardUp(3),
        ));
        registry
    }

    /// Adds or replaces a definition.
    pub fn insert(&mut self, definition: TokenDefinition) {
        self.definitions.insert(definition.id.clone(), definition);
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokenDefinition> {
        self.definitions.values()
    }
}

impl TokenCatalog for TokenRegistry {
    fn definition(&self, id: &TokenId) -> Option<&TokenDefinition> {
        self.definitions.get(id)
    }
}

impl FromIterator<TokenDefinition> for TokenRegistry {
    fn from_iter<I: IntoIterator<Item = TokenDefinition>>(iter: I) -> Self {
        let mut registry = Self::new();
        for definition in iter {
            registry.insert(definition);
        }
        registry
    }
}
