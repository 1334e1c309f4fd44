//! Card definitions and runtime card instances.
//!
//! A [`Card`] is an immutable template. It is only ever built from validated
//! data: [`CardSpec`] carries the raw, possibly incomplete fields read from
//! content files, and `Card::try_from(spec)` rejects anything the combo,
//! ether or combat math cannot work with.
//!
//! Runtime copies live in [`CardInstance`], which adds an instance id,
//! targeting metadata and the ghost marker used for multi-unit opponents.

pub mod instance;
pub mod traits;

use std::fmt;

pub use instance::{CardInstance, InstanceId, Targeting};
pub use traits::{CardTrait, TraitFlags};

use crate::error::{BattleError, ErrorSeverity};
use crate::token::TokenId;

/// Identifier of a card definition.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CardId(String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CardId({})", self.0)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Broad card type.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CardKind {
    Attack,
    Defense,
    General,
}

impl CardKind {
    /// Flush grouping: attack cards on one side, defense and general on the other.
    pub const fn is_offensive(self) -> bool {
        matches!(self, Self::Attack)
    }
}

/// Card rarity, which drives ether value.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Rarity {
    #[default]
    Common,
    Rare,
    Special,
    Legendary,
}

/// Who receives the tokens granted by a card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum GrantTarget {
    /// The actor playing the card.
    #[default]
    Owner,
    /// The other combatant.
    Opponent,
}

/// Tokens a card grants when it resolves.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TokenGrant {
    pub token: TokenId,
    pub stacks: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub target: GrantTarget,
}

impl TokenGrant {
    pub fn new(token: impl Into<TokenId>, stacks: u32, target: GrantTarget) -> Self {
        Self {
            token: token.into(),
            stacks,
            target,
        }
    }
}

/// Immutable card template.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "CardSpec", into = "CardSpec"))]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub kind: CardKind,
    /// Resource cost; also the key the combo detector groups by.
    pub action_cost: u32,
    /// Base timeline cost.
    pub speed_cost: u32,
    pub damage: Option<u32>,
    pub block: Option<u32>,
    /// Number of times the damage is dealt. Always at least 1.
    pub hits: u32,
    /// Retaliation value granted to the owner when the card resolves.
    pub counter: Option<u32>,
    pub rarity: Rarity,
    pub traits: TraitFlags,
    pub grants: Vec<TokenGrant>,
}

impl Card {
    fn base(id: &str, kind: CardKind, action_cost: u32, speed_cost: u32) -> Self {
        Self {
            id: CardId::new(id),
            name: id.to_string(),
            kind,
            action_cost,
            speed_cost,
            damage: None,
            block: None,
            hits: 1,
            counter: None,
            rarity: Rarity::Common,
            traits: TraitFlags::empty(),
            grants: Vec::new(),
        }
    }

    /// Creates an attack card.
    pub fn attack(id: &str, action_cost: u32, speed_cost: u32, damage: u32) -> Self {
        Self {
            damage: Some(damage),
            ..Self::base(id, CardKind::Attack, action_cost, speed_cost)
        }
    }

    /// Creates a defense card.
    pub fn defense(id: &str, action_cost: u32, speed_cost: u32, block: u32) -> Self {
        Self {
            block: Some(block),
            ..Self::base(id, CardKind::Defense, action_cost, speed_cost)
        }
    }

    /// Creates a general (utility) card.
    pub fn general(id: &str, action_cost: u32, speed_cost: u32) -> Self {
        Self::base(id, CardKind::General, action_cost, speed_cost)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_traits(mut self, traits: TraitFlags) -> Self {
        self.traits = traits;
        self
    }

    pub fn with_hits(mut self, hits: u32) -> Self {
        self.hits = hits.max(1);
        self
    }

    pub fn with_counter(mut self, counter: u32) -> Self {
        self.counter = Some(counter);
        self
    }

    pub fn with_grant(mut self, grant: TokenGrant) -> Self {
        self.grants.push(grant);
        self
    }

    pub const fn has_trait(&self, card_trait: CardTrait) -> bool {
        self.traits.has(card_trait)
    }

    /// Checks the fields the engine relies on for this card's type.
    pub fn validate(&self) -> Result<(), CardError> {
        if self.id.as_str().is_empty() {
            return Err(CardError::EmptyId);
        }
        if self.hits == 0 {
            return Err(CardError::ZeroHits(self.id.clone()));
        }
        match self.kind {
            CardKind::Attack if self.damage.is_none() => Err(CardError::MissingField {
                card: self.id.clone(),
                field: "damage",
            }),
            CardKind::Defense if self.block.is_none() => Err(CardError::MissingField {
                card: self.id.clone(),
                field: "block",
            }),
            _ => Ok(()),
        }
    }
}

/// Raw card data as written in content files.
///
/// Numeric fields are optional here so that a missing value is reported as a
/// [`CardError`] instead of silently defaulting to zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardSpec {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: Option<String>,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub kind: Option<CardKind>,
    pub action_cost: Option<u32>,
    pub speed_cost: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub block: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hits: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub counter: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rarity: Rarity,
    #[cfg_attr(feature = "serde", serde(default))]
    pub traits: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub grants: Vec<TokenGrant>,
}

impl TryFrom<CardSpec> for Card {
    type Error = CardError;

    fn try_from(spec: CardSpec) -> Result<Self, Self::Error> {
        if spec.id.is_empty() {
            return Err(CardError::EmptyId);
        }
        let id = CardId::new(spec.id);
        let missing = |field: &'static str| CardError::MissingField {
            card: id.clone(),
            field,
        };

        let card = Card {
            name: spec.name.unwrap_or_else(|| id.as_str().to_string()),
            kind: spec.kind.ok_or_else(|| missing("type"))?,
            action_cost: spec.action_cost.ok_or_else(|| missing("action_cost"))?,
            speed_cost: spec.speed_cost.ok_or_else(|| missing("speed_cost"))?,
            damage: spec.damage,
            block: spec.block,
            hits: spec.hits.unwrap_or(1),
            counter: spec.counter,
            rarity: spec.rarity,
            traits: TraitFlags::from_names(&spec.traits),
            grants: spec.grants,
            id,
        };
        card.validate()?;
        Ok(card)
    }
}

impl From<Card> for CardSpec {
    fn from(card: Card) -> Self {
        Self {
            id: card.id.0,
            name: Some(card.name),
            kind: Some(card.kind),
            action_cost: Some(card.action_cost),
            speed_cost: Some(card.speed_cost),
            damage: card.damage,
            block: card.block,
            hits: Some(card.hits),
            counter: card.counter,
            rarity: card.rarity,
            traits: card.traits.names(),
            grants: card.grants,
        }
    }
}

/// Errors raised by malformed card data.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CardError {
    #[error("card id is empty")]
    EmptyId,

    #[error("card {card} is missing required field `{field}`")]
    MissingField { card: CardId, field: &'static str },

    #[error("card {0} has zero hits")]
    ZeroHits(CardId),
}

impl BattleError for CardError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyId => "CARD_EMPTY_ID",
            Self::MissingField { .. } => "CARD_MISSING_FIELD",
            Self::ZeroHits(_) => "CARD_ZERO_HITS",
        }
    }
}
