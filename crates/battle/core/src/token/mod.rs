//! Stacked status effects (tokens).
//!
//! A [`TokenLedger`] maps token ids to their stack count, duration class and
//! category. Every operation here is pure: it takes a ledger by reference and
//! returns a new ledger plus the transcript lines describing the change.
//!
//! # Invariants
//!
//! - An entry never holds zero stacks; reaching zero deletes it.
//! - Unknown token ids are a no-op with an empty transcript.
//!
//! # Duration classes
//!
//! - `permanent`: removed only explicitly
//! - `usage`: consumed by the cards that use them
//! - `turn`: one stack decays per turn boundary (see [`passives`])

pub mod catalog;
mod ledger;
pub mod passives;

use std::fmt;

pub use catalog::{
    DurationType, TokenCatalog, TokenCategory, TokenDefinition, TokenEffect, TokenRegistry,
};
pub use ledger::{
    GrantedAt, TokenEntry, TokenLedger, TokenOutcome, add_token, get_token_stacks, has_token,
    remove_token, set_token_stacks,
};
pub use passives::{TurnPassiveOutcome, end_of_turn, start_of_turn};

/// Identifier of a token definition.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TokenId(String);

impl TokenId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TokenId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TokenId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Debug for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TokenId({})", self.0)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
