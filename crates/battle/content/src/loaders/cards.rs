//! Card catalog loader and registry.

use std::collections::BTreeMap;
use std::path::Path;

use battle_core::{Card, CardId};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

const PLAYER_CARDS: &str = include_str!("../../data/cards/player.ron");
const ENEMY_CARDS: &str = include_str!("../../data/cards/enemy.ron");
const FALLBACK_CARDS: &str = include_str!("../../data/cards/fallback.ron");

/// Card catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardCatalog {
    pub cards: Vec<Card>,
}

/// Which embedded card file to read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardSet {
    Player,
    Enemy,
    /// Shared pool for opponents with an empty or short deck.
    Fallback,
}

impl CardSet {
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Player => "player.ron",
            Self::Enemy => "enemy.ron",
            Self::Fallback => "fallback.ron",
        }
    }

    const fn embedded(self) -> &'static str {
        match self {
            Self::Player => PLAYER_CARDS,
            Self::Enemy => ENEMY_CARDS,
            Self::Fallback => FALLBACK_CARDS,
        }
    }
}

/// Loader for card catalogs from RON files.
///
/// Every card is validated while parsing; one malformed card fails the whole
/// file.
pub struct CardLoader;

impl CardLoader {
    /// Load a card catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<Card>> {
        let content = read_file(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse one of the embedded card catalogs.
    pub fn builtin(set: CardSet) -> LoadResult<Vec<Card>> {
        Self::parse(set.embedded(), set.file_name())
    }

    fn parse(content: &str, origin: &str) -> LoadResult<Vec<Card>> {
        let catalog: CardCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse card catalog RON {}: {}", origin, e))?;
        Ok(catalog.cards)
    }
}

/// Card definitions by id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CardRegistry {
    cards: BTreeMap<CardId, Card>,
}

impl CardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a card. A card with the same id is replaced.
    pub fn insert(&mut self, card: Card) {
        if let Some(previous) = self.cards.insert(card.id.clone(), card) {
            tracing::warn!(id = %previous.id, "duplicate card id, keeping the later definition");
        }
    }

    pub fn get(&self, id: &str) -> Option<&Card> {
        self.cards.get(&CardId::new(id))
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.values()
    }

    /// Resolves a deck list. Unknown ids are skipped with a warning.
    pub fn deck<S: AsRef<str>>(&self, ids: &[S]) -> Vec<Card> {
        ids.iter()
            .filter_map(|id| {
                let id = id.as_ref();
                let card = self.get(id);
                if card.is_none() {
                    tracing::warn!(id, "deck references unknown card");
                }
                card.cloned()
            })
            .collect()
    }
}

impl FromIterator<Card> for CardRegistry {
    fn from_iter<I: IntoIterator<Item = Card>>(iter: I) -> Self {
        let mut registry = Self::new();
        for card in iter {
            registry.insert(card);
        }
        registry
    }
}
