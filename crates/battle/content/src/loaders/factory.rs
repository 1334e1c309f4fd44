//! Content factory for assembling battle content from data files.

use std::path::{Path, PathBuf};

use battle_core::{BattleConfig, BattleEnv, Card, Combatant, PlanRequest, TokenRegistry};

use crate::loaders::{
    CardLoader, CardRegistry, CardSet, ConfigLoader, EnemyLoader, EnemyRegistry, LoadResult,
    TokenLoader,
};

/// Everything a battle needs from content.
#[derive(Clone, Debug)]
pub struct ContentBundle {
    pub player_cards: CardRegistry,
    pub enemy_cards: CardRegistry,
    pub fallback: Vec<Card>,
    pub enemies: EnemyRegistry,
    pub tokens: TokenRegistry,
    pub config: BattleConfig,
}

impl ContentBundle {
    /// Engine environment backed by this bundle's tokens and config.
    pub fn env(&self) -> BattleEnv<'_> {
        BattleEnv::new(&self.tokens, &self.config)
    }

    /// Resolved deck of an opponent. Unknown opponents have no deck.
    pub fn enemy_deck(&self, enemy_id: &str) -> Vec<Card> {
        self.enemies
            .get(enemy_id)
            .map(|template| template.deck(&self.enemy_cards))
            .unwrap_or_default()
    }

    /// Planning request for `enemy_id` against its current combatant state.
    pub fn plan_request<'a>(
        &'a self,
        enemy_id: &'a str,
        deck: &'a [Card],
        enemy: &'a Combatant,
        battle_seed: u64,
        round: u64,
    ) -> PlanRequest<'a> {
        PlanRequest {
            enemy_id,
            deck,
            fallback: &self.fallback,
            enemy,
            battle_seed,
            round,
        }
    }
}

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── enemies.ron
/// ├── tokens.ron
/// └── cards/
///     ├── player.ron
///     ├── enemy.ron
///     └── fallback.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    /// Load one card catalog from `cards/`.
    pub fn load_cards(&self, set: CardSet) -> LoadResult<Vec<Card>> {
        CardLoader::load(&self.data_dir.join("cards").join(set.file_name()))
    }

    /// Load opponent templates from `enemies.ron`.
    pub fn load_enemies(&self) -> LoadResult<EnemyRegistry> {
        Ok(EnemyLoader::load(&self.data_dir.join("enemies.ron"))?
            .into_iter()
            .collect())
    }

    /// Load extra tokens from `tokens.ron` on top of the built-in set.
    pub fn load_tokens(&self) -> LoadResult<TokenRegistry> {
        Ok(TokenLoader::registry(TokenLoader::load(
            &self.data_dir.join("tokens.ron"),
        )?))
    }

    /// Load every file in the data directory.
    pub fn load_bundle(&self) -> LoadResult<ContentBundle> {
        let bundle = ContentBundle {
            player_cards: self.load_cards(CardSet::Player)?.into_iter().collect(),
            enemy_cards: self.load_cards(CardSet::Enemy)?.into_iter().collect(),
            fallback: self.load_cards(CardSet::Fallback)?,
            enemies: self.load_enemies()?,
            tokens: self.load_tokens()?,
            config: self.load_config()?,
        };
        tracing::debug!(dir = %self.data_dir.display(), "content loaded");
        Ok(bundle)
    }

    /// Bundle built from the data embedded in this crate.
    pub fn builtin() -> LoadResult<ContentBundle> {
        Ok(ContentBundle {
            player_cards: CardLoader::builtin(CardSet::Player)?.into_iter().collect(),
            enemy_cards: CardLoader::builtin(CardSet::Enemy)?.into_iter().collect(),
            fallback: CardLoader::builtin(CardSet::Fallback)?,
            enemies: EnemyLoader::builtin()?.into_iter().collect(),
            tokens: TokenLoader::registry(TokenLoader::builtin()?),
            config: ConfigLoader::builtin()?,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn builtin_decks_resolve() {
        let bundle = ContentFactory::builtin().unwrap();
        for id in bundle.enemies.ids() {
            let template = bundle.enemies.get(id).unwrap();
            assert_eq!(bundle.enemy_deck(id).len(), template.deck.len(), "{id}");
        }
        assert!(bundle.enemy_deck("nobody").is_empty());
    }
}
