//! Opponent template loader and registry.

use std::collections::BTreeMap;
use std::path::Path;

use battle_core::{
    BattleConfig, Card, Combatant, ModeWeightTable, ModeWeights, ResolveError, Unit,
};
use serde::{Deserialize, Serialize};

use crate::loaders::{CardRegistry, LoadResult, read_file};

const ENEMIES: &str = include_str!("../../data/enemies.ron");

/// One unit of a grouped opponent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSpec {
    pub name: String,
    pub hp: u32,
}

/// Opponent template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub id: String,
    pub name: String,
    /// Ignored when `units` is non-empty.
    #[serde(default)]
    pub hp: u32,
    #[serde(default)]
    pub units: Vec<UnitSpec>,
    /// Card ids drawn from the opponent card catalog.
    #[serde(default)]
    pub deck: Vec<String>,
    #[serde(default)]
    pub mode_weights: Option<ModeWeightTable>,
}

impl EnemyTemplate {
    /// Builds a fresh combatant. Units get ids in list order.
    pub fn combatant(&self) -> Result<Combatant, ResolveError> {
        if self.units.is_empty() {
            return Ok(Combatant::new(self.hp));
        }
        Combatant::with_units(self.units.iter().zip(0u32..).map(|(spec, id)| {
            Unit::new(id, spec.name.clone(), spec.hp)
        }))
    }

    /// Resolves the deck against a card registry.
    pub fn deck(&self, cards: &CardRegistry) -> Vec<Card> {
        cards.deck(&self.deck)
    }
}

/// Enemy catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyCatalog {
    pub enemies: Vec<EnemyTemplate>,
}

/// Loader for opponent templates from RON files.
pub struct EnemyLoader;

impl EnemyLoader {
    /// Load opponent templates from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<EnemyTemplate>> {
        let content = read_file(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse the embedded `enemies.ron`.
    pub fn builtin() -> LoadResult<Vec<EnemyTemplate>> {
        Self::parse(ENEMIES, "enemies.ron")
    }

    fn parse(content: &str, origin: &str) -> LoadResult<Vec<EnemyTemplate>> {
        let catalog: EnemyCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse enemy catalog RON {}: {}", origin, e))?;

        for template in &catalog.enemies {
            if template.units.len() > BattleConfig::MAX_UNITS {
                anyhow::bail!(
                    "Enemy {} in {} has {} units (max {})",
                    template.id,
                    origin,
                    template.units.len(),
                    BattleConfig::MAX_UNITS
                );
            }
        }
        Ok(catalog.enemies)
    }
}

/// Opponent templates by id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnemyRegistry {
    templates: BTreeMap<String, EnemyTemplate>,
}

impl EnemyRegistry {
    pub fn get(&self, id: &str) -> Option<&EnemyTemplate> {
        self.templates.get(id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }
}

impl FromIterator<EnemyTemplate> for EnemyRegistry {
    fn from_iter<I: IntoIterator<Item = EnemyTemplate>>(iter: I) -> Self {
        Self {
            templates: iter.into_iter().map(|t| (t.id.clone(), t)).collect(),
        }
    }
}

impl ModeWeights for EnemyRegistry {
    fn mode_weights(&self, enemy_id: &str) -> Option<ModeWeightTable> {
        self.templates.get(enemy_id).and_then(|t| t.mode_weights)
    }
}
