//! Token catalog loader.

use std::path::Path;

use battle_core::{TokenDefinition, TokenRegistry};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

const TOKENS: &str = include_str!("../../data/tokens.ron");

/// Token catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenCatalogFile {
    pub tokens: Vec<TokenDefinition>,
}

/// Loader for token definitions from RON files.
pub struct TokenLoader;

impl TokenLoader {
    /// Load token definitions from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<TokenDefinition>> {
        let content = read_file(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse the embedded `tokens.ron`.
    pub fn builtin() -> LoadResult<Vec<TokenDefinition>> {
        Self::parse(TOKENS, "tokens.ron")
    }

    /// The engine's built-in tokens extended with `definitions`.
    ///
    /// A loaded definition replaces a built-in one with the same id.
    pub fn registry(definitions: Vec<TokenDefinition>) -> TokenRegistry {
        let mut registry = TokenRegistry::builtin();
        for definition in definitions {
            registry.insert(definition);
        }
        registry
    }

    fn parse(content: &str, origin: &str) -> LoadResult<Vec<TokenDefinition>> {
        let catalog: TokenCatalogFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse token catalog RON {}: {}", origin, e))?;
        Ok(catalog.tokens)
    }
}
