//! Battle configuration loader.

use std::path::Path;

use battle_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

const CONFIG: &str = include_str!("../../data/config.toml");

/// Loader for battle configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Keys missing from the file keep their [`BattleConfig::default`] values.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parse the embedded `config.toml`.
    pub fn builtin() -> LoadResult<BattleConfig> {
        Self::parse(CONFIG, "config.toml")
    }

    fn parse(content: &str, origin: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML {}: {}", origin, e))?;

        if !(0.0..=1.0).contains(&config.deflation_rate) {
            anyhow::bail!(
                "deflation_rate in {} must be within 0..=1, got {}",
                origin,
                config.deflation_rate
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_config_matches_defaults() {
        assert_eq!(ConfigLoader::builtin().unwrap(), BattleConfig::default());
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("deflation_rate = 0.5\n[planner]\nmax_cards = 4\n", "inline")
            .unwrap();
        assert_eq!(config.deflation_rate, 0.5);
        assert_eq!(config.planner.max_cards, 4);
        assert_eq!(config.planner.energy_budget, 6);
        assert_eq!(config.rarity_values.rare, 25);
    }

    #[test]
    fn rejects_out_of_range_deflation() {
        let err = ConfigLoader::parse("deflation_rate = 1.5\n", "inline").unwrap_err();
        assert!(err.to_string().contains("deflation_rate"));
    }
}
