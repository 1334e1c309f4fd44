//! Read-only collaborators passed into engine calls.
//!
//! [`BattleEnv`] bundles the token catalog, the tunable configuration and the
//! random oracle so that resolution and planning code reads everything it
//! needs from one place without owning any of it.

use crate::config::BattleConfig;
use crate::rng::{PcgRng, RngOracle};
use crate::token::TokenCatalog;

#[derive(Clone, Copy)]
pub struct BattleEnv<'a> {
    pub tokens: &'a dyn TokenCatalog,
    pub config: &'a BattleConfig,
    pub rng: &'a dyn RngOracle,
}

static DEFAULT_RNG: PcgRng = PcgRng;

impl<'a> BattleEnv<'a> {
    /// Environment using the built-in PCG oracle.
    pub fn new(tokens: &'a dyn TokenCatalog, config: &'a BattleConfig) -> Self {
        Self {
            tokens,
            config,
            rng: &DEFAULT_RNG,
        }
    }

    pub fn with_rng(mut self, rng: &'a dyn RngOracle) -> Self {
        self.rng = rng;
        self
    }
}

impl std::fmt::Debug for BattleEnv<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleEnv")
            .field("config", self.config)
            .finish_non_exhaustive()
    }
}
