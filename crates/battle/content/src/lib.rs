//! Data-driven battle content and loaders.
//!
//! This crate houses static battle content and provides loaders for RON/TOML data files:
//! - Player, opponent and fallback card catalogs (RON)
//! - Opponent templates: hp, units, deck and mode weights (RON)
//! - Extra token definitions (RON)
//! - Battle balance configuration (TOML)
//!
//! Every data file also ships embedded in the crate, so `builtin()` loaders
//! work without a data directory. Content is consumed by callers and the
//! engine through `battle-core` traits and never appears in battle state.

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{
    CardLoader, CardRegistry, CardSet, ConfigLoader, ContentBundle, ContentFactory, EnemyLoader,
    EnemyRegistry, EnemyTemplate, LoadResult, TokenLoader, UnitSpec,
};
