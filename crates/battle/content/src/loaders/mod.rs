//! Content loaders for reading battle data from files.
//!
//! Each loader parses one file format into `battle-core` types. `load(path)`
//! reads from disk; `builtin()` parses the copy embedded at compile time.

pub mod cards;
pub mod config;
pub mod enemies;
pub mod factory;
pub mod tokens;

pub use cards::{CardLoader, CardRegistry, CardSet};
pub use config::ConfigLoader;
pub use enemies::{EnemyLoader, EnemyRegistry, EnemyTemplate, UnitSpec};
pub use factory::{ContentBundle, ContentFactory};
pub use tokens::TokenLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
