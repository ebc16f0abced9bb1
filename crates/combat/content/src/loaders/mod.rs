//! Content loaders for reading combat data from files.
//!
//! Skills and effects are RON lists; the balance config is TOML.

pub mod bundle;
pub mod config;
pub mod effects;
pub mod skills;

pub use bundle::ContentBundle;
pub use config::ConfigLoader;
pub use effects::EffectLoader;
pub use skills::SkillLoader;

use std::path::Path;

use anyhow::Context;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Rejects lists that define the same id twice.
pub(crate) fn ensure_unique<T, K>(items: &[T], key: impl Fn(&T) -> K, what: &str) -> LoadResult<()>
where
    K: Ord + std::fmt::Display + Copy,
{
    let mut seen = std::collections::BTreeSet::new();
    for item in items {
        let id = key(item);
        if !seen.insert(id) {
            anyhow::bail!("duplicate {what} id {id}");
        }
    }
    Ok(())
}
