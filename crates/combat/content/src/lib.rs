//! Data-driven combat content and loaders.
//!
//! Skill and effect catalogs implement the read-only oracle traits of
//! `combat-core`; loaders read them from RON files, and the balance config
//! from TOML. A default data set is embedded for hosts that ship no files.
//!
//! Content is consumed through oracles and never appears in battler state.

pub mod catalog;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use catalog::{EffectCatalog, SkillCatalog};

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentBundle, EffectLoader, LoadResult, SkillLoader};
