//! Data-driven quest and item content with loaders.
//!
//! This crate houses the static content catalogs and provides loaders for
//! RON data files:
//! - Quest catalog (quest templates, data-driven via RON)
//! - Item catalog (item ids and display names, data-driven via RON)
//!
//! Content is consumed by runtime oracles and never appears in engine state.
//! All loaders deserialize directly into quest-core types with serde.

pub mod catalog;
pub mod loaders;

pub use catalog::{ItemCatalog, ItemEntry, ItemIndex, QuestCatalog};
pub use loaders::{ContentFactory, ItemLoader, LoadResult, QuestLoader};
