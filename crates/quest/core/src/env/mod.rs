//! Traits describing the collaborators the quest engine consumes.
//!
//! Oracles expose inventory counts, the item catalog, and world terminal
//! state. The [`QuestEnv`] aggregate bundles them so the engine can reach
//! everything it needs without hard coupling to concrete implementations.
mod error;

pub use error::OracleError;

use std::collections::BTreeMap;

use crate::quest::QuestDefinition;
use crate::types::{ItemId, QuestId, TerminalId, TerminalStatus};

/// Combined inventory + hotbar snapshot, plus best-effort removal.
pub trait InventoryOracle: Send + Sync {
    /// Current item counts across every container the player owns.
    fn item_counts(&self) -> BTreeMap<ItemId, u32>;

    /// Removes up to `amount` of `item`.
    ///
    /// Removal is best-effort and reports nothing; callers pre-verify
    /// sufficiency against [`item_counts`](Self::item_counts).
    fn remove_items(&self, item: ItemId, amount: u32);
}

/// Item catalog lookups used during reward validation.
pub trait ItemOracle: Send + Sync {
    fn exists(&self, item: ItemId) -> bool;
}

/// Enumerable terminal state used for retroactive scans.
pub trait WorldOracle: Send + Sync {
    /// Every terminal-like object currently in the world.
    fn terminals(&self) -> Vec<TerminalStatus>;

    fn is_terminal_completed(&self, id: &TerminalId) -> bool {
        self.terminals()
            .iter()
            .any(|terminal| terminal.completed && &terminal.id == id)
    }
}

/// Quest catalog lookups used when restoring persisted progress.
pub trait QuestCatalogOracle: Send + Sync {
    fn definition(&self, id: &QuestId) -> Option<QuestDefinition>;
}

/// Aggregates the read/consume oracles required by the engine's
/// synchronization passes.
///
/// Slots are optional so offline tools can run passes that only need a
/// subset; accessing a missing slot yields an [`OracleError`] and the engine
/// degrades to a no-op for that pass.
#[derive(Clone, Copy)]
pub struct QuestEnv<'a> {
    inventory: Option<&'a dyn InventoryOracle>,
    items: Option<&'a dyn ItemOracle>,
    world: Option<&'a dyn WorldOracle>,
}

impl<'a> QuestEnv<'a> {
    pub fn new(
        inventory: Option<&'a dyn InventoryOracle>,
        items: Option<&'a dyn ItemOracle>,
        world: Option<&'a dyn WorldOracle>,
    ) -> Self {
        Self {
            inventory,
            items,
            world,
        }
    }

    pub fn with_all(
        inventory: &'a dyn InventoryOracle,
        items: &'a dyn ItemOracle,
        world: &'a dyn WorldOracle,
    ) -> Self {
        Self::new(Some(inventory), Some(items), Some(world))
    }

    pub fn empty() -> Self {
        Self {
            inventory: None,
            items: None,
            world: None,
        }
    }

    /// Returns the inventory oracle, or an error if not available.
    pub fn inventory(&self) -> Result<&'a dyn InventoryOracle, OracleError> {
        self.inventory.ok_or(OracleError::InventoryNotAvailable)
    }

    /// Returns the item oracle, or an error if not available.
    pub fn items(&self) -> Result<&'a dyn ItemOracle, OracleError> {
        self.items.ok_or(OracleError::ItemsNotAvailable)
    }

    /// Returns the world oracle, or an error if not available.
    pub fn world(&self) -> Result<&'a dyn WorldOracle, OracleError> {
        self.world.ok_or(OracleError::WorldNotAvailable)
    }
}
