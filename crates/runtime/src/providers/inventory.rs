use std::collections::BTreeMap;
use std::sync::Mutex;

use quest_core::{InventoryOracle, ItemId};

/// In-memory inventory provider.
///
/// Holds the combined inventory + hotbar counts the engine synchronizes
/// against. The real game backs this with its inventory UI; tests and tools
/// drive it directly. Interior mutability because the engine consumes it
/// through a shared [`InventoryOracle`] reference.
#[derive(Debug, Default)]
pub struct SharedInventory {
    counts: Mutex<BTreeMap<ItemId, u32>>,
}

impl SharedInventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, item: ItemId, amount: u32) {
        if amount == 0 {
            return;
        }
        let mut counts = self.counts.lock().expect("inventory lock poisoned");
        *counts.entry(item).or_insert(0) += amount;
    }

    pub fn count(&self, item: ItemId) -> u32 {
        self.counts
            .lock()
            .expect("inventory lock poisoned")
            .get(&item)
            .copied()
            .unwrap_or(0)
    }

    /// Replaces the full contents, e.g. when loading a save.
    pub fn replace(&self, counts: BTreeMap<ItemId, u32>) {
        *self.counts.lock().expect("inventory lock poisoned") = counts;
    }
}

impl InventoryOracle for SharedInventory {
    fn item_counts(&self) -> BTreeMap<ItemId, u32> {
        self.counts.lock().expect("inventory lock poisoned").clone()
    }

    fn remove_items(&self, item: ItemId, amount: u32) {
        let mut counts = self.counts.lock().expect("inventory lock poisoned");
        if let Some(entry) = counts.get_mut(&item) {
            *entry = entry.saturating_sub(amount);
            if *entry == 0 {
                counts.remove(&item);
            }
        }
    }
}
