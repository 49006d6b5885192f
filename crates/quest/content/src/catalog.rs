//! Catalog structures backing the content oracles.

use std::collections::BTreeMap;

use quest_core::{
    ItemId, ItemOracle, QuestCatalogOracle, QuestDefinition, QuestId, ValidationIssue,
};
use serde::{Deserialize, Serialize};

/// Quest catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuestCatalog {
    pub quests: Vec<QuestDefinition>,
}

impl QuestCatalog {
    pub fn new(quests: Vec<QuestDefinition>) -> Self {
        Self { quests }
    }

    pub fn get(&self, id: &QuestId) -> Option<&QuestDefinition> {
        self.quests.iter().find(|quest| &quest.id == id)
    }

    pub fn len(&self) -> usize {
        self.quests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quests.is_empty()
    }

    /// Runs every quest's authoring validation, tagging issues with the
    /// quest id.
    pub fn validate(&self) -> Vec<(QuestId, ValidationIssue)> {
        self.quests
            .iter()
            .flat_map(|quest| {
                quest
                    .validate()
                    .into_iter()
                    .map(|issue| (quest.id.clone(), issue))
            })
            .collect()
    }
}

impl QuestCatalogOracle for QuestCatalog {
    fn definition(&self, id: &QuestId) -> Option<QuestDefinition> {
        self.get(id).cloned()
    }
}

/// One item entry. The full item system (stats, stacking, prefabs) lives
/// with the inventory collaborator; the quest layer only needs identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemEntry {
    pub id: ItemId,
    pub name: String,
}

/// Item catalog structure for RON files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemCatalog {
    pub items: Vec<ItemEntry>,
}

/// Id-indexed view over an [`ItemCatalog`], used as the reward-validation
/// oracle.
#[derive(Debug, Clone, Default)]
pub struct ItemIndex {
    by_id: BTreeMap<ItemId, ItemEntry>,
}

impl ItemIndex {
    pub fn new(catalog: ItemCatalog) -> Self {
        Self {
            by_id: catalog
                .items
                .into_iter()
                .map(|entry| (entry.id, entry))
                .collect(),
        }
    }

    pub fn get(&self, id: ItemId) -> Option<&ItemEntry> {
        self.by_id.get(&id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl ItemOracle for ItemIndex {
    fn exists(&self, item: ItemId) -> bool {
        self.by_id.contains_key(&item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_index_lookups() {
        let index = ItemIndex::new(ItemCatalog {
            items: vec![ItemEntry {
                id: ItemId(10),
                name: "Sample Vial".into(),
            }],
        });

        assert!(index.exists(ItemId(10)));
        assert!(!index.exists(ItemId(11)));
        assert_eq!(index.get(ItemId(10)).unwrap().name, "Sample Vial");
    }
}
