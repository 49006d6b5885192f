//! Content loaders for reading quest data from files.
//!
//! Loaders convert RON files into the catalog types in [`crate::catalog`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::catalog::{ItemCatalog, ItemIndex, QuestCatalog};

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Loader for the quest catalog from RON files.
pub struct QuestLoader;

impl QuestLoader {
    /// Load the quest catalog from a RON file.
    ///
    /// Quest ids must be unique across the catalog; duplicates are a load
    /// error since every progress and hand-in record keys off the id.
    pub fn load(path: &Path) -> LoadResult<QuestCatalog> {
        let content = read_file(path)?;
        let catalog: QuestCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse quest catalog RON: {}", e))?;

        let mut seen = BTreeSet::new();
        for quest in &catalog.quests {
            if quest.id.is_empty() {
                anyhow::bail!("quest '{}' has an empty id", quest.name);
            }
            if !seen.insert(quest.id.clone()) {
                anyhow::bail!("duplicate quest id '{}'", quest.id);
            }
        }

        Ok(catalog)
    }
}

/// Loader for the item catalog from RON files.
pub struct ItemLoader;

impl ItemLoader {
    /// Load the item catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<ItemCatalog> {
        let content = read_file(path)?;
        let catalog: ItemCatalog = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))?;
        Ok(catalog)
    }
}

/// Content factory that loads all quest content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── quests.ron
/// └── items.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load the quest catalog from `quests.ron`.
    pub fn load_quests(&self) -> LoadResult<QuestCatalog> {
        let path = self.data_dir.join("quests.ron");
        QuestLoader::load(&path)
    }

    /// Load the item catalog from `items.ron`, indexed by id.
    pub fn load_items(&self) -> LoadResult<ItemIndex> {
        let path = self.data_dir.join("items.ron");
        Ok(ItemIndex::new(ItemLoader::load(&path)?))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quest_core::{ItemId, ObjectiveKind, QuestId, ValidationIssue};
    use std::io::Write;

    const QUESTS_RON: &str = r#"(
    quests: [
        (
            id: "lab.samples",
            name: "Sample Run",
            description: "Bring the lab enough vials to restart sequencing.",
            objectives: [
                (
                    kind: CollectItem,
                    target: "",
                    acceptable_items: [10, 11],
                    required: 5,
                    description: "Collect sample vials",
                ),
                (
                    kind: CompleteTerminal,
                    target: "term.dna",
                    required: 1,
                    description: "Run the sequencing terminal",
                ),
            ],
            rewards: [
                (
                    id: "lab.samples.keycard",
                    kind: Item,
                    item: 20,
                    quantity: 1,
                ),
            ],
        ),
    ],
)"#;

    const ITEMS_RON: &str = r#"(
    items: [
        (id: 10, name: "Sample Vial"),
        (id: 11, name: "Cracked Vial"),
        (id: 20, name: "Keycard"),
    ],
)"#;

    fn write_fixture(dir: &Path, name: &str, contents: &str) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn loads_quests_and_items_from_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path(), "quests.ron", QUESTS_RON);
        write_fixture(dir.path(), "items.ron", ITEMS_RON);

        let factory = ContentFactory::new(dir.path());
        let quests = factory.load_quests().unwrap();
        let items = factory.load_items().unwrap();

        assert_eq!(quests.len(), 1);
        let quest = quests.get(&QuestId::from("lab.samples")).unwrap();
        assert_eq!(quest.objectives.len(), 2);
        assert_eq!(quest.objectives[0].kind, ObjectiveKind::CollectItem);
        assert_eq!(
            quest.objectives[0].acceptable_items,
            vec![ItemId(10), ItemId(11)]
        );
        assert_eq!(quest.rewards[0].item, ItemId(20));
        assert!(!quest.rewards[0].repeatable);

        assert_eq!(items.len(), 3);
        assert!(quests.validate().is_empty());
    }

    #[test]
    fn duplicate_quest_ids_fail_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let doubled = r#"(
    quests: [
        (id: "q.dup", name: "A", description: "", objectives: [], rewards: []),
        (id: "q.dup", name: "B", description: "", objectives: [], rewards: []),
    ],
)"#;
        write_fixture(dir.path(), "quests.ron", doubled);

        let error = ContentFactory::new(dir.path()).load_quests().unwrap_err();
        assert!(error.to_string().contains("duplicate quest id"));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ContentFactory::new(dir.path()).load_quests().is_err());
    }

    #[test]
    fn validation_surfaces_dead_objectives() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(
            dir.path(),
            "quests.ron",
            r#"(
    quests: [
        (
            id: "q.dead",
            name: "Dead",
            description: "",
            objectives: [
                (kind: CollectItem, target: "vial", required: 2, description: ""),
            ],
            rewards: [],
        ),
    ],
)"#,
        );

        let quests = ContentFactory::new(dir.path()).load_quests().unwrap();
        let issues = quests.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].0, QuestId::from("q.dead"));
        assert_eq!(issues[0].1, ValidationIssue::NoAcceptableItems { objective: 0 });
    }
}
