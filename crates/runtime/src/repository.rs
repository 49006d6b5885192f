//! Save repositories for persisted quest state.
//!
//! The on-disk encoding is JSON; quest-core only mandates that
//! [`QuestSaveData`] round-trips through serde.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use quest_core::QuestSaveData;

use crate::error::{Result, RuntimeError};

/// Repository contract for saving and loading quest state by slot name.
pub trait SaveRepository: Send + Sync {
    fn save(&self, slot: &str, data: &QuestSaveData) -> Result<()>;

    fn load(&self, slot: &str) -> Result<Option<QuestSaveData>>;

    fn exists(&self, slot: &str) -> bool;

    fn delete(&self, slot: &str) -> Result<()>;
}

/// In-memory repository for tests and tooling.
#[derive(Debug, Default)]
pub struct MemorySaveRepository {
    slots: Mutex<HashMap<String, QuestSaveData>>,
}

impl MemorySaveRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveRepository for MemorySaveRepository {
    fn save(&self, slot: &str, data: &QuestSaveData) -> Result<()> {
        self.slots
            .lock()
            .expect("save slot lock poisoned")
            .insert(slot.to_owned(), data.clone());
        Ok(())
    }

    fn load(&self, slot: &str) -> Result<Option<QuestSaveData>> {
        Ok(self
            .slots
            .lock()
            .expect("save slot lock poisoned")
            .get(slot)
            .cloned())
    }

    fn exists(&self, slot: &str) -> bool {
        self.slots
            .lock()
            .expect("save slot lock poisoned")
            .contains_key(slot)
    }

    fn delete(&self, slot: &str) -> Result<()> {
        self.slots
            .lock()
            .expect("save slot lock poisoned")
            .remove(slot);
        Ok(())
    }
}

/// File-backed repository storing one JSON document per slot.
///
/// Writes go to a temporary sibling first and are renamed into place, so a
/// crash mid-write never corrupts an existing save.
#[derive(Debug, Clone)]
pub struct FileSaveRepository {
    dir: PathBuf,
}

impl FileSaveRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }

    fn io_err(context: &str, path: &Path, error: impl std::fmt::Display) -> RuntimeError {
        RuntimeError::Repository(format!("{context} {}: {error}", path.display()))
    }
}

impl SaveRepository for FileSaveRepository {
    fn save(&self, slot: &str, data: &QuestSaveData) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| Self::io_err("create save dir", &self.dir, e))?;

        let path = self.slot_path(slot);
        let tmp = self.dir.join(format!("{slot}.json.tmp"));

        let json = serde_json::to_string_pretty(data)
            .map_err(|e| Self::io_err("encode save", &path, e))?;
        std::fs::write(&tmp, json).map_err(|e| Self::io_err("write save", &tmp, e))?;
        std::fs::rename(&tmp, &path).map_err(|e| Self::io_err("commit save", &path, e))?;
        Ok(())
    }

    fn load(&self, slot: &str) -> Result<Option<QuestSaveData>> {
        let path = self.slot_path(slot);
        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(Self::io_err("read save", &path, error)),
        };

        let data =
            serde_json::from_str(&json).map_err(|e| Self::io_err("decode save", &path, e))?;
        Ok(Some(data))
    }

    fn exists(&self, slot: &str) -> bool {
        self.slot_path(slot).exists()
    }

    fn delete(&self, slot: &str) -> Result<()> {
        let path = self.slot_path(slot);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(Self::io_err("delete save", &path, error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quest_core::QuestId;

    fn sample() -> QuestSaveData {
        QuestSaveData {
            active: Vec::new(),
            handed_in: vec![QuestId::from("q.done")],
            granted_rewards: vec!["r.keycard".into()],
        }
    }

    #[test]
    fn file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSaveRepository::new(dir.path());

        assert!(!repo.exists("slot1"));
        assert_eq!(repo.load("slot1").unwrap(), None);

        repo.save("slot1", &sample()).unwrap();
        assert!(repo.exists("slot1"));
        assert_eq!(repo.load("slot1").unwrap(), Some(sample()));

        repo.delete("slot1").unwrap();
        assert!(!repo.exists("slot1"));
        // Deleting a missing slot is not an error.
        repo.delete("slot1").unwrap();
    }

    #[test]
    fn corrupt_file_surfaces_repository_error() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSaveRepository::new(dir.path());
        std::fs::write(dir.path().join("bad.json"), "{not json").unwrap();

        assert!(matches!(
            repo.load("bad"),
            Err(RuntimeError::Repository(_))
        ));
    }

    #[test]
    fn memory_round_trip() {
        let repo = MemorySaveRepository::new();
        repo.save("slot", &sample()).unwrap();
        assert_eq!(repo.load("slot").unwrap(), Some(sample()));
        repo.delete("slot").unwrap();
        assert!(!repo.exists("slot"));
    }
}
