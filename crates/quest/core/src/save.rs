//! Persisted quest state records.
//!
//! Records are format-agnostic serde structures; the host decides the
//! on-disk encoding. Definitions are re-resolved by id on restore, and a
//! record whose definition no longer exists is dropped and counted, a
//! tolerated data-loss event rather than a fault.

use crate::engine::QuestEngine;
use crate::env::QuestCatalogOracle;
use crate::quest::{ObjectiveKind, QuestProgress};
use crate::rewards::RewardTracker;
use crate::types::{ItemId, QuestId};

/// Snapshot of one objective counter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectiveRecord {
    pub kind: ObjectiveKind,
    pub target: String,
    /// Acceptable-id snapshot at save time. Restore refreshes the list from
    /// the current definition; the snapshot is kept for diagnostics.
    pub acceptable_items: Vec<ItemId>,
    pub required: u32,
    pub current: u32,
}

/// Snapshot of one active quest.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuestProgressRecord {
    pub quest_id: QuestId,
    pub objectives: Vec<ObjectiveRecord>,
}

impl QuestProgressRecord {
    fn from_progress(progress: &QuestProgress) -> Self {
        Self {
            quest_id: progress.quest_id.clone(),
            objectives: progress
                .objectives
                .iter()
                .map(|slot| ObjectiveRecord {
                    kind: slot.objective.kind,
                    target: slot.objective.target.clone(),
                    acceptable_items: slot.objective.acceptable_items.clone(),
                    required: slot.objective.required,
                    current: slot.current,
                })
                .collect(),
        }
    }
}

/// Complete persisted quest state: active progress, hand-in record, and
/// granted reward ids. Round-trips through serde.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuestSaveData {
    pub active: Vec<QuestProgressRecord>,
    pub handed_in: Vec<QuestId>,
    pub granted_rewards: Vec<String>,
}

/// Outcome of a restore pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RestoreReport {
    /// Progress entries rebuilt from resolvable definitions.
    pub restored: usize,
    /// Records dropped because their definition could not be resolved.
    pub dropped: usize,
    /// Corrupted entries removed by the post-restore cleanup.
    pub cleaned: usize,
}

impl QuestEngine {
    /// Captures the engine's state plus the granted-reward set.
    pub fn snapshot(&self, rewards: &RewardTracker) -> QuestSaveData {
        QuestSaveData {
            active: self
                .active_quests()
                .map(QuestProgressRecord::from_progress)
                .collect(),
            handed_in: self.handed_in.clone(),
            granted_rewards: rewards.granted_ids(),
        }
    }

    /// Replaces the engine's state from persisted records.
    ///
    /// Each record's definition is re-resolved by id from the catalog.
    /// Resolvable records are rebuilt from the *current* definition, so
    /// acceptable-id lists and required amounts always reflect live content,
    /// with the persisted counters laid back on top, capped at the required
    /// amount. Unresolvable records are dropped and counted.
    ///
    /// Callers should re-run the retroactive synchronization passes
    /// afterwards, once their collaborators are ready.
    pub fn restore(
        &mut self,
        data: QuestSaveData,
        catalog: &dyn QuestCatalogOracle,
        rewards: &mut RewardTracker,
    ) -> RestoreReport {
        let mut report = RestoreReport::default();
        let mut active = Vec::with_capacity(data.active.len());

        for record in data.active {
            let Some(definition) = catalog.definition(&record.quest_id) else {
                report.dropped += 1;
                continue;
            };

            let mut progress = QuestProgress::new(&definition);
            for (slot, saved) in progress.objectives.iter_mut().zip(record.objectives.iter()) {
                slot.current = saved.current.min(slot.objective.required);
            }
            active.push(progress);
            report.restored += 1;
        }

        self.active = active;
        self.handed_in = data.handed_in;
        rewards.restore(data.granted_rewards);
        report.cleaned = self.cleanup_corrupted();
        report
    }
}
