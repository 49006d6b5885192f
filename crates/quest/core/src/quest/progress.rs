use super::{ObjectiveDefinition, QuestDefinition};
use crate::types::QuestId;

/// Live counter for one objective, owned by a [`QuestProgress`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectiveProgress {
    /// Owned copy of the template objective.
    pub objective: ObjectiveDefinition,
    pub current: u32,
}

impl ObjectiveProgress {
    pub fn new(objective: ObjectiveDefinition) -> Self {
        Self {
            objective,
            current: 0,
        }
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.current >= self.objective.required
    }

    /// Raises the counter by one, saturating at the required amount.
    ///
    /// Returns whether the counter actually moved.
    pub fn advance(&mut self) -> bool {
        if self.current < self.objective.required {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Sets the counter straight to the required amount.
    pub fn satisfy(&mut self) -> bool {
        if self.current != self.objective.required {
            self.current = self.objective.required;
            true
        } else {
            false
        }
    }

    /// Full resync against an absolute count, capped at the required amount.
    ///
    /// Idempotent: applying the same total twice leaves the counter as-is.
    pub fn set_counted(&mut self, total: u32) -> bool {
        let next = total.min(self.objective.required);
        if self.current != next {
            self.current = next;
            true
        } else {
            false
        }
    }
}

/// Mutable per-player instance of a quest.
///
/// Created on acceptance with zeroed counters. The objective list is a deep
/// copy; the shared [`QuestDefinition`] template is never touched.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuestProgress {
    pub quest_id: QuestId,
    pub objectives: Vec<ObjectiveProgress>,
}

impl QuestProgress {
    pub fn new(definition: &QuestDefinition) -> Self {
        Self {
            quest_id: definition.id.clone(),
            objectives: definition
                .objectives
                .iter()
                .cloned()
                .map(ObjectiveProgress::new)
                .collect(),
        }
    }

    /// Every objective's counter has reached its required amount.
    pub fn is_completed(&self) -> bool {
        self.objectives.iter().all(ObjectiveProgress::is_complete)
    }

    /// A corrupted entry came out of a bad save: no identity or no
    /// objectives. Such entries are filtered out of the active set rather
    /// than surfaced to callers.
    pub fn is_corrupted(&self) -> bool {
        self.quest_id.is_empty() || self.objectives.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quest::ObjectiveKind;
    use crate::types::ItemId;

    fn sample_quest() -> QuestDefinition {
        QuestDefinition {
            id: QuestId::from("q.sample"),
            name: "Sample".into(),
            description: String::new(),
            objectives: vec![ObjectiveDefinition {
                kind: ObjectiveKind::CollectItem,
                target: String::new(),
                acceptable_items: vec![ItemId(10)],
                required: 3,
                description: "Collect widgets".into(),
            }],
            rewards: Vec::new(),
        }
    }

    #[test]
    fn new_progress_copies_objectives_with_zeroed_counters() {
        let definition = sample_quest();
        let mut progress = QuestProgress::new(&definition);
        assert_eq!(progress.objectives.len(), 1);
        assert_eq!(progress.objectives[0].current, 0);

        // Mutating the copy must leave the template untouched.
        progress.objectives[0].current = 3;
        assert_eq!(definition.objectives[0].required, 3);
        assert!(progress.is_completed());
    }

    #[test]
    fn set_counted_caps_at_required() {
        let definition = sample_quest();
        let mut progress = QuestProgress::new(&definition);
        assert!(progress.objectives[0].set_counted(7));
        assert_eq!(progress.objectives[0].current, 3);
        // Second application with the same total is a no-op.
        assert!(!progress.objectives[0].set_counted(7));
    }

    #[test]
    fn advance_saturates() {
        let definition = sample_quest();
        let mut progress = QuestProgress::new(&definition);
        for _ in 0..5 {
            progress.objectives[0].advance();
        }
        assert_eq!(progress.objectives[0].current, 3);
    }

    #[test]
    fn corrupted_predicate() {
        let empty_id = QuestProgress {
            quest_id: QuestId::default(),
            objectives: vec![],
        };
        assert!(empty_id.is_corrupted());
        assert!(!QuestProgress::new(&sample_quest()).is_corrupted());
    }
}
