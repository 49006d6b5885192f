//! Quest acceptance, objective synchronization, and hand-in.
//!
//! [`QuestEngine`] is the authoritative owner of active quest progress. All
//! counter mutation flows through its synchronization passes: collaborators
//! feed it inventory snapshots and world completion events, and read back
//! pure queries. Public operations degrade to a no-op on bad input; a broken
//! quest must never block unrelated gameplay.

use crate::env::{OracleError, QuestEnv};
use crate::quest::{ObjectiveDefinition, ObjectiveKind, QuestDefinition, QuestProgress};
use crate::types::{QuestId, TerminalId};

/// Lifecycle of a single quest as seen by callers.
///
/// `NotAccepted → Active → Completed → HandedIn`. `Completed` means every
/// objective counter is satisfied but the quest has not been turned in yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QuestStage {
    NotAccepted,
    Active,
    Completed,
    HandedIn,
}

/// Owns the active quest set and the handed-in record.
///
/// Invariants:
/// - no two active entries share a quest id (acceptance is idempotent);
/// - a handed-in id is recorded before its progress leaves the active set;
/// - corrupted entries never reach callers.
#[derive(Clone, Debug, Default)]
pub struct QuestEngine {
    pub(crate) active: Vec<QuestProgress>,
    pub(crate) handed_in: Vec<QuestId>,
}

impl QuestEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read view of the active set, corrupted entries excluded.
    pub fn active_quests(&self) -> impl Iterator<Item = &QuestProgress> {
        self.active.iter().filter(|quest| !quest.is_corrupted())
    }

    /// Quest ids that have been handed in, in hand-in order.
    pub fn handed_in(&self) -> &[QuestId] {
        &self.handed_in
    }

    fn find(&self, id: &QuestId) -> Option<&QuestProgress> {
        self.active_quests().find(|quest| &quest.quest_id == id)
    }

    /// Accepts a quest, deep-copying its objectives with zeroed counters.
    ///
    /// A no-op when a progress entry with the same id is already active.
    /// On acceptance both retroactive passes run immediately so inventory
    /// gathered and terminals finished *before* acceptance count right away;
    /// pre-existing world state is rewarded, never re-done. A missing oracle
    /// slot simply leaves the affected counters at zero until the next pass.
    pub fn accept_quest(&mut self, definition: &QuestDefinition, env: QuestEnv<'_>) -> bool {
        if definition.id.is_empty() || self.is_quest_active(&definition.id) {
            return false;
        }

        self.active.push(QuestProgress::new(definition));
        let _ = self.sync_inventory_objectives(env);
        let _ = self.retroactive_terminal_scan(env);
        true
    }

    pub fn is_quest_active(&self, id: &QuestId) -> bool {
        self.find(id).is_some()
    }

    /// Whether the quest is active with every objective satisfied.
    ///
    /// Unknown ids and corrupted entries read as not completed.
    pub fn is_quest_completed(&self, id: &QuestId) -> bool {
        self.find(id).is_some_and(QuestProgress::is_completed)
    }

    pub fn is_quest_handed_in(&self, id: &QuestId) -> bool {
        self.handed_in.contains(id)
    }

    /// Collapses the three state collections into a single stage view.
    pub fn stage(&self, id: &QuestId) -> QuestStage {
        if self.is_quest_handed_in(id) {
            QuestStage::HandedIn
        } else {
            match self.find(id) {
                Some(progress) if progress.is_completed() => QuestStage::Completed,
                Some(_) => QuestStage::Active,
                None => QuestStage::NotAccepted,
            }
        }
    }

    /// Removes corrupted progress entries from the active set.
    ///
    /// Runs after restore and is re-invocable manually. Returns how many
    /// entries were dropped.
    pub fn cleanup_corrupted(&mut self) -> usize {
        let before = self.active.len();
        self.active.retain(|quest| !quest.is_corrupted());
        before - self.active.len()
    }

    /// Full resync of every CollectItem objective against the current
    /// inventory snapshot.
    ///
    /// Sets `current = min(sum over acceptable ids, required)`. This is an
    /// absolute assignment, not an increment, so running the pass twice against the
    /// same snapshot is idempotent and never double-counts. Objectives of
    /// other kinds are untouched. Returns whether any counter moved.
    pub fn sync_inventory_objectives(&mut self, env: QuestEnv<'_>) -> Result<bool, OracleError> {
        let counts = env.inventory()?.item_counts();
        let mut changed = false;

        for quest in self.active.iter_mut().filter(|quest| !quest.is_corrupted()) {
            for slot in &mut quest.objectives {
                if slot.objective.kind != ObjectiveKind::CollectItem {
                    continue;
                }
                let acceptable = slot.objective.acceptable_item_ids();
                if acceptable.is_empty() {
                    // Dead objective; flagged at load time by validate().
                    continue;
                }
                let total: u32 = acceptable
                    .iter()
                    .map(|item| counts.get(item).copied().unwrap_or(0))
                    .sum();
                changed |= slot.set_counted(total);
            }
        }

        Ok(changed)
    }

    /// Advances every matching terminal objective by one, capped at its
    /// required amount.
    ///
    /// Incremental by design, not idempotent: terminals notify once per real
    /// completion. Matching is structured: objective kind plus exact target
    /// id. Returns whether any counter moved.
    pub fn notify_terminal_completed(&mut self, terminal: &TerminalId) -> bool {
        if terminal.as_str().is_empty() {
            return false;
        }
        self.bump_matching(|objective| {
            objective.kind.is_terminal() && objective.target == terminal.as_str()
        })
    }

    /// Advances every matching TalkNpc objective by one, capped at its
    /// required amount. Called by the dialogue layer when a conversation
    /// starts.
    pub fn notify_npc_interacted(&mut self, npc: &str) -> bool {
        if npc.is_empty() {
            return false;
        }
        self.bump_matching(|objective| {
            objective.kind == ObjectiveKind::TalkNpc && objective.target == npc
        })
    }

    fn bump_matching(&mut self, matches: impl Fn(&ObjectiveDefinition) -> bool) -> bool {
        let mut changed = false;
        for quest in self.active.iter_mut().filter(|quest| !quest.is_corrupted()) {
            for slot in &mut quest.objectives {
                if matches(&slot.objective) {
                    changed |= slot.advance();
                }
            }
        }
        changed
    }

    /// Marks terminal objectives whose target is already completed in the
    /// world as fully satisfied.
    ///
    /// Sets `current = required` outright rather than incrementing, so the
    /// scan is safe to repeat. Used at accept time and after restore to
    /// catch up on terminals solved before the quest existed.
    pub fn retroactive_terminal_scan(&mut self, env: QuestEnv<'_>) -> Result<bool, OracleError> {
        let terminals = env.world()?.terminals();
        let mut changed = false;

        for quest in self.active.iter_mut().filter(|quest| !quest.is_corrupted()) {
            for slot in &mut quest.objectives {
                if !slot.objective.kind.is_terminal() {
                    continue;
                }
                let completed = terminals
                    .iter()
                    .any(|status| status.completed && status.id.as_str() == slot.objective.target);
                if completed {
                    changed |= slot.satisfy();
                }
            }
        }

        Ok(changed)
    }

    /// Turns in a completed quest: consumes the required items and moves the
    /// id from the active set to the handed-in record.
    ///
    /// The protocol is validate-then-commit, all-or-nothing:
    ///
    /// 1. unknown / inactive id → `Ok(false)`, no side effects;
    /// 2. objectives not all satisfied → `Ok(false)`;
    /// 3. any CollectItem objective short on items → `Ok(false)`, nothing
    ///    removed and the quest stays active ("try again later");
    /// 4. otherwise remove exactly `required` per objective, exhausting
    ///    acceptable ids in list order, record the hand-in, then drop the
    ///    progress entry.
    ///
    /// The id is recorded in the handed-in list *before* the active entry is
    /// removed so a quest can never vanish without its hand-in marker.
    pub fn hand_in_quest(&mut self, id: &QuestId, env: QuestEnv<'_>) -> Result<bool, OracleError> {
        let Some(index) = self
            .active
            .iter()
            .position(|quest| !quest.is_corrupted() && &quest.quest_id == id)
        else {
            return Ok(false);
        };

        if !self.active[index].is_completed() {
            return Ok(false);
        }

        let inventory = env.inventory()?;
        let counts = inventory.item_counts();

        // Objectives that consume items on hand-in, with their id lists in
        // authored order.
        let consumed: Vec<_> = self.active[index]
            .objectives
            .iter()
            .filter(|slot| slot.objective.kind == ObjectiveKind::CollectItem)
            .map(|slot| (slot.objective.acceptable_item_ids(), slot.objective.required))
            .filter(|(ids, _)| !ids.is_empty())
            .collect();

        // Verify every objective before removing anything: a partial
        // removal must never happen.
        for (ids, required) in &consumed {
            let available: u32 = ids
                .iter()
                .map(|item| counts.get(item).copied().unwrap_or(0))
                .sum();
            if available < *required {
                return Ok(false);
            }
        }

        for (ids, required) in &consumed {
            let mut remaining = *required;
            for item in ids {
                if remaining == 0 {
                    break;
                }
                let available = counts.get(item).copied().unwrap_or(0);
                if available == 0 {
                    continue;
                }
                let take = available.min(remaining);
                inventory.remove_items(*item, take);
                remaining -= take;
            }
        }

        self.handed_in.push(id.clone());
        self.active.remove(index);
        Ok(true)
    }
}
