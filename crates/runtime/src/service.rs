//! Synchronous quest service wiring the engine to its collaborators.
//!
//! [`QuestService`] owns the engine, the reward tracker, the content
//! catalogs, and the oracle providers. Gameplay code calls it directly from
//! the main simulation thread; there is no internal queueing or locking
//! beyond what the shared providers need.

use std::sync::Arc;

use quest_core::{
    QuestDefinition, QuestEngine, QuestEnv, QuestId, QuestProgress, QuestStage, RewardDefinition,
    RewardTracker, TerminalId,
};
use quest_content::{ItemIndex, QuestCatalog};
use tokio::sync::broadcast;

use crate::error::Result;
use crate::events::{EventBus, QuestEvent};
use crate::providers::{SharedInventory, TerminalRegistry};
use crate::repository::SaveRepository;

/// Runtime tunables.
#[derive(Clone, Copy, Debug)]
pub struct RuntimeConfig {
    /// Event bus channel capacity.
    pub event_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            event_capacity: 100,
        }
    }
}

fn completed_ids(engine: &QuestEngine) -> Vec<QuestId> {
    engine
        .active_quests()
        .filter(|progress| progress.is_completed())
        .map(|progress| progress.quest_id.clone())
        .collect()
}

pub struct QuestService {
    engine: QuestEngine,
    rewards: RewardTracker,
    quests: QuestCatalog,
    items: ItemIndex,
    inventory: Arc<SharedInventory>,
    terminals: Arc<TerminalRegistry>,
    events: EventBus,
    /// Set by [`inventory_ready`](Self::inventory_ready). Until then,
    /// inventory-change notifications are deferred so the first sync never
    /// races a half-initialized inventory.
    inventory_ready: bool,
}

impl QuestService {
    pub fn new(quests: QuestCatalog, items: ItemIndex) -> Self {
        Self::with_config(quests, items, RuntimeConfig::default())
    }

    pub fn with_config(quests: QuestCatalog, items: ItemIndex, config: RuntimeConfig) -> Self {
        for (quest, issue) in quests.validate() {
            tracing::warn!(quest = %quest, %issue, "quest catalog authoring issue");
        }

        Self {
            engine: QuestEngine::new(),
            rewards: RewardTracker::new(),
            quests,
            items,
            inventory: Arc::new(SharedInventory::new()),
            terminals: Arc::new(TerminalRegistry::new()),
            events: EventBus::with_capacity(config.event_capacity),
            inventory_ready: false,
        }
    }

    // ------------------------------------------------------------------
    // Collaborator access
    // ------------------------------------------------------------------

    pub fn inventory(&self) -> Arc<SharedInventory> {
        Arc::clone(&self.inventory)
    }

    pub fn terminals(&self) -> Arc<TerminalRegistry> {
        Arc::clone(&self.terminals)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<QuestEvent> {
        self.events.subscribe()
    }

    /// Read access to the engine for quest-log display.
    pub fn engine(&self) -> &QuestEngine {
        &self.engine
    }

    pub fn quest_definition(&self, id: &QuestId) -> Option<&QuestDefinition> {
        self.quests.get(id)
    }

    pub fn active_quests(&self) -> Vec<QuestProgress> {
        self.engine.active_quests().cloned().collect()
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn is_quest_active(&self, id: &QuestId) -> bool {
        self.engine.is_quest_active(id)
    }

    pub fn is_quest_completed(&self, id: &QuestId) -> bool {
        self.engine.is_quest_completed(id)
    }

    pub fn is_quest_handed_in(&self, id: &QuestId) -> bool {
        self.engine.is_quest_handed_in(id)
    }

    pub fn quest_stage(&self, id: &QuestId) -> QuestStage {
        self.engine.stage(id)
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Accepts a quest by catalog id. Unknown ids and re-acceptance are
    /// logged no-ops.
    pub fn accept_quest(&mut self, id: &QuestId) -> bool {
        let Some(definition) = self.quests.get(id).cloned() else {
            tracing::warn!(quest = %id, "accept: quest id not in catalog");
            return false;
        };

        let before = completed_ids(&self.engine);
        let env = QuestEnv::with_all(
            self.inventory.as_ref(),
            &self.items,
            self.terminals.as_ref(),
        );
        let accepted = self.engine.accept_quest(&definition, env);

        if accepted {
            tracing::info!(quest = %id, "quest accepted");
            self.events
                .publish(QuestEvent::QuestAccepted { quest: id.clone() });
            self.events.publish(QuestEvent::ObjectivesUpdated);
            self.publish_new_completions(&before);
        } else {
            tracing::debug!(quest = %id, "accept: quest already active");
        }
        accepted
    }

    /// Signals that the inventory subsystem finished initializing.
    ///
    /// Runs the first full synchronization pass. Until this fires,
    /// [`inventory_changed`](Self::inventory_changed) is deferred.
    pub fn inventory_ready(&mut self) {
        self.inventory_ready = true;
        tracing::debug!("inventory ready, running initial quest sync");
        self.resync();
    }

    /// Inventory contents changed; resynchronize collection objectives.
    pub fn inventory_changed(&mut self) {
        if !self.inventory_ready {
            tracing::trace!("inventory change deferred until inventory is ready");
            return;
        }
        self.resync();
    }

    /// A terminal minigame was solved. Marks the registry (feeding future
    /// retroactive scans) and advances matching objectives.
    pub fn complete_terminal(&mut self, terminal: &TerminalId) {
        self.terminals.mark_completed(terminal.clone());
        self.events.publish(QuestEvent::TerminalCompleted {
            terminal: terminal.clone(),
        });

        let before = completed_ids(&self.engine);
        if self.engine.notify_terminal_completed(terminal) {
            tracing::debug!(%terminal, "terminal completion advanced objectives");
            self.events.publish(QuestEvent::ObjectivesUpdated);
            self.publish_new_completions(&before);
        }
    }

    /// The dialogue layer opened a conversation with an NPC.
    pub fn npc_interacted(&mut self, npc: &str) {
        let before = completed_ids(&self.engine);
        if self.engine.notify_npc_interacted(npc) {
            tracing::debug!(npc, "npc interaction advanced objectives");
            self.events.publish(QuestEvent::ObjectivesUpdated);
            self.publish_new_completions(&before);
        }
    }

    /// Hands in a completed quest and grants its rewards.
    ///
    /// Returns false when the quest is not eligible (unknown, not active,
    /// objectives unsatisfied, or items missing); callers treat that as
    /// "try again later".
    pub fn hand_in_quest(&mut self, id: &QuestId) -> bool {
        let Some(definition) = self.quests.get(id).cloned() else {
            tracing::warn!(quest = %id, "hand-in: quest id not in catalog");
            return false;
        };

        let env = QuestEnv::with_all(
            self.inventory.as_ref(),
            &self.items,
            self.terminals.as_ref(),
        );
        match self.engine.hand_in_quest(id, env) {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(quest = %id, "hand-in refused");
                return false;
            }
            Err(error) => {
                tracing::warn!(quest = %id, %error, "hand-in failed");
                return false;
            }
        }

        tracing::info!(quest = %id, "quest handed in");
        self.events
            .publish(QuestEvent::QuestHandedIn { quest: id.clone() });

        let env = QuestEnv::with_all(
            self.inventory.as_ref(),
            &self.items,
            self.terminals.as_ref(),
        );
        let (granted, failures) = self.rewards.grant_quest_rewards(&definition, env);
        for payout in granted {
            self.inventory.add(payout.item, payout.quantity);
            tracing::info!(
                reward = %payout.reward_id,
                item = %payout.item,
                quantity = payout.quantity,
                "reward granted"
            );
            self.events.publish(QuestEvent::RewardGranted {
                reward_id: payout.reward_id,
                item: payout.item,
                quantity: payout.quantity,
            });
        }
        for failure in failures {
            tracing::warn!(%failure, "reward grant failed");
            self.events.publish(QuestEvent::RewardFailed {
                reason: failure.to_string(),
            });
        }

        // Hand-in consumed items and rewards added more; bring the
        // remaining quests back in sync.
        self.resync();
        true
    }

    /// Grants a single dialogue reward by definition.
    pub fn give_reward(&mut self, reward: &RewardDefinition) -> bool {
        let env = QuestEnv::with_all(
            self.inventory.as_ref(),
            &self.items,
            self.terminals.as_ref(),
        );
        match self.rewards.try_give(reward, env) {
            Ok(payout) => {
                self.inventory.add(payout.item, payout.quantity);
                tracing::info!(
                    reward = %payout.reward_id,
                    item = %payout.item,
                    quantity = payout.quantity,
                    "dialogue reward granted"
                );
                self.events.publish(QuestEvent::RewardGranted {
                    reward_id: payout.reward_id,
                    item: payout.item,
                    quantity: payout.quantity,
                });
                self.resync();
                true
            }
            Err(error) => {
                tracing::warn!(reward = %reward.id, %error, "dialogue reward refused");
                self.events.publish(QuestEvent::RewardFailed {
                    reason: error.to_string(),
                });
                false
            }
        }
    }

    /// Drops corrupted progress entries. Returns how many were removed.
    pub fn cleanup(&mut self) -> usize {
        let removed = self.engine.cleanup_corrupted();
        if removed > 0 {
            tracing::warn!(removed, "removed corrupted quest entries");
            self.events.publish(QuestEvent::ObjectivesUpdated);
        }
        removed
    }

    /// Resets all quest and reward state for a new game.
    pub fn new_game(&mut self) {
        self.engine = QuestEngine::new();
        self.rewards.clear();
        tracing::info!("quest state reset for new game");
        self.events.publish(QuestEvent::ObjectivesUpdated);
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    pub fn save_to(&self, repository: &dyn SaveRepository, slot: &str) -> Result<()> {
        let data = self.engine.snapshot(&self.rewards);
        repository.save(slot, &data)?;
        tracing::info!(slot, quests = data.active.len(), "quest state saved");
        Ok(())
    }

    /// Loads a slot if present. Records whose definitions no longer resolve
    /// are dropped and logged.
    pub fn load_from(&mut self, repository: &dyn SaveRepository, slot: &str) -> Result<bool> {
        let Some(data) = repository.load(slot)? else {
            return Ok(false);
        };

        let report = self.engine.restore(data, &self.quests, &mut self.rewards);
        if report.dropped > 0 || report.cleaned > 0 {
            tracing::warn!(
                dropped = report.dropped,
                cleaned = report.cleaned,
                "save referenced unresolvable or corrupted quests"
            );
        }
        tracing::info!(slot, restored = report.restored, "quest state loaded");
        self.events.publish(QuestEvent::SaveRestored {
            restored: report.restored,
            dropped: report.dropped,
        });

        // Restored collect counters are reconciled against the live
        // inventory; if the inventory is still initializing the pass runs
        // when it signals ready.
        if self.inventory_ready {
            self.resync();
        }
        Ok(true)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Runs both synchronization passes and publishes change notifications.
    fn resync(&mut self) {
        let before = completed_ids(&self.engine);
        let env = QuestEnv::with_all(
            self.inventory.as_ref(),
            &self.items,
            self.terminals.as_ref(),
        );

        let mut changed = false;
        match self.engine.sync_inventory_objectives(env) {
            Ok(moved) => changed |= moved,
            Err(error) => tracing::warn!(%error, "inventory sync skipped"),
        }
        match self.engine.retroactive_terminal_scan(env) {
            Ok(moved) => changed |= moved,
            Err(error) => tracing::warn!(%error, "terminal scan skipped"),
        }

        if changed {
            self.events.publish(QuestEvent::ObjectivesUpdated);
            self.publish_new_completions(&before);
        }
    }

    fn publish_new_completions(&mut self, before: &[QuestId]) {
        for id in completed_ids(&self.engine) {
            if !before.contains(&id) {
                tracing::info!(quest = %id, "quest objectives completed");
                self.events
                    .publish(QuestEvent::QuestCompleted { quest: id });
            }
        }
    }
}
