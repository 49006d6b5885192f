//! Change notifications published after engine state moves.
//!
//! The quest-log UI subscribes here instead of polling; every mutation path
//! in [`QuestService`](crate::service::QuestService) publishes after a
//! synchronization pass changed anything.

use quest_core::{ItemId, QuestId, TerminalId};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Events emitted by the quest service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestEvent {
    QuestAccepted {
        quest: QuestId,
    },
    /// At least one objective counter moved. UI should refresh.
    ObjectivesUpdated,
    /// A quest's objectives all became satisfied.
    QuestCompleted {
        quest: QuestId,
    },
    QuestHandedIn {
        quest: QuestId,
    },
    TerminalCompleted {
        terminal: TerminalId,
    },
    RewardGranted {
        reward_id: String,
        item: ItemId,
        quantity: u32,
    },
    RewardFailed {
        reason: String,
    },
    SaveRestored {
        restored: usize,
        dropped: usize,
    },
}

/// Broadcast fan-out for [`QuestEvent`].
///
/// Publishing is best-effort: no subscribers is normal, not an error.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<QuestEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn publish(&self, event: QuestEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("no subscribers for quest event");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<QuestEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
