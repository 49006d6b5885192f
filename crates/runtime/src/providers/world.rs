use std::collections::BTreeMap;
use std::sync::Mutex;

use quest_core::{TerminalId, TerminalStatus, WorldOracle};

/// Registry of terminal-like objects and their completion flags.
///
/// Terminals register when their scene loads; minigames flip the flag on
/// success. The engine's retroactive scan enumerates this registry, so
/// terminals solved before a quest was accepted still count.
#[derive(Debug, Default)]
pub struct TerminalRegistry {
    terminals: Mutex<BTreeMap<TerminalId, bool>>,
}

impl TerminalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a terminal as present and not yet completed. Keeps an
    /// existing completion flag if the terminal re-registers.
    pub fn register(&self, id: impl Into<TerminalId>) {
        self.terminals
            .lock()
            .expect("terminal lock poisoned")
            .entry(id.into())
            .or_insert(false);
    }

    /// Marks a terminal completed, registering it if unknown.
    pub fn mark_completed(&self, id: impl Into<TerminalId>) {
        self.terminals
            .lock()
            .expect("terminal lock poisoned")
            .insert(id.into(), true);
    }
}

impl WorldOracle for TerminalRegistry {
    fn terminals(&self) -> Vec<TerminalStatus> {
        self.terminals
            .lock()
            .expect("terminal lock poisoned")
            .iter()
            .map(|(id, &completed)| TerminalStatus {
                id: id.clone(),
                completed,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_keeps_completion_flag() {
        let registry = TerminalRegistry::new();
        registry.mark_completed("term.dna");
        registry.register("term.dna");

        assert!(registry.is_terminal_completed(&TerminalId::from("term.dna")));
        assert!(!registry.is_terminal_completed(&TerminalId::from("term.unknown")));
    }
}
