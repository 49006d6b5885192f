//! Host-side runtime for the quest engine.
//!
//! Wraps the pure [`quest_core::QuestEngine`] with everything a game host
//! needs: concrete oracle providers, a change-notification event bus, save
//! repositories, and structured logging. All engine dispatch is synchronous
//! and single-threaded; tokio is used only for its broadcast channel.

pub mod error;
pub mod events;
pub mod providers;
pub mod repository;
pub mod service;

pub use error::{Result, RuntimeError};
pub use events::{EventBus, QuestEvent};
pub use providers::{SharedInventory, TerminalRegistry};
pub use repository::{FileSaveRepository, MemorySaveRepository, SaveRepository};
pub use service::{QuestService, RuntimeConfig};
