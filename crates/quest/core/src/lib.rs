//! Deterministic quest and progression logic shared across hosts.
//!
//! `quest-core` defines the canonical rules for quest acceptance, objective
//! synchronization, hand-in, and one-time reward bookkeeping, and exposes
//! pure APIs that can be reused by both the runtime and offline tools. All
//! progress mutation flows through [`engine::QuestEngine`], and supporting
//! crates depend on the types re-exported here.
pub mod engine;
pub mod env;
pub mod quest;
pub mod rewards;
pub mod save;
pub mod types;

pub use engine::{QuestEngine, QuestStage};
pub use env::{
    InventoryOracle, ItemOracle, OracleError, QuestCatalogOracle, QuestEnv, WorldOracle,
};
pub use quest::{
    ObjectiveDefinition, ObjectiveKind, ObjectiveProgress, QuestDefinition, QuestProgress,
    RewardDefinition, RewardKind, ValidationIssue,
};
pub use rewards::{GrantedItem, RewardError, RewardTracker};
pub use save::{ObjectiveRecord, QuestProgressRecord, QuestSaveData, RestoreReport};
pub use types::{ItemId, QuestId, TerminalId, TerminalStatus};
