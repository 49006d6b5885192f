//! Quest templates and per-player progress.
//!
//! [`QuestDefinition`] is the immutable, content-authored template.
//! [`QuestProgress`] is the mutable per-player instance created on
//! acceptance; it owns deep copies of the template's objectives so the
//! shared definition is never aliased or mutated.
mod definition;
mod progress;

pub use definition::{
    ObjectiveDefinition, ObjectiveKind, QuestDefinition, RewardDefinition, RewardKind,
    ValidationIssue,
};
pub use progress::{ObjectiveProgress, QuestProgress};
