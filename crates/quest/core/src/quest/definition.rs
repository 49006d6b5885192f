use std::fmt;

use crate::types::{ItemId, QuestId};

/// Immutable quest template authored in content files.
///
/// Definitions are looked up by [`QuestId`] when restoring persisted
/// progress and never mutated at runtime. Accepting a quest deep-copies the
/// objective list into a [`QuestProgress`](super::QuestProgress).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuestDefinition {
    pub id: QuestId,
    pub name: String,
    pub description: String,
    /// Ordered list; display order matters, evaluation order does not.
    pub objectives: Vec<ObjectiveDefinition>,
    pub rewards: Vec<RewardDefinition>,
}

impl QuestDefinition {
    /// Checks the definition for authoring problems.
    ///
    /// Issues are warnings rather than hard errors: a quest with a dead
    /// objective still loads, it just can never complete.
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();

        for (index, objective) in self.objectives.iter().enumerate() {
            match objective.kind {
                ObjectiveKind::CollectItem => {
                    if objective.acceptable_item_ids().is_empty() {
                        issues.push(ValidationIssue::NoAcceptableItems { objective: index });
                    }
                }
                ObjectiveKind::TalkNpc
                | ObjectiveKind::InteractTerminal
                | ObjectiveKind::CompleteTerminal => {
                    if objective.target.trim().is_empty() {
                        issues.push(ValidationIssue::MissingTarget { objective: index });
                    }
                }
                ObjectiveKind::DefeatEnemy
                | ObjectiveKind::ReachLocation
                | ObjectiveKind::Custom => {}
            }

            if objective.required == 0 {
                issues.push(ValidationIssue::ZeroRequiredAmount { objective: index });
            }
        }

        issues
    }
}

/// Measurable requirement kinds.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ObjectiveKind {
    CollectItem,
    DefeatEnemy,
    ReachLocation,
    TalkNpc,
    InteractTerminal,
    CompleteTerminal,
    Custom,
}

impl ObjectiveKind {
    /// Objectives advanced by terminal-completion events.
    #[inline]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::InteractTerminal | Self::CompleteTerminal)
    }
}

/// A single measurable quest requirement.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectiveDefinition {
    pub kind: ObjectiveKind,

    /// Structured target: a terminal id, an NPC name, or (legacy) a single
    /// item id for collection objectives authored before multi-item support.
    pub target: String,

    /// Interchangeable item ids that all fulfill a CollectItem objective.
    /// Empty means "fall back to parsing `target` as a single item id".
    #[cfg_attr(feature = "serde", serde(default))]
    pub acceptable_items: Vec<ItemId>,

    pub required: u32,
    pub description: String,
}

impl ObjectiveDefinition {
    /// Item ids that can fulfill this objective.
    ///
    /// Only CollectItem objectives accept items. The explicit list wins;
    /// otherwise the target string is parsed as a legacy single item id.
    /// An empty result marks an objective that can never progress.
    pub fn acceptable_item_ids(&self) -> Vec<ItemId> {
        if self.kind != ObjectiveKind::CollectItem {
            return Vec::new();
        }

        if !self.acceptable_items.is_empty() {
            return self.acceptable_items.clone();
        }

        self.target
            .trim()
            .parse::<u32>()
            .map(|id| vec![ItemId(id)])
            .unwrap_or_default()
    }

    /// Whether the given item id can fulfill this objective.
    pub fn accepts_item(&self, item: ItemId) -> bool {
        self.acceptable_item_ids().contains(&item)
    }
}

/// Reward payout kinds.
///
/// Only `Item` grants anything today; the remaining arms are authored
/// content that never shipped a payout path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RewardKind {
    Item,
    Gold,
    Experience,
    Custom,
}

/// One reward attached to a quest or a dialogue line.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardDefinition {
    /// Globally unique key gating one-time grants. Uniqueness is expected
    /// system-wide, not per NPC or per dialogue.
    pub id: String,

    pub kind: RewardKind,
    pub item: ItemId,
    pub quantity: u32,

    /// Dialogue line index the reward is attached to.
    #[cfg_attr(feature = "serde", serde(default))]
    pub trigger_index: u32,

    /// When false the reward is granted at most once system-wide.
    #[cfg_attr(feature = "serde", serde(default))]
    pub repeatable: bool,
}

/// Authoring problem detected in a quest definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValidationIssue {
    /// CollectItem objective that resolves to zero acceptable item ids and
    /// therefore can never progress.
    NoAcceptableItems { objective: usize },

    /// Terminal or NPC objective without a target id.
    MissingTarget { objective: usize },

    /// Objective that is trivially complete.
    ZeroRequiredAmount { objective: usize },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAcceptableItems { objective } => {
                write!(f, "objective {objective}: no acceptable item ids")
            }
            Self::MissingTarget { objective } => {
                write!(f, "objective {objective}: missing target id")
            }
            Self::ZeroRequiredAmount { objective } => {
                write!(f, "objective {objective}: required amount is zero")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn objective(kind: ObjectiveKind, target: &str, items: &[u32], required: u32) -> ObjectiveDefinition {
        ObjectiveDefinition {
            kind,
            target: target.to_owned(),
            acceptable_items: items.iter().copied().map(ItemId).collect(),
            required,
            description: String::new(),
        }
    }

    #[test]
    fn explicit_item_list_wins_over_target() {
        let obj = objective(ObjectiveKind::CollectItem, "7", &[10, 11], 3);
        assert_eq!(obj.acceptable_item_ids(), vec![ItemId(10), ItemId(11)]);
    }

    #[test]
    fn legacy_target_parses_as_single_item() {
        let obj = objective(ObjectiveKind::CollectItem, "42", &[], 1);
        assert_eq!(obj.acceptable_item_ids(), vec![ItemId(42)]);
        assert!(obj.accepts_item(ItemId(42)));
        assert!(!obj.accepts_item(ItemId(43)));
    }

    #[test]
    fn non_collect_objectives_accept_no_items() {
        let obj = objective(ObjectiveKind::TalkNpc, "archivist", &[10], 1);
        assert!(obj.acceptable_item_ids().is_empty());
    }

    #[test]
    fn validate_flags_dead_collect_objective() {
        let quest = QuestDefinition {
            id: QuestId::from("q.broken"),
            name: "Broken".into(),
            description: String::new(),
            objectives: vec![
                objective(ObjectiveKind::CollectItem, "not-an-id", &[], 2),
                objective(ObjectiveKind::CompleteTerminal, "", &[], 0),
            ],
            rewards: Vec::new(),
        };

        let issues = quest.validate();
        assert!(issues.contains(&ValidationIssue::NoAcceptableItems { objective: 0 }));
        assert!(issues.contains(&ValidationIssue::MissingTarget { objective: 1 }));
        assert!(issues.contains(&ValidationIssue::ZeroRequiredAmount { objective: 1 }));
    }
}
