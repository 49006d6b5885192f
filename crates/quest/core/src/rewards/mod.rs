//! One-time reward bookkeeping and grant validation.
//!
//! [`RewardTracker`] records which uniquely-identified rewards have already
//! been granted. The granted set grows monotonically except for an explicit
//! [`clear`](RewardTracker::clear) on new game. A non-repeatable reward is
//! granted at most once system-wide, keyed by its identifier rather than by
//! dialogue index or NPC.

use std::collections::BTreeSet;

use crate::env::{OracleError, QuestEnv};
use crate::quest::{QuestDefinition, RewardDefinition, RewardKind};
use crate::types::ItemId;

/// Item payout produced by a successful grant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrantedItem {
    pub reward_id: String,
    pub item: ItemId,
    pub quantity: u32,
}

/// Reasons a grant was refused. No state change accompanies any of these.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RewardError {
    #[error("reward has an empty identifier")]
    EmptyRewardId,

    #[error("reward '{id}': item id {item} is not a valid item id")]
    InvalidItem { id: String, item: ItemId },

    #[error("reward '{id}': quantity must be positive")]
    InvalidQuantity { id: String },

    #[error("reward '{id}': item {item} does not exist in the catalog")]
    UnknownItem { id: String, item: ItemId },

    #[error("reward '{id}' was already given and cannot be given multiple times")]
    AlreadyGranted { id: String },

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

/// Set of reward identifiers already granted.
#[derive(Clone, Debug, Default)]
pub struct RewardTracker {
    granted: BTreeSet<String>,
}

impl RewardTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a reward with this id may be granted under the tracking rules.
    pub fn can_give(&self, id: &str, repeatable: bool) -> bool {
        !id.is_empty() && (repeatable || !self.granted.contains(id))
    }

    /// Idempotent insert into the granted set. Empty ids are never recorded.
    pub fn mark_given(&mut self, id: &str) {
        if !id.is_empty() {
            self.granted.insert(id.to_owned());
        }
    }

    pub fn has_received(&self, id: &str) -> bool {
        !id.is_empty() && self.granted.contains(id)
    }

    /// Whether any reward in the slice has already been handed out.
    pub fn any_received(&self, rewards: &[RewardDefinition]) -> bool {
        rewards.iter().any(|reward| self.has_received(&reward.id))
    }

    pub fn granted_count(&self) -> usize {
        self.granted.len()
    }

    /// Forgets every grant. New-game path only.
    pub fn clear(&mut self) {
        self.granted.clear();
    }

    /// Granted ids for persistence, in stable order.
    pub fn granted_ids(&self) -> Vec<String> {
        self.granted.iter().cloned().collect()
    }

    /// Replaces the granted set with persisted ids.
    pub fn restore(&mut self, ids: Vec<String>) {
        self.granted = ids.into_iter().filter(|id| !id.is_empty()).collect();
    }

    /// Validates and grants a single reward.
    ///
    /// Validation and eligibility are both checked before any state changes,
    /// so a doomed grant never marks the reward as given. On success the
    /// reward is recorded and the payout returned; materializing the item is
    /// the caller's job.
    pub fn try_give(
        &mut self,
        reward: &RewardDefinition,
        env: QuestEnv<'_>,
    ) -> Result<GrantedItem, RewardError> {
        if reward.id.is_empty() {
            return Err(RewardError::EmptyRewardId);
        }
        if reward.item.0 == 0 {
            return Err(RewardError::InvalidItem {
                id: reward.id.clone(),
                item: reward.item,
            });
        }
        if reward.quantity == 0 {
            return Err(RewardError::InvalidQuantity {
                id: reward.id.clone(),
            });
        }
        if !env.items()?.exists(reward.item) {
            return Err(RewardError::UnknownItem {
                id: reward.id.clone(),
                item: reward.item,
            });
        }
        if !self.can_give(&reward.id, reward.repeatable) {
            return Err(RewardError::AlreadyGranted {
                id: reward.id.clone(),
            });
        }

        self.mark_given(&reward.id);
        Ok(GrantedItem {
            reward_id: reward.id.clone(),
            item: reward.item,
            quantity: reward.quantity,
        })
    }

    /// Grants every item reward attached to a quest, collecting failures
    /// instead of aborting the batch. One bad reward never blocks the rest.
    pub fn grant_quest_rewards(
        &mut self,
        quest: &QuestDefinition,
        env: QuestEnv<'_>,
    ) -> (Vec<GrantedItem>, Vec<RewardError>) {
        let mut granted = Vec::new();
        let mut failures = Vec::new();

        for reward in &quest.rewards {
            match reward.kind {
                RewardKind::Item => match self.try_give(reward, env) {
                    Ok(payout) => granted.push(payout),
                    Err(error) => failures.push(error),
                },
                // Gold, experience, and custom payouts never shipped.
                RewardKind::Gold | RewardKind::Experience | RewardKind::Custom => {}
            }
        }

        (granted, failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ItemOracle;
    use crate::types::QuestId;

    struct Catalog {
        known: Vec<u32>,
    }

    impl ItemOracle for Catalog {
        fn exists(&self, item: ItemId) -> bool {
            self.known.contains(&item.0)
        }
    }

    fn reward(id: &str, item: u32, quantity: u32, repeatable: bool) -> RewardDefinition {
        RewardDefinition {
            id: id.to_owned(),
            kind: RewardKind::Item,
            item: ItemId(item),
            quantity,
            trigger_index: 0,
            repeatable,
        }
    }

    fn env(catalog: &Catalog) -> QuestEnv<'_> {
        QuestEnv::new(None, Some(catalog), None)
    }

    #[test]
    fn one_time_reward_is_granted_exactly_once() {
        let catalog = Catalog { known: vec![7] };
        let mut tracker = RewardTracker::new();
        let definition = reward("npc.vos.intro", 7, 2, false);

        let payout = tracker.try_give(&definition, env(&catalog)).unwrap();
        assert_eq!(payout.item, ItemId(7));
        assert_eq!(payout.quantity, 2);

        assert_eq!(
            tracker.try_give(&definition, env(&catalog)),
            Err(RewardError::AlreadyGranted {
                id: "npc.vos.intro".into()
            })
        );
        assert_eq!(tracker.granted_count(), 1);
    }

    #[test]
    fn repeatable_reward_is_granted_again() {
        let catalog = Catalog { known: vec![7] };
        let mut tracker = RewardTracker::new();
        let definition = reward("vendor.daily", 7, 1, true);

        assert!(tracker.try_give(&definition, env(&catalog)).is_ok());
        assert!(tracker.try_give(&definition, env(&catalog)).is_ok());
    }

    #[test]
    fn validation_failures_leave_tracker_untouched() {
        let catalog = Catalog { known: vec![7] };
        let mut tracker = RewardTracker::new();

        assert_eq!(
            tracker.try_give(&reward("", 7, 1, false), env(&catalog)),
            Err(RewardError::EmptyRewardId)
        );
        assert!(matches!(
            tracker.try_give(&reward("r.zero-item", 0, 1, false), env(&catalog)),
            Err(RewardError::InvalidItem { .. })
        ));
        assert!(matches!(
            tracker.try_give(&reward("r.zero-qty", 7, 0, false), env(&catalog)),
            Err(RewardError::InvalidQuantity { .. })
        ));
        assert!(matches!(
            tracker.try_give(&reward("r.unknown", 99, 1, false), env(&catalog)),
            Err(RewardError::UnknownItem { .. })
        ));
        assert_eq!(tracker.granted_count(), 0);
    }

    #[test]
    fn missing_item_oracle_refuses_grant_without_marking() {
        let mut tracker = RewardTracker::new();
        let definition = reward("r.orphan", 7, 1, false);
        assert_eq!(
            tracker.try_give(&definition, QuestEnv::empty()),
            Err(RewardError::Oracle(OracleError::ItemsNotAvailable))
        );
        assert!(!tracker.has_received("r.orphan"));
    }

    #[test]
    fn quest_rewards_skip_unshipped_kinds_and_collect_failures() {
        let catalog = Catalog { known: vec![7] };
        let mut tracker = RewardTracker::new();

        let mut gold = reward("r.gold", 7, 5, false);
        gold.kind = RewardKind::Gold;

        let quest = QuestDefinition {
            id: QuestId::from("q.rewards"),
            name: "Rewards".into(),
            description: String::new(),
            objectives: Vec::new(),
            rewards: vec![
                reward("r.item", 7, 3, false),
                gold,
                reward("r.bad", 99, 1, false),
            ],
        };

        let (granted, failures) = tracker.grant_quest_rewards(&quest, env(&catalog));
        assert_eq!(granted.len(), 1);
        assert_eq!(granted[0].reward_id, "r.item");
        assert_eq!(failures.len(), 1);
        assert!(matches!(failures[0], RewardError::UnknownItem { .. }));
    }

    #[test]
    fn clear_and_restore_round_trip() {
        let mut tracker = RewardTracker::new();
        tracker.mark_given("a");
        tracker.mark_given("b");
        tracker.mark_given("a");
        assert_eq!(tracker.granted_count(), 2);

        let ids = tracker.granted_ids();
        tracker.clear();
        assert_eq!(tracker.granted_count(), 0);

        tracker.restore(ids);
        assert!(tracker.has_received("a"));
        assert!(tracker.has_received("b"));
    }

    #[test]
    fn any_received_scans_reward_lists() {
        let mut tracker = RewardTracker::new();
        let rewards = [reward("r.one", 7, 1, false), reward("r.two", 7, 1, false)];
        assert!(!tracker.any_received(&rewards));
        tracker.mark_given("r.two");
        assert!(tracker.any_received(&rewards));
    }
}
