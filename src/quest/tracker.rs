use crate::core::events::Observers;
use crate::data::{QuestCatalog, QuestDef, QuestType};
use crate::economy::CurrencyLedger;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestProgress {
    pub quest_id: u32,
    pub value: i64,
    /// Rewards earned but not yet claimed.
    pub unclaimed: i64,
    pub completed: bool,
}

impl QuestProgress {
    pub fn new(quest_id: u32) -> Self {
        Self {
            quest_id,
            value: 0,
            unclaimed: 0,
            completed: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestEvent {
    ProgressUpdated { quest_id: u32 },
}

#[derive(Debug, Default)]
pub struct QuestTracker {
    progress: BTreeMap<u32, QuestProgress>,
    pub observers: Observers<QuestEvent>,
}

impl QuestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn progress(&self, quest_id: u32) -> Option<&QuestProgress> {
        self.progress.get(&quest_id)
    }

    /// Quests with at least one reward waiting to be claimed.
    pub fn unclaimed_quest_ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.progress
            .values()
            .filter(|p| p.unclaimed > 0)
            .map(|p| p.quest_id)
    }

    /// Adds `amount` to every unfinished quest of `quest_type`.
    pub fn update_progress(&mut self, quest_type: QuestType, amount: i64, quests: &QuestCatalog) {
        if amount <= 0 {
            return;
        }
        let mut matching: Vec<&QuestDef> = quests
            .rows()
            .filter(|q| q.quest_type == quest_type)
            .collect();
        matching.sort_by_key(|q| q.quest_id);

        for def in matching {
            let progress = self
                .progress
                .entry(def.quest_id)
                .or_insert_with(|| QuestProgress::new(def.quest_id));
            if progress.completed {
                continue;
            }
            progress.value = progress.value.saturating_add(amount);
            recalculate_rewards(progress, def);
            debug!(quest_id = def.quest_id, value = progress.value, "quest progress");
            self.observers.emit(&QuestEvent::ProgressUpdated {
                quest_id: def.quest_id,
            });
        }
    }

    /// Pays out every unclaimed reward of a quest.
    pub fn claim_reward(
        &mut self,
        quest_id: u32,
        quests: &QuestCatalog,
        ledger: &mut CurrencyLedger,
    ) -> bool {
        let (Some(def), Some(progress)) = (quests.get(quest_id), self.progress.get_mut(&quest_id))
        else {
            warn!(quest_id, "cannot claim reward for unknown quest");
            return false;
        };
        if progress.unclaimed <= 0 {
            warn!(quest_id, "no quest reward to claim");
            return false;
        }

        let payout = def.reward_amount.saturating_mul(progress.unclaimed);
        if !ledger.change(def.reward_kind, payout) {
            return false;
        }
        if def.repeatable {
            progress.value -= progress.unclaimed * def.target_value;
        }
        progress.unclaimed = 0;
        info!(quest = %def.name, kind = ?def.reward_kind, payout, "quest reward claimed");
        self.observers
            .emit(&QuestEvent::ProgressUpdated { quest_id });
        true
    }

    /// Restores saved progress, drops unknown quests and seeds new ones.
    pub fn initialize(&mut self, saved: &[QuestProgress], quests: &QuestCatalog) {
        self.progress.clear();
        for entry in saved {
            if !quests.contains(entry.quest_id) {
                warn!(quest_id = entry.quest_id, "saved progress for unknown quest dropped");
                continue;
            }
            self.progress.insert(entry.quest_id, *entry);
        }
        for def in quests.rows() {
            self.progress
                .entry(def.quest_id)
                .or_insert_with(|| QuestProgress::new(def.quest_id));
        }
        let ids: Vec<u32> = self.progress.keys().copied().collect();
        for quest_id in ids {
            self.observers
                .emit(&QuestEvent::ProgressUpdated { quest_id });
        }
    }

    pub fn collect_save_data(&self) -> Vec<QuestProgress> {
        self.progress.values().copied().collect()
    }
}

fn recalculate_rewards(progress: &mut QuestProgress, def: &QuestDef) {
    if def.target_value <= 0 {
        return;
    }
    if def.repeatable {
        progress.unclaimed = progress.value / def.target_value;
    } else if progress.value >= def.target_value {
        progress.completed = true;
        progress.unclaimed = 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CurrencyKind;

    fn quest(quest_id: u32, quest_type: QuestType, repeatable: bool, target: i64) -> QuestDef {
        QuestDef {
            quest_id,
            name: format!("quest-{quest_id}"),
            quest_type,
            repeatable,
            target_value: target,
            reward_kind: CurrencyKind::Gem,
            reward_amount: 5,
        }
    }

    fn catalog() -> QuestCatalog {
        QuestCatalog::from_rows(vec![
            quest(1, QuestType::DefeatMonsterCount, true, 10),
            quest(2, QuestType::DefeatMonsterCount, false, 3),
            quest(3, QuestType::LevelUpCharacter, false, 5),
        ])
    }

    #[test]
    fn test_repeatable_accumulates_and_claims() {
        let quests = catalog();
        let mut tracker = QuestTracker::new();
        let mut ledger = CurrencyLedger::new();

        tracker.update_progress(QuestType::DefeatMonsterCount, 25, &quests);
        assert_eq!(tracker.progress(1).unwrap().unclaimed, 2);
        assert_eq!(tracker.unclaimed_quest_ids().collect::<Vec<_>>(), vec![1, 2]);

        assert!(tracker.claim_reward(1, &quests, &mut ledger));
        assert_eq!(ledger.amount(CurrencyKind::Gem), 10);
        let progress = tracker.progress(1).unwrap();
        assert_eq!(progress.value, 5);
        assert_eq!(progress.unclaimed, 0);
        assert!(!tracker.claim_reward(1, &quests, &mut ledger));
    }

    #[test]
    fn test_one_shot_completes_once() {
        let quests = catalog();
        let mut tracker = QuestTracker::new();
        let mut ledger = CurrencyLedger::new();

        tracker.update_progress(QuestType::DefeatMonsterCount, 2, &quests);
        assert!(!tracker.progress(2).unwrap().completed);
        tracker.update_progress(QuestType::DefeatMonsterCount, 2, &quests);
        assert!(tracker.progress(2).unwrap().completed);

        tracker.claim_reward(1, &quests, &mut ledger);
        assert!(tracker.claim_reward(2, &quests, &mut ledger));
        tracker.update_progress(QuestType::DefeatMonsterCount, 100, &quests);
        let progress = tracker.progress(2).unwrap();
        assert_eq!(progress.value, 4);
        assert_eq!(progress.unclaimed, 0);
    }

    #[test]
    fn test_other_types_untouched() {
        let quests = catalog();
        let mut tracker = QuestTracker::new();
        tracker.update_progress(QuestType::EnhanceSlot, 3, &quests);
        assert!(tracker.progress(1).is_none());
        assert!(tracker.progress(3).is_none());
    }

    #[test]
    fn test_restore_drops_unknown_and_seeds_new() {
        let quests = catalog();
        let mut tracker = QuestTracker::new();
        tracker.initialize(
            &[
                QuestProgress { quest_id: 1, value: 7, unclaimed: 0, completed: false },
                QuestProgress { quest_id: 42, value: 1, unclaimed: 1, completed: false },
            ],
            &quests,
        );

        assert_eq!(tracker.progress(1).unwrap().value, 7);
        assert!(tracker.progress(42).is_none());
        assert_eq!(tracker.progress(3), Some(&QuestProgress::new(3)));
        assert_eq!(tracker.collect_save_data().len(), 3);
    }
}
