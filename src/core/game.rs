//! The game session: every simulation component plus the reference tables.
//!
//! Components never reach each other through globals. Operations that need
//! collaborators borrow them from here for the duration of one call.

use super::config::GameConfig;
use crate::character::{Character, StatBonus};
use crate::collection::CollectionEngine;
use crate::combat::{CombatContext, CombatSimulator};
use crate::data::{QuestType, ReferenceData, SlotCategory};
use crate::economy::CurrencyLedger;
use crate::quest::QuestTracker;
use crate::stage::StageProgress;
use chrono::Utc;
use rand::Rng;
use tracing::{info, warn};

#[derive(Debug)]
pub struct Game {
    pub config: GameConfig,
    pub data: ReferenceData,
    pub ledger: CurrencyLedger,
    pub character: Character,
    pub collection: CollectionEngine,
    pub combat: CombatSimulator,
    pub stage: StageProgress,
    pub quests: QuestTracker,
    /// Unix seconds of the last shutdown (or of startup for a new game).
    pub last_exit_timestamp: i64,
}

impl Game {
    /// A fresh game at level 1, stage 1, with no currency.
    pub fn new(config: GameConfig, data: ReferenceData) -> Self {
        let character = Character::new(config.combat.base_attack_power, config.combat.base_max_health);
        let mut collection = CollectionEngine::new(config.collection.clone());
        collection.seed_from_catalog(&data.items);
        let mut quests = QuestTracker::new();
        quests.initialize(&[], &data.quests);
        let combat = CombatSimulator::new(config.combat.clone());

        let mut game = Self {
            config,
            data,
            ledger: CurrencyLedger::new(),
            character,
            collection,
            combat,
            stage: StageProgress::new(),
            quests,
            last_exit_timestamp: Utc::now().timestamp(),
        };
        game.sync_combat_stage();
        game
    }

    /// Pushes the current stage's spawn pool into the combat simulator.
    pub fn sync_combat_stage(&mut self) {
        match self.stage.current_config(&self.data.stages) {
            Some(config) => self.combat.set_stage(config),
            None => warn!(stage_id = self.stage.stage_id(), "current stage missing, nothing will spawn"),
        }
    }

    pub fn equipment_bonus(&self) -> StatBonus {
        self.collection.equipment_bonus(&self.data.items)
    }

    pub fn attack_power(&self) -> f64 {
        self.character.attack_power(self.equipment_bonus())
    }

    pub fn max_health(&self) -> f64 {
        self.character.max_health(self.equipment_bonus())
    }

    /// Borrows the collaborators one combat step needs.
    pub fn combat_parts(&mut self) -> (&mut CombatSimulator, CombatContext<'_>) {
        (
            &mut self.combat,
            CombatContext {
                data: &self.data,
                ledger: &mut self.ledger,
                character: &mut self.character,
                collection: &mut self.collection,
                stage: &mut self.stage,
            },
        )
    }

    pub fn try_enhance_slot<R: Rng>(&mut self, category: SlotCategory, rng: &mut R) -> bool {
        let success = self.collection.try_enhance_slot(
            category,
            &self.data.slot_enhance,
            &mut self.ledger,
            &mut self.character,
            rng,
        );
        if success {
            self.quests
                .update_progress(QuestType::EnhanceSlot, 1, &self.data.quests);
        }
        success
    }

    /// Explicit gold-paid collection upgrade at the standard price.
    pub fn try_upgrade_collection(&mut self, item_id: u32) -> bool {
        let cost = self
            .collection
            .collection_upgrade_cost(self.collection.collection_tier(item_id));
        let success = self.collection.try_upgrade_collection(
            item_id,
            cost,
            &self.data.items,
            &mut self.ledger,
            &mut self.character,
        );
        if success {
            self.quests
                .update_progress(QuestType::UpgradeCollection, 1, &self.data.quests);
        }
        success
    }

    pub fn equip_item(&mut self, item_id: u32) -> bool {
        self.collection
            .equip_item(item_id, &self.data.items, &mut self.character)
    }

    pub fn unequip_item(&mut self, category: SlotCategory) {
        self.collection
            .unequip_item(category, &self.data.items, &mut self.character);
    }

    pub fn claim_quest_reward(&mut self, quest_id: u32) -> bool {
        self.quests
            .claim_reward(quest_id, &self.data.quests, &mut self.ledger)
    }

    /// Brings a dead character back and clears the field.
    pub fn revive(&mut self) {
        let bonus = self.equipment_bonus();
        self.character.revive(bonus);
        self.combat.reset_field();
        info!(level = self.character.level(), "revived, combat field reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Damageable;
    use crate::data::CurrencyKind;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_new_game_starts_clean() {
        let game = Game::new(GameConfig::default(), ReferenceData::builtin());
        assert_eq!(game.character.level(), 1);
        assert_eq!(game.stage.stage_id(), 1);
        assert_eq!(game.ledger.amount(CurrencyKind::Gold), 0);
        assert_eq!(game.combat.stage().map(|s| s.stage_id), Some(1));
        assert_eq!(game.collection.entries().count(), game.data.items.len());
        assert!((game.attack_power() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_enhance_slot_feeds_quest() {
        let mut game = Game::new(GameConfig::default(), ReferenceData::builtin());
        game.ledger.change(CurrencyKind::Gold, 100_000);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        // built-in tiers 1-4 always succeed
        assert!(game.try_enhance_slot(SlotCategory::Weapon, &mut rng));
        assert_eq!(game.collection.slot_level(SlotCategory::Weapon), 1);
        assert_eq!(game.quests.progress(4).map(|p| p.value), Some(1));
    }

    #[test]
    fn test_revive_after_death() {
        let mut game = Game::new(GameConfig::default(), ReferenceData::builtin());
        let bonus = game.equipment_bonus();
        game.character.apply_damage(10_000.0, bonus);
        assert!(game.character.is_dead());

        game.revive();
        assert!(game.character.is_alive());
        assert!(game.combat.roster().is_empty());
        assert_eq!(game.character.current_health(), game.max_health());
    }
}
