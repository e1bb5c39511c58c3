//! Serializable snapshot of all dynamic game state.

use crate::character::CharacterSave;
use crate::collection::CollectionEntry;
use crate::core::config::CombatConfig;
use crate::data::{CurrencyKind, SlotCategory};
use crate::quest::QuestProgress;
use crate::stage::StageSave;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveSnapshot {
    pub version: u32,
    /// Unix seconds.
    pub last_exit_timestamp: i64,
    pub currency: BTreeMap<CurrencyKind, i64>,
    pub character: CharacterSave,
    pub collection: Vec<CollectionEntry>,
    pub equipped: BTreeMap<SlotCategory, u32>,
    pub slot_levels: BTreeMap<SlotCategory, u32>,
    pub stage: StageSave,
    pub quests: Vec<QuestProgress>,
}

impl SaveSnapshot {
    /// Snapshot of a brand-new game stamped at `now`, with base stats from
    /// `combat`.
    pub fn new_game(now: i64, combat: &CombatConfig) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            last_exit_timestamp: now,
            currency: BTreeMap::new(),
            character: CharacterSave {
                level: 1,
                experience: 0,
                base_attack: combat.base_attack_power,
                base_health: combat.base_max_health,
                permanent_attack: 0.0,
                permanent_health: 0.0,
                current_health: combat.base_max_health,
            },
            collection: Vec::new(),
            equipped: BTreeMap::new(),
            slot_levels: BTreeMap::new(),
            stage: StageSave::default(),
            quests: Vec::new(),
        }
    }
}
