use serde::{Deserialize, Serialize};

/// Kinds of currency held in the ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CurrencyKind {
    /// Basic currency from kills, sales and idle time
    Gold,
    /// Rare stone dropped by bosses
    MagicStone,
    SoulFragment,
    /// Premium currency
    Gem,
}

impl CurrencyKind {
    pub const ALL: [CurrencyKind; 4] = [
        CurrencyKind::Gold,
        CurrencyKind::MagicStone,
        CurrencyKind::SoulFragment,
        CurrencyKind::Gem,
    ];
}

/// Equipment slot category. Each category holds at most one equipped item
/// and has its own enhancement track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SlotCategory {
    Weapon,
    Armor,
    Accessory,
}

impl SlotCategory {
    pub const ALL: [SlotCategory; 3] = [
        SlotCategory::Weapon,
        SlotCategory::Armor,
        SlotCategory::Accessory,
    ];
}

/// Item grade, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemGrade {
    Common,
    Rare,
    Epic,
    Legendary,
}

/// One row of the level curve: what it takes to reach `level` and what it grants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelRow {
    pub level: u32,
    pub required_exp: u64,
    pub attack_increase: f64,
    pub health_increase: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotEnhanceRow {
    pub category: SlotCategory,
    pub enhance_level: u32,
    pub gold_cost: i64,
    pub attack_increase: f64,
    pub health_increase: f64,
    /// Probability in [0, 1] that an attempt at this tier succeeds.
    pub success_rate: f64,
}

fn default_multiplier() -> f64 {
    1.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRow {
    pub stage_id: u32,
    pub name: String,
    pub monster_ids: Vec<u32>,
    pub required_kill_count: u32,
    #[serde(default)]
    pub is_boss_stage: bool,
    #[serde(default)]
    pub boss_monster_id: Option<u32>,
    #[serde(default = "default_multiplier")]
    pub gold_multiplier: f64,
    #[serde(default = "default_multiplier")]
    pub exp_multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropEntry {
    pub item_id: u32,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterRow {
    pub monster_id: u32,
    pub name: String,
    pub base_health: f64,
    pub base_damage: f64,
    pub gold_reward: i64,
    pub exp_reward: i64,
    #[serde(default)]
    pub drop_table: Vec<DropEntry>,
}

/// Equipment definition from the item catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    pub item_id: u32,
    pub name: String,
    pub category: SlotCategory,
    pub grade: ItemGrade,
    pub attack_bonus: f64,
    pub health_bonus: f64,
    pub sell_price: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestType {
    ClearStage,
    DefeatMonsterCount,
    LevelUpCharacter,
    EnhanceSlot,
    UpgradeCollection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestDef {
    pub quest_id: u32,
    pub name: String,
    pub quest_type: QuestType,
    #[serde(default)]
    pub repeatable: bool,
    pub target_value: i64,
    pub reward_kind: CurrencyKind,
    pub reward_amount: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_ordering() {
        assert!(ItemGrade::Common < ItemGrade::Rare);
        assert!(ItemGrade::Rare < ItemGrade::Epic);
        assert!(ItemGrade::Epic < ItemGrade::Legendary);
    }

    #[test]
    fn test_stage_row_multipliers_default_to_one() {
        let json = r#"{
            "stage_id": 3,
            "name": "Marsh",
            "monster_ids": [1, 2],
            "required_kill_count": 20
        }"#;
        let row: StageRow = serde_json::from_str(json).unwrap();
        assert!((row.gold_multiplier - 1.0).abs() < f64::EPSILON);
        assert!((row.exp_multiplier - 1.0).abs() < f64::EPSILON);
        assert!(!row.is_boss_stage);
        assert_eq!(row.boss_monster_id, None);
    }

    #[test]
    fn test_monster_row_without_drops() {
        let json = r#"{
            "monster_id": 1,
            "name": "Slime",
            "base_health": 20.0,
            "base_damage": 2.0,
            "gold_reward": 10,
            "exp_reward": 5
        }"#;
        let row: MonsterRow = serde_json::from_str(json).unwrap();
        assert!(row.drop_table.is_empty());
    }
}
