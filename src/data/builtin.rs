//! Built-in sample content used when no data directory is supplied.

use super::tables::*;
use super::types::*;

pub const BUILTIN_MAX_LEVEL: u32 = 50;
pub const BUILTIN_MAX_ENHANCE_LEVEL: u32 = 10;

impl ReferenceData {
    pub fn builtin() -> Self {
        Self {
            levels: LevelTable::from_rows(builtin_levels()),
            slot_enhance: SlotEnhanceTable::from_rows(builtin_slot_enhance()),
            stages: StageTable::from_rows(builtin_stages()),
            monsters: MonsterTable::from_rows(builtin_monsters()),
            items: ItemCatalog::from_rows(builtin_items()),
            quests: QuestCatalog::from_rows(builtin_quests()),
        }
    }
}

fn builtin_levels() -> Vec<LevelRow> {
    (2..=BUILTIN_MAX_LEVEL)
        .map(|level| LevelRow {
            level,
            required_exp: 100 + 50 * u64::from(level - 2),
            attack_increase: 2.0,
            health_increase: 10.0,
        })
        .collect()
}

fn builtin_slot_enhance() -> Vec<SlotEnhanceRow> {
    let mut rows = Vec::new();
    for category in SlotCategory::ALL {
        let (atk, hp) = match category {
            SlotCategory::Weapon => (3.0, 0.0),
            SlotCategory::Armor => (0.0, 25.0),
            SlotCategory::Accessory => (1.5, 12.0),
        };
        for level in 1..=BUILTIN_MAX_ENHANCE_LEVEL {
            rows.push(SlotEnhanceRow {
                category,
                enhance_level: level,
                gold_cost: 500 * i64::from(level) * i64::from(level),
                attack_increase: atk,
                health_increase: hp,
                // 100% for +1-4, then down 10% per tier
                success_rate: if level <= 4 {
                    1.0
                } else {
                    1.0 - 0.1 * f64::from(level - 4)
                },
            });
        }
    }
    rows
}

fn builtin_stages() -> Vec<StageRow> {
    vec![
        stage(1, "Quiet Meadow", vec![1, 2], 10, false, None, 1.0),
        stage(2, "Old Orchard", vec![1, 2, 3], 15, false, None, 1.2),
        stage(3, "Bramble Thicket", vec![2, 3, 4], 20, false, None, 1.5),
        stage(4, "Hollow Gate", vec![3, 4], 25, false, None, 1.8),
        stage(5, "Hawk Nest", vec![5], 5, true, Some(5), 3.0),
    ]
}

fn stage(
    stage_id: u32,
    name: &str,
    monster_ids: Vec<u32>,
    required_kill_count: u32,
    is_boss_stage: bool,
    boss_monster_id: Option<u32>,
    multiplier: f64,
) -> StageRow {
    StageRow {
        stage_id,
        name: name.to_string(),
        monster_ids,
        required_kill_count,
        is_boss_stage,
        boss_monster_id,
        gold_multiplier: multiplier,
        exp_multiplier: multiplier,
    }
}

fn builtin_monsters() -> Vec<MonsterRow> {
    vec![
        monster(1, "Field Mouse", 20.0, 1.0, 10, 8, vec![(101, 6.0), (201, 3.0), (301, 1.0)]),
        monster(2, "Beetle", 30.0, 2.0, 14, 12, vec![(101, 4.0), (102, 2.0), (201, 3.0)]),
        monster(3, "Crow", 45.0, 3.0, 20, 18, vec![(102, 3.0), (202, 3.0), (302, 2.0)]),
        monster(4, "Wild Cat", 70.0, 5.0, 30, 25, vec![(103, 1.0), (203, 1.0), (302, 2.0)]),
        monster(5, "Great Hawk", 400.0, 12.0, 250, 200, vec![(103, 2.0), (203, 2.0), (303, 1.0)]),
    ]
}

fn monster(
    monster_id: u32,
    name: &str,
    base_health: f64,
    base_damage: f64,
    gold_reward: i64,
    exp_reward: i64,
    drops: Vec<(u32, f64)>,
) -> MonsterRow {
    MonsterRow {
        monster_id,
        name: name.to_string(),
        base_health,
        base_damage,
        gold_reward,
        exp_reward,
        drop_table: drops
            .into_iter()
            .map(|(item_id, weight)| DropEntry { item_id, weight })
            .collect(),
    }
}

fn builtin_items() -> Vec<ItemDef> {
    vec![
        item(101, "Twig Sword", SlotCategory::Weapon, ItemGrade::Common, 2.0, 0.0, 5),
        item(102, "Iron Sword", SlotCategory::Weapon, ItemGrade::Epic, 12.0, 0.0, 60),
        item(103, "Talon Blade", SlotCategory::Weapon, ItemGrade::Legendary, 40.0, 20.0, 400),
        item(201, "Cloth Vest", SlotCategory::Armor, ItemGrade::Common, 0.0, 15.0, 5),
        item(202, "Feather Mail", SlotCategory::Armor, ItemGrade::Epic, 0.0, 80.0, 60),
        item(203, "Storm Plate", SlotCategory::Armor, ItemGrade::Legendary, 10.0, 250.0, 400),
        item(301, "Seed Charm", SlotCategory::Accessory, ItemGrade::Rare, 1.0, 5.0, 20),
        item(302, "Quill Ring", SlotCategory::Accessory, ItemGrade::Epic, 6.0, 30.0, 60),
        item(303, "Sun Amulet", SlotCategory::Accessory, ItemGrade::Legendary, 25.0, 120.0, 400),
    ]
}

fn item(
    item_id: u32,
    name: &str,
    category: SlotCategory,
    grade: ItemGrade,
    attack_bonus: f64,
    health_bonus: f64,
    sell_price: i64,
) -> ItemDef {
    ItemDef {
        item_id,
        name: name.to_string(),
        category,
        grade,
        attack_bonus,
        health_bonus,
        sell_price,
    }
}

fn builtin_quests() -> Vec<QuestDef> {
    vec![
        QuestDef {
            quest_id: 1,
            name: "Pest Control".to_string(),
            quest_type: QuestType::DefeatMonsterCount,
            repeatable: true,
            target_value: 50,
            reward_kind: CurrencyKind::Gem,
            reward_amount: 5,
        },
        QuestDef {
            quest_id: 2,
            name: "Growing Up".to_string(),
            quest_type: QuestType::LevelUpCharacter,
            repeatable: false,
            target_value: 10,
            reward_kind: CurrencyKind::Gold,
            reward_amount: 2000,
        },
        QuestDef {
            quest_id: 3,
            name: "Onward".to_string(),
            quest_type: QuestType::ClearStage,
            repeatable: false,
            target_value: 3,
            reward_kind: CurrencyKind::MagicStone,
            reward_amount: 10,
        },
        QuestDef {
            quest_id: 4,
            name: "Smith's Apprentice".to_string(),
            quest_type: QuestType::EnhanceSlot,
            repeatable: true,
            target_value: 5,
            reward_kind: CurrencyKind::Gold,
            reward_amount: 1000,
        },
        QuestDef {
            quest_id: 5,
            name: "Collector".to_string(),
            quest_type: QuestType::UpgradeCollection,
            repeatable: false,
            target_value: 1,
            reward_kind: CurrencyKind::SoulFragment,
            reward_amount: 3,
        },
    ]
}
