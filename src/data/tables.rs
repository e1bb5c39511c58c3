//! Indexed reference tables.
//!
//! Rows are loaded as flat lists and indexed by key once. Every lookup
//! returns `Option`; `None` means "no further content" (max level, no next
//! enhancement tier, unknown monster) and is never treated as an error.

use super::types::*;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use tracing::warn;

/// A row type that can be indexed into a [`Table`].
pub trait TableRow {
    type Key: Copy + Eq + Hash + Debug;

    /// Table name used in logs and as the JSON file stem.
    const TABLE_NAME: &'static str;

    fn key(&self) -> Self::Key;
}

#[derive(Debug, Clone)]
pub struct Table<R: TableRow> {
    rows: HashMap<R::Key, R>,
}

impl<R: TableRow> Default for Table<R> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
        }
    }
}

impl<R: TableRow> Table<R> {
    /// Builds the index. On duplicate keys the later row wins.
    pub fn from_rows(rows: Vec<R>) -> Self {
        let mut index = HashMap::with_capacity(rows.len());
        for row in rows {
            let key = row.key();
            if index.insert(key, row).is_some() {
                warn!(table = R::TABLE_NAME, ?key, "duplicate row key, keeping the last one");
            }
        }
        Self { rows: index }
    }

    pub fn get(&self, key: R::Key) -> Option<&R> {
        self.rows.get(&key)
    }

    pub fn contains(&self, key: R::Key) -> bool {
        self.rows.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &R> {
        self.rows.values()
    }
}

impl TableRow for LevelRow {
    type Key = u32;
    const TABLE_NAME: &'static str = "levels";

    fn key(&self) -> u32 {
        self.level
    }
}

impl TableRow for SlotEnhanceRow {
    type Key = (SlotCategory, u32);
    const TABLE_NAME: &'static str = "slot_enhance";

    fn key(&self) -> (SlotCategory, u32) {
        (self.category, self.enhance_level)
    }
}

impl TableRow for StageRow {
    type Key = u32;
    const TABLE_NAME: &'static str = "stages";

    fn key(&self) -> u32 {
        self.stage_id
    }
}

impl TableRow for MonsterRow {
    type Key = u32;
    const TABLE_NAME: &'static str = "monsters";

    fn key(&self) -> u32 {
        self.monster_id
    }
}

impl TableRow for ItemDef {
    type Key = u32;
    const TABLE_NAME: &'static str = "items";

    fn key(&self) -> u32 {
        self.item_id
    }
}

impl TableRow for QuestDef {
    type Key = u32;
    const TABLE_NAME: &'static str = "quests";

    fn key(&self) -> u32 {
        self.quest_id
    }
}

pub type LevelTable = Table<LevelRow>;
pub type SlotEnhanceTable = Table<SlotEnhanceRow>;
pub type StageTable = Table<StageRow>;
pub type MonsterTable = Table<MonsterRow>;
pub type ItemCatalog = Table<ItemDef>;
pub type QuestCatalog = Table<QuestDef>;

impl Table<LevelRow> {
    /// Experience needed to go from `level - 1` to `level`.
    pub fn required_exp(&self, level: u32) -> Option<u64> {
        self.get(level).map(|row| row.required_exp)
    }

    /// Highest level the table reaches; `None` for an empty table.
    pub fn max_level(&self) -> Option<u32> {
        self.rows().map(|row| row.level).max()
    }
}

impl Table<SlotEnhanceRow> {
    /// The tier an enhancement attempt from `current_level` would reach.
    pub fn next_tier(&self, category: SlotCategory, current_level: u32) -> Option<&SlotEnhanceRow> {
        self.get((category, current_level.checked_add(1)?))
    }

    pub fn max_level(&self, category: SlotCategory) -> u32 {
        self.rows()
            .filter(|row| row.category == category)
            .map(|row| row.enhance_level)
            .max()
            .unwrap_or(0)
    }
}

impl Table<ItemDef> {
    /// Item ids in ascending order, for deterministic iteration.
    pub fn sorted_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.rows().map(|item| item.item_id).collect();
        ids.sort_unstable();
        ids
    }
}

/// All static tables, immutable after startup.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub levels: LevelTable,
    pub slot_enhance: SlotEnhanceTable,
    pub stages: StageTable,
    pub monsters: MonsterTable,
    pub items: ItemCatalog,
    pub quests: QuestCatalog,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level(level: u32, required_exp: u64) -> LevelRow {
        LevelRow {
            level,
            required_exp,
            attack_increase: 1.0,
            health_increase: 10.0,
        }
    }

    fn tier(category: SlotCategory, enhance_level: u32) -> SlotEnhanceRow {
        SlotEnhanceRow {
            category,
            enhance_level,
            gold_cost: 100 * enhance_level as i64,
            attack_increase: 2.0,
            health_increase: 5.0,
            success_rate: 1.0,
        }
    }

    #[test]
    fn test_lookup_and_not_found() {
        let table = LevelTable::from_rows(vec![level(2, 100), level(3, 150)]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.required_exp(2), Some(100));
        assert_eq!(table.required_exp(3), Some(150));
        assert_eq!(table.required_exp(4), None);
        assert!(!table.contains(1));
    }

    #[test]
    fn test_duplicate_key_keeps_last_row() {
        let table = LevelTable::from_rows(vec![level(2, 100), level(2, 999)]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.required_exp(2), Some(999));
    }

    #[test]
    fn test_next_enhance_tier() {
        let table = SlotEnhanceTable::from_rows(vec![
            tier(SlotCategory::Weapon, 1),
            tier(SlotCategory::Weapon, 2),
            tier(SlotCategory::Armor, 1),
        ]);

        let next = table.next_tier(SlotCategory::Weapon, 1).unwrap();
        assert_eq!(next.enhance_level, 2);
        assert!(table.next_tier(SlotCategory::Weapon, 2).is_none());
        assert!(table.next_tier(SlotCategory::Accessory, 0).is_none());
        assert_eq!(table.max_level(SlotCategory::Weapon), 2);
        assert_eq!(table.max_level(SlotCategory::Accessory), 0);
    }

    #[test]
    fn test_empty_table_default() {
        let table = StageTable::default();
        assert!(table.is_empty());
        assert!(table.get(1).is_none());
    }
}
