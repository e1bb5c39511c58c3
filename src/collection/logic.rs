//! Collection counts, tiers, auto-sell and the equipped set.

use super::types::*;
use crate::character::{Character, StatBonus};
use crate::core::config::CollectionConfig;
use crate::core::events::Observers;
use crate::data::{CurrencyKind, ItemCatalog, ItemDef, SlotCategory};
use crate::economy::CurrencyLedger;
use std::collections::BTreeMap;
use tracing::{debug, error, info, warn};

#[derive(Debug, Default)]
pub struct CollectionEngine {
    pub(super) config: CollectionConfig,
    pub(super) entries: BTreeMap<u32, CollectionEntry>,
    pub(super) equipped: BTreeMap<SlotCategory, u32>,
    pub(super) slot_levels: BTreeMap<SlotCategory, u32>,
    pub observers: Observers<CollectionEvent>,
}

impl CollectionEngine {
    pub fn new(config: CollectionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Creates an empty entry for every catalog item that has none yet.
    pub fn seed_from_catalog(&mut self, items: &ItemCatalog) {
        for id in items.sorted_ids() {
            self.entries.entry(id).or_insert_with(|| CollectionEntry::new(id));
        }
    }

    pub fn config(&self) -> &CollectionConfig {
        &self.config
    }

    pub fn entry(&self, item_id: u32) -> Option<&CollectionEntry> {
        self.entries.get(&item_id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &CollectionEntry> {
        self.entries.values()
    }

    pub fn item_count(&self, item_id: u32) -> u32 {
        self.entries.get(&item_id).map_or(0, |e| e.count)
    }

    pub fn collection_tier(&self, item_id: u32) -> u32 {
        self.entries.get(&item_id).map_or(0, |e| e.tier)
    }

    pub fn total_tiers(&self) -> u32 {
        self.entries.values().map(|e| e.tier).sum()
    }

    /// Gold price of the explicit upgrade out of `tier`.
    pub fn collection_upgrade_cost(&self, tier: u32) -> i64 {
        self.config
            .gold_cost_per_tier
            .saturating_mul(i64::from(tier) + 1)
    }

    /// Handles one acquired copy of `item`: sells low grades and unknown
    /// items, otherwise adds it to the collection and runs tier-ups.
    pub fn add_item(
        &mut self,
        item: &ItemDef,
        ledger: &mut CurrencyLedger,
        character: &mut Character,
    ) -> AcquireOutcome {
        if item.grade <= self.config.auto_sell_threshold {
            return self.sell(item, ledger);
        }

        let Some(entry) = self.entries.get_mut(&item.item_id) else {
            error!(item_id = item.item_id, "item has no collection entry, selling");
            return self.sell(item, ledger);
        };
        entry.count = entry.count.saturating_add(1);
        debug!(item_id = item.item_id, count = entry.count, "item collected");
        self.observers.emit(&CollectionEvent::CollectionChanged {
            item_id: item.item_id,
        });

        let tier_ups = if self.config.auto_tier_up {
            self.run_tier_ups(item, character)
        } else {
            0
        };
        AcquireOutcome::Collected { tier_ups }
    }

    fn sell(&self, item: &ItemDef, ledger: &mut CurrencyLedger) -> AcquireOutcome {
        if item.sell_price > 0 {
            ledger.change(CurrencyKind::Gold, item.sell_price);
        }
        debug!(item = %item.name, grade = ?item.grade, gold = item.sell_price, "item auto-sold");
        AcquireOutcome::Sold {
            gold: item.sell_price.max(0),
        }
    }

    fn run_tier_ups(&mut self, item: &ItemDef, character: &mut Character) -> u32 {
        let threshold = self.config.upgrade_cost_count;
        if threshold == 0 {
            warn!("upgrade_cost_count is 0, automatic tier-up disabled");
            return 0;
        }

        let mut tier_ups = 0;
        while let Some(entry) = self.entries.get_mut(&item.item_id) {
            if entry.count < threshold {
                break;
            }
            entry.count -= threshold;
            entry.tier += 1;
            let tier = entry.tier;
            self.grant_tier_bonus(item, character);
            tier_ups += 1;

            info!(item = %item.name, tier, "collection tier up");
            self.observers.emit(&CollectionEvent::CollectionChanged {
                item_id: item.item_id,
            });
        }
        tier_ups
    }

    fn grant_tier_bonus(&self, item: &ItemDef, character: &mut Character) {
        let bonus = item_bonus(item).scaled(self.config.stat_fraction);
        character.apply_base_stat_upgrade(bonus.attack, bonus.health);
    }

    /// Explicit tier-up paid in gold. Needs enough copies and enough gold;
    /// nothing changes unless both hold.
    pub fn try_upgrade_collection(
        &mut self,
        item_id: u32,
        gold_cost: i64,
        items: &ItemCatalog,
        ledger: &mut CurrencyLedger,
        character: &mut Character,
    ) -> bool {
        let Some(item) = items.get(item_id) else {
            warn!(item_id, "upgrade requested for unknown item");
            return false;
        };
        let threshold = self.config.upgrade_cost_count;
        let Some(entry) = self.entries.get(&item_id) else {
            warn!(item_id, "upgrade requested for item without collection entry");
            return false;
        };
        if entry.count < threshold {
            debug!(item_id, count = entry.count, threshold, "not enough copies to upgrade");
            return false;
        }
        if gold_cost < 0 || !ledger.can_afford(CurrencyKind::Gold, gold_cost) {
            warn!(item_id, gold_cost, "not enough gold to upgrade collection");
            return false;
        }
        if !ledger.change(CurrencyKind::Gold, -gold_cost) {
            return false;
        }

        let tier = match self.entries.get_mut(&item_id) {
            Some(entry) => {
                entry.count -= threshold;
                entry.tier += 1;
                entry.tier
            }
            None => return false,
        };
        self.grant_tier_bonus(item, character);
        info!(item = %item.name, tier, gold_cost, "collection upgraded");
        self.observers
            .emit(&CollectionEvent::CollectionChanged { item_id });
        true
    }

    pub fn equipped(&self, category: SlotCategory) -> Option<u32> {
        self.equipped.get(&category).copied()
    }

    pub fn equipped_items(&self) -> &BTreeMap<SlotCategory, u32> {
        &self.equipped
    }

    /// Equips an owned catalog item into its category, replacing whatever
    /// was there.
    pub fn equip_item(
        &mut self,
        item_id: u32,
        items: &ItemCatalog,
        character: &mut Character,
    ) -> bool {
        let Some(item) = items.get(item_id) else {
            warn!(item_id, "cannot equip unknown item");
            return false;
        };
        if !self.entries.get(&item_id).is_some_and(CollectionEntry::is_owned) {
            warn!(item_id, "cannot equip an item that was never collected");
            return false;
        }

        let category = item.category;
        if self.equipped.contains_key(&category) {
            self.unequip_item(category, items, character);
        }
        self.equipped.insert(category, item_id);
        debug!(item = %item.name, ?category, "item equipped");
        character.recalculate_stats(self.equipment_bonus(items));
        self.observers
            .emit(&CollectionEvent::EquipmentChanged { category });
        true
    }

    pub fn unequip_item(
        &mut self,
        category: SlotCategory,
        items: &ItemCatalog,
        character: &mut Character,
    ) {
        if self.equipped.remove(&category).is_none() {
            return;
        }
        debug!(?category, "item unequipped");
        character.recalculate_stats(self.equipment_bonus(items));
        self.observers
            .emit(&CollectionEvent::EquipmentChanged { category });
    }

    /// Sum of the equipped items' bonuses, read fresh on every call.
    pub fn equipment_bonus(&self, items: &ItemCatalog) -> StatBonus {
        self.equipped
            .values()
            .filter_map(|id| items.get(*id))
            .fold(StatBonus::default(), |acc, item| acc + item_bonus(item))
    }

    /// Restores saved entries. Entries for items missing from the catalog
    /// are dropped.
    pub fn apply_collection(&mut self, saved: &[CollectionEntry], items: &ItemCatalog) {
        for entry in saved {
            if !items.contains(entry.item_id) {
                warn!(item_id = entry.item_id, "saved collection entry for unknown item dropped");
                continue;
            }
            self.entries.insert(entry.item_id, *entry);
            self.observers.emit(&CollectionEvent::CollectionChanged {
                item_id: entry.item_id,
            });
        }
    }

    /// Restores the equipped set. An item must exist, belong to the slot it
    /// was saved in and be owned.
    pub fn apply_equipped(&mut self, saved: &BTreeMap<SlotCategory, u32>, items: &ItemCatalog) {
        for (&category, &item_id) in saved {
            let valid = items.get(item_id).is_some_and(|item| item.category == category)
                && self.entries.get(&item_id).is_some_and(CollectionEntry::is_owned);
            if !valid {
                warn!(?category, item_id, "saved equipped item is invalid, slot left empty");
                continue;
            }
            self.equipped.insert(category, item_id);
            self.observers
                .emit(&CollectionEvent::EquipmentChanged { category });
        }
    }
}

pub(super) fn item_bonus(item: &ItemDef) -> StatBonus {
    StatBonus::new(item.attack_bonus, item.health_bonus)
}
