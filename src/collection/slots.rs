//! Per-category slot enhancement, paid in gold.

use super::logic::CollectionEngine;
use super::types::CollectionEvent;
use crate::character::Character;
use crate::data::{CurrencyKind, SlotCategory, SlotEnhanceTable};
use crate::economy::CurrencyLedger;
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

impl CollectionEngine {
    pub fn slot_level(&self, category: SlotCategory) -> u32 {
        self.slot_levels.get(&category).copied().unwrap_or(0)
    }

    pub fn slot_levels(&self) -> BTreeMap<SlotCategory, u32> {
        SlotCategory::ALL
            .iter()
            .map(|&category| (category, self.slot_level(category)))
            .collect()
    }

    /// One enhancement attempt. Gold is charged before the roll and kept on
    /// failure. Returns true only when the tier went up.
    pub fn try_enhance_slot<R: Rng>(
        &mut self,
        category: SlotCategory,
        table: &SlotEnhanceTable,
        ledger: &mut CurrencyLedger,
        character: &mut Character,
        rng: &mut R,
    ) -> bool {
        let current_level = self.slot_level(category);
        let Some(tier) = table.next_tier(category, current_level) else {
            debug!(?category, level = current_level, "slot already at max enhancement");
            return false;
        };
        if !ledger.can_afford(CurrencyKind::Gold, tier.gold_cost) {
            warn!(?category, cost = tier.gold_cost, "not enough gold to enhance slot");
            return false;
        }
        if !ledger.change(CurrencyKind::Gold, -tier.gold_cost) {
            return false;
        }

        if rng.gen::<f64>() < tier.success_rate {
            let level = current_level + 1;
            self.slot_levels.insert(category, level);
            character.apply_base_stat_upgrade(tier.attack_increase, tier.health_increase);
            info!(?category, level, "slot enhancement succeeded");
            self.observers
                .emit(&CollectionEvent::SlotEnhanceChanged { category, level });
            true
        } else {
            warn!(?category, cost = tier.gold_cost, "slot enhancement failed, gold spent");
            false
        }
    }

    /// Restores slot levels, capping each at the highest tier the table has.
    pub fn apply_slot_levels(
        &mut self,
        saved: &BTreeMap<SlotCategory, u32>,
        table: &SlotEnhanceTable,
    ) {
        for (&category, &level) in saved {
            let max = table.max_level(category);
            let level = if level > max {
                warn!(?category, level, max, "saved slot level above max tier, capped");
                max
            } else {
                level
            };
            self.slot_levels.insert(category, level);
            self.observers
                .emit(&CollectionEvent::SlotEnhanceChanged { category, level });
        }
    }
}
