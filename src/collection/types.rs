use crate::data::SlotCategory;
use serde::{Deserialize, Serialize};

/// Ownership record for one catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionEntry {
    pub item_id: u32,
    /// Copies held toward the next tier.
    pub count: u32,
    pub tier: u32,
}

impl CollectionEntry {
    pub fn new(item_id: u32) -> Self {
        Self {
            item_id,
            count: 0,
            tier: 0,
        }
    }

    /// Owned at least once, now or in the past.
    pub fn is_owned(&self) -> bool {
        self.count > 0 || self.tier > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionEvent {
    CollectionChanged { item_id: u32 },
    EquipmentChanged { category: SlotCategory },
    SlotEnhanceChanged { category: SlotCategory, level: u32 },
}

/// What happened to an acquired item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireOutcome {
    Sold { gold: i64 },
    Collected { tier_ups: u32 },
}
