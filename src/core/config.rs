//! Tunable game configuration.
//!
//! Defaults come from [`crate::core::constants`]. A JSON file may override
//! any subset of fields; anything missing keeps its default.

use super::constants::*;
use super::error::Result;
use crate::data::ItemGrade;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub combat: CombatConfig,
    pub collection: CollectionConfig,
    pub idle: IdleConfig,
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub player_attack_interval: f64,
    pub base_attack_power: f64,
    pub base_max_health: f64,
    pub spawn_interval: f64,
    pub max_active_monsters: usize,
    pub monster_attack_interval: f64,
    pub spawn_distance: f64,
    pub move_speed: f64,
    pub attack_range: f64,
    /// Monster health multiplier added per stage above stage 1.
    pub stage_difficulty_step: f64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            player_attack_interval: PLAYER_ATTACK_INTERVAL_SECONDS,
            base_attack_power: BASE_ATTACK_POWER,
            base_max_health: BASE_MAX_HEALTH,
            spawn_interval: SPAWN_INTERVAL_SECONDS,
            max_active_monsters: MAX_ACTIVE_MONSTERS,
            monster_attack_interval: MONSTER_ATTACK_INTERVAL_SECONDS,
            spawn_distance: MONSTER_SPAWN_DISTANCE,
            move_speed: MONSTER_MOVE_SPEED,
            attack_range: MONSTER_ATTACK_RANGE,
            stage_difficulty_step: STAGE_DIFFICULTY_STEP,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    /// Copies consumed per collection tier.
    pub upgrade_cost_count: u32,
    /// Share of an item's bonus granted permanently per tier.
    pub stat_fraction: f64,
    /// Items at or below this grade are sold on pickup.
    pub auto_sell_threshold: ItemGrade,
    /// When false, tiers are only gained through the explicit gold upgrade.
    pub auto_tier_up: bool,
    pub gold_cost_per_tier: i64,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            upgrade_cost_count: COLLECTION_UPGRADE_COST_COUNT,
            stat_fraction: COLLECTION_STAT_FRACTION,
            auto_sell_threshold: ItemGrade::Rare,
            auto_tier_up: true,
            gold_cost_per_tier: COLLECTION_GOLD_COST_PER_TIER,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdleConfig {
    pub max_idle_seconds: i64,
    pub min_idle_seconds: i64,
    pub gold_per_second: f64,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            max_idle_seconds: MAX_IDLE_SECONDS,
            min_idle_seconds: MIN_IDLE_SECONDS,
            gold_per_second: IDLE_GOLD_PER_SECOND,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_constants() {
        let config = GameConfig::default();
        assert_eq!(config.idle.max_idle_seconds, 43200);
        assert_eq!(config.collection.upgrade_cost_count, 5);
        assert_eq!(config.collection.auto_sell_threshold, ItemGrade::Rare);
        assert!(config.collection.auto_tier_up);
        assert_eq!(config.combat.max_active_monsters, MAX_ACTIVE_MONSTERS);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "idle": { "gold_per_second": 25.0 }, "collection": { "auto_tier_up": false } }"#;
        let config = GameConfig::from_json_str(json).unwrap();

        assert!((config.idle.gold_per_second - 25.0).abs() < f64::EPSILON);
        assert_eq!(config.idle.max_idle_seconds, MAX_IDLE_SECONDS);
        assert!(!config.collection.auto_tier_up);
        assert_eq!(config.collection.upgrade_cost_count, 5);
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(GameConfig::from_json_str("{ not json").is_err());
    }
}
