//! Startup and shutdown sequencing.
//!
//! Startup runs in a fixed order: every reference table is loaded (all at
//! once) before any saved state is applied, saved state is applied one
//! component at a time, and the idle reward is granted last. Only after
//! [`start_game`] returns may the caller begin ticking.

use super::persistence::SaveManager;
use super::snapshot::{SaveSnapshot, SNAPSHOT_VERSION};
use crate::core::config::GameConfig;
use crate::core::error::Result;
use crate::core::game::Game;
use crate::core::offline::{process_idle_reward_now, IdleReport};
use crate::data::{ReferenceData, TableLoader};
use chrono::Utc;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Where reference tables come from.
#[derive(Debug, Clone)]
pub enum TableSource {
    /// JSON files in a data directory.
    Directory(PathBuf),
    /// The content compiled into the crate.
    Builtin,
}

/// A started game plus what startup found.
#[derive(Debug)]
pub struct Startup {
    pub game: Game,
    pub restored: bool,
    pub idle: IdleReport,
}

pub async fn load_tables(source: &TableSource) -> ReferenceData {
    match source {
        TableSource::Directory(dir) => TableLoader::new(dir).load_all().await,
        TableSource::Builtin => {
            info!("using built-in reference tables");
            ReferenceData::builtin()
        }
    }
}

/// Loads tables, restores the save (if any) and grants the idle reward.
///
/// A missing save starts a new game. An unreadable save is logged and
/// replaced by a new game; it is never fatal.
pub async fn start_game(
    config: GameConfig,
    source: &TableSource,
    saves: &SaveManager,
) -> Startup {
    let data = load_tables(source).await;

    let snapshot = match saves.load_async().await {
        Ok(Some(snapshot)) => Some(snapshot),
        Ok(None) => {
            info!(path = %saves.save_path().display(), "no save file, starting a new game");
            None
        }
        Err(err) => {
            error!(error = %err, "save file unreadable, starting a new game");
            None
        }
    };

    let mut game = Game::new(config, data);
    let restored = snapshot.is_some();
    if let Some(snapshot) = &snapshot {
        apply_snapshot(&mut game, snapshot);
    }

    let idle = if restored {
        process_idle_reward_now(&mut game)
    } else {
        IdleReport::default()
    };

    info!(
        level = game.character.level(),
        stage_id = game.stage.stage_id(),
        restored,
        "game started"
    );
    Startup {
        game,
        restored,
        idle,
    }
}

/// Applies a snapshot to a game built from loaded tables, component by
/// component in dependency order.
pub fn apply_snapshot(game: &mut Game, snapshot: &SaveSnapshot) {
    if snapshot.version != SNAPSHOT_VERSION {
        warn!(found = snapshot.version, expected = SNAPSHOT_VERSION, "snapshot version differs, applying what matches");
    }

    // 1. currency
    for (&kind, &amount) in &snapshot.currency {
        game.ledger.set_amount(kind, amount);
    }

    // 2. character (health resolved after equipment)
    game.character.initialize(&snapshot.character, &game.data.levels);

    // 3. collection, then equipped set, then slot levels
    game.collection
        .apply_collection(&snapshot.collection, &game.data.items);
    game.collection
        .apply_equipped(&snapshot.equipped, &game.data.items);
    game.collection
        .apply_slot_levels(&snapshot.slot_levels, &game.data.slot_enhance);
    let bonus = game.equipment_bonus();
    game.character.restore_health(bonus);

    // 4. stage, then the combat pool that follows from it
    game.stage.initialize(&snapshot.stage, &game.data.stages);
    game.sync_combat_stage();

    // 5. quests
    game.quests.initialize(&snapshot.quests, &game.data.quests);

    game.last_exit_timestamp = snapshot.last_exit_timestamp;
}

/// Gathers every component's persisted state, stamped `now`.
pub fn collect_snapshot(game: &Game, now: i64) -> SaveSnapshot {
    SaveSnapshot {
        version: SNAPSHOT_VERSION,
        last_exit_timestamp: now,
        currency: game.ledger.balances(),
        character: game.character.collect_save_data(),
        collection: game.collection.entries().copied().collect(),
        equipped: game.collection.equipped_items().clone(),
        slot_levels: game.collection.slot_levels(),
        stage: game.stage.collect_save_data(),
        quests: game.quests.collect_save_data(),
    }
}

/// Collects, stamps and writes the snapshot. Returns once the file is on disk.
pub async fn shutdown(game: &mut Game, saves: &SaveManager) -> Result<()> {
    let now = Utc::now().timestamp();
    game.last_exit_timestamp = now;
    let snapshot = collect_snapshot(game, now);
    saves.save_async(&snapshot).await?;
    info!(path = %saves.save_path().display(), "game saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Damageable;
    use crate::core::config::CombatConfig;
    use crate::data::builtin::BUILTIN_MAX_LEVEL;
    use crate::data::{CurrencyKind, SlotCategory};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_collect_apply_round_trip() {
        let mut game = Game::new(GameConfig::default(), ReferenceData::builtin());
        game.ledger.change(CurrencyKind::Gold, 50_000);
        game.ledger.change(CurrencyKind::Gem, 3);
        let levels = game.data.levels.clone();
        game.character.gain_experience(420, &levels);
        let epic = game.data.items.get(102).unwrap().clone();
        for _ in 0..6 {
            game.collection
                .add_item(&epic, &mut game.ledger, &mut game.character);
        }
        assert!(game.equip_item(102));
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        assert!(game.try_enhance_slot(SlotCategory::Armor, &mut rng));

        let snapshot = collect_snapshot(&game, 1_700_000_000);

        let mut restored = Game::new(GameConfig::default(), ReferenceData::builtin());
        apply_snapshot(&mut restored, &snapshot);

        assert_eq!(collect_snapshot(&restored, 1_700_000_000), snapshot);
        assert!((restored.attack_power() - game.attack_power()).abs() < 1e-9);
        assert!((restored.max_health() - game.max_health()).abs() < 1e-9);
        assert_eq!(restored.character.current_health(), game.character.current_health());
    }

    #[test]
    fn test_corrupt_fields_dropped_rest_applied() {
        let mut snapshot = SaveSnapshot::new_game(0, &CombatConfig::default());
        snapshot.currency.insert(CurrencyKind::Gold, 900);
        snapshot.stage.stage_id = 999;
        snapshot.equipped.insert(SlotCategory::Weapon, 12345);

        let mut game = Game::new(GameConfig::default(), ReferenceData::builtin());
        apply_snapshot(&mut game, &snapshot);

        assert_eq!(game.ledger.amount(CurrencyKind::Gold), 900);
        assert_eq!(game.stage.stage_id(), 1);
        assert_eq!(game.collection.equipped(SlotCategory::Weapon), None);
    }

    #[test]
    fn test_out_of_range_level_capped_on_restore() {
        let mut snapshot = SaveSnapshot::new_game(0, &CombatConfig::default());
        snapshot.character.level = u32::MAX;

        let mut game = Game::new(GameConfig::default(), ReferenceData::builtin());
        apply_snapshot(&mut game, &snapshot);

        assert_eq!(game.character.level(), BUILTIN_MAX_LEVEL);
        let levels = game.data.levels.clone();
        assert_eq!(game.character.gain_experience(10, &levels), 0);
    }

    #[tokio::test]
    async fn test_start_without_save_is_new_game() {
        let dir = tempfile::tempdir().unwrap();
        let saves = SaveManager::with_path(dir.path().join("save.dat"));

        let startup = start_game(GameConfig::default(), &TableSource::Builtin, &saves).await;

        assert!(!startup.restored);
        assert_eq!(startup.idle.gold, 0);
        assert_eq!(startup.game.character.level(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_save_starts_new_game() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.dat");
        std::fs::write(&path, b"not a save file at all, definitely not").unwrap();
        let saves = SaveManager::with_path(&path);

        let startup = start_game(GameConfig::default(), &TableSource::Builtin, &saves).await;

        assert!(!startup.restored);
        assert_eq!(startup.game.ledger.amount(CurrencyKind::Gold), 0);
    }

    #[tokio::test]
    async fn test_shutdown_then_start_restores_and_pays_idle() {
        let dir = tempfile::tempdir().unwrap();
        let saves = SaveManager::with_path(dir.path().join("save.dat"));

        let mut game = Game::new(GameConfig::default(), ReferenceData::builtin());
        game.ledger.change(CurrencyKind::Gold, 1_000);
        shutdown(&mut game, &saves).await.unwrap();

        // pretend the player left two hours ago
        let mut snapshot = saves.load_async().await.unwrap().unwrap();
        snapshot.last_exit_timestamp -= 7_200;
        saves.save_async(&snapshot).await.unwrap();

        let startup = start_game(GameConfig::default(), &TableSource::Builtin, &saves).await;
        assert!(startup.restored);
        assert!(startup.idle.gold >= 72_000);
        assert_eq!(
            startup.game.ledger.amount(CurrencyKind::Gold),
            1_000 + startup.idle.gold
        );
    }
}
