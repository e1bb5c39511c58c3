//! Per-tick orchestration.
//!
//! `game_tick()` advances combat by one step and feeds what happened into
//! the quest tracker. It returns a [`TickResult`] so the runner can log or
//! display events without the simulation knowing about any presentation.

use super::game::Game;
use crate::combat::CombatEvent;
use crate::data::QuestType;
use rand::Rng;

/// A single event produced by a game tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickEvent {
    // ── Combat ──────────────────────────────────────────────────
    Combat(CombatEvent),

    // ── Progression ─────────────────────────────────────────────
    /// The character gained one or more levels this tick.
    LeveledUp { new_level: u32, levels_gained: u32 },

    /// Collection tiers gained from drops this tick.
    CollectionTierUp { tiers: u32 },
}

/// Result of processing a single game tick.
#[derive(Debug, Clone, Default)]
pub struct TickResult {
    /// Events produced during this tick, in chronological order.
    pub events: Vec<TickEvent>,
}

impl TickResult {
    pub fn kills(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TickEvent::Combat(CombatEvent::MonsterKilled { .. })))
            .count()
    }
}

/// Advances the simulation by `dt` seconds.
///
/// Pass a seeded `rand_chacha::ChaCha8Rng` in tests for deterministic
/// spawns, loot and enhancement rolls.
pub fn game_tick<R: Rng>(game: &mut Game, dt: f64, rng: &mut R) -> TickResult {
    let mut result = TickResult::default();

    let level_before = game.character.level();
    let tiers_before = game.collection.total_tiers();

    // ── 1. Combat ───────────────────────────────────────────────
    let combat_events = {
        let (combat, mut ctx) = game.combat_parts();
        combat.tick(dt, &mut ctx, rng)
    };

    // ── 2. Quest hooks ──────────────────────────────────────────
    let mut kills = 0;
    let mut stages_cleared = 0;
    for event in &combat_events {
        match event {
            CombatEvent::MonsterKilled { .. } => kills += 1,
            CombatEvent::StageCleared { .. } => stages_cleared += 1,
            _ => {}
        }
    }
    let quests = &game.data.quests;
    game.quests
        .update_progress(QuestType::DefeatMonsterCount, kills, quests);
    game.quests
        .update_progress(QuestType::ClearStage, stages_cleared, quests);

    result
        .events
        .extend(combat_events.into_iter().map(TickEvent::Combat));

    // ── 3. Progression summary ──────────────────────────────────
    let level_after = game.character.level();
    if level_after > level_before {
        let levels_gained = level_after - level_before;
        game.quests.update_progress(
            QuestType::LevelUpCharacter,
            i64::from(levels_gained),
            quests,
        );
        result.events.push(TickEvent::LeveledUp {
            new_level: level_after,
            levels_gained,
        });
    }

    let tiers_after = game.collection.total_tiers();
    if tiers_after > tiers_before {
        let tiers = tiers_after - tiers_before;
        game.quests
            .update_progress(QuestType::UpgradeCollection, i64::from(tiers), quests);
        result.events.push(TickEvent::CollectionTierUp { tiers });
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GameConfig;
    use crate::core::constants::TICK_INTERVAL_MS;
    use crate::data::ReferenceData;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const DT: f64 = TICK_INTERVAL_MS as f64 / 1000.0;

    #[test]
    fn test_ticks_produce_kills_and_quest_progress() {
        let mut game = Game::new(GameConfig::default(), ReferenceData::builtin());
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let mut kills = 0;
        for _ in 0..600 {
            kills += game_tick(&mut game, DT, &mut rng).kills();
        }

        assert!(kills > 0);
        // quest 1 is the built-in repeatable kill counter (target 50)
        let progress = game.quests.progress(1).unwrap();
        assert_eq!(progress.value, kills as i64);
    }

    #[test]
    fn test_zero_dt_is_noop() {
        let mut game = Game::new(GameConfig::default(), ReferenceData::builtin());
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let result = game_tick(&mut game, 0.0, &mut rng);
        assert!(result.events.is_empty());
        assert!(game.combat.roster().is_empty());
    }
}
