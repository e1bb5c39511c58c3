//! Fixed-step combat: spawning, cooldowns, damage exchange and kill rewards.

use super::loot::roll_loot;
use super::types::*;
use crate::character::{Character, Damageable, StatBonus};
use crate::collection::CollectionEngine;
use crate::core::config::CombatConfig;
use crate::core::constants::SIM_EPSILON;
use crate::core::events::Observers;
use crate::data::{CurrencyKind, ReferenceData};
use crate::economy::CurrencyLedger;
use crate::stage::{StageProgress, StageSpawnConfig};
use rand::Rng;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Collaborators a combat step reads and credits.
pub struct CombatContext<'a> {
    pub data: &'a ReferenceData,
    pub ledger: &'a mut CurrencyLedger,
    pub character: &'a mut Character,
    pub collection: &'a mut CollectionEngine,
    pub stage: &'a mut StageProgress,
}

#[derive(Debug)]
pub struct CombatSimulator {
    config: CombatConfig,
    stage: Option<StageSpawnConfig>,
    roster: VecDeque<MonsterInstance>,
    spawn_timer: f64,
    player_cooldown: f64,
    next_instance_id: u64,
    battle_active: bool,
    /// Emitted only when the value changes.
    pub battle_observers: Observers<bool>,
    /// Monster definition id of every kill.
    pub kill_observers: Observers<u32>,
}

impl CombatSimulator {
    pub fn new(config: CombatConfig) -> Self {
        Self {
            config,
            stage: None,
            roster: VecDeque::new(),
            spawn_timer: 0.0,
            player_cooldown: 0.0,
            next_instance_id: 1,
            battle_active: false,
            battle_observers: Observers::new(),
            kill_observers: Observers::new(),
        }
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Replaces the spawn pool and reward multipliers. Monsters already on
    /// the field stay.
    pub fn set_stage(&mut self, stage: StageSpawnConfig) {
        debug!(stage_id = stage.stage_id, pool = ?stage.monster_ids, "combat stage configured");
        self.stage = Some(stage);
    }

    pub fn stage(&self) -> Option<&StageSpawnConfig> {
        self.stage.as_ref()
    }

    /// Monster health multiplier for a stage: 1 at stage 1, rising linearly.
    pub fn difficulty_multiplier(&self, stage_id: u32) -> f64 {
        1.0 + f64::from(stage_id.saturating_sub(1)) * self.config.stage_difficulty_step
    }

    pub fn roster(&self) -> &VecDeque<MonsterInstance> {
        &self.roster
    }

    pub fn front(&self) -> Option<&MonsterInstance> {
        self.roster.front()
    }

    pub fn is_battle_active(&self) -> bool {
        self.battle_active
    }

    /// Advances combat by `dt` seconds.
    pub fn tick<R: Rng>(
        &mut self,
        dt: f64,
        ctx: &mut CombatContext<'_>,
        rng: &mut R,
    ) -> Vec<CombatEvent> {
        let mut events = Vec::new();
        if dt <= 0.0 {
            return events;
        }

        self.update_spawning(dt, ctx.data, rng, &mut events);
        self.advance_monsters(dt);
        self.update_battle_state(&mut events);

        let bonus = ctx.collection.equipment_bonus(&ctx.data.items);
        self.update_monster_attack(dt, ctx.character, bonus, &mut events);
        self.update_player_attack(dt, ctx, bonus, rng, &mut events);
        self.update_battle_state(&mut events);

        events
    }

    fn update_spawning<R: Rng>(
        &mut self,
        dt: f64,
        data: &ReferenceData,
        rng: &mut R,
        events: &mut Vec<CombatEvent>,
    ) {
        let interval = self.config.spawn_interval;
        self.spawn_timer += dt;
        if self.roster.len() >= self.config.max_active_monsters {
            // a freed slot is filled on the next tick, not in a burst
            self.spawn_timer = self.spawn_timer.min(interval);
            return;
        }
        if self.spawn_timer + SIM_EPSILON < interval {
            return;
        }
        self.spawn_timer = (self.spawn_timer - interval).max(0.0);

        let Some(stage) = &self.stage else {
            return;
        };
        if stage.monster_ids.is_empty() {
            return;
        }
        let monster_id = stage.monster_ids[rng.gen_range(0..stage.monster_ids.len())];
        let Some(def) = data.monsters.get(monster_id) else {
            warn!(monster_id, stage_id = stage.stage_id, "stage pool references unknown monster");
            return;
        };

        let difficulty = self.difficulty_multiplier(stage.stage_id);
        let instance_id = self.next_instance_id;
        self.next_instance_id += 1;
        let monster = MonsterInstance::spawn(
            def,
            instance_id,
            difficulty,
            self.config.spawn_distance,
            self.config.monster_attack_interval,
        );
        debug!(monster = %def.name, instance_id, health = monster.max_health, "monster spawned");
        self.roster.push_back(monster);
        events.push(CombatEvent::MonsterSpawned {
            monster_id,
            instance_id,
        });
    }

    fn advance_monsters(&mut self, dt: f64) {
        let step = self.config.move_speed * dt;
        for monster in &mut self.roster {
            monster.distance = (monster.distance - step).max(0.0);
        }
    }

    fn update_battle_state(&mut self, events: &mut Vec<CombatEvent>) {
        let active = self
            .roster
            .front()
            .is_some_and(|m| m.in_range(self.config.attack_range));
        if active != self.battle_active {
            self.battle_active = active;
            self.battle_observers.emit(&active);
            events.push(CombatEvent::BattleActiveChanged(active));
        }
    }

    fn update_monster_attack(
        &mut self,
        dt: f64,
        character: &mut Character,
        bonus: StatBonus,
        events: &mut Vec<CombatEvent>,
    ) {
        let attack_range = self.config.attack_range;
        let interval = self.config.monster_attack_interval;
        let Some(monster) = self.roster.front_mut() else {
            return;
        };
        if !monster.in_range(attack_range) {
            return;
        }

        monster.attack_cooldown -= dt;
        if monster.attack_cooldown > SIM_EPSILON {
            return;
        }
        monster.attack_cooldown = (monster.attack_cooldown + interval).max(0.0);

        let mut player = Combatant::Player(character);
        if !player.is_alive() {
            return;
        }
        let died = player.receive_hit(monster.damage, bonus);
        events.push(CombatEvent::MonsterAttack {
            monster_id: monster.monster_id,
            damage: monster.damage,
        });
        if died {
            events.push(CombatEvent::PlayerDied);
        }
    }

    fn update_player_attack<R: Rng>(
        &mut self,
        dt: f64,
        ctx: &mut CombatContext<'_>,
        bonus: StatBonus,
        rng: &mut R,
        events: &mut Vec<CombatEvent>,
    ) {
        // a ready cooldown waits at zero; overshoot past zero carries over
        if self.player_cooldown > SIM_EPSILON {
            self.player_cooldown -= dt;
        }
        if ctx.character.is_dead() || self.roster.is_empty() {
            self.player_cooldown = self.player_cooldown.max(0.0);
            return;
        }
        if self.player_cooldown > SIM_EPSILON {
            return;
        }
        self.player_cooldown =
            (self.player_cooldown + self.config.player_attack_interval).max(0.0);

        let damage = ctx.character.attack_power(bonus);
        let Some(front) = self.roster.front_mut() else {
            return;
        };
        let killed = Combatant::Monster(front).receive_hit(damage, bonus);
        events.push(CombatEvent::PlayerAttack { damage });

        if killed {
            self.resolve_kill(ctx, rng, events);
        }
    }

    /// Pays out the front monster, removes it and counts the kill.
    fn resolve_kill<R: Rng>(
        &mut self,
        ctx: &mut CombatContext<'_>,
        rng: &mut R,
        events: &mut Vec<CombatEvent>,
    ) {
        let Some(monster) = self.roster.pop_front() else {
            return;
        };
        let (gold_multiplier, exp_multiplier) = self
            .stage
            .as_ref()
            .map_or((1.0, 1.0), |s| (s.gold_multiplier, s.exp_multiplier));

        let mut gold = 0;
        let mut exp = 0;
        let mut drop = None;
        if let Some(def) = ctx.data.monsters.get(monster.monster_id) {
            gold = (def.gold_reward as f64 * gold_multiplier).floor() as i64;
            exp = (def.exp_reward as f64 * exp_multiplier).floor() as i64;

            if gold > 0 {
                ctx.ledger.change(CurrencyKind::Gold, gold);
            }
            ctx.character.gain_experience(exp, &ctx.data.levels);

            drop = roll_loot(&def.drop_table, rng);
            if let Some(item_id) = drop {
                match ctx.data.items.get(item_id) {
                    Some(item) => {
                        ctx.collection.add_item(item, ctx.ledger, ctx.character);
                    }
                    None => {
                        warn!(item_id, monster_id = def.monster_id, "drop table references unknown item");
                        drop = None;
                    }
                }
            }
            debug!(monster = %def.name, gold, exp, ?drop, "monster killed");
        } else {
            warn!(monster_id = monster.monster_id, "killed monster missing from table, no rewards");
        }

        if let Some(advance) = ctx.stage.on_monster_killed(&ctx.data.stages) {
            events.push(CombatEvent::StageCleared {
                stage_id: advance.cleared_stage,
                was_boss: advance.was_boss,
            });
            info!(stage_id = advance.next.stage_id, "spawn pool switched to new stage");
            self.set_stage(advance.next);
        }

        self.kill_observers.emit(&monster.monster_id);
        events.push(CombatEvent::MonsterKilled {
            monster_id: monster.monster_id,
            gold,
            exp,
            drop,
        });
    }

    /// Clears the field, e.g. after the character is revived.
    pub fn reset_field(&mut self) {
        self.roster.clear();
        self.spawn_timer = 0.0;
        self.player_cooldown = 0.0;
        if self.battle_active {
            self.battle_active = false;
            self.battle_observers.emit(&false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::CollectionConfig;
    use crate::data::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn test_data() -> ReferenceData {
        ReferenceData {
            levels: LevelTable::from_rows(vec![LevelRow {
                level: 2,
                required_exp: 10,
                attack_increase: 1.0,
                health_increase: 5.0,
            }]),
            stages: StageTable::from_rows(vec![
                StageRow {
                    stage_id: 1,
                    name: "One".to_string(),
                    monster_ids: vec![1],
                    required_kill_count: 2,
                    is_boss_stage: false,
                    boss_monster_id: None,
                    gold_multiplier: 1.5,
                    exp_multiplier: 1.0,
                },
                StageRow {
                    stage_id: 2,
                    name: "Two".to_string(),
                    monster_ids: vec![1],
                    required_kill_count: 100,
                    is_boss_stage: false,
                    boss_monster_id: None,
                    gold_multiplier: 1.0,
                    exp_multiplier: 1.0,
                },
            ]),
            monsters: MonsterTable::from_rows(vec![MonsterRow {
                monster_id: 1,
                name: "Slime".to_string(),
                base_health: 10.0,
                base_damage: 1.0,
                gold_reward: 5,
                exp_reward: 3,
                drop_table: Vec::new(),
            }]),
            ..ReferenceData::default()
        }
    }

    struct World {
        data: ReferenceData,
        ledger: CurrencyLedger,
        character: Character,
        collection: CollectionEngine,
        stage: StageProgress,
        combat: CombatSimulator,
    }

    impl World {
        fn new() -> Self {
            Self::with(test_data(), CombatConfig::default())
        }

        fn with(data: ReferenceData, config: CombatConfig) -> Self {
            let mut combat = CombatSimulator::new(config);
            let stage = StageProgress::new();
            if let Some(config) = stage.current_config(&data.stages) {
                combat.set_stage(config);
            }
            Self {
                data,
                ledger: CurrencyLedger::new(),
                character: Character::new(10.0, 100.0),
                collection: CollectionEngine::new(CollectionConfig::default()),
                stage,
                combat,
            }
        }

        fn run(&mut self, seconds: f64, rng: &mut ChaCha8Rng) -> Vec<CombatEvent> {
            let mut all = Vec::new();
            let steps = (seconds / 0.1).round() as usize;
            for _ in 0..steps {
                let mut ctx = CombatContext {
                    data: &self.data,
                    ledger: &mut self.ledger,
                    character: &mut self.character,
                    collection: &mut self.collection,
                    stage: &mut self.stage,
                };
                all.extend(self.combat.tick(0.1, &mut ctx, rng));
            }
            all
        }
    }

    #[test]
    fn test_spawns_up_to_capacity() {
        let mut world = World::new();
        world.character.apply_damage(1_000.0, StatBonus::default());
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        world.run(20.0, &mut rng);
        assert_eq!(
            world.combat.roster().len(),
            crate::core::constants::MAX_ACTIVE_MONSTERS
        );
    }

    #[test]
    fn test_kills_pay_gold_exp_and_advance_stage() {
        let mut world = World::new();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let events = world.run(5.0, &mut rng);

        let kills = events
            .iter()
            .filter(|e| matches!(e, CombatEvent::MonsterKilled { .. }))
            .count();
        assert!(kills >= 2, "kills: {kills}");
        assert!(events
            .iter()
            .any(|e| matches!(e, CombatEvent::StageCleared { stage_id: 1, .. })));
        assert_eq!(world.stage.stage_id(), 2);
        assert_eq!(world.combat.stage().map(|s| s.stage_id), Some(2));
        // first two kills at 1.5x gold: floor(7.5) each
        assert!(world.ledger.amount(CurrencyKind::Gold) >= 14);
        if 3 * kills >= 10 {
            assert_eq!(world.character.level(), 2);
        }
    }

    #[test]
    fn test_dead_character_does_not_fight() {
        let mut world = World::new();
        world.character.apply_damage(1_000.0, StatBonus::default());
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let events = world.run(15.0, &mut rng);

        assert!(!events.iter().any(|e| matches!(
            e,
            CombatEvent::PlayerAttack { .. } | CombatEvent::MonsterAttack { .. }
        )));
        assert_eq!(world.ledger.amount(CurrencyKind::Gold), 0);
    }

    #[test]
    fn test_battle_active_emitted_on_change_only() {
        let mut world = World::new();
        world.character.apply_damage(1_000.0, StatBonus::default());
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let events = world.run(30.0, &mut rng);
        let toggles: Vec<bool> = events
            .iter()
            .filter_map(|e| match e {
                CombatEvent::BattleActiveChanged(v) => Some(*v),
                _ => None,
            })
            .collect();
        assert_eq!(toggles, vec![true]);
        assert!(world.combat.is_battle_active());
    }

    #[test]
    fn test_difficulty_multiplier_grows_per_stage() {
        let combat = CombatSimulator::new(CombatConfig::default());
        assert!((combat.difficulty_multiplier(1) - 1.0).abs() < 1e-9);
        assert!((combat.difficulty_multiplier(3) - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_cadence_matches_configured_intervals() {
        let mut data = test_data();
        data.monsters = MonsterTable::from_rows(vec![MonsterRow {
            monster_id: 1,
            name: "Stone Golem".to_string(),
            base_health: 1e12,
            base_damage: 1.0,
            gold_reward: 0,
            exp_reward: 0,
            drop_table: Vec::new(),
        }]);
        let config = CombatConfig {
            spawn_distance: 0.0,
            ..CombatConfig::default()
        };
        let mut world = World::with(data, config);
        world.character = Character::new(10.0, 1e9);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let mut first_spawn = None;
        let mut player_attacks = 0;
        let mut monster_attacks = 0;
        for tick in 1..=600 {
            for event in world.run(0.1, &mut rng) {
                match event {
                    CombatEvent::MonsterSpawned { .. } if first_spawn.is_none() => {
                        first_spawn = Some(tick)
                    }
                    CombatEvent::PlayerAttack { .. } => player_attacks += 1,
                    CombatEvent::MonsterAttack { .. } => monster_attacks += 1,
                    _ => {}
                }
            }
        }

        // 1.0 s spawn interval at 0.1 s ticks
        assert_eq!(first_spawn, Some(10));
        // every 0.5 s from tick 10 through tick 600
        assert_eq!(player_attacks, 119);
        // every 1.0 s, first one a full interval after spawning
        assert_eq!(monster_attacks, 59);
    }

    #[test]
    fn test_no_stage_no_spawn() {
        let mut world = World::new();
        world.combat = CombatSimulator::new(CombatConfig::default());
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        world.run(5.0, &mut rng);
        assert!(world.combat.roster().is_empty());
    }
}
