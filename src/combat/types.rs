use crate::character::{Character, Damageable, StatBonus};
use crate::core::constants::SIM_EPSILON;
use crate::data::MonsterRow;

/// A live monster on the battlefield. Owned by the combat roster only.
#[derive(Debug, Clone, PartialEq)]
pub struct MonsterInstance {
    pub monster_id: u32,
    pub instance_id: u64,
    pub current_health: f64,
    pub max_health: f64,
    pub damage: f64,
    /// Distance to the player; the roster is ordered by arrival.
    pub distance: f64,
    pub attack_cooldown: f64,
}

impl MonsterInstance {
    pub fn spawn(
        def: &MonsterRow,
        instance_id: u64,
        difficulty: f64,
        distance: f64,
        attack_interval: f64,
    ) -> Self {
        let max_health = def.base_health * difficulty;
        Self {
            monster_id: def.monster_id,
            instance_id,
            current_health: max_health,
            max_health,
            damage: def.base_damage,
            distance,
            attack_cooldown: attack_interval,
        }
    }

    pub fn in_range(&self, attack_range: f64) -> bool {
        self.distance <= attack_range + SIM_EPSILON
    }
}

impl Damageable for MonsterInstance {
    fn current_health(&self) -> f64 {
        self.current_health
    }

    fn max_health_with(&self, _bonus: StatBonus) -> f64 {
        self.max_health
    }

    fn take_damage(&mut self, amount: f64, _bonus: StatBonus) {
        if self.is_dead() || amount <= 0.0 {
            return;
        }
        self.current_health = (self.current_health - amount).max(0.0);
    }

    fn is_dead(&self) -> bool {
        self.current_health <= 0.0
    }
}

/// Either side of a fight, borrowed for one exchange.
pub enum Combatant<'a> {
    Player(&'a mut Character),
    Monster(&'a mut MonsterInstance),
}

impl Combatant<'_> {
    fn target(&mut self) -> &mut dyn Damageable {
        match self {
            Combatant::Player(character) => &mut **character,
            Combatant::Monster(monster) => &mut **monster,
        }
    }

    /// Hits this combatant. Returns true if the hit killed it.
    pub fn receive_hit(&mut self, amount: f64, bonus: StatBonus) -> bool {
        let target = self.target();
        if target.is_dead() {
            return false;
        }
        target.take_damage(amount, bonus);
        target.is_dead()
    }

    pub fn is_alive(&mut self) -> bool {
        self.target().is_alive()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CombatEvent {
    MonsterSpawned {
        monster_id: u32,
        instance_id: u64,
    },
    PlayerAttack {
        damage: f64,
    },
    MonsterAttack {
        monster_id: u32,
        damage: f64,
    },
    MonsterKilled {
        monster_id: u32,
        gold: i64,
        exp: i64,
        drop: Option<u32>,
    },
    PlayerDied,
    BattleActiveChanged(bool),
    StageCleared {
        stage_id: u32,
        was_boss: bool,
    },
}
