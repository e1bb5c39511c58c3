//! Character level, experience, stats and health.
//!
//! The character is `Alive` while current health is above zero. Death is
//! terminal until [`Character::revive`] is called from outside the core.

use super::stats::{Damageable, StatBonus};
use crate::core::events::Observers;
use crate::data::LevelTable;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CharacterEvent {
    LevelUp { level: u32 },
    /// `required` is `None` at max level.
    ExpChanged { current: u64, required: Option<u64> },
    StatsRecalculated,
    HealthChanged { current: f64, max: f64 },
    Died,
}

/// Persisted character fields. The equipment bonus is never stored here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterSave {
    pub level: u32,
    pub experience: u64,
    pub base_attack: f64,
    pub base_health: f64,
    pub permanent_attack: f64,
    pub permanent_health: f64,
    pub current_health: f64,
}

#[derive(Debug)]
pub struct Character {
    level: u32,
    experience: u64,
    base_attack: f64,
    base_health: f64,
    permanent: StatBonus,
    current_health: f64,
    dead: bool,
    pub observers: Observers<CharacterEvent>,
}

impl Character {
    pub fn new(base_attack: f64, base_health: f64) -> Self {
        Self {
            level: 1,
            experience: 0,
            base_attack,
            base_health,
            permanent: StatBonus::default(),
            current_health: base_health,
            dead: false,
            observers: Observers::new(),
        }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn experience(&self) -> u64 {
        self.experience
    }

    pub fn base_attack(&self) -> f64 {
        self.base_attack
    }

    pub fn base_health(&self) -> f64 {
        self.base_health
    }

    pub fn permanent_bonus(&self) -> StatBonus {
        self.permanent
    }

    pub fn attack_power(&self, equipment: StatBonus) -> f64 {
        self.base_attack + self.permanent.attack + equipment.attack
    }

    pub fn max_health(&self, equipment: StatBonus) -> f64 {
        self.base_health + self.permanent.health + equipment.health
    }

    /// Experience needed for the next level, `None` at max level.
    pub fn required_exp_to_next_level(&self, levels: &LevelTable) -> Option<u64> {
        levels.required_exp(self.level.checked_add(1)?)
    }

    /// Adds experience and levels up as long as the table allows.
    /// Returns the number of levels gained.
    pub fn gain_experience(&mut self, amount: i64, levels: &LevelTable) -> u32 {
        if amount <= 0 {
            return 0;
        }

        self.experience = self.experience.saturating_add(amount as u64);
        debug!(gained = amount, total = self.experience, "experience gained");
        self.observers.emit(&CharacterEvent::ExpChanged {
            current: self.experience,
            required: self.required_exp_to_next_level(levels),
        });

        let mut gained = 0;
        while let Some(row) = self.level.checked_add(1).and_then(|next| levels.get(next)) {
            if self.experience < row.required_exp {
                break;
            }
            self.experience -= row.required_exp;
            self.level += 1;
            self.base_attack += row.attack_increase;
            self.base_health += row.health_increase;
            if !self.dead {
                self.current_health += row.health_increase;
            }
            gained += 1;

            info!(level = self.level, "level up");
            self.observers.emit(&CharacterEvent::LevelUp { level: self.level });
            self.observers.emit(&CharacterEvent::ExpChanged {
                current: self.experience,
                required: self.required_exp_to_next_level(levels),
            });
        }
        gained
    }

    /// Permanent attack/health gain from collection tiers or slot upgrades.
    pub fn apply_base_stat_upgrade(&mut self, attack: f64, health: f64) {
        self.permanent += StatBonus::new(attack, health);
        if !self.dead {
            self.current_health += health.max(0.0);
        }
        debug!(attack, health, "permanent stat upgrade");
        self.observers.emit(&CharacterEvent::StatsRecalculated);
    }

    /// Tells observers that derived stats changed without a stored change
    /// (equipment swaps). Current health is clamped to the new maximum.
    pub fn recalculate_stats(&mut self, equipment: StatBonus) {
        let max = self.max_health(equipment);
        if self.current_health > max {
            self.current_health = max;
        }
        self.observers.emit(&CharacterEvent::StatsRecalculated);
    }

    pub fn apply_damage(&mut self, amount: f64, equipment: StatBonus) {
        if self.dead || amount <= 0.0 {
            return;
        }

        self.current_health = (self.current_health - amount).max(0.0);
        self.observers.emit(&CharacterEvent::HealthChanged {
            current: self.current_health,
            max: self.max_health(equipment),
        });

        if self.current_health <= 0.0 {
            self.dead = true;
            info!(level = self.level, "character died");
            self.observers.emit(&CharacterEvent::Died);
        }
    }

    /// Brings a dead character back at full health.
    pub fn revive(&mut self, equipment: StatBonus) {
        if !self.dead {
            return;
        }
        self.dead = false;
        self.current_health = self.max_health(equipment);
        info!("character revived");
        self.observers.emit(&CharacterEvent::HealthChanged {
            current: self.current_health,
            max: self.current_health,
        });
    }

    pub fn collect_save_data(&self) -> CharacterSave {
        CharacterSave {
            level: self.level,
            experience: self.experience,
            base_attack: self.base_attack,
            base_health: self.base_health,
            permanent_attack: self.permanent.attack,
            permanent_health: self.permanent.health,
            current_health: self.current_health,
        }
    }

    /// Restores stored fields. Health is resolved later by
    /// [`Character::restore_health`] once equipment is known.
    ///
    /// The level is kept within `1..=` the table's highest level. An empty
    /// table (failed load) leaves the saved level as is.
    pub fn initialize(&mut self, save: &CharacterSave, levels: &LevelTable) {
        let mut level = save.level;
        if level == 0 {
            warn!("saved level 0 is invalid, using level 1");
            level = 1;
        }
        if let Some(max) = levels.max_level() {
            if level > max {
                warn!(saved = level, max, "saved level above the level table, capped");
                level = max.max(1);
            }
        }
        self.level = level;
        self.experience = save.experience;
        self.base_attack = save.base_attack;
        self.base_health = save.base_health;
        self.permanent = StatBonus::new(
            save.permanent_attack.max(0.0),
            save.permanent_health.max(0.0),
        );
        self.current_health = save.current_health;
        self.dead = false;
        self.observers.emit(&CharacterEvent::StatsRecalculated);
    }

    /// Clamps restored health into `(0, max]`; a non-positive stored value
    /// restarts at full health.
    pub fn restore_health(&mut self, equipment: StatBonus) {
        let max = self.max_health(equipment);
        self.current_health = if self.current_health > 0.0 {
            self.current_health.min(max)
        } else {
            max
        };
        self.dead = false;
        self.observers.emit(&CharacterEvent::HealthChanged {
            current: self.current_health,
            max,
        });
    }
}

impl Damageable for Character {
    fn current_health(&self) -> f64 {
        self.current_health
    }

    fn max_health_with(&self, bonus: StatBonus) -> f64 {
        self.max_health(bonus)
    }

    fn take_damage(&mut self, amount: f64, bonus: StatBonus) {
        self.apply_damage(amount, bonus);
    }

    fn is_dead(&self) -> bool {
        self.dead
    }
}
