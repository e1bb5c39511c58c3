use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Flat attack/health bonus from equipment, collection tiers or slot upgrades.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatBonus {
    pub attack: f64,
    pub health: f64,
}

impl StatBonus {
    pub fn new(attack: f64, health: f64) -> Self {
        Self { attack, health }
    }

    /// The same bonus scaled by `factor`.
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            attack: self.attack * factor,
            health: self.health * factor,
        }
    }
}

impl Add for StatBonus {
    type Output = StatBonus;

    fn add(self, rhs: StatBonus) -> StatBonus {
        StatBonus {
            attack: self.attack + rhs.attack,
            health: self.health + rhs.health,
        }
    }
}

impl AddAssign for StatBonus {
    fn add_assign(&mut self, rhs: StatBonus) {
        self.attack += rhs.attack;
        self.health += rhs.health;
    }
}

/// Anything that can take hits in combat.
///
/// `bonus` is the live equipment bonus for targets whose maximum health
/// depends on it. Targets without equipment ignore it.
pub trait Damageable {
    fn current_health(&self) -> f64;

    fn max_health_with(&self, bonus: StatBonus) -> f64;

    /// Subtracts `amount`, flooring at zero. Ignored when the target is
    /// already dead or `amount` is not positive.
    fn take_damage(&mut self, amount: f64, bonus: StatBonus);

    fn is_dead(&self) -> bool;

    fn is_alive(&self) -> bool {
        !self.is_dead()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bonus_sum_and_scale() {
        let mut total = StatBonus::new(10.0, 50.0) + StatBonus::new(2.0, 0.0);
        total += StatBonus::new(0.0, 10.0);
        assert_eq!(total, StatBonus::new(12.0, 60.0));

        let five_percent = StatBonus::new(40.0, 200.0).scaled(0.05);
        assert!((five_percent.attack - 2.0).abs() < 1e-9);
        assert!((five_percent.health - 10.0).abs() < 1e-9);
    }
}
