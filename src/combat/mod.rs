//! Combat simulation: spawning, auto-attack, kills and loot.

pub mod logic;
pub mod loot;
pub mod types;

pub use logic::{CombatContext, CombatSimulator};
pub use loot::roll_loot;
pub use types::{CombatEvent, Combatant, MonsterInstance};
