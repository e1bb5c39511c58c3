//! Character progression: level, experience, stats and health.

pub mod progression;
pub mod stats;

pub use progression::{Character, CharacterEvent, CharacterSave};
pub use stats::{Damageable, StatBonus};
