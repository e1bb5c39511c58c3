//! Quest progress and reward claiming.

pub mod tracker;

pub use tracker::{QuestEvent, QuestProgress, QuestTracker};
