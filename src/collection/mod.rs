//! Equipment collection, auto-sell, equip slots and slot enhancement.

pub mod logic;
pub mod slots;
pub mod types;

pub use logic::CollectionEngine;
pub use types::{AcquireOutcome, CollectionEntry, CollectionEvent};
