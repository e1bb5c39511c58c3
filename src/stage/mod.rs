//! Stage gating: kill counting and advancement.

pub mod progress;

pub use progress::{StageAdvance, StageEvent, StageProgress, StageSave, StageSpawnConfig};
