use crate::core::events::Observers;
use crate::data::{StageRow, StageTable};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// What the combat simulator needs to know about the active stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageSpawnConfig {
    pub stage_id: u32,
    pub monster_ids: Vec<u32>,
    pub gold_multiplier: f64,
    pub exp_multiplier: f64,
}

impl From<&StageRow> for StageSpawnConfig {
    fn from(row: &StageRow) -> Self {
        Self {
            stage_id: row.stage_id,
            monster_ids: row.monster_ids.clone(),
            gold_multiplier: row.gold_multiplier,
            exp_multiplier: row.exp_multiplier,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageEvent {
    ProgressChanged { kills: u32, required: u32, stage_id: u32 },
    StageChanged { stage_id: u32 },
}

/// Result of a kill that completed a stage and moved to the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct StageAdvance {
    pub cleared_stage: u32,
    pub was_boss: bool,
    pub next: StageSpawnConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageSave {
    pub stage_id: u32,
    pub kill_count: u32,
}

impl Default for StageSave {
    fn default() -> Self {
        Self {
            stage_id: 1,
            kill_count: 0,
        }
    }
}

/// Current stage and kills made in it.
#[derive(Debug)]
pub struct StageProgress {
    stage_id: u32,
    kill_count: u32,
    final_stage_logged: bool,
    pub observers: Observers<StageEvent>,
}

impl Default for StageProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl StageProgress {
    pub fn new() -> Self {
        Self {
            stage_id: 1,
            kill_count: 0,
            final_stage_logged: false,
            observers: Observers::new(),
        }
    }

    pub fn stage_id(&self) -> u32 {
        self.stage_id
    }

    pub fn kill_count(&self) -> u32 {
        self.kill_count
    }

    pub fn current_config(&self, stages: &StageTable) -> Option<StageSpawnConfig> {
        stages.get(self.stage_id).map(StageSpawnConfig::from)
    }

    /// Counts a kill. Returns the new stage when this kill cleared the
    /// current one and a next stage exists.
    pub fn on_monster_killed(&mut self, stages: &StageTable) -> Option<StageAdvance> {
        let Some(current) = stages.get(self.stage_id) else {
            debug!(stage_id = self.stage_id, "kill ignored, stage not in table");
            return None;
        };
        let required = current.required_kill_count;

        if self.kill_count >= required && self.final_stage_logged {
            return None;
        }
        self.kill_count = (self.kill_count + 1).min(required);
        self.observers.emit(&StageEvent::ProgressChanged {
            kills: self.kill_count,
            required,
            stage_id: self.stage_id,
        });
        if self.kill_count < required {
            return None;
        }

        let next_id = self.stage_id + 1;
        let Some(next) = stages.get(next_id) else {
            if !self.final_stage_logged {
                warn!(stage_id = self.stage_id, "no stage after this one, max stage reached");
                self.final_stage_logged = true;
            }
            return None;
        };

        let cleared_stage = self.stage_id;
        let was_boss = current.is_boss_stage;
        if was_boss {
            info!(stage_id = cleared_stage, "boss stage cleared, next chapter unlocked");
        } else {
            info!(stage_id = cleared_stage, "stage cleared");
        }

        self.enter(next);
        Some(StageAdvance {
            cleared_stage,
            was_boss,
            next: StageSpawnConfig::from(next),
        })
    }

    fn enter(&mut self, row: &StageRow) {
        self.stage_id = row.stage_id;
        self.kill_count = 0;
        self.final_stage_logged = false;
        info!(stage_id = row.stage_id, name = %row.name, "entered stage");
        self.observers.emit(&StageEvent::StageChanged {
            stage_id: row.stage_id,
        });
        self.observers.emit(&StageEvent::ProgressChanged {
            kills: 0,
            required: row.required_kill_count,
            stage_id: row.stage_id,
        });
    }

    /// Restores progress. An unknown stage falls back to stage 1 and an
    /// over-full kill count is clamped to the stage requirement.
    pub fn initialize(&mut self, save: &StageSave, stages: &StageTable) {
        let (stage_id, kill_count) = if stages.contains(save.stage_id) {
            (save.stage_id, save.kill_count)
        } else {
            warn!(stage_id = save.stage_id, "saved stage not in table, starting at stage 1");
            (1, 0)
        };

        self.stage_id = stage_id;
        self.final_stage_logged = false;
        let required = stages
            .get(stage_id)
            .map_or(0, |row| row.required_kill_count);
        self.kill_count = kill_count.min(required);

        self.observers.emit(&StageEvent::StageChanged { stage_id });
        self.observers.emit(&StageEvent::ProgressChanged {
            kills: self.kill_count,
            required,
            stage_id,
        });
    }

    pub fn collect_save_data(&self) -> StageSave {
        StageSave {
            stage_id: self.stage_id,
            kill_count: self.kill_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(stage_id: u32, required: u32, boss: bool) -> StageRow {
        StageRow {
            stage_id,
            name: format!("Stage {stage_id}"),
            monster_ids: vec![stage_id],
            required_kill_count: required,
            is_boss_stage: boss,
            boss_monster_id: None,
            gold_multiplier: 1.0 + stage_id as f64,
            exp_multiplier: 1.0,
        }
    }

    fn stages() -> StageTable {
        StageTable::from_rows(vec![row(1, 3, false), row(2, 2, true)])
    }

    #[test]
    fn test_advances_after_required_kills() {
        let table = stages();
        let mut progress = StageProgress::new();

        assert!(progress.on_monster_killed(&table).is_none());
        assert!(progress.on_monster_killed(&table).is_none());
        let advance = progress.on_monster_killed(&table).unwrap();

        assert_eq!(advance.cleared_stage, 1);
        assert!(!advance.was_boss);
        assert_eq!(advance.next.stage_id, 2);
        assert_eq!(advance.next.monster_ids, vec![2]);
        assert_eq!(progress.stage_id(), 2);
        assert_eq!(progress.kill_count(), 0);
    }

    #[test]
    fn test_missing_next_stage_holds_at_max() {
        let table = stages();
        let mut progress = StageProgress::new();
        progress.initialize(&StageSave { stage_id: 2, kill_count: 0 }, &table);

        for _ in 0..10 {
            assert!(progress.on_monster_killed(&table).is_none());
        }
        assert_eq!(progress.stage_id(), 2);
        assert_eq!(progress.kill_count(), 2);
    }

    #[test]
    fn test_unknown_saved_stage_falls_back() {
        let table = stages();
        let mut progress = StageProgress::new();
        progress.initialize(&StageSave { stage_id: 40, kill_count: 7 }, &table);
        assert_eq!(progress.collect_save_data(), StageSave::default());
    }

    #[test]
    fn test_restore_clamps_kill_count() {
        let table = stages();
        let mut progress = StageProgress::new();
        progress.initialize(&StageSave { stage_id: 1, kill_count: 99 }, &table);
        assert_eq!(progress.kill_count(), 3);
    }

    #[test]
    fn test_empty_table_never_panics() {
        let mut progress = StageProgress::new();
        assert!(progress.on_monster_killed(&StageTable::default()).is_none());
        assert_eq!(progress.kill_count(), 0);
    }
}
