//! Asynchronous reference table loading.
//!
//! Every table lives in its own `<table>.json` file (a JSON array of rows)
//! under one data directory. All tables load concurrently. A table that
//! fails to load is logged and replaced by an empty table so the other
//! subsystems still start.

use super::tables::{ReferenceData, Table, TableRow};
use super::types::{ItemDef, LevelRow, MonsterRow, QuestDef, SlotEnhanceRow, StageRow};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("failed to read table '{table}': {source}")]
    Io {
        table: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse table '{table}': {source}")]
    Parse {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub struct TableLoader {
    data_dir: PathBuf,
}

impl TableLoader {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn table_path<R: TableRow>(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", R::TABLE_NAME))
    }

    /// Loads and indexes a single table.
    pub async fn load_table<R>(&self) -> Result<Table<R>, TableLoadError>
    where
        R: TableRow + DeserializeOwned,
    {
        let path = self.table_path::<R>();
        let json = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| TableLoadError::Io {
                table: R::TABLE_NAME,
                source,
            })?;
        let rows: Vec<R> = serde_json::from_str(&json).map_err(|source| TableLoadError::Parse {
            table: R::TABLE_NAME,
            source,
        })?;
        Ok(Table::from_rows(rows))
    }

    /// Starts every table load at once and waits for all of them.
    pub async fn load_all(&self) -> ReferenceData {
        let (levels, slot_enhance, stages, monsters, items, quests) = tokio::join!(
            self.load_table::<LevelRow>(),
            self.load_table::<SlotEnhanceRow>(),
            self.load_table::<StageRow>(),
            self.load_table::<MonsterRow>(),
            self.load_table::<ItemDef>(),
            self.load_table::<QuestDef>(),
        );

        ReferenceData {
            levels: or_empty(levels),
            slot_enhance: or_empty(slot_enhance),
            stages: or_empty(stages),
            monsters: or_empty(monsters),
            items: or_empty(items),
            quests: or_empty(quests),
        }
    }
}

fn or_empty<R: TableRow>(result: Result<Table<R>, TableLoadError>) -> Table<R> {
    match result {
        Ok(table) => {
            info!(table = R::TABLE_NAME, rows = table.len(), "table loaded");
            table
        }
        Err(err) => {
            error!(table = R::TABLE_NAME, error = %err, "table load failed, using empty table");
            Table::default()
        }
    }
}
