//! Snapshot persistence and startup/shutdown orchestration.

pub mod orchestrator;
pub mod persistence;
pub mod snapshot;

pub use orchestrator::{
    apply_snapshot, collect_snapshot, load_tables, shutdown, start_game, Startup, TableSource,
};
pub use persistence::{decode_snapshot, encode_snapshot, SaveManager};
pub use snapshot::{SaveSnapshot, SNAPSHOT_VERSION};
