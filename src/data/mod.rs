//! Reference data: immutable lookup tables shared by every system.

pub mod builtin;
pub mod loader;
pub mod tables;
pub mod types;

pub use loader::{TableLoadError, TableLoader};
pub use tables::*;
pub use types::*;
