//! Session state, tunables, tick orchestration and idle rewards.

pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod game;
pub mod offline;
pub mod tick;

pub use config::GameConfig;
pub use error::{GameError, Result};
pub use events::Observers;
pub use game::Game;
pub use offline::{calculate_idle_reward, process_idle_reward, process_idle_reward_now, IdleReport};
pub use tick::{game_tick, TickEvent, TickResult};
