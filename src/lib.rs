//! Hummingbird - idle combat RPG simulation core.
//!
//! Components are plain structs owned by [`core::Game`]. The binary drives
//! them with [`core::game_tick`] and persists them through [`save`].

pub mod build_info;
pub mod character;
pub mod collection;
pub mod combat;
pub mod core;
pub mod data;
pub mod economy;
pub mod quest;
pub mod save;
pub mod stage;
