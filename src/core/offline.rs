//! Idle reward for time spent away.
//!
//! Gold is granted for wall-clock time between the last shutdown and now,
//! capped, and only when the absence was longer than a minimum.

use super::config::IdleConfig;
use super::game::Game;
use crate::data::CurrencyKind;
use chrono::Utc;
use tracing::{debug, info};

/// Report of an idle reward check.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IdleReport {
    pub elapsed_seconds: i64,
    /// Elapsed time after clamping to `[0, cap]`.
    pub effective_seconds: i64,
    /// Gold credited, 0 when the absence was too short.
    pub gold: i64,
}

/// Effective seconds and gold earned for `elapsed_seconds` away. The gold
/// is `None` when the absence does not exceed the minimum.
pub fn calculate_idle_reward(elapsed_seconds: i64, config: &IdleConfig) -> (i64, Option<i64>) {
    let effective = elapsed_seconds.clamp(0, config.max_idle_seconds.max(0));
    if effective <= config.min_idle_seconds {
        return (effective, None);
    }
    let gold = (effective as f64 * config.gold_per_second).floor() as i64;
    (effective, Some(gold))
}

/// Credits the idle reward for the time since the last exit and resets the
/// exit timestamp to `now`.
pub fn process_idle_reward(game: &mut Game, now: i64) -> IdleReport {
    let elapsed_seconds = now - game.last_exit_timestamp;
    let (effective_seconds, reward) = calculate_idle_reward(elapsed_seconds, &game.config.idle);
    game.last_exit_timestamp = now;

    let gold = match reward {
        Some(gold) if gold > 0 && game.ledger.change(CurrencyKind::Gold, gold) => {
            info!(elapsed_seconds, effective_seconds, gold, "idle reward granted");
            gold
        }
        _ => {
            debug!(elapsed_seconds, "no idle reward");
            0
        }
    };

    IdleReport {
        elapsed_seconds,
        effective_seconds,
        gold,
    }
}

/// [`process_idle_reward`] against the current wall clock.
pub fn process_idle_reward_now(game: &mut Game) -> IdleReport {
    process_idle_reward(game, Utc::now().timestamp())
}
