use chrono::Utc;
use clap::Parser;
use hummingbird::build_info;
use hummingbird::combat::CombatEvent;
use hummingbird::core::constants::{AUTOSAVE_INTERVAL_SECONDS, TICKS_PER_SECOND, TICK_INTERVAL_MS};
use hummingbird::core::{game_tick, Game, GameConfig, TickEvent, TickResult};
use hummingbird::data::CurrencyKind;
use hummingbird::save::{collect_snapshot, shutdown, start_game, SaveManager, TableSource};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Headless idle combat simulation.
///
/// Restores the save, grants the idle reward, runs the tick loop and saves
/// on exit.
#[derive(Parser, Debug)]
#[command(name = "hummingbird", version = build_info::BUILD_VERSION)]
struct Args {
    /// Directory with levels.json, stages.json, monsters.json, ... (built-in tables if omitted)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Save file (defaults to the platform data directory)
    #[arg(short, long, value_name = "FILE")]
    save: Option<PathBuf>,

    /// JSON file overriding tunables
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Simulated seconds to run when not in real-time mode
    #[arg(long, default_value_t = 3600, value_name = "SECONDS")]
    seconds: u64,

    /// Tick on the wall clock until Ctrl-C
    #[arg(long)]
    realtime: bool,

    /// Seed for spawn, loot and enhancement rolls
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Default)]
struct RunSummary {
    ticks: u64,
    kills: u64,
    deaths: u64,
    stages_cleared: u64,
    levels_gained: u32,
    quest_claims: u32,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing();

    let config = match &args.config {
        Some(path) => GameConfig::from_json_file(path).unwrap_or_else(|err| {
            warn!(path = %path.display(), error = %err, "config unreadable, using defaults");
            GameConfig::default()
        }),
        None => GameConfig::default(),
    };

    let saves = match &args.save {
        Some(path) => SaveManager::with_path(path),
        None => SaveManager::new().unwrap_or_else(|err| {
            warn!(error = %err, "no platform data directory, saving next to the binary");
            SaveManager::with_path(hummingbird::core::constants::SAVE_FILE_NAME)
        }),
    };

    let source = match &args.data_dir {
        Some(dir) => TableSource::Directory(dir.clone()),
        None => TableSource::Builtin,
    };

    let startup = start_game(config, &source, &saves).await;
    if startup.idle.gold > 0 {
        info!(
            away_seconds = startup.idle.elapsed_seconds,
            gold = startup.idle.gold,
            "welcome back"
        );
    }
    let mut game = startup.game;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let summary = if args.realtime {
        run_realtime(&mut game, &saves, &mut rng, tokio::signal::ctrl_c()).await
    } else {
        run_fast(&mut game, args.seconds, &mut rng)
    };

    info!(
        ticks = summary.ticks,
        kills = summary.kills,
        deaths = summary.deaths,
        stages_cleared = summary.stages_cleared,
        levels_gained = summary.levels_gained,
        quest_claims = summary.quest_claims,
        level = game.character.level(),
        stage_id = game.stage.stage_id(),
        gold = game.ledger.amount(CurrencyKind::Gold),
        gem = game.ledger.amount(CurrencyKind::Gem),
        "session finished"
    );

    if let Err(err) = shutdown(&mut game, &saves).await {
        error!(error = %err, path = %saves.save_path().display(), "failed to save on exit");
    }
    ExitCode::SUCCESS
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("hummingbird=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn tick_seconds() -> f64 {
    TICK_INTERVAL_MS as f64 / 1000.0
}

/// Runs `seconds` of simulated time as fast as possible.
fn run_fast(game: &mut Game, seconds: u64, rng: &mut StdRng) -> RunSummary {
    let mut summary = RunSummary::default();
    let dt = tick_seconds();
    for _ in 0..seconds.saturating_mul(TICKS_PER_SECOND) {
        let result = game_tick(game, dt, rng);
        after_tick(game, &result, &mut summary);
    }
    summary
}

/// Ticks on the wall clock until `shutdown` resolves, autosaving
/// periodically.
async fn run_realtime<F: Future>(
    game: &mut Game,
    saves: &SaveManager,
    rng: &mut StdRng,
    shutdown: F,
) -> RunSummary {
    let mut summary = RunSummary::default();
    let dt = tick_seconds();
    let mut ticker = tokio::time::interval(Duration::from_millis(TICK_INTERVAL_MS));
    let mut autosave = tokio::time::interval(Duration::from_secs(AUTOSAVE_INTERVAL_SECONDS));
    // first tick of an interval fires immediately
    autosave.tick().await;

    tokio::pin!(shutdown);

    info!("running in real time, press Ctrl-C to stop");
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let result = game_tick(game, dt, rng);
                after_tick(game, &result, &mut summary);
            }
            _ = autosave.tick() => {
                let snapshot = collect_snapshot(game, Utc::now().timestamp());
                match saves.save_async(&snapshot).await {
                    Ok(()) => debug!("autosaved"),
                    Err(err) => warn!(error = %err, "autosave failed"),
                }
            }
            _ = &mut shutdown => {
                info!("interrupted, shutting down");
                break;
            }
        }
    }
    summary
}

/// Tallies the tick, revives on death and claims finished quests.
fn after_tick(game: &mut Game, result: &TickResult, summary: &mut RunSummary) {
    summary.ticks += 1;
    summary.kills += result.kills() as u64;

    let mut died = false;
    for event in &result.events {
        match event {
            TickEvent::Combat(CombatEvent::PlayerDied) => died = true,
            TickEvent::Combat(CombatEvent::StageCleared { .. }) => summary.stages_cleared += 1,
            TickEvent::LeveledUp { levels_gained, .. } => summary.levels_gained += levels_gained,
            _ => {}
        }
    }

    if died {
        summary.deaths += 1;
        game.revive();
    }

    let claimable: Vec<u32> = game.quests.unclaimed_quest_ids().collect();
    for quest_id in claimable {
        if game.claim_quest_reward(quest_id) {
            summary.quest_claims += 1;
        }
    }
}
