// Tick and timing
pub const TICK_INTERVAL_MS: u64 = 100;
pub const TICKS_PER_SECOND: u64 = 1000 / TICK_INTERVAL_MS;
pub const AUTOSAVE_INTERVAL_SECONDS: u64 = 30;

// Player combat
pub const PLAYER_ATTACK_INTERVAL_SECONDS: f64 = 0.5; // 2 attacks per second
pub const BASE_ATTACK_POWER: f64 = 10.0;
pub const BASE_MAX_HEALTH: f64 = 100.0;

// Monster spawning and movement
pub const SPAWN_INTERVAL_SECONDS: f64 = 1.0;
pub const MAX_ACTIVE_MONSTERS: usize = 5;
pub const MONSTER_ATTACK_INTERVAL_SECONDS: f64 = 1.0;
pub const MONSTER_SPAWN_DISTANCE: f64 = 10.0;
pub const MONSTER_MOVE_SPEED: f64 = 1.0;
pub const MONSTER_ATTACK_RANGE: f64 = 2.0;

// Tolerance for timer and distance comparisons after repeated `dt` steps
pub const SIM_EPSILON: f64 = 1e-9;

// Stage difficulty: health multiplier grows linearly with stage id
pub const STAGE_DIFFICULTY_STEP: f64 = 0.1;

// Collection
pub const COLLECTION_UPGRADE_COST_COUNT: u32 = 5;
pub const COLLECTION_STAT_FRACTION: f64 = 0.05;
pub const COLLECTION_GOLD_COST_PER_TIER: i64 = 5000;

// Idle rewards
pub const MAX_IDLE_SECONDS: i64 = 12 * 60 * 60;
pub const MIN_IDLE_SECONDS: i64 = 60;
pub const IDLE_GOLD_PER_SECOND: f64 = 10.0;

// Persistence
pub const SAVE_VERSION_MAGIC: u64 = 0x4842_4944_4C45_0001; // "HBIDLE" v1
pub const SAVE_FILE_NAME: &str = "save.dat";
