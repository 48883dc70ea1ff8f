//! Balance and shell tuning.
//!
//! Every number the battle rules depend on lives here so the rule modules
//! read as formulas. The starting hero and the enemy catalog are tables in
//! [`crate::battle::state`].

// ── Persistence ───────────────────────────────────────────────

/// localStorage key holding the serialized battle state.
pub const STORAGE_KEY: &str = "rpg_v1";

// ── Clock ─────────────────────────────────────────────────────

/// Fixed game ticks per real-time second.
pub const TICKS_PER_SEC: u32 = 10;

/// Enemy "thinking" pause after a player action, in ticks (1 second).
pub const ENEMY_TURN_DELAY_TICKS: u32 = 10;

// ── Player actions ────────────────────────────────────────────

pub const CRIT_CHANCE: f64 = 0.15;
pub const CRIT_MULTIPLIER: f64 = 1.5;

/// Mana regained by a plain attack.
pub const ATTACK_MANA_REGEN: u32 = 10;

pub const FIREBALL_MANA_COST: u32 = 25;
pub const FIREBALL_MULTIPLIER: f64 = 2.5;

pub const HEAL_MANA_COST: u32 = 15;
pub const HEAL_ROLL_MIN: u32 = 25;
pub const HEAL_ROLL_MAX: u32 = 40;
pub const HEAL_PER_LEVEL: u32 = 5;

// ── Enemy scaling ─────────────────────────────────────────────

/// Player levels covered by each catalog tier.
pub const LEVELS_PER_TIER: u32 = 2;
/// Chance to drop one tier for an easier encounter.
pub const TIER_DOWNGRADE_CHANCE: f64 = 0.3;
/// Stat scale gained per player level (`scale = 1 + level * this`).
pub const SCALE_PER_LEVEL: f64 = 0.2;
pub const ENEMY_DAMAGE_LOW: f64 = 0.8;
pub const ENEMY_DAMAGE_HIGH: f64 = 1.2;

// ── Progression ───────────────────────────────────────────────

/// Next-level requirement relative to the current one, floored.
pub const XP_GROWTH: f64 = 1.4;
pub const LEVEL_UP_HEALTH: u32 = 20;
pub const LEVEL_UP_MANA: u32 = 10;
pub const LEVEL_UP_DAMAGE: u32 = 3;

// ── Presentation ──────────────────────────────────────────────

/// Combat log entries kept on screen.
pub const LOG_CAPACITY: usize = 50;

/// Lifetime of a floating damage/heal number, in ticks.
pub const FLOAT_TEXT_TICKS: u32 = 10;
/// Floating numbers kept at once; the oldest is dropped first.
pub const MAX_FLOATS: usize = 6;
/// Duration of a panel shake, in ticks.
pub const SHAKE_TICKS: u32 = 3;
