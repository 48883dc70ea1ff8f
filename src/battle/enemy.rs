//! Enemy generation scaled from the player's level.

use crate::config::{
    ENEMY_DAMAGE_HIGH, ENEMY_DAMAGE_LOW, LEVELS_PER_TIER, SCALE_PER_LEVEL, TIER_DOWNGRADE_CHANCE,
};

use super::error::RangeError;
use super::rng::RandomSource;
use super::state::{enemy_info, Enemy, ENEMY_TIERS};

/// Catalog tier for a player level, before any downgrade.
pub fn tier_index(player_level: u32) -> usize {
    let tier = (player_level.saturating_sub(1) / LEVELS_PER_TIER) as usize;
    tier.min(ENEMY_TIERS.len() - 1)
}

/// Stat multiplier applied to the catalog base values.
pub fn scale_for(player_level: u32) -> f64 {
    1.0 + player_level as f64 * SCALE_PER_LEVEL
}

/// Spawn a fresh enemy for `player_level`.
///
/// Draw order: tier downgrade (only when tier > 0), then the level bump.
pub fn create_enemy(player_level: u32, rng: &mut impl RandomSource) -> Result<Enemy, RangeError> {
    let mut tier = tier_index(player_level);
    if tier > 0 && rng.bernoulli(TIER_DOWNGRADE_CHANCE) {
        tier -= 1;
    }
    let kind = ENEMY_TIERS[tier];
    let info = enemy_info(kind);

    let scale = scale_for(player_level);
    let level = player_level.saturating_add(rng.uniform_int(0, 1)?);
    let max_health = (info.base_health as f64 * scale).floor() as u32;

    Ok(Enemy {
        kind,
        level,
        current_health: max_health,
        max_health,
        min_damage: (info.base_damage as f64 * scale * ENEMY_DAMAGE_LOW).floor() as u32,
        max_damage: (info.base_damage as f64 * scale * ENEMY_DAMAGE_HIGH).floor() as u32,
        experience_reward: (info.base_xp as f64 * scale).floor() as u32,
    })
}
