//! Experience and level-up rules.

use crate::config::{LEVEL_UP_DAMAGE, LEVEL_UP_HEALTH, LEVEL_UP_MANA, XP_GROWTH};

use super::state::Player;

/// Requirement for the level after one with `required`.
pub fn next_requirement(required: u32) -> u32 {
    (required as f64 * XP_GROWTH).floor() as u32
}

/// Add `amount` experience. Returns `true` when the player leveled up.
///
/// At most one level per call; surplus experience carries over and may
/// already exceed the new requirement.
pub fn award_experience(player: &mut Player, amount: u32) -> bool {
    player.experience = player.experience.saturating_add(amount);
    if player.experience < player.experience_required {
        return false;
    }

    player.level = player.level.saturating_add(1);
    player.experience -= player.experience_required;
    player.experience_required = next_requirement(player.experience_required);

    player.max_health = player.max_health.saturating_add(LEVEL_UP_HEALTH);
    player.current_health = player.max_health;
    player.max_mana = player.max_mana.saturating_add(LEVEL_UP_MANA);
    player.current_mana = player.max_mana;
    player.min_damage = player.min_damage.saturating_add(LEVEL_UP_DAMAGE);
    player.max_damage = player.max_damage.saturating_add(LEVEL_UP_DAMAGE);
    true
}
