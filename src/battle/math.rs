//! Combat math: damage and healing rolls. Pure given a [`RandomSource`].
//!
//! Clamping to health/mana bounds is the caller's job.

use crate::config::{CRIT_CHANCE, CRIT_MULTIPLIER, HEAL_PER_LEVEL, HEAL_ROLL_MAX, HEAL_ROLL_MIN};

use super::error::RangeError;
use super::rng::RandomSource;
use super::state::{Enemy, Player};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Strike {
    pub amount: u32,
    pub is_critical: bool,
}

/// `roll(min..=max) * multiplier`, then ×1.5 on a 15% critical. Floored.
pub fn player_damage(
    player: &Player,
    multiplier: f64,
    rng: &mut impl RandomSource,
) -> Result<Strike, RangeError> {
    let roll = rng.uniform_int(player.min_damage, player.max_damage)?;
    let mut amount = roll as f64 * multiplier.max(0.0);
    let is_critical = rng.bernoulli(CRIT_CHANCE);
    if is_critical {
        amount *= CRIT_MULTIPLIER;
    }
    Ok(Strike { amount: amount.floor() as u32, is_critical })
}

/// Enemies never crit.
pub fn enemy_damage(enemy: &Enemy, rng: &mut impl RandomSource) -> Result<u32, RangeError> {
    rng.uniform_int(enemy.min_damage, enemy.max_damage)
}

pub fn heal_amount(player: &Player, rng: &mut impl RandomSource) -> Result<u32, RangeError> {
    let roll = rng.uniform_int(HEAL_ROLL_MIN, HEAL_ROLL_MAX)?;
    Ok(roll.saturating_add(player.level.saturating_mul(HEAL_PER_LEVEL)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::rng::{RngSource, ScriptedRandom};
    use crate::battle::state::{EnemyKind, INITIAL_PLAYER};
    use crate::config::FIREBALL_MULTIPLIER;
    use proptest::prelude::*;

    #[test]
    fn plain_hit_uses_roll() {
        let mut rng = ScriptedRandom::new().ints(&[15]).flips(&[false]);
        let s = player_damage(&INITIAL_PLAYER, 1.0, &mut rng).unwrap();
        assert_eq!(s, Strike { amount: 15, is_critical: false });
    }

    #[test]
    fn critical_hit_is_floored() {
        let mut rng = ScriptedRandom::new().ints(&[15]).flips(&[true]);
        let s = player_damage(&INITIAL_PLAYER, 1.0, &mut rng).unwrap();
        assert_eq!(s, Strike { amount: 22, is_critical: true });
    }

    #[test]
    fn fireball_multiplier() {
        let mut rng = ScriptedRandom::new().ints(&[15, 15]).flips(&[false, true]);
        let s = player_damage(&INITIAL_PLAYER, FIREBALL_MULTIPLIER, &mut rng).unwrap();
        assert_eq!(s.amount, 37);
        let s = player_damage(&INITIAL_PLAYER, FIREBALL_MULTIPLIER, &mut rng).unwrap();
        assert_eq!(s.amount, 56);
    }

    #[test]
    fn heal_scales_with_level() {
        let mut p = INITIAL_PLAYER;
        p.level = 3;
        let mut rng = ScriptedRandom::new().ints(&[30]);
        assert_eq!(heal_amount(&p, &mut rng), Ok(45));
    }

    #[test]
    fn heal_saturates_at_extreme_levels() {
        let mut p = INITIAL_PLAYER;
        p.level = u32::MAX;
        let mut rng = ScriptedRandom::new().ints(&[40]);
        assert_eq!(heal_amount(&p, &mut rng), Ok(u32::MAX));
    }

    #[test]
    fn enemy_damage_in_range() {
        let enemy = Enemy {
            kind: EnemyKind::Orc,
            level: 5,
            current_health: 300,
            max_health: 300,
            min_damage: 24,
            max_damage: 36,
            experience_reward: 180,
        };
        let mut rng = RngSource::seeded(11);
        for _ in 0..200 {
            let d = enemy_damage(&enemy, &mut rng).unwrap();
            assert!((24..=36).contains(&d));
        }
    }

    #[test]
    fn inverted_damage_range_is_an_error() {
        let mut p = INITIAL_PLAYER;
        p.min_damage = 30;
        p.max_damage = 10;
        let mut rng = RngSource::seeded(0);
        assert_eq!(
            player_damage(&p, 1.0, &mut rng),
            Err(RangeError { min: 30, max: 10 })
        );
    }

    proptest! {
        #[test]
        fn damage_bounds(min in 1u32..200, spread in 0u32..200, seed in any::<u64>()) {
            let mut p = INITIAL_PLAYER;
            p.min_damage = min;
            p.max_damage = min + spread;
            let mut rng = RngSource::seeded(seed);
            let s = player_damage(&p, 1.0, &mut rng).unwrap();
            if s.is_critical {
                prop_assert!(s.amount >= (min as f64 * CRIT_MULTIPLIER).floor() as u32);
                prop_assert!(s.amount <= ((min + spread) as f64 * CRIT_MULTIPLIER).floor() as u32);
            } else {
                prop_assert!(s.amount >= min && s.amount <= min + spread);
            }
        }

        #[test]
        fn heal_bounds(level in 1u32..100, seed in any::<u64>()) {
            let mut p = INITIAL_PLAYER;
            p.level = level;
            let mut rng = RngSource::seeded(seed);
            let h = heal_amount(&p, &mut rng).unwrap();
            prop_assert!(h >= HEAL_ROLL_MIN + level * HEAL_PER_LEVEL);
            prop_assert!(h <= HEAL_ROLL_MAX + level * HEAL_PER_LEVEL);
        }
    }
}
