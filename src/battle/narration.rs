//! Turns machine events into combat-log lines and on-screen effects.

use crate::config::ATTACK_MANA_REGEN;

use super::engine::BattleEvent;
use super::state::enemy_info;

pub const NOT_ENOUGH_MANA: &str = "Not enough MP!";
pub const SESSION_RESTORED: &str = "--- SESSION RESTORED ---";
pub const NEW_GAME_STARTED: &str = "--- NEW GAME STARTED ---";
pub const NEXT_BATTLE: &str = "--- NEXT BATTLE ---";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogCategory {
    System,
    Player,
    Enemy,
    Magic,
    Heal,
}

/// Which combatant an effect is anchored to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Player,
    Enemy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloatKind {
    Damage,
    Heal,
    Mana,
}

/// Short-lived visual feedback. Carries no game state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Float { side: Side, kind: FloatKind, amount: u32, emphasized: bool },
    Shake(Side),
}

pub fn narrate(event: &BattleEvent) -> (String, LogCategory) {
    match *event {
        BattleEvent::EncounterStarted { kind, level } => (
            format!("A wild {} (Lvl {}) appears!", enemy_info(kind).name, level),
            LogCategory::System,
        ),
        BattleEvent::PlayerStruck { damage, critical, .. } => {
            let mut text =
                format!("You hit for {} dmg and recovered {} MP.", damage, ATTACK_MANA_REGEN);
            if critical {
                text.push_str(" Critical!");
            }
            (text, LogCategory::Player)
        }
        BattleEvent::Fireball { kind, damage, .. } => (
            format!("FIREBALL! You scorched {} for {} dmg!", enemy_info(kind).name, damage),
            LogCategory::Magic,
        ),
        BattleEvent::Healed { amount } => {
            (format!("You cast Heal and recovered {} HP.", amount), LogCategory::Heal)
        }
        BattleEvent::EnemyStruck { kind, damage } => (
            format!("{} attacked you for {} dmg!", enemy_info(kind).name, damage),
            LogCategory::Enemy,
        ),
        BattleEvent::Victory { kind } => (
            format!("Victory! You defeated the {}.", enemy_info(kind).name),
            LogCategory::System,
        ),
        BattleEvent::ExperienceGained { amount } => {
            (format!("You gained {} XP.", amount), LogCategory::System)
        }
        BattleEvent::LevelUp { level } => {
            (format!("LEVEL UP! You are now Level {}.", level), LogCategory::System)
        }
        BattleEvent::Defeat => {
            ("DEFEAT. The dungeon claims another soul.".to_string(), LogCategory::Enemy)
        }
        BattleEvent::NewGame => (NEW_GAME_STARTED.to_string(), LogCategory::System),
        BattleEvent::NextBattle => (NEXT_BATTLE.to_string(), LogCategory::System),
    }
}

pub fn effects(event: &BattleEvent) -> Vec<Effect> {
    match *event {
        BattleEvent::PlayerStruck { damage, critical, .. } => vec![
            Effect::Float {
                side: Side::Enemy,
                kind: FloatKind::Damage,
                amount: damage,
                emphasized: critical,
            },
            Effect::Float {
                side: Side::Player,
                kind: FloatKind::Mana,
                amount: ATTACK_MANA_REGEN,
                emphasized: false,
            },
            Effect::Shake(Side::Enemy),
        ],
        // Fireballs always land with emphasis.
        BattleEvent::Fireball { damage, .. } => vec![
            Effect::Float {
                side: Side::Enemy,
                kind: FloatKind::Damage,
                amount: damage,
                emphasized: true,
            },
            Effect::Shake(Side::Enemy),
        ],
        BattleEvent::Healed { amount } => vec![Effect::Float {
            side: Side::Player,
            kind: FloatKind::Heal,
            amount,
            emphasized: false,
        }],
        BattleEvent::EnemyStruck { damage, .. } => vec![
            Effect::Float {
                side: Side::Player,
                kind: FloatKind::Damage,
                amount: damage,
                emphasized: false,
            },
            Effect::Shake(Side::Player),
        ],
        BattleEvent::LevelUp { .. } => vec![Effect::Shake(Side::Player)],
        _ => Vec::new(),
    }
}
