//! Dungeon Duel: a turn-based terminal battler rendered in the browser
//! through ratzilla.

pub mod battle;
pub mod config;
pub mod input;
pub mod time;
pub mod widgets;
