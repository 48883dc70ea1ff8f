//! UI boundary. The core only talks to a [`PresentationPort`]; the
//! [`TerminalView`] keeps what the ratatui renderer draws each frame.

use crate::config::{FLOAT_TEXT_TICKS, LOG_CAPACITY, MAX_FLOATS, SHAKE_TICKS};

use super::narration::{Effect, FloatKind, LogCategory, Side};
use super::state::BattleState;

pub trait PresentationPort {
    /// Reflect the snapshot. Calling it twice with the same state is a no-op.
    fn render(&mut self, state: &BattleState);
    fn notify_log(&mut self, message: &str, category: LogCategory);
    fn set_controls_enabled(&mut self, enabled: bool);
    /// Offer the way forward after a battle. Disables the action controls.
    fn prompt_continuation(&mut self, won: bool);
    fn clear_log(&mut self);
    fn show_effect(&mut self, effect: Effect);
    /// Let transient effects age.
    fn advance(&mut self, delta_ticks: u32);
}

pub fn continuation_label(won: bool) -> &'static str {
    if won {
        "Continue Deeper ➔"
    } else {
        "Resurrect (Restart) 💀"
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub text: String,
    pub category: LogCategory,
}

/// A number drifting off a combatant panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FloatText {
    pub side: Side,
    pub kind: FloatKind,
    pub amount: u32,
    pub emphasized: bool,
    /// Remaining lifetime in ticks.
    pub life: u32,
}

impl FloatText {
    pub fn label(&self) -> String {
        let mut text = match self.kind {
            FloatKind::Damage => format!("-{}", self.amount),
            FloatKind::Heal => format!("+{}", self.amount),
            FloatKind::Mana => format!("+{} MP", self.amount),
        };
        if self.emphasized {
            text.push('!');
        }
        text
    }
}

pub struct TerminalView {
    snapshot: BattleState,
    log: Vec<LogEntry>,
    controls_enabled: bool,
    /// `Some(won)` while the continuation button is shown.
    continuation: Option<bool>,
    floats: Vec<FloatText>,
    shake_player: u32,
    shake_enemy: u32,
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalView {
    pub fn new() -> Self {
        Self {
            snapshot: BattleState::new(),
            log: Vec::new(),
            controls_enabled: false,
            continuation: None,
            floats: Vec::new(),
            shake_player: 0,
            shake_enemy: 0,
        }
    }

    pub fn snapshot(&self) -> &BattleState {
        &self.snapshot
    }

    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    pub fn controls_enabled(&self) -> bool {
        self.controls_enabled
    }

    pub fn continuation(&self) -> Option<bool> {
        self.continuation
    }

    pub fn floats(&self) -> &[FloatText] {
        &self.floats
    }

    pub fn shaking(&self, side: Side) -> bool {
        match side {
            Side::Player => self.shake_player > 0,
            Side::Enemy => self.shake_enemy > 0,
        }
    }
}

impl PresentationPort for TerminalView {
    fn render(&mut self, state: &BattleState) {
        self.snapshot = state.clone();
        if !state.is_over {
            self.continuation = None;
        }
    }

    fn notify_log(&mut self, message: &str, category: LogCategory) {
        self.log.push(LogEntry { text: message.to_string(), category });
        if self.log.len() > LOG_CAPACITY {
            self.log.remove(0);
        }
    }

    fn set_controls_enabled(&mut self, enabled: bool) {
        self.controls_enabled = enabled;
    }

    fn prompt_continuation(&mut self, won: bool) {
        self.continuation = Some(won);
        self.controls_enabled = false;
    }

    fn clear_log(&mut self) {
        self.log.clear();
    }

    fn show_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Float { side, kind, amount, emphasized } => {
                self.floats.push(FloatText {
                    side,
                    kind,
                    amount,
                    emphasized,
                    life: FLOAT_TEXT_TICKS,
                });
                if self.floats.len() > MAX_FLOATS {
                    self.floats.remove(0);
                }
            }
            Effect::Shake(Side::Player) => self.shake_player = SHAKE_TICKS,
            Effect::Shake(Side::Enemy) => self.shake_enemy = SHAKE_TICKS,
        }
    }

    fn advance(&mut self, delta_ticks: u32) {
        for f in &mut self.floats {
            f.life = f.life.saturating_sub(delta_ticks);
        }
        self.floats.retain(|f| f.life > 0);
        self.shake_player = self.shake_player.saturating_sub(delta_ticks);
        self.shake_enemy = self.shake_enemy.saturating_sub(delta_ticks);
    }
}
