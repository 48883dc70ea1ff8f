//! Dungeon Duel: turn-based hero vs. monster combat.
//!
//! [`BattleSession`] is the controller: each stimulus (key, click, timer)
//! runs through the [`BattleMachine`], then is written through to storage,
//! then reflected on the [`PresentationPort`].

pub mod actions;
pub mod engine;
pub mod enemy;
pub mod error;
pub mod math;
pub mod narration;
pub mod presenter;
pub mod progression;
pub mod render;
pub mod rng;
pub mod save;
pub mod state;

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::Rect;
use ratzilla::ratatui::Frame;
use tracing::{debug, error, info};

use crate::config::ENEMY_TURN_DELAY_TICKS;
use crate::input::{ClickState, InputEvent};
use crate::time::TurnTimer;

use actions::*;
use engine::{BattleEvent, BattleMachine, PlayerAction};
use error::BattleError;
use narration::{effects, narrate, Effect, LogCategory, Side, NOT_ENOUGH_MANA, SESSION_RESTORED};
use presenter::{PresentationPort, TerminalView};
use rng::RandomSource;
use save::{PersistenceGateway, StorageSlot};
use state::{BattleState, Outcome, Phase};

pub struct BattleSession<R, S, P> {
    machine: BattleMachine,
    rng: R,
    gateway: PersistenceGateway<S>,
    presenter: P,
    enemy_turn: TurnTimer,
}

impl<R: RandomSource, S: StorageSlot, P: PresentationPort> BattleSession<R, S, P> {
    /// Resume the saved battle if there is one, otherwise start fresh.
    pub fn boot(rng: R, mut gateway: PersistenceGateway<S>, presenter: P) -> Self {
        let restored = gateway.load();
        let resumed = restored.is_some();
        let mut session = Self {
            machine: BattleMachine::from_state(restored.unwrap_or_default()),
            rng,
            gateway,
            presenter,
            enemy_turn: TurnTimer::new(),
        };

        if resumed {
            info!(phase = ?session.machine.state().phase(), "session restored");
            session.presenter.notify_log(SESSION_RESTORED, LogCategory::System);
            session.presenter.render(session.machine.state());
            if session.machine.state().phase() == Phase::Idle {
                session.begin_encounter();
            } else {
                session.sync_controls();
            }
        } else {
            info!("new session");
            session.begin_encounter();
        }
        session
    }

    pub fn state(&self) -> &BattleState {
        self.machine.state()
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn gateway(&self) -> &PersistenceGateway<S> {
        &self.gateway
    }

    pub fn enemy_turn(&self) -> &TurnTimer {
        &self.enemy_turn
    }

    // ── Stimuli ─────────────────────────────────────────────

    pub fn player_action(&mut self, action: PlayerAction) {
        let result = self.machine.apply_player_action(action, &mut self.rng);
        self.commit(result);
    }

    /// Leave a finished battle: next enemy after a win, fresh hero after a loss.
    pub fn continue_after_end(&mut self) {
        let result = self.machine.reset_after_defeat(&mut self.rng);
        if result.is_ok() {
            self.enemy_turn.cancel();
        }
        self.commit(result);
    }

    /// Advance the clock. Fires the enemy turn when its delay elapses.
    pub fn tick(&mut self, delta_ticks: u32) {
        self.presenter.advance(delta_ticks);
        if self.enemy_turn.advance(delta_ticks) {
            let result = self.machine.execute_enemy_action(&mut self.rng);
            self.commit(result);
        }
    }

    /// Returns `true` if the event was consumed.
    pub fn handle_input(&mut self, event: &InputEvent) -> bool {
        let over = self.machine.state().is_over;
        match event {
            InputEvent::Key(ch) => match *ch {
                '1' | 'a' => self.player_action(PlayerAction::Attack),
                '2' | 'f' => self.player_action(PlayerAction::SpecialAttack),
                '3' | 'h' => self.player_action(PlayerAction::Heal),
                'r' | ' ' | '\n' if over => self.continue_after_end(),
                _ => return false,
            },
            InputEvent::Click(id) => match *id {
                ATTACK => self.player_action(PlayerAction::Attack),
                FIREBALL => self.player_action(PlayerAction::SpecialAttack),
                HEAL => self.player_action(PlayerAction::Heal),
                CONTINUE if over => self.continue_after_end(),
                _ => return false,
            },
        }
        true
    }

    // ── Plumbing ────────────────────────────────────────────

    fn begin_encounter(&mut self) {
        let result = self.machine.start_encounter(&mut self.rng);
        self.commit(result);
    }

    /// Save, render, narrate, then settle controls and the enemy timer.
    fn commit(&mut self, result: Result<Vec<BattleEvent>, BattleError>) {
        let events = match result {
            Ok(events) => events,
            Err(err) => {
                self.report(err);
                return;
            }
        };

        self.gateway.save(self.machine.state());
        self.presenter.render(self.machine.state());
        if events.contains(&BattleEvent::NewGame) {
            self.presenter.clear_log();
        }
        for event in &events {
            let (text, category) = narrate(event);
            self.presenter.notify_log(&text, category);
            for effect in effects(event) {
                self.presenter.show_effect(effect);
            }
        }
        self.sync_controls();
    }

    fn sync_controls(&mut self) {
        match self.machine.state().phase() {
            Phase::AwaitingPlayerAction => {
                self.enemy_turn.cancel();
                self.presenter.set_controls_enabled(true);
            }
            Phase::AwaitingEnemyAction => {
                self.presenter.set_controls_enabled(false);
                if !self.enemy_turn.is_armed() {
                    self.enemy_turn.schedule(ENEMY_TURN_DELAY_TICKS);
                }
            }
            Phase::Over(outcome) => {
                self.enemy_turn.cancel();
                self.presenter.prompt_continuation(outcome == Outcome::Won);
            }
            Phase::Idle => self.presenter.set_controls_enabled(false),
        }
    }

    fn report(&mut self, err: BattleError) {
        match err {
            BattleError::InsufficientResource { required, available } => {
                debug!(required, available, "not enough mana");
                self.presenter.notify_log(NOT_ENOUGH_MANA, LogCategory::System);
                self.presenter.show_effect(Effect::Shake(Side::Player));
            }
            BattleError::InvalidAction(reason) => debug!(%reason, "action ignored"),
            BattleError::InvalidRange(_) => error!(error = %err, "battle transition aborted"),
        }
    }
}

impl<R, S> BattleSession<R, S, TerminalView> {
    pub fn render(&self, f: &mut Frame, area: Rect, click_state: &Rc<RefCell<ClickState>>) {
        render::render(&self.presenter, f, area, click_state);
    }
}
