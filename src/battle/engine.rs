//! The battle state machine.
//!
//! Owns the authoritative [`BattleState`]. Every transition either succeeds
//! and returns the events it produced, or fails and leaves the state exactly
//! as it was: results are computed on copies and committed at the end.

use tracing::debug;

use crate::config::{ATTACK_MANA_REGEN, FIREBALL_MANA_COST, FIREBALL_MULTIPLIER, HEAL_MANA_COST};

use super::enemy::create_enemy;
use super::error::{BattleError, Rejection};
use super::math::{enemy_damage, heal_amount, player_damage};
use super::progression::award_experience;
use super::rng::RandomSource;
use super::state::{BattleState, EnemyKind, Outcome, INITIAL_PLAYER};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerAction {
    Attack,
    /// Fireball.
    SpecialAttack,
    Heal,
}

impl PlayerAction {
    pub const fn mana_cost(self) -> u32 {
        match self {
            Self::Attack => 0,
            Self::SpecialAttack => FIREBALL_MANA_COST,
            Self::Heal => HEAL_MANA_COST,
        }
    }
}

/// What happened during a transition, in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BattleEvent {
    EncounterStarted { kind: EnemyKind, level: u32 },
    PlayerStruck { kind: EnemyKind, damage: u32, critical: bool },
    Fireball { kind: EnemyKind, damage: u32, critical: bool },
    /// `amount` is the health actually gained after clamping.
    Healed { amount: u32 },
    EnemyStruck { kind: EnemyKind, damage: u32 },
    Victory { kind: EnemyKind },
    ExperienceGained { amount: u32 },
    LevelUp { level: u32 },
    Defeat,
    NewGame,
    NextBattle,
}

pub struct BattleMachine {
    state: BattleState,
}

impl Default for BattleMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl BattleMachine {
    pub fn new() -> Self {
        Self { state: BattleState::new() }
    }

    pub fn from_state(state: BattleState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    // ── Transitions ─────────────────────────────────────────

    /// Spawn an enemy at the player's level. Only when nothing is live.
    pub fn start_encounter(
        &mut self,
        rng: &mut impl RandomSource,
    ) -> Result<Vec<BattleEvent>, BattleError> {
        if self.state.enemy.is_some() && !self.state.is_over {
            return Err(BattleError::InvalidAction(Rejection::EncounterInProgress));
        }
        if !self.state.player.is_alive() {
            return Err(BattleError::InvalidAction(Rejection::PlayerDefeated));
        }

        let enemy = create_enemy(self.state.player.level, rng)?;
        let event = BattleEvent::EncounterStarted { kind: enemy.kind, level: enemy.level };
        debug!(kind = ?enemy.kind, level = enemy.level, hp = enemy.max_health, "encounter started");

        self.state.enemy = Some(enemy);
        self.state.is_player_turn = true;
        self.state.is_over = false;
        Ok(vec![event])
    }

    pub fn apply_player_action(
        &mut self,
        action: PlayerAction,
        rng: &mut impl RandomSource,
    ) -> Result<Vec<BattleEvent>, BattleError> {
        if self.state.is_over {
            return Err(BattleError::InvalidAction(Rejection::BattleOver));
        }
        if !self.state.is_player_turn {
            return Err(BattleError::InvalidAction(Rejection::NotPlayerTurn));
        }
        let Some(mut enemy) = self.state.enemy.clone() else {
            return Err(BattleError::InvalidAction(Rejection::NoEnemy));
        };

        let mut player = self.state.player;
        let cost = action.mana_cost();
        if player.current_mana < cost {
            return Err(BattleError::InsufficientResource {
                required: cost,
                available: player.current_mana,
            });
        }
        player.current_mana -= cost;

        let event = match action {
            PlayerAction::Attack => {
                let strike = player_damage(&player, 1.0, rng)?;
                player.restore_mana(ATTACK_MANA_REGEN);
                enemy.take_damage(strike.amount);
                BattleEvent::PlayerStruck {
                    kind: enemy.kind,
                    damage: strike.amount,
                    critical: strike.is_critical,
                }
            }
            PlayerAction::SpecialAttack => {
                let strike = player_damage(&player, FIREBALL_MULTIPLIER, rng)?;
                enemy.take_damage(strike.amount);
                BattleEvent::Fireball {
                    kind: enemy.kind,
                    damage: strike.amount,
                    critical: strike.is_critical,
                }
            }
            PlayerAction::Heal => {
                let amount = heal_amount(&player, rng)?;
                BattleEvent::Healed { amount: player.restore_health(amount) }
            }
        };
        debug!(?action, ?event, "player acted");

        self.state.player = player;
        self.state.enemy = Some(enemy);
        let mut events = vec![event];
        if !self.resolve_encounter_end(&mut events) {
            self.state.is_player_turn = false;
        }
        Ok(events)
    }

    pub fn execute_enemy_action(
        &mut self,
        rng: &mut impl RandomSource,
    ) -> Result<Vec<BattleEvent>, BattleError> {
        if self.state.is_over {
            return Err(BattleError::InvalidAction(Rejection::BattleOver));
        }
        if self.state.is_player_turn {
            return Err(BattleError::InvalidAction(Rejection::NotEnemyTurn));
        }
        let Some(enemy) = self.state.enemy.as_ref() else {
            return Err(BattleError::InvalidAction(Rejection::NoEnemy));
        };

        let damage = enemy_damage(enemy, rng)?;
        let event = BattleEvent::EnemyStruck { kind: enemy.kind, damage };
        debug!(kind = ?enemy.kind, damage, "enemy acted");

        self.state.player.take_damage(damage);
        let mut events = vec![event];
        if !self.resolve_encounter_end(&mut events) {
            self.state.is_player_turn = true;
        }
        Ok(events)
    }

    /// Leave a finished battle. A dead hero starts over from the initial
    /// template; a victorious one keeps their progress. Either way a new
    /// enemy is spawned.
    pub fn reset_after_defeat(
        &mut self,
        rng: &mut impl RandomSource,
    ) -> Result<Vec<BattleEvent>, BattleError> {
        if !self.state.is_over {
            return Err(BattleError::InvalidAction(Rejection::BattleNotOver));
        }

        let (player, marker) = match self.state.outcome() {
            Some(Outcome::Lost) => (INITIAL_PLAYER, BattleEvent::NewGame),
            _ => (self.state.player, BattleEvent::NextBattle),
        };
        let enemy = create_enemy(player.level, rng)?;
        let started = BattleEvent::EncounterStarted { kind: enemy.kind, level: enemy.level };
        debug!(?marker, kind = ?enemy.kind, level = enemy.level, "battle reset");

        self.state = BattleState {
            player,
            enemy: Some(enemy),
            is_player_turn: true,
            is_over: false,
        };
        Ok(vec![marker, started])
    }

    // ── Terminal check ──────────────────────────────────────

    /// Settle a finished encounter. Returns `true` when the battle ended.
    fn resolve_encounter_end(&mut self, events: &mut Vec<BattleEvent>) -> bool {
        match self.state.outcome() {
            Some(Outcome::Won) => {
                let Some((kind, experience_reward)) =
                    self.state.enemy.as_ref().map(|e| (e.kind, e.experience_reward))
                else {
                    return false;
                };
                events.push(BattleEvent::Victory { kind });
                events.push(BattleEvent::ExperienceGained { amount: experience_reward });
                if award_experience(&mut self.state.player, experience_reward) {
                    events.push(BattleEvent::LevelUp { level: self.state.player.level });
                }
                self.state.is_over = true;
                debug!(?kind, xp = experience_reward, level = self.state.player.level, "victory");
                true
            }
            Some(Outcome::Lost) => {
                events.push(BattleEvent::Defeat);
                self.state.is_over = true;
                debug!("defeat");
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::rng::{RngSource, ScriptedRandom};
    use crate::battle::state::Enemy;
    use proptest::prelude::*;

    fn goblin(current_health: u32) -> Enemy {
        Enemy {
            kind: EnemyKind::Goblin,
            level: 1,
            current_health,
            max_health: 96,
            min_damage: 7,
            max_damage: 11,
            experience_reward: 48,
        }
    }

    fn machine_with(enemy: Enemy) -> BattleMachine {
        let mut state = BattleState::new();
        state.enemy = Some(enemy);
        BattleMachine::from_state(state)
    }

    #[test]
    fn start_encounter_from_fresh_state() {
        let mut m = BattleMachine::new();
        let mut rng = ScriptedRandom::new().ints(&[1]);
        let events = m.start_encounter(&mut rng).unwrap();
        assert_eq!(
            events,
            vec![BattleEvent::EncounterStarted {
                kind: EnemyKind::Goblin,
                level: 2
            }]
        );
        assert!(m.state().is_player_turn);
        assert!(!m.state().is_over);
        assert_eq!(m.state().enemy.as_ref().map(|e| e.current_health), Some(96));
    }

    #[test]
    fn start_encounter_rejected_while_live() {
        let mut m = machine_with(goblin(96));
        let before = m.state().clone();
        let err = m.start_encounter(&mut ScriptedRandom::new()).unwrap_err();
        assert_eq!(err, BattleError::InvalidAction(Rejection::EncounterInProgress));
        assert_eq!(m.state(), &before);
    }

    #[test]
    fn attack_damages_and_regenerates_mana() {
        let mut m = machine_with(goblin(96));
        let mut state = m.state().clone();
        state.player.current_mana = 45;
        m = BattleMachine::from_state(state);
        let mut rng = ScriptedRandom::new().ints(&[15]).flips(&[false]);
        let events = m.apply_player_action(PlayerAction::Attack, &mut rng).unwrap();
        assert_eq!(
            events,
            vec![BattleEvent::PlayerStruck { kind: EnemyKind::Goblin, damage: 15, critical: false }]
        );
        let s = m.state();
        assert_eq!(s.enemy.as_ref().map(|e| e.current_health), Some(81));
        assert_eq!(s.player.current_mana, 50);
        assert!(!s.is_player_turn);
    }

    #[test]
    fn fireball_needs_twenty_five_mana() {
        let mut state = BattleState::new();
        state.enemy = Some(goblin(96));
        state.player.current_mana = 24;
        let mut m = BattleMachine::from_state(state.clone());
        let err = m
            .apply_player_action(PlayerAction::SpecialAttack, &mut ScriptedRandom::new())
            .unwrap_err();
        assert_eq!(err, BattleError::InsufficientResource { required: 25, available: 24 });
        assert_eq!(m.state(), &state);

        state.player.current_mana = 25;
        let mut m = BattleMachine::from_state(state);
        let mut rng = ScriptedRandom::new().ints(&[15]).flips(&[false]);
        let events = m.apply_player_action(PlayerAction::SpecialAttack, &mut rng).unwrap();
        assert_eq!(
            events,
            vec![BattleEvent::Fireball { kind: EnemyKind::Goblin, damage: 37, critical: false }]
        );
        assert_eq!(m.state().player.current_mana, 0);
        assert_eq!(m.state().enemy.as_ref().map(|e| e.current_health), Some(59));
    }

    #[test]
    fn heal_reports_clamped_gain() {
        let mut state = BattleState::new();
        state.enemy = Some(goblin(96));
        state.player.current_health = 90;
        let mut m = BattleMachine::from_state(state);
        let mut rng = ScriptedRandom::new().ints(&[40]);
        let events = m.apply_player_action(PlayerAction::Heal, &mut rng).unwrap();
        assert_eq!(events, vec![BattleEvent::Healed { amount: 10 }]);
        assert_eq!(m.state().player.current_health, 100);
        assert_eq!(m.state().player.current_mana, 35);
    }

    #[test]
    fn heal_without_mana_is_rejected() {
        let mut state = BattleState::new();
        state.enemy = Some(goblin(96));
        state.player.current_mana = 14;
        let mut m = BattleMachine::from_state(state.clone());
        let err = m
            .apply_player_action(PlayerAction::Heal, &mut ScriptedRandom::new())
            .unwrap_err();
        assert!(matches!(err, BattleError::InsufficientResource { required: 15, .. }));
        assert_eq!(m.state(), &state);
    }

    #[test]
    fn player_action_rejected_on_enemy_turn() {
        let mut state = BattleState::new();
        state.enemy = Some(goblin(96));
        state.is_player_turn = false;
        let mut m = BattleMachine::from_state(state.clone());
        for action in [PlayerAction::Attack, PlayerAction::SpecialAttack, PlayerAction::Heal] {
            let err = m.apply_player_action(action, &mut ScriptedRandom::new()).unwrap_err();
            assert_eq!(err, BattleError::InvalidAction(Rejection::NotPlayerTurn));
        }
        assert_eq!(m.state(), &state);
    }

    #[test]
    fn player_action_rejected_when_over_or_empty() {
        let mut m = BattleMachine::new();
        let err = m
            .apply_player_action(PlayerAction::Attack, &mut ScriptedRandom::new())
            .unwrap_err();
        assert_eq!(err, BattleError::InvalidAction(Rejection::NoEnemy));

        let mut state = BattleState::new();
        state.enemy = Some(goblin(0));
        state.is_over = true;
        let mut m = BattleMachine::from_state(state);
        let err = m
            .apply_player_action(PlayerAction::Attack, &mut ScriptedRandom::new())
            .unwrap_err();
        assert_eq!(err, BattleError::InvalidAction(Rejection::BattleOver));
    }

    #[test]
    fn killing_blow_awards_experience() {
        let mut m = machine_with(goblin(1));
        let mut rng = ScriptedRandom::new().ints(&[12]).flips(&[false]);
        let events = m.apply_player_action(PlayerAction::Attack, &mut rng).unwrap();
        assert_eq!(
            events,
            vec![
                BattleEvent::PlayerStruck { kind: EnemyKind::Goblin, damage: 12, critical: false },
                BattleEvent::Victory { kind: EnemyKind::Goblin },
                BattleEvent::ExperienceGained { amount: 48 },
            ]
        );
        let s = m.state();
        assert!(s.is_over);
        assert!(s.is_player_turn);
        assert_eq!(s.player.experience, 48);
        assert_eq!(s.enemy.as_ref().map(|e| e.current_health), Some(0));
    }

    #[test]
    fn victory_can_level_up() {
        let mut state = BattleState::new();
        state.enemy = Some(goblin(1));
        state.player.experience = 60;
        let mut m = BattleMachine::from_state(state);
        let events = m
            .apply_player_action(PlayerAction::Attack, &mut ScriptedRandom::new())
            .unwrap();
        assert_eq!(events.last(), Some(&BattleEvent::LevelUp { level: 2 }));
        assert_eq!(m.state().player.experience, 8);
        assert_eq!(m.state().player.current_health, 120);
    }

    #[test]
    fn enemy_turn_hands_control_back() {
        let mut state = BattleState::new();
        state.enemy = Some(goblin(96));
        state.is_player_turn = false;
        let mut m = BattleMachine::from_state(state);
        let mut rng = ScriptedRandom::new().ints(&[9]);
        let events = m.execute_enemy_action(&mut rng).unwrap();
        assert_eq!(events, vec![BattleEvent::EnemyStruck { kind: EnemyKind::Goblin, damage: 9 }]);
        assert_eq!(m.state().player.current_health, 91);
        assert!(m.state().is_player_turn);
    }

    #[test]
    fn enemy_turn_rejected_on_player_turn() {
        let mut m = machine_with(goblin(96));
        let err = m.execute_enemy_action(&mut ScriptedRandom::new()).unwrap_err();
        assert_eq!(err, BattleError::InvalidAction(Rejection::NotEnemyTurn));
    }

    #[test]
    fn lethal_enemy_hit_is_a_defeat() {
        let mut state = BattleState::new();
        state.enemy = Some(goblin(96));
        state.player.current_health = 5;
        state.is_player_turn = false;
        let mut m = BattleMachine::from_state(state);
        let mut rng = ScriptedRandom::new().ints(&[11]);
        let events = m.execute_enemy_action(&mut rng).unwrap();
        assert_eq!(events.last(), Some(&BattleEvent::Defeat));
        assert_eq!(m.state().player.current_health, 0);
        assert!(m.state().is_over);
        assert_eq!(m.state().player.experience, 0);
        assert!(m.start_encounter(&mut ScriptedRandom::new()).is_err());
    }

    #[test]
    fn reset_after_loss_restarts_hero() {
        let mut state = BattleState::new();
        state.player.level = 4;
        state.player.current_health = 0;
        state.enemy = Some(goblin(50));
        state.is_over = true;
        state.is_player_turn = false;
        let mut m = BattleMachine::from_state(state);
        let events = m.reset_after_defeat(&mut ScriptedRandom::new()).unwrap();
        assert_eq!(events[0], BattleEvent::NewGame);
        assert!(matches!(events[1], BattleEvent::EncounterStarted { kind: EnemyKind::Goblin, .. }));
        assert_eq!(m.state().player, INITIAL_PLAYER);
        assert!(m.state().is_player_turn);
        assert!(!m.state().is_over);
    }

    #[test]
    fn reset_after_win_keeps_progress() {
        let mut state = BattleState::new();
        state.player.level = 3;
        state.player.experience = 20;
        state.enemy = Some(goblin(0));
        state.is_over = true;
        let mut m = BattleMachine::from_state(state.clone());
        let events = m.reset_after_defeat(&mut ScriptedRandom::new()).unwrap();
        assert_eq!(events[0], BattleEvent::NextBattle);
        assert_eq!(m.state().player, state.player);
        assert_eq!(m.state().enemy.as_ref().map(|e| e.kind), Some(EnemyKind::Skeleton));
    }

    #[test]
    fn reset_requires_finished_battle() {
        let mut m = machine_with(goblin(96));
        let err = m.reset_after_defeat(&mut ScriptedRandom::new()).unwrap_err();
        assert_eq!(err, BattleError::InvalidAction(Rejection::BattleNotOver));
    }

    #[test]
    fn invalid_range_leaves_state_untouched() {
        let mut state = BattleState::new();
        state.enemy = Some(goblin(96));
        state.player.min_damage = 30;
        state.player.max_damage = 10;
        let mut m = BattleMachine::from_state(state.clone());
        let err = m
            .apply_player_action(PlayerAction::Attack, &mut ScriptedRandom::new())
            .unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(m.state(), &state);
    }

    #[derive(Clone, Copy, Debug)]
    enum Step {
        Attack,
        Fireball,
        Heal,
        Enemy,
        Start,
        Reset,
    }

    fn step_strategy() -> impl Strategy<Value = Step> {
        prop_oneof![
            Just(Step::Attack),
            Just(Step::Fireball),
            Just(Step::Heal),
            Just(Step::Enemy),
            Just(Step::Start),
            Just(Step::Reset),
        ]
    }

    proptest! {
        #[test]
        fn invariants_hold_for_any_sequence(
            seed in any::<u64>(),
            steps in proptest::collection::vec(step_strategy(), 1..120),
        ) {
            let mut rng = RngSource::seeded(seed);
            let mut m = BattleMachine::new();
            for step in steps {
                let before = m.state().clone();
                let result = match step {
                    Step::Attack => m.apply_player_action(PlayerAction::Attack, &mut rng),
                    Step::Fireball => m.apply_player_action(PlayerAction::SpecialAttack, &mut rng),
                    Step::Heal => m.apply_player_action(PlayerAction::Heal, &mut rng),
                    Step::Enemy => m.execute_enemy_action(&mut rng),
                    Step::Start => m.start_encounter(&mut rng),
                    Step::Reset => m.reset_after_defeat(&mut rng),
                };
                match result {
                    Ok(_) => prop_assert!(m.state().validate().is_ok(), "{:?}", m.state()),
                    Err(err) => {
                        prop_assert!(!err.is_fatal());
                        prop_assert_eq!(m.state(), &before);
                    }
                }
                let p = &m.state().player;
                prop_assert!(p.current_health <= p.max_health);
                prop_assert!(p.current_mana <= p.max_mana);
            }
        }
    }
}
