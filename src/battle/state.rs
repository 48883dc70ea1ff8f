//! Battle state: plain data, no rules.
//!
//! The whole [`BattleState`] is the unit of persistence: it derives serde and
//! is written to storage after every transition.

use serde::{Deserialize, Serialize};

use super::error::InvalidState;

// ── Enemies ───────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Goblin,
    Skeleton,
    Orc,
    DarkWizard,
    Dragon,
}

pub struct EnemyInfo {
    pub name: &'static str,
    pub glyph: &'static str,
    pub base_health: u32,
    pub base_damage: u32,
    pub base_xp: u32,
}

pub fn enemy_info(kind: EnemyKind) -> EnemyInfo {
    match kind {
        EnemyKind::Goblin => EnemyInfo {
            name: "Goblin",
            glyph: "👹",
            base_health: 80,
            base_damage: 8,
            base_xp: 40,
        },
        EnemyKind::Skeleton => EnemyInfo {
            name: "Skeleton",
            glyph: "💀",
            base_health: 110,
            base_damage: 12,
            base_xp: 60,
        },
        EnemyKind::Orc => EnemyInfo {
            name: "Orc",
            glyph: "👺",
            base_health: 150,
            base_damage: 15,
            base_xp: 90,
        },
        EnemyKind::DarkWizard => EnemyInfo {
            name: "Dark Wizard",
            glyph: "🧙",
            base_health: 200,
            base_damage: 25,
            base_xp: 150,
        },
        EnemyKind::Dragon => EnemyInfo {
            name: "Dragon",
            glyph: "🐉",
            base_health: 350,
            base_damage: 35,
            base_xp: 300,
        },
    }
}

/// Enemy catalog ordered weakest to strongest. Index = tier.
pub const ENEMY_TIERS: &[EnemyKind] = &[
    EnemyKind::Goblin,
    EnemyKind::Skeleton,
    EnemyKind::Orc,
    EnemyKind::DarkWizard,
    EnemyKind::Dragon,
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub level: u32,
    pub current_health: u32,
    pub max_health: u32,
    pub min_damage: u32,
    pub max_damage: u32,
    pub experience_reward: u32,
}

impl Enemy {
    pub fn name(&self) -> &'static str {
        enemy_info(self.kind).name
    }

    pub fn glyph(&self) -> &'static str {
        enemy_info(self.kind).glyph
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current_health = self.current_health.saturating_sub(amount);
    }
}

// ── Player ────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub level: u32,
    pub experience: u32,
    pub experience_required: u32,
    pub current_health: u32,
    pub max_health: u32,
    pub current_mana: u32,
    pub max_mana: u32,
    pub min_damage: u32,
    pub max_damage: u32,
}

/// The hero every new game starts with.
pub const INITIAL_PLAYER: Player = Player {
    level: 1,
    experience: 0,
    experience_required: 100,
    current_health: 100,
    max_health: 100,
    current_mana: 50,
    max_mana: 50,
    min_damage: 12,
    max_damage: 20,
};

impl Player {
    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current_health = self.current_health.saturating_sub(amount);
    }

    /// Heal up to `max_health`. Returns the health actually gained.
    pub fn restore_health(&mut self, amount: u32) -> u32 {
        let before = self.current_health;
        self.current_health = self.current_health.saturating_add(amount).min(self.max_health);
        self.current_health - before
    }

    /// Refill mana up to `max_mana`. Returns the mana actually gained.
    pub fn restore_mana(&mut self, amount: u32) -> u32 {
        let before = self.current_mana;
        self.current_mana = self.current_mana.saturating_add(amount).min(self.max_mana);
        self.current_mana - before
    }
}

// ── Battle State ──────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Won,
    Lost,
}

/// Where the battle stands, derived from the stored flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// No enemy has been spawned yet (fresh state).
    Idle,
    AwaitingPlayerAction,
    AwaitingEnemyAction,
    Over(Outcome),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleState {
    pub player: Player,
    pub enemy: Option<Enemy>,
    pub is_player_turn: bool,
    pub is_over: bool,
}

impl Default for BattleState {
    fn default() -> Self {
        Self::new()
    }
}

impl BattleState {
    pub fn new() -> Self {
        Self {
            player: INITIAL_PLAYER,
            enemy: None,
            is_player_turn: true,
            is_over: false,
        }
    }

    /// Terminal check: a dead enemy wins before a dead player loses.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.enemy.as_ref().is_some_and(|e| !e.is_alive()) {
            Some(Outcome::Won)
        } else if !self.player.is_alive() {
            Some(Outcome::Lost)
        } else {
            None
        }
    }

    pub fn phase(&self) -> Phase {
        if self.is_over {
            if let Some(outcome) = self.outcome() {
                return Phase::Over(outcome);
            }
        }
        match (&self.enemy, self.is_player_turn) {
            (None, _) => Phase::Idle,
            (Some(_), true) => Phase::AwaitingPlayerAction,
            (Some(_), false) => Phase::AwaitingEnemyAction,
        }
    }

    /// Check every invariant a reachable state upholds.
    ///
    /// Restored blobs that fail this are treated as malformed.
    pub fn validate(&self) -> Result<(), InvalidState> {
        let p = &self.player;
        if p.level == 0 {
            return Err(InvalidState("player level must be positive"));
        }
        if p.experience_required == 0 {
            return Err(InvalidState("experience requirement must be positive"));
        }
        if p.current_health > p.max_health {
            return Err(InvalidState("player health exceeds maximum"));
        }
        if p.current_mana > p.max_mana {
            return Err(InvalidState("player mana exceeds maximum"));
        }
        if p.min_damage == 0 || p.min_damage > p.max_damage {
            return Err(InvalidState("player damage range is invalid"));
        }

        if let Some(e) = &self.enemy {
            if e.current_health > e.max_health {
                return Err(InvalidState("enemy health exceeds maximum"));
            }
            if e.min_damage > e.max_damage {
                return Err(InvalidState("enemy damage range is invalid"));
            }
            if e.experience_reward == 0 {
                return Err(InvalidState("enemy reward must be positive"));
            }
        }

        match (self.is_over, self.outcome()) {
            (true, None) => Err(InvalidState("battle marked over with both sides alive")),
            (false, Some(_)) if self.enemy.is_some() => {
                Err(InvalidState("live battle has a defeated combatant"))
            }
            (true, Some(_)) if self.enemy.is_none() => {
                Err(InvalidState("finished battle has no enemy"))
            }
            _ => Ok(()),
        }
    }
}
