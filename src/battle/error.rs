//! Error types for the battle core.
//!
//! Gameplay errors ([`BattleError::InvalidAction`],
//! [`BattleError::InsufficientResource`]) never mutate state and are handled
//! locally by the session. [`RangeError`] is a contract violation.

use std::fmt;

use thiserror::Error;

pub use super::rng::RangeError;

/// Why an action was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    NotPlayerTurn,
    NotEnemyTurn,
    BattleOver,
    BattleNotOver,
    NoEnemy,
    EncounterInProgress,
    PlayerDefeated,
}

impl Rejection {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NotPlayerTurn => "it is not the player's turn",
            Self::NotEnemyTurn => "it is not the enemy's turn",
            Self::BattleOver => "the battle is already over",
            Self::BattleNotOver => "the battle is still running",
            Self::NoEnemy => "there is no enemy to fight",
            Self::EncounterInProgress => "an encounter is already live",
            Self::PlayerDefeated => "the player must be revived first",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BattleError {
    #[error("action rejected: {0}")]
    InvalidAction(Rejection),

    #[error("not enough mana: need {required}, have {available}")]
    InsufficientResource { required: u32, available: u32 },

    #[error(transparent)]
    InvalidRange(#[from] RangeError),
}

impl BattleError {
    /// Contract violations that indicate a construction bug.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidRange(_))
    }
}

/// A restored state broke a [`BattleState`](super::state::BattleState) invariant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct InvalidState(pub &'static str);

/// Storage boundary failures. Never reach gameplay code.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage is unavailable")]
    Unavailable,

    #[error("storage rejected the operation: {0}")]
    Storage(String),

    #[error("failed to encode state: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("failed to decode state: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("saved state is inconsistent: {0}")]
    Corrupt(#[from] InvalidState),
}

impl PersistenceError {
    /// The stored text is unusable and should be discarded.
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::Corrupt(_))
    }
}
