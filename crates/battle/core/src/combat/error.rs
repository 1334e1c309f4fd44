//! Combat errors.
//!
//! Errors related to action resolution and round phase transitions.

use crate::card::{CardError, CardId};
use crate::error::{BattleError, ErrorSeverity};

use super::{BattlePhase, UnitId};

// ============================================================================
// Action Resolution Errors
// ============================================================================

/// Errors raised by a single `apply_action` call.
///
/// The round driver catches these per queue entry and logs them; they never
/// abort the rest of the queue.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Card data the resolver cannot work with.
    #[error("Invalid card: {0}")]
    InvalidCard(#[from] CardError),

    /// Explicit target that the defender does not own.
    #[error("Card {card} targets unknown unit {unit}")]
    UnknownUnit { card: CardId, unit: UnitId },

    /// Grouped opponent exceeds the unit capacity.
    #[error("Too many units (max {max})")]
    TooManyUnits { max: usize },
}

impl BattleError for ResolveError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCard(_) => "RESOLVE_INVALID_CARD",
            Self::UnknownUnit { .. } => "RESOLVE_UNKNOWN_UNIT",
            Self::TooManyUnits { .. } => "RESOLVE_TOO_MANY_UNITS",
        }
    }
}

// ============================================================================
// Phase Transition Errors
// ============================================================================

/// Illegal round state machine transitions.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PhaseError {
    /// Operation not allowed in the current phase.
    #[error("Cannot {operation} during {phase} phase")]
    WrongPhase {
        operation: &'static str,
        phase: BattlePhase,
    },

    /// Rewind budget for this round is used up.
    #[error("No rewinds left this round")]
    NoRewindsLeft,

    /// The battle already ended in victory or defeat.
    #[error("Battle is over")]
    BattleOver,

    /// Committed more cards than one round allows.
    #[error("Too many cards committed ({count}, max {max})")]
    HandTooLarge { count: usize, max: usize },
}

impl BattleError for PhaseError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::WrongPhase { .. } | Self::NoRewindsLeft => ErrorSeverity::Recoverable,
            Self::HandTooLarge { .. } => ErrorSeverity::Validation,
            Self::BattleOver => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::WrongPhase { .. } => "PHASE_WRONG_PHASE",
            Self::NoRewindsLeft => "PHASE_NO_REWINDS_LEFT",
            Self::BattleOver => "PHASE_BATTLE_OVER",
            Self::HandTooLarge { .. } => "PHASE_HAND_TOO_LARGE",
        }
    }
}
