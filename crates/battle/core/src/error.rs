//! Common error infrastructure for battle-core.
//!
//! Domain-specific errors (`CardError`, `ResolveError`, `PhaseError`) are
//! defined next to the operations that raise them. This module holds the
//! shared classification used by callers to decide how to surface a failure.
//!
//! Expected game states (zero hp, empty hands, no affordable planner
//! candidates, unknown token ids) are never errors. Only malformed input and
//! illegal phase transitions produce an `Err`.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the caller can continue with a different request
/// - **Validation**: malformed input that must be fixed before retrying
/// - **Internal**: an engine invariant was violated
/// - **Fatal**: the battle state cannot be used any further
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - retry with a different request.
    ///
    /// Examples: rewinding with no rewinds left, stepping an exhausted queue
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: attack card without damage, defense card without block
    Validation,

    /// Internal error - unexpected state inconsistency.
    Internal,

    /// Fatal error - battle state corrupted, cannot continue.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all battle-core errors.
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait BattleError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
