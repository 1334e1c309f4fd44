//! Combatants, action resolution and the round state machine.

mod combatant;
mod error;
pub mod resolve;
pub mod round;

pub use combatant::{Combatant, Unit, UnitId, Units};
pub use error::{PhaseError, ResolveError};
pub use resolve::{ActionContext, ActionOutcome, apply_action};
pub use round::{
    BattleOutcome, BattlePhase, BattleState, RoundPlan, RoundSummary, Transition, roll_criticals,
};
