//! Deterministic card-combat rules and data types.
//!
//! `battle-core` holds the canonical battle rules: token bookkeeping, poker
//! combo detection, the ether economy, the speed timeline, action resolution,
//! the round state machine and the opponent planner. Every operation is pure.
//! It takes state by reference and returns new state plus transcript lines, so
//! a recorded battle can be replayed and checked with [`digest`].
//!
//! Content (cards, opponents, tokens, balance numbers) is supplied by the
//! caller; see the `battle-content` crate for file-backed loaders.
pub mod card;
pub mod combat;
pub mod combo;
pub mod config;
#[cfg(feature = "serde")]
pub mod digest;
pub mod env;
pub mod error;
pub mod ether;
pub mod planner;
pub mod rng;
pub mod side;
pub mod timeline;
pub mod token;

pub use card::{
    Card, CardError, CardId, CardInstance, CardKind, CardSpec, CardTrait, GrantTarget, InstanceId,
    Rarity, Targeting, TokenGrant, TraitFlags,
};
pub use combat::{
    ActionContext, ActionOutcome, BattleOutcome, BattlePhase, BattleState, Combatant, PhaseError,
    ResolveError, RoundPlan, RoundSummary, Transition, Unit, UnitId, Units, apply_action,
    roll_criticals,
};
pub use combo::{ComboName, ComboResult, detect_poker_combo};
pub use config::{BattleConfig, ComboMultipliers, PlannerConfig, RarityValues};
pub use env::BattleEnv;
pub use error::{BattleError, ErrorSeverity};
pub use ether::{
    ComboUsage, EtherGainInput, EtherGainResult, EtherPool, OverdriveOutcome, activate_overdrive,
    calculate_combo_ether_gain, record_combo_usage, should_enemy_overdrive,
};
pub use planner::{
    EnemyMode, EnemyPlan, ModeWeightTable, ModeWeights, PlanBudget, PlanRequest, PlannedRound,
    UniformWeights, bind_to_units, decide_enemy_mode, generate_enemy_actions, plan_enemy_round,
};
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use side::Side;
pub use timeline::{
    FixedOrder, TimelineAdjustments, TimelineEntry, build_track, create_fixed_order, merge_queue,
};
pub use token::{
    DurationType, GrantedAt, TokenCatalog, TokenCategory, TokenDefinition, TokenEffect, TokenId,
    TokenLedger, TokenOutcome, TokenRegistry, add_token, end_of_turn, get_token_stacks, has_token,
    remove_token, set_token_stacks, start_of_turn,
};
