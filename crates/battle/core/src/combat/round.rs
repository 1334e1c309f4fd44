//! Round state machine.
//!
//! ```text
//! Select ──lock_in──▶ Respond ──begin_resolve──▶ Resolve ──step*──▶ Post
//!    ▲                   │                                           │
//!    └──────rewind───────┘                                           │
//!    └────────────────────────finish_round (continue)────────────────┘
//! ```
//!
//! Every operation takes the current [`BattleState`] by reference and returns
//! a new value with `version` bumped; the input is never mutated.

use std::collections::BTreeSet;

use super::{ActionContext, Combatant, PhaseError, apply_action};
use crate::card::{CardInstance, InstanceId};
use crate::combo::{ComboResult, detect_poker_combo};
use crate::config::BattleConfig;
use crate::env::BattleEnv;
use crate::error::BattleError as _;
use crate::ether::{
    ComboUsage, EtherGainInput, EtherGainResult, EtherPool, activate_overdrive,
    calculate_combo_ether_gain, record_combo_usage, should_enemy_overdrive,
};
use crate::rng::{RngOracle, compute_seed, context};
use crate::side::Side;
use crate::timeline::{TimelineAdjustments, TimelineEntry, create_fixed_order, merge_queue};
use crate::token::{end_of_turn, start_of_turn};

/// Round phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum BattlePhase {
    /// Player assembling a hand.
    Select,
    /// Both action lists fixed into one queue; rewinds allowed.
    Respond,
    /// Queue consumed one entry per step.
    Resolve,
    /// Round over.
    Post,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum BattleOutcome {
    Victory,
    Defeat,
    Continue,
}

/// Both actors' commitments for one round.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundPlan {
    pub player: Vec<CardInstance>,
    pub enemy: Vec<CardInstance>,
    pub agility: i32,
    pub adjustments: TimelineAdjustments,
    /// Instances that resolve as critical.
    pub critical: BTreeSet<InstanceId>,
}

impl RoundPlan {
    pub fn new(player: Vec<CardInstance>, enemy: Vec<CardInstance>) -> Self {
        Self {
            player,
            enemy,
            ..Self::default()
        }
    }

    pub fn with_agility(mut self, agility: i32) -> Self {
        self.agility = agility;
        self
    }

    pub fn with_adjustments(mut self, adjustments: TimelineAdjustments) -> Self {
        self.adjustments = adjustments;
        self
    }

    pub fn with_critical(mut self, critical: BTreeSet<InstanceId>) -> Self {
        self.critical = critical;
        self
    }
}

/// New state plus the transcript of the transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub state: BattleState,
    pub logs: Vec<String>,
}

/// End-of-round bookkeeping.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundSummary {
    pub state: BattleState,
    pub combo: Option<ComboResult>,
    pub ether: EtherGainResult,
    /// Usage history including this round's combo.
    pub usage: ComboUsage,
    pub outcome: BattleOutcome,
    pub logs: Vec<String>,
}

/// Complete battle state between engine calls.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    /// Incremented on every transition.
    pub version: u64,
    pub round: u64,
    pub seed: u64,
    pub phase: BattlePhase,
    /// Set when the round reaches `Post`.
    pub outcome: Option<BattleOutcome>,
    /// Victory or defeat has been booked; no further rounds.
    pub over: bool,
    pub player: Combatant,
    pub enemy: Combatant,
    pub player_ether: EtherPool,
    pub enemy_ether: EtherPool,
    pub queue: Vec<TimelineEntry>,
    pub cursor: usize,
    pub rewinds_left: u32,
    pub max_rewinds: u32,
    pub selection: Vec<CardInstance>,
    pub combo: Option<ComboResult>,
    /// Player cards that count toward this round's ether.
    pub credited: Vec<CardInstance>,
    pub critical: BTreeSet<InstanceId>,
}

impl BattleState {
    pub fn new(player: Combatant, enemy: Combatant, config: &BattleConfig) -> Self {
        Self {
            version: 0,
            round: 1,
            seed: 0,
            phase: BattlePhase::Select,
            outcome: None,
            over: false,
            player,
            enemy,
            player_ether: EtherPool::default(),
            enemy_ether: EtherPool::default(),
            queue: Vec::new(),
            cursor: 0,
            rewinds_left: config.max_rewinds,
            max_rewinds: config.max_rewinds,
            selection: Vec::new(),
            combo: None,
            credited: Vec::new(),
            critical: BTreeSet::new(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_ether(mut self, player: EtherPool, enemy: EtherPool) -> Self {
        self.player_ether = player;
        self.enemy_ether = enemy;
        self
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    fn combatant_mut(&mut self, side: Side) -> &mut Combatant {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    /// Queue entries not yet resolved.
    pub fn pending(&self) -> &[TimelineEntry] {
        self.queue.get(self.cursor..).unwrap_or_default()
    }

    fn expect_phase(&self, phase: BattlePhase, operation: &'static str) -> Result<(), PhaseError> {
        if self.over {
            return Err(PhaseError::BattleOver);
        }
        if self.phase != phase {
            return Err(PhaseError::WrongPhase {
                operation,
                phase: self.phase,
            });
        }
        Ok(())
    }

    fn bumped(&self) -> Self {
        let mut next = self.clone();
        next.version += 1;
        next
    }

    // ========================================================================
    // Select / Respond
    // ========================================================================

    /// Fixes both actors' cards into the merged queue.
    pub fn lock_in(&self, env: &BattleEnv<'_>, plan: RoundPlan) -> Result<Transition, PhaseError> {
        self.expect_phase(BattlePhase::Select, "lock in")?;
        if plan.player.len() > BattleConfig::MAX_HAND {
            return Err(PhaseError::HandTooLarge {
                count: plan.player.len(),
                max: BattleConfig::MAX_HAND,
            });
        }

        let mut next = self.bumped();
        let mut logs = Vec::new();

        let order = create_fixed_order(&plan.player, &plan.enemy, plan.agility, &plan.adjustments);
        next.queue = merge_queue(&order);
        next.cursor = 0;
        next.combo = detect_poker_combo(&plan.player);
        next.selection = plan.player;
        next.critical = plan.critical;
        next.credited.clear();

        if should_enemy_overdrive(&next.enemy, &next.enemy_ether, env.config) {
            let out = activate_overdrive(Side::Enemy, &next.enemy_ether, &next.enemy, env.config);
            next.enemy_ether = out.pool;
            next.enemy = out.combatant;
            logs.extend(out.logs);
        }

        let combo_name = next
            .combo
            .as_ref()
            .map_or_else(|| "none".to_string(), |c| c.name.to_string());
        logs.push(format!(
            "Round {} locked in: {} actions, combo {combo_name}",
            next.round,
            next.queue.len()
        ));
        next.phase = BattlePhase::Respond;
        Ok(Transition { state: next, logs })
    }

    /// Returns to `Select`, spending one rewind.
    pub fn rewind(&self) -> Result<Transition, PhaseError> {
        self.expect_phase(BattlePhase::Respond, "rewind")?;
        if self.rewinds_left == 0 {
            return Err(PhaseError::NoRewindsLeft);
        }

        let mut next = self.bumped();
        next.rewinds_left -= 1;
        next.queue.clear();
        next.cursor = 0;
        next.combo = None;
        next.critical.clear();
        next.phase = BattlePhase::Select;
        let logs = vec![format!("Rewind ({} left)", next.rewinds_left)];
        Ok(Transition { state: next, logs })
    }

    /// Spends a player overdrive slot. Allowed while selecting or responding.
    pub fn overdrive(&self, env: &BattleEnv<'_>) -> Result<Transition, PhaseError> {
        if self.over {
            return Err(PhaseError::BattleOver);
        }
        if !matches!(self.phase, BattlePhase::Select | BattlePhase::Respond) {
            return Err(PhaseError::WrongPhase {
                operation: "overdrive",
                phase: self.phase,
            });
        }

        let mut next = self.bumped();
        let out = activate_overdrive(Side::Player, &self.player_ether, &self.player, env.config);
        next.player_ether = out.pool;
        next.player = out.combatant;
        Ok(Transition {
            state: next,
            logs: out.logs,
        })
    }

    pub fn begin_resolve(&self) -> Result<Transition, PhaseError> {
        self.expect_phase(BattlePhase::Respond, "begin resolve")?;
        let mut next = self.bumped();
        next.phase = BattlePhase::Resolve;
        let logs = vec![format!("Round {} resolves", next.round)];
        Ok(Transition { state: next, logs })
    }

    // ========================================================================
    // Resolve
    // ========================================================================

    /// Resolves the next queue entry.
    ///
    /// A failing entry is logged and skipped. Moves to `Post` once either side
    /// reaches zero hp or the queue is exhausted.
    pub fn step(&self, env: &BattleEnv<'_>) -> Result<Transition, PhaseError> {
        self.expect_phase(BattlePhase::Resolve, "step")?;
        let mut next = self.bumped();
        let mut logs = Vec::new();

        if let Some(entry) = self.queue.get(self.cursor) {
            next.cursor += 1;
            next.resolve_entry(env, entry, &mut logs);
        }
        next.settle(&mut logs);
        Ok(Transition { state: next, logs })
    }

    fn resolve_entry(&mut self, env: &BattleEnv<'_>, entry: &TimelineEntry, logs: &mut Vec<String>) {
        let side = entry.actor;
        let card = &entry.card;

        if let Some(unit) = card.bound_unit {
            let down = self
                .combatant(side)
                .unit(unit)
                .is_some_and(|u| !u.is_alive());
            if down {
                logs.push(format!("{side} {} skipped: unit {unit} is down", card.card.name));
                return;
            }
        }

        let ctx = ActionContext {
            critical: self.critical.contains(&card.instance_id),
        };
        let actor = self.combatant(side);
        let defender = self.combatant(side.opponent());
        match apply_action(env, side, actor, defender, card, ctx) {
            Ok(outcome) => {
                *self.combatant_mut(side) = outcome.actor;
                *self.combatant_mut(side.opponent()) = outcome.defender;
                logs.extend(outcome.logs);
                if side == Side::Player && card.counts_for_economy() {
                    self.credited.push(card.clone());
                }
            }
            Err(err) => {
                tracing::warn!(
                    card = %card.card.id,
                    code = err.error_code(),
                    error = %err,
                    "queue entry skipped"
                );
                logs.push(format!("{side} {} failed: {err}", card.card.name));
            }
        }
    }

    fn settle(&mut self, logs: &mut Vec<String>) {
        let outcome = if !self.player.is_alive() {
            BattleOutcome::Defeat
        } else if !self.enemy.is_alive() {
            BattleOutcome::Victory
        } else if self.cursor >= self.queue.len() {
            BattleOutcome::Continue
        } else {
            return;
        };

        if outcome == BattleOutcome::Victory {
            let remaining: Vec<CardInstance> = self
                .pending()
                .iter()
                .filter(|e| e.actor == Side::Player && e.card.counts_for_economy())
                .map(|e| e.card.clone())
                .collect();
            if !remaining.is_empty() {
                logs.push(format!("{} unresolved player cards credited", remaining.len()));
            }
            self.credited.extend(remaining);
        }

        self.phase = BattlePhase::Post;
        self.outcome = Some(outcome);
        logs.push(format!("Round {} ends: {outcome}", self.round));
    }

    // ========================================================================
    // Post
    // ========================================================================

    /// Books ether and combo usage, resets round state and runs turn passives.
    pub fn finish_round(
        &self,
        env: &BattleEnv<'_>,
        usage: &ComboUsage,
    ) -> Result<RoundSummary, PhaseError> {
        self.expect_phase(BattlePhase::Post, "finish round")?;
        let mut next = self.bumped();
        let mut logs = Vec::new();

        let combo = self.combo.clone();
        let realized = combo
            .as_ref()
            .map(|c| c.name)
            .filter(|_| !self.credited.is_empty());
        let ether = calculate_combo_ether_gain(
            &EtherGainInput::from_cards(&self.credited, realized, usage),
            env.config,
        );
        let usage = match realized {
            Some(name) => record_combo_usage(usage, name),
            None => usage.clone(),
        };
        next.player_ether = next.player_ether.credit(ether.gain);
        logs.push(format!(
            "Player gains {} ether ({} held)",
            ether.gain, next.player_ether.points
        ));

        next.player.reset_round();
        next.enemy.reset_round();

        let mut outcome = self.outcome.unwrap_or(BattleOutcome::Continue);
        if outcome == BattleOutcome::Continue {
            next.run_passives(env, TurnBoundary::End, &mut logs);
            outcome = if !next.player.is_alive() {
                BattleOutcome::Defeat
            } else if !next.enemy.is_alive() {
                BattleOutcome::Victory
            } else {
                next.run_passives(env, TurnBoundary::Start, &mut logs);
                BattleOutcome::Continue
            };
        }

        if outcome == BattleOutcome::Continue {
            next.round += 1;
            next.phase = BattlePhase::Select;
            next.outcome = None;
            next.rewinds_left = next.max_rewinds;
            next.queue.clear();
            next.cursor = 0;
            next.selection.clear();
            next.combo = None;
            next.credited.clear();
            next.critical.clear();
        } else {
            next.over = true;
            next.outcome = Some(outcome);
            logs.push(format!("Battle ends: {outcome}"));
        }

        Ok(RoundSummary {
            state: next,
            combo,
            ether,
            usage,
            outcome,
            logs,
        })
    }

    fn run_passives(&mut self, env: &BattleEnv<'_>, boundary: TurnBoundary, logs: &mut Vec<String>) {
        for side in [Side::Player, Side::Enemy] {
            let combatant = self.combatant_mut(side);
            let (hp, max_hp) = (combatant.hp, combatant.max_hp);
            let out = match boundary {
                TurnBoundary::End => end_of_turn(&combatant.tokens, env.tokens, side, hp, max_hp),
                TurnBoundary::Start => start_of_turn(&combatant.tokens, env.tokens, side, hp, max_hp),
            };
            combatant.tokens = out.tokens;
            match out.hp_delta {
                delta if delta > 0 => {
                    combatant.heal(delta.unsigned_abs());
                }
                delta if delta < 0 => {
                    combatant.lose_hp(delta.unsigned_abs(), None);
                }
                _ => {}
            }
            logs.extend(out.logs);
        }
    }
}

#[derive(Clone, Copy)]
enum TurnBoundary {
    End,
    Start,
}

/// Rolls which player cards resolve as critical this round.
pub fn roll_criticals(
    rng: &dyn RngOracle,
    state: &BattleState,
    cards: &[CardInstance],
    chance_pct: u32,
) -> BTreeSet<InstanceId> {
    cards
        .iter()
        .enumerate()
        .filter(|(slot, _)| {
            let slot = u32::try_from(*slot).unwrap_or(u32::MAX);
            let seed = compute_seed(state.seed, state.round, slot, context::PLAYER_CRITICAL);
            rng.chance(seed, chance_pct)
        })
        .map(|(_, card)| card.instance_id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Card;
    use crate::combat::Unit;
    use crate::rng::PcgRng;
    use crate::token::{TokenId, TokenLedger, TokenRegistry, add_token};

    fn instance(id: &str, card: Card) -> CardInstance {
        CardInstance::new(id, card)
    }

    fn fresh(config: &BattleConfig) -> BattleState {
        BattleState::new(Combatant::new(40), Combatant::new(30), config)
    }

    fn run_to_post(env: &BattleEnv<'_>, mut state: BattleState) -> (BattleState, Vec<String>) {
        let mut logs = Vec::new();
        while state.phase == BattlePhase::Resolve {
            let t = state.step(env).unwrap();
            logs.extend(t.logs);
            state = t.state;
        }
        (state, logs)
    }

    #[test]
    fn full_round_cycle() {
        let catalog = TokenRegistry::builtin();
        let config = BattleConfig::default();
        let env = BattleEnv::new(&catalog, &config);

        let plan = RoundPlan::new(
            vec![
                instance("p-0", Card::attack("strike", 2, 5, 6)),
                instance("p-1", Card::attack("slash", 2, 3, 4)),
            ],
            vec![instance("e-0", Card::attack("bite", 1, 6, 5))],
        );
        let locked = fresh(&config).lock_in(&env, plan).unwrap().state;
        assert_eq!(locked.phase, BattlePhase::Respond);
        assert_eq!(locked.version, 1);
        assert_eq!(locked.combo.as_ref().map(|c| c.name), Some(crate::combo::ComboName::Pair));

        let resolving = locked.begin_resolve().unwrap().state;
        let (post, _) = run_to_post(&env, resolving);
        assert_eq!(post.outcome, Some(BattleOutcome::Continue));
        assert_eq!(post.enemy.hp, 20);
        assert_eq!(post.player.hp, 35);
        assert_eq!(post.credited.len(), 2);

        let summary = post.finish_round(&env, &ComboUsage::new()).unwrap();
        assert_eq!(summary.ether.gain, 44);
        assert_eq!(summary.usage.count(crate::combo::ComboName::Pair), 1);
        assert_eq!(summary.state.phase, BattlePhase::Select);
        assert_eq!(summary.state.round, 2);
        assert_eq!(summary.state.player_ether.points, 44);
    }

    #[test]
    fn queue_is_speed_ordered() {
        let catalog = TokenRegistry::builtin();
        let config = BattleConfig::default();
        let env = BattleEnv::new(&catalog, &config);
        let plan = RoundPlan::new(
            vec![instance("p-0", Card::attack("strike", 1, 7, 1))],
            vec![instance("e-0", Card::attack("bite", 1, 3, 1))],
        );
        let state = fresh(&config).lock_in(&env, plan).unwrap().state;
        let order: Vec<Side> = state.queue.iter().map(|e| e.actor).collect();
        assert_eq!(order, vec![Side::Enemy, Side::Player]);
    }

    #[test]
    fn rewind_is_bounded() {
        let catalog = TokenRegistry::builtin();
        let config = BattleConfig::default();
        let env = BattleEnv::new(&catalog, &config);
        let locked = fresh(&config).lock_in(&env, RoundPlan::default()).unwrap().state;

        let back = locked.rewind().unwrap().state;
        assert_eq!(back.phase, BattlePhase::Select);
        assert_eq!(back.rewinds_left, 0);

        let again = back.lock_in(&env, RoundPlan::default()).unwrap().state;
        assert_eq!(again.rewind().unwrap_err(), PhaseError::NoRewindsLeft);
    }

    #[test]
    fn wrong_phase_is_rejected() {
        let config = BattleConfig::default();
        let catalog = TokenRegistry::builtin();
        let env = BattleEnv::new(&catalog, &config);
        let state = fresh(&config);
        assert!(matches!(
            state.step(&env),
            Err(PhaseError::WrongPhase { phase: BattlePhase::Select, .. })
        ));
        assert!(state.begin_resolve().is_err());
        assert!(state.finish_round(&env, &ComboUsage::new()).is_err());
    }

    #[test]
    fn victory_credits_unresolved_player_cards() {
        let catalog = TokenRegistry::builtin();
        let config = BattleConfig::default();
        let env = BattleEnv::new(&catalog, &config);
        let state = BattleState::new(Combatant::new(40), Combatant::new(30).with_hp(5), &config);
        let plan = RoundPlan::new(
            vec![
                instance("p-0", Card::attack("strike", 1, 2, 10)),
                instance("p-1", Card::defense("guard", 1, 4, 5)),
                instance("p-2", Card::general("focus", 1, 6)),
            ],
            vec![],
        );
        let resolving = state
            .lock_in(&env, plan)
            .unwrap()
            .state
            .begin_resolve()
            .unwrap()
            .state;
        let (post, logs) = run_to_post(&env, resolving);
        assert_eq!(post.outcome, Some(BattleOutcome::Victory));
        assert_eq!(post.cursor, 1);
        assert_eq!(post.credited.len(), 3);
        assert!(logs.iter().any(|l| l.contains("credited")));

        let summary = post.finish_round(&env, &ComboUsage::new()).unwrap();
        assert!(summary.state.over);
        assert_eq!(summary.outcome, BattleOutcome::Victory);
        assert_eq!(
            summary.state.lock_in(&env, RoundPlan::default()).unwrap_err(),
            PhaseError::BattleOver
        );
    }

    #[test]
    fn failing_entry_is_skipped_not_fatal() {
        let catalog = TokenRegistry::builtin();
        let config = BattleConfig::default();
        let env = BattleEnv::new(&catalog, &config);
        let mut broken = Card::attack("broken", 1, 1, 3);
        broken.damage = None;
        let plan = RoundPlan::new(
            vec![
                instance("p-0", broken),
                instance("p-1", Card::attack("strike", 1, 2, 3)),
            ],
            vec![],
        );
        let resolving = fresh(&config)
            .lock_in(&env, plan)
            .unwrap()
            .state
            .begin_resolve()
            .unwrap()
            .state;
        let (post, logs) = run_to_post(&env, resolving);
        assert!(logs.iter().any(|l| l.contains("failed")));
        assert_eq!(post.enemy.hp, 27);
        assert_eq!(post.credited.len(), 1);
    }

    #[test]
    fn finish_round_runs_turn_passives() {
        let catalog = TokenRegistry::builtin();
        let config = BattleConfig::default();
        let env = BattleEnv::new(&catalog, &config);
        let poisoned = add_token(&TokenLedger::new(), &catalog, Side::Enemy, &TokenId::from("poison"), 3, None).tokens;
        let state = BattleState::new(
            Combatant::new(40),
            Combatant::new(30).with_tokens(poisoned),
            &config,
        );
        let resolving = state
            .lock_in(&env, RoundPlan::default())
            .unwrap()
            .state
            .begin_resolve()
            .unwrap()
            .state;
        let (post, _) = run_to_post(&env, resolving);
        let summary = post.finish_round(&env, &ComboUsage::new()).unwrap();
        assert_eq!(summary.state.enemy.hp, 27);
        assert_eq!(summary.ether.gain, 0);
        assert!(summary.usage.is_empty());
    }

    #[test]
    fn burn_on_grouped_enemy_spreads_over_units() {
        let catalog = TokenRegistry::builtin();
        let config = BattleConfig::default();
        let env = BattleEnv::new(&catalog, &config);
        let burning = add_token(&TokenLedger::new(), &catalog, Side::Enemy, &TokenId::from("burn"), 5, None).tokens;
        let enemy = Combatant::with_units([Unit::new(0, "imp", 2), Unit::new(1, "imp", 10)])
            .unwrap()
            .with_tokens(burning);
        let state = BattleState::new(Combatant::new(40), enemy, &config);
        let resolving = state
            .lock_in(&env, RoundPlan::default())
            .unwrap()
            .state
            .begin_resolve()
            .unwrap()
            .state;
        let (post, _) = run_to_post(&env, resolving);
        let summary = post.finish_round(&env, &ComboUsage::new()).unwrap();
        let units: Vec<u32> = summary.state.enemy.units.iter().map(|u| u.hp).collect();
        assert_eq!(units, vec![0, 7]);
        assert_eq!(summary.state.enemy.hp, 7);
        assert!(summary.logs.iter().any(|l| l.contains("(12 → 7)")));
        assert_eq!(summary.outcome, BattleOutcome::Continue);
    }

    #[test]
    fn enemy_overdrive_needs_a_seeded_pool() {
        let catalog = TokenRegistry::builtin();
        let config = BattleConfig {
            enemy_overdrive_enabled: true,
            ..BattleConfig::default()
        };
        let env = BattleEnv::new(&catalog, &config);
        let plan = || {
            RoundPlan::new(
                vec![instance("p-0", Card::attack("strike", 1, 2, 3))],
                vec![instance("e-0", Card::attack("bite", 1, 3, 2))],
            )
        };

        let locked = fresh(&config).lock_in(&env, plan()).unwrap().state;
        let (post, _) = run_to_post(&env, locked.begin_resolve().unwrap().state);
        let summary = post.finish_round(&env, &ComboUsage::new()).unwrap();
        assert!(summary.state.player_ether.points > 0);
        assert_eq!(summary.state.enemy_ether.points, 0);
        let next = summary.state.lock_in(&env, plan()).unwrap().state;
        assert!(!next.enemy.ether_overdrive_active);

        let seeded = fresh(&config).with_ether(EtherPool::default(), EtherPool::new(config.ether_per_slot));
        let locked = seeded.lock_in(&env, plan()).unwrap().state;
        assert!(locked.enemy.ether_overdrive_active);
        assert_eq!(locked.enemy_ether.points, 0);
    }

    #[test]
    fn criticals_are_reproducible() {
        let config = BattleConfig::default();
        let state = fresh(&config).with_seed(99);
        let cards: Vec<_> = (0..6)
            .map(|i| instance(&format!("p-{i}"), Card::attack("strike", 1, 2, 3)))
            .collect();
        let a = roll_criticals(&PcgRng, &state, &cards, 50);
        let b = roll_criticals(&PcgRng, &state, &cards, 50);
        assert_eq!(a, b);
        assert!(roll_criticals(&PcgRng, &state, &cards, 0).is_empty());
        assert_eq!(roll_criticals(&PcgRng, &state, &cards, 100).len(), 6);
    }
}
