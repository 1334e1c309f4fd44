//! Single-action combat math.
//!
//! [`apply_action`] takes both combatants by reference and returns updated
//! copies plus one transcript line per sub-effect. Nothing here touches the
//! queue or the phase; the round driver sequences calls.
//!
//! # Attack math per hit
//!
//! ```text
//! dmg = (damage + strength + attack_up) × overdrive
//! defending with block:
//!     breaking = crush ? dmg × 2 : dmg
//!     breaking <  block  → block absorbs, no hp damage
//!     breaking >= block  → block consumed,
//!                          remainder = dmg − (crush ? ⌈block / 2⌉ : block)
//!                          hp damage = ⌊remainder × vuln⌋
//! otherwise:              hp damage = ⌊dmg × vuln⌋
//! ```
//!
//! Any hit that deals hp damage against a defender holding `counter` costs the
//! attacker `counter` hp directly. Damage soaked by unit block does not count.

use super::{Combatant, ResolveError, Unit, UnitId};
use crate::card::{CardInstance, CardKind, CardTrait, GrantTarget, Targeting};
use crate::env::BattleEnv;
use crate::side::Side;
use crate::token::{
    DurationType, GrantedAt, TokenEffect, TokenId, TokenLedger, add_token, remove_token,
};

/// Per-call circumstances the caller decides.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ActionContext {
    /// Critical resolution: token grants gain the critical bonus.
    pub critical: bool,
}

impl ActionContext {
    pub const fn critical() -> Self {
        Self { critical: true }
    }
}

/// Result of one resolved action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionOutcome {
    pub actor: Combatant,
    pub defender: Combatant,
    /// Total hp the defender lost.
    pub hp_damage: u32,
    /// Total damage absorbed by the defender's block.
    pub blocked: u32,
    /// Total hp the actor lost to counters.
    pub counter_damage: u32,
    pub block_gained: u32,
    pub logs: Vec<String>,
}

/// Applies `card`, played by `actor_side`, to the two combatants.
pub fn apply_action(
    env: &BattleEnv<'_>,
    actor_side: Side,
    actor: &Combatant,
    defender: &Combatant,
    card: &CardInstance,
    ctx: ActionContext,
) -> Result<ActionOutcome, ResolveError> {
    let mut outcome = ActionOutcome {
        actor: actor.clone(),
        defender: defender.clone(),
        hp_damage: 0,
        blocked: 0,
        counter_damage: 0,
        block_gained: 0,
        logs: Vec::new(),
    };

    if card.ghost {
        outcome
            .logs
            .push(format!("{actor_side} {} (ghost) has no effect", card.card.name));
        return Ok(outcome);
    }
    card.card.validate()?;

    match card.card.kind {
        CardKind::Defense => defend(env, actor_side, card, &mut outcome),
        CardKind::Attack => attack(env, actor_side, card, &mut outcome)?,
        CardKind::General => outcome
            .logs
            .push(format!("{actor_side} uses {}", card.card.name)),
    }

    if let Some(counter) = card.card.counter {
        outcome.actor.counter = counter;
        outcome
            .logs
            .push(format!("{actor_side} readies counter {counter}"));
    }

    grant_tokens(env, actor_side, card, ctx, &mut outcome);

    tracing::debug!(
        side = %actor_side,
        card = %card.card.id,
        hp_damage = outcome.hp_damage,
        blocked = outcome.blocked,
        counter = outcome.counter_damage,
        block_gained = outcome.block_gained,
        "action resolved"
    );
    Ok(outcome)
}

fn defend(env: &BattleEnv<'_>, side: Side, card: &CardInstance, outcome: &mut ActionOutcome) {
    let actor = &mut outcome.actor;
    let guard = consume_boosts(env, side, &mut actor.tokens, Boost::Guard, &mut outcome.logs);
    let base = i64::from(card.card.block.unwrap_or(0)) + i64::from(actor.strength);
    let gained = clamp_to_u32(base + i64::from(guard));

    let before = actor.block;
    actor.block = before.saturating_add(gained);
    actor.def = true;
    outcome.block_gained = gained;
    outcome.logs.push(format!(
        "{side} {}: block +{gained} ({before} → {})",
        card.card.name, actor.block
    ));
}

fn attack(
    env: &BattleEnv<'_>,
    side: Side,
    card: &CardInstance,
    outcome: &mut ActionOutcome,
) -> Result<(), ResolveError> {
    let defender_side = side.opponent();
    // Reject bad explicit targets before anything is consumed
    hit_targets(&outcome.defender, card)?;

    let attack_up = consume_boosts(
        env,
        side,
        &mut outcome.actor.tokens,
        Boost::Attack,
        &mut outcome.logs,
    );
    let overdrive = if outcome.actor.ether_overdrive_active {
        env.config.overdrive_multiplier
    } else {
        1
    };
    let base = i64::from(card.card.damage.unwrap_or(0))
        + i64::from(outcome.actor.strength)
        + i64::from(attack_up);
    let per_hit = clamp_to_u32(base).saturating_mul(overdrive);
    let crush = card.card.has_trait(CardTrait::Crush);
    let hits = card.card.hits;

    for hit in 1..=hits {
        if !outcome.defender.is_alive() || !outcome.actor.is_alive() {
            break;
        }
        let targets = hit_targets(&outcome.defender, card)?;
        let hp_before = outcome.defender.hp;

        let (hp_damage, blocked) = absorb(
            &mut outcome.defender,
            per_hit,
            crush,
            defender_side,
            &mut outcome.logs,
        );
        let dealt = if targets.is_empty() {
            outcome.defender.lose_hp(hp_damage, None)
        } else {
            distribute(
                &mut outcome.defender,
                &targets,
                hp_damage,
                defender_side,
                &mut outcome.logs,
            )
        };
        outcome.blocked += blocked;
        outcome.hp_damage += dealt;
        outcome.logs.push(format!(
            "{side} {} hit {hit}/{hits}: {per_hit} damage, {defender_side} hp {hp_before} → {}",
            card.card.name, outcome.defender.hp
        ));

        let counter = outcome.defender.counter;
        if dealt > 0 && counter > 0 {
            let actor_before = outcome.actor.hp;
            let taken = outcome.actor.lose_hp(counter, card.bound_unit);
            outcome.counter_damage += taken;
            outcome.logs.push(format!(
                "{defender_side} counters for {counter}, {side} hp {actor_before} → {}",
                outcome.actor.hp
            ));
        }
    }
    Ok(())
}

/// Runs one hit against the defender's block. Returns (hp damage, absorbed).
fn absorb(
    defender: &mut Combatant,
    damage: u32,
    crush: bool,
    side: Side,
    logs: &mut Vec<String>,
) -> (u32, u32) {
    if !(defender.def && defender.block > 0) {
        return (defender.vulnerable_damage(damage), 0);
    }

    let block = defender.block;
    let tag = if crush { " (crush)" } else { "" };
    let breaking = if crush { damage.saturating_mul(2) } else { damage };
    if breaking < block {
        defender.block = block - breaking;
        logs.push(format!(
            "{side} blocks {breaking}{tag} (block {block} → {})",
            defender.block
        ));
        return (0, breaking);
    }

    defender.block = 0;
    let remainder = if crush {
        damage - block.div_ceil(2)
    } else {
        damage - block
    };
    logs.push(format!("{side} block broken{tag} (block {block} → 0)"));
    (defender.vulnerable_damage(remainder), block)
}

/// Units a hit lands on. Empty when the defender has no units.
fn hit_targets(defender: &Combatant, card: &CardInstance) -> Result<Vec<UnitId>, ResolveError> {
    if !defender.has_units() {
        return Ok(Vec::new());
    }

    let explicit: Vec<UnitId> = match &card.targeting {
        Targeting::Default => Vec::new(),
        Targeting::Unit(id) => vec![*id],
        Targeting::Units(ids) => ids.clone(),
        Targeting::Area => return Ok(defender.living_units().map(|u| u.id).collect()),
    };

    let mut targets = Vec::with_capacity(explicit.len());
    for id in explicit {
        let unit = defender.unit(id).ok_or_else(|| ResolveError::UnknownUnit {
            card: card.card.id.clone(),
            unit: id,
        })?;
        if unit.is_alive() && !targets.contains(&id) {
            targets.push(id);
        }
    }
    if targets.is_empty() {
        targets.extend(defender.living_units().next().map(|u| u.id));
    }
    Ok(targets)
}

/// Applies `amount` to every targeted living unit, each clamped at its own hp.
fn distribute(
    defender: &mut Combatant,
    targets: &[UnitId],
    amount: u32,
    side: Side,
    logs: &mut Vec<String>,
) -> u32 {
    let mut dealt = 0;
    for id in targets {
        let Some(unit) = defender.unit_mut(*id) else {
            continue;
        };
        if !unit.is_alive() {
            continue;
        }
        let absorbed = amount.min(unit.block);
        unit.block -= absorbed;
        let lost = (amount - absorbed).min(unit.hp);
        unit.hp -= lost;
        dealt += lost;
        if !Unit::is_alive(unit) {
            logs.push(format!("{side} {} ({}) falls", unit.name, unit.id));
        }
    }
    defender.sync_hp_from_units();
    dealt
}

#[derive(Clone, Copy)]
enum Boost {
    Attack,
    Guard,
}

/// Sums matching usage-token bonuses and consumes one stack of each.
fn consume_boosts(
    env: &BattleEnv<'_>,
    side: Side,
    tokens: &mut TokenLedger,
    boost: Boost,
    logs: &mut Vec<String>,
) -> u32 {
    let matching: Vec<(TokenId, u32)> = tokens
        .iter()
        .filter(|(_, entry)| entry.duration_type == DurationType::Usage)
        .filter_map(|(id, entry)| {
            let per_stack = match (boost, env.tokens.definition(id)?.effect) {
                (Boost::Attack, TokenEffect::AttackUp(n)) | (Boost::Guard, TokenEffect::GuardUp(n)) => n,
                _ => return None,
            };
            Some((id.clone(), per_stack.saturating_mul(entry.stacks)))
        })
        .collect();

    let mut bonus = 0u32;
    for (id, amount) in matching {
        bonus = bonus.saturating_add(amount);
        let removed = remove_token(tokens, side, &id, DurationType::Usage, 1);
        *tokens = removed.tokens;
        logs.extend(removed.logs);
    }
    bonus
}

fn grant_tokens(
    env: &BattleEnv<'_>,
    side: Side,
    card: &CardInstance,
    ctx: ActionContext,
    outcome: &mut ActionOutcome,
) {
    let granted_at = ctx
        .critical
        .then(|| GrantedAt::critical(env.config.critical_bonus_stacks));

    for grant in &card.card.grants {
        let (owner, holder) = match grant.target {
            GrantTarget::Owner => (side, &mut outcome.actor),
            GrantTarget::Opponent => (side.opponent(), &mut outcome.defender),
        };
        let added = add_token(
            &holder.tokens,
            env.tokens,
            owner,
            &grant.token,
            grant.stacks,
            granted_at,
        );
        holder.tokens = added.tokens;
        outcome.logs.extend(added.logs);
    }
}

fn clamp_to_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}
