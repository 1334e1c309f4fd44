//! Opponent round planning.
//!
//! A round plan is produced in three steps:
//!
//! 1. [`decide_enemy_mode`] rolls a stance from the opponent's weight table.
//! 2. [`generate_enemy_actions`] searches the deck for the best card subset
//!    under the (unit-relaxed) budgets.
//! 3. [`bind_to_units`] turns the chosen cards into instances, adding ghost
//!    copies for grouped opponents.
//!
//! [`plan_enemy_round`] runs all three with a seed derived from the battle
//! seed and round, so a given battle always plans the same way.

mod binding;
mod mode;
mod search;

pub use binding::bind_to_units;
pub use mode::{EnemyMode, ModeWeightTable, ModeWeights, UniformWeights, decide_enemy_mode};
pub use search::{EnemyPlan, PlanBudget, build_pool, generate_enemy_actions};

use crate::card::{Card, CardInstance};
use crate::combat::Combatant;
use crate::env::BattleEnv;
use crate::rng::{compute_seed, context};

/// Inputs for planning one opponent round.
#[derive(Clone, Copy, Debug)]
pub struct PlanRequest<'a> {
    pub enemy_id: &'a str,
    pub deck: &'a [Card],
    /// Shared pool used when the deck is empty or too small.
    pub fallback: &'a [Card],
    pub enemy: &'a Combatant,
    pub battle_seed: u64,
    pub round: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedRound {
    pub mode: EnemyMode,
    pub plan: EnemyPlan,
    /// Ready to pass to `RoundPlan::new` as the opponent's cards.
    pub instances: Vec<CardInstance>,
}

/// Plans the opponent's cards for `request.round`.
pub fn plan_enemy_round<W>(request: &PlanRequest<'_>, weights: &W, env: &BattleEnv<'_>) -> PlannedRound
where
    W: ModeWeights + ?Sized,
{
    let seed = compute_seed(request.battle_seed, request.round, 0, context::ENEMY_MODE);
    let mode = decide_enemy_mode(request.enemy_id, weights, env.rng, seed);

    let planner = &env.config.planner;
    let budget =
        PlanBudget::from_config(planner).relaxed_for(request.enemy.living_unit_count(), planner);
    let plan = generate_enemy_actions(request.deck, request.fallback, mode, &budget, planner);
    let instances = bind_to_units(&plan.cards, request.enemy, request.round);

    tracing::debug!(
        enemy_id = request.enemy_id,
        round = request.round,
        %mode,
        cards = plan.cards.len(),
        instances = instances.len(),
        fallback = plan.fallback,
        "enemy round planned"
    );

    PlannedRound {
        mode,
        plan,
        instances,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::Unit;
    use crate::config::BattleConfig;
    use crate::token::TokenRegistry;

    fn deck() -> Vec<Card> {
        vec![
            Card::attack("bite", 1, 4, 4),
            Card::attack("lunge", 2, 8, 9),
            Card::defense("curl", 1, 5, 6),
            Card::defense("shell", 2, 7, 10),
        ]
    }

    #[test]
    fn same_inputs_same_plan() {
        let tokens = TokenRegistry::builtin();
        let config = BattleConfig::default();
        let env = BattleEnv::new(&tokens, &config);
        let enemy = Combatant::new(30);
        let deck = deck();
        let request = PlanRequest {
            enemy_id: "slime",
            deck: &deck,
            fallback: &[],
            enemy: &enemy,
            battle_seed: 99,
            round: 3,
        };

        let a = plan_enemy_round(&request, &UniformWeights, &env);
        let b = plan_enemy_round(&request, &UniformWeights, &env);
        assert_eq!(a, b);
        assert!(!a.plan.cards.is_empty());
        assert!(a.plan.total_cost <= config.planner.energy_budget);
        assert!(a.plan.total_speed <= config.planner.speed_ceiling);
    }

    #[test]
    fn grouped_enemy_gets_ghosts_and_bigger_budget() {
        let tokens = TokenRegistry::builtin();
        let config = BattleConfig::default();
        let env = BattleEnv::new(&tokens, &config);
        let pack = Combatant::with_units([
            Unit::new(0, "wolf", 8),
            Unit::new(1, "wolf", 8),
        ])
        .unwrap();
        let deck = deck();
        let request = PlanRequest {
            enemy_id: "wolves",
            deck: &deck,
            fallback: &[],
            enemy: &pack,
            battle_seed: 7,
            round: 1,
        };

        let planned = plan_enemy_round(&request, &UniformWeights, &env);
        let real = planned.instances.iter().filter(|i| !i.ghost).count();
        let ghosts = planned.instances.iter().filter(|i| i.ghost).count();
        assert_eq!(real, planned.plan.cards.len());
        assert_eq!(ghosts, real);
        assert!(planned.plan.total_cost <= config.planner.energy_budget + config.planner.energy_per_extra_unit);
    }
}
