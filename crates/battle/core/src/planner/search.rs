//! Opponent action-set search.
//!
//! Candidates are card subsets of the opponent's pool that fit both the speed
//! ceiling and the energy budget. They are ranked by an explicit
//! lexicographic key:
//!
//! 1. more cards
//! 2. higher mode heuristic
//! 3. lower total speed
//! 4. lower total cost
//! 5. sorted card ids, ascending
//!
//! Candidates meeting the mode threshold are preferred over those that do not.
//! Up to `exhaustive_limit` cards every subset is enumerated; beyond that a
//! greedy search extends the best set one card at a time using the same key.

use std::cmp::{Ordering, Reverse};

use super::EnemyMode;
use crate::card::{Card, CardKind};
use crate::config::PlannerConfig;

/// Budgets for one planning call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlanBudget {
    pub speed_ceiling: u32,
    pub energy_budget: u32,
    pub max_cards: usize,
    pub min_cards: usize,
}

impl PlanBudget {
    pub fn from_config(config: &PlannerConfig) -> Self {
        Self {
            speed_ceiling: config.speed_ceiling,
            energy_budget: config.energy_budget,
            max_cards: config.max_cards,
            min_cards: config.min_cards,
        }
    }

    /// Raises both budgets for every living unit beyond the first.
    pub fn relaxed_for(self, living_units: usize, config: &PlannerConfig) -> Self {
        let extra = u32::try_from(living_units.saturating_sub(1)).unwrap_or(u32::MAX);
        Self {
            speed_ceiling: self
                .speed_ceiling
                .saturating_add(extra.saturating_mul(config.speed_per_extra_unit)),
            energy_budget: self
                .energy_budget
                .saturating_add(extra.saturating_mul(config.energy_per_extra_unit)),
            ..self
        }
    }
}

/// Chosen opponent action set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnemyPlan {
    pub mode: EnemyMode,
    pub cards: Vec<Card>,
    /// Heuristic plus the per-card bonus.
    pub score: i64,
    pub heuristic: i64,
    pub total_speed: u32,
    pub total_cost: u32,
    pub meets_threshold: bool,
    /// No subset fit the budgets; the cheapest-card fallback was used.
    pub fallback: bool,
}

impl EnemyPlan {
    fn empty(mode: EnemyMode) -> Self {
        Self {
            mode,
            cards: Vec::new(),
            score: 0,
            heuristic: 0,
            total_speed: 0,
            total_cost: 0,
            meets_threshold: false,
            fallback: true,
        }
    }
}

struct Candidate<'a> {
    indices: Vec<usize>,
    cards: Vec<&'a Card>,
    ids: Vec<&'a str>,
    total_speed: u32,
    total_cost: u32,
    attack_cost: u32,
    defense_cost: u32,
    damage: u32,
    block: u32,
    heuristic: i64,
}

impl<'a> Candidate<'a> {
    fn new(pool: &'a [Card], indices: Vec<usize>, mode: EnemyMode) -> Self {
        let cards: Vec<&Card> = indices.iter().map(|&i| &pool[i]).collect();
        let mut ids: Vec<&str> = cards.iter().map(|c| c.id.as_str()).collect();
        ids.sort_unstable();

        let mut candidate = Self {
            total_speed: cards.iter().map(|c| c.speed_cost).sum(),
            total_cost: cards.iter().map(|c| c.action_cost).sum(),
            attack_cost: kind_cost(&cards, CardKind::Attack),
            defense_cost: kind_cost(&cards, CardKind::Defense),
            damage: cards
                .iter()
                .map(|c| c.damage.unwrap_or(0).saturating_mul(c.hits))
                .sum(),
            block: cards.iter().map(|c| c.block.unwrap_or(0)).sum(),
            indices,
            cards,
            ids,
            heuristic: 0,
        };
        candidate.heuristic = candidate.score_for(mode);
        candidate
    }

    fn score_for(&self, mode: EnemyMode) -> i64 {
        let speed = i64::from(self.total_speed);
        match mode {
            EnemyMode::Aggro => {
                i64::from(self.attack_cost) * 10 + i64::from(self.damage) * 3 - speed
            }
            EnemyMode::Turtle => {
                i64::from(self.defense_cost) * 10 + i64::from(self.block) * 3 - speed
            }
            EnemyMode::Balanced => (i64::from(self.damage) + i64::from(self.block)) * 2 - speed,
        }
    }

    fn fits(&self, budget: &PlanBudget) -> bool {
        self.total_speed <= budget.speed_ceiling && self.total_cost <= budget.energy_budget
    }

    fn meets_threshold(&self, mode: EnemyMode, config: &PlannerConfig) -> bool {
        match mode {
            EnemyMode::Aggro => self.attack_cost >= config.aggro_min_attack_cost,
            EnemyMode::Turtle => self.defense_cost >= config.turtle_min_defense_cost,
            EnemyMode::Balanced => self.attack_cost == self.defense_cost,
        }
    }

    fn rank_key(&self) -> (Reverse<usize>, Reverse<i64>, u32, u32, &[&'a str]) {
        (
            Reverse(self.cards.len()),
            Reverse(self.heuristic),
            self.total_speed,
            self.total_cost,
            &self.ids,
        )
    }

    fn rank(&self, other: &Self) -> Ordering {
        self.rank_key().cmp(&other.rank_key())
    }

    fn score(&self, config: &PlannerConfig) -> i64 {
        let count = i64::try_from(self.cards.len()).unwrap_or(i64::MAX);
        self.heuristic
            .saturating_add(config.card_bonus.saturating_mul(count))
    }
}

fn kind_cost(cards: &[&Card], kind: CardKind) -> u32 {
    cards
        .iter()
        .filter(|c| c.kind == kind)
        .map(|c| c.action_cost)
        .sum()
}

/// Opponent deck, topped up from the shared fallback pool.
///
/// An empty deck uses the fallback pool alone. A deck smaller than
/// `min_cards` gets the fallback pool appended, and the result is cycled until
/// it holds at least `min_cards` cards.
pub fn build_pool(deck: &[Card], fallback: &[Card], min_cards: usize) -> Vec<Card> {
    let mut pool = deck.to_vec();
    if pool.len() < min_cards || pool.is_empty() {
        pool.extend(fallback.iter().cloned());
    }
    if pool.is_empty() {
        return pool;
    }
    let base = pool.len();
    let mut i = 0;
    while pool.len() < min_cards {
        pool.push(pool[i % base].clone());
        i += 1;
    }
    pool
}

/// Picks the opponent's action set for this round.
pub fn generate_enemy_actions(
    deck: &[Card],
    fallback: &[Card],
    mode: EnemyMode,
    budget: &PlanBudget,
    config: &PlannerConfig,
) -> EnemyPlan {
    let pool = build_pool(deck, fallback, budget.min_cards);
    if pool.is_empty() || budget.max_cards == 0 {
        return EnemyPlan::empty(mode);
    }

    let index_sets = if budget.max_cards <= config.exhaustive_limit {
        subsets(pool.len(), budget.max_cards)
    } else {
        greedy_chain(&pool, mode, budget)
    };

    tracing::debug!(
        "EnemyPlanner: Evaluating {} subsets ({mode}, speed<={}, energy<={})",
        index_sets.len(),
        budget.speed_ceiling,
        budget.energy_budget
    );

    let feasible: Vec<Candidate<'_>> = index_sets
        .into_iter()
        .map(|indices| Candidate::new(&pool, indices, mode))
        .filter(|c| c.fits(budget))
        .collect();

    for candidate in &feasible {
        tracing::debug!(
            "  Candidate {:?}: score={} (heuristic={}, speed={}, cost={}, threshold={})",
            candidate.ids,
            candidate.score(config),
            candidate.heuristic,
            candidate.total_speed,
            candidate.total_cost,
            candidate.meets_threshold(mode, config)
        );
    }

    let any_meets = feasible.iter().any(|c| c.meets_threshold(mode, config));
    let Some(best) = feasible
        .iter()
        .filter(|c| !any_meets || c.meets_threshold(mode, config))
        .min_by(|a, b| a.rank(b))
    else {
        return cheapest_affordable(&pool, mode, budget);
    };

    tracing::debug!(
        "EnemyPlanner: Best set = {:?} (score={})",
        best.ids,
        best.score(config)
    );

    EnemyPlan {
        mode,
        cards: best.cards.iter().map(|&c| c.clone()).collect(),
        score: best.score(config),
        heuristic: best.heuristic,
        total_speed: best.total_speed,
        total_cost: best.total_cost,
        meets_threshold: best.meets_threshold(mode, config),
        fallback: false,
    }
}

/// Single cheapest card within the energy budget, or nothing.
fn cheapest_affordable(pool: &[Card], mode: EnemyMode, budget: &PlanBudget) -> EnemyPlan {
    let Some(card) = pool
        .iter()
        .filter(|c| c.action_cost <= budget.energy_budget)
        .min_by(|a, b| {
            (a.action_cost, a.speed_cost, a.id.as_str())
                .cmp(&(b.action_cost, b.speed_cost, b.id.as_str()))
        })
    else {
        tracing::debug!("EnemyPlanner: Nothing affordable, empty plan");
        return EnemyPlan::empty(mode);
    };

    tracing::debug!("EnemyPlanner: Falling back to cheapest card {}", card.id);
    EnemyPlan {
        mode,
        cards: vec![card.clone()],
        total_speed: card.speed_cost,
        total_cost: card.action_cost,
        ..EnemyPlan::empty(mode)
    }
}

/// Every non-empty index subset of size at most `max`, in lexicographic order.
fn subsets(n: usize, max: usize) -> Vec<Vec<usize>> {
    fn walk(start: usize, n: usize, max: usize, current: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        for i in start..n {
            current.push(i);
            out.push(current.clone());
            if current.len() < max {
                walk(i + 1, n, max, current, out);
            }
            current.pop();
        }
    }

    let mut out = Vec::new();
    walk(0, n, max, &mut Vec::with_capacity(max), &mut out);
    out
}

/// Prefixes of a greedily grown set: each step adds the card giving the best key.
fn greedy_chain(pool: &[Card], mode: EnemyMode, budget: &PlanBudget) -> Vec<Vec<usize>> {
    let mut chosen: Vec<usize> = Vec::new();
    let mut prefixes = Vec::new();

    while chosen.len() < budget.max_cards {
        let best = (0..pool.len())
            .filter(|i| !chosen.contains(i))
            .map(|i| {
                let mut next = chosen.clone();
                next.push(i);
                Candidate::new(pool, next, mode)
            })
            .filter(|c| c.fits(budget))
            .min_by(|a, b| a.rank(b));
        let Some(best) = best else {
            break;
        };
        chosen = best.indices;
        prefixes.push(chosen.clone());
    }
    prefixes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PlannerConfig {
        PlannerConfig::default()
    }

    fn budget(speed: u32, energy: u32, max_cards: usize) -> PlanBudget {
        PlanBudget {
            speed_ceiling: speed,
            energy_budget: energy,
            max_cards,
            min_cards: 1,
        }
    }

    fn ids(plan: &EnemyPlan) -> Vec<&str> {
        let mut ids: Vec<&str> = plan.cards.iter().map(|c| c.id.as_str()).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn subsets_enumerates_up_to_max() {
        let all = subsets(4, 3);
        // C(4,1) + C(4,2) + C(4,3)
        assert_eq!(all.len(), 4 + 6 + 4);
        assert!(all.iter().all(|s| !s.is_empty() && s.len() <= 3));
    }

    #[test]
    fn more_cards_beat_higher_heuristic() {
        let deck = vec![
            Card::attack("big", 3, 10, 30),
            Card::attack("jab", 1, 3, 2),
            Card::attack("poke", 1, 3, 2),
        ];
        let plan = generate_enemy_actions(&deck, &[], EnemyMode::Aggro, &budget(30, 3, 3), &config());
        // "big" alone scores far higher on damage, but two cheap cards win
        assert_eq!(ids(&plan), vec!["jab", "poke"]);
        assert!(!plan.fallback);
        assert_eq!(plan.score, plan.heuristic + 2 * config().card_bonus);
    }

    #[test]
    fn planning_is_deterministic() {
        let deck = vec![
            Card::attack("a", 1, 4, 5),
            Card::defense("b", 1, 4, 5),
            Card::attack("c", 2, 6, 8),
            Card::defense("d", 2, 5, 9),
        ];
        let b = budget(15, 4, 3);
        let first = generate_enemy_actions(&deck, &[], EnemyMode::Balanced, &b, &config());
        let second = generate_enemy_actions(&deck, &[], EnemyMode::Balanced, &b, &config());
        assert_eq!(first, second);
    }

    #[test]
    fn threshold_meeting_sets_are_preferred() {
        let deck = vec![
            Card::defense("wall", 2, 5, 10),
            Card::general("wait", 1, 2),
            Card::general("think", 1, 2),
        ];
        // Turtle wants defense cost >= 2: only sets with "wall" qualify
        let plan = generate_enemy_actions(&deck, &[], EnemyMode::Turtle, &budget(30, 3, 3), &config());
        assert!(plan.meets_threshold);
        assert!(ids(&plan).contains(&"wall"));
        assert_eq!(plan.cards.len(), 2);
    }

    #[test]
    fn ties_break_on_speed_then_cost_then_ids() {
        let deck = vec![
            Card::general("b", 1, 3),
            Card::general("a", 1, 3),
            Card::general("slow", 1, 5),
        ];
        let plan = generate_enemy_actions(&deck, &[], EnemyMode::Aggro, &budget(30, 10, 1), &config());
        assert_eq!(ids(&plan), vec!["a"]);
    }

    #[test]
    fn unsatisfiable_budget_falls_back_to_cheapest_card() {
        let deck = vec![Card::attack("heavy", 2, 50, 9), Card::attack("light", 1, 40, 3)];
        let plan = generate_enemy_actions(&deck, &[], EnemyMode::Aggro, &budget(10, 5, 3), &config());
        assert!(plan.fallback);
        assert_eq!(ids(&plan), vec!["light"]);

        let broke = generate_enemy_actions(&deck, &[], EnemyMode::Aggro, &budget(10, 0, 3), &config());
        assert!(broke.cards.is_empty());
    }

    #[test]
    fn empty_deck_uses_fallback_pool() {
        let fallback = vec![Card::attack("scratch", 1, 4, 3)];
        let pool = build_pool(&[], &fallback, 2);
        assert_eq!(pool.len(), 2);
        assert!(pool.iter().all(|c| c.id.as_str() == "scratch"));

        let b = PlanBudget {
            min_cards: 2,
            ..budget(30, 6, 3)
        };
        let plan = generate_enemy_actions(&[], &fallback, EnemyMode::Aggro, &b, &config());
        assert_eq!(plan.cards.len(), 2);
    }

    #[test]
    fn small_deck_is_topped_up() {
        let deck = vec![Card::attack("bite", 1, 4, 3)];
        let fallback = vec![Card::defense("hide", 1, 4, 3)];
        let pool = build_pool(&deck, &fallback, 3);
        let names: Vec<&str> = pool.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(names, vec!["bite", "hide", "bite"]);

        assert_eq!(build_pool(&deck, &fallback, 1).len(), 1);
        assert!(build_pool(&[], &[], 3).is_empty());
    }

    #[test]
    fn extra_units_relax_budgets() {
        let config = config();
        let base = PlanBudget::from_config(&config);
        assert_eq!(base.relaxed_for(1, &config), base);
        let relaxed = base.relaxed_for(3, &config);
        assert_eq!(relaxed.speed_ceiling, base.speed_ceiling + 20);
        assert_eq!(relaxed.energy_budget, base.energy_budget + 4);
    }

    #[test]
    fn greedy_search_beyond_exhaustive_limit() {
        let deck: Vec<Card> = (0..8)
            .map(|i| Card::attack(&format!("c{i}"), 1, 2 + i, 3 + i))
            .collect();
        let b = budget(100, 5, 5);
        let plan = generate_enemy_actions(&deck, &[], EnemyMode::Aggro, &b, &config());
        assert_eq!(plan.cards.len(), 5);
        assert!(plan.total_cost <= 5);
        assert_eq!(plan, generate_enemy_actions(&deck, &[], EnemyMode::Aggro, &b, &config()));
    }
}
