use battle_core::{
    ActionContext, BattleConfig, BattleEnv, BattlePhase, BattleState, Card, CardInstance,
    Combatant, ComboName, ComboUsage, DurationType, EnemyMode, EtherGainInput, PlanBudget,
    PlannerConfig, RoundPlan, Side, TimelineAdjustments, TokenId, TokenLedger, TokenRegistry,
    add_token, apply_action, calculate_combo_ether_gain, create_fixed_order, detect_poker_combo,
    generate_enemy_actions, record_combo_usage, remove_token,
};

fn hand(costs: &[u32]) -> Vec<CardInstance> {
    costs
        .iter()
        .enumerate()
        .map(|(i, &cost)| CardInstance::new(format!("p-{i}"), Card::attack("strike", cost, 4, 3)))
        .collect()
}

#[test]
fn combo_and_ether_are_idempotent() {
    let config = BattleConfig::default();
    let cards = hand(&[1, 1, 2, 3]);
    let usage = record_combo_usage(&ComboUsage::new(), ComboName::Pair);

    let combo_a = detect_poker_combo(&cards);
    let combo_b = detect_poker_combo(&cards);
    assert_eq!(combo_a, combo_b);

    let name = combo_a.map(|c| c.name);
    let a = calculate_combo_ether_gain(&EtherGainInput::from_cards(&cards, name, &usage), &config);
    let b = calculate_combo_ether_gain(&EtherGainInput::from_cards(&cards, name, &usage), &config);
    assert_eq!(a, b);
    assert_eq!(a.combo_mult.to_bits(), b.combo_mult.to_bits());
}

#[test]
fn full_house_outranks_triple_and_two_pair() {
    let combo = detect_poker_combo(&hand(&[2, 2, 2, 3, 3])).unwrap();
    assert_eq!(combo.name, ComboName::FullHouse);
    assert_eq!(combo.bonus_keys, Some([2, 3].into_iter().collect()));
}

#[test]
fn unblocked_damage_is_conserved() {
    let tokens = TokenRegistry::builtin();
    let config = BattleConfig::default();
    let env = BattleEnv::new(&tokens, &config);
    let attacker = Combatant::new(50);

    for vuln in [100, 125, 150, 200] {
        for damage in [1, 3, 7, 13, 40] {
            for hp in [1, 10, 25] {
                let defender = Combatant::new(30).with_hp(hp).with_vulnerability(vuln, 2);
                let card = CardInstance::new("p-0", Card::attack("strike", 1, 3, damage));
                let out = apply_action(&env, Side::Player, &attacker, &defender, &card, ActionContext::default())
                    .unwrap();
                let expected = hp.saturating_sub(damage * vuln / 100);
                assert_eq!(out.defender.hp, expected, "vuln {vuln} damage {damage} hp {hp}");
            }
        }
    }
}

#[test]
fn deflation_is_monotonic_and_never_zero() {
    let config = BattleConfig::default();
    let cards = hand(&[2, 2]);
    let mut usage = ComboUsage::new();
    let mut previous = u32::MAX;

    for _ in 0..40 {
        let result = calculate_combo_ether_gain(
            &EtherGainInput::from_cards(&cards, Some(ComboName::Pair), &usage),
            &config,
        );
        assert!(result.gain <= previous);
        assert!(result.deflation_mult > 0.0);
        previous = result.gain;
        usage = record_combo_usage(&usage, ComboName::Pair);
    }
    assert_eq!(previous, 0);
}

#[test]
fn player_track_ignores_enemy_track() {
    let none = TimelineAdjustments::default();
    let player = vec![
        CardInstance::new("p-0", Card::attack("strike", 1, 5, 1)),
        CardInstance::new("p-1", Card::attack("strike", 1, 3, 1)),
    ];
    let alone = create_fixed_order(&player, &[], 0, &none);
    let crowded = create_fixed_order(&player, &hand(&[1, 1, 1, 1]), 0, &none);

    let sps: Vec<i32> = alone.player.iter().map(|e| e.sp).collect();
    assert_eq!(sps, vec![5, 8]);
    assert_eq!(alone.player, crowded.player);
}

#[test]
fn planner_prefers_more_cards_deterministically() {
    let config = PlannerConfig::default();
    let budget = PlanBudget {
        speed_ceiling: 20,
        energy_budget: 4,
        max_cards: 3,
        min_cards: 1,
    };
    let deck = vec![
        Card::attack("cleave", 4, 9, 30),
        Card::attack("jab", 1, 3, 2),
        Card::attack("poke", 1, 4, 2),
        Card::defense("brace", 1, 4, 3),
    ];

    let first = generate_enemy_actions(&deck, &[], EnemyMode::Aggro, &budget, &config);
    let second = generate_enemy_actions(&deck, &[], EnemyMode::Aggro, &budget, &config);
    assert_eq!(first, second);
    assert_eq!(first.cards.len(), 3);
    assert!(first.cards.iter().all(|c| c.id.as_str() != "cleave"));
}

#[test]
fn transitions_never_mutate_their_input() {
    let tokens = TokenRegistry::builtin();
    let config = BattleConfig::default();
    let env = BattleEnv::new(&tokens, &config);
    let state = BattleState::new(Combatant::new(40), Combatant::new(40), &config);
    let snapshot = state.clone();

    let locked = state
        .lock_in(&env, RoundPlan::new(hand(&[1, 2]), vec![]))
        .unwrap()
        .state;
    assert_eq!(state, snapshot);
    assert_eq!(locked.version, state.version + 1);

    let resolving = locked.begin_resolve().unwrap().state;
    let locked_snapshot = locked.clone();
    let stepped = resolving.step(&env).unwrap().state;
    assert_eq!(locked, locked_snapshot);
    assert_eq!(stepped.version, resolving.version + 1);
    assert_eq!(stepped.phase, BattlePhase::Resolve);
}

#[test]
fn ledger_never_holds_zero_stacks() {
    let catalog = TokenRegistry::builtin();
    let regen = TokenId::from("regen");
    let added = add_token(&TokenLedger::new(), &catalog, Side::Player, &regen, 2, None);
    assert_eq!(added.tokens.stacks(&regen), 2);

    let drained = remove_token(&added.tokens, Side::Player, &regen, DurationType::Turn, 5);
    assert!(!drained.tokens.contains(&regen));
    assert!(drained.tokens.is_empty());

    let unknown = add_token(&TokenLedger::new(), &catalog, Side::Player, &TokenId::from("nope"), 3, None);
    assert!(unknown.tokens.is_empty());
    assert!(unknown.logs.is_empty());
}
