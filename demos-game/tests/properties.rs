use demos_game::campaign::CampaignLedger;
use demos_game::resources::MarketParams;
use demos_game::{
    CampaignEffect, GameState, InvalidMove, InvestmentType, MatchRng, Move, ResourceType,
    RulesConfig, Victory, apply_move, check_victory, determine_winner, on_phase_transition, price,
};

fn setup(num_players: usize, seed: u64) -> (GameState, MatchRng) {
    let mut rng = MatchRng::from_seed(seed);
    let state = GameState::setup(num_players, None, RulesConfig::default(), &mut rng).unwrap();
    (state, rng)
}

#[test]
fn price_starts_at_max_and_decays_toward_min() {
    for resource in ResourceType::ALL {
        let market = resource.market();
        assert!((price(0.0, market) - market.max).abs() < 1e-12);
        let mut previous = price(0.0, market);
        for sold in [1.0, 5.0, 25.0, 100.0, 1_000.0] {
            let current = price(sold, market);
            assert!(current < previous, "{resource} price must fall with volume");
            assert!(current > market.min);
            previous = current;
        }
        assert!((price(1e9, market) - market.min).abs() < 1e-9);
    }
}

#[test]
fn price_is_flat_without_demand_constant() {
    let market = MarketParams {
        min: 0.3,
        max: 0.9,
        demand_constant: 0.0,
    };
    for sold in [0.0, 1.0, 500.0] {
        assert!((price(sold, market) - 0.3).abs() < f64::EPSILON);
    }
}

#[test]
fn sell_queue_conserves_stock_within_a_cycle() {
    let (mut state, mut rng) = setup(2, 31);
    state.players[0].resources.add(ResourceType::Olive, 9);
    for request in [2, 5, 7, 0, 3] {
        apply_move(
            &mut state,
            0,
            &Move::SellResource {
                kind: ResourceType::Olive,
                amount: request,
            },
            &mut rng,
        )
        .unwrap();
        let player = &state.players[0];
        assert_eq!(
            player.resources.get(ResourceType::Olive) + player.sell_resources.get(ResourceType::Olive),
            9
        );
    }
    assert_eq!(state.players[0].resources.get(ResourceType::Olive), 0);
}

#[test]
fn winner_needs_strict_maximum_and_follows_rotation() {
    assert_eq!(determine_winner(&[0.0, 0.0, 0.0]), None);
    assert_eq!(determine_winner(&[4.0, 4.0, 1.0]), None);
    let board = [1.5, 0.0, 7.25, 3.0, 2.0];
    for shift in 0..board.len() {
        let mut rotated = board;
        rotated.rotate_right(shift);
        assert_eq!(determine_winner(&rotated), Some((2 + shift) % board.len()));
    }
}

#[test]
fn effectiveness_stacking_rules() {
    assert!((CampaignLedger::default().effectiveness() - 1.0).abs() < f64::EPSILON);

    let rally = CampaignEffect::Rally.descriptor();
    let mut stacked = CampaignLedger::default();
    stacked.add(CampaignEffect::Rally);
    stacked.add(CampaignEffect::Rally);
    assert!((stacked.effectiveness() - (1.0 + 2.0 * rally.delta)).abs() < 1e-12);

    let press = CampaignEffect::PressCoverage.descriptor();
    let mut flat = CampaignLedger::default();
    flat.add(CampaignEffect::PressCoverage);
    flat.add(CampaignEffect::PressCoverage);
    assert!((flat.effectiveness() - (1.0 + press.delta)).abs() < 1e-12);
}

#[test]
fn one_cycle_from_setup() {
    let (mut state, mut rng) = setup(3, 4);
    let report = on_phase_transition(&mut state, &mut rng);
    assert_eq!(state.cycle_count, 1);
    assert_eq!(report.cycle, 1);
    assert!(state.players.iter().all(|p| p.sell_resources.is_empty()));
    for resource in ResourceType::ALL {
        assert!(state.market_price.iter().any(|(r, _)| r == resource));
    }
}

#[test]
fn invest_then_produce() {
    let (mut state, mut rng) = setup(3, 10);
    apply_move(
        &mut state,
        0,
        &Move::Invest {
            kind: InvestmentType::Grain,
            amount: 10,
        },
        &mut rng,
    )
    .unwrap();
    assert!((state.players[0].gold - 75.0).abs() < 1e-12);
    assert_eq!(state.players[0].investments.get(InvestmentType::Grain), 10);

    on_phase_transition(&mut state, &mut rng);
    assert_eq!(state.players[0].resources.get(ResourceType::Grain), 10);
}

#[test]
fn victory_requires_unique_leader() {
    let (mut state, _) = setup(3, 1);
    state.victory_condition_points = 150;
    state.points = vec![150, 150, 90];
    assert_eq!(check_victory(&state), None);
    state.points = vec![150, 90, 90];
    assert_eq!(check_victory(&state), Some(Victory { winner: 0 }));
}

#[test]
fn rejected_moves_leave_state_untouched() {
    let (mut state, mut rng) = setup(3, 2);
    let snapshot = state.clone();
    let rejected = [
        (
            Move::FactoryConvert {
                from: ResourceType::Grain,
                to: ResourceType::Wine,
                amount: 1,
            },
            InvalidMove::ConversionNotAllowed {
                from: ResourceType::Grain,
                to: ResourceType::Wine,
            },
        ),
        (
            Move::SellResource {
                kind: ResourceType::Grain,
                amount: -2,
            },
            InvalidMove::NegativeAmount,
        ),
        (
            Move::BuyCampaignImprovement {
                effect: CampaignEffect::BriberyScandal,
            },
            InvalidMove::NotPurchasable(CampaignEffect::BriberyScandal),
        ),
    ];
    for (mv, expected) in rejected {
        assert_eq!(apply_move(&mut state, 1, &mv, &mut rng), Err(expected));
    }
    assert_eq!(state, snapshot);
}
