//! Structural checks run against the live state after every harness step.
use demos_game::{GameState, ResourceType};

const GOLD_TOLERANCE: f64 = 1e-9;
const EFFECTIVENESS_TOLERANCE: f64 = 1e-12;
const PRICE_TOLERANCE: f64 = 1e-9;

/// Every violated invariant, described for the report. Empty means healthy.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<String> {
    let mut failures = Vec::new();
    let seats = state.num_players();

    if state.points.len() != seats || state.points_delta.len() != seats {
        failures.push(format!(
            "points ({}) / points_delta ({}) do not match {seats} seats",
            state.points.len(),
            state.points_delta.len()
        ));
    }
    if state.elections.len() != seats {
        failures.push(format!(
            "{} election blocks for {seats} seats",
            state.elections.len()
        ));
    }
    for block in &state.elections {
        if block.contribution.len() != seats {
            failures.push(format!(
                "block {} tracks {} contributions",
                block.name,
                block.contribution.len()
            ));
        }
        if block.contribution.iter().any(|c| !c.is_finite() || *c < 0.0) {
            failures.push(format!("block {} has an invalid contribution", block.name));
        }
    }

    let mut order = state.turn.order.clone();
    order.sort_unstable();
    if order != (0..seats).collect::<Vec<_>>() || state.turn.position >= seats {
        failures.push(format!(
            "turn order {:?} at position {} is not a permutation",
            state.turn.order, state.turn.position
        ));
    }

    for resource in ResourceType::ALL {
        let market = resource.market();
        let price = state.market_price.get(resource);
        if !(market.min - PRICE_TOLERANCE..=market.max + PRICE_TOLERANCE).contains(&price) {
            failures.push(format!("{resource} price {price} outside its market range"));
        }
    }

    if state.rules.history_cap.is_none()
        && state.sold_resources_history.len() != usize::try_from(state.cycle_count).unwrap_or(usize::MAX)
    {
        failures.push(format!(
            "history holds {} cycles after {} resolutions",
            state.sold_resources_history.len(),
            state.cycle_count
        ));
    }

    for (seat, player) in state.players.iter().enumerate() {
        if !player.gold.is_finite() || player.gold < -GOLD_TOLERANCE {
            failures.push(format!("seat {seat} holds {} gold", player.gold));
        }
        let capacity = player.factory_capacity(state.rules.factory_capacity_per_unit);
        if player.factory_conversion_left > capacity {
            failures.push(format!(
                "seat {seat} conversion left {} exceeds capacity {capacity}",
                player.factory_conversion_left
            ));
        }
        let expected = player.active_campaign_effects.effectiveness();
        if (player.campaign_effectiveness - expected).abs() > EFFECTIVENESS_TOLERANCE {
            failures.push(format!(
                "seat {seat} effectiveness {} differs from ledger {expected}",
                player.campaign_effectiveness
            ));
        }
    }

    failures
}

/// A seat starts its turn with nothing queued. Only meaningful once rounds
/// resolve, i.e. with more than one seat.
#[must_use]
pub fn check_turn_start(state: &GameState, seat: usize) -> Option<String> {
    if state.num_players() < 2 {
        return None;
    }
    let player = state.player(seat)?;
    (!player.sell_resources.is_empty())
        .then(|| format!("seat {seat} starts its turn with queued sales"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use demos_game::{InvestmentType, MatchRng, RulesConfig};

    fn fresh(num_players: usize) -> GameState {
        let mut rng = MatchRng::from_seed(3);
        GameState::setup(num_players, None, RulesConfig::default(), &mut rng).unwrap()
    }

    #[test]
    fn fresh_state_is_healthy() {
        assert!(check_invariants(&fresh(4)).is_empty());
    }

    #[test]
    fn detects_capacity_overflow_and_debt() {
        let mut state = fresh(2);
        state.players[0].investments.add(InvestmentType::Factory, 1);
        state.players[0].factory_conversion_left = 5;
        state.players[1].gold = -3.0;
        let failures = check_invariants(&state);
        assert_eq!(failures.len(), 2);
    }

    #[test]
    fn detects_stale_effectiveness_and_bad_order() {
        let mut state = fresh(3);
        state.players[2].campaign_effectiveness = 4.0;
        state.turn.order = vec![0, 0, 1];
        assert_eq!(check_invariants(&state).len(), 2);
    }

    #[test]
    fn queued_sales_at_turn_start_are_flagged() {
        let mut state = fresh(2);
        assert!(check_turn_start(&state, 0).is_none());
        state.players[0]
            .sell_resources
            .add(demos_game::ResourceType::Wine, 1);
        assert!(check_turn_start(&state, 0).is_some());

        let mut solo = fresh(1);
        solo.players[0]
            .sell_resources
            .add(demos_game::ResourceType::Wine, 1);
        assert!(check_turn_start(&solo, 0).is_none());
    }
}
