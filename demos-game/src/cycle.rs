//! Cycle resolution: runs once per completed round, in a fixed order.
//!
//! 1. Aggregate every queued sale into one record and append it to history.
//! 2. Reprice every resource from the history window.
//! 3. Award election points and regenerate the blocks.
//! 4. Per player: production, factory recharge, sale settlement, bribery
//!    backfire, effect decay.
//!
//! Steps 1-3 finish before step 4 starts, so settlement always sees the
//! prices of the cycle being closed.
use crate::campaign::{CampaignEffect, roll_bribery_backfire};
use crate::election::{generate_elections, tally_awards};
use crate::market::MarketPrices;
use crate::resources::{InvestmentType, ResourceStock};
use crate::rng::MatchRng;
use crate::state::{GameState, PlayerEvent, PlayerState};

/// Summary of one resolved cycle, handed back to the host and the tester.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// The cycle count after resolution.
    pub cycle: u32,
    pub sold: ResourceStock,
    pub prices: MarketPrices,
    pub awards: Vec<u32>,
    pub settlements: Vec<f64>,
    pub exposed: Vec<usize>,
}

pub fn resolve_cycle(state: &mut GameState, rng: &mut MatchRng) -> CycleReport {
    let stamp = state.cycle_count;

    let sold: ResourceStock = state
        .players
        .iter()
        .flat_map(|player| player.sell_resources.iter())
        .collect();
    state.record_sales(sold.clone());

    state.market_price =
        MarketPrices::from_history(&state.sold_resources_history, state.rules.market_window);

    let awards = resolve_elections(state, rng);

    let mut settlements = Vec::with_capacity(state.num_players());
    let mut exposed = Vec::new();
    let GameState {
        players,
        market_price,
        rules,
        ..
    } = state;
    for (seat, player) in players.iter_mut().enumerate() {
        apply_production(player);
        player.factory_conversion_left = player.factory_capacity(rules.factory_capacity_per_unit);

        let income = settle_sales(player, market_price, stamp);
        log::debug!("seat {seat} settled {income:.3} gold in cycle {stamp}");
        settlements.push(income);

        if roll_bribery_backfire(player.has_bribed, rules.bribery_catch_chance, rng.bribery()) {
            player.active_campaign_effects.add(CampaignEffect::BriberyScandal);
            player.push_event(stamp, PlayerEvent::BriberyExposed);
            exposed.push(seat);
        }
        player.has_bribed = false;

        for effect in player.active_campaign_effects.decay() {
            player.push_event(stamp, PlayerEvent::EffectExpired { effect });
        }
        player.recompute_effectiveness();
    }

    state.cycle_count += 1;
    log::info!(
        "cycle {stamp} resolved: sold {:?}, awards {awards:?}, exposed {exposed:?}",
        sold.iter().collect::<Vec<_>>()
    );
    CycleReport {
        cycle: state.cycle_count,
        sold,
        prices: state.market_price.clone(),
        awards,
        settlements,
        exposed,
    }
}

/// Award points for the closing blocks, notify winners and draw a fresh set.
/// Returns the points each seat gained.
pub fn resolve_elections(state: &mut GameState, rng: &mut MatchRng) -> Vec<u32> {
    let stamp = state.cycle_count;
    let num_players = state.num_players();
    let awards = tally_awards(&state.elections, num_players);

    for block in &state.elections {
        if let Some(seat) = block.winner()
            && let Some(player) = state.players.get_mut(seat)
        {
            player.push_event(
                stamp,
                PlayerEvent::ElectionWon {
                    block: block.name.clone(),
                    points: block.point_awards,
                },
            );
        }
    }

    for (seat, gained) in awards.iter().copied().enumerate() {
        if let Some(total) = state.points.get_mut(seat) {
            *total = total.saturating_add(gained);
        }
        if gained > 0
            && let Some(player) = state.players.get_mut(seat)
        {
            player.push_event(stamp, PlayerEvent::PointsAwarded { total: gained });
        }
    }
    state.points_delta.clone_from(&awards);

    state.elections = generate_elections(num_players, num_players, rng.elections());
    awards
}

/// Every owned production unit yields its resource.
fn apply_production(player: &mut PlayerState) {
    for kind in InvestmentType::ALL {
        if let Some((resource, per_unit)) = kind.produces() {
            let owned = player.investments.get(kind);
            player.resources.add(resource, owned.saturating_mul(per_unit));
        }
    }
}

/// Sell the queued units at current prices and clear the queue.
fn settle_sales(player: &mut PlayerState, prices: &MarketPrices, stamp: u32) -> f64 {
    let income = prices.settle(&player.sell_resources);
    player.gold += income;
    player.sell_resources.clear();
    if income != 0.0 {
        player.push_event(stamp, PlayerEvent::SalesSettled { gold: income });
    }
    income
}
