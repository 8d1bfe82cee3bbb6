//! Authoritative match state and its construction.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::campaign::{CampaignEffect, CampaignLedger};
use crate::config::{ConfigError, RulesConfig};
use crate::constants::{
    LOG_BRIBERY_EXPOSED, LOG_EFFECT_EXPIRED, LOG_ELECTION_WON, LOG_POINTS_AWARDED,
    LOG_SALES_SETTLED, MAX_PLAYERS, MIN_PLAYERS,
};
use crate::election::{ElectionBlock, generate_elections};
use crate::market::MarketPrices;
use crate::resources::{InvestmentHoldings, InvestmentType, ResourceStock};
use crate::rng::MatchRng;
use crate::scheduler::{Phase, TurnOrder};

/// Errors that prevent a match from being created.
#[derive(Debug, Error, PartialEq)]
pub enum SetupError {
    #[error("player count {num_players} outside supported range {min}..={max}")]
    PlayerCount {
        num_players: usize,
        min: usize,
        max: usize,
    },
    #[error(transparent)]
    Rules(#[from] ConfigError),
}

/// Notification surfaced to a single player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlayerEvent {
    ElectionWon { block: String, points: u32 },
    PointsAwarded { total: u32 },
    SalesSettled { gold: f64 },
    BriberyExposed,
    EffectExpired { effect: CampaignEffect },
}

impl PlayerEvent {
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::ElectionWon { .. } => LOG_ELECTION_WON,
            Self::PointsAwarded { .. } => LOG_POINTS_AWARDED,
            Self::SalesSettled { .. } => LOG_SALES_SETTLED,
            Self::BriberyExposed => LOG_BRIBERY_EXPOSED,
            Self::EffectExpired { .. } => LOG_EFFECT_EXPIRED,
        }
    }
}

/// A notification stamped with the cycle in which it happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEntry {
    pub cycle: u32,
    #[serde(flatten)]
    pub event: PlayerEvent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub events_log: Vec<EventEntry>,
    pub gold: f64,
    pub investments: InvestmentHoldings,
    pub resources: ResourceStock,
    /// Units queued for sale this cycle; already removed from `resources`.
    pub sell_resources: ResourceStock,
    pub factory_conversion_left: u32,
    pub campaign_effectiveness: f64,
    pub active_campaign_effects: CampaignLedger,
    pub has_bribed: bool,
}

impl PlayerState {
    #[must_use]
    pub fn new(starting_gold: f64) -> Self {
        Self {
            events_log: Vec::new(),
            gold: starting_gold,
            investments: InvestmentHoldings::default(),
            resources: ResourceStock::default(),
            sell_resources: ResourceStock::default(),
            factory_conversion_left: 0,
            campaign_effectiveness: 1.0,
            active_campaign_effects: CampaignLedger::default(),
            has_bribed: false,
        }
    }

    pub fn push_event(&mut self, cycle: u32, event: PlayerEvent) {
        self.events_log.push(EventEntry { cycle, event });
    }

    /// The most recent `limit` notifications, oldest first.
    #[must_use]
    pub fn recent_events(&self, limit: usize) -> &[EventEntry] {
        let start = self.events_log.len().saturating_sub(limit);
        &self.events_log[start..]
    }

    /// Conversion capacity a full recharge grants.
    #[must_use]
    pub fn factory_capacity(&self, per_unit: u32) -> u32 {
        self.investments
            .get(InvestmentType::Factory)
            .saturating_mul(per_unit)
    }

    pub fn recompute_effectiveness(&mut self) {
        self.campaign_effectiveness = self.active_campaign_effects.effectiveness();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Indexed by player id; seats are never removed.
    pub players: Vec<PlayerState>,
    pub victory_condition_points: u32,
    pub points: Vec<u32>,
    /// Points each seat gained at the last cycle boundary.
    pub points_delta: Vec<u32>,
    pub cycle_count: u32,
    pub sold_resources_history: Vec<ResourceStock>,
    pub market_price: MarketPrices,
    pub elections: Vec<ElectionBlock>,
    pub phase: Phase,
    pub turn: TurnOrder,
    pub rules: RulesConfig,
}

impl GameState {
    /// Create a match for `num_players` seats.
    ///
    /// `victory_points` overrides the threshold from `rules` when present.
    ///
    /// # Errors
    ///
    /// Returns an error when the seat count is unsupported or the rules fail
    /// validation.
    pub fn setup(
        num_players: usize,
        victory_points: Option<u32>,
        rules: RulesConfig,
        rng: &mut MatchRng,
    ) -> Result<Self, SetupError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&num_players) {
            return Err(SetupError::PlayerCount {
                num_players,
                min: MIN_PLAYERS,
                max: MAX_PLAYERS,
            });
        }
        rules.validate()?;

        let players = (0..num_players)
            .map(|_| PlayerState::new(rules.starting_gold))
            .collect();
        let elections = generate_elections(num_players, num_players, rng.elections());
        let mut state = Self {
            players,
            victory_condition_points: victory_points.unwrap_or(rules.victory_points),
            points: vec![0; num_players],
            points_delta: vec![0; num_players],
            cycle_count: 0,
            sold_resources_history: Vec::new(),
            market_price: MarketPrices::opening(),
            elections,
            phase: Phase::Cycle,
            turn: TurnOrder::default(),
            rules,
        };
        crate::scheduler::begin_phase(&mut state, rng);
        log::info!(
            "match created: {num_players} players, {} points to win, seed {}",
            state.victory_condition_points,
            rng.seed()
        );
        Ok(state)
    }

    #[must_use]
    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn player(&self, id: usize) -> Option<&PlayerState> {
        self.players.get(id)
    }

    pub fn player_mut(&mut self, id: usize) -> Option<&mut PlayerState> {
        self.players.get_mut(id)
    }

    /// Seat whose turn it currently is.
    #[must_use]
    pub fn current_player(&self) -> Option<usize> {
        self.turn.current()
    }

    /// Append a cycle's sales record, trimming to the configured cap.
    pub(crate) fn record_sales(&mut self, sold: ResourceStock) {
        self.sold_resources_history.push(sold);
        if let Some(cap) = self.rules.history_cap {
            let keep = cap.max(self.rules.market_window);
            let excess = self.sold_resources_history.len().saturating_sub(keep);
            if excess > 0 {
                self.sold_resources_history.drain(..excess);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::ResourceType;

    fn fresh(num_players: usize) -> GameState {
        let mut rng = MatchRng::from_seed(1);
        GameState::setup(num_players, None, RulesConfig::default(), &mut rng).unwrap()
    }

    #[test]
    fn setup_initializes_every_seat() {
        let state = fresh(3);
        assert_eq!(state.num_players(), 3);
        assert_eq!(state.points, vec![0, 0, 0]);
        assert_eq!(state.cycle_count, 0);
        assert_eq!(state.elections.len(), 3);
        assert!(state.elections.iter().all(|e| e.contribution.len() == 3));
        assert_eq!(state.victory_condition_points, 150);
        assert_eq!(state.market_price.len(), ResourceType::ALL.len());
        for player in &state.players {
            assert!((player.gold - 80.0).abs() < f64::EPSILON);
            assert!((player.campaign_effectiveness - 1.0).abs() < f64::EPSILON);
            assert!(player.sell_resources.is_empty());
        }
    }

    #[test]
    fn victory_override_wins_over_rules() {
        let mut rng = MatchRng::from_seed(1);
        let state = GameState::setup(2, Some(12), RulesConfig::default(), &mut rng).unwrap();
        assert_eq!(state.victory_condition_points, 12);
    }

    #[test]
    fn setup_rejects_unsupported_player_counts() {
        let mut rng = MatchRng::from_seed(1);
        for count in [0, MAX_PLAYERS + 1] {
            assert!(matches!(
                GameState::setup(count, None, RulesConfig::default(), &mut rng),
                Err(SetupError::PlayerCount { .. })
            ));
        }
    }

    #[test]
    fn setup_rejects_invalid_rules() {
        let mut rng = MatchRng::from_seed(1);
        let rules = RulesConfig {
            bribery_catch_chance: 2.0,
            ..RulesConfig::default()
        };
        assert!(matches!(
            GameState::setup(2, None, rules, &mut rng),
            Err(SetupError::Rules(_))
        ));
    }

    #[test]
    fn recent_events_returns_tail() {
        let mut player = PlayerState::new(0.0);
        for cycle in 0..5 {
            player.push_event(cycle, PlayerEvent::BriberyExposed);
        }
        let recent = player.recent_events(2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].cycle, 3);
        assert_eq!(player.recent_events(50).len(), 5);
        assert_eq!(recent[1].event.key(), "log.bribery.exposed");
    }

    #[test]
    fn history_cap_keeps_market_window() {
        let mut state = fresh(2);
        state.rules.history_cap = Some(5);
        for amount in 1..=8 {
            state.record_sales([(ResourceType::Grain, amount)].into_iter().collect());
        }
        assert_eq!(state.sold_resources_history.len(), 5);
        assert_eq!(state.sold_resources_history[0].get(ResourceType::Grain), 4);
    }

    #[test]
    fn events_serialize_with_cycle_stamp() {
        let entry = EventEntry {
            cycle: 4,
            event: PlayerEvent::PointsAwarded { total: 3 },
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["cycle"], 4);
        assert_eq!(json["kind"], "points_awarded");
        assert_eq!(json["total"], 3);
    }
}
