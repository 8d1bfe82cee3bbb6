//! Serializable snapshot handed to a seat. Every field is player-visible;
//! the only redactions are the private-block projection and the event tail.
use serde::{Deserialize, Serialize};

use crate::election::{ElectionBlock, ElectionPolicy};
use crate::market::MarketPrices;
use crate::resources::ResourceStock;
use crate::state::{GameState, PlayerState};
use crate::victory::check_victory;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicElection {
    pub name: String,
    pub policy: ElectionPolicy,
    pub point_awards: u32,
    pub contribution: Vec<f64>,
    /// Leader as of now; only populated for public blocks.
    pub projected_winner: Option<usize>,
}

impl From<&ElectionBlock> for PublicElection {
    fn from(block: &ElectionBlock) -> Self {
        Self {
            name: block.name.clone(),
            policy: block.policy,
            point_awards: block.point_awards,
            contribution: block.contribution.clone(),
            projected_winner: block.projected_winner(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicState {
    pub viewer: usize,
    pub current_player: Option<usize>,
    pub cycle_count: u32,
    pub victory_condition_points: u32,
    pub points: Vec<u32>,
    pub points_delta: Vec<u32>,
    pub market_price: MarketPrices,
    pub sold_resources_history: Vec<ResourceStock>,
    pub elections: Vec<PublicElection>,
    /// Each entry's `events_log` holds only the most recent notifications.
    pub players: Vec<PlayerState>,
    pub winner: Option<usize>,
}

impl PublicState {
    #[must_use]
    pub fn viewer_state(&self) -> Option<&PlayerState> {
        self.players.get(self.viewer)
    }

    #[must_use]
    pub fn is_viewers_turn(&self) -> bool {
        self.current_player == Some(self.viewer)
    }
}

#[must_use]
pub fn stripped_view(state: &GameState, viewer: usize) -> PublicState {
    let limit = state.rules.visible_events;
    let players = state
        .players
        .iter()
        .map(|player| PlayerState {
            events_log: player.recent_events(limit).to_vec(),
            ..player.clone()
        })
        .collect();

    PublicState {
        viewer,
        current_player: state.current_player(),
        cycle_count: state.cycle_count,
        victory_condition_points: state.victory_condition_points,
        points: state.points.clone(),
        points_delta: state.points_delta.clone(),
        market_price: state.market_price.clone(),
        sold_resources_history: state.sold_resources_history.clone(),
        elections: state.elections.iter().map(PublicElection::from).collect(),
        players,
        winner: check_victory(state).map(|victory| victory.winner),
    }
}
