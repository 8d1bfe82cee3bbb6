//! Demos Game Engine
//!
//! Rules engine for a turn-based economic and political match: players invest
//! in production, refine and sell goods into a sliding-window market, and
//! campaign (or bribe) for election blocks until one seat reaches the victory
//! threshold. The engine does no I/O and every random draw comes from the
//! per-match [`MatchRng`].

pub mod campaign;
pub mod config;
pub mod constants;
pub mod cycle;
pub mod election;
pub mod market;
pub mod moves;
pub mod numbers;
pub mod resources;
pub mod rng;
pub mod scheduler;
pub mod seed;
pub mod session;
pub mod state;
pub mod victory;
pub mod view;

// Re-export commonly used types
pub use campaign::{CampaignEffect, CampaignLedger, EffectDescriptor, EffectPeriod};
pub use config::{ConfigError, RulesConfig};
pub use cycle::{CycleReport, resolve_cycle};
pub use election::{ElectionBlock, ElectionPolicy, determine_winner};
pub use market::{MarketPrices, price};
pub use moves::{InvalidMove, Move, MoveOutcome, apply_move};
pub use resources::{InvestmentType, MarketParams, ResourceType};
pub use rng::MatchRng;
pub use scheduler::{Phase, TurnEnd, end_turn as on_turn_end, transition_phase as on_phase_transition};
pub use seed::{encode_match_code, generate_code_from_entropy, parse_match_code};
pub use session::{LoggedMove, MatchSession, ReplayError};
pub use state::{EventEntry, GameState, PlayerEvent, PlayerState, SetupError};
pub use victory::{Victory, check_victory};
pub use view::{PublicElection, PublicState, stripped_view};

/// Source of match rules for a host. Hosts read them from a file or from
/// embedded defaults.
pub trait RulesLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load and validate the rules for a new match.
    ///
    /// # Errors
    ///
    /// Returns an error if the rules cannot be read, parsed or validated.
    fn load_rules(&self) -> Result<RulesConfig, Self::Error>;
}
