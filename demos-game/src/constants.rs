//! Centralized balance and tuning constants for Demos game logic.
//!
//! Per-variant descriptors (costs, market curves, campaign effects) live next
//! to their enums as exhaustive matches. The values here are the scalar knobs
//! that seed [`crate::config::RulesConfig`] defaults and bound setup input.

// Setup bounds ---------------------------------------------------------------
pub const MIN_PLAYERS: usize = 1;
pub const MAX_PLAYERS: usize = 8;

// Rules defaults -------------------------------------------------------------
pub(crate) const DEFAULT_VICTORY_POINTS: u32 = 150;
pub(crate) const DEFAULT_STARTING_GOLD: f64 = 80.0;
pub(crate) const DEFAULT_SELL_PENALTY: f64 = 0.5;
pub(crate) const DEFAULT_FACTORY_CAPACITY_PER_UNIT: u32 = 2;
pub(crate) const DEFAULT_BRIBERY_FACTOR: f64 = 2.0;
pub(crate) const DEFAULT_BRIBERY_CATCH_CHANCE: f64 = 0.25;
pub(crate) const DEFAULT_MARKET_WINDOW: usize = 5;
pub(crate) const DEFAULT_VISIBLE_EVENTS: usize = 10;

// Production -----------------------------------------------------------------
pub(crate) const UNITS_PER_INVESTMENT: u32 = 1;

// Election generation --------------------------------------------------------
pub(crate) const POLICY_PRIVATE_THRESHOLD: f64 = 0.5;
pub(crate) const AWARD_ONE_THRESHOLD: f64 = 8.0 / 15.0;
pub(crate) const AWARD_TWO_THRESHOLD: f64 = 12.0 / 15.0;
pub(crate) const AWARD_THREE_THRESHOLD: f64 = 14.0 / 15.0;
pub(crate) const NAME_SPECIAL_CHANCE: f64 = 0.02;
pub(crate) const NAME_TRIBE_CHANCE: f64 = 0.30;
pub(crate) const NAME_REROLL_LIMIT: usize = 64;

// Event log keys -------------------------------------------------------------
pub(crate) const LOG_ELECTION_WON: &str = "log.election.won";
pub(crate) const LOG_POINTS_AWARDED: &str = "log.points.awarded";
pub(crate) const LOG_SALES_SETTLED: &str = "log.sales.settled";
pub(crate) const LOG_BRIBERY_EXPOSED: &str = "log.bribery.exposed";
pub(crate) const LOG_EFFECT_EXPIRED: &str = "log.effect.expired";

#[cfg(test)]
pub(crate) const FLOAT_EPSILON: f64 = 1e-9;
