//! Match rules configuration.
//!
//! Every field carries a serde default so hosts can ship partial JSON
//! overrides; [`RulesConfig::validate`] enforces the ranges the engine relies on.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_BRIBERY_CATCH_CHANCE, DEFAULT_BRIBERY_FACTOR, DEFAULT_FACTORY_CAPACITY_PER_UNIT,
    DEFAULT_MARKET_WINDOW, DEFAULT_SELL_PENALTY, DEFAULT_STARTING_GOLD, DEFAULT_VICTORY_POINTS,
    DEFAULT_VISIBLE_EVENTS,
};

/// Errors raised when rules configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: usize,
        value: usize,
    },
    #[error("history cap {cap} must keep at least the market window of {window} entries")]
    HistoryCapBelowWindow { cap: usize, window: usize },
    #[error("invalid rules json: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default = "RulesConfig::default_victory_points")]
    pub victory_points: u32,
    #[serde(default = "RulesConfig::default_starting_gold")]
    pub starting_gold: f64,
    /// Fraction of the purchase cost refunded when an investment is sold.
    #[serde(default = "RulesConfig::default_sell_penalty")]
    pub sell_penalty: f64,
    #[serde(default = "RulesConfig::default_factory_capacity_per_unit")]
    pub factory_capacity_per_unit: u32,
    /// Multiplier applied to bribe contributions in place of campaign effectiveness.
    #[serde(default = "RulesConfig::default_bribery_factor")]
    pub bribery_factor: f64,
    #[serde(default = "RulesConfig::default_bribery_catch_chance")]
    pub bribery_catch_chance: f64,
    /// Number of most recent sales records feeding the market price.
    #[serde(default = "RulesConfig::default_market_window")]
    pub market_window: usize,
    /// Optional bound on stored sales history; `None` keeps everything.
    #[serde(default)]
    pub history_cap: Option<usize>,
    #[serde(default = "RulesConfig::default_visible_events")]
    pub visible_events: usize,
    /// When set, campaign and bribe contributions are paid out of gold.
    #[serde(default)]
    pub contributions_cost_gold: bool,
}

impl RulesConfig {
    const fn default_victory_points() -> u32 {
        DEFAULT_VICTORY_POINTS
    }

    const fn default_starting_gold() -> f64 {
        DEFAULT_STARTING_GOLD
    }

    const fn default_sell_penalty() -> f64 {
        DEFAULT_SELL_PENALTY
    }

    const fn default_factory_capacity_per_unit() -> u32 {
        DEFAULT_FACTORY_CAPACITY_PER_UNIT
    }

    const fn default_bribery_factor() -> f64 {
        DEFAULT_BRIBERY_FACTOR
    }

    const fn default_bribery_catch_chance() -> f64 {
        DEFAULT_BRIBERY_CATCH_CHANCE
    }

    const fn default_market_window() -> usize {
        DEFAULT_MARKET_WINDOW
    }

    const fn default_visible_events() -> usize {
        DEFAULT_VISIBLE_EVENTS
    }

    /// Parse a (possibly partial) JSON override and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check the ranges the engine depends on.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.starting_gold.is_finite() && self.starting_gold >= 0.0) {
            return Err(ConfigError::RangeViolation {
                field: "starting_gold",
                min: 0.0,
                max: f64::MAX,
                value: self.starting_gold,
            });
        }
        // The refund must stay lossy.
        if !(0.0..1.0).contains(&self.sell_penalty) {
            return Err(ConfigError::RangeViolation {
                field: "sell_penalty",
                min: 0.0,
                max: 1.0,
                value: self.sell_penalty,
            });
        }
        if !(self.bribery_factor.is_finite() && self.bribery_factor > 0.0) {
            return Err(ConfigError::RangeViolation {
                field: "bribery_factor",
                min: f64::MIN_POSITIVE,
                max: f64::MAX,
                value: self.bribery_factor,
            });
        }
        if !(0.0..=1.0).contains(&self.bribery_catch_chance) {
            return Err(ConfigError::RangeViolation {
                field: "bribery_catch_chance",
                min: 0.0,
                max: 1.0,
                value: self.bribery_catch_chance,
            });
        }
        if self.market_window < 1 {
            return Err(ConfigError::MinViolation {
                field: "market_window",
                min: 1,
                value: self.market_window,
            });
        }
        if let Some(cap) = self.history_cap
            && cap < self.market_window
        {
            return Err(ConfigError::HistoryCapBelowWindow {
                cap,
                window: self.market_window,
            });
        }
        Ok(())
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            victory_points: Self::default_victory_points(),
            starting_gold: Self::default_starting_gold(),
            sell_penalty: Self::default_sell_penalty(),
            factory_capacity_per_unit: Self::default_factory_capacity_per_unit(),
            bribery_factor: Self::default_bribery_factor(),
            bribery_catch_chance: Self::default_bribery_catch_chance(),
            market_window: Self::default_market_window(),
            history_cap: None,
            visible_events: Self::default_visible_events(),
            contributions_cost_gold: false,
        }
    }
}
