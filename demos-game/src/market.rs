//! Resource market model: sales volume in a sliding window sets the price.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::numbers::{u64_to_f64, units_to_f64};
use crate::resources::{MarketParams, ResourceStock, ResourceType};

/// Price for a resource given the units sold in the recent window.
///
/// `min` when the market has no demand constant, otherwise an exponential decay
/// from `max` toward `min`.
#[must_use]
pub fn price(amount_sold_in_window: f64, market: MarketParams) -> f64 {
    if market.demand_constant == 0.0 {
        return market.min;
    }
    market.min + (market.max - market.min) * (-amount_sold_in_window / market.demand_constant).exp()
}

/// Units of `resource` sold across the last `window` history entries.
#[must_use]
pub fn amount_sold_in_window(history: &[ResourceStock], resource: ResourceType, window: usize) -> u64 {
    let start = history.len().saturating_sub(window);
    history[start..]
        .iter()
        .map(|cycle| u64::from(cycle.get(resource)))
        .sum()
}

/// Current price per resource. Every resource type always has an entry once
/// built through [`MarketPrices::from_history`] or [`MarketPrices::opening`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketPrices {
    prices: BTreeMap<ResourceType, f64>,
}

impl MarketPrices {
    /// Prices before anything has been sold: every resource at its ceiling.
    #[must_use]
    pub fn opening() -> Self {
        Self::from_history(&[], 1)
    }

    #[must_use]
    pub fn from_history(history: &[ResourceStock], window: usize) -> Self {
        let prices = ResourceType::ALL
            .into_iter()
            .map(|resource| {
                let sold = u64_to_f64(amount_sold_in_window(history, resource, window));
                (resource, price(sold, resource.market()))
            })
            .collect();
        Self { prices }
    }

    #[must_use]
    pub fn get(&self, resource: ResourceType) -> f64 {
        self.prices
            .get(&resource)
            .copied()
            .unwrap_or_else(|| resource.market().min)
    }

    /// Gold earned by selling every queued unit at the current prices.
    #[must_use]
    pub fn settle(&self, queued: &ResourceStock) -> f64 {
        queued
            .iter()
            .map(|(resource, amount)| units_to_f64(amount) * self.get(resource))
            .sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ResourceType, f64)> + '_ {
        self.prices.iter().map(|(resource, price)| (*resource, *price))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl Default for MarketPrices {
    fn default() -> Self {
        Self::opening()
    }
}
