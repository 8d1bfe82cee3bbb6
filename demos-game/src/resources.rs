//! Resource and investment catalogs plus the sparse quantity ledger.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::constants::UNITS_PER_INVESTMENT;

/// Tradeable goods. Raw goods come from investments, refined goods from factories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Grain,
    Olive,
    Grape,
    Oil,
    Wine,
}

/// Market curve for one resource; see [`crate::market::price`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketParams {
    pub min: f64,
    pub max: f64,
    pub demand_constant: f64,
}

impl ResourceType {
    pub const ALL: [Self; 5] = [Self::Grain, Self::Olive, Self::Grape, Self::Oil, Self::Wine];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Grain => "grain",
            Self::Olive => "olive",
            Self::Grape => "grape",
            Self::Oil => "oil",
            Self::Wine => "wine",
        }
    }

    #[must_use]
    pub const fn market(self) -> MarketParams {
        let (min, max, demand_constant) = match self {
            Self::Grain => (0.05, 0.20, 100.0),
            Self::Olive => (0.10, 0.40, 60.0),
            Self::Grape => (0.15, 0.50, 50.0),
            Self::Oil => (0.40, 1.50, 40.0),
            Self::Wine => (0.60, 2.00, 30.0),
        };
        MarketParams {
            min,
            max,
            demand_constant,
        }
    }

    /// Refined good a factory turns this resource into, if any.
    #[must_use]
    pub const fn refines_into(self) -> Option<Self> {
        match self {
            Self::Olive => Some(Self::Oil),
            Self::Grape => Some(Self::Wine),
            Self::Grain | Self::Oil | Self::Wine => None,
        }
    }

    /// Whether `from -> to` is on the factory conversion whitelist.
    #[must_use]
    pub fn can_convert(from: Self, to: Self) -> bool {
        from.refines_into() == Some(to)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ResourceType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|kind| kind.key() == s).ok_or(())
    }
}

/// Purchasable production units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentType {
    Grain,
    Olive,
    Grape,
    Factory,
}

impl InvestmentType {
    pub const ALL: [Self; 4] = [Self::Grain, Self::Olive, Self::Grape, Self::Factory];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Grain => "grain",
            Self::Olive => "olive",
            Self::Grape => "grape",
            Self::Factory => "factory",
        }
    }

    /// Gold paid per unit bought. Selling refunds this times the sell penalty.
    #[must_use]
    pub const fn cost(self) -> f64 {
        match self {
            Self::Grain => 0.5,
            Self::Olive => 1.0,
            Self::Grape => 1.5,
            Self::Factory => 5.0,
        }
    }

    /// Resource yielded each cycle and the units yielded per owned unit.
    #[must_use]
    pub const fn produces(self) -> Option<(ResourceType, u32)> {
        match self {
            Self::Grain => Some((ResourceType::Grain, UNITS_PER_INVESTMENT)),
            Self::Olive => Some((ResourceType::Olive, UNITS_PER_INVESTMENT)),
            Self::Grape => Some((ResourceType::Grape, UNITS_PER_INVESTMENT)),
            Self::Factory => None,
        }
    }
}

impl fmt::Display for InvestmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for InvestmentType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|kind| kind.key() == s).ok_or(())
    }
}

/// Sparse non-negative counts keyed by a closed enum. Absent keys read as zero
/// and zero entries are never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantities<K: Ord> {
    entries: BTreeMap<K, u32>,
}

impl<K: Ord> Default for Quantities<K> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy> Quantities<K> {
    #[must_use]
    pub fn get(&self, key: K) -> u32 {
        self.entries.get(&key).copied().unwrap_or(0)
    }

    pub fn set(&mut self, key: K, amount: u32) {
        if amount == 0 {
            self.entries.remove(&key);
        } else {
            self.entries.insert(key, amount);
        }
    }

    pub fn add(&mut self, key: K, amount: u32) {
        let next = self.get(key).saturating_add(amount);
        self.set(key, next);
    }

    /// Remove up to `amount`, returning how many units were actually taken.
    pub fn take(&mut self, key: K, amount: u32) -> u32 {
        let held = self.get(key);
        let taken = held.min(amount);
        self.set(key, held - taken);
        taken
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, u32)> + '_ {
        self.entries.iter().map(|(key, amount)| (*key, *amount))
    }
}

impl<K: Ord + Copy> FromIterator<(K, u32)> for Quantities<K> {
    fn from_iter<I: IntoIterator<Item = (K, u32)>>(iter: I) -> Self {
        let mut quantities = Self::default();
        for (key, amount) in iter {
            quantities.add(key, amount);
        }
        quantities
    }
}

pub type ResourceStock = Quantities<ResourceType>;
pub type InvestmentHoldings = Quantities<InvestmentType>;
