//! Campaign effect ledger: timed buffs and penalties that scale a player's
//! campaign contributions.
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;

use crate::numbers::usize_to_f64;

/// Every effect a player can hold. `BriberyScandal` is never sold; it only
/// arrives through bribery backfire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignEffect {
    Rally,
    PressCoverage,
    PartyMachine,
    BriberyScandal,
}

/// Lifetime of an effect instance, counted in cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectPeriod {
    Cycles(u32),
    Permanent,
}

impl EffectPeriod {
    /// One cycle later, or `None` once the instance has run out.
    #[must_use]
    pub const fn decayed(self) -> Option<Self> {
        match self {
            Self::Permanent => Some(Self::Permanent),
            Self::Cycles(remaining) => {
                let next = remaining.saturating_sub(1);
                if next == 0 { None } else { Some(Self::Cycles(next)) }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EffectDescriptor {
    pub delta: f64,
    pub period: EffectPeriod,
    /// `None` marks effects that cannot be bought.
    pub cost: Option<f64>,
    pub stacked: bool,
}

impl CampaignEffect {
    pub const ALL: [Self; 4] = [
        Self::Rally,
        Self::PressCoverage,
        Self::PartyMachine,
        Self::BriberyScandal,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Rally => "rally",
            Self::PressCoverage => "press_coverage",
            Self::PartyMachine => "party_machine",
            Self::BriberyScandal => "bribery_scandal",
        }
    }

    #[must_use]
    pub const fn descriptor(self) -> EffectDescriptor {
        match self {
            Self::Rally => EffectDescriptor {
                delta: 0.10,
                period: EffectPeriod::Cycles(3),
                cost: Some(10.0),
                stacked: true,
            },
            Self::PressCoverage => EffectDescriptor {
                delta: 0.25,
                period: EffectPeriod::Cycles(5),
                cost: Some(25.0),
                stacked: false,
            },
            Self::PartyMachine => EffectDescriptor {
                delta: 0.50,
                period: EffectPeriod::Permanent,
                cost: Some(120.0),
                stacked: false,
            },
            Self::BriberyScandal => EffectDescriptor {
                delta: -0.40,
                period: EffectPeriod::Cycles(3),
                cost: None,
                stacked: false,
            },
        }
    }
}

impl fmt::Display for CampaignEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectInstance {
    pub remaining_period: EffectPeriod,
}

type Instances = SmallVec<[EffectInstance; 2]>;

/// Active effects per type, in purchase order. Types with no live instance are
/// not stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CampaignLedger {
    active: BTreeMap<CampaignEffect, Instances>,
}

impl CampaignLedger {
    /// Append a fresh instance with the effect's full period.
    pub fn add(&mut self, effect: CampaignEffect) {
        self.active.entry(effect).or_default().push(EffectInstance {
            remaining_period: effect.descriptor().period,
        });
    }

    #[must_use]
    pub fn count(&self, effect: CampaignEffect) -> usize {
        self.active.get(&effect).map_or(0, SmallVec::len)
    }

    #[must_use]
    pub fn instances(&self, effect: CampaignEffect) -> &[EffectInstance] {
        self.active.get(&effect).map_or(&[], |list| list.as_slice())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Age every instance by one cycle, dropping the ones that ran out.
    /// Returns the effect types that no longer have any live instance.
    pub fn decay(&mut self) -> Vec<CampaignEffect> {
        let mut expired = Vec::new();
        self.active.retain(|effect, instances| {
            instances.retain(|instance| match instance.remaining_period.decayed() {
                Some(next) => {
                    instance.remaining_period = next;
                    true
                }
                None => false,
            });
            if instances.is_empty() {
                expired.push(*effect);
                false
            } else {
                true
            }
        });
        expired
    }

    /// Aggregate multiplier rebuilt from scratch: stacked effects add their
    /// delta per instance, others add it once while any instance is live.
    #[must_use]
    pub fn effectiveness(&self) -> f64 {
        CampaignEffect::ALL
            .into_iter()
            .fold(1.0, |total, effect| {
                let count = self.count(effect);
                let descriptor = effect.descriptor();
                let contribution = if descriptor.stacked {
                    usize_to_f64(count) * descriptor.delta
                } else if count > 0 {
                    descriptor.delta
                } else {
                    0.0
                };
                total + contribution
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = (CampaignEffect, &[EffectInstance])> + '_ {
        self.active
            .iter()
            .map(|(effect, instances)| (*effect, instances.as_slice()))
    }
}

/// Roll whether a bribing player is caught this cycle. Draws only when the
/// player actually bribed, so honest cycles leave the stream untouched.
pub fn roll_bribery_backfire(has_bribed: bool, catch_chance: f64, rng: &mut impl Rng) -> bool {
    has_bribed && rng.r#gen::<f64>() < catch_chance
}
