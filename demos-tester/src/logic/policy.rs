use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;

use demos_game::numbers::{affordable_units, floor_f64_to_i64};
use demos_game::{
    CampaignEffect, InvestmentType, Move, PlayerState, PublicElection, PublicState, ResourceType,
};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Policy interface for automated seats. A policy sees only the public view
/// handed to its seat and answers with the moves to submit before ending the
/// turn.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    fn plan_turn(&mut self, view: &PublicState) -> Vec<Move>;
}

/// Built-in bot strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BotStrategy {
    Merchant,
    Vintner,
    Politician,
    Briber,
    Random,
}

impl BotStrategy {
    pub const ALL: [Self; 5] = [
        Self::Merchant,
        Self::Vintner,
        Self::Politician,
        Self::Briber,
        Self::Random,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Merchant => "merchant",
            Self::Vintner => "vintner",
            Self::Politician => "politician",
            Self::Briber => "briber",
            Self::Random => "random",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Merchant => "buys the best-priced production and sells every raw good",
            Self::Vintner => "builds factories and sells refined oil and wine",
            Self::Politician => "buys campaign effects and campaigns for the richest block",
            Self::Briber => "funds production and bribes the richest block",
            Self::Random => "seeded random mix of every move, including infeasible ones",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            Self::Merchant => Box::new(MerchantPolicy),
            Self::Vintner => Box::new(VintnerPolicy),
            Self::Politician => Box::new(PoliticianPolicy),
            Self::Briber => Box::new(BriberPolicy),
            Self::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

impl fmt::Display for BotStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for BotStrategy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.key() == lower)
            .ok_or(())
    }
}

struct MerchantPolicy;
struct VintnerPolicy;
struct PoliticianPolicy;
struct BriberPolicy;

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

const RAW_GOODS: [InvestmentType; 3] = [
    InvestmentType::Grain,
    InvestmentType::Olive,
    InvestmentType::Grape,
];

fn sell_everything(player: &PlayerState, kinds: &[ResourceType], moves: &mut Vec<Move>) {
    for &kind in kinds {
        let owned = player.resources.get(kind);
        if owned > 0 {
            moves.push(Move::SellResource {
                kind,
                amount: i64::from(owned),
            });
        }
    }
}

/// Production type whose output currently sells best.
fn best_priced_production(view: &PublicState) -> InvestmentType {
    RAW_GOODS
        .into_iter()
        .filter_map(|kind| {
            kind.produces()
                .map(|(resource, per_unit)| (kind, view.market_price.get(resource) * f64::from(per_unit) / kind.cost()))
        })
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map_or(InvestmentType::Grain, |(kind, _)| kind)
}

/// Block worth the most points; earliest wins ties.
fn richest_block(elections: &[PublicElection]) -> Option<usize> {
    elections
        .iter()
        .enumerate()
        .max_by_key(|(idx, block)| (block.point_awards, Reverse(*idx)))
        .map(|(idx, _)| idx)
}

fn spend_fraction(gold: f64, fraction: f64) -> f64 {
    (gold * fraction).max(0.0)
}

impl PlayerPolicy for MerchantPolicy {
    fn name(&self) -> &'static str {
        "Merchant"
    }

    fn plan_turn(&mut self, view: &PublicState) -> Vec<Move> {
        let Some(me) = view.viewer_state() else {
            return Vec::new();
        };
        let mut moves = Vec::new();
        sell_everything(
            me,
            &[ResourceType::Grain, ResourceType::Olive, ResourceType::Grape],
            &mut moves,
        );
        let kind = best_priced_production(view);
        let budget = spend_fraction(me.gold, 0.5);
        let units = affordable_units(budget, kind.cost());
        if units > 0 {
            moves.push(Move::Invest {
                kind,
                amount: units,
            });
        }
        moves
    }
}

impl PlayerPolicy for VintnerPolicy {
    fn name(&self) -> &'static str {
        "Vintner"
    }

    fn plan_turn(&mut self, view: &PublicState) -> Vec<Move> {
        let Some(me) = view.viewer_state() else {
            return Vec::new();
        };
        let mut moves = Vec::new();
        let factories = me.investments.get(InvestmentType::Factory);
        let mut gold = me.gold;
        if factories < 4 && gold >= InvestmentType::Factory.cost() * 2.0 {
            moves.push(Move::Invest {
                kind: InvestmentType::Factory,
                amount: 1,
            });
            gold -= InvestmentType::Factory.cost();
        }
        let grape_units = affordable_units(spend_fraction(gold, 0.4), InvestmentType::Grape.cost());
        if grape_units > 0 {
            moves.push(Move::Invest {
                kind: InvestmentType::Grape,
                amount: grape_units,
            });
        }

        let mut capacity = i64::from(me.factory_conversion_left);
        for (from, to) in [
            (ResourceType::Grape, ResourceType::Wine),
            (ResourceType::Olive, ResourceType::Oil),
        ] {
            let amount = i64::from(me.resources.get(from)).min(capacity);
            if amount > 0 {
                moves.push(Move::FactoryConvert { from, to, amount });
                capacity -= amount;
            }
        }
        // refined goods made this turn are sold next turn
        sell_everything(me, &[ResourceType::Wine, ResourceType::Oil], &mut moves);
        moves
    }
}

impl PlayerPolicy for PoliticianPolicy {
    fn name(&self) -> &'static str {
        "Politician"
    }

    fn plan_turn(&mut self, view: &PublicState) -> Vec<Move> {
        let Some(me) = view.viewer_state() else {
            return Vec::new();
        };
        let mut moves = Vec::new();
        let mut gold = me.gold;
        for effect in [
            CampaignEffect::PartyMachine,
            CampaignEffect::PressCoverage,
            CampaignEffect::Rally,
        ] {
            let Some(cost) = effect.descriptor().cost else {
                continue;
            };
            let already = me.active_campaign_effects.count(effect) > 0;
            if (!already || effect.descriptor().stacked) && gold >= cost * 2.0 {
                moves.push(Move::BuyCampaignImprovement { effect });
                gold -= cost;
                break;
            }
        }
        if let Some(block) = richest_block(&view.elections) {
            moves.push(Move::MakeCampaignContribution {
                block,
                amount: gold,
            });
        }
        sell_everything(me, &[ResourceType::Grain], &mut moves);
        let units = affordable_units(spend_fraction(gold, 0.25), InvestmentType::Grain.cost());
        if units > 0 {
            moves.push(Move::Invest {
                kind: InvestmentType::Grain,
                amount: units,
            });
        }
        moves
    }
}

impl PlayerPolicy for BriberPolicy {
    fn name(&self) -> &'static str {
        "Briber"
    }

    fn plan_turn(&mut self, view: &PublicState) -> Vec<Move> {
        let Some(me) = view.viewer_state() else {
            return Vec::new();
        };
        let mut moves = Vec::new();
        sell_everything(me, &[ResourceType::Olive], &mut moves);
        let units = affordable_units(spend_fraction(me.gold, 0.3), InvestmentType::Olive.cost());
        if units > 0 {
            moves.push(Move::Invest {
                kind: InvestmentType::Olive,
                amount: units,
            });
        }
        if let Some(block) = richest_block(&view.elections) {
            moves.push(Move::MakeBribeContribution {
                block,
                amount: me.gold,
            });
        }
        moves
    }
}

impl PlayerPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn plan_turn(&mut self, view: &PublicState) -> Vec<Move> {
        let Some(me) = view.viewer_state() else {
            return Vec::new();
        };
        let gold = floor_f64_to_i64(me.gold).max(1);
        let blocks = view.elections.len().max(1);
        let count = self.rng.gen_range(0..=3);
        let mut moves = Vec::with_capacity(count);
        for _ in 0..count {
            let mv = match self.rng.gen_range(0..6) {
                0 => Move::Invest {
                    kind: *InvestmentType::ALL.choose(&mut self.rng).unwrap_or(&InvestmentType::Grain),
                    amount: self.rng.gen_range(-5..=gold),
                },
                1 => Move::SellResource {
                    kind: *ResourceType::ALL.choose(&mut self.rng).unwrap_or(&ResourceType::Grain),
                    amount: self.rng.gen_range(-2..=20),
                },
                2 => Move::FactoryConvert {
                    from: *ResourceType::ALL.choose(&mut self.rng).unwrap_or(&ResourceType::Olive),
                    to: *ResourceType::ALL.choose(&mut self.rng).unwrap_or(&ResourceType::Oil),
                    amount: self.rng.gen_range(0..=6),
                },
                3 => Move::BuyCampaignImprovement {
                    effect: *CampaignEffect::ALL.choose(&mut self.rng).unwrap_or(&CampaignEffect::Rally),
                },
                4 => Move::MakeCampaignContribution {
                    block: self.rng.gen_range(0..=blocks),
                    amount: self.rng.gen_range(0.0..me.gold.max(1.0)),
                },
                _ => Move::MakeBribeContribution {
                    block: self.rng.gen_range(0..blocks),
                    amount: self.rng.gen_range(0.0..me.gold.max(1.0)),
                },
            };
            moves.push(mv);
        }
        moves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use demos_game::{MatchSession, RulesConfig};

    fn opening_view(viewer: usize) -> PublicState {
        MatchSession::new(3, 2, None, RulesConfig::default())
            .unwrap()
            .view(viewer)
    }

    #[test]
    fn strategies_parse_from_keys() {
        for strategy in BotStrategy::ALL {
            assert_eq!(strategy.key().parse::<BotStrategy>(), Ok(strategy));
            assert_eq!(strategy.create_policy(1).name().to_ascii_lowercase(), strategy.key());
        }
        assert_eq!(" Vintner ".parse::<BotStrategy>(), Ok(BotStrategy::Vintner));
        assert!("tyrant".parse::<BotStrategy>().is_err());
    }

    #[test]
    fn merchant_invests_half_of_opening_gold() {
        let mut policy = MerchantPolicy;
        let moves = policy.plan_turn(&opening_view(0));
        assert!(moves.iter().any(|mv| matches!(mv, Move::Invest { amount, .. } if *amount > 0)));
    }

    #[test]
    fn vintner_builds_a_factory_first() {
        let mut policy = VintnerPolicy;
        let moves = policy.plan_turn(&opening_view(1));
        assert_eq!(
            moves.first(),
            Some(&Move::Invest {
                kind: InvestmentType::Factory,
                amount: 1
            })
        );
    }

    #[test]
    fn politician_and_briber_target_richest_block() {
        let view = opening_view(0);
        let target = richest_block(&view.elections).unwrap();
        let politician = PoliticianPolicy.plan_turn(&view);
        assert!(politician.iter().any(
            |mv| matches!(mv, Move::MakeCampaignContribution { block, .. } if *block == target)
        ));
        let briber = BriberPolicy.plan_turn(&view);
        assert!(
            briber
                .iter()
                .any(|mv| matches!(mv, Move::MakeBribeContribution { block, .. } if *block == target))
        );
    }

    #[test]
    fn random_policy_is_seed_stable() {
        let view = opening_view(0);
        let mut first = RandomPolicy::new(9);
        let mut second = RandomPolicy::new(9);
        for _ in 0..5 {
            assert_eq!(first.plan_turn(&view), second.plan_turn(&view));
        }
    }

    #[test]
    fn richest_block_prefers_earliest_on_ties() {
        let block = |point_awards| PublicElection {
            name: String::new(),
            policy: demos_game::ElectionPolicy::Public,
            point_awards,
            contribution: vec![0.0],
            projected_winner: None,
        };
        assert_eq!(richest_block(&[block(2), block(3), block(3)]), Some(1));
        assert_eq!(richest_block(&[]), None);
    }
}
