//! Player commands. Quantities are clamped to what is feasible; a move is only
//! rejected when clamping cannot rescue it, and a rejected move changes nothing.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::campaign::CampaignEffect;
use crate::numbers::{affordable_units, clamp_i64_to_u32, units_to_f64};
use crate::resources::{InvestmentType, ResourceType};
use crate::rng::MatchRng;
use crate::scheduler::{TurnEnd, end_turn};
use crate::state::{GameState, PlayerState};

/// Why a command was refused.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidMove {
    #[error("amount is negative after clamping")]
    NegativeAmount,
    #[error("amount must be a finite number")]
    NonFiniteAmount,
    #[error("factories cannot convert {from} into {to}")]
    ConversionNotAllowed { from: ResourceType, to: ResourceType },
    #[error("costs {cost:.2} gold but only {gold:.2} available")]
    InsufficientGold { cost: f64, gold: f64 },
    #[error("{0} cannot be purchased")]
    NotPurchasable(CampaignEffect),
    #[error("no election block at index {0}")]
    UnknownBlock(usize),
    #[error("no player with id {0}")]
    UnknownPlayer(usize),
    #[error("the match is already over")]
    MatchOver,
    #[error("player {player} acted during player {current}'s turn")]
    NotYourTurn { player: usize, current: usize },
}

/// The move set a host can deliver, in its serialized form
/// `{"move": "invest", "kind": "grain", "amount": 10}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "move", rename_all = "snake_case")]
pub enum Move {
    /// Positive amounts buy, negative amounts sell back at a loss.
    Invest { kind: InvestmentType, amount: i64 },
    SellResource { kind: ResourceType, amount: i64 },
    FactoryConvert {
        from: ResourceType,
        to: ResourceType,
        amount: i64,
    },
    BuyCampaignImprovement { effect: CampaignEffect },
    MakeCampaignContribution { block: usize, amount: f64 },
    MakeBribeContribution { block: usize, amount: f64 },
    EndTurn,
}

impl Move {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Invest { .. } => "invest",
            Self::SellResource { .. } => "sell_resource",
            Self::FactoryConvert { .. } => "factory_convert",
            Self::BuyCampaignImprovement { .. } => "buy_campaign_improvement",
            Self::MakeCampaignContribution { .. } => "make_campaign_contribution",
            Self::MakeBribeContribution { .. } => "make_bribe_contribution",
            Self::EndTurn => "end_turn",
        }
    }

    /// Decode a serialized move. Unknown move names or enum tags are host
    /// defects and surface as parse errors, not as [`InvalidMove`].
    ///
    /// # Errors
    ///
    /// Returns the JSON error when the payload does not describe a move.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// What an accepted move did.
#[derive(Debug, Clone, PartialEq)]
pub enum MoveOutcome {
    /// Signed units bought (positive) or sold back (negative).
    Invested { kind: InvestmentType, units: i64 },
    SaleQueued { kind: ResourceType, units: u32 },
    Converted {
        from: ResourceType,
        to: ResourceType,
        units: u32,
    },
    EffectBought { effect: CampaignEffect },
    Contributed { block: usize, amount: f64 },
    TurnEnded(TurnEnd),
}

/// Apply `mv` on behalf of `player`. Turn ownership is the caller's concern.
///
/// # Errors
///
/// Returns the reason the move was refused; the state is left untouched.
pub fn apply_move(
    state: &mut GameState,
    player: usize,
    mv: &Move,
    rng: &mut MatchRng,
) -> Result<MoveOutcome, InvalidMove> {
    if player >= state.num_players() {
        return Err(InvalidMove::UnknownPlayer(player));
    }
    match *mv {
        Move::EndTurn => Ok(MoveOutcome::TurnEnded(end_turn(state, rng))),
        Move::Invest { kind, amount } => {
            let per_unit = state.rules.factory_capacity_per_unit;
            let penalty = state.rules.sell_penalty;
            let seat = seat_mut(state, player)?;
            let units = invest(seat, kind, amount, penalty);
            if kind == InvestmentType::Factory {
                seat.factory_conversion_left =
                    seat.factory_conversion_left.min(seat.factory_capacity(per_unit));
            }
            Ok(MoveOutcome::Invested { kind, units })
        }
        Move::SellResource { kind, amount } => {
            let units = sell_resource(seat_mut(state, player)?, kind, amount)?;
            Ok(MoveOutcome::SaleQueued { kind, units })
        }
        Move::FactoryConvert { from, to, amount } => {
            let units = factory_convert(seat_mut(state, player)?, from, to, amount)?;
            Ok(MoveOutcome::Converted { from, to, units })
        }
        Move::BuyCampaignImprovement { effect } => {
            buy_campaign_improvement(seat_mut(state, player)?, effect)?;
            Ok(MoveOutcome::EffectBought { effect })
        }
        Move::MakeCampaignContribution { block, amount } => {
            let amount = contribute(state, player, block, amount, Contribution::Campaign)?;
            Ok(MoveOutcome::Contributed { block, amount })
        }
        Move::MakeBribeContribution { block, amount } => {
            let amount = contribute(state, player, block, amount, Contribution::Bribe)?;
            Ok(MoveOutcome::Contributed { block, amount })
        }
    }
}

fn seat_mut(state: &mut GameState, player: usize) -> Result<&mut PlayerState, InvalidMove> {
    state
        .player_mut(player)
        .ok_or(InvalidMove::UnknownPlayer(player))
}

/// Buy up to what gold allows, or sell back up to what is owned.
fn invest(player: &mut PlayerState, kind: InvestmentType, amount: i64, sell_penalty: f64) -> i64 {
    let cost = kind.cost();
    if amount >= 0 {
        let units = clamp_i64_to_u32(amount.min(affordable_units(player.gold, cost)));
        player.gold -= units_to_f64(units) * cost;
        player.investments.add(kind, units);
        i64::from(units)
    } else {
        let wanted = u32::try_from(amount.unsigned_abs()).unwrap_or(u32::MAX);
        let units = player.investments.take(kind, wanted);
        player.gold += units_to_f64(units) * cost * sell_penalty;
        -i64::from(units)
    }
}

/// Move up to `amount` owned units into the sale queue.
fn sell_resource(
    player: &mut PlayerState,
    kind: ResourceType,
    amount: i64,
) -> Result<u32, InvalidMove> {
    let clamped = amount.min(i64::from(player.resources.get(kind)));
    if clamped < 0 {
        return Err(InvalidMove::NegativeAmount);
    }
    let units = player.resources.take(kind, clamp_i64_to_u32(clamped));
    player.sell_resources.add(kind, units);
    Ok(units)
}

/// Refine raw goods 1:1, bounded by stock and remaining factory capacity.
fn factory_convert(
    player: &mut PlayerState,
    from: ResourceType,
    to: ResourceType,
    amount: i64,
) -> Result<u32, InvalidMove> {
    if !ResourceType::can_convert(from, to) {
        return Err(InvalidMove::ConversionNotAllowed { from, to });
    }
    let clamped = amount
        .min(i64::from(player.resources.get(from)))
        .min(i64::from(player.factory_conversion_left));
    if clamped < 0 {
        return Err(InvalidMove::NegativeAmount);
    }
    let units = player.resources.take(from, clamp_i64_to_u32(clamped));
    player.resources.add(to, units);
    player.factory_conversion_left -= units;
    Ok(units)
}

fn buy_campaign_improvement(
    player: &mut PlayerState,
    effect: CampaignEffect,
) -> Result<(), InvalidMove> {
    let Some(cost) = effect.descriptor().cost else {
        return Err(InvalidMove::NotPurchasable(effect));
    };
    if player.gold < cost {
        return Err(InvalidMove::InsufficientGold {
            cost,
            gold: player.gold,
        });
    }
    player.gold -= cost;
    player.active_campaign_effects.add(effect);
    player.recompute_effectiveness();
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Contribution {
    Campaign,
    Bribe,
}

/// Add scaled pressure to a block. Returns the amount credited to the block.
fn contribute(
    state: &mut GameState,
    player: usize,
    block: usize,
    amount: f64,
    kind: Contribution,
) -> Result<f64, InvalidMove> {
    if !amount.is_finite() {
        return Err(InvalidMove::NonFiniteAmount);
    }
    if block >= state.elections.len() {
        return Err(InvalidMove::UnknownBlock(block));
    }
    let bribery_factor = state.rules.bribery_factor;
    let charge = state.rules.contributions_cost_gold;
    let seat = state
        .players
        .get_mut(player)
        .ok_or(InvalidMove::UnknownPlayer(player))?;

    // the gold clamp only gates rejection; the full amount is credited
    let clamped = amount.min(seat.gold);
    if clamped < 0.0 {
        return Err(InvalidMove::NegativeAmount);
    }
    let factor = match kind {
        Contribution::Campaign => seat.campaign_effectiveness,
        Contribution::Bribe => bribery_factor,
    };
    let credited = amount * factor;
    if charge {
        seat.gold -= clamped;
    }
    if kind == Contribution::Bribe {
        seat.has_bribed = true;
    }
    if let Some(slot) = state.elections[block].contribution.get_mut(player) {
        *slot += credited;
    }
    Ok(credited)
}
