//! Election blocks: generation each cycle, contribution tracking and winner
//! determination.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{
    AWARD_ONE_THRESHOLD, AWARD_THREE_THRESHOLD, AWARD_TWO_THRESHOLD, POLICY_PRIVATE_THRESHOLD,
};

pub mod names;

/// Who may see a block's projected winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElectionPolicy {
    Private,
    Public,
    PublicWithBribe,
}

impl ElectionPolicy {
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Public | Self::PublicWithBribe)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElectionBlock {
    pub name: String,
    pub policy: ElectionPolicy,
    pub point_awards: u32,
    /// Scaled contribution per seat, indexed by player id.
    pub contribution: Vec<f64>,
}

impl ElectionBlock {
    /// Seat holding the strictly greatest contribution, `None` on any tie
    /// (including nobody contributing).
    #[must_use]
    pub fn winner(&self) -> Option<usize> {
        determine_winner(&self.contribution)
    }

    /// Winner visible to every seat; hidden for private blocks.
    #[must_use]
    pub fn projected_winner(&self) -> Option<usize> {
        if self.policy.is_public() {
            self.winner()
        } else {
            None
        }
    }
}

/// Policy and point award both derive from one uniform draw in `[0, 1)`.
#[must_use]
pub fn roll_policy_and_awards(roll: f64) -> (ElectionPolicy, u32) {
    let policy = if roll < POLICY_PRIVATE_THRESHOLD {
        ElectionPolicy::Private
    } else {
        ElectionPolicy::Public
    };
    let point_awards = if roll < AWARD_ONE_THRESHOLD {
        1
    } else if roll < AWARD_TWO_THRESHOLD {
        2
    } else if roll < AWARD_THREE_THRESHOLD {
        3
    } else {
        4
    };
    (policy, point_awards)
}

/// Build a full replacement set of `count` blocks with uniquely named entries
/// and zeroed contributions for `num_players` seats.
pub fn generate_elections(
    count: usize,
    num_players: usize,
    rng: &mut impl Rng,
) -> Vec<ElectionBlock> {
    let mut blocks: Vec<ElectionBlock> = Vec::with_capacity(count);
    for _ in 0..count {
        let (policy, point_awards) = roll_policy_and_awards(rng.r#gen::<f64>());
        let taken: Vec<&str> = blocks.iter().map(|block| block.name.as_str()).collect();
        let name = names::unique_name(&taken, rng);
        log::trace!("generated election block {name} ({policy:?}, {point_awards} pts)");
        blocks.push(ElectionBlock {
            name,
            policy,
            point_awards,
            contribution: vec![0.0; num_players],
        });
    }
    blocks
}

/// Argmax over contributions; ties and an all-zero board have no winner.
#[must_use]
pub fn determine_winner(contribution: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    let mut tied = false;
    for (seat, &amount) in contribution.iter().enumerate() {
        match best {
            Some((_, top)) if amount > top => {
                best = Some((seat, amount));
                tied = false;
            }
            #[allow(clippy::float_cmp)]
            Some((_, top)) if amount == top => tied = true,
            Some(_) => {}
            None => best = Some((seat, amount)),
        }
    }
    match best {
        Some((seat, top)) if !tied && top > 0.0 => Some(seat),
        _ => None,
    }
}

/// Points each seat earns from the current blocks.
#[must_use]
pub fn tally_awards(blocks: &[ElectionBlock], num_players: usize) -> Vec<u32> {
    let mut awards = vec![0_u32; num_players];
    for block in blocks {
        if let Some(seat) = block.winner()
            && let Some(slot) = awards.get_mut(seat)
        {
            *slot = slot.saturating_add(block.point_awards);
        }
    }
    awards
}
