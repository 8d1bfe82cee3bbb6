//! Victory check: the unique leader at or above the points threshold wins.
use serde::{Deserialize, Serialize};

use crate::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Victory {
    pub winner: usize,
}

/// The match ends once exactly one seat holds the strict maximum among the
/// seats at or above the threshold. Ties at the top keep it running.
#[must_use]
pub fn check_victory(state: &GameState) -> Option<Victory> {
    leading_seat(&state.points, state.victory_condition_points).map(|winner| Victory { winner })
}

fn leading_seat(points: &[u32], threshold: u32) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    let mut tied = false;
    for (seat, &score) in points.iter().enumerate().filter(|(_, score)| **score >= threshold) {
        match best {
            Some((_, top)) if score > top => {
                best = Some((seat, score));
                tied = false;
            }
            Some((_, top)) if score == top => tied = true,
            Some(_) => {}
            None => best = Some((seat, score)),
        }
    }
    best.filter(|_| !tied).map(|(seat, _)| seat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use crate::rng::MatchRng;

    fn with_points(points: Vec<u32>) -> GameState {
        let mut rng = MatchRng::from_seed(5);
        let mut state =
            GameState::setup(points.len(), None, RulesConfig::default(), &mut rng).unwrap();
        state.points = points;
        state
    }

    #[test]
    fn tie_at_the_top_keeps_match_running() {
        assert_eq!(check_victory(&with_points(vec![150, 150, 90])), None);
    }

    #[test]
    fn single_qualifier_wins() {
        assert_eq!(
            check_victory(&with_points(vec![150, 90, 90])),
            Some(Victory { winner: 0 })
        );
    }

    #[test]
    fn strict_maximum_among_qualifiers_wins() {
        assert_eq!(
            check_victory(&with_points(vec![151, 160, 150])),
            Some(Victory { winner: 1 })
        );
    }

    #[test]
    fn nobody_qualifies() {
        assert_eq!(check_victory(&with_points(vec![149, 0, 12])), None);
        assert_eq!(leading_seat(&[], 1), None);
    }

    #[test]
    fn lower_tie_does_not_block_leader() {
        assert_eq!(leading_seat(&[200, 150, 150], 150), Some(0));
    }
}
