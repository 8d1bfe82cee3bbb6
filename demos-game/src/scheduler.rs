//! Turn and phase sequencing. A match has exactly one repeating phase; each
//! pass through it is one cycle with a freshly shuffled seat order.
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::cycle::{CycleReport, resolve_cycle};
use crate::rng::MatchRng;
use crate::state::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Cycle,
}

/// Seat permutation for the running cycle and the position within it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TurnOrder {
    pub order: Vec<usize>,
    pub position: usize,
}

impl TurnOrder {
    #[must_use]
    pub fn current(&self) -> Option<usize> {
        self.order.get(self.position).copied()
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.position + 1 >= self.order.len()
    }
}

/// What ending a turn led to.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnEnd {
    /// The next seat in this cycle's order is up.
    Advanced { next: usize },
    /// The round completed; the cycle resolved and a new order was drawn.
    CycleResolved(CycleReport),
}

/// Enter the phase: draw a fresh permutation of every seat.
pub fn begin_phase(state: &mut GameState, rng: &mut MatchRng) {
    let mut order: Vec<usize> = (0..state.num_players()).collect();
    order.shuffle(rng.turn_order());
    log::trace!("cycle {} turn order {order:?}", state.cycle_count);
    state.turn = TurnOrder { order, position: 0 };
}

/// Leave the phase, running cycle resolution as the exit hook, and re-enter it.
pub fn transition_phase(state: &mut GameState, rng: &mut MatchRng) -> CycleReport {
    let report = resolve_cycle(state, rng);
    begin_phase(state, rng);
    report
}

/// Finish the current seat's turn. The last seat of a multi-seat round closes
/// the cycle; a lone seat simply keeps the turn.
pub fn end_turn(state: &mut GameState, rng: &mut MatchRng) -> TurnEnd {
    if state.turn.is_last() {
        if state.num_players() > 1 {
            return TurnEnd::CycleResolved(transition_phase(state, rng));
        }
        state.turn.position = 0;
    } else {
        state.turn.position += 1;
    }
    TurnEnd::Advanced {
        next: state.turn.current().unwrap_or(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;

    fn setup(num_players: usize, seed: u64) -> (GameState, MatchRng) {
        let mut rng = MatchRng::from_seed(seed);
        let state = GameState::setup(num_players, None, RulesConfig::default(), &mut rng).unwrap();
        (state, rng)
    }

    #[test]
    fn order_is_a_permutation_of_every_seat() {
        let (state, _) = setup(5, 17);
        let mut seats = state.turn.order.clone();
        seats.sort_unstable();
        assert_eq!(seats, vec![0, 1, 2, 3, 4]);
        assert_eq!(state.turn.position, 0);
    }

    #[test]
    fn each_seat_plays_once_then_cycle_resolves() {
        let (mut state, mut rng) = setup(3, 4);
        let order = state.turn.order.clone();
        let mut seen = vec![state.current_player().unwrap()];
        for _ in 0..2 {
            match end_turn(&mut state, &mut rng) {
                TurnEnd::Advanced { next } => seen.push(next),
                TurnEnd::CycleResolved(_) => panic!("cycle closed early"),
            }
        }
        assert_eq!(seen, order);
        assert!(matches!(
            end_turn(&mut state, &mut rng),
            TurnEnd::CycleResolved(_)
        ));
        assert_eq!(state.cycle_count, 1);
        assert_eq!(state.turn.position, 0);
    }

    #[test]
    fn lone_seat_never_closes_a_cycle() {
        let (mut state, mut rng) = setup(1, 2);
        for _ in 0..5 {
            assert_eq!(end_turn(&mut state, &mut rng), TurnEnd::Advanced { next: 0 });
        }
        assert_eq!(state.cycle_count, 0);
    }

    #[test]
    fn explicit_transition_resolves_and_reshuffles() {
        let (mut state, mut rng) = setup(4, 8);
        state.turn.position = 2;
        let report = transition_phase(&mut state, &mut rng);
        assert_eq!(report.cycle, 1);
        assert_eq!(state.turn.position, 0);
        assert_eq!(state.turn.order.len(), 4);
    }
}
