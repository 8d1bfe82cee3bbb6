//! Match session: owns the state, RNG and move log, and replays a match from its seed.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::RulesConfig;
use crate::moves::{InvalidMove, Move, MoveOutcome, apply_move};
use crate::rng::MatchRng;
use crate::state::{GameState, SetupError};
use crate::view::{PublicState, stripped_view};
use crate::victory::{Victory, check_victory};

/// One accepted move, in submission order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedMove {
    pub player: usize,
    #[serde(flatten)]
    pub mv: Move,
}

#[derive(Debug, Error, PartialEq)]
pub enum ReplayError {
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error("logged move {index} was rejected: {source}")]
    Rejected { index: usize, source: InvalidMove },
}

/// High-level driver binding a match state to its random source, enforcing
/// turn ownership and recording every accepted move for replay.
#[derive(Debug, Clone)]
pub struct MatchSession {
    state: GameState,
    rng: MatchRng,
    log: Vec<LoggedMove>,
    outcome: Option<Victory>,
}

impl MatchSession {
    /// Set up a fresh match.
    ///
    /// # Errors
    ///
    /// Propagates [`SetupError`] for unsupported seat counts or invalid rules.
    pub fn new(
        seed: u64,
        num_players: usize,
        victory_points: Option<u32>,
        rules: RulesConfig,
    ) -> Result<Self, SetupError> {
        let mut rng = MatchRng::from_seed(seed);
        let state = GameState::setup(num_players, victory_points, rules, &mut rng)?;
        Ok(Self {
            state,
            rng,
            log: Vec::new(),
            outcome: None,
        })
    }

    /// Rebuild a match by resubmitting a move log against the same seed.
    ///
    /// # Errors
    ///
    /// Fails on setup errors or when a logged move no longer applies.
    pub fn replay(
        seed: u64,
        num_players: usize,
        victory_points: Option<u32>,
        rules: RulesConfig,
        log: &[LoggedMove],
    ) -> Result<Self, ReplayError> {
        let mut session = Self::new(seed, num_players, victory_points, rules)?;
        for (index, entry) in log.iter().enumerate() {
            session
                .submit(entry.player, entry.mv.clone())
                .map_err(|source| ReplayError::Rejected { index, source })?;
        }
        Ok(session)
    }

    /// Apply a move for `player` if it is their turn, then evaluate victory.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMove`] for finished matches, out-of-turn players and
    /// infeasible commands; the state is unchanged in every case.
    pub fn submit(&mut self, player: usize, mv: Move) -> Result<MoveOutcome, InvalidMove> {
        if self.outcome.is_some() {
            return Err(InvalidMove::MatchOver);
        }
        if player >= self.state.num_players() {
            return Err(InvalidMove::UnknownPlayer(player));
        }
        let current = self.state.current_player().unwrap_or(0);
        if player != current {
            return Err(InvalidMove::NotYourTurn { player, current });
        }

        let outcome = apply_move(&mut self.state, player, &mv, &mut self.rng)?;
        self.log.push(LoggedMove { player, mv });

        if let Some(victory) = check_victory(&self.state) {
            log::info!(
                "match over after cycle {}: seat {} wins with {} points",
                self.state.cycle_count,
                victory.winner,
                self.state.points[victory.winner]
            );
            self.outcome = Some(victory);
        }
        Ok(outcome)
    }

    #[must_use]
    pub fn view(&self, viewer: usize) -> PublicState {
        stripped_view(&self.state, viewer)
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for hosts and tests; bypasses every rule.
    pub const fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.rng.seed()
    }

    #[must_use]
    pub fn log(&self) -> &[LoggedMove] {
        &self.log
    }

    #[must_use]
    pub const fn outcome(&self) -> Option<Victory> {
        self.outcome
    }

    #[must_use]
    pub const fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Total random draws consumed so far, across every stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.rng.draws()
    }

    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }
}
