use std::time::Instant;

use anyhow::{Context, Result};
use demos_game::{MatchSession, Move, MoveOutcome, RulesConfig, TurnEnd};
use serde::Serialize;

use crate::logic::invariants::{check_invariants, check_turn_start};
use crate::logic::policy::{BotStrategy, PlayerPolicy};
use crate::logic::seeds::SeedInfo;

/// Configuration for one bot match.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    pub seed: SeedInfo,
    pub num_players: usize,
    /// Assigned to seats round-robin.
    pub strategies: Vec<BotStrategy>,
    pub max_cycles: u32,
    pub victory_points: Option<u32>,
    pub rules: RulesConfig,
}

impl MatchConfig {
    #[must_use]
    pub fn new(seed: SeedInfo, num_players: usize, strategies: Vec<BotStrategy>) -> Self {
        Self {
            seed,
            num_players,
            strategies,
            max_cycles: 500,
            victory_points: None,
            rules: RulesConfig::default(),
        }
    }

    #[must_use]
    pub const fn with_max_cycles(mut self, max_cycles: u32) -> Self {
        self.max_cycles = max_cycles;
        self
    }

    #[must_use]
    pub fn with_rules(mut self, rules: RulesConfig) -> Self {
        self.rules = rules;
        self
    }

    #[must_use]
    pub fn strategy_for(&self, seat: usize) -> BotStrategy {
        if self.strategies.is_empty() {
            return BotStrategy::Merchant;
        }
        self.strategies[seat % self.strategies.len()]
    }
}

/// Outcome of a bot match, as it appears in reports.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub seed: u64,
    pub code: String,
    pub strategies: Vec<String>,
    pub cycles: u32,
    pub winner: Option<usize>,
    pub winner_strategy: Option<String>,
    pub points: Vec<u32>,
    pub gold: Vec<f64>,
    pub moves_applied: usize,
    pub moves_rejected: usize,
    pub rng_draws: u64,
    pub duration_ms: u128,
    pub failures: Vec<String>,
    pub passed: bool,
}

/// Play one match to victory or the cycle cap, checking invariants after
/// every submitted move.
pub fn run_match(config: &MatchConfig, verbose: bool) -> Result<MatchResult> {
    let started = Instant::now();
    let mut session = MatchSession::new(
        config.seed.seed,
        config.num_players,
        config.victory_points,
        config.rules.clone(),
    )
    .with_context(|| format!("failed to set up match for seed {}", config.seed.seed))?;

    let mut policies: Vec<Box<dyn PlayerPolicy + Send>> = (0..config.num_players)
        .map(|seat| {
            let seat_salt = u64::try_from(seat).unwrap_or(u64::MAX);
            config
                .strategy_for(seat)
                .create_policy(config.seed.seed.wrapping_add(seat_salt))
        })
        .collect();

    let mut failures = check_invariants(session.state());
    let mut moves_applied = 0_usize;
    let mut moves_rejected = 0_usize;
    // a lone seat never closes a cycle, so bound by turns as well
    let seats = u64::try_from(config.num_players).unwrap_or(u64::MAX);
    let max_turns = u64::from(config.max_cycles).saturating_mul(seats);
    let mut turns = 0_u64;

    while !session.is_over() && session.state().cycle_count < config.max_cycles && turns < max_turns {
        let Some(seat) = session.state().current_player() else {
            failures.push("no seat holds the turn".to_string());
            break;
        };
        failures.extend(check_turn_start(session.state(), seat));

        let plan = policies[seat].plan_turn(&session.view(seat));
        for mv in plan.into_iter().chain(std::iter::once(Move::EndTurn)) {
            if session.is_over() {
                break;
            }
            match session.submit(seat, mv.clone()) {
                Ok(outcome) => {
                    moves_applied += 1;
                    if verbose && let MoveOutcome::TurnEnded(TurnEnd::CycleResolved(report)) = &outcome {
                        log::info!(
                            "seed {} cycle {} awards {:?}",
                            config.seed.seed,
                            report.cycle,
                            report.awards
                        );
                    }
                }
                Err(err) => {
                    moves_rejected += 1;
                    log::debug!("seat {seat} {} rejected: {err}", mv.name());
                }
            }
            failures.extend(
                check_invariants(session.state())
                    .into_iter()
                    .map(|failure| format!("cycle {}: {failure}", session.state().cycle_count)),
            );
        }
        turns += 1;
    }

    failures.dedup();
    let state = session.state();
    let winner = session.outcome().map(|victory| victory.winner);
    Ok(MatchResult {
        seed: config.seed.seed,
        code: config.seed.display_code(),
        strategies: (0..config.num_players)
            .map(|seat| config.strategy_for(seat).to_string())
            .collect(),
        cycles: state.cycle_count,
        winner,
        winner_strategy: winner.map(|seat| config.strategy_for(seat).to_string()),
        points: state.points.clone(),
        gold: state.players.iter().map(|player| player.gold).collect(),
        moves_applied,
        moves_rejected,
        rng_draws: session.draws(),
        duration_ms: started.elapsed().as_millis(),
        passed: failures.is_empty(),
        failures,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(num_players: usize, strategies: Vec<BotStrategy>) -> MatchConfig {
        MatchConfig::new(SeedInfo::from_numeric(2024), num_players, strategies).with_max_cycles(40)
    }

    #[test]
    fn every_strategy_plays_a_clean_match() {
        let result = run_match(&config(5, BotStrategy::ALL.to_vec()), false).unwrap();
        assert!(result.passed, "{:?}", result.failures);
        assert!(result.cycles > 0);
        assert_eq!(result.points.len(), 5);
        assert!(result.moves_applied > 0);
    }

    #[test]
    fn random_bots_hit_rejections_without_breaking_invariants() {
        let result = run_match(&config(3, vec![BotStrategy::Random]), false).unwrap();
        assert!(result.passed, "{:?}", result.failures);
        assert!(result.moves_rejected > 0);
    }

    #[test]
    fn matches_are_reproducible() {
        let cfg = config(4, vec![BotStrategy::Politician, BotStrategy::Briber]);
        let first = run_match(&cfg, false).unwrap();
        let second = run_match(&cfg, false).unwrap();
        assert_eq!(first.points, second.points);
        assert_eq!(first.winner, second.winner);
        assert_eq!(first.rng_draws, second.rng_draws);
    }

    #[test]
    fn lone_seat_stops_at_turn_cap() {
        let result = run_match(&config(1, vec![BotStrategy::Merchant]), false).unwrap();
        assert_eq!(result.cycles, 0);
        assert!(result.passed, "{:?}", result.failures);
    }

    #[test]
    fn low_threshold_produces_a_winner() {
        let mut cfg = config(2, vec![BotStrategy::Politician, BotStrategy::Merchant]);
        cfg.victory_points = Some(3);
        let result = run_match(&cfg, false).unwrap();
        assert_eq!(result.winner, Some(0));
        assert_eq!(result.winner_strategy.as_deref(), Some("politician"));
    }

    #[test]
    fn strategies_wrap_round_robin() {
        let cfg = config(3, vec![BotStrategy::Vintner, BotStrategy::Briber]);
        assert_eq!(cfg.strategy_for(2), BotStrategy::Vintner);
        assert_eq!(config(2, Vec::new()).strategy_for(1), BotStrategy::Merchant);
    }
}
