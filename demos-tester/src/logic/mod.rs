pub mod invariants;
pub mod policy;
pub mod reports;
pub mod rules;
pub mod seeds;
pub mod simulation;

pub use policy::BotStrategy;
pub use rules::FileRulesLoader;
pub use seeds::{SeedInfo, resolve_seed_inputs};
pub use simulation::{MatchConfig, MatchResult, run_match};
