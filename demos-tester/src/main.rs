mod logic;
mod util;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use colored::Colorize;
use demos_game::RulesLoader;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use logic::{
    BotStrategy, FileRulesLoader, MatchConfig, MatchResult, SeedInfo, resolve_seed_inputs,
    run_match,
};
use util::split_csv;

#[derive(Debug, Parser)]
#[command(name = "demos-tester", version = "0.1.0")]
#[command(about = "Seeded bot matches against the Demos rules engine with invariant checking")]
struct Args {
    /// Seeds to run (comma-separated numbers or match codes like DM-AGORA42)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Seats per match
    #[arg(long, default_value_t = 4)]
    players: usize,

    /// Bot strategies (comma-separated), assigned to seats round-robin
    #[arg(long, default_value = "merchant,vintner,politician,briber")]
    strategies: String,

    /// List all available strategies and exit
    #[arg(long)]
    list_strategies: bool,

    /// Stop a match that has not been decided after this many cycles
    #[arg(long, default_value_t = 500)]
    max_cycles: u32,

    /// Override the victory threshold from the rules
    #[arg(long)]
    victory_points: Option<u32>,

    /// JSON rules override file
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json", "markdown"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if maybe_list_strategies(&args)? {
        return Ok(());
    }

    if args.report == "console" {
        announce_banner();
    }

    let start_time = Instant::now();
    let configs = build_match_configs(&args)?;
    let mut results = Vec::with_capacity(configs.len());
    for config in &configs {
        let result = run_match(config, args.verbose)?;
        if args.verbose {
            log::info!(
                "{} finished after {} cycles ({} failures)",
                result.code,
                result.cycles,
                result.failures.len()
            );
        }
        results.push(result);
    }

    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn maybe_list_strategies(args: &Args) -> Result<bool> {
    if !args.list_strategies {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available strategies:")?;
    for strategy in BotStrategy::ALL {
        writeln!(
            output_target.writer(),
            "  {:12} - {}",
            strategy.key(),
            strategy.description()
        )?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🏛️ Demos Match Tester".bright_cyan().bold());
    println!("{}", "=====================".cyan());
}

fn parse_strategies(raw: &str) -> Result<Vec<BotStrategy>> {
    let strategies = split_csv(raw)
        .iter()
        .map(|name| {
            name.parse::<BotStrategy>()
                .map_err(|()| anyhow!("Unknown strategy: {name}"))
        })
        .collect::<Result<Vec<_>>>()?;
    if strategies.is_empty() {
        bail!("at least one strategy is required");
    }
    Ok(strategies)
}

fn build_match_configs(args: &Args) -> Result<Vec<MatchConfig>> {
    let strategies = parse_strategies(&args.strategies)?;
    let rules = FileRulesLoader::new(args.rules.as_deref())
        .load_rules()
        .context("failed to load rules")?;
    let seeds: Vec<SeedInfo> = resolve_seed_inputs(&split_csv(&args.seeds))?;

    Ok(seeds
        .into_iter()
        .map(|seed| {
            let mut config = MatchConfig::new(seed, args.players, strategies.clone())
                .with_max_cycles(args.max_cycles)
                .with_rules(rules.clone());
            config.victory_points = args.victory_points;
            config
        })
        .collect())
}

fn write_reports(args: &Args, results: &[MatchResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, results)?,
        "markdown" => logic::reports::generate_markdown_report(&mut output_target, results)?,
        _ => {
            logic::reports::generate_console_report(
                &mut output_target,
                results,
                start_time.elapsed(),
            )?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            seeds: "1337".to_string(),
            players: 3,
            strategies: "merchant,politician".to_string(),
            list_strategies: false,
            max_cycles: 20,
            victory_points: None,
            rules: None,
            report: "json".to_string(),
            verbose: false,
            output: None,
        }
    }

    #[test]
    fn args_parse_from_command_line() {
        let args = Args::try_parse_from([
            "demos-tester",
            "--seeds",
            "1,DM-AGORA42",
            "--players",
            "5",
            "--report",
            "markdown",
        ])
        .unwrap();
        assert_eq!(args.players, 5);
        assert_eq!(args.report, "markdown");
        assert!(Args::try_parse_from(["demos-tester", "--report", "csv"]).is_err());
    }

    #[test]
    fn strategies_must_be_known() {
        assert_eq!(
            parse_strategies("merchant, random").unwrap(),
            vec![BotStrategy::Merchant, BotStrategy::Random]
        );
        assert!(parse_strategies("merchant,tyrant").is_err());
        assert!(parse_strategies(" , ").is_err());
    }

    #[test]
    fn configs_follow_seeds_and_overrides() {
        let mut args = base_args();
        args.seeds = "4,5,4".to_string();
        args.victory_points = Some(12);
        let configs = build_match_configs(&args).unwrap();
        assert_eq!(configs.len(), 2);
        assert!(configs.iter().all(|c| c.victory_points == Some(12)));
        assert!(configs.iter().all(|c| c.max_cycles == 20 && c.num_players == 3));
    }

    #[test]
    fn reports_write_to_output_file() {
        let path = std::env::temp_dir().join(format!("demos-tester-report-{}.json", std::process::id()));
        let mut args = base_args();
        args.output = Some(path.clone());
        let configs = build_match_configs(&args).unwrap();
        let results: Vec<MatchResult> = configs
            .iter()
            .map(|config| run_match(config, false).unwrap())
            .collect();
        write_reports(&args, &results, Instant::now()).unwrap();
        let content = std::fs::read_to_string(path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed[0]["seed"], 1337);
    }
}
