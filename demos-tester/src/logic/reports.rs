use anyhow::Result;
use colored::Colorize;
use demos_game::numbers::usize_to_f64;
use std::io::Write;
use std::time::Duration;

use super::MatchResult;

fn success_rate(results: &[MatchResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let passed = results.iter().filter(|r| r.passed).count();
    (usize_to_f64(passed) / usize_to_f64(results.len())) * 100.0
}

fn winner_label(result: &MatchResult) -> String {
    match (result.winner, result.winner_strategy.as_deref()) {
        (Some(seat), Some(strategy)) => format!("seat {seat} ({strategy})"),
        (Some(seat), None) => format!("seat {seat}"),
        _ => "none".to_string(),
    }
}

pub fn generate_console_report<W: Write + ?Sized>(
    writer: &mut W,
    results: &[MatchResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(writer)?;
    writeln!(writer, "{}", "📊 Match Results Summary".bright_cyan().bold())?;
    writeln!(writer, "{}", "========================".cyan())?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = total - passed;
    let decided = results.iter().filter(|r| r.winner.is_some()).count();

    writeln!(writer, "Total matches: {total}")?;
    writeln!(writer, "Passed: {}", passed.to_string().green())?;
    writeln!(writer, "Failed: {}", failed.to_string().red())?;
    writeln!(writer, "Decided: {decided}/{total}")?;
    writeln!(writer, "Success rate: {:.1}%", success_rate(results))?;
    writeln!(writer, "Total time: {total_duration:?}")?;
    writeln!(writer)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(
            writer,
            "{} {} (seed {})",
            status,
            result.code.bold(),
            result.seed
        )?;
        writeln!(writer, "   Seats: {}", result.strategies.join(", "))?;
        writeln!(
            writer,
            "   Cycles: {}  Winner: {}  Points: {:?}",
            result.cycles,
            winner_label(result),
            result.points
        )?;
        writeln!(
            writer,
            "   Moves: {} applied, {} rejected  RNG draws: {}",
            result.moves_applied, result.moves_rejected, result.rng_draws
        )?;
        if !result.failures.is_empty() {
            writeln!(writer, "   Failures:")?;
            for failure in &result.failures {
                writeln!(writer, "     • {}", failure.red())?;
            }
        }
        writeln!(writer)?;
    }
    Ok(())
}

pub fn generate_json_report<W: Write + ?Sized>(writer: &mut W, results: &[MatchResult]) -> Result<()> {
    let json_output = serde_json::to_string_pretty(results)?;
    writeln!(writer, "{json_output}")?;
    Ok(())
}

pub fn generate_markdown_report<W: Write + ?Sized>(
    writer: &mut W,
    results: &[MatchResult],
) -> Result<()> {
    writeln!(writer, "# Demos Match Results\n")?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();

    writeln!(writer, "## Summary\n")?;
    writeln!(writer, "- **Total matches**: {total}")?;
    writeln!(writer, "- **Passed**: {passed}")?;
    writeln!(writer, "- **Failed**: {}", total - passed)?;
    writeln!(writer, "- **Success rate**: {:.1}%\n", success_rate(results))?;

    writeln!(writer, "## Matches\n")?;
    writeln!(writer, "| Code | Seed | Cycles | Winner | Points | Rejected | Status |")?;
    writeln!(writer, "|---|---|---|---|---|---|---|")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };
        writeln!(
            writer,
            "| {} | {} | {} | {} | {:?} | {} | {} |",
            result.code,
            result.seed,
            result.cycles,
            winner_label(result),
            result.points,
            result.moves_rejected,
            status
        )?;
    }

    let failing: Vec<&MatchResult> = results.iter().filter(|r| !r.passed).collect();
    if !failing.is_empty() {
        writeln!(writer, "\n## Failures\n")?;
        for result in failing {
            writeln!(writer, "### {}\n", result.code)?;
            for failure in &result.failures {
                writeln!(writer, "- {failure}")?;
            }
            writeln!(writer)?;
        }
    }
    Ok(())
}
