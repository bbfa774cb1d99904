use anyhow::Result;
use colored::Colorize;
use forgesim_game::{
    SessionSummary, format_money, render_catalysts, render_inventory, render_ledger, render_stats,
};
use std::io::Write;
use std::time::Duration;

use super::ScenarioResult;

#[allow(clippy::cast_precision_loss)]
fn pass_rate(results: &[ScenarioResult]) -> f64 {
    if results.is_empty() {
        return 0.0;
    }
    let passed = results.iter().filter(|r| r.passed).count();
    passed as f64 / results.len() as f64 * 100.0
}

fn indented(out: &mut dyn Write, text: &str, prefix: &str) -> Result<()> {
    for line in text.lines() {
        writeln!(out, "{prefix}{line}")?;
    }
    Ok(())
}

pub fn generate_console_report(
    out: &mut dyn Write,
    results: &[ScenarioResult],
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Forge Scenario Results".bright_cyan().bold())?;
    writeln!(out, "{}", "=========================".cyan())?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    writeln!(out, "Total scenarios: {total}")?;
    writeln!(out, "Passed: {}", passed.to_string().green())?;
    writeln!(out, "Failed: {}", (total - passed).to_string().red())?;
    writeln!(out, "Success rate: {:.1}%", pass_rate(results))?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for result in results {
        let status = if result.passed {
            "✅ PASS".green()
        } else {
            "❌ FAIL".red()
        };
        writeln!(
            out,
            "{} {} (seed {})",
            status,
            result.scenario_name.bold(),
            result.seed
        )?;
        writeln!(
            out,
            "   Iterations: {}/{} successful",
            result.successful_iterations, result.iterations_run
        )?;
        writeln!(out, "   Average time: {:?}", result.average_duration)?;

        if let Some(summary) = &result.final_summary {
            writeln!(out, "   Last run:")?;
            indented(out, &render_stats(&summary.stats), "     ")?;
            indented(out, &render_ledger(&summary.ledger), "     ")?;
            let held = held_items(summary);
            if !held.is_empty() {
                writeln!(out, "     Items held:")?;
                indented(out, &held, "       ")?;
            }
            if !summary.catalysts.is_empty() {
                writeln!(out, "     Stones held:")?;
                indented(out, &render_catalysts(&summary.catalysts), "       ")?;
            }
        }

        if !result.failures.is_empty() {
            writeln!(out, "   Failures:")?;
            for failure in &result.failures {
                writeln!(out, "     • {}", failure.red())?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn generate_json_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, results)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(out: &mut dyn Write, results: &[ScenarioResult]) -> Result<()> {
    writeln!(out, "# Forgesim Scenario Results\n")?;

    let total = results.len();
    let passed = results.iter().filter(|r| r.passed).count();
    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Total scenarios**: {total}")?;
    writeln!(out, "- **Passed**: {passed}")?;
    writeln!(out, "- **Failed**: {}", total - passed)?;
    writeln!(out, "- **Success rate**: {:.1}%\n", pass_rate(results))?;

    writeln!(out, "## Detailed Results\n")?;
    writeln!(
        out,
        "| Scenario | Seed | Result | Iterations | Attempts | Best | Money spent |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|---|")?;
    for result in results {
        let status = if result.passed { "✅" } else { "❌" };
        let (attempts, best, money) = result.final_summary.as_ref().map_or_else(
            || ("-".to_string(), "-".to_string(), "-".to_string()),
            |summary| {
                (
                    summary.stats.total_attempts.to_string(),
                    format!("+{}", summary.stats.max_level),
                    format_money(summary.ledger.money),
                )
            },
        );
        writeln!(
            out,
            "| {} | {} | {} | {}/{} | {} | {} | {} |",
            result.scenario_name,
            result.seed,
            status,
            result.successful_iterations,
            result.iterations_run,
            attempts,
            best,
            money
        )?;
    }

    let failed: Vec<_> = results.iter().filter(|r| !r.passed).collect();
    if !failed.is_empty() {
        writeln!(out, "\n## Failures\n")?;
        for result in failed {
            writeln!(out, "### {} (seed {})\n", result.scenario_name, result.seed)?;
            for failure in &result.failures {
                writeln!(out, "- {failure}")?;
            }
            writeln!(out)?;
        }
    }
    Ok(())
}

fn held_items(summary: &SessionSummary) -> String {
    let mut items = summary.inventory.clone();
    items.extend(summary.pending_result.iter().cloned());
    render_inventory(&items)
}
