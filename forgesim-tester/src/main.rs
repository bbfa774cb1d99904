mod common;
mod logic;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use forgesim_game::ConfigLoader;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use common::scenario::{TestScenario, all_scenario_keys, get_scenario, list_scenarios};
use common::{ConfigSource, now_ms, split_csv};
use logic::{ForgeTester, ScenarioResult, expand_steps, parse_script, resolve_seed_inputs};

#[derive(Debug, Parser)]
#[command(name = "forgesim-tester", version)]
#[command(about = "Headless scenario runner for the Forgesim enhancement engine")]
struct Args {
    /// Scenarios to run (comma-separated, or `all`). Defaults to `grind` unless a script is given
    #[arg(long)]
    scenarios: Option<String>,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated decimal or 0x-prefixed hex)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Action script to replay, e.g. "buy:sword;craft:normal*3;assign:1;stone:normal;enhance;collect"
    #[arg(long)]
    script: Option<String>,

    /// Forge configuration JSON overriding the built-in balance table
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let cfg = ConfigSource::from_arg(args.config.clone())
        .load_forge_config()
        .context("loading forge configuration")?;
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let scenarios = collect_scenarios(&args)?;
    let tester = ForgeTester::new(cfg, args.verbose);

    println!("{}", "⚒️  Running Scenarios".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let results: Vec<ScenarioResult> = scenarios
        .iter()
        .flat_map(|scenario| tester.run_scenario(scenario, &seeds, args.iterations))
        .collect();

    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut out = open_output(args.output.as_deref())?;
    writeln!(out, "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(out, "  {key:25} - {description}")?;
    }
    out.flush()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "⚒️  Forgesim Scenario Tester".bright_cyan().bold());
    println!("{}", "=============================".cyan());
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s == "all") {
        scenarios.retain(|s| s != "all");
        scenarios.extend(all_scenario_keys().map(str::to_string));
    }
    scenarios
}

fn collect_scenarios(args: &Args) -> Result<Vec<TestScenario>> {
    let requested = match (&args.scenarios, &args.script) {
        (Some(list), _) => expand_scenarios(list),
        (None, Some(_)) => Vec::new(),
        (None, None) => vec!["grind".to_string()],
    };

    let mut scenarios = Vec::new();
    for key in &requested {
        match get_scenario(key) {
            Some(scenario) => scenarios.push(scenario),
            None => eprintln!("⚠️  Unknown scenario: {}", key.yellow()),
        }
    }

    if let Some(script) = &args.script {
        let steps = parse_script(script, now_ms()).context("parsing --script")?;
        scenarios.push(TestScenario::scripted(expand_steps(&steps)));
    }
    Ok(scenarios)
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut out = open_output(args.output.as_deref())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut *out, results)?,
        "markdown" if results.is_empty() => {
            writeln!(out, "# Forgesim Scenario Results\n\n_No scenarios executed._")?;
        }
        "markdown" => logic::reports::generate_markdown_report(&mut *out, results)?,
        _ => {
            if results.is_empty() {
                writeln!(out, "No scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut *out,
                    results,
                    start_time.elapsed(),
                )?;
            }
            writeln!(out)?;
            writeln!(out, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    out.flush()?;
    Ok(())
}

/// Buffered report destination: the `--output` file or stdout.
fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    let Some(path) = path else {
        return Ok(Box::new(BufWriter::new(stdout())));
    };
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(Box::new(BufWriter::new(file)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Args {
        Args {
            scenarios: None,
            list_scenarios: false,
            seeds: "1337".to_string(),
            iterations: 1,
            report: "json".to_string(),
            output: None,
            script: None,
            config: None,
            verbose: false,
        }
    }

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "forgesim-main-{label}-{}",
            std::process::id()
        ))
    }

    #[test]
    fn expand_scenarios_handles_all() {
        let expanded = expand_scenarios("grind,all");
        assert_eq!(expanded[0], "grind");
        assert!(expanded.iter().any(|s| s == "refine-economy"));
        assert!(!expanded.iter().any(|s| s == "all"));
    }

    #[test]
    fn default_scenario_is_grind() {
        let scenarios = collect_scenarios(&base_args()).unwrap();
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].name, "Normal Stone Grind");
    }

    #[test]
    fn script_replaces_default_scenario() {
        let mut args = base_args();
        args.script = Some("buy:fan;craft:normal*2".to_string());
        let scenarios = collect_scenarios(&args).unwrap();
        assert_eq!(scenarios.len(), 1);
        assert_eq!(scenarios[0].name, "Custom Script");
    }

    #[test]
    fn bad_script_is_an_error() {
        let mut args = base_args();
        args.script = Some("dance".to_string());
        let err = collect_scenarios(&args).unwrap_err();
        assert!(format!("{err:#}").contains("unknown verb"));
    }

    #[test]
    fn unknown_scenarios_are_skipped() {
        let mut args = base_args();
        args.scenarios = Some("nope,safe-ladder".to_string());
        let scenarios = collect_scenarios(&args).unwrap();
        assert_eq!(scenarios.len(), 1);
    }

    #[test]
    fn list_scenarios_writes_to_output_file() {
        let mut args = base_args();
        args.list_scenarios = true;
        let path = temp_path("list");
        args.output = Some(path.clone());
        assert!(maybe_list_scenarios(&args).unwrap());
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("supreme-only"));
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn json_report_writes_results() {
        let mut args = base_args();
        let path = temp_path("json");
        args.output = Some(path.clone());
        let tester = ForgeTester::new(forgesim_game::ForgeConfig::default_config(), false);
        let scenario = get_scenario("safe-ladder").unwrap();
        let results = tester.run_scenario(&scenario, &[1], 1);
        write_reports(&args, &results, Instant::now()).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed[0]["scenario_name"], "Safe Ladder");
        let _ = std::fs::remove_file(path);
    }
}
