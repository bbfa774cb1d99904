use colored::Colorize;
use forgesim_game::{ForgeConfig, SessionSummary};
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::common::scenario::TestScenario;
use crate::logic::plan::{ForgePlan, RunSummary, run_plan};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    /// Session snapshot from the last iteration.
    pub final_summary: Option<SessionSummary>,
}

pub struct ForgeTester {
    cfg: ForgeConfig,
    verbose: bool,
}

impl ForgeTester {
    pub const fn new(cfg: ForgeConfig, verbose: bool) -> Self {
        Self { cfg, verbose }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        seeds
            .iter()
            .map(|&seed| {
                if self.verbose {
                    println!(
                        "🧪 Testing scenario: {} (strategy: {} seed: {})",
                        scenario.name.bright_white(),
                        scenario.plan.strategy.label(),
                        seed
                    );
                }
                self.run_single_scenario(scenario, seed, iterations)
            })
            .collect()
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut durations = Vec::new();
        let mut final_summary = None;

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));
            let run = run_plan(&scenario.plan, &self.cfg, iteration_seed);
            durations.push(start_time.elapsed());
            debug!(
                "{} seed {iteration_seed}: {} actions, draws {:?}",
                scenario.name,
                run.history.len(),
                run.draws
            );

            match evaluate_expectations(&scenario.plan, &run) {
                Some(err) => {
                    if self.verbose {
                        println!(
                            "  ❌ Iteration {}/{} failed: {}",
                            i + 1,
                            iterations,
                            err.clone().red()
                        );
                    }
                    failures.push(format!(
                        "Iteration {} (strategy {}, seed {}, attempts {}, ignored {}): {}",
                        i + 1,
                        run.strategy,
                        run.seed,
                        run.summary.stats.total_attempts,
                        run.ignored(),
                        err
                    ));
                }
                None => {
                    successes += 1;
                    if self.verbose {
                        println!(
                            "  ✅ Iteration {}/{} passed ({:?}) attempts:{} best:+{}",
                            i + 1,
                            iterations,
                            durations.last().copied().unwrap_or_default(),
                            run.summary.stats.total_attempts,
                            run.summary.stats.max_level
                        );
                    }
                }
            }
            final_summary = Some(run.summary);
        }

        let average_duration = if durations.is_empty() {
            Duration::ZERO
        } else {
            durations.iter().sum::<Duration>() / u32::try_from(durations.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            average_duration,
            final_summary,
        }
    }
}

fn evaluate_expectations(plan: &ForgePlan, run: &RunSummary) -> Option<String> {
    plan.expectations
        .iter()
        .find_map(|expectation| expectation.evaluate(run).err())
        .map(|err| format!("{err:#}"))
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::scenario::get_scenario;
    use crate::logic::plan::Strategy;
    use anyhow::bail;
    use forgesim_game::Action;

    #[test]
    fn passing_scenario_reports_every_iteration() {
        let tester = ForgeTester::new(ForgeConfig::default_config(), false);
        let scenario = get_scenario("safe-ladder").unwrap();
        let results = tester.run_scenario(&scenario, &[1, 2], 3);
        assert_eq!(results.len(), 2);
        for result in &results {
            assert!(result.passed, "{:?}", result.failures);
            assert_eq!(result.successful_iterations, 3);
            assert!(result.final_summary.is_some());
        }
        assert_eq!(results[1].seed, 2);
    }

    #[test]
    fn failing_expectation_is_recorded() {
        let tester = ForgeTester::new(ForgeConfig::default_config(), false);
        let plan = ForgePlan::new(Strategy::Scripted(vec![Action::Enhance]))
            .with_expectation(|_: &RunSummary| -> anyhow::Result<()> { bail!("always fails") });
        let scenario = TestScenario::new("Broken", plan);
        let result = tester.run_single_scenario(&scenario, 5, 2);
        assert!(!result.passed);
        assert_eq!(result.failures.len(), 2);
        assert!(result.failures[0].contains("always fails"));
        assert!(result.failures[0].contains("ignored 1"));
    }

    #[test]
    fn results_serialize_durations_as_millis() {
        let result = ScenarioResult {
            scenario_name: "x".to_string(),
            seed: 1,
            passed: true,
            iterations_run: 1,
            successful_iterations: 1,
            failures: Vec::new(),
            average_duration: Duration::from_millis(12),
            final_summary: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["average_duration"], 12);
    }
}
