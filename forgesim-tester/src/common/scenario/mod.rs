pub mod catalog;

use forgesim_game::Action;

use crate::logic::plan::{ForgePlan, Strategy};
use catalog::{CATALOG, items_conserved, ledger_matches_recipes};

#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: ForgePlan,
}

impl TestScenario {
    pub fn new(name: impl Into<String>, plan: ForgePlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }

    /// Ad-hoc scenario that replays a parsed `--script`.
    pub fn scripted(actions: Vec<Action>) -> Self {
        Self::new(
            "Custom Script",
            ForgePlan::new(Strategy::Scripted(actions))
                .with_expectation(items_conserved)
                .with_expectation(ledger_matches_recipes),
        )
    }
}

pub fn get_scenario(key: &str) -> Option<TestScenario> {
    CATALOG
        .iter()
        .find(|entry| entry.key == key)
        .map(|entry| TestScenario::new(entry.name, (entry.build)()))
}

/// Scenario keys and one-line descriptions in catalog order.
pub fn list_scenarios() -> impl Iterator<Item = (&'static str, &'static str)> {
    CATALOG.iter().map(|entry| (entry.key, entry.description))
}

pub fn all_scenario_keys() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|entry| entry.key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::plan::run_plan;
    use crate::logic::{expand_steps, parse_script};
    use forgesim_game::ForgeConfig;

    fn evaluate_script(script: &str) -> anyhow::Result<()> {
        let steps = parse_script(script, 0)?;
        let scenario = TestScenario::scripted(expand_steps(&steps));
        let run = run_plan(&scenario.plan, &ForgeConfig::default_config(), 11);
        scenario
            .plan
            .expectations
            .iter()
            .try_for_each(|expectation| expectation.evaluate(&run))
    }

    #[test]
    fn every_listed_scenario_resolves() {
        for (key, description) in list_scenarios() {
            assert!(!description.is_empty());
            let scenario = get_scenario(key).unwrap();
            assert!(!scenario.plan.expectations.is_empty(), "{key} checks nothing");
        }
        assert!(get_scenario("missing").is_none());
        assert_eq!(all_scenario_keys().count(), list_scenarios().count());
    }

    #[test]
    fn scripted_scenario_wraps_actions() {
        let scenario = TestScenario::scripted(vec![Action::Reset]);
        assert_eq!(
            scenario.plan.strategy,
            Strategy::Scripted(vec![Action::Reset])
        );
    }

    #[test]
    fn scripts_that_reset_still_balance() {
        evaluate_script("buy:sword;reset").unwrap();
        evaluate_script("buy*2;craft:normal*3;reset;buy:fan;craft:normal;assign:1;stone:normal")
            .unwrap();
        evaluate_script("buy;assign:1;return;reset;reset").unwrap();
    }
}
