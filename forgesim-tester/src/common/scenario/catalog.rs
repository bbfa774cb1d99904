use anyhow::{Result, ensure};
use forgesim_game::{Action, ActionOutcome, CatalystTier, DESTROY_MIN_LEVEL, ResourceLedger};

use crate::logic::plan::{ForgePlan, RunSummary, Strategy, run_plan};

pub struct CatalogEntry {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub build: fn() -> ForgePlan,
}

pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        key: "grind",
        name: "Normal Stone Grind",
        description: "Push a sword with normal stones until it breaks",
        build: grind_plan,
    },
    CatalogEntry {
        key: "safe-ladder",
        name: "Safe Ladder",
        description: "Climb a bow to +5 where failures can only degrade",
        build: safe_ladder_plan,
    },
    CatalogEntry {
        key: "supreme-only",
        name: "Supreme Only",
        description: "Refine a supreme stone for every attempt",
        build: supreme_only_plan,
    },
    CatalogEntry {
        key: "refine-economy",
        name: "Refining Economy",
        description: "Craft and refine stones, auditing the ledger",
        build: refine_economy_plan,
    },
];

const GRIND: Strategy = Strategy::Grind { attempts: 200 };

fn grind_plan() -> ForgePlan {
    ForgePlan::new(GRIND)
        .with_expectation(counters_balance)
        .with_expectation(items_conserved)
        .with_expectation(ledger_matches_recipes)
        .with_expectation(|run: &RunSummary| replays_identically(run, &GRIND))
}

fn safe_ladder_plan() -> ForgePlan {
    ForgePlan::new(Strategy::SafeLadder {
        target: DESTROY_MIN_LEVEL,
    })
    .with_expectation(counters_balance)
    .with_expectation(items_conserved)
    .with_expectation(|run: &RunSummary| {
        ensure!(
            run.summary.stats.destroys == 0,
            "{} destructions below +{DESTROY_MIN_LEVEL}",
            run.summary.stats.destroys
        );
        ensure!(
            run.summary.best_held_level() == Some(DESTROY_MIN_LEVEL),
            "ladder ended at {:?}",
            run.summary.best_held_level()
        );
        Ok(())
    })
}

fn supreme_only_plan() -> ForgePlan {
    ForgePlan::new(Strategy::SupremeOnly { attempts: 50 })
        .with_expectation(counters_balance)
        .with_expectation(items_conserved)
        .with_expectation(ledger_matches_recipes)
        .with_expectation(|run: &RunSummary| {
            let used = run.summary.ledger.stones_used;
            ensure!(
                used.normal == 0 && used.advanced == 0,
                "non-supreme stones used: {used:?}"
            );
            ensure!(
                run.summary.ledger.ingredient_stones >= used.supreme,
                "supreme stones used without refining"
            );
            let first = run.enhancements().next().map(|(_, outcome)| outcome);
            ensure!(
                first.is_some_and(|outcome| outcome.is_success()),
                "supreme attempt on +0 did not succeed: {first:?}"
            );
            Ok(())
        })
}

fn refine_economy_plan() -> ForgePlan {
    ForgePlan::new(Strategy::RefineEconomy {
        normal: 20,
        advanced: 5,
        supreme: 5,
    })
    .with_expectation(ledger_matches_recipes)
    .with_expectation(|run: &RunSummary| {
        let blocked = run
            .outcomes()
            .filter(|outcome| outcome.is_ignored())
            .count();
        let refined = run.summary.ledger.ingredient_stones;
        ensure!(
            usize::try_from(refined).unwrap_or(usize::MAX) + blocked == 10,
            "{refined} refinements and {blocked} blocked crafts do not cover 10 requests"
        );
        ensure!(run.draws.0 == 0, "crafting drew from the enhance stream");
        Ok(())
    })
}

/// Attempt counters add up and every attempt consumed exactly one stone.
pub fn counters_balance(run: &RunSummary) -> Result<()> {
    let stats = run.summary.stats;
    ensure!(
        stats.successes + stats.failures + stats.destroys == stats.total_attempts,
        "outcome counters {stats:?} do not sum to attempts"
    );
    ensure!(
        run.summary.ledger.stones_used.total() == stats.total_attempts,
        "{} stones used for {} attempts",
        run.summary.ledger.stones_used.total(),
        stats.total_attempts
    );
    Ok(())
}

/// Purchases minus destructions since the last reset equals items still held.
pub fn items_conserved(run: &RunSummary) -> Result<()> {
    let destroys = usize::try_from(run.summary.stats.destroys).unwrap_or(usize::MAX);
    let expected = run.purchases().saturating_sub(destroys);
    ensure!(
        run.items_held == expected,
        "{} items held, expected {expected}",
        run.items_held
    );
    Ok(())
}

/// Every charged craft and purchase since the last reset appears in the
/// ledger at recipe cost.
pub fn ledger_matches_recipes(run: &RunSummary) -> Result<()> {
    let mut expected = ResourceLedger::default();
    for record in run.since_reset() {
        match (record.action, record.outcome) {
            (Action::PurchaseItem { .. }, ActionOutcome::Purchased { .. }) => {
                expected.charge_money(run.config.purchase_price);
            }
            (Action::CraftCatalyst { tier }, outcome) if !outcome.is_ignored() => {
                let recipe = run.config.recipe(tier);
                expected.charge_materials(&recipe.materials);
                expected.charge_money(recipe.money);
                if recipe.requires_normal {
                    expected.record_ingredient();
                }
                if matches!(outcome, ActionOutcome::CraftFailed { .. }) {
                    expected.record_failed_craft();
                }
            }
            (_, ActionOutcome::Enhanced { tier, .. }) => expected.record_stone_used(tier),
            _ => {}
        }
    }
    ensure!(
        expected == run.summary.ledger,
        "ledger {:?} differs from recipe costs {expected:?}",
        run.summary.ledger
    );
    Ok(())
}

/// The same seed and configuration reproduce the same session.
fn replays_identically(run: &RunSummary, strategy: &Strategy) -> Result<()> {
    let again = run_plan(&ForgePlan::new(strategy.clone()), &run.config, run.seed);
    ensure!(
        again.summary == run.summary && again.draws == run.draws,
        "seed {} diverged on replay",
        run.seed
    );
    Ok(())
}
