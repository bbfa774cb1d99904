use anyhow::Result;
use forgesim_game::state::destroyed;
use forgesim_game::{
    Action, ActionOutcome, ActionRecord, CatalystTier, DESTROY_MIN_LEVEL, EnhanceOutcome,
    ForgeConfig, ForgeSession, ItemId, SessionSummary, SlotAssignment, WeaponKind,
};
use std::sync::Arc;

/// Crafts attempted per stone before a strategy gives up on its supply.
const CRAFT_RETRY_LIMIT: u32 = 64;
/// Safety bound for strategies that loop until a level is reached.
const LADDER_ATTEMPT_LIMIT: u32 = 500;

/// How a scenario drives a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Strategy {
    /// Push one weapon with normal stones until it breaks or the budget ends.
    Grind { attempts: u32 },
    /// Climb one weapon to `target` with normal stones, never risking it.
    SafeLadder { target: u8 },
    /// Refine a supreme stone for every attempt.
    SupremeOnly { attempts: u32 },
    /// Craft stones without enhancing anything.
    RefineEconomy {
        normal: u32,
        advanced: u32,
        supreme: u32,
    },
    /// Replay a fixed action list.
    Scripted(Vec<Action>),
}

impl Strategy {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Grind { .. } => "grind",
            Self::SafeLadder { .. } => "safe-ladder",
            Self::SupremeOnly { .. } => "supreme-only",
            Self::RefineEconomy { .. } => "refine-economy",
            Self::Scripted(_) => "script",
        }
    }
}

/// Assertion hook run after a plan completes.
type PlanExpectationFn = Arc<dyn Fn(&RunSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct PlanExpectation(PlanExpectationFn);

impl std::fmt::Debug for PlanExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanExpectation").finish()
    }
}

impl PlanExpectation {
    pub fn evaluate(&self, summary: &RunSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for PlanExpectation
where
    F: Fn(&RunSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

#[derive(Debug, Clone)]
pub struct ForgePlan {
    pub strategy: Strategy,
    pub expectations: Vec<PlanExpectation>,
}

impl ForgePlan {
    pub const fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<PlanExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Complete record of one plan run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub seed: u64,
    pub strategy: &'static str,
    pub config: ForgeConfig,
    pub summary: SessionSummary,
    pub history: Vec<ActionRecord>,
    pub items_held: usize,
    pub draws: (u64, u64),
}

impl RunSummary {
    fn capture(session: &ForgeSession, strategy: &'static str) -> Self {
        Self {
            seed: session.seed(),
            strategy,
            config: session.config().clone(),
            summary: session.summary(),
            history: session.history().to_vec(),
            items_held: session.state().item_count(),
            draws: session.draws(),
        }
    }

    /// Records dispatched after the last reset, which is everything the
    /// final state reflects.
    pub fn since_reset(&self) -> &[ActionRecord] {
        let start = self
            .history
            .iter()
            .rposition(|record| matches!(record.outcome, ActionOutcome::Reset))
            .map_or(0, |idx| idx + 1);
        &self.history[start..]
    }

    /// Purchases the final state still accounts for.
    pub fn purchases(&self) -> usize {
        self.since_reset()
            .iter()
            .filter(|record| matches!(record.outcome, ActionOutcome::Purchased { .. }))
            .count()
    }

    pub fn ignored(&self) -> usize {
        self.outcomes().filter(|outcome| outcome.is_ignored()).count()
    }

    /// Enhancement results in dispatch order.
    pub fn enhancements(&self) -> impl Iterator<Item = (CatalystTier, EnhanceOutcome)> + '_ {
        self.outcomes().filter_map(|outcome| match outcome {
            ActionOutcome::Enhanced { tier, outcome, .. } => Some((*tier, *outcome)),
            _ => None,
        })
    }

    pub fn outcomes(&self) -> impl Iterator<Item = &ActionOutcome> + '_ {
        self.history.iter().map(|record| &record.outcome)
    }
}

/// Run `plan` on a fresh session seeded with `seed`.
pub fn run_plan(plan: &ForgePlan, cfg: &ForgeConfig, seed: u64) -> RunSummary {
    let mut session = ForgeSession::with_config(seed, cfg.clone());
    match &plan.strategy {
        Strategy::Grind { attempts } => {
            push_until_lost(&mut session, WeaponKind::Sword, CatalystTier::Normal, *attempts);
        }
        Strategy::SafeLadder { target } => safe_ladder(&mut session, *target),
        Strategy::SupremeOnly { attempts } => {
            push_until_lost(&mut session, WeaponKind::Dagger, CatalystTier::Supreme, *attempts);
        }
        Strategy::RefineEconomy {
            normal,
            advanced,
            supreme,
        } => refine_economy(&mut session, *normal, *advanced, *supreme),
        Strategy::Scripted(actions) => {
            session.dispatch_all(actions.iter().copied());
        }
    }
    RunSummary::capture(&session, plan.strategy.label())
}

fn buy(session: &mut ForgeSession, kind: WeaponKind) -> Option<ItemId> {
    match session.dispatch(Action::PurchaseItem {
        kind,
        created_at_ms: 0,
    }) {
        ActionOutcome::Purchased { id } => Some(id),
        _ => None,
    }
}

/// Craft until at least one stone of `tier` is held.
fn ensure_stone(session: &mut ForgeSession, tier: CatalystTier) -> bool {
    for _ in 0..CRAFT_RETRY_LIMIT {
        if session.state().catalysts().has(tier) {
            return true;
        }
        if session.config().recipe(tier).requires_normal
            && !ensure_stone(session, CatalystTier::Normal)
        {
            return false;
        }
        session.dispatch(Action::CraftCatalyst { tier });
    }
    session.state().catalysts().has(tier)
}

/// One full slot cycle: assign, select, enhance, collect.
fn attempt(
    session: &mut ForgeSession,
    id: ItemId,
    tier: CatalystTier,
) -> Option<EnhanceOutcome> {
    if !ensure_stone(session, tier) {
        return None;
    }
    session.dispatch(Action::AssignSlot {
        assignment: SlotAssignment::Item(id),
    });
    session.dispatch(Action::AssignSlot {
        assignment: SlotAssignment::Catalyst(tier),
    });
    let outcome = session.dispatch(Action::Enhance);
    match outcome {
        ActionOutcome::Enhanced { outcome: result, .. } => {
            if !destroyed(&outcome) {
                session.dispatch(Action::CollectResult);
            }
            Some(result)
        }
        _ => {
            session.dispatch(Action::ReturnActive);
            None
        }
    }
}

/// Enhance one weapon with `tier` stones until it breaks or the budget ends.
fn push_until_lost(
    session: &mut ForgeSession,
    kind: WeaponKind,
    tier: CatalystTier,
    attempts: u32,
) {
    let Some(id) = buy(session, kind) else {
        return;
    };
    for _ in 0..attempts {
        match attempt(session, id, tier) {
            Some(EnhanceOutcome::Destroy { .. }) | None => break,
            Some(_) => {}
        }
    }
}

fn safe_ladder(session: &mut ForgeSession, target: u8) {
    let target = target.min(DESTROY_MIN_LEVEL);
    let Some(id) = buy(session, WeaponKind::Bow) else {
        return;
    };
    for _ in 0..LADDER_ATTEMPT_LIMIT {
        let level = session.state().find_item(id).map_or(0, |item| item.level);
        if level >= target || attempt(session, id, CatalystTier::Normal).is_none() {
            break;
        }
    }
}

fn refine_economy(session: &mut ForgeSession, normal: u32, advanced: u32, supreme: u32) {
    for _ in 0..normal {
        session.dispatch(Action::CraftCatalyst {
            tier: CatalystTier::Normal,
        });
    }
    for (tier, count) in [
        (CatalystTier::Advanced, advanced),
        (CatalystTier::Supreme, supreme),
    ] {
        for _ in 0..count {
            session.dispatch(Action::CraftCatalyst { tier });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ForgeConfig {
        ForgeConfig::default_config()
    }

    #[test]
    fn safe_ladder_reaches_target_without_losses() {
        let plan = ForgePlan::new(Strategy::SafeLadder { target: 5 });
        for seed in [1, 2, 3] {
            let run = run_plan(&plan, &cfg(), seed);
            assert_eq!(run.summary.stats.destroys, 0);
            assert_eq!(run.summary.best_held_level(), Some(5));
            assert_eq!(run.items_held, 1);
        }
    }

    #[test]
    fn ladder_target_is_capped_below_destruction() {
        let plan = ForgePlan::new(Strategy::SafeLadder { target: 9 });
        let run = run_plan(&plan, &cfg(), 4);
        assert_eq!(run.summary.best_held_level(), Some(DESTROY_MIN_LEVEL));
    }

    #[test]
    fn supreme_only_first_attempt_always_succeeds() {
        let plan = ForgePlan::new(Strategy::SupremeOnly { attempts: 3 });
        for seed in 0..8 {
            let run = run_plan(&plan, &cfg(), seed);
            let (tier, first) = run.enhancements().next().unwrap();
            assert_eq!(tier, CatalystTier::Supreme);
            assert!(first.is_success());
            assert_eq!(run.summary.ledger.stones_used.normal, 0);
        }
    }

    #[test]
    fn grind_stops_after_destruction() {
        let plan = ForgePlan::new(Strategy::Grind { attempts: 10_000 });
        let run = run_plan(&plan, &cfg(), 99);
        let last = run.enhancements().last().unwrap().1;
        assert!(matches!(last, EnhanceOutcome::Destroy { .. }));
        assert_eq!(run.items_held, 0);
        assert_eq!(run.purchases(), 1);
    }

    #[test]
    fn refine_economy_never_enhances() {
        let plan = ForgePlan::new(Strategy::RefineEconomy {
            normal: 5,
            advanced: 2,
            supreme: 2,
        });
        let run = run_plan(&plan, &cfg(), 7);
        assert_eq!(run.enhancements().count(), 0);
        assert_eq!(run.draws.0, 0);
        assert!(run.draws.1 >= 5);
    }

    #[test]
    fn scripted_plan_replays_actions() {
        let plan = ForgePlan::new(Strategy::Scripted(vec![Action::Enhance, Action::Reset]));
        let run = run_plan(&plan, &cfg(), 1);
        assert_eq!(run.history.len(), 2);
        assert_eq!(run.ignored(), 1);
        assert_eq!(run.strategy, "script");
    }
}
