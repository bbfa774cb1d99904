//! A seeded session that owns state, configuration and an action history.
use log::warn;
use serde::{Deserialize, Serialize};

use crate::action::{Action, ActionOutcome, IgnoreReason, parse_transfer};
use crate::constants::LOG_TARGET_SLOTS;
use crate::config::ForgeConfig;
use crate::report::SessionSummary;
use crate::rng::RngBundle;
use crate::state::ForgeState;

/// One dispatched action and its outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub step: u32,
    pub action: Action,
    pub outcome: ActionOutcome,
}

/// Session wrapper binding state, configuration and seeded randomness.
#[derive(Debug, Clone)]
pub struct ForgeSession {
    state: ForgeState,
    cfg: ForgeConfig,
    rng: RngBundle,
    seed: u64,
    history: Vec<ActionRecord>,
}

impl ForgeSession {
    /// Construct a fresh session with the default configuration.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, ForgeConfig::default_config())
    }

    #[must_use]
    pub fn with_config(seed: u64, cfg: ForgeConfig) -> Self {
        Self {
            state: ForgeState::new(),
            cfg,
            rng: RngBundle::from_user_seed(seed),
            seed,
            history: Vec::new(),
        }
    }

    /// Apply an action, routing craft rolls and enhancement rolls to their
    /// own streams so one kind of action never shifts the other's draws.
    pub fn dispatch(&mut self, action: Action) -> ActionOutcome {
        let outcome = match action {
            Action::CraftCatalyst { .. } => {
                self.state.apply(&action, &self.cfg, self.rng.craft())
            }
            _ => self.state.apply(&action, &self.cfg, self.rng.enhance()),
        };
        let step = u32::try_from(self.history.len()).unwrap_or(u32::MAX);
        self.history.push(ActionRecord {
            step,
            action,
            outcome,
        });
        outcome
    }

    /// Dispatch every action in order, returning their outcomes.
    pub fn dispatch_all(
        &mut self,
        actions: impl IntoIterator<Item = Action>,
    ) -> Vec<ActionOutcome> {
        actions
            .into_iter()
            .map(|action| self.dispatch(action))
            .collect()
    }

    /// Decode a transfer payload and dispatch it as an assignment.
    ///
    /// Malformed payloads are logged and never reach the history.
    pub fn transfer(&mut self, payload: &str) -> ActionOutcome {
        match parse_transfer(payload) {
            Ok(assignment) => self.dispatch(Action::AssignSlot { assignment }),
            Err(err) => {
                warn!(target: LOG_TARGET_SLOTS, "dropping transfer payload: {err}");
                ActionOutcome::Ignored(IgnoreReason::MalformedPayload)
            }
        }
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub const fn state(&self) -> &ForgeState {
        &self.state
    }

    #[must_use]
    pub const fn config(&self) -> &ForgeConfig {
        &self.cfg
    }

    #[must_use]
    pub fn history(&self) -> &[ActionRecord] {
        &self.history
    }

    /// Draw counts `(enhance, craft)` made so far.
    #[must_use]
    pub const fn draws(&self) -> (u64, u64) {
        self.rng.draws()
    }

    #[must_use]
    pub fn summary(&self) -> SessionSummary {
        SessionSummary::capture(&self.state)
    }
}
