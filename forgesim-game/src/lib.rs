//! Forgesim Enhancement Engine
//!
//! Platform-agnostic core logic for the Forgesim item enhancement simulator.
//! This crate provides the rate table, crafting, slot state machine and
//! session bookkeeping without UI or platform-specific dependencies.

pub mod action;
pub mod catalyst;
pub mod config;
pub mod constants;
pub mod craft;
pub mod enhance;
pub mod item;
pub mod rates;
pub mod report;
pub mod rng;
pub mod session;
pub mod state;
pub mod stats;

// Re-export commonly used types
pub use action::{
    Action, ActionOutcome, IgnoreReason, PayloadError, SlotAssignment, parse_transfer, reduce,
};
pub use catalyst::{CatalystStock, CatalystTier};
pub use config::{ConfigError, ForgeConfig, MaterialCost, Recipe};
pub use constants::{DESTROY_MIN_LEVEL, MAX_ITEM_LEVEL};
pub use craft::{CraftOutcome, craft_catalyst};
pub use enhance::{EnhanceOutcome, effective_success_pct, resolve_attempt, roll_outcome};
pub use item::{Item, ItemId, WeaponKind};
pub use rates::{ENHANCEMENT_RATES, RateRow, next_success_hint, rate_for_level};
pub use report::{
    SessionSummary, format_money, render_catalysts, render_inventory, render_ledger, render_stats,
};
pub use rng::{CountingRng, RandomSource, RngBundle, ScriptedRolls};
pub use session::{ActionRecord, ForgeSession};
pub use state::{EnhanceSlots, ForgeState};
pub use stats::{ResourceLedger, SessionStats, StonesUsed};

/// Trait for abstracting configuration loading.
/// Platform-specific implementations should provide this
pub trait ConfigLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the forge configuration from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be read or parsed.
    fn load_forge_config(&self) -> Result<ForgeConfig, Self::Error>;
}

/// Loader that always yields the built-in balance table.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinConfig;

impl ConfigLoader for BuiltinConfig {
    type Error = std::convert::Infallible;

    fn load_forge_config(&self) -> Result<ForgeConfig, Self::Error> {
        Ok(ForgeConfig::default_config())
    }
}

/// Main engine for creating simulation sessions
pub struct ForgeEngine<L>
where
    L: ConfigLoader,
{
    loader: L,
}

impl<L> ForgeEngine<L>
where
    L: ConfigLoader,
{
    /// Create a new engine with the provided configuration loader
    pub const fn new(loader: L) -> Self {
        Self { loader }
    }

    /// Create a new session with the specified seed
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded.
    pub fn create_session(&self, seed: u64) -> Result<ForgeSession, L::Error> {
        let cfg = self.loader.load_forge_config()?;
        Ok(ForgeSession::with_config(seed, cfg))
    }
}
