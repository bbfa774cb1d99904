//! Session statistics and the resource ledger.
//!
//! Both are accumulators: counters only grow, and `max_level` never drops.
use serde::{Deserialize, Serialize};

use crate::catalyst::CatalystTier;
use crate::config::MaterialCost;
use crate::enhance::EnhanceOutcome;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub total_attempts: u64,
    pub successes: u64,
    /// Degrade and preserve outcomes.
    pub failures: u64,
    pub destroys: u64,
    pub max_level: u8,
}

impl SessionStats {
    pub fn record_attempt(&mut self) {
        self.total_attempts = self.total_attempts.saturating_add(1);
    }

    pub fn record_outcome(&mut self, outcome: EnhanceOutcome) {
        match outcome {
            EnhanceOutcome::Success { to, .. } => {
                self.successes = self.successes.saturating_add(1);
                self.max_level = self.max_level.max(to);
            }
            EnhanceOutcome::Degrade { .. } | EnhanceOutcome::Preserve { .. } => {
                self.failures = self.failures.saturating_add(1);
            }
            EnhanceOutcome::Destroy { .. } => {
                self.destroys = self.destroys.saturating_add(1);
            }
        }
    }

    /// Share of attempts that succeeded, in percent.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate_pct(&self) -> f64 {
        if self.total_attempts == 0 {
            return 0.0;
        }
        self.successes as f64 / self.total_attempts as f64 * 100.0
    }
}

/// Per-tier count of stones consumed by enhancement attempts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StonesUsed {
    pub normal: u64,
    pub advanced: u64,
    pub supreme: u64,
}

impl StonesUsed {
    #[must_use]
    pub const fn get(&self, tier: CatalystTier) -> u64 {
        match tier {
            CatalystTier::Normal => self.normal,
            CatalystTier::Advanced => self.advanced,
            CatalystTier::Supreme => self.supreme,
        }
    }

    fn bump(&mut self, tier: CatalystTier) {
        let slot = match tier {
            CatalystTier::Normal => &mut self.normal,
            CatalystTier::Advanced => &mut self.advanced,
            CatalystTier::Supreme => &mut self.supreme,
        };
        *slot = slot.saturating_add(1);
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.normal + self.advanced + self.supreme
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLedger {
    pub stones_used: StonesUsed,
    pub iron: u64,
    pub black_iron: u64,
    pub special_iron: u64,
    pub lapis: u64,
    pub money: u64,
    /// Normal stones consumed as refining ingredients.
    pub ingredient_stones: u64,
    pub failed_crafts: u64,
}

impl ResourceLedger {
    pub fn charge_money(&mut self, amount: u64) {
        self.money = self.money.saturating_add(amount);
    }

    pub fn charge_materials(&mut self, cost: &MaterialCost) {
        self.iron = self.iron.saturating_add(u64::from(cost.iron));
        self.black_iron = self.black_iron.saturating_add(u64::from(cost.black_iron));
        self.special_iron = self
            .special_iron
            .saturating_add(u64::from(cost.special_iron));
        self.lapis = self.lapis.saturating_add(u64::from(cost.lapis));
    }

    pub fn record_stone_used(&mut self, tier: CatalystTier) {
        self.stones_used.bump(tier);
    }

    pub fn record_ingredient(&mut self) {
        self.ingredient_stones = self.ingredient_stones.saturating_add(1);
    }

    pub fn record_failed_craft(&mut self) {
        self.failed_crafts = self.failed_crafts.saturating_add(1);
    }
}
