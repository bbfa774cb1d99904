//! Enhancement roll resolution.
//!
//! The success roll is compared against the base rate plus the catalyst
//! bonus. Only when it misses is a second roll drawn, and that roll is
//! compared against the unbonused destroy and degrade shares of the row.
use serde::{Deserialize, Serialize};

use crate::catalyst::CatalystTier;
use crate::constants::{DESTROY_MIN_LEVEL, PERCENT_SCALE};
use crate::rates::rate_for_level;
use crate::rng::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnhanceOutcome {
    Success { from: u8, to: u8 },
    Degrade { from: u8, to: u8 },
    Preserve { level: u8 },
    Destroy { level: u8 },
}

impl EnhanceOutcome {
    /// Level the item ends at, or `None` when it was destroyed.
    #[must_use]
    pub const fn resulting_level(self) -> Option<u8> {
        match self {
            Self::Success { to, .. } | Self::Degrade { to, .. } => Some(to),
            Self::Preserve { level } => Some(level),
            Self::Destroy { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success { .. })
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::Degrade { .. } => "degrade",
            Self::Preserve { .. } => "preserve",
            Self::Destroy { .. } => "destroy",
        }
    }
}

/// Success threshold in percent after the catalyst bonus. May exceed 100.
#[must_use]
pub fn effective_success_pct(level: u8, tier: CatalystTier) -> f64 {
    rate_for_level(level).success_pct + tier.success_bonus_pct()
}

/// Decide an outcome from explicit rolls, each in `[0, 100)`.
///
/// `failure_roll` is consulted only when the success roll misses.
#[must_use]
pub fn roll_outcome(
    level: u8,
    tier: CatalystTier,
    success_roll: f64,
    failure_roll: f64,
) -> EnhanceOutcome {
    decide(level, tier, success_roll, || failure_roll)
}

/// Resolve one attempt, drawing the failure roll only when it is needed.
pub fn resolve_attempt<R>(level: u8, tier: CatalystTier, rng: &mut R) -> EnhanceOutcome
where
    R: RandomSource + ?Sized,
{
    let success_roll = rng.next_unit() * PERCENT_SCALE;
    decide(level, tier, success_roll, || rng.next_unit() * PERCENT_SCALE)
}

fn decide(
    level: u8,
    tier: CatalystTier,
    success_roll: f64,
    failure_roll: impl FnOnce() -> f64,
) -> EnhanceOutcome {
    if success_roll < effective_success_pct(level, tier) {
        return EnhanceOutcome::Success {
            from: level,
            to: level.saturating_add(1),
        };
    }

    let rates = rate_for_level(level);
    let roll = failure_roll();
    if level >= DESTROY_MIN_LEVEL && roll < rates.destroy_pct {
        EnhanceOutcome::Destroy { level }
    } else if roll < rates.destroy_pct + rates.degrade_pct {
        EnhanceOutcome::Degrade {
            from: level,
            to: level.saturating_sub(1),
        }
    } else {
        EnhanceOutcome::Preserve { level }
    }
}
