//! Enhancement probability table.
use serde::{Deserialize, Serialize};

use crate::constants::PERCENT_SCALE;

/// Probabilities governing one enhancement attempt at a given level.
///
/// `destroy_pct` and `degrade_pct` are conditional on the success roll
/// failing; whatever remains of the failure branch preserves the item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateRow {
    pub success_pct: f64,
    pub destroy_pct: f64,
    pub degrade_pct: f64,
}

impl RateRow {
    const fn new(success_pct: f64, destroy_pct: f64, degrade_pct: f64) -> Self {
        Self {
            success_pct,
            destroy_pct,
            degrade_pct,
        }
    }

    /// Share of the failure branch that leaves the item unchanged.
    #[must_use]
    pub fn preserve_pct(&self) -> f64 {
        (PERCENT_SCALE - self.destroy_pct - self.degrade_pct).max(0.0)
    }
}

/// Highest level with its own row; anything above reuses it.
pub const RATE_CEILING_LEVEL: u8 = 11;

/// Level-indexed rates. Row 11 repeats row 10.
pub const ENHANCEMENT_RATES: [RateRow; RATE_CEILING_LEVEL as usize + 1] = [
    RateRow::new(95.0, 0.0, 2.5),
    RateRow::new(85.0, 0.0, 7.5),
    RateRow::new(75.0, 0.0, 12.5),
    RateRow::new(65.0, 0.0, 17.5),
    RateRow::new(55.0, 0.0, 22.5),
    RateRow::new(45.0, 38.5, 16.5),
    RateRow::new(35.0, 45.5, 19.5),
    RateRow::new(25.0, 52.5, 22.5),
    RateRow::new(15.0, 59.5, 25.5),
    RateRow::new(10.0, 63.0, 27.0),
    RateRow::new(5.0, 66.5, 28.5),
    RateRow::new(5.0, 66.5, 28.5),
];

/// Look up the rate row for `level`, clamping to the ceiling row.
#[must_use]
pub fn rate_for_level(level: u8) -> RateRow {
    let index = usize::from(level.min(RATE_CEILING_LEVEL));
    ENHANCEMENT_RATES[index]
}

/// Short label describing the base success chance of the next attempt.
#[must_use]
pub fn next_success_hint(level: u8) -> String {
    format!("success chance: {}%", rate_for_level(level).success_pct)
}
