//! Enhancement stones and their per-tier stock.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::constants::{ADVANCED_SUCCESS_BONUS_PCT, SUPREME_SUCCESS_BONUS_PCT};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum CatalystTier {
    #[default]
    Normal,
    Advanced,
    Supreme,
}

impl CatalystTier {
    pub const ALL: [Self; 3] = [Self::Normal, Self::Advanced, Self::Supreme];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Advanced => "advanced",
            Self::Supreme => "supreme",
        }
    }

    /// Percentage points added to the base success chance.
    #[must_use]
    pub const fn success_bonus_pct(self) -> f64 {
        match self {
            Self::Normal => 0.0,
            Self::Advanced => ADVANCED_SUCCESS_BONUS_PCT,
            Self::Supreme => SUPREME_SUCCESS_BONUS_PCT,
        }
    }

    /// Short tooltip for the tier.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Normal => "basic enhancement stone",
            Self::Advanced => "success chance +5%",
            Self::Supreme => "success chance +10%",
        }
    }
}

impl fmt::Display for CatalystTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CatalystTier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "advanced" => Ok(Self::Advanced),
            "supreme" => Ok(Self::Supreme),
            _ => Err(()),
        }
    }
}

/// Stone counts keyed by tier. Tiers with no stones are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalystStock(BTreeMap<CatalystTier, u32>);

impl CatalystStock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn count(&self, tier: CatalystTier) -> u32 {
        self.0.get(&tier).copied().unwrap_or(0)
    }

    /// Returns true when at least one stone of `tier` is held.
    #[must_use]
    pub fn has(&self, tier: CatalystTier) -> bool {
        self.count(tier) > 0
    }

    /// Add `qty` stones of `tier`, returning the new count.
    pub fn add(&mut self, tier: CatalystTier, qty: u32) -> u32 {
        if qty == 0 {
            return self.count(tier);
        }
        let entry = self.0.entry(tier).or_insert(0);
        *entry = entry.saturating_add(qty);
        *entry
    }

    /// Remove one stone of `tier`. Returns false when none is held.
    pub fn take(&mut self, tier: CatalystTier) -> bool {
        let Some(count) = self.0.get_mut(&tier) else {
            return false;
        };
        *count = count.saturating_sub(1);
        if *count == 0 {
            self.0.remove(&tier);
        }
        true
    }

    /// Total stones across every tier.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.0.values().map(|&count| u64::from(count)).sum()
    }

    /// Iterate held tiers in tier order.
    pub fn iter(&self) -> impl Iterator<Item = (CatalystTier, u32)> + '_ {
        self.0.iter().map(|(&tier, &count)| (tier, count))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
