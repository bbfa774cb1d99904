//! Plain-text rendering of session statistics and the resource ledger.
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use crate::catalyst::{CatalystStock, CatalystTier};
use crate::item::Item;
use crate::rates::next_success_hint;
use crate::state::ForgeState;
use crate::stats::{ResourceLedger, SessionStats};

/// Serializable snapshot of everything a session displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub stats: SessionStats,
    pub ledger: ResourceLedger,
    pub inventory: Vec<Item>,
    pub catalysts: CatalystStock,
    pub pending_result: Option<Item>,
}

impl SessionSummary {
    #[must_use]
    pub fn capture(state: &ForgeState) -> Self {
        Self {
            stats: *state.stats(),
            ledger: *state.ledger(),
            inventory: state.inventory().to_vec(),
            catalysts: state.catalysts().clone(),
            pending_result: state.slots().result.clone(),
        }
    }

    /// Highest level among items still held.
    #[must_use]
    pub fn best_held_level(&self) -> Option<u8> {
        self.inventory
            .iter()
            .chain(self.pending_result.iter())
            .map(|item| item.level)
            .max()
    }
}

/// Format an amount with comma thousands separators.
#[must_use]
pub fn format_money(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[must_use]
pub fn render_stats(stats: &SessionStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Attempts: {}", stats.total_attempts);
    let _ = writeln!(out, "Successes: {}", stats.successes);
    let _ = writeln!(out, "Failures: {}", stats.failures);
    let _ = writeln!(out, "Destroyed: {}", stats.destroys);
    let _ = writeln!(out, "Best level: +{}", stats.max_level);
    out
}

#[must_use]
pub fn render_ledger(ledger: &ResourceLedger) -> String {
    let mut out = String::new();
    for tier in CatalystTier::ALL {
        let _ = writeln!(
            out,
            "{tier} stones used: {}",
            ledger.stones_used.get(tier)
        );
    }
    let _ = writeln!(out, "Materials spent:");
    let _ = writeln!(out, "  iron: {}", ledger.iron);
    let _ = writeln!(out, "  black iron: {}", ledger.black_iron);
    let _ = writeln!(out, "  special iron: {}", ledger.special_iron);
    let _ = writeln!(out, "  lapis: {}", ledger.lapis);
    let _ = writeln!(out, "Refining ingredients: {}", ledger.ingredient_stones);
    let _ = writeln!(out, "Failed crafts: {}", ledger.failed_crafts);
    let _ = writeln!(out, "Money spent: {}", format_money(ledger.money));
    out
}

/// One line per held tier with its tooltip.
#[must_use]
pub fn render_catalysts(stock: &CatalystStock) -> String {
    let mut out = String::new();
    for (tier, count) in stock.iter() {
        let _ = writeln!(out, "{tier} x{count} ({})", tier.description());
    }
    out
}

/// One line per held item, with the next attempt's base chance.
#[must_use]
pub fn render_inventory(items: &[Item]) -> String {
    let mut out = String::new();
    for item in items {
        let _ = write!(out, "{} [{}]", item.label(), item.handle());
        if item.is_max_level() {
            out.push_str(" max level");
        } else {
            let _ = write!(out, " {}", next_success_hint(item.level));
        }
        out.push('\n');
    }
    out
}
