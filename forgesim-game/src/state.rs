//! Session state and the slot state machine.
//!
//! An item lives in exactly one place at a time: the inventory, the active
//! slot, or the pending-result slot. Every transition below moves items
//! between those places and never copies them.
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::action::{ActionOutcome, IgnoreReason};
use crate::catalyst::{CatalystStock, CatalystTier};
use crate::config::ForgeConfig;
use crate::constants::{LOG_TARGET_ENHANCE, LOG_TARGET_SLOTS};
use crate::enhance::{EnhanceOutcome, resolve_attempt};
use crate::item::{Item, ItemId, WeaponKind};
use crate::rng::RandomSource;
use crate::stats::{ResourceLedger, SessionStats};

/// The three enhancement slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnhanceSlots {
    pub active: Option<Item>,
    /// Tier selected for the next attempt; holds no stone itself.
    pub catalyst: Option<CatalystTier>,
    pub result: Option<Item>,
}

impl EnhanceSlots {
    /// Whether an attempt has every slot it needs.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.active.is_some() && self.catalyst.is_some() && self.result.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForgeState {
    pub(crate) inventory: Vec<Item>,
    pub(crate) catalysts: CatalystStock,
    pub(crate) slots: EnhanceSlots,
    pub(crate) stats: SessionStats,
    pub(crate) ledger: ResourceLedger,
    pub(crate) next_item_seq: u64,
}

impl ForgeState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn inventory(&self) -> &[Item] {
        &self.inventory
    }

    #[must_use]
    pub const fn catalysts(&self) -> &CatalystStock {
        &self.catalysts
    }

    #[must_use]
    pub const fn slots(&self) -> &EnhanceSlots {
        &self.slots
    }

    #[must_use]
    pub const fn stats(&self) -> &SessionStats {
        &self.stats
    }

    #[must_use]
    pub const fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    /// Find an item in the inventory or either item slot.
    #[must_use]
    pub fn find_item(&self, id: ItemId) -> Option<&Item> {
        self.inventory
            .iter()
            .chain(self.slots.active.iter())
            .chain(self.slots.result.iter())
            .find(|item| item.id == id)
    }

    /// Items held anywhere in the session.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.inventory.len()
            + usize::from(self.slots.active.is_some())
            + usize::from(self.slots.result.is_some())
    }

    /// Buy a fresh level-0 weapon and append it to the inventory.
    pub fn purchase(
        &mut self,
        kind: WeaponKind,
        created_at_ms: u64,
        cfg: &ForgeConfig,
    ) -> ActionOutcome {
        self.next_item_seq = self.next_item_seq.saturating_add(1);
        let id = ItemId(self.next_item_seq);
        self.inventory.push(Item::new(id, kind, created_at_ms));
        self.ledger.charge_money(cfg.purchase_price);
        ActionOutcome::Purchased { id }
    }

    /// Move an inventory item into the active slot, returning any item
    /// already there to the end of the inventory.
    pub fn assign_item(&mut self, id: ItemId) -> ActionOutcome {
        let Some(index) = self.inventory.iter().position(|item| item.id == id) else {
            return ignored(IgnoreReason::UnknownItem(id));
        };
        let item = self.inventory.remove(index);
        let returned = self.slots.active.replace(item);
        let returned_id = returned.as_ref().map(|prev| prev.id);
        if let Some(prev) = returned {
            self.inventory.push(prev);
        }
        debug!(target: LOG_TARGET_SLOTS, "item {id} assigned to active slot");
        ActionOutcome::ItemAssigned {
            id,
            returned: returned_id,
        }
    }

    /// Assign `id` only when the held item is a `kind`.
    pub fn assign_item_of_kind(&mut self, id: ItemId, kind: WeaponKind) -> ActionOutcome {
        match self.inventory.iter().find(|item| item.id == id) {
            None => ignored(IgnoreReason::UnknownItem(id)),
            Some(item) if item.kind != kind => ignored(IgnoreReason::KindMismatch { id, kind }),
            Some(_) => self.assign_item(id),
        }
    }

    /// Select the catalyst tier for the next attempt.
    pub fn assign_catalyst(&mut self, tier: CatalystTier) -> ActionOutcome {
        if self.slots.active.is_none() {
            return ignored(IgnoreReason::NoActiveItem);
        }
        if !self.catalysts.has(tier) {
            return ignored(IgnoreReason::CatalystUnavailable(tier));
        }
        self.slots.catalyst = Some(tier);
        debug!(target: LOG_TARGET_SLOTS, "{tier} catalyst selected");
        ActionOutcome::CatalystAssigned { tier }
    }

    /// Send the active item back to the inventory without an attempt.
    pub fn return_active(&mut self) -> ActionOutcome {
        let Some(item) = self.slots.active.take() else {
            return ignored(IgnoreReason::NoActiveItem);
        };
        let id = item.id;
        self.inventory.push(item);
        self.slots.catalyst = None;
        ActionOutcome::Returned { id }
    }

    /// Move the pending result into the inventory and clear the slots.
    pub fn collect_result(&mut self) -> ActionOutcome {
        let Some(item) = self.slots.result.take() else {
            return ignored(IgnoreReason::NothingToCollect);
        };
        let id = item.id;
        self.inventory.push(item);
        if let Some(active) = self.slots.active.take() {
            self.inventory.push(active);
        }
        self.slots.catalyst = None;
        ActionOutcome::Collected { id }
    }

    /// Attempt to enhance the active item with the selected catalyst.
    pub fn attempt_enhance<R>(&mut self, rng: &mut R) -> ActionOutcome
    where
        R: RandomSource + ?Sized,
    {
        let tier = match self.ready_catalyst() {
            Ok(tier) => tier,
            Err(reason) => return ignored(reason),
        };
        let Some(item) = self.slots.active.take() else {
            return ignored(IgnoreReason::NoActiveItem);
        };

        self.catalysts.take(tier);
        self.stats.record_attempt();

        let outcome = resolve_attempt(item.level, tier, rng);
        self.stats.record_outcome(outcome);
        let id = item.id;
        match outcome.resulting_level() {
            Some(level) => {
                self.slots.result = Some(Item { level, ..item });
                debug!(
                    target: LOG_TARGET_ENHANCE,
                    "{} with {tier} -> {}",
                    item.handle(),
                    outcome.label()
                );
            }
            None => {
                self.slots = EnhanceSlots::default();
                info!(
                    target: LOG_TARGET_ENHANCE,
                    "{} destroyed at +{}",
                    item.handle(),
                    item.level
                );
            }
        }
        self.ledger.record_stone_used(tier);

        ActionOutcome::Enhanced { id, tier, outcome }
    }

    /// Tier for the next attempt, once every precondition holds.
    fn ready_catalyst(&self) -> Result<CatalystTier, IgnoreReason> {
        let Some(item) = self.slots.active.as_ref() else {
            return Err(IgnoreReason::NoActiveItem);
        };
        let Some(tier) = self.slots.catalyst else {
            return Err(IgnoreReason::NoCatalystSelected);
        };
        if self.slots.result.is_some() {
            return Err(IgnoreReason::ResultPending);
        }
        if item.is_max_level() {
            return Err(IgnoreReason::MaxLevel);
        }
        if !self.catalysts.has(tier) {
            return Err(IgnoreReason::CatalystUnavailable(tier));
        }
        Ok(tier)
    }

    /// Return the session to its empty starting point.
    pub fn reset(&mut self) -> ActionOutcome {
        *self = Self::default();
        ActionOutcome::Reset
    }
}

/// Whether `outcome` removed the item for good.
#[must_use]
pub const fn destroyed(outcome: &ActionOutcome) -> bool {
    matches!(
        outcome,
        ActionOutcome::Enhanced {
            outcome: EnhanceOutcome::Destroy { .. },
            ..
        }
    )
}

fn ignored(reason: IgnoreReason) -> ActionOutcome {
    debug!(target: LOG_TARGET_SLOTS, "action ignored: {reason}");
    ActionOutcome::Ignored(reason)
}
