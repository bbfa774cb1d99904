//! Commands accepted by the simulation and the reducer that applies them.
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::catalyst::CatalystTier;
use crate::config::ForgeConfig;
use crate::constants::LOG_TARGET_SLOTS;
use crate::craft::{CraftOutcome, craft_catalyst};
use crate::enhance::EnhanceOutcome;
use crate::item::{ItemId, WeaponKind};
use crate::rng::RandomSource;
use crate::state::ForgeState;

/// What an assignment places into the enhancement slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotAssignment {
    Item(ItemId),
    /// An item named by handle. Only an item of the same kind matches.
    Handle { id: ItemId, kind: WeaponKind },
    Catalyst(CatalystTier),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    PurchaseItem {
        kind: WeaponKind,
        created_at_ms: u64,
    },
    CraftCatalyst {
        tier: CatalystTier,
    },
    AssignSlot {
        assignment: SlotAssignment,
    },
    Enhance,
    CollectResult,
    ReturnActive,
    Reset,
}

impl Action {
    /// Whether resolving this action can draw from a random source.
    #[must_use]
    pub const fn draws_randomness(&self) -> bool {
        matches!(self, Self::CraftCatalyst { .. } | Self::Enhance)
    }
}

/// Why an action left the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoreReason {
    NoActiveItem,
    NoCatalystSelected,
    CatalystUnavailable(CatalystTier),
    MissingNormalStone(CatalystTier),
    ResultPending,
    MaxLevel,
    UnknownItem(ItemId),
    KindMismatch { id: ItemId, kind: WeaponKind },
    NothingToCollect,
    MalformedPayload,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoActiveItem => f.write_str("no item in the active slot"),
            Self::NoCatalystSelected => f.write_str("no catalyst selected"),
            Self::CatalystUnavailable(tier) => write!(f, "no {tier} stones left"),
            Self::MissingNormalStone(tier) => {
                write!(f, "crafting {tier} needs a normal stone")
            }
            Self::ResultPending => f.write_str("collect the pending result first"),
            Self::MaxLevel => f.write_str("item is already at max level"),
            Self::UnknownItem(id) => write!(f, "item {id} is not in the inventory"),
            Self::KindMismatch { id, kind } => write!(f, "item {id} is not a {kind}"),
            Self::NothingToCollect => f.write_str("no pending result"),
            Self::MalformedPayload => f.write_str("malformed transfer payload"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    Purchased {
        id: ItemId,
    },
    Crafted {
        tier: CatalystTier,
        count: u32,
    },
    CraftFailed {
        tier: CatalystTier,
    },
    ItemAssigned {
        id: ItemId,
        returned: Option<ItemId>,
    },
    CatalystAssigned {
        tier: CatalystTier,
    },
    Enhanced {
        id: ItemId,
        tier: CatalystTier,
        outcome: EnhanceOutcome,
    },
    Collected {
        id: ItemId,
    },
    Returned {
        id: ItemId,
    },
    Reset,
    Ignored(IgnoreReason),
}

impl ActionOutcome {
    #[must_use]
    pub const fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored(_))
    }
}

impl From<CraftOutcome> for ActionOutcome {
    fn from(value: CraftOutcome) -> Self {
        match value {
            CraftOutcome::Crafted { tier, count } => Self::Crafted { tier, count },
            CraftOutcome::Failed { tier } => Self::CraftFailed { tier },
            CraftOutcome::Blocked { tier } => {
                Self::Ignored(IgnoreReason::MissingNormalStone(tier))
            }
        }
    }
}

impl ForgeState {
    /// Apply one action in place.
    pub fn apply<R>(&mut self, action: &Action, cfg: &ForgeConfig, rng: &mut R) -> ActionOutcome
    where
        R: RandomSource + ?Sized,
    {
        match *action {
            Action::PurchaseItem {
                kind,
                created_at_ms,
            } => self.purchase(kind, created_at_ms, cfg),
            Action::CraftCatalyst { tier } => craft_catalyst(self, cfg, tier, rng).into(),
            Action::AssignSlot { assignment } => self.assign(assignment),
            Action::Enhance => self.attempt_enhance(rng),
            Action::CollectResult => self.collect_result(),
            Action::ReturnActive => self.return_active(),
            Action::Reset => self.reset(),
        }
    }

    pub fn assign(&mut self, assignment: SlotAssignment) -> ActionOutcome {
        match assignment {
            SlotAssignment::Item(id) => self.assign_item(id),
            SlotAssignment::Handle { id, kind } => self.assign_item_of_kind(id, kind),
            SlotAssignment::Catalyst(tier) => self.assign_catalyst(tier),
        }
    }

    /// Apply a serialized transfer from an input layer.
    ///
    /// Malformed payloads are logged and leave the state untouched.
    pub fn apply_transfer(&mut self, payload: &str) -> ActionOutcome {
        match parse_transfer(payload) {
            Ok(assignment) => self.assign(assignment),
            Err(err) => {
                warn!(target: LOG_TARGET_SLOTS, "dropping transfer payload: {err}");
                ActionOutcome::Ignored(IgnoreReason::MalformedPayload)
            }
        }
    }
}

/// Apply `action` to `state`, returning the next state and what happened.
#[must_use]
pub fn reduce<R>(
    mut state: ForgeState,
    action: &Action,
    cfg: &ForgeConfig,
    rng: &mut R,
) -> (ForgeState, ActionOutcome)
where
    R: RandomSource + ?Sized,
{
    let outcome = state.apply(action, cfg, rng);
    (state, outcome)
}

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("transfer payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown catalyst tier `{0}`")]
    UnknownTier(String),
    #[error("unrecognized item reference `{0}`")]
    BadItemRef(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ItemRef {
    Id(u64),
    Handle(String),
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum TransferPayload {
    Item(ItemRef),
    Catalyst(String),
}

/// Decode a transfer payload such as `{"item": 3}`, `{"item": "bow_3"}`
/// or `{"catalyst": "supreme"}`.
///
/// # Errors
///
/// Returns an error when the payload is not JSON, names an unknown tier,
/// or carries an item reference that is neither a number nor a handle.
pub fn parse_transfer(payload: &str) -> Result<SlotAssignment, PayloadError> {
    match serde_json::from_str::<TransferPayload>(payload)? {
        TransferPayload::Item(ItemRef::Id(raw)) => Ok(SlotAssignment::Item(ItemId(raw))),
        TransferPayload::Item(ItemRef::Handle(handle)) => parse_handle(&handle)
            .map(|(kind, id)| SlotAssignment::Handle { id, kind })
            .ok_or(PayloadError::BadItemRef(handle)),
        TransferPayload::Catalyst(raw) => raw
            .parse::<CatalystTier>()
            .map(SlotAssignment::Catalyst)
            .map_err(|()| PayloadError::UnknownTier(raw)),
    }
}

fn parse_handle(handle: &str) -> Option<(WeaponKind, ItemId)> {
    let (kind, seq) = handle.rsplit_once('_')?;
    let kind = kind.parse::<WeaponKind>().ok()?;
    seq.parse::<u64>().ok().map(|raw| (kind, ItemId(raw)))
}
