//! Centralized balance and tuning constants for Forgesim logic.
//!
//! These values define the deterministic math for the enhancement engine.
//! Keeping them together ensures that balance can only be adjusted via
//! code changes reviewed in version control. Crafting costs have JSON
//! overrides through [`crate::config::ForgeConfig`]; the rate table does not.

// Logging targets ----------------------------------------------------------
pub(crate) const LOG_TARGET_ENHANCE: &str = "forgesim::enhance";
pub(crate) const LOG_TARGET_CRAFT: &str = "forgesim::craft";
pub(crate) const LOG_TARGET_SLOTS: &str = "forgesim::slots";

// Item levels --------------------------------------------------------------
/// Highest level an item can reach; attempts at this level are ignored.
pub const MAX_ITEM_LEVEL: u8 = 12;
/// Items at or above this level can be destroyed by a failed attempt.
pub const DESTROY_MIN_LEVEL: u8 = 5;

// Catalyst bonuses (percentage points) -------------------------------------
pub(crate) const ADVANCED_SUCCESS_BONUS_PCT: f64 = 5.0;
pub(crate) const SUPREME_SUCCESS_BONUS_PCT: f64 = 10.0;

// Roll scale ---------------------------------------------------------------
pub(crate) const PERCENT_SCALE: f64 = 100.0;

// Purchase -----------------------------------------------------------------
pub(crate) const ITEM_PURCHASE_PRICE: u64 = 1_000;

// Crafting -----------------------------------------------------------------
pub(crate) const NORMAL_STONE_IRON: u32 = 3;
pub(crate) const NORMAL_STONE_BLACK_IRON: u32 = 1;
pub(crate) const NORMAL_STONE_SPECIAL_IRON: u32 = 1;
pub(crate) const NORMAL_STONE_LAPIS: u32 = 5;
pub(crate) const NORMAL_STONE_MONEY: u64 = 5_000;
pub(crate) const NORMAL_STONE_SUCCESS: f64 = 0.8;
pub(crate) const ADVANCED_STONE_MONEY: u64 = 10_000;
pub(crate) const SUPREME_STONE_MONEY: u64 = 20_000;
pub(crate) const REFINED_STONE_SUCCESS: f64 = 1.0;
