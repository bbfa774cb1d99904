//! Stone crafting.
use log::debug;
use serde::{Deserialize, Serialize};

use crate::catalyst::CatalystTier;
use crate::config::ForgeConfig;
use crate::constants::LOG_TARGET_CRAFT;
use crate::rng::RandomSource;
use crate::state::ForgeState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CraftOutcome {
    /// A stone was produced; `count` is the new stock for the tier.
    Crafted { tier: CatalystTier, count: u32 },
    /// Costs were charged but no stone came out.
    Failed { tier: CatalystTier },
    /// The recipe needs a normal stone and none is held. Nothing charged.
    Blocked { tier: CatalystTier },
}

/// Craft one stone of `tier`, charging its recipe to the ledger.
///
/// Recipes with a success chance below one draw a single roll in `[0, 1)`
/// and succeed when it is at most the chance. Certain recipes draw nothing.
pub fn craft_catalyst<R>(
    state: &mut ForgeState,
    cfg: &ForgeConfig,
    tier: CatalystTier,
    rng: &mut R,
) -> CraftOutcome
where
    R: RandomSource + ?Sized,
{
    let recipe = cfg.recipe(tier);
    if recipe.requires_normal && !state.catalysts.has(CatalystTier::Normal) {
        debug!(target: LOG_TARGET_CRAFT, "{tier} craft blocked: no normal stone");
        return CraftOutcome::Blocked { tier };
    }

    state.ledger.charge_materials(&recipe.materials);
    state.ledger.charge_money(recipe.money);
    if recipe.requires_normal {
        state.catalysts.take(CatalystTier::Normal);
        state.ledger.record_ingredient();
    }

    let succeeded = recipe.always_succeeds() || rng.next_unit() <= recipe.success_chance;
    if succeeded {
        let count = state.catalysts.add(tier, 1);
        debug!(target: LOG_TARGET_CRAFT, "crafted {tier} stone ({count} held)");
        CraftOutcome::Crafted { tier, count }
    } else {
        state.ledger.record_failed_craft();
        debug!(target: LOG_TARGET_CRAFT, "{tier} craft failed");
        CraftOutcome::Failed { tier }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRolls;

    #[test]
    fn normal_craft_success_charges_full_recipe() {
        let cfg = ForgeConfig::default_config();
        let mut state = ForgeState::new();
        let mut rolls = ScriptedRolls::new([0.5]);
        let outcome = craft_catalyst(&mut state, &cfg, CatalystTier::Normal, &mut rolls);
        assert_eq!(
            outcome,
            CraftOutcome::Crafted {
                tier: CatalystTier::Normal,
                count: 1
            }
        );
        let ledger = state.ledger();
        assert_eq!(
            (ledger.iron, ledger.black_iron, ledger.special_iron, ledger.lapis),
            (3, 1, 1, 5)
        );
        assert_eq!(ledger.money, 5_000);
        assert_eq!(ledger.failed_crafts, 0);
    }

    #[test]
    fn normal_craft_threshold_is_inclusive() {
        let cfg = ForgeConfig::default_config();
        let mut state = ForgeState::new();
        let mut rolls = ScriptedRolls::new([0.8]);
        let outcome = craft_catalyst(&mut state, &cfg, CatalystTier::Normal, &mut rolls);
        assert!(matches!(outcome, CraftOutcome::Crafted { .. }));
    }

    #[test]
    fn failed_normal_craft_still_charges() {
        let cfg = ForgeConfig::default_config();
        let mut state = ForgeState::new();
        let mut rolls = ScriptedRolls::new([0.95]);
        let outcome = craft_catalyst(&mut state, &cfg, CatalystTier::Normal, &mut rolls);
        assert_eq!(
            outcome,
            CraftOutcome::Failed {
                tier: CatalystTier::Normal
            }
        );
        assert!(state.catalysts().is_empty());
        assert_eq!(state.ledger().failed_crafts, 1);
        assert_eq!(state.ledger().money, 5_000);
        assert_eq!(state.ledger().lapis, 5);
    }

    #[test]
    fn refining_without_normal_stone_is_noop() {
        let cfg = ForgeConfig::default_config();
        for tier in [CatalystTier::Advanced, CatalystTier::Supreme] {
            let mut state = ForgeState::new();
            let mut rolls = ScriptedRolls::default();
            let outcome = craft_catalyst(&mut state, &cfg, tier, &mut rolls);
            assert_eq!(outcome, CraftOutcome::Blocked { tier });
            assert_eq!(state, ForgeState::new());
            assert_eq!(rolls.consumed(), 0);
        }
    }

    #[test]
    fn refining_consumes_a_normal_stone() {
        let cfg = ForgeConfig::default_config();
        let mut state = ForgeState::new();
        state.catalysts.add(CatalystTier::Normal, 2);
        let mut rolls = ScriptedRolls::default();
        let outcome = craft_catalyst(&mut state, &cfg, CatalystTier::Supreme, &mut rolls);
        assert_eq!(
            outcome,
            CraftOutcome::Crafted {
                tier: CatalystTier::Supreme,
                count: 1
            }
        );
        assert_eq!(state.catalysts().count(CatalystTier::Normal), 1);
        assert_eq!(state.ledger().money, 20_000);
        assert_eq!(state.ledger().ingredient_stones, 1);
        assert_eq!(state.ledger().iron, 0);
        assert_eq!(rolls.consumed(), 0);
    }
}
