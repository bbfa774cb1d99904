//! Purchase and crafting configuration.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalyst::CatalystTier;
use crate::constants::{
    ADVANCED_STONE_MONEY, ITEM_PURCHASE_PRICE, NORMAL_STONE_BLACK_IRON, NORMAL_STONE_IRON,
    NORMAL_STONE_LAPIS, NORMAL_STONE_MONEY, NORMAL_STONE_SPECIAL_IRON, NORMAL_STONE_SUCCESS,
    REFINED_STONE_SUCCESS, SUPREME_STONE_MONEY,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid forge config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{tier} recipe success chance {value} is outside [0, 1]")]
    SuccessChance { tier: CatalystTier, value: f64 },
    #[error("the normal recipe cannot consume a normal stone")]
    SelfIngredient,
}

/// Raw materials charged by a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MaterialCost {
    #[serde(default)]
    pub iron: u32,
    #[serde(default)]
    pub black_iron: u32,
    #[serde(default)]
    pub special_iron: u32,
    #[serde(default)]
    pub lapis: u32,
}

impl MaterialCost {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.iron == 0 && self.black_iron == 0 && self.special_iron == 0 && self.lapis == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    #[serde(default)]
    pub materials: MaterialCost,
    #[serde(default)]
    pub money: u64,
    /// Chance in `[0, 1]` that the craft yields a stone.
    pub success_chance: f64,
    /// Whether one normal stone is consumed as an ingredient.
    #[serde(default)]
    pub requires_normal: bool,
}

impl Recipe {
    #[must_use]
    pub fn always_succeeds(&self) -> bool {
        self.success_chance >= 1.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForgeConfig {
    pub purchase_price: u64,
    pub normal: Recipe,
    pub advanced: Recipe,
    pub supreme: Recipe,
}

impl Default for ForgeConfig {
    fn default() -> Self {
        Self {
            purchase_price: ITEM_PURCHASE_PRICE,
            normal: Recipe {
                materials: MaterialCost {
                    iron: NORMAL_STONE_IRON,
                    black_iron: NORMAL_STONE_BLACK_IRON,
                    special_iron: NORMAL_STONE_SPECIAL_IRON,
                    lapis: NORMAL_STONE_LAPIS,
                },
                money: NORMAL_STONE_MONEY,
                success_chance: NORMAL_STONE_SUCCESS,
                requires_normal: false,
            },
            advanced: Recipe {
                materials: MaterialCost::default(),
                money: ADVANCED_STONE_MONEY,
                success_chance: REFINED_STONE_SUCCESS,
                requires_normal: true,
            },
            supreme: Recipe {
                materials: MaterialCost::default(),
                money: SUPREME_STONE_MONEY,
                success_chance: REFINED_STONE_SUCCESS,
                requires_normal: true,
            },
        }
    }
}

impl ForgeConfig {
    /// Get default configuration
    #[must_use]
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Parse a configuration, filling omitted sections from the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when the JSON is malformed or the recipes fail
    /// [`ForgeConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check recipe invariants.
    ///
    /// # Errors
    ///
    /// Returns the first recipe whose success chance is not a probability,
    /// or an error when the normal recipe requires a normal stone.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.normal.requires_normal {
            return Err(ConfigError::SelfIngredient);
        }
        for tier in CatalystTier::ALL {
            let value = self.recipe(tier).success_chance;
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::SuccessChance { tier, value });
            }
        }
        Ok(())
    }

    #[must_use]
    pub const fn recipe(&self, tier: CatalystTier) -> &Recipe {
        match tier {
            CatalystTier::Normal => &self.normal,
            CatalystTier::Advanced => &self.advanced,
            CatalystTier::Supreme => &self.supreme,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_balance_table() {
        let cfg = ForgeConfig::default_config();
        assert_eq!(cfg.purchase_price, 1_000);
        assert_eq!(cfg.normal.materials.lapis, 5);
        assert_eq!(cfg.normal.money, 5_000);
        assert!(!cfg.normal.always_succeeds());
        assert!(cfg.advanced.requires_normal && cfg.advanced.always_succeeds());
        assert_eq!(cfg.supreme.money, 20_000);
        assert!(cfg.supreme.materials.is_empty());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let cfg = ForgeConfig::from_json(r#"{ "purchase_price": 250 }"#).unwrap();
        assert_eq!(cfg.purchase_price, 250);
        assert_eq!(cfg.advanced, ForgeConfig::default().advanced);
    }

    #[test]
    fn rejects_out_of_range_success_chance() {
        let json = r#"{ "normal": { "money": 1, "success_chance": 1.5 } }"#;
        let err = ForgeConfig::from_json(json).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::SuccessChance {
                tier: CatalystTier::Normal,
                ..
            }
        ));
    }

    #[test]
    fn rejects_normal_recipe_needing_normal_stone() {
        let json = r#"{ "normal": { "success_chance": 0.5, "requires_normal": true } }"#;
        assert!(matches!(
            ForgeConfig::from_json(json),
            Err(ConfigError::SelfIngredient)
        ));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            ForgeConfig::from_json("{ purchase_price"),
            Err(ConfigError::Parse(_))
        ));
    }
}
