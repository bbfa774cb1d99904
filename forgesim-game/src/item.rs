//! Weapons that can be enhanced.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::MAX_ITEM_LEVEL;

/// Opaque item identifier, unique within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeaponKind {
    Bow,
    #[default]
    Sword,
    Spear,
    Dagger,
    Fan,
}

impl WeaponKind {
    pub const ALL: [Self; 5] = [
        Self::Bow,
        Self::Sword,
        Self::Spear,
        Self::Dagger,
        Self::Fan,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bow => "bow",
            Self::Sword => "sword",
            Self::Spear => "spear",
            Self::Dagger => "dagger",
            Self::Fan => "fan",
        }
    }
}

impl fmt::Display for WeaponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WeaponKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bow" => Ok(Self::Bow),
            "sword" => Ok(Self::Sword),
            "spear" => Ok(Self::Spear),
            "dagger" => Ok(Self::Dagger),
            "fan" => Ok(Self::Fan),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub kind: WeaponKind,
    pub level: u8,
    /// Milliseconds since the Unix epoch at purchase time.
    pub created_at_ms: u64,
}

impl Item {
    #[must_use]
    pub const fn new(id: ItemId, kind: WeaponKind, created_at_ms: u64) -> Self {
        Self {
            id,
            kind,
            level: 0,
            created_at_ms,
        }
    }

    /// Display handle such as `sword_3`.
    #[must_use]
    pub fn handle(&self) -> String {
        format!("{}_{}", self.kind, self.id)
    }

    /// Name with level prefix, e.g. `+4 spear`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("+{} {}", self.level, self.kind)
    }

    #[must_use]
    pub const fn is_max_level(&self) -> bool {
        self.level >= MAX_ITEM_LEVEL
    }
}
