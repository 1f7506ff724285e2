//! Gear entities - weapons, armor, and magic rings
//!
//! Closed-world value records with an explicit kind where behavior differs;
//! no trait objects. The `damaged` flag halves an item's effect until the
//! smith repairs it; `labyrinth_drop` gear can never be sold.

use serde::{Deserialize, Serialize};

use crate::value_objects::Attribute;

/// A weapon in the inventory or on a shop shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weapon {
    pub name: String,
    /// Damage die string, e.g. "1d8". Parsed lazily; malformed strings fall
    /// back to 1d4 at the call site.
    pub damage_die: String,
    pub price: i32,
    #[serde(default)]
    pub damaged: bool,
    #[serde(default)]
    pub labyrinth_drop: bool,
}

/// A suit of armor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Armor {
    pub name: String,
    pub armor_class: i32,
    pub price: i32,
    #[serde(default)]
    pub damaged: bool,
    #[serde(default)]
    pub labyrinth_drop: bool,
}

impl Armor {
    /// Armor class contributed while equipped; damaged armor works at half
    /// effect.
    pub fn effective_class(&self) -> i32 {
        if self.damaged {
            self.armor_class / 2
        } else {
            self.armor_class
        }
    }
}

/// A bound magic ring. The magnitude is rolled once at acquisition and the
/// effect is already applied to the wearer; the record exists so the effect
/// can be reversed if the ring is ever sold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ring {
    pub name: String,
    pub attribute: Attribute,
    /// Signed shift applied to the attribute when the ring bound. May differ
    /// from the rolled magnitude when the attribute floor cut it short.
    pub applied_bonus: i32,
    #[serde(default)]
    pub cursed: bool,
    /// Base value used for haggling when sold.
    pub price: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damaged_armor_halves_class() {
        let mut armor = Armor {
            name: "Scale Mail".into(),
            armor_class: 9,
            price: 120,
            damaged: false,
            labyrinth_drop: false,
        };
        assert_eq!(armor.effective_class(), 9);
        armor.damaged = true;
        assert_eq!(armor.effective_class(), 4);
    }
}
