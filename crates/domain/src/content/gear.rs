//! Weapon and armor catalogues
//!
//! `chance` weights the labyrinth drop tables; the shop simply lists every
//! row. Unarmored defense is worth +5 AC, so armor starts above that.

use super::weighted_index;
use crate::entities::{Armor, Weapon};
use crate::value_objects::DiceSource;

#[derive(Debug, Clone, PartialEq)]
pub struct WeaponRow {
    pub name: &'static str,
    pub damage_die: &'static str,
    pub price: i32,
    pub chance: f64,
}

impl WeaponRow {
    pub fn to_weapon(&self, labyrinth_drop: bool) -> Weapon {
        Weapon {
            name: self.name.to_string(),
            damage_die: self.damage_die.to_string(),
            price: self.price,
            damaged: false,
            labyrinth_drop,
        }
    }
}

#[derive(Debug)]
pub struct WeaponTable {
    rows: Vec<WeaponRow>,
}

impl WeaponTable {
    pub fn builtin() -> Self {
        let row = |name, damage_die, price, chance| WeaponRow {
            name,
            damage_die,
            price,
            chance,
        };
        Self {
            rows: vec![
                row("Dagger", "1d4", 10, 0.20),
                row("Club", "1d6", 8, 0.18),
                row("Short Sword", "1d8", 25, 0.16),
                row("Mace", "2d4", 35, 0.14),
                row("Long Sword", "1d10", 50, 0.12),
                row("Battle Axe", "2d6", 75, 0.09),
                row("War Hammer", "3d4", 90, 0.06),
                row("Great Sword", "2d8", 120, 0.05),
            ],
        }
    }

    pub fn all(&self) -> &[WeaponRow] {
        &self.rows
    }

    pub fn by_name(&self, name: &str) -> Option<&WeaponRow> {
        self.rows.iter().find(|r| r.name == name)
    }

    pub fn drop_pick(&self, dice: &mut dyn DiceSource) -> Option<&WeaponRow> {
        let weights: Vec<f64> = self.rows.iter().map(|r| r.chance).collect();
        weighted_index(dice, &weights).map(|i| &self.rows[i])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArmorRow {
    pub name: &'static str,
    pub armor_class: i32,
    pub price: i32,
    pub chance: f64,
}

impl ArmorRow {
    pub fn to_armor(&self, labyrinth_drop: bool) -> Armor {
        Armor {
            name: self.name.to_string(),
            armor_class: self.armor_class,
            price: self.price,
            damaged: false,
            labyrinth_drop,
        }
    }
}

#[derive(Debug)]
pub struct ArmorTable {
    rows: Vec<ArmorRow>,
}

impl ArmorTable {
    pub fn builtin() -> Self {
        let row = |name, armor_class, price, chance| ArmorRow {
            name,
            armor_class,
            price,
            chance,
        };
        Self {
            rows: vec![
                row("Padded Jacket", 6, 10, 0.22),
                row("Leather Armor", 7, 25, 0.20),
                row("Studded Leather", 8, 45, 0.17),
                row("Chain Shirt", 9, 80, 0.14),
                row("Scale Mail", 10, 120, 0.12),
                row("Half Plate", 11, 180, 0.09),
                row("Full Plate", 13, 300, 0.06),
            ],
        }
    }

    pub fn all(&self) -> &[ArmorRow] {
        &self.rows
    }

    pub fn by_name(&self, name: &str) -> Option<&ArmorRow> {
        self.rows.iter().find(|r| r.name == name)
    }

    pub fn drop_pick(&self, dice: &mut dyn DiceSource) -> Option<&ArmorRow> {
        let weights: Vec<f64> = self.rows.iter().map(|r| r.chance).collect();
        weighted_index(dice, &weights).map(|i| &self.rows[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labyrinth_drops_are_flagged_unsellable() {
        let table = WeaponTable::builtin();
        let row = table.by_name("Long Sword").expect("catalogue row");
        assert!(row.to_weapon(true).labyrinth_drop);
        assert!(!row.to_weapon(false).labyrinth_drop);
    }

    #[test]
    fn test_armor_beats_unarmored_baseline() {
        let table = ArmorTable::builtin();
        assert!(table.all().iter().all(|r| r.armor_class > 5));
    }
}
