//! Potion and spell scroll catalogues
//!
//! Rows carry shop price and drop weight only; the combat effects live in
//! the engine's rules module, keyed by name.

use super::weighted_index;
use crate::value_objects::DiceSource;

#[derive(Debug, Clone, PartialEq)]
pub struct PotionRow {
    pub name: &'static str,
    pub price: i32,
    pub chance: f64,
    pub blurb: &'static str,
}

#[derive(Debug)]
pub struct PotionTable {
    rows: Vec<PotionRow>,
}

impl PotionTable {
    pub fn builtin() -> Self {
        let row = |name, price, chance, blurb| PotionRow {
            name,
            price,
            chance,
            blurb,
        };
        Self {
            rows: vec![
                row("Healing", 30, 0.30, "Knits wounds closed. Scales with Constitution."),
                row("Strength", 40, 0.15, "+2 damage for the rest of the fight."),
                row("Intelligence", 35, 0.12, "+1 damage for the rest of the fight."),
                row("Speed", 45, 0.12, "One extra attack on your next attack action."),
                row("Protection", 45, 0.12, "+3 armor class for the rest of the fight."),
                row("Invisibility", 60, 0.10, "The next blow aimed at you finds only air."),
                row("Antidote", 25, 0.09, "Purges poison. Does not cost your turn."),
            ],
        }
    }

    pub fn all(&self) -> &[PotionRow] {
        &self.rows
    }

    pub fn by_name(&self, name: &str) -> Option<&PotionRow> {
        self.rows.iter().find(|r| r.name == name)
    }

    pub fn drop_pick(&self, dice: &mut dyn DiceSource) -> Option<&PotionRow> {
        let weights: Vec<f64> = self.rows.iter().map(|r| r.chance).collect();
        weighted_index(dice, &weights).map(|i| &self.rows[i])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpellRow {
    pub name: &'static str,
    pub price: i32,
    pub chance: f64,
    pub blurb: &'static str,
}

#[derive(Debug)]
pub struct SpellTable {
    rows: Vec<SpellRow>,
}

impl SpellTable {
    pub fn builtin() -> Self {
        let row = |name, price, chance, blurb| SpellRow {
            name,
            price,
            chance,
            blurb,
        };
        Self {
            rows: vec![
                row("Magic Missile", 40, 0.22, "2d6, never misses."),
                row("Fireball", 80, 0.15, "4d6 of roaring flame."),
                row("Lightning Bolt", 100, 0.12, "6d6 at full power, 3d6 held back."),
                row("Freeze", 70, 0.12, "The enemy loses its next turn."),
                row("Vulnerability", 60, 0.10, "Enemy armor class -2."),
                row("Weakness", 60, 0.09, "Enemy damage -2."),
                row("Slowness", 60, 0.09, "Enemy damage -2."),
                row("Summon", 120, 0.06, "Calls a companion to your side."),
                row("Teleport", 90, 0.05, "Back to town, empty-handed but alive."),
            ],
        }
    }

    pub fn all(&self) -> &[SpellRow] {
        &self.rows
    }

    pub fn by_name(&self, name: &str) -> Option<&SpellRow> {
        self.rows.iter().find(|r| r.name == name)
    }

    pub fn drop_pick(&self, dice: &mut dyn DiceSource) -> Option<&SpellRow> {
        let weights: Vec<f64> = self.rows.iter().map(|r| r.chance).collect();
        weighted_index(dice, &weights).map(|i| &self.rows[i])
    }
}
