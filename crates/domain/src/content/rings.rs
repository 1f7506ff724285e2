//! Magic ring table
//!
//! Rings bind on pickup. The magnitude is rolled from the row's band at
//! acquisition time; cursed rows carry negative bands and the cursed flag
//! blocks sale until the temple cleanses it.

use super::weighted_index;
use crate::entities::Ring;
use crate::value_objects::{Attribute, DiceSource};

#[derive(Debug, Clone, PartialEq)]
pub struct RingRow {
    pub name: &'static str,
    pub attribute: Attribute,
    /// Inclusive band for the rolled shift. Negative for cursed rows.
    pub min_bonus: i32,
    pub max_bonus: i32,
    pub cursed: bool,
    pub price: i32,
    pub chance: f64,
}

impl RingRow {
    /// Roll the magnitude and produce the ring ready for binding. The
    /// `applied_bonus` is finalized by `Character::bind_ring`, which knows
    /// about the attribute floor.
    pub fn forge(&self, dice: &mut dyn DiceSource) -> (Ring, i32) {
        let rolled = dice.range(self.min_bonus, self.max_bonus);
        (
            Ring {
                name: self.name.to_string(),
                attribute: self.attribute,
                applied_bonus: 0,
                cursed: self.cursed,
                price: self.price,
            },
            rolled,
        )
    }
}

#[derive(Debug)]
pub struct RingTable {
    rows: Vec<RingRow>,
}

impl RingTable {
    pub fn builtin() -> Self {
        let row = |name, attribute, min_bonus, max_bonus, cursed, price, chance| RingRow {
            name,
            attribute,
            min_bonus,
            max_bonus,
            cursed,
            price,
            chance,
        };
        Self {
            rows: vec![
                row("Ring of Might", Attribute::Strength, 1, 2, false, 80, 0.16),
                row("Ring of Grace", Attribute::Dexterity, 1, 2, false, 80, 0.14),
                row("Ring of Vigor", Attribute::Constitution, 1, 2, false, 90, 0.13),
                row("Ring of Clarity", Attribute::Intelligence, 1, 2, false, 70, 0.12),
                row("Ring of Insight", Attribute::Wisdom, 1, 2, false, 70, 0.12),
                row("Ring of Allure", Attribute::Charisma, 1, 2, false, 70, 0.11),
                row("Ring of the Owl", Attribute::Perception, 1, 2, false, 70, 0.10),
                row("Leaden Ring", Attribute::Strength, -2, -1, true, 40, 0.05),
                row("Ring of Clouded Eyes", Attribute::Perception, -2, -1, true, 40, 0.04),
                row("Brittle Ring", Attribute::Constitution, -2, -1, true, 40, 0.03),
            ],
        }
    }

    pub fn all(&self) -> &[RingRow] {
        &self.rows
    }

    pub fn by_name(&self, name: &str) -> Option<&RingRow> {
        self.rows.iter().find(|r| r.name == name)
    }

    pub fn drop_pick(&self, dice: &mut dyn DiceSource) -> Option<&RingRow> {
        let weights: Vec<f64> = self.rows.iter().map(|r| r.chance).collect();
        weighted_index(dice, &weights).map(|i| &self.rows[i])
    }
}
