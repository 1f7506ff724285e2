//! A monster engaged in combat
//!
//! Instances copy their stats from a content-table row. Base stats are used
//! as-is at every depth; only rewards scale, and that happens at payout.

use serde::{Deserialize, Serialize};

use crate::content::MonsterRow;
use crate::value_objects::{CombatConditions, DieFormula};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Monster {
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub ac: i32,
    pub dex: i32,
    pub strength: i32,
    pub damage_die: DieFormula,
    pub xp: i32,
    pub gold_min: i32,
    pub gold_max: i32,
    pub difficulty: i32,
    pub description: String,
    #[serde(default)]
    pub spell_resistance: i32,
    #[serde(default)]
    pub conditions: CombatConditions,
}

impl Monster {
    /// Instantiate from a content row. The damage die is parsed by the
    /// caller so that malformed table data can be logged there.
    pub fn from_row(row: &MonsterRow, damage_die: DieFormula) -> Self {
        Self {
            name: row.name.to_string(),
            hp: row.hp,
            max_hp: row.hp,
            ac: row.ac,
            dex: row.dex,
            strength: row.strength,
            damage_die,
            xp: row.xp,
            gold_min: row.gold_min,
            gold_max: row.gold_max,
            difficulty: row.difficulty,
            description: row.description.to_string(),
            spell_resistance: row.spell_resistance,
            conditions: CombatConditions::default(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Armor class after active conditions.
    pub fn effective_ac(&self) -> i32 {
        self.ac - self.conditions.ac_penalty
    }

    pub fn is_dragon(&self) -> bool {
        self.name == "Dragon"
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.hp -= amount.max(0);
    }
}
