//! Content tables - immutable record tables loaded at startup
//!
//! Every table supports full enumeration, lookup by unique name, and
//! weighted random selection by an explicit per-row weight. The tables are
//! shared read-only across sessions.

mod consumables;
mod dialogue;
mod gear;
mod monsters;
mod rings;
mod traps;

pub use consumables::{PotionRow, PotionTable, SpellRow, SpellTable};
pub use dialogue::{DialogueTable, FALLBACK_LINE};
pub use gear::{ArmorRow, ArmorTable, WeaponRow, WeaponTable};
pub use monsters::{MonsterRow, MonsterTable};
pub use rings::{RingRow, RingTable};
pub use traps::{TrapEffect, TrapRow, TrapTable};

use crate::value_objects::DiceSource;

/// Everything the engine reads at runtime.
#[derive(Debug)]
pub struct ContentTables {
    pub monsters: MonsterTable,
    pub weapons: WeaponTable,
    pub armors: ArmorTable,
    pub potions: PotionTable,
    pub spells: SpellTable,
    pub traps: TrapTable,
    pub rings: RingTable,
    pub dialogue: DialogueTable,
}

impl ContentTables {
    /// The built-in game data. External loading is a transport concern; the
    /// engine only ever sees these typed tables.
    pub fn builtin() -> Self {
        Self {
            monsters: MonsterTable::builtin(),
            weapons: WeaponTable::builtin(),
            armors: ArmorTable::builtin(),
            potions: PotionTable::builtin(),
            spells: SpellTable::builtin(),
            traps: TrapTable::builtin(),
            rings: RingTable::builtin(),
            dialogue: DialogueTable::builtin(),
        }
    }
}

/// Pick an index from a weight list. Rows with non-positive weight never
/// win. Returns `None` when no weight is positive.
pub(crate) fn weighted_index(dice: &mut dyn DiceSource, weights: &[f64]) -> Option<usize> {
    let total: f64 = weights.iter().filter(|w| **w > 0.0).sum();
    if total <= 0.0 {
        return None;
    }
    let mut draw = dice.fraction() * total;
    for (i, w) in weights.iter().enumerate() {
        if *w <= 0.0 {
            continue;
        }
        draw -= w;
        if draw < 0.0 {
            return Some(i);
        }
    }
    // Float edge: the draw landed exactly on the total.
    weights.iter().rposition(|w| *w > 0.0)
}


#[cfg(test)]
mod tests {
    use super::test_support::FixedFractions;
    use super::*;

    #[test]
    fn test_weighted_index_skips_zero_weights() {
        let mut dice = FixedFractions::new(vec![0.0, 0.999]);
        let weights = [0.0, 1.0, 1.0];
        assert_eq!(weighted_index(&mut dice, &weights), Some(1));
        assert_eq!(weighted_index(&mut dice, &weights), Some(2));
    }

    #[test]
    fn test_weighted_index_empty_when_all_zero() {
        let mut dice = FixedFractions::new(vec![0.5]);
        assert_eq!(weighted_index(&mut dice, &[0.0, 0.0]), None);
    }

    #[test]
    fn test_builtin_tables_are_populated() {
        let tables = ContentTables::builtin();
        assert!(tables.monsters.all().len() >= 10);
        assert!(tables.weapons.all().len() >= 6);
        assert!(tables.armors.all().len() >= 6);
        assert!(tables.potions.all().len() >= 7);
        assert!(tables.spells.all().len() >= 9);
        assert!(tables.traps.all().len() >= 5);
        assert!(tables.rings.all().len() >= 8);
    }
}
