//! The monster bestiary
//!
//! `wander_chance` is both the random-encounter weight and the quest-target
//! eligibility gate: anything at or below 0.02 never appears on the quest
//! board. The Dragon has a wander chance of zero; it only ever spawns
//! forced (depth 5 or the 50th engaged monster).

use super::weighted_index;
use crate::value_objects::DiceSource;

#[derive(Debug, Clone, PartialEq)]
pub struct MonsterRow {
    pub name: &'static str,
    pub hp: i32,
    pub ac: i32,
    pub dex: i32,
    pub strength: i32,
    pub damage_die: &'static str,
    pub xp: i32,
    pub gold_min: i32,
    pub gold_max: i32,
    pub wander_chance: f64,
    pub difficulty: i32,
    pub description: &'static str,
    pub spell_resistance: i32,
}

/// Wander chance at or below this never appears as a quest target.
pub const QUEST_TARGET_MIN_WANDER: f64 = 0.02;

#[derive(Debug)]
pub struct MonsterTable {
    rows: Vec<MonsterRow>,
}

macro_rules! monster {
    ($name:literal, $hp:literal, $ac:literal, $dex:literal, $str:literal, $die:literal,
     $xp:literal, $gold_min:literal, $gold_max:literal, $wander:literal, $diff:literal,
     $desc:literal, $sr:literal) => {
        MonsterRow {
            name: $name,
            hp: $hp,
            ac: $ac,
            dex: $dex,
            strength: $str,
            damage_die: $die,
            xp: $xp,
            gold_min: $gold_min,
            gold_max: $gold_max,
            wander_chance: $wander,
            difficulty: $diff,
            description: $desc,
            spell_resistance: $sr,
        }
    };
}

impl MonsterTable {
    pub fn builtin() -> Self {
        Self {
            rows: vec![
                monster!("Giant Rat", 6, 11, 14, 6, "1d3", 10, 1, 8, 0.14, 1,
                    "A mangy rat the size of a hound, all teeth and hunger.", 0),
                monster!("Cave Bat", 5, 13, 16, 5, "1d2", 8, 0, 5, 0.12, 1,
                    "It shrieks out of the dark faster than the eye can follow.", 0),
                monster!("Kobold", 10, 12, 13, 8, "1d4", 15, 3, 12, 0.12, 2,
                    "A scaly scavenger clutching a sharpened spit.", 0),
                monster!("Goblin", 20, 15, 12, 10, "1d6", 25, 5, 20, 0.12, 3,
                    "Small, vicious, and fond of ambushes.", 0),
                monster!("Skeleton", 16, 13, 10, 11, "1d6", 22, 4, 15, 0.10, 3,
                    "Old bones held together by older spite.", 0),
                monster!("Zombie", 24, 11, 6, 13, "1d8", 28, 5, 18, 0.09, 3,
                    "Slow, rotting, and utterly tireless.", 0),
                monster!("Giant Spider", 18, 14, 14, 9, "1d8", 30, 6, 20, 0.08, 4,
                    "Eight eyes glitter above dripping fangs.", 0),
                monster!("Bandit", 22, 14, 12, 12, "1d8", 32, 15, 40, 0.08, 4,
                    "A deserter who found easier prey underground.", 0),
                monster!("Orc", 30, 15, 11, 14, "1d10", 40, 10, 30, 0.07, 5,
                    "Broad as a door and twice as mean.", 0),
                monster!("Ghoul", 26, 14, 13, 12, "2d4", 38, 8, 24, 0.06, 5,
                    "It smells the living from a hundred paces.", 0),
                monster!("Wight", 32, 16, 12, 14, "2d5", 48, 10, 30, 0.04, 6,
                    "Grave-cold hangs about it like a cloak.", 1),
                monster!("Ogre", 45, 16, 8, 18, "2d6", 60, 20, 50, 0.04, 6,
                    "Its club was a roof beam in a former life.", 0),
                monster!("Troll", 55, 17, 10, 19, "2d8", 80, 25, 60, 0.03, 7,
                    "Wounds close on it even as you watch.", 0),
                monster!("Wraith", 40, 18, 15, 14, "3d4", 90, 15, 45, 0.025, 8,
                    "A tattered shadow with a crown of frost.", 2),
                monster!("Minotaur", 65, 18, 12, 20, "2d10", 110, 30, 80, 0.022, 8,
                    "The labyrinth's own warden, horns lowered.", 0),
                monster!("Stone Giant", 80, 19, 9, 21, "3d8", 140, 40, 100, 0.015, 9,
                    "Each footfall loosens dust from the vault above.", 0),
                monster!("Dragon", 135, 31, 18, 22, "8d7", 500, 200, 400, 0.0, 12,
                    "The hoard-lord of the deepest vault. Fire sleeps in its throat.", 4),
            ],
        }
    }

    pub fn all(&self) -> &[MonsterRow] {
        &self.rows
    }

    pub fn by_name(&self, name: &str) -> Option<&MonsterRow> {
        self.rows.iter().find(|r| r.name == name)
    }

    /// Weighted random pick for a wandering encounter. The Dragon's zero
    /// weight keeps it out.
    pub fn wandering_pick(&self, dice: &mut dyn DiceSource) -> Option<&MonsterRow> {
        let weights: Vec<f64> = self.rows.iter().map(|r| r.wander_chance).collect();
        weighted_index(dice, &weights).map(|i| &self.rows[i])
    }

    /// Monsters eligible as quest targets.
    pub fn quest_targets(&self) -> Vec<&MonsterRow> {
        self.rows
            .iter()
            .filter(|r| r.wander_chance > QUEST_TARGET_MIN_WANDER)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::FixedFractions;
    use super::*;

    #[test]
    fn test_dragon_stats_match_the_boss_contract() {
        let table = MonsterTable::builtin();
        let dragon = table.by_name("Dragon").expect("dragon row");
        assert_eq!(dragon.hp, 135);
        assert_eq!(dragon.ac, 31);
        assert_eq!(dragon.dex, 18);
        assert_eq!(dragon.strength, 22);
        assert_eq!(dragon.damage_die, "8d7");
        assert_eq!(dragon.wander_chance, 0.0);
    }

    #[test]
    fn test_wandering_pick_never_yields_dragon() {
        let table = MonsterTable::builtin();
        for i in 0..20 {
            let mut dice = FixedFractions::new(vec![i as f64 / 20.0]);
            let row = table.wandering_pick(&mut dice).expect("non-empty table");
            assert_ne!(row.name, "Dragon");
        }
    }

    #[test]
    fn test_quest_targets_exclude_rare_monsters() {
        let table = MonsterTable::builtin();
        let targets = table.quest_targets();
        assert!(targets.iter().all(|r| r.wander_chance > 0.02));
        assert!(targets.iter().any(|r| r.name == "Skeleton"));
        assert!(!targets.iter().any(|r| r.name == "Dragon"));
        assert!(!targets.iter().any(|r| r.name == "Stone Giant"));
    }
}
