//! Summoned companions
//!
//! The Summon spell rolls 5d4 and the result band picks a tier. A companion
//! persists on the save record and fights until it falls.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Companion {
    pub name: String,
    pub tier: u8,
    pub max_hp: i32,
    pub hp: i32,
    pub strength: i32,
    pub ac: i32,
    pub damage_die: String,
}

impl Companion {
    /// Map a 5d4 summoning roll (5..=20) to a companion tier.
    pub fn for_summon_roll(roll: i32) -> Self {
        let (name, tier, max_hp, strength, ac, damage_die) = match roll {
            i32::MIN..=9 => ("Grey Wolf", 1, 12, 12, 13, "1d6"),
            10..=14 => ("Cave Bear", 2, 20, 14, 14, "1d8"),
            15..=17 => ("Stone Golem", 3, 28, 16, 16, "2d6"),
            _ => ("Ancient Treant", 4, 36, 18, 17, "2d8"),
        };
        Self {
            name: name.to_string(),
            tier,
            max_hp,
            hp: max_hp,
            strength,
            ac,
            damage_die: damage_die.to_string(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Heal up to `amount`, capped at max. Returns the amount restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
        self.hp - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summon_tiers() {
        assert_eq!(Companion::for_summon_roll(5).tier, 1);
        assert_eq!(Companion::for_summon_roll(9).tier, 1);
        assert_eq!(Companion::for_summon_roll(10).tier, 2);
        assert_eq!(Companion::for_summon_roll(15).tier, 3);
        assert_eq!(Companion::for_summon_roll(18).tier, 4);
        assert_eq!(Companion::for_summon_roll(20).tier, 4);
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut c = Companion::for_summon_roll(10);
        c.hp = 15;
        assert_eq!(c.heal(20), 5);
        assert_eq!(c.hp, c.max_hp);
    }
}
