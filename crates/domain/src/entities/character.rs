//! The player character aggregate
//!
//! Owns vitals, economy, inventory, progression, and every scoped flag
//! group. Mutations that carry invariants (gold, hp, equipment indices,
//! training cap, the attribute floor) go through methods; plain data is
//! public. The save record is the serde form of this struct, with defaults
//! on every optional field so old records keep loading.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entities::{Armor, Companion, Quest, Ring, Weapon};
use crate::error::DomainError;
use crate::value_objects::{
    Attribute, Attributes, DepthFlags, Difficulty, PlayerCombatState, TownFlags, TrainingLedger,
};

/// Cumulative XP required to reach `level`. The step from L-1 to L costs
/// `(L-1) * 50`, so the total is triangular.
pub fn xp_for_level(level: i32) -> i32 {
    50 * (level - 1) * level / 2
}

/// Gold bumped per Constitution point on max HP.
const HP_PER_CON_POINT: i32 = 5;

/// Lifetime run statistics, carried on the save record and reported on the
/// leaderboard after a Dragon kill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub monsters_defeated: i32,
    pub quests_completed: i32,
    pub potions_used: i32,
    pub spells_used: i32,
    pub gold_earned: i32,
    pub gold_spent: i32,
}

fn default_level() -> i32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub name: String,
    pub difficulty: Difficulty,
    pub device_id: String,
    pub attributes: Attributes,
    pub hp: i32,
    pub max_hp: i32,
    pub gold: i32,
    #[serde(default)]
    pub weapons: Vec<Weapon>,
    #[serde(default)]
    pub armors: Vec<Armor>,
    #[serde(default)]
    pub rings: Vec<Ring>,
    /// Index into `weapons`; kept in sync by the removal helpers.
    #[serde(default)]
    pub equipped_weapon: Option<usize>,
    /// Index into `armors`.
    #[serde(default)]
    pub equipped_armor: Option<usize>,
    /// Legacy flat counter for plain Healing potions.
    #[serde(default)]
    pub healing_potions: i32,
    #[serde(default)]
    pub potion_uses: BTreeMap<String, i32>,
    #[serde(default)]
    pub spell_uses: BTreeMap<String, i32>,
    #[serde(default = "default_level")]
    pub level: i32,
    #[serde(default)]
    pub xp: i32,
    #[serde(default)]
    pub unspent_stat_points: i32,
    #[serde(default)]
    pub training: TrainingLedger,
    #[serde(default)]
    pub death_count: i32,
    #[serde(default)]
    pub combat: PlayerCombatState,
    #[serde(default)]
    pub depth_flags: DepthFlags,
    #[serde(default)]
    pub town_flags: TownFlags,
    #[serde(default)]
    pub companion: Option<Companion>,
    #[serde(default)]
    pub quests: Vec<Quest>,
    #[serde(default)]
    pub stats: RunStats,
}

impl Character {
    pub fn new(
        name: impl Into<String>,
        difficulty: Difficulty,
        device_id: impl Into<String>,
        attributes: Attributes,
        max_hp: i32,
        gold: i32,
    ) -> Self {
        Self {
            name: name.into(),
            difficulty,
            device_id: device_id.into(),
            attributes,
            hp: max_hp.max(1),
            max_hp: max_hp.max(1),
            gold: gold.max(0),
            weapons: Vec::new(),
            armors: Vec::new(),
            rings: Vec::new(),
            equipped_weapon: None,
            equipped_armor: None,
            healing_potions: 0,
            potion_uses: BTreeMap::new(),
            spell_uses: BTreeMap::new(),
            level: 1,
            xp: 0,
            unspent_stat_points: 0,
            training: TrainingLedger::default(),
            death_count: 0,
            combat: PlayerCombatState::default(),
            depth_flags: DepthFlags::default(),
            town_flags: TownFlags::default(),
            companion: None,
            quests: Vec::new(),
            stats: RunStats::default(),
        }
    }

    pub fn attribute(&self, attr: Attribute) -> i32 {
        self.attributes.get(attr)
    }

    // ------------------------------------------------------------------
    // Progression
    // ------------------------------------------------------------------

    /// Accumulate XP and apply any level-ups. Returns levels gained; each
    /// grants one unspent stat point.
    pub fn gain_xp(&mut self, amount: i32) -> i32 {
        self.xp += amount.max(0);
        let mut gained = 0;
        while self.xp >= xp_for_level(self.level + 1) {
            self.level += 1;
            self.unspent_stat_points += 1;
            gained += 1;
        }
        gained
    }

    pub fn xp_to_next_level(&self) -> i32 {
        (xp_for_level(self.level + 1) - self.xp).max(0)
    }

    /// Spend one banked stat point on an attribute.
    pub fn spend_point(&mut self, attr: Attribute) -> Result<(), DomainError> {
        if self.unspent_stat_points == 0 {
            return Err(DomainError::constraint("no unspent stat points"));
        }
        self.unspent_stat_points -= 1;
        let applied = self.attributes.shift(attr, 1);
        if attr == Attribute::Constitution {
            self.shift_max_hp(applied * HP_PER_CON_POINT);
        }
        Ok(())
    }

    /// One session at the town trainer. The engine collects the fee first.
    pub fn train(&mut self, attr: Attribute) -> Result<(), DomainError> {
        self.training.record(attr)?;
        let applied = self.attributes.shift(attr, 1);
        if attr == Attribute::Constitution {
            self.shift_max_hp(applied * HP_PER_CON_POINT);
        }
        Ok(())
    }

    /// Fee for the next training session: 50 gold per prior session plus 50.
    pub fn training_cost(&self) -> i32 {
        50 * (self.training.total() as i32 + 1)
    }

    // ------------------------------------------------------------------
    // Vitals
    // ------------------------------------------------------------------

    pub fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    /// Restore up to `amount` hp; returns the amount actually restored.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = (self.hp + amount.max(0)).min(self.max_hp);
        self.hp - before
    }

    pub fn full_heal(&mut self) {
        self.hp = self.max_hp;
    }

    /// Apply damage. Hp floors at zero; the revival flow owns what happens
    /// next. Returns true when this blow is lethal.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.hp = (self.hp - amount.max(0)).max(0);
        self.hp == 0
    }

    fn shift_max_hp(&mut self, delta: i32) {
        self.max_hp = (self.max_hp + delta).max(1);
        self.hp = self.hp.clamp(1, self.max_hp);
    }

    // ------------------------------------------------------------------
    // Economy
    // ------------------------------------------------------------------

    pub fn earn_gold(&mut self, amount: i32) {
        let amount = amount.max(0);
        self.gold += amount;
        self.stats.gold_earned += amount;
    }

    pub fn spend_gold(&mut self, amount: i32) -> Result<(), DomainError> {
        if self.gold < amount {
            return Err(DomainError::constraint(format!(
                "{} gold needed, {} held",
                amount, self.gold
            )));
        }
        self.gold -= amount;
        self.stats.gold_spent += amount;
        Ok(())
    }

    /// Take gold without it counting as spending (trap losses). Floors at 0.
    pub fn lose_gold(&mut self, amount: i32) -> i32 {
        let taken = amount.max(0).min(self.gold);
        self.gold -= taken;
        taken
    }

    // ------------------------------------------------------------------
    // Equipment
    // ------------------------------------------------------------------

    pub fn equipped_weapon(&self) -> Option<&Weapon> {
        self.equipped_weapon.and_then(|i| self.weapons.get(i))
    }

    pub fn equipped_armor(&self) -> Option<&Armor> {
        self.equipped_armor.and_then(|i| self.armors.get(i))
    }

    pub fn equipped_weapon_mut(&mut self) -> Option<&mut Weapon> {
        match self.equipped_weapon {
            Some(i) => self.weapons.get_mut(i),
            None => None,
        }
    }

    pub fn equipped_armor_mut(&mut self) -> Option<&mut Armor> {
        match self.equipped_armor {
            Some(i) => self.armors.get_mut(i),
            None => None,
        }
    }

    pub fn add_weapon(&mut self, weapon: Weapon) -> usize {
        self.weapons.push(weapon);
        self.weapons.len() - 1
    }

    pub fn add_armor(&mut self, armor: Armor) -> usize {
        self.armors.push(armor);
        self.armors.len() - 1
    }

    pub fn equip_weapon(&mut self, index: usize) -> Result<(), DomainError> {
        if index >= self.weapons.len() {
            return Err(DomainError::validation("no such weapon"));
        }
        self.equipped_weapon = Some(index);
        Ok(())
    }

    pub fn equip_armor(&mut self, index: usize) -> Result<(), DomainError> {
        if index >= self.armors.len() {
            return Err(DomainError::validation("no such armor"));
        }
        self.equipped_armor = Some(index);
        Ok(())
    }

    /// Remove a weapon from the inventory (for sale). Equipped weapons
    /// cannot leave; the equipped index is re-pointed when the removal
    /// shifts it.
    pub fn remove_weapon(&mut self, index: usize) -> Result<Weapon, DomainError> {
        if index >= self.weapons.len() {
            return Err(DomainError::validation("no such weapon"));
        }
        if self.equipped_weapon == Some(index) {
            return Err(DomainError::constraint("cannot remove an equipped weapon"));
        }
        let weapon = self.weapons.remove(index);
        if let Some(eq) = self.equipped_weapon {
            if eq > index {
                self.equipped_weapon = Some(eq - 1);
            }
        }
        Ok(weapon)
    }

    pub fn remove_armor(&mut self, index: usize) -> Result<Armor, DomainError> {
        if index >= self.armors.len() {
            return Err(DomainError::validation("no such armor"));
        }
        if self.equipped_armor == Some(index) {
            return Err(DomainError::constraint("cannot remove equipped armor"));
        }
        let armor = self.armors.remove(index);
        if let Some(eq) = self.equipped_armor {
            if eq > index {
                self.equipped_armor = Some(eq - 1);
            }
        }
        Ok(armor)
    }

    // ------------------------------------------------------------------
    // Rings
    // ------------------------------------------------------------------

    /// Bind a ring: the attribute shift applies immediately, and a
    /// Constitution shift moves max HP with it. Returns the applied shift.
    pub fn bind_ring(&mut self, mut ring: Ring, rolled_bonus: i32) -> i32 {
        let applied = self.attributes.shift(ring.attribute, rolled_bonus);
        if ring.attribute == Attribute::Constitution {
            self.shift_max_hp(applied * HP_PER_CON_POINT);
        }
        ring.applied_bonus = applied;
        self.rings.push(ring);
        applied
    }

    /// Unbind for sale, reversing the bound effect.
    pub fn unbind_ring(&mut self, index: usize) -> Result<Ring, DomainError> {
        if index >= self.rings.len() {
            return Err(DomainError::validation("no such ring"));
        }
        if self.rings[index].cursed {
            return Err(DomainError::constraint("the ring is cursed"));
        }
        let ring = self.rings.remove(index);
        let reversed = self.attributes.shift(ring.attribute, -ring.applied_bonus);
        if ring.attribute == Attribute::Constitution {
            self.shift_max_hp(reversed * HP_PER_CON_POINT);
        }
        Ok(ring)
    }

    // ------------------------------------------------------------------
    // Consumables
    // ------------------------------------------------------------------

    pub fn add_potion(&mut self, name: &str) {
        if name == "Healing" {
            self.healing_potions += 1;
        } else {
            *self.potion_uses.entry(name.to_string()).or_insert(0) += 1;
        }
    }

    pub fn potion_count(&self, name: &str) -> i32 {
        if name == "Healing" {
            self.healing_potions
        } else {
            self.potion_uses.get(name).copied().unwrap_or(0)
        }
    }

    /// Consume one use of a named potion. Returns false when none remain.
    pub fn take_potion(&mut self, name: &str) -> bool {
        if name == "Healing" {
            if self.healing_potions == 0 {
                return false;
            }
            self.healing_potions -= 1;
        } else {
            match self.potion_uses.get_mut(name) {
                Some(n) if *n > 0 => *n -= 1,
                _ => return false,
            }
        }
        self.stats.potions_used += 1;
        true
    }

    pub fn add_spell(&mut self, name: &str) {
        *self.spell_uses.entry(name.to_string()).or_insert(0) += 1;
    }

    pub fn spell_count(&self, name: &str) -> i32 {
        self.spell_uses.get(name).copied().unwrap_or(0)
    }

    pub fn take_spell(&mut self, name: &str) -> bool {
        match self.spell_uses.get_mut(name) {
            Some(n) if *n > 0 => *n -= 1,
            _ => return false,
        }
        self.stats.spells_used += 1;
        true
    }

    // ------------------------------------------------------------------
    // Death and revival
    // ------------------------------------------------------------------

    /// Apply the cost of a successful revival: every attribute down one
    /// (floored at 3), hp to 1, depth utilities refreshed.
    pub fn apply_revival(&mut self) {
        self.attributes.penalize_all();
        self.hp = 1;
        self.depth_flags.reset();
    }

    // ------------------------------------------------------------------
    // Save record
    // ------------------------------------------------------------------

    /// The persisted form. Unknown keys on read are ignored; missing
    /// optional keys fall back to defaults.
    pub fn to_record(&self) -> Result<serde_json::Value, DomainError> {
        serde_json::to_value(self).map_err(|e| DomainError::parse(e.to_string()))
    }

    pub fn from_record(record: serde_json::Value) -> Result<Self, DomainError> {
        serde_json::from_value(record).map_err(|e| DomainError::parse(e.to_string()))
    }
}
