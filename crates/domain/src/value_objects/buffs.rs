//! Scoped flag and modifier groups
//!
//! Each group is reset as a unit at its scope boundary: combat start, depth
//! descent, town arrival, or successful revival. Handlers never clear
//! individual fields.

use serde::{Deserialize, Serialize};

/// Positive modifiers active for the current combat only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatBuffs {
    /// Flat bonus added to every damage roll (Strength/Intelligence potions).
    pub damage_bonus: i32,
    /// Flat bonus to armor class (Protection potion).
    pub ac_bonus: i32,
    /// Each charge grants one additional attack on an attack action.
    pub extra_attack_charges: i32,
    /// The next monster attack automatically misses, then the flag clears.
    pub invisibility_one_shot: bool,
}

/// Negative conditions. Used for the player (traps, monster effects) and for
/// the monster (player spells) alike.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatConditions {
    /// Remaining poison ticks; each deals 1d4 at the top of the round.
    pub poison_turns: i32,
    /// Subtracted from every damage roll, min 1 damage still applies.
    pub damage_penalty: i32,
    /// Subtracted from armor class.
    pub ac_penalty: i32,
    /// Turns the combatant loses outright.
    pub freeze_turns: i32,
}

impl CombatConditions {
    pub fn is_poisoned(&self) -> bool {
        self.poison_turns > 0
    }
}

/// Everything on the player that lives exactly one combat.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCombatState {
    /// Examine may be attempted once per combat.
    pub examine_used: bool,
    pub buffs: CombatBuffs,
    pub debuffs: CombatConditions,
}

impl PlayerCombatState {
    /// Reset at combat start. Poison carries across combats until cured or
    /// expired, so it survives the reset.
    pub fn reset_for_combat(&mut self) {
        let poison = self.debuffs.poison_turns;
        *self = Self::default();
        self.debuffs.poison_turns = poison;
    }
}

/// Once-per-depth utilities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthFlags {
    pub divine_used: bool,
    pub listen_used: bool,
}

impl DepthFlags {
    /// Reset on every descent and on post-revival return to town.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Once-per-town-visit services.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TownFlags {
    pub ate: bool,
    pub drank: bool,
    pub prayed: bool,
    pub slept: bool,
    pub rested: bool,
}

impl TownFlags {
    /// Reset when the character arrives in town.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
