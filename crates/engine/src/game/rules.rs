//! Combat and check resolution rules
//!
//! Every check in the game rides a 5d4 roll plus a modifier. A raw 20 is a
//! critical, a raw 5 an automatic failure; attack fumbles additionally cost
//! the attacker a 1d4 self-injury. Nothing in this module does IO or owns
//! state; callers apply the results.

use labyrinth_domain::{
    Attribute, Character, DiceSource, DieFormula, Monster, Zone,
};

pub const CHECK_DICE: (u32, u32) = (5, 4);
pub const CHECK_MAX: i32 = 20;
pub const CHECK_MIN: i32 = 5;

/// Unarmored defense bonus when no armor is equipped.
pub const UNARMORED_BONUS: i32 = 5;

/// Chance per resolved attack that gear takes damage.
pub const GEAR_DEGRADE_CHANCE: f64 = 0.05;

/// Flat chance of a magic gear drop on a kill.
pub const GEAR_DROP_CHANCE: f64 = 0.25;

/// Smith fee per damaged piece.
pub const REPAIR_COST: i32 = 30;

/// Temple fee per cursed item.
pub const CLEANSE_COST: i32 = 10;

pub fn ceil_half(v: i32) -> i32 {
    (v + 1).div_euclid(2)
}

/// One 5d4 check with its modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckRoll {
    pub raw: i32,
    pub modifier: i32,
}

impl CheckRoll {
    pub fn total(&self) -> i32 {
        self.raw + self.modifier
    }

    pub fn is_critical(&self) -> bool {
        self.raw == CHECK_MAX
    }

    pub fn is_fumble(&self) -> bool {
        self.raw == CHECK_MIN
    }
}

pub fn check(dice: &mut dyn DiceSource, modifier: i32) -> CheckRoll {
    let (count, sides) = CHECK_DICE;
    CheckRoll {
        raw: dice.roll(count, sides),
        modifier,
    }
}

/// Player armor class: `10 + ceil(CON/2) + armor`, +5 unarmored, modified by
/// per-combat buffs and debuffs.
pub fn player_armor_class(character: &Character) -> i32 {
    let armor = character
        .equipped_armor()
        .map(|a| a.effective_class())
        .unwrap_or(UNARMORED_BONUS);
    10 + ceil_half(character.attribute(Attribute::Constitution)) + armor
        + character.combat.buffs.ac_bonus
        - character.combat.debuffs.ac_penalty
}

/// True when the player acts first. Ties favor the player.
pub fn player_wins_initiative(dice: &mut dyn DiceSource, character: &Character, monster: &Monster) -> bool {
    let player = check(dice, character.attribute(Attribute::Dexterity)).total();
    let enemy = check(dice, monster.dex).total();
    player >= enemy
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    /// Raw 5: the swing goes wrong and the attacker takes the self-injury.
    Fumble { self_damage: i32 },
    /// The defender's block zone matched a non-critical hit.
    Blocked,
    Miss,
    Hit { damage: i32, critical: bool },
}

impl AttackOutcome {
    /// Degradation applies to attacks that connected with gear: landed hits
    /// and blocked swings.
    pub fn wears_gear(&self) -> bool {
        matches!(self, AttackOutcome::Hit { .. } | AttackOutcome::Blocked)
    }
}

/// The player's equipped damage die, or bare fists (1d2). Malformed table
/// strings fall back to 1d4 with a warning.
pub fn player_damage_die(character: &Character) -> (DieFormula, bool) {
    match character.equipped_weapon() {
        Some(weapon) => (parse_die_lenient(&weapon.damage_die), weapon.damaged),
        None => (DieFormula { count: 1, sides: 2 }, false),
    }
}

pub fn parse_die_lenient(raw: &str) -> DieFormula {
    DieFormula::parse(raw).unwrap_or_else(|e| {
        tracing::warn!(die = raw, error = %e, "Malformed damage die in content, substituting 1d4");
        DieFormula::fallback()
    })
}

/// Resolve the player's attack roll against the monster.
pub fn resolve_player_attack(
    dice: &mut dyn DiceSource,
    character: &Character,
    monster: &Monster,
    aim: Zone,
    monster_block: Zone,
) -> (CheckRoll, AttackOutcome) {
    let roll = check(dice, character.attribute(Attribute::Strength));
    if roll.is_fumble() {
        let self_damage = dice.roll(1, 4);
        return (roll, AttackOutcome::Fumble { self_damage });
    }
    let critical = roll.is_critical();
    if roll.total() < monster.effective_ac() {
        return (roll, AttackOutcome::Miss);
    }
    // Criticals punch through a matched block.
    if !critical && aim == monster_block {
        return (roll, AttackOutcome::Blocked);
    }

    let (die, damaged) = player_damage_die(character);
    let mut damage = die.roll_with(dice)
        + ceil_half(character.attribute(Attribute::Strength))
        + character.combat.buffs.damage_bonus;
    if damaged {
        damage = (damage / 2).max(1);
    }
    if critical {
        damage = damage * 3 / 2;
    }
    (
        roll,
        AttackOutcome::Hit {
            damage: damage.max(1),
            critical,
        },
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonsterAttackOutcome {
    /// Consumed the player's invisibility buff.
    ForcedMiss,
    Fumble { self_damage: i32 },
    Blocked,
    Miss,
    Hit { damage: i32, critical: bool },
}

impl MonsterAttackOutcome {
    /// Armor wears when the player is struck or blocks the blow.
    pub fn wears_armor(&self) -> bool {
        matches!(
            self,
            MonsterAttackOutcome::Hit { .. } | MonsterAttackOutcome::Blocked
        )
    }
}

/// Resolve one monster attack against the player. `invisible` is consumed by
/// the caller when this returns `ForcedMiss`.
pub fn resolve_monster_attack(
    dice: &mut dyn DiceSource,
    monster: &Monster,
    character: &Character,
    monster_aim: Zone,
    player_block: Zone,
    invisible: bool,
) -> (CheckRoll, MonsterAttackOutcome) {
    let roll = check(dice, monster.strength / 2);
    if invisible {
        return (roll, MonsterAttackOutcome::ForcedMiss);
    }
    if roll.is_fumble() {
        let self_damage = dice.roll(1, 4);
        return (roll, MonsterAttackOutcome::Fumble { self_damage });
    }
    let critical = roll.is_critical();
    if roll.total() < player_armor_class(character) {
        return (roll, MonsterAttackOutcome::Miss);
    }
    if !critical && monster_aim == player_block {
        return (roll, MonsterAttackOutcome::Blocked);
    }

    let mut damage = (monster.damage_die.roll_with(dice) - monster.conditions.damage_penalty).max(1);
    if critical {
        damage = damage * 3 / 2;
    }
    (
        roll,
        MonsterAttackOutcome::Hit {
            damage: damage.max(1),
            critical,
        },
    )
}

// ----------------------------------------------------------------------
// Utility checks. A raw 5 fails any of these outright.
// ----------------------------------------------------------------------

/// Examine: `5d4 + WIS > 25` reveals the monster. Does not end the turn.
pub fn examine_succeeds(roll: CheckRoll) -> bool {
    !roll.is_fumble() && roll.total() > 25
}

/// Divine aid: `5d4 + (WIS - 10) >= 12`. The damage (or out-of-combat
/// healing) die depends on the margin.
pub fn divine_die(roll: CheckRoll) -> Option<DieFormula> {
    if roll.is_fumble() || roll.total() < 12 {
        return None;
    }
    let sides = 6;
    let count = if roll.total() <= 15 { 3 } else { 4 };
    Some(DieFormula { count, sides })
}

/// Charm difficulty scales with the monster. Dragons are immune; callers
/// never offer the option against one.
pub fn charm_dc(monster: &Monster) -> i32 {
    20 + monster.difficulty / 2
}

pub fn charm_succeeds(roll: CheckRoll, monster: &Monster) -> bool {
    !roll.is_fumble() && roll.total() >= charm_dc(monster)
}

pub fn flee_succeeds(roll: CheckRoll, monster: &Monster) -> bool {
    !roll.is_fumble() && roll.total() > 15 + ceil_half(monster.dex)
}

// ----------------------------------------------------------------------
// Rewards
// ----------------------------------------------------------------------

/// The only place depth touches numbers: kills and charms pay
/// `base * (1 + 0.5 * (depth - 1))`. Monster stats never scale.
pub fn depth_multiplier(depth: i32) -> f64 {
    1.0 + 0.5 * (depth.max(1) - 1) as f64
}

pub fn scale_reward(base: i32, multiplier: f64) -> i32 {
    (base as f64 * multiplier).floor() as i32
}

/// Potion and scroll drop chance, capped at 20%.
pub fn consumable_drop_chance(difficulty: i32) -> f64 {
    (0.05 + 0.01 * difficulty as f64).min(0.20)
}

/// Spell damage after the target's innate resistance.
pub fn resisted_spell_damage(rolled: i32, spell_resistance: i32) -> i32 {
    (rolled - spell_resistance.max(0)).max(0)
}
