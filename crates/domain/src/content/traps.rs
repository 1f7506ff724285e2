//! Trap table
//!
//! A failed dodge always applies the trap's damage die; the effect rides on
//! top. The damage can be lethal and hand the player to the revival flow.

use crate::value_objects::Attribute;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapEffect {
    /// Damage only.
    Damage,
    /// Poison debuff: 1d4 per round for `turns` rounds.
    Poison { turns: i32 },
    /// Dissolves carried gold (floored at zero).
    GoldDust { amount: i32 },
    /// Flavor only; the narration mentions the weapon, nothing changes.
    RustWeapon,
    /// Permanent attribute loss, floored at 3.
    AttributeDown { attribute: Attribute, amount: i32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrapRow {
    pub name: &'static str,
    /// Dodge DC against 5d4 + ceil(DEX/2).
    pub dc: i32,
    pub die: &'static str,
    pub effect: TrapEffect,
    pub flavor: &'static str,
}

#[derive(Debug)]
pub struct TrapTable {
    rows: Vec<TrapRow>,
}

impl TrapTable {
    pub fn builtin() -> Self {
        Self {
            rows: vec![
                TrapRow {
                    name: "Spike Pit",
                    dc: 16,
                    die: "2d6",
                    effect: TrapEffect::Damage,
                    flavor: "The floor gives way onto rusted spikes.",
                },
                TrapRow {
                    name: "Dart Volley",
                    dc: 17,
                    die: "1d8",
                    effect: TrapEffect::Damage,
                    flavor: "Hidden slits cough a volley of darts.",
                },
                TrapRow {
                    name: "Poison Needle",
                    dc: 18,
                    die: "1d4",
                    effect: TrapEffect::Poison { turns: 3 },
                    flavor: "A needle pricks your palm. The wound blackens.",
                },
                TrapRow {
                    name: "Gold Dust Hex",
                    dc: 15,
                    die: "1d2",
                    effect: TrapEffect::GoldDust { amount: 30 },
                    flavor: "A glyph flares, and your purse feels lighter.",
                },
                TrapRow {
                    name: "Rusting Mist",
                    dc: 14,
                    die: "1d2",
                    effect: TrapEffect::RustWeapon,
                    flavor: "Red mist beads on your blade and drips away.",
                },
                TrapRow {
                    name: "Ankle Snare",
                    dc: 16,
                    die: "1d4",
                    effect: TrapEffect::AttributeDown {
                        attribute: Attribute::Dexterity,
                        amount: 1,
                    },
                    flavor: "A wire snaps taut around your ankle.",
                },
            ],
        }
    }

    pub fn all(&self) -> &[TrapRow] {
        &self.rows
    }

    pub fn by_name(&self, name: &str) -> Option<&TrapRow> {
        self.rows.iter().find(|r| r.name == name)
    }

    /// Uniform pick; traps carry no weight column.
    pub fn random_pick(&self, dice: &mut dyn crate::value_objects::DiceSource) -> Option<&TrapRow> {
        if self.rows.is_empty() {
            return None;
        }
        let i = dice.range(0, self.rows.len() as i32 - 1) as usize;
        self.rows.get(i)
    }
}
