//! The seven-attribute block and its invariants
//!
//! Every attribute stays at or above 3: the revival penalty and cursed ring
//! effects floor there rather than error.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Minimum value any attribute can reach.
pub const ATTRIBUTE_FLOOR: i32 = 3;

/// Total attribute trainings allowed over a character's life.
pub const TRAINING_CAP: u32 = 7;

/// One of the seven character attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
    Perception,
}

impl Attribute {
    pub const ALL: [Attribute; 7] = [
        Attribute::Strength,
        Attribute::Dexterity,
        Attribute::Constitution,
        Attribute::Intelligence,
        Attribute::Wisdom,
        Attribute::Charisma,
        Attribute::Perception,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Attribute::Strength => "Strength",
            Attribute::Dexterity => "Dexterity",
            Attribute::Constitution => "Constitution",
            Attribute::Intelligence => "Intelligence",
            Attribute::Wisdom => "Wisdom",
            Attribute::Charisma => "Charisma",
            Attribute::Perception => "Perception",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Attribute {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Attribute::ALL
            .into_iter()
            .find(|a| a.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::parse(format!("unknown attribute '{}'", s)))
    }
}

/// The attribute scores themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attributes {
    strength: i32,
    dexterity: i32,
    constitution: i32,
    intelligence: i32,
    wisdom: i32,
    charisma: i32,
    perception: i32,
}

impl Default for Attributes {
    fn default() -> Self {
        Self::uniform(ATTRIBUTE_FLOOR)
    }
}

impl Attributes {
    /// All seven scores set to the same value (clamped to the floor).
    pub fn uniform(value: i32) -> Self {
        let v = value.max(ATTRIBUTE_FLOOR);
        Self {
            strength: v,
            dexterity: v,
            constitution: v,
            intelligence: v,
            wisdom: v,
            charisma: v,
            perception: v,
        }
    }

    pub fn get(&self, attr: Attribute) -> i32 {
        match attr {
            Attribute::Strength => self.strength,
            Attribute::Dexterity => self.dexterity,
            Attribute::Constitution => self.constitution,
            Attribute::Intelligence => self.intelligence,
            Attribute::Wisdom => self.wisdom,
            Attribute::Charisma => self.charisma,
            Attribute::Perception => self.perception,
        }
    }

    /// Set a score directly, clamped to the floor. Used during creation when
    /// rolled values are assigned.
    pub fn set(&mut self, attr: Attribute, value: i32) {
        let v = value.max(ATTRIBUTE_FLOOR);
        match attr {
            Attribute::Strength => self.strength = v,
            Attribute::Dexterity => self.dexterity = v,
            Attribute::Constitution => self.constitution = v,
            Attribute::Intelligence => self.intelligence = v,
            Attribute::Wisdom => self.wisdom = v,
            Attribute::Charisma => self.charisma = v,
            Attribute::Perception => self.perception = v,
        }
    }

    /// Shift a score by `delta` (positive or negative), flooring at 3.
    /// Returns the applied change, which may be smaller than requested when
    /// the floor cuts it short.
    pub fn shift(&mut self, attr: Attribute, delta: i32) -> i32 {
        let before = self.get(attr);
        let after = (before + delta).max(ATTRIBUTE_FLOOR);
        self.set(attr, after);
        after - before
    }

    /// The revival penalty: every score drops by one unless already at the
    /// floor.
    pub fn penalize_all(&mut self) {
        for attr in Attribute::ALL {
            self.shift(attr, -1);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Attribute, i32)> + '_ {
        Attribute::ALL.into_iter().map(|a| (a, self.get(a)))
    }
}

/// How many times each attribute has been trained at the town trainer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingLedger {
    strength: u32,
    dexterity: u32,
    constitution: u32,
    intelligence: u32,
    wisdom: u32,
    charisma: u32,
    perception: u32,
}

impl TrainingLedger {
    pub fn total(&self) -> u32 {
        self.strength
            + self.dexterity
            + self.constitution
            + self.intelligence
            + self.wisdom
            + self.charisma
            + self.perception
    }

    pub fn count(&self, attr: Attribute) -> u32 {
        match attr {
            Attribute::Strength => self.strength,
            Attribute::Dexterity => self.dexterity,
            Attribute::Constitution => self.constitution,
            Attribute::Intelligence => self.intelligence,
            Attribute::Wisdom => self.wisdom,
            Attribute::Charisma => self.charisma,
            Attribute::Perception => self.perception,
        }
    }

    /// Record one training session. Fails once the lifetime cap is reached.
    pub fn record(&mut self, attr: Attribute) -> Result<(), DomainError> {
        if self.total() >= TRAINING_CAP {
            return Err(DomainError::constraint(format!(
                "training cap of {} reached",
                TRAINING_CAP
            )));
        }
        match attr {
            Attribute::Strength => self.strength += 1,
            Attribute::Dexterity => self.dexterity += 1,
            Attribute::Constitution => self.constitution += 1,
            Attribute::Intelligence => self.intelligence += 1,
            Attribute::Wisdom => self.wisdom += 1,
            Attribute::Charisma => self.charisma += 1,
            Attribute::Perception => self.perception += 1,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_attribute_case_insensitive() {
        assert_eq!(
            "wisdom".parse::<Attribute>().expect("parses"),
            Attribute::Wisdom
        );
        assert_eq!(
            "Perception".parse::<Attribute>().expect("parses"),
            Attribute::Perception
        );
        assert!("Luck".parse::<Attribute>().is_err());
    }

    #[test]
    fn test_shift_floors_at_three() {
        let mut attrs = Attributes::uniform(4);
        let applied = attrs.shift(Attribute::Strength, -5);
        assert_eq!(attrs.get(Attribute::Strength), 3);
        assert_eq!(applied, -1);
    }

    #[test]
    fn test_penalize_all_leaves_floor_untouched() {
        let mut attrs = Attributes::uniform(10);
        attrs.set(Attribute::Charisma, 3);
        attrs.penalize_all();
        assert_eq!(attrs.get(Attribute::Strength), 9);
        assert_eq!(attrs.get(Attribute::Charisma), 3);
    }

    #[test]
    fn test_training_cap_enforced() {
        let mut ledger = TrainingLedger::default();
        for _ in 0..TRAINING_CAP {
            ledger.record(Attribute::Strength).expect("under cap");
        }
        assert!(ledger.record(Attribute::Wisdom).is_err());
        assert_eq!(ledger.total(), TRAINING_CAP);
        assert_eq!(ledger.count(Attribute::Strength), TRAINING_CAP);
    }
}
