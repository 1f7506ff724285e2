//! Labyrinth Domain - Core game types, value objects, and invariants
//!
//! This crate is IO-free and synchronous. Randomness enters through the
//! [`DiceSource`] trait so that every rule is deterministic under test.

pub mod content;
pub mod entities;
pub mod error;
pub mod value_objects;

pub use content::ContentTables;
pub use entities::{
    xp_for_level, Armor, Character, Companion, Monster, Quest, QuestKind, Ring, RunStats, Weapon,
    QUEST_SLOTS,
};
pub use error::DomainError;
pub use value_objects::{
    Attribute, Attributes, CombatBuffs, CombatConditions, DepthFlags, DiceParseError, DiceSource,
    DieFormula, Difficulty, PlayerCombatState, TownFlags, TrainingLedger, Zone,
};
