//! Value objects - small immutable types with validation

mod attributes;
mod buffs;
mod dice;
mod difficulty;
mod zone;

pub use attributes::{Attribute, Attributes, TrainingLedger, ATTRIBUTE_FLOOR, TRAINING_CAP};
pub use buffs::{CombatBuffs, CombatConditions, DepthFlags, PlayerCombatState, TownFlags};
pub use dice::{DiceParseError, DiceSource, DieFormula};
pub use difficulty::Difficulty;
pub use zone::Zone;
