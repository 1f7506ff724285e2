//! Entities - the mutable game objects owned by a session

mod character;
mod companion;
mod item;
mod monster;
mod quest;

pub use character::{xp_for_level, Character, RunStats};
pub use companion::Companion;
pub use item::{Armor, Ring, Weapon};
pub use monster::Monster;
pub use quest::{Quest, QuestKind, QUEST_SLOTS};
