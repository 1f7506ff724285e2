//! Run difficulty and its creation-roll dice

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::DieFormula;

/// Difficulty chosen before character creation. It only affects the dice
/// used to roll the seven attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Normal
    }
}

impl Difficulty {
    /// The dice rolled per attribute at creation.
    pub fn creation_dice(&self) -> DieFormula {
        let (count, sides) = match self {
            Difficulty::Easy => (6, 5),
            Difficulty::Normal => (5, 5),
            Difficulty::Hard => (4, 5),
        };
        DieFormula { count, sides }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Difficulty {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => Err(DomainError::parse(format!(
                "unknown difficulty '{}'",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creation_dice_by_difficulty() {
        assert_eq!(Difficulty::Easy.creation_dice().to_string(), "6d5");
        assert_eq!(Difficulty::Normal.creation_dice().to_string(), "5d5");
        assert_eq!(Difficulty::Hard.creation_dice().to_string(), "4d5");
    }

    #[test]
    fn test_parse() {
        assert_eq!("hard".parse::<Difficulty>().expect("parses"), Difficulty::Hard);
        assert!("brutal".parse::<Difficulty>().is_err());
    }
}
