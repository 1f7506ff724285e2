//! Dice formulas and the randomness seam
//!
//! Content tables carry damage dice as strings like "2d6" or "8d7". Parsing
//! is manual to keep this crate dependency-free; the actual random source is
//! injected through [`DiceSource`] so rules stay deterministic under test.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error when parsing a dice formula
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceParseError {
    /// The formula string is empty
    #[error("Empty dice formula")]
    Empty,
    /// Invalid format - expected NdM
    #[error("Invalid dice format: {0}")]
    InvalidFormat(String),
    /// Dice count must be at least 1
    #[error("Dice count must be at least 1")]
    InvalidDiceCount,
    /// Die size must be at least 2
    #[error("Die size must be at least 2")]
    InvalidDieSize,
}

/// A parsed dice formula like "2d6"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DieFormula {
    /// Number of dice to roll (N in NdM)
    pub count: u32,
    /// Size of each die (M in NdM)
    pub sides: u32,
}

impl DieFormula {
    pub fn new(count: u32, sides: u32) -> Result<Self, DiceParseError> {
        if count == 0 {
            return Err(DiceParseError::InvalidDiceCount);
        }
        if sides < 2 {
            return Err(DiceParseError::InvalidDieSize);
        }
        Ok(Self { count, sides })
    }

    /// The substitute used when a content table carries a malformed die
    /// string. The caller is responsible for logging the substitution.
    pub fn fallback() -> Self {
        Self { count: 1, sides: 4 }
    }

    /// Parse a dice formula string like "2d6" or "d8" (shorthand for 1d8).
    pub fn parse(input: &str) -> Result<Self, DiceParseError> {
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            return Err(DiceParseError::Empty);
        }

        let d_pos = input.find('d').ok_or_else(|| {
            DiceParseError::InvalidFormat(format!("Missing 'd' separator in '{}'", input))
        })?;

        let count_str = &input[..d_pos];
        let count: u32 = if count_str.is_empty() {
            1
        } else {
            count_str.parse().map_err(|_| {
                DiceParseError::InvalidFormat(format!("Invalid dice count: '{}'", count_str))
            })?
        };

        let sides_str = &input[d_pos + 1..];
        let sides: u32 = sides_str.parse().map_err(|_| {
            DiceParseError::InvalidFormat(format!("Invalid die size: '{}'", sides_str))
        })?;

        Self::new(count, sides)
    }

    /// Roll the formula against the given source.
    pub fn roll_with(&self, dice: &mut dyn DiceSource) -> i32 {
        dice.roll(self.count, self.sides)
    }
}

impl fmt::Display for DieFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)
    }
}

/// The randomness seam.
///
/// Production sessions use an entropy-seeded implementation in the engine
/// crate; tests script exact faces or seed explicitly.
pub trait DiceSource: Send {
    /// Sum of `count` independent uniform draws in `[1, sides]`.
    fn roll(&mut self, count: u32, sides: u32) -> i32;

    /// Uniform integer in `[lo, hi]` inclusive.
    fn range(&mut self, lo: i32, hi: i32) -> i32;

    /// Uniform float in `[0, 1)`.
    fn fraction(&mut self) -> f64;

    /// True with probability `p`.
    fn chance(&mut self, p: f64) -> bool {
        self.fraction() < p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let f = DieFormula::parse("2d6").expect("valid formula");
        assert_eq!(f.count, 2);
        assert_eq!(f.sides, 6);
    }

    #[test]
    fn test_parse_shorthand() {
        let f = DieFormula::parse("d8").expect("valid formula");
        assert_eq!(f.count, 1);
        assert_eq!(f.sides, 8);
    }

    #[test]
    fn test_parse_case_and_whitespace() {
        let f = DieFormula::parse("  8D7 ").expect("valid formula");
        assert_eq!(f.count, 8);
        assert_eq!(f.sides, 7);
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(DieFormula::parse(""), Err(DiceParseError::Empty)));
    }

    #[test]
    fn test_parse_missing_separator() {
        assert!(matches!(
            DieFormula::parse("20"),
            Err(DiceParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_zero_dice() {
        assert!(matches!(
            DieFormula::parse("0d6"),
            Err(DiceParseError::InvalidDiceCount)
        ));
    }

    #[test]
    fn test_parse_die_size_too_small() {
        assert!(matches!(
            DieFormula::parse("1d1"),
            Err(DiceParseError::InvalidDieSize)
        ));
    }

    #[test]
    fn test_fallback_is_1d4() {
        assert_eq!(DieFormula::fallback().to_string(), "1d4");
    }

    #[test]
    fn test_display_round_trip() {
        let f = DieFormula::parse("5d4").expect("valid formula");
        assert_eq!(f.to_string(), "5d4");
    }
}
