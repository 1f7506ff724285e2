//! Body zones for aimed attacks and blocks
//!
//! The attacker declares an aim zone, the defender a block zone; matching
//! zones stop non-critical hits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Zone {
    Head,
    Torso,
    Legs,
}

impl Default for Zone {
    fn default() -> Self {
        Zone::Torso
    }
}

impl Zone {
    pub const ALL: [Zone; 3] = [Zone::Head, Zone::Torso, Zone::Legs];

    pub fn label(&self) -> &'static str {
        match self {
            Zone::Head => "Head",
            Zone::Torso => "Torso",
            Zone::Legs => "Legs",
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Zone {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "head" => Ok(Zone::Head),
            "torso" => Ok(Zone::Torso),
            "legs" => Ok(Zone::Legs),
            other => Err(DomainError::parse(format!("unknown zone '{}'", other))),
        }
    }
}
