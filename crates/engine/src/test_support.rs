//! Shared test fixtures
//!
//! `ScriptedDice` drives the rules and the full engine deterministically:
//! queued values pop in order, and exhausted queues fall back to midline
//! rolls, low range picks, and "never" fractions so drop rolls stay quiet
//! unless a test scripts them.

use std::collections::VecDeque;

use labyrinth_domain::DiceSource;

#[derive(Debug, Default)]
pub struct ScriptedDice {
    rolls: VecDeque<i32>,
    ranges: VecDeque<i32>,
    fractions: VecDeque<f64>,
}

impl ScriptedDice {
    pub fn new(rolls: Vec<i32>) -> Self {
        Self {
            rolls: rolls.into(),
            ..Self::default()
        }
    }

    pub fn queue_rolls(&mut self, rolls: impl IntoIterator<Item = i32>) {
        self.rolls.extend(rolls);
    }

    pub fn queue_ranges(&mut self, values: impl IntoIterator<Item = i32>) {
        self.ranges.extend(values);
    }

    pub fn queue_fractions(&mut self, values: impl IntoIterator<Item = f64>) {
        self.fractions.extend(values);
    }
}

impl DiceSource for ScriptedDice {
    fn roll(&mut self, count: u32, sides: u32) -> i32 {
        self.rolls
            .pop_front()
            .unwrap_or_else(|| (count * (sides + 1) / 2) as i32)
    }

    fn range(&mut self, lo: i32, _hi: i32) -> i32 {
        self.ranges.pop_front().unwrap_or(lo)
    }

    fn fraction(&mut self) -> f64 {
        self.fractions.pop_front().unwrap_or(1.0)
    }
}

/// A handle-cloneable wrapper so a test can keep queueing values after the
/// engine has taken ownership of its dice.
#[derive(Clone, Default)]
pub struct SharedDice(pub std::sync::Arc<std::sync::Mutex<ScriptedDice>>);

impl SharedDice {
    pub fn queue_rolls(&self, rolls: impl IntoIterator<Item = i32>) {
        if let Ok(mut dice) = self.0.lock() {
            dice.queue_rolls(rolls);
        }
    }

    pub fn queue_ranges(&self, values: impl IntoIterator<Item = i32>) {
        if let Ok(mut dice) = self.0.lock() {
            dice.queue_ranges(values);
        }
    }

    pub fn queue_fractions(&self, values: impl IntoIterator<Item = f64>) {
        if let Ok(mut dice) = self.0.lock() {
            dice.queue_fractions(values);
        }
    }
}

impl DiceSource for SharedDice {
    fn roll(&mut self, count: u32, sides: u32) -> i32 {
        match self.0.lock() {
            Ok(mut dice) => dice.roll(count, sides),
            Err(_) => (count * (sides + 1) / 2) as i32,
        }
    }

    fn range(&mut self, lo: i32, _hi: i32) -> i32 {
        match self.0.lock() {
            Ok(mut dice) => dice.range(lo, _hi),
            Err(_) => lo,
        }
    }

    fn fraction(&mut self) -> f64 {
        match self.0.lock() {
            Ok(mut dice) => dice.fraction(),
            Err(_) => 1.0,
        }
    }
}
