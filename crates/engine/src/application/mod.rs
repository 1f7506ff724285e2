//! Application layer - ports required from the outside world

pub mod ports;

pub use ports::{Leaderboard, LeaderboardEntry, ReviewError, ReviewSink, SaveStore, StoreError};
