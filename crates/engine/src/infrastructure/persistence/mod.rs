//! Persistence adapters behind the application ports

mod memory;
mod review;
mod sqlite;

pub use memory::{MemoryLeaderboard, MemorySaveStore};
pub use review::{HttpReviewSink, UnconfiguredReviewSink};
pub use sqlite::{SqliteLeaderboard, SqliteSaveStore};
