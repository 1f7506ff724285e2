//! Outbound ports - interfaces the engine requires from external systems
//!
//! Implementations are chosen at startup and injected; the engine never
//! touches storage or the network directly. Each handler makes at most one
//! port call and the session host awaits it before releasing the session
//! lock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Saved-game store keyed by opaque device id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SaveStore: Send + Sync {
    /// Write (or overwrite) the character record for a device.
    async fn save(&self, device_id: &str, record: serde_json::Value) -> Result<(), StoreError>;

    /// Load the record for a device. `None` means no character.
    async fn load(&self, device_id: &str) -> Result<Option<serde_json::Value>, StoreError>;

    /// Erase the record. Used on unrecoverable death.
    async fn delete(&self, device_id: &str) -> Result<(), StoreError>;
}

/// One Dragon-slayer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub name: String,
    pub level: i32,
    pub difficulty: String,
    pub date: DateTime<Utc>,
    pub monsters_defeated: i32,
    pub quests_completed: i32,
    pub potions_used: i32,
    pub spells_used: i32,
    pub gold_earned: i32,
    pub gold_spent: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weapon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub companion: Option<String>,
}

/// Append-only log of victorious runs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Leaderboard: Send + Sync {
    async fn append(&self, entry: LeaderboardEntry) -> Result<(), StoreError>;

    /// Most recent entries, newest first.
    async fn recent(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    /// The external document store is not configured; gameplay continues.
    #[error("Review submission is not configured")]
    NotConfigured,
    #[error("Review submission failed: {0}")]
    Submission(String),
}

/// Writes player reviews to an external document store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewSink: Send + Sync {
    async fn submit(&self, rating: u8, text: &str, device_id: &str) -> Result<(), ReviewError>;
}
