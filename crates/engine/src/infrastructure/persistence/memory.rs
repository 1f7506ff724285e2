//! In-memory persistence adapters
//!
//! The default for development runs and the workhorse of the test suite.
//! Per-device serialization comes for free from the RwLock.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::{Leaderboard, LeaderboardEntry, SaveStore, StoreError};

#[derive(Default)]
pub struct MemorySaveStore {
    records: RwLock<HashMap<String, serde_json::Value>>,
}

impl MemorySaveStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SaveStore for MemorySaveStore {
    async fn save(&self, device_id: &str, record: serde_json::Value) -> Result<(), StoreError> {
        self.records
            .write()
            .await
            .insert(device_id.to_string(), record);
        Ok(())
    }

    async fn load(&self, device_id: &str) -> Result<Option<serde_json::Value>, StoreError> {
        Ok(self.records.read().await.get(device_id).cloned())
    }

    async fn delete(&self, device_id: &str) -> Result<(), StoreError> {
        self.records.write().await.remove(device_id);
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryLeaderboard {
    entries: RwLock<Vec<LeaderboardEntry>>,
}

impl MemoryLeaderboard {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Leaderboard for MemoryLeaderboard {
    async fn append(&self, entry: LeaderboardEntry) -> Result<(), StoreError> {
        self.entries.write().await.push(entry);
        Ok(())
    }

    async fn recent(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries.iter().rev().take(limit as usize).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_save_load_delete_round_trip() {
        let store = MemorySaveStore::new();
        let record = serde_json::json!({"name": "Ada"});
        store.save("dev-1", record.clone()).await.expect("saves");
        assert_eq!(store.load("dev-1").await.expect("loads"), Some(record));
        store.delete("dev-1").await.expect("deletes");
        assert_eq!(store.load("dev-1").await.expect("loads"), None);
    }

    #[tokio::test]
    async fn test_recent_returns_newest_first() {
        let board = MemoryLeaderboard::new();
        for name in ["first", "second", "third"] {
            board
                .append(LeaderboardEntry {
                    name: name.to_string(),
                    level: 5,
                    difficulty: "Normal".into(),
                    date: Utc::now(),
                    monsters_defeated: 10,
                    quests_completed: 1,
                    potions_used: 2,
                    spells_used: 0,
                    gold_earned: 400,
                    gold_spent: 300,
                    weapon: None,
                    armor: None,
                    companion: None,
                })
                .await
                .expect("appends");
        }
        let recent = board.recent(2).await.expect("lists");
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].name, "third");
        assert_eq!(recent[1].name, "second");
    }
}
