//! SQLite-backed persistence
//!
//! Records are stored as JSON text; schema is created at connect time.
//! Per-device-id serialization is sufficient for save/load correctness and
//! the single upsert per call provides it.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::application::ports::{Leaderboard, LeaderboardEntry, SaveStore, StoreError};

fn db_err(e: sqlx::Error) -> StoreError {
    StoreError::Database(e.to_string())
}

/// Shared pool holder; both stores can ride the same file.
pub struct SqliteSaveStore {
    pool: SqlitePool,
}

impl SqliteSaveStore {
    pub async fn new(db_path: &str) -> Result<Self, StoreError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(db_err)?;
        Self::with_pool(pool).await
    }

    pub async fn with_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS save_games (
                device_id TEXT PRIMARY KEY,
                record_json TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(db_err)?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl SaveStore for SqliteSaveStore {
    async fn save(&self, device_id: &str, record: serde_json::Value) -> Result<(), StoreError> {
        let json =
            serde_json::to_string(&record).map_err(|e| StoreError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO save_games (device_id, record_json, updated_at)
            VALUES (?, ?, datetime('now'))
            ON CONFLICT(device_id) DO UPDATE SET
                record_json = excluded.record_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(device_id)
        .bind(json)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn load(&self, device_id: &str) -> Result<Option<serde_json::Value>, StoreError> {
        let row = sqlx::query("SELECT record_json FROM save_games WHERE device_id = ?")
            .bind(device_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?;

        match row {
            Some(row) => {
                let json: String = row.get("record_json");
                let record = serde_json::from_str(&json)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, device_id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM save_games WHERE device_id = ?")
            .bind(device_id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}

pub struct SqliteLeaderboard {
    pool: SqlitePool,
}

impl SqliteLeaderboard {
    pub async fn with_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS leaderboard (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                entry_json TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(db_err)?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl Leaderboard for SqliteLeaderboard {
    async fn append(&self, entry: LeaderboardEntry) -> Result<(), StoreError> {
        let json =
            serde_json::to_string(&entry).map_err(|e| StoreError::Serialization(e.to_string()))?;

        sqlx::query("INSERT INTO leaderboard (entry_json) VALUES (?)")
            .bind(json)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    async fn recent(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, StoreError> {
        let rows = sqlx::query("SELECT entry_json FROM leaderboard ORDER BY id DESC LIMIT ?")
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let json: String = row.get("entry_json");
            let entry = serde_json::from_str(&json)
                .map_err(|e| StoreError::Serialization(e.to_string()))?;
            entries.push(entry);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    async fn test_pool() -> (tempfile::TempDir, SqlitePool) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("test.db");
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", path.display()))
            .await
            .expect("pool connects");
        (dir, pool)
    }

    #[tokio::test]
    async fn test_save_round_trip_and_upsert() {
        let (_dir, pool) = test_pool().await;
        let store = SqliteSaveStore::with_pool(pool).await.expect("schema");

        let first = serde_json::json!({"name": "Ada", "gold": 10});
        store.save("dev-1", first).await.expect("saves");

        let second = serde_json::json!({"name": "Ada", "gold": 99});
        store.save("dev-1", second.clone()).await.expect("upserts");

        assert_eq!(store.load("dev-1").await.expect("loads"), Some(second));

        store.delete("dev-1").await.expect("deletes");
        assert_eq!(store.load("dev-1").await.expect("loads"), None);
    }

    #[tokio::test]
    async fn test_leaderboard_orders_newest_first() {
        let (_dir, pool) = test_pool().await;
        let board = SqliteLeaderboard::with_pool(pool).await.expect("schema");

        for (name, level) in [("early", 4), ("late", 6)] {
            board
                .append(LeaderboardEntry {
                    name: name.into(),
                    level,
                    difficulty: "Hard".into(),
                    date: Utc::now(),
                    monsters_defeated: 50,
                    quests_completed: 3,
                    potions_used: 7,
                    spells_used: 2,
                    gold_earned: 900,
                    gold_spent: 700,
                    weapon: Some("Great Sword".into()),
                    armor: None,
                    companion: None,
                })
                .await
                .expect("appends");
        }

        let recent = board.recent(10).await.expect("lists");
        assert_eq!(recent[0].name, "late");
        assert_eq!(recent[1].name, "early");
    }
}
