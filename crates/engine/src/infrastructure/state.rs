//! Application state wiring
//!
//! Adapter selection happens once, here: a configured database path swaps
//! the in-memory stores for SQLite, a configured endpoint arms the review
//! submitter. The engine sees only the ports.

use std::sync::Arc;

use labyrinth_domain::ContentTables;

use crate::application::ports::{Leaderboard, ReviewSink, SaveStore};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::persistence::{
    HttpReviewSink, MemoryLeaderboard, MemorySaveStore, SqliteLeaderboard, SqliteSaveStore,
    UnconfiguredReviewSink,
};
use crate::infrastructure::session::SessionHost;

pub struct AppState {
    pub config: AppConfig,
    pub host: SessionHost,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let content = Arc::new(ContentTables::builtin());

        let (save_store, leaderboard): (Arc<dyn SaveStore>, Arc<dyn Leaderboard>) =
            match &config.database_path {
                Some(path) => {
                    let save = SqliteSaveStore::new(path).await?;
                    let board = SqliteLeaderboard::with_pool(save.pool().clone()).await?;
                    tracing::info!(path, "SQLite persistence selected");
                    (Arc::new(save), Arc::new(board))
                }
                None => {
                    tracing::info!("In-memory persistence selected (no LABYRINTH_DB set)");
                    (
                        Arc::new(MemorySaveStore::new()),
                        Arc::new(MemoryLeaderboard::new()),
                    )
                }
            };

        let review_sink: Arc<dyn ReviewSink> = match &config.review_endpoint {
            Some(endpoint) => {
                tracing::info!(endpoint, "Review submission armed");
                Arc::new(HttpReviewSink::new(endpoint, config.review_token.clone()))
            }
            None => Arc::new(UnconfiguredReviewSink),
        };

        let host = SessionHost::new(content, save_store, leaderboard, review_sink);
        Ok(Self { config, host })
    }
}
