//! Session host
//!
//! One engine per device id. The per-session mutex is the ordering
//! guarantee: every event from action N ships before anything from action
//! N+1, and persistence calls finish before the lock releases. Sessions
//! are retained on disconnect so the same device can pick up where it
//! left off.

use std::sync::Arc;

use dashmap::DashMap;
use labyrinth_domain::ContentTables;
use labyrinth_shared::ServerMessage;
use tokio::sync::Mutex;

use crate::application::ports::{Leaderboard, ReviewSink, SaveStore};
use crate::game::GameEngine;
use crate::infrastructure::dice::SessionDice;

pub struct SessionHost {
    content: Arc<ContentTables>,
    save_store: Arc<dyn SaveStore>,
    leaderboard: Arc<dyn Leaderboard>,
    review_sink: Arc<dyn ReviewSink>,
    sessions: DashMap<String, Arc<Mutex<GameEngine>>>,
}

impl SessionHost {
    pub fn new(
        content: Arc<ContentTables>,
        save_store: Arc<dyn SaveStore>,
        leaderboard: Arc<dyn Leaderboard>,
        review_sink: Arc<dyn ReviewSink>,
    ) -> Self {
        Self {
            content,
            save_store,
            leaderboard,
            review_sink,
            sessions: DashMap::new(),
        }
    }

    fn session(&self, device_id: &str) -> Arc<Mutex<GameEngine>> {
        self.sessions
            .entry(device_id.to_string())
            .or_insert_with(|| {
                tracing::info!(device = device_id, "New session created");
                Arc::new(Mutex::new(GameEngine::new(
                    device_id,
                    self.content.clone(),
                    self.save_store.clone(),
                    self.leaderboard.clone(),
                    self.review_sink.clone(),
                    Box::new(SessionDice::from_entropy()),
                )))
            })
            .clone()
    }

    /// A device joined (or rejoined): emit its opening screen.
    pub async fn open_session(&self, device_id: &str) -> Vec<ServerMessage> {
        let session = self.session(device_id);
        let mut engine = session.lock().await;
        engine.welcome().await
    }

    /// Dispatch one action under the session lock.
    pub async fn handle_action(
        &self,
        device_id: &str,
        action_id: &str,
        value: Option<String>,
    ) -> Vec<ServerMessage> {
        let session = self.session(device_id);
        let mut engine = session.lock().await;
        engine.dispatch(action_id, value).await
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
