//! Engine configuration from environment variables
//!
//! `.env` files are honored via dotenvy in `main`. Optional settings select
//! adapters: a missing `LABYRINTH_DB` means in-memory persistence, a missing
//! `REVIEW_ENDPOINT` means review submission fails explicitly.

const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// TCP port for the HTTP/WebSocket listener.
    pub server_port: u16,
    /// SQLite database path. `None` selects the in-memory stores.
    pub database_path: Option<String>,
    /// External document-store endpoint for review artifacts.
    pub review_endpoint: Option<String>,
    /// Bearer token for the review endpoint.
    pub review_token: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let server_port = std::env::var("LABYRINTH_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        Self {
            server_port,
            database_path: non_empty(std::env::var("LABYRINTH_DB").ok()),
            review_endpoint: non_empty(std::env::var("REVIEW_ENDPOINT").ok()),
            review_token: non_empty(std::env::var("REVIEW_TOKEN").ok()),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
