//! Review submission to an external document store
//!
//! Posts a JSON artifact per review. When the endpoint env is missing the
//! unconfigured variant is injected instead; the main-menu flow surfaces
//! that as a visible failure without touching gameplay.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

use crate::application::ports::{ReviewError, ReviewSink};

const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Serialize)]
struct ReviewArtifact<'a> {
    rating: u8,
    text: &'a str,
    device_id: &'a str,
    submitted_at: chrono::DateTime<chrono::Utc>,
}

pub struct HttpReviewSink {
    client: Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpReviewSink {
    pub fn new(endpoint: &str, token: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
        }
    }
}

#[async_trait]
impl ReviewSink for HttpReviewSink {
    async fn submit(&self, rating: u8, text: &str, device_id: &str) -> Result<(), ReviewError> {
        let artifact = ReviewArtifact {
            rating,
            text,
            device_id,
            submitted_at: chrono::Utc::now(),
        };

        let mut request = self.client.post(&self.endpoint).json(&artifact);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ReviewError::Submission(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ReviewError::Submission(format!("{}: {}", status, body)));
        }

        tracing::info!(rating, "Review artifact submitted");
        Ok(())
    }
}

/// Injected when no endpoint is configured. Always fails explicitly.
pub struct UnconfiguredReviewSink;

#[async_trait]
impl ReviewSink for UnconfiguredReviewSink {
    async fn submit(&self, _rating: u8, _text: &str, _device_id: &str) -> Result<(), ReviewError> {
        Err(ReviewError::NotConfigured)
    }
}
