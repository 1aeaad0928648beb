//! Sync Client
//!
//! Pushes completion records to the sync service. Local progress is
//! authoritative: a failed push is logged and dropped, never retried.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use crate::network::protocol::{ErrorBody, SyncRequest};
use crate::progress::state::CompletionRecord;

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Sync push failure.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Connection, timeout, or body error.
    #[error("sync transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("sync rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// `error` field of the body, if any.
        message: String,
    },
}

/// Client for `POST /api/sync`.
#[derive(Debug, Clone)]
pub struct SyncClient {
    base_url: String,
    http: reqwest::Client,
}

impl SyncClient {
    /// Client for a service base URL such as `http://localhost:5000`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, SyncError> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Full sync endpoint URL.
    pub fn sync_url(&self) -> String {
        format!("{}/api/sync", self.base_url)
    }

    /// Push one record.
    pub async fn push(&self, record: &CompletionRecord) -> Result<(), SyncError> {
        let body = SyncRequest::from(*record);
        let response = self.http.post(self.sync_url()).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorBody>().await {
                Ok(body) => body.error,
                Err(_) => status.canonical_reason().unwrap_or("unknown").to_string(),
            };
            return Err(SyncError::Rejected { status: status.as_u16(), message });
        }

        debug!(date = %record.date, score = record.score, "Score synced");
        Ok(())
    }

    /// Push one record, logging and swallowing any failure.
    pub async fn push_best_effort(&self, record: &CompletionRecord) -> bool {
        match self.push(record).await {
            Ok(()) => true,
            Err(e) => {
                warn!(date = %record.date, error = %e, "Sync failed, keeping local result");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::server::{create_router, AppState};
    use chrono::{NaiveDate, Utc};
    use std::sync::Arc;
    use tokio::net::TcpListener;

    async fn spawn_server() -> (String, Arc<AppState>) {
        let state = Arc::new(AppState::default());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = create_router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), state)
    }

    #[tokio::test]
    async fn test_push_reaches_server() {
        let (url, state) = spawn_server().await;
        let client = SyncClient::new(format!("{}/", url)).unwrap();
        let today = Utc::now().date_naive();
        let record = CompletionRecord { date: today, score: 88, time: 41, streak: 3 };

        client.push(&record).await.unwrap();
        let row = state.board.get(today).await.unwrap();
        assert_eq!((row.score, row.time_taken), (88, 41));
    }

    #[tokio::test]
    async fn test_rejection_carries_message() {
        let (url, _state) = spawn_server().await;
        let client = SyncClient::new(url).unwrap();
        let future = NaiveDate::from_ymd_opt(2999, 1, 1).unwrap();
        let record = CompletionRecord { date: future, score: 1, time: 1, streak: 1 };

        match client.push(&record).await {
            Err(SyncError::Rejected { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Future date not allowed");
            }
            other => panic!("expected rejection, got {:?}", other),
        }
        assert!(!client.push_best_effort(&record).await);
    }

    #[tokio::test]
    async fn test_unreachable_service_is_swallowed() {
        let client = SyncClient::new("http://127.0.0.1:1").unwrap();
        let record = CompletionRecord {
            date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            score: 10,
            time: 5,
            streak: 1,
        };
        assert!(!client.push_best_effort(&record).await);
    }

    #[test]
    fn test_sync_url() {
        let client = SyncClient::new("http://example.test:5000/").unwrap();
        assert_eq!(client.sync_url(), "http://example.test:5000/api/sync");
    }
}
