//! Sync Protocol
//!
//! JSON wire types for the score sync service.
//!
//! ## Contract
//!
//! `POST /api/sync` with `{date, score, time, streak}`. The server rejects a
//! missing or malformed date, a negative score or time, and a date after its
//! own (UTC) today. Otherwise one row per date is upserted.

use chrono::NaiveDate;
use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::progress::state::CompletionRecord;

/// Rejection reasons for a sync request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// Missing date, bad date, or negative score/time.
    #[error("Invalid data")]
    InvalidData,

    /// Date after the server's today.
    #[error("Future date not allowed")]
    FutureDate,
}

/// Body of `POST /api/sync`.
///
/// Fields are optional on the wire so incomplete bodies reach validation
/// instead of failing extraction.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncRequest {
    /// `YYYY-MM-DD`.
    pub date: Option<String>,
    /// Final score.
    pub score: Option<i64>,
    /// Seconds taken.
    pub time: Option<i64>,
    /// Streak after completion.
    pub streak: Option<i64>,
}

/// A sync request that passed validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ValidSync {
    /// Completed date.
    pub date: NaiveDate,
    /// Score (>= 0).
    pub score: i64,
    /// Seconds (>= 0).
    pub time: i64,
    /// Streak, informational only.
    pub streak: Option<i64>,
}

impl SyncRequest {
    /// Check the request against the server's today.
    pub fn validate(&self, today: NaiveDate) -> Result<ValidSync, ProtocolError> {
        let date = self
            .date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .ok_or(ProtocolError::InvalidData)?;

        let (Some(score), Some(time)) = (self.score, self.time) else {
            return Err(ProtocolError::InvalidData);
        };
        if score < 0 || time < 0 {
            return Err(ProtocolError::InvalidData);
        }
        if date > today {
            return Err(ProtocolError::FutureDate);
        }

        Ok(ValidSync { date, score, time, streak: self.streak })
    }
}

impl From<CompletionRecord> for SyncRequest {
    fn from(record: CompletionRecord) -> Self {
        Self {
            date: Some(record.date.format("%Y-%m-%d").to_string()),
            score: Some(record.score),
            time: Some(i64::try_from(record.time).unwrap_or(i64::MAX)),
            streak: Some(record.streak as i64),
        }
    }
}

/// Success body of `POST /api/sync`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResponse {
    /// Always `true`.
    pub success: bool,
}

/// Error body of every failed request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Message.
    pub error: String,
}

/// One stored score row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRow {
    /// Row key.
    pub date: NaiveDate,
    /// Last synced score.
    pub score: i64,
    /// Last synced time.
    pub time_taken: i64,
}

/// Body of `GET /`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status message.
    pub message: String,
    /// Server clock, RFC 3339.
    pub time: String,
}
