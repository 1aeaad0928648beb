//! Progress Events
//!
//! Events emitted by a daily session. The completion event carries the record
//! the caller pushes to the sync service.

use chrono::NaiveDate;
use serde::{Serialize, Deserialize};

use crate::progress::state::CompletionRecord;
use crate::puzzle::{PuzzleKind, Verdict};

/// Event payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEventData {
    /// First interaction with the day's puzzle; start time recorded.
    SessionStarted {
        kind: PuzzleKind,
    },

    /// A hint was revealed.
    HintRevealed {
        tier: u8,
        remaining: u32,
    },

    /// An answer was checked and not accepted.
    AnswerRejected {
        verdict: Verdict,
    },

    /// The day was completed.
    PuzzleCompleted {
        record: CompletionRecord,
    },
}

/// A progress event with its date and wall-clock time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Puzzle date
    pub date: NaiveDate,

    /// Unix milliseconds when emitted
    pub at_ms: i64,

    /// Event data
    pub data: ProgressEventData,
}

impl ProgressEvent {
    /// Create a new event.
    pub fn new(date: NaiveDate, at_ms: i64, data: ProgressEventData) -> Self {
        Self { date, at_ms, data }
    }

    /// Create session started event.
    pub fn session_started(date: NaiveDate, at_ms: i64, kind: PuzzleKind) -> Self {
        Self::new(date, at_ms, ProgressEventData::SessionStarted { kind })
    }

    /// Create hint revealed event.
    pub fn hint_revealed(date: NaiveDate, at_ms: i64, tier: u8, remaining: u32) -> Self {
        Self::new(date, at_ms, ProgressEventData::HintRevealed { tier, remaining })
    }

    /// Create answer rejected event.
    pub fn answer_rejected(date: NaiveDate, at_ms: i64, verdict: Verdict) -> Self {
        Self::new(date, at_ms, ProgressEventData::AnswerRejected { verdict })
    }

    /// Create puzzle completed event.
    pub fn puzzle_completed(at_ms: i64, record: CompletionRecord) -> Self {
        Self::new(record.date, at_ms, ProgressEventData::PuzzleCompleted { record })
    }

    /// Record to push to the sync service, if this is a completion.
    pub fn sync_record(&self) -> Option<CompletionRecord> {
        match &self.data {
            ProgressEventData::PuzzleCompleted { record } => Some(*record),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_completion_syncs() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let record = CompletionRecord { date, score: 90, time: 15, streak: 2 };
        assert_eq!(ProgressEvent::puzzle_completed(0, record).sync_record(), Some(record));
        assert!(ProgressEvent::hint_revealed(date, 0, 1, 2).sync_record().is_none());
        assert!(ProgressEvent::answer_rejected(date, 0, Verdict::Incorrect).sync_record().is_none());
    }

    #[test]
    fn test_event_json_tag() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let event = ProgressEvent::session_started(date, 5, PuzzleKind::Sequence);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["data"]["type"], "session_started");
        assert_eq!(json["data"]["kind"], "sequence");
        assert_eq!(json["date"], "2026-03-01");
    }
}
