//! Daily Progress
//!
//! The per-device progress record: which dates are completed, the running
//! streak, and each day's score and time. Read and written as one document.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Deserialize};

use crate::core::seed::day_of_year;

/// Storage key of the progress record.
pub const PROGRESS_KEY: &str = "logic-progress";

/// Base score before bonuses and penalties.
pub const BASE_SCORE: i64 = 100;

/// Largest difficulty bonus, reached at year end.
pub const MAX_DIFFICULTY_BONUS: f64 = 50.0;

/// Bonus per streak day.
pub const STREAK_BONUS: i64 = 5;

/// Floor applied before the hint penalty.
pub const SCORE_FLOOR: i64 = 10;

/// Multiplier applied once per hint used.
pub const HINT_PENALTY: f64 = 0.9;

/// Persisted progress record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProgress {
    /// Completed dates (value is always `true`).
    pub completed_dates: BTreeMap<NaiveDate, bool>,
    /// Current streak.
    pub streak: u32,
    /// Most recent completion.
    pub last_completed: Option<NaiveDate>,
    /// Score per completed date.
    pub daily_scores: BTreeMap<NaiveDate, i64>,
    /// Seconds taken per completed date.
    pub daily_times: BTreeMap<NaiveDate, u64>,
    /// Longest streak reached.
    #[serde(default)]
    pub best_streak: u32,
}

/// Result of a completion, also the payload pushed to the sync service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionRecord {
    /// Completed date.
    pub date: NaiveDate,
    /// Final score.
    pub score: i64,
    /// Elapsed seconds.
    pub time: u64,
    /// Streak after this completion.
    pub streak: u32,
}

/// Per-day status in the year activity view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// After today.
    Future,
    /// Puzzle completed.
    Completed,
    /// Past (or today) without a completion.
    Missed,
}

/// One day of the year activity view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayActivity {
    /// The day.
    pub date: NaiveDate,
    /// Its status.
    pub status: DayStatus,
}

/// Score for a completion.
///
/// `max(10, 100 + difficulty bonus + 5 * streak - elapsed)`, then multiplied
/// by `0.9^hints` and floored. The floor comes first, so a penalised score
/// can end below 10.
pub fn compute_score(day_of_year: u32, new_streak: u32, elapsed_secs: u64, hints_used: u32) -> i64 {
    let difficulty_bonus = (day_of_year as f64 / 365.0 * MAX_DIFFICULTY_BONUS).floor() as i64;
    let streak_bonus = new_streak as i64 * STREAK_BONUS;
    let elapsed = i64::try_from(elapsed_secs).unwrap_or(i64::MAX);
    let raw = (BASE_SCORE + difficulty_bonus + streak_bonus).saturating_sub(elapsed);
    let floored = raw.max(SCORE_FLOOR);
    (floored as f64 * HINT_PENALTY.powi(hints_used as i32)).floor() as i64
}

impl DailyProgress {
    /// Whether `date` has been completed.
    pub fn is_completed(&self, date: NaiveDate) -> bool {
        self.completed_dates.get(&date).copied().unwrap_or(false)
    }

    /// Record a completion.
    ///
    /// Returns `None` if the date was already completed; the record is left
    /// untouched in that case. A date before `last_completed` is recorded
    /// with a streak of 1 and leaves the running streak alone.
    pub fn complete(&mut self, date: NaiveDate, elapsed_secs: u64, hints_used: u32) -> Option<CompletionRecord> {
        if self.is_completed(date) {
            return None;
        }

        let backfill = self.last_completed.is_some_and(|last| date < last);
        let continues = match (self.last_completed, date.pred_opt()) {
            (Some(last), Some(yesterday)) => last == yesterday,
            _ => false,
        };
        let streak = if continues { self.streak + 1 } else { 1 };
        let score = compute_score(day_of_year(date), streak, elapsed_secs, hints_used);

        self.completed_dates.insert(date, true);
        self.daily_scores.insert(date, score);
        self.daily_times.insert(date, elapsed_secs);
        if !backfill {
            self.streak = streak;
            self.best_streak = self.best_streak.max(streak);
            self.last_completed = Some(date);
        }

        Some(CompletionRecord { date, score, time: elapsed_secs, streak })
    }

    /// Stored result for a completed date.
    pub fn record_for(&self, date: NaiveDate) -> Option<CompletionRecord> {
        if !self.is_completed(date) {
            return None;
        }
        Some(CompletionRecord {
            date,
            score: self.daily_scores.get(&date).copied().unwrap_or_default(),
            time: self.daily_times.get(&date).copied().unwrap_or_default(),
            streak: if self.last_completed == Some(date) { self.streak } else { 0 },
        })
    }

    /// One cell per day of `year`, judged against `today`.
    pub fn activity(&self, year: i32, today: NaiveDate) -> Vec<DayActivity> {
        let Some(first) = NaiveDate::from_ymd_opt(year, 1, 1) else {
            return Vec::new();
        };
        first
            .iter_days()
            .take_while(|d| d.year() == year)
            .map(|date| {
                let status = if date > today {
                    DayStatus::Future
                } else if self.is_completed(date) {
                    DayStatus::Completed
                } else {
                    DayStatus::Missed
                };
                DayActivity { date, status }
            })
            .collect()
    }

    /// Number of completed dates.
    pub fn total_completed(&self) -> usize {
        self.completed_dates.values().filter(|done| **done).count()
    }
}

// =============================================================================
// TESTS
// =============================================================================
