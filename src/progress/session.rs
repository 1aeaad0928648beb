//! Daily Session
//!
//! Drives one date's puzzle: `NotStarted -> InProgress -> Completed`.
//!
//! The session owns the injected store and persists every change as it
//! happens: the start timestamp, the working attempt, the hint counters, and
//! on completion the whole progress record. Completion emits a
//! [`ProgressEvent`] whose record the caller pushes to the sync service; a
//! failed push never touches local state.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Serialize, Deserialize};
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::core::seed::DailyContext;
use crate::progress::events::ProgressEvent;
use crate::progress::hints::{hint_key, HintState};
use crate::progress::state::{CompletionRecord, DailyProgress, PROGRESS_KEY};
use crate::progress::storage::{load, save, KeyValueStore, Scope, StoreError};
use crate::puzzle::{Attempt, AttemptError, DifficultyMode, Hint, PuzzleInstance, Verdict};

/// Session lifecycle for one date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// Nothing recorded for the date yet.
    NotStarted,
    /// Start time recorded, not yet solved.
    InProgress,
    /// Solved. Terminal for the date.
    Completed,
}

/// Session operation failure.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The date is already completed.
    #[error("puzzle for {0} is already completed")]
    AlreadyCompleted(NaiveDate),

    /// No hints left today.
    #[error("no hints remaining")]
    HintsExhausted,

    /// The puzzle has no hint at this tier.
    #[error("no hint available at tier {0}")]
    NoMoreHints(u8),

    /// Malformed attempt.
    #[error("invalid attempt: {0}")]
    Attempt(#[from] AttemptError),

    /// Persistence failure.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result of submitting an answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Correct; the date is now completed.
    Completed(CompletionRecord),
    /// Wrong or rule-violating; retry freely.
    Rejected(Verdict),
    /// The date was already completed; nothing changed.
    AlreadyCompleted,
}

/// Storage key of a date's start timestamp.
pub fn start_key(date: NaiveDate) -> String {
    format!("start-{}", date.format("%Y-%m-%d"))
}

/// Storage key of a puzzle's working attempt.
pub fn attempt_key(puzzle: &PuzzleInstance, seed: u32) -> String {
    format!("{}-{}", puzzle.kind().slug(), seed)
}

/// One date's puzzle session over a store.
#[derive(Debug)]
pub struct DailySession<S: KeyValueStore> {
    store: S,
    ctx: DailyContext,
    puzzle: PuzzleInstance,
    attempt: Attempt,
    hints: HintState,
    revealed: Vec<Hint>,
    started_at_ms: Option<i64>,
    progress: DailyProgress,
    events: Vec<ProgressEvent>,
}

impl<S: KeyValueStore> DailySession<S> {
    /// Open the session for a date, restoring anything already persisted.
    pub fn open(
        store: S,
        ctx: DailyContext,
        mode: DifficultyMode,
        hint_allowance: u32,
    ) -> Result<Self, SessionError> {
        let puzzle = PuzzleInstance::for_day(&ctx, mode);

        let progress: DailyProgress = load(&store, Scope::Progress, PROGRESS_KEY)?.unwrap_or_default();
        let hints: HintState = load(&store, Scope::Meta, &hint_key(ctx.date))?
            .unwrap_or_else(|| HintState::with_allowance(hint_allowance));
        let started_at_ms: Option<i64> = load(&store, Scope::Meta, &start_key(ctx.date))?;

        let attempt = match load::<Attempt, _>(&store, Scope::Puzzles, &attempt_key(&puzzle, ctx.seed))? {
            Some(saved) if fits(&puzzle, &saved) => saved,
            _ => puzzle.blank_attempt(),
        };

        let revealed = (1..=hints.used)
            .filter_map(|tier| u8::try_from(tier).ok())
            .filter_map(|tier| puzzle.hint(tier))
            .collect();

        debug!(date = %ctx.date, kind = %puzzle.kind(), seed = ctx.seed, "Session opened");

        Ok(Self {
            store,
            ctx,
            puzzle,
            attempt,
            hints,
            revealed,
            started_at_ms,
            progress,
            events: Vec::new(),
        })
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// The date's context.
    pub fn context(&self) -> &DailyContext {
        &self.ctx
    }

    /// The date's puzzle.
    pub fn puzzle(&self) -> &PuzzleInstance {
        &self.puzzle
    }

    /// The working attempt.
    pub fn attempt(&self) -> &Attempt {
        &self.attempt
    }

    /// Hint counters.
    pub fn hints(&self) -> HintState {
        self.hints
    }

    /// Hints revealed so far, in tier order.
    pub fn revealed_hints(&self) -> &[Hint] {
        &self.revealed
    }

    /// Progress record as last loaded or written.
    pub fn progress(&self) -> &DailyProgress {
        &self.progress
    }

    /// The backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the backing store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Lifecycle state.
    pub fn state(&self) -> SessionState {
        if self.progress.is_completed(self.ctx.date) {
            SessionState::Completed
        } else if self.started_at_ms.is_some() {
            SessionState::InProgress
        } else {
            SessionState::NotStarted
        }
    }

    /// True once the calendar has moved past this session's date.
    pub fn is_stale(&self, today: NaiveDate) -> bool {
        today != self.ctx.date
    }

    /// Whole seconds since the start timestamp, 0 if never started.
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        match self.started_at_ms {
            Some(start) => u64::try_from((now.timestamp_millis() - start) / 1000).unwrap_or(0),
            None => 0,
        }
    }

    /// Take the events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<ProgressEvent> {
        std::mem::take(&mut self.events)
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// Record the start timestamp. No-op once started or completed.
    pub fn begin(&mut self, now: DateTime<Utc>) -> Result<(), SessionError> {
        if self.state() != SessionState::NotStarted {
            return Ok(());
        }
        let at_ms = now.timestamp_millis();
        save(&mut self.store, Scope::Meta, &start_key(self.ctx.date), &at_ms)?;
        self.started_at_ms = Some(at_ms);
        self.events.push(ProgressEvent::session_started(self.ctx.date, at_ms, self.puzzle.kind()));
        debug!(date = %self.ctx.date, "Session started");
        Ok(())
    }

    /// Replace and persist the working attempt.
    pub fn update_attempt(&mut self, attempt: Attempt) -> Result<(), SessionError> {
        self.ensure_open()?;
        if !fits(&self.puzzle, &attempt) {
            return Err(AttemptError::KindMismatch { expected: self.puzzle.kind() }.into());
        }
        self.attempt = attempt;
        self.persist_attempt()
    }

    /// Reveal the next hint tier, spending one hint.
    ///
    /// A tier the puzzle does not have fails without spending anything. A
    /// grid hint also writes its cell into the attempt.
    #[instrument(skip(self), fields(date = %self.ctx.date))]
    pub fn request_hint(&mut self, now: DateTime<Utc>) -> Result<Hint, SessionError> {
        self.ensure_open()?;
        if self.hints.is_exhausted() {
            return Err(SessionError::HintsExhausted);
        }

        let tier = u8::try_from(self.hints.used + 1).unwrap_or(u8::MAX);
        let hint = self.puzzle.hint(tier).ok_or(SessionError::NoMoreHints(tier))?;

        self.begin(now)?;
        self.hints.consume();
        save(&mut self.store, Scope::Meta, &hint_key(self.ctx.date), &self.hints)?;

        if let (Some(cell), Attempt::Grid(grid)) = (hint.reveal, &mut self.attempt) {
            grid[cell.row][cell.col] = Some(cell.value);
            self.persist_attempt()?;
        }

        self.revealed.push(hint.clone());
        self.events.push(ProgressEvent::hint_revealed(
            self.ctx.date,
            now.timestamp_millis(),
            tier,
            self.hints.remaining,
        ));
        debug!(tier, remaining = self.hints.remaining, "Hint revealed");
        Ok(hint)
    }

    /// Check an answer and complete the date if it is correct.
    #[instrument(skip(self, attempt), fields(date = %self.ctx.date))]
    pub fn submit(&mut self, attempt: Attempt, now: DateTime<Utc>) -> Result<SubmitOutcome, SessionError> {
        if self.state() == SessionState::Completed {
            return Ok(SubmitOutcome::AlreadyCompleted);
        }

        let verdict = self.puzzle.check_answer(&attempt)?;
        self.attempt = attempt;
        self.persist_attempt()?;

        if !verdict.is_correct() {
            self.events.push(ProgressEvent::answer_rejected(self.ctx.date, now.timestamp_millis(), verdict));
            debug!(?verdict, "Answer rejected");
            return Ok(SubmitOutcome::Rejected(verdict));
        }

        // Whole-document read-modify-write.
        let mut progress: DailyProgress = load(&self.store, Scope::Progress, PROGRESS_KEY)?.unwrap_or_default();
        let elapsed = self.elapsed_secs(now);
        let Some(record) = progress.complete(self.ctx.date, elapsed, self.hints.used) else {
            self.progress = progress;
            return Ok(SubmitOutcome::AlreadyCompleted);
        };
        save(&mut self.store, Scope::Progress, PROGRESS_KEY, &progress)?;
        self.progress = progress;

        self.events.push(ProgressEvent::puzzle_completed(now.timestamp_millis(), record));
        info!(
            score = record.score,
            time = record.time,
            streak = record.streak,
            hints = self.hints.used,
            "Puzzle completed"
        );
        Ok(SubmitOutcome::Completed(record))
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.state() == SessionState::Completed {
            return Err(SessionError::AlreadyCompleted(self.ctx.date));
        }
        Ok(())
    }

    fn persist_attempt(&mut self) -> Result<(), SessionError> {
        let key = attempt_key(&self.puzzle, self.ctx.seed);
        save(&mut self.store, Scope::Puzzles, &key, &self.attempt)?;
        Ok(())
    }
}

/// Whether an attempt has the shape a puzzle expects.
fn fits(puzzle: &PuzzleInstance, attempt: &Attempt) -> bool {
    !matches!(puzzle.check_answer(attempt), Err(AttemptError::KindMismatch { .. }))
}

// =============================================================================
// TESTS
// =============================================================================
