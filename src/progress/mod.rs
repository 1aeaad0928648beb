//! Player Progress
//!
//! Streak and score bookkeeping, the per-day hint budget, the persistence
//! port, and the daily session that ties them to a puzzle.

pub mod events;
pub mod hints;
pub mod session;
pub mod state;
pub mod storage;

pub use events::{ProgressEvent, ProgressEventData};
pub use hints::HintState;
pub use session::{DailySession, SessionError, SessionState, SubmitOutcome};
pub use state::{compute_score, CompletionRecord, DailyProgress, DayActivity, DayStatus};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, Scope, StoreError};
