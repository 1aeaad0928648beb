//! # Logic Looper
//!
//! Deterministic daily logic puzzles with streaks, scores, and a best-effort
//! score sync service.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       LOGIC LOOPER                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - Park-Miller LCG                           │
//! │  └── seed.rs     - Calendar date -> daily seed               │
//! │                                                              │
//! │  puzzle/         - Puzzle generators (deterministic)         │
//! │  ├── number_grid.rs - 4x4 Latin square fill-in               │
//! │  ├── sequence.rs - Next term of a progression                │
//! │  ├── pattern.rs  - Next symbol of a pattern                  │
//! │  ├── binary.rs   - Boolean expression evaluation             │
//! │  └── deduction.rs- Who owns which pet                        │
//! │                                                              │
//! │  progress/       - Player state                              │
//! │  ├── state.rs    - Streak and score record                   │
//! │  ├── hints.rs    - Daily hint budget                         │
//! │  ├── storage.rs  - Key-value persistence port                │
//! │  ├── events.rs   - Session events                            │
//! │  └── session.rs  - One date's puzzle session                 │
//! │                                                              │
//! │  network/        - Score sync (non-deterministic)            │
//! │  ├── protocol.rs - Wire types and validation                 │
//! │  ├── server.rs   - HTTP sync service                         │
//! │  └── client.rs   - Best-effort push                          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! `core/` and `puzzle/` are pure: a date and a seed policy fully determine
//! the day's puzzle, its answer, and its hints, on any platform and across
//! restarts. The PRNG multiplies in 64-bit integers, so no float rounding
//! creeps into the sequence.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod network;
pub mod progress;
pub mod puzzle;

// Re-export commonly used types
pub use config::Config;
pub use core::rng::DeterministicRng;
pub use core::seed::{DailyContext, SeedPolicy};
pub use progress::{DailyProgress, DailySession, KeyValueStore};
pub use puzzle::{Attempt, DifficultyMode, PuzzleInstance, PuzzleKind, Verdict};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
