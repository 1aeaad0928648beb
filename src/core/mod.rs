//! Core deterministic primitives.
//!
//! Everything that turns a calendar date into reproducible randomness.

pub mod rng;
pub mod seed;

// Re-export core types
pub use rng::DeterministicRng;
pub use seed::{DailyContext, SeedPolicy, derive_seed, day_of_year, iso_date};
