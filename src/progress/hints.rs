//! Hint Budget
//!
//! Per-day hint allowance. `remaining + used` always equals the allowance.

use chrono::NaiveDate;
use serde::{Serialize, Deserialize};

/// Smallest daily allowance.
pub const MIN_HINTS: u32 = 2;

/// Largest (and default) daily allowance.
pub const MAX_HINTS: u32 = 3;

/// Storage key for a date's hint state.
pub fn hint_key(date: NaiveDate) -> String {
    format!("hints-{}", date.format("%Y-%m-%d"))
}

/// Clamp a configured allowance into `MIN_HINTS..=MAX_HINTS`.
pub fn clamp_allowance(allowance: u32) -> u32 {
    allowance.clamp(MIN_HINTS, MAX_HINTS)
}

/// Stored hint counters for one date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintState {
    /// Hints still available.
    pub remaining: u32,
    /// Hints consumed.
    pub used: u32,
}

impl Default for HintState {
    fn default() -> Self {
        Self::with_allowance(MAX_HINTS)
    }
}

impl HintState {
    /// Fresh state for a (clamped) allowance.
    pub fn with_allowance(allowance: u32) -> Self {
        Self { remaining: clamp_allowance(allowance), used: 0 }
    }

    /// Total allowance.
    pub fn allowance(&self) -> u32 {
        self.remaining + self.used
    }

    /// True when no hints are left.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Spend one hint. Returns the new `used` count, or `None` if exhausted.
    pub fn consume(&mut self) -> Option<u32> {
        if self.is_exhausted() {
            return None;
        }
        self.remaining -= 1;
        self.used += 1;
        Some(self.used)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_until_exhausted() {
        let mut hints = HintState::default();
        assert_eq!(hints.consume(), Some(1));
        assert_eq!(hints.consume(), Some(2));
        assert_eq!(hints.consume(), Some(3));
        assert_eq!(hints.consume(), None);
        assert_eq!(hints, HintState { remaining: 0, used: 3 });
        assert_eq!(hints.allowance(), MAX_HINTS);
    }

    #[test]
    fn test_allowance_clamped() {
        assert_eq!(HintState::with_allowance(0).remaining, MIN_HINTS);
        assert_eq!(HintState::with_allowance(2).remaining, 2);
        assert_eq!(HintState::with_allowance(9).remaining, MAX_HINTS);
    }

    #[test]
    fn test_key_and_wire_format() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(hint_key(date), "hints-2026-03-01");
        let json = serde_json::to_string(&HintState::with_allowance(2)).unwrap();
        assert_eq!(json, r#"{"remaining":2,"used":0}"#);
    }
}
