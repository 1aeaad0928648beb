//! Sequence
//!
//! Four terms of a progression; the answer is the fifth.

use serde::{Serialize, Deserialize};

use super::{parse_number, AttemptError, Hint, PuzzleParams, Verdict};

/// Number of terms shown.
pub const SHOWN_TERMS: usize = 4;

/// Progression family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum SequenceRule {
    /// `start + n * difference`.
    Arithmetic {
        /// First term.
        start: u64,
        /// Common difference.
        difference: u64,
    },
    /// `start * ratio^n`.
    Geometric {
        /// First term.
        start: u64,
        /// Common ratio.
        ratio: u64,
    },
    /// Each term is the sum of the previous two.
    Fibonacci {
        /// First term.
        first: u64,
        /// Second term.
        second: u64,
    },
    /// `base^(n + 1)`.
    Power {
        /// Base.
        base: u64,
    },
}

impl SequenceRule {
    /// Term at zero-based index `n`.
    pub fn term(&self, n: u32) -> u64 {
        match *self {
            SequenceRule::Arithmetic { start, difference } => start + n as u64 * difference,
            SequenceRule::Geometric { start, ratio } => start * ratio.pow(n),
            SequenceRule::Fibonacci { first, second } => {
                let (mut a, mut b) = (first, second);
                for _ in 0..n {
                    let next = a + b;
                    a = b;
                    b = next;
                }
                a
            }
            SequenceRule::Power { base } => base.pow(n + 1),
        }
    }

    /// Human-readable rule, used as the tier-2 hint.
    pub fn description(&self) -> String {
        match *self {
            SequenceRule::Arithmetic { difference, .. } => {
                format!("Arithmetic progression (common difference = {})", difference)
            }
            SequenceRule::Geometric { ratio, .. } => {
                format!("Geometric progression (common ratio = {})", ratio)
            }
            SequenceRule::Fibonacci { .. } => {
                "Fibonacci-like sequence (each term = sum of previous two)".to_string()
            }
            SequenceRule::Power { base } => format!("Power sequence (powers of {})", base),
        }
    }
}

/// Sequence puzzle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencePuzzle {
    /// Generating rule.
    pub rule: SequenceRule,
    /// Shown terms.
    pub terms: [u64; SHOWN_TERMS],
    /// Fifth term.
    pub answer: u64,
    /// Difficulty tier.
    pub tier: u8,
}

impl SequencePuzzle {
    /// Generate from params.
    ///
    /// Draw order: rule family, (seeded tier), then the family's parameters.
    pub fn generate(params: &PuzzleParams) -> Self {
        let mut rng = params.rng();
        let family = rng.next_index(4);
        let tier = params.tier(&mut rng);

        let rule = match family {
            0 => {
                let start = rng.next_index(10) as u64 + 1;
                let difference = rng.next_index(5) as u64 + 2 + tier as u64;
                SequenceRule::Arithmetic { start, difference }
            }
            1 => {
                let start = rng.next_index(5) as u64 + 2;
                SequenceRule::Geometric { start, ratio: 2 + tier as u64 }
            }
            2 => {
                let first = rng.next_index(5) as u64 + 1;
                let second = rng.next_index(5) as u64 + 1;
                SequenceRule::Fibonacci { first, second }
            }
            _ => SequenceRule::Power { base: rng.next_index(5) as u64 + 2 },
        };

        let terms = [rule.term(0), rule.term(1), rule.term(2), rule.term(3)];
        Self { rule, terms, answer: rule.term(SHOWN_TERMS as u32), tier }
    }

    /// Prompt text.
    pub fn prompt(&self) -> String {
        let shown: Vec<String> = self.terms.iter().map(|t| t.to_string()).collect();
        format!("What comes next? {}, ?", shown.join(", "))
    }

    /// Check a typed answer.
    pub fn check(&self, text: &str) -> Result<Verdict, AttemptError> {
        let value = parse_number(text)?;
        if value == self.answer as f64 {
            Ok(Verdict::Correct)
        } else {
            Ok(Verdict::Incorrect)
        }
    }

    /// Tier 1 is strategy; tier 2 names the rule.
    pub fn hint(&self, tier: u8) -> Option<Hint> {
        match tier {
            1 => Some(Hint::text(
                1,
                "Compare neighbouring terms: look at differences, ratios, or the sum of the two before.",
            )),
            2 => Some(Hint::text(2, self.rule.description())),
            _ => None,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::DifficultyMode;
    use proptest::prelude::*;

    fn params(seed: u32, day: u32, mode: DifficultyMode) -> PuzzleParams {
        PuzzleParams { seed, day_of_year: day, mode }
    }

    #[test]
    fn test_known_daily_sequence() {
        // 2026, day 59: first draw selects the power family, base 3.
        let puzzle = SequencePuzzle::generate(&params(2_026_059, 59, DifficultyMode::Calendar));
        assert_eq!(puzzle.rule, SequenceRule::Power { base: 3 });
        assert_eq!(puzzle.terms, [3, 9, 27, 81]);
        assert_eq!(puzzle.answer, 243);
        assert_eq!(puzzle.prompt(), "What comes next? 3, 9, 27, 81, ?");
    }

    #[test]
    fn test_reproducible() {
        for seed in [1u32, 2_026_059, 3_376_745_579, u32::MAX] {
            let p = params(seed, 120, DifficultyMode::Calendar);
            assert_eq!(SequencePuzzle::generate(&p), SequencePuzzle::generate(&p));
        }
    }

    #[test]
    fn test_rule_terms() {
        assert_eq!(SequenceRule::Fibonacci { first: 2, second: 3 }.term(4), 13);
        assert_eq!(SequenceRule::Geometric { start: 3, ratio: 2 }.term(3), 24);
        assert_eq!(SequenceRule::Arithmetic { start: 1, difference: 4 }.term(4), 17);
        assert_eq!(SequenceRule::Power { base: 2 }.term(0), 2);
    }

    #[test]
    fn test_check() {
        let puzzle = SequencePuzzle::generate(&params(2_026_059, 59, DifficultyMode::Calendar));
        assert_eq!(puzzle.check("243"), Ok(Verdict::Correct));
        assert_eq!(puzzle.check(" 243.0 "), Ok(Verdict::Correct));
        assert_eq!(puzzle.check("242"), Ok(Verdict::Incorrect));
        assert_eq!(puzzle.check(""), Err(AttemptError::EmptyAnswer));
        assert!(matches!(puzzle.check("two"), Err(AttemptError::NotANumber(_))));
    }

    #[test]
    fn test_hint_describes_rule() {
        let puzzle = SequencePuzzle::generate(&params(2_026_059, 59, DifficultyMode::Calendar));
        assert_eq!(puzzle.hint(2).unwrap().text, "Power sequence (powers of 3)");
        assert!(puzzle.hint(3).is_none());
    }

    proptest! {
        #[test]
        fn prop_answer_follows_rule(seed in any::<u32>(), day in 1u32..=366, seeded in any::<bool>()) {
            let mode = if seeded { DifficultyMode::Seeded } else { DifficultyMode::Calendar };
            let puzzle = SequencePuzzle::generate(&params(seed, day, mode));
            let t = puzzle.terms;
            let a = puzzle.answer;
            match puzzle.rule {
                SequenceRule::Arithmetic { difference, .. } => {
                    prop_assert!(difference >= 2);
                    prop_assert_eq!(a - t[3], t[3] - t[2]);
                    prop_assert_eq!(t[1] - t[0], difference);
                }
                SequenceRule::Geometric { ratio, .. } => {
                    prop_assert!(ratio >= 2);
                    prop_assert_eq!(a, t[3] * ratio);
                    prop_assert_eq!(t[1], t[0] * ratio);
                }
                SequenceRule::Fibonacci { .. } => {
                    prop_assert_eq!(a, t[3] + t[2]);
                    prop_assert_eq!(t[2], t[1] + t[0]);
                }
                SequenceRule::Power { base } => {
                    prop_assert_eq!(t[0], base);
                    prop_assert_eq!(a, t[3] * base);
                }
            }
        }
    }
}
