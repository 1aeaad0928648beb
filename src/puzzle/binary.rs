//! Binary Logic
//!
//! Evaluate a short boolean expression over 0/1 bits.

use std::fmt;

use serde::{Serialize, Deserialize};

use super::{parse_number, AttemptError, Hint, PuzzleParams, Verdict};

/// Binary operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Operator {
    /// a & b
    And,
    /// a | b
    Or,
    /// a ^ b
    Xor,
    /// !(a & b)
    Nand,
    /// !(a | b)
    Nor,
}

impl Operator {
    /// All operators in draw order.
    pub const ALL: [Operator; 5] = [
        Operator::And,
        Operator::Or,
        Operator::Xor,
        Operator::Nand,
        Operator::Nor,
    ];

    /// Apply to two bits.
    #[inline]
    pub fn apply(self, a: u8, b: u8) -> u8 {
        match self {
            Operator::And => a & b,
            Operator::Or => a | b,
            Operator::Xor => a ^ b,
            Operator::Nand => 1 - (a & b),
            Operator::Nor => 1 - (a | b),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Xor => "XOR",
            Operator::Nand => "NAND",
            Operator::Nor => "NOR",
        })
    }
}

/// Binary logic puzzle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryPuzzle {
    /// Input bits `a, b, c`.
    pub bits: [u8; 3],
    /// Extra bit XORed in at tier 2.
    pub extra: Option<u8>,
    /// First operator.
    pub first_op: Operator,
    /// Second operator (unused at tier 0).
    pub second_op: Operator,
    /// Difficulty tier.
    pub tier: u8,
    /// Value of the innermost sub-expression.
    pub first_step: u8,
    /// Final value.
    pub answer: u8,
}

impl BinaryPuzzle {
    /// Generate from params.
    ///
    /// Draw order: (seeded tier), `a`, `b`, `c`, two operators, then `d` at tier 2.
    pub fn generate(params: &PuzzleParams) -> Self {
        let mut rng = params.rng();
        let tier = params.tier(&mut rng);

        let bits = [rng.next_bit(), rng.next_bit(), rng.next_bit()];
        let first_op = Operator::ALL[rng.next_index(Operator::ALL.len())];
        let second_op = Operator::ALL[rng.next_index(Operator::ALL.len())];

        let first_step = first_op.apply(bits[0], bits[1]);
        let (extra, answer) = match tier {
            0 => (None, first_step),
            1 => (None, second_op.apply(first_step, bits[2])),
            _ => {
                let d = rng.next_bit();
                (Some(d), second_op.apply(first_step, bits[2]) ^ d)
            }
        };

        Self { bits, extra, first_op, second_op, tier, first_step, answer }
    }

    /// Expression text.
    pub fn expression(&self) -> String {
        let [a, b, c] = self.bits;
        match (self.tier, self.extra) {
            (0, _) => format!("{} {} {}", a, self.first_op, b),
            (_, Some(d)) => format!("(({} {} {}) {} {}) XOR {}", a, self.first_op, b, self.second_op, c, d),
            _ => format!("({} {} {}) {} {}", a, self.first_op, b, self.second_op, c),
        }
    }

    /// Prompt text.
    pub fn prompt(&self) -> String {
        format!("Evaluate (answer 0 or 1): {}", self.expression())
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

    /// Tier 1 is strategy; tier 2 evaluates the first sub-expression.
    pub fn hint(&self, tier: u8) -> Option<Hint> {
        let [a, b, _] = self.bits;
        match tier {
            1 => Some(Hint::text(
                1,
                "Work from the innermost parentheses outward. NAND and NOR are AND and OR, then flipped.",
            )),
            2 if self.tier == 0 => Some(Hint::text(
                2,
                format!("Evaluate: {} {} {} = {}", a, self.first_op, b, self.first_step),
            )),
            2 => Some(Hint::text(
                2,
                format!("Step 1: ({} {} {}) = {}", a, self.first_op, b, self.first_step),
            )),
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

    fn params(seed: u32, day: u32) -> PuzzleParams {
        PuzzleParams { seed, day_of_year: day, mode: DifficultyMode::Calendar }
    }

    #[test]
    fn test_truth_tables() {
        let table = |op: Operator| [op.apply(0, 0), op.apply(0, 1), op.apply(1, 0), op.apply(1, 1)];
        assert_eq!(table(Operator::And), [0, 0, 0, 1]);
        assert_eq!(table(Operator::Or), [0, 1, 1, 1]);
        assert_eq!(table(Operator::Xor), [0, 1, 1, 0]);
        assert_eq!(table(Operator::Nand), [1, 1, 1, 0]);
        assert_eq!(table(Operator::Nor), [1, 0, 0, 0]);
    }

    #[test]
    fn test_tier_shapes() {
        let easy = BinaryPuzzle::generate(&params(2_026_059, 10));
        assert_eq!(easy.tier, 0);
        assert_eq!(easy.answer, easy.first_step);
        assert!(!easy.expression().contains('('));

        let medium = BinaryPuzzle::generate(&params(2_026_059, 150));
        assert_eq!(medium.tier, 1);
        assert!(medium.expression().starts_with('('));
        assert!(medium.extra.is_none());

        let hard = BinaryPuzzle::generate(&params(2_026_059, 300));
        assert_eq!(hard.tier, 2);
        assert!(hard.extra.is_some());
        assert!(hard.expression().starts_with("(("));
    }

    #[test]
    fn test_known_expression() {
        // Draws 0.857, 0.320, 0.963, ... -> a=1, b=0, c=1
        let puzzle = BinaryPuzzle::generate(&params(2_026_059, 10));
        assert_eq!(puzzle.bits, [1, 0, 1]);
    }

    #[test]
    fn test_hint_reveals_first_step() {
        let puzzle = BinaryPuzzle::generate(&params(77, 200));
        let hint = puzzle.hint(2).unwrap();
        assert!(hint.text.starts_with("Step 1:"));
        assert!(hint.text.ends_with(&format!("= {}", puzzle.first_step)));
        assert!(puzzle.hint(3).is_none());
    }

    #[test]
    fn test_check() {
        let puzzle = BinaryPuzzle::generate(&params(5, 5));
        let wrong = 1 - puzzle.answer;
        assert_eq!(puzzle.check(&puzzle.answer.to_string()), Ok(Verdict::Correct));
        assert_eq!(puzzle.check(&wrong.to_string()), Ok(Verdict::Incorrect));
        assert_eq!(puzzle.check("  "), Err(AttemptError::EmptyAnswer));
    }

    proptest! {
        #[test]
        fn prop_answer_is_bit(seed in any::<u32>(), day in 1u32..=366) {
            let puzzle = BinaryPuzzle::generate(&params(seed, day));
            prop_assert!(puzzle.answer <= 1);
            let mut expected = puzzle.first_op.apply(puzzle.bits[0], puzzle.bits[1]);
            if puzzle.tier >= 1 {
                expected = puzzle.second_op.apply(expected, puzzle.bits[2]);
            }
            if let Some(d) = puzzle.extra {
                expected ^= d;
            }
            prop_assert_eq!(puzzle.answer, expected);
        }
    }
}
