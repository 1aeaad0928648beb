//! Symbol Pattern
//!
//! A row of symbols from a six-symbol alphabet; the answer is the next one.

use std::fmt;

use serde::{Serialize, Deserialize};

use super::{AttemptError, Hint, PuzzleParams, Verdict};

/// Shortest pattern (tier 0).
pub const BASE_LENGTH: usize = 4;

/// The six-symbol alphabet, in cycle order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    /// 🔺
    Triangle,
    /// 🔵
    BlueCircle,
    /// ⬛
    BlackSquare,
    /// ⬜
    WhiteSquare,
    /// 🟢
    GreenCircle,
    /// 🟡
    YellowCircle,
}

impl Symbol {
    /// Alphabet in cycle order.
    pub const ALL: [Symbol; 6] = [
        Symbol::Triangle,
        Symbol::BlueCircle,
        Symbol::BlackSquare,
        Symbol::WhiteSquare,
        Symbol::GreenCircle,
        Symbol::YellowCircle,
    ];

    /// Symbol at a (wrapping) alphabet position.
    pub fn at(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Display glyph.
    pub fn glyph(self) -> &'static str {
        match self {
            Symbol::Triangle => "🔺",
            Symbol::BlueCircle => "🔵",
            Symbol::BlackSquare => "⬛",
            Symbol::WhiteSquare => "⬜",
            Symbol::GreenCircle => "🟢",
            Symbol::YellowCircle => "🟡",
        }
    }

    /// ASCII name.
    pub fn name(self) -> &'static str {
        match self {
            Symbol::Triangle => "triangle",
            Symbol::BlueCircle => "blue_circle",
            Symbol::BlackSquare => "black_square",
            Symbol::WhiteSquare => "white_square",
            Symbol::GreenCircle => "green_circle",
            Symbol::YellowCircle => "yellow_circle",
        }
    }

    /// Accepts the glyph or the name (case-insensitive, `-`/space as `_`).
    pub fn parse(input: &str) -> Result<Self, AttemptError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(AttemptError::EmptyAnswer);
        }
        let normalized = trimmed.to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|s| s.glyph() == trimmed || s.name() == normalized)
            .ok_or_else(|| AttemptError::UnknownSymbol(trimmed.to_string()))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

/// Pattern family.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum PatternRule {
    /// Walk the alphabet one step at a time.
    Cyclic {
        /// Alphabet index of the first symbol.
        start: usize,
    },
    /// Two symbols take turns.
    Alternating {
        /// Even positions.
        first: Symbol,
        /// Odd positions.
        second: Symbol,
    },
    /// Walk the alphabet `step` positions at a time.
    Skip {
        /// Alphabet stride (1..=3).
        step: usize,
        /// Alphabet index of the first symbol.
        start: usize,
    },
    /// Second half mirrors the first.
    Mirror,
}

impl PatternRule {
    /// Human-readable rule, used as the tier-2 hint.
    pub fn description(&self) -> String {
        match *self {
            PatternRule::Cyclic { .. } => "Cyclic pattern (symbols repeat in a fixed order)".to_string(),
            PatternRule::Alternating { .. } => {
                "Alternating pattern (two symbols take turns)".to_string()
            }
            PatternRule::Skip { step, .. } => {
                format!("Skip pattern (move {} places along the symbol row each time)", step)
            }
            PatternRule::Mirror => "Mirror pattern (second half mirrors first half)".to_string(),
        }
    }
}

/// Symbol pattern puzzle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternPuzzle {
    /// Generating rule.
    pub rule: PatternRule,
    /// Shown symbols.
    pub symbols: Vec<Symbol>,
    /// Next symbol.
    pub answer: Symbol,
    /// Difficulty tier.
    pub tier: u8,
}

impl PatternPuzzle {
    /// Generate from params.
    ///
    /// Draw order: rule family, (seeded tier), then the family's parameters.
    pub fn generate(params: &PuzzleParams) -> Self {
        let mut rng = params.rng();
        let family = rng.next_index(4);
        let tier = params.tier(&mut rng);
        let length = BASE_LENGTH + tier as usize;
        let alphabet = Symbol::ALL.len();

        let (rule, symbols, answer) = match family {
            0 => {
                let start = rng.next_index(alphabet);
                let symbols = (0..length).map(|i| Symbol::at(start + i)).collect();
                (PatternRule::Cyclic { start }, symbols, Symbol::at(start + length))
            }
            1 => {
                let first = Symbol::at(rng.next_index(alphabet));
                let second = Symbol::at(rng.next_index(alphabet));
                let symbols = (0..length).map(|i| if i % 2 == 0 { first } else { second }).collect();
                let answer = if length % 2 == 0 { first } else { second };
                (PatternRule::Alternating { first, second }, symbols, answer)
            }
            2 => {
                let step = rng.next_index(3) + 1;
                let start = rng.next_index(alphabet);
                let symbols = (0..length).map(|i| Symbol::at(start + i * step)).collect();
                (PatternRule::Skip { step, start }, symbols, Symbol::at(start + length * step))
            }
            _ => {
                let half: Vec<Symbol> = (0..length / 2)
                    .map(|_| Symbol::at(rng.next_index(alphabet)))
                    .collect();
                let mut symbols = half.clone();
                symbols.extend(half.iter().rev());
                // The mirrored half leads with the first half's last symbol.
                let answer = half[half.len() - 1];
                (PatternRule::Mirror, symbols, answer)
            }
        };

        Self { rule, symbols, answer, tier }
    }

    /// Prompt text.
    pub fn prompt(&self) -> String {
        let shown: Vec<&str> = self.symbols.iter().map(|s| s.glyph()).collect();
        let choices: Vec<&str> = Symbol::ALL.iter().map(|s| s.glyph()).collect();
        format!("What comes next? {} ?\nChoices: {}", shown.join(" "), choices.join(" "))
    }

    /// Check a chosen symbol; no choice yet is an empty answer.
    pub fn check(&self, choice: Option<Symbol>) -> Result<Verdict, AttemptError> {
        match choice {
            None => Err(AttemptError::EmptyAnswer),
            Some(symbol) if symbol == self.answer => Ok(Verdict::Correct),
            Some(_) => Ok(Verdict::Incorrect),
        }
    }

    /// Tier 1 is strategy; tier 2 names the rule.
    pub fn hint(&self, tier: u8) -> Option<Hint> {
        match tier {
            1 => Some(Hint::text(
                1,
                "Read the symbols left to right and look for a cycle, a pair taking turns, \
                 a fixed skip, or a mirror.",
            )),
            2 => Some(Hint::text(2, self.rule.description())),
            _ => None,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
