//! Puzzle Generators
//!
//! All puzzle generation is 100% deterministic: every instance is a pure
//! function of [`PuzzleParams`], so a day's puzzle can be rebuilt from its
//! date at any time.
//!
//! ## Module Structure
//!
//! - `number_grid`: 4×4 Latin-square fill-in
//! - `sequence`: next term of a numeric progression
//! - `pattern`: next symbol of a symbol pattern
//! - `binary`: boolean expression evaluation
//! - `deduction`: three-person constraint puzzle

pub mod binary;
pub mod deduction;
pub mod number_grid;
pub mod pattern;
pub mod sequence;

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::rng::DeterministicRng;
use crate::core::seed::DailyContext;

pub use binary::BinaryPuzzle;
pub use deduction::DeductionPuzzle;
pub use number_grid::{Grid, NumberGridPuzzle};
pub use pattern::{PatternPuzzle, Symbol};
pub use sequence::SequencePuzzle;

/// Highest difficulty tier.
pub const MAX_TIER: u8 = 2;

// =============================================================================
// PUZZLE KIND
// =============================================================================

/// The five daily puzzle kinds, in rotation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleKind {
    /// 4×4 Latin square.
    NumberGrid,
    /// Numeric sequence.
    Sequence,
    /// Symbol pattern.
    SymbolPattern,
    /// Boolean expression.
    BinaryLogic,
    /// Who-owns-which-pet deduction.
    Deduction,
}

impl PuzzleKind {
    /// All kinds in rotation order.
    pub const ALL: [PuzzleKind; 5] = [
        PuzzleKind::NumberGrid,
        PuzzleKind::Sequence,
        PuzzleKind::SymbolPattern,
        PuzzleKind::BinaryLogic,
        PuzzleKind::Deduction,
    ];

    /// Kind scheduled for a given day of the year.
    pub fn for_day(day_of_year: u32) -> Self {
        Self::ALL[day_of_year as usize % Self::ALL.len()]
    }

    /// Short name used in storage keys.
    pub fn slug(self) -> &'static str {
        match self {
            PuzzleKind::NumberGrid => "number",
            PuzzleKind::Sequence => "sequence",
            PuzzleKind::SymbolPattern => "pattern",
            PuzzleKind::BinaryLogic => "binary",
            PuzzleKind::Deduction => "deduction",
        }
    }
}

impl fmt::Display for PuzzleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

// =============================================================================
// DIFFICULTY
// =============================================================================

/// Where the difficulty tier comes from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyMode {
    /// Scales with the fraction of the year elapsed.
    #[default]
    Calendar,
    /// Drawn from the day's PRNG.
    Seeded,
}

impl FromStr for DifficultyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "calendar" => Ok(DifficultyMode::Calendar),
            "seeded" => Ok(DifficultyMode::Seeded),
            other => Err(format!("unknown difficulty mode '{}'", other)),
        }
    }
}

/// Inputs to every generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleParams {
    /// Seed for the day's PRNG.
    pub seed: u32,
    /// Ordinal day of the year.
    pub day_of_year: u32,
    /// Difficulty source.
    pub mode: DifficultyMode,
}

impl PuzzleParams {
    /// Params for a daily context.
    pub fn from_context(ctx: &DailyContext, mode: DifficultyMode) -> Self {
        Self {
            seed: ctx.seed,
            day_of_year: ctx.day_of_year,
            mode,
        }
    }

    /// Fresh PRNG for this seed.
    pub fn rng(&self) -> DeterministicRng {
        DeterministicRng::new(self.seed)
    }

    /// Tier from the calendar: `floor(day / 365 * 3)`, capped at [`MAX_TIER`].
    pub fn calendar_tier(&self) -> u8 {
        let tier = (self.day_of_year as f64 / 365.0 * 3.0).floor() as u8;
        tier.min(MAX_TIER)
    }

    /// Resolve the tier, consuming one draw in seeded mode.
    pub fn tier(&self, rng: &mut DeterministicRng) -> u8 {
        match self.mode {
            DifficultyMode::Calendar => self.calendar_tier(),
            DifficultyMode::Seeded => rng.next_index(MAX_TIER as usize + 1) as u8,
        }
    }
}

// =============================================================================
// ATTEMPTS AND VERDICTS
// =============================================================================

/// Input the user could not have meant as an answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    /// Nothing was entered.
    #[error("answer is empty")]
    EmptyAnswer,

    /// Expected a number.
    #[error("'{0}' is not a number")]
    NotANumber(String),

    /// Grid digit outside 1..=4.
    #[error("digit {value} at row {row}, column {col} is outside 1-4")]
    DigitOutOfRange {
        /// Zero-based row.
        row: usize,
        /// Zero-based column.
        col: usize,
        /// Offending value.
        value: u8,
    },

    /// Grid text could not be read as 16 cells.
    #[error("malformed grid: {0}")]
    MalformedGrid(String),

    /// Not one of the six symbols.
    #[error("unknown symbol '{0}'")]
    UnknownSymbol(String),

    /// Attempt shape does not fit the puzzle.
    #[error("attempt does not fit a {expected} puzzle")]
    KindMismatch {
        /// Kind of the puzzle being answered.
        expected: PuzzleKind,
    },
}

/// The user's working answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Attempt {
    /// Partially filled grid.
    Grid(Grid),
    /// Free text (sequence, binary, deduction).
    Text(String),
    /// Chosen symbol, if any.
    Symbol(Option<Symbol>),
}

impl Attempt {
    /// Parse raw user input for a puzzle of `kind`.
    pub fn parse(kind: PuzzleKind, input: &str) -> Result<Self, AttemptError> {
        match kind {
            PuzzleKind::NumberGrid => number_grid::parse_grid(input).map(Attempt::Grid),
            PuzzleKind::SymbolPattern => Symbol::parse(input).map(|s| Attempt::Symbol(Some(s))),
            _ => Ok(Attempt::Text(input.to_string())),
        }
    }
}

/// Outcome of checking a well-formed attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Matches the canonical answer.
    Correct,
    /// Wrong answer.
    Incorrect,
    /// Breaks the puzzle's rules (incomplete or non-Latin grid).
    RuleViolation,
}

impl Verdict {
    /// True for [`Verdict::Correct`].
    pub fn is_correct(self) -> bool {
        matches!(self, Verdict::Correct)
    }
}

/// Parse a trimmed numeric answer. Integral decimals such as `"8.0"` are accepted.
pub(crate) fn parse_number(text: &str) -> Result<f64, AttemptError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AttemptError::EmptyAnswer);
    }
    if let Ok(v) = trimmed.parse::<i64>() {
        return Ok(v as f64);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(AttemptError::NotANumber(trimmed.to_string())),
    }
}

// =============================================================================
// HINTS
// =============================================================================

/// A cell filled in by a hint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellReveal {
    /// Zero-based row.
    pub row: usize,
    /// Zero-based column.
    pub col: usize,
    /// Canonical digit.
    pub value: u8,
}

/// One tier of hint text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hint {
    /// 1 = strategy, 2+ = rule or partial solution.
    pub tier: u8,
    /// Text shown to the user.
    pub text: String,
    /// Grid cell revealed by this hint.
    pub reveal: Option<CellReveal>,
}

impl Hint {
    pub(crate) fn text(tier: u8, text: impl Into<String>) -> Self {
        Self { tier, text: text.into(), reveal: None }
    }
}

// =============================================================================
// PUZZLE INSTANCE
// =============================================================================

/// One generated puzzle. Never mutated after generation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PuzzleInstance {
    /// 4×4 Latin square.
    NumberGrid(NumberGridPuzzle),
    /// Numeric sequence.
    Sequence(SequencePuzzle),
    /// Symbol pattern.
    SymbolPattern(PatternPuzzle),
    /// Boolean expression.
    BinaryLogic(BinaryPuzzle),
    /// Deduction grid.
    Deduction(DeductionPuzzle),
}

impl PuzzleInstance {
    /// Generate a puzzle of the given kind.
    pub fn generate(kind: PuzzleKind, params: &PuzzleParams) -> Self {
        match kind {
            PuzzleKind::NumberGrid => PuzzleInstance::NumberGrid(NumberGridPuzzle::generate(params)),
            PuzzleKind::Sequence => PuzzleInstance::Sequence(SequencePuzzle::generate(params)),
            PuzzleKind::SymbolPattern => PuzzleInstance::SymbolPattern(PatternPuzzle::generate(params)),
            PuzzleKind::BinaryLogic => PuzzleInstance::BinaryLogic(BinaryPuzzle::generate(params)),
            PuzzleKind::Deduction => PuzzleInstance::Deduction(DeductionPuzzle::generate(params)),
        }
    }

    /// The puzzle scheduled for a daily context.
    pub fn for_day(ctx: &DailyContext, mode: DifficultyMode) -> Self {
        let params = PuzzleParams::from_context(ctx, mode);
        Self::generate(PuzzleKind::for_day(ctx.day_of_year), &params)
    }

    /// Which of the five kinds this is.
    pub fn kind(&self) -> PuzzleKind {
        match self {
            PuzzleInstance::NumberGrid(_) => PuzzleKind::NumberGrid,
            PuzzleInstance::Sequence(_) => PuzzleKind::Sequence,
            PuzzleInstance::SymbolPattern(_) => PuzzleKind::SymbolPattern,
            PuzzleInstance::BinaryLogic(_) => PuzzleKind::BinaryLogic,
            PuzzleInstance::Deduction(_) => PuzzleKind::Deduction,
        }
    }

    /// Prompt text shown to the user.
    pub fn prompt(&self) -> String {
        match self {
            PuzzleInstance::NumberGrid(p) => p.prompt(),
            PuzzleInstance::Sequence(p) => p.prompt(),
            PuzzleInstance::SymbolPattern(p) => p.prompt(),
            PuzzleInstance::BinaryLogic(p) => p.prompt(),
            PuzzleInstance::Deduction(p) => p.prompt(),
        }
    }

    /// Canonical answer, formatted.
    pub fn answer_text(&self) -> String {
        match self {
            PuzzleInstance::NumberGrid(p) => number_grid::format_grid(&p.solution_grid()),
            PuzzleInstance::Sequence(p) => p.answer.to_string(),
            PuzzleInstance::SymbolPattern(p) => p.answer.glyph().to_string(),
            PuzzleInstance::BinaryLogic(p) => p.answer.to_string(),
            PuzzleInstance::Deduction(p) => p.answer.name().to_string(),
        }
    }

    /// Empty working attempt (the givens, for a grid).
    pub fn blank_attempt(&self) -> Attempt {
        match self {
            PuzzleInstance::NumberGrid(p) => Attempt::Grid(p.givens),
            PuzzleInstance::SymbolPattern(_) => Attempt::Symbol(None),
            _ => Attempt::Text(String::new()),
        }
    }

    /// Check an attempt against the canonical answer.
    pub fn check_answer(&self, attempt: &Attempt) -> Result<Verdict, AttemptError> {
        let expected = self.kind();
        match (self, attempt) {
            (PuzzleInstance::NumberGrid(p), Attempt::Grid(grid)) => p.check(grid),
            (PuzzleInstance::Sequence(p), Attempt::Text(text)) => p.check(text),
            (PuzzleInstance::SymbolPattern(p), Attempt::Symbol(choice)) => p.check(*choice),
            (PuzzleInstance::BinaryLogic(p), Attempt::Text(text)) => p.check(text),
            (PuzzleInstance::Deduction(p), Attempt::Text(text)) => p.check(text),
            _ => Err(AttemptError::KindMismatch { expected }),
        }
    }

    /// True only for a correct, well-formed attempt.
    pub fn is_correct(&self, attempt: &Attempt) -> bool {
        matches!(self.check_answer(attempt), Ok(Verdict::Correct))
    }

    /// Hint for a tier (1-based). `None` past the last tier.
    pub fn hint(&self, tier: u8) -> Option<Hint> {
        match self {
            PuzzleInstance::NumberGrid(p) => p.hint(tier),
            PuzzleInstance::Sequence(p) => p.hint(tier),
            PuzzleInstance::SymbolPattern(p) => p.hint(tier),
            PuzzleInstance::BinaryLogic(p) => p.hint(tier),
            PuzzleInstance::Deduction(p) => p.hint(tier),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
