//! Number Grid
//!
//! A 4×4 Latin square with 2×2 boxes. The solution is a fixed valid square
//! with one row pair and one column pair swapped by seed parity; a
//! seed-dependent number of cells is then blanked.
//!
//! A submission must obey the row/column/box rules AND equal the canonical
//! solution exactly. Other valid completions are rejected.

use serde::{Serialize, Deserialize};

use super::{AttemptError, CellReveal, DifficultyMode, Hint, PuzzleParams, Verdict};

/// Grid side length.
pub const GRID_SIZE: usize = 4;

/// A grid of optional digits; `None` is blank.
pub type Grid = [[Option<u8>; GRID_SIZE]; GRID_SIZE];

/// Fixed valid square every daily solution is derived from.
pub const BASE_SOLUTION: [[u8; GRID_SIZE]; GRID_SIZE] = [
    [1, 2, 3, 4],
    [3, 4, 1, 2],
    [2, 1, 4, 3],
    [4, 3, 2, 1],
];

/// Fewest blanks in a puzzle.
pub const MIN_BLANKS: usize = 4;

/// Number grid puzzle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberGridPuzzle {
    /// Canonical solution.
    pub solution: [[u8; GRID_SIZE]; GRID_SIZE],
    /// Solution with blanks punched out.
    pub givens: Grid,
    /// Blanked cells, row-major.
    pub blanks: Vec<(usize, usize)>,
}

impl NumberGridPuzzle {
    /// Generate from params.
    pub fn generate(params: &PuzzleParams) -> Self {
        let seed = params.seed as u64;
        let parity = (seed % 2) as usize;

        let mut solution = BASE_SOLUTION;
        solution.swap(parity * 2, parity * 2 + 1);
        for row in solution.iter_mut() {
            row.swap(parity * 2, parity * 2 + 1);
        }

        let mut givens: Grid = [[None; GRID_SIZE]; GRID_SIZE];
        for (r, row) in solution.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                givens[r][c] = Some(value);
            }
        }

        let mut blanks = blank_walk(seed, blank_count(params));
        for &(r, c) in &blanks {
            givens[r][c] = None;
        }
        blanks.sort_unstable();

        Self { solution, givens, blanks }
    }

    /// Solution as a fully filled [`Grid`].
    pub fn solution_grid(&self) -> Grid {
        let mut grid: Grid = [[None; GRID_SIZE]; GRID_SIZE];
        for (r, row) in self.solution.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                grid[r][c] = Some(value);
            }
        }
        grid
    }

    /// Prompt with `.` for blanks.
    pub fn prompt(&self) -> String {
        format!(
            "Fill the grid so every row, column and 2x2 box holds 1-4:\n{}",
            format_grid(&self.givens)
        )
    }

    /// Check a submitted grid.
    pub fn check(&self, grid: &Grid) -> Result<Verdict, AttemptError> {
        validate_digits(grid)?;
        if !is_valid_solution(grid) {
            return Ok(Verdict::RuleViolation);
        }
        if *grid != self.solution_grid() {
            return Ok(Verdict::Incorrect);
        }
        Ok(Verdict::Correct)
    }

    /// Tier 1 is strategy; each later tier reveals the next blank cell.
    pub fn hint(&self, tier: u8) -> Option<Hint> {
        match tier {
            0 => None,
            1 => Some(Hint::text(
                1,
                "Each row, column and 2x2 box holds 1, 2, 3 and 4 exactly once. \
                 Start with the line that has the fewest blanks.",
            )),
            _ => {
                let &(row, col) = self.blanks.get(tier as usize - 2)?;
                let value = self.solution[row][col];
                Some(Hint {
                    tier,
                    text: format!("Row {}, column {} is {}.", row + 1, col + 1, value),
                    reveal: Some(CellReveal { row, col, value }),
                })
            }
        }
    }
}

/// Number of cells to blank.
///
/// Calendar mode scales 4..=12 across the year; seeded mode uses `4 + seed mod 6`.
pub fn blank_count(params: &PuzzleParams) -> usize {
    let extra = match params.mode {
        DifficultyMode::Calendar => (params.day_of_year as f64 / 365.0 * 8.0).floor() as usize,
        DifficultyMode::Seeded => (params.seed % 6) as usize,
    };
    (MIN_BLANKS + extra).min(GRID_SIZE * GRID_SIZE)
}

/// Cells to blank, in visiting order.
///
/// Starts at `(seed mod 4, 3·seed mod 4)` and steps row +1, column +2.
/// That stride closes after four cells, so each closed orbit shifts the
/// walk one column right.
fn blank_walk(seed: u64, count: usize) -> Vec<(usize, usize)> {
    let count = count.min(GRID_SIZE * GRID_SIZE);
    let mut blanked = [[false; GRID_SIZE]; GRID_SIZE];
    let mut order = Vec::with_capacity(count);

    let mut r = (seed % 4) as usize;
    let mut c = ((seed * 3) % 4) as usize;
    let mut steps = 0;

    while order.len() < count {
        if !blanked[r][c] {
            blanked[r][c] = true;
            order.push((r, c));
        }
        r = (r + 1) % GRID_SIZE;
        c = (c + 2) % GRID_SIZE;
        steps += 1;
        if steps % GRID_SIZE == 0 {
            c = (c + 1) % GRID_SIZE;
        }
    }

    order
}

/// Reject digits outside 1..=4.
fn validate_digits(grid: &Grid) -> Result<(), AttemptError> {
    for (row, cells) in grid.iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if let Some(value) = *cell {
                if !(1..=4).contains(&value) {
                    return Err(AttemptError::DigitOutOfRange { row, col, value });
                }
            }
        }
    }
    Ok(())
}

/// Full grid with unique digits in every row, column and 2×2 box.
pub fn is_valid_solution(grid: &Grid) -> bool {
    let unique = |cells: [Option<u8>; GRID_SIZE]| {
        let mut seen = [false; GRID_SIZE + 1];
        cells.iter().all(|cell| match cell {
            Some(v @ 1..=4) if !seen[*v as usize] => {
                seen[*v as usize] = true;
                true
            }
            _ => false,
        })
    };

    let rows_ok = (0..GRID_SIZE).all(|r| unique(grid[r]));
    let cols_ok = (0..GRID_SIZE).all(|c| unique([grid[0][c], grid[1][c], grid[2][c], grid[3][c]]));
    let boxes_ok = [(0, 0), (0, 2), (2, 0), (2, 2)].iter().all(|&(br, bc)| {
        unique([grid[br][bc], grid[br][bc + 1], grid[br + 1][bc], grid[br + 1][bc + 1]])
    });

    rows_ok && cols_ok && boxes_ok
}

/// Render rows as `12.4` lines.
pub fn format_grid(grid: &Grid) -> String {
    grid.iter()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Some(v) => char::from(b'0' + v),
                    None => '.',
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse 16 cells of digits or `.`/`_`; whitespace, `/` and `,` separate rows.
pub fn parse_grid(input: &str) -> Result<Grid, AttemptError> {
    let cells: Vec<char> = input
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != '/' && *ch != ',')
        .collect();

    if cells.len() != GRID_SIZE * GRID_SIZE {
        return Err(AttemptError::MalformedGrid(format!(
            "expected {} cells, got {}",
            GRID_SIZE * GRID_SIZE,
            cells.len()
        )));
    }

    let mut grid: Grid = [[None; GRID_SIZE]; GRID_SIZE];
    for (i, ch) in cells.into_iter().enumerate() {
        let (row, col) = (i / GRID_SIZE, i % GRID_SIZE);
        grid[row][col] = match ch {
            '.' | '_' => None,
            d if d.is_ascii_digit() => {
                let value = d as u8 - b'0';
                if !(1..=4).contains(&value) {
                    return Err(AttemptError::DigitOutOfRange { row, col, value });
                }
                Some(value)
            }
            other => return Err(AttemptError::MalformedGrid(format!("unexpected '{}'", other))),
        };
    }

    Ok(grid)
}

// =============================================================================
// TESTS
// =============================================================================
