// Code lints

#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused_import_braces)]
#![warn(unused_lifetimes)]
#![warn(unused_qualifications)]

// Doc lints

#![warn(missing_docs)]

//! This crate implements a classic 9x9 Sudoku engine. It supports the
//! following key features:
//!
//! * Loading and printing Sudoku grids in a compact textual encoding
//! * Checking correctness of entire grids and of individual cells according
//! to standard Sudoku rules
//! * Solving Sudoku by constraint propagation (row/column/box elimination)
//! interleaved with backtracking search
//! * Generating random solvable puzzles
//!
//! The engine is fixed to the standard 9x9 grid tiled by 3x3 boxes. All
//! dimension arithmetic goes through the named constants [BOARD_SIZE],
//! [BOX_SIZE] and [CELL_COUNT].
//!
//! # Loading and printing grids
//!
//! See [SudokuGrid::load] for the exact format of a setup code.
//!
//! ```
//! use sudoku_engine::SudokuGrid;
//!
//! let grid = SudokuGrid::parse("53n/6nn195/n98nnnn6n");
//! assert_eq!(5, grid.get_number(0, 0));
//! assert_eq!(9, grid.get_number(1, 4));
//! assert!(grid.is_cell_empty(0, 2));
//! println!("{}", grid);
//! ```
//!
//! # Checking correctness
//!
//! A grid can be checked as a whole with [SudokuGrid::is_correct] or
//! cell-by-cell with [SudokuGrid::is_cell_correct], which allows giving
//! feedback on a single entry without re-checking the entire grid.
//!
//! ```
//! use sudoku_engine::SudokuGrid;
//!
//! let mut grid = SudokuGrid::parse("53n/6nn195");
//! assert!(grid.is_correct());
//!
//! // An (unfortunately wrong) entry in the top-right cell.
//! grid.set_number(0, 8, 5);
//! assert!(!grid.is_correct());
//! assert!(!grid.is_cell_correct(0, 8));
//! ```
//!
//! # Solving
//!
//! [ConstraintSolver](solver::ConstraintSolver) solves a grid in place and
//! reports success as a boolean. An unsolvable grid is a normal, expected
//! outcome, not an error.
//!
//! ```
//! use sudoku_engine::SudokuGrid;
//! use sudoku_engine::solver::ConstraintSolver;
//!
//! let mut grid = SudokuGrid::parse(
//!     "nnnn81nnn/nn2nn78nn/n53nnn17n/37nnnnnnn/6nnnnnnn3/nnnnnnn24/\
//!      n69nnn23n/nn59nn4nn/nnn65nnnn");
//!
//! assert!(ConstraintSolver.solve(&mut grid));
//! assert!(grid.is_full());
//! assert!(grid.is_correct());
//! ```
//!
//! # Generating puzzles
//!
//! [Generator](generator::Generator) turns a grid into a random playable
//! puzzle with between 20 and 70 clues.
//!
//! ```
//! use sudoku_engine::SudokuGrid;
//! use sudoku_engine::generator::Generator;
//!
//! let mut generator = Generator::new_default();
//! let mut grid = SudokuGrid::new();
//! generator.generate(&mut grid);
//!
//! assert!(grid.is_correct());
//! assert!((20..=70).contains(&grid.count_clues()));
//! ```

pub mod generator;
pub mod solver;
pub mod util;

use serde::{Deserialize, Serialize};

use std::fmt::{self, Display, Formatter};

use crate::util::{contains_duplicate, DigitSet};

/// The number of rows and columns of the grid, which is also the number of
/// boxes and the highest cell value.
pub const BOARD_SIZE: usize = 9;

/// The edge length of one of the square boxes tiling the grid.
pub const BOX_SIZE: usize = 3;

/// The total number of cells in the grid.
pub const CELL_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// The cell value that represents an empty cell.
pub const EMPTY_CELL: usize = 0;

pub(crate) fn index(row: usize, column: usize) -> usize {
    assert!(row < BOARD_SIZE && column < BOARD_SIZE,
        "cell ({}, {}) out of bounds", row, column);
    row * BOARD_SIZE + column
}

/// A classic 9x9 Sudoku grid. Each cell holds a value in `[0, 9]`, where
/// [EMPTY_CELL] (0) marks an empty cell. The grid is a plain value type:
/// solver and generator operate on caller-owned grids and never retain them.
///
/// Serialization goes through the same compact textual encoding that
/// [SudokuGrid::load] reads and [SudokuGrid::to_setup_string] writes.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(into = "String", from = "String")]
pub struct SudokuGrid {
    cells: [usize; CELL_COUNT]
}

impl SudokuGrid {

    /// Creates a new, empty Sudoku grid.
    pub fn new() -> SudokuGrid {
        SudokuGrid {
            cells: [EMPTY_CELL; CELL_COUNT]
        }
    }

    /// Creates a grid from a setup code. Equivalent to [SudokuGrid::load] on
    /// a fresh grid; see there for the format.
    pub fn parse(setup: &str) -> SudokuGrid {
        let mut grid = SudokuGrid::new();
        grid.load(setup);
        grid
    }

    /// Resets all cells to empty.
    pub fn clear(&mut self) {
        self.cells = [EMPTY_CELL; CELL_COUNT];
    }

    /// Clears the grid and fills it from a setup code. Rows are separated by
    /// `/`. Within a row, the character `n` skips one column, leaving it
    /// empty, and an ASCII digit writes its value (`0` writes an empty cell)
    /// and advances one column. Short rows leave their remaining cells empty.
    ///
    /// The parser is deliberately permissive: any other character is ignored
    /// without error, and writes that would land outside the 9x9 grid are
    /// dropped. Callers should not rely on the behavior of malformed codes.
    pub fn load(&mut self, setup: &str) {
        self.clear();

        let mut row = 0;
        let mut column = 0;

        for symbol in setup.chars() {
            if symbol == '/' {
                row += 1;
                column = 0;
            }
            else if symbol == 'n' {
                column += 1;
            }
            else if let Some(digit) = symbol.to_digit(10) {
                if row < BOARD_SIZE && column < BOARD_SIZE {
                    self.set_number(row, column, digit as usize);
                }

                column += 1;
            }
        }
    }

    /// Converts the grid into a setup code that [SudokuGrid::load] reads back
    /// into an equal grid. Every row is written out in full, i.e. empty
    /// trailing cells appear as `n`.
    pub fn to_setup_string(&self) -> String {
        let mut result = String::new();

        for row in 0..BOARD_SIZE {
            if row > 0 {
                result.push('/');
            }

            for column in 0..BOARD_SIZE {
                let number = self.get_number(row, column);

                if number == EMPTY_CELL {
                    result.push('n');
                }
                else {
                    result.push((b'0' + number as u8) as char);
                }
            }
        }

        result
    }

    /// Sets the cell in the given row and column to the given number, where
    /// [EMPTY_CELL] empties the cell.
    ///
    /// # Panics
    ///
    /// If `row` or `column` is not less than [BOARD_SIZE], or `number` is
    /// greater than [BOARD_SIZE]. Out-of-range access is a programming error,
    /// not a recoverable condition.
    pub fn set_number(&mut self, row: usize, column: usize, number: usize) {
        assert!(number <= BOARD_SIZE,
            "number {} out of range [0, {}]", number, BOARD_SIZE);
        self.cells[index(row, column)] = number;
    }

    /// Gets the value of the cell in the given row and column, which is
    /// [EMPTY_CELL] for an empty cell.
    ///
    /// # Panics
    ///
    /// If `row` or `column` is not less than [BOARD_SIZE].
    pub fn get_number(&self, row: usize, column: usize) -> usize {
        self.cells[index(row, column)]
    }

    /// Indicates whether the cell in the given row and column is empty.
    ///
    /// # Panics
    ///
    /// If `row` or `column` is not less than [BOARD_SIZE].
    pub fn is_cell_empty(&self, row: usize, column: usize) -> bool {
        self.get_number(row, column) == EMPTY_CELL
    }

    /// Computes the index of the box containing the cell in the given row and
    /// column. Boxes are numbered row-major, i.e. box 0 is top-left and box 8
    /// bottom-right.
    ///
    /// # Panics
    ///
    /// If `row` or `column` is not less than [BOARD_SIZE].
    pub fn box_index(row: usize, column: usize) -> usize {
        assert!(row < BOARD_SIZE && column < BOARD_SIZE,
            "cell ({}, {}) out of bounds", row, column);
        row - row % BOX_SIZE + column / BOX_SIZE
    }

    /// Computes the row and column of the top-left cell of the box with the
    /// given index.
    ///
    /// # Panics
    ///
    /// If `box_index` is not less than [BOARD_SIZE].
    pub fn box_top_left(box_index: usize) -> (usize, usize) {
        assert!(box_index < BOARD_SIZE, "box {} out of bounds", box_index);
        (box_index - box_index % BOX_SIZE, (box_index % BOX_SIZE) * BOX_SIZE)
    }

    fn row_numbers(&self, row: usize) -> impl Iterator<Item = usize> + '_ {
        (0..BOARD_SIZE)
            .map(move |column| self.get_number(row, column))
            .filter(|&number| number != EMPTY_CELL)
    }

    fn column_numbers(&self, column: usize)
            -> impl Iterator<Item = usize> + '_ {
        (0..BOARD_SIZE)
            .map(move |row| self.get_number(row, column))
            .filter(|&number| number != EMPTY_CELL)
    }

    fn box_numbers(&self, box_index: usize)
            -> impl Iterator<Item = usize> + '_ {
        let (row_0, column_0) = SudokuGrid::box_top_left(box_index);
        (0..BOARD_SIZE)
            .map(move |i|
                self.get_number(row_0 + i / BOX_SIZE, column_0 + i % BOX_SIZE))
            .filter(|&number| number != EMPTY_CELL)
    }

    /// Indicates whether the entire grid is correct, that is, no row, column
    /// or box contains a duplicate value. Empty cells never violate the
    /// rules. Returns `false` on the first violation found, without reporting
    /// its location.
    pub fn is_correct(&self) -> bool {
        for i in 0..BOARD_SIZE {
            if contains_duplicate(self.row_numbers(i))
                    || contains_duplicate(self.column_numbers(i))
                    || contains_duplicate(self.box_numbers(i)) {
                return false;
            }
        }

        true
    }

    // Complement of all values visible from (row, column), excluding the cell
    // itself.
    fn free_numbers(&self, row: usize, column: usize) -> DigitSet {
        let mut used = DigitSet::new();

        for i in 0..BOARD_SIZE {
            if i != column {
                let number = self.get_number(row, i);

                if number != EMPTY_CELL {
                    used.insert(number);
                }
            }

            if i != row {
                let number = self.get_number(i, column);

                if number != EMPTY_CELL {
                    used.insert(number);
                }
            }
        }

        let (row_0, column_0) =
            SudokuGrid::box_top_left(SudokuGrid::box_index(row, column));

        for i in 0..BOX_SIZE {
            for j in 0..BOX_SIZE {
                let (r, c) = (row_0 + i, column_0 + j);

                if r != row || c != column {
                    let number = self.get_number(r, c);

                    if number != EMPTY_CELL {
                        used.insert(number);
                    }
                }
            }
        }

        DigitSet::all() - used
    }

    /// Indicates whether the cell in the given row and column is correct,
    /// that is, it is empty or its value does not appear a second time in its
    /// row, column or box.
    ///
    /// # Panics
    ///
    /// If `row` or `column` is not less than [BOARD_SIZE].
    pub fn is_cell_correct(&self, row: usize, column: usize) -> bool {
        self.is_cell_empty(row, column)
            || self.free_numbers(row, column)
                .contains(self.get_number(row, column))
    }

    /// Computes the set of values that could legally be placed in the cell in
    /// the given row and column, i.e. all digits minus the values present in
    /// the cell's row, column and box. For a filled cell, the empty set is
    /// returned by convention.
    ///
    /// # Panics
    ///
    /// If `row` or `column` is not less than [BOARD_SIZE].
    pub fn available_numbers(&self, row: usize, column: usize) -> DigitSet {
        if self.is_cell_empty(row, column) {
            self.free_numbers(row, column)
        }
        else {
            DigitSet::new()
        }
    }

    /// Counts the number of clues given by this grid, that is, the number of
    /// non-empty cells.
    pub fn count_clues(&self) -> usize {
        self.cells.iter()
            .filter(|&&number| number != EMPTY_CELL)
            .count()
    }

    /// Indicates whether every cell of this grid is filled with a number. In
    /// this case, [SudokuGrid::count_clues] returns [CELL_COUNT].
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&number| number != EMPTY_CELL)
    }
}

impl Default for SudokuGrid {
    fn default() -> SudokuGrid {
        SudokuGrid::new()
    }
}

impl From<SudokuGrid> for String {
    fn from(grid: SudokuGrid) -> String {
        grid.to_setup_string()
    }
}

impl From<String> for SudokuGrid {
    fn from(setup: String) -> SudokuGrid {
        SudokuGrid::parse(&setup)
    }
}

impl Display for SudokuGrid {

    /// Writes a diagnostic dump of the grid intended for terminal inspection,
    /// not for machine-readable round-tripping. Cell values are
    /// space-separated with empty cells printed as 0, a `| ` separator
    /// follows every third column except the last, and a line of dashes
    /// follows every third row except the last.
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in 0..BOARD_SIZE {
            for column in 0..BOARD_SIZE {
                write!(f, "{} ", self.get_number(row, column))?;

                if column % BOX_SIZE == BOX_SIZE - 1
                        && column != BOARD_SIZE - 1 {
                    f.write_str("| ")?;
                }
            }

            f.write_str("\n")?;

            if row % BOX_SIZE == BOX_SIZE - 1 && row != BOARD_SIZE - 1 {
                writeln!(f, "{}",
                    "-".repeat((BOARD_SIZE + BOX_SIZE - 1) * 2))?;
            }
        }

        Ok(())
    }
}
