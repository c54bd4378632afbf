//! This module contains logic for generating random Sudoku.
//!
//! Generation of Sudoku puzzles is done by seeding parts of the grid with
//! random digits, completing it to a full solution with the
//! [ConstraintSolver] and then removing a random selection of clues. See
//! [Generator::generate] for details.

use log::{debug, error};

use rand::Rng;
use rand::rngs::ThreadRng;

use crate::{SudokuGrid, BOARD_SIZE, BOX_SIZE, CELL_COUNT, EMPTY_CELL};
use crate::solver::ConstraintSolver;

/// The fewest clues [Generator::generate] removes from a completed grid.
const MIN_REMOVALS: usize = 11;

/// The most clues [Generator::generate] removes from a completed grid.
const MAX_REMOVALS: usize = 61;

/// A generator of random Sudoku puzzles. Generic over the random number
/// generator, which drives the seeded digits, the number of removed clues
/// and their positions. The same RNG state yields the same puzzle.
pub struct Generator<R: Rng> {
    rng: R
}

impl Generator<ThreadRng> {

    /// Creates a new generator that uses the thread's preferred random
    /// number generator.
    pub fn new_default() -> Generator<ThreadRng> {
        Generator::new(rand::thread_rng())
    }
}

// Fisher-Yates over the collected values.
pub(crate) fn shuffle<T>(rng: &mut impl Rng, values: impl Iterator<Item = T>)
        -> Vec<T> {
    let mut vec: Vec<T> = values.collect();

    for i in 0..vec.len().saturating_sub(1) {
        let j = rng.gen_range(i..vec.len());
        vec.swap(i, j);
    }

    vec
}

impl<R: Rng> Generator<R> {

    /// Creates a new generator that uses the given random number generator
    /// to generate random digits.
    pub fn new(rng: R) -> Generator<R> {
        Generator {
            rng
        }
    }

    // The three diagonal boxes share no row, column or box, so any
    // combination of permutations is consistent and completable.
    fn seed_diagonal(&mut self, grid: &mut SudokuGrid) {
        for box_index in (0..BOARD_SIZE).step_by(BOX_SIZE + 1) {
            let numbers = shuffle(&mut self.rng, 1..=BOARD_SIZE);
            let (row_0, column_0) = SudokuGrid::box_top_left(box_index);

            for i in 0..BOX_SIZE {
                for j in 0..BOX_SIZE {
                    grid.set_number(row_0 + i, column_0 + j,
                        numbers[i * BOX_SIZE + j]);
                }
            }
        }
    }

    /// Fills the given grid with a random playable puzzle, discarding any
    /// previous content. The three diagonal boxes are seeded with random
    /// permutations of the digits, the grid is completed by the
    /// [ConstraintSolver] and between 11 and 61 randomly chosen cells are
    /// emptied again, leaving a correct puzzle with 20 to 70 clues that is
    /// solvable by construction.
    ///
    /// # Panics
    ///
    /// If the solver fails to complete the seeded grid, which cannot happen
    /// for a correct solver.
    pub fn generate(&mut self, grid: &mut SudokuGrid) {
        grid.clear();
        self.seed_diagonal(grid);

        if !ConstraintSolver.solve(grid) {
            error!("could not complete diagonally seeded grid:\n{}", grid);
            panic!("diagonally seeded grid was not completable");
        }

        let cells = shuffle(&mut self.rng, 0..CELL_COUNT);
        let removals = self.rng.gen_range(MIN_REMOVALS..=MAX_REMOVALS);
        debug!("removing {} of {} cells", removals, CELL_COUNT);

        for &cell in &cells[..removals] {
            grid.set_number(cell / BOARD_SIZE, cell % BOARD_SIZE, EMPTY_CELL);
        }
    }
}
