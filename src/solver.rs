//! This module contains the logic for solving Sudoku.
//!
//! Most importantly, this module contains the definition of
//! [ConstraintSolver], which combines constraint propagation with
//! backtracking search. See its documentation for details on the algorithm.

use log::{debug, trace};

use crate::{index, SudokuGrid, BOARD_SIZE, BOX_SIZE, CELL_COUNT};
use crate::util::DigitSet;

/// The activity state of one box during a solve. A box is *filled* once it
/// contains no more empty cells and *evaluated* once no values are pending
/// propagation. Eliminations elsewhere on the board re-queue values here, so
/// a box can leave the evaluated state again.
#[derive(Clone, Copy)]
struct BoxRecord {
    empty_cells: usize,
    pending: DigitSet
}

impl BoxRecord {

    fn is_filled(&self) -> bool {
        self.empty_cells == 0
    }

    fn is_evaluated(&self) -> bool {
        self.pending.is_empty()
    }
}

/// A line along which a value is eliminated from candidate sets.
#[derive(Clone, Copy)]
enum Line {
    Row,
    Column
}

/// The result of folding the positions of all cells in a box that admit some
/// value over one coordinate (row or column).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum LineMatch {

    /// No admitting cell has been seen yet.
    Unset,

    /// All admitting cells so far share this coordinate.
    Common(usize),

    /// Admitting cells lie on at least two different lines.
    Divergent
}

impl LineMatch {

    fn merge(self, line: usize) -> LineMatch {
        match self {
            LineMatch::Unset => LineMatch::Common(line),
            LineMatch::Common(common) if common == line => self,
            _ => LineMatch::Divergent
        }
    }
}

/// A deep copy of all state a guess can modify, taken before the guess and
/// restored wholesale if the branch fails. Candidate map and box records are
/// plain `Copy` arrays, so capture and restore are cheap memcpys.
struct Checkpoint {
    grid: SudokuGrid,
    candidates: [DigitSet; CELL_COUNT],
    boxes: [BoxRecord; BOARD_SIZE]
}

impl Checkpoint {

    fn capture(grid: &SudokuGrid, state: &SolverState) -> Checkpoint {
        Checkpoint {
            grid: grid.clone(),
            candidates: state.candidates,
            boxes: state.boxes
        }
    }

    fn restore(&self, grid: &mut SudokuGrid, state: &mut SolverState) {
        *grid = self.grid.clone();
        state.candidates = self.candidates;
        state.boxes = self.boxes;
    }
}

/// All working state of one solve: the candidate map (meaningful for empty
/// cells only), the per-box activity records and a guess counter for
/// diagnostics. Built fresh for every call to [ConstraintSolver::solve].
struct SolverState {
    candidates: [DigitSet; CELL_COUNT],
    boxes: [BoxRecord; BOARD_SIZE],
    guesses: usize
}

impl SolverState {

    fn new(grid: &SudokuGrid) -> SolverState {
        let mut boxes = [BoxRecord {
            empty_cells: 0,
            pending: DigitSet::all()
        }; BOARD_SIZE];

        for (box_index, record) in boxes.iter_mut().enumerate() {
            let (row_0, column_0) = SudokuGrid::box_top_left(box_index);

            for i in 0..BOX_SIZE {
                for j in 0..BOX_SIZE {
                    let (row, column) = (row_0 + i, column_0 + j);

                    if grid.is_cell_empty(row, column) {
                        record.empty_cells += 1;
                    }
                    else {
                        record.pending.remove(grid.get_number(row, column));
                    }
                }
            }
        }

        let mut candidates = [DigitSet::new(); CELL_COUNT];

        for row in 0..BOARD_SIZE {
            for column in 0..BOARD_SIZE {
                candidates[index(row, column)] =
                    grid.available_numbers(row, column);
            }
        }

        SolverState {
            candidates,
            boxes,
            guesses: 0
        }
    }

    /// Finds the index of the box propagation should process next. Boxes
    /// with pending values are preferred over evaluated ones; among those,
    /// unfilled boxes with the fewest empty cells win. Ties resolve to the
    /// lowest index, which keeps the solver deterministic.
    fn find_best_box(&self) -> usize {
        fn precedes(a: &BoxRecord, b: &BoxRecord) -> bool {
            if a.is_evaluated() == b.is_evaluated() {
                !a.is_filled() && a.empty_cells < b.empty_cells
            }
            else {
                !a.is_evaluated()
            }
        }

        let mut best = 0;

        for box_index in 1..BOARD_SIZE {
            if precedes(&self.boxes[box_index], &self.boxes[best]) {
                best = box_index;
            }
        }

        best
    }

    /// Finds the coordinates of the cell with the fewest, but at least one,
    /// candidate value (first such cell in row-major order). If no cell has
    /// any candidates, `(0, 0)` is returned; on a fully propagated board
    /// that means every cell is filled.
    fn find_best_cell(&self) -> (usize, usize) {
        let mut best = (0, 0);
        let mut best_len = BOARD_SIZE;

        for row in 0..BOARD_SIZE {
            for column in 0..BOARD_SIZE {
                let len = self.candidates[index(row, column)].len();

                if len != 0 && len < best_len {
                    best = (row, column);
                    best_len = len;
                }
            }
        }

        best
    }

    /// Removes `number` from the candidate sets of all empty cells on the
    /// given line that lie outside `source_box`. Every affected cell's value
    /// is re-queued in its box's pending set, and a cell reduced to a single
    /// candidate re-queues that remaining value as well, so the forced
    /// placement is picked up by propagation. Returns `false` if some cell
    /// is left without candidates, which proves the current position
    /// contradictory.
    fn eliminate(&mut self, grid: &SudokuGrid, line: Line, line_index: usize,
            source_box: usize, number: usize) -> bool {
        for i in 0..BOARD_SIZE {
            let (row, column) = match line {
                Line::Row => (line_index, i),
                Line::Column => (i, line_index)
            };
            let box_index = SudokuGrid::box_index(row, column);
            let cell = index(row, column);

            if box_index != source_box && grid.is_cell_empty(row, column)
                    && self.candidates[cell].contains(number) {
                self.candidates[cell].remove(number);
                self.boxes[box_index].pending.insert(number);

                if self.candidates[cell].is_empty() {
                    return false;
                }

                if self.candidates[cell].len() == 1 {
                    for forced in self.candidates[cell] {
                        self.boxes[box_index].pending.insert(forced);
                    }
                }
            }
        }

        true
    }

    /// Places `number` in the given cell and updates all solver state. The
    /// row and column eliminations run first, before the grid is touched, so
    /// a contradiction (`false`) aborts with the cell still unset. On
    /// success the number is erased from all candidate sets of the cell's
    /// box, the cell's own former candidates are re-queued for evaluation
    /// and its candidate set is cleared.
    fn assign(&mut self, grid: &mut SudokuGrid, row: usize, column: usize,
            number: usize) -> bool {
        let box_index = SudokuGrid::box_index(row, column);

        if !self.eliminate(grid, Line::Row, row, box_index, number)
                || !self.eliminate(
                    grid, Line::Column, column, box_index, number) {
            return false;
        }

        grid.set_number(row, column, number);

        let (row_0, column_0) = SudokuGrid::box_top_left(box_index);

        for i in 0..BOX_SIZE {
            for j in 0..BOX_SIZE {
                self.candidates[index(row_0 + i, column_0 + j)]
                    .remove(number);
            }
        }

        let former_candidates = self.candidates[index(row, column)];
        let record = &mut self.boxes[box_index];
        record.pending.union_assign(former_candidates);
        record.pending.remove(number);
        record.empty_cells -= 1;
        self.candidates[index(row, column)].clear();

        true
    }

    fn solve_rec(&mut self, grid: &mut SudokuGrid, depth: usize) -> bool {

        // Phase 1: propagate pending values box by box until quiescence.

        let mut box_index = self.find_best_box();

        while !self.boxes[box_index].is_filled()
                && !self.boxes[box_index].is_evaluated() {
            let (row_0, column_0) = SudokuGrid::box_top_left(box_index);

            // Copied out so the iteration does not observe values re-queued
            // by its own eliminations.
            let pending = self.boxes[box_index].pending;
            self.boxes[box_index].pending.clear();

            for number in pending {
                let mut common_row = LineMatch::Unset;
                let mut common_column = LineMatch::Unset;

                for i in 0..BOX_SIZE {
                    for j in 0..BOX_SIZE {
                        let (row, column) = (row_0 + i, column_0 + j);

                        if self.candidates[index(row, column)]
                                .contains(number) {
                            common_row = common_row.merge(row);
                            common_column = common_column.merge(column);
                        }
                    }
                }

                let consistent = match (common_row, common_column) {
                    (LineMatch::Common(row), LineMatch::Common(column)) =>
                        self.assign(grid, row, column, number),
                    (LineMatch::Common(row), _) =>
                        self.eliminate(
                            grid, Line::Row, row, box_index, number),
                    (_, LineMatch::Common(column)) =>
                        self.eliminate(
                            grid, Line::Column, column, box_index, number),

                    // No admitting cell left or no common line: nothing to
                    // deduce for this value.
                    _ => true
                };

                if !consistent {
                    return false;
                }
            }

            box_index = self.find_best_box();
        }

        // Phase 2: guess on the most constrained cell.

        let (row, column) = self.find_best_cell();

        if !grid.is_cell_empty(row, column) {
            return true;
        }

        let checkpoint = Checkpoint::capture(grid, self);

        for number in checkpoint.candidates[index(row, column)] {
            self.guesses += 1;
            trace!("depth {}: guessing {} at ({}, {})",
                depth, number, row, column);

            if self.assign(grid, row, column, number)
                    && self.solve_rec(grid, depth + 1) {
                return true;
            }

            checkpoint.restore(grid, self);
        }

        false
    }
}

/// A solver for classic Sudoku grids. Solving happens in two interleaved
/// phases: a propagation phase deduces placements and candidate
/// eliminations from one box at a time (a value whose admitting cells
/// within a box share a row or column cannot appear elsewhere on that
/// line), and a search phase guesses a value for the cell with the fewest
/// candidates, backtracking to a checkpoint if the guess turns out
/// contradictory.
///
/// The solver is deterministic: candidates are tried in ascending order and
/// all scans run in a fixed order, so equal inputs produce equal solutions.
pub struct ConstraintSolver;

impl ConstraintSolver {

    /// Solves the given grid in place, filling every empty cell such that
    /// the result is correct. Returns `false` if the grid has no solution;
    /// grids that already violate [SudokuGrid::is_correct] or contain an
    /// empty cell with no placeable value are rejected before any
    /// propagation, leaving the grid untouched. Filled cells are taken as
    /// fixed clues.
    pub fn solve(&self, grid: &mut SudokuGrid) -> bool {
        if !grid.is_correct() {
            return false;
        }

        let mut state = SolverState::new(grid);

        // An empty cell that starts out without candidates can never be
        // filled, but eliminations only signal failure when they shrink a
        // set to zero themselves, so it has to be rejected up front.
        for row in 0..BOARD_SIZE {
            for column in 0..BOARD_SIZE {
                if grid.is_cell_empty(row, column)
                        && state.candidates[index(row, column)].is_empty() {
                    return false;
                }
            }
        }
        let result = state.solve_rec(grid, 0);

        debug!("solve {} after {} guesses",
            if result { "succeeded" } else { "failed" }, state.guesses);

        result
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    const CLASSIC_PUZZLE: &str =
        "nnnn81nnn/nn2nn78nn/n53nnn17n/37nnnnnnn/6nnnnnnn3/nnnnnnn24/\
         n69nnn23n/nn59nn4nn/nnn65nnnn";

    const CLASSIC_SOLUTION: &str =
        "746281359/912537846/853496172/374125698/628749513/591368724/\
         169874235/285913467/437652981";

    #[test]
    fn solves_classic_puzzle() {
        let mut grid = SudokuGrid::parse(CLASSIC_PUZZLE);

        assert!(ConstraintSolver.solve(&mut grid));
        assert_eq!(SudokuGrid::parse(CLASSIC_SOLUTION), grid);
    }

    #[test]
    fn solved_grid_is_full_and_correct() {
        let mut grid = SudokuGrid::parse(CLASSIC_PUZZLE);

        assert!(ConstraintSolver.solve(&mut grid));
        assert!(grid.is_full());
        assert!(grid.is_correct());
    }

    #[test]
    fn solving_is_deterministic() {
        let mut first = SudokuGrid::parse(CLASSIC_PUZZLE);
        let mut second = SudokuGrid::parse(CLASSIC_PUZZLE);

        assert!(ConstraintSolver.solve(&mut first));
        assert!(ConstraintSolver.solve(&mut second));
        assert_eq!(first, second);
    }

    #[test]
    fn solves_empty_grid() {
        let mut grid = SudokuGrid::new();

        assert!(ConstraintSolver.solve(&mut grid));
        assert!(grid.is_full());
        assert!(grid.is_correct());
    }

    #[test]
    fn full_correct_grid_is_accepted_unchanged() {
        let mut grid = SudokuGrid::parse(CLASSIC_SOLUTION);

        assert!(ConstraintSolver.solve(&mut grid));
        assert_eq!(SudokuGrid::parse(CLASSIC_SOLUTION), grid);
    }

    #[test]
    fn duplicate_in_row_rejected_before_search() {
        let mut grid = SudokuGrid::parse("5nnn5");
        let original = grid.clone();

        assert!(!ConstraintSolver.solve(&mut grid));
        assert_eq!(original, grid);
    }

    #[test]
    fn duplicate_in_column_rejected() {
        let mut grid = SudokuGrid::parse("n3/n/n/n/n/n3");
        assert!(!ConstraintSolver.solve(&mut grid));
    }

    #[test]
    fn duplicate_in_box_rejected() {
        let mut grid = SudokuGrid::parse("nnnnnn7/nnnnnnn7");
        assert!(!ConstraintSolver.solve(&mut grid));
    }

    #[test]
    fn stranded_cell_rejected_without_search() {
        // Cell (0, 8) sees 1 to 8 in its row and 9 in its column, so the
        // grid is correct but can never be completed.
        let mut grid = SudokuGrid::parse("12345678n/n/n/n/nnnnnnnn9");
        let original = grid.clone();

        assert!(grid.is_correct());
        assert!(!ConstraintSolver.solve(&mut grid));
        assert_eq!(original, grid);
    }

    #[test]
    fn single_missing_cell_filled_without_guessing() {
        let mut grid = SudokuGrid::parse(CLASSIC_SOLUTION);
        grid.set_number(4, 4, 0);

        let mut state = SolverState::new(&grid);

        assert!(state.solve_rec(&mut grid, 0));
        assert_eq!(0, state.guesses);
        assert_eq!(SudokuGrid::parse(CLASSIC_SOLUTION), grid);
    }

    #[test]
    fn forced_diagonal_filled_without_guessing() {
        // Clearing the main diagonal of a solution leaves every cleared
        // cell with exactly one candidate, so propagation alone must
        // restore the grid.
        let mut grid = SudokuGrid::parse(CLASSIC_SOLUTION);

        for i in 0..BOARD_SIZE {
            grid.set_number(i, i, 0);
        }

        let mut state = SolverState::new(&grid);

        assert!(state.solve_rec(&mut grid, 0));
        assert_eq!(0, state.guesses);
        assert_eq!(SudokuGrid::parse(CLASSIC_SOLUTION), grid);
    }

    #[test]
    fn initial_state_matches_grid() {
        let grid = SudokuGrid::parse(CLASSIC_PUZZLE);
        let state = SolverState::new(&grid);

        for row in 0..BOARD_SIZE {
            for column in 0..BOARD_SIZE {
                assert_eq!(grid.available_numbers(row, column),
                    state.candidates[index(row, column)]);
            }
        }

        for box_index in 0..BOARD_SIZE {
            let (row_0, column_0) = SudokuGrid::box_top_left(box_index);
            let mut empty_cells = 0;

            for i in 0..BOX_SIZE {
                for j in 0..BOX_SIZE {
                    if grid.is_cell_empty(row_0 + i, column_0 + j) {
                        empty_cells += 1;
                    }
                }
            }

            assert_eq!(empty_cells, state.boxes[box_index].empty_cells);
        }
    }

    #[test]
    fn line_match_merging() {
        assert_eq!(LineMatch::Common(4), LineMatch::Unset.merge(4));
        assert_eq!(LineMatch::Common(4), LineMatch::Common(4).merge(4));
        assert_eq!(LineMatch::Divergent, LineMatch::Common(4).merge(5));
        assert_eq!(LineMatch::Divergent, LineMatch::Divergent.merge(4));
    }
}
