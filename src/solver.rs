use itertools::{iproduct, Itertools};
use log::{debug, error, trace};
use ndarray::{s, ArrayView2, ArrayViewMut1};

use crate::board::WorkBoard;
use crate::cell::Mark;
use crate::error::SolveError;
use crate::prepare::{ensure_not_empty, find_max_value, invert_for_maximization, pad_to_square, to_array};

/// Integer type of costs, profits and totals.
pub type Cost = i64;

/// Whether a solve should make the total as small or as large as possible.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Objective {
    /// Treat values as costs.
    Minimize,
    /// Treat values as profits.
    Maximize,
}

/// One pairing of a row to a column, in the coordinates of the input matrix.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Assignment {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
}

impl From<(usize, usize)> for Assignment {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

/// The optimal assignment found by a solve.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Solution {
    /// Sum of the original input values at every assigned cell.
    pub total: Cost,
    /// Assigned cells in row-major order. No row and no column appears twice.
    pub assignments: Vec<Assignment>,
}

/// The seven steps of Munkres' method; [`Done`](Step::Done) is terminal.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Step {
    ReduceLines,
    StarZeros,
    CoverStarredColumns,
    PrimeZeros,
    Augment { origin: (usize, usize) },
    ShiftMinimum,
    Done,
}

fn subtract_min(mut line: ArrayViewMut1<Cost>) -> Result<(), SolveError> {
    let Some(min) = line.iter().copied().min() else {
        return Ok(());
    };

    for cost in line.iter_mut() {
        *cost = cost.checked_sub(min).ok_or(SolveError::Overflow("reducing rows and columns"))?;
    }

    Ok(())
}

/// Step 1: subtract each row's minimum from the row, then each column's minimum from the column.
pub(crate) fn reduce_lines(board: &mut WorkBoard) -> Result<Step, SolveError> {
    for row in board.costs.rows_mut() {
        subtract_min(row)?;
    }

    for col in board.costs.columns_mut() {
        subtract_min(col)?;
    }

    Ok(Step::StarZeros)
}

/// Step 2: star every zero that shares neither row nor column with an earlier star.
pub(crate) fn star_zeros(board: &mut WorkBoard) -> Step {
    for (row, col) in iproduct!(0..board.size(), 0..board.size()) {
        if board.costs[(row, col)] == 0 && board.is_uncovered((row, col)) {
            board.mask[(row, col)] = Mark::Starred;
            board.row_cover[row] = true;
            board.col_cover[col] = true;
        }
    }

    board.clear_covers();
    Step::CoverStarredColumns
}

/// Step 3: cover each column holding a star. One star per column means the matching is complete.
pub(crate) fn cover_starred_columns(board: &mut WorkBoard) -> Step {
    for ((_, col), mark) in board.mask.indexed_iter() {
        if *mark == Mark::Starred {
            board.col_cover[col] = true;
        }
    }

    if board.covered_col_count() >= board.size() {
        Step::Done
    } else {
        Step::PrimeZeros
    }
}

/// Step 4: prime uncovered zeros until one has no star in its row.
pub(crate) fn prime_zeros(board: &mut WorkBoard) -> Result<Step, SolveError> {
    if board.covered_col_count() >= board.size() {
        return Err(SolveError::Invariant("searching for zeros on a fully covered board"));
    }

    loop {
        let Some((row, col)) = board.find_uncovered_zero() else {
            return Ok(Step::ShiftMinimum);
        };

        board.mask[(row, col)] = Mark::Primed;
        match board.star_in_row(row) {
            Some(star_col) => {
                board.row_cover[row] = true;
                board.col_cover[star_col] = false;
            }
            None => return Ok(Step::Augment { origin: (row, col) }),
        }
    }
}

/// Step 5: follow the alternating path of stars (by column) and primes (by row) from `origin`, then flip it.
pub(crate) fn augment(board: &mut WorkBoard, origin: (usize, usize)) -> Result<Step, SolveError> {
    let mut path = vec![origin];
    let mut col = origin.1;

    while let Some(row) = board.star_in_col(col) {
        path.push((row, col));
        col = board.prime_in_row(row)
            .ok_or(SolveError::Invariant("starred zero on an augmenting path has no prime in its row"))?;
        path.push((row, col));
    }

    trace!("augmenting along {}", path.iter().map(|(row, col)| format!("({row}, {col})")).join(" -> "));

    board.augment(&path);
    board.clear_primes();
    board.clear_covers();
    Ok(Step::CoverStarredColumns)
}

/// Step 6: add the smallest uncovered value to covered rows and take it from uncovered columns.
/// Stars and primes keep their zeros and at least one new uncovered zero appears.
pub(crate) fn shift_minimum(board: &mut WorkBoard) -> Result<Step, SolveError> {
    let min = board.smallest_uncovered()
        .ok_or(SolveError::Invariant("no uncovered cell left to shift"))?;

    for ((row, col), cost) in board.costs.indexed_iter_mut() {
        // covered row and uncovered column cancel out
        let shift = match (board.row_cover[row], board.col_cover[col]) {
            (true, true) => min,
            (false, false) => -min,
            _ => 0,
        };
        *cost = cost.checked_add(shift).ok_or(SolveError::Overflow("shifting the smallest uncovered value"))?;
    }

    Ok(Step::PrimeZeros)
}

/// Generous bound on the number of steps a board of side `size` can take.
/// There are at most `size` augmentations, each preceded by at most `size` shifts and `size + 1` searches.
pub(crate) fn iteration_limit(size: usize) -> usize {
    (size + 1).saturating_pow(3).saturating_mul(4)
}

/// Drive `board` from step 1 to [`Step::Done`] in at most `limit` steps, returning the number of steps taken.
pub(crate) fn run(board: &mut WorkBoard, limit: usize) -> Result<usize, SolveError> {
    let mut step = Step::ReduceLines;

    for iterations in 0..limit {
        trace!("step {iterations}: {step:?}\n{board}");

        step = match step {
            Step::ReduceLines => reduce_lines(board)?,
            Step::StarZeros => star_zeros(board),
            Step::CoverStarredColumns => cover_starred_columns(board),
            Step::PrimeZeros => prime_zeros(board)?,
            Step::Augment { origin } => augment(board, origin)?,
            Step::ShiftMinimum => shift_minimum(board)?,
            Step::Done => return Ok(iterations),
        };
    }

    error!("gave up on a {0}x{0} board after {limit} steps:\n{board}", board.size());
    Err(SolveError::Stalled { iterations: limit })
}

/// Read the starred cells inside the original `rows x cols` region and total the original values there.
fn extract(board: &WorkBoard, original: ArrayView2<Cost>) -> Result<Solution, SolveError> {
    let (rows, cols) = original.dim();

    let assignments = board.mask.slice(s![..rows, ..cols])
        .indexed_iter()
        .filter(|(_, mark)| **mark == Mark::Starred)
        .map(|(index, _)| Assignment::from(index))
        .collect_vec();
    let total = assignments.iter()
        .map(|assignment| original[(assignment.row, assignment.col)])
        .try_fold(0 as Cost, Cost::checked_add)
        .ok_or(SolveError::Overflow("totalling the assignment"))?;

    Ok(Solution { total, assignments })
}

/// Solve the assignment problem on `matrix` for either objective.
///
/// Fails with [`SolveError::EmptyMatrix`] if `matrix` has no rows or no columns.
/// Rectangular matrices are padded to square internally; the result only ever refers to real cells.
pub fn solve_array(matrix: ArrayView2<Cost>, objective: Objective) -> Result<Solution, SolveError> {
    ensure_not_empty(matrix)?;

    let work = match objective {
        Objective::Minimize => pad_to_square(matrix, 0),
        Objective::Maximize => {
            let max = find_max_value(matrix)?;
            pad_to_square(invert_for_maximization(matrix, max)?.view(), max.saturating_mul(2))
        }
    };

    let mut board = WorkBoard::new(work);
    let limit = iteration_limit(board.size());
    let iterations = run(&mut board, limit)?;
    let solution = extract(&board, matrix)?;

    debug!("solved {}x{} ({objective}) in {iterations} steps: total {} over {} assignments",
        matrix.nrows(), matrix.ncols(), solution.total, solution.assignments.len());
    Ok(solution)
}

/// Find the assignment of rows to columns with the smallest total cost.
pub fn solve_min_array(matrix: ArrayView2<Cost>) -> Result<Solution, SolveError> {
    solve_array(matrix, Objective::Minimize)
}

/// Find the assignment of rows to columns with the largest total profit.
pub fn solve_max_array(matrix: ArrayView2<Cost>) -> Result<Solution, SolveError> {
    solve_array(matrix, Objective::Maximize)
}

/// Find the assignment of rows to columns with the smallest total cost.
///
/// `matrix` is a sequence of rows.
/// Fails with [`SolveError::EmptyMatrix`] if it has no rows or its first row is empty,
/// and with [`SolveError::MalformedMatrix`] if its rows differ in length.
///
/// ```
/// use belegium::{solve_min, Assignment};
///
/// let solution = solve_min(&[[1_i64, 2], [2, 1]]).unwrap();
/// assert_eq!(solution.total, 2);
/// assert_eq!(solution.assignments, vec![Assignment { row: 0, col: 0 }, Assignment { row: 1, col: 1 }]);
/// ```
pub fn solve_min<R: AsRef<[Cost]>>(matrix: &[R]) -> Result<Solution, SolveError> {
    solve_min_array(to_array(matrix)?.view())
}

/// Find the assignment of rows to columns with the largest total profit.
///
/// Accepts and rejects the same inputs as [`solve_min`].
pub fn solve_max<R: AsRef<[Cost]>>(matrix: &[R]) -> Result<Solution, SolveError> {
    solve_max_array(to_array(matrix)?.view())
}
