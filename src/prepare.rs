use ndarray::{s, Array2, ArrayView2};

use crate::error::SolveError;
use crate::solver::Cost;

/// Copy `rows` into a rectangular array, rejecting empty and jagged input before anything else happens.
pub(crate) fn to_array<R: AsRef<[Cost]>>(rows: &[R]) -> Result<Array2<Cost>, SolveError> {
    let cols = match rows.first() {
        Some(first) if !first.as_ref().is_empty() => first.as_ref().len(),
        _ => return Err(SolveError::EmptyMatrix),
    };

    if let Some((row, found)) = rows.iter()
        .map(|row| row.as_ref().len())
        .enumerate()
        .find(|(_, len)| *len != cols) {
        return Err(SolveError::MalformedMatrix { row, expected: cols, found });
    }

    Ok(Array2::from_shape_fn((rows.len(), cols), |(row, col)| rows[row].as_ref()[col]))
}

pub(crate) fn ensure_not_empty(matrix: ArrayView2<Cost>) -> Result<(), SolveError> {
    if matrix.nrows() == 0 || matrix.ncols() == 0 {
        return Err(SolveError::EmptyMatrix);
    }

    Ok(())
}

/// Largest value in `matrix`.
pub(crate) fn find_max_value(matrix: ArrayView2<Cost>) -> Result<Cost, SolveError> {
    ensure_not_empty(matrix)?;
    matrix.iter().copied().max().ok_or(SolveError::EmptyMatrix)
}

/// Replace every value `v` with `max - v`, so that minimizing the result maximizes the original.
/// `max` must be the largest value of `matrix`, see [`find_max_value`]; all inverted values are then non-negative.
pub(crate) fn invert_for_maximization(matrix: ArrayView2<Cost>, max: Cost) -> Result<Array2<Cost>, SolveError> {
    let inverted = matrix.iter()
        .map(|value| max.checked_sub(*value))
        .collect::<Option<Vec<_>>>()
        .ok_or(SolveError::Overflow("inverting the matrix"))?;

    Array2::from_shape_vec(matrix.raw_dim(), inverted)
        .map_err(|_| SolveError::Invariant("inverted matrix changed shape"))
}

/// Embed `matrix` in the top left corner of a square of side `max(rows, cols)`, filling the rest with `fill`.
pub(crate) fn pad_to_square(matrix: ArrayView2<Cost>, fill: Cost) -> Array2<Cost> {
    let (rows, cols) = matrix.dim();
    let size = rows.max(cols);

    let mut padded = Array2::from_elem((size, size), fill);
    padded.slice_mut(s![..rows, ..cols]).assign(&matrix);
    padded
}
