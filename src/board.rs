use std::fmt::{Display, Formatter};

use itertools::Itertools;
use ndarray::Array2;

use crate::cell::Mark;
use crate::solver::Cost;

/// Everything one solve mutates: the square work matrix, the mask of starred and primed cells and the cover flags.
///
/// Built fresh for every call and dropped once the [`Solution`](crate::Solution) has been read off,
/// so independent solves never share state.
pub(crate) struct WorkBoard {
    pub(crate) costs: Array2<Cost>,
    pub(crate) mask: Array2<Mark>,
    pub(crate) row_cover: Vec<bool>,
    pub(crate) col_cover: Vec<bool>,
}

impl WorkBoard {
    /// `costs` must already be square, see [`pad_to_square`](crate::prepare::pad_to_square).
    pub(crate) fn new(costs: Array2<Cost>) -> Self {
        debug_assert!(costs.is_square());
        let size = costs.nrows();

        Self {
            costs,
            mask: Array2::default((size, size)),
            row_cover: vec![false; size],
            col_cover: vec![false; size],
        }
    }

    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.costs.nrows()
    }

    #[inline]
    pub(crate) fn is_uncovered(&self, (row, col): (usize, usize)) -> bool {
        !self.row_cover[row] && !self.col_cover[col]
    }

    pub(crate) fn clear_covers(&mut self) {
        self.row_cover.fill(false);
        self.col_cover.fill(false);
    }

    /// First zero in a row and column that are both uncovered, scanning rows top to bottom and columns left to right.
    pub(crate) fn find_uncovered_zero(&self) -> Option<(usize, usize)> {
        self.costs.indexed_iter()
            .find(|(index, cost)| **cost == 0 && self.is_uncovered(*index))
            .map(|(index, _)| index)
    }

    pub(crate) fn star_in_row(&self, row: usize) -> Option<usize> {
        self.mask.row(row).iter().position(|mark| *mark == Mark::Starred)
    }

    pub(crate) fn star_in_col(&self, col: usize) -> Option<usize> {
        self.mask.column(col).iter().position(|mark| *mark == Mark::Starred)
    }

    pub(crate) fn prime_in_row(&self, row: usize) -> Option<usize> {
        self.mask.row(row).iter().position(|mark| *mark == Mark::Primed)
    }

    /// Unstar every starred cell on `path` and star the rest.
    pub(crate) fn augment(&mut self, path: &[(usize, usize)]) {
        for &index in path {
            self.mask[index] = self.mask[index].flipped();
        }
    }

    pub(crate) fn clear_primes(&mut self) {
        self.mask.map_inplace(|mark| if *mark == Mark::Primed {
            *mark = Mark::Unmarked;
        });
    }

    /// Smallest value among cells whose row and column are both uncovered.
    pub(crate) fn smallest_uncovered(&self) -> Option<Cost> {
        self.costs.indexed_iter()
            .filter(|(index, _)| self.is_uncovered(*index))
            .map(|(_, cost)| *cost)
            .min()
    }

    pub(crate) fn covered_col_count(&self) -> usize {
        self.col_cover.iter().filter(|covered| **covered).count()
    }
}

impl Display for WorkBoard {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let width = self.costs.iter().map(|cost| cost.to_string().len()).max().unwrap_or(1);

        for (row, (costs, marks)) in self.costs.rows().into_iter().zip(self.mask.rows()).enumerate() {
            let cells = costs.iter().zip(marks.iter())
                .map(|(cost, mark)| format!("{cost:>width$}{mark}"))
                .join(" ");
            writeln!(f, "{} {cells}", if self.row_cover[row] { '#' } else { '|' })?;
        }

        writeln!(f, "  {}", self.col_cover.iter()
            .map(|covered| format!("{:>width$} ", if *covered { "#" } else { "" }))
            .join(" "))
    }
}
