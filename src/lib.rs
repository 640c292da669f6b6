#![warn(missing_docs)]

//! # `belegium`
//!
//! Matches applicants to shared flats by solving the rectangular linear assignment problem with the
//! [Hungarian algorithm](https://en.wikipedia.org/wiki/Hungarian_algorithm) (Kuhn-Munkres).
//!
//! The solver lives in [`solve_min`] and [`solve_max`], which accept any grid of integer costs (or profits) with
//! rows of equal length and return a [`Solution`]: at most `min(rows, cols)` [`Assignment`]s, no row or column used
//! twice, and the total of the original values at the assigned cells.
//! Both have `_array` twins taking an [`ndarray::ArrayView2`] directly.
//!
//! Around the solver sits the plumbing for the flat-matching use case.
//! Parse a two-table preference file into a [`PreferenceTable`], adjust capacities, call
//! [`apply_extrema`](PreferenceTable::apply_extrema) and [`expand_capacities`](PreferenceTable::expand_capacities),
//! then [`match_with`](PreferenceTable::match_with) a [`Scoring`] to get a labelled [`Matching`].
//!
//! # Internals
//! The solver follows the classic seven step formulation of Munkres' method.
//! Every solve owns a fresh work board: a square copy of the input, padded with a filler value that never wins over
//! a real cell, plus a mask of starred and primed cells and a cover flag per row and column.
//!
//! A high level overview is as follows:
//!
//! 1. Subtract each row's minimum from that row, then each column's minimum from that column.
//! 2. Star zeros greedily in row-major order so that no two stars share a row or a column.
//! 3. Cover every column holding a star. If all columns are covered, the stars form an optimal assignment.
//! 4. Prime uncovered zeros. A primed zero sharing a row with a star covers that row and uncovers the star's column;
//!    a primed zero without a star in its row starts an augmenting path.
//! 5. Walk the alternating path of stars and primes, flip it, and return to step 3 with one more star.
//! 6. With no uncovered zero left, shift the smallest uncovered value out of the uncovered cells and return to step 4.
//!
//! Maximization runs the same steps on `max - value`.
//! Scans always run top to bottom, left to right, so ties are broken the same way on every run.

pub use error::{CapacityError, NameKind, SolveError, TableError, TableIssue};
pub use preference::{PrefPair, PreferenceTable, Scoring, DEFAULT_DIRECT_MATCH_BONUS, TOP_POINTS, VETO_POINTS};
pub use report::{Matching, Pairing};
pub use solver::{solve_array, solve_max, solve_max_array, solve_min, solve_min_array, Assignment, Cost, Objective, Solution};

pub(crate) mod board;
pub(crate) mod cell;
mod error;
pub(crate) mod prepare;
mod preference;
mod report;
pub(crate) mod solver;
pub mod table;
mod tests;
