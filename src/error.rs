use itertools::Itertools;
use thiserror::Error;

/// Reasons [`solve_min`](crate::solve_min) or [`solve_max`](crate::solve_max) may fail.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum SolveError {
    /// The matrix has no rows, or its rows have no columns.
    #[error("did not expect an empty matrix")]
    EmptyMatrix,
    /// The rows of the matrix differ in length.
    #[error("row {row} has {found} columns, expected {expected}")]
    MalformedMatrix {
        /// Index of the first offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// A value left the range of [`Cost`](crate::Cost) while preparing or reducing the matrix, or while totalling
    /// the result. Inputs this large cannot be solved exactly.
    #[error("arithmetic overflow while {0}")]
    Overflow(&'static str),
    /// The step loop ran past its iteration bound without finding a complete matching.
    /// This should never happen.
    #[error("no optimal assignment found after {iterations} steps")]
    Stalled {
        /// Number of steps taken before giving up.
        iterations: usize,
    },
    /// The work board reached a state the algorithm rules out.
    /// This should never happen.
    #[error("internal invariant violated: {0}")]
    Invariant(&'static str),
}

/// The two kinds of names found in a preference file.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum NameKind {
    /// A flat offering places, listed across the header of the first table.
    Destination,
    /// A person looking for a place, listed across the header of the second table.
    Applicant,
}

/// A single problem found while reading a preference file.
///
/// Tables are numbered from 1 in the order they appear in the file.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum TableIssue {
    /// The file does not contain two tables separated by a blank line.
    #[error("expected two tables separated by a blank line")]
    MissingSeparator,
    /// A blank line appears somewhere other than between the two tables.
    #[error("line {line} should not be blank, blank lines only separate the two tables")]
    StrayBlankLine {
        /// 1-based line number in the input.
        line: usize,
    },
    /// The header of a table names nobody.
    #[error("table {table} names no {kind}s in its header")]
    NoNames {
        /// Table the header belongs to.
        table: usize,
        /// What the header should name.
        kind: NameKind,
    },
    /// A name is listed more than once in the same table.
    #[error("{kind} `{name}` is listed twice in table {table}")]
    DuplicateName {
        /// Table the duplicate was found in.
        table: usize,
        /// What the name refers to.
        kind: NameKind,
        /// The repeated name.
        name: String,
    },
    /// A row label does not appear in the other table's header.
    #[error("{kind} `{name}` is used in table {table} but not in table {other}")]
    UnknownName {
        /// Table holding the row label.
        table: usize,
        /// Table whose header lacks it.
        other: usize,
        /// What the name refers to.
        kind: NameKind,
        /// The unknown name.
        name: String,
    },
    /// A header name of one table has no row in the other.
    #[error("{kind} `{name}` is used in table {other} but not in table {table}")]
    MissingName {
        /// Table lacking the row.
        table: usize,
        /// Table whose header lists the name.
        other: usize,
        /// What the name refers to.
        kind: NameKind,
        /// The missing name.
        name: String,
    },
    /// A cell holds something other than an integer.
    #[error("table {table} should hold a number at {row} / {column}, found `{found}`")]
    NotANumber {
        /// Table holding the cell.
        table: usize,
        /// Row label of the cell.
        row: String,
        /// Column label of the cell.
        column: String,
        /// The cell text.
        found: String,
    },
    /// A row ends before every header column has a value.
    #[error("table {table} has no value at {row} / {column}")]
    MissingValue {
        /// Table holding the row.
        table: usize,
        /// Row label.
        row: String,
        /// Column label lacking a value.
        column: String,
    },
}

/// Reasons reading a preference file may fail.
#[derive(Debug, Error)]
pub enum TableError {
    /// The file could not be read.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// The file was read but its contents are unusable; every problem found is listed.
    #[error("invalid preference tables: {}", .0.iter().join("; "))]
    Invalid(Vec<TableIssue>),
}

impl From<TableIssue> for TableError {
    fn from(value: TableIssue) -> Self {
        Self::Invalid(vec![value])
    }
}

/// Reasons a capacity override may be rejected.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum CapacityError {
    /// No destination carries this name.
    #[error("there is no destination named `{0}`")]
    UnknownDestination(String),
    /// Capacities start at one.
    #[error("`{0}` needs at least one free place")]
    ZeroCapacity(String),
}
