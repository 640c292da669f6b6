//! Reading preference files.
//!
//! A preference file holds two delimited tables separated by a blank line.
//! The first lists destinations across its header and applicants down its first column, each cell holding the
//! applicant's rating of the destination. The second lists applicants across and destinations down, each cell
//! holding the destination's rating of the applicant.
//!
//! ```text
//! ;Flat A;Flat B
//! Alice;12;3
//! Bob;7;15
//!
//! ;Alice;Bob
//! Flat A;10;4
//! Flat B;1;15
//! ```
//!
//! Cells are separated by `;` or `,`, whichever the file uses more often.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use itertools::Itertools;
use log::debug;
use ndarray::Array2;

use crate::error::{NameKind, TableError, TableIssue};
use crate::preference::{PrefPair, PreferenceTable};
use crate::solver::Cost;

/// Trimmed cells of each non-blank line of one table.
pub type RawTable = Vec<Vec<String>>;

fn detect_delimiter(text: &str) -> char {
    let semicolons = text.chars().filter(|c| *c == ';').count();
    let commas = text.chars().filter(|c| *c == ',').count();

    if semicolons > commas { ';' } else { ',' }
}

/// Trimmed cells of `line`, or nothing if every cell is empty.
fn split_line(line: &str, delimiter: char) -> Vec<String> {
    let cells = line.split(delimiter).map(|cell| cell.trim().to_string()).collect_vec();

    if cells.iter().all(String::is_empty) {
        Vec::new()
    } else {
        cells
    }
}

/// Split `text` into its two tables.
///
/// Leading and trailing blank lines are ignored. The first run of blank lines separates the tables;
/// any other blank line is an error.
pub fn read_tables(text: &str) -> Result<(RawTable, RawTable), TableError> {
    let delimiter = detect_delimiter(text);
    let lines = text.lines().map(|line| split_line(line, delimiter)).collect_vec();

    let (Some(start), Some(end)) = (
        lines.iter().position(|cells| !cells.is_empty()),
        lines.iter().rposition(|cells| !cells.is_empty()),
    ) else {
        return Err(TableIssue::MissingSeparator.into());
    };
    let lines = &lines[start..=end];

    let Some(separator) = lines.iter().position(Vec::is_empty) else {
        return Err(TableIssue::MissingSeparator.into());
    };
    // the last line is not blank, so the second table is not empty
    let second_start = separator + lines[separator..].iter()
        .position(|cells| !cells.is_empty())
        .unwrap_or(lines.len() - separator);

    let stray_blanks = lines.iter()
        .enumerate()
        .skip(second_start)
        .filter(|(_, cells)| cells.is_empty())
        .map(|(index, _)| TableIssue::StrayBlankLine { line: start + index + 1 })
        .collect_vec();
    if !stray_blanks.is_empty() {
        return Err(TableError::Invalid(stray_blanks));
    }

    debug!("read tables of {} and {} lines, delimited by `{delimiter}`", separator, lines.len() - second_start);
    Ok((lines[..separator].to_vec(), lines[second_start..].to_vec()))
}

/// Names across the header of `table`, up to the first empty one.
fn header_names(table: &RawTable, table_no: usize, kind: NameKind, issues: &mut Vec<TableIssue>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for name in table[0].iter().skip(1).take_while(|name| !name.is_empty()) {
        if names.contains(name) {
            issues.push(TableIssue::DuplicateName { table: table_no, kind, name: name.clone() });
        } else {
            names.push(name.clone());
        }
    }

    if names.is_empty() {
        issues.push(TableIssue::NoNames { table: table_no, kind });
    }

    names
}

/// Check that the row labels of `table` are exactly `expected`, the header names of table `other`.
fn check_row_labels(
    table: &RawTable,
    table_no: usize,
    other: usize,
    kind: NameKind,
    expected: &[String],
    issues: &mut Vec<TableIssue>,
) {
    let mut seen = HashSet::with_capacity(expected.len());

    for name in table.iter().skip(1).map(|row| &row[0]) {
        if !expected.contains(name) {
            issues.push(TableIssue::UnknownName { table: table_no, other, kind, name: name.clone() });
        } else if !seen.insert(name) {
            issues.push(TableIssue::DuplicateName { table: table_no, kind, name: name.clone() });
        }
    }

    issues.extend(expected.iter()
        .filter(|name| !seen.contains(name))
        .map(|name| TableIssue::MissingName { table: table_no, other, kind, name: name.clone() }));
}

/// Visit every value of `table` as `(row label, column index, value)`, where column `i` is header column `i + 1`.
fn parse_values(
    table: &RawTable,
    table_no: usize,
    columns: &[String],
    issues: &mut Vec<TableIssue>,
    mut visit: impl FnMut(&str, usize, Cost),
) {
    for row in table.iter().skip(1) {
        let label = &row[0];

        for (col, column) in columns.iter().enumerate() {
            match row.get(col + 1).filter(|cell| !cell.is_empty()) {
                None => issues.push(TableIssue::MissingValue {
                    table: table_no,
                    row: label.clone(),
                    column: column.clone(),
                }),
                Some(cell) => match cell.parse::<Cost>() {
                    Ok(value) => visit(label, col, value),
                    Err(_) => issues.push(TableIssue::NotANumber {
                        table: table_no,
                        row: label.clone(),
                        column: column.clone(),
                        found: cell.clone(),
                    }),
                },
            }
        }
    }
}

impl PreferenceTable {
    /// Parse the two tables of a preference file, as described in the [module documentation](crate::table).
    ///
    /// Destinations keep the order of the first table's header and applicants the order of the second table's header.
    /// Every destination starts out with one place. All problems found are reported together.
    pub fn parse(text: &str) -> Result<Self, TableError> {
        let (first, second) = read_tables(text)?;
        let mut issues = Vec::new();

        let destinations = header_names(&first, 1, NameKind::Destination, &mut issues);
        let applicants = header_names(&second, 2, NameKind::Applicant, &mut issues);
        check_row_labels(&first, 1, 2, NameKind::Applicant, &applicants, &mut issues);
        check_row_labels(&second, 2, 1, NameKind::Destination, &destinations, &mut issues);
        if !issues.is_empty() {
            return Err(TableError::Invalid(issues));
        }

        let destination_index: HashMap<&str, usize> = destinations.iter()
            .enumerate()
            .map(|(index, name)| (name.as_str(), index))
            .collect();
        let applicant_index: HashMap<&str, usize> = applicants.iter()
            .enumerate()
            .map(|(index, name)| (name.as_str(), index))
            .collect();

        let mut values = Array2::from_elem((destinations.len(), applicants.len()), PrefPair::default());
        parse_values(&first, 1, &destinations, &mut issues, |applicant, row, value| {
            values[(row, applicant_index[applicant])].applicant_points = value;
        });
        parse_values(&second, 2, &applicants, &mut issues, |destination, col, value| {
            values[(destination_index[destination], col)].destination_points = value;
        });
        if !issues.is_empty() {
            return Err(TableError::Invalid(issues));
        }

        Ok(Self::new(destinations, applicants, values))
    }

    /// Read and [`parse`](Self::parse) the preference file at `path`.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let text = fs::read_to_string(path.as_ref())?;
        debug!("read {} bytes from {}", text.len(), path.as_ref().display());
        Self::parse(&text)
    }
}
