use std::fmt::{Display, Formatter};

use crate::preference::{PrefPair, PreferenceTable};
use crate::solver::{Cost, Solution};

const CELL_WIDTH: usize = 10;

/// A [`Solution`] of a [`PreferenceTable`], with rows and columns resolved to names.
#[derive(Clone, Debug)]
pub struct Matching<'a> {
    pub(crate) table: &'a PreferenceTable,
    /// The underlying solution; rows are destinations and columns applicants.
    pub solution: Solution,
}

/// One applicant placed with one destination.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Pairing<'a> {
    /// Name of the destination.
    pub destination: &'a str,
    /// Name of the applicant.
    pub applicant: &'a str,
    /// Ratings the two gave each other.
    pub points: PrefPair,
}

impl<'a> Matching<'a> {
    /// Matched pairs, in destination order.
    pub fn pairs(&self) -> impl Iterator<Item = Pairing<'a>> + '_ {
        let table = self.table;

        self.solution.assignments.iter().map(move |assignment| Pairing {
            destination: &table.destinations[assignment.row],
            applicant: &table.applicants[assignment.col],
            points: table.values[(assignment.row, assignment.col)],
        })
    }

    /// Sum of scores over all pairs, as computed by the scoring the matching was made with.
    pub fn score(&self) -> Cost {
        self.solution.total
    }
}

impl Display for Pairing<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({};{};{}/{})", self.applicant, self.destination, self.points.applicant_points, self.points.destination_points)
    }
}

impl Display for Matching<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for pairing in self.pairs() {
            write!(f, "{pairing} ")?;
        }

        writeln!(f)?;
        writeln!(f, "Score: {}", self.score())
    }
}

impl Display for Solution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Cost: {}", self.total)?;
        for assignment in &self.assignments {
            writeln!(f, "{} - {}", assignment.row, assignment.col)?;
        }

        Ok(())
    }
}

/// Applicants across, destinations down; each cell shows `applicant/destination` points.
impl Display for PreferenceTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:CELL_WIDTH$}|", "")?;
        for applicant in &self.applicants {
            write!(f, "|{:<CELL_WIDTH$}", format!(" {applicant}"))?;
        }
        writeln!(f)?;
        writeln!(f, "{}", "-".repeat((self.applicants.len() + 1) * (CELL_WIDTH + 1) + 1))?;

        for (destination, values) in self.destinations.iter().zip(self.values.rows()) {
            write!(f, "{:<CELL_WIDTH$}|", format!(" {destination}"))?;
            for pair in values {
                write!(f, "|{:>CELL_WIDTH$}", format!("{}/{} ", pair.applicant_points, pair.destination_points))?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
