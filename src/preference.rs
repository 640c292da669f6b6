use std::iter;
use std::num::NonZero;

use itertools::Itertools;
use log::debug;
use ndarray::{Array2, Axis};
use strum::{EnumString, VariantArray};

use crate::error::{CapacityError, SolveError};
use crate::report::Matching;
use crate::solver::{solve_max_array, Cost};

/// Points marking a pair that must not be matched. Either side giving zero points is a veto.
pub const VETO_POINTS: Cost = -100;
/// The best rating either side can give.
pub const TOP_POINTS: Cost = 15;
/// Extra points for a pair where both sides gave [`TOP_POINTS`], unless configured otherwise.
pub const DEFAULT_DIRECT_MATCH_BONUS: Cost = 10;

/// How much an applicant and a destination like each other.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct PrefPair {
    /// Points the applicant gave the destination.
    pub applicant_points: Cost,
    /// Points the destination gave the applicant.
    pub destination_points: Cost,
}

/// Ways to combine a [`PrefPair`] into a single score. Matching maximizes the sum of scores.
///
/// `a` is the applicant's rating and `b` the destination's.
#[derive(Clone, Copy, Debug, EnumString, Eq, Hash, PartialEq, VariantArray, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Scoring {
    /// `a + b`. Favors pairs both sides like overall; 10/1 wins over 5/5.
    Sum,
    /// `a * b`, negative if either side is. Strongly favors highly compatible pairs.
    Product,
    /// `a + b - |a - b| / 3`. Penalizes lopsided pairs; 7/7 wins over 3/11.
    Balanced,
}

impl Scoring {
    /// Score a pair with applicant rating `a` and destination rating `b`.
    ///
    /// Saturates at the bounds of [`Cost`] instead of overflowing.
    pub fn combine(self, a: Cost, b: Cost) -> Cost {
        match self {
            Self::Sum => a.saturating_add(b),
            Self::Product => {
                let magnitude = a.saturating_mul(b).saturating_abs();
                if a < 0 || b < 0 { -magnitude } else { magnitude }
            }
            // |a - b| / 3 always fits back into a Cost
            Self::Balanced => a.saturating_add(b).saturating_sub((a.abs_diff(b) / 3) as Cost),
        }
    }

    /// The formula, for display.
    pub fn formula(self) -> &'static str {
        match self {
            Self::Sum => "a + b",
            Self::Product => "a * b, negative if either is",
            Self::Balanced => "a + b - |a - b| / 3",
        }
    }
}

/// Mutual ratings of every applicant and destination, plus how many places each destination offers.
///
/// Rows are destinations and columns are applicants throughout.
/// Build one with [`PreferenceTable::parse`] or [`PreferenceTable::read`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PreferenceTable {
    pub(crate) destinations: Vec<String>,
    pub(crate) applicants: Vec<String>,
    pub(crate) capacities: Vec<NonZero<usize>>,
    pub(crate) values: Array2<PrefPair>,
}

impl PreferenceTable {
    pub(crate) fn new(destinations: Vec<String>, applicants: Vec<String>, values: Array2<PrefPair>) -> Self {
        debug_assert_eq!(values.dim(), (destinations.len(), applicants.len()));

        Self {
            capacities: vec![NonZero::<usize>::MIN; destinations.len()],
            destinations,
            applicants,
            values,
        }
    }

    /// Destination names, one per row.
    pub fn destinations(&self) -> &[String] {
        &self.destinations
    }

    /// Applicant names, one per column.
    pub fn applicants(&self) -> &[String] {
        &self.applicants
    }

    /// Ratings for the destination in `row` and the applicant in `col`.
    pub fn pair(&self, row: usize, col: usize) -> Option<PrefPair> {
        self.values.get((row, col)).copied()
    }

    /// Whether a destination called `name` exists.
    pub fn has_destination(&self, name: &str) -> bool {
        self.destinations.iter().any(|destination| destination == name)
    }

    /// Places offered by the first destination called `name`.
    pub fn capacity(&self, name: &str) -> Option<NonZero<usize>> {
        self.destinations.iter()
            .position(|destination| destination == name)
            .map(|row| self.capacities[row])
    }

    /// Let the destination called `name` take `places` applicants.
    pub fn set_capacity(&mut self, name: &str, places: usize) -> Result<&mut Self, CapacityError> {
        let row = self.destinations.iter()
            .position(|destination| destination == name)
            .ok_or_else(|| CapacityError::UnknownDestination(name.to_string()))?;
        let places = NonZero::new(places).ok_or_else(|| CapacityError::ZeroCapacity(name.to_string()))?;

        self.capacities[row] = places;
        Ok(self)
    }

    /// Turn zero ratings into vetoes and reward pairs that gave each other top marks.
    ///
    /// A pair where either side gave 0 points gets [`VETO_POINTS`] on both sides.
    /// A pair where both sides gave [`TOP_POINTS`] gets `TOP_POINTS + bonus` on both sides.
    pub fn apply_extrema(&mut self, bonus: Cost) -> &mut Self {
        self.values.map_inplace(|pair| {
            if pair.applicant_points == 0 || pair.destination_points == 0 {
                pair.applicant_points = VETO_POINTS;
                pair.destination_points = VETO_POINTS;
            } else if pair.applicant_points == TOP_POINTS && pair.destination_points == TOP_POINTS {
                pair.applicant_points = TOP_POINTS + bonus;
                pair.destination_points = TOP_POINTS + bonus;
            }
        });

        self
    }

    /// Repeat each destination's row once per place it offers, so every row takes exactly one applicant.
    ///
    /// Copies follow the original row directly and carry the same name.
    pub fn expand_capacities(&self) -> Self {
        let order = self.capacities.iter()
            .enumerate()
            .flat_map(|(row, places)| iter::repeat(row).take(places.get()))
            .collect_vec();

        debug!("expanded {} destinations into {} places", self.destinations.len(), order.len());

        Self::new(
            order.iter().map(|row| self.destinations[*row].clone()).collect(),
            self.applicants.clone(),
            self.values.select(Axis(0), &order),
        )
    }

    /// Score every pair with `combine(applicant_points, destination_points)`.
    pub fn scores(&self, combine: impl Fn(Cost, Cost) -> Cost) -> Array2<Cost> {
        self.values.map(|pair| combine(pair.applicant_points, pair.destination_points))
    }

    /// Pair applicants with destinations so that the sum of `combine` over all pairs is as large as possible.
    ///
    /// Each row takes at most one applicant, so call [`expand_capacities`](Self::expand_capacities) first
    /// if some destination offers several places.
    pub fn match_with(&self, combine: impl Fn(Cost, Cost) -> Cost) -> Result<Matching<'_>, SolveError> {
        let solution = solve_max_array(self.scores(combine).view())?;
        Ok(Matching { table: self, solution })
    }
}
