//! Tour representation and cycle cost evaluation.

use crate::error::{DimensionMismatch, TabuError};
use crate::matrix::CostMatrix;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A visiting order over all locations that returns to its first element.
///
/// Tours are values: [`Tour::swapped`] returns a new tour and leaves the
/// original untouched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tour(Vec<usize>);

impl Tour {
    /// Wrap an ordering without validating it.
    pub fn new(order: Vec<usize>) -> Self {
        Tour(order)
    }

    /// Build `[start] + rest`.
    pub fn from_start(start: usize, rest: &[usize]) -> Self {
        let mut order = Vec::with_capacity(rest.len() + 1);
        order.push(start);
        order.extend_from_slice(rest);
        Tour(order)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The fixed first location, if any.
    pub fn start(&self) -> Option<usize> {
        self.0.first().copied()
    }

    /// A copy of this tour with positions `i` and `j` exchanged.
    pub fn swapped(&self, i: usize, j: usize) -> Tour {
        let mut order = self.0.clone();
        order.swap(i, j);
        Tour(order)
    }

    /// The same cycle traversed in the opposite direction.
    pub fn reversed(&self) -> Tour {
        Tour(self.0.iter().rev().copied().collect())
    }

    /// The visiting order with the start appended, as driven.
    pub fn closed(&self) -> Vec<usize> {
        let mut order = self.0.clone();
        if let Some(start) = self.start() {
            order.push(start);
        }
        order
    }
}

impl AsRef<[usize]> for Tour {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.closed().iter().join(" -> "))
    }
}

/// Total cost of driving `tour` as a closed cycle.
///
/// Sums `matrix[tour[k]][tour[k + 1]]` over consecutive stops plus the
/// closing edge back to `tour[0]`. A single-location tour costs zero.
///
/// # Errors
///
/// Returns [`TabuError::DimensionMismatch`] if the tour length differs from
/// the matrix size or if any index is outside the matrix.
pub fn evaluate(tour: &[usize], matrix: &CostMatrix) -> Result<f64, TabuError> {
    check_dimensions(tour, matrix)?;
    Ok(cycle_cost(tour, matrix))
}

/// Verify that `tour` addresses exactly the locations of `matrix`.
pub(crate) fn check_dimensions(tour: &[usize], matrix: &CostMatrix) -> Result<(), TabuError> {
    let matrix_size = matrix.size();

    if tour.len() != matrix_size {
        return Err(DimensionMismatch::Length {
            tour_len: tour.len(),
            matrix_size,
        }
        .into());
    }

    if let Some(&index) = tour.iter().find(|&&index| index >= matrix_size) {
        return Err(DimensionMismatch::IndexOutOfRange { index, matrix_size }.into());
    }

    Ok(())
}

/// Cycle cost without bounds validation. Callers must have run
/// [`check_dimensions`] on a tour of the same length and index set.
#[inline]
pub(crate) fn cycle_cost(tour: &[usize], matrix: &CostMatrix) -> f64 {
    if tour.len() < 2 {
        return 0.0;
    }
    let (first, last) = (tour[0], tour[tour.len() - 1]);

    let path: f64 = tour
        .iter()
        .tuple_windows()
        .map(|(&from, &to)| matrix.get(from, to))
        .sum();

    path + matrix.get(last, first)
}

/// Cumulative travel time on arrival at each stop, starting with `0.0` at
/// the start location. The closing edge is not included; see
/// [`return_time`].
pub fn arrival_times(tour: &[usize], matrix: &CostMatrix) -> Result<Vec<f64>, TabuError> {
    check_dimensions(tour, matrix)?;

    let mut times = Vec::with_capacity(tour.len());
    let mut elapsed = 0.0;

    for (step, &stop) in tour.iter().enumerate() {
        if step > 0 {
            elapsed += matrix.get(tour[step - 1], stop);
        }
        times.push(elapsed);
    }

    Ok(times)
}

/// Cumulative travel time once the vehicle is back at the start. Equal to
/// [`evaluate`].
pub fn return_time(tour: &[usize], matrix: &CostMatrix) -> Result<f64, TabuError> {
    evaluate(tour, matrix)
}
