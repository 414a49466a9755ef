//! Pairwise swap neighborhood of a tour.
//!
//! Position 0 holds the start location and is never moved, so a tour of
//! length `n` has `C(n - 1, 2)` neighbors, enumerated in ascending `(i, j)`
//! order. The order is what makes tie-breaking in the search deterministic.

use crate::error::TabuError;
use crate::matrix::CostMatrix;
use crate::tour::{check_dimensions, cycle_cost, Tour};
use itertools::Itertools;

/// A candidate tour produced by swapping positions `i` and `j`.
#[derive(Debug, Clone, PartialEq)]
pub struct Neighbor {
    pub i: usize,
    pub j: usize,
    pub tour: Tour,
    pub cost: f64,
}

/// Number of swap neighbors of a tour with `len` positions.
pub fn neighborhood_size(len: usize) -> usize {
    if len < 3 {
        0
    } else {
        (len - 1) * (len - 2) / 2
    }
}

/// Position pairs `(i, j)` with `1 <= i < j < len`, in enumeration order.
pub fn swap_pairs(len: usize) -> impl Iterator<Item = (usize, usize)> {
    (1..len).tuple_combinations()
}

/// Lazy iterator over the scored swap neighbors of a tour.
pub struct SwapNeighborhood<'a> {
    tour: &'a Tour,
    matrix: &'a CostMatrix,
    i: usize,
    j: usize,
}

impl<'a> SwapNeighborhood<'a> {
    /// Prepare the neighborhood of `tour`, checking once that it fits
    /// `matrix`.
    pub fn new(tour: &'a Tour, matrix: &'a CostMatrix) -> Result<Self, TabuError> {
        check_dimensions(tour.as_slice(), matrix)?;
        Ok(Self::unchecked(tour, matrix))
    }

    /// Skip the dimension check for tours the engine validated on entry.
    pub(crate) fn unchecked(tour: &'a Tour, matrix: &'a CostMatrix) -> Self {
        SwapNeighborhood {
            tour,
            matrix,
            i: 1,
            j: 2,
        }
    }

    fn remaining(&self) -> usize {
        let n = self.tour.len();
        if self.i + 1 >= n {
            return 0;
        }
        // Pairs left in the current row plus every later row.
        let current_row = n - self.j;
        let later = neighborhood_size(n - self.i);
        current_row + later
    }
}

impl Iterator for SwapNeighborhood<'_> {
    type Item = Neighbor;

    fn next(&mut self) -> Option<Neighbor> {
        let n = self.tour.len();
        if self.i + 1 >= n {
            return None;
        }

        let (i, j) = (self.i, self.j);
        self.j += 1;
        if self.j >= n {
            self.i += 1;
            self.j = self.i + 1;
        }

        let tour = self.tour.swapped(i, j);
        let cost = cycle_cost(tour.as_slice(), self.matrix);
        Some(Neighbor { i, j, tour, cost })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SwapNeighborhood<'_> {}

/// Score every neighbor on the rayon pool. The returned vector is in
/// enumeration order, so a sequential scan over it breaks ties exactly as
/// the lazy iterator does.
#[cfg(feature = "parallel")]
pub fn scored_neighbors_par(tour: &Tour, matrix: &CostMatrix) -> Result<Vec<Neighbor>, TabuError> {
    check_dimensions(tour.as_slice(), matrix)?;
    Ok(score_all(tour, matrix))
}

#[cfg(feature = "parallel")]
pub(crate) fn score_all(tour: &Tour, matrix: &CostMatrix) -> Vec<Neighbor> {
    use rayon::prelude::*;

    let pairs: Vec<(usize, usize)> = swap_pairs(tour.len()).collect();

    pairs
        .into_par_iter()
        .map(|(i, j)| {
            let candidate = tour.swapped(i, j);
            let cost = cycle_cost(candidate.as_slice(), matrix);
            Neighbor {
                i,
                j,
                tour: candidate,
                cost,
            }
        })
        .collect()
}
