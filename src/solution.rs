//! Search results and the arrival schedule derived from them.

use crate::error::TabuError;
use crate::matrix::CostMatrix;
use crate::tour::{arrival_times, Tour};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a search stopped. Both outcomes are normal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TerminationReason {
    /// The iteration budget was used up.
    IterationLimit,
    /// Every neighbor was tabu and none satisfied aspiration, or the
    /// neighborhood was empty.
    NoAdmissibleNeighbor,
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::IterationLimit => write!(f, "iteration limit reached"),
            TerminationReason::NoAdmissibleNeighbor => write!(f, "no admissible neighbor"),
        }
    }
}

/// Outcome of a tabu search run.
#[derive(Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Best tour found, starting at the configured start location
    pub tour: Tour,
    /// Cost of the best tour
    pub cost: f64,
    /// Number of moves performed
    pub iterations: usize,
    /// Iteration after which the best tour was found (0 for the initial tour)
    pub best_iteration: usize,
    pub termination: TerminationReason,
    /// Best cost after each iteration; one entry per move, so at most
    /// `max_iter` entries
    pub cost_history: Vec<f64>,
}

/// One stop of the driven route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// 1-based position in the route
    pub order: usize,
    pub node: usize,
    /// Cumulative travel time on arrival
    pub arrival: f64,
}

impl SearchResult {
    /// Arrival time at every stop of the best tour, including the return to
    /// the start as the final stop.
    pub fn schedule(&self, matrix: &CostMatrix) -> Result<Vec<Stop>, TabuError> {
        let tour = self.tour.as_slice();
        let times = arrival_times(tour, matrix)?;

        let mut stops: Vec<Stop> = tour
            .iter()
            .zip(times)
            .enumerate()
            .map(|(step, (&node, arrival))| Stop {
                order: step + 1,
                node,
                arrival,
            })
            .collect();

        if let Some(start) = self.tour.start() {
            stops.push(Stop {
                order: stops.len() + 1,
                node: start,
                arrival: crate::tour::evaluate(tour, matrix)?,
            });
        }

        Ok(stops)
    }
}

impl fmt::Debug for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SearchResult:")?;
        writeln!(f, "  Tour: {}", self.tour)?;
        writeln!(f, "  Cost: {:.2}", self.cost)?;
        writeln!(f, "  Iterations: {}", self.iterations)?;
        writeln!(f, "  Best Iteration: {}", self.best_iteration)?;
        writeln!(f, "  Termination: {}", self.termination)?;

        Ok(())
    }
}
