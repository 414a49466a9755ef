//! # Tabu Delivery
//!
//! Tabu search for the visiting order of a single delivery vehicle.
//!
//! Travel cost between two locations is their Euclidean distance plus a
//! random rush-hour delay. The search itself only sees the combined
//! [`CostMatrix`] and a starting permutation: each iteration it moves to the
//! cheapest swap neighbor that is not tabu (or that beats the best tour found
//! so far), even if that neighbor is worse than the current tour. The
//! [`problem`] and [`utils`] modules build the matrices and report the
//! result; they never run inside the search loop.

pub mod config;
pub mod error;
pub mod matrix;
pub mod neighborhood;
pub mod problem;
pub mod solution;
pub mod tabu_memory;
pub mod tour;
pub mod utils;

pub use crate::config::Config;
pub use crate::error::{DimensionMismatch, InvalidInput, LoadError, TabuError};
pub use crate::matrix::CostMatrix;
pub use crate::neighborhood::{Neighbor, SwapNeighborhood};
pub use crate::solution::{SearchResult, Stop, TerminationReason};
pub use crate::tabu_memory::TabuMemory;
pub use crate::tour::{evaluate, Tour};

/// Lifecycle of a search. A run passes through each phase once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initialized,
    Iterating,
    Terminated(TerminationReason),
}

/// Mutable state of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub current: Tour,
    pub current_cost: f64,
    pub best: Tour,
    pub best_cost: f64,
    pub iteration: usize,
}

/// What a single call to [`TabuSearch::step`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    /// The search moved to a neighbor.
    Moved {
        iteration: usize,
        cost: f64,
        best_cost: f64,
        /// The neighbor was tabu and admitted by aspiration.
        aspiration: bool,
    },
    /// The search has stopped; further calls return the same value.
    Terminated(TerminationReason),
}

/// The neighbor chosen for one iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub neighbor: Neighbor,
    /// The neighbor is tabu and was admitted by aspiration.
    pub aspiration: bool,
}

/// Apply the admissibility policy to a scored neighborhood.
///
/// The cheapest non-tabu neighbor competes with the cheapest tabu neighbor;
/// the tabu one only wins if it is strictly cheaper than both `best_cost` and
/// the non-tabu candidate. Ties inside each group go to the neighbor seen
/// first, so with enumeration order the earliest `(i, j)` wins and a non-tabu
/// neighbor beats a tabu one of equal cost. Returns `None` when no neighbor
/// is admissible.
pub fn select_move<I>(neighbors: I, memory: &TabuMemory, best_cost: f64) -> Option<Selection>
where
    I: IntoIterator<Item = Neighbor>,
{
    let mut admissible: Option<Neighbor> = None;
    let mut tabu: Option<Neighbor> = None;

    for neighbor in neighbors {
        let slot = if memory.contains(&neighbor.tour) {
            &mut tabu
        } else {
            &mut admissible
        };

        if slot.as_ref().map_or(true, |held| neighbor.cost < held.cost) {
            *slot = Some(neighbor);
        }
    }

    let admissible_cost = admissible.as_ref().map_or(f64::INFINITY, |n| n.cost);

    match tabu {
        Some(candidate) if candidate.cost < best_cost && candidate.cost < admissible_cost => {
            Some(Selection {
                neighbor: candidate,
                aspiration: true,
            })
        }
        _ => admissible.map(|neighbor| Selection {
            neighbor,
            aspiration: false,
        }),
    }
}

/// The tabu search engine.
///
/// Borrows the cost matrix for its whole lifetime and owns the tabu memory
/// and search state.
pub struct TabuSearch<'m> {
    matrix: &'m CostMatrix,
    config: Config,
    memory: TabuMemory,
    state: SearchState,
    phase: Phase,
    best_iteration: usize,
    cost_history: Vec<f64>,
}

impl<'m> TabuSearch<'m> {
    /// Set up a search over `num_locations` locations.
    ///
    /// The initial tour is `[config.start_location_index] + initial_order`.
    /// It is evaluated, becomes the best-known tour and seeds the tabu
    /// memory.
    ///
    /// # Errors
    ///
    /// Returns [`TabuError::InvalidInput`] if there are no locations, the
    /// matrix size differs from `num_locations`, the start index is out of
    /// range, the tabu size is zero, or `initial_order` is not a permutation
    /// of the non-start locations.
    pub fn new(
        matrix: &'m CostMatrix,
        num_locations: usize,
        config: Config,
        initial_order: Vec<usize>,
    ) -> Result<Self, TabuError> {
        Self::validate(matrix, num_locations, &config, &initial_order)?;

        let current = Tour::from_start(config.start_location_index, &initial_order);
        let current_cost = tour::evaluate(current.as_slice(), matrix)?;

        let mut memory = TabuMemory::new(config.tabu_size);
        memory.record(current.clone());

        log::info!(
            "tabu: start locations={} start={} tabu_size={} max_iter={} initial_cost={:.3}",
            num_locations,
            config.start_location_index,
            config.tabu_size,
            config.max_iter,
            current_cost
        );

        Ok(TabuSearch {
            matrix,
            memory,
            state: SearchState {
                best: current.clone(),
                best_cost: current_cost,
                current,
                current_cost,
                iteration: 0,
            },
            phase: Phase::Initialized,
            best_iteration: 0,
            cost_history: Vec::with_capacity(config.max_iter.min(1 << 16)),
            config,
        })
    }

    fn validate(
        matrix: &CostMatrix,
        num_locations: usize,
        config: &Config,
        initial_order: &[usize],
    ) -> Result<(), InvalidInput> {
        if num_locations == 0 {
            return Err(InvalidInput::NoLocations);
        }

        if matrix.size() != num_locations {
            return Err(InvalidInput::MatrixSizeMismatch {
                expected: num_locations,
                found: matrix.size(),
            });
        }

        let start = config.start_location_index;
        if start >= num_locations {
            return Err(InvalidInput::StartOutOfRange {
                start,
                num_locations,
            });
        }

        if config.tabu_size == 0 {
            return Err(InvalidInput::ZeroTabuSize);
        }

        if initial_order.len() != num_locations - 1 {
            return Err(InvalidInput::InitialOrderLength {
                expected: num_locations - 1,
                found: initial_order.len(),
            });
        }

        let mut seen = vec![false; num_locations];
        seen[start] = true;
        for &index in initial_order {
            if index >= num_locations || seen[index] {
                return Err(InvalidInput::NotAPermutation { index });
            }
            seen[index] = true;
        }

        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn memory(&self) -> &TabuMemory {
        &self.memory
    }

    /// Perform one iteration.
    pub fn step(&mut self) -> Step {
        if let Phase::Terminated(reason) = self.phase {
            return Step::Terminated(reason);
        }

        if self.state.iteration >= self.config.max_iter {
            return self.terminate(TerminationReason::IterationLimit);
        }

        self.phase = Phase::Iterating;

        let Some(Selection {
            neighbor,
            aspiration,
        }) = self.choose_move()
        else {
            return self.terminate(TerminationReason::NoAdmissibleNeighbor);
        };

        // Steepest move: taken even when it is worse than the current tour.
        self.state.current = neighbor.tour;
        self.state.current_cost = neighbor.cost;
        self.memory.record(self.state.current.clone());
        self.state.iteration += 1;

        if self.state.current_cost < self.state.best_cost {
            self.state.best = self.state.current.clone();
            self.state.best_cost = self.state.current_cost;
            self.best_iteration = self.state.iteration;
            log::debug!(
                "tabu: new best iteration={} cost={:.3} swap=({}, {}) aspiration={}",
                self.state.iteration,
                self.state.best_cost,
                neighbor.i,
                neighbor.j,
                aspiration
            );
        }

        self.cost_history.push(self.state.best_cost);

        log::trace!(
            "tabu: iteration={} cost={:.3} best={:.3}",
            self.state.iteration,
            self.state.current_cost,
            self.state.best_cost
        );

        if self.state.iteration >= self.config.max_iter {
            self.finish(TerminationReason::IterationLimit);
        }

        Step::Moved {
            iteration: self.state.iteration,
            cost: self.state.current_cost,
            best_cost: self.state.best_cost,
            aspiration,
        }
    }

    /// Run until termination and return the best tour.
    pub fn run(mut self) -> SearchResult {
        loop {
            if let Step::Terminated(reason) = self.step() {
                let cost_history = std::mem::take(&mut self.cost_history);
                return self.build_result(reason, cost_history);
            }
        }
    }

    /// The result of a finished run, or `None` while the search can still
    /// move.
    pub fn result(&self) -> Option<SearchResult> {
        match self.phase {
            Phase::Terminated(reason) => {
                Some(self.build_result(reason, self.cost_history.clone()))
            }
            _ => None,
        }
    }

    fn build_result(&self, termination: TerminationReason, cost_history: Vec<f64>) -> SearchResult {
        SearchResult {
            tour: self.state.best.clone(),
            cost: self.state.best_cost,
            iterations: self.state.iteration,
            best_iteration: self.best_iteration,
            termination,
            cost_history,
        }
    }

    fn terminate(&mut self, reason: TerminationReason) -> Step {
        self.finish(reason);
        Step::Terminated(reason)
    }

    fn finish(&mut self, reason: TerminationReason) {
        self.phase = Phase::Terminated(reason);
        log::info!(
            "tabu: stop reason={:?} iterations={} best_iteration={} best_cost={:.3}",
            reason,
            self.state.iteration,
            self.best_iteration,
            self.state.best_cost
        );
    }

    /// Scan the whole neighborhood of the current tour and pick this
    /// iteration's move.
    fn choose_move(&self) -> Option<Selection> {
        #[cfg(not(feature = "parallel"))]
        let neighbors = SwapNeighborhood::unchecked(&self.state.current, self.matrix);
        #[cfg(feature = "parallel")]
        let neighbors = neighborhood::score_all(&self.state.current, self.matrix);

        select_move(neighbors, &self.memory, self.state.best_cost)
    }
}

/// Optimize the visiting order over every location of `matrix`.
///
/// Shorthand for [`TabuSearch::new`] with `num_locations = matrix.size()`
/// followed by [`TabuSearch::run`].
pub fn optimize(
    matrix: &CostMatrix,
    config: Config,
    initial_order: Vec<usize>,
) -> Result<SearchResult, TabuError> {
    let search = TabuSearch::new(matrix, matrix.size(), config, initial_order)?;
    Ok(search.run())
}
