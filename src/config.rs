//! Configuration parameters for the tabu search.

use serde::{Deserialize, Serialize};

/// Configuration settings for a single tabu search run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Location every tour starts and ends at
    pub start_location_index: usize,
    /// Number of recent tours kept tabu
    pub tabu_size: usize,
    /// Iteration budget
    pub max_iter: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            start_location_index: 0,
            tabu_size: 5,
            max_iter: 500,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Set the start location.
    pub fn with_start_location_index(mut self, index: usize) -> Self {
        self.start_location_index = index;
        self
    }

    /// Set the tabu memory capacity.
    pub fn with_tabu_size(mut self, size: usize) -> Self {
        self.tabu_size = size;
        self
    }

    /// Set the iteration budget.
    pub fn with_max_iter(mut self, iterations: usize) -> Self {
        self.max_iter = iterations;
        self
    }
}
