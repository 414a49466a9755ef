//! Problem data: delivery locations, distance and rush-hour penalty matrices.
//!
//! Everything here runs before the search starts. Randomness always comes in
//! through an explicit `Rng` or seed so instances can be reproduced.

use crate::error::{InvalidInput, LoadError, TabuError};
use crate::matrix::CostMatrix;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Side length of the square area locations are drawn from.
pub const AREA_SIZE: f64 = 100.0;

/// A delivery location in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: usize,
    pub x: f64,
    pub y: f64,
}

impl Location {
    /// Create a new location.
    pub fn new(id: usize, x: f64, y: f64) -> Self {
        Location { id, x, y }
    }

    /// Calculate the Euclidean distance between two locations.
    pub fn distance(&self, other: &Location) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Rush-hour delay model applied per unordered pair of locations.
///
/// With probability `heavy_probability` a leg is delayed by
/// `heavy_factor` times its distance, otherwise with probability
/// `moderate_probability` by `moderate_factor` times its distance, otherwise
/// not at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PenaltyModel {
    pub heavy_probability: f64,
    pub heavy_factor: f64,
    pub moderate_probability: f64,
    pub moderate_factor: f64,
}

impl Default for PenaltyModel {
    fn default() -> Self {
        PenaltyModel {
            heavy_probability: 0.15,
            heavy_factor: 0.5,
            moderate_probability: 0.15,
            moderate_factor: 0.2,
        }
    }
}

impl PenaltyModel {
    /// A model that never delays any leg.
    pub fn none() -> Self {
        PenaltyModel {
            heavy_probability: 0.0,
            heavy_factor: 0.0,
            moderate_probability: 0.0,
            moderate_factor: 0.0,
        }
    }

    fn validate(&self) -> Result<(), InvalidInput> {
        let probabilities_ok = (0.0..=1.0).contains(&self.heavy_probability)
            && (0.0..=1.0).contains(&self.moderate_probability)
            && self.heavy_probability + self.moderate_probability <= 1.0;
        let factors_ok = self.heavy_factor >= 0.0 && self.moderate_factor >= 0.0;

        if probabilities_ok && factors_ok {
            Ok(())
        } else {
            Err(InvalidInput::PenaltyModel {
                heavy: self.heavy_probability,
                moderate: self.moderate_probability,
            })
        }
    }

    /// Delay factor for a single draw `r` in `[0, 1)`.
    fn factor(&self, r: f64) -> f64 {
        if r < self.heavy_probability {
            self.heavy_factor
        } else if r < self.heavy_probability + self.moderate_probability {
            self.moderate_factor
        } else {
            0.0
        }
    }
}

/// Draw `count` locations uniformly from the `AREA_SIZE` square.
pub fn generate_locations<R: Rng>(count: usize, rng: &mut R) -> Vec<Location> {
    (0..count)
        .map(|id| {
            let x = rng.gen_range(0.0..AREA_SIZE);
            let y = rng.gen_range(0.0..AREA_SIZE);
            Location::new(id, x, y)
        })
        .collect()
}

/// Pairwise Euclidean distances; the diagonal is zero.
pub fn distance_matrix(locations: &[Location]) -> CostMatrix {
    let n = locations.len();
    let mut matrix = CostMatrix::zeros(n);

    for i in 0..n {
        for j in 0..n {
            if i != j {
                matrix.set(i, j, locations[i].distance(&locations[j]));
            }
        }
    }

    matrix
}

/// Symmetric rush-hour penalty matrix derived from `distance`.
///
/// One draw is made per pair `i < j`, row by row, and mirrored to `(j, i)`.
/// The diagonal stays zero.
pub fn penalty_matrix<R: Rng>(
    distance: &CostMatrix,
    model: &PenaltyModel,
    rng: &mut R,
) -> Result<CostMatrix, TabuError> {
    model.validate()?;

    let n = distance.size();
    let mut matrix = CostMatrix::zeros(n);

    for i in 0..n {
        for j in (i + 1)..n {
            let r: f64 = rng.gen();
            let delay = model.factor(r) * distance.get(i, j);
            matrix.set(i, j, delay);
            matrix.set(j, i, delay);
        }
    }

    Ok(matrix)
}

/// A random ordering of every location except `start`, to be handed to the
/// search as its initial tour.
pub fn initial_order<R: Rng>(num_locations: usize, start: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..num_locations).filter(|&i| i != start).collect();
    order.shuffle(rng);
    order
}

/// A generated instance with its matrices.
#[derive(Debug, Clone, Serialize)]
pub struct Problem {
    pub locations: Vec<Location>,
    pub distance_matrix: CostMatrix,
    pub penalty_matrix: CostMatrix,
}

impl Problem {
    /// Build an instance from known locations and a penalty matrix.
    pub fn new(locations: Vec<Location>, penalty_matrix: CostMatrix) -> Result<Self, TabuError> {
        let distance_matrix = distance_matrix(&locations);
        if penalty_matrix.size() != distance_matrix.size() {
            return Err(InvalidInput::MatrixSizeMismatch {
                expected: distance_matrix.size(),
                found: penalty_matrix.size(),
            }
            .into());
        }

        Ok(Problem {
            locations,
            distance_matrix,
            penalty_matrix,
        })
    }

    /// Generate `count` locations and their penalties from `seed`.
    ///
    /// Locations and penalties each use a generator seeded with `seed`, so
    /// changing the penalty model leaves the coordinates untouched.
    pub fn generate(count: usize, seed: u64, model: &PenaltyModel) -> Result<Self, TabuError> {
        let mut location_rng = ChaCha8Rng::seed_from_u64(seed);
        let locations = generate_locations(count, &mut location_rng);
        let distance_matrix = distance_matrix(&locations);

        let mut penalty_rng = ChaCha8Rng::seed_from_u64(seed);
        let penalty_matrix = penalty_matrix(&distance_matrix, model, &mut penalty_rng)?;

        Ok(Problem {
            locations,
            distance_matrix,
            penalty_matrix,
        })
    }

    pub fn num_locations(&self) -> usize {
        self.locations.len()
    }

    /// Distance plus penalty, the matrix the search runs on.
    pub fn cost_matrix(&self) -> Result<CostMatrix, TabuError> {
        self.distance_matrix.combine(&self.penalty_matrix)
    }
}

/// Write one `x,y` line per location with three decimals.
pub fn write_coordinates<P: AsRef<Path>>(locations: &[Location], path: P) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);

    for location in locations {
        writeln!(writer, "{:.3},{:.3}", location.x, location.y)?;
    }

    writer.flush()
}

/// Read locations written by [`write_coordinates`]; ids follow line order.
pub fn read_coordinates<P: AsRef<Path>>(path: P) -> Result<Vec<Location>, LoadError> {
    let reader = BufReader::new(File::open(path)?);
    let mut locations = Vec::new();

    for (line_idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parse = |token: &str| {
            let token = token.trim();
            token.parse::<f64>().map_err(|_| LoadError::Parse {
                line: line_idx + 1,
                token: token.to_string(),
            })
        };

        let mut fields = line.split(',');
        let (x, y) = match (fields.next(), fields.next(), fields.next()) {
            (Some(x), Some(y), None) => (parse(x)?, parse(y)?),
            _ => {
                return Err(LoadError::Parse {
                    line: line_idx + 1,
                    token: line.to_string(),
                })
            }
        };

        locations.push(Location::new(locations.len(), x, y));
    }

    Ok(locations)
}
