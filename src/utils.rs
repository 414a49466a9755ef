//! Reporting helpers for search results.

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use crate::error::TabuError;
use crate::matrix::CostMatrix;
use crate::problem::Location;
use crate::solution::{SearchResult, Stop};

/// Format a duration as hours, minutes, seconds and milliseconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    let millis = duration.subsec_millis();

    format!("{}h {:02}m {:02}.{:03}s", hours, minutes, seconds, millis)
}

/// Render the arrival schedule as a table.
///
/// Each row shows the 1-based order, the node, its coordinates (when
/// `locations` covers it) and the cumulative travel time on arrival.
pub fn format_schedule(stops: &[Stop], locations: &[Location]) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:>5} | {:>4} | {:>16} | {:>12}",
        "Order", "Node", "Coordinate", "Arrival time"
    );
    let _ = writeln!(out, "{}", "-".repeat(47));

    for stop in stops {
        let coordinate = match locations.get(stop.node) {
            Some(location) => format!("({:6.2}, {:6.2})", location.x, location.y),
            None => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "{:5} | {:4} | {:>16} | {:12.2}",
            stop.order, stop.node, coordinate, stop.arrival
        );
    }

    out
}

/// Width of the route visualization grid in characters.
pub const GRID_WIDTH: usize = 80;
/// Height of the route visualization grid in lines.
pub const GRID_HEIGHT: usize = 25;

/// Map `value` from `[min, max]` onto `0..cells`. A zero-width range lands
/// in the middle.
fn grid_cell(value: f64, min: f64, max: f64, cells: usize) -> usize {
    if max - min <= f64::EPSILON {
        return cells / 2;
    }
    let cell = ((value - min) / (max - min) * (cells as f64 - 1.0)) as usize;
    cell.min(cells - 1)
}

/// Draw the route of `result` as an ASCII grid scaled to the coordinate
/// bounds, followed by a legend with every stop's arrival time.
///
/// The start is marked `S`, the last stop before returning `E`, and every
/// other stop is labeled with its 1-based visiting order. Higher `y` is
/// drawn nearer the top. Nodes without coordinates in `locations` are left
/// off the grid.
pub fn format_route_visualization(
    result: &SearchResult,
    matrix: &CostMatrix,
    locations: &[Location],
) -> Result<String, TabuError> {
    let stops = result.schedule(matrix)?;

    let placed: Vec<(usize, &Location)> = result
        .tour
        .as_slice()
        .iter()
        .enumerate()
        .filter_map(|(position, &node)| locations.get(node).map(|l| (position, l)))
        .collect();

    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;
    for (_, location) in &placed {
        min_x = min_x.min(location.x);
        min_y = min_y.min(location.y);
        max_x = max_x.max(location.x);
        max_y = max_y.max(location.y);
    }

    let mut grid = vec![vec![' '; GRID_WIDTH]; GRID_HEIGHT];
    let last = result.tour.len().saturating_sub(1);
    let cell_of = |location: &Location| {
        let col = grid_cell(location.x, min_x, max_x, GRID_WIDTH);
        let row = GRID_HEIGHT - 1 - grid_cell(location.y, min_y, max_y, GRID_HEIGHT);
        (row, col)
    };

    // Labels first, then E, then S: later markers win a shared cell.
    for &(position, location) in &placed {
        if position == 0 || position == last {
            continue;
        }
        let (row, col) = cell_of(location);
        for (offset, digit) in (position + 1).to_string().chars().enumerate() {
            if let Some(cell) = grid[row].get_mut(col + offset) {
                *cell = digit;
            }
        }
    }
    if let Some(&(_, location)) = placed.iter().find(|(position, _)| *position == last && last > 0) {
        let (row, col) = cell_of(location);
        grid[row][col] = 'E';
    }
    if let Some(&(_, location)) = placed.iter().find(|(position, _)| *position == 0) {
        let (row, col) = cell_of(location);
        grid[row][col] = 'S';
    }

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Route Visualization ({} stops, cost {:.2})",
        result.tour.len(),
        result.cost
    );
    for row in &grid {
        let _ = writeln!(out, "{}", row.iter().collect::<String>());
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Legend:");
    let _ = writeln!(out, "S - Start");
    let _ = writeln!(out, "E - Last stop before returning to the start");
    for stop in &stops {
        let coordinate = match locations.get(stop.node) {
            Some(location) => format!("({:.1},{:.1})", location.x, location.y),
            None => "-".to_string(),
        };
        let _ = writeln!(
            out,
            "{}. Node {} {} t={:.1}",
            stop.order, stop.node, coordinate, stop.arrival
        );
    }

    Ok(out)
}

/// Save a result and its arrival schedule to a text file.
pub fn save_solution<P: AsRef<Path>>(
    result: &SearchResult,
    matrix: &CostMatrix,
    locations: &[Location],
    path: P,
) -> io::Result<()> {
    let stops = result
        .schedule(matrix)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let mut file = BufWriter::new(File::create(path)?);

    writeln!(file, "Route: {}", result.tour)?;
    writeln!(file, "Total Cost: {:.2}", result.cost)?;
    writeln!(file, "Iterations: {}", result.iterations)?;
    writeln!(file, "Termination: {}", result.termination)?;
    writeln!(file)?;
    write!(file, "{}", format_schedule(&stops, locations))?;

    file.flush()
}

/// Write the result as pretty-printed JSON.
pub fn write_result_json<P: AsRef<Path>>(result: &SearchResult, path: P) -> io::Result<()> {
    let file = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(file, result)?;
    Ok(())
}

/// Summary of a finished run.
pub struct SearchStatistics {
    pub locations: usize,
    pub iterations: usize,
    pub best_iteration: usize,
    pub runtime: Duration,
    pub initial_cost: f64,
    pub best_cost: f64,
}

impl SearchStatistics {
    /// Collect statistics for `result`, started from a tour of cost
    /// `initial_cost`.
    pub fn new(result: &SearchResult, initial_cost: f64, runtime: Duration) -> Self {
        SearchStatistics {
            locations: result.tour.len(),
            iterations: result.iterations,
            best_iteration: result.best_iteration,
            runtime,
            initial_cost,
            best_cost: result.cost,
        }
    }

    /// Relative improvement over the initial tour, in percent.
    pub fn improvement(&self) -> f64 {
        if self.initial_cost > 0.0 {
            (self.initial_cost - self.best_cost) / self.initial_cost * 100.0
        } else {
            0.0
        }
    }

    /// Format the statistics as a string.
    pub fn format(&self) -> String {
        format!(
            "Search Statistics:
- Locations: {}
- Iterations: {}
- Best Found At Iteration: {}
- Runtime: {}
- Initial Cost: {:.2}
- Best Cost: {:.2}
- Improvement: {:.1}%",
            self.locations,
            self.iterations,
            self.best_iteration,
            format_duration(self.runtime),
            self.initial_cost,
            self.best_cost,
            self.improvement()
        )
    }
}

/// Schedule of `result` on `matrix`, formatted for the terminal.
pub fn schedule_report(
    result: &SearchResult,
    matrix: &CostMatrix,
    locations: &[Location],
) -> Result<String, TabuError> {
    let stops = result.schedule(matrix)?;
    Ok(format_schedule(&stops, locations))
}
