//! Command-line driver: generate an instance, optimize it, print the route.

use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::time::Instant;

use tabu_delivery::problem::{self, PenaltyModel, Problem};
use tabu_delivery::utils::{
    format_duration, format_route_visualization, save_solution, schedule_report,
    write_result_json, SearchStatistics,
};
use tabu_delivery::{evaluate, Config, CostMatrix, TabuSearch};

/// Optimize a delivery route with tabu search.
#[derive(Debug, Parser)]
#[command(name = "tabu-delivery", version, about)]
struct Args {
    /// Number of delivery locations
    #[arg(long, default_value_t = 10)]
    points: usize,

    /// Seed for locations and rush-hour penalties
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Seed for the initial visiting order
    #[arg(long, default_value_t = 1)]
    shuffle_seed: u64,

    /// Index of the depot the route starts and ends at
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// Number of recent tours kept tabu
    #[arg(long, default_value_t = 5)]
    tabu_size: usize,

    /// Iteration budget
    #[arg(long, default_value_t = 500)]
    max_iter: usize,

    /// Write coordinates.csv and penalty_matrix.csv into this directory
    #[arg(long, conflicts_with = "load_dir")]
    data_dir: Option<PathBuf>,

    /// Read coordinates.csv and penalty_matrix.csv from this directory
    /// instead of generating an instance
    #[arg(long)]
    load_dir: Option<PathBuf>,

    /// Write the route and arrival schedule as text to this file
    #[arg(long)]
    solution: Option<PathBuf>,

    /// Draw the route as a character grid
    #[arg(long)]
    plot: bool,

    /// Write the search result as JSON to this file
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let instance = match &args.load_dir {
        Some(dir) => {
            let locations = problem::read_coordinates(dir.join("coordinates.csv"))?;
            let penalty = CostMatrix::from_csv_file(dir.join("penalty_matrix.csv"))?;
            log::info!("loaded {} locations from {}", locations.len(), dir.display());
            Problem::new(locations, penalty)?
        }
        None => {
            let instance = Problem::generate(args.points, args.seed, &PenaltyModel::default())?;
            log::info!(
                "generated {} locations (seed {})",
                instance.num_locations(),
                args.seed
            );
            instance
        }
    };

    if let Some(dir) = &args.data_dir {
        std::fs::create_dir_all(dir)?;
        let coordinates_path = dir.join("coordinates.csv");
        let penalty_path = dir.join("penalty_matrix.csv");
        problem::write_coordinates(&instance.locations, &coordinates_path)?;
        instance.penalty_matrix.write_csv(&penalty_path)?;
        log::info!(
            "saved {} and {}",
            coordinates_path.display(),
            penalty_path.display()
        );
    }

    let matrix = instance.cost_matrix()?;
    let config = Config::new()
        .with_start_location_index(args.start)
        .with_tabu_size(args.tabu_size)
        .with_max_iter(args.max_iter);

    let mut rng = ChaCha8Rng::seed_from_u64(args.shuffle_seed);
    let order = problem::initial_order(instance.num_locations(), args.start, &mut rng);

    let search = TabuSearch::new(&matrix, instance.num_locations(), config, order)?;
    let initial_cost = search.state().current_cost;

    let start_time = Instant::now();
    let result = search.run();
    let runtime = start_time.elapsed();

    println!("Optimal route: {}", result.tour);
    println!(
        "Total delivery time (with penalties): {:.2} units",
        evaluate(result.tour.as_slice(), &matrix)?
    );
    println!("Search completed in {}", format_duration(runtime));
    println!();
    print!("{}", schedule_report(&result, &matrix, &instance.locations)?);
    println!();
    if args.plot {
        print!(
            "{}",
            format_route_visualization(&result, &matrix, &instance.locations)?
        );
        println!();
    }
    println!(
        "{}",
        SearchStatistics::new(&result, initial_cost, runtime).format()
    );

    if let Some(path) = &args.solution {
        save_solution(&result, &matrix, &instance.locations, path)?;
        log::info!("saved solution to {}", path.display());
    }

    if let Some(path) = &args.output {
        write_result_json(&result, path)?;
        log::info!("saved result to {}", path.display());
    }

    Ok(())
}
