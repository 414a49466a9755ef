//! Tests for instance generation and coordinate files.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use tabu_delivery::error::{InvalidInput, TabuError};
use tabu_delivery::matrix::CostMatrix;
use tabu_delivery::problem::{
    distance_matrix, generate_locations, initial_order, penalty_matrix, read_coordinates,
    write_coordinates, Location, PenaltyModel, Problem, AREA_SIZE,
};

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("tabu_delivery_{}_{}", std::process::id(), name))
}

#[test]
fn test_location_distance() {
    let a = Location::new(0, 0.0, 0.0);
    let b = Location::new(1, 3.0, 4.0);
    assert!((a.distance(&b) - 5.0).abs() < 1e-12);
    assert_eq!(a.distance(&b), b.distance(&a));
}

#[test]
fn test_generate_locations_in_area() {
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let locations = generate_locations(50, &mut rng);

    assert_eq!(locations.len(), 50);
    for (i, location) in locations.iter().enumerate() {
        assert_eq!(location.id, i);
        assert!((0.0..AREA_SIZE).contains(&location.x));
        assert!((0.0..AREA_SIZE).contains(&location.y));
    }
}

#[test]
fn test_distance_matrix() {
    let locations = vec![
        Location::new(0, 0.0, 0.0),
        Location::new(1, 3.0, 4.0),
        Location::new(2, 6.0, 0.0),
    ];
    let matrix = distance_matrix(&locations);

    assert_eq!(matrix.size(), 3);
    assert_eq!(matrix.get(0, 0), 0.0);
    assert!((matrix.get(0, 1) - 5.0).abs() < 1e-12);
    assert!((matrix.get(1, 2) - 5.0).abs() < 1e-12);
    assert!((matrix.get(2, 0) - 6.0).abs() < 1e-12);
    assert!(matrix.is_symmetric(0.0));
}

#[test]
fn test_penalty_matrix_structure() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let locations = generate_locations(15, &mut rng);
    let distance = distance_matrix(&locations);

    let model = PenaltyModel::default();
    let penalty = penalty_matrix(&distance, &model, &mut rng).unwrap();

    assert!(penalty.is_symmetric(0.0));

    for i in 0..15 {
        assert_eq!(penalty.get(i, i), 0.0);
        for j in 0..15 {
            if i == j {
                continue;
            }
            let d = distance.get(i, j);
            let p = penalty.get(i, j);
            let matches_factor = [0.0, model.moderate_factor, model.heavy_factor]
                .iter()
                .any(|factor| (p - factor * d).abs() < 1e-12);
            assert!(matches_factor, "penalty {} for distance {}", p, d);
        }
    }
}

#[test]
fn test_penalty_model_none() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let locations = generate_locations(6, &mut rng);
    let distance = distance_matrix(&locations);

    let penalty = penalty_matrix(&distance, &PenaltyModel::none(), &mut rng).unwrap();
    assert_eq!(penalty, CostMatrix::zeros(6));
}

#[test]
fn test_penalty_model_validation() {
    let distance = CostMatrix::zeros(3);
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let model = PenaltyModel {
        heavy_probability: 0.7,
        moderate_probability: 0.6,
        ..PenaltyModel::default()
    };

    let err = penalty_matrix(&distance, &model, &mut rng).unwrap_err();
    assert_eq!(
        err,
        TabuError::InvalidInput(InvalidInput::PenaltyModel {
            heavy: 0.7,
            moderate: 0.6
        })
    );
}

#[test]
fn test_generate_is_reproducible() {
    let model = PenaltyModel::default();
    let first = Problem::generate(10, 42, &model).unwrap();
    let second = Problem::generate(10, 42, &model).unwrap();
    let other = Problem::generate(10, 43, &model).unwrap();

    assert_eq!(first.locations, second.locations);
    assert_eq!(first.penalty_matrix, second.penalty_matrix);
    assert_ne!(first.locations, other.locations);
}

#[test]
fn test_penalty_model_does_not_move_locations() {
    let with_penalty = Problem::generate(8, 5, &PenaltyModel::default()).unwrap();
    let without = Problem::generate(8, 5, &PenaltyModel::none()).unwrap();

    assert_eq!(with_penalty.locations, without.locations);
    assert_eq!(with_penalty.distance_matrix, without.distance_matrix);
}

#[test]
fn test_cost_matrix_is_distance_plus_penalty() {
    let problem = Problem::generate(9, 3, &PenaltyModel::default()).unwrap();
    let cost = problem.cost_matrix().unwrap();

    for i in 0..9 {
        for j in 0..9 {
            let expected = problem.distance_matrix.get(i, j) + problem.penalty_matrix.get(i, j);
            assert_eq!(cost.get(i, j), expected);
        }
    }
    assert!(cost.is_symmetric(1e-12));
}

#[test]
fn test_problem_new_checks_penalty_size() {
    let locations = vec![Location::new(0, 0.0, 0.0), Location::new(1, 1.0, 1.0)];

    assert!(Problem::new(locations.clone(), CostMatrix::zeros(2)).is_ok());
    assert!(Problem::new(locations, CostMatrix::zeros(3)).is_err());
}

#[test]
fn test_initial_order() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let order = initial_order(10, 4, &mut rng);

    assert_eq!(order.len(), 9);
    assert!(!order.contains(&4));

    let mut sorted = order.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, vec![0, 1, 2, 3, 5, 6, 7, 8, 9]);

    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert_eq!(initial_order(10, 4, &mut rng), order);
}

#[test]
fn test_initial_order_single_location() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert!(initial_order(1, 0, &mut rng).is_empty());
}

#[test]
fn test_coordinates_file_round_trip() {
    let path = temp_path("coordinates.csv");
    let locations = vec![
        Location::new(0, 12.3456, 7.0),
        Location::new(1, 99.9991, 0.0004),
    ];

    write_coordinates(&locations, &path).unwrap();
    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "12.346,7.000\n99.999,0.000\n");

    let loaded = read_coordinates(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[1].id, 1);
    assert_eq!(loaded[0].x, 12.346);
    assert_eq!(loaded[1].y, 0.0);
}

#[test]
fn test_read_coordinates_rejects_bad_rows() {
    let path = temp_path("bad_coordinates.csv");
    std::fs::write(&path, "1.0,2.0\n3.0\n").unwrap();

    let err = read_coordinates(&path).unwrap_err();
    std::fs::remove_file(&path).unwrap();

    assert!(err.to_string().contains("line 2"));
}
