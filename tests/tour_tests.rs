//! Unit tests for tours and cycle cost evaluation.

use proptest::prelude::*;
use tabu_delivery::error::{DimensionMismatch, TabuError};
use tabu_delivery::matrix::CostMatrix;
use tabu_delivery::tour::{arrival_times, evaluate, return_time, Tour};

/// Four locations on the corners of a square with side 1 and diagonals 2.
fn create_square_matrix() -> CostMatrix {
    CostMatrix::new(vec![
        vec![0.0, 1.0, 2.0, 1.0],
        vec![1.0, 0.0, 1.0, 2.0],
        vec![2.0, 1.0, 0.0, 1.0],
        vec![1.0, 2.0, 1.0, 0.0],
    ])
    .unwrap()
}

#[test]
fn test_evaluate_closed_cycle() {
    let matrix = create_square_matrix();

    // Perimeter: 0 -> 1 -> 2 -> 3 -> 0
    assert_eq!(evaluate(&[0, 1, 2, 3], &matrix).unwrap(), 4.0);

    // Crossing both diagonals: 0 -> 2 -> 1 -> 3 -> 0
    assert_eq!(evaluate(&[0, 2, 1, 3], &matrix).unwrap(), 6.0);
}

#[test]
fn test_evaluate_includes_closing_edge() {
    let matrix = CostMatrix::new(vec![
        vec![0.0, 1.0, 7.0],
        vec![1.0, 0.0, 2.0],
        vec![7.0, 2.0, 0.0],
    ])
    .unwrap();

    // 0 -> 1 (1) -> 2 (2) -> back to 0 (7)
    assert_eq!(evaluate(&[0, 1, 2], &matrix).unwrap(), 10.0);
}

#[test]
fn test_evaluate_single_location_is_zero() {
    let matrix = CostMatrix::new(vec![vec![0.0]]).unwrap();
    assert_eq!(evaluate(&[0], &matrix).unwrap(), 0.0);
}

#[test]
fn test_evaluate_two_locations() {
    let matrix = CostMatrix::new(vec![vec![0.0, 5.0], vec![5.0, 0.0]]).unwrap();
    assert_eq!(evaluate(&[0, 1], &matrix).unwrap(), 10.0);
}

#[test]
fn test_evaluate_reads_ordered_pairs() {
    // Asymmetric costs must not crash; each direction is read as given.
    let matrix = CostMatrix::new(vec![
        vec![0.0, 1.0, 10.0],
        vec![10.0, 0.0, 1.0],
        vec![1.0, 10.0, 0.0],
    ])
    .unwrap();

    assert_eq!(evaluate(&[0, 1, 2], &matrix).unwrap(), 3.0);
    assert_eq!(evaluate(&[0, 2, 1], &matrix).unwrap(), 30.0);
}

#[test]
fn test_evaluate_length_mismatch() {
    let matrix = create_square_matrix();

    let err = evaluate(&[0, 1, 2], &matrix).unwrap_err();
    assert_eq!(
        err,
        TabuError::DimensionMismatch(DimensionMismatch::Length {
            tour_len: 3,
            matrix_size: 4
        })
    );
    assert!(err.is_dimension_mismatch());
}

#[test]
fn test_evaluate_index_out_of_range() {
    let matrix = create_square_matrix();

    let err = evaluate(&[0, 1, 2, 4], &matrix).unwrap_err();
    assert_eq!(
        err,
        TabuError::DimensionMismatch(DimensionMismatch::IndexOutOfRange {
            index: 4,
            matrix_size: 4
        })
    );
}

#[test]
fn test_tour_swapped_leaves_original() {
    let tour = Tour::new(vec![0, 1, 2, 3]);
    let swapped = tour.swapped(1, 3);

    assert_eq!(swapped.as_slice(), &[0, 3, 2, 1]);
    assert_eq!(tour.as_slice(), &[0, 1, 2, 3]);
}

#[test]
fn test_tour_from_start_and_closed() {
    let tour = Tour::from_start(2, &[0, 3, 1]);

    assert_eq!(tour.start(), Some(2));
    assert_eq!(tour.len(), 4);
    assert_eq!(tour.closed(), vec![2, 0, 3, 1, 2]);
    assert_eq!(tour.to_string(), "2 -> 0 -> 3 -> 1 -> 2");
}

#[test]
fn test_arrival_times() {
    let matrix = create_square_matrix();
    let tour = [0, 1, 3, 2];

    // Legs: 0->1 (1), 1->3 (2), 3->2 (1); return 2->0 (2)
    let times = arrival_times(&tour, &matrix).unwrap();
    assert_eq!(times, vec![0.0, 1.0, 3.0, 4.0]);
    assert_eq!(return_time(&tour, &matrix).unwrap(), 6.0);
}

#[test]
fn test_arrival_times_dimension_mismatch() {
    let matrix = create_square_matrix();
    assert!(arrival_times(&[0, 1], &matrix).is_err());
}

/// A random symmetric matrix and a random permutation of its indices.
fn symmetric_instance() -> impl Strategy<Value = (CostMatrix, Vec<usize>)> {
    (1usize..9).prop_flat_map(|n| {
        (
            prop::collection::vec(0.0f64..100.0, n * n),
            Just((0..n).collect::<Vec<usize>>()).prop_shuffle(),
        )
            .prop_map(move |(values, tour)| {
                let mut rows = vec![vec![0.0; n]; n];
                for i in 0..n {
                    for j in (i + 1)..n {
                        rows[i][j] = values[i * n + j];
                        rows[j][i] = values[i * n + j];
                    }
                }
                (CostMatrix::new(rows).unwrap(), tour)
            })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_reversed_tour_has_same_cost((matrix, order) in symmetric_instance()) {
        let tour = Tour::new(order);
        let forward = evaluate(tour.as_slice(), &matrix).unwrap();
        let backward = evaluate(tour.reversed().as_slice(), &matrix).unwrap();

        prop_assert!(
            (forward - backward).abs() < 1e-9,
            "forward {} != backward {}",
            forward,
            backward
        );
    }

    #[test]
    fn prop_last_arrival_plus_closing_edge_is_cost((matrix, order) in symmetric_instance()) {
        let times = arrival_times(&order, &matrix).unwrap();
        let cost = evaluate(&order, &matrix).unwrap();
        let closing = if order.len() > 1 {
            matrix.get(order[order.len() - 1], order[0])
        } else {
            0.0
        };

        prop_assert!((times[times.len() - 1] + closing - cost).abs() < 1e-9);
    }
}
