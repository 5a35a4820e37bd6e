#![cfg(test)]
//! Properties of the optimal tour over randomly generated cost matrices.

use proptest::collection::vec;
use proptest::prelude::*;

use super::test_helper::brute_force_optimum;
use super::test_helper::milp_planner;
use super::test_helper::undirected;
use crate::cost::CostMatrix;
use crate::tour::validate_tour;
use crate::tour::TourEdge;

fn asymmetric_rows() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (2_usize..=6)
        .prop_flat_map(|n| vec(vec(1_u32..100, n), n))
        .prop_map(|rows| {
            rows.into_iter()
                .map(|row| row.into_iter().map(f64::from).collect())
                .collect()
        })
}

fn symmetric_rows() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (3_usize..=6)
        .prop_flat_map(|n| (Just(n), vec(1_u32..100, n * n)))
        .prop_map(|(n, raw)| {
            (0..n)
                .map(|i| {
                    (0..n)
                        .map(|j| f64::from(raw[i.min(j) * n + i.max(j)]))
                        .collect()
                })
                .collect()
        })
}

/// Symmetric costs where the cycle `0 -> order[0] -> ... -> 0` costs 1 per arc and every other arc
/// costs at least 10, so the optimal tour is that cycle in one of its two directions.
fn planted_cycle_rows() -> impl Strategy<Value = Vec<Vec<f64>>> {
    (3_usize..=6)
        .prop_flat_map(|n| {
            (
                Just(n),
                Just((1..n).collect::<Vec<_>>()).prop_shuffle(),
                vec(0_u32..5, n * n),
            )
        })
        .prop_map(|(n, order, noise)| {
            let mut rows: Vec<Vec<f64>> = (0..n)
                .map(|i| {
                    (0..n)
                        .map(|j| 10.0 + f64::from(noise[i.min(j) * n + i.max(j)]))
                        .collect()
                })
                .collect();

            let cycle: Vec<usize> = std::iter::once(0).chain(order).collect();
            for (idx, &node) in cycle.iter().enumerate() {
                let next = cycle[(idx + 1) % n];
                rows[node][next] = 1.0;
                rows[next][node] = 1.0;
            }
            rows
        })
}

/// Renames node `k` to `(k + n - shift) % n`, so the old node `shift` becomes the anchor.
fn relabelled(rows: &[Vec<f64>], shift: usize) -> Vec<Vec<f64>> {
    let n = rows.len();

    (0..n)
        .map(|i| (0..n).map(|j| rows[(i + shift) % n][(j + shift) % n]).collect())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn optimal_tour_has_unit_degrees_and_minimum_cost(rows in asymmetric_rows()) {
        let costs = CostMatrix::from_rows(&rows).expect("square matrix");
        let n = costs.size();

        let tour = milp_planner().plan_with_costs(&costs).expect("a tour exists");

        for node in 0..n {
            prop_assert_eq!(tour.edges.iter().filter(|edge| edge.source == node).count(), 1);
            prop_assert_eq!(tour.edges.iter().filter(|edge| edge.target == node).count(), 1);
        }
        prop_assert_eq!(validate_tour(n, &tour.edges), Ok(()));
        prop_assert_eq!(tour.order.len(), n + 1);
        prop_assert!((tour.total_cost - brute_force_optimum(&costs)).abs() < 1e-6);
    }

    #[test]
    fn relabelling_the_anchor_keeps_the_optimal_cost(rows in symmetric_rows(), shift in 1_usize..6) {
        let shift = shift % rows.len();
        let original = CostMatrix::from_rows(&rows).expect("square matrix");
        let shifted = CostMatrix::from_rows(&relabelled(&rows, shift)).expect("square matrix");
        prop_assert!(original.is_symmetric(0.0));

        let planner = milp_planner();
        let original_tour = planner.plan_with_costs(&original).expect("a tour exists");
        let shifted_tour = planner.plan_with_costs(&shifted).expect("a tour exists");

        prop_assert!((original_tour.total_cost - shifted_tour.total_cost).abs() < 1e-6);
    }

    #[test]
    fn relabelling_the_anchor_traverses_the_same_cycle(
        rows in planted_cycle_rows(),
        shift in 1_usize..6,
    ) {
        let n = rows.len();
        let shift = shift % n;

        let planner = milp_planner();
        let original_tour = planner
            .plan_with_costs(&CostMatrix::from_rows(&rows).expect("square matrix"))
            .expect("a tour exists");
        let shifted_tour = planner
            .plan_with_costs(&CostMatrix::from_rows(&relabelled(&rows, shift)).expect("square matrix"))
            .expect("a tour exists");

        let shifted_back = shifted_tour.edges.iter().map(|edge| {
            TourEdge::new((edge.source + shift) % n, (edge.target + shift) % n)
        });

        prop_assert_eq!(undirected(shifted_back), undirected(original_tour.edges.iter().copied()));
        prop_assert_eq!(shifted_tour.order.first(), Some(&0));
        prop_assert!((original_tour.total_cost - n as f64).abs() < 1e-6);
    }

    #[test]
    fn self_loops_are_never_selected(n in 3_usize..=6, cost in 0_u32..3) {
        let costs = CostMatrix::from_fn(n, |_, _| Ok(f64::from(cost))).expect("valid costs");
        prop_assert!(costs.sentinel() > n as f64 * costs.max_off_diagonal());

        let tour = milp_planner().plan_with_costs(&costs).expect("a tour exists");

        prop_assert!(tour.edges.iter().all(|edge| edge.source != edge.target));
        prop_assert_eq!(validate_tour(n, &tour.edges), Ok(()));
        prop_assert!((tour.total_cost - n as f64 * f64::from(cost)).abs() < 1e-6);
    }
}
