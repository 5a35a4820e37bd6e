//! The Miller-Tucker-Zemlin (MTZ) formulation of the asymmetric travelling salesperson problem.
//!
//! # Model
//! ```text
//! x[i, j] in {0, 1}              for i != j in 0..n
//! u[i]    in {1, ..., n - 1}     for i in 1..n
//!
//! minimise  sum(c[i, j] * x[i, j])
//!
//! sum_j x[i, j] = 1              for every i       (out_i)
//! sum_i x[i, j] = 1              for every j       (in_j)
//! u[i] - u[j] + n * x[i, j] <= n - 1
//!                                for i != j in 1..n (mtz_i_j)
//! ```
//!
//! A cycle which avoids node 0 would need the ranks to strictly increase all the way around it,
//! which the MTZ constraints rule out. The tour through node 0 satisfies them by numbering the
//! nodes in visiting order. The formulation has O(n²) constraints.
//!
//! Self-arcs get no variable at all, so they cannot be selected regardless of the costs on the
//! diagonal.

mod variables;

use log::debug;
use thiserror::Error;

pub use variables::ArcVariables;
pub use variables::RankVariables;

use crate::cost::CostMatrix;
use crate::model::Comparison;
use crate::model::LinearConstraint;
use crate::model::Model;
use crate::tour_assert_moderate;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("cannot build a tour over {size} location(s); at least 2 are required")]
pub struct InfeasibleModelSize {
    pub size: usize,
}

/// Checks that a tour over `size` nodes is defined and that ranks `1..size` are representable.
pub fn ensure_tour_size(size: usize) -> Result<(), InfeasibleModelSize> {
    max_rank(size).map(|_| ())
}

fn max_rank(size: usize) -> Result<i32, InfeasibleModelSize> {
    if size < 2 {
        return Err(InfeasibleModelSize { size });
    }

    i32::try_from(size - 1).map_err(|_| InfeasibleModelSize { size })
}

/// The index set `{(i, j) : i != j, i, j in 1..size}` of the MTZ constraints, in lexicographic
/// order.
pub fn mtz_index_set(size: usize) -> impl Iterator<Item = (usize, usize)> {
    (1..size).flat_map(move |i| (1..size).filter(move |&j| j != i).map(move |j| (i, j)))
}

/// The MILP model of a tour over a [`CostMatrix`], together with the variable arenas needed to
/// interpret a solution.
#[derive(Clone, Debug)]
pub struct TspModel {
    model: Model,
    arcs: ArcVariables,
    ranks: RankVariables,
    size: usize,
}

impl TspModel {
    pub fn build(costs: &CostMatrix) -> Result<TspModel, InfeasibleModelSize> {
        let size = costs.size();
        let max_rank = max_rank(size)?;

        let mut model = Model::default();
        let arcs = ArcVariables::new(&mut model, size);
        let ranks = RankVariables::new(&mut model, size, max_rank);

        model.minimise(
            arcs.iter()
                .map(|(origin, destination, arc)| arc.scaled(costs.get(origin, destination))),
        );

        for node in 0..size {
            model.add_constraint(LinearConstraint::new(
                format!("out_{node}"),
                arcs.outgoing(node).map(|arc| arc.scaled(1.0)),
                Comparison::Equal,
                1.0,
            ));
        }

        for node in 0..size {
            model.add_constraint(LinearConstraint::new(
                format!("in_{node}"),
                arcs.incoming(node).map(|arc| arc.scaled(1.0)),
                Comparison::Equal,
                1.0,
            ));
        }

        let n = size as f64;
        // Row-major arcs between non-anchor nodes enumerate `mtz_index_set` in order.
        for (i, j, arc) in arcs.iter().filter(|&(i, j, _)| i != 0 && j != 0) {
            model.add_constraint(LinearConstraint::new(
                format!("mtz_{i}_{j}"),
                [ranks[i].scaled(1.0), ranks[j].scaled(-1.0), arc.scaled(n)],
                Comparison::LessOrEqual,
                n - 1.0,
            ));
        }

        tour_assert_moderate!(model.num_variables() == arcs.len() + size - 1);
        tour_assert_moderate!(model.num_constraints() == 2 * size + (size - 1) * (size - 2));

        debug!(
            "Built MTZ model over {size} nodes with {} variables and {} constraints",
            model.num_variables(),
            model.num_constraints()
        );

        Ok(TspModel {
            model,
            arcs,
            ranks,
            size,
        })
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn arcs(&self) -> &ArcVariables {
        &self.arcs
    }

    pub fn ranks(&self) -> &RankVariables {
        &self.ranks
    }

    /// The number of nodes in the tour.
    pub fn size(&self) -> usize {
        self.size
    }
}
