//! Turning a solved model into a tour, and checking that it really is one.

mod extract;
mod validate;

use std::fmt::Display;
use std::fmt::Formatter;

use thiserror::Error;

pub use extract::extract_tour;
pub use extract::ExtractedTour;
pub use extract::SELECTION_THRESHOLD;
pub use validate::validate_tour;

/// A directed arc of a tour, from `source` to `target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TourEdge {
    pub source: usize,
    pub target: usize,
}

impl TourEdge {
    pub fn new(source: usize, target: usize) -> Self {
        TourEdge { source, target }
    }
}

impl Display for TourEdge {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// The invariant of a Hamiltonian cycle which a set of arcs breaks.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TourDefect {
    #[error("the solution assigns {found} values to a model with {expected} variables")]
    AssignmentLength { expected: usize, found: usize },
    #[error("expected {expected} selected arcs, found {found}")]
    EdgeCount { expected: usize, found: usize },
    #[error("arc {origin} -> {destination} references a node outside 0..{size}")]
    NodeOutOfRange {
        origin: usize,
        destination: usize,
        size: usize,
    },
    #[error("node {node} is connected to itself")]
    SelfLoop { node: usize },
    #[error("arc {origin} -> {destination} is selected more than once")]
    DuplicateArc { origin: usize, destination: usize },
    #[error("node {node} has out-degree {degree}")]
    OutDegree { node: usize, degree: usize },
    #[error("node {node} has in-degree {degree}")]
    InDegree { node: usize, degree: usize },
    #[error("the cycle through node 0 closes after {visited} of {size} nodes")]
    Subtour { visited: usize, size: usize },
}

/// Checks that `edges` give every node in `0..size` exactly one successor and one predecessor,
/// and returns the successor of each node.
pub(crate) fn successors(size: usize, edges: &[TourEdge]) -> Result<Vec<usize>, TourDefect> {
    let mut successors = vec![None; size];
    let mut out_degree = vec![0_usize; size];
    let mut in_degree = vec![0_usize; size];

    for edge in edges {
        if edge.source >= size || edge.target >= size {
            return Err(TourDefect::NodeOutOfRange {
                origin: edge.source,
                destination: edge.target,
                size,
            });
        }
        if edge.source == edge.target {
            return Err(TourDefect::SelfLoop { node: edge.source });
        }

        successors[edge.source] = Some(edge.target);
        out_degree[edge.source] += 1;
        in_degree[edge.target] += 1;
    }

    for node in 0..size {
        if out_degree[node] != 1 {
            return Err(TourDefect::OutDegree {
                node,
                degree: out_degree[node],
            });
        }
        if in_degree[node] != 1 {
            return Err(TourDefect::InDegree {
                node,
                degree: in_degree[node],
            });
        }
    }

    Ok(successors.into_iter().flatten().collect())
}

/// Follows `successors` from node 0 until it returns to node 0, or until more nodes were visited
/// than exist. The result starts and ends with 0.
pub(crate) fn walk_from_anchor(successors: &[usize]) -> Vec<usize> {
    let mut order = vec![0];
    let mut node = successors.first().copied().unwrap_or(0);

    while node != 0 && order.len() <= successors.len() {
        order.push(node);
        node = successors[node];
    }

    order.push(0);
    order
}
