use super::successors;
use super::walk_from_anchor;
use super::TourDefect;
use super::TourEdge;
use crate::formulation::TspModel;
use crate::solver::Solution;
use crate::tour_assert_simple;

/// Arc variables with a value above this threshold are considered selected, which absorbs the
/// rounding noise of a floating-point solver.
pub const SELECTION_THRESHOLD: f64 = 0.5;

/// The tour read from a solution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedTour {
    /// The nodes in visiting order, starting and ending at node 0.
    pub order: Vec<usize>,
    /// The selected arcs, sorted by source.
    pub edges: Vec<TourEdge>,
}

/// Collects the arcs selected in `solution` and walks them from node 0.
///
/// Fails if the solution does not assign exactly one value per model variable, or if some node
/// does not have exactly one selected outgoing and one selected incoming arc. Either can only
/// happen when the model or the solver is broken, so the defect is reported rather than repaired.
/// Whether the walk covers every node is left to [`super::validate_tour`].
pub fn extract_tour(
    formulation: &TspModel,
    solution: &Solution,
) -> Result<ExtractedTour, TourDefect> {
    let expected = formulation.model().num_variables();
    if solution.values().len() != expected {
        return Err(TourDefect::AssignmentLength {
            expected,
            found: solution.values().len(),
        });
    }

    let edges: Vec<TourEdge> = formulation
        .arcs()
        .iter()
        .filter(|&(_, _, arc)| solution.value(arc) > SELECTION_THRESHOLD)
        .map(|(source, target, _)| TourEdge::new(source, target))
        .collect();

    let successors = successors(formulation.size(), &edges)?;
    let order = walk_from_anchor(&successors);

    tour_assert_simple!(order.len() <= formulation.size() + 1);

    Ok(ExtractedTour { order, edges })
}
