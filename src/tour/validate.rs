use super::successors;
use super::walk_from_anchor;
use super::TourDefect;
use super::TourEdge;
use crate::basic_types::HashSet;

/// Confirms that `edges` form exactly one Hamiltonian cycle over the nodes `0..size`.
///
/// The checks run in order: there are `size` arcs, no arc repeats, every node is the source of
/// one arc and the target of one arc, and the walk from node 0 visits every node before closing.
/// The first broken invariant is returned.
pub fn validate_tour(size: usize, edges: &[TourEdge]) -> Result<(), TourDefect> {
    if edges.len() != size {
        return Err(TourDefect::EdgeCount {
            expected: size,
            found: edges.len(),
        });
    }

    let mut seen: HashSet<TourEdge> = HashSet::default();
    if let Some(duplicate) = edges.iter().find(|&&edge| !seen.insert(edge)) {
        return Err(TourDefect::DuplicateArc {
            origin: duplicate.source,
            destination: duplicate.target,
        });
    }

    let successors = successors(size, edges)?;
    let visited = walk_from_anchor(&successors).len() - 1;

    if visited != size {
        return Err(TourDefect::Subtour { visited, size });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(pairs: &[(usize, usize)]) -> Vec<TourEdge> {
        pairs
            .iter()
            .map(|&(source, target)| TourEdge::new(source, target))
            .collect()
    }

    #[test]
    fn accepts_hamiltonian_cycle() {
        assert_eq!(
            validate_tour(5, &edges(&[(0, 3), (3, 2), (2, 1), (1, 4), (4, 0)])),
            Ok(())
        );
        assert_eq!(validate_tour(2, &edges(&[(0, 1), (1, 0)])), Ok(()));
    }

    #[test]
    fn rejects_wrong_number_of_arcs() {
        assert_eq!(
            validate_tour(3, &edges(&[(0, 1), (1, 0)])),
            Err(TourDefect::EdgeCount {
                expected: 3,
                found: 2
            })
        );
    }

    #[test]
    fn rejects_duplicate_arc() {
        assert_eq!(
            validate_tour(3, &edges(&[(0, 1), (1, 2), (0, 1)])),
            Err(TourDefect::DuplicateArc {
                origin: 0,
                destination: 1
            })
        );
    }

    #[test]
    fn rejects_self_loop() {
        assert_eq!(
            validate_tour(3, &edges(&[(0, 1), (1, 0), (2, 2)])),
            Err(TourDefect::SelfLoop { node: 2 })
        );
    }

    #[test]
    fn rejects_out_of_range_node() {
        assert_eq!(
            validate_tour(2, &edges(&[(0, 1), (1, 5)])),
            Err(TourDefect::NodeOutOfRange {
                origin: 1,
                destination: 5,
                size: 2
            })
        );
    }

    #[test]
    fn rejects_node_with_two_predecessors() {
        assert_eq!(
            validate_tour(3, &edges(&[(0, 1), (2, 1), (1, 0)])),
            Err(TourDefect::InDegree { node: 1, degree: 2 })
        );
    }

    #[test]
    fn rejects_node_with_two_successors() {
        assert_eq!(
            validate_tour(3, &edges(&[(0, 1), (0, 2), (2, 0)])),
            Err(TourDefect::OutDegree { node: 0, degree: 2 })
        );
    }

    #[test]
    fn rejects_disconnected_subtours() {
        assert_eq!(
            validate_tour(5, &edges(&[(0, 1), (1, 0), (2, 3), (3, 4), (4, 2)])),
            Err(TourDefect::Subtour {
                visited: 2,
                size: 5
            })
        );
    }
}
