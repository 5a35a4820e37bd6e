use std::ops::Index;

use crate::model::Model;
use crate::model::VariableId;

/// The arc variables `x[i, j]` for every ordered pair of distinct nodes, stored in an n×n arena
/// indexed by `i * n + j`. The diagonal has no variables.
#[derive(Clone, Debug)]
pub struct ArcVariables {
    variables: Box<[Option<VariableId>]>,
    size: usize,
}

impl ArcVariables {
    pub(crate) fn new(model: &mut Model, size: usize) -> Self {
        let variables = (0..size * size)
            .map(|idx| {
                let (origin, destination) = (idx / size, idx % size);
                (origin != destination)
                    .then(|| model.new_binary_variable(format!("x_{origin}_{destination}")))
            })
            .collect();

        ArcVariables { variables, size }
    }

    /// The variable for the arc `origin -> destination`, or `None` for a self-arc.
    pub fn get(&self, origin: usize, destination: usize) -> Option<VariableId> {
        self.variables[origin * self.size + destination]
    }

    pub fn len(&self) -> usize {
        self.size * self.size.saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over `(origin, destination, variable)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, VariableId)> + '_ {
        self.variables
            .iter()
            .enumerate()
            .filter_map(move |(idx, variable)| {
                variable.map(|variable| (idx / self.size, idx % self.size, variable))
            })
    }

    /// The variables of the arcs leaving `origin`.
    pub fn outgoing(&self, origin: usize) -> impl Iterator<Item = VariableId> + '_ {
        (0..self.size).filter_map(move |destination| self.get(origin, destination))
    }

    /// The variables of the arcs entering `destination`.
    pub fn incoming(&self, destination: usize) -> impl Iterator<Item = VariableId> + '_ {
        (0..self.size).filter_map(move |origin| self.get(origin, destination))
    }
}

/// The rank variables `u[i]` for nodes `1..n`. Node 0 anchors the tour and has no rank variable.
#[derive(Clone, Debug)]
pub struct RankVariables {
    variables: Box<[VariableId]>,
}

impl RankVariables {
    /// Creates `u[i]` in `[1, max_rank]` for every node except 0.
    pub(crate) fn new(model: &mut Model, size: usize, max_rank: i32) -> Self {
        let variables = (1..size)
            .map(|node| model.new_integer_variable(format!("u_{node}"), 1, max_rank))
            .collect();

        RankVariables { variables }
    }

    pub fn get(&self, node: usize) -> Option<VariableId> {
        node.checked_sub(1)
            .and_then(|idx| self.variables.get(idx))
            .copied()
    }
}

impl Index<usize> for RankVariables {
    type Output = VariableId;

    /// # Panics
    ///
    /// Panics for node 0 and for nodes outside the tour.
    fn index(&self, node: usize) -> &VariableId {
        &self.variables[node - 1]
    }
}
