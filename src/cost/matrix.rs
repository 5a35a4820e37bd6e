use log::debug;
use thiserror::Error;

use super::CostLookup;
use super::CostLookupError;
use super::DepartureTime;
use super::Location;
use crate::tour_assert_eq_simple;

/// The smallest cost placed on the diagonal of a [`CostMatrix`].
pub const SELF_LOOP_SENTINEL: f64 = 1e12;

#[derive(Clone, Debug, Error, PartialEq)]
pub enum CostMatrixError {
    #[error("cost from location {origin} to location {destination} is unavailable: {source}")]
    CostUnavailable {
        origin: usize,
        destination: usize,
        source: CostLookupError,
    },
    #[error("row {row} has {len} entries, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },
}

/// A dense n×n matrix of travel costs stored in row-major order, where row `i` holds the costs of
/// leaving location `i`.
///
/// Off-diagonal entries need not be symmetric. The diagonal holds a sentinel which exceeds the
/// cost of any tour over the matrix, so a self-loop can never be part of an optimal tour.
///
/// The matrix is immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct CostMatrix {
    costs: Box<[f64]>,
    size: usize,
    sentinel: f64,
}

impl CostMatrix {
    /// Queries `lookup` for every ordered pair of distinct locations, all with the same
    /// `departure`.
    ///
    /// The first failing lookup aborts the build; no cost is ever substituted.
    pub fn build(
        locations: &[Location],
        lookup: &impl CostLookup,
        departure: DepartureTime,
    ) -> Result<CostMatrix, CostMatrixError> {
        debug!(
            "Requesting {} travel costs departing at {}",
            locations.len() * locations.len().saturating_sub(1),
            departure.as_unix_seconds()
        );

        CostMatrix::from_fn(locations.len(), |origin, destination| {
            lookup.cost(&locations[origin], &locations[destination], departure)
        })
    }

    /// Creates a matrix from explicit rows. The diagonal entries of `rows` are ignored.
    pub fn from_rows<Row: AsRef<[f64]>>(rows: &[Row]) -> Result<CostMatrix, CostMatrixError> {
        let size = rows.len();

        if let Some((row, len)) = rows
            .iter()
            .map(|row| row.as_ref().len())
            .enumerate()
            .find(|&(_, len)| len != size)
        {
            return Err(CostMatrixError::NotSquare {
                row,
                len,
                expected: size,
            });
        }

        CostMatrix::from_fn(size, |origin, destination| {
            Ok(rows[origin].as_ref()[destination])
        })
    }

    /// Creates a matrix by evaluating `cost` for every ordered pair of distinct indices, in
    /// row-major order.
    pub fn from_fn(
        size: usize,
        mut cost: impl FnMut(usize, usize) -> Result<f64, CostLookupError>,
    ) -> Result<CostMatrix, CostMatrixError> {
        let mut costs = vec![0.0; size * size];
        let mut max_cost: f64 = 0.0;

        for origin in 0..size {
            for destination in (0..size).filter(|&destination| destination != origin) {
                let value = cost(origin, destination)
                    .and_then(check_cost)
                    .map_err(|source| CostMatrixError::CostUnavailable {
                        origin,
                        destination,
                        source,
                    })?;

                max_cost = max_cost.max(value);
                costs[origin * size + destination] = value;
            }
        }

        let sentinel = sentinel_for(size, max_cost);
        for node in 0..size {
            costs[node * size + node] = sentinel;
        }

        tour_assert_eq_simple!(costs.len(), size * size);

        Ok(CostMatrix {
            costs: costs.into_boxed_slice(),
            size,
            sentinel,
        })
    }

    /// Returns the cost of travelling from `origin` to `destination`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, origin: usize, destination: usize) -> f64 {
        assert!(origin < self.size && destination < self.size);
        self.costs[origin * self.size + destination]
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// The value stored on the diagonal.
    pub fn sentinel(&self) -> f64 {
        self.sentinel
    }

    /// The largest cost between two distinct locations, or `0.0` for fewer than two locations.
    pub fn max_off_diagonal(&self) -> f64 {
        self.off_diagonal()
            .map(|(_, _, cost)| cost)
            .fold(0.0, f64::max)
    }

    /// Iterate over `(origin, destination, cost)` for every ordered pair of distinct locations.
    pub fn off_diagonal(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        (0..self.size).flat_map(move |origin| {
            (0..self.size)
                .filter(move |&destination| destination != origin)
                .map(move |destination| (origin, destination, self.get(origin, destination)))
        })
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tolerance: f64) -> bool {
        self.off_diagonal().all(|(origin, destination, cost)| {
            (cost - self.get(destination, origin)).abs() <= tolerance
        })
    }
}

fn check_cost(value: f64) -> Result<f64, CostLookupError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(CostLookupError::InvalidValue(value))
    }
}

/// A tour uses `size` arcs, so any value above `size * max_cost` dominates every tour.
fn sentinel_for(size: usize, max_cost: f64) -> f64 {
    SELF_LOOP_SENTINEL.max(10.0 * size as f64 * max_cost)
}
