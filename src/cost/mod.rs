//! Pairwise travel costs between locations.
//!
//! Travel times come from an external collaborator, modelled by the [`CostLookup`] trait. The
//! [`CostMatrix`] asks it for every ordered pair of locations exactly once, using one departure
//! time for all pairs.

mod matrix;
mod table;

use std::fmt::Display;
use std::fmt::Formatter;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use thiserror::Error;

pub use matrix::CostMatrix;
pub use matrix::CostMatrixError;
pub use matrix::SELF_LOOP_SENTINEL;
pub use table::TableError;
pub use table::TableLookup;

/// A location to visit. The planner only relies on the index; the coordinate is passed through to
/// the [`CostLookup`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Location {
    index: usize,
    coordinate: String,
}

impl Location {
    pub fn new(index: usize, coordinate: impl Into<String>) -> Self {
        Location {
            index,
            coordinate: coordinate.into(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The coordinate string handed to the cost lookup, e.g. `"50.8503,4.3517"`.
    pub fn coordinate(&self) -> &str {
        &self.coordinate
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.index, self.coordinate)
    }
}

/// The moment of departure used for every cost lookup, in seconds since the Unix epoch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DepartureTime(u64);

impl DepartureTime {
    pub fn from_unix_seconds(seconds: u64) -> Self {
        DepartureTime(seconds)
    }

    pub fn now() -> Self {
        let seconds = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0);

        DepartureTime(seconds)
    }

    pub fn as_unix_seconds(&self) -> u64 {
        self.0
    }
}

/// The ways in which an external cost lookup can fail.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CostLookupError {
    #[error("network error: {0}")]
    Network(String),
    #[error("lookup quota exceeded")]
    QuotaExceeded,
    #[error("invalid coordinate '{0}'")]
    InvalidCoordinate(String),
    #[error("travel cost {0} is not a non-negative finite number")]
    InvalidValue(f64),
}

/// Produces the travel cost (in seconds, or any other non-negative unit) from `origin` to
/// `destination` when leaving at `departure`.
///
/// Costs may be asymmetric. Implemented for closures with the same signature.
pub trait CostLookup {
    fn cost(
        &self,
        origin: &Location,
        destination: &Location,
        departure: DepartureTime,
    ) -> Result<f64, CostLookupError>;
}

impl<F> CostLookup for F
where
    F: Fn(&Location, &Location, DepartureTime) -> Result<f64, CostLookupError>,
{
    fn cost(
        &self,
        origin: &Location,
        destination: &Location,
        departure: DepartureTime,
    ) -> Result<f64, CostLookupError> {
        self(origin, destination, departure)
    }
}
