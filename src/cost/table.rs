use std::fmt::Write;

use dzn_rs::DataFile;
use dzn_rs::ShapedArray;
use rand::rngs::SmallRng;
use rand::Rng;
use rand::SeedableRng;
use thiserror::Error;

use super::CostLookup;
use super::CostLookupError;
use super::DepartureTime;
use super::Location;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("missing int parameter '{0}' in data")]
    MissingParameter(&'static str),
    #[error("'N' should be a non-negative integer, got {0}")]
    InvalidSize(i32),
    #[error("missing {size}x{size} int array '{name}' in data")]
    MissingArray { name: &'static str, size: usize },
}

/// A [`CostLookup`] backed by a precomputed table of travel times in seconds.
///
/// Tables are read from DZN data files with an int parameter `N` and a 2d int array `Dist`, where
/// `Dist[i, j]` is the travel time from location `i` to location `j`. The departure time does not
/// influence the costs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableLookup {
    size: usize,
    seconds: Vec<i32>,
}

impl TableLookup {
    pub fn from_dzn(data: &DataFile<i32>) -> Result<TableLookup, TableError> {
        let n: i32 = data
            .get("N")
            .copied()
            .ok_or(TableError::MissingParameter("N"))?;

        let size: usize = n.try_into().map_err(|_| TableError::InvalidSize(n))?;

        let dist = data
            .array_2d::<i32>("Dist", [size, size])
            .ok_or(TableError::MissingArray { name: "Dist", size })?;

        Ok(TableLookup {
            size,
            seconds: iterate(dist).collect(),
        })
    }

    /// Generate a table of asymmetric travel times between one minute and one hour.
    pub fn random(size: usize, seed: u64) -> TableLookup {
        let mut rng = SmallRng::seed_from_u64(seed);

        let seconds = (0..size * size)
            .map(|idx| {
                if idx / size == idx % size {
                    0
                } else {
                    rng.gen_range(60..=3600)
                }
            })
            .collect();

        TableLookup { size, seconds }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// One location per row of the table, labelled by its index.
    pub fn locations(&self) -> Vec<Location> {
        (0..self.size)
            .map(|index| Location::new(index, format!("node{index}")))
            .collect()
    }

    /// Render the table as DZN data which [`TableLookup::from_dzn`] accepts.
    pub fn to_dzn(&self) -> String {
        let mut dzn = format!("N = {};\nDist = [|", self.size);

        for (row_idx, row) in self.seconds.chunks(self.size.max(1)).enumerate() {
            if row_idx > 0 {
                dzn.push_str("\n  |");
            }
            for (col, value) in row.iter().enumerate() {
                let separator = if col == 0 { " " } else { ", " };
                let _ = write!(dzn, "{separator}{value}");
            }
        }

        dzn.push_str(" |];\n");
        dzn
    }
}

impl CostLookup for TableLookup {
    fn cost(
        &self,
        origin: &Location,
        destination: &Location,
        _departure: DepartureTime,
    ) -> Result<f64, CostLookupError> {
        let index = |location: &Location| {
            if location.index() < self.size {
                Ok(location.index())
            } else {
                Err(CostLookupError::InvalidCoordinate(
                    location.coordinate().to_owned(),
                ))
            }
        };

        let (row, col) = (index(origin)?, index(destination)?);
        Ok(f64::from(self.seconds[row * self.size + col]))
    }
}

/// Iterate over the elements in `array` in row-major order.
fn iterate(array: &ShapedArray<i32, 2>) -> impl Iterator<Item = i32> + '_ {
    let [n_rows, n_cols] = *array.shape();

    (0..n_rows).flat_map(move |row| {
        (0..n_cols).map(move |col| array.get([row, col]).copied().unwrap_or_default())
    })
}
