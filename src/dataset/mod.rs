//! Soil dataset loading and nearest-coordinate resolution.
//!
//! A [`SoilDataset`] maps grid-cell coordinates to soil property records and
//! answers "which known coordinate, if any, is within tolerance of this
//! query location" through a k-d tree built once over the coordinate set.

mod coord;
mod parser;

pub use coord::Coord;
pub use parser::{MineralSoil, SoilRecord, SoilSchema};

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use crate::error::{Result, SoilIndexError};
use crate::kdtree::{KdTree, KdTreeBuilder};

/// Configures and performs the loading of a soil table.
///
/// Carries the active [`SoilSchema`] and, optionally, a restriction set of
/// coordinates of interest for callers that already know which grid cells
/// they need.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    schema: SoilSchema,
    restrict: Option<BTreeSet<Coord>>,
}

impl DatasetLoader {
    /// A loader for the given schema that retains every parsed row.
    pub fn new(schema: SoilSchema) -> Self {
        Self {
            schema,
            restrict: None,
        }
    }

    /// Keep only rows whose coordinate belongs to `coords`.
    ///
    /// The filter is applied per row during parsing, so records outside the
    /// set are never materialized; on a global table this keeps memory
    /// proportional to the simulated grid, not the dataset.
    pub fn restrict_to(mut self, coords: BTreeSet<Coord>) -> Self {
        self.restrict = Some(coords);
        self
    }

    fn retains(&self, coord: &Coord) -> bool {
        self.restrict.as_ref().map_or(true, |set| set.contains(coord))
    }

    /// Load a soil table from a file path.
    ///
    /// Fails with [`SoilIndexError::DatasetNotFound`] when the path cannot
    /// be opened, keeping "file missing" distinct from "file malformed" and
    /// from "coordinate not covered".
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<SoilDataset> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "loading soil data");

        let file = File::open(path).map_err(|source| SoilIndexError::DatasetNotFound {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_reader(BufReader::new(file))
    }

    /// Load a soil table from an already-open reader.
    ///
    /// The first line is the column header and is skipped; every following
    /// non-blank line must be a data row under the active schema, or the
    /// whole load fails with [`SoilIndexError::MalformedRecord`]. When the
    /// same coordinate appears on several rows, the last row wins. Fails
    /// with [`SoilIndexError::EmptyDataset`] when no rows were retained; on
    /// success the spatial index is already built and the dataset is ready
    /// for queries.
    pub fn load_reader<R: BufRead>(&self, reader: R) -> Result<SoilDataset> {
        let mut records = BTreeMap::new();

        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            if number == 0 {
                // header
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }

            let (coord, record) = parser::parse_row(self.schema, &line, number + 1)?;
            if !self.retains(&coord) {
                continue;
            }
            records.insert(coord, record);
        }

        if records.is_empty() {
            return Err(SoilIndexError::EmptyDataset);
        }

        let mut builder = KdTreeBuilder::new(records.len());
        for coord in records.keys() {
            builder.add(coord.to_point());
        }
        let index = builder.finish()?;

        tracing::info!(coordinates = records.len(), "built soil dataset");
        Ok(SoilDataset { records, index })
    }
}

/// A loaded soil property table and the spatial index over its coordinates.
///
/// Constructed in one shot by a [`DatasetLoader`]; afterwards the record map
/// and the index are logically immutable, so a dataset can be queried from
/// multiple threads without locking.
#[derive(Debug, Clone)]
pub struct SoilDataset {
    records: BTreeMap<Coord, SoilRecord>,
    index: KdTree<f64, 2>,
}

impl SoilDataset {
    /// Load a dataset from a file path, retaining every row.
    ///
    /// See [`DatasetLoader`] for restriction-set loading.
    pub fn from_path<P: AsRef<Path>>(path: P, schema: SoilSchema) -> Result<Self> {
        DatasetLoader::new(schema).load_path(path)
    }

    /// Load a dataset from an already-open reader, retaining every row.
    pub fn from_reader<R: Read>(reader: R, schema: SoilSchema) -> Result<Self> {
        DatasetLoader::new(schema).load_reader(BufReader::new(reader))
    }

    /// Resolve `query` to the nearest coordinate that has data, subject to
    /// the caller's maximum search radius in degrees.
    ///
    /// Fails with [`SoilIndexError::NoDataInRange`], naming the query and
    /// the radius tried, when the nearest known coordinate lies farther
    /// than `max_radius`. That is an expected, recoverable outcome at e.g.
    /// ocean cells, not a dataset defect: retrying the same query with a
    /// larger radius can succeed.
    pub fn find_closest_point(&self, max_radius: f64, query: Coord) -> Result<Coord> {
        debug_assert!(max_radius > 0.0);

        let neighbor = self.index.nearest(&query.to_point());
        if neighbor.dist_sq <= max_radius * max_radius {
            Ok(Coord::from(neighbor.point))
        } else {
            Err(SoilIndexError::NoDataInRange {
                query,
                radius: max_radius,
            })
        }
    }

    /// The record stored for `coord`, or `None` when the coordinate is not
    /// in the dataset.
    ///
    /// Callers are expected to pass coordinates previously returned by
    /// [`find_closest_point`][SoilDataset::find_closest_point].
    pub fn record_for(&self, coord: &Coord) -> Option<&SoilRecord> {
        self.records.get(coord)
    }

    /// The number of coordinates in the dataset.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset holds no coordinates. Never true for a dataset
    /// that loaded successfully.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All coordinates with data, in lexicographic order.
    pub fn coords(&self) -> impl Iterator<Item = &Coord> {
        self.records.keys()
    }

    /// All coordinate/record pairs, in lexicographic coordinate order.
    pub fn records(&self) -> impl Iterator<Item = (&Coord, &SoilRecord)> {
        self.records.iter()
    }
}
