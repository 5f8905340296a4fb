use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::dataset::Coord;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
pub enum SoilIndexError {
    /// The soil data file could not be opened.
    ///
    /// Fatal to initialization: no soil data means the consumer cannot
    /// proceed with this dataset.
    #[error("soil data file not found: {}", .path.display())]
    DatasetNotFound {
        /// The path that could not be opened.
        path: PathBuf,
        /// The underlying open failure.
        #[source]
        source: io::Error,
    },

    /// A data row did not match the active schema.
    ///
    /// Aborts the load; a silently incomplete dataset is worse than a hard
    /// failure for the model consuming it.
    #[error("malformed soil record at line {line}: {message}")]
    MalformedRecord {
        /// 1-based line number within the source table.
        line: usize,
        /// What was wrong with the row.
        message: String,
    },

    /// Loading retained zero rows, either because the table held none or
    /// because a restriction set matched nothing.
    #[error("soil dataset contains no usable rows")]
    EmptyDataset,

    /// A spatial index cannot be built over zero points.
    #[error("cannot build a spatial index over zero points")]
    EmptyIndex,

    /// The nearest known coordinate lies farther away than the caller's
    /// search radius.
    ///
    /// An ordinary, recoverable per-query condition: the caller may retry
    /// with a larger radius or treat the location as unsupported.
    #[error("no available soil data within {radius} degrees of {query}")]
    NoDataInRange {
        /// The unmatched query location.
        query: Coord,
        /// The radius that was tried, in degrees.
        radius: f64,
    },

    /// Reading the soil data failed after the file was opened.
    #[error("failed to read soil data: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, SoilIndexError>;
