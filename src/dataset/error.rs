//! Dataset loader error types
//!
//! Every error here is fatal: the dashboard refuses to start with incomplete
//! reference data.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading the source datasets
#[derive(Error, Debug)]
pub enum DatasetError {
    /// Source file could not be opened or read
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing or row deserialization failed
    #[error("Malformed CSV {path:?}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// XLSX container or worksheet XML is unreadable
    #[error("Malformed spreadsheet: {0}")]
    Spreadsheet(String),

    /// GeoJSON document is not a usable FeatureCollection
    #[error("Malformed GeoJSON: {0}")]
    GeoJson(String),

    /// A required column is absent from a header row
    #[error("Missing column '{column}' in {path:?}")]
    MissingColumn { path: PathBuf, column: String },

    /// A cell could not be interpreted
    #[error("Invalid value in {path:?} row {row}: {message}")]
    InvalidValue {
        path: PathBuf,
        row: usize,
        message: String,
    },

    /// Unsupported file extension for a source
    #[error("Unsupported format for {0:?}")]
    UnsupportedFormat(PathBuf),
}

impl From<zip::result::ZipError> for DatasetError {
    fn from(err: zip::result::ZipError) -> Self {
        DatasetError::Spreadsheet(err.to_string())
    }
}

impl From<quick_xml::Error> for DatasetError {
    fn from(err: quick_xml::Error) -> Self {
        DatasetError::Spreadsheet(err.to_string())
    }
}

impl From<geojson::Error> for DatasetError {
    fn from(err: geojson::Error) -> Self {
        DatasetError::GeoJson(err.to_string())
    }
}

/// Result type alias for dataset operations
pub type DatasetResult<T> = Result<T, DatasetError>;
