//! School Datasets
//!
//! This module loads and holds the read-only reference data:
//!
//! - **types**: Record types (SchoolRecord, StudentRecord, ActivityRecord, DistrictBoundary)
//! - **district**: The enumerated set of filterable districts
//! - **context**: The `Datasets` context shared by every consumer
//! - **loader**: CSV / XLSX / GeoJSON loading
//! - **xlsx**: Worksheet extraction from `.xlsx` workbooks
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use schooldash::dataset::{load_datasets, DataSources};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let datasets = load_datasets(&DataSources::in_dir("./data"))?;
//!     println!("{}", datasets.stats());
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod district;
pub mod error;
pub mod loader;
pub mod types;
pub mod xlsx;

#[cfg(test)]
pub(crate) mod fixtures;

pub use context::Datasets;
pub use district::{District, UnknownDistrict};
pub use error::{DatasetError, DatasetResult};
pub use loader::{
    load_activities, load_datasets, load_districts, load_schools, load_students, DataSources,
};
pub use types::{
    non_empty, ActivityRecord, DatasetStats, DistrictBoundaries, DistrictBoundary, SchoolRecord,
    StudentRecord,
};
