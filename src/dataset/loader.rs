//! Dataset Loader
//!
//! Reads the four source files into memory once at startup:
//!
//! - schools: CSV, one row per school
//! - students: XLSX workbook (or CSV export of it)
//! - activities: CSV, one row per (school, activity)
//! - districts: GeoJSON FeatureCollection keyed by `properties.name`
//!
//! Any missing or malformed source aborts the load.

use csv::ReaderBuilder;
use geojson::{GeoJson, JsonValue};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::path::{Path, PathBuf};

use super::context::Datasets;
use super::district::District;
use super::error::{DatasetError, DatasetResult};
use super::types::{
    ActivityRecord, DistrictBoundaries, DistrictBoundary, SchoolRecord, StudentRecord,
};
use super::xlsx;

const SCHOOL_COLUMNS: &[&str] = &["BSN", "NAME", "Bezirk", "Schultyp", "Traeger"];
const STUDENT_COLUMNS: &[&str] = &["Bezirk", "Schulart", "Traeger", "SchuelerInnen"];
const ACTIVITY_COLUMNS: &[&str] = &["id", "school", "ag_name", "ag_cat"];

/// Locations of the four source files
#[derive(Debug, Clone)]
pub struct DataSources {
    pub schools: PathBuf,
    pub students: PathBuf,
    pub activities: PathBuf,
    pub districts: PathBuf,
}

impl DataSources {
    /// Standard file names inside a data directory
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            schools: dir.join("schulen_complete.csv"),
            students: dir.join("eckdaten_2019_20_allg_bildende_schulen_berlin.xlsx"),
            activities: dir.join("activity-schools-BE.csv"),
            districts: dir.join("districts.json"),
        }
    }
}

/// Load all datasets, failing on the first unusable source
pub fn load_datasets(sources: &DataSources) -> DatasetResult<Datasets> {
    let schools = load_schools(&sources.schools)?;
    tracing::info!(path = ?sources.schools, rows = schools.len(), "Loaded schools");

    let students = load_students(&sources.students)?;
    tracing::info!(path = ?sources.students, rows = students.len(), "Loaded student counts");

    let activities = load_activities(&sources.activities)?;
    tracing::info!(path = ?sources.activities, rows = activities.len(), "Loaded activities");

    let districts = load_districts(&sources.districts)?;
    tracing::info!(path = ?sources.districts, features = districts.len(), "Loaded district boundaries");

    let datasets = Datasets::new(schools, students, activities, districts);
    report_inconsistencies(&datasets);
    Ok(datasets)
}

/// Load the schools table
pub fn load_schools(path: &Path) -> DatasetResult<Vec<SchoolRecord>> {
    read_csv_records(path, SCHOOL_COLUMNS)
}

/// Load the activities table
pub fn load_activities(path: &Path) -> DatasetResult<Vec<ActivityRecord>> {
    read_csv_records(path, ACTIVITY_COLUMNS)
}

/// Load the student counts from an `.xlsx` workbook or a `.csv` file
pub fn load_students(path: &Path) -> DatasetResult<Vec<StudentRecord>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| DatasetError::UnsupportedFormat(path.to_path_buf()))?;

    let rows = match extension.as_str() {
        "xlsx" => xlsx::read_first_sheet(open(path)?)?,
        "csv" => read_csv_rows(path)?,
        _ => return Err(DatasetError::UnsupportedFormat(path.to_path_buf())),
    };

    students_from_rows(path, rows)
}

/// Load the district boundaries from a GeoJSON FeatureCollection
pub fn load_districts(path: &Path) -> DatasetResult<DistrictBoundaries> {
    let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_districts(&content)
}

/// Parse district boundaries from GeoJSON text
pub fn parse_districts(content: &str) -> DatasetResult<DistrictBoundaries> {
    let collection = match content.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(fc) => fc,
        _ => {
            return Err(DatasetError::GeoJson(
                "document must be a FeatureCollection".to_string(),
            ))
        }
    };

    let mut boundaries = Vec::with_capacity(collection.features.len());
    for (index, feature) in collection.features.into_iter().enumerate() {
        let name = match feature.property("name") {
            Some(JsonValue::String(name)) => name.clone(),
            _ => {
                return Err(DatasetError::GeoJson(format!(
                    "feature {} has no properties.name",
                    index
                )))
            }
        };

        let geometry = match feature.geometry {
            Some(geometry)
                if matches!(
                    geometry.value,
                    geojson::Value::Polygon(_) | geojson::Value::MultiPolygon(_)
                ) =>
            {
                geometry
            }
            _ => {
                return Err(DatasetError::GeoJson(format!(
                    "feature '{}' needs a Polygon or MultiPolygon geometry",
                    name
                )))
            }
        };

        boundaries.push(DistrictBoundary { name, geometry });
    }

    Ok(DistrictBoundaries::new(boundaries))
}

fn open(path: &Path) -> DatasetResult<File> {
    File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn csv_error(path: &Path) -> impl Fn(csv::Error) -> DatasetError + '_ {
    move |source| DatasetError::Csv {
        path: path.to_path_buf(),
        source,
    }
}

fn require_columns(
    path: &Path,
    headers: &csv::StringRecord,
    required: &[&str],
) -> DatasetResult<()> {
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(DatasetError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

fn read_csv_records<T: DeserializeOwned>(path: &Path, required: &[&str]) -> DatasetResult<Vec<T>> {
    let mut rdr = ReaderBuilder::new().from_reader(open(path)?);
    let headers = rdr.headers().map_err(csv_error(path))?.clone();
    require_columns(path, &headers, required)?;

    rdr.deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(csv_error(path))
}

fn read_csv_rows(path: &Path) -> DatasetResult<Vec<Vec<String>>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(open(path)?);

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(csv_error(path))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Map a header row plus data rows onto student records
fn students_from_rows(path: &Path, rows: Vec<Vec<String>>) -> DatasetResult<Vec<StudentRecord>> {
    let mut rows = rows.into_iter().enumerate();
    let header = match rows.next() {
        Some((_, header)) => header,
        None => {
            return Err(DatasetError::MissingColumn {
                path: path.to_path_buf(),
                column: STUDENT_COLUMNS[0].to_string(),
            })
        }
    };

    let mut indices = [0usize; 4];
    for (slot, column) in indices.iter_mut().zip(STUDENT_COLUMNS) {
        *slot = header
            .iter()
            .position(|h| h.trim() == *column)
            .ok_or_else(|| DatasetError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            })?;
    }
    let [district_idx, type_idx, operator_idx, count_idx] = indices;

    let mut records = Vec::new();
    for (row_index, row) in rows {
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let cell = |idx: usize| row.get(idx).map(|s| s.trim()).unwrap_or("");
        let row_number = row_index + 1;

        // An empty count keeps the row for grouping but out of the sums
        let students = match cell(count_idx) {
            "" => None,
            raw => Some(parse_count(raw).ok_or_else(|| DatasetError::InvalidValue {
                path: path.to_path_buf(),
                row: row_number,
                message: format!("SchuelerInnen '{}' is not a count", raw),
            })?),
        };

        records.push(StudentRecord {
            district: cell(district_idx).to_string(),
            school_type: cell(type_idx).to_string(),
            operator: cell(operator_idx).to_string(),
            students,
        });
    }

    Ok(records)
}

/// Parse a non-negative whole number, accepting spreadsheet floats like `12.0`
fn parse_count(value: &str) -> Option<u64> {
    if let Ok(n) = value.parse::<u64>() {
        return Some(n);
    }
    let f: f64 = value.parse().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 {
        Some(f as u64)
    } else {
        None
    }
}

/// Log data that is loadable but will not line up with the district filter
fn report_inconsistencies(datasets: &Datasets) {
    let unknown = datasets
        .schools()
        .iter()
        .filter(|s| District::from_name(&s.district).is_none())
        .count();
    if unknown > 0 {
        tracing::warn!(
            schools = unknown,
            "Schools with a district outside the filter set; they only appear unfiltered"
        );
    }

    for district in District::ALL {
        if datasets.districts().get(district.name()).is_none() {
            tracing::warn!(district = %district, "No boundary for district");
        }
    }
}
