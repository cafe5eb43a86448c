//! Core record types for the school datasets
//!
//! This module defines the rows produced by the loader:
//! - `SchoolRecord`: one row per school
//! - `StudentRecord`: student counts per (district, school type, operator)
//! - `ActivityRecord`: one offered activity at one school
//! - `DistrictBoundary`: a district polygon used for choropleth maps
//!
//! Field names in `serde(rename)` follow the column headers of the source
//! files, which must stay compatible.

use serde::{Deserialize, Serialize};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, JsonValue};

/// Treat empty or whitespace-only strings as missing
pub fn non_empty(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// A single school
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchoolRecord {
    /// School number (Berliner Schulnummer)
    #[serde(rename = "BSN")]
    pub id: String,
    #[serde(rename = "NAME")]
    pub name: String,
    #[serde(rename = "Bezirk")]
    pub district: String,
    #[serde(rename = "Schultyp")]
    pub school_type: String,
    /// Operator type: public or private
    #[serde(rename = "Traeger")]
    pub operator: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(rename = "PLZ", default)]
    pub postal_code: Option<String>,
    #[serde(rename = "Berliner Adresse", default)]
    pub address: Option<String>,
    #[serde(rename = "Internetadresse", default)]
    pub website: Option<String>,
    #[serde(rename = "eMail-Adresse", default)]
    pub email: Option<String>,
    #[serde(rename = "Telefonnummer", default)]
    pub phone: Option<String>,
    /// All-day supervision form, absent for many schools
    #[serde(rename = "full_time_school", default)]
    pub all_day: Option<String>,
}

impl SchoolRecord {
    /// Create a school with the identifying fields set
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        district: impl Into<String>,
        school_type: impl Into<String>,
        operator: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            district: district.into(),
            school_type: school_type.into(),
            operator: operator.into(),
            latitude: None,
            longitude: None,
            postal_code: None,
            address: None,
            website: None,
            email: None,
            phone: None,
            all_day: None,
        }
    }

    /// Builder method: set coordinates
    pub fn located(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Builder method: set postal code
    pub fn postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.postal_code = Some(postal_code.into());
        self
    }

    /// Builder method: set all-day supervision form
    pub fn all_day(mut self, form: impl Into<String>) -> Self {
        self.all_day = Some(form.into());
        self
    }

    /// Builder method: set contact fields
    pub fn contact(
        mut self,
        address: impl Into<String>,
        website: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        self.address = Some(address.into());
        self.website = Some(website.into());
        self.email = Some(email.into());
        self.phone = Some(phone.into());
        self
    }

    /// Coordinates as (lat, lon) when both are present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Student count for one (district, school type, operator) combination
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StudentRecord {
    #[serde(rename = "Bezirk")]
    pub district: String,
    #[serde(rename = "Schulart")]
    pub school_type: String,
    #[serde(rename = "Traeger")]
    pub operator: String,
    /// Missing for partially filled rows, which stay out of every sum
    #[serde(rename = "SchuelerInnen", default)]
    pub students: Option<u64>,
}

impl StudentRecord {
    pub fn new(
        district: impl Into<String>,
        school_type: impl Into<String>,
        operator: impl Into<String>,
        students: u64,
    ) -> Self {
        Self {
            district: district.into(),
            school_type: school_type.into(),
            operator: operator.into(),
            students: Some(students),
        }
    }

    /// A row without a student count
    pub fn uncounted(
        district: impl Into<String>,
        school_type: impl Into<String>,
        operator: impl Into<String>,
    ) -> Self {
        Self {
            students: None,
            ..Self::new(district, school_type, operator, 0)
        }
    }
}

/// One activity (Arbeitsgemeinschaft) offered by a school
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActivityRecord {
    pub id: String,
    pub school: String,
    #[serde(rename = "ag_name")]
    pub name: String,
    #[serde(rename = "ag_cat")]
    pub category: String,
}

impl ActivityRecord {
    pub fn new(
        id: impl Into<String>,
        school: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            school: school.into(),
            name: name.into(),
            category: category.into(),
        }
    }
}

/// A named district polygon
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictBoundary {
    /// District name from `properties.name`
    pub name: String,
    /// Polygon or MultiPolygon geometry
    pub geometry: Geometry,
}

/// District polygons keyed by name, in document order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistrictBoundaries {
    boundaries: Vec<DistrictBoundary>,
}

impl DistrictBoundaries {
    pub fn new(boundaries: Vec<DistrictBoundary>) -> Self {
        Self { boundaries }
    }

    /// Look up a boundary by district name
    pub fn get(&self, name: &str) -> Option<&DistrictBoundary> {
        self.boundaries.iter().find(|b| b.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DistrictBoundary> {
        self.boundaries.iter()
    }

    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }

    /// Rebuild a FeatureCollection with `properties.name` as feature key
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let features = self
            .boundaries
            .iter()
            .map(|b| {
                let mut properties = JsonObject::new();
                properties.insert("name".to_string(), JsonValue::from(b.name.clone()));
                Feature {
                    bbox: None,
                    geometry: Some(b.geometry.clone()),
                    id: None,
                    properties: Some(properties),
                    foreign_members: None,
                }
            })
            .collect();

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

/// Row counts of the loaded datasets
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct DatasetStats {
    pub schools: usize,
    pub students: usize,
    pub activities: usize,
    pub districts: usize,
}

impl std::fmt::Display for DatasetStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} schools, {} student rows, {} activities, {} district boundaries",
            self.schools, self.students, self.activities, self.districts
        )
    }
}
