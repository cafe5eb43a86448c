//! Small in-memory datasets shared by unit tests

use geojson::{Geometry, Value};

use super::context::Datasets;
use super::types::{
    ActivityRecord, DistrictBoundaries, DistrictBoundary, SchoolRecord, StudentRecord,
};

fn square(lon: f64, lat: f64) -> Geometry {
    Geometry::new(Value::Polygon(vec![vec![
        vec![lon, lat],
        vec![lon + 0.1, lat],
        vec![lon + 0.1, lat + 0.1],
        vec![lon, lat],
    ]]))
}

/// Six schools across three districts plus one outside the filter set
pub(crate) fn sample_schools() -> Vec<SchoolRecord> {
    vec![
        SchoolRecord::new("01G01", "Grundschule am Arkonaplatz", "Mitte", "Grundschule", "öffentlich")
            .located(52.538, 13.402)
            .postal_code("10435")
            .contact("Granseer Str. 23", "http://arkona.example", "arkona@example.org", "030 1")
            .all_day("offen"),
        SchoolRecord::new("01Y02", "Lessing-Gymnasium", "Mitte", "Gymnasium", "öffentlich")
            .located(52.545, 13.370)
            .postal_code("13357"),
        SchoolRecord::new("01P03", "Freie Schule Mitte", "Mitte", "Grundschule", "privat")
            .located(52.530, 13.410)
            .postal_code("10435")
            .all_day("gebunden"),
        SchoolRecord::new("03G04", "Grundschule am Teutoburger Platz", "Pankow", "Grundschule", "öffentlich")
            .located(52.533, 13.408)
            .postal_code("10119")
            .all_day("offen"),
        SchoolRecord::new("08K05", "Rixdorfer Schule", "Neukölln", "Integrierte Sekundarschule", "öffentlich")
            .located(52.476, 13.441)
            .postal_code("12043"),
        // No coordinates: part of every subset, never plotted
        SchoolRecord::new("08P06", "Schule ohne Ort", "Neukölln", "Grundschule", "privat"),
        SchoolRecord::new("99X07", "Schule in Atlantis", "Atlantis", "Grundschule", "privat")
            .located(0.0, 0.0),
    ]
}

pub(crate) fn sample_students() -> Vec<StudentRecord> {
    vec![
        StudentRecord::new("Mitte", "Grundschule", "öffentlich", 12000),
        StudentRecord::new("Mitte", "Grundschule", "privat", 900),
        StudentRecord::new("Mitte", "Gymnasium", "öffentlich", 8000),
        StudentRecord::new("Pankow", "Grundschule", "öffentlich", 15000),
        StudentRecord::new("Pankow", "Gymnasium", "privat", 1100),
        StudentRecord::new("Neukölln", "Integrierte Sekundarschule", "öffentlich", 9000),
    ]
}

pub(crate) fn sample_activities() -> Vec<ActivityRecord> {
    vec![
        ActivityRecord::new("1", "01G01", "Schach", "Spiele"),
        ActivityRecord::new("2", "01G01", "Schach", "Spiele"),
        ActivityRecord::new("3", "01G01", "Chor", "Musik"),
        ActivityRecord::new("4", "01Y02", "Theater", "Kultur"),
        ActivityRecord::new("5", "01Y02", "Schach", "Spiele"),
        ActivityRecord::new("6", "03G04", "Fußball", "Sport"),
        ActivityRecord::new("7", "03G04", "Chor", "Musik"),
        ActivityRecord::new("8", "03G04", "Theater", "Kultur"),
        ActivityRecord::new("9", "08K05", "Fußball", "Sport"),
    ]
}

pub(crate) fn sample_boundaries() -> DistrictBoundaries {
    DistrictBoundaries::new(vec![
        DistrictBoundary {
            name: "Mitte".to_string(),
            geometry: square(13.35, 52.50),
        },
        DistrictBoundary {
            name: "Pankow".to_string(),
            geometry: square(13.40, 52.55),
        },
        DistrictBoundary {
            name: "Neukölln".to_string(),
            geometry: square(13.42, 52.45),
        },
    ])
}

pub(crate) fn sample_datasets() -> Datasets {
    Datasets::new(
        sample_schools(),
        sample_students(),
        sample_activities(),
        sample_boundaries(),
    )
}
