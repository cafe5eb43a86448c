//! School Location Map
//!
//! The figure re-rendered by the district filter: one marker per school,
//! one trace (legend color) per school type.

use plotly::common::{Marker, Mode};
use plotly::layout::{Center, Layout, Mapbox, MapboxStyle};
use plotly::{Plot, ScatterMapbox};

use super::figure::Figure;
use super::panels::BERLIN_CENTER;
use crate::dataset::SchoolRecord;

const MARKER_SIZE: usize = 15;
const MAP_HEIGHT: usize = 800;
const MAP_ZOOM: u8 = 10;

const HOVER_TEMPLATE: &str = "<b>%{text}</b><br>%{hovertext}<extra></extra>";

/// Contact lines shown under the school name
fn hover_details(school: &SchoolRecord) -> String {
    let field = |value: &Option<String>| value.as_deref().unwrap_or_default().to_string();
    format!(
        "PLZ: {}<br>Address: {}<br>Website: {}<br>Email: {}<br>Phone: {}",
        field(&school.postal_code),
        field(&school.address),
        field(&school.website),
        field(&school.email),
        field(&school.phone),
    )
}

/// Mean position of the plotted schools, or the city center when there are none
fn center_of(schools: &[&SchoolRecord]) -> (f64, f64) {
    let points: Vec<(f64, f64)> = schools.iter().filter_map(|s| s.coordinates()).collect();
    if points.is_empty() {
        return BERLIN_CENTER;
    }
    let n = points.len() as f64;
    (
        points.iter().map(|(lat, _)| lat).sum::<f64>() / n,
        points.iter().map(|(_, lon)| lon).sum::<f64>() / n,
    )
}

/// Points of one school type, in first-seen order
#[derive(Default)]
struct TypeSeries {
    name: String,
    lat: Vec<f64>,
    lon: Vec<f64>,
    names: Vec<String>,
    details: Vec<String>,
}

/// Map scatter of the given schools, colored by school type
///
/// Schools without coordinates are part of the subset but cannot be plotted.
pub fn school_locations(schools: &[&SchoolRecord]) -> Figure {
    let mut series: Vec<TypeSeries> = Vec::new();

    for school in schools {
        let Some((lat, lon)) = school.coordinates() else {
            continue;
        };

        let pos = match series.iter().position(|s| s.name == school.school_type) {
            Some(pos) => pos,
            None => {
                series.push(TypeSeries {
                    name: school.school_type.clone(),
                    ..Default::default()
                });
                series.len() - 1
            }
        };

        let s = &mut series[pos];
        s.lat.push(lat);
        s.lon.push(lon);
        s.names.push(school.name.clone());
        s.details.push(hover_details(school));
    }

    let mut plot = Plot::new();
    for s in series {
        plot.add_trace(
            ScatterMapbox::new(s.lat, s.lon)
                .name(&s.name)
                .mode(Mode::Markers)
                .marker(Marker::new().size(MARKER_SIZE))
                .text_array(s.names)
                .hover_text_array(s.details)
                .hover_template(HOVER_TEMPLATE),
        );
    }

    let (lat, lon) = center_of(schools);
    plot.set_layout(
        Layout::new().height(MAP_HEIGHT).mapbox(
            Mapbox::new()
                .style(MapboxStyle::OpenStreetMap)
                .center(Center::new(lat, lon))
                .zoom(MAP_ZOOM),
        ),
    );

    Figure::from_plot(&plot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::sample_schools;
    use serde_json::{json, Value};

    fn plotted_points(figure: &Figure) -> usize {
        figure
            .data
            .iter()
            .map(|t| t.attr("lat").and_then(Value::as_array).map_or(0, Vec::len))
            .sum()
    }

    #[test]
    fn test_one_trace_per_school_type() {
        let schools = sample_schools();
        let refs: Vec<&SchoolRecord> = schools.iter().collect();
        let figure = school_locations(&refs);

        let names: Vec<_> = figure
            .data
            .iter()
            .map(|t| {
                assert_eq!(t.kind(), Some("scattermapbox"));
                t.attr("name").and_then(Value::as_str).unwrap()
            })
            .collect();
        assert_eq!(names, vec!["Grundschule", "Gymnasium", "Integrierte Sekundarschule"]);

        // The school without coordinates is skipped
        assert_eq!(plotted_points(&figure), schools.len() - 1);
    }

    #[test]
    fn test_hover_fields() {
        let schools = sample_schools();
        let figure = school_locations(&[&schools[0]]);
        let trace = serde_json::to_value(&figure.data[0]).unwrap();

        assert_eq!(trace["text"], json!(["Grundschule am Arkonaplatz"]));
        assert_eq!(
            trace["hovertext"][0],
            "PLZ: 10435<br>Address: Granseer Str. 23<br>Website: http://arkona.example<br>\
             Email: arkona@example.org<br>Phone: 030 1"
        );
        assert_eq!(trace["hovertemplate"], HOVER_TEMPLATE);
        assert_eq!(trace["mode"], "markers");
        assert_eq!(trace["marker"]["size"], 15);
    }

    #[test]
    fn test_missing_contact_fields_are_blank() {
        let schools = sample_schools();
        let figure = school_locations(&[&schools[1]]);
        assert_eq!(
            figure.data[0].attr("hovertext"),
            Some(&json!(["PLZ: 13357<br>Address: <br>Website: <br>Email: <br>Phone: "]))
        );
    }

    #[test]
    fn test_empty_subset_centers_on_berlin() {
        let figure = school_locations(&[]);
        assert!(figure.data.is_empty());
        let mapbox = &figure.layout["mapbox"];
        assert_eq!(mapbox["center"]["lat"], BERLIN_CENTER.0);
        assert_eq!(mapbox["center"]["lon"], BERLIN_CENTER.1);
        assert_eq!(mapbox["style"], "open-street-map");
        assert_eq!(figure.layout["height"], 800);
    }

    #[test]
    fn test_center_is_mean_position() {
        let schools = sample_schools();
        let figure = school_locations(&[&schools[0], &schools[3]]);
        let center = &figure.layout["mapbox"]["center"];
        let lat = center["lat"].as_f64().unwrap();
        let lon = center["lon"].as_f64().unwrap();
        assert!((lat - (52.538 + 52.533) / 2.0).abs() < 1e-9);
        assert!((lon - (13.402 + 13.408) / 2.0).abs() < 1e-9);
    }
}
