//! Static Panel Figures
//!
//! Maps summary tables from the aggregation layer onto figures. These
//! functions only arrange data; they never group or count.

use plotly::common::Title;
use plotly::layout::{Axis, BarMode, Center, Layout, Mapbox, MapboxStyle, Margin};
use plotly::{Bar, BoxPlot, HeatMap, Pie, Plot};

use super::figure::{ChoroplethMapboxTrace, Figure, Frame, Trace, TreemapTrace};
use crate::aggregate::{CrossTab, PostcodeCount, Tally};
use crate::dataset::DistrictBoundaries;

const TREEMAP_ROOT: &str = "Berlin - Number of students per school-type and district";

/// Geographic center of Berlin used by the district maps
pub const BERLIN_CENTER: (f64, f64) = (52.51, 13.404954);

fn titled(title: &str) -> Layout {
    Layout::new().title(Title::from(title))
}

fn axis_titled(title: &str) -> Axis {
    Axis::new().title(Title::from(title))
}

fn district_mapbox(zoom: u8) -> Mapbox {
    Mapbox::new()
        .style(MapboxStyle::CartoPositron)
        .center(Center::new(BERLIN_CENTER.0, BERLIN_CENTER.1))
        .zoom(zoom)
}

fn plot_of(traces: Vec<Box<Bar<String, u64>>>, layout: Layout) -> Plot {
    let mut plot = Plot::new();
    for trace in traces {
        plot.add_trace(trace);
    }
    plot.set_layout(layout);
    plot
}

fn layout_plot(layout: Layout) -> Plot {
    let mut plot = Plot::new();
    plot.set_layout(layout);
    plot
}

fn pie(tally: &Tally<String>, title: &str, hole: Option<f64>) -> Figure {
    let labels: Vec<&str> = tally.keys().map(String::as_str).collect();
    let values: Vec<u64> = tally.values().collect();

    let mut trace = Pie::new(values).labels(labels);
    if let Some(hole) = hole {
        trace = trace.hole(hole);
    }

    let mut plot = Plot::new();
    plot.add_trace(trace);
    plot.set_layout(titled(title));
    Figure::from_plot(&plot)
}

/// Split a `(series, x)` tally into one bar trace per series
fn bars_by_series(tally: &Tally<(String, String)>) -> Vec<Box<Bar<String, u64>>> {
    let mut series: Vec<(String, Vec<String>, Vec<u64>)> = Vec::new();
    for ((name, x), count) in tally.iter() {
        let pos = match series.iter().position(|(n, _, _)| n == name) {
            Some(pos) => pos,
            None => {
                series.push((name.clone(), Vec::new(), Vec::new()));
                series.len() - 1
            }
        };
        series[pos].1.push(x.clone());
        series[pos].2.push(count);
    }
    series
        .into_iter()
        .map(|(name, x, y)| Bar::new(x, y).name(&name))
        .collect()
}

fn choropleth(
    boundaries: &DistrictBoundaries,
    locations: Vec<String>,
    z: Vec<u64>,
    range: (u64, u64),
    opacity: f64,
) -> Trace {
    Trace::ChoroplethMapbox(ChoroplethMapboxTrace::new(
        boundaries.to_feature_collection(),
        locations,
        z,
        range,
        opacity,
    ))
}

/// Donut chart of school types
pub fn school_type_share(per_type: &Tally<String>) -> Figure {
    pie(per_type, "Share of schools per schooltype", Some(0.5))
}

/// Heatmap of school types (rows) per district (columns)
pub fn school_type_density(density: &CrossTab<String, String>) -> Figure {
    let mut plot = Plot::new();
    plot.add_trace(HeatMap::new(
        density.columns.clone(),
        density.rows.clone(),
        density.values.clone(),
    ));
    plot.set_layout(titled("Density of schooltypes per district"));
    Figure::from_plot(&plot)
}

/// Grouped bars of public vs private schools per district
pub fn operator_by_district(per_operator: &Tally<(String, String)>) -> Figure {
    let layout = titled("Private vs Public schools across the districts")
        .bar_mode(BarMode::Group)
        .y_axis(axis_titled("schools"));
    Figure::from_plot(&plot_of(bars_by_series(per_operator), layout))
}

/// Stacked bars of all-day supervision forms per district
pub fn all_day_supervision(per_district_form: &Tally<(String, String)>) -> Figure {
    // Re-key as (form, district) so each form becomes one series
    let by_form: Tally<(String, String)> = per_district_form
        .iter()
        .map(|((district, form), n)| ((form.clone(), district.clone()), n))
        .collect();

    let layout = titled("Number of schools with all-day supervision").bar_mode(BarMode::Relative);
    Figure::from_plot(&plot_of(bars_by_series(&by_form), layout))
}

/// Choropleth of school counts per district, one animation frame per school type
pub fn schools_per_district_map(
    density: &CrossTab<String, String>,
    boundaries: &DistrictBoundaries,
) -> Figure {
    let frames = density
        .rows
        .iter()
        .zip(&density.values)
        .map(|(school_type, counts)| {
            let (locations, z): (Vec<String>, Vec<u64>) = density
                .columns
                .iter()
                .zip(counts)
                .filter(|(_, n)| **n > 0)
                .map(|(district, n)| (district.clone(), *n))
                .unzip();
            Frame::new(
                school_type.clone(),
                vec![choropleth(boundaries, locations, z, (0, 45), 1.0)],
            )
        })
        .collect();

    let layout = titled("Number of schools per Berlin district and schooltype")
        .height(600)
        .mapbox(district_mapbox(9));
    Figure::animated(frames, &layout_plot(layout), "Schultyp=")
}

/// Box plot of schools per postal code, grouped by district
pub fn schools_per_postcode(counts: &[PostcodeCount]) -> Figure {
    let x: Vec<String> = counts.iter().map(|c| c.district.clone()).collect();
    let y: Vec<u64> = counts.iter().map(|c| c.schools).collect();

    let mut plot = Plot::new();
    plot.add_trace(BoxPlot::new_xy(x, y));
    plot.set_layout(
        titled("Number of schools per PLZ within each district")
            .height(600)
            .y_axis(axis_titled("n")),
    );
    Figure::from_plot(&plot)
}

/// Donut chart of students per school type
pub fn student_type_share(per_type: &Tally<String>) -> Figure {
    pie(per_type, "Share of students per schooltype", Some(0.5))
}

/// Treemap root → district → school type, sized by students
pub fn student_treemap(per_district_type: &Tally<(String, String)>) -> Figure {
    let mut ids = vec![TREEMAP_ROOT.to_string()];
    let mut labels = vec![TREEMAP_ROOT.to_string()];
    let mut parents = vec![String::new()];
    let mut values = vec![per_district_type.total()];

    let per_district: Tally<String> = per_district_type
        .iter()
        .map(|((district, _), n)| (district.clone(), n))
        .collect();

    for (district, total) in per_district.iter() {
        ids.push(format!("{}/{}", TREEMAP_ROOT, district));
        labels.push(district.clone());
        parents.push(TREEMAP_ROOT.to_string());
        values.push(total);
    }

    for ((district, school_type), n) in per_district_type.iter() {
        let parent = format!("{}/{}", TREEMAP_ROOT, district);
        ids.push(format!("{}/{}", parent, school_type));
        labels.push(school_type.clone());
        parents.push(parent);
        values.push(n);
    }

    let layout = Layout::new().margin(Margin::new().left(16).right(16).top(16).bottom(16));
    Figure::from_plot(&layout_plot(layout))
        .with_traces([Trace::Treemap(TreemapTrace::new(ids, labels, parents, values))])
}

/// Choropleth of total students per district
pub fn student_district_map(per_district: &Tally<String>, boundaries: &DistrictBoundaries) -> Figure {
    let locations = per_district.keys().cloned().collect();
    let z = per_district.values().collect();

    let layout = titled("Total number of students per Berlin district")
        .height(600)
        .mapbox(district_mapbox(9));
    Figure::from_plot(&layout_plot(layout)).with_traces([choropleth(
        boundaries,
        locations,
        z,
        (20_000, 45_000),
        0.8,
    )])
}

/// Grouped bars of students per operator and school type, one frame per district
pub fn students_per_school_type(per_operator: &Tally<(String, String, String)>) -> Figure {
    let mut districts: Vec<(String, Tally<(String, String)>)> = Vec::new();
    for ((district, operator, school_type), n) in per_operator.iter() {
        let pos = match districts.iter().position(|(d, _)| d == district) {
            Some(pos) => pos,
            None => {
                districts.push((district.clone(), Tally::new()));
                districts.len() - 1
            }
        };
        districts[pos]
            .1
            .add((school_type.clone(), operator.clone()), n);
    }

    let frames = districts
        .into_iter()
        .map(|(district, by_type)| {
            Frame::from_plot(district, &plot_of(bars_by_series(&by_type), Layout::new()))
        })
        .collect();

    let layout = titled("Number of students per Schooltype")
        .height(600)
        .bar_mode(BarMode::Group)
        .y_axis(Axis::new().range(vec![0.0, 16_000.0]));
    Figure::animated(frames, &layout_plot(layout), "Bezirk=")
}

/// Pie chart of activity categories
pub fn activity_categories(per_category: &Tally<String>) -> Figure {
    pie(per_category, "Categories of activities at Berlin schools", None)
}

/// Box plot of distinct activities per school
pub fn activities_per_school(per_school: &Tally<String>) -> Figure {
    let y: Vec<u64> = per_school.values().collect();

    let mut plot = Plot::new();
    plot.add_trace(BoxPlot::new(y));
    plot.set_layout(
        titled("Number of activities per school")
            .width(400)
            .y_axis(axis_titled("no of activities per school")),
    );
    Figure::from_plot(&plot)
}

/// Bar chart of the most frequent activities
pub fn top_activities(top: &[(String, u64)], n: usize) -> Figure {
    let x: Vec<String> = top.iter().map(|(name, _)| name.clone()).collect();
    let y: Vec<u64> = top.iter().map(|(_, count)| *count).collect();

    let layout = titled(&format!("TOP {} school activities", n))
        .y_axis(axis_titled("no of schools offering activity"));
    Figure::from_plot(&plot_of(vec![Bar::new(x, y)], layout))
}
