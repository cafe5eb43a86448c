//! Figure Description Types
//!
//! Figures in the JSON form plotly.js renders
//! (`{"data": [...], "layout": {...}, "frames": [...]}`).
//!
//! Pie, bar, heatmap, box and scattermapbox traces and every layout are
//! built with the `plotly` crate and taken from `Plot::to_json`. The crate
//! has no treemap or choroplethmapbox trace and no animation frames or
//! sliders, so those are modelled here.

use geojson::FeatureCollection;
use plotly::Plot;
use serde::Serialize;
use serde_json::{json, Map, Value};

/// A complete chart: traces, layout and optional animation frames
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<Frame>,
}

impl Default for Figure {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            layout: Value::Object(Map::new()),
            frames: Vec::new(),
        }
    }
}

/// Split the JSON of a plot into its traces and its layout
fn plot_parts(plot: &Plot) -> (Vec<Trace>, Value) {
    let mut json: Value = match serde_json::from_str(&plot.to_json()) {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(error = %e, "Plot serialized to invalid JSON");
            return (Vec::new(), Value::Object(Map::new()));
        }
    };

    let data = match json.get_mut("data").map(Value::take) {
        Some(Value::Array(traces)) => traces.into_iter().map(Trace::Plotly).collect(),
        _ => Vec::new(),
    };
    let layout = match json.get_mut("layout").map(Value::take) {
        Some(layout @ Value::Object(_)) => layout,
        _ => Value::Object(Map::new()),
    };
    (data, layout)
}

impl Figure {
    /// Figure from a plot built with the plotly crate
    pub fn from_plot(plot: &Plot) -> Self {
        let (data, layout) = plot_parts(plot);
        Self {
            data,
            layout,
            frames: Vec::new(),
        }
    }

    /// Builder method: append traces the plotly crate has no type for
    pub fn with_traces(mut self, traces: impl IntoIterator<Item = Trace>) -> Self {
        self.data.extend(traces);
        self
    }

    /// Build an animated figure showing the first frame initially
    ///
    /// Adds a slider with one step per frame to the layout of `plot`.
    pub fn animated(frames: Vec<Frame>, plot: &Plot, slider_prefix: &str) -> Self {
        let (_, mut layout) = plot_parts(plot);
        let slider = Slider {
            active: 0,
            currentvalue: json!({ "prefix": slider_prefix }),
            steps: frames.iter().map(|f| SliderStep::animate(&f.name)).collect(),
        };
        if let Value::Object(map) = &mut layout {
            map.insert("sliders".to_string(), json!([slider]));
        }

        Self {
            data: frames.first().map(|f| f.data.clone()).unwrap_or_default(),
            layout,
            frames,
        }
    }

    /// Number of traces
    pub fn trace_count(&self) -> usize {
        self.data.len()
    }

    /// Title text of the layout
    pub fn title(&self) -> Option<&str> {
        self.layout.pointer("/title/text").and_then(Value::as_str)
    }
}

/// One animation frame
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Frame {
    pub name: String,
    pub data: Vec<Trace>,
}

impl Frame {
    pub fn new(name: impl Into<String>, data: Vec<Trace>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Frame holding the traces of a plot
    pub fn from_plot(name: impl Into<String>, plot: &Plot) -> Self {
        Self::new(name, plot_parts(plot).0)
    }
}

/// One trace of a figure
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum Trace {
    /// Built with the plotly crate, already in figure JSON form
    Plotly(Value),
    Treemap(TreemapTrace),
    ChoroplethMapbox(ChoroplethMapboxTrace),
}

impl Trace {
    /// The plotly.js `type` of the trace
    pub fn kind(&self) -> Option<&str> {
        match self {
            Trace::Plotly(json) => json.get("type").and_then(Value::as_str),
            Trace::Treemap(t) => Some(t.kind),
            Trace::ChoroplethMapbox(t) => Some(t.kind),
        }
    }

    /// Attribute of a plotly-built trace
    pub fn attr(&self, name: &str) -> Option<&Value> {
        match self {
            Trace::Plotly(json) => json.get(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TreemapTrace {
    #[serde(rename = "type")]
    kind: &'static str,
    pub ids: Vec<String>,
    pub labels: Vec<String>,
    pub parents: Vec<String>,
    pub values: Vec<u64>,
    /// Parent values are totals of their children
    pub branchvalues: &'static str,
}

impl TreemapTrace {
    pub fn new(ids: Vec<String>, labels: Vec<String>, parents: Vec<String>, values: Vec<u64>) -> Self {
        Self {
            kind: "treemap",
            ids,
            labels,
            parents,
            values,
            branchvalues: "total",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChoroplethMapboxTrace {
    #[serde(rename = "type")]
    kind: &'static str,
    pub geojson: FeatureCollection,
    pub featureidkey: &'static str,
    pub locations: Vec<String>,
    pub z: Vec<u64>,
    pub colorscale: &'static str,
    pub zmin: u64,
    pub zmax: u64,
    pub marker: Value,
}

impl ChoroplethMapboxTrace {
    /// Areas keyed by `properties.name`, colored on a fixed `range`
    pub fn new(
        geojson: FeatureCollection,
        locations: Vec<String>,
        z: Vec<u64>,
        range: (u64, u64),
        opacity: f64,
    ) -> Self {
        Self {
            kind: "choroplethmapbox",
            geojson,
            featureidkey: "properties.name",
            locations,
            z,
            colorscale: "Jet",
            zmin: range.0,
            zmax: range.1,
            marker: json!({ "opacity": opacity }),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Slider {
    pub active: usize,
    pub currentvalue: Value,
    pub steps: Vec<SliderStep>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SliderStep {
    pub label: String,
    pub method: String,
    pub args: Value,
}

impl SliderStep {
    /// A step that jumps to the named frame without transition
    pub fn animate(frame: &str) -> Self {
        Self {
            label: frame.to_string(),
            method: "animate".to_string(),
            args: json!([
                [frame],
                {
                    "mode": "immediate",
                    "frame": { "duration": 0, "redraw": true },
                    "transition": { "duration": 0 }
                }
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotly::common::Title;
    use plotly::{Bar, Layout, Pie};

    fn bar_plot(y: u64) -> Plot {
        let mut plot = Plot::new();
        plot.add_trace(Bar::new(vec!["privat".to_string()], vec![y]));
        plot
    }

    #[test]
    fn test_from_plot_keeps_traces_and_layout() {
        let mut plot = Plot::new();
        plot.add_trace(Pie::new(vec![3u64, 4]).labels(vec!["a", "b"]).hole(0.5));
        plot.set_layout(Layout::new().title(Title::from("Schools")).height(600));

        let figure = Figure::from_plot(&plot);
        assert_eq!(figure.trace_count(), 1);
        assert_eq!(figure.data[0].kind(), Some("pie"));
        assert_eq!(figure.data[0].attr("hole"), Some(&json!(0.5)));
        assert_eq!(figure.title(), Some("Schools"));
        assert_eq!(figure.layout["height"], 600);
    }

    #[test]
    fn test_custom_trace_type_tag() {
        let trace = Trace::Treemap(TreemapTrace::new(
            vec!["root".into()],
            vec!["root".into()],
            vec![String::new()],
            vec![1],
        ));
        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["type"], "treemap");
        assert_eq!(json["branchvalues"], "total");
        assert_eq!(trace.kind(), Some("treemap"));
        assert!(trace.attr("type").is_none());
    }

    #[test]
    fn test_with_traces_appends() {
        let choropleth = ChoroplethMapboxTrace::new(
            FeatureCollection {
                bbox: None,
                features: Vec::new(),
                foreign_members: None,
            },
            vec!["Mitte".into()],
            vec![4],
            (0, 45),
            0.8,
        );
        let figure = Figure::from_plot(&Plot::new()).with_traces([Trace::ChoroplethMapbox(choropleth)]);

        let json = serde_json::to_value(&figure).unwrap();
        assert_eq!(json["data"][0]["type"], "choroplethmapbox");
        assert_eq!(json["data"][0]["featureidkey"], "properties.name");
        assert_eq!(json["data"][0]["geojson"]["type"], "FeatureCollection");
        assert_eq!(json["data"][0]["marker"]["opacity"], 0.8);
    }

    #[test]
    fn test_animated_figure() {
        let frames = vec![
            Frame::from_plot("Mitte", &bar_plot(3)),
            Frame::from_plot("Pankow", &bar_plot(5)),
        ];

        let mut layout_plot = Plot::new();
        layout_plot.set_layout(Layout::new().title(Title::from("Students")));
        let figure = Figure::animated(frames, &layout_plot, "Bezirk=");

        assert_eq!(figure.frames.len(), 2);
        assert_eq!(figure.data, figure.frames[0].data);
        assert_eq!(figure.title(), Some("Students"));

        let json = serde_json::to_value(&figure).unwrap();
        assert_eq!(json["data"][0]["type"], "bar");
        assert_eq!(json["data"][0]["y"][0], 3);
        assert_eq!(json["layout"]["sliders"][0]["steps"].as_array().unwrap().len(), 2);
        assert_eq!(json["layout"]["sliders"][0]["steps"][1]["args"][0][0], "Pankow");
        assert_eq!(json["frames"][1]["name"], "Pankow");
    }

    #[test]
    fn test_static_figure_omits_frames() {
        let figure = Figure::default();
        let json = serde_json::to_value(&figure).unwrap();
        assert!(json.get("frames").is_none());
        assert!(json["layout"].as_object().unwrap().is_empty());
        assert_eq!(figure.trace_count(), 0);
        assert_eq!(figure.title(), None);
    }
}
