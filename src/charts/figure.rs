//! Serializable Plotly figure description.
//!
//! Only the subset of the Plotly schema that scatter and histogram charts use
//! is modelled. Field names follow the Plotly JSON schema so the serialized
//! figure can be passed straight to `Plotly.newPlot`.

use serde::Serialize;
use serde_json::Value;

/// Default qualitative palette for discrete color groups.
pub const QUALITATIVE_PALETTE: [&str; 10] = [
    "#636efa", "#EF553B", "#00cc96", "#ab63fa", "#FFA15A", "#19d3f3", "#FF6692", "#B6E880",
    "#FF97FF", "#FECB52",
];

/// Default sequential colorscale for continuous color.
pub const SEQUENTIAL_COLORSCALE: [&str; 10] = [
    "#0d0887", "#46039f", "#7201a8", "#9c179e", "#bd3786", "#d8576b", "#ed7953", "#fb9f3a",
    "#fdca26", "#f0f921",
];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TraceType {
    Scatter,
    Histogram,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Trace {
    #[serde(rename = "type")]
    pub trace_type: TraceType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    pub name: String,
    pub legendgroup: String,
    pub showlegend: bool,
    pub orientation: String,
    pub x: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Vec<Value>>,
    pub xaxis: String,
    pub yaxis: String,
    pub marker: Marker,
    pub hovertemplate: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alignmentgroup: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offsetgroup: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bingroup: Option<String>,
}

impl Trace {
    /// Number of points (rows) the trace was built from.
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Marker {
    pub color: MarkerColor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coloraxis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

/// Either one color for the whole trace or one value per point.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum MarkerColor {
    Fixed(String),
    PerPoint(Vec<Value>),
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Axis {
    pub anchor: String,
    pub domain: [f64; 2],
    pub title: Title,
}

impl Axis {
    pub fn new(anchor: &str, title: impl Into<String>) -> Self {
        Self {
            anchor: anchor.to_string(),
            domain: [0.0, 1.0],
            title: Title::new(title),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Legend {
    pub title: Title,
    pub tracegroupgap: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ColorBar {
    pub title: Title,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ColorAxis {
    pub colorbar: ColorBar,
    pub colorscale: Vec<(f64, String)>,
}

impl ColorAxis {
    pub fn new(title: impl Into<String>) -> Self {
        let steps = (SEQUENTIAL_COLORSCALE.len() - 1) as f64;
        Self {
            colorbar: ColorBar {
                title: Title::new(title),
            },
            colorscale: SEQUENTIAL_COLORSCALE
                .iter()
                .enumerate()
                .map(|(i, color)| (i as f64 / steps, color.to_string()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Margin {
    pub t: u32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Layout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coloraxis: Option<ColorAxis>,
    pub margin: Margin,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<String>,
}

impl Figure {
    /// Total number of rows plotted across all traces.
    pub fn point_count(&self) -> usize {
        self.data.iter().map(Trace::len).sum()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
