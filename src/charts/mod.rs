//! Chart specifications built from a dataset.
//!
//! [`ChartBuilder`] applies the minimum-value filter and turns the surviving
//! rows into a Plotly [`Figure`]. Rows are grouped into one trace per distinct
//! value of the color column; a numeric color column on a scatter plot is
//! instead mapped onto a continuous color axis.

pub mod figure;
pub mod html;

pub use figure::{Figure, Trace, TraceType};

use crate::table::{Dataset, Record, TableError};
use figure::{
    Axis, ColorAxis, Layout, Legend, Margin, Marker, MarkerColor, Title, QUALITATIVE_PALETTE,
};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Column the minimum-value filter is applied to unless configured otherwise.
pub const DEFAULT_FILTER_COLUMN: &str = "flipper_length_mm";

/// Render mode that selects the histogram variant of [`ChartBuilder::render_default`].
pub const HISTOGRAM_RENDER_MODE: &str = "plot";

const PENGUIN_TITLE: &str = "Penguin Bill Length vs Bill Depth";
const HISTOGRAM_TITLE: &str = "Histogram of Bill Length by Species";

// Applied whatever columns are selected; unmapped columns keep their name.
const BILL_LABELS: &[(&str, &str)] = &[
    ("bill_length_mm", "Bill Length (mm)"),
    ("bill_depth_mm", "Bill Depth (mm)"),
];
const BILL_LENGTH_LABELS: &[(&str, &str)] = &[("bill_length_mm", "Bill Length (mm)")];

const COUNT_LABEL: &str = "count";

/// Errors that can occur while building or rendering a chart
#[derive(Debug, Error)]
pub enum ChartError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("failed to serialize figure: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Title and axis-label text for one chart.
#[derive(Debug, Clone, Copy)]
struct ChartText {
    title: &'static str,
    labels: &'static [(&'static str, &'static str)],
}

impl ChartText {
    const STANDARD: Self = Self {
        title: PENGUIN_TITLE,
        labels: BILL_LABELS,
    };

    const BILL_LENGTH_HISTOGRAM: Self = Self {
        title: HISTOGRAM_TITLE,
        labels: BILL_LENGTH_LABELS,
    };

    fn label<'a>(&self, column: &'a str) -> &'a str {
        self.labels
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, label)| *label)
            .unwrap_or(column)
    }
}

/// Builds scatter and histogram figures.
#[derive(Debug, Clone)]
pub struct ChartBuilder {
    filter_column: String,
}

impl Default for ChartBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_FILTER_COLUMN)
    }
}

impl ChartBuilder {
    pub fn new(filter_column: impl Into<String>) -> Self {
        Self {
            filter_column: filter_column.into(),
        }
    }

    pub fn filter_column(&self) -> &str {
        &self.filter_column
    }

    /// Scatter of `x` against `y`, colored by `color`, over rows whose filter
    /// column is at least `filter_min`.
    pub fn scatter(
        &self,
        dataset: &Dataset,
        x: &str,
        y: &str,
        color: &str,
        filter_min: f64,
    ) -> Result<Figure, ChartError> {
        let filtered = dataset.filter_min(&self.filter_column, filter_min)?;
        scatter_figure(&filtered, x, y, color, ChartText::STANDARD)
    }

    /// Histogram of `column`, grouped by `color`, over rows whose filter
    /// column is at least `filter_min`.
    pub fn histogram(
        &self,
        dataset: &Dataset,
        column: &str,
        color: &str,
        filter_min: f64,
    ) -> Result<Figure, ChartError> {
        let filtered = dataset.filter_min(&self.filter_column, filter_min)?;
        histogram_figure(&filtered, column, color, ChartText::STANDARD)
    }

    /// One of the two fixed bill-measurement charts as an HTML fragment.
    ///
    /// `mode == "plot"` selects the histogram; anything else the scatter.
    /// No filter is applied.
    pub fn render_default(&self, dataset: &Dataset, mode: &str) -> Result<String, ChartError> {
        let figure = if mode == HISTOGRAM_RENDER_MODE {
            histogram_figure(
                dataset,
                "bill_length_mm",
                "species",
                ChartText::BILL_LENGTH_HISTOGRAM,
            )?
        } else {
            scatter_figure(
                dataset,
                "bill_length_mm",
                "bill_depth_mm",
                "species",
                ChartText::STANDARD,
            )?
        };

        Ok(html::to_html_fragment(&figure)?)
    }
}

fn scatter_figure(
    dataset: &Dataset,
    x: &str,
    y: &str,
    color: &str,
    text: ChartText,
) -> Result<Figure, ChartError> {
    for column in [x, y, color] {
        dataset.column(column)?;
    }
    let continuous = dataset.is_numeric(color)?;
    let records = dataset.to_records()?;

    let (x_label, y_label, color_label) = (text.label(x), text.label(y), text.label(color));

    let data = if continuous {
        vec![Trace {
            trace_type: TraceType::Scatter,
            mode: Some("markers".to_string()),
            name: String::new(),
            legendgroup: String::new(),
            showlegend: false,
            orientation: "v".to_string(),
            x: column_values(&records, x),
            y: Some(column_values(&records, y)),
            xaxis: "x".to_string(),
            yaxis: "y".to_string(),
            marker: Marker {
                color: MarkerColor::PerPoint(column_values(&records, color)),
                coloraxis: Some("coloraxis".to_string()),
                symbol: Some("circle".to_string()),
            },
            hovertemplate: format!(
                "{x_label}=%{{x}}<br>{y_label}=%{{y}}<br>{color_label}=%{{marker.color}}<extra></extra>"
            ),
            alignmentgroup: None,
            offsetgroup: None,
            bingroup: None,
        }]
    } else {
        group_by(&records, color)
            .into_iter()
            .enumerate()
            .map(|(i, (name, rows))| Trace {
                trace_type: TraceType::Scatter,
                mode: Some("markers".to_string()),
                legendgroup: name.clone(),
                showlegend: true,
                orientation: "v".to_string(),
                x: column_values(rows.iter().copied(), x),
                y: Some(column_values(rows.iter().copied(), y)),
                xaxis: "x".to_string(),
                yaxis: "y".to_string(),
                marker: Marker {
                    color: MarkerColor::Fixed(palette_color(i)),
                    coloraxis: None,
                    symbol: Some("circle".to_string()),
                },
                hovertemplate: format!(
                    "{color_label}={name}<br>{x_label}=%{{x}}<br>{y_label}=%{{y}}<extra></extra>"
                ),
                name,
                alignmentgroup: None,
                offsetgroup: None,
                bingroup: None,
            })
            .collect()
    };

    let (legend, coloraxis) = if continuous {
        (None, Some(ColorAxis::new(color_label)))
    } else {
        (Some(legend(color_label)), None)
    };

    Ok(Figure {
        data,
        layout: Layout {
            title: Title::new(text.title),
            xaxis: Axis::new("y", x_label),
            yaxis: Axis::new("x", y_label),
            legend,
            coloraxis,
            margin: Margin { t: 60 },
            barmode: None,
        },
    })
}

fn histogram_figure(
    dataset: &Dataset,
    column: &str,
    color: &str,
    text: ChartText,
) -> Result<Figure, ChartError> {
    for name in [column, color] {
        dataset.column(name)?;
    }
    let records = dataset.to_records()?;

    let (x_label, color_label) = (text.label(column), text.label(color));

    let data = group_by(&records, color)
        .into_iter()
        .enumerate()
        .map(|(i, (name, rows))| Trace {
            trace_type: TraceType::Histogram,
            mode: None,
            legendgroup: name.clone(),
            showlegend: true,
            orientation: "v".to_string(),
            x: column_values(rows.iter().copied(), column),
            y: None,
            xaxis: "x".to_string(),
            yaxis: "y".to_string(),
            marker: Marker {
                color: MarkerColor::Fixed(palette_color(i)),
                coloraxis: None,
                symbol: None,
            },
            hovertemplate: format!(
                "{color_label}={name}<br>{x_label}=%{{x}}<br>{COUNT_LABEL}=%{{y}}<extra></extra>"
            ),
            alignmentgroup: Some("True".to_string()),
            offsetgroup: Some(name.clone()),
            bingroup: Some("x".to_string()),
            name,
        })
        .collect();

    Ok(Figure {
        data,
        layout: Layout {
            title: Title::new(text.title),
            xaxis: Axis::new("y", x_label),
            yaxis: Axis::new("x", COUNT_LABEL),
            legend: Some(legend(color_label)),
            coloraxis: None,
            margin: Margin { t: 60 },
            barmode: Some("relative".to_string()),
        },
    })
}

/// Group rows by the display form of `column`, in order of first appearance.
fn group_by<'a>(records: &'a [Record], column: &str) -> Vec<(String, Vec<&'a Record>)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(String, Vec<&'a Record>)> = Vec::new();

    for record in records {
        let key = display_value(record.get(column).unwrap_or(&Value::Null));
        match index.get(&key) {
            Some(&i) => groups[i].1.push(record),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![record]));
            }
        }
    }

    groups
}

fn column_values<'a>(records: impl IntoIterator<Item = &'a Record>, column: &str) -> Vec<Value> {
    records
        .into_iter()
        .map(|r| r.get(column).cloned().unwrap_or(Value::Null))
        .collect()
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn palette_color(i: usize) -> String {
    QUALITATIVE_PALETTE[i % QUALITATIVE_PALETTE.len()].to_string()
}

fn legend(title: &str) -> Legend {
    Legend {
        title: Title::new(title),
        tracegroupgap: 0,
    }
}
