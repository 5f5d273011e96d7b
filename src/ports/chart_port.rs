//! Chart rendering port trait.

use std::path::PathBuf;

use chrono::NaiveDate;

use crate::domain::error::TrendguardError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartLine {
    pub label: String,
    pub style: LineStyle,
    /// One value per chart date; `None` where the line is undefined.
    pub values: Vec<Option<f64>>,
}

/// An instrument plotted against a risk gauge on a shared date axis.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonChart {
    pub symbol: String,
    pub title: String,
    pub dates: Vec<NaiveDate>,
    /// Price and SMA lines on the left axis.
    pub left: Vec<ChartLine>,
    /// Gauge and percentile bands on the right axis.
    pub right: Vec<ChartLine>,
    /// Horizontal reference line on the right axis.
    pub threshold: Option<f64>,
}

pub trait ChartPort {
    /// Render the chart and return where it was written.
    fn render(&self, chart: &ComparisonChart) -> Result<PathBuf, TrendguardError>;
}
