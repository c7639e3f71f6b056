//! Display-ready output of one dashboard request cycle.
//!
//! Everything in here is already formatted for presentation; the GUI and the
//! CLI only lay it out.

use serde::Serialize;
use shared::models::{Bar, Period};

/// A labelled value, optionally with a change indicator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metric {
    pub label: String,
    pub value: String,
    pub delta: Option<String>,
}

impl Metric {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            delta: None,
        }
    }

    pub fn with_delta(mut self, delta: impl Into<String>) -> Self {
        self.delta = Some(delta.into());
        self
    }
}

/// The three cards above the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryCards {
    pub company: Metric,
    pub price: Metric,
    pub market_cap: Metric,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineOverlay {
    pub name: String,
    pub color: String,
    pub width: f64,
    pub window: usize,
    /// Aligned with the candle layer; `None` before the window fills.
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeLayer {
    pub name: String,
    pub color: String,
    pub values: Vec<f64>,
}

/// Candlestick pane with moving-average overlays above a synchronized volume pane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub height: u32,
    /// Share of the height given to the price pane; the rest is volume.
    pub price_pane_ratio: f64,
    pub candles: Vec<Bar>,
    pub overlays: Vec<LineOverlay>,
    pub volume: VolumeLayer,
    pub x_axis_title: String,
    pub price_axis_title: String,
    pub volume_axis_title: String,
    pub show_legend: bool,
    pub range_slider: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsGrid {
    /// Four columns of two metrics each.
    pub columns: Vec<Vec<Metric>>,
}

impl StatsGrid {
    pub fn find(&self, label: &str) -> Option<&Metric> {
        self.columns.iter().flatten().find(|m| m.label == label)
    }
}

/// Tail of the series as text cells, one column per rendered moving average appended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub ticker: String,
    pub company_name: String,
    pub currency: String,
    pub currency_symbol: String,
    pub period: Period,
    pub summary: SummaryCards,
    pub chart: ChartSpec,
    pub stats: StatsGrid,
    pub raw_table: Option<RawTable>,
}

/// What the page shows after a request cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DashboardOutcome {
    /// No ticker entered yet.
    Prompt { message: String },
    Rendered { view: Box<DashboardView> },
    /// The provider returned no bars for the ticker and period.
    NotFound { message: String },
    Failed { message: String, hint: String },
}

impl DashboardOutcome {
    pub fn view(&self) -> Option<&DashboardView> {
        match self {
            DashboardOutcome::Rendered { view } => Some(view.as_ref()),
            _ => None,
        }
    }
}
