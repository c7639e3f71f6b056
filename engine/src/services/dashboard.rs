// One dashboard request cycle: fetch, derive, format.
use crate::analytics::format::{
    currency_symbol, format_currency, format_decimal, format_dividend_yield, format_grouped,
    format_market_cap, format_percent,
};
use crate::analytics::stats::{
    annualized_volatility, extremes, latest_price_and_delta, mean_volume, period_return,
};
use crate::config::settings::ChartStyle;
use crate::data::provider::{MarketDataProvider, Quote};
use crate::error::EngineError;
use crate::indicators::{IndicatorCalculator, Sma};
use crate::models::view::{
    ChartSpec, DashboardOutcome, DashboardView, LineOverlay, Metric, RawTable, StatsGrid,
    SummaryCards, VolumeLayer,
};
use shared::models::{DashboardRequest, Series};
use std::sync::Arc;

pub const ENTER_TICKER_MESSAGE: &str = "Enter a ticker symbol in the sidebar.";
pub const NO_DATA_MESSAGE: &str = "No data found. Please check the ticker symbol.";
pub const SYMBOL_HINT: &str =
    "Example ticker symbols: AAPL, GOOGL, MSFT, 7203.T (add .T for Japanese stocks)";
pub const RAW_TABLE_ROWS: usize = 20;

/// Moving-average lines to draw for this request.
///
/// A window longer than the series is skipped entirely, and the second
/// window is skipped when it equals the first.
pub fn moving_average_overlays(
    series: &Series,
    request: &DashboardRequest,
    style: &ChartStyle,
) -> Result<Vec<LineOverlay>, EngineError> {
    if !request.show_moving_averages {
        return Ok(Vec::new());
    }

    let mut windows = vec![(request.ma_window_1, &style.ma_colors[0])];
    if request.ma_window_2 != request.ma_window_1 {
        windows.push((request.ma_window_2, &style.ma_colors[1]));
    }

    let mut overlays = Vec::new();
    for (window, color) in windows {
        if series.len() < window {
            tracing::debug!(window, bars = series.len(), "Not enough history for moving average");
            continue;
        }
        let sma = Sma::new(window)?;
        overlays.push(LineOverlay {
            name: format!("{}-day MA", sma.period()),
            color: color.clone(),
            width: style.ma_line_width,
            window,
            values: sma.calculate(series.bars()),
        });
    }
    Ok(overlays)
}

fn raw_table(series: &Series, overlays: &[LineOverlay]) -> RawTable {
    let mut columns: Vec<String> = ["Date", "Open", "High", "Low", "Close", "Volume"]
        .iter()
        .map(|c| c.to_string())
        .collect();
    columns.extend(overlays.iter().map(|o| o.name.clone()));

    let tail = series.tail(RAW_TABLE_ROWS);
    let offset = series.len() - tail.len();
    let rows = tail
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let mut row = vec![
                bar.timestamp.format("%Y-%m-%d").to_string(),
                format!("{:.2}", bar.open),
                format!("{:.2}", bar.high),
                format!("{:.2}", bar.low),
                format!("{:.2}", bar.close),
                format_grouped(Some(bar.volume)),
            ];
            row.extend(
                overlays
                    .iter()
                    .map(|o| format_decimal(o.values.get(offset + i).copied().flatten(), 2)),
            );
            row
        })
        .collect();

    RawTable { columns, rows }
}

/// Builds the whole page for a fetched quote. Pure: no I/O, inputs untouched.
pub fn render(
    request: &DashboardRequest,
    quote: &Quote,
    style: &ChartStyle,
) -> Result<DashboardView, EngineError> {
    let ticker = request.symbol().to_string();
    let series = &quote.series;
    if series.is_empty() {
        return Err(EngineError::EmptyResult { ticker });
    }

    let fundamentals = &quote.fundamentals;
    let currency = fundamentals.currency_or_default();
    let symbol = currency_symbol(currency);
    let company_name = fundamentals.long_name.clone().unwrap_or_else(|| ticker.clone());

    let price = latest_price_and_delta(series)?;
    let (high, low) = extremes(series)?;

    let summary = SummaryCards {
        company: Metric::new("Company", company_name.clone()),
        price: Metric::new("Current price", format_currency(price.current, currency))
            .with_delta(format_decimal(Some(price.delta), 2)),
        market_cap: Metric::new("Market cap", format_market_cap(fundamentals.market_cap, currency)),
    };

    let overlays = moving_average_overlays(series, request, style)?;

    let stats = StatsGrid {
        columns: vec![
            vec![
                Metric::new("High", format_currency(high, currency)),
                Metric::new("Low", format_currency(low, currency)),
            ],
            vec![
                Metric::new("Annual volatility", format_percent(annualized_volatility(series), 1)),
                Metric::new("Average volume", format_grouped(mean_volume(series))),
            ],
            vec![
                Metric::new(
                    format!("{} return", request.period.label()),
                    format_percent(period_return(series), 1),
                ),
                Metric::new("P/E ratio", format_decimal(fundamentals.trailing_pe, 1)),
            ],
            vec![
                Metric::new("Dividend yield", format_dividend_yield(fundamentals.dividend_yield)),
                Metric::new("Beta", format_decimal(fundamentals.beta, 2)),
            ],
        ],
    };

    let raw_table = request.show_raw_data.then(|| raw_table(series, &overlays));

    let chart = ChartSpec {
        title: format!("{} - {}", ticker, company_name),
        height: style.height,
        price_pane_ratio: style.price_pane_ratio,
        candles: series.bars().to_vec(),
        overlays,
        volume: VolumeLayer {
            name: "Volume".to_string(),
            color: style.volume_color.clone(),
            values: series.bars().iter().map(|b| b.volume).collect(),
        },
        x_axis_title: "Date".to_string(),
        price_axis_title: format!("Price ({})", symbol),
        volume_axis_title: "Volume".to_string(),
        show_legend: true,
        range_slider: false,
    };

    Ok(DashboardView {
        ticker,
        company_name,
        currency: currency.to_string(),
        currency_symbol: symbol.to_string(),
        period: request.period,
        summary,
        chart,
        stats,
        raw_table,
    })
}

impl DashboardOutcome {
    /// Converts a failed request cycle into the inline message shown on the page.
    pub fn from_error(err: EngineError) -> Self {
        match err {
            EngineError::EmptyResult { ticker } => {
                tracing::info!(%ticker, "No data for ticker");
                DashboardOutcome::NotFound {
                    message: NO_DATA_MESSAGE.to_string(),
                }
            }
            other => {
                tracing::error!(error = %other, "Dashboard request failed");
                DashboardOutcome::Failed {
                    message: format!("An error occurred: {}", other),
                    hint: SYMBOL_HINT.to_string(),
                }
            }
        }
    }
}

/// Runs request cycles against a market data provider.
pub struct DashboardService {
    provider: Arc<dyn MarketDataProvider>,
    style: ChartStyle,
}

impl DashboardService {
    pub fn new(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            provider,
            style: ChartStyle::default(),
        }
    }

    pub fn with_style(mut self, style: ChartStyle) -> Self {
        self.style = style;
        self
    }

    /// Never fails: every error ends up as an inline outcome.
    pub async fn run(&self, request: &DashboardRequest) -> DashboardOutcome {
        if request.symbol().is_empty() {
            return DashboardOutcome::Prompt {
                message: ENTER_TICKER_MESSAGE.to_string(),
            };
        }
        match self.try_run(request).await {
            Ok(view) => DashboardOutcome::Rendered { view: Box::new(view) },
            Err(err) => DashboardOutcome::from_error(err),
        }
    }

    async fn try_run(&self, request: &DashboardRequest) -> Result<DashboardView, EngineError> {
        request.validate().map_err(EngineError::InvalidRequest)?;
        tracing::info!(
            ticker = %request.symbol(),
            period = %request.period,
            provider = self.provider.name(),
            "Running dashboard request"
        );
        let quote = self.provider.fetch(request.symbol(), request.period).await?;
        render(request, &quote, &self.style)
    }
}
