// Engine command-line entry point: runs one dashboard request and prints the result
use anyhow::Context;
use clap::Parser;
use engine::config::settings::EngineSettings;
use engine::data::provider_from_settings;
use engine::models::{DashboardOutcome, DashboardView};
use engine::services::DashboardService;
use shared::models::{DashboardRequest, Period};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "engine", about = "Stock dashboard for a single ticker", version)]
struct Cli {
    /// Ticker symbol, e.g. AAPL or 7203.T
    #[arg(long, default_value = "AAPL")]
    ticker: String,

    /// Display period: 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y or 5y
    #[arg(long, default_value_t = Period::OneYear)]
    period: Period,

    /// First moving-average window in days
    #[arg(long, default_value_t = 20)]
    ma1: usize,

    /// Second moving-average window in days
    #[arg(long, default_value_t = 50)]
    ma2: usize,

    /// Hide the moving averages
    #[arg(long)]
    no_ma: bool,

    /// Include the last rows of the series
    #[arg(long)]
    raw: bool,

    /// Print the outcome as JSON instead of a text report
    #[arg(long)]
    json: bool,

    /// Settings file (JSON); DASHBOARD_* environment variables override it
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    fn request(&self) -> DashboardRequest {
        DashboardRequest {
            ticker: self.ticker.clone(),
            ma_window_1: self.ma1,
            ma_window_2: self.ma2,
            show_moving_averages: !self.no_ma,
            period: self.period,
            show_raw_data: self.raw,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    let settings = EngineSettings::load(cli.config.as_deref()).context("Failed to load settings")?;
    let provider =
        provider_from_settings(&settings.provider).context("Failed to create market data provider")?;
    let service = DashboardService::new(provider).with_style(settings.chart);

    let request = cli.request();
    info!(ticker = %request.symbol(), period = %request.period, "Starting dashboard request");
    let outcome = service.run(&request).await;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_report(&outcome);
    }
    Ok(())
}

fn print_report(outcome: &DashboardOutcome) {
    match outcome {
        DashboardOutcome::Prompt { message } => println!("{}", message),
        DashboardOutcome::NotFound { message } => println!("{}", message),
        DashboardOutcome::Failed { message, hint } => {
            println!("{}", message);
            println!("{}", hint);
        }
        DashboardOutcome::Rendered { view } => print_view(view),
    }
}

fn print_view(view: &DashboardView) {
    println!("{}", view.chart.title);
    println!("{}", "=".repeat(view.chart.title.chars().count()));

    let cards = &view.summary;
    for card in [&cards.company, &cards.price, &cards.market_cap] {
        match &card.delta {
            Some(delta) => println!("{:<20} {} ({})", card.label, card.value, delta),
            None => println!("{:<20} {}", card.label, card.value),
        }
    }

    println!();
    println!("{} bars, period {}", view.chart.candles.len(), view.period.label());
    for overlay in &view.chart.overlays {
        let latest = overlay.values.iter().rev().flatten().next();
        match latest {
            Some(v) => println!("{:<20} {:.2}", overlay.name, v),
            None => println!("{:<20} {}", overlay.name, engine::analytics::NOT_AVAILABLE),
        }
    }

    println!();
    for metric in view.stats.columns.iter().flatten() {
        println!("{:<20} {}", metric.label, metric.value);
    }

    if let Some(table) = &view.raw_table {
        println!();
        println!("{}", table.columns.join("\t"));
        for row in &table.rows {
            println!("{}", row.join("\t"));
        }
    }
}
