// Engine settings, loaded from an optional JSON file and overridden by environment variables
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Yahoo,
    Csv,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    /// Base URL of the chart (price history) API.
    pub chart_url: String,
    /// Base URL of the quote-summary (fundamentals) API.
    pub summary_url: String,
    /// Visited once to obtain the session cookie the summary API's crumb is tied to.
    pub cookie_url: String,
    pub user_agent: String,
    /// Directory of `<TICKER>.csv` files for the offline provider.
    pub csv_dir: PathBuf,
    /// No timeout unless explicitly configured.
    pub request_timeout_secs: Option<u64>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Yahoo,
            chart_url: "https://query1.finance.yahoo.com".to_string(),
            summary_url: "https://query2.finance.yahoo.com".to_string(),
            cookie_url: "https://fc.yahoo.com".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
            csv_dir: PathBuf::from("data"),
            request_timeout_secs: None,
        }
    }
}

impl ProviderSettings {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Applies `DASHBOARD_*` environment overrides.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(kind) = lookup("DASHBOARD_PROVIDER") {
            self.kind = match kind.trim().to_ascii_lowercase().as_str() {
                "yahoo" => ProviderKind::Yahoo,
                "csv" => ProviderKind::Csv,
                other => anyhow::bail!("DASHBOARD_PROVIDER must be 'yahoo' or 'csv', got '{}'", other),
            };
        }
        if let Some(dir) = lookup("DASHBOARD_CSV_DIR") {
            self.csv_dir = PathBuf::from(dir);
        }
        if let Some(url) = lookup("DASHBOARD_CHART_URL") {
            self.chart_url = url;
        }
        if let Some(url) = lookup("DASHBOARD_SUMMARY_URL") {
            self.summary_url = url;
        }
        if let Some(secs) = lookup("DASHBOARD_TIMEOUT_SECS") {
            let secs = secs
                .trim()
                .parse()
                .with_context(|| format!("DASHBOARD_TIMEOUT_SECS is not a number: '{}'", secs))?;
            self.request_timeout_secs = Some(secs);
        }
        Ok(())
    }
}

/// Colors and sizes of the combined price/volume figure.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ChartStyle {
    pub height: u32,
    pub price_pane_ratio: f64,
    /// Line colors for the first and second moving average.
    pub ma_colors: [String; 2],
    pub ma_line_width: f64,
    pub volume_color: String,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            height: 700,
            price_pane_ratio: 0.8,
            ma_colors: ["orange".to_string(), "red".to_string()],
            ma_line_width: 2.0,
            volume_color: "lightblue".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct EngineSettings {
    pub provider: ProviderSettings,
    pub chart: ChartStyle,
}

impl EngineSettings {
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file '{}'", path.display()))?;
        let settings = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse settings file '{}'", path.display()))?;
        Ok(settings)
    }

    /// File settings (or defaults when no file is given) with environment overrides applied.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        settings.provider.apply_env()?;
        Ok(settings)
    }
}
