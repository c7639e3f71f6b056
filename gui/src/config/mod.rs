// GUI configuration, embedded from assets/config/default.json
pub mod theme;

use anyhow::Context;
use engine::config::settings::{ChartStyle, EngineSettings, ProviderSettings};
use serde::Deserialize;
use shared::models::DashboardRequest;

pub use theme::ThemePalette;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppConfig {
    pub version: String,
    pub app: AppSettings,
    #[serde(default)]
    pub provider: ProviderSettings,
    #[serde(default)]
    pub chart: ChartStyle,
    /// Initial sidebar values.
    #[serde(default)]
    pub dashboard: DashboardRequest,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AppSettings {
    pub title: String,
    /// "dark" or "light"
    pub theme: String,
    pub window: WindowSettings,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct WindowSettings {
    pub width: f64,
    pub height: f64,
}

impl AppConfig {
    pub fn load_default() -> anyhow::Result<Self> {
        Self::from_json(include_str!("../../assets/config/default.json"))
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        serde_json::from_str(content).context("Failed to parse GUI configuration")
    }

    /// Engine settings from this config, with `DASHBOARD_*` environment overrides applied.
    pub fn engine_settings(&self) -> anyhow::Result<EngineSettings> {
        let mut provider = self.provider.clone();
        provider.apply_env()?;
        Ok(EngineSettings {
            provider,
            chart: self.chart.clone(),
        })
    }

    pub fn palette(&self) -> ThemePalette {
        ThemePalette::by_name(&self.app.theme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::config::settings::ProviderKind;
    use shared::models::Period;

    #[test]
    fn test_embedded_default_config() {
        let config = AppConfig::load_default().unwrap();
        assert_eq!(config.app.title, "Stock Dashboard");
        assert_eq!(config.provider.kind, ProviderKind::Yahoo);
        assert_eq!(config.chart, ChartStyle::default());
        assert_eq!(config.dashboard, DashboardRequest::default());
        assert_eq!(config.dashboard.period, Period::OneYear);
    }

    #[test]
    fn test_sections_default_when_missing() {
        let config = AppConfig::from_json(
            r#"{"version": "1", "app": {"title": "T", "theme": "dark", "window": {"width": 800, "height": 600}}}"#,
        )
        .unwrap();
        assert_eq!(config.provider, ProviderSettings::default());
        assert_eq!(config.dashboard.ticker, "AAPL");
        assert_eq!(config.palette(), ThemePalette::default_dark());
    }

    #[test]
    fn test_malformed_config_is_error() {
        assert!(AppConfig::from_json("{\"version\": 1}").is_err());
    }
}
