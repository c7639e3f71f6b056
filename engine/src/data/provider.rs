//! Market data provider abstraction.
//!
//! A [`MarketDataProvider`] resolves a ticker symbol and a display period into
//! a [`Quote`]: the chronological daily series plus whatever fundamentals the
//! source knows about. An unknown ticker is not an error; it yields a quote
//! with an empty series.

use crate::config::settings::{ProviderKind, ProviderSettings};
use crate::data::csv_parser::CsvDirectoryProvider;
use crate::data::yahoo::YahooProvider;
use crate::error::ProviderError;
use async_trait::async_trait;
use shared::models::{Fundamentals, Period, Series};
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Quote {
    pub series: Series,
    pub fundamentals: Fundamentals,
}

impl Quote {
    pub fn empty() -> Self {
        Self::default()
    }
}

#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    async fn fetch(&self, ticker: &str, period: Period) -> Result<Quote, ProviderError>;
}

/// Rejects symbols no exchange would issue before any lookup is attempted.
/// Accepts ASCII alphanumerics plus `.`, `-`, `^` and `=` (e.g. `7203.T`, `^N225`, `EURUSD=X`).
pub fn validate_symbol(ticker: &str) -> Result<(), ProviderError> {
    let valid = !ticker.is_empty()
        && ticker.len() <= 32
        && ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));
    if valid {
        Ok(())
    } else {
        Err(ProviderError::InvalidSymbol(ticker.to_string()))
    }
}

/// Builds the provider selected by the settings.
pub fn provider_from_settings(
    settings: &ProviderSettings,
) -> Result<Arc<dyn MarketDataProvider>, ProviderError> {
    let provider: Arc<dyn MarketDataProvider> = match settings.kind {
        ProviderKind::Yahoo => Arc::new(YahooProvider::from_settings(settings)?),
        ProviderKind::Csv => Arc::new(CsvDirectoryProvider::new(&settings.csv_dir)),
    };
    tracing::info!(provider = provider.name(), "Market data provider ready");
    Ok(provider)
}
