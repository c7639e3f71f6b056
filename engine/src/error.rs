use thiserror::Error;

/// Failures raised by a market data provider while resolving a ticker.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Provider API error: {code} - {description}")]
    Api { code: String, description: String },

    #[error("Invalid ticker symbol: '{0}'")]
    InvalidSymbol(String),

    #[error("Malformed market data: {0}")]
    Data(String),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Series is empty")]
    EmptySeries,

    #[error("No data found for ticker '{ticker}'")]
    EmptyResult { ticker: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Indicator calculation error: {0}")]
    Indicator(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}
