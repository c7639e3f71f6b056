// Market data sources: the provider abstraction and its implementations
pub mod csv_parser;
pub mod provider;
pub mod yahoo;

pub use csv_parser::CsvDirectoryProvider;
pub use provider::{provider_from_settings, MarketDataProvider, Quote};
pub use yahoo::YahooProvider;
