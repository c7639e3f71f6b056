use super::provider::{validate_symbol, MarketDataProvider, Quote};
use crate::error::ProviderError;
use async_trait::async_trait;
use csv::{ReaderBuilder, StringRecord, Trim};
use shared::models::{Bar, Fundamentals, Period, Series};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

// Number and date handling for exported daily price histories
pub mod price_format {
    use anyhow::{anyhow, Result};
    use chrono::{DateTime, NaiveDate, Utc};

    // Parses "1234.56" or "1,234.56" into f64
    pub fn parse_decimal(s: &str) -> Result<f64> {
        let normalized = s.trim().replace(',', "");
        normalized
            .parse::<f64>()
            .map_err(|e| anyhow!("Failed to parse decimal '{}': {}", s, e))
    }

    // Accepts RFC 3339, "YYYY-MM-DD HH:MM:SS+HH:MM" (pandas export) or a bare "YYYY-MM-DD" (midnight UTC)
    pub fn parse_date(s: &str) -> Result<DateTime<Utc>> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z") {
            return Ok(dt.with_timezone(&Utc));
        }
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| anyhow!("Failed to parse date '{}': {}", s, e))?;
        Ok(date.and_hms_opt(0, 0, 0).ok_or_else(|| anyhow!("Invalid date '{}'", s))?.and_utc())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use chrono::{Datelike, Timelike};

        #[test]
        fn test_parse_decimal() {
            assert_eq!(parse_decimal("187.44").unwrap(), 187.44);
            assert_eq!(parse_decimal(" 1,234,567 ").unwrap(), 1234567.0);
            assert!(parse_decimal("n/a").is_err());
        }

        #[test]
        fn test_parse_date_formats() {
            let plain = parse_date("2024-01-02").unwrap();
            assert_eq!((plain.year(), plain.month(), plain.day(), plain.hour()), (2024, 1, 2, 0));

            let pandas = parse_date("2024-01-02 00:00:00-05:00").unwrap();
            assert_eq!(pandas.hour(), 5);

            let rfc = parse_date("2024-01-02T14:30:00Z").unwrap();
            assert_eq!((rfc.hour(), rfc.minute()), (14, 30));
        }

        #[test]
        fn test_parse_date_invalid() {
            assert!(parse_date("02/01/2024").is_err());
            assert!(parse_date("2024-13-01").is_err());
        }
    }
}

pub struct DailyCsvParser;

impl DailyCsvParser {
    // Header: Date,Open,High,Low,Close,Volume[,Dividends,Stock Splits,...]
    // Example Row: 2024-01-02 00:00:00-05:00,187.15,188.44,183.89,185.64,82488700
    pub fn load_bars_from_csv(file_path: &Path) -> Result<Vec<Bar>, ProviderError> {
        let file = File::open(file_path)?;
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(BufReader::new(file));

        let headers = rdr.headers()?.clone();
        let mut bars = Vec::new();

        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record = result?;

            let timestamp = price_format::parse_date(Self::require(&record, &headers, "Date", line)?)
                .map_err(|e| ProviderError::Data(format!("Error parsing 'Date' at line {}: {}", line, e)))?;

            bars.push(Bar {
                timestamp,
                open: Self::number(&record, &headers, "Open", line)?,
                high: Self::number(&record, &headers, "High", line)?,
                low: Self::number(&record, &headers, "Low", line)?,
                close: Self::number(&record, &headers, "Close", line)?,
                volume: Self::number(&record, &headers, "Volume", line)?,
            });
        }
        Ok(bars)
    }

    fn require<'a>(
        record: &'a StringRecord,
        headers: &StringRecord,
        name: &str,
        line: usize,
    ) -> Result<&'a str, ProviderError> {
        Self::get_field(record, headers, name)
            .ok_or_else(|| ProviderError::Data(format!("Missing '{}' field in CSV record at line {}", name, line)))
    }

    fn number(record: &StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<f64, ProviderError> {
        price_format::parse_decimal(Self::require(record, headers, name, line)?)
            .map_err(|e| ProviderError::Data(format!("Error parsing '{}' at line {}: {}", name, line, e)))
    }

    // Header lookup is case-insensitive so exports from different tools line up.
    fn get_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str) -> Option<&'a str> {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
            .and_then(|pos| record.get(pos))
    }
}

/// Offline provider reading `<TICKER>.csv` (and an optional `<TICKER>.json`
/// fundamentals file) from a directory.
pub struct CsvDirectoryProvider {
    dir: PathBuf,
}

impl CsvDirectoryProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn load_fundamentals(&self, ticker: &str) -> Fundamentals {
        let path = self.dir.join(format!("{}.json", ticker));
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(_) => return Fundamentals::default(),
        };
        serde_json::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring malformed fundamentals file");
            Fundamentals::default()
        })
    }
}

/// Keeps the bars inside `period`, measured back from the newest bar.
fn within_period(bars: Vec<Bar>, period: Period) -> Vec<Bar> {
    let Some(end) = bars.last().map(|b| b.timestamp) else {
        return bars;
    };
    let start = period.lookback_start(end);
    bars.into_iter().filter(|b| b.timestamp > start).collect()
}

#[async_trait]
impl MarketDataProvider for CsvDirectoryProvider {
    fn name(&self) -> &str {
        "csv"
    }

    async fn fetch(&self, ticker: &str, period: Period) -> Result<Quote, ProviderError> {
        validate_symbol(ticker)?;
        let path = self.dir.join(format!("{}.csv", ticker));
        if !path.is_file() {
            tracing::info!(ticker, path = %path.display(), "No CSV history for ticker");
            return Ok(Quote::empty());
        }
        tracing::info!(ticker, period = %period, path = %path.display(), "Loading price history from CSV");

        let bars = DailyCsvParser::load_bars_from_csv(&path)?;
        let series = Series::try_from_bars(within_period(bars, period))
            .map_err(|e| ProviderError::Data(format!("{}: {}", path.display(), e)))?;

        Ok(Quote {
            series,
            fundamentals: self.load_fundamentals(ticker),
        })
    }
}
