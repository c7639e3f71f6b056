use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One OHLCV row of a daily price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("bar timestamps must strictly increase (violated at index {index})")]
pub struct SeriesOrderError {
    pub index: usize,
}

/// Chronological sequence of bars exactly as delivered by the data source.
///
/// Construction checks that timestamps strictly increase; bars are never
/// re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    bars: Vec<Bar>,
}

impl Series {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn try_from_bars(bars: Vec<Bar>) -> Result<Self, SeriesOrderError> {
        if let Some(pos) = bars
            .windows(2)
            .position(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(SeriesOrderError { index: pos + 1 });
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    /// The last `n` bars (all of them when the series is shorter).
    pub fn tail(&self, n: usize) -> &[Bar] {
        let start = self.bars.len().saturating_sub(n);
        &self.bars[start..]
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.bars.iter().map(|b| b.close)
    }
}

/// Sparse facts about the instrument. Every field may be missing and must be
/// shown as "not available" rather than defaulted.
///
/// Field names follow the provider's quote-info keys so sidecar JSON files
/// and provider payloads deserialize directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fundamentals {
    #[serde(rename = "longName", default)]
    pub long_name: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(rename = "marketCap", default)]
    pub market_cap: Option<f64>,
    #[serde(rename = "trailingPE", default)]
    pub trailing_pe: Option<f64>,
    #[serde(rename = "dividendYield", default)]
    pub dividend_yield: Option<f64>,
    #[serde(default)]
    pub beta: Option<f64>,
}

impl Fundamentals {
    /// Currency code, falling back to USD when the provider omits it.
    pub fn currency_or_default(&self) -> &str {
        self.currency.as_deref().unwrap_or("USD")
    }
}

/// Display period offered in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
}

impl Period {
    pub const ALL: [Period; 8] = [
        Period::OneDay,
        Period::FiveDays,
        Period::OneMonth,
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::TwoYears,
        Period::FiveYears,
    ];

    /// Range code understood by the market data provider.
    pub fn code(&self) -> &'static str {
        match self {
            Period::OneDay => "1d",
            Period::FiveDays => "5d",
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::OneDay => "1 day",
            Period::FiveDays => "5 days",
            Period::OneMonth => "1 month",
            Period::ThreeMonths => "3 months",
            Period::SixMonths => "6 months",
            Period::OneYear => "1 year",
            Period::TwoYears => "2 years",
            Period::FiveYears => "5 years",
        }
    }

    /// Calendar start of the window ending at `end`. Bars strictly after this
    /// instant belong to the period.
    pub fn lookback_start(&self, end: DateTime<Utc>) -> DateTime<Utc> {
        let months = match self {
            Period::OneDay => return end - Duration::days(1),
            Period::FiveDays => return end - Duration::days(5),
            Period::OneMonth => 1,
            Period::ThreeMonths => 3,
            Period::SixMonths => 6,
            Period::OneYear => 12,
            Period::TwoYears => 24,
            Period::FiveYears => 60,
        };
        end.checked_sub_months(Months::new(months))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

impl Default for Period {
    fn default() -> Self {
        Period::OneYear
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown period '{0}' (expected one of 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y)")]
pub struct ParsePeriodError(pub String);

impl FromStr for Period {
    type Err = ParsePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::ALL
            .into_iter()
            .find(|p| p.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParsePeriodError(s.to_string()))
    }
}

pub const MIN_MA_WINDOW: usize = 1;
pub const MAX_MA_WINDOW: usize = 200;

/// Everything the sidebar controls, captured as one immutable value per
/// request cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardRequest {
    pub ticker: String,
    pub ma_window_1: usize,
    pub ma_window_2: usize,
    pub show_moving_averages: bool,
    pub period: Period,
    pub show_raw_data: bool,
}

impl Default for DashboardRequest {
    fn default() -> Self {
        Self {
            ticker: "AAPL".to_string(),
            ma_window_1: 20,
            ma_window_2: 50,
            show_moving_averages: true,
            period: Period::OneYear,
            show_raw_data: false,
        }
    }
}

impl DashboardRequest {
    /// Ticker with surrounding whitespace removed.
    pub fn symbol(&self) -> &str {
        self.ticker.trim()
    }

    pub fn validate(&self) -> Result<(), String> {
        for (name, window) in [
            ("moving-average window 1", self.ma_window_1),
            ("moving-average window 2", self.ma_window_2),
        ] {
            if !(MIN_MA_WINDOW..=MAX_MA_WINDOW).contains(&window) {
                return Err(format!(
                    "{} must be between {} and {}, got {}",
                    name, MIN_MA_WINDOW, MAX_MA_WINDOW, window
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn bar_at(day: u32, close: f64) -> Bar {
        Bar {
            timestamp: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            open: close,
            high: close,
            low: close,
            close,
            volume: 0.0,
        }
    }

    #[test]
    fn test_series_accepts_increasing_timestamps() {
        let series = Series::try_from_bars(vec![bar_at(1, 1.0), bar_at(2, 2.0), bar_at(3, 3.0)]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.last().unwrap().close, 3.0);
    }

    #[test]
    fn test_series_rejects_duplicate_timestamp() {
        let err = Series::try_from_bars(vec![bar_at(1, 1.0), bar_at(2, 2.0), bar_at(2, 2.5)]).unwrap_err();
        assert_eq!(err.index, 2);
    }

    #[test]
    fn test_series_rejects_out_of_order() {
        let err = Series::try_from_bars(vec![bar_at(3, 1.0), bar_at(1, 2.0)]).unwrap_err();
        assert_eq!(err.index, 1);
    }

    #[test]
    fn test_series_tail() {
        let bars: Vec<Bar> = (1..=5).map(|d| bar_at(d, d as f64)).collect();
        let series = Series::try_from_bars(bars).unwrap();
        let tail = series.tail(2);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].close, 4.0);
        assert_eq!(series.tail(10).len(), 5);
    }

    #[test]
    fn test_period_parse_and_code() {
        for period in Period::ALL {
            assert_eq!(period.code().parse::<Period>().unwrap(), period);
        }
        assert_eq!(" 1Y ".parse::<Period>().unwrap(), Period::OneYear);
        assert!("10y".parse::<Period>().is_err());
    }

    #[test]
    fn test_period_lookback() {
        let end = Utc.with_ymd_and_hms(2024, 3, 31, 0, 0, 0).unwrap();
        assert_eq!(
            Period::OneMonth.lookback_start(end),
            Utc.with_ymd_and_hms(2024, 2, 29, 0, 0, 0).unwrap()
        );
        assert_eq!(
            Period::FiveDays.lookback_start(end),
            Utc.with_ymd_and_hms(2024, 3, 26, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_fundamentals_sparse_json() {
        let f: Fundamentals = serde_json::from_str(r#"{"longName":"Toyota","currency":"JPY","marketCap":2.5e13}"#).unwrap();
        assert_eq!(f.long_name.as_deref(), Some("Toyota"));
        assert_eq!(f.market_cap, Some(2.5e13));
        assert_eq!(f.beta, None);
        assert_eq!(Fundamentals::default().currency_or_default(), "USD");
    }

    #[test]
    fn test_request_defaults_and_validation() {
        let request = DashboardRequest::default();
        assert_eq!(request.ticker, "AAPL");
        assert_eq!((request.ma_window_1, request.ma_window_2), (20, 50));
        assert!(request.show_moving_averages);
        assert_eq!(request.period, Period::OneYear);
        assert!(!request.show_raw_data);
        assert!(request.validate().is_ok());

        let bad = DashboardRequest { ma_window_2: 201, ..DashboardRequest::default() };
        assert!(bad.validate().is_err());
        let zero = DashboardRequest { ma_window_1: 0, ..DashboardRequest::default() };
        assert!(zero.validate().is_err());
    }
}
