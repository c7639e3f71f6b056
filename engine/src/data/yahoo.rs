//! Yahoo Finance market data provider.
//!
//! Price history comes from the v8 chart API, auto-adjusted for splits and
//! dividends. Fundamentals come from the v10 quote-summary API, which needs a
//! session cookie plus crumb; they are best effort. When the summary call
//! fails the quote still carries the currency and name reported by the chart
//! metadata.

use super::provider::{validate_symbol, MarketDataProvider, Quote};
use crate::config::settings::ProviderSettings;
use crate::error::ProviderError;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use shared::models::{Bar, Fundamentals, Period, Series};
use tokio::sync::Mutex;

const SUMMARY_MODULES: &str = "price,summaryDetail,defaultKeyStatistics";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    result: Option<Vec<ChartData>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
struct YahooError {
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    currency: Option<String>,
    long_name: Option<String>,
    short_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
    /// Split- and dividend-adjusted closes; absent for some instruments.
    #[serde(default)]
    adjclose: Vec<AdjCloseData>,
}

#[derive(Debug, Default, Deserialize)]
struct AdjCloseData {
    #[serde(default)]
    adjclose: Vec<Option<f64>>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResponse {
    quote_summary: SummaryEnvelope,
}

#[derive(Debug, Deserialize)]
struct SummaryEnvelope {
    result: Option<Vec<SummaryResult>>,
    error: Option<YahooError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryResult {
    price: Option<PriceModule>,
    summary_detail: Option<SummaryDetail>,
    default_key_statistics: Option<KeyStatistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceModule {
    long_name: Option<String>,
    short_name: Option<String>,
    currency: Option<String>,
    market_cap: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryDetail {
    currency: Option<String>,
    market_cap: Option<RawValue>,
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<RawValue>,
    dividend_yield: Option<RawValue>,
    beta: Option<RawValue>,
}

#[derive(Debug, Deserialize)]
struct KeyStatistics {
    beta: Option<RawValue>,
}

/// Yahoo wraps numbers as `{"raw": 1.23, "fmt": "1.23"}` and sends `{}` when absent.
#[derive(Debug, Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

fn raw(value: Option<RawValue>) -> Option<f64> {
    value.and_then(|v| v.raw)
}

/// Parsed chart payload: `None` when the provider knows nothing about the ticker.
fn parse_chart(response: ChartResponse) -> Result<Option<(ChartMeta, Series)>, ProviderError> {
    if let Some(error) = response.chart.error {
        if error.code.eq_ignore_ascii_case("Not Found") {
            return Ok(None);
        }
        return Err(ProviderError::Api {
            code: error.code,
            description: error.description,
        });
    }

    let Some(data) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(None);
    };
    let quote = data.indicators.quote.into_iter().next().unwrap_or_default();
    let adjusted = data.indicators.adjclose.into_iter().next().map(|a| a.adjclose);

    let mut bars: Vec<Bar> = Vec::with_capacity(data.timestamp.len());
    for (i, &ts) in data.timestamp.iter().enumerate() {
        let field = |v: &Vec<Option<f64>>| v.get(i).copied().flatten();
        let (Some(open), Some(high), Some(low), Some(close), Some(volume)) = (
            field(&quote.open),
            field(&quote.high),
            field(&quote.low),
            field(&quote.close),
            field(&quote.volume),
        ) else {
            tracing::debug!(index = i, timestamp = ts, "Skipping bar with missing fields");
            continue;
        };
        let Some(timestamp) = Utc.timestamp_opt(ts, 0).single() else {
            tracing::debug!(index = i, timestamp = ts, "Skipping bar with invalid timestamp");
            continue;
        };
        if bars.last().is_some_and(|prev| prev.timestamp >= timestamp) {
            tracing::debug!(index = i, timestamp = ts, "Dropping bar whose timestamp does not advance");
            continue;
        }
        // Prices are auto-adjusted: OHLC scaled by adjclose / close.
        let ratio = match &adjusted {
            None => 1.0,
            Some(adj) => match field(adj) {
                Some(adj_close) if close != 0.0 => adj_close / close,
                Some(_) => 1.0,
                None => {
                    tracing::debug!(index = i, timestamp = ts, "Skipping bar without adjusted close");
                    continue;
                }
            },
        };
        bars.push(Bar {
            timestamp,
            open: open * ratio,
            high: high * ratio,
            low: low * ratio,
            close: close * ratio,
            volume,
        });
    }

    let series = Series::try_from_bars(bars).map_err(|e| ProviderError::Data(e.to_string()))?;
    Ok(Some((data.meta, series)))
}

fn parse_summary(response: SummaryResponse) -> Result<Fundamentals, ProviderError> {
    if let Some(error) = response.quote_summary.error {
        return Err(ProviderError::Api {
            code: error.code,
            description: error.description,
        });
    }
    let result = response
        .quote_summary
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| ProviderError::Data("empty quote summary".to_string()))?;

    let (long_name, price_currency, price_cap) = match result.price {
        Some(p) => (p.long_name.or(p.short_name), p.currency, raw(p.market_cap)),
        None => (None, None, None),
    };
    let mut fundamentals = Fundamentals {
        long_name,
        currency: price_currency,
        market_cap: price_cap,
        ..Fundamentals::default()
    };
    if let Some(detail) = result.summary_detail {
        fundamentals.currency = fundamentals.currency.or(detail.currency);
        fundamentals.market_cap = raw(detail.market_cap).or(fundamentals.market_cap);
        fundamentals.trailing_pe = raw(detail.trailing_pe);
        fundamentals.dividend_yield = raw(detail.dividend_yield);
        fundamentals.beta = raw(detail.beta);
    }
    if let Some(stats) = result.default_key_statistics {
        fundamentals.beta = fundamentals.beta.or(raw(stats.beta));
    }
    Ok(fundamentals)
}

/// Fills name and currency from the chart metadata where the summary had none.
fn merge_chart_meta(mut fundamentals: Fundamentals, meta: ChartMeta) -> Fundamentals {
    fundamentals.long_name = fundamentals.long_name.or(meta.long_name).or(meta.short_name);
    fundamentals.currency = fundamentals.currency.or(meta.currency);
    fundamentals
}

pub struct YahooProvider {
    chart_url: Url,
    summary_url: Url,
    cookie_url: Url,
    client: reqwest::Client,
    /// Crumb for the current cookie session; cleared when the API rejects it.
    crumb: Mutex<Option<String>>,
}

impl YahooProvider {
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, ProviderError> {
        let mut builder = reqwest::Client::builder()
            .user_agent(settings.user_agent.clone())
            .cookie_store(true);
        if let Some(timeout) = settings.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            chart_url: parse_base(&settings.chart_url)?,
            summary_url: parse_base(&settings.summary_url)?,
            cookie_url: parse_base(&settings.cookie_url)?,
            client: builder.build()?,
            crumb: Mutex::new(None),
        })
    }

    fn endpoint(base: &Url, path: &[&str]) -> Result<Url, ProviderError> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| ProviderError::Data(format!("'{}' cannot be used as a base URL", base)))?
            .pop_if_empty()
            .extend(path);
        Ok(url)
    }

    fn summary_endpoint(&self, ticker: &str, crumb: &str) -> Result<Url, ProviderError> {
        let mut url = Self::endpoint(&self.summary_url, &["v10", "finance", "quoteSummary", ticker])?;
        url.query_pairs_mut()
            .append_pair("modules", SUMMARY_MODULES)
            .append_pair("crumb", crumb);
        Ok(url)
    }

    async fn fetch_chart(&self, ticker: &str, period: Period) -> Result<ChartResponse, ProviderError> {
        let url = Self::endpoint(&self.chart_url, &["v8", "finance", "chart", ticker])?;
        let response = self
            .client
            .get(url)
            .query(&[("range", period.code()), ("interval", "1d")])
            .send()
            .await?;
        // Unknown tickers come back as 404 with a JSON error body, so the body is parsed regardless of status.
        Ok(response.json().await?)
    }

    /// Cookie/crumb handshake: the cookie host answers with an error status but
    /// still sets the session cookie, which the crumb endpoint then requires.
    async fn crumb(&self) -> Result<String, ProviderError> {
        let mut cached = self.crumb.lock().await;
        if let Some(crumb) = cached.as_ref() {
            return Ok(crumb.clone());
        }

        let _ = self.client.get(self.cookie_url.clone()).send().await?;
        let url = Self::endpoint(&self.summary_url, &["v1", "test", "getcrumb"])?;
        let body = self.client.get(url).send().await?.error_for_status()?.text().await?;
        let crumb = parse_crumb(&body)?;
        tracing::debug!("Obtained Yahoo crumb");

        *cached = Some(crumb.clone());
        Ok(crumb)
    }

    async fn fetch_fundamentals(&self, ticker: &str) -> Result<Fundamentals, ProviderError> {
        let crumb = self.crumb().await?;
        let response = self.client.get(self.summary_endpoint(ticker, &crumb)?).send().await?;
        if matches!(response.status(), StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            // Session expired; the next request cycle redoes the handshake.
            self.crumb.lock().await.take();
        }
        parse_summary(response.error_for_status()?.json().await?)
    }
}

/// The crumb endpoint answers with the bare crumb, or an HTML/JSON error page.
fn parse_crumb(body: &str) -> Result<String, ProviderError> {
    let crumb = body.trim();
    if crumb.is_empty() || crumb.contains(['<', '{', ' ']) {
        return Err(ProviderError::Data(format!("unexpected crumb response: '{}'", crumb)));
    }
    Ok(crumb.to_string())
}

fn parse_base(url: &str) -> Result<Url, ProviderError> {
    Url::parse(url).map_err(|e| ProviderError::Data(format!("invalid provider URL '{}': {}", url, e)))
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo"
    }

    async fn fetch(&self, ticker: &str, period: Period) -> Result<Quote, ProviderError> {
        validate_symbol(ticker)?;
        tracing::info!(ticker, period = %period, "Fetching price history from Yahoo");

        let Some((meta, series)) = parse_chart(self.fetch_chart(ticker, period).await?)? else {
            tracing::info!(ticker, "Yahoo has no chart data for ticker");
            return Ok(Quote::empty());
        };
        if series.is_empty() {
            return Ok(Quote::empty());
        }
        tracing::info!(ticker, bars = series.len(), "Fetched price history");

        let fundamentals = match self.fetch_fundamentals(ticker).await {
            Ok(f) => f,
            Err(e) => {
                tracing::warn!(ticker, error = %e, "Quote summary unavailable, using chart metadata only");
                Fundamentals::default()
            }
        };

        Ok(Quote {
            series,
            fundamentals: merge_chart_meta(fundamentals, meta),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART_JSON: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"currency": "JPY", "symbol": "7203.T", "shortName": "TOYOTA MOTOR CORP"},
                "timestamp": [1704153600, 1704240000, 1704326400, 1704326400, 1704412800],
                "indicators": {"quote": [{
                    "open":   [2800.0, 2810.0, null,   2830.0, 2840.0],
                    "high":   [2820.0, 2830.0, 2840.0, 2850.0, 2860.0],
                    "low":    [2790.0, 2800.0, 2810.0, 2820.0, 2830.0],
                    "close":  [2815.0, 2825.0, 2835.0, 2845.0, 2855.0],
                    "volume": [1000,   2000,   3000,   4000,   5000]
                }]}
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_chart_skips_null_and_repeated_bars() {
        let response: ChartResponse = serde_json::from_str(CHART_JSON).unwrap();
        let (meta, series) = parse_chart(response).unwrap().unwrap();
        assert_eq!(meta.currency.as_deref(), Some("JPY"));
        // Index 2 has a null open; index 3 then becomes the third bar, index 4 is kept.
        let closes: Vec<f64> = series.closes().collect();
        assert_eq!(closes, vec![2815.0, 2825.0, 2845.0, 2855.0]);
        assert_eq!(series.bars()[0].volume, 1000.0);
    }

    #[test]
    fn test_parse_chart_not_found_is_empty() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let response: ChartResponse = serde_json::from_str(body).unwrap();
        assert!(parse_chart(response).unwrap().is_none());
    }

    #[test]
    fn test_parse_chart_other_error() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Bad Request","description":"Invalid input - interval=1d is not supported"}}}"#;
        let response: ChartResponse = serde_json::from_str(body).unwrap();
        match parse_chart(response) {
            Err(ProviderError::Api { code, .. }) => assert_eq!(code, "Bad Request"),
            other => panic!("unexpected: {:?}", other.map(|o| o.map(|(_, s)| s.len()))),
        }
    }

    #[test]
    fn test_parse_chart_without_timestamps() {
        let body = r#"{"chart":{"result":[{"meta":{"currency":"USD"},"indicators":{"quote":[{}]}}],"error":null}}"#;
        let response: ChartResponse = serde_json::from_str(body).unwrap();
        let (_, series) = parse_chart(response).unwrap().unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_parse_summary_sparse() {
        let body = r#"{"quoteSummary":{"result":[{
            "price": {"longName": "Apple Inc.", "currency": "USD", "marketCap": {"raw": 2.9e12, "fmt": "2.9T"}},
            "summaryDetail": {"trailingPE": {"raw": 29.4}, "dividendYield": {}, "beta": {}},
            "defaultKeyStatistics": {"beta": {"raw": 1.24}}
        }],"error":null}}"#;
        let response: SummaryResponse = serde_json::from_str(body).unwrap();
        let f = parse_summary(response).unwrap();
        assert_eq!(f.long_name.as_deref(), Some("Apple Inc."));
        assert_eq!(f.currency.as_deref(), Some("USD"));
        assert_eq!(f.market_cap, Some(2.9e12));
        assert_eq!(f.trailing_pe, Some(29.4));
        assert_eq!(f.dividend_yield, None);
        assert_eq!(f.beta, Some(1.24));
    }

    #[test]
    fn test_merge_chart_meta_fills_gaps_only() {
        let meta = ChartMeta {
            currency: Some("JPY".to_string()),
            long_name: None,
            short_name: Some("TOYOTA".to_string()),
        };
        let merged = merge_chart_meta(Fundamentals::default(), meta);
        assert_eq!(merged.currency.as_deref(), Some("JPY"));
        assert_eq!(merged.long_name.as_deref(), Some("TOYOTA"));
        assert_eq!(merged.market_cap, None);
    }

    #[test]
    fn test_parse_chart_applies_adjusted_close() {
        let body = r#"{"chart":{"result":[{
            "meta": {"currency": "USD"},
            "timestamp": [1704153600, 1704240000],
            "indicators": {
                "quote": [{"open": [98.0, 108.0], "high": [102.0, 112.0], "low": [96.0, 106.0], "close": [100.0, 110.0], "volume": [10, 20]}],
                "adjclose": [{"adjclose": [90.0, 110.0]}]
            }
        }],"error":null}}"#;
        let response: ChartResponse = serde_json::from_str(body).unwrap();
        let (_, series) = parse_chart(response).unwrap().unwrap();
        let first = &series.bars()[0];
        assert!((first.close - 90.0).abs() < 1e-9);
        assert!((first.open - 88.2).abs() < 1e-9);
        assert!((first.high - 91.8).abs() < 1e-9);
        assert!((first.low - 86.4).abs() < 1e-9);
        assert_eq!(first.volume, 10.0);
        assert_eq!(series.bars()[1].close, 110.0);

        let ret = crate::analytics::period_return(&series).unwrap();
        assert!((ret - 22.222).abs() < 1e-3, "{}", ret);
    }

    #[test]
    fn test_parse_chart_skips_bar_without_adjusted_close() {
        let body = r#"{"chart":{"result":[{
            "timestamp": [1704153600, 1704240000],
            "indicators": {
                "quote": [{"open": [1.0, 2.0], "high": [1.0, 2.0], "low": [1.0, 2.0], "close": [1.0, 2.0], "volume": [1, 2]}],
                "adjclose": [{"adjclose": [null, 2.0]}]
            }
        }],"error":null}}"#;
        let response: ChartResponse = serde_json::from_str(body).unwrap();
        let (_, series) = parse_chart(response).unwrap().unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.bars()[0].close, 2.0);
    }

    #[test]
    fn test_summary_endpoint_carries_crumb() {
        let provider = YahooProvider::from_settings(&ProviderSettings::default()).unwrap();
        let url = provider.summary_endpoint("7203.T", "a/b=c").unwrap();
        assert_eq!(url.path(), "/v10/finance/quoteSummary/7203.T");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("modules".to_string(), SUMMARY_MODULES.to_string()),
                ("crumb".to_string(), "a/b=c".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_crumb() {
        assert_eq!(parse_crumb("  Xy1.AbC/9\n").unwrap(), "Xy1.AbC/9");
        assert!(parse_crumb("").is_err());
        assert!(parse_crumb("<html>Too Many Requests</html>").is_err());
        assert!(parse_crumb(r#"{"finance":{"error":{"code":"Unauthorized"}}}"#).is_err());
    }

    #[test]
    fn test_endpoint_encodes_ticker_as_one_segment() {
        let base = Url::parse("https://query1.finance.yahoo.com/").unwrap();
        let url = YahooProvider::endpoint(&base, &["v8", "finance", "chart", "7203.T"]).unwrap();
        assert_eq!(url.as_str(), "https://query1.finance.yahoo.com/v8/finance/chart/7203.T");
    }

    // Requires network access.
    #[tokio::test]
    #[ignore]
    async fn test_fetch_live() {
        let provider = YahooProvider::from_settings(&ProviderSettings::default()).unwrap();
        let quote = provider.fetch("AAPL", Period::FiveDays).await.unwrap();
        assert!(!quote.series.is_empty());
    }
}
