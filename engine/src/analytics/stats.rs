//! Summary statistics over a daily OHLCV series.
//!
//! Operations that need at least one bar return [`EngineError::EmptySeries`];
//! the rest return `None` whenever the value is not computable so callers can
//! show "not available" instead of failing.

use crate::error::EngineError;
use serde::Serialize;
use shared::models::Series;

/// Trading days per year used to annualize daily volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceDelta {
    pub current: f64,
    /// Change against the previous close, 0 when there is only one bar.
    pub delta: f64,
}

pub fn latest_price_and_delta(series: &Series) -> Result<PriceDelta, EngineError> {
    let bars = series.bars();
    let last = bars.last().ok_or(EngineError::EmptySeries)?;
    let previous = if bars.len() > 1 { bars[bars.len() - 2].close } else { last.close };
    Ok(PriceDelta {
        current: last.close,
        delta: last.close - previous,
    })
}

/// `(highest high, lowest low)` over the whole series.
pub fn extremes(series: &Series) -> Result<(f64, f64), EngineError> {
    if series.is_empty() {
        return Err(EngineError::EmptySeries);
    }
    let high = series.bars().iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let low = series.bars().iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    Ok((high, low))
}

/// Day-over-day fractional change of the close. The first bar has no
/// predecessor and contributes nothing.
pub fn daily_returns(series: &Series) -> Vec<f64> {
    let closes: Vec<f64> = series.closes().collect();
    closes.windows(2).map(|pair| pair[1] / pair[0] - 1.0).collect()
}

/// Sample standard deviation (n - 1 denominator).
fn sample_std_dev(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    Some(variance.sqrt())
}

/// Annualized volatility of daily returns, in percent.
pub fn annualized_volatility(series: &Series) -> Option<f64> {
    let returns = daily_returns(series);
    sample_std_dev(&returns)
        .map(|sd| sd * TRADING_DAYS_PER_YEAR.sqrt() * 100.0)
        .filter(|v| v.is_finite())
}

pub fn mean_volume(series: &Series) -> Option<f64> {
    if series.is_empty() {
        return None;
    }
    let total: f64 = series.bars().iter().map(|b| b.volume).sum();
    Some(total / series.len() as f64)
}

/// Return from the first to the last close, in percent.
pub fn period_return(series: &Series) -> Option<f64> {
    let first = series.first()?.close;
    let last = series.last()?.close;
    if first == 0.0 {
        return None;
    }
    Some((last / first - 1.0) * 100.0).filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use shared::models::Bar;

    fn series(rows: &[(f64, f64, f64, f64)]) -> Series {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let bars = rows
            .iter()
            .enumerate()
            .map(|(i, &(high, low, close, volume))| Bar {
                timestamp: start + Duration::days(i as i64),
                open: close,
                high,
                low,
                close,
                volume,
            })
            .collect();
        Series::try_from_bars(bars).unwrap()
    }

    fn closes(values: &[f64]) -> Series {
        series(&values.iter().map(|&c| (c, c, c, 0.0)).collect::<Vec<_>>())
    }

    #[test]
    fn test_latest_price_and_delta() {
        let pd = latest_price_and_delta(&closes(&[100.0, 104.0, 101.5])).unwrap();
        assert_eq!(pd.current, 101.5);
        assert!((pd.delta - (-2.5)).abs() < 1e-12);
    }

    #[test]
    fn test_latest_price_single_bar_has_no_delta() {
        let pd = latest_price_and_delta(&closes(&[42.0])).unwrap();
        assert_eq!(pd, PriceDelta { current: 42.0, delta: 0.0 });
    }

    #[test]
    fn test_empty_series_errors() {
        let empty = Series::empty();
        assert!(matches!(latest_price_and_delta(&empty), Err(EngineError::EmptySeries)));
        assert!(matches!(extremes(&empty), Err(EngineError::EmptySeries)));
        assert_eq!(mean_volume(&empty), None);
        assert_eq!(period_return(&empty), None);
        assert_eq!(annualized_volatility(&empty), None);
    }

    #[test]
    fn test_extremes() {
        let s = series(&[(10.0, 8.0, 9.0, 0.0), (12.0, 9.5, 11.0, 0.0), (11.0, 7.5, 8.0, 0.0)]);
        assert_eq!(extremes(&s).unwrap(), (12.0, 7.5));
    }

    #[test]
    fn test_extremes_single_bar() {
        let s = series(&[(15.0, 11.0, 13.0, 100.0)]);
        assert_eq!(extremes(&s).unwrap(), (15.0, 11.0));
    }

    #[test]
    fn test_period_return() {
        assert!((period_return(&closes(&[100.0, 110.0])).unwrap() - 10.0).abs() < 1e-9);
        assert!((period_return(&closes(&[200.0, 150.0, 150.0])).unwrap() - (-25.0)).abs() < 1e-9);
    }

    #[test]
    fn test_period_return_zero_first_close() {
        assert_eq!(period_return(&closes(&[0.0, 10.0])), None);
    }

    #[test]
    fn test_mean_volume() {
        let s = series(&[(1.0, 1.0, 1.0, 10.0), (1.0, 1.0, 1.0, 20.0), (1.0, 1.0, 1.0, 30.0)]);
        assert_eq!(mean_volume(&s), Some(20.0));
    }

    #[test]
    fn test_volatility_constant_prices_is_zero() {
        assert_eq!(annualized_volatility(&closes(&[50.0; 10])), Some(0.0));
    }

    #[test]
    fn test_volatility_known_value() {
        // Returns: +10%, -10%  -> mean 0, sample sd = sqrt(0.02) = 0.141421...
        let vol = annualized_volatility(&closes(&[100.0, 110.0, 99.0])).unwrap();
        let expected = 0.02_f64.sqrt() * 252.0_f64.sqrt() * 100.0;
        assert!((vol - expected).abs() < 1e-9, "{} != {}", vol, expected);
    }

    #[test]
    fn test_volatility_needs_two_returns() {
        assert_eq!(annualized_volatility(&closes(&[100.0])), None);
        assert_eq!(annualized_volatility(&closes(&[100.0, 101.0])), None);
    }

    #[test]
    fn test_volatility_zero_close_is_not_available() {
        assert_eq!(annualized_volatility(&closes(&[0.0, 1.0, 2.0])), None);
    }

    #[test]
    fn test_daily_returns_excludes_first_bar() {
        let r = daily_returns(&closes(&[100.0, 110.0, 121.0]));
        assert_eq!(r.len(), 2);
        assert!((r[0] - 0.1).abs() < 1e-12);
        assert!((r[1] - 0.1).abs() < 1e-12);
    }
}
