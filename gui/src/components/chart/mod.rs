// SVG price/volume chart
pub mod candlestick;
pub mod indicators;

pub use candlestick::CandlestickChart;

use engine::models::{ChartSpec, LineOverlay};
use shared::models::Bar;

pub const VIEW_WIDTH: f64 = 1000.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 45.0;
const PANE_GAP: f64 = 12.0;

/// Pixel layout of both panes inside the SVG view box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartGeometry {
    pub height: f64,
    pub margin_left: f64,
    pub margin_top: f64,
    pub plot_width: f64,
    pub price_height: f64,
    pub volume_top: f64,
    pub volume_height: f64,
    /// Horizontal space per bar.
    pub slot_width: f64,
    pub min_price: f64,
    pub max_price: f64,
    pub max_volume: f64,
}

impl ChartGeometry {
    pub fn new(chart: &ChartSpec) -> Self {
        let height = f64::from(chart.height);
        let plot_width = VIEW_WIDTH - MARGIN_LEFT - MARGIN_RIGHT;
        let plot_height = (height - MARGIN_TOP - MARGIN_BOTTOM - PANE_GAP).max(1.0);
        let ratio = chart.price_pane_ratio.clamp(0.1, 1.0);
        let price_height = plot_height * ratio;
        let (min_price, max_price) = price_bounds(&chart.candles, &chart.overlays);
        let max_volume = chart.volume.values.iter().copied().fold(0.0, f64::max);

        Self {
            height,
            margin_left: MARGIN_LEFT,
            margin_top: MARGIN_TOP,
            plot_width,
            price_height,
            volume_top: MARGIN_TOP + price_height + PANE_GAP,
            volume_height: plot_height - price_height,
            slot_width: plot_width / chart.candles.len().max(1) as f64,
            min_price,
            max_price,
            max_volume,
        }
    }

    pub fn x_center(&self, index: usize) -> f64 {
        self.margin_left + self.slot_width * (index as f64 + 0.5)
    }

    pub fn price_y(&self, price: f64) -> f64 {
        let range = self.max_price - self.min_price;
        self.margin_top + (self.max_price - price) / range * self.price_height
    }

    /// Top edge of a volume bar; the bar extends down to the pane's bottom.
    pub fn volume_y(&self, volume: f64) -> f64 {
        let bottom = self.volume_top + self.volume_height;
        if self.max_volume <= 0.0 {
            return bottom;
        }
        bottom - volume / self.max_volume * self.volume_height
    }

    pub fn bottom(&self) -> f64 {
        self.volume_top + self.volume_height
    }
}

/// Vertical price range covering every candle and overlay value, padded by 5 %.
pub fn price_bounds(candles: &[Bar], overlays: &[LineOverlay]) -> (f64, f64) {
    let overlay_values = overlays.iter().flat_map(|o| o.values.iter().flatten().copied());
    let lows = candles.iter().map(|b| b.low).chain(overlay_values.clone());
    let highs = candles.iter().map(|b| b.high).chain(overlay_values);

    let low = lows.filter(|v| v.is_finite()).fold(f64::INFINITY, f64::min);
    let high = highs.filter(|v| v.is_finite()).fold(f64::NEG_INFINITY, f64::max);
    if !low.is_finite() || !high.is_finite() {
        return (0.0, 1.0);
    }
    if high - low <= f64::EPSILON {
        return (low - 1.0, high + 1.0);
    }
    let pad = (high - low) * 0.05;
    (low - pad, high + pad)
}

/// Evenly spaced `(bar index, label)` pairs for the date axis.
pub fn date_ticks(candles: &[Bar], max_ticks: usize) -> Vec<(usize, String)> {
    if candles.is_empty() || max_ticks == 0 {
        return Vec::new();
    }
    let step = candles.len().div_ceil(max_ticks).max(1);
    (0..candles.len())
        .step_by(step)
        .map(|i| (i, candles[i].timestamp.format("%Y-%m-%d").to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn bars(n: usize) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        (0..n)
            .map(|i| Bar {
                timestamp: start + Duration::days(i as i64),
                open: 10.0,
                high: 12.0 + i as f64,
                low: 8.0,
                close: 11.0,
                volume: 100.0 * (i + 1) as f64,
            })
            .collect()
    }

    fn overlay(values: Vec<Option<f64>>) -> LineOverlay {
        LineOverlay {
            name: "2-day MA".to_string(),
            color: "orange".to_string(),
            width: 2.0,
            window: 2,
            values,
        }
    }

    #[test]
    fn test_price_bounds_padded() {
        let (low, high) = price_bounds(&bars(3), &[]);
        // Range 8..14 padded by 0.3 on each side.
        assert!((low - 7.7).abs() < 1e-9);
        assert!((high - 14.3).abs() < 1e-9);
    }

    #[test]
    fn test_price_bounds_include_overlays() {
        let (_, high) = price_bounds(&bars(2), &[overlay(vec![None, Some(30.0)])]);
        assert!(high > 30.0);
    }

    #[test]
    fn test_price_bounds_flat_and_empty() {
        let flat = vec![Bar {
            high: 5.0,
            low: 5.0,
            ..bars(1)[0].clone()
        }];
        assert_eq!(price_bounds(&flat, &[]), (4.0, 6.0));
        assert_eq!(price_bounds(&[], &[]), (0.0, 1.0));
    }

    #[test]
    fn test_date_ticks() {
        let ticks = date_ticks(&bars(10), 4);
        let indices: Vec<usize> = ticks.iter().map(|(i, _)| *i).collect();
        assert_eq!(indices, vec![0, 3, 6, 9]);
        assert_eq!(ticks[0].1, "2024-03-01");
        assert!(date_ticks(&[], 4).is_empty());
    }

    #[test]
    fn test_geometry_maps_extremes_to_pane_edges() {
        let geometry = ChartGeometry {
            height: 700.0,
            margin_left: 70.0,
            margin_top: 50.0,
            plot_width: 910.0,
            price_height: 400.0,
            volume_top: 462.0,
            volume_height: 100.0,
            slot_width: 10.0,
            min_price: 0.0,
            max_price: 100.0,
            max_volume: 50.0,
        };
        assert_eq!(geometry.price_y(100.0), 50.0);
        assert_eq!(geometry.price_y(0.0), 450.0);
        assert_eq!(geometry.volume_y(50.0), 462.0);
        assert_eq!(geometry.volume_y(0.0), 562.0);
        assert_eq!(geometry.x_center(0), 75.0);
    }
}
