// Candlestick pane with a synchronized volume pane below it
#![allow(non_snake_case)]
use super::indicators::IndicatorOverlay;
use super::{date_ticks, ChartGeometry, VIEW_WIDTH};
use crate::config::ThemePalette;
use dioxus::prelude::*;
use engine::models::ChartSpec;

const PRICE_TICKS: usize = 5;
const DATE_TICKS: usize = 8;

#[component]
pub fn CandlestickChart(chart: ChartSpec, palette: ThemePalette) -> Element {
    let geometry = ChartGeometry::new(&chart);
    let height = geometry.height;
    let right = geometry.margin_left + geometry.plot_width;
    let body_width = (geometry.slot_width * 0.7).max(1.0);

    let grid = (0..=PRICE_TICKS).map(|step| {
        let price = geometry.min_price
            + (geometry.max_price - geometry.min_price) * step as f64 / PRICE_TICKS as f64;
        let y = geometry.price_y(price);
        let label_x = geometry.margin_left - 6.0;
        rsx! {
            g { key: "grid-{step}",
                line {
                    x1: "{geometry.margin_left}", y1: "{y}", x2: "{right}", y2: "{y}",
                    stroke: "{palette.grid}", stroke_width: "1"
                }
                text {
                    x: "{label_x}", y: "{y + 4.0}", text_anchor: "end",
                    font_size: "11", fill: "{palette.muted}",
                    "{price:.2}"
                }
            }
        }
    });

    let candles = chart.candles.iter().enumerate().map(|(i, bar)| {
        let x = geometry.x_center(i);
        let color = if bar.close >= bar.open { &palette.candle_up } else { &palette.candle_down };
        let top = geometry.price_y(bar.open.max(bar.close));
        let bottom = geometry.price_y(bar.open.min(bar.close));
        let body_height = (bottom - top).max(1.0);
        let body_x = x - body_width / 2.0;
        rsx! {
            g { key: "candle-{i}",
                line {
                    x1: "{x}", y1: "{geometry.price_y(bar.high)}",
                    x2: "{x}", y2: "{geometry.price_y(bar.low)}",
                    stroke: "{color}", stroke_width: "1"
                }
                rect {
                    x: "{body_x}", y: "{top}", width: "{body_width}", height: "{body_height}",
                    fill: "{color}"
                }
            }
        }
    });

    let volume_bars = chart.volume.values.iter().enumerate().map(|(i, &volume)| {
        let top = geometry.volume_y(volume);
        let bar_height = geometry.bottom() - top;
        let bar_x = geometry.x_center(i) - body_width / 2.0;
        rsx! {
            rect {
                key: "volume-{i}",
                x: "{bar_x}", y: "{top}", width: "{body_width}", height: "{bar_height}",
                fill: "{chart.volume.color}"
            }
        }
    });

    let ticks = date_ticks(&chart.candles, DATE_TICKS).into_iter().map(|(i, label)| {
        let x = geometry.x_center(i);
        let y = geometry.bottom() + 16.0;
        rsx! {
            text {
                key: "tick-{i}",
                x: "{x}", y: "{y}", text_anchor: "middle", font_size: "11", fill: "{palette.muted}",
                "{label}"
            }
        }
    });

    // Legend entries: price, one per overlay, volume.
    let mut legend_entries = vec![("Price".to_string(), palette.candle_up.clone())];
    legend_entries.extend(chart.overlays.iter().map(|o| (o.name.clone(), o.color.clone())));
    legend_entries.push((chart.volume.name.clone(), chart.volume.color.clone()));
    let legend = chart.show_legend.then(|| {
        let items = legend_entries.iter().enumerate().map(|(n, (name, color))| {
            let x = right - 110.0;
            let y = geometry.margin_top + 14.0 + n as f64 * 16.0;
            rsx! {
                g { key: "legend-{n}",
                    rect { x: "{x}", y: "{y - 9.0}", width: "12", height: "10", fill: "{color}" }
                    text { x: "{x + 18.0}", y: "{y}", font_size: "11", fill: "{palette.foreground}", "{name}" }
                }
            }
        });
        rsx! { g { class: "chart-legend", {items} } }
    });

    let price_axis_x = 16.0;
    let price_axis_y = geometry.margin_top + geometry.price_height / 2.0;
    let volume_axis_y = geometry.volume_top + geometry.volume_height / 2.0;
    let center_x = geometry.margin_left + geometry.plot_width / 2.0;

    rsx! {
        div { class: "candlestick-chart",
            svg {
                width: "100%",
                view_box: "0 0 {VIEW_WIDTH} {height}",
                style: "background: {palette.card}; border-radius: 6px;",
                text {
                    x: "{center_x}", y: "28", text_anchor: "middle",
                    font_size: "18", fill: "{palette.foreground}",
                    "{chart.title}"
                }
                {grid}
                {candles}
                IndicatorOverlay { overlays: chart.overlays.clone(), geometry }
                {volume_bars}
                {ticks}
                {legend}
                text {
                    x: "{center_x}", y: "{height - 6.0}", text_anchor: "middle",
                    font_size: "12", fill: "{palette.muted}",
                    "{chart.x_axis_title}"
                }
                text {
                    x: "{price_axis_x}", y: "{price_axis_y}", text_anchor: "middle",
                    font_size: "12", fill: "{palette.muted}",
                    transform: "rotate(-90 {price_axis_x} {price_axis_y})",
                    "{chart.price_axis_title}"
                }
                text {
                    x: "{price_axis_x}", y: "{volume_axis_y}", text_anchor: "middle",
                    font_size: "12", fill: "{palette.muted}",
                    transform: "rotate(-90 {price_axis_x} {volume_axis_y})",
                    "{chart.volume_axis_title}"
                }
            }
        }
    }
}
