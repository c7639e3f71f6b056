// Moving-average lines drawn over the price pane
#![allow(non_snake_case)]
use super::ChartGeometry;
use dioxus::prelude::*;
use engine::models::LineOverlay;

/// SVG `points` for one overlay. Values before the window fills are absent
/// and produce no point.
pub fn polyline_points(overlay: &LineOverlay, geometry: &ChartGeometry) -> String {
    overlay
        .values
        .iter()
        .enumerate()
        .filter_map(|(i, value)| value.map(|v| (i, v)))
        .filter(|(_, v)| v.is_finite())
        .map(|(i, v)| format!("{:.2},{:.2}", geometry.x_center(i), geometry.price_y(v)))
        .collect::<Vec<_>>()
        .join(" ")
}

#[component]
pub fn IndicatorOverlay(overlays: Vec<LineOverlay>, geometry: ChartGeometry) -> Element {
    if overlays.is_empty() {
        return None;
    }

    let lines = overlays.iter().filter_map(|overlay| {
        let points = polyline_points(overlay, &geometry);
        if points.is_empty() {
            return None;
        }
        let color = overlay.color.clone();
        let width = overlay.width;
        Some(rsx! {
            polyline {
                key: "{overlay.name}",
                points: "{points}",
                fill: "none",
                stroke: "{color}",
                stroke_width: "{width}"
            }
        })
    });

    rsx! {
        g { class: "indicator-overlay-group", {lines} }
    }
}
