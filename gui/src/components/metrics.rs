// Summary cards and the statistics grid
#![allow(non_snake_case)]
use crate::config::ThemePalette;
use dioxus::prelude::*;
use engine::models::{Metric, StatsGrid, SummaryCards};

/// Text color for a delta string: green when positive, red when negative.
fn delta_color(delta: &str) -> &'static str {
    match delta.parse::<f64>() {
        Ok(v) if v > 0.0 => "#09ab3b",
        Ok(v) if v < 0.0 => "#ff2b2b",
        _ => "inherit",
    }
}

#[component]
pub fn MetricCard(metric: Metric, palette: ThemePalette) -> Element {
    let delta = metric.delta.clone().map(|d| {
        let color = delta_color(&d);
        rsx! { div { style: "color: {color}; font-size: 0.9em;", "{d}" } }
    });
    rsx! {
        div {
            class: "metric",
            style: "flex: 1; padding: 12px 16px; background: {palette.card}; border-radius: 6px;",
            div { style: "color: {palette.muted}; font-size: 0.85em;", "{metric.label}" }
            div { style: "font-size: 1.6em; margin-top: 4px;", "{metric.value}" }
            {delta}
        }
    }
}

#[component]
pub fn SummaryRow(cards: SummaryCards, palette: ThemePalette) -> Element {
    rsx! {
        div { class: "summary-cards", style: "display: flex; gap: 16px; margin-bottom: 16px;",
            MetricCard { metric: cards.company.clone(), palette: palette.clone() }
            MetricCard { metric: cards.price.clone(), palette: palette.clone() }
            MetricCard { metric: cards.market_cap.clone(), palette: palette.clone() }
        }
    }
}

#[component]
pub fn StatsPanel(stats: StatsGrid, palette: ThemePalette) -> Element {
    let columns = stats.columns.iter().enumerate().map(|(n, column)| {
        let metrics = column.iter().map(|metric| {
            rsx! { MetricCard { key: "{metric.label}", metric: metric.clone(), palette: palette.clone() } }
        });
        rsx! {
            div { key: "column-{n}", style: "flex: 1; display: flex; flex-direction: column; gap: 12px;",
                {metrics}
            }
        }
    });
    rsx! {
        div { class: "stats-grid",
            h3 { "Statistics" }
            div { style: "display: flex; gap: 16px;", {columns} }
        }
    }
}
