#![allow(non_snake_case)]
use crate::components::{CandlestickChart, RawDataTable, Sidebar, StatsPanel, SummaryRow};
use crate::config::{AppConfig, ThemePalette};
use crate::services::EngineClient;
use crate::state::AppState;
use dioxus::prelude::*;
use engine::models::{DashboardOutcome, DashboardView};

#[component]
pub fn App() -> Element {
    let config = use_context::<AppConfig>();
    let client = use_context::<EngineClient>();
    let palette = config.palette();
    let state = use_signal(|| AppState::from_request(&config.dashboard));

    // Re-runs the whole request cycle whenever any sidebar value changes.
    let outcome = use_resource(move || {
        let client = client.clone();
        let request = state.read().to_request();
        async move { client.run(request).await }
    });

    let body = match &*outcome.read_unchecked() {
        Some(result) => rsx! { OutcomePanel { outcome: result.clone(), state, palette: palette.clone() } },
        None => rsx! { p { style: "color: {palette.muted};", "Loading data..." } },
    };

    rsx! {
        div {
            style: "display: flex; min-height: 100vh; font-family: sans-serif; background: {palette.background}; color: {palette.foreground};",
            Sidebar { state, palette: palette.clone() }
            main { style: "flex: 1; padding: 24px; overflow-y: auto;",
                h1 { "{config.app.title}" }
                hr {}
                {body}
                Footer { palette: palette.clone() }
            }
        }
    }
}

#[component]
fn OutcomePanel(outcome: DashboardOutcome, state: Signal<AppState>, palette: ThemePalette) -> Element {
    match outcome {
        DashboardOutcome::Prompt { message } => rsx! {
            div { class: "info", style: "color: {palette.info};", "{message}" }
        },
        DashboardOutcome::NotFound { message } => rsx! {
            div { class: "error", style: "color: {palette.error};", "{message}" }
        },
        DashboardOutcome::Failed { message, hint } => rsx! {
            div { class: "error", style: "color: {palette.error};", "{message}" }
            div { class: "info", style: "color: {palette.info}; margin-top: 8px;", "{hint}" }
        },
        DashboardOutcome::Rendered { view } => rsx! {
            DashboardBody { view: *view, state, palette }
        },
    }
}

#[component]
fn DashboardBody(view: DashboardView, state: Signal<AppState>, palette: ThemePalette) -> Element {
    let mut state = state;
    let show_raw = state.read().show_raw_data;
    let table = view.raw_table.clone().map(|table| {
        rsx! { RawDataTable { table, palette: palette.clone() } }
    });

    rsx! {
        SummaryRow { cards: view.summary.clone(), palette: palette.clone() }
        CandlestickChart { chart: view.chart.clone(), palette: palette.clone() }
        hr {}
        StatsPanel { stats: view.stats.clone(), palette: palette.clone() }
        label { style: "display: block; margin-top: 16px;",
            input {
                r#type: "checkbox",
                checked: show_raw,
                onchange: move |_| {
                    let mut s = state.write();
                    s.show_raw_data = !s.show_raw_data;
                }
            }
            " Show raw data"
        }
        {table}
    }
}

#[component]
fn Footer(palette: ThemePalette) -> Element {
    rsx! {
        footer { style: "margin-top: 32px; color: {palette.muted}; font-size: 0.9em;",
            hr {}
            p { strong { "Usage tips:" } }
            ul {
                li { "US stocks: AAPL, GOOGL, TSLA" }
                li { "Japanese stocks: add .T, e.g. 7203.T (Toyota), 6758.T (Sony)" }
                li { "Other markets: add the exchange suffix, e.g. .L for London, .PA for Paris" }
            }
        }
    }
}
