// Sidebar controls: ticker, moving-average windows, display period
#![allow(non_snake_case)]
use crate::config::ThemePalette;
use crate::state::{AppState, MaSlot};
use dioxus::prelude::*;
use shared::models::{Period, MAX_MA_WINDOW, MIN_MA_WINDOW};

#[component]
fn WindowInput(state: Signal<AppState>, slot: MaSlot, label: String) -> Element {
    let mut state = state;
    let value = state.read().window(slot);
    rsx! {
        label { style: "display: block; margin-top: 8px;",
            "{label}"
            input {
                r#type: "number",
                min: "{MIN_MA_WINDOW}",
                max: "{MAX_MA_WINDOW}",
                value: "{value}",
                style: "display: block; width: 100%; margin-top: 4px;",
                oninput: move |evt| state.write().set_window_text(slot, &evt.value())
            }
        }
    }
}

#[component]
pub fn Sidebar(state: Signal<AppState>, palette: ThemePalette) -> Element {
    let mut state = state;
    let snapshot = state.read().clone();

    rsx! {
        aside {
            class: "sidebar",
            style: "width: 260px; padding: 20px; background: {palette.sidebar}; flex-shrink: 0;",
            h2 { "Settings" }

            label { style: "display: block;",
                "Ticker symbol"
                input {
                    r#type: "text",
                    value: "{snapshot.ticker}",
                    placeholder: "e.g. AAPL, 7203.T",
                    style: "display: block; width: 100%; margin-top: 4px;",
                    // Commits on Enter or blur, not on every keystroke.
                    onchange: move |evt| state.write().ticker = evt.value()
                }
            }

            h3 { style: "margin-top: 20px;", "Moving averages" }
            WindowInput { state, slot: MaSlot::First, label: "Window 1 (days)".to_string() }
            WindowInput { state, slot: MaSlot::Second, label: "Window 2 (days)".to_string() }
            label { style: "display: block; margin-top: 8px;",
                input {
                    r#type: "checkbox",
                    checked: snapshot.show_moving_averages,
                    onchange: move |_| {
                        let mut s = state.write();
                        s.show_moving_averages = !s.show_moving_averages;
                    }
                }
                " Show moving averages"
            }

            h3 { style: "margin-top: 20px;", "Period" }
            select {
                style: "width: 100%;",
                onchange: move |evt| state.write().set_period_code(&evt.value()),
                for period in Period::ALL {
                    option {
                        key: "{period.code()}",
                        value: "{period.code()}",
                        selected: period == snapshot.period,
                        "{period.label()}"
                    }
                }
            }
        }
    }
}
