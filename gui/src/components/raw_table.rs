// Tail of the series as an HTML table
#![allow(non_snake_case)]
use crate::config::ThemePalette;
use dioxus::prelude::*;
use engine::models::RawTable;

#[component]
pub fn RawDataTable(table: RawTable, palette: ThemePalette) -> Element {
    let header = table.columns.iter().map(|column| {
        rsx! {
            th {
                key: "{column}",
                style: "text-align: right; padding: 4px 10px; border-bottom: 1px solid {palette.grid};",
                "{column}"
            }
        }
    });
    let rows = table.rows.iter().enumerate().map(|(n, row)| {
        let cells = row.iter().enumerate().map(|(c, cell)| {
            rsx! { td { key: "{c}", style: "text-align: right; padding: 2px 10px;", "{cell}" } }
        });
        rsx! { tr { key: "{n}", {cells} } }
    });

    rsx! {
        div { class: "raw-data", style: "overflow-x: auto; margin-top: 12px;",
            table { style: "border-collapse: collapse; font-size: 0.9em; font-family: monospace;",
                thead { tr { {header} } }
                tbody { {rows} }
            }
        }
    }
}
