// Request-cycle orchestration shared by the CLI and the GUI
pub mod dashboard;

pub use dashboard::{moving_average_overlays, render, DashboardService};
