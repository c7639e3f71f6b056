// Engine-side view models. The input models (Bar, Series, Fundamentals) live in the `shared` crate.
pub mod view;

pub use view::{
    ChartSpec, DashboardOutcome, DashboardView, LineOverlay, Metric, RawTable, StatsGrid,
    SummaryCards, VolumeLayer,
};
