// GUI components
pub mod chart;
pub mod metrics;
pub mod raw_table;
pub mod sidebar;

pub use chart::CandlestickChart;
pub use metrics::{StatsPanel, SummaryRow};
pub use raw_table::RawDataTable;
pub use sidebar::Sidebar;
