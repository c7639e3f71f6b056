pub mod models;

// Models shared by the engine (analytics, providers) and the GUI (controls, rendering).
pub use models::{
    Bar, DashboardRequest, Fundamentals, ParsePeriodError, Period, Series, SeriesOrderError,
    MAX_MA_WINDOW, MIN_MA_WINDOW,
};
