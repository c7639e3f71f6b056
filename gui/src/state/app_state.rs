// Sidebar state for the GUI.
//
// Lives in a Dioxus signal; every edit produces a new immutable
// `DashboardRequest` for the next request cycle.

use shared::models::{DashboardRequest, Period, MAX_MA_WINDOW, MIN_MA_WINDOW};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaSlot {
    First,
    Second,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub ticker: String,
    pub period: Period,
    pub ma_window_1: usize,
    pub ma_window_2: usize,
    pub show_moving_averages: bool,
    pub show_raw_data: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_request(&DashboardRequest::default())
    }
}

impl AppState {
    pub fn from_request(request: &DashboardRequest) -> Self {
        Self {
            ticker: request.ticker.clone(),
            period: request.period,
            ma_window_1: request.ma_window_1,
            ma_window_2: request.ma_window_2,
            show_moving_averages: request.show_moving_averages,
            show_raw_data: request.show_raw_data,
        }
    }

    pub fn to_request(&self) -> DashboardRequest {
        DashboardRequest {
            ticker: self.ticker.clone(),
            ma_window_1: self.ma_window_1,
            ma_window_2: self.ma_window_2,
            show_moving_averages: self.show_moving_averages,
            period: self.period,
            show_raw_data: self.show_raw_data,
        }
    }

    /// Unknown codes leave the period unchanged.
    pub fn set_period_code(&mut self, code: &str) {
        match code.parse::<Period>() {
            Ok(period) => self.period = period,
            Err(e) => tracing::warn!(error = %e, "Ignoring period selection"),
        }
    }

    /// Parses a number input and clamps it to the allowed window range.
    /// Non-numeric input leaves the window unchanged.
    pub fn set_window_text(&mut self, slot: MaSlot, text: &str) {
        let Ok(value) = text.trim().parse::<usize>() else {
            return;
        };
        let value = value.clamp(MIN_MA_WINDOW, MAX_MA_WINDOW);
        match slot {
            MaSlot::First => self.ma_window_1 = value,
            MaSlot::Second => self.ma_window_2 = value,
        }
    }

    pub fn window(&self, slot: MaSlot) -> usize {
        match slot {
            MaSlot::First => self.ma_window_1,
            MaSlot::Second => self.ma_window_2,
        }
    }
}
