// Analytics formatter: statistics over a series and their display formatting.
pub mod format;
pub mod stats;

pub use format::NOT_AVAILABLE;
pub use stats::{
    annualized_volatility, extremes, latest_price_and_delta, mean_volume, period_return,
    PriceDelta,
};
