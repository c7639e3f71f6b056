// Technical indicators module
pub mod sma;

pub use sma::Sma;

use serde_json::Value;
use shared::models::Bar;

// Common trait for all indicators
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    fn calculate(&self, data: &[Bar]) -> Vec<Option<f64>>; // None where the indicator is not yet defined (insufficient history)
}
