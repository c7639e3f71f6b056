// Simple Moving Average (SMA) over closing prices
use super::IndicatorCalculator;
use crate::error::EngineError;
use serde_json::Value;
use shared::models::Bar;

pub struct Sma {
    name: String,
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self, EngineError> {
        if period == 0 {
            return Err(EngineError::Indicator(
                "moving-average window must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            name: format!("MA{}", period),
            period,
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }
}

impl IndicatorCalculator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, data: &[Bar]) -> Vec<Option<f64>> {
        if data.len() < self.period {
            return vec![None; data.len()];
        }

        let mut results = vec![None; self.period - 1];

        let mut sum: f64 = data.iter().take(self.period).map(|b| b.close).sum();
        results.push(Some(sum / self.period as f64));

        // Slide the window
        for i in self.period..data.len() {
            sum = sum - data[i - self.period].close + data[i].close;
            results.push(Some(sum / self.period as f64));
        }
        results
    }
}
