// Engine library root: data providers, analytics and the dashboard request cycle.

pub mod analytics;
pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod models;
pub mod services;

pub use error::{EngineError, ProviderError};
