// Engine configuration
pub mod settings;

pub use settings::{ChartStyle, EngineSettings, ProviderKind, ProviderSettings};
