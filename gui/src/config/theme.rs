// Color palettes for the dashboard
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemePalette {
    pub background: String,
    pub foreground: String,
    pub sidebar: String,
    pub card: String,
    pub muted: String,
    pub grid: String,
    pub error: String,
    pub info: String,
    pub candle_up: String,
    pub candle_down: String,
}

impl ThemePalette {
    pub fn default_dark() -> Self {
        Self {
            background: "#0e1117".to_string(),
            foreground: "#fafafa".to_string(),
            sidebar: "#262730".to_string(),
            card: "#1a1c24".to_string(),
            muted: "#9aa0a6".to_string(),
            grid: "#33363f".to_string(),
            error: "#ff6b6b".to_string(),
            info: "#4dabf7".to_string(),
            candle_up: "#26a69a".to_string(),
            candle_down: "#ef5350".to_string(),
        }
    }

    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            foreground: "#31333f".to_string(),
            sidebar: "#f0f2f6".to_string(),
            card: "#fafafa".to_string(),
            muted: "#808495".to_string(),
            grid: "#e6e9ef".to_string(),
            error: "#d62728".to_string(),
            info: "#1c83e1".to_string(),
            candle_up: "#26a69a".to_string(),
            candle_down: "#ef5350".to_string(),
        }
    }

    /// Unknown names fall back to the light palette.
    pub fn by_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("dark") {
            Self::default_dark()
        } else {
            Self::default_light()
        }
    }
}
