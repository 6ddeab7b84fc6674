//! Render Configuration
//! Figure and font sizing passed explicitly into render calls instead of
//! living in process-wide plotting state.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file looked up next to the working directory.
pub const CONFIG_FILE: &str = "district_lens.json";

/// Sizing for rendered figures. Loaded once at startup and handed to every
/// render call that needs it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Pixel width of rendered map/export figures.
    pub figure_width: u32,
    /// Pixel height of rendered map/export figures.
    pub figure_height: u32,
    /// Base font size for titles and axis labels.
    pub font_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            figure_width: 1500,
            figure_height: 800,
            font_size: 15,
        }
    }
}

impl RenderConfig {
    /// Load from `district_lens.json` if present, otherwise defaults.
    pub fn load_or_default() -> Self {
        Self::load_from(Path::new(CONFIG_FILE)).unwrap_or_default()
    }

    fn load_from(path: &Path) -> Option<Self> {
        let text = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str(&text) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded render config");
                Some(config)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "bad render config, using defaults");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let config: RenderConfig = serde_json::from_str(r#"{"font_size": 18}"#).unwrap();
        assert_eq!(config.font_size, 18);
        assert_eq!(config.figure_width, RenderConfig::default().figure_width);
    }

    #[test]
    fn roundtrips_through_json() {
        let config = RenderConfig {
            figure_width: 900,
            figure_height: 600,
            font_size: 12,
        };
        let text = serde_json::to_string(&config).unwrap();
        let back: RenderConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(back.figure_width, 900);
        assert_eq!(back.figure_height, 600);
        assert_eq!(back.font_size, 12);
    }
}
