//! Engine configuration.
//!
//! Every field has a default, so a configuration file only lists what it
//! changes:
//!
//! ```toml
//! arrow_navigation = false
//! max_capture_depth = 16
//! paint_fallback = { r = 32, g = 32, b = 32, a = 255 }
//! ```

use std::path::{Path, PathBuf};

use horizon_trellis_core::logging::targets;
use serde::{Deserialize, Serialize};

use crate::widget::Color;

/// Result type alias for configuration loading.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Errors that can occur while loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML text is malformed or has fields of the wrong type.
    #[error("invalid engine configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration file could not be read.
    #[error("failed to read engine configuration '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Tunables of the widget engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Unconsumed Tab and Shift+Tab move focus.
    pub tab_navigation: bool,
    /// Unconsumed arrow keys move focus.
    pub arrow_navigation: bool,
    /// Color the default procedure fills unhandled paint requests with.
    /// `None` leaves paint unconsumed.
    pub paint_fallback: Option<Color>,
    /// Highest capture depth a widget may reach; capturing beyond it fails.
    pub max_capture_depth: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tab_navigation: true,
            arrow_navigation: true,
            paint_fallback: None,
            max_capture_depth: u32::MAX,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tab_navigation(mut self, enabled: bool) -> Self {
        self.tab_navigation = enabled;
        self
    }

    pub fn with_arrow_navigation(mut self, enabled: bool) -> Self {
        self.arrow_navigation = enabled;
        self
    }

    pub fn with_paint_fallback(mut self, color: Option<Color>) -> Self {
        self.paint_fallback = color;
        self
    }

    pub fn with_max_capture_depth(mut self, depth: u32) -> Self {
        self.max_capture_depth = depth;
        self
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML configuration file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(target: targets::CONFIG, path = %path.display(), "loaded engine configuration");
        Ok(config)
    }
}
