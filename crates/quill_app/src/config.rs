//! Application configuration
//!
//! Read from a TOML file with every section optional:
//!
//! ```toml
//! theme = "dark"
//! log_filter = "quill_gpu=debug,info"
//! blink_interval_ms = 600
//!
//! [window]
//! title = "Editor"
//! width = 800
//!
//! [frame]
//! max_immediate_updates = 3
//!
//! [renderer]
//! atlas_size = 2048
//! ```
//!
//! `QUILL_THEME` and `QUILL_LOG` override `theme` and `log_filter`.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use quill_core::FrameConfig;
use quill_gpu::RendererConfig;
use quill_platform::WindowConfig;
use quill_theme::{resolve_theme, Theme};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Environment variable overriding [`AppConfig::theme`]
pub const THEME_ENV: &str = "QUILL_THEME";

/// Environment variable overriding [`AppConfig::log_filter`]
pub const LOG_ENV: &str = "QUILL_LOG";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub frame: FrameConfig,
    pub renderer: RendererConfig,
    /// `"light"`, `"dark"`, or the path of a theme file
    pub theme: String,
    /// Log filter used when `RUST_LOG` is not set
    pub log_filter: String,
    /// Text cursor blink half-period in milliseconds
    pub blink_interval_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            frame: FrameConfig::default(),
            renderer: RendererConfig::default(),
            theme: "light".to_string(),
            log_filter: "info".to_string(),
            blink_interval_ms: 500,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Load a config file and apply the environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        let mut config = Self::from_toml_str(&source)?;
        config.apply_env();
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply `QUILL_THEME` and `QUILL_LOG`
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`, which maps variable names to values
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(theme) = lookup(THEME_ENV).filter(|v| !v.is_empty()) {
            self.theme = theme;
        }
        if let Some(filter) = lookup(LOG_ENV).filter(|v| !v.is_empty()) {
            self.log_filter = filter;
        }
    }

    pub fn blink_interval(&self) -> Duration {
        Duration::from_millis(self.blink_interval_ms)
    }

    /// The configured theme, loading it from disk if it is not a preset
    pub fn resolve_theme(&self) -> Result<Arc<Theme>> {
        Ok(resolve_theme(&self.theme)?)
    }
}
