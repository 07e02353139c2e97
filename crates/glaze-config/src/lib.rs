//! Glaze configuration system
//!
//! Centralized configuration for the shell components, loaded from
//! `glaze.toml` as an alternative to environment variables.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for Glaze
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlazeConfig {
    /// Theme settings shared with embedded web content
    pub theme: ThemeConfig,
    /// Web content view settings
    pub webview: WebViewConfig,
    /// Material surface rendering settings
    pub rendering: RenderingConfig,
}

/// Theme configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Whether the shell starts in dark mode
    pub dark_mode: bool,
    /// Accent color as a hex string (e.g. "#007AFF")
    pub accent_color: String,
}

/// Web content view configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebViewConfig {
    /// Remote devtools port; unset disables devtools
    pub devtools_port: Option<u16>,
    /// Put hidden views into the Discarded state instead of Frozen.
    /// Saves most of a hidden view's memory at the cost of a reload.
    pub discard_when_hidden: bool,
}

/// Material surface rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// MSAA sample count for the surface pipeline
    pub sample_count: u32,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            dark_mode: false,
            accent_color: "#007AFF".to_owned(),
        }
    }
}

impl Default for WebViewConfig {
    fn default() -> Self {
        Self {
            devtools_port: None,
            discard_when_hidden: false,
        }
    }
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self { sample_count: 1 }
    }
}

impl GlazeConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Load configuration from the default location (glaze.toml in the
    /// current directory) or return default configuration if it is missing
    pub fn load_or_default() -> Self {
        Self::load_from_file("glaze.toml").unwrap_or_default()
    }

    /// Merge configuration with environment variables
    ///
    /// Environment variables take precedence over configuration file values,
    /// allowing temporary overrides without editing the file.
    pub fn merge_with_env(&mut self) {
        if let Ok(val) = std::env::var("GLAZE_DARK_MODE") {
            self.theme.dark_mode = val == "1" || val.eq_ignore_ascii_case("true");
        }
        if let Ok(accent) = std::env::var("GLAZE_ACCENT") {
            self.theme.accent_color = accent;
        }
        if let Ok(val) = std::env::var("GLAZE_DEVTOOLS_PORT") {
            if let Ok(port) = val.parse::<u16>() {
                self.webview.devtools_port = Some(port);
            }
        }
        if let Ok(val) = std::env::var("GLAZE_DISCARD_HIDDEN") {
            self.webview.discard_when_hidden = val == "1" || val.eq_ignore_ascii_case("true");
        }
        if let Ok(val) = std::env::var("GLAZE_SAMPLE_COUNT") {
            if let Ok(count) = val.parse::<u32>() {
                self.rendering.sample_count = count;
            }
        }
    }

    /// Load configuration with environment variable overrides
    pub fn load() -> Self {
        let mut config = Self::load_or_default();
        config.merge_with_env();
        config
    }
}
