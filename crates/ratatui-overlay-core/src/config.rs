//! Component defaults loaded from TOML.
//!
//! Every section and field is optional; missing values fall back to the built-in defaults.
//!
//! ```toml
//! [modal]
//! close_delay_ms = 300
//! fickle = false
//!
//! [modal.texts]
//! close_button = "Loka"
//! close_button_label = "Loka glugganum"
//!
//! [scroll_edge]
//! axis = "horizontal"
//! ```

use crate::error::ConfigError;
use crate::error::Result;
use crate::scroll_edge::ScrollAxis;
use crate::scroll_edge::ScrollEdgeOptions;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct OverlayConfig {
    pub modal: ModalConfig,
    pub scroll_edge: ScrollEdgeConfig,
}

/// Localizable texts of a modal's close button.
///
/// A `[modal.texts]` table that omits `close_button_label` labels the button with its visible
/// text; only the built-in defaults carry the longer "Close this window" label.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ModalTexts {
    /// Visible button text.
    #[serde(default = "default_close_button")]
    pub close_button: String,
    /// Accessible label and title. Falls back to `close_button`.
    #[serde(default)]
    pub close_button_label: Option<String>,
}

fn default_close_button() -> String {
    "Close".to_string()
}

impl Default for ModalTexts {
    fn default() -> Self {
        Self {
            close_button: default_close_button(),
            close_button_label: Some("Close this window".to_string()),
        }
    }
}

impl ModalTexts {
    pub fn label(&self) -> &str {
        self.close_button_label
            .as_deref()
            .unwrap_or(&self.close_button)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ModalConfig {
    pub close_delay_ms: u64,
    pub start_open: bool,
    pub fickle: bool,
    pub portal: bool,
    pub body_wrap: bool,
    pub bem: String,
    pub texts: ModalTexts,
}

impl Default for ModalConfig {
    fn default() -> Self {
        Self {
            close_delay_ms: 1000,
            start_open: false,
            fickle: true,
            portal: true,
            body_wrap: false,
            bem: "Modal".to_string(),
            texts: ModalTexts::default(),
        }
    }
}

impl ModalConfig {
    pub fn close_delay(&self) -> Duration {
        Duration::from_millis(self.close_delay_ms)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ScrollEdgeConfig {
    pub axis: ScrollAxis,
    pub tolerance: u32,
    pub throttle_ms: u64,
}

impl Default for ScrollEdgeConfig {
    fn default() -> Self {
        let o = ScrollEdgeOptions::default();
        Self {
            axis: o.axis,
            tolerance: o.tolerance,
            throttle_ms: u64::try_from(o.throttle.as_millis()).unwrap_or(u64::MAX),
        }
    }
}

impl From<&ScrollEdgeConfig> for ScrollEdgeOptions {
    fn from(c: &ScrollEdgeConfig) -> Self {
        Self {
            axis: c.axis,
            tolerance: c.tolerance,
            throttle: Duration::from_millis(c.throttle_ms),
            ..Self::default()
        }
    }
}

impl OverlayConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path`, or the defaults when the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no overlay config, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), "loaded overlay config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.modal.bem.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "modal.bem",
                reason: "block name must not be empty".to_string(),
            });
        }
        if self.modal.texts.close_button.is_empty() {
            return Err(ConfigError::Invalid {
                field: "modal.texts.close_button",
                reason: "close button needs a visible text".to_string(),
            });
        }
        Ok(())
    }
}
