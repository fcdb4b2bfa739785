//! Engine configuration.
//!
//! An [`EngineConfig`] is supplied to [`Engine::enable`](crate::Engine::enable)
//! and stays fixed for the session. It can be built in code or loaded from
//! YAML or JSON; every field has a default, so partial documents are fine.
//!
//! ```rust
//! use dusk::{EngineConfig, Strategy};
//!
//! let config = EngineConfig::from_yaml(r##"
//! bg-luminance-threshold: 0.6
//! track-mutations: false
//! palette:
//!   base-background: "#101418"
//! "##).unwrap();
//!
//! assert_eq!(config.bg_luminance_threshold, 0.6);
//! assert!(!config.track_mutations);
//! assert_eq!(config.strategy, Strategy::Adaptive);
//! assert_eq!(config.palette.base_text, "#e0e0e0");
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use dusk_color::{parse_rgba, CssColor};

use crate::error::ConfigError;

/// How the engine darkens a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Per-element, luminance-gated lightness inversion.
    #[default]
    Adaptive,
    /// Whole-document filter inversion with media re-inverted.
    Invert,
}

/// Base colors used by the generated stylesheet.
///
/// Values are CSS color strings and are checked by [`EngineConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Palette {
    /// Background forced on `html` and `body`.
    pub base_background: String,
    /// Default text color forced on `html` and `body`.
    pub base_text: String,
    /// Neutral overlay replacing near-black and near-white borders.
    pub border_overlay: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            base_background: "#121212".into(),
            base_text: "#e0e0e0".into(),
            border_overlay: "rgba(255, 255, 255, 0.12)".into(),
        }
    }
}

/// A [`Palette`] with every entry parsed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedPalette {
    pub base_background: CssColor,
    pub base_text: CssColor,
    pub border_overlay: CssColor,
}

impl Palette {
    /// Parses every entry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidColor`] or [`ConfigError::TransparentColor`]
    /// naming the first bad entry.
    pub fn resolve(&self) -> Result<ResolvedPalette, ConfigError> {
        Ok(ResolvedPalette {
            base_background: resolve_color("base-background", &self.base_background)?,
            base_text: resolve_color("base-text", &self.base_text)?,
            border_overlay: resolve_color("border-overlay", &self.border_overlay)?,
        })
    }
}

fn resolve_color(field: &'static str, value: &str) -> Result<CssColor, ConfigError> {
    let rgba = parse_rgba(value).map_err(|source| ConfigError::InvalidColor { field, source })?;
    if rgba.is_transparent() {
        return Err(ConfigError::TransparentColor { field });
    }
    if rgba.alpha < 1.0 {
        Ok(CssColor::Rgba(rgba.rgb, rgba.alpha))
    } else {
        Ok(CssColor::Rgb(rgba.rgb))
    }
}

/// Thresholds and switches for one enable cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct EngineConfig {
    /// Backgrounds brighter than this are darkened.
    pub bg_luminance_threshold: f64,
    /// Text darker than this is lightened.
    pub text_luminance_threshold: f64,
    /// Keep recoloring nodes inserted after the initial pass.
    pub track_mutations: bool,
    /// Delay used to coalesce insertions before rescanning, in milliseconds.
    pub batch_window_ms: u64,
    pub strategy: Strategy,
    pub palette: Palette,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bg_luminance_threshold: 0.5,
            text_luminance_threshold: 0.3,
            track_mutations: true,
            batch_window_ms: 500,
            strategy: Strategy::Adaptive,
            palette: Palette::default(),
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bg_threshold(mut self, threshold: f64) -> Self {
        self.bg_luminance_threshold = threshold;
        self
    }

    pub fn with_text_threshold(mut self, threshold: f64) -> Self {
        self.text_luminance_threshold = threshold;
        self
    }

    pub fn with_mutation_tracking(mut self, enabled: bool) -> Self {
        self.track_mutations = enabled;
        self
    }

    pub fn with_batch_window(mut self, window: Duration) -> Self {
        self.batch_window_ms = window.as_millis() as u64;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn batch_window(&self) -> Duration {
        Duration::from_millis(self.batch_window_ms)
    }

    /// Checks ranges and palette colors.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<ResolvedPalette, ConfigError> {
        check_threshold("bg-luminance-threshold", self.bg_luminance_threshold)?;
        check_threshold("text-luminance-threshold", self.text_luminance_threshold)?;
        if self.batch_window_ms == 0 {
            return Err(ConfigError::ZeroBatchWindow);
        }
        self.palette.resolve()
    }

    /// Loads and validates a config from YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] on malformed input, or a validation error.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a config from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] on malformed input, or a validation error.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

fn check_threshold(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ThresholdOutOfRange { name, value })
    }
}
