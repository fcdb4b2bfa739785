//! Error types for the recoloring engine.
//!
//! Engine operations themselves never fail from the caller's point of view:
//! anything the engine cannot resolve simply leaves an element uncolored.
//! These errors surface only from configuration loading and from the host's
//! style queries, where the scanner logs and contains them.

use dusk_color::ColorParseError;
use thiserror::Error;

/// Failure reported by a host while answering a query about one node.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The node was removed from the document between enumeration and query.
    #[error("node is no longer attached to the document")]
    Detached,

    /// The host's style computation failed for this node.
    #[error("style computation failed: {0}")]
    Style(String),
}

/// Errors produced while loading or validating an [`EngineConfig`](crate::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A luminance threshold outside `0.0..=1.0` (or NaN).
    #[error("{name} must be within 0.0..=1.0, got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f64 },

    /// A batch window of zero would fire a scan per mutation.
    #[error("batch window must be greater than zero")]
    ZeroBatchWindow,

    /// A palette entry that does not parse as a color.
    #[error("invalid palette color for {field}: {source}")]
    InvalidColor {
        field: &'static str,
        source: ColorParseError,
    },

    /// A palette entry that parses but is fully transparent.
    #[error("palette color for {field} is fully transparent")]
    TransparentColor { field: &'static str },

    /// A color mode name other than `light` or `dark`.
    #[error("unknown color mode '{0}', expected 'light' or 'dark'")]
    UnknownColorMode(String),

    #[error("failed to parse YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to parse JSON config: {0}")]
    Json(#[from] serde_json::Error),
}
