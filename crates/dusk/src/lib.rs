//! # Dusk - adaptive dark palettes for rendered documents
//!
//! `dusk` darkens a document that was designed light, without touching its
//! markup or authored styles. It samples each element's effective colors,
//! computes a dark counterpart that keeps hue and relative contrast, and
//! installs the result as one managed stylesheet keyed by per-element
//! identifiers.
//!
//! ## Core Concepts
//!
//! - [`Engine`]: the enable/disable state machine for one document
//! - [`EngineConfig`]: thresholds, batch window, [`Strategy`] and [`Palette`]
//! - [`Document`] / [`EventLoop`]: what the engine needs from its host
//! - [`MemoryDocument`]: a complete in-memory host with a virtual clock
//! - [`is_already_dark`]: leaves pages with their own dark theme alone
//!
//! ## Quick Start
//!
//! ```rust
//! use dusk::{Engine, EngineConfig, MemoryDocument, Transition, STYLE_ID};
//!
//! let mut doc = MemoryDocument::html();
//! let root = doc.root_id().unwrap();
//! let body = doc.body_id().unwrap();
//! doc.set_background(root, "#ffffff");
//!
//! let note = doc.append_element(body, "p");
//! doc.set_text_color(note, "rgb(33, 33, 33)");
//!
//! let mut engine = Engine::new();
//! assert_eq!(engine.enable(&mut doc, EngineConfig::default()), Transition::Enabled);
//!
//! let sheet = doc.style_text(STYLE_ID).unwrap();
//! assert!(sheet.contains(r#"[data-dusk-id="dusk-1"]"#));
//!
//! engine.disable(&mut doc);
//! assert!(doc.style_text(STYLE_ID).is_none());
//! ```
//!
//! ## Configuration
//!
//! Configs load from YAML or JSON with kebab-case keys; omitted keys keep
//! their defaults:
//!
//! ```rust
//! use dusk::{EngineConfig, Strategy};
//!
//! let config = EngineConfig::from_yaml(r#"
//! bg-luminance-threshold: 0.6
//! strategy: invert
//! "#).unwrap();
//! assert_eq!(config.strategy, Strategy::Invert);
//! assert_eq!(config.text_luminance_threshold, 0.3);
//! ```
//!
//! ## Following the OS
//!
//! [`Engine::sync_with_os`] enables or disables according to
//! [`detect_color_mode`], which queries the platform through `dark-light`.
//! Setting `DUSK_COLOR_MODE=dark` (or `light`) pins the answer. Hosts that
//! track the preference themselves call [`Engine::apply_mode`] directly.

mod classify;
mod config;
mod engine;
mod error;
mod host;
mod memory;
mod mode;
mod policy;
mod scan;
mod stylesheet;
mod watch;

pub use classify::{detect_dark_signal, is_already_dark, DarkSignal, DARK_LUMINANCE};
pub use config::{EngineConfig, Palette, ResolvedPalette, Strategy};
pub use engine::{Engine, EngineSession, EngineState, Transition};
pub use error::{ConfigError, HostError};
pub use host::{ComputedColors, Document, ElementRole, EventLoop, Host, NodeKind, TimerId};
pub use memory::{MemoryDocument, NodeId};
pub use mode::{detect_color_mode, ColorMode, MODE_ENV};
pub use policy::{
    Declarations, Policy, Role, BACKGROUND_LIGHTNESS_FLOOR, BACKGROUND_SATURATION_CAP,
    TEXT_LIGHTNESS_CEILING,
};
pub use scan::{OverrideRecord, Scanner, ID_ATTRIBUTE, ID_PREFIX};
pub use stylesheet::{render, render_inverted, Synthesizer, STYLE_ID};
pub use watch::Watcher;

pub use dusk_color;
