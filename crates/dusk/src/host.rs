//! The two capabilities the engine needs from its hosting environment.
//!
//! The engine never owns a document. It reads and annotates one through
//! [`Document`] (element tree, computed colors, one managed stylesheet) and
//! schedules deferred work through [`EventLoop`] (insertion notifications and
//! one-shot timers). Anything implementing both is a [`Host`].
//!
//! The host is responsible for delivering events back to the engine:
//!
//! - inserted nodes go to [`Engine::nodes_inserted`](crate::Engine::nodes_inserted)
//!   while an observer is connected
//! - expired timers go to [`Engine::timer_fired`](crate::Engine::timer_fired)
//!
//! [`MemoryDocument`](crate::MemoryDocument) is a complete in-memory host.

use std::fmt;
use std::hash::Hash;
use std::time::Duration;

use dusk_color::{parse_color, ColorSample};

use crate::error::HostError;
use crate::policy::Role;

// ─── Node classification ────────────────────────────────────────────────────

/// Whether an element's own colors may be adjusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRole {
    /// Regular content: sampled and possibly recolored.
    Visual,
    /// Scripts, styles, media and embedded frames: never recolored, never
    /// descended into.
    NonVisual,
}

impl ElementRole {
    /// Classifies an element by its (case-insensitive) tag name.
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "script" | "style" | "noscript" | "template" | "link" | "meta" | "img" | "picture"
            | "video" | "audio" | "canvas" | "svg" | "iframe" | "frame" | "embed" | "object" => {
                ElementRole::NonVisual
            }
            _ => ElementRole::Visual,
        }
    }
}

/// What kind of node a tree position holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element(ElementRole),
    Text,
    Comment,
    Other,
}

// ─── Computed colors ────────────────────────────────────────────────────────

/// The three effective colors of an element, as the host's style system
/// reports them (typically `rgb()` / `rgba()` strings).
///
/// `None` means the host has no value for that property.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComputedColors {
    pub background: Option<String>,
    pub text: Option<String>,
    pub border: Option<String>,
}

impl ComputedColors {
    /// Parses the value for `role`. Transparent, unset and unparseable values
    /// all yield `None`.
    pub fn sample(&self, role: Role) -> Option<ColorSample> {
        let raw = match role {
            Role::Background => self.background.as_deref(),
            Role::Text => self.text.as_deref(),
            Role::Border => self.border.as_deref(),
        }?;
        parse_color(raw)
    }
}

// ─── Document ───────────────────────────────────────────────────────────────

/// Read access to an element tree plus the few writes the engine performs.
pub trait Document {
    /// Stable node identity. Two handles to the same node must compare equal.
    type Node: Copy + Eq + Hash + fmt::Debug;

    /// The document element (`html`), if the document has one yet.
    fn root(&self) -> Option<Self::Node>;

    /// The `body` element, if parsed yet.
    fn body(&self) -> Option<Self::Node>;

    fn node_kind(&self, node: Self::Node) -> NodeKind;

    /// Direct children in document order.
    fn children(&self, node: Self::Node) -> Vec<Self::Node>;

    /// The parent element, or `None` for the root and detached nodes.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// All attributes of an element as `(name, value)` pairs.
    fn attributes(&self, node: Self::Node) -> Vec<(String, String)>;

    fn attribute(&self, node: Self::Node, name: &str) -> Option<String> {
        self.attributes(node)
            .into_iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    fn set_attribute(&mut self, node: Self::Node, name: &str, value: &str);

    fn remove_attribute(&mut self, node: Self::Node, name: &str);

    /// The element's effective colors after cascade and inheritance.
    fn computed_colors(&self, node: Self::Node) -> Result<ComputedColors, HostError>;

    /// The document-level color-scheme hint (e.g. `<meta name="color-scheme">`).
    fn color_scheme_hint(&self) -> Option<String>;

    /// Replaces the text of the managed stylesheet `id`, creating it on first use.
    fn write_style(&mut self, id: &str, text: &str);

    /// Removes the managed stylesheet `id`. Returns whether one existed.
    fn remove_style(&mut self, id: &str) -> bool;
}

// ─── Event loop ─────────────────────────────────────────────────────────────

/// Handle for a pending one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Structural-change notifications and deferred callbacks.
pub trait EventLoop {
    /// Starts reporting node insertions under the root.
    fn observe_insertions(&mut self);

    /// Stops reporting node insertions.
    fn disconnect_observer(&mut self);

    /// Schedules a one-shot timer. The host reports expiry through
    /// [`Engine::timer_fired`](crate::Engine::timer_fired).
    fn set_timeout(&mut self, delay: Duration) -> TimerId;

    /// Cancels a pending timer. Cancelling an expired or unknown timer is a no-op.
    fn clear_timeout(&mut self, timer: TimerId);
}

/// A document together with its event loop.
pub trait Host: Document + EventLoop {}

impl<T: Document + EventLoop> Host for T {}
