//! Detection of documents that are already dark.
//!
//! A page that ships its own dark theme must be left alone: recoloring it
//! would flip it back to light. Checks run in order and the first match wins:
//!
//! 1. The document's color-scheme hint mentions `dark`.
//! 2. The root or body carries a dark-theme keyword in its `class` or any
//!    `data-*` attribute (name or value, case-insensitive substring).
//! 3. The root's effective background (or the body's, when the root's is
//!    transparent or unset) has luminance below [`DARK_LUMINANCE`].
//!
//! With no usable sample the document is assumed light.

use log::trace;

use crate::host::Document;
use crate::policy::Role;

/// Backgrounds darker than this count as an existing dark theme.
pub const DARK_LUMINANCE: f64 = 0.4;

const DARK_KEYWORDS: &[&str] = &["dark", "night", "theme-dark", "dark-mode"];

/// Why a document was considered dark.
#[derive(Debug, Clone, PartialEq)]
pub enum DarkSignal {
    /// The color-scheme hint asked for dark.
    ColorSchemeHint(String),
    /// A dark-theme keyword was found on the root or body.
    Keyword { attribute: String, value: String },
    /// The sampled background was dark.
    Background { luminance: f64 },
}

/// Returns the first signal that the document already renders dark, if any.
///
/// Pure and idempotent. Works before the body exists by checking the root only;
/// without a root it reports nothing.
pub fn detect_dark_signal<D: Document>(doc: &D) -> Option<DarkSignal> {
    if let Some(hint) = doc.color_scheme_hint() {
        if hint.to_ascii_lowercase().contains("dark") {
            return Some(DarkSignal::ColorSchemeHint(hint));
        }
    }

    let root = doc.root()?;
    let body = doc.body();
    let anchors = std::iter::once(root).chain(body.filter(|b| *b != root));

    for node in anchors.clone() {
        if let Some(signal) = keyword_signal(doc, node) {
            return Some(signal);
        }
    }

    let luminance = anchors
        .filter_map(|node| doc.computed_colors(node).ok())
        .find_map(|colors| colors.sample(Role::Background))?
        .luminance();
    trace!("sampled page background luminance {:.3}", luminance);

    (luminance < DARK_LUMINANCE).then_some(DarkSignal::Background { luminance })
}

/// Whether the document is already dark. See [`detect_dark_signal`].
pub fn is_already_dark<D: Document>(doc: &D) -> bool {
    detect_dark_signal(doc).is_some()
}

fn keyword_signal<D: Document>(doc: &D, node: D::Node) -> Option<DarkSignal> {
    doc.attributes(node)
        .into_iter()
        .filter(|(name, _)| {
            let name = name.to_ascii_lowercase();
            name == "class" || name.starts_with("data-")
        })
        .find(|(name, value)| {
            let haystack = if name.eq_ignore_ascii_case("class") {
                value.to_ascii_lowercase()
            } else {
                format!("{} {}", name, value).to_ascii_lowercase()
            };
            DARK_KEYWORDS.iter().any(|kw| haystack.contains(kw))
        })
        .map(|(attribute, value)| DarkSignal::Keyword { attribute, value })
}
