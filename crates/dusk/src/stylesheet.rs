//! Generated stylesheet synthesis.
//!
//! The engine owns exactly one managed stylesheet, identified by
//! [`STYLE_ID`]. Every regeneration replaces its whole text, so the sheet is
//! always a pure function of the current override records and palette.
//!
//! Layout of an adaptive sheet:
//!
//! ```css
//! [data-dusk-id="dusk-0"] { background-color: rgb(20, 20, 20) !important; }
//! [data-dusk-id="dusk-1"] { color: rgb(224, 224, 224) !important; border-color: rgba(255, 255, 255, 0.12) !important; }
//! html { background-color: rgb(18, 18, 18) !important; color: rgb(224, 224, 224) !important; }
//! body { background-color: rgb(18, 18, 18) !important; color: rgb(224, 224, 224) !important; }
//! ```
//!
//! The base rules come last but lose to per-element rules on specificity, so a
//! record for `html` or `body` still applies.

use std::fmt::Write as _;

use log::debug;

use crate::config::ResolvedPalette;
use crate::host::Document;
use crate::scan::OverrideRecord;

/// Identifier of the managed style injection point.
pub const STYLE_ID: &str = "dusk-dark-style";

/// Whole-document inversion, re-inverting media so it keeps its look.
const INVERT_SHEET: &str = "\
html { filter: invert(1) hue-rotate(180deg) !important; }
img, video, canvas, [style*=\"background-image\"] { filter: invert(1) hue-rotate(180deg) !important; }
html { transition: filter 0.3s ease-in-out; }
";

/// Renders the adaptive stylesheet for a set of records.
pub fn render(records: &[OverrideRecord], palette: &ResolvedPalette) -> String {
    let mut css = String::new();

    for record in records {
        let _ = write!(css, "{} {{", record.selector());
        for (property, value) in record.declarations.iter() {
            let _ = write!(css, " {}: {} !important;", property, value);
        }
        css.push_str(" }\n");
    }

    for selector in ["html", "body"] {
        let _ = writeln!(
            css,
            "{} {{ background-color: {} !important; color: {} !important; }}",
            selector, palette.base_background, palette.base_text
        );
    }

    css
}

/// The fixed stylesheet used by [`Strategy::Invert`](crate::Strategy::Invert).
pub fn render_inverted() -> &'static str {
    INVERT_SHEET
}

/// Owner of the managed stylesheet for one session.
#[derive(Debug, Default)]
pub struct Synthesizer {
    text: Option<String>,
    generation: u64,
}

impl Synthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stylesheet with one derived from `records`.
    pub fn regenerate<D: Document>(
        &mut self,
        doc: &mut D,
        records: &[OverrideRecord],
        palette: &ResolvedPalette,
    ) {
        self.write(doc, render(records, palette));
        debug!(
            "stylesheet generation {} with {} override rules",
            self.generation,
            records.len()
        );
    }

    /// Replaces the stylesheet with the whole-document inversion rules.
    pub fn write_inverted<D: Document>(&mut self, doc: &mut D) {
        self.write(doc, render_inverted().to_string());
        debug!("stylesheet generation {} (inverted)", self.generation);
    }

    fn write<D: Document>(&mut self, doc: &mut D, text: String) {
        doc.write_style(STYLE_ID, &text);
        self.text = Some(text);
        self.generation += 1;
    }

    /// Removes the stylesheet from the document, if one was written.
    pub fn remove<D: Document>(&mut self, doc: &mut D) {
        if self.text.take().is_some() {
            doc.remove_style(STYLE_ID);
        }
    }

    /// The text most recently written.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// How many times the stylesheet has been written.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
