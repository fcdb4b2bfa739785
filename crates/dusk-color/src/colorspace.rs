//! sRGB, relative luminance and HSL conversions.
//!
//! # Why HSL?
//!
//! Recoloring a light page for a dark palette needs to flip brightness while
//! keeping each color recognizable. HSL separates lightness from hue and
//! saturation, so inverting `l` alone turns a pale blue panel into a deep blue
//! one instead of the muddy orange a plain RGB inversion would produce.
//!
//! Luminance follows the sRGB relative luminance definition used by WCAG:
//! each channel is linearized and combined with the Rec. 709 weights
//! `0.2126 / 0.7152 / 0.0722`.
//!
//! # Example
//!
//! ```rust
//! use dusk_color::{hsl_to_rgb, luminance, rgb_to_hsl, Rgb};
//!
//! assert_eq!(luminance(Rgb(0, 0, 0)), 0.0);
//! assert!((luminance(Rgb(255, 255, 255)) - 1.0).abs() < 1e-9);
//!
//! let hsl = rgb_to_hsl(Rgb(200, 100, 50));
//! assert_eq!(hsl_to_rgb(hsl), Rgb(200, 100, 50));
//! ```

use std::fmt;

// ─── RGB type ───────────────────────────────────────────────────────────────

/// An opaque sRGB color triplet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

// ─── HSL type ───────────────────────────────────────────────────────────────

/// Hue, saturation and lightness, each normalized to `0.0..=1.0`.
///
/// A hue of `0.0` and `1.0` are the same (red).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    /// Returns a copy with a different lightness, clamped to `0.0..=1.0`.
    pub fn with_lightness(self, l: f64) -> Self {
        Self {
            l: l.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Returns a copy with a different saturation, clamped to `0.0..=1.0`.
    pub fn with_saturation(self, s: f64) -> Self {
        Self {
            s: s.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Returns a copy with lightness mirrored around the midpoint (`l' = 1 - l`).
    pub fn inverted(self) -> Self {
        self.with_lightness(1.0 - self.l)
    }

    pub fn to_rgb(self) -> Rgb {
        hsl_to_rgb(self)
    }
}

// ─── Luminance ──────────────────────────────────────────────────────────────

/// Convert an sRGB component (0–255) to linear light (0.0–1.0).
fn srgb_to_linear(c: u8) -> f64 {
    let v = c as f64 / 255.0;
    if v <= 0.03928 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

/// Relative luminance of an sRGB color, in `0.0..=1.0`.
pub fn luminance(rgb: Rgb) -> f64 {
    let r = srgb_to_linear(rgb.0);
    let g = srgb_to_linear(rgb.1);
    let b = srgb_to_linear(rgb.2);
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

// ─── RGB ↔ HSL ──────────────────────────────────────────────────────────────

/// Converts an sRGB color to HSL.
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = rgb.0 as f64 / 255.0;
    let g = rgb.1 as f64 / 255.0;
    let b = rgb.2 as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        // Achromatic
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl { h: h / 6.0, s, l }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn to_byte(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Converts an HSL color back to sRGB, rounding each channel.
pub fn hsl_to_rgb(hsl: Hsl) -> Rgb {
    let Hsl { h, s, l } = hsl;
    if s == 0.0 {
        let v = to_byte(l);
        return Rgb(v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    Rgb(
        to_byte(hue_to_channel(p, q, h + 1.0 / 3.0)),
        to_byte(hue_to_channel(p, q, h)),
        to_byte(hue_to_channel(p, q, h - 1.0 / 3.0)),
    )
}

// ─── ColorSample ────────────────────────────────────────────────────────────

/// A sampled color with its derived luminance and HSL representation.
///
/// Samples are computed once from an [`Rgb`] and never mutated; derive a new
/// sample for a new color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSample {
    rgb: Rgb,
    luminance: f64,
    hsl: Hsl,
}

impl ColorSample {
    pub fn new(rgb: Rgb) -> Self {
        Self {
            rgb,
            luminance: luminance(rgb),
            hsl: rgb_to_hsl(rgb),
        }
    }

    pub fn rgb(&self) -> Rgb {
        self.rgb
    }

    pub fn luminance(&self) -> f64 {
        self.luminance
    }

    pub fn hsl(&self) -> Hsl {
        self.hsl
    }
}

impl From<Rgb> for ColorSample {
    fn from(rgb: Rgb) -> Self {
        Self::new(rgb)
    }
}

// ─── CssColor ───────────────────────────────────────────────────────────────

/// A color value ready to be written into a stylesheet declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CssColor {
    /// Opaque color, serialized as `rgb(r, g, b)`.
    Rgb(Rgb),
    /// Translucent color, serialized as `rgba(r, g, b, a)`.
    Rgba(Rgb, f32),
}

impl CssColor {
    pub fn rgb(&self) -> Rgb {
        match self {
            CssColor::Rgb(rgb) | CssColor::Rgba(rgb, _) => *rgb,
        }
    }

    pub fn alpha(&self) -> f32 {
        match self {
            CssColor::Rgb(_) => 1.0,
            CssColor::Rgba(_, a) => *a,
        }
    }
}

impl From<Rgb> for CssColor {
    fn from(rgb: Rgb) -> Self {
        CssColor::Rgb(rgb)
    }
}

impl fmt::Display for CssColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CssColor::Rgb(rgb) => fmt::Display::fmt(rgb, f),
            CssColor::Rgba(Rgb(r, g, b), a) => write!(f, "rgba({}, {}, {}, {})", r, g, b, a),
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, eps: f64) {
        assert!((a - b).abs() < eps, "expected {} ≈ {} (eps {})", a, b, eps);
    }

    // =====================================================================
    // Luminance
    // =====================================================================

    #[test]
    fn luminance_black_is_zero() {
        assert_eq!(luminance(Rgb(0, 0, 0)), 0.0);
    }

    #[test]
    fn luminance_white_is_one() {
        assert_close(luminance(Rgb(255, 255, 255)), 1.0, 1e-9);
    }

    #[test]
    fn luminance_green_dominates() {
        let r = luminance(Rgb(255, 0, 0));
        let g = luminance(Rgb(0, 255, 0));
        let b = luminance(Rgb(0, 0, 255));
        assert_close(r, 0.2126, 1e-4);
        assert_close(g, 0.7152, 1e-4);
        assert_close(b, 0.0722, 1e-4);
        assert!(g > r && r > b);
    }

    #[test]
    fn luminance_low_channels_use_linear_segment() {
        // 10/255 ≈ 0.0392 sits just below the 0.03928 knee
        assert_close(luminance(Rgb(10, 10, 10)), (10.0 / 255.0) / 12.92, 1e-9);
    }

    #[test]
    fn luminance_mid_gray() {
        // #808080 is roughly 21.6% luminance
        assert_close(luminance(Rgb(128, 128, 128)), 0.2158, 1e-3);
    }

    // =====================================================================
    // HSL conversions
    // =====================================================================

    #[test]
    fn hsl_of_pure_red() {
        let hsl = rgb_to_hsl(Rgb(255, 0, 0));
        assert_close(hsl.h, 0.0, 1e-9);
        assert_close(hsl.s, 1.0, 1e-9);
        assert_close(hsl.l, 0.5, 1e-9);
    }

    #[test]
    fn hsl_of_gray_is_achromatic() {
        let hsl = rgb_to_hsl(Rgb(128, 128, 128));
        assert_eq!(hsl.s, 0.0);
        assert_eq!(hsl.h, 0.0);
    }

    #[test]
    fn hsl_hue_positions() {
        assert_close(rgb_to_hsl(Rgb(0, 255, 0)).h, 1.0 / 3.0, 1e-9);
        assert_close(rgb_to_hsl(Rgb(0, 0, 255)).h, 2.0 / 3.0, 1e-9);
        // Magenta wraps through the g < b branch
        assert_close(rgb_to_hsl(Rgb(255, 0, 255)).h, 5.0 / 6.0, 1e-9);
    }

    #[test]
    fn hsl_to_rgb_primaries() {
        assert_eq!(hsl_to_rgb(Hsl { h: 0.0, s: 1.0, l: 0.5 }), Rgb(255, 0, 0));
        assert_eq!(
            hsl_to_rgb(Hsl { h: 1.0 / 3.0, s: 1.0, l: 0.5 }),
            Rgb(0, 255, 0)
        );
        assert_eq!(
            hsl_to_rgb(Hsl { h: 2.0 / 3.0, s: 1.0, l: 0.5 }),
            Rgb(0, 0, 255)
        );
    }

    #[test]
    fn roundtrip_samples() {
        for rgb in [
            Rgb(0, 0, 0),
            Rgb(255, 255, 255),
            Rgb(200, 100, 50),
            Rgb(18, 52, 86),
            Rgb(250, 250, 240),
            Rgb(1, 2, 3),
        ] {
            let back = hsl_to_rgb(rgb_to_hsl(rgb));
            let d = |a: u8, b: u8| (a as i16 - b as i16).abs();
            assert!(
                d(rgb.0, back.0) <= 1 && d(rgb.1, back.1) <= 1 && d(rgb.2, back.2) <= 1,
                "round-trip drifted: {:?} -> {:?}",
                rgb,
                back
            );
        }
    }

    #[test]
    fn inverted_mirrors_lightness() {
        let hsl = Hsl {
            h: 0.6,
            s: 0.5,
            l: 0.9,
        };
        let inv = hsl.inverted();
        assert_close(inv.l, 0.1, 1e-9);
        assert_eq!(inv.h, hsl.h);
        assert_eq!(inv.s, hsl.s);
    }

    #[test]
    fn with_lightness_clamps() {
        let hsl = Hsl {
            h: 0.0,
            s: 0.0,
            l: 0.5,
        };
        assert_eq!(hsl.with_lightness(1.5).l, 1.0);
        assert_eq!(hsl.with_lightness(-0.5).l, 0.0);
        assert_eq!(hsl.with_saturation(2.0).s, 1.0);
    }

    // =====================================================================
    // ColorSample / CssColor
    // =====================================================================

    #[test]
    fn sample_derives_luminance_and_hsl() {
        let sample = ColorSample::new(Rgb(255, 255, 255));
        assert_close(sample.luminance(), 1.0, 1e-9);
        assert_close(sample.hsl().l, 1.0, 1e-9);
        assert_eq!(sample.rgb(), Rgb(255, 255, 255));
    }

    #[test]
    fn css_color_display() {
        assert_eq!(CssColor::Rgb(Rgb(18, 18, 18)).to_string(), "rgb(18, 18, 18)");
        assert_eq!(
            CssColor::Rgba(Rgb(255, 255, 255), 0.12).to_string(),
            "rgba(255, 255, 255, 0.12)"
        );
    }
}
