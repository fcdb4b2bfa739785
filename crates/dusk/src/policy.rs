//! Per-role color transform policy.
//!
//! The policy decides, for one sampled color in one role, whether it needs to
//! change for a dark palette and what it becomes. Activation is gated on
//! luminance so colors that already suit a dark page are left alone:
//!
//! | Role | Recolored when | Replacement |
//! |------|----------------|-------------|
//! | background | luminance > bg threshold | lightness inverted, floor 0.08, saturation capped at 0.4 |
//! | text | luminance < text threshold | lightness inverted, ceiling 0.88 |
//! | border | luminance > bg threshold or < text threshold | fixed translucent overlay |
//!
//! Inverting only HSL lightness keeps hue, so brand colors stay recognizable.

use dusk_color::{ColorSample, CssColor};

use crate::config::{EngineConfig, ResolvedPalette};
use crate::host::ComputedColors;

/// Darkened backgrounds never drop below this lightness.
pub const BACKGROUND_LIGHTNESS_FLOOR: f64 = 0.08;
/// Darkened backgrounds never exceed this saturation.
pub const BACKGROUND_SATURATION_CAP: f64 = 0.4;
/// Lightened text never exceeds this lightness.
pub const TEXT_LIGHTNESS_CEILING: f64 = 0.88;

/// Which property a color was sampled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Background,
    Text,
    Border,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Background, Role::Text, Role::Border];

    /// The CSS property this role is written to.
    pub fn property(self) -> &'static str {
        match self {
            Role::Background => "background-color",
            Role::Text => "color",
            Role::Border => "border-color",
        }
    }
}

/// The replacement colors computed for one element.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Declarations {
    pub background: Option<CssColor>,
    pub text: Option<CssColor>,
    pub border: Option<CssColor>,
}

impl Declarations {
    pub fn get(&self, role: Role) -> Option<CssColor> {
        match role {
            Role::Background => self.background,
            Role::Text => self.text,
            Role::Border => self.border,
        }
    }

    fn set(&mut self, role: Role, value: Option<CssColor>) {
        match role {
            Role::Background => self.background = value,
            Role::Text => self.text = value,
            Role::Border => self.border = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.background.is_none() && self.text.is_none() && self.border.is_none()
    }

    /// Present declarations as `(property, value)` in background, text, border order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, CssColor)> + '_ {
        Role::ALL
            .into_iter()
            .filter_map(move |role| self.get(role).map(|value| (role.property(), value)))
    }
}

/// Thresholds plus the border overlay, fixed for one session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Policy {
    bg_threshold: f64,
    text_threshold: f64,
    border_overlay: CssColor,
}

impl Policy {
    pub fn new(bg_threshold: f64, text_threshold: f64, border_overlay: CssColor) -> Self {
        Self {
            bg_threshold,
            text_threshold,
            border_overlay,
        }
    }

    pub fn from_config(config: &EngineConfig, palette: &ResolvedPalette) -> Self {
        Self::new(
            config.bg_luminance_threshold,
            config.text_luminance_threshold,
            palette.border_overlay,
        )
    }

    /// Returns the replacement for `sample` in `role`, or `None` to leave it.
    pub fn transform(&self, sample: &ColorSample, role: Role) -> Option<CssColor> {
        let lum = sample.luminance();
        match role {
            Role::Background if lum > self.bg_threshold => {
                let hsl = sample.hsl();
                let darkened = hsl
                    .with_lightness((1.0 - hsl.l).max(BACKGROUND_LIGHTNESS_FLOOR))
                    .with_saturation(hsl.s.min(BACKGROUND_SATURATION_CAP));
                Some(CssColor::Rgb(darkened.to_rgb()))
            }
            Role::Text if lum < self.text_threshold => {
                let hsl = sample.hsl();
                let lightened = hsl.with_lightness((1.0 - hsl.l).min(TEXT_LIGHTNESS_CEILING));
                Some(CssColor::Rgb(lightened.to_rgb()))
            }
            Role::Border if lum > self.bg_threshold || lum < self.text_threshold => {
                Some(self.border_overlay)
            }
            _ => None,
        }
    }

    /// Runs [`transform`](Self::transform) for every role of one element.
    /// Roles whose color is missing or unparseable contribute nothing.
    pub fn evaluate(&self, colors: &ComputedColors) -> Declarations {
        let mut declarations = Declarations::default();
        for role in Role::ALL {
            let value = colors
                .sample(role)
                .and_then(|sample| self.transform(&sample, role));
            declarations.set(role, value);
        }
        declarations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dusk_color::{rgb_to_hsl, Rgb};

    fn policy() -> Policy {
        Policy::new(0.5, 0.3, CssColor::Rgba(Rgb(255, 255, 255), 0.12))
    }

    fn sample(r: u8, g: u8, b: u8) -> ColorSample {
        ColorSample::new(Rgb(r, g, b))
    }

    fn lightness(color: CssColor) -> f64 {
        rgb_to_hsl(color.rgb()).l
    }

    // =====================================================================
    // Background
    // =====================================================================

    #[test]
    fn white_background_goes_dark_not_black() {
        let out = policy().transform(&sample(255, 255, 255), Role::Background).unwrap();
        assert_eq!(out, CssColor::Rgb(Rgb(20, 20, 20)));
        assert!(lightness(out) > 0.0);
    }

    #[test]
    fn dark_background_untouched() {
        assert!(policy().transform(&sample(30, 30, 30), Role::Background).is_none());
    }

    #[test]
    fn background_keeps_hue_and_caps_saturation() {
        // A pale saturated blue
        let input = sample(200, 220, 255);
        let out = policy().transform(&input, Role::Background).unwrap();
        let before = input.hsl();
        let after = rgb_to_hsl(out.rgb());

        assert!((after.h - before.h).abs() < 0.02, "hue drifted: {:?} -> {:?}", before, after);
        // Rounding to bytes at low lightness inflates saturation slightly
        assert!(after.s <= BACKGROUND_SATURATION_CAP + 0.05);
        assert!(after.l < 0.5);
    }

    // =====================================================================
    // Text
    // =====================================================================

    #[test]
    fn black_text_goes_light_not_white() {
        let out = policy().transform(&sample(0, 0, 0), Role::Text).unwrap();
        assert_eq!(out, CssColor::Rgb(Rgb(224, 224, 224)));
        assert!(lightness(out) < 1.0);
    }

    #[test]
    fn light_text_untouched() {
        assert!(policy().transform(&sample(240, 240, 240), Role::Text).is_none());
    }

    #[test]
    fn text_keeps_hue() {
        let input = sample(0, 0, 139); // darkblue
        let out = policy().transform(&input, Role::Text).unwrap();
        let after = rgb_to_hsl(out.rgb());
        assert!((after.h - input.hsl().h).abs() < 0.01);
        assert!(after.l > 0.5);
    }

    // =====================================================================
    // Border
    // =====================================================================

    #[test]
    fn extreme_borders_become_overlay() {
        let p = policy();
        let overlay = CssColor::Rgba(Rgb(255, 255, 255), 0.12);
        assert_eq!(p.transform(&sample(0, 0, 0), Role::Border), Some(overlay));
        assert_eq!(p.transform(&sample(255, 255, 255), Role::Border), Some(overlay));
        // Mid-gray sits between the thresholds
        assert_eq!(p.transform(&sample(160, 160, 160), Role::Border), None);
    }

    // =====================================================================
    // evaluate
    // =====================================================================

    #[test]
    fn evaluate_combines_roles() {
        let colors = ComputedColors {
            background: Some("rgb(255, 255, 255)".into()),
            text: Some("rgb(0, 0, 0)".into()),
            border: Some("transparent".into()),
        };
        let decls = policy().evaluate(&colors);
        assert!(decls.background.is_some());
        assert!(decls.text.is_some());
        assert!(decls.border.is_none());

        let props: Vec<_> = decls.iter().map(|(p, _)| p).collect();
        assert_eq!(props, vec!["background-color", "color"]);
    }

    #[test]
    fn evaluate_with_nothing_parseable_is_empty() {
        let colors = ComputedColors {
            background: Some("rgba(0, 0, 0, 0)".into()),
            text: Some("garbage".into()),
            border: None,
        };
        assert!(policy().evaluate(&colors).is_empty());
    }
}
