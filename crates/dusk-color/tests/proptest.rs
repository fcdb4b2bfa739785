//! Property-based tests for dusk-color using proptest.

use dusk_color::{hsl_to_rgb, luminance, parse_color, rgb_to_hsl, Rgb};
use proptest::prelude::*;

fn rgb_strategy() -> impl Strategy<Value = Rgb> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| Rgb(r, g, b))
}

fn channel_delta(a: u8, b: u8) -> u8 {
    (a as i16 - b as i16).unsigned_abs() as u8
}

proptest! {
    /// RGB → HSL → RGB stays within one unit per channel.
    #[test]
    fn hsl_roundtrip_is_stable(rgb in rgb_strategy()) {
        let back = hsl_to_rgb(rgb_to_hsl(rgb));
        prop_assert!(channel_delta(rgb.0, back.0) <= 1, "{:?} -> {:?}", rgb, back);
        prop_assert!(channel_delta(rgb.1, back.1) <= 1, "{:?} -> {:?}", rgb, back);
        prop_assert!(channel_delta(rgb.2, back.2) <= 1, "{:?} -> {:?}", rgb, back);
    }

    /// HSL components stay normalized.
    #[test]
    fn hsl_components_in_unit_range(rgb in rgb_strategy()) {
        let hsl = rgb_to_hsl(rgb);
        prop_assert!((0.0..=1.0).contains(&hsl.h));
        prop_assert!((0.0..=1.0).contains(&hsl.s));
        prop_assert!((0.0..=1.0).contains(&hsl.l));
    }

    /// Luminance is bounded and monotonic in each channel.
    #[test]
    fn luminance_bounded_and_monotonic(rgb in rgb_strategy()) {
        let l = luminance(rgb);
        prop_assert!((0.0..=1.0 + 1e-9).contains(&l));
        if rgb.0 < 255 {
            prop_assert!(luminance(Rgb(rgb.0 + 1, rgb.1, rgb.2)) >= l);
        }
    }

    /// Whatever the rgb() serialization of a color is, it parses back to itself.
    #[test]
    fn serialized_rgb_parses_back(rgb in rgb_strategy()) {
        let sample = parse_color(&rgb.to_string()).unwrap();
        prop_assert_eq!(sample.rgb(), rgb);
    }

    /// Arbitrary input never panics the parser.
    #[test]
    fn parser_never_panics(s in "\\PC{0,40}") {
        let _ = parse_color(&s);
    }
}
