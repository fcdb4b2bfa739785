//! Parsing of CSS color strings.
//!
//! Computed styles reported by a host are almost always `rgb()`/`rgba()`
//! strings, but palette configuration and metadata are hand-written, so the
//! parser accepts the common CSS Color Level 4 forms:
//!
//! - Hex: `#fff`, `#ffff`, `#ffffff`, `#ffffffff`
//! - `rgb()` / `rgba()` in comma syntax (`rgb(255, 0, 0)`) and space syntax
//!   (`rgb(255 0 0 / 50%)`), with number or percentage channels
//! - `hsl()` / `hsla()` with unitless, `deg`, `rad`, `grad` or `turn` hues
//! - Named colors and `transparent`
//!
//! Tokenizing is delegated to `cssparser`, so comments, escapes and odd
//! whitespace behave exactly as they do in a browser.
//!
//! # Example
//!
//! ```rust
//! use dusk_color::{parse_color, parse_rgba, Rgb};
//!
//! assert_eq!(parse_color("rgb(255, 255, 255)").unwrap().rgb(), Rgb(255, 255, 255));
//! assert_eq!(parse_color("#123").unwrap().rgb(), Rgb(0x11, 0x22, 0x33));
//!
//! // Transparent and keyword values carry no usable color
//! assert!(parse_color("rgba(0, 0, 0, 0)").is_none());
//! assert!(parse_color("inherit").is_none());
//!
//! // parse_rgba keeps alpha and reports why parsing failed
//! assert_eq!(parse_rgba("rgb(0 0 0 / 50%)").unwrap().alpha, 0.5);
//! assert!(parse_rgba("cube(1, 2, 3)").is_err());
//! ```

use cssparser::{ParseError, ParseErrorKind, Parser, ParserInput, Token};

use crate::colorspace::{hsl_to_rgb, ColorSample, Hsl, Rgb};
use crate::error::ColorParseError;

type Failure<'i> = ParseError<'i, ColorParseError>;

/// Values a host may report for a color property that never denote a color.
const CSS_WIDE_KEYWORDS: &[&str] = &[
    "inherit",
    "initial",
    "unset",
    "revert",
    "currentcolor",
    "none",
    "auto",
];

/// A parsed color with its alpha channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub rgb: Rgb,
    /// Opacity in `0.0..=1.0`.
    pub alpha: f32,
}

impl Rgba {
    pub fn opaque(rgb: Rgb) -> Self {
        Self { rgb, alpha: 1.0 }
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha <= 0.0
    }
}

/// Parses a color string into a [`ColorSample`].
///
/// Returns `None` for unparseable input, CSS-wide keywords, `transparent`,
/// and any color with zero alpha. Partially transparent colors are sampled as
/// their opaque RGB value. Never panics.
pub fn parse_color(input: &str) -> Option<ColorSample> {
    let rgba = parse_rgba(input).ok()?;
    if rgba.is_transparent() {
        return None;
    }
    Some(ColorSample::new(rgba.rgb))
}

/// Parses a color string, keeping its alpha channel.
///
/// # Errors
///
/// Returns a [`ColorParseError`] describing why the input is not a color.
pub fn parse_rgba(input: &str) -> Result<Rgba, ColorParseError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ColorParseError::Empty);
    }

    let lower = trimmed.to_ascii_lowercase();
    if CSS_WIDE_KEYWORDS.contains(&lower.as_str()) {
        return Err(ColorParseError::Keyword(lower));
    }

    let mut css = ParserInput::new(trimmed);
    let mut parser = Parser::new(&mut css);
    parser
        .parse_entirely(parse_color_value)
        .map_err(|err| match err.kind {
            ParseErrorKind::Custom(err) => err,
            ParseErrorKind::Basic(_) => ColorParseError::Syntax(trimmed.to_string()),
        })
}

fn parse_color_value<'i>(input: &mut Parser<'i, '_>) -> Result<Rgba, Failure<'i>> {
    let location = input.current_source_location();
    let token = input.next()?.clone();
    match token {
        Token::Hash(ref value) | Token::IDHash(ref value) => {
            parse_hex(value).map_err(|e| location.new_custom_error(e))
        }
        Token::Ident(ref name) => named_color(name).map_err(|e| location.new_custom_error(e)),
        Token::Function(ref name) => {
            let name = name.to_ascii_lowercase();
            input.parse_nested_block(|args| match name.as_str() {
                "rgb" | "rgba" => parse_rgb_function(args),
                "hsl" | "hsla" => parse_hsl_function(args),
                _ => Err(args.new_custom_error(ColorParseError::UnsupportedFunction(name.clone()))),
            })
        }
        other => Err(location.new_unexpected_token_error(other)),
    }
}

// ─── Hex ────────────────────────────────────────────────────────────────────

/// Parses a hex color code (without the # prefix).
fn parse_hex(hex: &str) -> Result<Rgba, ColorParseError> {
    let invalid = || ColorParseError::InvalidHex(hex.to_string());
    let digit = |i: usize| {
        hex.get(i..i + 1)
            .and_then(|d| u8::from_str_radix(d, 16).ok())
            .ok_or_else(invalid)
    };
    let pair = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|d| u8::from_str_radix(d, 16).ok())
            .ok_or_else(invalid)
    };

    match hex.len() {
        // #rgb / #rgba
        3 | 4 => {
            let rgb = Rgb(digit(0)? * 17, digit(1)? * 17, digit(2)? * 17);
            let alpha = if hex.len() == 4 { digit(3)? * 17 } else { 255 };
            Ok(Rgba {
                rgb,
                alpha: alpha as f32 / 255.0,
            })
        }
        // #rrggbb / #rrggbbaa
        6 | 8 => {
            let rgb = Rgb(pair(0)?, pair(2)?, pair(4)?);
            let alpha = if hex.len() == 8 { pair(6)? } else { 255 };
            Ok(Rgba {
                rgb,
                alpha: alpha as f32 / 255.0,
            })
        }
        _ => Err(invalid()),
    }
}

// ─── Functions ──────────────────────────────────────────────────────────────

fn to_byte(v: f32) -> u8 {
    v.clamp(0.0, 255.0).round() as u8
}

/// One `rgb()` channel: a number in 0–255 or a percentage.
fn parse_channel<'i>(args: &mut Parser<'i, '_>) -> Result<u8, Failure<'i>> {
    let location = args.current_source_location();
    match *args.next()? {
        Token::Number { value, .. } => Ok(to_byte(value)),
        Token::Percentage { unit_value, .. } => Ok(to_byte(unit_value * 255.0)),
        ref t => Err(location.new_unexpected_token_error(t.clone())),
    }
}

/// An alpha value: a number in 0–1 or a percentage.
fn parse_alpha<'i>(args: &mut Parser<'i, '_>) -> Result<f32, Failure<'i>> {
    let location = args.current_source_location();
    match *args.next()? {
        Token::Number { value, .. } => Ok(value.clamp(0.0, 1.0)),
        Token::Percentage { unit_value, .. } => Ok(unit_value.clamp(0.0, 1.0)),
        ref t => Err(location.new_unexpected_token_error(t.clone())),
    }
}

/// The optional trailing alpha: `, a` in comma syntax, `/ a` in space syntax.
fn parse_alpha_tail<'i>(args: &mut Parser<'i, '_>, legacy: bool) -> Result<f32, Failure<'i>> {
    if args.is_exhausted() {
        return Ok(1.0);
    }
    if legacy {
        args.expect_comma()?;
    } else {
        args.expect_delim('/')?;
    }
    parse_alpha(args)
}

fn parse_rgb_function<'i>(args: &mut Parser<'i, '_>) -> Result<Rgba, Failure<'i>> {
    let r = parse_channel(args)?;
    let legacy = args.try_parse(|p| p.expect_comma()).is_ok();
    let g = parse_channel(args)?;
    if legacy {
        args.expect_comma()?;
    }
    let b = parse_channel(args)?;
    let alpha = parse_alpha_tail(args, legacy)?;
    Ok(Rgba {
        rgb: Rgb(r, g, b),
        alpha,
    })
}

/// A hue angle normalized to `0.0..1.0` turns.
fn parse_hue<'i>(args: &mut Parser<'i, '_>) -> Result<f64, Failure<'i>> {
    let location = args.current_source_location();
    let degrees = match *args.next()? {
        Token::Number { value, .. } => value as f64,
        Token::Dimension {
            value, ref unit, ..
        } => {
            let value = value as f64;
            match unit.to_ascii_lowercase().as_str() {
                "deg" => value,
                "grad" => value * 0.9,
                "rad" => value.to_degrees(),
                "turn" => value * 360.0,
                _ => {
                    return Err(location.new_custom_error(ColorParseError::Syntax(format!(
                        "unknown angle unit '{}'",
                        unit
                    ))))
                }
            }
        }
        ref t => return Err(location.new_unexpected_token_error(t.clone())),
    };
    Ok((degrees / 360.0).rem_euclid(1.0))
}

/// Saturation or lightness: a percentage, or a bare number meaning percent.
fn parse_fraction<'i>(args: &mut Parser<'i, '_>) -> Result<f64, Failure<'i>> {
    let location = args.current_source_location();
    match *args.next()? {
        Token::Percentage { unit_value, .. } => Ok((unit_value as f64).clamp(0.0, 1.0)),
        Token::Number { value, .. } => Ok((value as f64 / 100.0).clamp(0.0, 1.0)),
        ref t => Err(location.new_unexpected_token_error(t.clone())),
    }
}

fn parse_hsl_function<'i>(args: &mut Parser<'i, '_>) -> Result<Rgba, Failure<'i>> {
    let h = parse_hue(args)?;
    let legacy = args.try_parse(|p| p.expect_comma()).is_ok();
    let s = parse_fraction(args)?;
    if legacy {
        args.expect_comma()?;
    }
    let l = parse_fraction(args)?;
    let alpha = parse_alpha_tail(args, legacy)?;
    Ok(Rgba {
        rgb: hsl_to_rgb(Hsl { h, s, l }),
        alpha,
    })
}

// ─── Named colors ───────────────────────────────────────────────────────────

fn named_color(name: &str) -> Result<Rgba, ColorParseError> {
    let lower = name.to_ascii_lowercase();
    if lower == "transparent" {
        return Ok(Rgba {
            rgb: Rgb(0, 0, 0),
            alpha: 0.0,
        });
    }

    let rgb = match lower.as_str() {
        "black" => Rgb(0, 0, 0),
        "silver" => Rgb(192, 192, 192),
        "gray" | "grey" => Rgb(128, 128, 128),
        "white" => Rgb(255, 255, 255),
        "maroon" => Rgb(128, 0, 0),
        "red" => Rgb(255, 0, 0),
        "purple" => Rgb(128, 0, 128),
        "fuchsia" | "magenta" => Rgb(255, 0, 255),
        "green" => Rgb(0, 128, 0),
        "lime" => Rgb(0, 255, 0),
        "olive" => Rgb(128, 128, 0),
        "yellow" => Rgb(255, 255, 0),
        "navy" => Rgb(0, 0, 128),
        "blue" => Rgb(0, 0, 255),
        "teal" => Rgb(0, 128, 128),
        "aqua" | "cyan" => Rgb(0, 255, 255),
        "orange" => Rgb(255, 165, 0),
        "aliceblue" => Rgb(240, 248, 255),
        "antiquewhite" => Rgb(250, 235, 215),
        "azure" => Rgb(240, 255, 255),
        "beige" => Rgb(245, 245, 220),
        "brown" => Rgb(165, 42, 42),
        "coral" => Rgb(255, 127, 80),
        "cornsilk" => Rgb(255, 248, 220),
        "crimson" => Rgb(220, 20, 60),
        "darkblue" => Rgb(0, 0, 139),
        "darkgray" | "darkgrey" => Rgb(169, 169, 169),
        "darkgreen" => Rgb(0, 100, 0),
        "darkred" => Rgb(139, 0, 0),
        "darkslategray" | "darkslategrey" => Rgb(47, 79, 79),
        "dimgray" | "dimgrey" => Rgb(105, 105, 105),
        "dodgerblue" => Rgb(30, 144, 255),
        "floralwhite" => Rgb(255, 250, 240),
        "gainsboro" => Rgb(220, 220, 220),
        "ghostwhite" => Rgb(248, 248, 255),
        "gold" => Rgb(255, 215, 0),
        "honeydew" => Rgb(240, 255, 240),
        "indigo" => Rgb(75, 0, 130),
        "ivory" => Rgb(255, 255, 240),
        "lavender" => Rgb(230, 230, 250),
        "lightblue" => Rgb(173, 216, 230),
        "lightgray" | "lightgrey" => Rgb(211, 211, 211),
        "lightyellow" => Rgb(255, 255, 224),
        "linen" => Rgb(250, 240, 230),
        "mintcream" => Rgb(245, 255, 250),
        "mistyrose" => Rgb(255, 228, 225),
        "oldlace" => Rgb(253, 245, 230),
        "orangered" => Rgb(255, 69, 0),
        "pink" => Rgb(255, 192, 203),
        "rebeccapurple" => Rgb(102, 51, 153),
        "royalblue" => Rgb(65, 105, 225),
        "salmon" => Rgb(250, 128, 114),
        "seashell" => Rgb(255, 245, 238),
        "skyblue" => Rgb(135, 206, 235),
        "slategray" | "slategrey" => Rgb(112, 128, 144),
        "snow" => Rgb(255, 250, 250),
        "steelblue" => Rgb(70, 130, 180),
        "tomato" => Rgb(255, 99, 71),
        "violet" => Rgb(238, 130, 238),
        "wheat" => Rgb(245, 222, 179),
        "whitesmoke" => Rgb(245, 245, 245),
        _ => return Err(ColorParseError::UnknownName(name.to_string())),
    };
    Ok(Rgba::opaque(rgb))
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb_of(s: &str) -> Rgb {
        parse_rgba(s)
            .unwrap_or_else(|e| panic!("failed to parse {:?}: {}", s, e))
            .rgb
    }

    // =====================================================================
    // Hex
    // =====================================================================

    #[test]
    fn hex_short_and_long() {
        assert_eq!(rgb_of("#fff"), Rgb(255, 255, 255));
        assert_eq!(rgb_of("#ff6b35"), Rgb(255, 107, 53));
        assert_eq!(rgb_of("#FF6B35"), Rgb(255, 107, 53));
    }

    #[test]
    fn hex_with_alpha() {
        let c = parse_rgba("#00000080").unwrap();
        assert_eq!(c.rgb, Rgb(0, 0, 0));
        assert!((c.alpha - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(parse_rgba("#0000").unwrap().alpha, 0.0);
    }

    #[test]
    fn hex_rejects_bad_length_and_digits() {
        assert!(matches!(
            parse_rgba("#12345"),
            Err(ColorParseError::InvalidHex(_))
        ));
        assert!(matches!(
            parse_rgba("#ggg"),
            Err(ColorParseError::InvalidHex(_))
        ));
    }

    // =====================================================================
    // rgb() / rgba()
    // =====================================================================

    #[test]
    fn rgb_comma_syntax() {
        assert_eq!(rgb_of("rgb(255, 255, 255)"), Rgb(255, 255, 255));
        assert_eq!(rgb_of("rgba(10, 20, 30, 0.5)"), Rgb(10, 20, 30));
        assert_eq!(parse_rgba("rgba(10, 20, 30, 0.5)").unwrap().alpha, 0.5);
    }

    #[test]
    fn rgb_space_syntax() {
        assert_eq!(rgb_of("rgb(1 2 3)"), Rgb(1, 2, 3));
        let c = parse_rgba("rgb(1 2 3 / 25%)").unwrap();
        assert_eq!(c.alpha, 0.25);
    }

    #[test]
    fn rgb_percent_channels_and_clamping() {
        assert_eq!(rgb_of("rgb(100%, 0%, 50%)"), Rgb(255, 0, 128));
        assert_eq!(rgb_of("rgb(300, -5, 12.4)"), Rgb(255, 0, 12));
    }

    #[test]
    fn rgb_mixed_separators_rejected() {
        assert!(parse_rgba("rgb(1, 2 3)").is_err());
        assert!(parse_rgba("rgb(1 2 3, 0.5)").is_err());
        assert!(parse_rgba("rgb(1, 2)").is_err());
    }

    // =====================================================================
    // hsl()
    // =====================================================================

    #[test]
    fn hsl_forms() {
        assert_eq!(rgb_of("hsl(0, 100%, 50%)"), Rgb(255, 0, 0));
        assert_eq!(rgb_of("hsl(120deg 100% 50%)"), Rgb(0, 255, 0));
        assert_eq!(rgb_of("hsl(0.5turn, 100%, 50%)"), Rgb(0, 255, 255));
        assert_eq!(rgb_of("hsla(240, 100%, 50%, 1)"), Rgb(0, 0, 255));
    }

    #[test]
    fn hsl_unknown_unit_rejected() {
        assert!(parse_rgba("hsl(10px, 50%, 50%)").is_err());
    }

    // =====================================================================
    // Names, keywords, failures
    // =====================================================================

    #[test]
    fn named_colors_case_insensitive() {
        assert_eq!(rgb_of("White"), Rgb(255, 255, 255));
        assert_eq!(rgb_of("rebeccapurple"), Rgb(102, 51, 153));
        assert!(matches!(
            parse_rgba("blurple"),
            Err(ColorParseError::UnknownName(_))
        ));
    }

    #[test]
    fn keywords_are_not_colors() {
        for kw in ["inherit", "initial", "unset", "currentColor", "none"] {
            assert!(
                matches!(parse_rgba(kw), Err(ColorParseError::Keyword(_))),
                "{} should be a keyword",
                kw
            );
        }
    }

    #[test]
    fn parse_color_filters_transparent() {
        assert!(parse_color("transparent").is_none());
        assert!(parse_color("rgba(0, 0, 0, 0)").is_none());
        assert!(parse_color("#ffffff00").is_none());
        assert!(parse_color("").is_none());
        assert!(parse_color("   ").is_none());
    }

    #[test]
    fn parse_color_keeps_translucent_rgb() {
        let sample = parse_color("rgba(255, 255, 255, 0.4)").unwrap();
        assert_eq!(sample.rgb(), Rgb(255, 255, 255));
    }

    #[test]
    fn garbage_never_panics() {
        for s in ["rgb(", "#", "rgb(a, b, c)", "12px", "url(x.png)", "rgb(1,2,3) red", "cube(1,2,3)"] {
            assert!(parse_color(s).is_none(), "{:?} should not parse", s);
        }
        assert!(matches!(
            parse_rgba("lab(50% 10 10)"),
            Err(ColorParseError::UnsupportedFunction(_))
        ));
    }
}
