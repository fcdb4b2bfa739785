//! # Dusk Color - color math for adaptive dark palettes
//!
//! `dusk-color` holds the pure numeric side of the `dusk` recoloring engine:
//!
//! - [`parse_color`] / [`parse_rgba`]: CSS color strings to [`Rgb`] samples
//! - [`luminance`]: sRGB relative luminance in `0.0..=1.0`
//! - [`rgb_to_hsl`] / [`hsl_to_rgb`]: bidirectional HSL conversion, stable to
//!   ±1 per channel on round-trip
//! - [`ColorSample`]: an immutable color with its luminance and HSL form
//! - [`CssColor`]: a declaration value serialized as `rgb()` / `rgba()`
//!
//! Nothing here touches a document; the crate can be used on its own for any
//! contrast or palette computation.
//!
//! ```rust
//! use dusk_color::{parse_color, Rgb};
//!
//! let sample = parse_color("rgb(250, 250, 250)").unwrap();
//! assert!(sample.luminance() > 0.9);
//!
//! // Flip lightness while keeping hue
//! let dark = sample.hsl().inverted().to_rgb();
//! assert!(dark.0 < 10);
//! ```

mod colorspace;
mod error;
mod parse;

pub use colorspace::{hsl_to_rgb, luminance, rgb_to_hsl, ColorSample, CssColor, Hsl, Rgb};
pub use error::ColorParseError;
pub use parse::{parse_color, parse_rgba, Rgba};
