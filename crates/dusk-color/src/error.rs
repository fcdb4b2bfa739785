//! Error types for color parsing.

use thiserror::Error;

/// Errors returned by [`parse_rgba`](crate::parse_rgba).
///
/// [`parse_color`](crate::parse_color) swallows these and returns `None`;
/// use `parse_rgba` when the reason matters (e.g. validating configuration).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// The input was empty or only whitespace.
    #[error("empty color value")]
    Empty,

    /// A CSS-wide keyword (`inherit`, `currentcolor`, ...) that carries no color.
    #[error("'{0}' is a keyword, not a color")]
    Keyword(String),

    /// A `#` value with the wrong length or non-hex digits.
    #[error("invalid hex color: #{0}")]
    InvalidHex(String),

    /// An identifier that is not a known color name.
    #[error("unknown color name: {0}")]
    UnknownName(String),

    /// A function other than `rgb()`, `rgba()`, `hsl()` or `hsla()`.
    #[error("unsupported color function: {0}()")]
    UnsupportedFunction(String),

    /// Any other tokenizer-level failure.
    #[error("invalid color syntax: {0}")]
    Syntax(String),
}
