//! Preferred color mode, for "follow system" hosts.
//!
//! [`detect_color_mode`] resolves the preference in two steps:
//!
//! 1. `DUSK_COLOR_MODE` (`dark` or `light`), when set to a valid value
//! 2. the OS appearance setting, read through `dark-light`
//!
//! [`Engine::sync_with_os`](crate::Engine::sync_with_os) feeds the result to
//! [`Engine::apply_mode`](crate::Engine::apply_mode).
//!
//! ```rust
//! use dusk::ColorMode;
//!
//! assert_eq!("Dark".parse::<ColorMode>().unwrap(), ColorMode::Dark);
//! assert!(ColorMode::Dark.is_dark());
//! assert!("sepia".parse::<ColorMode>().is_err());
//! ```

use std::env;
use std::fmt;
use std::str::FromStr;

use log::debug;

use crate::error::ConfigError;

/// Environment variable that pins the detected mode.
pub const MODE_ENV: &str = "DUSK_COLOR_MODE";

/// The user's preferred color mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorMode {
    #[default]
    Light,
    Dark,
}

impl ColorMode {
    pub fn is_dark(self) -> bool {
        self == ColorMode::Dark
    }
}

impl FromStr for ColorMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(ColorMode::Dark),
            "light" => Ok(ColorMode::Light),
            _ => Err(ConfigError::UnknownColorMode(s.to_string())),
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
        })
    }
}

impl From<dark_light::Mode> for ColorMode {
    fn from(mode: dark_light::Mode) -> Self {
        match mode {
            dark_light::Mode::Dark => ColorMode::Dark,
            // Unspecified counts as light
            _ => ColorMode::Light,
        }
    }
}

/// Resolves the preferred color mode.
///
/// An invalid `DUSK_COLOR_MODE` is ignored. An unreadable OS preference
/// counts as [`ColorMode::Light`].
pub fn detect_color_mode() -> ColorMode {
    if let Some(mode) = env_override() {
        return mode;
    }
    match dark_light::detect() {
        Ok(mode) => mode.into(),
        Err(err) => {
            debug!("OS color mode unavailable: {}", err);
            ColorMode::Light
        }
    }
}

fn env_override() -> Option<ColorMode> {
    let raw = env::var(MODE_ENV).ok()?;
    match raw.parse() {
        Ok(mode) => Some(mode),
        Err(err) => {
            debug!("ignoring {}: {}", MODE_ENV, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(" LIGHT ".parse::<ColorMode>().unwrap(), ColorMode::Light);
        assert!(matches!(
            "dim".parse::<ColorMode>(),
            Err(ConfigError::UnknownColorMode(_))
        ));
    }

    #[test]
    fn display_matches_parse() {
        for mode in [ColorMode::Light, ColorMode::Dark] {
            assert_eq!(mode.to_string().parse::<ColorMode>().unwrap(), mode);
        }
    }

    #[test]
    fn os_modes_map_to_color_modes() {
        assert_eq!(ColorMode::from(dark_light::Mode::Dark), ColorMode::Dark);
        assert_eq!(ColorMode::from(dark_light::Mode::Light), ColorMode::Light);
        assert_eq!(ColorMode::from(dark_light::Mode::Unspecified), ColorMode::Light);
    }

    #[test]
    #[serial]
    fn env_override_wins() {
        env::set_var(MODE_ENV, "dark");
        assert_eq!(detect_color_mode(), ColorMode::Dark);

        env::set_var(MODE_ENV, "light");
        assert_eq!(detect_color_mode(), ColorMode::Light);

        env::set_var(MODE_ENV, "dusk");
        assert_eq!(env_override(), None);

        env::remove_var(MODE_ENV);
    }
}
