// ── Colors ──
//
// Hex parsing is fallible and kept apart from the brightness computation,
// which is total over valid RGB.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Text color for light backgrounds.
pub const BLACK: &str = "#000000";
/// Text color for dark backgrounds.
pub const WHITE: &str = "#ffffff";
/// Background assumed for cards whose template has no background color.
pub const CARD_FALLBACK_BACKGROUND: &str = "#f8fafc";

/// Brightness threshold, in thousandths: `Y > 125` selects black text.
const BRIGHTNESS_THRESHOLD_MILLIS: u32 = 125_000;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("color '{input}' must start with '#'")]
    MissingHash { input: String },

    #[error("color '{input}' must be #RRGGBB (6 hex digits)")]
    WrongLength { input: String },

    #[error("color '{input}' contains a non-hexadecimal digit")]
    InvalidDigit { input: String },
}

/// An sRGB color decoded from `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Decode a 6-digit `#RRGGBB` string (either case). Shorthand `#RGB`
    /// is rejected.
    pub fn from_hex(input: &str) -> Result<Self, ColorError> {
        let Some(digits) = input.strip_prefix('#') else {
            return Err(ColorError::MissingHash {
                input: input.to_owned(),
            });
        };
        if digits.len() != 6 {
            return Err(ColorError::WrongLength {
                input: input.to_owned(),
            });
        }
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ColorError::InvalidDigit {
                input: input.to_owned(),
            });
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| ColorError::InvalidDigit {
                input: input.to_owned(),
            })
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Perceived brightness scaled by 1000: `299R + 587G + 114B`.
    pub fn brightness_millis(self) -> u32 {
        299 * u32::from(self.r) + 587 * u32::from(self.g) + 114 * u32::from(self.b)
    }

    /// Perceived brightness `Y` in `0..=255`, rounded down.
    pub fn brightness(self) -> u32 {
        self.brightness_millis() / 1000
    }

    /// Black for bright backgrounds, white otherwise.
    pub fn contrast_text(self) -> &'static str {
        if self.brightness_millis() > BRIGHTNESS_THRESHOLD_MILLIS {
            BLACK
        } else {
            WHITE
        }
    }

    pub fn is_light(self) -> bool {
        self.contrast_text() == BLACK
    }
}

impl FromStr for Rgb {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Readable text color (`#000000` or `#ffffff`) over `background`.
pub fn contrast_text_color(background: &str) -> Result<&'static str, ColorError> {
    Rgb::from_hex(background).map(Rgb::contrast_text)
}

/// `^#([0-9A-F]{6}|[0-9A-F]{3})$`, case-insensitive.
pub fn is_hex_color(s: &str) -> bool {
    s.strip_prefix('#').is_some_and(|digits| {
        matches!(digits.len(), 3 | 6) && digits.bytes().all(|b| b.is_ascii_hexdigit())
    })
}
