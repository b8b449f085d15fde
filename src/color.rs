//! Hex colours as they appear in the config file.
//!
//! Only the strict `#RRGGBB` form is accepted: a leading `#` followed by
//! exactly six hex digits (either case).  Shorthand (`#abc`), alpha
//! channels and named colours are rejected.

use std::fmt;
use std::str::FromStr;

/// An opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// The string was not a `#RRGGBB` colour.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid hex colour {0:?}, expected #RRGGBB")]
pub struct HexColorError(pub String);

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#RRGGBB` string.
    pub fn parse(s: &str) -> Result<Self, HexColorError> {
        let err = || HexColorError(s.to_string());
        let digits = s.strip_prefix('#').ok_or_else(err)?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| err());
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }

    /// Whether `s` is a valid `#RRGGBB` colour.
    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_ok()
    }
}

impl FromStr for HexColor {
    type Err = HexColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_six_digit_hex() {
        assert_eq!(HexColor::parse("#aaaaff").unwrap(), HexColor::rgb(0xaa, 0xaa, 0xff));
        assert_eq!(HexColor::parse("#00FF7f").unwrap(), HexColor::rgb(0, 255, 127));
        assert_eq!(HexColor::parse("#000000").unwrap(), HexColor::rgb(0, 0, 0));
    }

    #[test]
    fn rejects_everything_else() {
        for bad in [
            "", "#", "aaaaff", "#abc", "#aaaaff0", "#aaaaf", "#gggggg", "##aaaaf",
            " #aaaaff", "#aaaaff ", "red", "#aaaa-f", "#ááááff",
        ] {
            assert!(!HexColor::is_valid(bad), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn display_is_lowercase_hash_form() {
        let c: HexColor = "#ABCDEF".parse().unwrap();
        assert_eq!(c.to_string(), "#abcdef");
    }
}
