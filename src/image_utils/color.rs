use crate::error::{Result, VisionError};
use image::Rgb;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A color in RGB channel order.
///
/// Drawing code in this crate works on `image::RgbImage`, so RGB is the native order.
/// `as_bgr` exists for callers handing colors to BGR-ordered consumers.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const RED: Color = Color::new(255, 0, 0);
    pub const GREEN: Color = Color::new(0, 255, 0);
    pub const BLUE: Color = Color::new(0, 0, 255);
    pub const YELLOW: Color = Color::new(255, 255, 0);
    pub const ROBOFLOW: Color = Color::new(163, 81, 251);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    /// Parses a hex code such as `#A351FB` or `a351fb`.
    ///
    /// Exactly one leading `#` is stripped. What remains must be exactly 6 hex digits, in
    /// either case.
    pub fn from_hex(hex_code: &str) -> Result<Self> {
        let digits = hex_code.strip_prefix('#').unwrap_or(hex_code);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(VisionError::InvalidColorFormat(hex_code.to_string()));
        }
        let channel = |start: usize| {
            u8::from_str_radix(&digits[start..start + 2], 16)
                .map_err(|_| VisionError::InvalidColorFormat(hex_code.to_string()))
        };
        Ok(Color::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn as_rgb(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    pub fn as_bgr(&self) -> (u8, u8, u8) {
        (self.b, self.g, self.r)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Color::new(r, g, b)
    }
}

impl From<Color> for Rgb<u8> {
    fn from(color: Color) -> Self {
        Rgb([color.r, color.g, color.b])
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_round_trip_normalizes_case_and_marker() {
        for (input, normalized) in [
            ("#FFFFFF", "#ffffff"),
            ("a351fb", "#a351fb"),
            ("#A351fB", "#a351fb"),
            ("000000", "#000000"),
            ("#0bDBeb", "#0bdbeb"),
        ] {
            assert_eq!(Color::from_hex(input).unwrap().to_hex(), normalized);
        }
    }

    #[test]
    fn named_constants_match_their_hex_codes() {
        assert_eq!(Color::from_hex("#FFFFFF").unwrap(), Color::WHITE);
        assert_eq!(Color::from_hex("#000000").unwrap(), Color::BLACK);
        assert_eq!(Color::from_hex("#FF0000").unwrap(), Color::RED);
        assert_eq!(Color::from_hex("#00FF00").unwrap(), Color::GREEN);
        assert_eq!(Color::from_hex("#0000FF").unwrap(), Color::BLUE);
        assert_eq!(Color::from_hex("#FFFF00").unwrap(), Color::YELLOW);
        assert_eq!(Color::from_hex("#A351FB").unwrap(), Color::ROBOFLOW);
    }

    #[test]
    fn malformed_hex_codes_are_rejected() {
        for input in ["", "#", "#FFF", "FFFFFFF", "##FFFFFF", "GGGGGG", "#12345z", "ff ff f"] {
            assert!(
                matches!(Color::from_hex(input), Err(VisionError::InvalidColorFormat(_))),
                "expected {input:?} to be rejected"
            );
        }
    }

    #[test]
    fn channel_orders() {
        let color = Color::new(255, 255, 0);
        assert_eq!(color.as_rgb(), (255, 255, 0));
        assert_eq!(color.as_bgr(), (0, 255, 255));
        assert_eq!(Rgb::<u8>::from(color), Rgb([255, 255, 0]));
    }
}
