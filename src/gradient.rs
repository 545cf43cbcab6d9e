//! Horizontal color gradients.
//!
//! Particles are colored by where their home sits across the viewport: the
//! left edge takes the start color, the right edge the end color, and
//! everything in between is a straight RGB blend.

use crate::error::ColorParseError;
use glam::Vec3;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// An RGB color with channels in 0.0-1.0.
///
/// Serializes as a `#rrggbb` hex string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb(pub Vec3);

impl Rgb {
    pub const BLACK: Rgb = Rgb(Vec3::ZERO);
    pub const WHITE: Rgb = Rgb(Vec3::ONE);

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Rgb(Vec3::new(r, g, b))
    }

    /// Parse `#rgb` or `#rrggbb` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError(hex.to_string());
        let digits = hex.trim().trim_start_matches('#');
        if !digits.is_ascii() {
            return Err(err());
        }

        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| err());
        let (r, g, b) = match digits.len() {
            6 => (
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            ),
            3 => {
                // #abc expands to #aabbcc
                let r = channel(&digits[0..1])?;
                let g = channel(&digits[1..2])?;
                let b = channel(&digits[2..3])?;
                (r * 17, g * 17, b * 17)
            }
            _ => return Err(err()),
        };

        Ok(Rgb::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
        ))
    }

    /// Format as lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        let c = (self.0.clamp(Vec3::ZERO, Vec3::ONE) * 255.0).round();
        format!("#{:02x}{:02x}{:02x}", c.x as u8, c.y as u8, c.z as u8)
    }

    /// Linear blend towards `other`.
    #[inline]
    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        Rgb(self.0.lerp(other.0, t))
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rgb::from_hex(s)
    }
}

impl From<Vec3> for Rgb {
    fn from(v: Vec3) -> Self {
        Rgb(v)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Two-stop gradient sampled by a 0-1 ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    pub start: Rgb,
    pub end: Rgb,
}

impl Gradient {
    pub fn new(start: Rgb, end: Rgb) -> Self {
        Self { start, end }
    }

    /// Color at `t` (0 = start, 1 = end).
    #[inline]
    pub fn sample(&self, t: f32) -> Vec3 {
        self.start.lerp(self.end, t).0
    }
}

/// Normalized horizontal position of a centered x coordinate.
///
/// `-width/2` maps to 0 and `+width/2` maps to 1. A zero-width viewport maps
/// everything to 0.
#[inline]
pub fn horizontal_ratio(x: f32, width: f32) -> f32 {
    if width > 0.0 {
        (x + width * 0.5) / width
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_long_hex() {
        let c = Rgb::from_hex("#ff8000").unwrap();
        assert!((c.0.x - 1.0).abs() < 1e-6);
        assert!((c.0.y - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.0.z, 0.0);
    }

    #[test]
    fn test_parse_short_hex() {
        assert_eq!(Rgb::from_hex("#fff").unwrap(), Rgb::WHITE);
        assert_eq!(Rgb::from_hex("000").unwrap(), Rgb::BLACK);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#gggggg").is_err());
        assert!(Rgb::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_hex_display() {
        assert_eq!(Rgb::new(1.0, 0.0, 0.5).to_string(), "#ff0080");
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Rgb::WHITE).unwrap();
        assert_eq!(json, "\"#ffffff\"");
        let back: Rgb = serde_json::from_str("\"#000000\"").unwrap();
        assert_eq!(back, Rgb::BLACK);
    }

    #[test]
    fn test_gradient_endpoints() {
        let g = Gradient::new(Rgb::BLACK, Rgb::WHITE);
        assert_eq!(g.sample(0.0), Vec3::ZERO);
        assert_eq!(g.sample(1.0), Vec3::ONE);
        assert!((g.sample(0.25) - Vec3::splat(0.25)).length() < 1e-6);
    }

    #[test]
    fn test_horizontal_ratio() {
        assert_eq!(horizontal_ratio(-50.0, 100.0), 0.0);
        assert_eq!(horizontal_ratio(50.0, 100.0), 1.0);
        assert_eq!(horizontal_ratio(0.0, 100.0), 0.5);
        assert_eq!(horizontal_ratio(3.0, 0.0), 0.0);
    }
}
