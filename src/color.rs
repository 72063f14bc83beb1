use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;

/// Sentiment magnitude at which the color map saturates.
pub const SENTIMENT_LIMIT: f64 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::Color(value.to_owned());
        let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| invalid())
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

pub fn blend(base: Rgb, overlay: Rgb, amount: f64) -> Rgb {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;
    let mix = |a: u8, b: u8| ((a as f64 * inverse) + (b as f64 * amount)).round() as u8;

    Rgb::new(
        mix(base.r, overlay.r),
        mix(base.g, overlay.g),
        mix(base.b, overlay.b),
    )
}

/// Maps a combined sentiment onto the `low..high` gradient. Values are
/// clamped to `[-0.5, 0.5]`; `-0.5` yields `low`, `0.5` yields `high`.
pub fn sentiment_color(sentiment: f64, low: Rgb, high: Rgb) -> Rgb {
    let clamped = if sentiment.is_nan() {
        0.0
    } else {
        sentiment.clamp(-SENTIMENT_LIMIT, SENTIMENT_LIMIT)
    };
    let t = (clamped + SENTIMENT_LIMIT) / (2.0 * SENTIMENT_LIMIT);
    blend(low, high, t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(200, 40, 40);
    const GREEN: Rgb = Rgb::new(40, 180, 90);

    #[test]
    fn saturates_at_high_endpoint() {
        // 0.4 + 0.3 combined, clamped to 0.5.
        assert_eq!(sentiment_color(0.4 + 0.3, RED, GREEN), GREEN);
        assert_eq!(sentiment_color(0.5, RED, GREEN), GREEN);
    }

    #[test]
    fn saturates_at_low_endpoint() {
        assert_eq!(sentiment_color(-3.0, RED, GREEN), RED);
    }

    #[test]
    fn neutral_sentiment_is_midpoint() {
        assert_eq!(sentiment_color(0.0, RED, GREEN), Rgb::new(120, 110, 65));
    }

    #[test]
    fn mapping_is_monotonic_per_channel() {
        let mut previous = sentiment_color(-0.5, RED, GREEN);
        for step in 1..=20 {
            let color = sentiment_color(-0.5 + step as f64 * 0.05, RED, GREEN);
            assert!(color.r <= previous.r);
            assert!(color.g >= previous.g);
            previous = color;
        }
    }

    #[test]
    fn hex_round_trip_and_errors() {
        let parsed: Rgb = "#1a2B3c".parse().unwrap();
        assert_eq!(parsed, Rgb::new(0x1a, 0x2b, 0x3c));
        assert_eq!(parsed.to_hex(), "#1a2b3c");
        assert!("1a2b3c".parse::<Rgb>().is_err());
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("#gg0000".parse::<Rgb>().is_err());
    }
}
