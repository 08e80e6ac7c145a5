use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An opaque RGB fill color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl FromStr for Color {
    type Err = ConfigError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let digits = input.strip_prefix('#').unwrap_or(input);
        let mut bytes = [0u8; 3];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| ConfigError::InvalidColor(input.to_string()))?;
        let [r, g, b] = bytes;
        Ok(Self::new(r, g, b))
    }
}

impl TryFrom<String> for Color {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", hex::encode([self.r, self.g, self.b]))
    }
}

/// Fill colors for both waves plus the inset of the circular clip.
#[derive(Clone, Debug, PartialEq)]
pub struct WaveStyle {
    pub above_color: Color,
    pub below_color: Color,
    pub circle_padding: f32,
}

impl Default for WaveStyle {
    fn default() -> Self {
        Self { above_color: Color::WHITE, below_color: Color::WHITE, circle_padding: 0.0 }
    }
}
