use crate::foundation::error::{BarRaceError, BarRaceResult};

pub use kurbo::{Point, Rect};

const MAX_DIM: u32 = 16_384;

/// Calendar year as stored in the sales table.
pub type Year = i32;

/// Position of a frame in the full animation timeline (0-based).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Output raster size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> BarRaceResult<Self> {
        if width == 0 || height == 0 {
            return Err(BarRaceError::validation("canvas width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Physical size in inches at a given DPI, rounded to whole pixels.
    pub fn from_inches(width_in: f64, height_in: f64, dpi: f64) -> BarRaceResult<Self> {
        fn to_px(inches: f64, dpi: f64) -> BarRaceResult<u32> {
            let px = (inches * dpi).round();
            if !px.is_finite() || px < 1.0 || px > f64::from(MAX_DIM) {
                return Err(BarRaceError::validation(format!(
                    "canvas dimension {inches}in at {dpi} dpi is out of range (1..={MAX_DIM} px)"
                )));
            }
            Ok(px as u32)
        }

        Self::new(to_px(width_in, dpi)?, to_px(height_in, dpi)?)
    }

    pub fn rgba8_len(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

/// Opaque 8-bit sRGB color, serialized as `#RRGGBB`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const WHITE: Self = Self::new(0xFF, 0xFF, 0xFF);
    pub const BLACK: Self = Self::new(0x00, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn from_hex(s: &str) -> BarRaceResult<Self> {
        let hex = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(BarRaceError::validation(format!(
                "color '{s}' must be in #RRGGBB form"
            )));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| {
                BarRaceError::validation(format!("color '{s}' has invalid hex digits"))
            })
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

impl TryFrom<String> for Rgb8 {
    type Error = BarRaceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgb8> for String {
    fn from(value: Rgb8) -> Self {
        value.to_hex()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
