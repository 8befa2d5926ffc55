//! Pixel and palette types and the `#rrggbb` formatter.

use palette::Srgb;

use crate::error::{ExtractError, Result};

/// One RGB byte triple. Alpha never survives loading.
pub type Pixel = Srgb<u8>;

/// A representative colour plus the number of sample pixels behind it.
///
/// For the frequency strategy `count` is the exact occurrence count, for
/// clustering it is the cluster population.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorCandidate {
    pub color: Pixel,
    pub count: usize,
}

impl ColorCandidate {
    pub fn new(color: Pixel, count: usize) -> Self {
        Self { color, count }
    }

    pub fn hex(&self) -> String {
        to_hex(self.color)
    }

    /// `#rrggbb (RGB: (r, g, b))`, the line printed by the frequency report.
    pub fn describe(&self) -> String {
        let c = self.color;
        format!("{} (RGB: ({}, {}, {}))", self.hex(), c.red, c.green, c.blue)
    }
}

/// Ordered result list, best colour first.
pub type Palette = Vec<ColorCandidate>;

/// Lowercase `#rrggbb`.
pub fn to_hex(c: Pixel) -> String {
    format!("#{:02x}{:02x}{:02x}", c.red, c.green, c.blue)
}

/// Inverse of [`to_hex`]. The leading `#` is optional and either case is accepted.
pub fn parse_hex(s: &str) -> Result<Pixel> {
    let invalid = || ExtractError::InvalidHex {
        value: s.to_string(),
    };
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(invalid());
    }
    let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| invalid())?;
    let g = u8::from_str_radix(&hex[2..4], 16).map_err(|_| invalid())?;
    let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| invalid())?;
    Ok(Srgb::new(r, g, b))
}

pub fn hex_colors(palette: &[ColorCandidate]) -> Vec<String> {
    palette.iter().map(ColorCandidate::hex).collect()
}

/// Sum of the three channels, the brightness proxy used by the grayscale filter.
pub(crate) fn channel_sum(c: Pixel) -> u32 {
    c.red as u32 + c.green as u32 + c.blue as u32
}
