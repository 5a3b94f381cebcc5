use std::collections::HashMap;

use crate::error::ConfigError;

/// RGBA color of a single collision image pixel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Parse `rrggbb` or `rrggbbaa`, with or without a leading `#`
    pub fn from_hex(hex: &str) -> Result<Self, ConfigError> {
        let digits = hex.trim().trim_start_matches('#');
        let invalid = || ConfigError::Color(hex.to_string());

        if !(digits.len() == 6 || digits.len() == 8) || !digits.is_ascii() {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());
        let alpha = if digits.len() == 8 { channel(6)? } else { 255 };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
    }

    /// Lowercase `rrggbb`; alpha is not part of the hex form
    pub fn to_hex(&self) -> String {
        format!("{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Packed `0xRRGGBB`, the key pixel regions are looked up by
    pub fn rgb_key(&self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}

/// Color → pixel region id mapping
///
/// Lookups ignore alpha, matching the `rrggbb` form regions are configured in.
#[derive(Debug, Clone, Default)]
pub struct RegionTable {
    regions: HashMap<u32, u32>,
}

impl RegionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, color: Color, region_id: u32) {
        self.regions.insert(color.rgb_key(), region_id);
    }

    pub fn get(&self, color: Color) -> Option<u32> {
        self.regions.get(&color.rgb_key()).copied()
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
