//! Runtime Settings
//!
//! Static configuration loaded once at startup from `config.toml`. Every
//! field has a default, so a partial (or missing) file is valid.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::collision::{Color, RegionTable};
use crate::error::ConfigError;

// ============================================================================
// Shop Settings
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ShopSettings {
    /// Reset shops with switch/variable factors when a switch/variable changes
    pub auto_reset: bool,
    /// Reset shops with level/param factors whenever an actor levels up
    pub auto_reset_level: bool,
    /// Appearance rate for items without a `rate=` tag
    pub default_rate: i32,
    /// Target level for items without a `ratelvl=` tag
    pub default_level: i32,
    /// Rate added when the party average level equals the item target level
    pub level_rate: i32,
    /// Rate added when the party average param equals the item target param
    pub param_rate: i32,
    /// Rate added while a shop's switch factor is on
    pub switch_rate: i32,
    /// Generation passes before giving up on a shop (0 = retry forever)
    pub max_generation_attempts: u32,
    /// Fixed RNG seed for reproducible stock
    pub seed: Option<u64>,
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            auto_reset: true,
            auto_reset_level: false,
            default_rate: 10,
            default_level: 50,
            level_rate: 50,
            param_rate: 50,
            switch_rate: 50,
            max_generation_attempts: 10_000,
            seed: None,
        }
    }
}

// ============================================================================
// Collision Settings
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OverlaySettings {
    /// Draw the collision image over the map during test play
    pub show_map: bool,
    pub blend: u8,
    pub opacity: u8,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            show_map: true,
            blend: 0,
            opacity: 120,
        }
    }
}

/// Collision settings as written in TOML (colors still as hex strings)
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawCollisionSettings {
    blocking_color: String,
    stride: u32,
    parallax_dir: PathBuf,
    regions: HashMap<String, u32>,
    overlay: OverlaySettings,
}

impl Default for RawCollisionSettings {
    fn default() -> Self {
        Self {
            blocking_color: "ff0000".to_string(),
            stride: 1,
            parallax_dir: PathBuf::from("parallaxes"),
            regions: HashMap::from([("00ff00".to_string(), 1), ("0000ff".to_string(), 2)]),
            overlay: OverlaySettings::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CollisionSettings {
    /// Pixels of exactly this color are impassable
    pub blocking_color: Color,
    /// Sample every Nth pixel along the movement axis (1 = every pixel)
    pub stride: u32,
    /// Directory collision images are loaded from
    pub parallax_dir: PathBuf,
    pub regions: RegionTable,
    pub overlay: OverlaySettings,
}

impl TryFrom<RawCollisionSettings> for CollisionSettings {
    type Error = ConfigError;

    fn try_from(raw: RawCollisionSettings) -> Result<Self, Self::Error> {
        if raw.stride == 0 {
            return Err(ConfigError::Stride);
        }

        let mut regions = RegionTable::new();
        for (hex, id) in &raw.regions {
            regions.insert(Color::from_hex(hex)?, *id);
        }

        Ok(Self {
            blocking_color: Color::from_hex(&raw.blocking_color)?,
            stride: raw.stride,
            parallax_dir: raw.parallax_dir,
            regions,
            overlay: raw.overlay,
        })
    }
}

impl Default for CollisionSettings {
    fn default() -> Self {
        let mut regions = RegionTable::new();
        regions.insert(Color::rgb(0, 255, 0), 1);
        regions.insert(Color::rgb(0, 0, 255), 2);

        Self {
            blocking_color: Color::rgb(255, 0, 0),
            stride: 1,
            parallax_dir: PathBuf::from("parallaxes"),
            regions,
            overlay: OverlaySettings::default(),
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    shop: ShopSettings,
    collision: RawCollisionSettings,
}

#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub shop: ShopSettings,
    pub collision: CollisionSettings,
}

impl Settings {
    /// Parse settings from TOML text
    pub fn from_toml(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        let raw: RawSettings = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            shop: raw.shop,
            collision: raw.collision.try_into()?,
        })
    }

    /// Load settings from a file, falling back to defaults if it does not exist
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            warn!("Config file {:?} does not exist, using defaults", path);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml(&contents, path)?;

        info!(
            "Loaded settings from {:?} ({} pixel regions, stride {})",
            path,
            settings.collision.regions.len(),
            settings.collision.stride
        );
        Ok(settings)
    }
}
