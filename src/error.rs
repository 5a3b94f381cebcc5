//! Error types shared across the crate.

use std::path::PathBuf;
use thiserror::Error;

/// A note tag was present but its value could not be used
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteTagError {
    #[error("rateparam needs exactly 8 values, found {found} in {raw:?}")]
    ParamCount { found: usize, raw: String },
    #[error("rateparam value {value:?} is not an integer")]
    ParamValue { value: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid color {0:?} (expected rrggbb or rrggbbaa)")]
    Color(String),
    #[error("collision stride must be at least 1")]
    Stride,
}

/// Failure while loading item, shop or map data files
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to parse {path:?}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("item key {key:?} in {path:?} is not a numeric id")]
    ItemId { key: String, path: PathBuf },
    #[error("item {id} in {path:?}: {source}")]
    NoteTag {
        id: u32,
        path: PathBuf,
        #[source]
        source: NoteTagError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShopError {
    #[error("shop {shop_id} has no items in its category")]
    EmptyCategory { shop_id: u32 },
    #[error("shop {shop_id} produced no stock after {attempts} attempts")]
    Exhausted { shop_id: u32, attempts: u32 },
}

#[derive(Debug, Error)]
pub enum CollisionError {
    #[error("failed to load collision image {path:?}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("pixel buffer of {length} bytes does not match {width}x{height} RGBA")]
    BufferSize {
        width: u32,
        height: u32,
        length: usize,
    },
}
