use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::LoadError;
use crate::note;

/// Map properties relevant to collision maps (loaded from JSON)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapDefinition {
    pub id: u32,
    #[serde(default)]
    pub name: String,
    /// Free-text map note; `<cm=NAME>` selects a collision image
    #[serde(default)]
    pub note: String,
}

impl MapDefinition {
    pub fn load_from_file(path: &Path) -> Result<Self, LoadError> {
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Name of this map's collision image, if it has one
    pub fn collision_map(&self) -> Option<String> {
        note::bracket_tag(&self.note, "cm")
    }
}

/// Path of a collision image inside the parallax directory (`.png` assumed)
pub fn resolve_collision_path(parallax_dir: &Path, name: &str) -> PathBuf {
    let path = parallax_dir.join(name);
    if path.extension().is_some() {
        path
    } else {
        path.with_extension("png")
    }
}
