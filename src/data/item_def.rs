use serde::{Deserialize, Serialize};

use crate::config::ShopSettings;
use crate::error::NoteTagError;
use crate::note::{self, PARAM_COUNT};

// ============================================================================
// Item Kinds
// ============================================================================

/// Which database table an item comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ItemKind {
    Item = 0,
    Weapon = 1,
    Armor = 2,
}

impl ItemKind {
    pub const ALL: [ItemKind; 3] = [ItemKind::Item, ItemKind::Weapon, ItemKind::Armor];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Item => "item",
            ItemKind::Weapon => "weapon",
            ItemKind::Armor => "armor",
        }
    }

    /// Data file holding this table
    pub fn file_name(&self) -> &'static str {
        match self {
            ItemKind::Item => "items.toml",
            ItemKind::Weapon => "weapons.toml",
            ItemKind::Armor => "armors.toml",
        }
    }

    /// Goods type code understood by the host shop scene
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

// ============================================================================
// Rate Metadata
// ============================================================================

/// Shop appearance settings parsed from an item's note tags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateMeta {
    /// `rate=X`: base appearance chance in percent
    pub base_rate: i32,
    /// `ratelvl=X`: party level at which the level factor peaks
    pub target_level: i32,
    /// `rateparam=x0,...,x7`: per-param targets (MHP, MMP, ATK, DEF, MAT, MDF, AGI, LUK)
    pub target_params: Option<[i32; PARAM_COUNT]>,
}

impl RateMeta {
    pub fn from_note(note_text: &str, settings: &ShopSettings) -> Result<Self, NoteTagError> {
        Ok(Self {
            base_rate: note::int_tag(note_text, "rate").unwrap_or(settings.default_rate),
            target_level: note::int_tag(note_text, "ratelvl").unwrap_or(settings.default_level),
            target_params: note::param_list_tag(note_text, "rateparam")?,
        })
    }

    pub fn target_param(&self, index: usize) -> Option<i32> {
        let params = self.target_params?;
        params.get(index).copied()
    }
}

// ============================================================================
// Raw Item Definition (direct from TOML)
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RawItemDefinition {
    pub name: Option<String>,
    #[serde(default)]
    pub note: String,
}

// ============================================================================
// Resolved Item Definition
// ============================================================================

#[derive(Debug, Clone)]
pub struct ItemDefinition {
    pub id: u32,
    pub kind: ItemKind,
    pub name: String,
    pub rate: RateMeta,
}

impl ItemDefinition {
    pub fn from_raw(
        id: u32,
        kind: ItemKind,
        raw: &RawItemDefinition,
        settings: &ShopSettings,
    ) -> Result<Self, NoteTagError> {
        Ok(Self {
            id,
            kind,
            name: raw
                .name
                .clone()
                .unwrap_or_else(|| format!("{} {}", kind.as_str(), id)),
            rate: RateMeta::from_note(&raw.note, settings)?,
        })
    }
}
