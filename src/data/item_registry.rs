use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{info, warn};

use super::item_def::{ItemDefinition, ItemKind, RawItemDefinition};
use crate::config::ShopSettings;
use crate::error::LoadError;

/// Registry for all item, weapon and armor definitions.
///
/// Rate metadata is resolved once at load time; the tables are read-only
/// afterwards. Each table is ordered by id so shop generation walks items in
/// database order.
pub struct ItemRegistry {
    tables: HashMap<ItemKind, BTreeMap<u32, ItemDefinition>>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self {
            tables: ItemKind::ALL
                .iter()
                .map(|&kind| (kind, BTreeMap::new()))
                .collect(),
        }
    }

    /// Load `items.toml`, `weapons.toml` and `armors.toml` from a directory
    pub fn load_from_directory(
        &mut self,
        data_dir: &Path,
        settings: &ShopSettings,
    ) -> Result<(), LoadError> {
        if !data_dir.exists() {
            warn!("Data directory does not exist: {:?}", data_dir);
            return Ok(());
        }

        for kind in ItemKind::ALL {
            let path = data_dir.join(kind.file_name());
            if !path.exists() {
                warn!("No {} table at {:?}", kind.as_str(), path);
                continue;
            }

            let content = std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?;
            self.load_table(kind, &content, &path, settings)?;
        }

        info!(
            "Loaded {} items, {} weapons, {} armors",
            self.count(ItemKind::Item),
            self.count(ItemKind::Weapon),
            self.count(ItemKind::Armor)
        );

        Ok(())
    }

    /// Parse one TOML table of definitions keyed by numeric id
    pub fn load_table(
        &mut self,
        kind: ItemKind,
        content: &str,
        path: &Path,
        settings: &ShopSettings,
    ) -> Result<(), LoadError> {
        let table: HashMap<String, RawItemDefinition> =
            toml::from_str(content).map_err(|source| LoadError::Toml {
                path: path.to_path_buf(),
                source,
            })?;

        for (key, raw) in table {
            let Ok(id) = key.trim().parse::<u32>() else {
                return Err(LoadError::ItemId {
                    key,
                    path: path.to_path_buf(),
                });
            };
            let item = ItemDefinition::from_raw(id, kind, &raw, settings)
                .map_err(|source| LoadError::NoteTag {
                    id,
                    path: path.to_path_buf(),
                    source,
                })?;
            self.insert(item);
        }

        Ok(())
    }

    pub fn insert(&mut self, item: ItemDefinition) {
        let table = self.tables.entry(item.kind).or_default();
        if table.contains_key(&item.id) {
            let kind = item.kind.as_str();
            warn!("Duplicate {} id {}, overwriting", kind, item.id);
        }
        table.insert(item.id, item);
    }

    /// Get a definition by kind and id
    pub fn get(&self, kind: ItemKind, id: u32) -> Option<&ItemDefinition> {
        self.tables.get(&kind).and_then(|table| table.get(&id))
    }

    /// All definitions of the given kinds, in the order the kinds are listed
    pub fn universe<'a>(
        &'a self,
        kinds: &'a [ItemKind],
    ) -> impl Iterator<Item = &'a ItemDefinition> + 'a {
        kinds
            .iter()
            .filter_map(|kind| self.tables.get(kind))
            .flat_map(|table| table.values())
    }

    /// Number of definitions of one kind
    pub fn count(&self, kind: ItemKind) -> usize {
        self.tables.get(&kind).map_or(0, BTreeMap::len)
    }

    pub fn len(&self) -> usize {
        self.tables.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ItemRegistry {
    fn default() -> Self {
        Self::new()
    }
}
