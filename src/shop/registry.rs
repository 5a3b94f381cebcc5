//! Shop Registry
//!
//! Loads shop definitions from TOML files and owns each shop's current
//! stock. Stock lives for the session only and is replaced wholesale by
//! `reset`.

use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::{error, info, warn};

use super::definition::{ShopDefinition, ShopStock, WeightFactor};
use super::generator::generate;
use crate::config::ShopSettings;
use crate::data::ItemRegistry;
use crate::error::LoadError;
use crate::party::{FlagProvider, PartyStatsSnapshot};

/// Which shops a reset regenerates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetMode {
    All,
    /// Shops weighted by party level
    LevelFactor,
    /// Shops weighted by the given param index
    ParamFactor(usize),
    /// Shops weighted by the given variable
    VariableFactor(u32),
    /// Shops weighted by the given switch
    SwitchFactor(u32),
    /// Only this shop
    Selected(u32),
}

impl ResetMode {
    pub fn matches(&self, shop: &ShopDefinition) -> bool {
        match *self {
            ResetMode::All => true,
            ResetMode::LevelFactor => shop.has_factor(WeightFactor::Level),
            ResetMode::ParamFactor(index) => shop.has_factor(WeightFactor::Param(index)),
            ResetMode::VariableFactor(id) => shop.has_factor(WeightFactor::Variable(id)),
            ResetMode::SwitchFactor(id) => shop.has_factor(WeightFactor::Switch(id)),
            ResetMode::Selected(shop_id) => shop.id == shop_id,
        }
    }
}

/// What the host shop scene needs to open a shop
#[derive(Debug, Clone, Copy)]
pub struct ShopOpening<'a> {
    pub shop_id: u32,
    pub display_name: &'a str,
    pub goods: &'a ShopStock,
    pub purchase_only: bool,
}

/// Registry for all shop definitions and their current stock
pub struct ShopRegistry {
    shops: BTreeMap<u32, ShopDefinition>,
    stock: HashMap<u32, ShopStock>,
    settings: ShopSettings,
    rng: StdRng,
}

impl ShopRegistry {
    /// Create a new empty shop registry
    pub fn new(settings: ShopSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            shops: BTreeMap::new(),
            stock: HashMap::new(),
            settings,
            rng,
        }
    }

    /// Load all shop definitions from a directory
    pub fn load_from_directory(&mut self, path: &Path) -> Result<(), LoadError> {
        if !path.exists() {
            warn!("Shop directory does not exist: {:?}", path);
            return Ok(());
        }

        let entries = fs::read_dir(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let file_path = entry.path();

            if file_path.extension().and_then(|s| s.to_str()) == Some("toml") {
                let contents = fs::read_to_string(&file_path).map_err(|source| LoadError::Io {
                    path: file_path.clone(),
                    source,
                })?;

                let shop: ShopDefinition =
                    toml::from_str(&contents).map_err(|source| LoadError::Toml {
                        path: file_path.clone(),
                        source,
                    })?;

                if self.shops.contains_key(&shop.id) {
                    warn!("Duplicate shop ID {} in {:?}", shop.id, file_path);
                }
                self.insert(shop);
            }
        }

        info!("Loaded {} shop definitions", self.shops.len());
        Ok(())
    }

    /// Add or replace a shop definition
    pub fn insert(&mut self, mut shop: ShopDefinition) {
        if shop.display_name.is_empty() {
            shop.display_name = format!("Shop {}", shop.id);
        }
        self.stock.remove(&shop.id);
        self.shops.insert(shop.id, shop);
    }

    /// Regenerate the stock of every shop matching `mode`.
    ///
    /// Unmatched shops keep their stock. A shop whose generation fails keeps
    /// its previous stock. Returns the ids that received new stock.
    pub fn reset(
        &mut self,
        mode: ResetMode,
        items: &ItemRegistry,
        party: &PartyStatsSnapshot,
        flags: &dyn FlagProvider,
    ) -> Vec<u32> {
        let mut regenerated = Vec::new();

        for shop in self.shops.values().filter(|shop| mode.matches(shop)) {
            match generate(shop, items, party, flags, &self.settings, &mut self.rng) {
                Ok(stock) => {
                    self.stock.insert(shop.id, stock);
                    regenerated.push(shop.id);
                }
                Err(e) => {
                    error!("Failed to restock shop {}: {}", shop.id, e);
                }
            }
        }

        if !regenerated.is_empty() {
            info!("Reset {:?}: restocked {} shop(s)", mode, regenerated.len());
        }
        regenerated
    }

    /// Generate stock for a known shop that has none yet.
    ///
    /// Returns whether the shop has stock afterwards.
    fn ensure_stock(
        &mut self,
        shop_id: u32,
        items: &ItemRegistry,
        party: &PartyStatsSnapshot,
        flags: &dyn FlagProvider,
    ) -> bool {
        if self.stock.contains_key(&shop_id) {
            return true;
        }
        let Some(shop) = self.shops.get(&shop_id) else {
            return false;
        };

        match generate(shop, items, party, flags, &self.settings, &mut self.rng) {
            Ok(stock) => {
                info!("Shop {} stocked on first access", shop_id);
                self.stock.insert(shop_id, stock);
                true
            }
            Err(e) => {
                error!("Failed to stock shop {}: {}", shop_id, e);
                false
            }
        }
    }

    /// Get a shop definition by ID
    pub fn get(&self, shop_id: u32) -> Option<&ShopDefinition> {
        self.shops.get(&shop_id)
    }

    /// Stock of a shop, generated on first access.
    ///
    /// `None` for unknown shops, or when a first generation fails.
    pub fn stock(
        &mut self,
        shop_id: u32,
        items: &ItemRegistry,
        party: &PartyStatsSnapshot,
        flags: &dyn FlagProvider,
    ) -> Option<&ShopStock> {
        if !self.ensure_stock(shop_id, items, party, flags) {
            return None;
        }
        self.stock.get(&shop_id)
    }

    /// Stock generated so far, without generating anything
    pub fn current_stock(&self, shop_id: u32) -> Option<&ShopStock> {
        self.stock.get(&shop_id)
    }

    /// Prepare a shop for the host's shop scene, stocking it if needed.
    ///
    /// `None` for unknown shops and while the party is in battle.
    pub fn open(
        &mut self,
        shop_id: u32,
        purchase_only: bool,
        items: &ItemRegistry,
        party: &PartyStatsSnapshot,
        flags: &dyn FlagProvider,
    ) -> Option<ShopOpening<'_>> {
        if party.in_battle || !self.ensure_stock(shop_id, items, party, flags) {
            return None;
        }
        let shop = self.shops.get(&shop_id)?;
        let goods = self.stock.get(&shop_id)?;
        Some(ShopOpening {
            shop_id,
            display_name: &shop.display_name,
            goods,
            purchase_only,
        })
    }

    /// Get an iterator over all shop definitions
    pub fn all(&self) -> impl Iterator<Item = &ShopDefinition> {
        self.shops.values()
    }

    pub fn settings(&self) -> &ShopSettings {
        &self.settings
    }

    /// Check if a shop exists in the registry
    pub fn contains(&self, shop_id: u32) -> bool {
        self.shops.contains_key(&shop_id)
    }

    /// Get the number of shops in the registry
    pub fn len(&self) -> usize {
        self.shops.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.shops.is_empty()
    }
}

impl Default for ShopRegistry {
    fn default() -> Self {
        Self::new(ShopSettings::default())
    }
}
