//! Host Hooks
//!
//! `PluginSession` is the surface the host engine drives: it calls the
//! `on_*` methods from its own lifecycle points (new game, map setup,
//! level-up, switch/variable commands) and queries passability every frame.
//! All engine state comes in through parameters.
//!
//! The host is single-threaded: stock and the collision image are only
//! mutated from these hooks and read-only everywhere else.

use std::ops::RangeInclusive;
use std::path::Path;
use tracing::{info, warn};

use crate::collision::{CollisionImage, DebugOverlay, Direction, Edge, PixelCollisionIndex};
use crate::config::Settings;
use crate::data::ItemRegistry;
use crate::error::LoadError;
use crate::map::{MapDefinition, resolve_collision_path};
use crate::note::PARAM_COUNT;
use crate::party::{FlagProvider, PartyStatsSnapshot};
use crate::shop::{ResetMode, ShopOpening, ShopRegistry, ShopStock};

pub struct PluginSession {
    settings: Settings,
    items: ItemRegistry,
    shops: ShopRegistry,
    collision: PixelCollisionIndex,
}

impl PluginSession {
    pub fn new(settings: Settings, items: ItemRegistry, shops: ShopRegistry) -> Self {
        let collision = PixelCollisionIndex::from_settings(&settings.collision);
        Self {
            settings,
            items,
            shops,
            collision,
        }
    }

    /// Load items and shops from a data directory.
    ///
    /// Layout: `items.toml`, `weapons.toml`, `armors.toml` and `shops/*.toml`.
    pub fn load(settings: Settings, data_dir: &Path) -> Result<Self, LoadError> {
        let mut items = ItemRegistry::new();
        items.load_from_directory(data_dir, &settings.shop)?;

        let mut shops = ShopRegistry::new(settings.shop.clone());
        shops.load_from_directory(&data_dir.join("shops"))?;

        Ok(Self::new(settings, items, shops))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn items(&self) -> &ItemRegistry {
        &self.items
    }

    pub fn shops(&self) -> &ShopRegistry {
        &self.shops
    }

    pub fn collision(&self) -> &PixelCollisionIndex {
        &self.collision
    }

    // ========================================================================
    // Shop hooks
    // ========================================================================

    /// Stock every shop for a fresh game
    pub fn on_new_game(&mut self, party: &PartyStatsSnapshot, flags: &dyn FlagProvider) {
        self.reset_shops(ResetMode::All, party, flags);
    }

    /// Restock level/param weighted shops after a level-up, if enabled
    pub fn on_level_up(&mut self, party: &PartyStatsSnapshot, flags: &dyn FlagProvider) {
        if !self.settings.shop.auto_reset_level {
            return;
        }
        for index in 0..PARAM_COUNT {
            self.reset_shops(ResetMode::ParamFactor(index), party, flags);
        }
        self.reset_shops(ResetMode::LevelFactor, party, flags);
    }

    /// Restock shops weighted by any switch in `ids`, if enabled
    pub fn on_switches_changed(
        &mut self,
        ids: RangeInclusive<u32>,
        party: &PartyStatsSnapshot,
        flags: &dyn FlagProvider,
    ) {
        if !self.settings.shop.auto_reset {
            return;
        }
        for id in ids {
            self.reset_shops(ResetMode::SwitchFactor(id), party, flags);
        }
    }

    /// Restock shops weighted by any variable in `ids`, if enabled
    pub fn on_variables_changed(
        &mut self,
        ids: RangeInclusive<u32>,
        party: &PartyStatsSnapshot,
        flags: &dyn FlagProvider,
    ) {
        if !self.settings.shop.auto_reset {
            return;
        }
        for id in ids {
            self.reset_shops(ResetMode::VariableFactor(id), party, flags);
        }
    }

    /// Explicit reset requested by an event script
    pub fn reset_shops(
        &mut self,
        mode: ResetMode,
        party: &PartyStatsSnapshot,
        flags: &dyn FlagProvider,
    ) -> Vec<u32> {
        self.shops.reset(mode, &self.items, party, flags)
    }

    /// Current stock of a shop, generated on first access
    pub fn shop_stock(
        &mut self,
        shop_id: u32,
        party: &PartyStatsSnapshot,
        flags: &dyn FlagProvider,
    ) -> Option<&ShopStock> {
        self.shops.stock(shop_id, &self.items, party, flags)
    }

    pub fn open_shop(
        &mut self,
        shop_id: u32,
        purchase_only: bool,
        party: &PartyStatsSnapshot,
        flags: &dyn FlagProvider,
    ) -> Option<ShopOpening<'_>> {
        self.shops
            .open(shop_id, purchase_only, &self.items, party, flags)
    }

    // ========================================================================
    // Collision hooks
    // ========================================================================

    /// Activate the collision image named by the map's `<cm=NAME>` tag.
    ///
    /// Maps without the tag, or whose image cannot be loaded, run without
    /// pixel collision. Returns whether an image is active.
    pub fn on_map_load(&mut self, map: &MapDefinition) -> bool {
        let image = map.collision_map().and_then(|name| {
            let path = resolve_collision_path(&self.settings.collision.parallax_dir, &name);
            match CollisionImage::load(&path) {
                Ok(image) => {
                    info!(
                        "Map {} collision image {:?} ({}x{})",
                        map.id, path, image.width, image.height
                    );
                    Some(image)
                }
                Err(e) => {
                    warn!("Map {}: {}; pixel collision disabled", map.id, e);
                    None
                }
            }
        });

        self.collision.set_image(image);
        self.collision.has_image()
    }

    /// Drop the active collision image
    pub fn on_map_unload(&mut self) {
        self.collision.set_image(None);
    }

    pub fn is_passable(&self, x: i32, y: i32) -> bool {
        self.collision.is_passable(x, y)
    }

    pub fn region_at(&self, x: i32, y: i32) -> u32 {
        self.collision.region_at(x, y)
    }

    pub fn is_passable_area(&self, edge: &Edge, direction: Direction) -> bool {
        self.collision.is_passable_area(edge, direction)
    }

    pub fn debug_overlay(&self, test_mode: bool) -> Option<DebugOverlay> {
        DebugOverlay::for_map(&self.settings.collision.overlay, &self.collision, test_mode)
    }
}
