use rand::Rng;
use tracing::{debug, error};

use super::definition::{ShopDefinition, ShopStock, StockEntry};
use super::rates::appearance_rate;
use crate::config::ShopSettings;
use crate::data::ItemRegistry;
use crate::error::ShopError;
use crate::party::{FlagProvider, PartyStatsSnapshot};

/// Roll a fresh stock for a shop.
///
/// Every item in the shop's category gets an independent `0..100` draw and is
/// stocked iff the draw is below its appearance rate. A pass that stocks
/// nothing is thrown away and rerun with new draws, so a successful result is
/// never empty. `settings.max_generation_attempts` bounds the reruns
/// (0 = unbounded).
pub fn generate<R: Rng + ?Sized>(
    shop: &ShopDefinition,
    items: &ItemRegistry,
    party: &PartyStatsSnapshot,
    flags: &dyn FlagProvider,
    settings: &ShopSettings,
    rng: &mut R,
) -> Result<ShopStock, ShopError> {
    // Rates depend only on the snapshot, so compute them once for all passes
    let candidates: Vec<(StockEntry, i32)> = items
        .universe(shop.category.kinds())
        .map(|item| {
            let entry = StockEntry {
                kind: item.kind,
                item_id: item.id,
            };
            (entry, appearance_rate(&item.rate, &shop.factors, party, flags, settings))
        })
        .collect();

    if candidates.is_empty() {
        return Err(ShopError::EmptyCategory { shop_id: shop.id });
    }

    let mut attempts: u32 = 0;
    loop {
        attempts = attempts.saturating_add(1);

        let entries: Vec<StockEntry> = candidates
            .iter()
            .filter(|(_, rate)| rng.gen_range(0..100) < *rate)
            .map(|(entry, _)| *entry)
            .collect();

        if !entries.is_empty() {
            debug!(
                "Shop {} stocked {} of {} items after {} pass(es)",
                shop.id,
                entries.len(),
                candidates.len(),
                attempts
            );
            return Ok(ShopStock { entries });
        }

        if settings.max_generation_attempts != 0 && attempts >= settings.max_generation_attempts {
            error!(
                "Shop {} produced no stock after {} attempts, giving up",
                shop.id, attempts
            );
            return Err(ShopError::Exhausted {
                shop_id: shop.id,
                attempts,
            });
        }
    }
}
