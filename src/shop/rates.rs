//! Appearance rate math.
//!
//! An item's chance to appear in a shop is its base rate plus one
//! contribution per weight factor of the shop. Rates are percentages but are
//! never clamped: above 100 always appears, 0 or below never does.

use crate::config::ShopSettings;
use crate::data::RateMeta;
use crate::party::{FlagProvider, PartyStatsSnapshot};

use super::definition::WeightFactor;

/// Round a computed rate to the nearest whole percent (halves away from zero)
fn round_rate(rate: f64) -> i32 {
    rate.round() as i32
}

/// Level contribution.
///
/// Grows exponentially from 1 toward `level_rate` as the party average level
/// approaches the item's target level (`level_rate^(avg/target)`). Past the
/// target it continues linearly at half a percent per level.
pub fn rate_level(meta: &RateMeta, avg_level: f64, level_rate: i32) -> i32 {
    let factor = level_rate as f64;
    let target = meta.target_level as f64;

    let rate = if target < avg_level {
        factor + (avg_level - target) / 2.0
    } else {
        factor.powf(1.0 / target).powf(avg_level)
    };
    round_rate(rate)
}

/// Param contribution for one parameter index.
///
/// Same curve as [`rate_level`] but capped at `param_rate` once the party
/// average exceeds the item's target. Items without `rateparam` targets
/// contribute exactly `param_rate`.
pub fn rate_param(meta: &RateMeta, index: usize, avg_param: f64, param_rate: i32) -> i32 {
    let Some(target) = meta.target_param(index) else {
        return param_rate;
    };
    let factor = param_rate as f64;
    let target = target as f64;

    let rate = if target < avg_param {
        factor
    } else {
        factor.powf(1.0 / target).powf(avg_param)
    };
    round_rate(rate)
}

/// Contribution of a single weight factor
pub fn factor_rate(
    meta: &RateMeta,
    factor: WeightFactor,
    party: &PartyStatsSnapshot,
    flags: &dyn FlagProvider,
    settings: &ShopSettings,
) -> i32 {
    match factor {
        WeightFactor::Level => rate_level(meta, party.avg_level, settings.level_rate),
        WeightFactor::Param(index) => {
            rate_param(meta, index, party.avg_param(index), settings.param_rate)
        }
        WeightFactor::Switch(id) if flags.switch(id) => settings.switch_rate,
        WeightFactor::Switch(_) => 0,
        WeightFactor::Variable(id) => flags.variable(id),
    }
}

/// Effective appearance rate of an item in a shop with the given factors
pub fn appearance_rate(
    meta: &RateMeta,
    factors: &[WeightFactor],
    party: &PartyStatsSnapshot,
    flags: &dyn FlagProvider,
    settings: &ShopSettings,
) -> i32 {
    factors.iter().fold(meta.base_rate, |rate, &factor| {
        rate.saturating_add(factor_rate(meta, factor, party, flags, settings))
    })
}

// ============================================================================
// Rate Tables
// ============================================================================

/// Which curve a rate table samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateProbe {
    Level,
    Param(usize),
}

/// One row of a rate table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSample {
    pub value: f64,
    pub rate: i32,
}

/// Number of rows in a rate table
pub const RATE_TABLE_ROWS: usize = 10;

/// Sample an item's level or param curve around the party's current average.
///
/// Rows start `5 * inc` above the average and step down by `inc`, which is
/// handy for tuning `ratelvl`/`rateparam` tags.
pub fn rate_table(
    meta: &RateMeta,
    probe: RateProbe,
    inc: f64,
    party: &PartyStatsSnapshot,
    settings: &ShopSettings,
) -> Vec<RateSample> {
    let base = match probe {
        RateProbe::Level => party.avg_level,
        RateProbe::Param(index) => party.avg_param(index),
    };

    (0..RATE_TABLE_ROWS)
        .map(|row| {
            let value = base + 5.0 * inc - row as f64 * inc;
            let rate = match probe {
                RateProbe::Level => rate_level(meta, value, settings.level_rate),
                RateProbe::Param(index) => rate_param(meta, index, value, settings.param_rate),
            };
            RateSample { value, rate }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::party::FlagTable;

    fn meta(base_rate: i32, target_level: i32, target_params: Option<[i32; 8]>) -> RateMeta {
        RateMeta {
            base_rate,
            target_level,
            target_params,
        }
    }

    #[test]
    fn test_rate_level_at_target() {
        let item = meta(10, 50, None);
        assert_eq!(rate_level(&item, 50.0, 50), 50);
        assert_eq!(rate_level(&item, 0.0, 50), 1);
    }

    #[test]
    fn test_rate_level_monotonic_below_target() {
        let item = meta(10, 40, None);
        let mut previous = i32::MIN;
        for level in 1..=40 {
            let rate = rate_level(&item, level as f64, 50);
            assert!(rate >= previous, "rate dropped at level {}", level);
            previous = rate;
        }
        assert_eq!(previous, 50);
    }

    #[test]
    fn test_rate_level_linear_branch_above_target() {
        let item = meta(10, 20, None);
        // 50 + (26 - 20) / 2
        assert_eq!(rate_level(&item, 26.0, 50), 53);
        // 50 + 0.5 rounds away from zero
        assert_eq!(rate_level(&item, 21.0, 50), 51);
        // Exactly at the target the exponential branch still applies
        assert_eq!(rate_level(&item, 20.0, 50), 50);
    }

    #[test]
    fn test_rate_param_without_targets_is_neutral() {
        let item = meta(10, 50, None);
        assert_eq!(rate_param(&item, 0, 30.0, 50), 50);
        assert_eq!(rate_param(&item, 7, 0.0, 50), 50);
        assert_eq!(rate_param(&item, 3, 9999.0, 35), 35);
    }

    #[test]
    fn test_rate_param_with_targets() {
        let item = meta(10, 50, Some([5000, 300, 20, 50, 60, 40, 21, 25]));
        // At the target the curve reaches the full param rate
        assert_eq!(rate_param(&item, 2, 20.0, 50), 50);
        // Above the target it stays capped
        assert_eq!(rate_param(&item, 2, 80.0, 50), 50);
        // Halfway: 50^(10/20) ≈ 7.07
        assert_eq!(rate_param(&item, 2, 10.0, 50), 7);
    }

    #[test]
    fn test_switch_factor_scenario() {
        let settings = ShopSettings::default();
        let party = PartyStatsSnapshot::default();
        let mut flags = FlagTable::new();
        flags.set_switch(1, true);

        let item = meta(10, 50, None);
        let factors = [WeightFactor::Switch(1)];
        let rate = appearance_rate(&item, &factors, &party, &flags, &settings);
        assert_eq!(rate, 60);

        flags.set_switch(1, false);
        let rate = appearance_rate(&item, &factors, &party, &flags, &settings);
        assert_eq!(rate, 10);
    }

    #[test]
    fn test_variable_factor_can_go_negative() {
        let settings = ShopSettings::default();
        let party = PartyStatsSnapshot::default();
        let mut flags = FlagTable::new();
        flags.set_variable(2, -25);

        let item = meta(10, 50, None);
        let factors = [WeightFactor::Variable(2)];
        let rate = appearance_rate(&item, &factors, &party, &flags, &settings);
        assert_eq!(rate, -15);
    }

    #[test]
    fn test_factors_accumulate() {
        let settings = ShopSettings::default();
        let party = PartyStatsSnapshot::new(50.0, [0.0; 8]);
        let mut flags = FlagTable::new();
        flags.set_switch(3, true);
        flags.set_variable(4, 5);

        let item = meta(10, 50, None);
        let factors = [
            WeightFactor::Level,
            WeightFactor::Param(0),
            WeightFactor::Switch(3),
            WeightFactor::Variable(4),
        ];
        // 10 + 50 (level) + 50 (param, no targets) + 50 (switch) + 5
        let rate = appearance_rate(&item, &factors, &party, &flags, &settings);
        assert_eq!(rate, 165);
        assert_eq!(appearance_rate(&item, &[], &party, &flags, &settings), 10);
    }

    #[test]
    fn test_rate_table_rows() {
        let settings = ShopSettings::default();
        let party = PartyStatsSnapshot::new(20.0, [0.0; 8]);
        let item = meta(10, 20, None);

        let table = rate_table(&item, RateProbe::Level, 2.0, &party, &settings);
        assert_eq!(table.len(), RATE_TABLE_ROWS);
        assert_eq!(table[0].value, 30.0);
        assert_eq!(table[0].rate, 55);
        assert_eq!(table[5].value, 20.0);
        assert_eq!(table[5].rate, 50);
        assert_eq!(table[9].value, 12.0);
    }
}
