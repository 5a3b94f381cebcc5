//! Host state snapshots consumed by shop generation.
//!
//! The host engine passes these in at call time instead of the generator
//! reaching into global party/switch/variable state.

use std::collections::HashMap;

use crate::note::PARAM_COUNT;

/// Basic parameter indices, in host database order
pub const PARAM_NAMES: [&str; PARAM_COUNT] = [
    "Max HP",
    "Max MP",
    "Attack",
    "Defense",
    "M.Attack",
    "M.Defense",
    "Agility",
    "Luck",
];

/// Party averages at the moment stock is generated
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PartyStatsSnapshot {
    pub avg_level: f64,
    pub avg_params: [f64; PARAM_COUNT],
    pub in_battle: bool,
}

impl PartyStatsSnapshot {
    pub fn new(avg_level: f64, avg_params: [f64; PARAM_COUNT]) -> Self {
        Self {
            avg_level,
            avg_params,
            in_battle: false,
        }
    }

    /// Average of one parameter; out-of-range indices read as 0
    pub fn avg_param(&self, index: usize) -> f64 {
        self.avg_params.get(index).copied().unwrap_or(0.0)
    }
}

/// Read access to the host's game switches and variables
pub trait FlagProvider {
    fn switch(&self, id: u32) -> bool;
    fn variable(&self, id: u32) -> i32;
}

/// In-memory switches and variables; unset switches are off, unset variables 0
#[derive(Debug, Clone, Default)]
pub struct FlagTable {
    switches: HashMap<u32, bool>,
    variables: HashMap<u32, i32>,
}

impl FlagTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_switch(&mut self, id: u32, on: bool) {
        self.switches.insert(id, on);
    }

    pub fn set_variable(&mut self, id: u32, value: i32) {
        self.variables.insert(id, value);
    }
}

impl FlagProvider for FlagTable {
    fn switch(&self, id: u32) -> bool {
        self.switches.get(&id).copied().unwrap_or(false)
    }

    fn variable(&self, id: u32) -> i32 {
        self.variables.get(&id).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_table_defaults() {
        let mut flags = FlagTable::new();
        assert!(!flags.switch(1));
        assert_eq!(flags.variable(1), 0);

        flags.set_switch(1, true);
        flags.set_variable(2, -7);
        assert!(flags.switch(1));
        assert_eq!(flags.variable(2), -7);
    }

    #[test]
    fn test_avg_param_out_of_range() {
        let party = PartyStatsSnapshot::new(10.0, [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        assert_eq!(party.avg_param(7), 8.0);
        assert_eq!(party.avg_param(8), 0.0);
    }
}
