pub mod definition;
pub mod generator;
pub mod rates;
pub mod registry;

pub use definition::{ShopCategory, ShopDefinition, ShopStock, StockEntry, WeightFactor};
pub use generator::generate;
pub use rates::{RateProbe, RateSample, appearance_rate, rate_level, rate_param, rate_table};
pub use registry::{ResetMode, ShopOpening, ShopRegistry};
