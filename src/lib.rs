//! Random shop stock and pixel collision maps for 2D RPG engines.
//!
//! - [`shop`]: shops whose stock is re-rolled from weighted item
//!   appearance rates (party level, params, switches, variables).
//! - [`collision`]: per-pixel passability and pixel regions sampled from a
//!   map's collision image.
//! - [`session::PluginSession`]: the hook surface a host engine calls into.

pub mod collision;
pub mod config;
pub mod data;
pub mod error;
pub mod map;
pub mod note;
pub mod party;
pub mod session;
pub mod shop;

pub use config::Settings;
pub use session::PluginSession;
