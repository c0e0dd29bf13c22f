//! Static configuration: locations, via labels, ignore rules, anchors.
//!
//! Tables are either the built-in defaults or a JSON file supplied at
//! startup. They are validated once and never mutated afterwards.

mod defaults;
mod error;
mod store;
mod tables;

pub use defaults::edinburgh;
pub use error::ConfigError;
pub use store::ConfigStore;
pub use tables::{
    DEFAULT_LOCATION, IgnoreRule, LocationConfig, StopConfig, StopScope, StopSlot, Tables, ViaRule,
};
