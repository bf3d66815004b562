//! Core module - fundamental types and reference data

pub mod config;
pub mod distance;
pub mod electricity;
pub mod identity;
pub mod pairs;
pub mod reference;

pub use config::{Config, ConfigError};
pub use distance::DistanceTable;
pub use electricity::ElectricityMixMap;
pub use identity::{Country, CountryPair, EntityName, IdParseError, Indicator, TransportMode};
pub use pairs::PairMap;
pub use reference::{MissingEntityWarning, ReferenceError, ReferenceTable};
