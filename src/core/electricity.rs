//! Country → electricity-mix mapping

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::identity::{Country, EntityName};

/// Maps a country to the reference-table row of its grid electricity mix
///
/// Countries without an entry have no known grid mix; assembling or using
/// the product there cannot be assessed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElectricityMixMap(BTreeMap<Country, EntityName>);

impl ElectricityMixMap {
    pub fn new(entries: BTreeMap<Country, EntityName>) -> Self {
        Self(entries)
    }

    pub fn get(&self, country: Country) -> Option<&EntityName> {
        self.0.get(&country)
    }

    /// Add or replace the entry for a country
    pub fn set(&mut self, country: Country, entity: EntityName) {
        self.0.insert(country, entity);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Country, &EntityName)> {
        self.0.iter()
    }
}

impl Default for ElectricityMixMap {
    fn default() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            Country::France,
            EntityName::known("Mix électrique réseau, FR"),
        );
        entries.insert(
            Country::China,
            EntityName::known("Mix électrique réseau, CN"),
        );
        Self(entries)
    }
}
