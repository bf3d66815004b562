//! Reference road/sea distances between countries
//!
//! Distances are in km and come from searates.com route estimates. A
//! country paired with itself holds the typical intra-country haul.

use crate::core::identity::{Country, CountryPair};
use crate::core::pairs::PairMap;

/// Fixed distance table keyed by unordered country pair
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceTable {
    km: PairMap<f64>,
}

impl DistanceTable {
    pub fn new(km: PairMap<f64>) -> Self {
        Self { km }
    }

    /// Distance in km between two countries, in either order
    pub fn get(&self, a: Country, b: Country) -> Option<f64> {
        self.km.get(a, b).copied()
    }

    /// Pairs covered by the table
    pub fn pairs(&self) -> impl Iterator<Item = &CountryPair> {
        self.km.iter().map(|(pair, _)| pair)
    }
}

impl Default for DistanceTable {
    fn default() -> Self {
        use Country::*;
        Self::new(
            [
                (France, France, 600.0),
                (France, China, 18775.0),
                (France, Taiwan, 18075.0),
                (China, Taiwan, 850.0),
                (China, China, 1900.0),
                (Taiwan, Taiwan, 600.0),
            ]
            .into_iter()
            .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_covers_every_pair() {
        let table = DistanceTable::default();
        for a in Country::all() {
            for b in Country::all() {
                assert!(table.get(*a, *b).is_some(), "missing {} - {}", a, b);
            }
        }
    }

    #[test]
    fn test_lookup_is_symmetric() {
        let table = DistanceTable::default();
        for a in Country::all() {
            for b in Country::all() {
                assert_eq!(table.get(*a, *b), table.get(*b, *a));
            }
        }
    }

    #[test]
    fn test_domestic_distance_is_not_zero() {
        let table = DistanceTable::default();
        assert_eq!(table.get(Country::France, Country::France), Some(600.0));
        assert_eq!(table.get(Country::China, Country::China), Some(1900.0));
    }

    #[test]
    fn test_custom_table_can_miss_pairs() {
        let mut km = PairMap::new();
        km.insert(Country::France, Country::France, 600.0);
        let table = DistanceTable::new(km);
        assert!(table.get(Country::France, Country::China).is_none());
        assert_eq!(table.pairs().count(), 1);
    }
}
