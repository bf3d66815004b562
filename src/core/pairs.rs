//! Symmetric lookup keyed by unordered country pairs
//!
//! Both the distance table and the transport-mode preferences are keyed by
//! a [`CountryPair`], so `(A, B)` and `(B, A)` always resolve to the same
//! entry. Deserializing a map that declares both orders with different
//! values is an error.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use crate::core::identity::{Country, CountryPair};

/// Map from an unordered country pair to a value
#[derive(Debug, Clone, PartialEq)]
pub struct PairMap<V> {
    entries: BTreeMap<CountryPair, V>,
}

impl<V> Default for PairMap<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<V> PairMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value for the pair, returning the previous value if any
    pub fn insert(&mut self, a: Country, b: Country, value: V) -> Option<V> {
        self.entries.insert(CountryPair::new(a, b), value)
    }

    /// Look up the value for `(a, b)`, in either order
    pub fn get(&self, a: Country, b: Country) -> Option<&V> {
        self.entries.get(&CountryPair::new(a, b))
    }

    pub fn contains(&self, a: Country, b: Country) -> bool {
        self.get(a, b).is_some()
    }

    /// Replace every stored value
    pub fn set_all(&mut self, value: V)
    where
        V: Clone,
    {
        for v in self.entries.values_mut() {
            *v = value.clone();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CountryPair, &V)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> FromIterator<(Country, Country, V)> for PairMap<V> {
    fn from_iter<I: IntoIterator<Item = (Country, Country, V)>>(iter: I) -> Self {
        let mut map = PairMap::new();
        for (a, b, v) in iter {
            map.insert(a, b, v);
        }
        map
    }
}

impl<V: Serialize> Serialize for PairMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, v)| (k.to_string(), v)))
    }
}

struct PairMapVisitor<V>(PhantomData<V>);

impl<'de, V> Visitor<'de> for PairMapVisitor<V>
where
    V: Deserialize<'de> + PartialEq + fmt::Debug,
{
    type Value = PairMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map keyed by country pairs such as \"France - China\"")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = PairMap::new();
        while let Some((key, value)) = access.next_entry::<CountryPair, V>()? {
            let (a, b) = key.countries();
            if let Some(existing) = map.get(a, b) {
                if *existing != value {
                    return Err(serde::de::Error::custom(format!(
                        "conflicting entries for '{}': {:?} vs {:?}",
                        key, existing, value
                    )));
                }
            }
            map.insert(a, b, value);
        }
        Ok(map)
    }
}

impl<'de, V> Deserialize<'de> for PairMap<V>
where
    V: Deserialize<'de> + PartialEq + fmt::Debug,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(PairMapVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::TransportMode;

    #[test]
    fn test_lookup_is_symmetric() {
        let mut map = PairMap::new();
        map.insert(Country::France, Country::Taiwan, 18075.0);
        assert_eq!(map.get(Country::Taiwan, Country::France), Some(&18075.0));
        assert_eq!(map.get(Country::France, Country::Taiwan), Some(&18075.0));
        assert!(map.get(Country::France, Country::France).is_none());
    }

    #[test]
    fn test_insert_in_reverse_order_overwrites() {
        let mut map = PairMap::new();
        map.insert(Country::France, Country::China, TransportMode::Boat);
        let previous = map.insert(Country::China, Country::France, TransportMode::Plane);
        assert_eq!(previous, Some(TransportMode::Boat));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_deserialize_from_yaml() {
        let yaml = "France - Chine: boat\nTaiwan - France: plane\n";
        let map: PairMap<TransportMode> = serde_yml::from_str(yaml).unwrap();
        assert_eq!(map.get(Country::China, Country::France), Some(&TransportMode::Boat));
        assert_eq!(map.get(Country::France, Country::Taiwan), Some(&TransportMode::Plane));
    }

    #[test]
    fn test_deserialize_rejects_conflicting_orders() {
        let yaml = "France - Chine: boat\nChine - France: plane\n";
        let result: Result<PairMap<TransportMode>, _> = serde_yml::from_str(yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_accepts_consistent_duplicates() {
        let yaml = "France - Chine: boat\nChine - France: boat\n";
        let map: PairMap<TransportMode> = serde_yml::from_str(yaml).unwrap();
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_set_all() {
        let mut map: PairMap<TransportMode> = [
            (Country::France, Country::China, TransportMode::Boat),
            (Country::China, Country::Taiwan, TransportMode::Truck),
        ]
        .into_iter()
        .collect();
        map.set_all(TransportMode::Train);
        assert!(map.iter().all(|(_, m)| *m == TransportMode::Train));
    }
}
