//! Identity types: countries, transport modes, country pairs and
//! reference-table keys

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Countries a product description may reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Country {
    France,
    China,
    Taiwan,
}

impl Country {
    /// Get the canonical name of the country
    pub fn as_str(&self) -> &'static str {
        match self {
            Country::France => "France",
            Country::China => "China",
            Country::Taiwan => "Taiwan",
        }
    }

    /// Get all known countries
    pub fn all() -> &'static [Country] {
        &[Country::France, Country::China, Country::Taiwan]
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Country {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Source documents are written in French, accept both spellings
        match s.trim().to_lowercase().as_str() {
            "france" => Ok(Country::France),
            "china" | "chine" => Ok(Country::China),
            "taiwan" | "taïwan" => Ok(Country::Taiwan),
            _ => Err(IdParseError::UnknownCountry(s.to_string())),
        }
    }
}

impl Serialize for Country {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Country {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Means of transport between two locations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    Train,
    Truck,
    Plane,
    Boat,
}

impl TransportMode {
    /// Get the lowercase label, which is also the reference-table row name
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportMode::Train => "train",
            TransportMode::Truck => "truck",
            TransportMode::Plane => "plane",
            TransportMode::Boat => "boat",
        }
    }

    /// Get all transport modes
    pub fn all() -> &'static [TransportMode] {
        &[
            TransportMode::Train,
            TransportMode::Truck,
            TransportMode::Plane,
            TransportMode::Boat,
        ]
    }

    /// Reference-table row holding this mode's per-t·km factors
    pub fn entity_name(&self) -> EntityName {
        EntityName::known(self.as_str())
    }
}

impl Default for TransportMode {
    fn default() -> Self {
        TransportMode::Truck
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "train" => Ok(TransportMode::Train),
            "truck" => Ok(TransportMode::Truck),
            "plane" => Ok(TransportMode::Plane),
            "boat" => Ok(TransportMode::Boat),
            _ => Err(IdParseError::UnknownMode(s.to_string())),
        }
    }
}

/// An unordered pair of countries
///
/// The two countries are stored sorted, so `France - China` and
/// `China - France` compare and hash identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CountryPair {
    low: Country,
    high: Country,
}

impl CountryPair {
    pub fn new(a: Country, b: Country) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    /// Pair of a country with itself (intra-country logistics)
    pub fn domestic(country: Country) -> Self {
        Self::new(country, country)
    }

    /// Get both countries, in normalized order
    pub fn countries(&self) -> (Country, Country) {
        (self.low, self.high)
    }

    /// Check whether both ends are the same country
    pub fn is_domestic(&self) -> bool {
        self.low == self.high
    }
}

impl fmt::Display for CountryPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.low, self.high)
    }
}

impl FromStr for CountryPair {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .split_once('-')
            .ok_or_else(|| IdParseError::MissingDelimiter(s.to_string()))?;
        Ok(Self::new(a.parse()?, b.parse()?))
    }
}

impl Serialize for CountryPair {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CountryPair {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Row key of the reference table (material, electricity mix or transport mode)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityName(String);

impl EntityName {
    /// Validate a row label: surrounding whitespace is dropped, empty labels are rejected
    pub fn parse(s: &str) -> Result<Self, IdParseError> {
        s.parse()
    }

    /// Built-in row names, already trimmed and non-empty
    pub(crate) fn known(s: &'static str) -> Self {
        Self(s.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for EntityName {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(IdParseError::EmptyName);
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl Serialize for EntityName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EntityName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Environmental impact category (a reference-table column)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Indicator(String);

impl Indicator {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Indicator {
    fn from(value: &str) -> Self {
        Indicator::new(value)
    }
}

/// Errors that can occur when parsing identifiers
#[derive(Debug, Error, PartialEq)]
pub enum IdParseError {
    #[error("unknown country: '{0}' (valid: France, China/Chine, Taiwan)")]
    UnknownCountry(String),

    #[error("unknown transport mode: '{0}' (valid: train, truck, plane, boat)")]
    UnknownMode(String),

    #[error("missing '-' delimiter in country pair: '{0}'")]
    MissingDelimiter(String),

    #[error("entity name must not be empty")]
    EmptyName,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_parsing_accepts_french_names() {
        assert_eq!("Chine".parse::<Country>().unwrap(), Country::China);
        assert_eq!("china".parse::<Country>().unwrap(), Country::China);
        assert_eq!(" France ".parse::<Country>().unwrap(), Country::France);
        assert_eq!("Taiwan".parse::<Country>().unwrap(), Country::Taiwan);
    }

    #[test]
    fn test_country_unknown() {
        let err = "Atlantis".parse::<Country>().unwrap_err();
        assert!(matches!(err, IdParseError::UnknownCountry(_)));
    }

    #[test]
    fn test_pair_is_unordered() {
        let a = CountryPair::new(Country::France, Country::China);
        let b = CountryPair::new(Country::China, Country::France);
        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_pair_parsing_either_order() {
        let a: CountryPair = "France - Chine".parse().unwrap();
        let b: CountryPair = "Chine - France".parse().unwrap();
        assert_eq!(a, b);
        assert!(!a.is_domestic());
        assert!(CountryPair::domestic(Country::Taiwan).is_domestic());
    }

    #[test]
    fn test_pair_missing_delimiter() {
        let err = "France".parse::<CountryPair>().unwrap_err();
        assert!(matches!(err, IdParseError::MissingDelimiter(_)));
    }

    #[test]
    fn test_transport_mode_roundtrip() {
        for mode in TransportMode::all() {
            let parsed: TransportMode = mode.as_str().parse().unwrap();
            assert_eq!(parsed, *mode);
            assert_eq!(mode.entity_name().as_str(), mode.as_str());
        }
        assert_eq!(TransportMode::default(), TransportMode::Truck);
    }

    #[test]
    fn test_entity_name_is_trimmed() {
        let name = EntityName::parse("  Acier ").unwrap();
        assert_eq!(name.as_str(), "Acier");
        assert_eq!(EntityName::parse("   ").unwrap_err(), IdParseError::EmptyName);
    }
}
