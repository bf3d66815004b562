//! What-if scenario overrides applied on top of a product description
//!
//! These mirror the knobs of the interactive dashboard the tool replaces:
//! lifetime and power sliders, country selectors and the main transport
//! mode. Overrides never modify the file on disk; they produce a new
//! description for a single run.

use miette::Diagnostic;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;
use thiserror::Error;

use crate::core::identity::{Country, EntityName, IdParseError, TransportMode};
use crate::entities::product::ProductDescription;

/// Allowed product lifetime (years)
pub const LIFETIME_RANGE: RangeInclusive<f64> = 1.0..=30.0;

/// Allowed power draw (W)
pub const POWER_RANGE: RangeInclusive<f64> = 400.0..=1000.0;

/// `NAME=COUNTRY` assignment of a material's production country
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginOverride {
    pub material: EntityName,
    pub country: Country,
}

impl FromStr for OriginOverride {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, country) = s
            .rsplit_once('=')
            .ok_or_else(|| IdParseError::MissingDelimiter(s.to_string()))?;
        Ok(Self {
            material: name.parse()?,
            country: country.parse()?,
        })
    }
}

impl fmt::Display for OriginOverride {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.material, self.country)
    }
}

/// Errors raised while applying scenario overrides
#[derive(Debug, Error, Diagnostic, PartialEq)]
pub enum ScenarioError {
    #[error("Lifetime {0} years is out of range (1-30)")]
    #[diagnostic(code(lca::scenario::lifetime))]
    LifetimeOutOfRange(f64),

    #[error("Power {0} W is out of range (400-1000)")]
    #[diagnostic(code(lca::scenario::power))]
    PowerOutOfRange(f64),

    #[error("Cannot set origin of '{0}': no such material in the product")]
    #[diagnostic(
        code(lca::scenario::material),
        help("Use `lca materials` to list the material names")
    )]
    UnknownMaterial(EntityName),
}

/// Scenario knobs; `None` keeps the value from the product description
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScenarioOverrides {
    pub lifetime_years: Option<f64>,
    pub power_w: Option<f64>,
    pub use_country: Option<Country>,
    pub assembly_country: Option<Country>,
    /// Replaces the mode of every declared country pair
    pub main_transport: Option<TransportMode>,
    pub origins: Vec<OriginOverride>,
}

impl ScenarioOverrides {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Check the slider ranges
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if let Some(years) = self.lifetime_years {
            if !LIFETIME_RANGE.contains(&years) {
                return Err(ScenarioError::LifetimeOutOfRange(years));
            }
        }
        if let Some(watts) = self.power_w {
            if !POWER_RANGE.contains(&watts) {
                return Err(ScenarioError::PowerOutOfRange(watts));
            }
        }
        Ok(())
    }

    /// Produce the overridden product description
    pub fn apply(&self, product: &ProductDescription) -> Result<ProductDescription, ScenarioError> {
        self.validate()?;
        let mut out = product.clone();

        if let Some(years) = self.lifetime_years {
            out.usage.lifespan_years = years;
        }
        if let Some(watts) = self.power_w {
            out.usage.power_w = watts;
        }
        if let Some(country) = self.use_country {
            out.usage.country = country;
        }
        if let Some(country) = self.assembly_country {
            out.processing.country = country;
        }
        if let Some(mode) = self.main_transport {
            out.transport.set_all(mode);
        }
        for origin in &self.origins {
            let material = out
                .materials
                .iter_mut()
                .find(|m| m.name == origin.material)
                .ok_or_else(|| ScenarioError::UnknownMaterial(origin.material.clone()))?;
            material.origin = origin.country;
        }

        if !self.is_empty() {
            tracing::debug!(overrides = ?self, "scenario applied");
        }
        Ok(out)
    }
}
