//! Product description - bill of materials, assembly, usage and transport
//!
//! The description is read from YAML (or JSON). Field names follow the
//! English schema below; the French keys of the original customer data
//! file are accepted as aliases so it can be loaded unchanged.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

use crate::core::identity::{Country, EntityName, TransportMode};
use crate::core::pairs::PairMap;
use crate::yaml::{parse_yaml_file, YamlError};

/// One line of the bill of materials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Material name, also its reference-table row
    #[serde(alias = "Nom")]
    pub name: EntityName,

    /// Net usable mass before processing losses (kg)
    #[serde(alias = "Masse utile (kg)")]
    pub usable_mass_kg: f64,

    /// Mass ending up in the finished product (kg)
    #[serde(alias = "Masse produit fini (kg)")]
    pub finished_mass_kg: f64,

    /// Where the material is produced
    #[serde(alias = "Lieu de production")]
    pub origin: Country,
}

/// Assembly step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingProfile {
    #[serde(alias = "Lieu d'assemblage")]
    pub country: Country,

    /// Electricity consumed during assembly (kWh)
    #[serde(alias = "Consommation d'energie (kWh)")]
    pub energy_kwh: f64,
}

/// Use phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageProfile {
    #[serde(alias = "Lieu d'utilisation")]
    pub country: Country,

    #[serde(alias = "Duree de vie (annees)")]
    pub lifespan_years: f64,

    #[serde(alias = "Nombre de cycles par an")]
    pub cycles_per_year: f64,

    #[serde(alias = "Puisance (W)", alias = "Puissance (W)")]
    pub power_w: f64,

    #[serde(alias = "Duree de cycle (min)")]
    pub cycle_minutes: f64,
}

impl UsageProfile {
    /// Total electricity drawn over the product's life (kWh)
    pub fn lifetime_energy_kwh(&self) -> f64 {
        self.lifespan_years * self.cycles_per_year * self.power_w * self.cycle_minutes
            / 60.0 // min -> h
            / 1000.0 // W -> kW
    }

    /// Human-readable functional unit
    pub fn functional_unit(&self) -> String {
        format!(
            "cooking food in {} minutes at a power of {} W, {} times a year during {} years",
            self.cycle_minutes, self.power_w, self.cycles_per_year, self.lifespan_years
        )
    }
}

/// Declared transport mode per country pair
pub type TransportModePreference = PairMap<TransportMode>;

/// Complete product description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductDescription {
    /// Product name (free text)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(alias = "Materiaux")]
    pub materials: Vec<Material>,

    #[serde(alias = "Processing")]
    pub processing: ProcessingProfile,

    #[serde(alias = "Usage")]
    pub usage: UsageProfile,

    #[serde(default, alias = "Moyen de transport")]
    pub transport: TransportModePreference,
}

/// Errors raised while loading or validating a product description
#[derive(Debug, Error, Diagnostic)]
pub enum ProductError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),

    #[error("Product has no materials")]
    #[diagnostic(code(lca::product::empty))]
    NoMaterials,

    #[error("Material '{0}' is listed more than once")]
    #[diagnostic(
        code(lca::product::duplicate),
        help("Material names must be unique; merge the two lines or rename one")
    )]
    DuplicateMaterial(EntityName),

    #[error("Invalid value for {field}: {value} (must be a finite, non-negative number)")]
    #[diagnostic(code(lca::product::value))]
    InvalidValue { field: String, value: f64 },
}

impl ProductDescription {
    /// Load and validate a product description file
    pub fn load(path: &Path) -> Result<Self, ProductError> {
        let product: ProductDescription = parse_yaml_file(path)?;
        product.validate()?;
        tracing::debug!(
            path = %path.display(),
            materials = product.materials.len(),
            "product description loaded"
        );
        Ok(product)
    }

    /// Check the invariants the calculators rely on
    pub fn validate(&self) -> Result<(), ProductError> {
        if self.materials.is_empty() {
            return Err(ProductError::NoMaterials);
        }

        let mut seen = HashSet::new();
        for m in &self.materials {
            if !seen.insert(&m.name) {
                return Err(ProductError::DuplicateMaterial(m.name.clone()));
            }
            check_quantity(&format!("{}.usable_mass_kg", m.name), m.usable_mass_kg)?;
            check_quantity(&format!("{}.finished_mass_kg", m.name), m.finished_mass_kg)?;
        }

        check_quantity("processing.energy_kwh", self.processing.energy_kwh)?;
        check_quantity("usage.lifespan_years", self.usage.lifespan_years)?;
        check_quantity("usage.cycles_per_year", self.usage.cycles_per_year)?;
        check_quantity("usage.power_w", self.usage.power_w)?;
        check_quantity("usage.cycle_minutes", self.usage.cycle_minutes)?;
        Ok(())
    }

    /// Mass of the finished product (kg)
    pub fn finished_mass_kg(&self) -> f64 {
        self.materials.iter().map(|m| m.finished_mass_kg).sum()
    }

    pub fn material(&self, name: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.name.as_str() == name)
    }

    /// Transport mode declared between two countries, `truck` when undeclared
    pub fn transport_mode(&self, from: Country, to: Country) -> TransportMode {
        self.transport.get(from, to).copied().unwrap_or_default()
    }
}

fn check_quantity(field: &str, value: f64) -> Result<(), ProductError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ProductError::InvalidValue {
            field: field.to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const PRODUCT_YAML: &str = r#"
name: Microwave
materials:
  - name: Acier
    usable_mass_kg: 12.0
    finished_mass_kg: 10.0
    origin: China
  - name: Fil de cuivre
    usable_mass_kg: 1.0
    finished_mass_kg: 0.9
    origin: Taiwan
processing:
  country: China
  energy_kwh: 5.0
usage:
  country: France
  lifespan_years: 8
  cycles_per_year: 1200
  power_w: 800
  cycle_minutes: 3
transport:
  France - China: boat
"#;

    // Field names of the original customer data file
    const PRODUCT_JSON_FR: &str = r#"{
  "Materiaux": [
    {"Nom": "Plaque de PPMA", "Masse utile (kg)": 1.2, "Masse produit fini (kg)": 1.0, "Lieu de production": "Chine"}
  ],
  "Processing": {"Lieu d'assemblage": "Chine", "Consommation d'energie (kWh)": 2.0},
  "Usage": {"Lieu d'utilisation": "France", "Duree de vie (annees)": 10, "Nombre de cycles par an": 1200,
            "Puisance (W)": 800, "Duree de cycle (min)": 3},
  "Moyen de transport": {"France - Chine": "boat", "Chine - Taiwan": "boat"}
}"#;

    #[test]
    fn test_parse_yaml() {
        let product: ProductDescription = serde_yml::from_str(PRODUCT_YAML).unwrap();
        assert_eq!(product.materials.len(), 2);
        assert_eq!(product.processing.country, Country::China);
        assert_eq!(
            product.transport_mode(Country::China, Country::France),
            TransportMode::Boat
        );
        assert!(product.validate().is_ok());
    }

    #[test]
    fn test_parse_original_french_keys() {
        let product: ProductDescription = serde_yml::from_str(PRODUCT_JSON_FR).unwrap();
        assert_eq!(product.materials[0].name.as_str(), "Plaque de PPMA");
        assert_eq!(product.materials[0].origin, Country::China);
        assert_eq!(product.usage.power_w, 800.0);
        assert_eq!(
            product.transport_mode(Country::Taiwan, Country::China),
            TransportMode::Boat
        );
    }

    #[test]
    fn test_undeclared_mode_defaults_to_truck() {
        let product: ProductDescription = serde_yml::from_str(PRODUCT_YAML).unwrap();
        assert_eq!(
            product.transport_mode(Country::Taiwan, Country::China),
            TransportMode::Truck
        );
    }

    #[test]
    fn test_lifetime_energy() {
        let product: ProductDescription = serde_yml::from_str(PRODUCT_YAML).unwrap();
        // 8 * 1200 * 800 W * 3 min = 384 kWh
        assert!((product.usage.lifetime_energy_kwh() - 384.0).abs() < 1e-9);
    }

    #[test]
    fn test_functional_unit_mentions_inputs() {
        let product: ProductDescription = serde_yml::from_str(PRODUCT_YAML).unwrap();
        let text = product.usage.functional_unit();
        assert!(text.contains("800 W"));
        assert!(text.contains("8 years"));
    }

    #[test]
    fn test_finished_mass() {
        let product: ProductDescription = serde_yml::from_str(PRODUCT_YAML).unwrap();
        assert!((product.finished_mass_kg() - 10.9).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_material_rejected() {
        let mut product: ProductDescription = serde_yml::from_str(PRODUCT_YAML).unwrap();
        let first = product.materials[0].clone();
        product.materials.push(first);
        assert!(matches!(
            product.validate(),
            Err(ProductError::DuplicateMaterial(_))
        ));
    }

    #[test]
    fn test_negative_mass_rejected() {
        let mut product: ProductDescription = serde_yml::from_str(PRODUCT_YAML).unwrap();
        product.materials[1].usable_mass_kg = -1.0;
        assert!(matches!(
            product.validate(),
            Err(ProductError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_unknown_country_rejected() {
        let yaml = PRODUCT_YAML.replace("country: France", "country: Atlantis");
        let result: Result<ProductDescription, _> = serde_yml::from_str(&yaml);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("product.yaml");
        fs::write(&path, PRODUCT_YAML).unwrap();
        let product = ProductDescription::load(&path).unwrap();
        assert_eq!(product.name.as_deref(), Some("Microwave"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = ProductDescription::load(Path::new("/nonexistent/product.yaml"));
        assert!(matches!(result, Err(ProductError::Yaml(YamlError::Io { .. }))));
    }
}
