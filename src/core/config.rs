//! Configuration management with layered hierarchy
//!
//! Layers, lowest priority first: built-in defaults, the global user file
//! (`~/.config/lca/config.yaml`), the project file (`lca.yaml` in the
//! working directory, or the file passed with `--config`), then `LCA_*`
//! environment variables. Map-valued settings merge entry by entry.

use indexmap::IndexMap;
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::electricity::ElectricityMixMap;
use crate::core::identity::{Country, EntityName, Indicator};
use crate::engine::NormalizationFactors;
use crate::yaml::{parse_yaml_file, YamlError};

/// Project configuration file looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "lca.yaml";

/// Default product description file
pub const DEFAULT_PRODUCT_FILE: &str = "product.yaml";

/// Default reference table file
pub const DEFAULT_REFERENCE_FILE: &str = "reference.csv";

/// Yearly footprint of an average European citizen (µPt)
pub const CITIZEN_YEARLY_MICROPOINTS: f64 = 1_000_000.0;

/// Raw spreadsheet labels and their canonical entity names
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("Plaque de polystyrène, (PS), RER", "Plaque de PPMA"),
    ("Acier inoxydable, rouleaux, laminés à froid", "Acier"),
    ("Mix cuivre (99,999% issu de l'électrolyse)", "Fil de cuivre"),
    ("Transport maritime par porte-conteneurs  [tkm], GLO", "boat"),
    ("Transport maritime par porte-conteneurs [tkm], GLO", "boat"),
    ("Transport ferroviaire , GLO défaut", "train"),
    ("Transport ferroviaire, GLO défaut", "train"),
    ("Transport en camion [tkm], GLO", "truck"),
    ("Transport aérien moyen-courrier  [tkm], GLO", "plane"),
    ("Transport aérien moyen-courrier [tkm], GLO", "plane"),
];

/// Configuration keys and their descriptions
pub const CONFIG_KEYS: &[(&str, &str)] = &[
    ("product", "Product description file (default: product.yaml)"),
    ("reference", "Reference table CSV (default: reference.csv)"),
    ("default_format", "Default output format (table, md, csv, json, yaml)"),
    (
        "citizen_yearly_micropoints",
        "Yearly footprint of an average citizen in µPt (default: 1000000)",
    ),
    ("normalization", "Indicator → µPt conversion factor"),
    ("electricity_mix", "Country → reference row of its grid electricity mix"),
    ("reference_aliases", "Raw reference label → canonical entity name"),
];

/// Environment variables read by the last layer
pub const ENV_VARS: &[&str] = &["LCA_PRODUCT", "LCA_REFERENCE", "LCA_FORMAT", "LCA_CITIZEN_FOOTPRINT"];

/// Errors raised while loading configuration
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlError),

    #[error("Config file not found: {0}")]
    #[diagnostic(code(lca::config::not_found))]
    NotFound(PathBuf),

    #[error("Invalid value for {var}: '{value}'")]
    #[diagnostic(code(lca::config::env), help("Expected a positive number"))]
    InvalidEnv { var: String, value: String },
}

/// LCA configuration with layered hierarchy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Product description file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<PathBuf>,

    /// Reference table file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<PathBuf>,

    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,

    /// Yearly footprint of an average citizen (µPt)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub citizen_yearly_micropoints: Option<f64>,

    pub normalization: IndexMap<Indicator, f64>,

    pub electricity_mix: BTreeMap<Country, EntityName>,

    pub reference_aliases: IndexMap<String, EntityName>,
}

impl Config {
    /// Built-in defaults (layer 1)
    pub fn builtin() -> Self {
        Self {
            product: None,
            reference: None,
            default_format: None,
            citizen_yearly_micropoints: Some(CITIZEN_YEARLY_MICROPOINTS),
            normalization: NormalizationFactors::default()
                .iter()
                .map(|(c, f)| (c.clone(), f))
                .collect(),
            electricity_mix: ElectricityMixMap::default()
                .iter()
                .map(|(c, e)| (*c, e.clone()))
                .collect(),
            reference_aliases: BUILTIN_ALIASES
                .iter()
                .map(|&(raw, name)| (raw.to_string(), EntityName::known(name)))
                .collect(),
        }
    }

    /// Load configuration from all sources, merging in priority order
    ///
    /// `explicit` replaces the project file and must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::builtin();

        if let Some(global_path) = Self::global_config_path() {
            config.merge_file(&global_path, false)?;
        }

        match explicit {
            Some(path) => config.merge_file(path, true)?,
            None => config.merge_file(Path::new(PROJECT_CONFIG_FILE), false)?,
        }

        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "lca")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    fn merge_file(&mut self, path: &Path, required: bool) -> Result<(), ConfigError> {
        if !path.exists() {
            if required {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Ok(());
        }
        let layer: Config = parse_yaml_file(path)?;
        tracing::debug!(path = %path.display(), "config layer loaded");
        self.merge(layer);
        Ok(())
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.product.is_some() {
            self.product = other.product;
        }
        if other.reference.is_some() {
            self.reference = other.reference;
        }
        if other.default_format.is_some() {
            self.default_format = other.default_format;
        }
        if other.citizen_yearly_micropoints.is_some() {
            self.citizen_yearly_micropoints = other.citizen_yearly_micropoints;
        }
        self.normalization.extend(other.normalization);
        self.electricity_mix.extend(other.electricity_mix);
        self.reference_aliases.extend(other.reference_aliases);
    }

    /// Apply the environment layer through a variable lookup
    pub fn apply_env<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(product) = var("LCA_PRODUCT") {
            self.product = Some(PathBuf::from(product));
        }
        if let Some(reference) = var("LCA_REFERENCE") {
            self.reference = Some(PathBuf::from(reference));
        }
        if let Some(format) = var("LCA_FORMAT") {
            self.default_format = Some(format);
        }
        if let Some(value) = var("LCA_CITIZEN_FOOTPRINT") {
            let parsed = value
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite() && *v > 0.0)
                .ok_or_else(|| ConfigError::InvalidEnv {
                    var: "LCA_CITIZEN_FOOTPRINT".to_string(),
                    value: value.clone(),
                })?;
            self.citizen_yearly_micropoints = Some(parsed);
        }
        Ok(())
    }

    pub fn product_path(&self) -> PathBuf {
        self.product
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PRODUCT_FILE))
    }

    pub fn reference_path(&self) -> PathBuf {
        self.reference
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REFERENCE_FILE))
    }

    pub fn citizen_yearly_micropoints(&self) -> f64 {
        self.citizen_yearly_micropoints
            .unwrap_or(CITIZEN_YEARLY_MICROPOINTS)
    }

    pub fn normalization_factors(&self) -> NormalizationFactors {
        NormalizationFactors::new(self.normalization.clone())
    }

    pub fn electricity_mix_map(&self) -> ElectricityMixMap {
        ElectricityMixMap::new(self.electricity_mix.clone())
    }

    /// Render one key's effective value, `None` for unknown or unset keys
    pub fn value_of(&self, key: &str) -> Option<String> {
        match key {
            "product" => Some(self.product_path().display().to_string()),
            "reference" => Some(self.reference_path().display().to_string()),
            "default_format" => self.default_format.clone(),
            "citizen_yearly_micropoints" => Some(self.citizen_yearly_micropoints().to_string()),
            "normalization" => serde_yml::to_string(&self.normalization).ok(),
            "electricity_mix" => serde_yml::to_string(&self.electricity_mix).ok(),
            "reference_aliases" => serde_yml::to_string(&self.reference_aliases).ok(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_builtin_defaults() {
        let config = Config::builtin();
        assert_eq!(config.citizen_yearly_micropoints(), 1_000_000.0);
        assert_eq!(
            config.normalization.get(&Indicator::new("kg eq. Sb")),
            Some(&1395510.0)
        );
        assert!(config.electricity_mix_map().get(Country::Taiwan).is_none());
        assert_eq!(
            config.reference_aliases["Transport en camion [tkm], GLO"].as_str(),
            "truck"
        );
        assert_eq!(config.product_path(), PathBuf::from("product.yaml"));
    }

    #[test]
    fn test_merge_maps_entry_by_entry() {
        let mut config = Config::builtin();
        let layer: Config = serde_yml::from_str(
            r#"
normalization:
  kg eq. CO2: 30.0
electricity_mix:
  Taiwan: Mix électrique réseau, TW
default_format: md
"#,
        )
        .unwrap();
        config.merge(layer);

        assert_eq!(config.normalization[&Indicator::new("kg eq. CO2")], 30.0);
        assert_eq!(config.normalization[&Indicator::new("eq. kBq U235")], 12.73);
        assert_eq!(
            config.electricity_mix_map().get(Country::Taiwan).map(|e| e.as_str()),
            Some("Mix électrique réseau, TW")
        );
        assert!(config.electricity_mix_map().get(Country::France).is_some());
        assert_eq!(config.default_format.as_deref(), Some("md"));
    }

    #[test]
    fn test_env_layer() {
        let mut config = Config::builtin();
        config
            .apply_env(|var| match var {
                "LCA_PRODUCT" => Some("other.yaml".to_string()),
                "LCA_CITIZEN_FOOTPRINT" => Some("2000000".to_string()),
                _ => None,
            })
            .unwrap();
        assert_eq!(config.product_path(), PathBuf::from("other.yaml"));
        assert_eq!(config.citizen_yearly_micropoints(), 2_000_000.0);
    }

    #[test]
    fn test_env_invalid_number() {
        let mut config = Config::builtin();
        let err = config
            .apply_env(|var| (var == "LCA_CITIZEN_FOOTPRINT").then(|| "lots".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnv { .. }));
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let err = Config::load(Some(Path::new("/nonexistent/lca.yaml"))).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_explicit_file_is_merged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.yaml");
        fs::write(&path, "reference: data/factors.csv\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        // LCA_REFERENCE in the test environment would take precedence
        if std::env::var("LCA_REFERENCE").is_err() {
            assert_eq!(config.reference_path(), PathBuf::from("data/factors.csv"));
        }
    }

    #[test]
    fn test_malformed_layer_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "electricity_mix:\n  Atlantis: Mix\n").unwrap();
        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_value_of() {
        let config = Config::builtin();
        assert_eq!(config.value_of("citizen_yearly_micropoints").as_deref(), Some("1000000"));
        assert!(config.value_of("default_format").is_none());
        assert!(config.value_of("nope").is_none());
        assert!(CONFIG_KEYS.iter().all(|(k, _)| *k == "default_format" || config.value_of(k).is_some()));
    }
}
