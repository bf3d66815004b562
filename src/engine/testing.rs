//! Shared fixtures for calculator tests

use crate::core::identity::{Country, EntityName, Indicator};
use crate::core::pairs::PairMap;
use crate::core::reference::ReferenceTable;
use crate::entities::product::{Material, ProcessingProfile, ProductDescription, UsageProfile};

pub fn co2() -> Indicator {
    Indicator::new("kg eq. CO2")
}

pub fn sample_table() -> ReferenceTable {
    let indicators = vec![
        co2(),
        Indicator::new("eq. kBq U235"),
        Indicator::new("kg eq. Sb"),
    ];
    let mut table = ReferenceTable::new(indicators.clone());
    let rows: [(&str, [f64; 3]); 9] = [
        ("Plaque de PPMA", [3.8, 0.12, 0.000_02]),
        ("Acier", [2.5, 0.1, 0.000_01]),
        ("Fil de cuivre", [4.2, 0.35, 0.002]),
        ("Mix électrique réseau, FR", [0.0599, 0.85, 0.000_000_4]),
        ("Mix électrique réseau, CN", [0.9, 0.05, 0.000_000_9]),
        ("train", [0.03, 0.01, 0.000_000_2]),
        ("truck", [0.12, 0.005, 0.000_000_5]),
        ("plane", [1.1, 0.02, 0.000_001]),
        ("boat", [0.01, 0.000_8, 0.000_000_05]),
    ];
    for (name, values) in rows {
        table.insert(
            EntityName::parse(name).unwrap(),
            indicators.iter().cloned().zip(values),
        );
    }
    table
}

/// Two materials from China and Taiwan, assembled in China, used in France
pub fn product_yaml() -> ProductDescription {
    serde_yml::from_str(
        r#"
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
"#,
    )
    .unwrap()
}

/// 1 kg of one material, everything in France, no use-phase energy
pub fn single_material_product() -> ProductDescription {
    ProductDescription {
        name: None,
        materials: vec![Material {
            name: EntityName::parse("Plaque de PPMA").unwrap(),
            usable_mass_kg: 1.0,
            finished_mass_kg: 1.0,
            origin: Country::France,
        }],
        processing: ProcessingProfile {
            country: Country::France,
            energy_kwh: 0.0,
        },
        usage: UsageProfile {
            country: Country::France,
            lifespan_years: 0.0,
            cycles_per_year: 1200.0,
            power_w: 800.0,
            cycle_minutes: 3.0,
        },
        transport: PairMap::new(),
    }
}
