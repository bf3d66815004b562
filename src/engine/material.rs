//! Material phase: extraction and production of the bill of materials

use indexmap::IndexMap;

use crate::core::identity::{EntityName, Indicator};
use crate::core::reference::ReferenceTable;
use crate::engine::impact::ImpactVector;
use crate::entities::product::ProductDescription;

/// Impact of each material: its reference row scaled by its usable mass
pub fn material_impacts(
    product: &ProductDescription,
    table: &ReferenceTable,
) -> IndexMap<EntityName, ImpactVector> {
    product
        .materials
        .iter()
        .map(|m| {
            (
                m.name.clone(),
                ImpactVector::scaled_row(table, &m.name, m.usable_mass_kg),
            )
        })
        .collect()
}

/// Material phase total, summed over all materials
pub fn material_phase_impact(
    impacts: &IndexMap<EntityName, ImpactVector>,
    indicators: &[Indicator],
) -> ImpactVector {
    ImpactVector::sum(indicators, impacts.values())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::{co2, product_yaml, sample_table};

    #[test]
    fn test_impact_is_factor_times_usable_mass() {
        let table = sample_table();
        let product = product_yaml();
        let impacts = material_impacts(&product, &table);

        assert_eq!(impacts.len(), product.materials.len());
        for m in &product.materials {
            for c in table.indicators() {
                let expected = table.factor(&m.name, c) * m.usable_mass_kg;
                assert_eq!(impacts[&m.name].get(c), Some(expected));
            }
        }
    }

    #[test]
    fn test_phase_total_sums_materials() {
        let table = sample_table();
        let product = product_yaml();
        let impacts = material_impacts(&product, &table);
        let total = material_phase_impact(&impacts, table.indicators());

        let expected: f64 = impacts.values().filter_map(|v| v.get(&co2())).sum();
        assert!((total.get(&co2()).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_material_missing_from_table_is_zero() {
        let table = sample_table();
        let mut product = product_yaml();
        product.materials[0].name = EntityName::parse("Unobtainium").unwrap();
        let impacts = material_impacts(&product, &table);
        assert_eq!(impacts[0].get(&co2()), Some(0.0));
    }
}
