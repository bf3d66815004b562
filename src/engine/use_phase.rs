//! Use phase: electricity drawn over the product's lifetime

use crate::core::electricity::ElectricityMixMap;
use crate::core::reference::ReferenceTable;
use crate::engine::error::EngineError;
use crate::engine::impact::ImpactVector;
use crate::engine::processing::electricity_mix;
use crate::entities::product::ProductDescription;

/// Use-country grid mix scaled by lifetime energy consumption
pub fn use_phase_impact(
    product: &ProductDescription,
    table: &ReferenceTable,
    electricity: &ElectricityMixMap,
) -> Result<ImpactVector, EngineError> {
    let mix = electricity_mix(electricity, product.usage.country, "use")?;
    let energy_kwh = product.usage.lifetime_energy_kwh();
    tracing::debug!(energy_kwh, mix = %mix, "use phase energy");
    Ok(ImpactVector::scaled_row(table, mix, energy_kwh))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::Country;
    use crate::engine::testing::{co2, product_yaml, sample_table};
    use approx::assert_relative_eq;

    #[test]
    fn test_use_phase_energy_conversion() {
        let table = sample_table();
        let mut product = product_yaml();
        product.usage.country = Country::France;
        product.usage.lifespan_years = 10.0;
        product.usage.cycles_per_year = 1200.0;
        product.usage.power_w = 1000.0;
        product.usage.cycle_minutes = 3.0;

        // 10 * 1200 * 1 kW * 0.05 h = 600 kWh
        let electricity = ElectricityMixMap::default();
        let impact = use_phase_impact(&product, &table, &electricity).unwrap();
        let mix = electricity.get(Country::France).unwrap();
        assert_relative_eq!(
            impact.get(&co2()).unwrap(),
            table.factor(mix, &co2()) * 600.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_use_country_switch_changes_mix() {
        let table = sample_table();
        let electricity = ElectricityMixMap::default();
        let mut product = product_yaml();

        product.usage.country = Country::France;
        let france = use_phase_impact(&product, &table, &electricity).unwrap();
        product.usage.country = Country::China;
        let china = use_phase_impact(&product, &table, &electricity).unwrap();

        assert!(china.get(&co2()).unwrap() > france.get(&co2()).unwrap());
    }

    #[test]
    fn test_unmapped_use_country_is_fatal() {
        let table = sample_table();
        let mut product = product_yaml();
        product.usage.country = Country::Taiwan;
        let err = use_phase_impact(&product, &table, &ElectricityMixMap::default()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::UnmappedCountry { country: Country::Taiwan, role: "use" }
        ));
    }
}
