//! Processing phase: electricity consumed by the assembly step

use crate::core::electricity::ElectricityMixMap;
use crate::core::identity::{Country, EntityName};
use crate::core::reference::ReferenceTable;
use crate::engine::error::EngineError;
use crate::engine::impact::ImpactVector;
use crate::entities::product::ProductDescription;

/// Resolve a country's grid-mix row; unmapped countries are fatal
pub(crate) fn electricity_mix<'a>(
    map: &'a ElectricityMixMap,
    country: Country,
    role: &'static str,
) -> Result<&'a EntityName, EngineError> {
    map.get(country)
        .ok_or(EngineError::UnmappedCountry { country, role })
}

/// Assembly-country grid mix scaled by the declared assembly energy
pub fn processing_impact(
    product: &ProductDescription,
    table: &ReferenceTable,
    electricity: &ElectricityMixMap,
) -> Result<ImpactVector, EngineError> {
    let mix = electricity_mix(electricity, product.processing.country, "assembly")?;
    Ok(ImpactVector::scaled_row(
        table,
        mix,
        product.processing.energy_kwh,
    ))
}
