//! Impact computation engine
//!
//! Four independent phase calculators (material, processing, use,
//! transport) turn a [`ProductDescription`] into impact vectors using the
//! reference table; the aggregator cross-tabulates and normalizes them.
//! Everything here is pure: no I/O, no state between runs.

pub mod aggregate;
pub mod error;
pub mod impact;
pub mod material;
pub mod processing;
pub mod transport;
pub mod use_phase;

#[cfg(test)]
mod testing;

pub use aggregate::{aggregate, ImpactMatrix, NormalizationFactors, PhaseImpacts};
pub use error::EngineError;
pub use impact::{ImpactVector, Phase};
pub use transport::{Leg, Shipment, TransportedMassDistance};

use indexmap::IndexMap;
use serde::Serialize;

use crate::core::distance::DistanceTable;
use crate::core::electricity::ElectricityMixMap;
use crate::core::identity::{EntityName, TransportMode};
use crate::core::reference::{MissingEntityWarning, MissingKind, ReferenceTable};
use crate::entities::product::ProductDescription;

/// Reference data an assessment runs against
#[derive(Debug, Clone)]
pub struct Assessment {
    pub reference: ReferenceTable,
    pub distances: DistanceTable,
    pub electricity: ElectricityMixMap,
    pub normalization: NormalizationFactors,
}

/// Everything computed for one product
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentReport {
    /// Impact of each material, in declaration order
    pub materials: IndexMap<EntityName, ImpactVector>,
    /// Transported mass × distance per mode
    pub transport: TransportedMassDistance,
    pub matrix: ImpactMatrix,
}

impl Assessment {
    /// Assess `reference` with the built-in distances, grid mixes and factors
    pub fn new(reference: ReferenceTable) -> Self {
        Self {
            reference,
            distances: DistanceTable::default(),
            electricity: ElectricityMixMap::default(),
            normalization: NormalizationFactors::default(),
        }
    }

    /// Run the four calculators and the aggregator
    pub fn run(&self, product: &ProductDescription) -> Result<AssessmentReport, EngineError> {
        let indicators = self.reference.indicators();

        let materials = material::material_impacts(product, &self.reference);
        let tkm = transport::transported_mass_distance(product, &self.distances)?;

        let phases = PhaseImpacts {
            material: material::material_phase_impact(&materials, indicators),
            processing: processing::processing_impact(product, &self.reference, &self.electricity)?,
            use_phase: use_phase::use_phase_impact(product, &self.reference, &self.electricity)?,
            transportation: transport::impact_of(&tkm, &self.reference),
        };
        let matrix = aggregate(&phases, indicators, &self.normalization)?;

        tracing::debug!(grand_total = matrix.grand_total(), "assessment complete");
        Ok(AssessmentReport {
            materials,
            transport: tkm,
            matrix,
        })
    }

    /// Reference factors the product needs but the table lacks
    ///
    /// An entity with no row at all is reported once; a row with blank
    /// cells is reported once per missing indicator. Countries without a
    /// grid mix are left to [`Assessment::run`], where they are fatal.
    pub fn missing_entities(&self, product: &ProductDescription) -> Vec<MissingEntityWarning> {
        let mut entities: Vec<EntityName> = product.materials.iter().map(|m| m.name.clone()).collect();
        for country in [product.processing.country, product.usage.country] {
            if let Some(mix) = self.electricity.get(country) {
                entities.push(mix.clone());
            }
        }
        let mut modes: Vec<TransportMode> = transport::shipments(product)
            .iter()
            .flat_map(|s| s.legs.iter().map(|leg| leg.mode))
            .collect();
        modes.sort();
        modes.dedup();
        entities.extend(modes.iter().map(|m| m.entity_name()));

        let mut seen = Vec::new();
        let mut warnings = Vec::new();
        for entity in entities {
            if seen.contains(&entity) {
                continue;
            }
            for indicator in self.reference.indicators() {
                if let Err(warning) = self.reference.lookup(&entity, indicator) {
                    let whole_row = warning.kind == MissingKind::Entity;
                    warnings.push(warning);
                    if whole_row {
                        break;
                    }
                }
            }
            seen.push(entity);
        }
        warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::{Country, Indicator};
    use crate::engine::testing::{co2, product_yaml, sample_table, single_material_product};
    use approx::assert_relative_eq;

    #[test]
    fn test_run_is_idempotent() {
        let assessment = Assessment::new(sample_table());
        let product = product_yaml();
        let first = assessment.run(&product).unwrap();
        let second = assessment.run(&product).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_french_material_scenario() {
        let mut table = ReferenceTable::new(vec![co2()]);
        table.insert(EntityName::parse("Plaque de PPMA").unwrap(), [(co2(), 2.0)]);
        table.insert(TransportMode::Truck.entity_name(), [(co2(), 0.1)]);
        table.insert(EntityName::parse("Mix électrique réseau, FR").unwrap(), [(co2(), 0.06)]);

        let report = Assessment::new(table).run(&single_material_product()).unwrap();
        let m = &report.matrix;

        assert_eq!(m.phase(Phase::Material).unwrap().impacts.get(&co2()), Some(2.0));
        assert_eq!(m.phase(Phase::UsePhase).unwrap().impacts.get(&co2()), Some(0.0));
        assert_relative_eq!(report.transport.get(TransportMode::Truck), 1.2, max_relative = 1e-12);
        assert_relative_eq!(
            m.phase(Phase::Transportation).unwrap().impacts.get(&co2()).unwrap(),
            1.2 * 0.1,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_mode_swap_with_equal_factors_keeps_total() {
        let mut table = sample_table();
        let boat: Vec<(Indicator, f64)> = table
            .indicators()
            .iter()
            .map(|c| (c.clone(), table.factor(&TransportMode::Boat.entity_name(), c)))
            .collect();
        table.insert(TransportMode::Train.entity_name(), boat);
        let assessment = Assessment::new(table);

        let by_boat = product_yaml();
        let mut by_train = product_yaml();
        by_train.transport.set_all(TransportMode::Train);

        let a = assessment.run(&by_boat).unwrap();
        let b = assessment.run(&by_train).unwrap();

        assert_ne!(a.transport, b.transport);
        assert_eq!(b.transport.get(TransportMode::Boat), 0.0);
        assert_relative_eq!(
            a.matrix.grand_total(),
            b.matrix.grand_total(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_unmapped_use_country_aborts_run() {
        let mut product = product_yaml();
        product.usage.country = Country::Taiwan;
        let err = Assessment::new(sample_table()).run(&product).unwrap_err();
        assert!(err.to_string().contains("Taiwan"));
    }

    #[test]
    fn test_missing_entities_lists_unknown_material_once() {
        let mut product = product_yaml();
        product.materials[0].name = EntityName::parse("Unobtainium").unwrap();
        let warnings = Assessment::new(sample_table()).missing_entities(&product);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].entity.as_str(), "Unobtainium");
        assert_eq!(warnings[0].kind, MissingKind::Entity);
    }

    #[test]
    fn test_missing_entities_only_checks_used_modes() {
        let mut table = ReferenceTable::new(sample_table().indicators().to_vec());
        let sample = sample_table();
        for entity in sample.entities().filter(|e| e.as_str() != "plane") {
            let row: Vec<(Indicator, f64)> = sample
                .indicators()
                .iter()
                .map(|c| (c.clone(), sample.factor(entity, c)))
                .collect();
            table.insert(entity.clone(), row);
        }
        let assessment = Assessment::new(table);
        assert!(assessment.missing_entities(&product_yaml()).is_empty());

        let mut flown = product_yaml();
        flown.transport.set_all(TransportMode::Plane);
        let warnings = assessment.missing_entities(&flown);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].entity.as_str(), "plane");
    }
}
