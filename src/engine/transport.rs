//! Transportation phase
//!
//! Every shipment is broken into legs: a domestic truck haul in the
//! departure country, the international leg with the declared mode, and a
//! domestic truck haul in the arrival country. Shipments between two
//! places in the same country are a single domestic truck leg. Leg
//! distances times transported mass give t·km per mode, which the
//! reference table's transport rows convert into impacts.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::core::distance::DistanceTable;
use crate::core::identity::{Country, CountryPair, EntityName, TransportMode};
use crate::core::reference::ReferenceTable;
use crate::engine::error::EngineError;
use crate::engine::impact::ImpactVector;
use crate::entities::product::ProductDescription;

/// One hop of a shipment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Leg {
    pub from: Country,
    pub to: Country,
    pub mode: TransportMode,
}

impl Leg {
    pub fn new(from: Country, to: Country, mode: TransportMode) -> Self {
        Self { from, to, mode }
    }

    /// Resolved distance (km); plane legs fly half the ground distance
    pub fn distance_km(&self, distances: &DistanceTable) -> Result<f64, EngineError> {
        let base = distances
            .get(self.from, self.to)
            .ok_or(EngineError::MissingDistance {
                pair: CountryPair::new(self.from, self.to),
            })?;
        Ok(match self.mode {
            TransportMode::Plane => base / 2.0,
            _ => base,
        })
    }
}

impl fmt::Display for Leg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.from, self.to, self.mode)
    }
}

/// Legs of a trip from `from` to `to` with `mode` for the cross-border hop
pub fn route_legs(from: Country, to: Country, mode: TransportMode) -> Vec<Leg> {
    if from == to {
        vec![Leg::new(from, from, TransportMode::Truck)]
    } else {
        vec![
            Leg::new(from, from, TransportMode::Truck),
            Leg::new(from, to, mode),
            Leg::new(to, to, TransportMode::Truck),
        ]
    }
}

/// What a shipment carries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cargo {
    /// Raw material shipped to the assembly site
    Material(EntityName),
    /// Finished product shipped from assembly to the place of use
    FinishedProduct,
}

impl fmt::Display for Cargo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cargo::Material(name) => write!(f, "{}", name),
            Cargo::FinishedProduct => write!(f, "finished product"),
        }
    }
}

/// A mass moved along a sequence of legs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shipment {
    pub cargo: Cargo,
    pub mass_kg: f64,
    pub legs: Vec<Leg>,
}

impl Shipment {
    /// Transported mass × distance (t·km) of one leg of this shipment
    pub fn leg_tkm(&self, leg: &Leg, distances: &DistanceTable) -> Result<f64, EngineError> {
        Ok(leg.distance_km(distances)? * self.mass_kg / 1000.0)
    }
}

/// All shipments of the product's life cycle
///
/// One per material (origin → assembly, usable mass) plus the delivery of
/// the finished product (assembly → use, total finished mass).
pub fn shipments(product: &ProductDescription) -> Vec<Shipment> {
    let assembly = product.processing.country;
    let use_country = product.usage.country;

    let mut shipments: Vec<Shipment> = product
        .materials
        .iter()
        .map(|m| Shipment {
            cargo: Cargo::Material(m.name.clone()),
            mass_kg: m.usable_mass_kg,
            legs: route_legs(m.origin, assembly, product.transport_mode(m.origin, assembly)),
        })
        .collect();

    shipments.push(Shipment {
        cargo: Cargo::FinishedProduct,
        mass_kg: product.finished_mass_kg(),
        legs: route_legs(
            assembly,
            use_country,
            product.transport_mode(assembly, use_country),
        ),
    });

    shipments
}

/// Transported mass × distance (t·km) per mode, covering every mode
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TransportedMassDistance(BTreeMap<TransportMode, f64>);

impl Default for TransportedMassDistance {
    fn default() -> Self {
        Self(TransportMode::all().iter().map(|m| (*m, 0.0)).collect())
    }
}

impl TransportedMassDistance {
    pub fn get(&self, mode: TransportMode) -> f64 {
        self.0.get(&mode).copied().unwrap_or(0.0)
    }

    pub fn add(&mut self, mode: TransportMode, tkm: f64) {
        *self.0.entry(mode).or_insert(0.0) += tkm;
    }

    pub fn iter(&self) -> impl Iterator<Item = (TransportMode, f64)> + '_ {
        self.0.iter().map(|(m, v)| (*m, *v))
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }
}

/// Accumulate t·km per mode over every shipment
pub fn transported_mass_distance(
    product: &ProductDescription,
    distances: &DistanceTable,
) -> Result<TransportedMassDistance, EngineError> {
    let mut tkm = TransportedMassDistance::default();
    for shipment in shipments(product) {
        for leg in &shipment.legs {
            tkm.add(leg.mode, shipment.leg_tkm(leg, distances)?);
        }
    }
    Ok(tkm)
}

/// Transportation phase impact
pub fn transport_impact(
    product: &ProductDescription,
    table: &ReferenceTable,
    distances: &DistanceTable,
) -> Result<ImpactVector, EngineError> {
    let tkm = transported_mass_distance(product, distances)?;
    Ok(impact_of(&tkm, table))
}

/// Convert a t·km split into impacts using the transport rows of the table
pub fn impact_of(tkm: &TransportedMassDistance, table: &ReferenceTable) -> ImpactVector {
    let mut impact = ImpactVector::zeros(table.indicators());
    // Unused modes contribute nothing; skipping them avoids warnings for
    // transport rows the table does not carry
    for (mode, amount) in tkm.iter().filter(|(_, amount)| *amount != 0.0) {
        impact += &ImpactVector::scaled_row(table, &mode.entity_name(), amount);
    }
    impact
}
