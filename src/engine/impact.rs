//! Impact vectors and life-cycle phases

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::AddAssign;

use crate::core::identity::{EntityName, Indicator};
use crate::core::reference::ReferenceTable;

/// Life-cycle stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Material,
    Processing,
    UsePhase,
    Transportation,
}

impl Phase {
    /// Row label in the impact matrix
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Material => "Material",
            Phase::Processing => "Processing",
            Phase::UsePhase => "Use phase",
            Phase::Transportation => "Transportation",
        }
    }

    pub fn all() -> &'static [Phase] {
        &[
            Phase::Material,
            Phase::Processing,
            Phase::UsePhase,
            Phase::Transportation,
        ]
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Impact quantity per indicator, in reference-table column order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImpactVector(IndexMap<Indicator, f64>);

impl ImpactVector {
    /// All-zero vector over the given indicators
    pub fn zeros(indicators: &[Indicator]) -> Self {
        indicators.iter().map(|i| (i.clone(), 0.0)).collect()
    }

    /// `factor(entity, c) * quantity` for every indicator of the table
    pub fn scaled_row(table: &ReferenceTable, entity: &EntityName, quantity: f64) -> Self {
        table
            .indicators()
            .iter()
            .map(|c| (c.clone(), table.factor(entity, c) * quantity))
            .collect()
    }

    pub fn get(&self, indicator: &Indicator) -> Option<f64> {
        self.0.get(indicator).copied()
    }

    pub fn indicators(&self) -> impl Iterator<Item = &Indicator> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Indicator, f64)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when both vectors cover exactly the same indicators, in any order
    pub fn same_indicators(&self, other: &ImpactVector) -> bool {
        self.len() == other.len() && self.indicators().all(|i| other.0.contains_key(i))
    }

    /// Sum a set of vectors over the given indicators
    pub fn sum<'a>(
        indicators: &[Indicator],
        vectors: impl IntoIterator<Item = &'a ImpactVector>,
    ) -> Self {
        let mut total = Self::zeros(indicators);
        for v in vectors {
            total += v;
        }
        total
    }
}

impl FromIterator<(Indicator, f64)> for ImpactVector {
    fn from_iter<I: IntoIterator<Item = (Indicator, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Adds `rhs` component-wise; indicators missing from `self` are ignored
impl AddAssign<&ImpactVector> for ImpactVector {
    fn add_assign(&mut self, rhs: &ImpactVector) {
        for (indicator, value) in self.0.iter_mut() {
            if let Some(v) = rhs.0.get(indicator) {
                *value += v;
            }
        }
    }
}
