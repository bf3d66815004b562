//! Phase × indicator aggregation and normalization
//!
//! Indicator totals are converted to micropoints (µPt) with one factor per
//! indicator so that climate change, ionising radiation and resource
//! depletion can be compared and summed.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::identity::Indicator;
use crate::engine::error::EngineError;
use crate::engine::impact::{ImpactVector, Phase};

pub const TOTAL_PER_CATEGORY: &str = "Total per category";
pub const TOTAL_PER_CATEGORY_NORMALIZED: &str = "Total per category (normalized)";
pub const DISTRIBUTION_PER_INDICATOR: &str = "Distribution per indicator (%)";
pub const TOTAL_PER_PHASE_NORMALIZED: &str = "Total per phase (normalized)";
pub const DISTRIBUTION_PER_PHASE: &str = "Distribution per phase (%)";

/// Conversion factor from each indicator's unit to micropoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizationFactors(IndexMap<Indicator, f64>);

impl NormalizationFactors {
    pub fn new(factors: IndexMap<Indicator, f64>) -> Self {
        Self(factors)
    }

    pub fn get(&self, indicator: &Indicator) -> Option<f64> {
        self.0.get(indicator).copied()
    }

    pub fn set(&mut self, indicator: Indicator, factor: f64) {
        self.0.insert(indicator, factor);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Indicator, f64)> {
        self.0.iter().map(|(k, v)| (k, *v))
    }

    /// Factor for `indicator`, fatal when absent
    pub fn require(&self, indicator: &Indicator) -> Result<f64, EngineError> {
        self.get(indicator)
            .ok_or_else(|| EngineError::MissingNormalizationFactor {
                indicator: indicator.clone(),
            })
    }

    /// Σ value × factor over the vector's indicators
    pub fn normalize(&self, vector: &ImpactVector) -> Result<f64, EngineError> {
        vector
            .iter()
            .map(|(c, v)| self.require(c).map(|factor| v * factor))
            .sum()
    }
}

impl Default for NormalizationFactors {
    fn default() -> Self {
        Self(
            [
                (Indicator::new("kg eq. CO2"), 28.6),
                (Indicator::new("eq. kBq U235"), 12.73),
                (Indicator::new("kg eq. Sb"), 1395510.0),
            ]
            .into_iter()
            .collect(),
        )
    }
}

/// The four phase vectors fed to the aggregator
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseImpacts {
    pub material: ImpactVector,
    pub processing: ImpactVector,
    pub use_phase: ImpactVector,
    pub transportation: ImpactVector,
}

impl PhaseImpacts {
    pub fn get(&self, phase: Phase) -> &ImpactVector {
        match phase {
            Phase::Material => &self.material,
            Phase::Processing => &self.processing,
            Phase::UsePhase => &self.use_phase,
            Phase::Transportation => &self.transportation,
        }
    }
}

/// One phase row of the matrix
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseRow {
    pub phase: Phase,
    pub impacts: ImpactVector,
    /// Σ impacts × normalization factor (µPt)
    pub normalized_total: f64,
    /// Share of the grand total (%)
    pub distribution: f64,
}

/// A labeled matrix row for rendering; `None` cells are left blank
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixRow {
    pub label: String,
    pub cells: Vec<Option<f64>>,
}

/// Phase × indicator impact matrix with totals and distributions
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactMatrix {
    pub indicators: Vec<Indicator>,
    pub phases: Vec<PhaseRow>,
    pub total_per_category: ImpactVector,
    pub total_per_category_normalized: ImpactVector,
    pub distribution_per_indicator: ImpactVector,
    /// Grand total over every phase and indicator (µPt)
    grand_total: f64,
}

fn percent(part: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        part / total * 100.0
    }
}

/// Build the impact matrix from the four phase vectors
pub fn aggregate(
    impacts: &PhaseImpacts,
    indicators: &[Indicator],
    factors: &NormalizationFactors,
) -> Result<ImpactMatrix, EngineError> {
    let reference = ImpactVector::zeros(indicators);
    for phase in Phase::all() {
        if !impacts.get(*phase).same_indicators(&reference) {
            return Err(EngineError::IndicatorMismatch { phase: *phase });
        }
    }

    let total_per_category =
        ImpactVector::sum(indicators, Phase::all().iter().map(|p| impacts.get(*p)));

    let total_per_category_normalized = indicators
        .iter()
        .map(|c| {
            let total = total_per_category.get(c).unwrap_or(0.0);
            factors.require(c).map(|factor| (c.clone(), total * factor))
        })
        .collect::<Result<ImpactVector, EngineError>>()?;

    let grand_total: f64 = total_per_category_normalized.iter().map(|(_, v)| v).sum();

    let distribution_per_indicator = total_per_category_normalized
        .iter()
        .map(|(c, v)| (c.clone(), percent(v, grand_total)))
        .collect();

    let mut phases = Vec::with_capacity(Phase::all().len());
    for phase in Phase::all() {
        let row = impacts.get(*phase);
        let normalized_total = factors.normalize(row)?;
        phases.push(PhaseRow {
            phase: *phase,
            impacts: row.clone(),
            normalized_total,
            distribution: percent(normalized_total, grand_total),
        });
    }

    Ok(ImpactMatrix {
        indicators: indicators.to_vec(),
        phases,
        total_per_category,
        total_per_category_normalized,
        distribution_per_indicator,
        grand_total,
    })
}

impl ImpactMatrix {
    pub fn phase(&self, phase: Phase) -> Option<&PhaseRow> {
        self.phases.iter().find(|r| r.phase == phase)
    }

    /// Grand normalized total over every phase and indicator (µPt)
    pub fn grand_total(&self) -> f64 {
        self.grand_total
    }

    /// Grand total as a share of an average citizen's yearly footprint (%)
    pub fn share_of_citizen_footprint(&self, yearly_micropoints: f64) -> f64 {
        percent(self.grand_total, yearly_micropoints)
    }

    /// Column headers: indicators, then the two per-phase columns
    pub fn columns(&self) -> Vec<String> {
        self.indicators
            .iter()
            .map(|c| c.to_string())
            .chain([
                TOTAL_PER_PHASE_NORMALIZED.to_string(),
                DISTRIBUTION_PER_PHASE.to_string(),
            ])
            .collect()
    }

    /// Labeled rows: the four phases, then the derived rows
    pub fn rows(&self) -> Vec<MatrixRow> {
        let cells = |v: &ImpactVector| -> Vec<Option<f64>> {
            self.indicators.iter().map(|c| v.get(c)).collect()
        };

        let mut rows: Vec<MatrixRow> = self
            .phases
            .iter()
            .map(|r| {
                let mut c = cells(&r.impacts);
                c.push(Some(r.normalized_total));
                c.push(Some(r.distribution));
                MatrixRow {
                    label: r.phase.label().to_string(),
                    cells: c,
                }
            })
            .collect();

        let mut total = cells(&self.total_per_category);
        total.push(Some(self.grand_total));
        total.push(Some(percent(self.grand_total, self.grand_total)));
        rows.push(MatrixRow {
            label: TOTAL_PER_CATEGORY.to_string(),
            cells: total,
        });

        for (label, vector) in [
            (TOTAL_PER_CATEGORY_NORMALIZED, &self.total_per_category_normalized),
            (DISTRIBUTION_PER_INDICATOR, &self.distribution_per_indicator),
        ] {
            let mut c = cells(vector);
            c.extend([None, None]);
            rows.push(MatrixRow {
                label: label.to_string(),
                cells: c,
            });
        }

        rows
    }
}
