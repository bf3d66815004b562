//! Fatal engine errors
//!
//! Missing reference factors are not errors (they default to zero); these
//! are configuration-data problems that abort the assessment.

use miette::Diagnostic;
use thiserror::Error;

use crate::core::identity::{Country, CountryPair, Indicator};
use crate::engine::impact::Phase;

#[derive(Debug, Error, Diagnostic, PartialEq)]
pub enum EngineError {
    #[error("No distance recorded for trip {pair}")]
    #[diagnostic(
        code(lca::distance::missing),
        help("Every country pair the product references needs a distance table entry")
    )]
    MissingDistance { pair: CountryPair },

    #[error("No electricity mix mapped for {role} country {country}")]
    #[diagnostic(
        code(lca::electricity::unmapped),
        help("Add an `electricity_mix` entry for this country in lca.yaml, or pick another country")
    )]
    UnmappedCountry { country: Country, role: &'static str },

    #[error("No normalization factor for indicator '{indicator}'")]
    #[diagnostic(
        code(lca::normalization::missing),
        help("Every indicator column of the reference table needs a `normalization` entry in lca.yaml")
    )]
    MissingNormalizationFactor { indicator: Indicator },

    #[error("Impact vector for phase '{phase}' does not cover the reference indicators")]
    #[diagnostic(code(lca::aggregate::indicators))]
    IndicatorMismatch { phase: Phase },
}
