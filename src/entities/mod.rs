//! Input documents
//!
//! - [`ProductDescription`] - bill of materials, assembly, usage and transport
//! - [`ScenarioOverrides`] - what-if knobs applied on top of a description

pub mod product;
pub mod scenario;

pub use product::{Material, ProcessingProfile, ProductDescription, ProductError, UsageProfile};
pub use scenario::{OriginOverride, ScenarioError, ScenarioOverrides};
