//! lca: life-cycle footprint calculator
//!
//! Turns a product description (bill of materials, assembly, usage and
//! transport) and a reference emission-factor table into per-phase and
//! per-indicator impact totals, normalized to micropoints.

pub mod cli;
pub mod core;
pub mod engine;
pub mod entities;
pub mod yaml;
