//! CLI command implementations

pub mod check;
pub mod completions;
pub mod config;
pub mod init;
pub mod materials;
pub mod report;
pub mod transport;
