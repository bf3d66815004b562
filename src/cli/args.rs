//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    check::CheckArgs, completions::CompletionsArgs, config::ConfigCommands, init::InitArgs,
    materials::MaterialsArgs, report::ReportArgs, transport::TransportArgs,
};
use crate::core::identity::{Country, TransportMode};
use crate::entities::scenario::{OriginOverride, ScenarioOverrides};

#[derive(Parser)]
#[command(name = "lca")]
#[command(author, version, about = "Life-cycle footprint calculator")]
#[command(long_about = "Estimates the environmental footprint of a product over its life cycle \
from a bill of materials and a reference emission-factor table, and reports normalized \
impact totals per phase and per indicator.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose output (debug logging)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Write output to a file instead of stdout
    #[arg(long, short = 'o', global = true)]
    pub output: Option<PathBuf>,
}

/// Input files and scenario overrides shared by the assessment commands
#[derive(clap::Args, Clone, Debug, Default)]
pub struct InputArgs {
    /// Product description (default: product.yaml)
    #[arg(long, short = 'p')]
    pub product: Option<PathBuf>,

    /// Reference emission-factor table (default: reference.csv)
    #[arg(long, short = 'r')]
    pub reference: Option<PathBuf>,

    /// Configuration file (default: ./lca.yaml when present)
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub scenario: ScenarioArgs,
}

/// What-if overrides applied on top of the product description
#[derive(clap::Args, Clone, Debug, Default)]
pub struct ScenarioArgs {
    /// Product lifetime in years (1-30)
    #[arg(long, value_name = "YEARS")]
    pub lifetime: Option<f64>,

    /// Power draw in W (400-1000)
    #[arg(long, value_name = "WATTS")]
    pub power: Option<f64>,

    /// Country where the product is used
    #[arg(long, value_name = "COUNTRY")]
    pub use_country: Option<Country>,

    /// Country where the product is assembled
    #[arg(long, value_name = "COUNTRY")]
    pub assembly_country: Option<Country>,

    /// Transport mode for every declared country pair
    #[arg(long, value_name = "MODE")]
    pub main_transport: Option<TransportMode>,

    /// Production country of a material (repeatable)
    #[arg(long = "origin", value_name = "NAME=COUNTRY")]
    pub origins: Vec<OriginOverride>,
}

impl ScenarioArgs {
    pub fn overrides(&self) -> ScenarioOverrides {
        ScenarioOverrides {
            lifetime_years: self.lifetime,
            power_w: self.power,
            use_country: self.use_country,
            assembly_country: self.assembly_country,
            main_transport: self.main_transport,
            origins: self.origins.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a sample product, reference table and config to a directory
    Init(InitArgs),

    /// Full impact matrix with normalized totals and distributions
    Report(ReportArgs),

    /// Impact of each material of the bill of materials
    Materials(MaterialsArgs),

    /// Route legs and transported mass × distance per mode
    Transport(TransportArgs),

    /// Validate inputs and list reference factors the product lacks
    Check(CheckArgs),

    /// Inspect the layered configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Use the configured default (table when unset)
    #[default]
    Auto,
    /// Terminal table
    Table,
    /// Markdown tables
    Md,
    /// CSV format (for spreadsheets)
    Csv,
    /// JSON format (for programming)
    Json,
    /// YAML format (full fidelity)
    Yaml,
}

impl OutputFormat {
    /// Resolve `auto` against the configured default
    pub fn resolve(self, configured: Option<&str>) -> OutputFormat {
        match self {
            OutputFormat::Auto => configured
                .and_then(|name| OutputFormat::from_str(name, true).ok())
                .filter(|f| *f != OutputFormat::Auto)
                .unwrap_or(OutputFormat::Table),
            other => other,
        }
    }
}
