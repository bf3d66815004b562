//! Shared helper functions for CLI commands
//!
//! Input loading is the same for every assessment command: layered config,
//! product description with scenario overrides, reference table.

use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::cli::args::InputArgs;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::distance::DistanceTable;
use crate::core::reference::ReferenceTable;
use crate::engine::Assessment;
use crate::entities::product::ProductDescription;

/// Everything an assessment command needs
#[derive(Debug)]
pub struct Session {
    pub config: Config,
    pub product_path: PathBuf,
    /// Product description after scenario overrides
    pub product: ProductDescription,
    pub assessment: Assessment,
}

impl Session {
    /// Load config, product and reference table
    pub fn load(input: &InputArgs) -> Result<Self> {
        let config = Config::load(input.config.as_deref())?;

        let product_path = input.product.clone().unwrap_or_else(|| config.product_path());
        let declared = ProductDescription::load(&product_path)?;
        let product = input.scenario.overrides().apply(&declared)?;

        let reference_path = input
            .reference
            .clone()
            .unwrap_or_else(|| config.reference_path());
        let reference = ReferenceTable::load(&reference_path, &config.reference_aliases)?;

        let assessment = Assessment {
            reference,
            distances: DistanceTable::default(),
            electricity: config.electricity_mix_map(),
            normalization: config.normalization_factors(),
        };

        Ok(Self {
            config,
            product_path,
            product,
            assessment,
        })
    }

    /// Output format with `auto` resolved against the config
    pub fn format(&self, global: &GlobalOpts) -> OutputFormat {
        global.format.resolve(self.config.default_format.as_deref())
    }

    /// Display name of the product
    pub fn product_name(&self) -> String {
        self.product.name.clone().unwrap_or_else(|| {
            self.product_path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_else(|| "product".to_string())
        })
    }
}

/// Write to `--output` or stdout
pub fn write_output(content: &str, output_path: Option<&Path>, quiet: bool) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            writer.flush().into_diagnostic()?;
            if !quiet {
                eprintln!(
                    "{} Output written to {}",
                    style("✓").green(),
                    style(path.display()).cyan()
                );
            }
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}

/// True when the format carries the human-oriented headline and notes
pub fn is_human(format: OutputFormat) -> bool {
    matches!(format, OutputFormat::Table | OutputFormat::Md)
}
